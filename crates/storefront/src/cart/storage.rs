//! Cart persistence seam.
//!
//! The cart writes its full line collection through this interface after
//! every mutation and reads it back once when a request opens the cart.
//! Both operations are best-effort: a failed load yields an empty cart and
//! a failed save leaves the in-memory state authoritative for the session.

use tower_sessions::Session;

use crate::models::session_keys;

use super::CartLine;

/// Durable storage for the cart line collection.
///
/// Implementations must never fail loudly: `load` returns an empty
/// collection when nothing usable is stored, and `save` swallows write
/// errors after logging them.
pub trait CartStorage: Send + Sync {
    /// Read the stored line collection, or an empty one.
    fn load(&self) -> impl Future<Output = Vec<CartLine>> + Send;

    /// Replace the stored collection with `lines`.
    fn save(&self, lines: &[CartLine]) -> impl Future<Output = ()> + Send;
}

/// Session-backed cart storage.
///
/// The session cookie is this client's durable storage; the whole line
/// collection lives under a single fixed key.
#[derive(Debug, Clone)]
pub struct SessionCartStorage {
    session: Session,
}

impl SessionCartStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartStorage for SessionCartStorage {
    async fn load(&self) -> Vec<CartLine> {
        match self.session.get::<Vec<CartLine>>(session_keys::CART).await {
            Ok(lines) => lines.unwrap_or_default(),
            Err(e) => {
                // Unparseable stored state means an empty cart, never an error.
                tracing::debug!("Could not read stored cart, starting empty: {e}");
                Vec::new()
            }
        }
    }

    async fn save(&self, lines: &[CartLine]) {
        if let Err(e) = self.session.insert(session_keys::CART, lines).await {
            tracing::warn!("Failed to persist cart to session: {e}");
        }
    }
}

/// In-memory cart storage for tests.
///
/// Stores the serialized JSON form so tests can exercise the full
/// round-trip, including corrupted stored state.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    raw: std::sync::Arc<std::sync::Mutex<Option<String>>>,
}

impl MemoryCartStorage {
    /// Storage pre-seeded with a raw stored value, valid or not.
    #[must_use]
    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: std::sync::Arc::new(std::sync::Mutex::new(Some(raw.to_owned()))),
        }
    }

    /// The raw stored value, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.raw.lock().map(|guard| guard.clone()).unwrap_or(None)
    }
}

impl CartStorage for MemoryCartStorage {
    async fn load(&self) -> Vec<CartLine> {
        let Ok(guard) = self.raw.lock() else {
            return Vec::new();
        };
        guard
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }

    async fn save(&self, lines: &[CartLine]) {
        let Ok(serialized) = serde_json::to_string(lines) else {
            return;
        };
        if let Ok(mut guard) = self.raw.lock() {
            *guard = Some(serialized);
        }
    }
}
