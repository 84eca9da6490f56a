//! Configuration check command.

use heartwood_admin::config::AdminConfig;
use heartwood_storefront::config::StorefrontConfig;

/// Load and validate both binaries' configuration from the environment.
///
/// # Errors
///
/// Returns the first configuration error encountered.
pub fn check() -> Result<(), Box<dyn std::error::Error>> {
    let storefront = StorefrontConfig::from_env()?;
    tracing::info!(
        addr = %storefront.socket_addr(),
        api = %storefront.api.base_url,
        "storefront configuration ok"
    );

    let admin = AdminConfig::from_env()?;
    tracing::info!(
        addr = %admin.socket_addr(),
        api = %admin.api_base_url,
        "admin configuration ok"
    );

    Ok(())
}
