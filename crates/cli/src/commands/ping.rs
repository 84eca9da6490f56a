//! API health probe command.

use std::time::Duration;

/// Probe timeout.
const TIMEOUT: Duration = Duration::from_secs(5);

/// Probe the Heartwood API health endpoint.
///
/// # Errors
///
/// Returns an error when `HEARTWOOD_API_URL` is unset, the request fails,
/// or the API answers with a non-success status.
pub async fn ping() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let base_url = std::env::var("HEARTWOOD_API_URL")
        .map_err(|_| "HEARTWOOD_API_URL is not set")?;

    let client = reqwest::Client::builder().timeout(TIMEOUT).build()?;
    let url = format!("{}/health", base_url.trim_end_matches('/'));

    let response = client.get(&url).send().await?;
    let status = response.status();

    if status.is_success() {
        tracing::info!(%url, "Heartwood API is up");
        Ok(())
    } else {
        Err(format!("Heartwood API answered {status}").into())
    }
}
