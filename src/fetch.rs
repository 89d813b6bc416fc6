use std::time::Duration;

use tracing::{debug, instrument};

use crate::{error::FetchError, util::truncate_string};

/// Amount of body text echoed to debug logs
const BODY_PREVIEW_LEN: usize = 100;

/// Fetches a document as text
///
/// A non-2xx response is a failure. The body is decoded as UTF-8, replacing invalid sequences.
///
/// # Errors
/// Errors on network failure, timeout, or a non-success HTTP status
#[instrument(skip(client))]
pub async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<String, FetchError> {
    let res = client.get(url).timeout(timeout).send().await?;

    let status = res.status();
    debug!("Response status: {status}");
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let bytes = res.bytes().await?;
    let body = String::from_utf8_lossy(&bytes).into_owned();
    debug!(
        "Response body preview: {}",
        truncate_string(&body, BODY_PREVIEW_LEN)
    );

    Ok(body)
}
