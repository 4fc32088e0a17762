use anyhow::{Context, Result};
use reqwest::{blocking::Client, redirect::Policy};
use tracing::debug;

/// Fetch `url` into memory, blocking until the whole body has arrived.
/// No timeout: the archive is large and the run is interactive.
pub(crate) fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let client = Client::builder()
        .user_agent(concat!("swiss-admin/", env!("CARGO_PKG_VERSION")))
        .redirect(Policy::limited(10))
        .timeout(None)
        .build()
        .context("build HTTP client")?;

    let resp = client.get(url).send()
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url} returned error status"))?;

    let bytes = resp.bytes().with_context(|| format!("read body of {url}"))?;
    debug!(url, bytes = bytes.len(), "downloaded");
    Ok(bytes.to_vec())
}
