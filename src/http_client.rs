use reqwest::{Client, header};
use anyhow::Result;
use std::time::Duration;

/// Headers sent with every backend request
fn default_headers() -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();

    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json")
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static("fr-FR,fr;q=0.9,en;q=0.8")
    );
    headers.insert(
        header::ACCEPT_ENCODING,
        header::HeaderValue::from_static("gzip, deflate, br")
    );

    headers
}

/// Creates an HTTP client for talking to a listings backend (JSON in, JSON out)
pub fn create_http_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .default_headers(default_headers())
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;

    Ok(client)
}
