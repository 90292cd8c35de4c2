use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_RETRIES: usize = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared HTTP client settings for all rate providers.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("fxconv/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// GETs `url` and returns the body of a successful response, retrying
/// transient failures.
pub async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    retries: usize,
    delay_ms: u64,
) -> Result<String, reqwest::Error> {
    let response = with_retry(
        move || async move { client.get(url).send().await?.error_for_status() },
        retries,
        delay_ms,
    )
    .await?;
    response.text().await
}

/// Turns a failed request into a user facing error naming what was fetched.
pub fn request_error(err: reqwest::Error, subject: &str) -> anyhow::Error {
    match err.status() {
        Some(status) => anyhow::anyhow!("HTTP error: {} for {}", status, subject),
        None => anyhow::anyhow!("Request error: {} for {}", err, subject),
    }
}

/// Timeouts, connection failures and 5xx responses are worth another try.
pub fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout()
        || err.is_connect()
        || err.status().is_some_and(|status| status.is_server_error())
}

/// Retries an async operation with configurable attempts and delays
///
/// # Parameters
/// - `operation`: Closure returning a future
/// - `retries`: Number of retry attempts (total runs = 1 initial + retries)
/// - `delay_ms`: Milliseconds between retry attempts
///
/// # Returns
/// Either the successful result or the last error. Errors that are not
/// transient are returned immediately.
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    retries: usize,
    delay_ms: u64,
) -> Result<T, reqwest::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > retries || !is_transient(&err) {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt, retries, err
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn get_status(client: &reqwest::Client, url: &str) -> reqwest::Result<u16> {
        let response = client.get(url).send().await?.error_for_status()?;
        Ok(response.status().as_u16())
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&mock_server)
            .await;

        let client = http_client().unwrap();
        let url = format!("{}/flaky", mock_server.uri());
        let calls = AtomicUsize::new(0);
        let (client, url, counter) = (&client, url.as_str(), &calls);
        let result = with_retry(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                get_status(client, url)
            },
            2,
            0,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_client_errors() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = http_client().unwrap();
        let url = format!("{}/missing", mock_server.uri());
        let (client, url) = (&client, url.as_str());
        let result = with_retry(move || get_status(client, url), 2, 0).await;

        let err = result.unwrap_err();
        assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    }

    #[tokio::test]
    async fn test_returns_first_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = http_client().unwrap();
        let url = format!("{}/ok", mock_server.uri());
        let (client, url) = (&client, url.as_str());
        let status = with_retry(move || get_status(client, url), 2, 0)
            .await
            .unwrap();
        assert_eq!(status, 200);
    }
}
