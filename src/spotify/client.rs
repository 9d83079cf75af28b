use std::{thread::sleep, time::Duration};

use reqwest::{
    StatusCode,
    blocking::{Client, RequestBuilder, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{Error, Res, config, management::TokenManager, warning};

/// How the client reacts to 502 and 429 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per request before a 502 or 429 is handed to the caller.
    pub max_attempts: u32,
    pub bad_gateway_delay: Duration,
    /// Longest `Retry-After` we sit through; anything above is reported.
    pub max_retry_after_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 5,
            bad_gateway_delay: Duration::from_secs(10),
            max_retry_after_secs: 120,
        }
    }
}

/// Blocking Spotify Web API client authenticated with the stored token.
pub struct SpotifyClient {
    http: Client,
    base_url: String,
    tokens: TokenManager,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl SpotifyClient {
    /// Builds a client from the environment and the cached token.
    ///
    /// Fails with a configuration or auth error before any request is
    /// made if the client id, the timeout or the token is missing.
    pub fn from_env() -> Res<Self> {
        config::spotify_client_id()?;
        let http = Client::builder().timeout(config::http_timeout()?).build()?;
        let tokens = TokenManager::load()?;

        Ok(Self::new(http, config::spotify_apiurl(), tokens))
    }

    pub fn new(http: Client, base_url: impl Into<String>, tokens: TokenManager) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn get<T: DeserializeOwned>(&mut self, url: &str, query: &[(&str, String)]) -> Res<T> {
        let response = self.send(|http| http.get(url).query(query))?;
        Ok(response.json::<T>()?)
    }

    pub(crate) fn post<B, T>(&mut self, url: &str, body: &B) -> Res<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let response = self.send(|http| http.post(url).json(body))?;
        Ok(response.json::<T>()?)
    }

    /// Sends a request built by `request`, with a fresh bearer token on
    /// every attempt.
    ///
    /// # Retries
    ///
    /// - **502 Bad Gateway**: retried after `bad_gateway_delay`.
    /// - **429 Too Many Requests**: retried after the `Retry-After` delay
    ///   when it is at most `max_retry_after_secs`, reported as
    ///   [`Error::RateLimited`] otherwise.
    ///
    /// After `max_attempts` the last response is turned into an error.
    fn send<F>(&mut self, request: F) -> Res<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let token = self.tokens.get_valid_token(&self.http)?;
            let response = request(&self.http).bearer_auth(token).send()?;
            let status = response.status();
            let retries_left = attempt < self.retry.max_attempts;

            if status == StatusCode::BAD_GATEWAY && retries_left {
                sleep(self.retry.bad_gateway_delay);
                continue; // retry
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = retry_after_secs(&response);
                if retry_after > self.retry.max_retry_after_secs {
                    warning!(
                        "Retry after has reached an abnormal high of {} seconds. Try again later.",
                        retry_after
                    );
                    return Err(Error::RateLimited { retry_after });
                }
                if !retries_left {
                    warning!(
                        "Still rate limited after {} attempts. Try again later.",
                        attempt
                    );
                    return Err(Error::RateLimited { retry_after });
                }
                sleep(Duration::from_secs(retry_after.max(1)));
                continue;
            }

            if !status.is_success() {
                return Err(api_error(response));
            }

            return Ok(response);
        }
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0)
}

fn api_error(response: Response) -> Error {
    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or(body);

    Error::Api { status, message }
}
