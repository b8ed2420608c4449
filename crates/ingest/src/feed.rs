//! Authenticated bulk download from the TNS.
//!
//! The TNS serves its bulk CSV only to registered bots: the bot identity
//! goes into a `tns_marker` user-agent header and the API key into a
//! multipart form field. Upstream is an uncontrolled third party, so the
//! request carries a timeout and transport failures get a bounded retry
//! with backoff. A payload that later fails to decompress is NOT treated
//! as a success here — verification happens in the parse step.

use tns_mirror_core::{
    env_parse_with_default, env_required, MissingEnvVar, DEFAULT_CATALOG_URL,
    DEFAULT_DOWNLOAD_TIMEOUT_SECS,
};

use crate::error::IngestError;

const MAX_RETRIES: usize = 3;
const RETRY_DELAYS: [u64; 4] = [0, 1, 2, 4];

/// TNS bot credentials and feed location.
#[derive(Clone)]
pub struct FeedConfig {
    pub url: String,
    pub api_key: String,
    pub bot_id: String,
    pub bot_name: String,
    pub timeout_secs: u64,
}

impl FeedConfig {
    /// Read the config from the environment. `TNS_API_KEY`, `TNS_BOT_ID`
    /// and `TNS_BOT_NAME` are mandatory; the URL and timeout have defaults.
    pub fn from_env() -> Result<Self, MissingEnvVar> {
        Ok(Self {
            url: std::env::var("TNS_CATALOG_URL")
                .unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_owned()),
            api_key: env_required("TNS_API_KEY")?,
            bot_id: env_required("TNS_BOT_ID")?,
            bot_name: env_required("TNS_BOT_NAME")?,
            timeout_secs: env_parse_with_default(
                "TNS_DOWNLOAD_TIMEOUT_SECS",
                DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            ),
        })
    }
}

impl std::fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedConfig")
            .field("url", &self.url)
            .field("api_key", &"***")
            .field("bot_id", &self.bot_id)
            .field("bot_name", &self.bot_name)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// HTTP client for the bulk feed.
#[derive(Debug)]
pub struct FeedClient {
    client: reqwest::Client,
    config: FeedConfig,
}

impl FeedClient {
    /// Build the client with the download timeout applied.
    ///
    /// # Errors
    /// Only if the HTTP client cannot be built (TLS backend failure).
    pub fn new(config: FeedConfig) -> Result<Self, IngestError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IngestError::Download(format!("client init: {e}")))?;
        Ok(Self { client, config })
    }

    fn user_agent(&self) -> String {
        format!(
            "tns_marker{{\"tns_id\":\"{}\",\"type\": \"bot\", \"name\":\"{}\"}}",
            self.config.bot_id, self.config.bot_name,
        )
    }

    /// Fetch the zipped CSV, retrying transport failures and 5xx responses.
    ///
    /// # Errors
    /// `Download` once retries are exhausted or on a non-retryable status.
    pub async fn download(&self) -> Result<Vec<u8>, IngestError> {
        let mut last_error: Option<IngestError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay_secs = RETRY_DELAYS.get(attempt).copied().unwrap_or(4);
                tokio::time::sleep(std::time::Duration::from_secs(delay_secs)).await;
                tracing::warn!("feed download retry attempt {attempt}/{MAX_RETRIES}");
            }

            // The form is consumed by send, so it is rebuilt per attempt.
            let form = reqwest::multipart::Form::new()
                .text("api_key", self.config.api_key.clone());
            let response = match self
                .client
                .post(&self.config.url)
                .header(reqwest::header::USER_AGENT, self.user_agent())
                .multipart(form)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(e.into());
                    continue;
                },
            };

            let status = response.status();
            if status.is_success() {
                match response.bytes().await {
                    Ok(bytes) => return Ok(bytes.to_vec()),
                    Err(e) => {
                        last_error = Some(e.into());
                        continue;
                    },
                }
            }
            if status.is_server_error() {
                last_error =
                    Some(IngestError::Download(format!("upstream returned {status}")));
                continue;
            }
            // 4xx means bad credentials or a moved feed; retrying won't help.
            return Err(IngestError::Download(format!("upstream returned {status}")));
        }

        Err(last_error
            .unwrap_or_else(|| IngestError::Download("retries exhausted".to_owned())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FeedConfig {
        FeedConfig {
            url: "http://localhost/feed.csv.zip".to_owned(),
            api_key: "secret".to_owned(),
            bot_id: "12345".to_owned(),
            bot_name: "snad_bot".to_owned(),
            timeout_secs: 600,
        }
    }

    #[test]
    fn user_agent_is_a_tns_marker() {
        let client = FeedClient::new(config()).unwrap();
        assert_eq!(
            client.user_agent(),
            r#"tns_marker{"tns_id":"12345","type": "bot", "name":"snad_bot"}"#,
        );
    }

    #[test]
    fn debug_masks_the_api_key() {
        let text = format!("{:?}", config());
        assert!(!text.contains("secret"));
        assert!(text.contains("snad_bot"));
    }
}
