use std::time::Duration;

use futures_util::StreamExt;
use gemstore_logging::gem_debug;
use reqwest::header::{CONTENT_TYPE, FROM};
use serde::Deserialize;

use crate::{FailureKind, FetchError, FetchedPage};

pub const DEFAULT_API_URL: &str = "https://wiki.guildwars2.com/api.php";
pub const DEFAULT_PAGE_NAME: &str = "Gem_Store/data";
pub const DEFAULT_USER_AGENT: &str = "GW2-Gemstore-Notifier";
pub const DEFAULT_CONTACT: &str = "https://github.com/TJEEPOT/GW2-Gemstore-Notifier";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// MediaWiki `api.php` endpoint.
    pub api_url: String,
    pub user_agent: String,
    /// Sent as `From` so wiki admins can reach the operator.
    pub contact: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            contact: DEFAULT_CONTACT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            redirect_limit: 5,
            max_bytes: 8 * 1024 * 1024,
            allowed_content_types: vec!["application/json".to_string()],
        }
    }
}

#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the latest revision of `page_name`.
    async fn fetch(&self, page_name: &str) -> Result<FetchedPage, FetchError>;
}

/// Reads pages through the MediaWiki revisions API.
#[derive(Debug, Clone)]
pub struct ReqwestPageFetcher {
    settings: FetchSettings,
}

impl ReqwestPageFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Builds the `action=query` revisions request for `page_name`.
    pub fn revision_url(&self, page_name: &str) -> Result<reqwest::Url, FetchError> {
        reqwest::Url::parse_with_params(
            &self.settings.api_url,
            &[
                ("action", "query"),
                ("prop", "revisions"),
                ("titles", page_name),
                ("rvslots", "*"),
                ("rvprop", "timestamp|content"),
                ("formatversion", "2"),
                ("format", "json"),
            ],
        )
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .user_agent(self.settings.user_agent.clone())
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }
}

#[async_trait::async_trait]
impl PageFetcher for ReqwestPageFetcher {
    async fn fetch(&self, page_name: &str) -> Result<FetchedPage, FetchError> {
        let url = self.revision_url(page_name)?;
        let client = self.build_client()?;

        gem_debug!("Fetching {}", url);
        let response = client
            .get(url)
            .header(FROM, self.settings.contact.as_str())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        if let Some(ct) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        gem_debug!("Fetched {} bytes", bytes.len());
        extract_latest_revision(&bytes)
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    query: ApiQuery,
}

#[derive(Debug, Deserialize)]
struct ApiQuery {
    #[serde(default)]
    pages: Vec<ApiPage>,
}

#[derive(Debug, Deserialize)]
struct ApiPage {
    title: Option<String>,
    #[serde(default)]
    revisions: Vec<ApiRevision>,
}

#[derive(Debug, Deserialize)]
struct ApiRevision {
    timestamp: String,
    slots: ApiSlots,
}

#[derive(Debug, Deserialize)]
struct ApiSlots {
    main: ApiSlot,
}

#[derive(Debug, Deserialize)]
struct ApiSlot {
    content: String,
}

/// Pulls `content` and `timestamp` of the first revision of the first page.
pub(crate) fn extract_latest_revision(body: &[u8]) -> Result<FetchedPage, FetchError> {
    let response: ApiResponse = serde_json::from_slice(body)
        .map_err(|err| FetchError::new(FailureKind::MalformedResponse, err.to_string()))?;

    let page = response
        .query
        .pages
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::new(FailureKind::MissingRevision, "no pages in response"))?;
    let title = page.title.unwrap_or_default();
    let revision = page.revisions.into_iter().next().ok_or_else(|| {
        FetchError::new(
            FailureKind::MissingRevision,
            format!("no revisions for page '{title}'"),
        )
    })?;

    Ok(FetchedPage {
        content: revision.slots.main.content,
        timestamp: revision.timestamp,
    })
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{extract_latest_revision, FetchSettings, ReqwestPageFetcher};
    use crate::FailureKind;

    #[test]
    fn revision_url_carries_query_parameters() {
        let fetcher = ReqwestPageFetcher::new(FetchSettings::default());
        let url = fetcher.revision_url("Gem_Store/data").unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("titles".into(), "Gem_Store/data".into())));
        assert!(pairs.contains(&("rvprop".into(), "timestamp|content".into())));
        assert!(pairs.contains(&("formatversion".into(), "2".into())));
        assert!(pairs.contains(&("format".into(), "json".into())));
    }

    #[test]
    fn invalid_api_url_is_reported() {
        let fetcher = ReqwestPageFetcher::new(FetchSettings {
            api_url: "not a url".to_string(),
            ..FetchSettings::default()
        });
        let err = fetcher.revision_url("Gem_Store/data").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }

    #[test]
    fn missing_page_has_no_revision() {
        let body = br#"{"query":{"pages":[{"ns":0,"title":"Nope","missing":true}]}}"#;
        let err = extract_latest_revision(body).unwrap_err();
        assert_eq!(err.kind, FailureKind::MissingRevision);
        assert!(err.message.contains("Nope"));
    }

    #[test]
    fn unexpected_shape_is_malformed() {
        let err = extract_latest_revision(br#"{"error":{"code":"badvalue"}}"#).unwrap_err();
        assert_eq!(err.kind, FailureKind::MalformedResponse);
    }
}
