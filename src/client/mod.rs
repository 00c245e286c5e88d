pub mod ca_info;

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::model::{self, mock, Certificate, PayloadError};

pub use ca_info::CaInfo;

pub const HEALTH_PATH: &str = "api/health";
pub const ROOTS_PATH: &str = "api/roots";
pub const CERTIFICATES_PATH: &str = "api/admin/certificates";

/// Why a fetch fell back. Never shown to the user, only logged.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid endpoint path {path}: {source}")]
    Endpoint {
        path: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unusable certificate list from {url}: {source}")]
    Payload {
        url: String,
        #[source]
        source: PayloadError,
    },
}

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
    pub accept_invalid_certs: bool,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` when no explicit proxy is set.
    pub system_proxy: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 10,
            proxy: None,
            accept_invalid_certs: false,
            system_proxy: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },
}

/// Thin wrapper over the three CA endpoints the dashboard reads.
#[derive(Clone, Debug)]
pub struct CaClient {
    http: reqwest::Client,
    base: Url,
}

impl CaClient {
    pub fn new(options: &ClientOptions) -> Result<Self, ClientError> {
        let base = parse_base_url(&options.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("tinyca-dashboard/", env!("CARGO_PKG_VERSION"))),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(options.timeout_seconds.max(1)))
            .danger_accept_invalid_certs(options.accept_invalid_certs);

        if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| ClientError::ProxySetup {
                proxy: proxy.to_string(),
                source: e,
            })?;
            builder = builder.proxy(proxy);
        } else if !options.system_proxy {
            builder = builder.no_proxy();
        }

        let http = builder
            .build()
            .map_err(|e| ClientError::HttpClientBuild { source: e })?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn endpoint(&self, path: &'static str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|e| FetchError::Endpoint { path, source: e })
    }

    /// GETs `path` and returns the body of a 2xx response.
    pub async fn get_text(&self, path: &'static str) -> Result<String, FetchError> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            source: e,
        })
    }

    pub async fn fetch_certificates(&self) -> Result<Vec<Certificate>, FetchError> {
        let body = self.get_text(CERTIFICATES_PATH).await?;
        model::parse_certificates_payload(&body).map_err(|e| FetchError::Payload {
            url: self.base.to_string() + CERTIFICATES_PATH,
            source: e,
        })
    }

    /// Issued certificates, or the demo set when the admin API can't be read.
    pub async fn load_certificates(&self, now: DateTime<Utc>) -> Vec<Certificate> {
        match self.fetch_certificates().await {
            Ok(certs) => {
                tracing::debug!(count = certs.len(), "loaded certificates from admin API");
                certs
            }
            Err(e) => {
                tracing::info!(error = %e, "certificate fetch failed, using sample certificates");
                mock::default_certificates(now)
            }
        }
    }
}

/// Parses the base URL and makes sure it ends in `/` so endpoint paths are
/// joined below any prefix the CA is mounted under.
pub fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).map_err(|e| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        source: e,
    })
}
