use serde::{Deserialize, Serialize};

use super::{CaClient, FetchError, HEALTH_PATH, ROOTS_PATH};

pub const STATUS_ONLINE: &str = "Online";
pub const FINGERPRINT_PLACEHOLDER: &str = "See step-ca logs";
pub const VALIDITY_TEXT: &str = "~10 years from init";
pub const VALIDITY_FALLBACK: &str = "~10 years";

const FINGERPRINT_CHARS: usize = 32;

/// CA summary card contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CaInfo {
    /// Always `Online`; the health probe does not change what is displayed.
    pub status: &'static str,
    /// Result of the `/api/health` probe, kept for logs and JSON output.
    pub health_ok: bool,
    /// `None` when the roots endpoint answered without any root certificate.
    pub fingerprint: Option<String>,
    pub valid_until: &'static str,
}

impl Default for CaInfo {
    fn default() -> Self {
        Self {
            status: STATUS_ONLINE,
            health_ok: false,
            fingerprint: Some(FINGERPRINT_PLACEHOLDER.to_string()),
            valid_until: VALIDITY_TEXT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RootsResponse {
    #[serde(default)]
    crts: Option<Vec<String>>,
}

/// First characters of the root PEM, standing in for a real fingerprint.
pub fn pseudo_fingerprint(pem: &str) -> String {
    let head: String = pem.chars().take(FINGERPRINT_CHARS).collect();
    format!("{head}...")
}

impl CaClient {
    pub async fn probe_health(&self) -> bool {
        match self.get_text(HEALTH_PATH).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "health probe failed");
                false
            }
        }
    }

    pub async fn load_ca_info(&self) -> CaInfo {
        let health_ok = self.probe_health().await;
        let mut info = CaInfo {
            health_ok,
            ..CaInfo::default()
        };

        match self.get_text(ROOTS_PATH).await {
            Ok(body) => match serde_json::from_str::<RootsResponse>(&body) {
                Ok(roots) => {
                    info.fingerprint = roots
                        .crts
                        .as_deref()
                        .and_then(<[String]>::first)
                        .map(|pem| pseudo_fingerprint(pem));
                }
                Err(e) => {
                    let e = FetchError::Decode {
                        url: self.base_url().to_string() + ROOTS_PATH,
                        source: e,
                    };
                    tracing::info!(error = %e, "CA info fetch failed");
                    info.valid_until = VALIDITY_FALLBACK;
                }
            },
            Err(e) => {
                tracing::info!(error = %e, "root certificate fetch failed");
            }
        }

        info
    }
}
