//! VirusTotal client (§6): narrow async boundary onto the hash-lookup
//! endpoint. Per §9's resolution of the "API key absent" open question,
//! a missing key is advisory — callers get an `unknown()` report rather
//! than an error.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct VirusTotalReport {
    pub known: bool,
    pub positives: u32,
    pub total: u32,
    pub permalink: Option<String>,
}

impl VirusTotalReport {
    pub fn unknown() -> Self {
        Self::default()
    }
}

#[derive(Debug, Error)]
pub enum VirusTotalError {
    #[error("virustotal request failed: {0}")]
    Request(String),
}

#[async_trait]
pub trait VirusTotalClient: Send + Sync {
    async fn lookup_hash(&self, sha1_hex: &str) -> Result<VirusTotalReport, VirusTotalError>;
}

#[derive(Deserialize)]
struct VtResponse {
    response_code: i32,
    #[serde(default)]
    positives: u32,
    #[serde(default)]
    total: u32,
    #[serde(default)]
    permalink: Option<String>,
}

pub struct HttpVirusTotalClient {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl HttpVirusTotalClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl VirusTotalClient for HttpVirusTotalClient {
    async fn lookup_hash(&self, sha1_hex: &str) -> Result<VirusTotalReport, VirusTotalError> {
        let Some(api_key) = &self.api_key else {
            return Ok(VirusTotalReport::unknown());
        };

        let response = self
            .client
            .get("https://www.virustotal.com/vtapi/v2/file/report")
            .query(&[("apikey", api_key.as_str()), ("resource", sha1_hex)])
            .send()
            .await
            .map_err(|e| VirusTotalError::Request(e.to_string()))?;

        let parsed: VtResponse = response.json().await.map_err(|e| VirusTotalError::Request(e.to_string()))?;

        if parsed.response_code == 0 {
            return Ok(VirusTotalReport::unknown());
        }

        Ok(VirusTotalReport {
            known: true,
            positives: parsed.positives,
            total: parsed.total,
            permalink: parsed.permalink,
        })
    }
}
