//! RBL client (§6): a narrow async boundary onto DNS-based blacklists, kept
//! as an injectable trait per Design Notes §9 rather than a process-wide
//! resolver singleton. The default impl queries a fixed set of public
//! DNSBL zones with `hickory-resolver`, same reversed-octet construction
//! KumoCorp's `dns-resolver` crate uses for PTR-style lookups.

use std::collections::HashMap;
use std::net::IpAddr;

use async_trait::async_trait;
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use thiserror::Error;

#[derive(Debug, Clone, Default)]
pub struct BlacklistEntry {
    pub listed: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Error)]
pub enum RblError {
    #[error("dns resolution failed: {0}")]
    Resolve(String),
}

#[async_trait]
pub trait RblClient: Send + Sync {
    /// Query every configured blacklist zone for `ip`, keyed by zone name.
    async fn lookup(&self, ip: IpAddr) -> Result<HashMap<String, BlacklistEntry>, RblError>;
}

const ZONES: [&str; 3] = ["zen.spamhaus.org", "bl.spamcop.net", "b.barracudacentral.org"];

pub struct DnsBlocklistClient {
    resolver: TokioAsyncResolver,
}

impl DnsBlocklistClient {
    pub fn new() -> Result<Self, RblError> {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().map_err(|e| RblError::Resolve(e.to_string()))?;
        Ok(Self { resolver })
    }

    fn reversed_query(ip: IpAddr, zone: &str) -> Option<String> {
        match ip {
            IpAddr::V4(v4) => {
                let o = v4.octets();
                Some(format!("{}.{}.{}.{}.{}", o[3], o[2], o[1], o[0], zone))
            }
            IpAddr::V6(_) => None,
        }
    }
}

#[async_trait]
impl RblClient for DnsBlocklistClient {
    async fn lookup(&self, ip: IpAddr) -> Result<HashMap<String, BlacklistEntry>, RblError> {
        let mut results = HashMap::new();
        for zone in ZONES {
            let Some(query) = Self::reversed_query(ip, zone) else {
                continue;
            };
            let entry = match self.resolver.ipv4_lookup(query.as_str()).await {
                Ok(answers) => {
                    let codes: Vec<String> = answers.iter().map(|a| a.to_string()).collect();
                    BlacklistEntry {
                        listed: true,
                        reason: Some(codes.join(",")),
                    }
                }
                Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => BlacklistEntry::default(),
                Err(e) => return Err(RblError::Resolve(e.to_string())),
            };
            results.insert(zone.to_string(), entry);
        }
        Ok(results)
    }
}
