//! Header Examiner (§4.2): picks the originating external IP from the
//! `Received` chain, runs an RBL lookup against it, and pulls `From`/`To`
//! plus the registered origin domain.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::mime::Email;
use crate::rbl::RblClient;
use crate::urldecode::UrlDecoder;

#[derive(Debug, Clone, Default, Serialize)]
pub struct HeaderReport {
    pub origin_ip: Option<Ipv4Addr>,
    pub rbl_listed: bool,
    pub rbl_comment: Option<String>,
    pub mail_from: Option<String>,
    pub mail_to: Option<String>,
    pub origin_domain: Option<String>,
    pub indicators: u32,
}

fn bracketed_ipv4_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})\]").unwrap())
}

fn extract_bracketed_ipv4(received_header: &str) -> Option<Ipv4Addr> {
    let caps = bracketed_ipv4_re().captures(received_header)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Ranges excluded from consideration as an "origin" IP (§3): 10/8, 127/8,
/// 172.16/12, 192.168/16.
fn is_public_ipv4(ip: Ipv4Addr) -> bool {
    let o = ip.octets();
    if o[0] == 10 || o[0] == 127 {
        return false;
    }
    if o[0] == 172 && (16..=31).contains(&o[1]) {
        return false;
    }
    if o[0] == 192 && o[1] == 168 {
        return false;
    }
    true
}

/// Pull the hostname out of a `From` header's address, tolerating the
/// common `Display Name <user@host>` and bare `user@host` shapes. Any
/// parse failure yields `None` rather than an error (§4.2 step 5/6).
fn extract_address_host(from: &str) -> Option<&str> {
    let addr_part = from.rsplit('<').next().unwrap_or(from);
    let addr_part = addr_part.trim_end_matches('>').trim();
    let (_, host) = addr_part.rsplit_once('@')?;
    let host = host.trim();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

pub async fn examine_headers(
    email: &Email,
    rbl: &dyn RblClient,
    decoder: &dyn UrlDecoder,
    network_timeout: Duration,
) -> HeaderReport {
    let mut report = HeaderReport::default();

    let received: Vec<&str> = email.headers.getall("Received");
    for header in received.iter().rev() {
        let Some(ip) = extract_bracketed_ipv4(header) else {
            continue;
        };
        if is_public_ipv4(ip) {
            report.origin_ip = Some(ip);
            break;
        }
    }

    if let Some(ip) = report.origin_ip {
        match tokio::time::timeout(network_timeout, rbl.lookup(IpAddr::V4(ip))).await {
            Ok(Ok(entries)) => {
                if entries.values().any(|entry| entry.listed) {
                    report.rbl_listed = true;
                    report.rbl_comment = Some("is on SMTP blacklists".to_string());
                    report.indicators += 2;
                    tracing::info!(%ip, "header-examiner: found a hit on blacklist");
                } else {
                    tracing::info!(%ip, "header-examiner: IP not on blacklists");
                }
            }
            Ok(Err(e)) => tracing::debug!(%ip, error = %e, "header-examiner: rbl lookup failed"),
            Err(_) => tracing::debug!(%ip, "header-examiner: rbl lookup timed out"),
        }
    }

    report.mail_from = email.headers.get("From").map(str::to_string);
    if let Some(from) = &report.mail_from {
        if let Some(host) = extract_address_host(from) {
            report.origin_domain = decoder.registered_domain(host);
        }
    }
    report.mail_to = email.headers.get("To").map(str::to_string);

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_public_ip_from_oldest_received() {
        assert_eq!(extract_bracketed_ipv4("from a ([127.0.0.1])"), Some(Ipv4Addr::new(127, 0, 0, 1)));
        assert_eq!(extract_bracketed_ipv4("from b ([8.8.8.8])"), Some(Ipv4Addr::new(8, 8, 8, 8)));
        assert_eq!(extract_bracketed_ipv4("no ip here"), None);
    }

    #[test]
    fn rejects_private_ranges() {
        assert!(!is_public_ipv4(Ipv4Addr::new(10, 0, 0, 1)));
        assert!(!is_public_ipv4(Ipv4Addr::new(127, 0, 0, 1)));
        assert!(!is_public_ipv4(Ipv4Addr::new(172, 16, 0, 1)));
        assert!(!is_public_ipv4(Ipv4Addr::new(172, 31, 255, 255)));
        assert!(!is_public_ipv4(Ipv4Addr::new(172, 32, 0, 1)));
        assert!(!is_public_ipv4(Ipv4Addr::new(192, 168, 1, 1)));
        assert!(is_public_ipv4(Ipv4Addr::new(8, 8, 8, 8)));
    }

    #[test]
    fn extracts_host_from_address_shapes() {
        assert_eq!(extract_address_host("evil@attacker.example"), Some("attacker.example"));
        assert_eq!(extract_address_host("Evil Corp <evil@attacker.example>"), Some("attacker.example"));
        assert_eq!(extract_address_host("not an address"), None);
    }
}
