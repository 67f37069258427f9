//! URL Extractor (§4.4): regex-find every `http(s)://` run in a byte
//! stream, strip NULs, dedupe, and drop anything that's an image link, on
//! the origin domain, or on the fixed allow-list. What's left is
//! "suspicious" and each one is worth one indicator.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::urldecode::UrlDecoder;

const IMAGE_SUFFIXES: [&str; 4] = [".png", ".jpg", ".svg", ".gif"];

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"https?://[^\s><\])"]+"#).unwrap())
}

pub struct UrlExtractionResult {
    pub urls: Vec<String>,
    pub indicators: u32,
}

pub fn extract(
    bytes: &[u8],
    origin_domain: Option<&str>,
    allow_domains: &HashSet<String>,
    decoder: &dyn UrlDecoder,
) -> UrlExtractionResult {
    let text = String::from_utf8_lossy(bytes);

    let mut candidates = HashSet::new();
    for m in url_re().find_iter(&text) {
        let cleaned: String = m.as_str().chars().filter(|&c| c != '\0').collect();
        candidates.insert(cleaned);
    }

    let mut retained = Vec::new();
    for url in candidates {
        if IMAGE_SUFFIXES.iter().any(|suffix| url.ends_with(suffix)) {
            continue;
        }
        let domain = decoder.registered_domain(&url);
        if let Some(domain) = &domain {
            if Some(domain.as_str()) == origin_domain {
                continue;
            }
            if allow_domains.contains(domain) {
                continue;
            }
        }
        retained.push(url);
    }

    UrlExtractionResult {
        indicators: retained.len() as u32,
        urls: retained,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::urldecode::PslUrlDecoder;

    #[test]
    fn retains_unrelated_domains_and_drops_images_and_origin() {
        let decoder = PslUrlDecoder;
        let allow_domains = crate::config::TriageConfig::default().allow_domains;
        let body = b"click http://evil.example/x or see http://evil.example/logo.png or http://origin.example/y";
        let result = extract(body, Some("origin.example"), &allow_domains, &decoder);
        assert_eq!(result.urls, vec!["http://evil.example/x".to_string()]);
        assert_eq!(result.indicators, 1);
    }

    #[test]
    fn idempotent_on_repeated_runs() {
        let decoder = PslUrlDecoder;
        let allow_domains = crate::config::TriageConfig::default().allow_domains;
        let body = b"http://evil.example/x http://evil.example/x";
        let first = extract(body, None, &allow_domains, &decoder);
        let second = extract(body, None, &allow_domains, &decoder);
        assert_eq!(first.urls, second.urls);
    }

    #[test]
    fn drops_allow_listed_domains() {
        let decoder = PslUrlDecoder;
        let allow_domains = crate::config::TriageConfig::default().allow_domains;
        let body = b"visit http://www.microsoft.com/update";
        let result = extract(body, None, &allow_domains, &decoder);
        assert!(result.urls.is_empty());
    }

    #[test]
    fn respects_custom_allow_list() {
        let decoder = PslUrlDecoder;
        let mut allow_domains = HashSet::new();
        allow_domains.insert("trusted.example".to_string());
        let body = b"visit http://trusted.example/x";
        let result = extract(body, None, &allow_domains, &decoder);
        assert!(result.urls.is_empty());
    }
}
