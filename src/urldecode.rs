//! Registered-domain resolution, injected as a trait (Design Notes §9: keep
//! this a swappable service, never a process-wide singleton) rather than
//! reaching for a single global decoder instance the way the source did.

pub trait UrlDecoder: Send + Sync {
    /// Resolve the registered (eTLD+1) domain of a URL or bare hostname.
    /// Returns `None` on any parse failure rather than raising.
    fn registered_domain(&self, url_or_host: &str) -> Option<String>;
}

/// Default decoder: `url` for parsing, `psl` for the public-suffix lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct PslUrlDecoder;

impl UrlDecoder for PslUrlDecoder {
    fn registered_domain(&self, url_or_host: &str) -> Option<String> {
        let host = match url::Url::parse(url_or_host) {
            Ok(parsed) => parsed.host_str()?.to_string(),
            Err(_) => url_or_host.to_string(),
        };
        psl::domain_str(&host).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_domain_from_full_url() {
        let decoder = PslUrlDecoder;
        assert_eq!(
            decoder.registered_domain("https://evil.attacker.example/path?x=1"),
            Some("attacker.example".to_string())
        );
    }

    #[test]
    fn resolves_domain_from_bare_host() {
        let decoder = PslUrlDecoder;
        assert_eq!(decoder.registered_domain("mail.google.com"), Some("google.com".to_string()));
    }
}
