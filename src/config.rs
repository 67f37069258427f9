//! Process-wide constants: VirusTotal key, URL allow-list, danger-extension
//! set, unpack depth, and timeouts. Loaded once by the embedding service and
//! handed to `pipeline::EmailPipeline::new` — this crate has no config-file
//! parser of its own (out of scope, §1).

use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// VirusTotal API key. Absence is advisory: lookups short-circuit to
    /// "unknown" instead of failing (§9 Open Questions).
    pub virustotal_key: Option<String>,
    /// Domains never treated as suspicious by the URL extractor (§4.4).
    pub allow_domains: HashSet<String>,
    /// Lowercase filename extensions (without the leading dot) treated as
    /// dangerous by the payload processor (§4.7 step 1).
    pub danger_extensions: HashSet<String>,
    /// Maximum archive-unpack recursion depth (§4.6). Recommended 3-8.
    pub max_unpack_depth: u32,
    /// Wall-clock budget for a single format inspector (§5).
    pub inspector_timeout: Duration,
    /// Wall-clock budget for a single RBL or VirusTotal call (§5).
    pub network_timeout: Duration,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            virustotal_key: None,
            allow_domains: default_allow_domains(),
            danger_extensions: default_danger_extensions(),
            max_unpack_depth: 5,
            inspector_timeout: Duration::from_secs(30),
            network_timeout: Duration::from_secs(10),
        }
    }
}

fn default_allow_domains() -> HashSet<String> {
    [
        "w3.org",
        "akamai.net",
        "norton.com",
        "facebook.com",
        "orange.fr",
        "rt",
        "microsoft.com",
        "amazon.com",
        "amazon.de",
        "images-amazon.com",
        "adobe.com",
        "purl.org",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_danger_extensions() -> HashSet<String> {
    [
        "exe", "com", "scr", "cpl", "docm", "jar", "pif", "msi", "hta", "msc", "bat", "cmd",
        "vbs", "vbe", "vb", "wsf", "ws", "jse", "js", "wsc", "wsh", "ps1", "ps1xml", "ps2",
        "pdf", "ps2xml", "psc1", "psc2", "msh", "msh1", "msh2", "mshxml", "msh1xml", "msh2xml",
        "scf", "lnk", "inf", "reg", "doc", "xls", "ppt", "dll", "dotm", "xlsm", "xltm", "xlam",
        "pptm", "potm", "ppam", "ppsm", "sldm", "application", "gadget",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
