//! Host-header normalization for domain resolution.

use url::Url;

/// A normalized request host, kept both with and without its port.
///
/// Domain records may be configured either way, so resolution matches
/// against both forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostParts {
    /// Lowercased host, port preserved if present (e.g. `s.example.com:8080`).
    pub hostport: String,
    /// Lowercased host with any port stripped (e.g. `s.example.com`).
    pub host: String,
}

impl HostParts {
    pub fn is_empty(&self) -> bool {
        self.hostport.is_empty()
    }

    /// True when `other` matches either form of this host.
    pub fn matches(&self, other: &HostParts) -> bool {
        !self.is_empty() && (self.hostport == other.hostport || self.host == other.host)
    }
}

/// Normalizes a raw `Host` header value: trim, case-fold, split off the port.
///
/// IPv6 literals (`[::1]:8080`) keep their brackets in the portless form.
pub fn normalize_host(raw: &str) -> HostParts {
    let hostport = raw.trim().to_ascii_lowercase();
    if hostport.is_empty() {
        return HostParts {
            hostport,
            host: String::new(),
        };
    }

    let host = if hostport.starts_with('[') {
        match hostport.find(']') {
            Some(end) => hostport[..=end].to_string(),
            None => hostport.clone(),
        }
    } else {
        hostport
            .split(':')
            .next()
            .unwrap_or(&hostport)
            .to_string()
    };

    HostParts { hostport, host }
}

/// Extracts the normalized host of a base URL such as `https://s.example.com`.
///
/// Falls back to treating the whole string as a host when it does not parse
/// as a URL.
pub fn base_url_host(base_url: &str) -> HostParts {
    match Url::parse(base_url) {
        Ok(u) => match u.host_str() {
            Some(host) => {
                let hostport = match u.port() {
                    Some(port) => format!("{host}:{port}"),
                    None => host.to_string(),
                };
                normalize_host(&hostport)
            }
            None => normalize_host(base_url),
        },
        Err(_) => normalize_host(base_url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_host() {
        let parts = normalize_host("Example.COM");
        assert_eq!(parts.hostport, "example.com");
        assert_eq!(parts.host, "example.com");
    }

    #[test]
    fn test_normalize_host_with_port() {
        let parts = normalize_host("s.example.com:8080");
        assert_eq!(parts.hostport, "s.example.com:8080");
        assert_eq!(parts.host, "s.example.com");
    }

    #[test]
    fn test_normalize_ipv6_host() {
        let parts = normalize_host("[::1]:3000");
        assert_eq!(parts.hostport, "[::1]:3000");
        assert_eq!(parts.host, "[::1]");
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize_host("  ").is_empty());
    }

    #[test]
    fn test_base_url_host_from_url() {
        let parts = base_url_host("https://s.example.com");
        assert_eq!(parts.host, "s.example.com");

        let parts = base_url_host("http://s.example.com:3000/");
        assert_eq!(parts.hostport, "s.example.com:3000");
        assert_eq!(parts.host, "s.example.com");
    }

    #[test]
    fn test_base_url_host_from_bare_host() {
        let parts = base_url_host("s.example.com");
        assert_eq!(parts.host, "s.example.com");
    }

    #[test]
    fn test_matches_ignores_port_difference() {
        let base = base_url_host("https://s.example.com");
        let req = normalize_host("s.example.com:8080");
        assert!(req.matches(&base));
    }
}
