// ABOUTME: Decomposes database URIs into scheme, host, port and database name
// ABOUTME: Malformed or missing URIs yield no endpoint instead of an error

use url::{Host, Url};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseEndpoint {
    pub scheme: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// URI path with its leading `/` removed.
    pub database_name: String,
}

impl DatabaseEndpoint {
    /// Returns `None` for absent, empty or unparseable URIs.
    ///
    /// Credentials, query and fragment are dropped. Domain hosts are
    /// lowercased and IPv6 hosts lose their brackets. Port and path are taken
    /// as written, so default ports survive and the path is not percent-encoded.
    pub fn parse(uri: Option<&str>) -> Option<Self> {
        let uri = uri.map(str::trim).filter(|u| !u.is_empty())?;
        let url = Url::parse(uri).ok()?;

        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => Some(domain.to_lowercase()),
            Some(Host::Ipv4(addr)) => Some(addr.to_string()),
            Some(Host::Ipv6(addr)) => Some(addr.to_string()),
            _ => None,
        };
        let raw = raw_authority_and_path(uri);
        let port = url
            .port()
            .or_else(|| raw.and_then(|(authority, _)| raw_port(authority)));
        let path = raw.map_or(url.path(), |(_, path)| path);
        let database_name = path.strip_prefix('/').unwrap_or(path).to_string();

        Some(Self {
            scheme: url.scheme().to_string(),
            host,
            port,
            database_name,
        })
    }

    pub fn has_scheme(&self) -> bool {
        !self.scheme.is_empty()
    }

    pub fn has_host(&self) -> bool {
        self.host.as_deref().is_some_and(|h| !h.is_empty())
    }

    pub fn is_valid(&self) -> bool {
        self.has_scheme() && self.has_host()
    }

    /// `host:port`, with a missing port rendered as the literal `None`.
    ///
    /// The copy service has always received this form for port-less URIs.
    pub fn host_port(&self) -> String {
        let host = self.host.as_deref().unwrap_or_default();
        match self.port {
            Some(port) => format!("{}:{}", host, port),
            None => format!("{}:None", host),
        }
    }
}

/// Authority and path as they appear in `scheme://authority/path?query#fragment`.
fn raw_authority_and_path(uri: &str) -> Option<(&str, &str)> {
    let (_, rest) = uri.split_once("://")?;
    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    Some(match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    })
}

fn raw_port(authority: &str) -> Option<u16> {
    let host_port = authority.rsplit('@').next()?;
    let (_, port) = host_port.rsplit_once(':')?;
    // `[::1]` has colons but no port
    if port.contains(']') {
        return None;
    }
    port.parse().ok()
}
