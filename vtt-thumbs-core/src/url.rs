//! Resolution of relative cue-file and sprite-image references

/// Location of the page hosting the player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentLocation {
    /// Scheme including the trailing colon, e.g. `https:`
    pub protocol: String,
    pub hostname: String,
    pub port: Option<u16>,
    /// Path of the page, e.g. `/videos/watch.html`
    pub pathname: String,
}

impl DocumentLocation {
    /// Creates a location without an explicit port
    pub fn new(protocol: &str, hostname: &str, pathname: &str) -> Self {
        Self {
            protocol: protocol.to_string(),
            hostname: hostname.to_string(),
            port: None,
            pathname: pathname.to_string(),
        }
    }

    /// Splits an absolute `scheme://host[:port]/path` URL into its parts.
    ///
    /// Returns `None` when the text has no `://` separator.
    pub fn parse(url: &str) -> Option<Self> {
        let (scheme, rest) = url.split_once("://")?;
        let (authority, path) = match rest.find('/') {
            Some(idx) => rest.split_at(idx),
            None => (rest, "/"),
        };
        let (hostname, port) = match authority.rsplit_once(':') {
            Some((host, port)) => match port.parse() {
                Ok(port) => (host, Some(port)),
                Err(_) => (authority, None),
            },
            None => (authority, None),
        };

        Some(Self {
            protocol: format!("{}:", scheme),
            hostname: hostname.to_string(),
            port,
            pathname: path.to_string(),
        })
    }

    /// Page URL with the filename component stripped.
    ///
    /// An empty location (no protocol, host or path) yields an empty base.
    pub fn base_url(&self) -> String {
        if self.protocol.is_empty() && self.hostname.is_empty() && self.pathname.is_empty() {
            return String::new();
        }

        let port = self.port.map(|p| format!(":{}", p)).unwrap_or_default();
        let full = format!("{}//{}{}{}", self.protocol, self.hostname, port, self.pathname);
        directory_of(&full).to_string()
    }
}

/// Returns everything up to and including the last `/`, or `""` if there is none
pub fn directory_of(url: &str) -> &str {
    match url.rfind('/') {
        Some(idx) => &url[..=idx],
        None => "",
    }
}

/// Resolves `path` against `base`.
///
/// A path containing `//` is already qualified. A scheme-relative base
/// (`//host/...`) or an absolute base (`scheme://...`) is joined to the
/// slash-trimmed path with a single `/`. Any other base is unusable and the
/// path is returned as is.
pub fn resolve(path: &str, base: &str) -> String {
    if path.contains("//") {
        return path.to_string();
    }

    match base.find("//") {
        Some(0) => join(base.trim_end_matches('/'), path),
        Some(_) => join(base.trim_matches('/'), path),
        None => path.to_string(),
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base, path.trim_matches('/'))
}
