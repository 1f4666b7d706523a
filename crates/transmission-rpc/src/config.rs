//! Connection settings for a [`Connector`](crate::Connector).

use std::{env, fmt};

use url::Url;

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "localhost";
/// Port the Transmission daemon listens on by default.
pub const DEFAULT_PORT: u16 = 9091;
/// Path of the RPC endpoint on the daemon.
pub const DEFAULT_BASE_PATH: &str = "/transmission/rpc";

/// HTTP basic authentication credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The user name.
    pub username: String,
    /// The password.
    pub password: String,
}

impl Credentials {
    /// Creates a new set of credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the password.
        write!(f, "Credentials(username=\"{}\", password=<set>)", self.username)
    }
}

/// Configuration for a [`Connector`](crate::Connector).
///
/// Every field has a default matching a stock Transmission daemon on the local machine, so
/// callers usually override a handful of fields with struct update syntax:
///
/// ```rust,ignore
/// use transmission_rpc::ConnectorConfig;
///
/// let config = ConnectorConfig {
///     host: "seedbox.lan".into(),
///     use_tls: true,
///     ..Default::default()
/// };
/// assert_eq!(config.port, 9091);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    /// The daemon host name or address.
    pub host: String,
    /// The daemon port.
    pub port: u16,
    /// Whether to talk to the daemon over `https`.
    pub use_tls: bool,
    /// Path of the RPC endpoint.
    pub base_path: String,
    /// Basic authentication credentials, if the daemon requires them.
    pub credentials: Option<Credentials>,
    /// The session token to start with. Usually left empty and acquired from the daemon.
    pub session_id: String,
    /// Accept self-signed or otherwise invalid TLS certificates.
    pub accept_invalid_certs: bool,
    /// Upper bound on consecutive session renewals within one call. `None` retries for as
    /// long as the daemon keeps asking for a new session.
    pub max_session_retries: Option<u32>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            use_tls: false,
            base_path: DEFAULT_BASE_PATH.to_string(),
            credentials: None,
            session_id: String::new(),
            accept_invalid_certs: true,
            max_session_retries: None,
        }
    }
}

impl ConnectorConfig {
    /// Reads the configuration from `TRANSMISSION_*` environment variables.
    ///
    /// Unset or unparsable variables fall back to the defaults. Credentials are only set when
    /// `TRANSMISSION_USERNAME` is present; a missing password is treated as empty.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let credentials = env::var("TRANSMISSION_USERNAME").ok().map(|username| {
            Credentials::new(
                username,
                env::var("TRANSMISSION_PASSWORD").unwrap_or_default(),
            )
        });

        Self {
            host: env::var("TRANSMISSION_HOST").unwrap_or(defaults.host),
            port: env::var("TRANSMISSION_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            use_tls: env::var("TRANSMISSION_SSL")
                .ok()
                .map(|s| parse_flag(&s))
                .unwrap_or(defaults.use_tls),
            base_path: env::var("TRANSMISSION_PATH").unwrap_or(defaults.base_path),
            credentials,
            session_id: env::var("TRANSMISSION_SESSION_ID").unwrap_or(defaults.session_id),
            ..defaults
        }
    }

    /// The URL scheme implied by [`use_tls`](Self::use_tls).
    pub fn scheme(&self) -> &'static str {
        if self.use_tls { "https" } else { "http" }
    }

    /// Builds the full endpoint URL, `scheme://host:port/base_path`.
    pub fn url(&self) -> Result<Url, url::ParseError> {
        let base = Url::parse(&format!("{}://{}:{}", self.scheme(), self.host, self.port))?;
        base.join(&self.base_path)
    }
}

impl fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConnectorConfig(url=\"{}://{}:{}{}\", credentials={:?}, session_id=\"{}\", accept_invalid_certs={}, max_session_retries={:?})",
            self.scheme(),
            self.host,
            self.port,
            self.base_path,
            self.credentials,
            self.session_id,
            self.accept_invalid_certs,
            self.max_session_retries,
        )
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "t" | "yes" | "y" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_daemon() {
        let config = ConnectorConfig::default();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 9091);
        assert!(!config.use_tls);
        assert_eq!(config.base_path, "/transmission/rpc");
        assert_eq!(config.credentials, None);
        assert_eq!(config.session_id, "");
        assert!(config.accept_invalid_certs);
        assert_eq!(config.max_session_retries, None);
    }

    #[test]
    fn url_uses_scheme_host_port_and_path() {
        let config = ConnectorConfig {
            host: "some.host".into(),
            port: 8888,
            use_tls: true,
            base_path: "/path".into(),
            ..Default::default()
        };

        assert_eq!(config.url().unwrap().as_str(), "https://some.host:8888/path");
        assert_eq!(
            ConnectorConfig::default().url().unwrap().as_str(),
            "http://localhost:9091/transmission/rpc"
        );
    }

    #[test]
    fn url_rejects_invalid_host() {
        let config = ConnectorConfig {
            host: "bad host".into(),
            ..Default::default()
        };

        assert!(config.url().is_err());
    }

    #[test]
    fn debug_hides_password() {
        let config = ConnectorConfig {
            credentials: Some(Credentials::new("admin", "hunter2")),
            ..Default::default()
        };

        let printed = format!("{config:?}");
        assert!(printed.contains("admin"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn parse_flag_accepts_common_truthy_values() {
        for value in ["1", "true", "TRUE", "t", " yes ", "Y", "on"] {
            assert!(parse_flag(value), "{value} should be truthy");
        }
        for value in ["0", "false", "", "nope"] {
            assert!(!parse_flag(value), "{value} should be falsy");
        }
    }
}
