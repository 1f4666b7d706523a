use clap::{Args, Parser, builder::BoolishValueParser};
use serde_json::Value;
use transmission_rpc::{
    ConnectorConfig, Credentials, DEFAULT_BASE_PATH, DEFAULT_HOST, DEFAULT_PORT, RpcRequest,
};

/// Top-level CLI struct for the binary.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// The RPC method to invoke, e.g. `session-get`.
    pub method: String,

    /// Method arguments, as a JSON object.
    #[arg(short, long, default_value = "{}", value_parser = parse_arguments)]
    pub arguments: Value,

    /// Tag echoed back by the daemon.
    #[arg(long)]
    pub tag: Option<u64>,

    /// Connection options
    #[command(flatten)]
    pub connection: ConnectionOptions,
}

impl Cli {
    /// The request described by the command line.
    pub(crate) fn request(&self) -> RpcRequest {
        let request = RpcRequest::new(self.method.clone(), self.arguments.clone());
        match self.tag {
            Some(tag) => request.with_tag(tag),
            None => request,
        }
    }
}

/// CLI representation of the connector configuration.
#[derive(Debug, Clone, Args)]
pub(crate) struct ConnectionOptions {
    /// The daemon host.
    #[arg(long, env = "TRANSMISSION_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// The daemon port.
    #[arg(long, env = "TRANSMISSION_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Connect over https. The environment variable takes `1`, `yes`, `on` and the like.
    #[arg(
        long,
        env = "TRANSMISSION_SSL",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    pub ssl: bool,

    /// Path of the RPC endpoint.
    #[arg(long, env = "TRANSMISSION_PATH", default_value = DEFAULT_BASE_PATH)]
    pub path: String,

    /// User name for basic authentication.
    #[arg(long, env = "TRANSMISSION_USERNAME")]
    pub username: Option<String>,

    /// Password for basic authentication. Only valid together with a user name.
    #[arg(
        long,
        env = "TRANSMISSION_PASSWORD",
        hide_env_values = true,
        requires = "username"
    )]
    pub password: Option<String>,

    /// Session id to start with.
    #[arg(long, env = "TRANSMISSION_SESSION_ID", default_value = "")]
    pub session_id: String,

    /// Reject self-signed or otherwise invalid TLS certificates.
    #[arg(long, default_value_t = false)]
    pub verify_certs: bool,

    /// Give up after this many consecutive session renewals.
    #[arg(long)]
    pub max_session_retries: Option<u32>,
}

impl From<ConnectionOptions> for ConnectorConfig {
    fn from(cli: ConnectionOptions) -> Self {
        let credentials = cli
            .username
            .map(|username| Credentials::new(username, cli.password.unwrap_or_default()));

        Self {
            host: cli.host,
            port: cli.port,
            use_tls: cli.ssl,
            base_path: cli.path,
            credentials,
            session_id: cli.session_id,
            accept_invalid_certs: !cli.verify_certs,
            max_session_retries: cli.max_session_retries,
        }
    }
}

fn parse_arguments(raw: &str) -> Result<Value, String> {
    match serde_json::from_str(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err("arguments must be a JSON object".to_string()),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}
