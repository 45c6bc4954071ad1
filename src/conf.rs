//! Configuration of the connection to the variant database server.

use serde::{Deserialize, Serialize};
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use crate::{common::GenomeRelease, err::ConnectError};

/// Default host of the variant database server.
pub const DEFAULT_HOST: &str = "localhost";
/// Default gRPC port of the variant database server.
pub const DEFAULT_PORT: u16 = 50051;

/// Server connection settings, read from TOML.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(default)]
pub struct ServerConf {
    /// Host name of the server.
    pub host: String,
    /// gRPC port of the server.
    pub port: u16,
    /// Whether to use TLS instead of plaintext.
    pub tls: bool,
    /// Genome release tag sent with every query.
    pub genome_release: GenomeRelease,
}

impl Default for ServerConf {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            tls: false,
            genome_release: GenomeRelease::default(),
        }
    }
}

/// Overrides given on the command line.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConnArgs {
    /// Path to TOML file with server configuration.
    #[arg(long)]
    pub path_config: Option<String>,
    /// Override the server host.
    #[arg(long)]
    pub host: Option<String>,
    /// Override the server port.
    #[arg(long)]
    pub port: Option<u16>,
    /// Use TLS for the connection.
    #[arg(long)]
    pub tls: Option<bool>,
    /// Override the genome release.
    #[arg(long, value_enum)]
    pub genome_release: Option<GenomeRelease>,
}

impl ServerConf {
    /// Load configuration from `path`, falling back to the defaults if the
    /// file cannot be read or parsed.
    pub fn load_or_default(path: &str) -> Self {
        let toml_str = match std::fs::read_to_string(path) {
            Ok(toml_str) => toml_str,
            Err(e) => {
                tracing::warn!("could not read config {}: {}; using defaults", path, e);
                return Self::default();
            }
        };
        match toml::from_str(&toml_str) {
            Ok(conf) => conf,
            Err(e) => {
                tracing::warn!("could not parse config {}: {}; using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Resolve the effective configuration from the command line.
    pub fn from_args(args: &ConnArgs) -> Self {
        let mut conf = match &args.path_config {
            Some(path) => Self::load_or_default(path),
            None => Self::default(),
        };
        if let Some(host) = &args.host {
            conf.host.clone_from(host);
        }
        if let Some(port) = args.port {
            conf.port = port;
        }
        if let Some(tls) = args.tls {
            conf.tls = tls;
        }
        if let Some(genome_release) = args.genome_release {
            conf.genome_release = genome_release;
        }
        conf
    }

    /// The URI of the server endpoint.
    pub fn uri(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    /// Construct the channel to the server.
    ///
    /// No connection is made until the first RPC; the returned channel is
    /// meant to be created once and shared for the process lifetime.  Must be
    /// called from within a tokio runtime.
    pub fn channel(&self) -> Result<Channel, ConnectError> {
        let uri = self.uri();
        let mut endpoint =
            Endpoint::from_shared(uri.clone()).map_err(|source| ConnectError::Endpoint {
                uri: uri.clone(),
                source,
            })?;
        if self.tls {
            endpoint = endpoint
                .tls_config(ClientTlsConfig::new().domain_name(self.host.clone()))
                .map_err(ConnectError::Tls)?;
        }
        tracing::debug!("using endpoint {}", &uri);
        Ok(endpoint.connect_lazy())
    }
}
