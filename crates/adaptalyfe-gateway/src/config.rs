//! Gateway configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rand::RngCore;
use tracing::warn;

/// Environment variable holding the session-signing secret.
pub const SESSION_SECRET_ENV: &str = "ADAPTALYFE_SESSION_SECRET";

/// Default session lifetime in seconds (24 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

/// AdaptaLyfe gateway command line arguments.
#[derive(Debug, Parser)]
#[command(name = "adaptalyfe-gateway")]
#[command(about = "HTTP/JSON gateway for the AdaptaLyfe backend")]
pub struct Args {
    /// Address to listen on for HTTP requests.
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Path to the data directory (database and local object storage).
    #[arg(short, long, default_value = "./data")]
    pub data_path: PathBuf,

    /// Directory for locally stored objects. Defaults to `<data-path>/objects`.
    #[arg(long)]
    pub objects_path: Option<PathBuf>,

    /// Private object directory as a `/bucket/prefix` path.
    #[arg(long, default_value = "/adaptalyfe/private")]
    pub private_object_dir: String,

    /// Public object search paths as `/bucket/prefix`, in search order.
    #[arg(long, value_delimiter = ',', default_value = "/adaptalyfe/public")]
    pub public_object_paths: Vec<String>,

    /// URL of the object-storage signing sidecar. When unset, unsigned
    /// demo URLs are issued.
    #[arg(long)]
    pub sidecar_url: Option<String>,

    /// Session-signing secret. Prefer the ADAPTALYFE_SESSION_SECRET
    /// environment variable over this flag.
    #[arg(long)]
    pub session_secret: Option<String>,

    /// Session lifetime in seconds.
    #[arg(long, default_value_t = DEFAULT_SESSION_TTL_SECS)]
    pub session_ttl_secs: u64,

    /// URL of the assistant completion endpoint. When unset, the chat
    /// route always answers with the canned fallback.
    #[arg(long)]
    pub chat_endpoint: Option<String>,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address to listen on for HTTP requests.
    pub listen_addr: String,
    /// Path to the data directory.
    pub data_path: PathBuf,
    /// Directory for locally stored objects, when overridden.
    pub objects_path: Option<PathBuf>,
    /// Private object directory.
    pub private_object_dir: String,
    /// Public object search paths, in search order.
    pub public_object_paths: Vec<String>,
    /// URL of the signing sidecar.
    pub sidecar_url: Option<String>,
    /// Session-signing secret.
    pub session_secret: String,
    /// Session lifetime.
    pub session_ttl: Duration,
    /// URL of the assistant completion endpoint.
    pub chat_endpoint: Option<String>,
}

impl GatewayConfig {
    /// Resolved directory for locally stored objects.
    pub fn objects_root(&self) -> PathBuf {
        self.objects_path
            .clone()
            .unwrap_or_else(|| self.data_path.join("objects"))
    }
}

impl From<&Args> for GatewayConfig {
    fn from(args: &Args) -> Self {
        let session_secret = args
            .session_secret
            .clone()
            .or_else(|| std::env::var(SESSION_SECRET_ENV).ok())
            .unwrap_or_else(|| {
                warn!(
                    "{} not set, using an ephemeral secret; sessions will not survive restarts",
                    SESSION_SECRET_ENV
                );
                random_secret()
            });

        Self {
            listen_addr: args.listen.clone(),
            data_path: args.data_path.clone(),
            objects_path: args.objects_path.clone(),
            private_object_dir: args.private_object_dir.clone(),
            public_object_paths: args.public_object_paths.clone(),
            sidecar_url: args.sidecar_url.clone(),
            session_secret,
            session_ttl: Duration::from_secs(args.session_ttl_secs),
            chat_endpoint: args.chat_endpoint.clone(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            data_path: PathBuf::from("./data"),
            objects_path: None,
            private_object_dir: "/adaptalyfe/private".to_string(),
            public_object_paths: vec!["/adaptalyfe/public".to_string()],
            sidecar_url: None,
            session_secret: random_secret(),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            chat_endpoint: None,
        }
    }
}

fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
