use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Development-only session secret. Startup warns when it is in use.
pub const PLACEHOLDER_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Parser)]
#[command(name = "pillbox", version, about = "Owner-scoped prescription records over HTTP")]
pub struct Config {
    /// Seconds in-flight requests get to finish after a shutdown signal
    #[arg(long = "graceful-timeout", env = "PILLBOX_GRACEFUL_TIMEOUT", default_value_t = 15)]
    pub graceful_timeout_secs: u64,

    #[arg(long, env = "PILLBOX_LISTEN", default_value = "0.0.0.0:8081")]
    pub listen: SocketAddr,

    /// SQLite file holding the prescriptions and users collections
    #[arg(long, env = "PILLBOX_DB_PATH", default_value = "prescriptions.db")]
    pub db_path: PathBuf,

    /// Key used to sign session cookies
    #[arg(
        long,
        env = "PILLBOX_SESSION_SECRET",
        default_value = PLACEHOLDER_SECRET,
        hide_env_values = true
    )]
    pub session_secret: String,
}

impl Config {
    pub fn graceful_timeout(&self) -> Duration {
        Duration::from_secs(self.graceful_timeout_secs)
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.session_secret.is_empty() || self.session_secret == PLACEHOLDER_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "pillbox",
            "--graceful-timeout",
            "3",
            "--listen",
            "127.0.0.1:9000",
            "--db-path",
            "/tmp/rx.db",
            "--session-secret",
            "s3cr3t",
        ])
        .unwrap();

        assert_eq!(config.graceful_timeout(), Duration::from_secs(3));
        assert_eq!(config.listen, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.db_path, PathBuf::from("/tmp/rx.db"));
        assert!(!config.uses_placeholder_secret());
    }

    #[test]
    fn rejects_bad_timeout() {
        assert!(Config::try_parse_from(["pillbox", "--graceful-timeout", "soon"]).is_err());
    }
}
