use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Catalog snapshot file; the search index is rebuilt from it at startup
    /// and on the refresh schedule.
    pub catalog_path: PathBuf,
    /// Cron expression for the index refresh job.
    pub index_refresh_cron: String,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
}
