mod app_config;
mod catalog;
mod config;
mod salon;

pub use app_config::{AppConfig, Environment};
pub use catalog::{load_salons, CatalogError, SalonsFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use salon::{
    Contact, Coordinate, Features, Location, Rating, Salon, Service, ServiceCategory,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
