use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::Salon;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid catalog: {0}")]
    Validation(String),
}

#[derive(Debug, Deserialize)]
pub struct SalonsFile {
    pub salons: Vec<Salon>,
}

/// Load and validate a salon catalog snapshot from a YAML file.
///
/// This is the stand-in for the external document store: callers fetch a
/// snapshot here and hand it to the search engine. Failures propagate
/// unchanged; there is no retry logic at this layer.
///
/// # Errors
///
/// Returns `CatalogError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_salons(path: &Path) -> Result<SalonsFile, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let salons_file: SalonsFile = serde_yaml::from_str(&content)?;

    validate_salons(&salons_file)?;

    Ok(salons_file)
}

fn validate_salons(salons_file: &SalonsFile) -> Result<(), CatalogError> {
    let mut seen_ids = HashSet::new();

    for salon in &salons_file.salons {
        if salon.name.trim().is_empty() {
            return Err(CatalogError::Validation(
                "salon name must be non-empty".to_string(),
            ));
        }

        if !seen_ids.insert(salon.id) {
            return Err(CatalogError::Validation(format!(
                "duplicate salon id: {} (salon '{}')",
                salon.id, salon.name
            )));
        }

        // NaN fails the range check as well, so no separate finiteness test.
        if !(0.0..=5.0).contains(&salon.rating.average) {
            return Err(CatalogError::Validation(format!(
                "salon '{}' has rating average {} outside [0, 5]",
                salon.name, salon.rating.average
            )));
        }

        if let Some(coord) = salon.location.coordinates {
            if !coord.is_valid() {
                return Err(CatalogError::Validation(format!(
                    "salon '{}' has out-of-range coordinates ({}, {})",
                    salon.name, coord.lat, coord.lng
                )));
            }
        }

        for service in &salon.services {
            if service.price < Decimal::ZERO {
                return Err(CatalogError::Validation(format!(
                    "salon '{}' service '{}' has negative price {}",
                    salon.name, service.name, service.price
                )));
            }
            if service.duration_minutes == 0 {
                return Err(CatalogError::Validation(format!(
                    "salon '{}' service '{}' has zero duration",
                    salon.name, service.name
                )));
            }
        }
    }

    Ok(())
}
