use flashrv_core::Coordinate;
use rust_decimal::Decimal;

use crate::index::IndexEntry;

/// Structured constraints applied alongside the free-text query.
///
/// Omitted fields impose no constraint; every supplied field must match
/// (AND semantics). Text-ish fields match as case-insensitive substrings.
/// Distance bounds only take effect when `origin` is also supplied; without
/// it they are ignored (the engine logs the fact and answers the query as
/// if no bound had been given).
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub quarter: Option<String>,
    pub city: Option<String>,
    /// Matched against any one service name.
    pub service: Option<String>,
    /// `Some(true)` requires the flag; `Some(false)` and `None` are no-ops.
    pub home_service: Option<bool>,
    pub mobile_payment: Option<bool>,
    pub min_rating: Option<f64>,
    /// At least one service must cost this much or less.
    pub max_price: Option<Decimal>,
    pub min_distance_km: Option<f64>,
    pub max_distance_km: Option<f64>,
    /// Reference point for distance bounds and result annotation.
    pub origin: Option<Coordinate>,
}

impl SearchFilters {
    pub(crate) fn has_distance_bound(&self) -> bool {
        self.min_distance_km.is_some() || self.max_distance_km.is_some()
    }

    /// Non-geo constraints; the engine handles distance bounds separately so
    /// the computed distance can be reused for annotation and ordering.
    pub(crate) fn matches(&self, entry: &IndexEntry) -> bool {
        if let Some(quarter) = &self.quarter {
            if !entry.quarter_lower.contains(&quarter.to_lowercase()) {
                return false;
            }
        }

        if let Some(city) = &self.city {
            if !entry.city_lower.contains(&city.to_lowercase()) {
                return false;
            }
        }

        if let Some(service) = &self.service {
            let needle = service.to_lowercase();
            if !entry
                .service_names_lower
                .iter()
                .any(|name| name.contains(&needle))
            {
                return false;
            }
        }

        if self.home_service == Some(true) && !entry.home_service {
            return false;
        }

        if self.mobile_payment == Some(true) && !entry.mobile_payment {
            return false;
        }

        if let Some(min_rating) = self.min_rating {
            if entry.rating_average < min_rating {
                return false;
            }
        }

        if let Some(max_price) = self.max_price {
            // No service has a negative price, so a negative bound simply
            // matches nothing.
            if !entry.cheapest_price.is_some_and(|price| price <= max_price) {
                return false;
            }
        }

        true
    }
}
