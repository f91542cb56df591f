use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Returns `true` when both components are finite and within the
    /// valid latitude/longitude ranges.
    ///
    /// Distance math itself never rejects inputs; callers that accept
    /// coordinates from the outside (catalog loader, HTTP surface) use
    /// this check at their boundary.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Where a salon sits within the city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub quarter: String,
    pub city: String,
    /// Absent for salons that have not been geocoded yet.
    pub coordinates: Option<Coordinate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub phone: String,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
}

/// A bookable service offered by a salon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    /// Price in West African CFA francs.
    pub price: Decimal,
    pub duration_minutes: u32,
    pub category: ServiceCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Braids,
    Cut,
    Care,
    Color,
    Beard,
    Other,
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceCategory::Braids => write!(f, "braids"),
            ServiceCategory::Cut => write!(f, "cut"),
            ServiceCategory::Care => write!(f, "care"),
            ServiceCategory::Color => write!(f, "color"),
            ServiceCategory::Beard => write!(f, "beard"),
            ServiceCategory::Other => write!(f, "other"),
        }
    }
}

/// Amenity flags shown to clients and folded into the search text.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub home_service: bool,
    pub mobile_payment: bool,
    pub wifi: bool,
    pub parking: bool,
    pub air_conditioning: bool,
    pub accessibility: bool,
}

impl Features {
    /// Human-readable tag for every enabled flag, in declaration order.
    ///
    /// These tags are a fixed vocabulary: search text built from them must be
    /// reproducible across rebuilds.
    #[must_use]
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.home_service {
            tags.push("home service");
        }
        if self.mobile_payment {
            tags.push("mobile payment");
        }
        if self.wifi {
            tags.push("wifi");
        }
        if self.parking {
            tags.push("parking");
        }
        if self.air_conditioning {
            tags.push("air conditioning");
        }
        if self.accessibility {
            tags.push("accessibility");
        }
        tags
    }
}

/// Aggregated review score, maintained by the review surface (out of scope
/// here); read-only as far as search is concerned.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rating {
    /// Mean score in [0, 5].
    pub average: f64,
    pub count: u32,
}

/// One salon listing as supplied by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Salon {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub location: Location,
    pub contact: Contact,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub features: Features,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Salon {
    /// Whether this salon may appear in any search or suggestion output.
    ///
    /// Inactive or unverified salons are invisible to clients regardless of
    /// what filters a query carries.
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        self.is_active && self.is_verified
    }

    /// Price of the cheapest service, if any services are listed.
    #[must_use]
    pub fn cheapest_price(&self) -> Option<Decimal> {
        self.services.iter().map(|s| s.price).min()
    }
}
