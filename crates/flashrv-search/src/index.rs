use flashrv_core::{Coordinate, Salon};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Denormalized, search-optimized projection of one catalog record.
///
/// All text fields are pre-lowercased so query-time matching is a plain
/// substring test.
#[derive(Debug, Clone)]
pub(crate) struct IndexEntry {
    pub id: Uuid,
    pub name_lower: String,
    pub quarter_lower: String,
    pub city_lower: String,
    pub service_names_lower: Vec<String>,
    pub cheapest_price: Option<Decimal>,
    pub home_service: bool,
    pub mobile_payment: bool,
    pub rating_average: f64,
    pub coordinate: Option<Coordinate>,
    pub search_text: String,
}

impl IndexEntry {
    fn from_salon(salon: &Salon) -> Self {
        Self {
            id: salon.id,
            name_lower: salon.name.to_lowercase(),
            quarter_lower: salon.location.quarter.to_lowercase(),
            city_lower: salon.location.city.to_lowercase(),
            service_names_lower: salon
                .services
                .iter()
                .map(|s| s.name.to_lowercase())
                .collect(),
            cheapest_price: salon.cheapest_price(),
            home_service: salon.features.home_service,
            mobile_payment: salon.features.mobile_payment,
            rating_average: salon.rating.average,
            coordinate: salon.location.coordinates,
            search_text: search_text(salon),
        }
    }
}

/// An immutable snapshot of the searchable catalog.
///
/// `records` holds the surviving (active + verified) salons in catalog
/// order; `entries[i]` is the projection of `records[i]`. A snapshot is
/// built wholesale and never mutated — replacing it is the engine's job.
#[derive(Debug, Default)]
pub(crate) struct SearchIndex {
    pub records: Vec<Salon>,
    pub entries: Vec<IndexEntry>,
}

impl SearchIndex {
    pub(crate) fn build(catalog: &[Salon]) -> Self {
        let records: Vec<Salon> = catalog
            .iter()
            .filter(|salon| salon.is_searchable())
            .cloned()
            .collect();
        let entries = records.iter().map(IndexEntry::from_salon).collect();
        Self { records, entries }
    }
}

/// Lowercase concatenation of every searchable field: name, quarter, city,
/// address, service names, and the fixed feature-tag vocabulary.
fn search_text(salon: &Salon) -> String {
    let mut parts: Vec<&str> = vec![
        &salon.name,
        &salon.location.quarter,
        &salon.location.city,
        &salon.location.address,
    ];
    parts.extend(salon.services.iter().map(|s| s.name.as_str()));
    parts.extend(salon.features.tags());
    parts.join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use flashrv_core::{Contact, Features, Location, Rating, Service, ServiceCategory};

    use super::*;

    fn make_salon(name: &str, active: bool, verified: bool) -> Salon {
        Salon {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            location: Location {
                address: "Rue 10, Plateau".to_string(),
                quarter: "Plateau".to_string(),
                city: "Dakar".to_string(),
                coordinates: Some(Coordinate {
                    lat: 14.6928,
                    lng: -17.4467,
                }),
            },
            contact: Contact {
                phone: "771234567".to_string(),
                whatsapp: None,
                email: None,
            },
            services: vec![Service {
                name: "Tresses simples".to_string(),
                price: Decimal::from(4000),
                duration_minutes: 120,
                category: ServiceCategory::Braids,
            }],
            features: Features {
                home_service: true,
                mobile_payment: true,
                ..Features::default()
            },
            rating: Rating {
                average: 4.8,
                count: 47,
            },
            is_verified: verified,
            is_active: active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn build_excludes_inactive_and_unverified() {
        let catalog = vec![
            make_salon("Salon Awa Beauty", true, true),
            make_salon("Fermé", false, true),
            make_salon("Pas encore vérifié", true, false),
        ];
        let index = SearchIndex::build(&catalog);
        assert_eq!(index.records.len(), 1);
        assert_eq!(index.records[0].name, "Salon Awa Beauty");
    }

    #[test]
    fn entries_parallel_records_by_id() {
        let catalog = vec![
            make_salon("Salon Awa Beauty", true, true),
            make_salon("Chez Ibra", true, true),
        ];
        let index = SearchIndex::build(&catalog);
        assert_eq!(index.entries.len(), index.records.len());
        for (entry, record) in index.entries.iter().zip(&index.records) {
            assert_eq!(entry.id, record.id);
        }
    }

    #[test]
    fn search_text_contains_all_searchable_fields() {
        let index = SearchIndex::build(&[make_salon("Salon Awa Beauty", true, true)]);
        let text = &index.entries[0].search_text;
        assert!(text.contains("salon awa beauty"));
        assert!(text.contains("plateau"));
        assert!(text.contains("dakar"));
        assert!(text.contains("rue 10"));
        assert!(text.contains("tresses simples"));
        assert!(text.contains("home service"));
        assert!(text.contains("mobile payment"));
        assert!(!text.contains("wifi"), "disabled flags stay out");
    }

    #[test]
    fn search_text_is_lowercase() {
        let index = SearchIndex::build(&[make_salon("SALON AWA", true, true)]);
        let text = &index.entries[0].search_text;
        assert_eq!(text, &text.to_lowercase());
    }

    #[test]
    fn rebuild_is_idempotent() {
        let catalog = vec![
            make_salon("Salon Awa Beauty", true, true),
            make_salon("Chez Ibra", true, true),
        ];
        let first = SearchIndex::build(&catalog);
        let second = SearchIndex::build(&catalog);
        let first_texts: Vec<&str> = first.entries.iter().map(|e| e.search_text.as_str()).collect();
        let second_texts: Vec<&str> = second
            .entries
            .iter()
            .map(|e| e.search_text.as_str())
            .collect();
        assert_eq!(first_texts, second_texts);
    }

    #[test]
    fn cheapest_price_tracks_catalog_services() {
        let mut salon = make_salon("Salon Awa Beauty", true, true);
        salon.services.push(Service {
            name: "Pose weave".to_string(),
            price: Decimal::from(15_000),
            duration_minutes: 120,
            category: ServiceCategory::Care,
        });
        let index = SearchIndex::build(&[salon]);
        assert_eq!(index.entries[0].cheapest_price, Some(Decimal::from(4000)));
    }
}
