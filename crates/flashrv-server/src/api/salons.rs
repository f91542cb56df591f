use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use flashrv_core::{Coordinate, Features, Salon, Service};
use flashrv_search::{SearchFilters, SearchHit};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Radius applied by the nearby surface when the caller names none.
const DEFAULT_NEARBY_RADIUS_KM: f64 = 5.0;

/// One salon as serialized to clients, with the location flattened and the
/// computed distance attached when a query supplied an origin.
#[derive(Debug, Serialize)]
pub(super) struct SalonItem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub quarter: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: String,
    pub whatsapp: Option<String>,
    pub services: Vec<Service>,
    pub features: Features,
    pub rating_average: f64,
    pub rating_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl SalonItem {
    pub(super) fn from_salon(salon: Salon, distance_km: Option<f64>) -> Self {
        Self {
            id: salon.id,
            name: salon.name,
            description: salon.description,
            address: salon.location.address,
            quarter: salon.location.quarter,
            city: salon.location.city,
            latitude: salon.location.coordinates.map(|c| c.lat),
            longitude: salon.location.coordinates.map(|c| c.lng),
            phone: salon.contact.phone,
            whatsapp: salon.contact.whatsapp,
            services: salon.services,
            features: salon.features,
            rating_average: salon.rating.average,
            rating_count: salon.rating.count,
            distance_km,
        }
    }

    fn from_hit(hit: SearchHit) -> Self {
        Self::from_salon(hit.salon, hit.distance_km)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchParams {
    q: Option<String>,
    quarter: Option<String>,
    city: Option<String>,
    service: Option<String>,
    home_service: Option<bool>,
    mobile_payment: Option<bool>,
    min_rating: Option<f64>,
    max_price: Option<Decimal>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    min_distance: Option<f64>,
    max_distance: Option<f64>,
}

pub(super) async fn search_salons(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<Vec<SalonItem>>>, ApiError> {
    let origin = resolve_origin(&req_id.0, params.latitude, params.longitude)?;

    let filters = SearchFilters {
        quarter: params.quarter,
        city: params.city,
        service: params.service,
        home_service: params.home_service,
        mobile_payment: params.mobile_payment,
        min_rating: params.min_rating,
        max_price: params.max_price,
        min_distance_km: params.min_distance,
        max_distance_km: params.max_distance,
        origin,
    };

    let hits = state
        .engine
        .search(params.q.as_deref().unwrap_or(""), &filters);
    let data = hits.into_iter().map(SalonItem::from_hit).collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyParams {
    latitude: Option<f64>,
    longitude: Option<f64>,
    max_distance: Option<f64>,
}

pub(super) async fn list_nearby_salons(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<ApiResponse<Vec<SalonItem>>>, ApiError> {
    let (Some(latitude), Some(longitude)) = (params.latitude, params.longitude) else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "GPS coordinates required (latitude, longitude)",
        ));
    };

    let origin = resolve_origin(&req_id.0, Some(latitude), Some(longitude))?;
    let filters = SearchFilters {
        origin,
        max_distance_km: Some(params.max_distance.unwrap_or(DEFAULT_NEARBY_RADIUS_KM)),
        ..SearchFilters::default()
    };

    let hits = state.engine.search("", &filters);
    let data = hits.into_iter().map(SalonItem::from_hit).collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct SuggestionParams {
    q: Option<String>,
}

pub(super) async fn list_suggestions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SuggestionParams>,
) -> Json<ApiResponse<Vec<String>>> {
    let data = state.engine.suggest(params.q.as_deref().unwrap_or(""));

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn get_salon(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(salon_id): Path<Uuid>,
) -> Result<Json<ApiResponse<SalonItem>>, ApiError> {
    let Some(salon) = state.engine.salon(salon_id) else {
        return Err(ApiError::new(req_id.0, "not_found", "salon not found"));
    };

    Ok(Json(ApiResponse {
        data: SalonItem::from_salon(salon, None),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Coordinates must arrive as a pair, and within valid ranges; the engine
/// itself never validates them.
fn resolve_origin(
    request_id: &str,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<Coordinate>, ApiError> {
    match (latitude, longitude) {
        (Some(lat), Some(lng)) => {
            let coord = Coordinate { lat, lng };
            if coord.is_valid() {
                Ok(Some(coord))
            } else {
                Err(ApiError::new(
                    request_id,
                    "validation_error",
                    "latitude/longitude out of range",
                ))
            }
        }
        (None, None) => Ok(None),
        _ => Err(ApiError::new(
            request_id,
            "validation_error",
            "latitude and longitude must be supplied together",
        )),
    }
}
