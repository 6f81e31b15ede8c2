use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use crate::core::{is_open, NearbySearch};
use crate::models::{
    CatalogRefreshResponse, ClockReading, ErrorResponse, GeoPoint, HealthResponse, NearbyShop,
    NearbyShopsQuery, NearbyShopsResponse, ShopDetail, ShopLocation, ShopRecord, ShopSummary,
    TimingResponse,
};
use crate::services::{CatalogCache, RepositoryError, ShopRepository};

/// Wall clock used for open/closed status
#[derive(Debug, Clone, Copy, Default)]
pub struct ShopClock {
    offset: Option<FixedOffset>,
}

impl ShopClock {
    /// `None` means the server's local time zone
    pub fn new(offset: Option<FixedOffset>) -> Self {
        Self { offset }
    }

    pub fn now(&self) -> ClockReading {
        self.reading_at(Utc::now())
    }

    /// Wall-clock reading of `instant` in the configured zone
    pub fn reading_at(&self, instant: DateTime<Utc>) -> ClockReading {
        match self.offset {
            Some(offset) => ClockReading::from_datetime(&instant.with_timezone(&offset)),
            None => ClockReading::from_datetime(&instant.with_timezone(&chrono::Local)),
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<ShopRepository>,
    pub catalog: Arc<CatalogCache>,
    pub search: NearbySearch,
    pub clock: ShopClock,
}

/// Configure all shop-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/shops", web::get().to(list_shops))
        .route("/shops/refresh", web::post().to(refresh_catalog))
        .route("/shops/nearby", web::get().to(nearby_shops))
        .route("/shops/{shop_id}", web::get().to(get_shop));
}

/// Join proximity results back to their catalog records
pub fn build_nearby_response(
    search: &NearbySearch,
    center: GeoPoint,
    requested_radius_km: Option<f64>,
    catalog: &[ShopRecord],
    now: ClockReading,
) -> NearbyShopsResponse {
    let result = search.search(center, requested_radius_km, catalog, now);

    let by_id: HashMap<i64, &ShopRecord> = catalog.iter().map(|r| (r.shop_id, r)).collect();
    let shops = result
        .shops
        .iter()
        .filter_map(|found| by_id.get(&found.shop_id).map(|record| NearbyShop::new(record, found)))
        .collect();

    NearbyShopsResponse {
        shops,
        radius_km: result.radius_km,
        total_candidates: result.total_candidates,
    }
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

fn internal_error(error: &str, message: String) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 500,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.repository.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Nearby shops endpoint
///
/// GET /api/shops/nearby?lat={lat}&lng={lng}&radius={km}
///
/// `latitude`/`longitude` are accepted as aliases. Radius defaults to the
/// configured value and is capped at the configured maximum.
async fn nearby_shops(
    state: web::Data<AppState>,
    query: web::Query<NearbyShopsQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for nearby request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let center = match query.center() {
        Ok(center) => center,
        Err(e) => return bad_request("Invalid coordinates", e.to_string()),
    };

    if !query.has_finite_radius() {
        return bad_request("Invalid radius", "radius must be a finite number".to_string());
    }

    let catalog = match state
        .catalog
        .get_or_load(|| state.repository.fetch_shops())
        .await
    {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Failed to load shop catalog: {}", e);
            return internal_error("Failed to load shops", e.to_string());
        }
    };

    let now = state.clock.now();
    let response = build_nearby_response(&state.search, center, query.radius, &catalog, now);

    tracing::info!(
        "Returning {} nearby shops within {} km (from {} candidates)",
        response.shops.len(),
        response.radius_km,
        response.total_candidates
    );

    HttpResponse::Ok().json(response)
}

/// List all shops
///
/// GET /api/shops
async fn list_shops(state: web::Data<AppState>) -> impl Responder {
    match state
        .catalog
        .get_or_load(|| state.repository.fetch_shops())
        .await
    {
        Ok(catalog) => {
            let shops: Vec<ShopSummary> = catalog.iter().map(ShopSummary::from).collect();
            HttpResponse::Ok().json(shops)
        }
        Err(e) => {
            tracing::error!("Failed to load shop catalog: {}", e);
            internal_error("Failed to load shops", e.to_string())
        }
    }
}

/// Drop the cached catalog and reload it from the database
///
/// POST /api/shops/refresh
async fn refresh_catalog(state: web::Data<AppState>) -> impl Responder {
    state.catalog.invalidate().await;

    match state
        .catalog
        .get_or_load(|| state.repository.fetch_shops())
        .await
    {
        Ok(catalog) => {
            tracing::info!("Catalog refreshed with {} shops", catalog.len());
            HttpResponse::Ok().json(CatalogRefreshResponse {
                shop_count: catalog.len(),
                ttl_secs: state.catalog.ttl_secs(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to reload shop catalog: {}", e);
            internal_error("Failed to load shops", e.to_string())
        }
    }
}

/// Shop detail with opening hours
///
/// GET /api/shops/{shop_id}
async fn get_shop(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let shop_id = path.into_inner();

    let record = match state.repository.fetch_shop(shop_id).await {
        Ok(record) => record,
        Err(RepositoryError::NotFound(message)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Shop not found".to_string(),
                message,
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch shop {}: {}", shop_id, e);
            return internal_error("Failed to fetch shop", e.to_string());
        }
    };

    HttpResponse::Ok().json(shop_detail(&record, state.clock.now()))
}

fn shop_detail(record: &ShopRecord, now: ClockReading) -> ShopDetail {
    let location = ShopLocation::from_record(record);

    ShopDetail {
        shop_id: record.shop_id,
        shop_name: record.shop_name.clone(),
        shop_image: record.shop_image.clone(),
        created_at: record.created_at,
        address: record.address.clone(),
        timings: record.timings.iter().map(TimingResponse::from).collect(),
        is_open: is_open(&location.schedule, now),
    }
}
