//! In-memory stand-in for the places listing API.
//!
//! Implements the eight `POST` endpoints closely enough for client
//! integration tests: envelopes are checked for a GUID `TrackingId` and a
//! complete identity, businesses are stored by `StoreId`, and per-item
//! problems are reported inside `200 OK` bodies the way the real service
//! does. Wire types are declared here independently of the client crate so
//! the tests catch schema drift.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const MAX_BATCH: usize = 1000;
pub const MAX_PAGE_SIZE: u32 = 1000;
pub const MIN_CHAIN_LOCATIONS: u32 = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Identity {
    pub puid: String,
    pub auth_provider: String,
    pub email_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusinessesRequest {
    pub tracking_id: String,
    pub identity: Identity,
    pub businesses: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchCriteria {
    pub criteria_type: String,
    #[serde(default)]
    pub store_ids: Option<Vec<String>>,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchRequest {
    pub tracking_id: String,
    pub identity: Identity,
    pub page_number: u32,
    pub page_size: u32,
    pub search_criteria: SearchCriteria,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorePageRequest {
    pub tracking_id: String,
    pub identity: Identity,
    pub page_number: u32,
    pub page_size: u32,
    pub criteria_type: String,
    #[serde(default)]
    pub store_ids: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoreIdsRequest {
    pub tracking_id: String,
    pub identity: Identity,
    pub store_ids: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChainInfo {
    pub chain_name: String,
    pub locations: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChainRequest {
    pub tracking_id: String,
    pub identity: Identity,
    pub chain_info: ChainInfo,
}

#[derive(Debug, Default)]
pub struct Store {
    /// Listings keyed by `StoreId`, kept as raw JSON.
    pub businesses: BTreeMap<String, Value>,
    pub chains: BTreeMap<String, ChainInfo>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_state(Db::default())
}

/// Router over caller-owned state, so tests can seed or inspect it.
pub fn app_with_state(db: Db) -> Router {
    Router::new()
        .route("/CreateBusinesses", post(create_businesses))
        .route("/UpdateBusinesses", post(update_businesses))
        .route("/GetBusinesses", post(get_businesses))
        .route("/GetBusinessStatusInfo", post(get_business_status_info))
        .route("/GetAnalytics", post(get_analytics))
        .route("/DeleteBusinesses", post(delete_businesses))
        .route("/CreateBulkChain", post(create_bulk_chain))
        .route("/UpdateBulkChainInfo", post(update_bulk_chain_info))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// A request refused before any processing, with a JSON error body.
pub struct Rejection {
    status: StatusCode,
    body: Value,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn reject(status: StatusCode, code: i64, message: &str) -> Rejection {
    Rejection {
        status,
        body: json!({
            "TrackingId": null,
            "OperationStatus": false,
            "ErrorMessage": message,
            "ErrorCode": code,
            "Errors": {},
        }),
    }
}

fn check_envelope(tracking_id: &str, identity: &Identity) -> Result<(), Rejection> {
    if Uuid::parse_str(tracking_id).is_err() {
        tracing::debug!(tracking_id, "rejecting request with malformed TrackingId");
        return Err(reject(StatusCode::BAD_REQUEST, 1, "TrackingId must be a GUID."));
    }
    let blank = [&identity.puid, &identity.auth_provider, &identity.email_id]
        .iter()
        .any(|v| v.trim().is_empty());
    if blank {
        tracing::debug!(tracking_id, "rejecting request with incomplete identity");
        return Err(reject(
            StatusCode::UNAUTHORIZED,
            2,
            "Identity is not authorized to access this API.",
        ));
    }
    Ok(())
}

/// Common response fields plus the operation payload.
fn respond(tracking_id: &str, status: bool, message: &str, code: i64, payload: Map<String, Value>) -> Json<Value> {
    let mut body = payload;
    body.insert("TrackingId".into(), json!(tracking_id));
    body.insert("OperationStatus".into(), json!(status));
    body.insert("ErrorMessage".into(), json!(message));
    body.insert("ErrorCode".into(), json!(code));
    body.entry("Errors").or_insert_with(|| json!({}));
    Json(Value::Object(body))
}

fn payload(key: &str, value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    map
}

fn paging_error(page_number: u32, page_size: u32) -> Option<&'static str> {
    if page_number < 1 {
        Some("PageNumber must be greater than or equal to 1.")
    } else if page_size < 1 || page_size > MAX_PAGE_SIZE {
        Some("PageSize must be between 1 and 1000.")
    } else {
        None
    }
}

fn page<T>(items: Vec<T>, page_number: u32, page_size: u32) -> Vec<T> {
    let skip = (page_number.saturating_sub(1) as usize).saturating_mul(page_size as usize);
    items.into_iter().skip(skip).take(page_size as usize).collect()
}

fn store_id(listing: &Value) -> Option<&str> {
    listing
        .get("StoreId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

fn missing_store_id(index: usize) -> Value {
    json!({
        "StoreId": null,
        "BusinessErrors": [{"ColumnName": "StoreId", "ErrorMessage": format!("StoreId is required (business {index}).")}],
    })
}

fn batch_rejection(tracking_id: &str, key: &str) -> Json<Value> {
    respond(
        tracking_id,
        false,
        "Total number of businesses should be greater than or equal to 1 and less than or equal to 1000",
        4,
        payload(key, json!({})),
    )
}

async fn create_businesses(
    State(db): State<Db>,
    Json(req): Json<BusinessesRequest>,
) -> Result<Json<Value>, Rejection> {
    check_envelope(&req.tracking_id, &req.identity)?;
    if req.businesses.is_empty() || req.businesses.len() > MAX_BATCH {
        return Ok(batch_rejection(&req.tracking_id, "CreatedBusinesses"));
    }

    let mut store = db.write().await;
    let mut created = Map::new();
    let mut errors = Map::new();
    for (index, listing) in req.businesses.into_iter().enumerate() {
        let key = index.to_string();
        let Some(id) = store_id(&listing).map(str::to_string) else {
            errors.insert(key, missing_store_id(index));
            continue;
        };
        let entry = if store.businesses.contains_key(&id) {
            json!({
                "StoreId": id,
                "Operation": "BUSINESS_ADD",
                "Status": "FAILED",
                "ErrorMessage": format!("Create business failed since store ID {id} already exists in your account."),
            })
        } else {
            store.businesses.insert(id.clone(), listing);
            json!({"StoreId": id, "Operation": "BUSINESS_ADD", "Status": "SUCCESSFUL", "ErrorMessage": ""})
        };
        created.insert(key, entry);
    }

    let mut body = payload("CreatedBusinesses", Value::Object(created));
    body.insert("Errors".into(), Value::Object(errors));
    Ok(respond(&req.tracking_id, true, "", 0, body))
}

async fn update_businesses(
    State(db): State<Db>,
    Json(req): Json<BusinessesRequest>,
) -> Result<Json<Value>, Rejection> {
    check_envelope(&req.tracking_id, &req.identity)?;
    if req.businesses.is_empty() || req.businesses.len() > MAX_BATCH {
        return Ok(batch_rejection(&req.tracking_id, "UpdatedBusinesses"));
    }

    let mut store = db.write().await;
    let mut updated = Map::new();
    let mut errors = Map::new();
    for (index, listing) in req.businesses.into_iter().enumerate() {
        let key = index.to_string();
        let Some(id) = store_id(&listing).map(str::to_string) else {
            errors.insert(key, missing_store_id(index));
            continue;
        };
        let entry = match store.businesses.get_mut(&id) {
            Some(existing) => {
                *existing = listing;
                json!({"StoreId": id, "Operation": "BUSINESS_UPDATE", "Status": "SUCCESSFUL", "ErrorMessage": ""})
            }
            None => json!({
                "StoreId": id,
                "Operation": "BUSINESS_UPDATE",
                "Status": "FAILED",
                "ErrorMessage": format!("Update business failed since store ID {id} does not exist in your account."),
            }),
        };
        updated.insert(key, entry);
    }

    let mut body = payload("UpdatedBusinesses", Value::Object(updated));
    body.insert("Errors".into(), Value::Object(errors));
    Ok(respond(&req.tracking_id, true, "", 0, body))
}

fn matches_query(listing: &Value, criteria: &SearchCriteria) -> bool {
    let field = |name: &str| listing.get(name).and_then(Value::as_str).unwrap_or_default();
    let name_ok = criteria.business_name.as_deref().map_or(true, |wanted| {
        field("BusinessName")
            .to_lowercase()
            .contains(&wanted.to_lowercase())
    });
    let city_ok = criteria
        .city
        .as_deref()
        .map_or(true, |wanted| field("City").eq_ignore_ascii_case(wanted));
    name_ok && city_ok
}

/// Stored listings selected by criteria type, in `StoreId` order.
fn select<'a>(store: &'a Store, criteria_type: &str, store_ids: Option<&[String]>) -> Vec<&'a Value> {
    match criteria_type {
        "SearchByStoreIds" => store_ids
            .unwrap_or_default()
            .iter()
            .filter_map(|id| store.businesses.get(id))
            .collect(),
        _ => store.businesses.values().collect(),
    }
}

async fn get_businesses(
    State(db): State<Db>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<Value>, Rejection> {
    check_envelope(&req.tracking_id, &req.identity)?;
    if let Some(message) = paging_error(req.page_number, req.page_size) {
        return Ok(respond(&req.tracking_id, false, message, 3, payload("Businesses", json!([]))));
    }

    let store = db.read().await;
    let criteria = &req.search_criteria;
    let selected: Vec<Value> = match criteria.criteria_type.as_str() {
        "SearchByQuery" => store
            .businesses
            .values()
            .filter(|listing| matches_query(listing, criteria))
            .cloned()
            .collect(),
        other => select(&store, other, criteria.store_ids.as_deref())
            .into_iter()
            .cloned()
            .collect(),
    };
    let businesses = page(selected, req.page_number, req.page_size);
    Ok(respond(&req.tracking_id, true, "", 0, payload("Businesses", json!(businesses))))
}

async fn get_business_status_info(
    State(db): State<Db>,
    Json(req): Json<StorePageRequest>,
) -> Result<Json<Value>, Rejection> {
    check_envelope(&req.tracking_id, &req.identity)?;
    if let Some(message) = paging_error(req.page_number, req.page_size) {
        return Ok(respond(&req.tracking_id, false, message, 3, payload("BusinessesStatusInfo", json!([]))));
    }

    let store = db.read().await;
    let infos: Vec<Value> = select(&store, &req.criteria_type, req.store_ids.as_deref())
        .into_iter()
        .filter_map(store_id)
        .map(|id| {
            json!({
                "StoreId": id,
                "BusinessStatus": "QualityCheckInProgress",
                "YPId": null,
                "YPIdAssignDate": "0001-01-01T00:00:00",
                "PublishDate": "0001-01-01T00:00:00",
                "LastUpdateDate": "0001-01-01T00:00:00",
                "HasPendingPublish": false,
                "PublishLink": null,
                "QualityIssues": [],
            })
        })
        .collect();
    let infos = page(infos, req.page_number, req.page_size);
    Ok(respond(&req.tracking_id, true, "", 0, payload("BusinessesStatusInfo", json!(infos))))
}

async fn get_analytics(
    State(db): State<Db>,
    Json(req): Json<StorePageRequest>,
) -> Result<Json<Value>, Rejection> {
    check_envelope(&req.tracking_id, &req.identity)?;
    if let Some(message) = paging_error(req.page_number, req.page_size) {
        return Ok(respond(&req.tracking_id, false, message, 3, payload("BusinessesAnalytics", json!([]))));
    }

    let store = db.read().await;
    let analytics: Vec<Value> = select(&store, &req.criteria_type, req.store_ids.as_deref())
        .into_iter()
        .filter_map(store_id)
        .map(|id| json!({"StoreId": id, "Statistics": [{"ImpressionCount": 0, "ClickCount": 0}]}))
        .collect();
    let analytics = page(analytics, req.page_number, req.page_size);
    Ok(respond(&req.tracking_id, true, "", 0, payload("BusinessesAnalytics", json!(analytics))))
}

async fn delete_businesses(
    State(db): State<Db>,
    Json(req): Json<StoreIdsRequest>,
) -> Result<Json<Value>, Rejection> {
    check_envelope(&req.tracking_id, &req.identity)?;
    if req.store_ids.is_empty() {
        return Ok(respond(
            &req.tracking_id,
            false,
            "StoreIds should contain at least one store id",
            4,
            payload("DeletedBusinesses", json!([])),
        ));
    }

    let mut store = db.write().await;
    let deleted: Vec<Value> = req
        .store_ids
        .iter()
        .map(|id| match store.businesses.remove(id) {
            Some(_) => json!({"StoreId": id, "Status": "SUCCESSFUL", "ErrorMessage": ""}),
            None => json!({
                "StoreId": id,
                "Status": "FAILED",
                "ErrorMessage": format!("Store ID {id} not found in your account."),
            }),
        })
        .collect();
    Ok(respond(&req.tracking_id, true, "", 0, payload("DeletedBusinesses", json!(deleted))))
}

async fn create_bulk_chain(
    State(db): State<Db>,
    Json(req): Json<ChainRequest>,
) -> Result<Json<Value>, Rejection> {
    check_envelope(&req.tracking_id, &req.identity)?;
    let operation = payload("Operation", json!("CHAIN_ADD"));
    let info = req.chain_info;
    if info.locations < MIN_CHAIN_LOCATIONS {
        let message = format!("A chain must have at least {MIN_CHAIN_LOCATIONS} locations.");
        return Ok(respond(&req.tracking_id, false, &message, 4, operation));
    }

    let mut store = db.write().await;
    if store.chains.contains_key(&info.chain_name) {
        let message = format!("Chain {} already exists.", info.chain_name);
        return Ok(respond(&req.tracking_id, false, &message, 5, operation));
    }
    tracing::info!(chain = %info.chain_name, locations = info.locations, "chain created");
    store.chains.insert(info.chain_name.clone(), info);
    Ok(respond(&req.tracking_id, true, "", 0, operation))
}

async fn update_bulk_chain_info(
    State(db): State<Db>,
    Json(req): Json<ChainRequest>,
) -> Result<Json<Value>, Rejection> {
    check_envelope(&req.tracking_id, &req.identity)?;
    let operation = payload("Operation", json!("CHAIN_UPDATE"));
    let info = req.chain_info;
    if info.locations < MIN_CHAIN_LOCATIONS {
        let message = format!("A chain must have at least {MIN_CHAIN_LOCATIONS} locations.");
        return Ok(respond(&req.tracking_id, false, &message, 4, operation));
    }

    let mut store = db.write().await;
    match store.chains.get_mut(&info.chain_name) {
        Some(existing) => {
            *existing = info;
            Ok(respond(&req.tracking_id, true, "", 0, operation))
        }
        None => {
            let message = format!("Chain {} does not exist.", info.chain_name);
            Ok(respond(&req.tracking_id, false, &message, 6, operation))
        }
    }
}
