//! Config Change HTTP Routes
//!
//! CRUD and filtered listing over recorded configuration changes.
//!
//! Handlers own the business rules the store does not: id and timestamp
//! assignment, validation before mutation, not-found responses, and log
//! severity (critical changes log at WARN).

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::errors::{ApiError, ApiResult};
use crate::model::{validate, ChangeRequest, ChangeType, ConfigChange};
use crate::storage::{ChangeFilter, ChangeStore, InMemoryChangeStore};

// ==================
// Shared State
// ==================

/// Change state shared across handlers
#[derive(Debug)]
pub struct ChangeState {
    pub store: Arc<dyn ChangeStore>,
}

impl ChangeState {
    /// State backed by a fresh in-memory store
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryChangeStore::new()))
    }

    pub fn with_store(store: Arc<dyn ChangeStore>) -> Self {
        Self { store }
    }
}

impl Default for ChangeState {
    fn default() -> Self {
        Self::new()
    }
}

// ==================
// Request Types
// ==================

/// Query string for `GET /changes/list`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default, rename = "type")]
    pub change_type: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

// ==================
// Change Routes
// ==================

/// Create change routes
pub fn change_routes(state: Arc<ChangeState>) -> Router {
    Router::new()
        .route("/", get(get_all_handler).post(create_handler))
        .route("/list", get(list_handler))
        .route(
            "/:id",
            get(get_by_id_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn body(payload: Result<Json<ChangeRequest>, JsonRejection>) -> ApiResult<ChangeRequest> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))
}

fn path_id(id: Result<Path<Uuid>, PathRejection>) -> ApiResult<Uuid> {
    id.map(|Path(id)| id)
        .map_err(|rejection| ApiError::InvalidPath(rejection.body_text()))
}

/// Empty values mean "no bound"
fn parse_bound(name: &str, raw: Option<&str>) -> ApiResult<Option<DateTime<Utc>>> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value).map(Some).ok_or_else(|| {
            ApiError::InvalidQuery(format!(
                "{} '{}': expected an ISO-8601 date or timestamp",
                name, value
            ))
        }),
    }
}

/// Accepts RFC 3339, a timestamp without offset, or a bare date (midnight).
/// Values without an offset are taken as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    // An unencoded `+` in the offset arrives as a space
    if let Ok(dt) = DateTime::parse_from_rfc3339(&value.replace(' ', "+")) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

// ==================
// Handlers
// ==================

async fn create_handler(
    State(state): State<Arc<ChangeState>>,
    payload: Result<Json<ChangeRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let request = body(payload)?;
    let now = Utc::now();
    let valid = validate(&request, now).map_err(|report| {
        info!(%report, "Config change rejected");
        ApiError::Validation(report)
    })?;

    let change = ConfigChange::new(valid.rule_name, valid.change_type, valid.is_critical, now);
    state.store.add(change.clone());

    if change.is_critical {
        warn!(
            id = %change.id,
            rule_name = %change.rule_name,
            change_type = %change.change_type,
            changed_at = %change.changed_at,
            "Critical config change created"
        );
    } else {
        info!(rule_name = %change.rule_name, "Config change created");
    }

    let location = format!("/changes/{}", change.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(change),
    )
        .into_response())
}

async fn update_handler(
    State(state): State<Arc<ChangeState>>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ChangeRequest>, JsonRejection>,
) -> ApiResult<Json<ConfigChange>> {
    let id = path_id(id)?;

    if state.store.get(&id).is_none() {
        error!(%id, "Update failed. Config change not found");
        return Err(ApiError::NotFound(id));
    }

    let request = body(payload)?;
    let now = Utc::now();
    let valid = validate(&request, now).map_err(|report| {
        info!(%id, %report, "Config change update rejected");
        ApiError::Validation(report)
    })?;

    // Any id in the body is ignored in favour of the path
    let change = ConfigChange {
        id,
        rule_name: valid.rule_name,
        change_type: valid.change_type,
        is_critical: valid.is_critical,
        changed_at: now,
    };

    let updated = state.store.update(&change).ok_or_else(|| {
        error!(%id, "Update failed. Config change removed concurrently");
        ApiError::NotFound(id)
    })?;

    if updated.is_critical {
        warn!(
            id = %updated.id,
            rule_name = %updated.rule_name,
            change_type = %updated.change_type,
            changed_at = %updated.changed_at,
            "Critical change updated"
        );
    } else {
        info!(rule_name = %updated.rule_name, "Config change updated");
    }

    Ok(Json(updated))
}

async fn delete_handler(
    State(state): State<Arc<ChangeState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path_id(id)?;

    if state.store.get(&id).is_none() {
        error!(%id, "Delete failed. Config change not found");
        return Err(ApiError::NotFound(id));
    }

    if state.store.delete(&id).is_none() {
        error!(%id, "Delete failed. Config change removed concurrently");
        return Err(ApiError::NotFound(id));
    }

    info!(%id, "Config change was deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn get_by_id_handler(
    State(state): State<Arc<ChangeState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<ConfigChange>> {
    let id = path_id(id)?;

    match state.store.get(&id) {
        Some(change) => {
            info!(%id, "Retrieved config change");
            Ok(Json(change))
        }
        None => {
            warn!(%id, "Config change not found");
            Err(ApiError::NotFound(id))
        }
    }
}

async fn get_all_handler(State(state): State<Arc<ChangeState>>) -> Json<Vec<ConfigChange>> {
    let changes = state.store.get_all();

    if changes.is_empty() {
        warn!("GetAll returned no config changes");
    } else {
        info!(count = changes.len(), "GetAll returned config changes");
    }

    Json(changes)
}

async fn list_handler(
    State(state): State<Arc<ChangeState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ConfigChange>>> {
    let Query(query) = query.map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))?;

    let from = parse_bound("from", query.from.as_deref())?;
    let to = parse_bound("to", query.to.as_deref())?;

    let mut filter = ChangeFilter {
        change_type: None,
        from,
        to,
    };

    let changes = match query.change_type.as_deref() {
        None | Some("") => state.store.list(&filter),
        Some(raw) => match raw.parse::<ChangeType>() {
            Ok(change_type) => {
                filter.change_type = Some(change_type);
                state.store.list(&filter)
            }
            // Unknown types match no record
            Err(_) => Vec::new(),
        },
    };

    if changes.is_empty() {
        warn!(
            change_type = ?query.change_type,
            from = ?from,
            to = ?to,
            "List returned no config changes"
        );
    } else {
        info!(count = changes.len(), "Retrieved list of config changes");
    }

    Ok(Json(changes))
}
