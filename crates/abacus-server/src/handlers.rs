//! HTTP request handlers for the arithmetic service.
//!
//! Implements the arithmetic endpoints, the calculation log CRUD endpoints,
//! and the health/metrics endpoints using axum. Arithmetic routes are
//! registered by iterating [`Operation::ALL`], so the route table and the
//! operation set cannot drift apart.

use crate::metrics::{self, ServiceMetrics, EXPOSITION_CONTENT_TYPE};
use crate::validate::{validate_pair, validate_single, ValidationError};
use abacus_domain::traits::CalcLogStore;
use abacus_domain::{EntryId, LogEntryPatch, NewLogEntry, Operation, OperationError};
use abacus_store::{SqliteStore, StoreError};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info};

/// Shared application state
///
/// Dependencies are constructed once at startup and handed to
/// [`create_router`]; tests substitute an in-memory store.
#[derive(Clone)]
pub struct AppState {
    /// Calculation log store. The SQLite connection is not `Sync`, so
    /// handlers take the lock for the duration of one storage call and
    /// never hold it across an await.
    pub store: Arc<Mutex<SqliteStore>>,
    /// Request metrics registry
    pub metrics: Arc<ServiceMetrics>,
}

/// Raw operand parameters from the query string
#[derive(Debug, Deserialize)]
pub struct OperandParams {
    /// First operand, unparsed
    pub num1: Option<String>,
    /// Second operand, unparsed
    pub num2: Option<String>,
}

/// Successful arithmetic response
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultResponse {
    /// Computed result
    pub result: f64,
}

/// Wire form of a calculation log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntryDto {
    /// Entry id as a UUID string
    pub id: String,
    /// Text representation of the requested operation
    pub input: String,
    /// Text representation of the computed result
    pub output: String,
    /// Creation time as Unix epoch seconds
    pub timestamp: u64,
}

impl From<abacus_domain::CalcLogEntry> for LogEntryDto {
    fn from(entry: abacus_domain::CalcLogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            input: entry.input,
            output: entry.output,
            timestamp: entry.timestamp,
        }
    }
}

/// Body of `POST /api/log`
#[derive(Debug, Deserialize)]
pub struct CreateLogRequest {
    /// Text representation of the requested operation
    pub input: String,
    /// Text representation of the computed result
    pub output: String,
    /// Creation time as Unix epoch seconds; defaults to now
    pub timestamp: Option<u64>,
}

/// Body of `PUT /api/log/{id}` — absent fields are untouched
#[derive(Debug, Deserialize)]
pub struct UpdateLogRequest {
    /// Replacement input text
    pub input: Option<String>,
    /// Replacement output text
    pub output: Option<String>,
    /// Replacement timestamp
    pub timestamp: Option<u64>,
}

/// Response of `POST /api/log`
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLogResponse {
    /// Always true on the success path
    pub success: bool,
    /// The created entry with its assigned id
    pub log: LogEntryDto,
}

/// Response of `PUT /api/log/{id}`
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateLogResponse {
    /// Always true on the success path
    pub success: bool,
    /// The entry after the update
    pub updated: LogEntryDto,
}

/// Response of `DELETE /api/log/{id}`
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteLogResponse {
    /// Always true; deletion is idempotent
    pub success: bool,
    /// Acknowledgment message
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: String,
    /// Storage probe outcome
    pub storage: String,
}

/// Error body; `success` appears only on log-mutation and storage failures
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Present (and false) for log API and storage failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Human-readable message
    pub error: String,
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Operand validation failure
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Domain-rule violation (zero divisor, negative root)
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// Malformed entry id in the request path
    #[error("{0}")]
    InvalidEntryId(String),

    /// No entry matched the requested id
    #[error("Log entry not found.")]
    NotFound,

    /// Storage-layer failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal server error
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, flagged) = match &self {
            ApiError::Validation(_) | ApiError::Operation(_) => (StatusCode::BAD_REQUEST, false),
            ApiError::InvalidEntryId(_) => (StatusCode::BAD_REQUEST, true),
            ApiError::NotFound => (StatusCode::NOT_FOUND, true),
            ApiError::Store(_) | ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, true)
            }
        };

        let message = self.to_string();
        error!("{}", message);

        let body = Json(ErrorBody {
            success: flagged.then_some(false),
            error: message,
        });
        (status, body).into_response()
    }
}

/// Take the store lock, mapping poisoning to an internal error
fn lock_store(state: &AppState) -> Result<MutexGuard<'_, SqliteStore>, ApiError> {
    state
        .store
        .lock()
        .map_err(|_| ApiError::Internal("Storage lock poisoned".to_string()))
}

/// Shared arithmetic handler — validate, evaluate, respond
///
/// For division and modulo the zero-divisor check runs before operand
/// validation, so a zero `num2` reports the fixed divisor message even when
/// `num1` is missing or malformed.
async fn handle_operation(
    op: Operation,
    Query(params): Query<OperandParams>,
) -> Result<Json<ResultResponse>, ApiError> {
    let input_text = if op.is_unary() {
        format!("sqrt({})", params.num1.as_deref().unwrap_or(""))
    } else {
        format!(
            "{} {} {}",
            params.num1.as_deref().unwrap_or(""),
            op.symbol(),
            params.num2.as_deref().unwrap_or("")
        )
    };
    info!("Request: {}", input_text);

    if matches!(op, Operation::Divide | Operation::Modulo) {
        let divisor = params
            .num2
            .as_deref()
            .and_then(|s| s.trim().parse::<f64>().ok());
        if divisor == Some(0.0) {
            let err = match op {
                Operation::Divide => OperationError::DivisionByZero,
                _ => OperationError::ModuloByZero,
            };
            return Err(ApiError::Operation(err));
        }
    }

    let result = if op.is_unary() {
        let value = validate_single(params.num1.as_deref())?;
        op.apply(value, 0.0)?
    } else {
        let (a, b) = validate_pair(params.num1.as_deref(), params.num2.as_deref())?;
        op.apply(a, b)?
    };

    info!("Result: {} = {}", input_text, result);
    Ok(Json(ResultResponse { result }))
}

/// GET / - static greeting
async fn root() -> &'static str {
    "Abacus arithmetic service is running."
}

/// GET /health - liveness plus a storage probe
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage = match state.store.lock() {
        Ok(store) => match store.list_entries() {
            Ok(_) => "ok",
            Err(_) => "error",
        },
        Err(_) => "error",
    };

    let status = if storage == "ok" { "healthy" } else { "unhealthy" };

    Json(HealthResponse {
        status: status.to_string(),
        storage: storage.to_string(),
    })
}

/// GET /metrics - Prometheus text exposition
async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        state.metrics.render(),
    )
}

/// POST /api/log - create a log entry
async fn create_log(
    State(state): State<AppState>,
    Json(body): Json<CreateLogRequest>,
) -> Result<Json<CreateLogResponse>, ApiError> {
    let entry = {
        let mut store = lock_store(&state)?;
        store.create_entry(NewLogEntry {
            input: body.input,
            output: body.output,
            timestamp: body.timestamp,
        })?
    };

    info!("Log created: {}", entry.id);
    Ok(Json(CreateLogResponse {
        success: true,
        log: entry.into(),
    }))
}

/// GET /api/logs - list all log entries in insertion order
async fn list_logs(State(state): State<AppState>) -> Result<Json<Vec<LogEntryDto>>, ApiError> {
    let entries = {
        let store = lock_store(&state)?;
        store.list_entries()?
    };

    info!("{} logs retrieved", entries.len());
    Ok(Json(entries.into_iter().map(LogEntryDto::from).collect()))
}

/// PUT /api/log/{id} - partially update a log entry
///
/// An unknown id is surfaced as 404 rather than a silent empty success.
async fn update_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateLogRequest>,
) -> Result<Json<UpdateLogResponse>, ApiError> {
    let id = EntryId::from_string(&id).map_err(ApiError::InvalidEntryId)?;

    let updated = {
        let mut store = lock_store(&state)?;
        store.update_entry(
            id,
            LogEntryPatch {
                input: body.input,
                output: body.output,
                timestamp: body.timestamp,
            },
        )?
    };

    let entry = updated.ok_or(ApiError::NotFound)?;
    info!("Log updated: {}", entry.id);
    Ok(Json(UpdateLogResponse {
        success: true,
        updated: entry.into(),
    }))
}

/// DELETE /api/log/{id} - delete a log entry, idempotently
async fn delete_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteLogResponse>, ApiError> {
    let id = EntryId::from_string(&id).map_err(ApiError::InvalidEntryId)?;

    let existed = {
        let mut store = lock_store(&state)?;
        store.delete_entry(id)?
    };

    info!("Log deleted: {} (existed: {})", id, existed);
    Ok(Json(DeleteLogResponse {
        success: true,
        message: "Log deleted.".to_string(),
    }))
}

/// Create the axum router with all routes
///
/// Arithmetic routes come from the [`Operation::ALL`] table; the request
/// metrics layer wraps everything.
pub fn create_router(state: AppState) -> AxumRouter {
    let metrics = state.metrics.clone();

    let mut router = AxumRouter::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/log", post(create_log))
        .route("/api/logs", get(list_logs))
        .route("/api/log/:id", put(update_log).delete(delete_log));

    for op in Operation::ALL {
        let path = format!("/{}", op.name());
        router = router.route(
            &path,
            get(move |query: Query<OperandParams>| handle_operation(op, query)),
        );
    }

    router
        .layer(middleware::from_fn(move |req, next| {
            metrics::track_requests(metrics.clone(), req, next)
        }))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        let store = SqliteStore::new(":memory:").unwrap();
        AppState {
            store: Arc::new(Mutex::new(store)),
            metrics: Arc::new(ServiceMetrics::new()),
        }
    }

    #[tokio::test]
    async fn test_root_greeting() {
        let app = create_router(create_test_state());

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_add_endpoint() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/add?num1=2&num2=3")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
