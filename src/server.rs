use crate::config::Config;
use crate::data::{GenerateRequest, NewTimetable, Shortfall, TimetableId, TimetableRecord};
use crate::display::{GridRow, render_grid};
use crate::error::EngineError;
use crate::grid::active_days;
use crate::repository::{InMemoryRepository, TimetableRepository};
use crate::solver;
use crate::validation::validate_request;
use crate::workload::WorkloadValidator;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use serde::Serialize;
use serde_json::json;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error as ThisError;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn TimetableRepository>,
    pub config: Arc<Config>,
    /// Held from the workload check until the new timetable is stored.
    generation: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(repository: Arc<dyn TimetableRepository>, config: Config) -> Self {
        Self {
            repository,
            config: Arc::new(config),
            generation: Arc::new(Mutex::new(())),
        }
    }
}

///
/// ApiError
///

#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("timetable {0} not found")]
    NotFound(TimetableId),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ApiError::Engine(EngineError::WorkloadExceeded { cap, overloads }) => (
                StatusCode::CONFLICT,
                Json(json!({ "error": message, "cap": cap, "overloads": overloads })),
            )
                .into_response(),
            ApiError::Engine(_) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound(_) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub timetable: TimetableRecord,
    pub unmet: Vec<Shortfall>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadResponse {
    pub teacher: String,
    pub non_lab_subjects: usize,
    pub cap: usize,
    pub available: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/timetable/generate", post(generate_handler))
        .route("/v1/timetables", get(list_handler))
        .route("/v1/timetables/:id", get(get_handler).delete(delete_handler))
        .route("/v1/timetables/:id/grid", get(grid_handler))
        .route("/v1/teachers/:teacher/workload", get(workload_handler))
        .with_state(state)
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>), ApiError> {
    let response = generate_and_store(&state, request)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Validation, then the workload check against stored timetables, then
/// generation. Only a successful run is stored. Requests are serialized from
/// the workload check through the save so their counts cannot interleave.
fn generate_and_store(
    state: &AppState,
    mut request: GenerateRequest,
) -> Result<GenerateResponse, EngineError> {
    if request.free_categories.is_empty() {
        request.free_categories = state.config.default_free_categories.clone();
    }
    validate_request(&request)?;

    let _guard = state
        .generation
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let existing = state.repository.list();
    if let Err(err) = WorkloadValidator::new(&existing)
        .check_requirements(&request.requirements, state.config.workload_cap)
    {
        warn!("Rejected generation request: {}", err);
        return Err(err);
    }

    let timetable = solver::generate(&request, &state.config.engine, &mut rand::thread_rng())?;
    let record = state.repository.save(NewTimetable {
        year_level: request.year_level,
        days: active_days(request.year_level, &request.day_options),
        entries: timetable.entries,
    });
    info!(
        "Stored timetable {} ({} entries, {} unmet).",
        record.id,
        record.entries.len(),
        timetable.unmet.len()
    );

    Ok(GenerateResponse {
        timetable: record,
        unmet: timetable.unmet,
    })
}

async fn list_handler(State(state): State<AppState>) -> Json<Vec<TimetableRecord>> {
    Json(state.repository.list())
}

async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<TimetableId>,
) -> Result<Json<TimetableRecord>, ApiError> {
    state
        .repository
        .get(id)
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<TimetableId>,
) -> Result<StatusCode, ApiError> {
    if state.repository.delete(id) {
        info!("Deleted timetable {}.", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}

async fn grid_handler(
    State(state): State<AppState>,
    Path(id): Path<TimetableId>,
) -> Result<Json<Vec<GridRow>>, ApiError> {
    let record = state.repository.get(id).ok_or(ApiError::NotFound(id))?;
    Ok(Json(render_grid(&record.days, &record.entries)))
}

async fn workload_handler(
    State(state): State<AppState>,
    Path(teacher): Path<String>,
) -> Json<WorkloadResponse> {
    let existing = state.repository.list();
    let validator = WorkloadValidator::new(&existing);
    let cap = state.config.workload_cap;
    Json(WorkloadResponse {
        non_lab_subjects: validator.count_non_lab_assignments(&teacher),
        available: validator.is_available(&teacher, cap),
        teacher,
        cap,
    })
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.bind_addr;
    let app = router(AppState::new(Arc::new(InMemoryRepository::new()), config));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
