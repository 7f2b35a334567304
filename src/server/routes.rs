use crate::auth::AuthContext;
use crate::domains::report::ProgramReport;
use crate::server::error::ApiError;
use crate::server::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::Json;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(rename = "programId")]
    pub program_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

pub async fn get_program_reports(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<Vec<ProgramReport>>, ApiError> {
    let auth = authenticate(&state, &headers)?;
    let Query(query) = query.map_err(|rejection| {
        debug!("Rejected report query: {}", rejection);
        ApiError::bad_request("Invalid programId")
    })?;
    let program_id = parse_program_id(query.program_id.as_deref())?;

    let reports = state
        .report_service
        .get_program_reports(program_id, &auth)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to get program reports"))?;

    Ok(Json(reports))
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthContext, ApiError> {
    let token = bearer_token(headers).ok_or_else(ApiError::unauthorized)?;
    state
        .jwt
        .authenticate(token)
        .map_err(|e| ApiError::from_service(e, "Failed to authenticate"))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// An empty `programId` is treated as absent
fn parse_program_id(raw: Option<&str>) -> Result<Option<Uuid>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| ApiError::bad_request("Invalid programId")),
    }
}
