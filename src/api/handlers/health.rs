//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::domain::entities::TermKind;
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "programs": { "status": "ok", "message": "3 programs" },
///     "taxonomy": { "status": "ok", "message": "19 cancer types" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let programs_check = check_programs(&state).await;
    let taxonomy_check = check_taxonomy(&state).await;

    let all_healthy = programs_check.status == "ok" && taxonomy_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            programs: programs_check,
            taxonomy: taxonomy_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_programs(state: &AppState) -> CheckStatus {
    match state.program_service.list_programs().await {
        Ok(programs) => CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("{} programs", programs.len())),
        },
        Err(e) => CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Program store error: {}", e)),
        },
    }
}

async fn check_taxonomy(state: &AppState) -> CheckStatus {
    match state.taxonomy_service.list(TermKind::Cancers).await {
        Ok(terms) => CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("{} cancer types", terms.len())),
        },
        Err(e) => CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Taxonomy store error: {}", e)),
        },
    }
}
