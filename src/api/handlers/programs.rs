//! Handlers for program endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::program::{
    CreateProgramRequest, ProgramItem, ProgramListResponse, UpdateProgramRequest,
};
use crate::domain::entities::{Program, TermNames};
use crate::error::AppError;
use crate::state::AppState;

fn program_to_item((p, terms): (Program, TermNames)) -> ProgramItem {
    ProgramItem {
        short_name: p.short_name,
        name: p.name,
        description: p.description,
        membership_type: p.membership_type,
        commitment_donors: p.commitment_donors,
        submitted_donors: p.submitted_donors,
        genomic_donors: p.genomic_donors,
        website: p.website,
        cancer_types: terms.cancers,
        primary_sites: terms.primary_sites,
        countries: terms.countries,
        institutions: terms.institutions,
        regions: terms.regions,
        created_at: p.created_at,
        updated_at: p.updated_at,
    }
}

async fn describe(state: &AppState, short_name: &str) -> Result<ProgramItem, AppError> {
    let described = state.program_service.describe_program(short_name).await?;
    Ok(program_to_item(described))
}

/// Lists all programs.
///
/// # Endpoint
///
/// `GET /api/programs`
pub async fn program_list_handler(
    State(state): State<AppState>,
) -> Result<Json<ProgramListResponse>, AppError> {
    let described = state.program_service.describe_programs().await?;

    Ok(Json(ProgramListResponse {
        items: described.into_iter().map(program_to_item).collect(),
    }))
}

/// Registers a program and links it to the named taxonomy terms.
///
/// # Endpoint
///
/// `POST /api/programs`
///
/// # Request Body
///
/// ```json
/// {
///   "short_name": "PACA-CA",
///   "name": "Pancreatic Cancer Canada",
///   "membership_type": "FULL",
///   "commitment_donors": 250,
///   "cancer_types": ["Pancreatic cancer"],
///   "countries": ["Canada"]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 404 listing unknown term names per taxonomy.
/// Returns 409 if the short name is taken.
pub async fn create_program_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateProgramRequest>,
) -> Result<(StatusCode, Json<ProgramItem>), AppError> {
    payload.validate()?;

    let program = state.program_service.create_program(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(describe(&state, &program.short_name).await?),
    ))
}

/// Returns a program with its linked terms.
///
/// # Endpoint
///
/// `GET /api/programs/{short_name}`
///
/// # Errors
///
/// Returns 404 if the program does not exist.
pub async fn get_program_handler(
    Path(short_name): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProgramItem>, AppError> {
    Ok(Json(describe(&state, &short_name).await?))
}

/// Partially updates a program.
///
/// # Endpoint
///
/// `PATCH /api/programs/{short_name}`
///
/// A term list in the body replaces that taxonomy's links; absent lists are
/// left alone and `[]` unlinks every term of that taxonomy.
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 404 if the program or a named term does not exist.
pub async fn update_program_handler(
    Path(short_name): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProgramRequest>,
) -> Result<Json<ProgramItem>, AppError> {
    payload.validate()?;

    let program = state
        .program_service
        .update_program(&short_name, payload.into())
        .await?;

    Ok(Json(describe(&state, &program.short_name).await?))
}

/// Removes a program, unlinking its terms and dropping its invitations.
///
/// # Endpoint
///
/// `DELETE /api/programs/{short_name}`
///
/// # Errors
///
/// Returns 404 if the program does not exist.
pub async fn delete_program_handler(
    Path(short_name): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.program_service.remove_program(&short_name).await?;

    Ok(StatusCode::NO_CONTENT)
}
