use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use storage::dto::{
    common::PaginatedResponse,
    repair::{
        CreateRepairRequest, RepairListQuery, RepairResponse, RepairSummary, UpdateRepairRequest,
    },
};
use validator::Validate;

use crate::error::{WebError, WebResult};
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/repairs",
    request_body = CreateRepairRequest,
    responses(
        (status = 201, description = "Repair created successfully", body = RepairResponse,
            headers(("Location" = String, description = "URI of the created repair"))),
        (status = 400, description = "Validation error")
    ),
    tag = "repairs"
)]
pub async fn create_repair(
    State(state): State<AppState>,
    payload: Result<Json<CreateRepairRequest>, JsonRejection>,
) -> WebResult<Response> {
    let Json(req) = payload?;
    req.validate()?;

    let record = services::create_repair(state.repairs(), &req).await?;
    let location = format!("/api/repairs/{}", record.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(RepairResponse::from(record)),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/repairs",
    params(RepairListQuery),
    responses(
        (status = 200, description = "Page of active repairs", body = PaginatedResponse<RepairResponse>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "repairs"
)]
pub async fn list_repairs(
    State(state): State<AppState>,
    query: Result<Query<RepairListQuery>, QueryRejection>,
) -> WebResult<Response> {
    let Query(query) = query?;
    query.validate().map_err(WebError::BadRequest)?;

    let (records, total_items) = services::list_repairs(state.repairs(), &query).await?;

    let response = PaginatedResponse::new(
        records.into_iter().map(RepairResponse::from).collect(),
        query.pagination(),
        total_items,
    );

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/repairs/summary",
    responses(
        (status = 200, description = "Condensed listing of active repairs", body = Vec<RepairSummary>)
    ),
    tag = "repairs"
)]
pub async fn list_summaries(State(state): State<AppState>) -> WebResult<Response> {
    let summaries = services::list_summaries(state.repairs()).await?;

    Ok(Json(summaries).into_response())
}

#[utoipa::path(
    get,
    path = "/api/repairs/{id}",
    params(
        ("id" = i64, Path, description = "Repair id")
    ),
    responses(
        (status = 200, description = "Repair found", body = RepairResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Repair not found or inactive")
    ),
    tag = "repairs"
)]
pub async fn get_repair(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> WebResult<Response> {
    let Path(id) = id?;
    let record = services::get_repair(state.repairs(), id).await?;

    Ok(Json(RepairResponse::from(record)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/repairs/{id}",
    params(
        ("id" = i64, Path, description = "Repair id")
    ),
    request_body = UpdateRepairRequest,
    responses(
        (status = 200, description = "Repair updated successfully", body = RepairResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Repair not found or inactive")
    ),
    tag = "repairs"
)]
pub async fn update_repair(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateRepairRequest>, JsonRejection>,
) -> WebResult<Response> {
    let Path(id) = id?;
    let Json(update_req) = payload?;
    update_req.validate()?;

    let updated = services::update_repair(state.repairs(), id, &update_req).await?;

    Ok(Json(RepairResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/repairs/{id}",
    params(
        ("id" = i64, Path, description = "Repair id")
    ),
    responses(
        (status = 204, description = "Repair deactivated"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Repair not found")
    ),
    tag = "repairs"
)]
pub async fn delete_repair(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> WebResult<Response> {
    let Path(id) = id?;
    services::delete_repair(state.repairs(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
