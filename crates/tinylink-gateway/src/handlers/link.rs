use crate::error::Result;
use crate::model::{CreateLinkRequest, DeleteLinkResponse, LinkResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>)> {
    let Json(request) = payload?;
    let record = state.shortener().create_link(request.into()).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

pub async fn list_links_handler(State(state): State<AppState>) -> Result<Json<Vec<LinkResponse>>> {
    let records = state.shortener().list_links().await?;
    Ok(Json(records.into_iter().map(LinkResponse::from).collect()))
}

pub async fn get_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>> {
    let record = state.shortener().get_link(&code).await?;
    Ok(Json(record.into()))
}

pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteLinkResponse>> {
    let record = state.shortener().delete_link(&code).await?;
    Ok(Json(DeleteLinkResponse {
        message: "Link deleted successfully",
        link: record.into(),
    }))
}
