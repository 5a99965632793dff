use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    dto::{
        board::{BoardResponse, BoardRowDto},
        common::{CelebrityDto, DraftStateDto},
        feed::PickRowDto,
    },
    error::AppError,
    services::board_service,
    state::SharedState,
};

/// Read-only board endpoints plus the snapshot exports.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/board", get(get_board))
        .route("/board/rows", get(get_rows))
        .route("/board/rows/{pick_number}", get(get_row))
        .route("/board/export/csv", get(export_csv))
        .route("/board/export/image", get(export_image))
        .route("/picks", get(get_picks))
        .route("/draft-state", get(get_draft_state))
        .route("/celebrities", get(get_celebrities))
}

#[utoipa::path(
    get,
    path = "/board",
    tag = "board",
    responses((status = 200, description = "Aggregated board grouped by seat", body = BoardResponse))
)]
/// Return the aggregated board: per-seat columns and the latest pick.
pub async fn get_board(State(state): State<SharedState>) -> Json<BoardResponse> {
    Json(board_service::board(&state).await)
}

#[utoipa::path(
    get,
    path = "/board/rows",
    tag = "board",
    responses((status = 200, description = "All denormalized pick rows", body = [BoardRowDto]))
)]
/// List every denormalized pick row in commit order.
pub async fn get_rows(State(state): State<SharedState>) -> Json<Vec<BoardRowDto>> {
    Json(board_service::rows(&state).await)
}

#[utoipa::path(
    get,
    path = "/board/rows/{pick_number}",
    tag = "board",
    params(("pick_number" = u32, Path, description = "Pick number to fetch")),
    responses(
        (status = 200, description = "The denormalized row", body = BoardRowDto),
        (status = 404, description = "No such pick")
    )
)]
/// Fetch the denormalized row for one pick number.
pub async fn get_row(
    State(state): State<SharedState>,
    Path(pick_number): Path<u32>,
) -> Result<Json<BoardRowDto>, AppError> {
    let row = board_service::row(&state, pick_number).await?;
    Ok(Json(row))
}

#[utoipa::path(
    get,
    path = "/picks",
    tag = "board",
    responses((status = 200, description = "The raw pick log", body = [PickRowDto]))
)]
/// List the raw pick log in commit order.
pub async fn get_picks(State(state): State<SharedState>) -> Json<Vec<PickRowDto>> {
    Json(board_service::picks(&state).await)
}

#[utoipa::path(
    get,
    path = "/draft-state",
    tag = "board",
    responses((status = 200, description = "The draft-state singleton", body = DraftStateDto))
)]
/// Return the current turn-holder and pick count.
pub async fn get_draft_state(State(state): State<SharedState>) -> Json<DraftStateDto> {
    Json(board_service::draft_state(&state).await)
}

#[derive(Debug, Deserialize, IntoParams)]
/// Filter options for the celebrity listing.
pub struct CelebritiesQuery {
    /// When true, list only undrafted celebrities.
    #[serde(default)]
    pub available: bool,
}

#[utoipa::path(
    get,
    path = "/celebrities",
    tag = "board",
    params(CelebritiesQuery),
    responses((status = 200, description = "The celebrity pool", body = [CelebrityDto]))
)]
/// List the celebrity pool, optionally restricted to the undrafted.
pub async fn get_celebrities(
    State(state): State<SharedState>,
    Query(query): Query<CelebritiesQuery>,
) -> Json<Vec<CelebrityDto>> {
    Json(board_service::celebrities(&state, query.available).await)
}

#[utoipa::path(
    get,
    path = "/board/export/csv",
    tag = "board",
    responses((status = 200, description = "CSV snapshot of the board", content_type = "text/csv", body = String))
)]
/// Download the current board as CSV.
pub async fn export_csv(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let export = board_service::export_csv(&state).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.content,
    ))
}

#[utoipa::path(
    get,
    path = "/board/export/image",
    tag = "board",
    responses((status = 200, description = "Fixed-layout image snapshot of the board", content_type = "image/svg+xml", body = String))
)]
/// Download the current board as a fixed 1920x1080 image.
pub async fn export_image(State(state): State<SharedState>) -> impl IntoResponse {
    let export = board_service::export_image(&state).await;
    (
        [
            (header::CONTENT_TYPE, "image/svg+xml".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.content,
    )
}
