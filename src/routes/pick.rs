use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    dto::pick::{InvalidSeatResponse, PickOutcome, PickViewResponse, SelectRequest, SubmissionStatus},
    error::AppError,
    services::pick_service,
    state::SharedState,
};

/// Per-seat pick view and submission flow endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/pick/{seat}", get(pick_view))
        .route("/pick/{seat}/select", post(select))
        .route("/pick/{seat}/confirm", post(confirm))
        .route("/pick/{seat}/cancel", post(cancel))
}

/// Resolve a raw seat path segment, or build the dedicated invalid-seat
/// response pointing back to the root.
fn resolve_seat(state: &SharedState, raw: &str) -> Result<u8, Response> {
    if let Ok(seat) = raw.parse::<u8>()
        && state.roster().contains_seat(seat)
    {
        return Ok(seat);
    }

    let body = InvalidSeatResponse {
        message: format!("`{raw}` is not a seat in this draft"),
        valid_seats: state.roster().seats().collect(),
        root: "/".to_string(),
    };
    Err((StatusCode::NOT_FOUND, Json(body)).into_response())
}

#[utoipa::path(
    get,
    path = "/pick/{seat}",
    tag = "pick",
    params(("seat" = String, Path, description = "Seat number, 1 through the roster size")),
    responses(
        (status = 200, description = "Pick view state for the seat", body = PickViewResponse),
        (status = 404, description = "Invalid seat", body = InvalidSeatResponse)
    )
)]
/// Return the live pick view for one seat: turn-holder, pool, and session.
pub async fn pick_view(State(state): State<SharedState>, Path(seat): Path<String>) -> Response {
    match resolve_seat(&state, &seat) {
        Ok(seat) => Json(pick_service::view(&state, seat).await).into_response(),
        Err(invalid) => invalid,
    }
}

#[utoipa::path(
    post,
    path = "/pick/{seat}/select",
    tag = "pick",
    params(("seat" = String, Path, description = "Seat number, 1 through the roster size")),
    request_body = SelectRequest,
    responses(
        (status = 200, description = "Celebrity staged for confirmation", body = SubmissionStatus),
        (status = 404, description = "Invalid seat", body = InvalidSeatResponse),
        (status = 409, description = "Not this seat's turn, or a submission is in flight")
    )
)]
/// Stage a celebrity for confirmation, gated by the cached turn.
pub async fn select(
    State(state): State<SharedState>,
    Path(seat): Path<String>,
    Json(payload): Json<SelectRequest>,
) -> Response {
    let seat = match resolve_seat(&state, &seat) {
        Ok(seat) => seat,
        Err(invalid) => return invalid,
    };

    match pick_service::select(&state, seat, payload.celebrity_id).await {
        Ok(status) => Json(status).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/pick/{seat}/confirm",
    tag = "pick",
    params(("seat" = String, Path, description = "Seat number, 1 through the roster size")),
    responses(
        (status = 200, description = "Procedure outcome; `ok: false` carries the rejection", body = PickOutcome),
        (status = 404, description = "Invalid seat", body = InvalidSeatResponse),
        (status = 409, description = "Nothing staged, stale turn, or a submission is in flight")
    )
)]
/// Confirm the staged celebrity and run the atomic pick procedure.
pub async fn confirm(State(state): State<SharedState>, Path(seat): Path<String>) -> Response {
    let seat = match resolve_seat(&state, &seat) {
        Ok(seat) => seat,
        Err(invalid) => return invalid,
    };

    match pick_service::confirm(&state, seat).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/pick/{seat}/cancel",
    tag = "pick",
    params(("seat" = String, Path, description = "Seat number, 1 through the roster size")),
    responses(
        (status = 200, description = "Selection discarded", body = SubmissionStatus),
        (status = 404, description = "Invalid seat", body = InvalidSeatResponse),
        (status = 409, description = "Nothing staged")
    )
)]
/// Discard the staged celebrity.
pub async fn cancel(State(state): State<SharedState>, Path(seat): Path<String>) -> Response {
    let seat = match resolve_seat(&state, &seat) {
        Ok(seat) => seat,
        Err(invalid) => return invalid,
    };

    match pick_service::cancel(&state, seat).await {
        Ok(status) => Json(status).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
