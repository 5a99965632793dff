use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the celebrity draft backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::health::root,
        crate::routes::board::get_board,
        crate::routes::board::get_rows,
        crate::routes::board::get_row,
        crate::routes::board::get_picks,
        crate::routes::board::get_draft_state,
        crate::routes::board::get_celebrities,
        crate::routes::board::export_csv,
        crate::routes::board::export_image,
        crate::routes::pick::pick_view,
        crate::routes::pick::select,
        crate::routes::pick::confirm,
        crate::routes::pick::cancel,
        crate::routes::feed::feed_stream,
        crate::routes::admin::load_celebrities,
        crate::routes::admin::reset_draft,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::RootResponse,
            crate::dto::common::DraftStateDto,
            crate::dto::common::CelebrityDto,
            crate::dto::board::BoardResponse,
            crate::dto::board::SeatColumn,
            crate::dto::board::BoardRowDto,
            crate::dto::pick::PickViewResponse,
            crate::dto::pick::SubmissionStatus,
            crate::dto::pick::SelectRequest,
            crate::dto::pick::PickOutcome,
            crate::dto::pick::InvalidSeatResponse,
            crate::dto::feed::ChangeEvent,
            crate::dto::feed::ChangeKind,
            crate::dto::feed::FeedTable,
            crate::dto::feed::PickRowDto,
            crate::dto::feed::FeedHandshake,
            crate::dto::admin::LoadCelebritiesRequest,
            crate::dto::admin::CelebrityInput,
            crate::dto::admin::LoadCelebritiesResponse,
            crate::dto::admin::ResetResponse,
        )
    ),
    tags(
        (name = "health", description = "Health and service metadata"),
        (name = "board", description = "Read-only board, read queries, and exports"),
        (name = "pick", description = "Per-seat pick views and the submission flow"),
        (name = "feed", description = "Row-level change feed streams"),
        (name = "admin", description = "Pool loading and draft reset"),
    )
)]
pub struct ApiDoc;
