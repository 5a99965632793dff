use std::time::SystemTime;

use crate::{
    board::{self, csv, image},
    dto::{
        board::{BoardResponse, BoardRowDto, SeatColumn},
        common::{CelebrityDto, DraftStateDto},
        feed::PickRowDto,
    },
    error::ServiceError,
    state::{SharedState, draft::BoardRow},
};

/// A client-generated export artifact ready for download.
#[derive(Debug)]
pub struct Export {
    /// Timestamped download filename.
    pub filename: String,
    /// File body.
    pub content: String,
}

/// Assemble the aggregated read-only board from the reconciled read model.
pub async fn board(state: &SharedState) -> BoardResponse {
    let (rows, draft_state, feed_status) = {
        let cache = state.projection().read().await;
        (cache.rows().to_vec(), cache.draft_state(), cache.status())
    };

    let grouped = board::group_by_seat(state.roster(), &rows);
    let latest_pick_number = board::latest_pick(&rows).map(|row| row.pick_number);

    let seats = grouped
        .into_iter()
        .map(|(seat, picks)| SeatColumn {
            seat,
            player_name: state
                .roster()
                .player_name(seat)
                .map(str::to_string)
                .unwrap_or_default(),
            picks: picks.into_iter().map(Into::into).collect(),
        })
        .collect();

    BoardResponse {
        seats,
        latest_pick_number,
        draft_state: draft_state.into(),
        feed_status: feed_status.as_str().to_string(),
    }
}

/// List every denormalized pick row, in commit order.
pub async fn rows(state: &SharedState) -> Vec<BoardRowDto> {
    state
        .board()
        .read()
        .await
        .board_rows()
        .into_iter()
        .map(Into::into)
        .collect()
}

/// Fetch the denormalized row for one pick number.
pub async fn row(state: &SharedState, pick_number: u32) -> Result<BoardRowDto, ServiceError> {
    state
        .board()
        .read()
        .await
        .board_row(pick_number)
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound(format!("pick `{pick_number}` not found")))
}

/// List the raw pick log, in commit order.
pub async fn picks(state: &SharedState) -> Vec<PickRowDto> {
    state
        .board()
        .read()
        .await
        .picks()
        .iter()
        .map(PickRowDto::from)
        .collect()
}

/// Current value of the draft-state singleton.
pub async fn draft_state(state: &SharedState) -> DraftStateDto {
    state.board().read().await.draft_state().into()
}

/// List the celebrity pool, optionally restricted to undrafted entries.
pub async fn celebrities(state: &SharedState, available_only: bool) -> Vec<CelebrityDto> {
    let board = state.board().read().await;
    let listed = if available_only {
        board.available_pool()
    } else {
        board.celebrities()
    };
    listed.into_iter().map(Into::into).collect()
}

/// Render the current board snapshot as a CSV download.
pub async fn export_csv(state: &SharedState) -> Result<Export, ServiceError> {
    let rows = snapshot(state).await;
    let grouped = board::group_by_seat(state.roster(), &rows);
    let content = csv::board_to_csv(state.roster(), &grouped)?;

    Ok(Export {
        filename: csv::export_filename("draft-board", "csv", SystemTime::now()),
        content,
    })
}

/// Render the current board snapshot as a fixed-layout image download.
pub async fn export_image(state: &SharedState) -> Export {
    let rows = snapshot(state).await;
    let grouped = board::group_by_seat(state.roster(), &rows);
    let latest = board::latest_pick(&rows);
    let content = image::render_board_svg(state.roster(), &grouped, latest);

    Export {
        filename: csv::export_filename("draft-board", "svg", SystemTime::now()),
        content,
    }
}

async fn snapshot(state: &SharedState) -> Vec<BoardRow> {
    state.projection().read().await.rows().to_vec()
}
