//! Image snapshot of the board: a fixed 1920×1080 document with the per-seat
//! grid rendered at up to 2× logical scale, letterboxed and centered,
//! independent of any live page layout.

use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::state::draft::{BoardRow, Roster};

/// Output canvas width in pixels.
pub const CANVAS_WIDTH: f32 = 1920.0;
/// Output canvas height in pixels.
pub const CANVAS_HEIGHT: f32 = 1080.0;
/// Nominal scale applied when the content fits the canvas.
const BASE_SCALE: f32 = 2.0;

const PADDING: f32 = 16.0;
const TITLE_HEIGHT: f32 = 36.0;
const HEADER_HEIGHT: f32 = 28.0;
const ROW_HEIGHT: f32 = 22.0;
const COLUMN_WIDTH: f32 = 150.0;
const COLUMN_GAP: f32 = 10.0;

const BACKGROUND: &str = "#10101c";
const COLUMN_FILL: &str = "#1d1d30";
const HEADER_FILL: &str = "#2c2c4a";
const LATEST_FILL: &str = "#4a3b18";
const TEXT_COLOR: &str = "#ececf4";

/// Placement of the logical snapshot grid on the fixed canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotLayout {
    /// Uniform scale applied to the logical grid.
    pub scale: f32,
    /// Horizontal letterbox offset in canvas pixels.
    pub offset_x: f32,
    /// Vertical letterbox offset in canvas pixels.
    pub offset_y: f32,
    /// Logical (unscaled) grid width.
    pub content_width: f32,
    /// Logical (unscaled) grid height.
    pub content_height: f32,
}

/// Compute the letterboxed placement for a grid of `seats` columns and
/// `depth` data rows.
///
/// The grid renders at 2× whenever it fits; wider or deeper boards shrink
/// uniformly so nothing is clipped, and the result is always centered.
pub fn snapshot_layout(seats: usize, depth: usize) -> SnapshotLayout {
    let seats = seats.max(1) as f32;
    let content_width = 2.0 * PADDING + seats * COLUMN_WIDTH + (seats - 1.0) * COLUMN_GAP;
    let content_height =
        2.0 * PADDING + TITLE_HEIGHT + HEADER_HEIGHT + depth.max(1) as f32 * ROW_HEIGHT;

    let scale = BASE_SCALE
        .min(CANVAS_WIDTH / content_width)
        .min(CANVAS_HEIGHT / content_height);

    SnapshotLayout {
        scale,
        offset_x: (CANVAS_WIDTH - content_width * scale) / 2.0,
        offset_y: (CANVAS_HEIGHT - content_height * scale) / 2.0,
        content_width,
        content_height,
    }
}

/// Render the grouped board to a self-contained SVG document.
///
/// The row holding the latest pick is drawn with an accent fill so the most
/// recent pick stays distinguishable in the exported image.
pub fn render_board_svg(
    roster: &Roster,
    grouped: &IndexMap<u8, Vec<BoardRow>>,
    latest: Option<&BoardRow>,
) -> String {
    let depth = grouped.values().map(Vec::len).max().unwrap_or(0);
    let layout = snapshot_layout(roster.len(), depth);
    let latest_pick = latest.map(|row| row.pick_number);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CANVAS_WIDTH}" height="{CANVAS_HEIGHT}" viewBox="0 0 {CANVAS_WIDTH} {CANVAS_HEIGHT}" font-family="sans-serif">"#
    );
    let _ = writeln!(
        svg,
        r#"<rect width="{CANVAS_WIDTH}" height="{CANVAS_HEIGHT}" fill="{BACKGROUND}"/>"#
    );
    let _ = writeln!(
        svg,
        r#"<g transform="translate({:.1} {:.1}) scale({:.4})">"#,
        layout.offset_x, layout.offset_y, layout.scale
    );

    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" fill="{TEXT_COLOR}" font-size="24" font-weight="bold">Draft Board</text>"#,
        PADDING,
        PADDING + 24.0
    );

    for (index, slot) in roster.iter().enumerate() {
        let column_x = PADDING + index as f32 * (COLUMN_WIDTH + COLUMN_GAP);
        let header_y = PADDING + TITLE_HEIGHT;

        let _ = writeln!(
            svg,
            r#"<rect x="{column_x:.1}" y="{header_y:.1}" width="{COLUMN_WIDTH}" height="{:.1}" fill="{COLUMN_FILL}"/>"#,
            HEADER_HEIGHT + depth.max(1) as f32 * ROW_HEIGHT
        );
        let _ = writeln!(
            svg,
            r#"<rect x="{column_x:.1}" y="{header_y:.1}" width="{COLUMN_WIDTH}" height="{HEADER_HEIGHT}" fill="{HEADER_FILL}"/>"#
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" fill="{TEXT_COLOR}" font-size="14" font-weight="bold">{}</text>"#,
            column_x + 8.0,
            header_y + 19.0,
            xml_escape(&slot.name)
        );

        let Some(rows) = grouped.get(&slot.seat) else {
            continue;
        };
        for (row_index, row) in rows.iter().enumerate() {
            let row_y = header_y + HEADER_HEIGHT + row_index as f32 * ROW_HEIGHT;
            if latest_pick == Some(row.pick_number) {
                let _ = writeln!(
                    svg,
                    r#"<rect x="{column_x:.1}" y="{row_y:.1}" width="{COLUMN_WIDTH}" height="{ROW_HEIGHT}" fill="{LATEST_FILL}"/>"#
                );
            }
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" fill="{TEXT_COLOR}" font-size="12">{} ({})</text>"#,
                column_x + 8.0,
                row_y + 15.0,
                xml_escape(&row.celebrity_name),
                row.celebrity_age
            );
        }
    }

    let _ = writeln!(svg, "</g>");
    let _ = writeln!(svg, "</svg>");
    svg
}

/// Escape the characters with markup meaning inside SVG text content.
fn xml_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use uuid::Uuid;

    use super::*;
    use crate::board::group_by_seat;

    fn roster(n: usize) -> Roster {
        Roster::new((1..=n).map(|i| format!("Player {i}")).collect())
    }

    fn row(pick_number: u32, seat: u8, name: &str, age: u32) -> BoardRow {
        BoardRow {
            pick_number,
            seat,
            player_name: format!("Player {seat}"),
            celebrity_id: Uuid::new_v4(),
            celebrity_name: name.to_string(),
            celebrity_age: age,
            picked_at: SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn small_boards_render_at_double_scale() {
        let layout = snapshot_layout(6, 4);
        assert_eq!(layout.scale, 2.0);
    }

    #[test]
    fn layout_centers_content_on_the_canvas() {
        let layout = snapshot_layout(6, 4);
        let spanned = layout.content_width * layout.scale + 2.0 * layout.offset_x;
        assert!((spanned - CANVAS_WIDTH).abs() < 0.01);
        let spanned = layout.content_height * layout.scale + 2.0 * layout.offset_y;
        assert!((spanned - CANVAS_HEIGHT).abs() < 0.01);
    }

    #[test]
    fn deep_boards_shrink_instead_of_clipping() {
        let layout = snapshot_layout(6, 200);
        assert!(layout.scale < 2.0);
        assert!(layout.offset_y >= 0.0);
        assert!(layout.content_height * layout.scale <= CANVAS_HEIGHT + 0.01);
    }

    #[test]
    fn svg_has_fixed_canvas_and_escapes_names() {
        let roster = roster(2);
        let rows = vec![row(1, 1, "Simon & Garfunkel <3", 80)];
        let grouped = group_by_seat(&roster, &rows);
        let svg = render_board_svg(&roster, &grouped, rows.first());

        assert!(svg.contains(r#"width="1920" height="1080""#));
        assert!(svg.contains("Simon &amp; Garfunkel &lt;3"));
        assert!(!svg.contains("Simon & Garfunkel <3"));
    }

    #[test]
    fn latest_pick_row_gets_the_accent_fill() {
        let roster = roster(1);
        let rows = vec![row(1, 1, "First", 50), row(2, 1, "Second", 40)];
        let grouped = group_by_seat(&roster, &rows);

        let latest = crate::board::latest_pick(&rows);
        let svg = render_board_svg(&roster, &grouped, latest);
        assert!(svg.contains(LATEST_FILL));

        let empty = render_board_svg(&roster, &group_by_seat(&roster, &[]), None);
        assert!(!empty.contains(LATEST_FILL));
    }
}
