//! CSV snapshot of the grouped board, one name/age column pair per seat.

use std::time::SystemTime;

use indexmap::IndexMap;

use crate::{
    dto::format_system_time,
    state::draft::{BoardRow, Roster},
};

/// Render the grouped board as CSV text.
///
/// Header: `(PlayerName, "PlayerName Age")` per roster seat in roster order.
/// Data rows run `0..max(per-seat lengths)`; seats with fewer picks render
/// empty strings in both their columns. Field quoting and quote doubling are
/// handled by the `csv` writer.
pub fn board_to_csv(
    roster: &Roster,
    grouped: &IndexMap<u8, Vec<BoardRow>>,
) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<String> = Vec::with_capacity(roster.len() * 2);
    for slot in roster.iter() {
        header.push(slot.name.clone());
        header.push(format!("{} Age", slot.name));
    }
    writer.write_record(&header)?;

    let depth = grouped.values().map(Vec::len).max().unwrap_or(0);
    for index in 0..depth {
        let mut record: Vec<String> = Vec::with_capacity(roster.len() * 2);
        for seat in roster.seats() {
            match grouped.get(&seat).and_then(|rows| rows.get(index)) {
                Some(row) => {
                    record.push(row.celebrity_name.clone());
                    record.push(row.celebrity_age.to_string());
                }
                None => {
                    record.push(String::new());
                    record.push(String::new());
                }
            }
        }
        writer.write_record(&record)?;
    }

    writer.flush().map_err(csv::Error::from)?;
    let buffer = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Download filename for an export taken at `now`.
///
/// Embeds an RFC3339 timestamp with `:` and `T` replaced so the name is safe
/// on every filesystem.
pub fn export_filename(prefix: &str, extension: &str, now: SystemTime) -> String {
    let stamp = format_system_time(now).replace('T', "_").replace(':', "-");
    format!("{prefix}-{stamp}.{extension}")
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::board::group_by_seat;

    fn roster(names: &[&str]) -> Roster {
        Roster::new(names.iter().map(|n| (*n).to_string()).collect())
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
    fn header_has_two_columns_per_seat() {
        let roster = roster(&["Maya", "Jonas"]);
        let grouped = group_by_seat(&roster, &[]);
        let csv = board_to_csv(&roster, &grouped).unwrap();
        assert_eq!(csv.trim_end(), "Maya,Maya Age,Jonas,Jonas Age");
    }

    #[test]
    fn short_columns_pad_with_empty_cells() {
        let roster = roster(&["Maya", "Jonas"]);
        let rows = vec![
            row(1, 1, "Elder", 80),
            row(3, 1, "Young", 20),
            row(2, 2, "Solo", 40),
        ];
        let grouped = group_by_seat(&roster, &rows);
        let csv = board_to_csv(&roster, &grouped).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Elder,80,Solo,40");
        assert_eq!(lines[2], "Young,20,,");
    }

    #[test]
    fn fields_with_delimiters_are_quoted_and_doubled() {
        let roster = roster(&["Maya"]);
        let rows = vec![row(1, 1, "Cher, \"the\" icon", 78)];
        let grouped = group_by_seat(&roster, &rows);
        let csv = board_to_csv(&roster, &grouped).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "\"Cher, \"\"the\"\" icon\",78");
    }

    #[test]
    fn filename_replaces_unsafe_separators() {
        let name = export_filename("draft-board", "csv", SystemTime::UNIX_EPOCH);
        assert_eq!(name, "draft-board-1970-01-01_00-00-00Z.csv");
        assert!(!name.contains(':'));
    }
}
