//! Board aggregation: pure grouping and ordering of pick rows, shared by the
//! board routes, the exports, and the projection.

pub mod csv;
pub mod image;

use indexmap::IndexMap;

use crate::state::draft::{BoardRow, Roster};

/// Group an unordered collection of rows into an ordered per-seat board.
///
/// Every roster seat is present in the result, empty seats included, in
/// roster order. Within a seat rows are sorted by descending celebrity age,
/// ties broken by ascending case-sensitive celebrity name, so the result is
/// deterministic regardless of arrival order. Rows referencing a seat not on
/// the roster are dropped.
pub fn group_by_seat(roster: &Roster, rows: &[BoardRow]) -> IndexMap<u8, Vec<BoardRow>> {
    let mut grouped: IndexMap<u8, Vec<BoardRow>> =
        roster.seats().map(|seat| (seat, Vec::new())).collect();

    for row in rows {
        if let Some(bucket) = grouped.get_mut(&row.seat) {
            bucket.push(row.clone());
        }
    }

    for bucket in grouped.values_mut() {
        sort_seat_rows(bucket);
    }

    grouped
}

/// Order rows within one seat: descending age, then ascending name.
pub fn sort_seat_rows(rows: &mut [BoardRow]) {
    rows.sort_by(|a, b| {
        b.celebrity_age
            .cmp(&a.celebrity_age)
            .then_with(|| a.celebrity_name.cmp(&b.celebrity_name))
    });
}

/// The most recent pick across the entire collection: the row with the
/// maximum pick number, or `None` when the collection is empty.
pub fn latest_pick(rows: &[BoardRow]) -> Option<&BoardRow> {
    rows.iter().max_by_key(|row| row.pick_number)
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use uuid::Uuid;

    use super::*;

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

    fn names(rows: &[BoardRow]) -> Vec<&str> {
        rows.iter().map(|r| r.celebrity_name.as_str()).collect()
    }

    #[test]
    fn every_seat_is_present_even_when_empty() {
        let grouped = group_by_seat(&roster(3), &[row(1, 2, "Ada", 36)]);
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(grouped[&1].is_empty());
        assert_eq!(grouped[&2].len(), 1);
    }

    #[test]
    fn seat_rows_sort_by_age_then_name() {
        let rows = vec![
            row(1, 1, "Young", 20),
            row(2, 1, "Bravo", 50),
            row(3, 1, "Alpha", 50),
            row(4, 1, "Elder", 80),
        ];
        let grouped = group_by_seat(&roster(1), &rows);
        assert_eq!(names(&grouped[&1]), vec!["Elder", "Alpha", "Bravo", "Young"]);
    }

    #[test]
    fn name_tiebreak_is_case_sensitive() {
        let rows = vec![row(1, 1, "alpha", 50), row(2, 1, "Bravo", 50)];
        let grouped = group_by_seat(&roster(1), &rows);
        // Uppercase sorts before lowercase in a case-sensitive comparison.
        assert_eq!(names(&grouped[&1]), vec!["Bravo", "alpha"]);
    }

    #[test]
    fn grouping_is_independent_of_arrival_order() {
        let mut rows = vec![
            row(1, 1, "Young", 20),
            row(2, 2, "Solo", 40),
            row(3, 1, "Elder", 80),
            row(4, 1, "Mid", 50),
        ];
        let forward = group_by_seat(&roster(2), &rows);
        rows.reverse();
        let backward = group_by_seat(&roster(2), &rows);
        assert_eq!(forward, backward);
    }

    #[test]
    fn sorting_is_idempotent() {
        let rows = vec![
            row(1, 1, "Young", 20),
            row(2, 1, "Elder", 80),
            row(3, 1, "Mid", 50),
        ];
        let once = group_by_seat(&roster(1), &rows);
        let twice = group_by_seat(&roster(1), &once[&1]);
        assert_eq!(once[&1], twice[&1]);
    }

    #[test]
    fn rows_for_unknown_seats_are_dropped() {
        let grouped = group_by_seat(&roster(2), &[row(1, 9, "Ghost", 30)]);
        assert!(grouped.values().all(|bucket| bucket.is_empty()));
        assert!(!grouped.contains_key(&9));
    }

    #[test]
    fn latest_pick_is_the_global_maximum() {
        let rows = vec![
            row(3, 2, "Third", 30),
            row(1, 1, "First", 80),
            row(2, 1, "Second", 50),
        ];
        let latest = latest_pick(&rows).unwrap();
        assert_eq!(latest.pick_number, 3);
        assert_eq!(latest.celebrity_name, "Third");
    }

    #[test]
    fn latest_pick_of_empty_board_is_none() {
        assert!(latest_pick(&[]).is_none());
    }
}
