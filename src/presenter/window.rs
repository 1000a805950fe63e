//! Cycling window state
//!
//! `CycleWindow` is a pure reducer: it holds the cached snapshot and the
//! cursor, renders frames and advances. It owns no timer and does no I/O.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::roster::{Attendance, Snapshot};

/// Placeholder shown while nobody has signed up
pub const EMPTY_ROSTER_MESSAGE: &str = "No one has RSVP'd yet. Be the first to join the fun!";

/// One visible row of the attendee display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowEntry {
    /// Index of the record in the snapshot
    pub position: usize,
    pub display_name: String,
    pub country_code: String,
    pub country_name: String,
    /// Flag image path
    pub flag: String,
    /// "{name} from {country} is joining the fun!"
    pub caption: String,
}

impl WindowEntry {
    fn from_record(position: usize, record: &Attendance) -> Self {
        Self {
            position,
            display_name: record.display_name.clone(),
            country_code: record.country_code.clone(),
            country_name: record.country_name.clone(),
            flag: record.flag_asset(),
            caption: record.caption(),
        }
    }
}

/// What the display shows for one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WindowFrame {
    /// A window of records, in display order
    Showing {
        /// Snapshot index of the first entry
        cursor: usize,
        /// Records in the snapshot
        total: usize,
        entries: Vec<WindowEntry>,
    },
    /// The roster is empty
    Empty { message: String },
}

impl WindowFrame {
    pub fn empty() -> Self {
        WindowFrame::Empty {
            message: EMPTY_ROSTER_MESSAGE.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, WindowFrame::Empty { .. })
    }

    /// Visible entries (none for the empty state)
    pub fn entries(&self) -> &[WindowEntry] {
        match self {
            WindowFrame::Showing { entries, .. } => entries,
            WindowFrame::Empty { .. } => &[],
        }
    }

    /// Snapshot positions of the visible entries
    pub fn positions(&self) -> Vec<usize> {
        self.entries().iter().map(|e| e.position).collect()
    }
}

impl Default for WindowFrame {
    fn default() -> Self {
        Self::empty()
    }
}

/// Cached snapshot plus the cursor marking the first visible record
///
/// Invariant: `cursor < records.len()` whenever the snapshot is non-empty,
/// and `cursor == 0` when it is empty.
#[derive(Debug, Clone)]
pub struct CycleWindow {
    window_size: NonZeroUsize,
    cursor: usize,
    records: Snapshot,
    primed: bool,
}

impl CycleWindow {
    pub fn new(window_size: NonZeroUsize) -> Self {
        Self {
            window_size,
            cursor: 0,
            records: Arc::from(Vec::new()),
            primed: false,
        }
    }

    /// Replace the cached snapshot
    ///
    /// The cursor restarts at 0 on the first update or when the previous
    /// snapshot was empty; otherwise it keeps its value, wrapped into the new
    /// length.
    pub fn replace(&mut self, records: Snapshot) {
        let previous_len = self.records.len();
        self.records = records;
        let len = self.records.len();

        if !self.primed || previous_len == 0 || len == 0 {
            self.cursor = 0;
        } else {
            self.cursor %= len;
        }
        self.primed = true;
    }

    /// Render the current window
    ///
    /// Positions are `(cursor + i) mod len` for `i in 0..window_size`; a
    /// roster shorter than the window repeats entries to fill it.
    pub fn render(&self) -> WindowFrame {
        let len = self.records.len();
        if len == 0 {
            return WindowFrame::empty();
        }

        let entries = (0..self.window_size.get())
            .map(|i| {
                let position = (self.cursor + i % len) % len;
                WindowEntry::from_record(position, &self.records[position])
            })
            .collect();

        WindowFrame::Showing {
            cursor: self.cursor,
            total: len,
            entries,
        }
    }

    /// Move the window start forward by one record, wrapping at the end
    pub fn advance(&mut self) {
        let len = self.records.len();
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor + 1) % len;
    }

    /// Render, then advance
    pub fn tick(&mut self) -> WindowFrame {
        let frame = self.render();
        self.advance();
        frame
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn window_size(&self) -> NonZeroUsize {
        self.window_size
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &Snapshot {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{NewAttendance, OrderingKey};

    fn roster(len: usize) -> Snapshot {
        (0..len)
            .map(|i| {
                NewAttendance::new(format!("R{}", i), "fan@example.com", "ca", "Canada")
                    .into_record(OrderingKey::new(i as i64, 0))
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn window(size: usize, len: usize) -> CycleWindow {
        let mut w = CycleWindow::new(NonZeroUsize::new(size).unwrap());
        w.replace(roster(len));
        w
    }

    fn names(frame: &WindowFrame) -> Vec<String> {
        frame
            .entries()
            .iter()
            .map(|e| e.display_name.clone())
            .collect()
    }

    #[test]
    fn test_render_scenario_sliding() {
        let mut w = window(3, 5);
        assert_eq!(w.cursor(), 0);
        assert_eq!(names(&w.render()), vec!["R0", "R1", "R2"]);

        w.advance();
        assert_eq!(w.cursor(), 1);
        assert_eq!(names(&w.render()), vec!["R1", "R2", "R3"]);
    }

    #[test]
    fn test_render_short_roster_repeats() {
        let w = window(3, 2);
        assert_eq!(names(&w.render()), vec!["R0", "R1", "R0"]);
        assert_eq!(w.render().positions(), vec![0, 1, 0]);
    }

    #[test]
    fn test_render_empty_roster() {
        let mut w = window(3, 0);
        let frame = w.render();
        assert!(frame.is_empty());
        assert_eq!(
            frame,
            WindowFrame::Empty {
                message: EMPTY_ROSTER_MESSAGE.to_string()
            }
        );

        w.advance();
        assert_eq!(w.cursor(), 0);
        assert!(w.render().is_empty());
    }

    #[test]
    fn test_render_window_larger_than_roster() {
        let mut w = window(100, 3);
        w.advance();
        w.advance();
        let positions = w.render().positions();
        assert_eq!(positions.len(), 100);
        assert_eq!(&positions[..5], &[2, 0, 1, 2, 0]);
        assert!(positions.iter().all(|&p| p < 3));
    }

    #[test]
    fn test_render_wraps_at_end() {
        let mut w = window(3, 5);
        for _ in 0..4 {
            w.advance();
        }
        assert_eq!(w.cursor(), 4);
        assert_eq!(w.render().positions(), vec![4, 0, 1]);
    }

    #[test]
    fn test_render_positions_for_every_cursor() {
        for len in 1..=7 {
            for size in 1..=5 {
                let mut w = window(size, len);
                for c in 0..len {
                    let frame = w.render();
                    let expected: Vec<usize> = (0..size).map(|i| (c + i) % len).collect();
                    assert_eq!(frame.positions(), expected, "len={} size={} c={}", len, size, c);
                    assert_eq!(frame.entries().len(), size);
                    w.advance();
                }
            }
        }
    }

    #[test]
    fn test_advance_is_cyclic() {
        for len in 1..=9 {
            let mut w = window(3, len);
            w.advance();
            w.advance();
            let start = w.cursor();
            for _ in 0..len {
                w.advance();
            }
            assert_eq!(w.cursor(), start, "len={}", len);
        }
    }

    #[test]
    fn test_every_record_leads_once_per_cycle() {
        let mut w = window(3, 6);
        let mut leaders: Vec<usize> = (0..6).map(|_| w.tick().positions()[0]).collect();
        leaders.sort_unstable();
        assert_eq!(leaders, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_replace_shrinking_list_reclamps_cursor() {
        let mut w = window(3, 5);
        for _ in 0..4 {
            w.advance();
        }
        assert_eq!(w.cursor(), 4);

        w.replace(roster(2));
        assert_eq!(w.cursor(), 0);
        assert_eq!(w.render().positions(), vec![0, 1, 0]);
    }

    #[test]
    fn test_replace_growing_list_keeps_cursor() {
        let mut w = window(3, 5);
        w.advance();
        w.advance();

        w.replace(roster(6));
        assert_eq!(w.cursor(), 2);
        assert_eq!(names(&w.render()), vec!["R2", "R3", "R4"]);
    }

    #[test]
    fn test_replace_after_empty_resets_cursor() {
        let mut w = window(3, 0);
        w.replace(roster(4));
        assert_eq!(w.cursor(), 0);

        w.advance();
        w.replace(roster(0));
        assert_eq!(w.cursor(), 0);
        w.replace(roster(4));
        assert_eq!(w.cursor(), 0);
    }

    #[test]
    fn test_first_update_starts_at_zero() {
        let mut w = CycleWindow::new(NonZeroUsize::new(3).unwrap());
        w.replace(roster(8));
        assert_eq!(w.cursor(), 0);
        assert_eq!(w.len(), 8);
    }

    #[test]
    fn test_tick_renders_then_advances() {
        let mut w = window(2, 3);
        assert_eq!(w.tick().positions(), vec![0, 1]);
        assert_eq!(w.tick().positions(), vec![1, 2]);
        assert_eq!(w.tick().positions(), vec![2, 0]);
        assert_eq!(w.cursor(), 0);
    }

    #[test]
    fn test_entry_fields() {
        let w = window(1, 1);
        let frame = w.render();
        let entry = &frame.entries()[0];
        assert_eq!(entry.country_code, "ca");
        assert_eq!(entry.flag, "img/flags/ca.png");
        assert_eq!(entry.caption, "R0 from Canada is joining the fun!");
    }

    #[test]
    fn test_frame_serialization() {
        let json = serde_json::to_string(&WindowFrame::empty()).unwrap();
        assert!(json.contains("\"state\":\"empty\""));

        let json = serde_json::to_string(&window(1, 1).render()).unwrap();
        assert!(json.contains("\"state\":\"showing\""));
        assert!(json.contains("\"total\":1"));
    }
}
