// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{DisplayRow, UnitEntry};

/// Rows of the terminal reserved for chrome around the unit list: the
/// header block, the status block, and the list borders.
pub const RESERVED_ROWS: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
}

/// The scrollable window over the row universe.
///
/// `scroll` is the index of the first visible row; `selected` is the
/// highlight offset within the window. Whenever the universe contains at
/// least one unit row, the highlighted row is a unit row, never a group
/// header, and both offsets stay inside the window and the universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportState {
    rows: Vec<DisplayRow>,
    scroll: usize,
    selected: usize,
    width: u16,
    height: u16,
}

impl ViewportState {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            rows: Vec::new(),
            scroll: 0,
            selected: 0,
            width,
            height,
        }
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub const fn scroll(&self) -> usize {
        self.scroll
    }

    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of list slots the current geometry can show, never zero.
    pub fn visible_height(&self) -> usize {
        usize::from(self.height.saturating_sub(RESERVED_ROWS)).max(1)
    }

    /// The currently highlighted unit, if the highlight rests on one.
    pub fn selected_unit(&self) -> Option<&UnitEntry> {
        self.rows
            .get(self.scroll + self.selected)
            .and_then(DisplayRow::as_unit)
    }

    /// Visible slice of the universe with each row's window slot.
    pub fn visible_rows(&self) -> impl Iterator<Item = (usize, &DisplayRow)> {
        let end = (self.scroll + self.visible_height()).min(self.rows.len());
        self.rows
            .get(self.scroll..end)
            .unwrap_or_default()
            .iter()
            .enumerate()
    }

    /// Position indicator counting unit rows only: 1-based ordinal of the
    /// highlighted unit and the total unit count.
    pub fn position(&self) -> (usize, usize) {
        let abs = self.scroll + self.selected;
        let mut ordinal = 0;
        let mut total = 0;
        for (index, row) in self.rows.iter().enumerate() {
            if row.is_unit() {
                total += 1;
                if index <= abs {
                    ordinal += 1;
                }
            }
        }
        (ordinal, total)
    }

    /// Replace the universe and normalize the window to its first unit row.
    pub fn set_rows(&mut self, rows: Vec<DisplayRow>) {
        self.rows = rows;
        self.scroll = 0;
        self.selected = 0;
        if self.has_units() {
            self.settle_down();
        }
    }

    pub fn apply(&mut self, command: NavCommand) {
        match command {
            NavCommand::MoveUp => self.move_up(),
            NavCommand::MoveDown => self.move_down(),
            NavCommand::PageUp => self.page_up(),
            NavCommand::PageDown => self.page_down(),
        }
    }

    /// Move the highlight one unit row up. While the highlight sits above
    /// the window midpoint and earlier rows exist, the window scrolls
    /// instead, keeping the highlight near the middle. Group headers are
    /// skipped by a bounded walk; hitting the top on a header falls forward
    /// to the nearest unit row below.
    pub fn move_up(&mut self) {
        if !self.has_units() {
            return;
        }
        let mut guard = self.rows.len();
        while guard > 0 {
            if !self.step_up() {
                break;
            }
            guard -= 1;
            if self.current_is_unit() {
                return;
            }
        }
        self.settle_down();
    }

    /// Mirror of [`Self::move_up`]: advance the highlight until the window
    /// midpoint, then scroll; at list end the highlight clamps on the last
    /// reachable unit row.
    pub fn move_down(&mut self) {
        if !self.has_units() {
            return;
        }
        let mut guard = self.rows.len();
        while guard > 0 {
            if !self.step_down() {
                break;
            }
            guard -= 1;
            if self.current_is_unit() {
                return;
            }
        }
        self.settle_up();
    }

    /// Shift the window up by one page. The scroll offset floors at zero,
    /// never wrapping negative.
    pub fn page_up(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let page = self.visible_height();
        self.scroll = self.scroll.saturating_sub(page);
        self.clamp_selected();
        self.settle_from_header(true);
    }

    /// Shift the window down by one page, clamped so the window never runs
    /// past the end of the universe.
    pub fn page_down(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let page = self.visible_height();
        self.scroll = (self.scroll + page).min(self.max_scroll());
        self.clamp_selected();
        self.settle_from_header(false);
    }

    /// Adopt a new geometry. If the highlighted row no longer fits the
    /// window, the window is re-rooted so that row becomes the first
    /// visible one; the user's place is never lost, only which row is
    /// "first visible" may change.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        if self.rows.is_empty() {
            self.scroll = 0;
            self.selected = 0;
            return;
        }

        let page = self.visible_height();
        let last = self.rows.len() - 1;
        if self.selected >= page {
            self.scroll = (self.scroll + self.selected).min(last);
            self.selected = 0;
        }

        let max_scroll = self.max_scroll();
        if self.scroll > max_scroll {
            let abs = (self.scroll + self.selected).min(last);
            self.scroll = max_scroll;
            self.selected = abs - max_scroll;
        }
        self.clamp_selected();
        self.settle_from_header(false);
    }

    fn has_units(&self) -> bool {
        self.rows.iter().any(DisplayRow::is_unit)
    }

    fn current_is_unit(&self) -> bool {
        self.rows
            .get(self.scroll + self.selected)
            .is_some_and(DisplayRow::is_unit)
    }

    fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(self.visible_height())
    }

    fn clamp_selected(&mut self) {
        let last = self.rows.len().saturating_sub(1);
        self.selected = self
            .selected
            .min(self.visible_height() - 1)
            .min(last.saturating_sub(self.scroll));
    }

    /// One step toward the top: scroll while the highlight is above the
    /// window midpoint, otherwise move the highlight. Returns false once
    /// the very first row is highlighted.
    fn step_up(&mut self) -> bool {
        let mid = self.visible_height() / 2;
        if self.scroll > 0 && self.selected < mid {
            self.scroll -= 1;
            true
        } else if self.selected > 0 {
            self.selected -= 1;
            true
        } else if self.scroll > 0 {
            self.scroll -= 1;
            true
        } else {
            false
        }
    }

    /// One step toward the end: move the highlight until the window
    /// midpoint while further scrolling is possible, then scroll; once the
    /// window bottom reaches the end, only the highlight advances. Returns
    /// false once the very last row is highlighted.
    fn step_down(&mut self) -> bool {
        let page = self.visible_height();
        let last = self.rows.len().saturating_sub(1);
        if self.scroll + self.selected >= last {
            return false;
        }
        if self.scroll + page < self.rows.len() {
            let mid = page / 2;
            if self.selected < mid {
                self.selected += 1;
            } else {
                self.scroll += 1;
            }
        } else {
            self.selected = (self.selected + 1).min(page - 1).min(last - self.scroll);
        }
        true
    }

    fn settle_down(&mut self) {
        let mut guard = self.rows.len();
        while guard > 0 && !self.current_is_unit() {
            if !self.step_down() {
                break;
            }
            guard -= 1;
        }
    }

    fn settle_up(&mut self) {
        let mut guard = self.rows.len();
        while guard > 0 && !self.current_is_unit() {
            if !self.step_up() {
                break;
            }
            guard -= 1;
        }
    }

    /// Leave a header the page motions may have landed on, preferring the
    /// given direction and falling back to the other at a boundary.
    fn settle_from_header(&mut self, prefer_up: bool) {
        if !self.has_units() || self.current_is_unit() {
            return;
        }
        if prefer_up {
            self.settle_up();
            if !self.current_is_unit() {
                self.settle_down();
            }
        } else {
            self.settle_down();
            if !self.current_is_unit() {
                self.settle_up();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NavCommand, RESERVED_ROWS, ViewportState};
    use crate::model::{DisplayRow, UnitEnablement, UnitEntry, UnitSubstate};

    fn unit(id: &str) -> DisplayRow {
        DisplayRow::Unit(UnitEntry {
            id: id.to_owned(),
            target: "service".to_owned(),
            enablement: UnitEnablement::Enabled,
            substate: UnitSubstate::Running,
            description: format!("{id} description"),
        })
    }

    fn header(target: &str) -> DisplayRow {
        DisplayRow::GroupHeader {
            target: target.to_owned(),
        }
    }

    fn viewport_with(rows: Vec<DisplayRow>, height: u16) -> ViewportState {
        let mut viewport = ViewportState::new(80, height);
        viewport.set_rows(rows);
        viewport
    }

    fn mixed_universe() -> Vec<DisplayRow> {
        let mut rows = vec![header("service")];
        for index in 0..20 {
            rows.push(unit(&format!("svc{index:02}.service")));
        }
        rows.push(header("socket"));
        for index in 0..5 {
            rows.push(unit(&format!("sock{index}.socket")));
        }
        rows
    }

    fn assert_invariants(viewport: &ViewportState) {
        let page = viewport.visible_height();
        assert!(viewport.selected() < page, "selected within window");
        assert!(
            viewport.scroll() + viewport.selected() < viewport.rows().len(),
            "highlight within universe",
        );
        if viewport.rows().len() > page {
            assert!(
                viewport.scroll() + page <= viewport.rows().len(),
                "window within universe",
            );
        }
        assert!(
            viewport.selected_unit().is_some(),
            "highlight rests on a unit row",
        );
    }

    #[test]
    fn set_rows_lands_on_first_unit_row() {
        let viewport = viewport_with(mixed_universe(), RESERVED_ROWS + 10);
        assert_eq!(viewport.scroll(), 0);
        assert_eq!(viewport.selected(), 1);
        assert_eq!(
            viewport.selected_unit().map(|unit| unit.id.as_str()),
            Some("svc00.service"),
        );
    }

    #[test]
    fn move_down_skips_group_header_between_groups() {
        let rows = vec![
            header("service"),
            unit("a.service"),
            unit("z.service"),
            header("socket"),
            unit("s.socket"),
        ];
        let mut viewport = viewport_with(rows, RESERVED_ROWS + 10);
        viewport.move_down();
        viewport.move_down();
        assert_eq!(
            viewport.selected_unit().map(|unit| unit.id.as_str()),
            Some("s.socket"),
        );
        assert_invariants(&viewport);
    }

    #[test]
    fn move_down_never_lands_on_leading_header() {
        let rows = vec![header("service"), unit("a.service"), unit("z.service")];
        let mut viewport = viewport_with(rows, RESERVED_ROWS + 10);
        assert_eq!(viewport.scroll() + viewport.selected(), 1);

        viewport.move_down();
        assert_eq!(viewport.scroll() + viewport.selected(), 2);
        assert_invariants(&viewport);
    }

    #[test]
    fn move_up_from_first_unit_stays_on_it() {
        let rows = vec![header("service"), unit("a.service"), unit("z.service")];
        let mut viewport = viewport_with(rows, RESERVED_ROWS + 10);
        viewport.move_up();
        assert_eq!(
            viewport.selected_unit().map(|unit| unit.id.as_str()),
            Some("a.service"),
        );
        assert_invariants(&viewport);
    }

    #[test]
    fn move_down_clamps_at_list_end() {
        let rows = vec![header("service"), unit("a.service"), unit("z.service")];
        let mut viewport = viewport_with(rows, RESERVED_ROWS + 10);
        for _ in 0..10 {
            viewport.move_down();
        }
        assert_eq!(
            viewport.selected_unit().map(|unit| unit.id.as_str()),
            Some("z.service"),
        );
        assert_invariants(&viewport);
    }

    #[test]
    fn navigation_walk_preserves_invariants() {
        let mut viewport = viewport_with(mixed_universe(), RESERVED_ROWS + 6);
        let walk = [
            NavCommand::MoveDown,
            NavCommand::MoveDown,
            NavCommand::PageDown,
            NavCommand::MoveUp,
            NavCommand::PageDown,
            NavCommand::PageDown,
            NavCommand::PageDown,
            NavCommand::MoveDown,
            NavCommand::PageUp,
            NavCommand::MoveUp,
            NavCommand::PageUp,
            NavCommand::PageUp,
            NavCommand::MoveUp,
        ];
        for command in walk {
            viewport.apply(command);
            assert_invariants(&viewport);
        }
    }

    #[test]
    fn long_scroll_keeps_highlight_near_midpoint() {
        let mut viewport = viewport_with(mixed_universe(), RESERVED_ROWS + 8);
        for _ in 0..12 {
            viewport.move_down();
        }
        // Window has scrolled: the highlight is pinned at the midpoint.
        assert!(viewport.scroll() > 0);
        assert_eq!(viewport.selected(), viewport.visible_height() / 2);
        assert_invariants(&viewport);
    }

    #[test]
    fn page_up_at_top_floors_at_zero() {
        let mut viewport = viewport_with(mixed_universe(), RESERVED_ROWS + 6);
        viewport.page_up();
        assert_eq!(viewport.scroll(), 0);
        assert_invariants(&viewport);
    }

    #[test]
    fn page_down_with_short_tail_clamps_window() {
        let rows = vec![
            header("service"),
            unit("a.service"),
            unit("b.service"),
            unit("c.service"),
        ];
        let mut viewport = viewport_with(rows, RESERVED_ROWS + 10);
        viewport.page_down();
        viewport.page_down();
        assert_eq!(viewport.scroll(), 0);
        assert_invariants(&viewport);
    }

    #[test]
    fn page_down_landing_on_header_steps_past_it() {
        let mut rows = vec![header("service")];
        for index in 0..6 {
            rows.push(unit(&format!("svc{index}.service")));
        }
        rows.push(header("socket"));
        rows.push(unit("only.socket"));
        // visible_height is 4; paging from the last slot of the first
        // window lands exactly on the second header.
        let mut viewport = viewport_with(rows, RESERVED_ROWS + 4);
        viewport.selected = 3;
        viewport.page_down();
        assert_eq!(
            viewport.selected_unit().map(|unit| unit.id.as_str()),
            Some("only.socket"),
        );
        assert_invariants(&viewport);
    }

    #[test]
    fn resize_reroots_window_when_highlight_falls_outside() {
        let mut rows = Vec::new();
        for index in 0..60 {
            rows.push(unit(&format!("svc{index:02}.service")));
        }
        let mut viewport = ViewportState::new(80, RESERVED_ROWS + 12);
        viewport.set_rows(rows);
        viewport.scroll = 35;
        viewport.selected = 5;

        viewport.resize(80, RESERVED_ROWS + 4);
        assert_eq!(viewport.scroll(), 40);
        assert_eq!(viewport.selected(), 0);
        assert_eq!(
            viewport.selected_unit().map(|unit| unit.id.as_str()),
            Some("svc40.service"),
        );
        assert_invariants(&viewport);
    }

    #[test]
    fn resize_keeps_place_when_highlight_still_fits() {
        let mut rows = Vec::new();
        for index in 0..60 {
            rows.push(unit(&format!("svc{index:02}.service")));
        }
        let mut viewport = ViewportState::new(80, RESERVED_ROWS + 12);
        viewport.set_rows(rows);
        viewport.scroll = 35;
        viewport.selected = 5;

        viewport.resize(80, RESERVED_ROWS + 10);
        assert_eq!(viewport.scroll(), 35);
        assert_eq!(viewport.selected(), 5);
        assert_invariants(&viewport);
    }

    #[test]
    fn resize_near_list_end_clamps_without_losing_place() {
        let mut rows = Vec::new();
        for index in 0..20 {
            rows.push(unit(&format!("svc{index:02}.service")));
        }
        let mut viewport = ViewportState::new(80, RESERVED_ROWS + 4);
        viewport.set_rows(rows);
        viewport.scroll = 16;
        viewport.selected = 3;

        viewport.resize(80, RESERVED_ROWS + 30);
        assert_eq!(
            viewport.selected_unit().map(|unit| unit.id.as_str()),
            Some("svc19.service"),
        );
        assert_invariants(&viewport);
    }

    #[test]
    fn empty_universe_ignores_navigation() {
        let mut viewport = ViewportState::new(80, RESERVED_ROWS + 10);
        viewport.move_up();
        viewport.move_down();
        viewport.page_up();
        viewport.page_down();
        viewport.resize(40, RESERVED_ROWS + 2);
        assert_eq!(viewport.scroll(), 0);
        assert_eq!(viewport.selected(), 0);
        assert!(viewport.selected_unit().is_none());
    }

    #[test]
    fn all_header_universe_never_panics() {
        let rows = vec![header("service"), header("socket"), header("timer")];
        let mut viewport = viewport_with(rows, RESERVED_ROWS + 2);
        viewport.move_down();
        viewport.move_up();
        viewport.page_down();
        viewport.page_up();
        viewport.resize(20, RESERVED_ROWS + 1);
        assert!(viewport.selected_unit().is_none());
    }

    #[test]
    fn position_counts_unit_rows_only() {
        let rows = vec![
            header("service"),
            unit("a.service"),
            unit("z.service"),
            header("socket"),
            unit("s.socket"),
        ];
        let mut viewport = viewport_with(rows, RESERVED_ROWS + 10);
        assert_eq!(viewport.position(), (1, 3));

        viewport.move_down();
        assert_eq!(viewport.position(), (2, 3));

        viewport.move_down();
        assert_eq!(viewport.position(), (3, 3));
    }

    #[test]
    fn tiny_terminal_keeps_one_visible_slot() {
        let mut viewport = viewport_with(mixed_universe(), 3);
        assert_eq!(viewport.visible_height(), 1);
        viewport.move_down();
        viewport.move_down();
        assert_invariants(&viewport);
    }
}
