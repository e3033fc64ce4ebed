// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::DisplayRow;
use crate::viewport::ViewportState;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid pattern: {0}")]
    InvalidPattern(regex::Error),
    #[error("no matches found")]
    NoMatch,
}

/// Pattern filter over the active row set.
///
/// Filtering is non-destructive: [`FilterState::clear`] only leaves
/// filtered mode; the caller restores the full grouped list by re-fetching
/// from the unit directory, never by undoing the transform.
#[derive(Debug, Default)]
pub struct FilterState {
    pattern: Option<Regex>,
    filtered: bool,
}

impl FilterState {
    pub const fn is_filtered(&self) -> bool {
        self.filtered
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }

    /// Narrow the viewport to the flat, header-free list of units whose id
    /// matches `pattern`. The row set is replaced only on success; a
    /// malformed pattern or an empty match leaves it untouched.
    pub fn apply(
        &mut self,
        pattern: &str,
        viewport: &mut ViewportState,
    ) -> Result<usize, FilterError> {
        let regex = Regex::new(pattern).map_err(FilterError::InvalidPattern)?;

        let matches: Vec<DisplayRow> = viewport
            .rows()
            .iter()
            .filter_map(DisplayRow::as_unit)
            .filter(|unit| regex.is_match(&unit.id))
            .cloned()
            .map(DisplayRow::Unit)
            .collect();

        if matches.is_empty() {
            return Err(FilterError::NoMatch);
        }

        let count = matches.len();
        viewport.set_rows(matches);
        self.pattern = Some(regex);
        self.filtered = true;
        Ok(count)
    }

    /// Leave filtered mode. The viewport still holds the narrowed rows
    /// until the caller re-fetches.
    pub fn clear(&mut self) {
        self.pattern = None;
        self.filtered = false;
    }
}
