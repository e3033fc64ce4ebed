// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// Whether a unit starts at boot, as reported by the init system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitEnablement {
    Enabled,
    Disabled,
    Static,
    Masked,
    Bad,
}

impl UnitEnablement {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::Static => "static",
            Self::Masked => "masked",
            Self::Bad => "bad",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "enabled" => Some(Self::Enabled),
            "disabled" => Some(Self::Disabled),
            "static" => Some(Self::Static),
            "masked" => Some(Self::Masked),
            "bad" => Some(Self::Bad),
            _ => None,
        }
    }
}

/// Live status of a unit, reduced to what the list view distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSubstate {
    Running,
    Connected,
    Other,
}

impl UnitSubstate {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Connected => "connected",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "running" => Some(Self::Running),
            "connected" => Some(Self::Connected),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// A single manageable unit as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitEntry {
    pub id: String,
    pub target: String,
    pub enablement: UnitEnablement,
    pub substate: UnitSubstate,
    pub description: String,
}

/// One row of the list: either a selectable unit or a non-selectable
/// group header introducing a target group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayRow {
    Unit(UnitEntry),
    GroupHeader { target: String },
}

impl DisplayRow {
    pub const fn is_unit(&self) -> bool {
        matches!(self, Self::Unit(_))
    }

    pub const fn as_unit(&self) -> Option<&UnitEntry> {
        match self {
            Self::Unit(entry) => Some(entry),
            Self::GroupHeader { .. } => None,
        }
    }
}

/// Group a flat unit list into the header-annotated display sequence.
///
/// Groups appear in first-appearance order of their target; unit rows are
/// sorted case-insensitively by id within each group.
pub fn group_rows(units: &[UnitEntry]) -> Vec<DisplayRow> {
    let mut targets: Vec<&str> = Vec::new();
    for unit in units {
        if !targets.iter().any(|target| *target == unit.target) {
            targets.push(&unit.target);
        }
    }

    let mut rows = Vec::with_capacity(units.len() + targets.len());
    for target in targets {
        rows.push(DisplayRow::GroupHeader {
            target: target.to_owned(),
        });
        let mut members: Vec<&UnitEntry> =
            units.iter().filter(|unit| unit.target == target).collect();
        members.sort_by(|a, b| a.id.to_lowercase().cmp(&b.id.to_lowercase()));
        rows.extend(members.into_iter().cloned().map(DisplayRow::Unit));
    }
    rows
}
