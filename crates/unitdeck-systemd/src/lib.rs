// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Synchronous systemd backend: queries and mutates unit state by running
//! `systemctl` and parsing its tabular output. Every call blocks until the
//! underlying command finishes; failures carry systemd's own message so the
//! UI can surface it verbatim.

pub mod parse;

use anyhow::{Context, Result, bail};
use std::process::Command;

use unitdeck_app::{DisplayRow, UnitEnablement, UnitEntry, UnitSubstate, group_rows};

pub const APP_NAME: &str = "unitdeck";

/// Which systemd manager instance to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemdScope {
    #[default]
    System,
    User,
}

/// Snapshot of the unit-file universe plus the operations against it.
///
/// `fetch` replaces the snapshot idempotently; the accessors never touch
/// systemd. Kept in backend result order so grouping reflects first
/// appearance, the order the init system reported.
#[derive(Debug, Default)]
pub struct UnitCatalog {
    scope: SystemdScope,
    units: Vec<UnitEntry>,
}

impl UnitCatalog {
    pub fn new(scope: SystemdScope) -> Self {
        Self {
            scope,
            units: Vec::new(),
        }
    }

    /// Catalog over a fixed snapshot, for tests and demo mode.
    pub fn with_units(scope: SystemdScope, units: Vec<UnitEntry>) -> Self {
        Self { scope, units }
    }

    pub const fn scope(&self) -> SystemdScope {
        self.scope
    }

    /// Re-query systemd and replace the snapshot.
    pub fn fetch(&mut self) -> Result<()> {
        let files = self.systemctl(&[
            "list-unit-files",
            "--no-legend",
            "--no-pager",
            "--plain",
            "--full",
        ])?;
        let units = self.systemctl(&[
            "list-units",
            "--all",
            "--no-legend",
            "--no-pager",
            "--plain",
            "--full",
        ])?;
        self.units = parse::merge_units(parse::parse_unit_files(&files), parse::parse_units(&units));
        Ok(())
    }

    /// Flat unit list, sorted case-insensitively by id.
    pub fn items(&self) -> Vec<UnitEntry> {
        let mut items = self.units.clone();
        items.sort_by(|a, b| a.id.to_lowercase().cmp(&b.id.to_lowercase()));
        items
    }

    /// Flat unit list narrowed to one target, sorted case-insensitively.
    pub fn items_by_target(&self, target: &str) -> Vec<UnitEntry> {
        let mut items: Vec<UnitEntry> = self
            .units
            .iter()
            .filter(|unit| unit.target == target)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.to_lowercase().cmp(&b.id.to_lowercase()));
        items
    }

    /// Header-annotated row sequence: one header per target group, groups
    /// in first-appearance order of the snapshot.
    pub fn items_grouped(&self) -> Vec<DisplayRow> {
        group_rows(&self.units)
    }

    /// Flip a unit's boot-time enablement. Static and masked units cannot
    /// be toggled; the caller re-fetches after success.
    pub fn toggle_unit_state(&self, unit: &UnitEntry) -> Result<()> {
        let action = enablement_action(unit)?;
        self.systemctl(&[action, &unit.id])?;
        Ok(())
    }

    /// Start or stop a unit depending on its current substate.
    pub fn toggle_unit_sub_state(&self, unit: &UnitEntry) -> Result<()> {
        self.systemctl(&[runtime_action(unit), &unit.id])?;
        Ok(())
    }

    /// Ask systemd to re-read unit definitions from disk.
    pub fn reload_daemon(&self) -> Result<()> {
        self.systemctl(&["daemon-reload"])?;
        Ok(())
    }

    fn systemctl(&self, args: &[&str]) -> Result<String> {
        let mut command = Command::new("systemctl");
        if self.scope == SystemdScope::User {
            command.arg("--user");
        }
        let output = command
            .args(args)
            .output()
            .with_context(|| format!("run systemctl {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr.lines().next().unwrap_or("").trim();
            if message.is_empty() {
                bail!("systemctl {} failed with {}", args.join(" "), output.status);
            }
            bail!("{message}");
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// The `systemctl` verb that flips a unit's enablement, or an error for
/// states the init system refuses to toggle.
pub fn enablement_action(unit: &UnitEntry) -> Result<&'static str> {
    match unit.enablement {
        UnitEnablement::Enabled => Ok("disable"),
        UnitEnablement::Disabled | UnitEnablement::Bad => Ok("enable"),
        UnitEnablement::Static => {
            bail!("{} is static and cannot be enabled or disabled", unit.id)
        }
        UnitEnablement::Masked => bail!("{} is masked; unmask it first", unit.id),
    }
}

/// The `systemctl` verb that flips a unit's runtime state.
pub const fn runtime_action(unit: &UnitEntry) -> &'static str {
    match unit.substate {
        UnitSubstate::Running => "stop",
        UnitSubstate::Connected | UnitSubstate::Other => "start",
    }
}
