// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use unitdeck_app::{DisplayRow, UnitEnablement, UnitEntry, UnitSubstate, group_rows};
use unitdeck_systemd::{UnitCatalog, enablement_action, runtime_action};
use unitdeck_tui::UnitDirectory;

/// The real backend: every call goes through `systemctl`.
pub struct SystemdUnits {
    catalog: UnitCatalog,
}

impl SystemdUnits {
    pub fn new(catalog: UnitCatalog) -> Self {
        Self { catalog }
    }
}

impl UnitDirectory for SystemdUnits {
    fn refresh(&mut self) -> Result<()> {
        self.catalog.fetch()
    }

    fn rows_sorted(&self) -> Vec<DisplayRow> {
        self.catalog.items_grouped()
    }

    fn toggle_enablement(&mut self, unit: &UnitEntry) -> Result<()> {
        self.catalog.toggle_unit_state(unit)
    }

    fn toggle_runtime(&mut self, unit: &UnitEntry) -> Result<()> {
        self.catalog.toggle_unit_sub_state(unit)
    }

    fn reload_daemon(&mut self) -> Result<()> {
        self.catalog.reload_daemon()
    }
}

/// In-memory backend for `--demo`: same toggle rules as the systemd one,
/// applied to the sample corpus instead of a live init system.
pub struct DemoUnits {
    units: Vec<UnitEntry>,
}

impl DemoUnits {
    pub fn new(units: Vec<UnitEntry>) -> Self {
        Self { units }
    }
}

impl UnitDirectory for DemoUnits {
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    fn rows_sorted(&self) -> Vec<DisplayRow> {
        group_rows(&self.units)
    }

    fn toggle_enablement(&mut self, unit: &UnitEntry) -> Result<()> {
        let action = enablement_action(unit)?;
        if let Some(held) = self.units.iter_mut().find(|held| held.id == unit.id) {
            held.enablement = match action {
                "enable" => UnitEnablement::Enabled,
                _ => UnitEnablement::Disabled,
            };
        }
        Ok(())
    }

    fn toggle_runtime(&mut self, unit: &UnitEntry) -> Result<()> {
        let action = runtime_action(unit);
        if let Some(held) = self.units.iter_mut().find(|held| held.id == unit.id) {
            held.substate = match action {
                "start" => UnitSubstate::Running,
                _ => UnitSubstate::Other,
            };
        }
        Ok(())
    }

    fn reload_daemon(&mut self) -> Result<()> {
        Ok(())
    }
}
