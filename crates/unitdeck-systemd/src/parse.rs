// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use unitdeck_app::{UnitEnablement, UnitEntry, UnitSubstate};

/// Runtime information for one unit from `systemctl list-units`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeStatus {
    pub id: String,
    pub substate: UnitSubstate,
    pub description: String,
}

/// Parse `systemctl list-unit-files --no-legend` output into id/state
/// pairs. The preset column, present on newer systemd, is ignored.
pub fn parse_unit_files(output: &str) -> Vec<(String, UnitEnablement)> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let id = fields.next()?;
            let state = fields.next()?;
            Some((id.to_owned(), map_enablement(state)))
        })
        .collect()
}

/// Parse `systemctl list-units --all --no-legend` output. Lines for failed
/// units may carry a leading bullet even in plain mode; it is stripped.
pub fn parse_units(output: &str) -> Vec<RuntimeStatus> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim_start_matches(['\u{25cf}', '*', ' ']);
            let mut fields = line.split_whitespace();
            let id = fields.next()?;
            let _load = fields.next()?;
            let _active = fields.next()?;
            let sub = fields.next()?;
            let description = fields.collect::<Vec<&str>>().join(" ");
            Some(RuntimeStatus {
                id: id.to_owned(),
                substate: map_substate(sub),
                description,
            })
        })
        .collect()
}

/// Join the unit-file snapshot with runtime information. Units without a
/// loaded runtime record keep the quiet substate and an empty description.
pub fn merge_units(
    files: Vec<(String, UnitEnablement)>,
    statuses: Vec<RuntimeStatus>,
) -> Vec<UnitEntry> {
    let mut by_id: BTreeMap<String, RuntimeStatus> = statuses
        .into_iter()
        .map(|status| (status.id.clone(), status))
        .collect();

    files
        .into_iter()
        .map(|(id, enablement)| {
            let status = by_id.remove(&id);
            let target = target_of(&id).to_owned();
            let (substate, description) = match status {
                Some(status) => (status.substate, status.description),
                None => (UnitSubstate::Other, String::new()),
            };
            UnitEntry {
                id,
                target,
                enablement,
                substate,
                description,
            }
        })
        .collect()
}

/// Grouping category of a unit: the suffix after the last dot of its id.
pub fn target_of(id: &str) -> &str {
    id.rsplit_once('.').map_or("unit", |(_, suffix)| suffix)
}

fn map_enablement(state: &str) -> UnitEnablement {
    match state {
        "enabled" | "enabled-runtime" => UnitEnablement::Enabled,
        "disabled" => UnitEnablement::Disabled,
        "static" => UnitEnablement::Static,
        "masked" | "masked-runtime" => UnitEnablement::Masked,
        _ => UnitEnablement::Bad,
    }
}

fn map_substate(sub: &str) -> UnitSubstate {
    match sub {
        "running" => UnitSubstate::Running,
        "listening" | "plugged" | "mounted" => UnitSubstate::Connected,
        _ => UnitSubstate::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::{merge_units, parse_unit_files, parse_units, target_of};
    use unitdeck_app::{UnitEnablement, UnitSubstate};

    const UNIT_FILES: &str = "\
acpid.service                 enabled         enabled
bluetooth.service             disabled        enabled
dbus.service                  static          -
nscd.service                  masked          disabled
proc-sys-fs.mount             generated       -

sshd.socket                   enabled-runtime enabled
";

    const UNITS: &str = "\
acpid.service        loaded active   running ACPI event daemon
dbus.service         loaded active   running D-Bus System Message Bus
sshd.socket          loaded active   listening OpenSSH Server Socket
sys-module.device    loaded active   plugged   /sys/module
\u{25cf} nscd.service       loaded failed   failed  Name Service Cache Daemon
";

    #[test]
    fn parse_unit_files_maps_states_and_skips_blank_lines() {
        let parsed = parse_unit_files(UNIT_FILES);
        assert_eq!(parsed.len(), 6);
        assert_eq!(
            parsed[0],
            ("acpid.service".to_owned(), UnitEnablement::Enabled),
        );
        assert_eq!(
            parsed[1],
            ("bluetooth.service".to_owned(), UnitEnablement::Disabled),
        );
        assert_eq!(parsed[2].1, UnitEnablement::Static);
        assert_eq!(parsed[3].1, UnitEnablement::Masked);
        assert_eq!(parsed[4].1, UnitEnablement::Bad);
        assert_eq!(parsed[5].1, UnitEnablement::Enabled);
    }

    #[test]
    fn parse_units_reads_substate_and_description() {
        let parsed = parse_units(UNITS);
        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed[0].id, "acpid.service");
        assert_eq!(parsed[0].substate, UnitSubstate::Running);
        assert_eq!(parsed[0].description, "ACPI event daemon");
        assert_eq!(parsed[2].substate, UnitSubstate::Connected);
        assert_eq!(parsed[3].substate, UnitSubstate::Connected);
    }

    #[test]
    fn parse_units_strips_failed_unit_bullet() {
        let parsed = parse_units(UNITS);
        assert_eq!(parsed[4].id, "nscd.service");
        assert_eq!(parsed[4].substate, UnitSubstate::Other);
    }

    #[test]
    fn merge_units_joins_runtime_info_by_id() {
        let merged = merge_units(parse_unit_files(UNIT_FILES), parse_units(UNITS));
        assert_eq!(merged.len(), 6);

        let acpid = &merged[0];
        assert_eq!(acpid.id, "acpid.service");
        assert_eq!(acpid.target, "service");
        assert_eq!(acpid.substate, UnitSubstate::Running);
        assert_eq!(acpid.description, "ACPI event daemon");

        // No runtime record: quiet substate, empty description.
        let bluetooth = &merged[1];
        assert_eq!(bluetooth.substate, UnitSubstate::Other);
        assert_eq!(bluetooth.description, "");
    }

    #[test]
    fn target_of_takes_the_last_suffix() {
        assert_eq!(target_of("sshd.service"), "service");
        assert_eq!(target_of("proc-sys-fs.mount"), "mount");
        assert_eq!(target_of("dev-disk-by\\x2dlabel.device"), "device");
        assert_eq!(target_of("nodots"), "unit");
    }
}
