// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Deterministic sample unit corpus for tests and demo mode. The same
//! input always produces the same units, so assertions can name ids.

use unitdeck_app::{DisplayRow, UnitEnablement, UnitEntry, UnitSubstate, group_rows};

const SERVICE_NAMES: [&str; 12] = [
    "acpid",
    "avahi-daemon",
    "bluetooth",
    "cron",
    "cups",
    "dbus",
    "NetworkManager",
    "nginx",
    "postgresql",
    "rsyslog",
    "sshd",
    "udisks2",
];

const SOCKET_NAMES: [&str; 4] = ["cups", "dbus", "sshd", "syslog"];

const TIMER_NAMES: [&str; 3] = ["fstrim", "logrotate", "man-db"];

const DEVICE_NAMES: [&str; 2] = ["sys-module-fuse", "dev-ttyS0"];

const ENABLEMENT_CYCLE: [UnitEnablement; 5] = [
    UnitEnablement::Enabled,
    UnitEnablement::Disabled,
    UnitEnablement::Static,
    UnitEnablement::Masked,
    UnitEnablement::Bad,
];

fn entry(
    name: &str,
    target: &str,
    enablement: UnitEnablement,
    substate: UnitSubstate,
) -> UnitEntry {
    UnitEntry {
        id: format!("{name}.{target}"),
        target: target.to_owned(),
        enablement,
        substate,
        description: format!("{name} {target} (sample)"),
    }
}

/// Flat sample corpus: services, sockets, timers, and devices with every
/// enablement state represented. Order mimics a backend result, targets
/// interleaved nowhere: services first, then sockets, timers, devices.
pub fn sample_units() -> Vec<UnitEntry> {
    let mut units = Vec::new();

    for (index, name) in SERVICE_NAMES.iter().enumerate() {
        let enablement = ENABLEMENT_CYCLE[index % ENABLEMENT_CYCLE.len()];
        let substate = if enablement == UnitEnablement::Enabled {
            UnitSubstate::Running
        } else {
            UnitSubstate::Other
        };
        units.push(entry(name, "service", enablement, substate));
    }

    for name in SOCKET_NAMES {
        units.push(entry(
            name,
            "socket",
            UnitEnablement::Enabled,
            UnitSubstate::Connected,
        ));
    }

    for (index, name) in TIMER_NAMES.iter().enumerate() {
        let enablement = if index % 2 == 0 {
            UnitEnablement::Enabled
        } else {
            UnitEnablement::Disabled
        };
        units.push(entry(name, "timer", enablement, UnitSubstate::Other));
    }

    for name in DEVICE_NAMES {
        units.push(entry(
            name,
            "device",
            UnitEnablement::Static,
            UnitSubstate::Connected,
        ));
    }

    units
}

/// The sample corpus as the grouped, header-annotated display sequence.
pub fn sample_rows() -> Vec<DisplayRow> {
    group_rows(&sample_units())
}

#[cfg(test)]
mod tests {
    use super::{sample_rows, sample_units};
    use unitdeck_app::{DisplayRow, UnitEnablement};

    #[test]
    fn corpus_is_deterministic() {
        assert_eq!(sample_units(), sample_units());
    }

    #[test]
    fn corpus_covers_every_enablement_state() {
        let units = sample_units();
        for state in [
            UnitEnablement::Enabled,
            UnitEnablement::Disabled,
            UnitEnablement::Static,
            UnitEnablement::Masked,
            UnitEnablement::Bad,
        ] {
            assert!(
                units.iter().any(|unit| unit.enablement == state),
                "missing enablement state {}",
                state.as_str(),
            );
        }
    }

    #[test]
    fn rows_start_each_group_with_a_header() {
        let rows = sample_rows();
        assert!(matches!(
            rows.first(),
            Some(DisplayRow::GroupHeader { target }) if target.as_str() == "service",
        ));
        let headers = rows
            .iter()
            .filter(|row| matches!(row, DisplayRow::GroupHeader { .. }))
            .count();
        assert_eq!(headers, 4);
    }
}
