//! Aggregates shown above the maintenance table.
//!
//! Computed over the records currently passing filters and search, so the
//! cards always agree with what the table can page through.

use contracts::domain::maintenance::{MaintenanceKind, MaintenanceRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct KindTotals {
    pub kind: MaintenanceKind,
    pub count: usize,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaintenanceSummary {
    pub count: usize,
    pub total_cost: f64,
    /// `None` for an empty set
    pub average_cost: Option<f64>,
    /// Kinds with no records are omitted
    pub by_kind: Vec<KindTotals>,
    pub units: usize,
}

pub fn summarize(records: &[MaintenanceRecord]) -> MaintenanceSummary {
    let total_cost: f64 = records.iter().map(|r| r.cost).sum();
    let by_kind = MaintenanceKind::ALL
        .into_iter()
        .chain([MaintenanceKind::Other])
        .filter_map(|kind| {
            let matching = records.iter().filter(|r| r.kind == kind);
            let (count, total_cost) =
                matching.fold((0usize, 0.0f64), |(n, sum), r| (n + 1, sum + r.cost));
            (count > 0).then_some(KindTotals {
                kind,
                count,
                total_cost,
            })
        })
        .collect();

    let mut units: Vec<&str> = records.iter().map(|r| r.bus_code.as_str()).collect();
    units.sort_unstable();
    units.dedup();

    MaintenanceSummary {
        count: records.len(),
        total_cost,
        average_cost: (!records.is_empty()).then(|| total_cost / records.len() as f64),
        by_kind,
        units: units.len(),
    }
}
