use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::models::MonthlySales;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CellTrend {
    Up,
    Down,
    Stable,
}

impl CellTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Stable => "STABLE",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Up => "#22c55e",
            Self::Down => "#ef4444",
            Self::Stable => "#9ca3af",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatCell {
    pub year: i32,
    pub month: u32,
    pub trend: CellTrend,
    pub revenue: f64,
    pub order_count: i64,
}

/// Cells plus the sorted list of years, so callers can lay out empty rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeatmapGrid {
    pub years: Vec<i32>,
    pub cells: Vec<HeatCell>,
}

impl HeatmapGrid {
    pub fn cell(&self, year: i32, month: u32) -> Option<&HeatCell> {
        self.cells.iter().find(|c| c.year == year && c.month == month)
    }

    /// One row per year with a slot for every month, January first.
    pub fn rows(&self) -> Vec<(i32, Vec<Option<&HeatCell>>)> {
        self.years
            .iter()
            .map(|&year| (year, (1..=12).map(|month| self.cell(year, month)).collect()))
            .collect()
    }
}

/// Classify every month with data against the month before it.
///
/// January compares against December of the previous year. A month without
/// a predecessor in `samples` is STABLE; months without data are omitted.
/// Later duplicates of a (year, month) replace earlier ones.
pub fn derive_grid(samples: &[MonthlySales]) -> HeatmapGrid {
    let lookup: HashMap<(i32, u32), &MonthlySales> =
        samples.iter().map(|s| ((s.year, s.month), s)).collect();
    let years: BTreeSet<i32> = samples.iter().map(|s| s.year).collect();

    let mut cells = Vec::new();
    for &year in &years {
        for month in 1..=12 {
            let Some(current) = lookup.get(&(year, month)) else {
                continue;
            };
            let previous_key = if month == 1 {
                (year - 1, 12)
            } else {
                (year, month - 1)
            };

            let trend = match lookup.get(&previous_key) {
                Some(prev) if current.revenue > prev.revenue => CellTrend::Up,
                Some(prev) if current.revenue < prev.revenue => CellTrend::Down,
                _ => CellTrend::Stable,
            };

            cells.push(HeatCell {
                year,
                month,
                trend,
                revenue: current.revenue,
                order_count: current.order_count,
            });
        }
    }

    HeatmapGrid {
        years: years.into_iter().collect(),
        cells,
    }
}
