//! Reshape API records into the series each chart widget draws.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{
    CategoryPerformance, DailySales, InventoryTurnover, MonthlySales, RegistrationTrend,
    TopCustomer,
};

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One bar color per calendar month, January first.
pub const MONTH_COLORS: [&str; 12] = [
    "#050215", "#0A072C", "#16124F", "#1F2075", "#3A2D9E", "#513CC8", "#514BF4", "#6A5BCF",
    "#7D63E2", "#A478F7", "#B28BFF", "#D1A7FF",
];

pub const FALLBACK_COLOR: &str = "#cbd5e1";

const SEGMENT_DONUT_COLORS: &[(&str, &str)] = &[
    ("CHAMPION", "#506e9a"),
    ("LOYAL", "#2d8bba"),
    ("NEW", "#41b8d5"),
    ("AT_RISK", "#6ce5e8"),
];

const CATEGORY_DONUT_COLORS: &[(&str, &str)] = &[
    ("LAPTOPS", "#506e9a"),
    ("SMARTPHONES", "#2d8bba"),
    ("TABLETS", "#41b8d5"),
    ("OTHERS", "#6ce5e8"),
    ("ACCESSORIES", "#f79c42"),
];

const SEGMENT_BUBBLE_COLORS: &[(&str, &str)] = &[
    ("NEW", "#60a5fa"),
    ("LOYAL", "#34d399"),
    ("CHAMPION", "#f59e0b"),
    ("AT_RISK", "#f97316"),
];

const BUBBLE_DEFAULT_COLOR: &str = "#8884d8";

fn color_for(palette: &[(&str, &'static str)], key: &str, fallback: &'static str) -> &'static str {
    palette
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, c)| *c)
        .unwrap_or(fallback)
}

pub fn month_short(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// "{MonShort} {Year}", e.g. "Feb 2024".
pub fn month_label(year: i32, month: u32) -> String {
    match month_short(month) {
        Some(name) => format!("{} {}", name, year),
        None => format!("{}-{:02}", year, month),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubblePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub name: String,
    pub customer_id: i64,
    pub segment: Option<String>,
    pub color: &'static str,
}

/// Customer spend (x, bubble size) against order count (y).
///
/// Points with a non-finite coordinate or a non-positive size are dropped.
pub fn bubble_points(customers: &[TopCustomer]) -> Vec<BubblePoint> {
    customers
        .iter()
        .map(|c| {
            let spent = c.total_spent.unwrap_or(f64::NAN);
            BubblePoint {
                x: spent,
                y: c.order_count.map(|n| n as f64).unwrap_or(f64::NAN),
                z: spent,
                name: c.customer_name.clone(),
                customer_id: c.customer_id,
                segment: c.segment.clone(),
                color: c
                    .segment
                    .as_deref()
                    .map(|s| color_for(SEGMENT_BUBBLE_COLORS, s, BUBBLE_DEFAULT_COLOR))
                    .unwrap_or(BUBBLE_DEFAULT_COLOR),
            }
        })
        .filter(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite() && p.z > 0.0)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareSlice {
    pub label: String,
    pub value: i64,
    /// Whole percent of the total; slices may not add up to exactly 100.
    pub percentage: i64,
    pub color: &'static str,
}

/// Donut slices from label/count pairs. A zero or overflowing total yields
/// no slices.
pub fn share_slices<I, S>(entries: I, palette: &[(&str, &'static str)]) -> Vec<ShareSlice>
where
    I: IntoIterator<Item = (S, i64)>,
    S: Into<String>,
{
    let entries: Vec<(String, i64)> = entries.into_iter().map(|(l, v)| (l.into(), v)).collect();
    let total = entries
        .iter()
        .try_fold(0i64, |acc, (_, v)| acc.checked_add(*v));
    let Some(total) = total.filter(|t| *t > 0) else {
        return Vec::new();
    };

    entries
        .into_iter()
        .map(|(label, value)| ShareSlice {
            percentage: (value as f64 / total as f64 * 100.0).round() as i64,
            color: color_for(palette, &label, FALLBACK_COLOR),
            label,
            value,
        })
        .collect()
}

pub fn segment_slices(distribution: &BTreeMap<String, i64>) -> Vec<ShareSlice> {
    share_slices(
        distribution.iter().map(|(k, v)| (k.as_str(), *v)),
        SEGMENT_DONUT_COLORS,
    )
}

/// Category share by units sold.
pub fn category_slices(categories: &[CategoryPerformance]) -> Vec<ShareSlice> {
    share_slices(
        categories
            .iter()
            .map(|c| (c.category.as_str(), c.total_quantity_sold)),
        CATEGORY_DONUT_COLORS,
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBar {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub revenue: f64,
    pub formatted_revenue: String,
    pub order_count: i64,
    pub color: &'static str,
}

/// Monthly revenue bars in chronological order, one per (year, month).
pub fn monthly_revenue_bars(samples: &[MonthlySales]) -> Vec<MonthlyBar> {
    let mut grouped: BTreeMap<(i32, u32), (f64, i64)> = BTreeMap::new();
    for sample in samples {
        let entry = grouped.entry((sample.year, sample.month)).or_insert((0.0, 0));
        entry.0 += sample.revenue;
        entry.1 += sample.order_count;
    }

    grouped
        .into_iter()
        .map(|((year, month), (revenue, order_count))| MonthlyBar {
            year,
            month,
            label: month_label(year, month),
            revenue,
            formatted_revenue: format!("{:.2}", revenue),
            order_count,
            color: MONTH_COLORS
                .get(month.saturating_sub(1) as usize)
                .copied()
                .unwrap_or(FALLBACK_COLOR),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationPoint {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub count: i64,
}

/// Registration line points, sorted by (year, month) since the API does not
/// guarantee chronological order.
pub fn registration_trend(trends: &[RegistrationTrend]) -> Vec<RegistrationPoint> {
    let mut points: Vec<RegistrationPoint> = trends
        .iter()
        .map(|t| RegistrationPoint {
            year: t.year,
            month: t.month,
            label: month_label(t.year, t.month),
            count: t.registration_count,
        })
        .collect();
    points.sort_by_key(|p| (p.year, p.month));
    points
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnoverBar {
    pub product_id: i64,
    pub name: String,
    /// Units sold per unit in stock, as a percentage.
    pub rate: f64,
    /// `rate` rendered with two decimals.
    pub formatted_rate: String,
    pub sold: i64,
    pub stock: i64,
}

/// Turnover rate bars. Products without stock have no defined rate and are skipped.
pub fn turnover_bars(inventory: &[InventoryTurnover]) -> Vec<TurnoverBar> {
    inventory
        .iter()
        .filter(|item| item.current_stock > 0)
        .map(|item| {
            let rate = item.total_sold as f64 / item.current_stock as f64 * 100.0;
            TurnoverBar {
                product_id: item.product_id,
                name: item.product_name.clone(),
                rate,
                formatted_rate: format!("{:.2}", rate),
                sold: item.total_sold,
                stock: item.current_stock,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBar {
    pub category: String,
    pub total_quantity_sold: i64,
    pub total_revenue: f64,
    pub product_count: i64,
    pub average_price: Option<f64>,
}

pub fn category_performance_bars(categories: &[CategoryPerformance]) -> Vec<CategoryBar> {
    categories
        .iter()
        .map(|c| CategoryBar {
            category: c.category.clone(),
            total_quantity_sold: c.total_quantity_sold,
            total_revenue: c.total_revenue,
            product_count: c.product_count,
            average_price: c.average_price,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub revenue: f64,
    pub order_count: i64,
}

/// Daily sales merged per date, oldest first.
pub fn daily_series(days: &[DailySales]) -> Vec<DailyPoint> {
    let mut merged: HashMap<NaiveDate, (f64, i64)> = HashMap::new();
    for day in days {
        let entry = merged.entry(day.date).or_insert((0.0, 0));
        entry.0 += day.revenue;
        entry.1 += day.order_count;
    }

    let mut result: Vec<DailyPoint> = merged
        .into_iter()
        .map(|(date, (revenue, order_count))| DailyPoint {
            date,
            revenue,
            order_count,
        })
        .collect();

    result.sort_by(|a, b| a.date.cmp(&b.date));
    result
}
