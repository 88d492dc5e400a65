//! Headline KPI cards and their period-over-period trends.

use serde::Serialize;

use super::trend::{trend, TrendResult};
use crate::filters::MetricFormat;
use crate::models::{CustomerAnalytics, KpiSummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub title: &'static str,
    pub value: f64,
    pub formatted_value: String,
    pub format: MetricFormat,
    pub theme: &'static str,
    pub icon: &'static str,
    /// `None` when the previous period could not be fetched.
    pub trend: Option<TrendResult>,
}

impl KpiCard {
    /// Trend magnitude for display, "-" when there is nothing to compare with.
    pub fn trend_label(&self) -> String {
        match &self.trend {
            Some(t) => format!("{}%", t.magnitude_percent),
            None => "-".to_string(),
        }
    }

    pub fn trend_class(&self) -> &'static str {
        match &self.trend {
            Some(t) => t.direction.as_str(),
            None => "NONE",
        }
    }
}

/// Everything the KPI screen fetched. Only `current` is mandatory; the other
/// fetches are allowed to fail.
#[derive(Debug, Clone, Default)]
pub struct KpiInputs {
    pub current: KpiSummary,
    pub previous: Option<KpiSummary>,
    pub customers: Option<CustomerAnalytics>,
    pub previous_customers: Option<CustomerAnalytics>,
}

struct CardStyle {
    title: &'static str,
    format: MetricFormat,
    theme: &'static str,
    icon: &'static str,
}

fn card(style: CardStyle, value: Option<f64>, trend: Option<TrendResult>) -> KpiCard {
    let value = value.unwrap_or(0.0);
    KpiCard {
        title: style.title,
        formatted_value: style.format.format(value),
        value,
        format: style.format,
        theme: style.theme,
        icon: style.icon,
        trend,
    }
}

/// Compare one KPI metric between periods, skipping the trend if the previous
/// summary is missing.
fn kpi_trend<F>(inputs: &KpiInputs, metric: F) -> Option<TrendResult>
where
    F: Fn(&KpiSummary) -> Option<f64>,
{
    let previous = inputs.previous.as_ref()?;
    Some(trend(metric(&inputs.current), metric(previous)))
}

fn customer_value<F>(inputs: &KpiInputs, metric: F) -> Option<f64>
where
    F: Fn(&CustomerAnalytics) -> Option<f64>,
{
    inputs.customers.as_ref().and_then(metric)
}

fn as_f64(n: Option<i64>) -> Option<f64> {
    n.map(|n| n as f64)
}

/// Build the eight dashboard cards in display order.
///
/// Churn is lower-is-better, so its trend compares previous against current.
pub fn compose_cards(inputs: &KpiInputs) -> Vec<KpiCard> {
    let cur = &inputs.current;

    let customers_both = match (&inputs.customers, &inputs.previous_customers) {
        (Some(c), Some(p)) => Some((c, p)),
        _ => None,
    };
    let clv_trend = customers_both.map(|(c, p)| {
        trend(
            c.average_customer_lifetime_value,
            p.average_customer_lifetime_value,
        )
    });
    let churn_trend = customers_both.map(|(c, p)| trend(p.churn_rate, c.churn_rate));

    vec![
        card(
            CardStyle { title: "Total Sales", format: MetricFormat::Currency, theme: "green", icon: "money" },
            cur.total_revenue,
            kpi_trend(inputs, |k| k.total_revenue),
        ),
        card(
            CardStyle { title: "New Customers", format: MetricFormat::Number, theme: "blue", icon: "customers" },
            as_f64(cur.new_customers_count),
            kpi_trend(inputs, |k| as_f64(k.new_customers_count)),
        ),
        card(
            CardStyle { title: "Average Order Value", format: MetricFormat::Currency, theme: "purple", icon: "order" },
            cur.average_order_value,
            kpi_trend(inputs, |k| k.average_order_value),
        ),
        card(
            CardStyle { title: "Customer Lifetime Value", format: MetricFormat::Currency, theme: "gold", icon: "champ" },
            customer_value(inputs, |c| c.average_customer_lifetime_value),
            clv_trend,
        ),
        card(
            CardStyle { title: "Total Orders", format: MetricFormat::Number, theme: "blue", icon: "order" },
            as_f64(cur.total_orders),
            kpi_trend(inputs, |k| as_f64(k.total_orders)),
        ),
        card(
            CardStyle { title: "Churn Rate", format: MetricFormat::Percentage, theme: "orange", icon: "down" },
            customer_value(inputs, |c| c.churn_rate),
            churn_trend,
        ),
        card(
            CardStyle { title: "Total Customers", format: MetricFormat::Number, theme: "green", icon: "customers" },
            as_f64(cur.total_customers),
            kpi_trend(inputs, |k| as_f64(k.total_customers)),
        ),
        card(
            CardStyle { title: "Total Products", format: MetricFormat::Number, theme: "purple", icon: "product" },
            as_f64(cur.total_products),
            kpi_trend(inputs, |k| as_f64(k.total_products)),
        ),
    ]
}
