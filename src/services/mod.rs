pub mod charts;
pub mod forecast;
pub mod heatmap;
pub mod kpi;
pub mod recommendations;
pub mod trend;
