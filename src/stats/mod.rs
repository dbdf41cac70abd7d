//! Stats module - KPI and grouped aggregation

mod calculator;

pub use calculator::{AnalysisError, BoxSummary, HistogramBin, Kpis, Measure, StatsCalculator};
