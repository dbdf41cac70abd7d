//! Statistics Calculator Module
//! KPI rollups, grouped aggregates and distribution summaries over a filtered frame.

use crate::data::schema::{NUMBER_OF_CUSTOMERS, PROFIT, PROFIT_MARGIN, REVENUE};
use crate::data::Dimension;
use polars::prelude::*;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::{Data, Distribution, Max, Median, Min, OrderStatistics};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' is not available in this dataset")]
    MissingColumn(String),
}

/// Whole-subset headline figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kpis {
    pub total_profit: f64,
    /// NaN when the subset is empty.
    pub average_profit_margin: f64,
    pub total_revenue: f64,
    pub total_customers: u64,
}

impl Kpis {
    /// Compute the four KPIs. An empty frame yields zero sums and a NaN mean.
    pub fn compute(df: &DataFrame) -> Result<Self, AnalysisError> {
        let total_profit = df.column(PROFIT)?.f64()?.sum().unwrap_or(0.0);
        let average_profit_margin = df.column(PROFIT_MARGIN)?.f64()?.mean().unwrap_or(f64::NAN);
        let total_revenue = df.column(REVENUE)?.f64()?.sum().unwrap_or(0.0);
        let customers = df.column(NUMBER_OF_CUSTOMERS)?.f64()?.sum().unwrap_or(0.0);

        Ok(Self {
            total_profit,
            average_profit_margin,
            total_revenue,
            total_customers: customers.max(0.0) as u64,
        })
    }
}

/// How a measure column is reduced within each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Mean,
    /// Number of rows in the group; the column only names the output.
    Count,
}

/// One aggregated output column of a rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measure {
    pub column: &'static str,
    pub aggregation: Aggregation,
}

impl Measure {
    pub const fn sum(column: &'static str) -> Self {
        Self {
            column,
            aggregation: Aggregation::Sum,
        }
    }

    pub const fn mean(column: &'static str) -> Self {
        Self {
            column,
            aggregation: Aggregation::Mean,
        }
    }

    pub const fn count(column: &'static str) -> Self {
        Self {
            column,
            aggregation: Aggregation::Count,
        }
    }

    fn expr(&self) -> Expr {
        match self.aggregation {
            Aggregation::Sum => col(self.column).sum(),
            Aggregation::Mean => col(self.column).mean(),
            Aggregation::Count => len().cast(DataType::Float64),
        }
        .alias(self.column)
    }
}

/// Per-category aggregate table, keys in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct Rollup {
    pub keys: Vec<String>,
    /// One entry per requested measure, values aligned with `keys`.
    pub measures: Vec<(Measure, Vec<f64>)>,
}

impl Rollup {
    /// Values of the first measure over `column`.
    pub fn values(&self, column: &str) -> Option<&[f64]> {
        self.measures
            .iter()
            .find(|(m, _)| m.column == column)
            .map(|(_, values)| values.as_slice())
    }
}

/// Five-number summary plus mean for box and violin charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// Most extreme values within 1.5 IQR of the quartiles.
    pub whisker_low: f64,
    pub whisker_high: f64,
}

impl Default for BoxSummary {
    fn default() -> Self {
        Self {
            count: 0,
            min: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            whisker_low: f64::NAN,
            whisker_high: f64::NAN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Handles grouped aggregation and distribution statistics.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Group `df` by a dimension and reduce each measure.
    pub fn rollup(
        df: &DataFrame,
        dimension: Dimension,
        measures: &[Measure],
    ) -> Result<Rollup, AnalysisError> {
        let key = dimension.column();
        if df.column(key).is_err() {
            return Err(AnalysisError::MissingColumn(key.to_string()));
        }

        let grouped = df
            .clone()
            .lazy()
            .group_by_stable([col(key)])
            .agg(measures.iter().map(Measure::expr).collect::<Vec<_>>())
            .collect()?;

        let keys = grouped
            .column(key)?
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect();

        let mut columns = Vec::with_capacity(measures.len());
        for measure in measures {
            let values = grouped.column(measure.column)?.cast(&DataType::Float64)?;
            let values = values
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            columns.push((*measure, values));
        }

        Ok(Rollup {
            keys,
            measures: columns,
        })
    }

    /// All non-null values of a numeric column.
    pub fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>, AnalysisError> {
        Ok(df.column(column)?.f64()?.into_iter().flatten().collect())
    }

    /// Numeric values of `column` split by the categories of `dimension`,
    /// groups in first-seen order.
    pub fn values_by_group(
        df: &DataFrame,
        dimension: Dimension,
        column: &str,
    ) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
        let keys = df.column(dimension.column())?.str()?;
        let values = df.column(column)?.f64()?;

        let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
        for (key, value) in keys.into_iter().zip(values.into_iter()) {
            let (Some(key), Some(value)) = (key, value) else {
                continue;
            };
            match groups.iter_mut().find(|(name, _)| name == key) {
                Some((_, group)) => group.push(value),
                None => groups.push((key.to_string(), vec![value])),
            }
        }
        Ok(groups)
    }

    /// Box-plot summary of `values`. Empty input yields NaN fields.
    pub fn distribution(values: &[f64]) -> BoxSummary {
        if values.is_empty() {
            return BoxSummary::default();
        }

        let mut data = Data::new(values.to_vec());
        let q1 = data.lower_quartile();
        let median = data.median();
        let q3 = data.upper_quartile();
        let iqr = q3 - q1;

        let whisker_low = values
            .iter()
            .copied()
            .filter(|&v| v >= q1 - 1.5 * iqr)
            .fold(f64::INFINITY, f64::min);
        let whisker_high = values
            .iter()
            .copied()
            .filter(|&v| v <= q3 + 1.5 * iqr)
            .fold(f64::NEG_INFINITY, f64::max);

        BoxSummary {
            count: values.len(),
            min: data.min(),
            q1,
            median,
            q3,
            max: data.max(),
            mean: data.mean().unwrap_or(f64::NAN),
            whisker_low,
            whisker_high,
        }
    }

    /// Gaussian kernel density estimate sampled at `points` positions
    /// spanning the data range. Returns `(value, density)` pairs.
    pub fn density(values: &[f64], points: usize) -> Vec<[f64; 2]> {
        let n = values.len();
        if n == 0 || points < 2 {
            return Vec::new();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let bandwidth = Self::silverman_bandwidth(values);
        let Ok(kernel) = Normal::new(0.0, 1.0) else {
            return Vec::new();
        };

        let step = (max - min) / (points - 1) as f64;
        (0..points)
            .map(|i| {
                let x = min + step * i as f64;
                let density = values
                    .iter()
                    .map(|v| kernel.pdf((x - v) / bandwidth))
                    .sum::<f64>()
                    / (n as f64 * bandwidth);
                [x, density]
            })
            .collect()
    }

    /// Silverman's rule of thumb; falls back to 1.0 for degenerate samples.
    fn silverman_bandwidth(values: &[f64]) -> f64 {
        let n = values.len() as f64;
        let data = Data::new(values.to_vec());
        let std = data.std_dev().unwrap_or(0.0);
        let bandwidth = 1.06 * std * n.powf(-0.2);
        if bandwidth.is_finite() && bandwidth > 0.0 {
            bandwidth
        } else {
            1.0
        }
    }

    /// Equal-width histogram over [min, max]. The last bin is closed.
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // A constant sample still gets a unit-wide bin
        let (min, max) = if max > min { (min, max) } else { (min - 0.5, min + 0.5) };
        let width = (max - min) / bins as f64;

        let mut result: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: min + width * i as f64,
                upper: min + width * (i + 1) as f64,
                count: 0,
            })
            .collect();

        for &v in values {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            result[idx].count += 1;
        }

        result
    }
}
