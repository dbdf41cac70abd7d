//! Chart Catalog Module
//! The fixed dashboard charts: kind, axes, title and the aggregate table behind each.

use crate::config::DashboardConfig;
use crate::data::schema::{
    CREDIT_RISK_SCORE, GDP_BILLION_USD, INFLATION_PERCENT, INTEREST_RATE_PERCENT,
    LOAN_QUALITY_SCORE, MARKETING_SPEND, NUMBER_OF_CUSTOMERS, OPERATIONAL_COST, PROFIT,
    PROFIT_MARGIN, REVENUE, TOTAL_COST,
};
use crate::data::{BankDataset, DatasetSchema, Dimension, FilterSelections};
use crate::stats::{AnalysisError, BoxSummary, HistogramBin, Kpis, Measure, StatsCalculator};
use log::debug;
use polars::prelude::DataFrame;

/// Visual encoding requested from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Scatter,
    Box,
    Pie,
    Violin,
    Histogram,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    /// Marker size per point, in data units of the sizing measure.
    pub sizes: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionGroup {
    pub name: String,
    pub values: Vec<f64>,
    pub summary: BoxSummary,
    /// `(value, density)` outline, empty for plain box charts.
    pub density: Vec<[f64; 2]>,
}

/// Aggregate table behind one chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    /// One value per category (bar and pie), with the rows behind each.
    Categories {
        labels: Vec<String>,
        values: Vec<f64>,
        rows: Vec<usize>,
    },
    Scatter(Vec<ScatterSeries>),
    Distribution(Vec<DistributionGroup>),
    Histogram(Vec<HistogramBin>),
    /// The chart needs a column this dataset lacks.
    Unavailable(String),
}

impl ChartData {
    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::Categories { labels, .. } => labels.is_empty(),
            ChartData::Scatter(series) => series.iter().all(|s| s.points.is_empty()),
            ChartData::Distribution(groups) => groups.is_empty(),
            ChartData::Histogram(bins) => bins.iter().all(|b| b.count == 0),
            ChartData::Unavailable(_) => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: &'static str,
    pub description: Option<&'static str>,
    pub x_field: &'static str,
    pub y_field: &'static str,
    pub data: ChartData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    CountryInsights,
    ProductPerformance,
    CostProfit,
    RiskQuality,
    EconomicFactors,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::CountryInsights,
        Tab::ProductPerformance,
        Tab::CostProfit,
        Tab::RiskQuality,
        Tab::EconomicFactors,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::CountryInsights => "Country Insights",
            Tab::ProductPerformance => "Product Performance",
            Tab::CostProfit => "Cost & Profit Analysis",
            Tab::RiskQuality => "Risk & Quality",
            Tab::EconomicFactors => "Economic Factors",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tab::CountryInsights => "📍",
            Tab::ProductPerformance => "📦",
            Tab::CostProfit => "💸",
            Tab::RiskQuality => "⚠",
            Tab::EconomicFactors => "🌍",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardTab {
    pub tab: Tab,
    pub charts: Vec<ChartSpec>,
}

/// Everything the presentation layer shows for one filter selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub filtered_rows: usize,
    pub total_rows: usize,
    pub kpis: Kpis,
    pub tabs: Vec<DashboardTab>,
}

impl DashboardView {
    /// Filter the dataset and compute KPIs and every chart.
    pub fn compute(
        dataset: &BankDataset,
        selections: &FilterSelections,
        config: &DashboardConfig,
    ) -> Result<Self, AnalysisError> {
        let filtered = dataset.filter(selections)?;
        let kpis = Kpis::compute(&filtered)?;
        let catalog = ChartCatalog {
            df: &filtered,
            schema: dataset.schema(),
            config,
        };

        let mut tabs = Vec::with_capacity(Tab::ALL.len());
        for tab in Tab::ALL {
            tabs.push(DashboardTab {
                tab,
                charts: catalog.charts(tab)?,
            });
        }

        debug!(
            "Recomputed dashboard: {} of {} rows",
            filtered.height(),
            dataset.row_count()
        );

        Ok(Self {
            filtered_rows: filtered.height(),
            total_rows: dataset.row_count(),
            kpis,
            tabs,
        })
    }
}

/// Human-readable axis label for a canonical column name.
pub fn axis_label(field: &str) -> String {
    match field {
        GDP_BILLION_USD => "GDP (Billion USD)".to_string(),
        _ => field
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" "),
    }
}

/// Output name of the per-category row count.
const ROW_COUNT: &str = "rows";

const PRODUCT_UNAVAILABLE: &str = "Requires the 'Product' column, which is missing from the data";

/// Builds the charts of each tab over one filtered frame.
struct ChartCatalog<'a> {
    df: &'a DataFrame,
    schema: DatasetSchema,
    config: &'a DashboardConfig,
}

impl ChartCatalog<'_> {
    fn charts(&self, tab: Tab) -> Result<Vec<ChartSpec>, AnalysisError> {
        let charts = match tab {
            Tab::CountryInsights => vec![
                ChartSpec {
                    kind: ChartKind::Bar,
                    title: "Profit by Country",
                    description: Some(
                        "Total profit generated from each country after applying filters.",
                    ),
                    x_field: "country",
                    y_field: PROFIT,
                    data: self.categories(Dimension::Country, Measure::sum(PROFIT))?,
                },
                ChartSpec {
                    kind: ChartKind::Scatter,
                    title: "Revenue vs Profit by Country",
                    description: Some(
                        "Compares total revenue and profit across countries; marker size follows profit.",
                    ),
                    x_field: REVENUE,
                    y_field: PROFIT,
                    data: self.country_totals()?,
                },
                ChartSpec {
                    kind: ChartKind::Box,
                    title: "Profit Margin Distribution by Country",
                    description: Some("Variation in profit margins across countries."),
                    x_field: "country",
                    y_field: PROFIT_MARGIN,
                    data: self.distribution(Dimension::Country, PROFIT_MARGIN, false)?,
                },
            ],
            Tab::ProductPerformance => vec![
                ChartSpec {
                    kind: ChartKind::Bar,
                    title: "Average Profit by Product",
                    description: Some("Average profit per product."),
                    x_field: "product",
                    y_field: PROFIT,
                    data: self.categories(Dimension::Product, Measure::mean(PROFIT))?,
                },
                ChartSpec {
                    kind: ChartKind::Pie,
                    title: "Customer Count by Product",
                    description: Some(
                        "Number of customers per product helps understand product popularity.",
                    ),
                    x_field: "product",
                    y_field: NUMBER_OF_CUSTOMERS,
                    data: self.categories(Dimension::Product, Measure::sum(NUMBER_OF_CUSTOMERS))?,
                },
                ChartSpec {
                    kind: ChartKind::Violin,
                    title: "Profit Margin Spread by Product",
                    description: None,
                    x_field: "product",
                    y_field: PROFIT_MARGIN,
                    data: self.distribution(Dimension::Product, PROFIT_MARGIN, true)?,
                },
            ],
            Tab::CostProfit => vec![
                self.scatter(
                    "Operational Cost vs Profit",
                    Some("Relationship between operational costs and profit."),
                    OPERATIONAL_COST,
                    PROFIT,
                    Dimension::Country,
                )?,
                self.scatter(
                    "Total Cost vs Profit by Product",
                    None,
                    TOTAL_COST,
                    PROFIT,
                    Dimension::Product,
                )?,
                self.scatter(
                    "Marketing Spend vs Revenue",
                    None,
                    MARKETING_SPEND,
                    REVENUE,
                    Dimension::Product,
                )?,
            ],
            Tab::RiskQuality => vec![
                self.scatter(
                    "Credit Risk Score vs Profit",
                    Some("Higher credit risk generally leads to lower profits."),
                    CREDIT_RISK_SCORE,
                    PROFIT,
                    Dimension::Country,
                )?,
                self.scatter(
                    "Loan Quality vs Profit Margin",
                    None,
                    LOAN_QUALITY_SCORE,
                    PROFIT_MARGIN,
                    Dimension::Product,
                )?,
                ChartSpec {
                    kind: ChartKind::Histogram,
                    title: "Distribution of Credit Risk Scores",
                    description: None,
                    x_field: CREDIT_RISK_SCORE,
                    y_field: "count",
                    data: ChartData::Histogram(StatsCalculator::histogram(
                        &StatsCalculator::numeric_values(self.df, CREDIT_RISK_SCORE)?,
                        self.config.histogram_bins,
                    )),
                },
            ],
            Tab::EconomicFactors => vec![
                self.scatter(
                    "GDP vs Profit",
                    Some("GDP of countries compared against the profit they contribute."),
                    GDP_BILLION_USD,
                    PROFIT,
                    Dimension::Country,
                )?,
                self.scatter(
                    "Inflation vs Profit Margin",
                    None,
                    INFLATION_PERCENT,
                    PROFIT_MARGIN,
                    Dimension::Country,
                )?,
                self.scatter(
                    "Interest Rate vs Revenue",
                    None,
                    INTEREST_RATE_PERCENT,
                    REVENUE,
                    Dimension::Country,
                )?,
            ],
        };
        Ok(charts)
    }

    fn categories(&self, dimension: Dimension, measure: Measure) -> Result<ChartData, AnalysisError> {
        if !self.schema.supports(dimension) {
            return Ok(ChartData::Unavailable(PRODUCT_UNAVAILABLE.to_string()));
        }
        let rollup =
            StatsCalculator::rollup(self.df, dimension, &[measure, Measure::count(ROW_COUNT)])?;
        let values = rollup.values(measure.column).unwrap_or_default().to_vec();
        let rows = rollup
            .values(ROW_COUNT)
            .unwrap_or_default()
            .iter()
            .map(|&n| n as usize)
            .collect();
        Ok(ChartData::Categories {
            labels: rollup.keys,
            values,
            rows,
        })
    }

    /// One point per country at (sum revenue, sum profit), sized by profit.
    fn country_totals(&self) -> Result<ChartData, AnalysisError> {
        let rollup = StatsCalculator::rollup(
            self.df,
            Dimension::Country,
            &[Measure::sum(REVENUE), Measure::sum(PROFIT)],
        )?;
        let revenue = rollup.values(REVENUE).unwrap_or_default();
        let profit = rollup.values(PROFIT).unwrap_or_default();

        let series = rollup
            .keys
            .iter()
            .zip(revenue.iter().zip(profit))
            .map(|(name, (&r, &p))| ScatterSeries {
                name: name.clone(),
                points: vec![[r, p]],
                sizes: Some(vec![p]),
            })
            .collect();
        Ok(ChartData::Scatter(series))
    }

    fn distribution(
        &self,
        dimension: Dimension,
        column: &str,
        with_density: bool,
    ) -> Result<ChartData, AnalysisError> {
        if !self.schema.supports(dimension) {
            return Ok(ChartData::Unavailable(PRODUCT_UNAVAILABLE.to_string()));
        }
        let groups = StatsCalculator::values_by_group(self.df, dimension, column)?
            .into_iter()
            .map(|(name, values)| DistributionGroup {
                summary: StatsCalculator::distribution(&values),
                density: if with_density {
                    StatsCalculator::density(&values, self.config.violin_resolution)
                } else {
                    Vec::new()
                },
                name,
                values,
            })
            .collect();
        Ok(ChartData::Distribution(groups))
    }

    /// Row-level scatter coloured by a dimension.
    fn scatter(
        &self,
        title: &'static str,
        description: Option<&'static str>,
        x_field: &'static str,
        y_field: &'static str,
        color: Dimension,
    ) -> Result<ChartSpec, AnalysisError> {
        let data = if self.schema.supports(color) {
            let xs = StatsCalculator::values_by_group(self.df, color, x_field)?;
            let ys = StatsCalculator::values_by_group(self.df, color, y_field)?;
            let series = xs
                .into_iter()
                .zip(ys)
                .map(|((name, x), (_, y))| ScatterSeries {
                    name,
                    points: x.into_iter().zip(y).map(|(x, y)| [x, y]).collect(),
                    sizes: None,
                })
                .collect();
            ChartData::Scatter(series)
        } else {
            ChartData::Unavailable(PRODUCT_UNAVAILABLE.to_string())
        };

        Ok(ChartSpec {
            kind: ChartKind::Scatter,
            title,
            description,
            x_field,
            y_field,
            data,
        })
    }
}
