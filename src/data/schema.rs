//! Dataset Schema Module
//! Canonical column names, header normalization and schema validation.

use std::collections::HashSet;

pub const COUNTRY: &str = "country";
pub const PRODUCT: &str = "product";
pub const BRANCH: &str = "branch";

pub const NUMBER_OF_CUSTOMERS: &str = "number_of_customers";
pub const REVENUE: &str = "revenue";
pub const MARKETING_SPEND: &str = "marketing_spend";
pub const OPERATIONAL_COST: &str = "operational_cost";
pub const REGULATORY_COMPLIANCE_COST: &str = "regulatory_compliance_cost";
pub const NON_INTEREST_INCOME: &str = "non_interest_income";
pub const GDP_BILLION_USD: &str = "gdp_billion_usd";
pub const TOTAL_COST: &str = "total_cost";
pub const PROFIT: &str = "profit";
pub const PROFIT_MARGIN: &str = "profit_margin";
pub const CREDIT_RISK_SCORE: &str = "credit_risk_score";
pub const LOAN_QUALITY_SCORE: &str = "loan_quality_score";
pub const INFLATION_PERCENT: &str = "inflation_percent";
pub const INTEREST_RATE_PERCENT: &str = "interest_rate_percent";

/// Category value standing in for an empty country, product or branch cell.
pub const BLANK_CATEGORY: &str = "(blank)";

/// Columns stored as text with thousands separators (margin: trailing `%`).
pub const CLEANED_COLUMNS: [&str; 10] = [
    NUMBER_OF_CUSTOMERS,
    REVENUE,
    MARKETING_SPEND,
    OPERATIONAL_COST,
    REGULATORY_COMPLIANCE_COST,
    NON_INTEREST_INCOME,
    GDP_BILLION_USD,
    TOTAL_COST,
    PROFIT,
    PROFIT_MARGIN,
];

/// Numeric columns that usually arrive as plain numbers.
pub const PLAIN_NUMERIC_COLUMNS: [&str; 4] = [
    CREDIT_RISK_SCORE,
    LOAN_QUALITY_SCORE,
    INFLATION_PERCENT,
    INTEREST_RATE_PERCENT,
];

/// A categorical column usable as a filter and grouping axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Country,
    Product,
    Branch,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Country, Dimension::Product, Dimension::Branch];

    /// Canonical column name backing this dimension.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Country => COUNTRY,
            Dimension::Product => PRODUCT,
            Dimension::Branch => BRANCH,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Country => "Countries",
            Dimension::Product => "Products",
            Dimension::Branch => "Branches",
        }
    }
}

/// Feature availability decided once when the dataset is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSchema {
    pub product_available: bool,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self {
            product_available: true,
        }
    }
}

impl DatasetSchema {
    /// Whether filtering and grouping by `dimension` is possible.
    pub fn supports(&self, dimension: Dimension) -> bool {
        match dimension {
            Dimension::Product => self.product_available,
            Dimension::Country | Dimension::Branch => true,
        }
    }
}

/// Normalize a raw header into lowercase, underscore-separated form.
///
/// `%` becomes the word `percent`; any other non-alphanumeric character
/// separates words. Runs of separators collapse, so `"Inflation %"`,
/// `"inflation_percent"` and `" INFLATION  Percent "` all map to
/// `inflation_percent`.
pub fn normalize_column_name(raw: &str) -> String {
    raw.replace('%', " percent ")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Whether a name is already in canonical form.
#[cfg(test)]
pub fn is_canonical(name: &str) -> bool {
    !name.is_empty()
        && name
            .split('_')
            .all(|word| !word.is_empty() && word.chars().all(|c| c.is_lowercase() || c.is_numeric()))
}

/// Every column the loader expects, in header order of the source file.
pub fn expected_columns() -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = vec![COUNTRY, PRODUCT, BRANCH];
    columns.extend(CLEANED_COLUMNS);
    columns.extend(PLAIN_NUMERIC_COLUMNS);
    columns
}

/// First canonical name produced by more than one header, if any.
pub fn find_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .find(|name| !seen.insert(name.as_str()))
        .map(|name| name.as_str())
}
