//! CSV Data Loader Module
//! Loads the bank records CSV with Polars, normalizes headers and coerces numeric text.

use super::schema::{
    expected_columns, find_duplicate, normalize_column_name, DatasetSchema, Dimension,
    BLANK_CATEGORY, CLEANED_COLUMNS, PLAIN_NUMERIC_COLUMNS, PRODUCT, PROFIT_MARGIN,
};
use log::{info, warn};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Warning shown when the product dimension cannot be filtered.
pub const MISSING_PRODUCT_WARNING: &str = "'Product' column not found in the data.";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Missing required column '{column}'")]
    Schema { column: String },
    #[error("Columns normalize to the same name '{0}'")]
    DuplicateColumn(String),
    #[error("Column '{column}' row {row}: '{value}' is not a number")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },
}

/// The normalized, read-only bank records table.
///
/// Every designated numeric column is `Float64`, every column name is
/// canonical, and there is no way to mutate the frame once built.
#[derive(Debug, Clone)]
pub struct BankDataset {
    df: DataFrame,
    schema: DatasetSchema,
    source: PathBuf,
    warnings: Vec<String>,
}

impl BankDataset {
    /// Get a reference to the normalized DataFrame.
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn schema(&self) -> DatasetSchema {
        self.schema
    }

    /// Path the dataset was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// User-visible warnings raised during schema validation.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// Distinct values of a dimension in first-seen order.
    ///
    /// Empty when the dimension is unavailable. Blank cells were loaded as
    /// [`BLANK_CATEGORY`] and are listed like any other value.
    pub fn distinct_values(&self, dimension: Dimension) -> Vec<String> {
        if !self.schema.supports(dimension) {
            return Vec::new();
        }

        let Some(values) = self
            .df
            .column(dimension.column())
            .ok()
            .and_then(|col| col.str().ok())
        else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        values
            .into_iter()
            .flatten()
            .filter(|v| seen.insert(*v))
            .map(|v| v.to_string())
            .collect()
    }
}

/// Handles CSV file loading and normalization.
pub struct DataLoader;

impl DataLoader {
    /// Load and normalize a CSV file.
    ///
    /// Every column is read as text so that thousands separators and percent
    /// signs can be stripped before parsing.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<BankDataset, LoaderError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let raw = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        let dataset = Self::from_raw_frame(raw, path)?;
        info!(
            "Loaded {} rows, {} columns from {}",
            dataset.row_count(),
            dataset.df.width(),
            path.display()
        );
        Ok(dataset)
    }

    /// Normalize an all-text frame into a [`BankDataset`].
    pub fn from_raw_frame(raw: DataFrame, source: &Path) -> Result<BankDataset, LoaderError> {
        let names: Vec<String> = raw
            .get_columns()
            .iter()
            .map(|col| normalize_column_name(col.name().as_str()))
            .collect();
        if let Some(dup) = find_duplicate(&names) {
            return Err(LoaderError::DuplicateColumn(dup.to_string()));
        }

        let schema = Self::validate_schema(&names)?;
        let mut warnings = Vec::new();
        if !schema.product_available {
            warn!("{MISSING_PRODUCT_WARNING} Product filtering is disabled");
            warnings.push(MISSING_PRODUCT_WARNING.to_string());
        }

        let mut columns = Vec::with_capacity(names.len());
        for (col, name) in raw.get_columns().iter().zip(&names) {
            let text = col.str()?;
            let is_numeric = CLEANED_COLUMNS.contains(&name.as_str())
                || PLAIN_NUMERIC_COLUMNS.contains(&name.as_str());

            let is_category = Dimension::ALL.iter().any(|d| d.column() == name.as_str());

            let column = if is_numeric {
                Column::new(name.as_str().into(), Self::parse_column(name, text)?)
            } else if is_category {
                let cells: Vec<&str> = text
                    .into_iter()
                    .map(|cell| match cell.map(str::trim) {
                        Some(value) if !value.is_empty() => value,
                        _ => BLANK_CATEGORY,
                    })
                    .collect();
                Column::new(name.as_str().into(), cells)
            } else {
                let cells: Vec<Option<&str>> = text.into_iter().collect();
                Column::new(name.as_str().into(), cells)
            };
            columns.push(column);
        }

        Ok(BankDataset {
            df: DataFrame::new(columns)?,
            schema,
            source: source.to_path_buf(),
            warnings,
        })
    }

    /// Check that every expected column exists; only `product` may be absent.
    fn validate_schema(names: &[String]) -> Result<DatasetSchema, LoaderError> {
        let present: HashSet<&str> = names.iter().map(String::as_str).collect();
        let mut schema = DatasetSchema::default();

        for column in expected_columns() {
            if present.contains(column) {
                continue;
            }
            if column == PRODUCT {
                schema.product_available = false;
            } else {
                return Err(LoaderError::Schema {
                    column: column.to_string(),
                });
            }
        }

        Ok(schema)
    }

    fn parse_column(name: &str, text: &StringChunked) -> Result<Vec<f64>, LoaderError> {
        text.into_iter()
            .enumerate()
            .map(|(i, cell)| {
                let cell = cell.unwrap_or("");
                Self::clean_numeric(name, cell).ok_or_else(|| LoaderError::Parse {
                    column: name.to_string(),
                    row: i + 1,
                    value: cell.to_string(),
                })
            })
            .collect()
    }

    /// Parse one numeric cell of a canonical column.
    ///
    /// Thousands separators are dropped everywhere; `profit_margin` also
    /// drops a trailing `%`. Non-finite results are rejected.
    pub fn clean_numeric(column: &str, cell: &str) -> Option<f64> {
        let mut cell = cell.trim();
        if column == PROFIT_MARGIN {
            cell = cell.strip_suffix('%').unwrap_or(cell).trim_end();
        }
        cell.replace(',', "").parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::schema::{is_canonical, BRANCH, COUNTRY, REVENUE};
    use std::io::Write;

    pub const HEADER: &str = "Country,Product,Branch,Number of Customers,Revenue,Marketing Spend,Operational Cost,Regulatory Compliance Cost,Non Interest Income,GDP Billion USD,Total Cost,Profit,Profit Margin,Credit Risk Score,Loan Quality Score,Inflation Percent,Interest Rate Percent";

    /// Build one CSV data line; numeric text is quoted to keep separators.
    pub fn row(country: &str, product: &str, branch: &str, revenue: &str, profit: &str, margin: &str) -> String {
        format!(
            "{country},{product},{branch},\"1,200\",\"{revenue}\",\"300\",\"400\",\"50\",\"75\",\"3,385\",\"800\",\"{profit}\",{margin},6.5,7.25,5.1,6.5"
        )
    }

    pub fn write_csv(lines: &[String]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("create temp csv");
        for line in lines {
            writeln!(file, "{line}").expect("write csv line");
        }
        file.flush().expect("flush csv");
        file
    }

    pub fn sample_dataset() -> BankDataset {
        let file = write_csv(&[
            HEADER.to_string(),
            row("India", "Loans", "Mumbai", "1,000", "200", "12.5%"),
            row("India", "Savings", "Mumbai", "2,000", "300", "15%"),
            row("India", "Loans", "Delhi", "1,500", "-50", "8%"),
            row("USA", "Loans", "Mumbai", "4,000", "1,100", "20.5%"),
            row("USA", "Cards", "New York", "3,000", "700", "10%"),
        ]);
        DataLoader::load_csv(file.path()).expect("load sample")
    }

    #[test]
    fn normalizes_example_row() {
        let file = write_csv(&[
            HEADER.to_string(),
            row("India", "Loans", "Mumbai", "1,000", "200", "12.5%"),
        ]);
        let dataset = DataLoader::load_csv(file.path()).unwrap();
        let df = dataset.dataframe();

        assert_eq!(df.column(COUNTRY).unwrap().str().unwrap().get(0), Some("India"));
        assert_eq!(df.column(PRODUCT).unwrap().str().unwrap().get(0), Some("Loans"));
        assert_eq!(df.column(BRANCH).unwrap().str().unwrap().get(0), Some("Mumbai"));
        assert_eq!(df.column(REVENUE).unwrap().f64().unwrap().get(0), Some(1000.0));
        assert_eq!(df.column(PROFIT_MARGIN).unwrap().f64().unwrap().get(0), Some(12.5));
        assert_eq!(
            df.column("gdp_billion_usd").unwrap().f64().unwrap().get(0),
            Some(3385.0)
        );
    }

    #[test]
    fn every_numeric_column_is_float_and_names_canonical() {
        let dataset = sample_dataset();
        let df = dataset.dataframe();

        for col in df.get_columns() {
            assert!(is_canonical(col.name().as_str()), "{}", col.name());
        }
        for name in CLEANED_COLUMNS.iter().chain(PLAIN_NUMERIC_COLUMNS.iter()) {
            assert_eq!(df.column(name).unwrap().dtype(), &DataType::Float64, "{name}");
        }
        assert_eq!(dataset.row_count(), 5);
        assert!(dataset.warnings().is_empty());
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let dataset = sample_dataset();
        assert_eq!(dataset.distinct_values(Dimension::Country), vec!["India", "USA"]);
        assert_eq!(
            dataset.distinct_values(Dimension::Product),
            vec!["Loans", "Savings", "Cards"]
        );
        assert_eq!(
            dataset.distinct_values(Dimension::Branch),
            vec!["Mumbai", "Delhi", "New York"]
        );
    }

    #[test]
    fn unparsable_value_names_column_and_value() {
        let file = write_csv(&[
            HEADER.to_string(),
            row("India", "Loans", "Mumbai", "1,000", "200", "12.5%"),
            row("India", "Loans", "Mumbai", "n/a", "200", "12.5%"),
        ]);
        let err = DataLoader::load_csv(file.path()).unwrap_err();
        match err {
            LoaderError::Parse { column, row, value } => {
                assert_eq!(column, REVENUE);
                assert_eq!(row, 2);
                assert_eq!(value, "n/a");
            }
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn missing_required_dimension_is_schema_error() {
        let header = HEADER.replacen("Branch,", "", 1);
        let line = "India,Loans,1200,1000,300,400,50,75,3385,800,200,12.5%,6.5,7.25,5.1,6.5";
        let file = write_csv(&[header, line.to_string()]);

        let err = DataLoader::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Schema { ref column } if column == BRANCH));
    }

    #[test]
    fn missing_product_degrades_with_warning() {
        let header = HEADER.replacen("Product,", "", 1);
        let line = "India,Mumbai,1200,1000,300,400,50,75,3385,800,200,12.5%,6.5,7.25,5.1,6.5";
        let file = write_csv(&[header, line.to_string()]);

        let dataset = DataLoader::load_csv(file.path()).unwrap();
        assert!(!dataset.schema().product_available);
        assert_eq!(dataset.warnings(), [MISSING_PRODUCT_WARNING.to_string()]);
        assert!(dataset.distinct_values(Dimension::Product).is_empty());
    }

    #[test]
    fn header_variants_are_accepted() {
        let header = HEADER
            .replace("Profit Margin", "PROFIT  MARGIN")
            .replace("Inflation Percent", "Inflation %");
        let file = write_csv(&[header, row("India", "Loans", "Mumbai", "1,000", "200", "12.5%")]);

        let dataset = DataLoader::load_csv(file.path()).unwrap();
        let df = dataset.dataframe();
        assert_eq!(df.column(PROFIT_MARGIN).unwrap().f64().unwrap().get(0), Some(12.5));
        assert!(df.column("inflation_percent").is_ok());
    }

    #[test]
    fn duplicate_normalized_headers_are_rejected() {
        let header = format!("{HEADER},revenue");
        let line = format!("{},1", row("India", "Loans", "Mumbai", "1,000", "200", "12.5%"));
        let file = write_csv(&[header, line]);

        let err = DataLoader::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::DuplicateColumn(ref c) if c == REVENUE));
    }

    #[test]
    fn plain_numeric_columns_accept_thousands_separators() {
        let line = row("India", "Loans", "Mumbai", "1,000", "200", "12.5%")
            .replacen(",6.5,", ",\"1,006.5\",", 1);
        let file = write_csv(&[HEADER.to_string(), line]);

        let dataset = DataLoader::load_csv(file.path()).unwrap();
        let df = dataset.dataframe();
        assert_eq!(df.column("credit_risk_score").unwrap().f64().unwrap().get(0), Some(1006.5));
    }

    #[test]
    fn blank_category_cells_become_selectable_value() {
        let file = write_csv(&[
            HEADER.to_string(),
            row("India", "Loans", "Mumbai", "1,000", "200", "12.5%"),
            row("India", "Loans", "", "1,000", "300", "12.5%"),
        ]);

        let dataset = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(
            dataset.distinct_values(Dimension::Branch),
            vec!["Mumbai", BLANK_CATEGORY]
        );
        let branches = dataset.dataframe().column(BRANCH).unwrap().str().unwrap();
        assert_eq!(branches.null_count(), 0);
        assert_eq!(branches.get(1), Some(BLANK_CATEGORY));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = DataLoader::load_csv("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn clean_numeric_rules() {
        assert_eq!(DataLoader::clean_numeric(REVENUE, " 1,234,567.5 "), Some(1_234_567.5));
        assert_eq!(DataLoader::clean_numeric(PROFIT_MARGIN, "12.5%"), Some(12.5));
        assert_eq!(DataLoader::clean_numeric(PROFIT_MARGIN, "-3"), Some(-3.0));
        assert_eq!(DataLoader::clean_numeric("credit_risk_score", "7.5"), Some(7.5));
        assert_eq!(DataLoader::clean_numeric("loan_quality_score", "1,234"), Some(1234.0));
        assert_eq!(DataLoader::clean_numeric("inflation_percent", "5%"), None);
        assert_eq!(DataLoader::clean_numeric(REVENUE, ""), None);
        assert_eq!(DataLoader::clean_numeric(REVENUE, "NaN"), None);
        assert_eq!(DataLoader::clean_numeric(PROFIT_MARGIN, "12.5%%"), None);
    }
}
