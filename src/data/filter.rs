//! Filter Engine Module
//! Restricts the dataset to the selected countries, products and branches.

use super::loader::BankDataset;
use super::schema::{DatasetSchema, Dimension};
use polars::prelude::*;
use std::collections::BTreeSet;

/// Selected category values per dimension.
///
/// An empty set selects nothing for that dimension. There is no implicit
/// "select all"; use [`FilterSelections::all`] for the default view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelections {
    pub countries: BTreeSet<String>,
    pub products: BTreeSet<String>,
    pub branches: BTreeSet<String>,
}

impl FilterSelections {
    /// Every distinct value of every dimension selected.
    pub fn all(dataset: &BankDataset) -> Self {
        Self {
            countries: dataset.distinct_values(Dimension::Country).into_iter().collect(),
            products: dataset.distinct_values(Dimension::Product).into_iter().collect(),
            branches: dataset.distinct_values(Dimension::Branch).into_iter().collect(),
        }
    }

    pub fn get(&self, dimension: Dimension) -> &BTreeSet<String> {
        match dimension {
            Dimension::Country => &self.countries,
            Dimension::Product => &self.products,
            Dimension::Branch => &self.branches,
        }
    }

    pub fn get_mut(&mut self, dimension: Dimension) -> &mut BTreeSet<String> {
        match dimension {
            Dimension::Country => &mut self.countries,
            Dimension::Product => &mut self.products,
            Dimension::Branch => &mut self.branches,
        }
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle(&mut self, dimension: Dimension, value: &str) {
        let selected = self.get_mut(dimension);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }
}

impl BankDataset {
    /// Derive the filtered view for `selections`. The source frame is untouched.
    pub fn filter(&self, selections: &FilterSelections) -> PolarsResult<DataFrame> {
        filter_frame(self.dataframe(), selections, self.schema())
    }
}

/// Keep rows whose country, product and branch are all selected.
///
/// When the schema reports product as unavailable the product dimension is
/// not constrained. Null category cells never match; the loader stores blank
/// cells as a regular value so this only affects hand-built frames.
pub fn filter_frame(
    df: &DataFrame,
    selections: &FilterSelections,
    schema: DatasetSchema,
) -> PolarsResult<DataFrame> {
    let mut mask = vec![true; df.height()];

    for dimension in Dimension::ALL {
        if !schema.supports(dimension) {
            continue;
        }
        let selected = selections.get(dimension);
        let values = df.column(dimension.column())?.str()?;

        for (keep, value) in mask.iter_mut().zip(values.into_iter()) {
            *keep = *keep && value.is_some_and(|v| selected.contains(v));
        }
    }

    let mask = BooleanChunked::from_slice("mask".into(), &mask);
    df.filter(&mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::tests::{row, sample_dataset, write_csv, HEADER};
    use crate::data::loader::DataLoader;
    use crate::data::schema::{BLANK_CATEGORY, BRANCH, COUNTRY, PRODUCT};

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn column(df: &DataFrame, name: &str) -> Vec<String> {
        df.column(name)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap().to_string())
            .collect()
    }

    #[test]
    fn selects_rows_matching_all_three_sets() {
        let dataset = sample_dataset();
        let selections = FilterSelections {
            countries: set(&["India"]),
            products: set(&["Loans", "Savings"]),
            branches: set(&["Mumbai"]),
        };

        let filtered = dataset.filter(&selections).unwrap();
        assert_eq!(filtered.height(), 2);
        assert_eq!(column(&filtered, PRODUCT), vec!["Loans", "Savings"]);
    }

    #[test]
    fn full_selection_returns_full_table() {
        let dataset = sample_dataset();
        let filtered = dataset.filter(&FilterSelections::all(&dataset)).unwrap();
        assert!(filtered.equals(dataset.dataframe()));
    }

    #[test]
    fn full_selection_keeps_rows_with_blank_categories() {
        let file = write_csv(&[
            HEADER.to_string(),
            row("India", "Loans", "Mumbai", "1,000", "200", "12.5%"),
            row("India", "Loans", "", "1,000", "300", "12.5%"),
        ]);
        let dataset = DataLoader::load_csv(file.path()).unwrap();

        let filtered = dataset.filter(&FilterSelections::all(&dataset)).unwrap();
        assert_eq!(filtered.height(), dataset.row_count());
        assert!(filtered.equals(dataset.dataframe()));

        let kpis = crate::stats::Kpis::compute(&filtered).unwrap();
        assert_eq!(kpis.total_profit, 500.0);

        let mut selections = FilterSelections::all(&dataset);
        selections.toggle(Dimension::Branch, "Mumbai");
        let blank_only = dataset.filter(&selections).unwrap();
        assert_eq!(column(&blank_only, BRANCH), vec![BLANK_CATEGORY]);
    }

    #[test]
    fn empty_selection_on_any_dimension_returns_nothing() {
        let dataset = sample_dataset();
        for dimension in Dimension::ALL {
            let mut selections = FilterSelections::all(&dataset);
            selections.get_mut(dimension).clear();
            let filtered = dataset.filter(&selections).unwrap();
            assert_eq!(filtered.height(), 0, "{dimension:?}");
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let dataset = sample_dataset();
        let selections = FilterSelections {
            countries: set(&["India", "USA"]),
            products: set(&["Loans"]),
            branches: set(&["Mumbai", "Delhi"]),
        };

        let once = dataset.filter(&selections).unwrap();
        let twice = filter_frame(&once, &selections, dataset.schema()).unwrap();
        assert!(once.equals(&twice));
        assert_eq!(once.height(), 3);
    }

    #[test]
    fn every_kept_row_satisfies_every_selection() {
        let dataset = sample_dataset();
        let selections = FilterSelections {
            countries: set(&["USA"]),
            products: set(&["Loans", "Cards"]),
            branches: set(&["Mumbai", "New York", "Delhi"]),
        };

        let filtered = dataset.filter(&selections).unwrap();
        assert_eq!(filtered.height(), 2);
        for (name, allowed) in [
            (COUNTRY, &selections.countries),
            (PRODUCT, &selections.products),
            (BRANCH, &selections.branches),
        ] {
            assert!(column(&filtered, name).iter().all(|v| allowed.contains(v)));
        }
    }

    #[test]
    fn source_table_is_not_mutated() {
        let dataset = sample_dataset();
        let before = dataset.dataframe().clone();
        let _ = dataset.filter(&FilterSelections::default()).unwrap();
        assert!(dataset.dataframe().equals(&before));
    }

    #[test]
    fn missing_product_leaves_dimension_unconstrained() {
        let header = HEADER.replacen("Product,", "", 1);
        let strip_product = |line: String| line.replacen("Loans,", "", 1);
        let file = write_csv(&[
            header,
            strip_product(row("India", "Loans", "Mumbai", "1,000", "200", "12.5%")),
            strip_product(row("USA", "Loans", "Mumbai", "1,000", "200", "12.5%")),
        ]);
        let dataset = DataLoader::load_csv(file.path()).unwrap();

        let selections = FilterSelections {
            countries: set(&["India"]),
            products: BTreeSet::new(),
            branches: set(&["Mumbai"]),
        };
        let filtered = dataset.filter(&selections).unwrap();
        assert_eq!(filtered.height(), 1);
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut selections = FilterSelections::default();
        selections.toggle(Dimension::Branch, "Mumbai");
        assert!(selections.branches.contains("Mumbai"));
        selections.toggle(Dimension::Branch, "Mumbai");
        assert!(selections.branches.is_empty());
    }
}
