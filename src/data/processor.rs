//! Data Processor Module
//! Chooses which years are rendered as panels/facets.

use polars::prelude::*;
use thiserror::Error;

use super::table::GdpTable;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("No requested YEARS are present in the data.")]
    NoRequestedYears,
}

/// Handles year selection over the loaded table.
pub struct DataProcessor;

impl DataProcessor {
    /// Select years to visualize from the table.
    pub fn select_years(
        table: &GdpTable,
        requested: Option<&[i64]>,
        max_panels: usize,
    ) -> Result<Vec<i64>, ProcessorError> {
        let available = table.years()?;
        Self::choose_years(&available, requested, max_panels)
    }

    /// Select years from the distinct, ascending years present.
    ///
    /// An explicit non-empty list keeps its own order, restricted to present
    /// years. Otherwise the most recent `max_panels` years are returned
    /// ascending; `max_panels == 0` keeps every year.
    pub fn choose_years(
        available: &[i64],
        requested: Option<&[i64]>,
        max_panels: usize,
    ) -> Result<Vec<i64>, ProcessorError> {
        match requested {
            Some(requested) if !requested.is_empty() => {
                let mut selected: Vec<i64> = Vec::with_capacity(requested.len());
                for year in requested {
                    if available.contains(year) && !selected.contains(year) {
                        selected.push(*year);
                    }
                }
                if selected.is_empty() {
                    return Err(ProcessorError::NoRequestedYears);
                }
                Ok(selected)
            }
            _ => {
                let mut years = available.to_vec();
                years.sort_unstable();
                years.dedup();
                let start = match max_panels {
                    0 => 0,
                    n => years.len().saturating_sub(n),
                };
                Ok(years.split_off(start))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_auto_select_most_recent_six() {
        let available: Vec<i64> = (2010..=2020).collect();
        let years = DataProcessor::choose_years(&available, None, 6).unwrap();
        assert_eq!(years, vec![2015, 2016, 2017, 2018, 2019, 2020]);
    }

    #[test]
    fn test_auto_select_fewer_years_than_panels() {
        let years = DataProcessor::choose_years(&[2021, 2019], None, 6).unwrap();
        assert_eq!(years, vec![2019, 2021]);
    }

    #[test]
    fn test_auto_select_empty_data() {
        let years = DataProcessor::choose_years(&[], None, 6).unwrap();
        assert!(years.is_empty());
    }

    #[test]
    fn test_zero_max_panels_keeps_all() {
        let years = DataProcessor::choose_years(&[2001, 2002, 2003], None, 0).unwrap();
        assert_eq!(years, vec![2001, 2002, 2003]);
    }

    #[test]
    fn test_explicit_years_intersect() {
        let years = DataProcessor::choose_years(&[2018, 2019], Some(&[2019, 2099]), 6).unwrap();
        assert_eq!(years, vec![2019]);
    }

    #[test]
    fn test_explicit_years_keep_caller_order() {
        let years =
            DataProcessor::choose_years(&[2018, 2019, 2020], Some(&[2020, 2018, 2020]), 6)
                .unwrap();
        assert_eq!(years, vec![2020, 2018]);
    }

    #[test]
    fn test_explicit_years_none_present() {
        let err = DataProcessor::choose_years(&[2018, 2019], Some(&[1990, 2099]), 6).unwrap_err();
        assert!(matches!(err, ProcessorError::NoRequestedYears));
    }

    #[test]
    fn test_empty_explicit_list_auto_selects() {
        let years = DataProcessor::choose_years(&[2018, 2019], Some(&[]), 1).unwrap();
        assert_eq!(years, vec![2019]);
    }

    proptest! {
        #[test]
        fn prop_auto_selection_recent_sorted_and_idempotent(
            raw in proptest::collection::btree_set(1950i64..2030, 0..30),
            max_panels in 1usize..10,
        ) {
            let available: Vec<i64> = raw.into_iter().collect();
            let first = DataProcessor::choose_years(&available, None, max_panels).unwrap();
            let second = DataProcessor::choose_years(&available, None, max_panels).unwrap();

            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.len(), available.len().min(max_panels));
            prop_assert!(first.windows(2).all(|w| w[0] < w[1]));
            let tail = &available[available.len() - first.len()..];
            prop_assert_eq!(first.as_slice(), tail);
        }

        #[test]
        fn prop_explicit_selection_is_subset(
            raw in proptest::collection::btree_set(2000i64..2010, 1..10),
            requested in proptest::collection::vec(1995i64..2015, 1..8),
        ) {
            let available: Vec<i64> = raw.into_iter().collect();
            match DataProcessor::choose_years(&available, Some(&requested), 6) {
                Ok(years) => {
                    prop_assert!(years.iter().all(|y| available.contains(y) && requested.contains(y)));
                    let again = DataProcessor::choose_years(&available, Some(&requested), 6).unwrap();
                    prop_assert_eq!(years, again);
                }
                Err(ProcessorError::NoRequestedYears) => {
                    prop_assert!(requested.iter().all(|y| !available.contains(y)));
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }
}
