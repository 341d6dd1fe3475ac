//! Typed row view over the merged GDP/enrollment table.

/// Column names recognised in the merged CSV.
pub const COUNTRY: &str = "country";
pub const YEAR: &str = "year";
pub const GDP: &str = "gdp";
pub const ENROLLMENT: &str = "enrollment";
pub const GDP_PCT_CHANGE: &str = "gdp_pct_change";
pub const ENROLLMENT_PCT_CHANGE: &str = "enrollment_pct_change";
pub const BOTH_INCREASE: &str = "both_increase";

/// Derived numeric columns added during loading.
pub const GDP_NUMERIC: &str = "gdp_numeric";
pub const ENROLLMENT_NUMERIC: &str = "enrollment_numeric";

/// Columns the merged file is expected to carry, in warning order.
pub const EXPECTED_COLUMNS: [&str; 7] = [
    COUNTRY,
    YEAR,
    GDP,
    ENROLLMENT,
    GDP_PCT_CHANGE,
    ENROLLMENT_PCT_CHANGE,
    BOTH_INCREASE,
];

/// One country/year observation after type coercion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub country: Option<String>,
    pub year: Option<i64>,
    pub gdp_numeric: Option<f64>,
    pub enrollment_numeric: Option<f64>,
    pub gdp_pct_change: Option<f64>,
    pub enrollment_pct_change: Option<f64>,
    pub both_increase: bool,
}

impl Record {
    /// Plot coordinates, only when both percent changes are known.
    pub fn point(&self) -> Option<(f64, f64)> {
        Some((self.gdp_pct_change?, self.enrollment_pct_change?))
    }

    /// Legend label for the both-increase flag.
    pub fn both_increase_label(&self) -> &'static str {
        if self.both_increase {
            "True"
        } else {
            "False"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_requires_both_coordinates() {
        let mut record = Record {
            gdp_pct_change: Some(1.5),
            enrollment_pct_change: Some(-2.0),
            ..Default::default()
        };
        assert_eq!(record.point(), Some((1.5, -2.0)));

        record.enrollment_pct_change = None;
        assert_eq!(record.point(), None);
    }

    #[test]
    fn test_both_increase_label() {
        let mut record = Record::default();
        assert_eq!(record.both_increase_label(), "False");
        record.both_increase = true;
        assert_eq!(record.both_increase_label(), "True");
    }
}
