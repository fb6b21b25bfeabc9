use std::fmt;

/// The five aggregate commands in the Functions menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Average,
    Max,
    Min,
    Count,
}

impl Aggregate {
    pub fn all() -> &'static [Aggregate] {
        &[
            Aggregate::Sum,
            Aggregate::Average,
            Aggregate::Max,
            Aggregate::Min,
            Aggregate::Count,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Aggregate::Sum => "Sum",
            Aggregate::Average => "Average",
            Aggregate::Max => "Max",
            Aggregate::Min => "Min",
            Aggregate::Count => "Count",
        }
    }
}

/// No cell in the table parsed as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoNumericData;

impl fmt::Display for NoNumericData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No numeric data found in the table")
    }
}

impl std::error::Error for NoNumericData {}

/// Recognize a plain non-negative decimal numeral: ASCII digits with at
/// most one dot, nothing else. Signs, exponents and whitespace all
/// disqualify a cell, so "-1", "1e3" and " 2" are treated as text.
pub fn parse_numeral(s: &str) -> Option<f64> {
    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in s.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' if dots == 0 => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 {
        return None;
    }
    s.parse().ok()
}

/// Reduce every numeric cell to one scalar. Scans the whole table, not a
/// single column; COUNT is the number of numeric cells, not rows.
pub fn compute<'a, I>(aggregate: Aggregate, cells: I) -> Result<f64, NoNumericData>
where
    I: IntoIterator<Item = &'a str>,
{
    let values: Vec<f64> = cells.into_iter().filter_map(parse_numeral).collect();
    if values.is_empty() {
        return Err(NoNumericData);
    }

    let result = match aggregate {
        Aggregate::Sum => values.iter().sum(),
        Aggregate::Average => values.iter().sum::<f64>() / values.len() as f64,
        Aggregate::Max => values.iter().cloned().fold(f64::MIN, f64::max),
        Aggregate::Min => values.iter().cloned().fold(f64::MAX, f64::min),
        Aggregate::Count => values.len() as f64,
    };
    Ok(result)
}

/// Render a result the way the dialog shows it: integral values without
/// a decimal tail.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeral_recognition_matches_the_digits_only_rule() {
        assert_eq!(parse_numeral("7"), Some(7.0));
        assert_eq!(parse_numeral("3.5"), Some(3.5));
        assert_eq!(parse_numeral(".5"), Some(0.5));
        assert_eq!(parse_numeral("7."), Some(7.0));

        assert_eq!(parse_numeral(""), None);
        assert_eq!(parse_numeral("."), None);
        assert_eq!(parse_numeral("-1"), None);
        assert_eq!(parse_numeral("+1"), None);
        assert_eq!(parse_numeral("1e3"), None);
        assert_eq!(parse_numeral(" 2"), None);
        assert_eq!(parse_numeral("1.2.3"), None);
        assert_eq!(parse_numeral("abc"), None);
    }

    #[test]
    fn sum_and_count_skip_non_numeric_cells() {
        let cells = ["1", "2", "x", "3.5"];
        assert_eq!(compute(Aggregate::Sum, cells), Ok(6.5));
        assert_eq!(compute(Aggregate::Count, cells), Ok(3.0));
    }

    #[test]
    fn average_min_max_over_mixed_cells() {
        let cells = ["2", "bogus", "4", ""];
        assert_eq!(compute(Aggregate::Average, cells), Ok(3.0));
        assert_eq!(compute(Aggregate::Min, cells), Ok(2.0));
        assert_eq!(compute(Aggregate::Max, cells), Ok(4.0));
    }

    #[test]
    fn all_non_numeric_is_the_no_data_error_not_a_division_by_zero() {
        let cells = ["a", "b", ""];
        assert_eq!(compute(Aggregate::Average, cells), Err(NoNumericData));
        assert_eq!(compute(Aggregate::Sum, cells), Err(NoNumericData));
    }

    #[test]
    fn empty_input_is_the_no_data_error() {
        assert_eq!(compute(Aggregate::Count, std::iter::empty::<&str>()), Err(NoNumericData));
    }

    #[test]
    fn results_format_like_the_dialog() {
        assert_eq!(format_value(6.5), "6.5");
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(0.0), "0");
    }
}
