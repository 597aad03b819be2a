use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// A parsed column value that remembers whether the column was there at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field<T> {
    Present(T),
    /// Column present, text not usable.
    Malformed,
    /// Column absent from the row.
    Missing,
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Present(v) => Some(v),
            Field::Malformed | Field::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Field::Malformed)
    }
}

impl<T: Copy> Field<T> {
    pub fn get(&self) -> Option<T> {
        self.value().copied()
    }
}

pub fn parse_int(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    // "38.0" style exports.
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

pub fn parse_decimal(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_delimited_int(raw: Option<&str>) -> Field<i64> {
    let Some(raw) = raw else {
        return Field::Missing;
    };
    match parse_int(Some(&strip_delimiters(raw))) {
        Some(v) => Field::Present(v),
        None => Field::Malformed,
    }
}

pub fn parse_delimited_decimal(raw: Option<&str>) -> Field<f64> {
    let Some(raw) = raw else {
        return Field::Missing;
    };
    match parse_decimal(Some(&strip_delimiters(raw))) {
        Some(v) => Field::Present(v),
        None => Field::Malformed,
    }
}

pub fn optional_text(raw: Option<&str>) -> Option<String> {
    let s = raw?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Free text where an absent column and a blank cell mean different things.
pub fn text_field(raw: Option<&str>) -> Field<String> {
    match raw {
        None => Field::Missing,
        Some(s) => match optional_text(Some(s)) {
            Some(text) => Field::Present(text),
            None => Field::Malformed,
        },
    }
}

pub fn parse_date(raw: Option<&str>) -> Field<NaiveDate> {
    let Some(raw) = raw else {
        return Field::Missing;
    };
    let s = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map_or(Field::Malformed, Field::Present)
}

fn strip_delimiters(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ',' | '\'' | '\u{2019}' | ' ' | '\u{a0}'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Field, parse_date, parse_decimal, parse_delimited_int, parse_int, text_field};
    use chrono::NaiveDate;

    #[test]
    fn int_parser_accepts_integral_decimals() {
        assert_eq!(parse_int(Some(" 38 ")), Some(38));
        assert_eq!(parse_int(Some("38.0")), Some(38));
        assert_eq!(parse_int(Some("38.5")), None);
        assert_eq!(parse_int(Some("")), None);
        assert_eq!(parse_int(None), None);
    }

    #[test]
    fn decimal_parser_rejects_non_finite() {
        assert_eq!(parse_decimal(Some("0.75")), Some(0.75));
        assert_eq!(parse_decimal(Some("NaN")), None);
        assert_eq!(parse_decimal(Some("inf")), None);
        assert_eq!(parse_decimal(Some("-")), None);
    }

    #[test]
    fn delimited_int_strips_separators() {
        assert_eq!(parse_delimited_int(Some("12,345")), Field::Present(12345));
        assert_eq!(parse_delimited_int(Some("1'234")), Field::Present(1234));
        assert_eq!(parse_delimited_int(Some("abc")), Field::Malformed);
        assert_eq!(parse_delimited_int(Some("")), Field::Malformed);
        assert_eq!(parse_delimited_int(None), Field::Missing);
    }

    #[test]
    fn text_field_separates_blank_from_absent() {
        assert_eq!(text_field(Some(" €90m ")), Field::Present("€90m".to_string()));
        assert!(text_field(Some("  ")).is_malformed());
        assert!(text_field(None).is_missing());
    }

    #[test]
    fn date_parser_handles_known_formats() {
        let want = NaiveDate::from_ymd_opt(1992, 8, 15).unwrap();
        assert_eq!(parse_date(Some("1992-08-15")), Field::Present(want));
        assert_eq!(parse_date(Some("15/08/1992")), Field::Present(want));
        assert_eq!(parse_date(Some("yesterday")), Field::Malformed);
        assert_eq!(parse_date(None), Field::Missing);
    }
}
