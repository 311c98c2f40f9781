//! Work records and year bucketing

use std::collections::BTreeMap;

use crate::data::decode::AuthorSlot;

/// One publication after decoding, with its aligned author positions resolved
#[derive(Debug, Clone, Default)]
pub struct WorkRecord {
    /// Publication year; `None` when the source value is missing or fails
    /// numeric coercion
    pub publication_year: Option<i32>,

    /// Valid author positions of this work, in listed order
    pub authors: Vec<AuthorSlot>,
}

/// Coerce a raw year cell to an integer.
///
/// Exports round-trip pandas float columns, so "2021.0" must coerce like
/// 2021; anything else non-numeric is treated as missing.
pub fn coerce_year(raw: Option<&str>) -> Option<i32> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(year) = value.parse::<i32>() {
        return Some(year);
    }
    match value.parse::<f64>() {
        Ok(year) if year.is_finite() => Some(year as i32),
        _ => None,
    }
}

/// Count works per year over `[start_year, end_year]` inclusive.
///
/// The returned mapping always contains an entry for every integer year in
/// the range, defaulting to 0; callers rely on this density to detect
/// "no works this year". Works without a coerced year are skipped.
pub fn count_by_year(
    works: &[WorkRecord],
    start_year: i32,
    end_year: i32,
) -> BTreeMap<i32, usize> {
    let mut counts: BTreeMap<i32, usize> =
        (start_year..=end_year).map(|year| (year, 0)).collect();

    for work in works {
        if let Some(year) = work.publication_year {
            if let Some(count) = counts.get_mut(&year) {
                *count += 1;
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(year: Option<i32>) -> WorkRecord {
        WorkRecord {
            publication_year: year,
            authors: Vec::new(),
        }
    }

    #[test]
    fn coerce_year_variants() {
        assert_eq!(coerce_year(Some("2021")), Some(2021));
        assert_eq!(coerce_year(Some("2021.0")), Some(2021));
        assert_eq!(coerce_year(Some(" 1998 ")), Some(1998));
        assert_eq!(coerce_year(Some("unknown")), None);
        assert_eq!(coerce_year(Some("")), None);
        assert_eq!(coerce_year(None), None);
    }

    #[test]
    fn dense_range_with_sparse_data() {
        let works = vec![work(Some(2021))];
        let counts = count_by_year(&works, 2020, 2022);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&2020], 0);
        assert_eq!(counts[&2021], 1);
        assert_eq!(counts[&2022], 0);
    }

    #[test]
    fn rows_without_year_are_skipped() {
        let works = vec![work(None), work(Some(2020)), work(Some(2020))];
        let counts = count_by_year(&works, 2020, 2020);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&2020], 2);
    }

    #[test]
    fn out_of_range_years_do_not_count() {
        let works = vec![work(Some(1997)), work(Some(2025))];
        let counts = count_by_year(&works, 1998, 2000);
        assert!(counts.values().all(|&count| count == 0));
        assert_eq!(counts.len(), 3);
    }
}
