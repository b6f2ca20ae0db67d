use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::LIST_SEPARATOR;

/// One row of the investment ledger.
///
/// `related_provinces` is derived data. Only the propagation step writes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRecord {
    pub id: i64,
    pub title: String,
    pub company_name: Option<String>,
    /// Province code of the record's home province.
    pub province: Option<String>,
    pub industry: Option<String>,
    /// Investment type label. For market data this carries a P/E ratio string.
    pub investment_type: Option<String>,
    /// Concept/theme tags.
    pub concepts: Vec<String>,
    /// Invested amount in 万元.
    pub amount: f64,
    /// Ten-day price change, the momentum metric.
    pub ten_day_change: Option<f64>,
    pub investment_date: Option<NaiveDate>,
    /// Comma-separated province codes.
    pub related_provinces: Option<String>,
    pub active: bool,
}

impl InvestmentRecord {
    /// Home province, if present and non-blank.
    pub fn home_province(&self) -> Option<&str> {
        self.province
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Codes listed in the related-provinces attribute.
    pub fn related_province_codes(&self) -> Vec<String> {
        self.related_provinces
            .as_deref()
            .map(split_list)
            .unwrap_or_default()
    }

    /// True when the record is attributable to `code`: it is the home
    /// province or appears in the related list.
    pub fn is_linked_to(&self, code: &str) -> bool {
        self.home_province() == Some(code) || self.related_province_codes().iter().any(|c| c == code)
    }

    /// True when the record is attributable to both provinces.
    pub fn is_joint(&self, a: &str, b: &str) -> bool {
        let home = self.home_province();
        let related = self.related_province_codes();
        let mentions = |code: &str| related.iter().any(|c| c == code);
        (home == Some(a) && mentions(b))
            || (home == Some(b) && mentions(a))
            || (mentions(a) && mentions(b))
    }
}

/// Split a comma-separated list, trimming entries and dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join entries with the list separator.
pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&LIST_SEPARATOR.to_string())
}

/// Distinct province codes seen across records, including codes that only
/// appear inside related-province lists. Inactive records are ignored.
pub fn distinct_provinces<'a, I>(records: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a InvestmentRecord>,
{
    let mut provinces = BTreeSet::new();
    for record in records.into_iter().filter(|r| r.active) {
        if let Some(home) = record.home_province() {
            provinces.insert(home.to_string());
        }
        provinces.extend(record.related_province_codes());
    }
    provinces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(province: &str, related: Option<&str>) -> InvestmentRecord {
        InvestmentRecord {
            id: 1,
            province: Some(province.to_string()),
            related_provinces: related.map(str::to_string),
            active: true,
            ..Default::default()
        }
    }

    #[test]
    fn split_list_trims_and_drops_blanks() {
        assert_eq!(split_list(" 粤, 湘,,  "), vec!["粤", "湘"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn joint_requires_both_sides() {
        let r = record("粤", Some("湘,桂"));
        assert!(r.is_joint("粤", "湘"));
        assert!(r.is_joint("湘", "桂"));
        assert!(!r.is_joint("粤", "京"));
    }

    #[test]
    fn distinct_provinces_includes_related_only_codes() {
        let mut inactive = record("京", Some("津"));
        inactive.active = false;
        let records = vec![record("粤", Some("湘")), record("湘", None), inactive];
        let provinces = distinct_provinces(&records);
        assert_eq!(provinces.into_iter().collect::<Vec<_>>(), vec!["湘", "粤"]);
    }
}
