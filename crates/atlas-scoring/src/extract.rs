//! Helpers that turn record sets into the inputs of the dimension scorers.

use std::collections::{BTreeMap, BTreeSet};

use atlas_core::models::{split_list, InvestmentRecord};

/// Count occurrences of a categorical attribute. Blank labels are ignored.
pub fn frequencies<F>(records: &[InvestmentRecord], attribute: F) -> BTreeMap<String, usize>
where
    F: Fn(&InvestmentRecord) -> Option<&str>,
{
    let mut counts = BTreeMap::new();
    for label in records.iter().filter_map(|r| clean(attribute(r))) {
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }
    counts
}

pub fn industry_frequencies(records: &[InvestmentRecord]) -> BTreeMap<String, usize> {
    frequencies(records, |r| r.industry.as_deref())
}

/// Distinct non-blank labels of a categorical attribute.
pub fn label_set<F>(records: &[InvestmentRecord], attribute: F) -> BTreeSet<String>
where
    F: Fn(&InvestmentRecord) -> Option<&str>,
{
    records
        .iter()
        .filter_map(|r| clean(attribute(r)))
        .map(str::to_string)
        .collect()
}

pub fn industry_set(records: &[InvestmentRecord]) -> BTreeSet<String> {
    label_set(records, |r| r.industry.as_deref())
}

pub fn investment_type_set(records: &[InvestmentRecord]) -> BTreeSet<String> {
    label_set(records, |r| r.investment_type.as_deref())
}

/// Every concept tag across the records. Tags may themselves be
/// comma-separated lists.
pub fn concept_set(records: &[InvestmentRecord]) -> BTreeSet<String> {
    records
        .iter()
        .flat_map(|r| r.concepts.iter())
        .flat_map(|tag| split_list(tag))
        .collect()
}

/// Sorted intersection of two sets.
pub fn common_elements(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Vec<String> {
    a.intersection(b).cloned().collect()
}

pub fn total_amount(records: &[InvestmentRecord]) -> f64 {
    records
        .iter()
        .map(|r| r.amount)
        .filter(|a| a.is_finite())
        .sum()
}

fn clean(label: Option<&str>) -> Option<&str> {
    label.map(str::trim).filter(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(industry: Option<&str>, concepts: &[&str]) -> InvestmentRecord {
        InvestmentRecord {
            industry: industry.map(str::to_string),
            concepts: concepts.iter().map(|c| c.to_string()).collect(),
            active: true,
            ..Default::default()
        }
    }

    #[test]
    fn frequencies_skip_blank_labels() {
        let records = vec![
            record(Some("Tech"), &[]),
            record(Some(" Tech "), &[]),
            record(Some("  "), &[]),
            record(None, &[]),
        ];
        let freq = industry_frequencies(&records);
        assert_eq!(freq.len(), 1);
        assert_eq!(freq["Tech"], 2);
    }

    #[test]
    fn concept_set_splits_comma_lists() {
        let records = vec![record(None, &["芯片, 5G", ""]), record(None, &["AI"])];
        let concepts = concept_set(&records);
        assert_eq!(
            concepts.into_iter().collect::<Vec<_>>(),
            vec!["5G", "AI", "芯片"]
        );
    }

    #[test]
    fn common_elements_are_sorted() {
        let a: BTreeSet<String> = ["b", "a", "c"].iter().map(|s| s.to_string()).collect();
        let b: BTreeSet<String> = ["c", "a"].iter().map(|s| s.to_string()).collect();
        assert_eq!(common_elements(&a, &b), vec!["a", "c"]);
    }
}
