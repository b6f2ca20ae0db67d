//! Company-type bucketing over the P/E-like `investment_type` field.

use std::collections::BTreeSet;

use atlas_core::models::InvestmentRecord;

const LOSS_MARKERS: [&str; 5] = ["-", "--", "亏损", "N/A", "NaN"];

/// Valuation bucket of one record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompanyType {
    LossMaking,
    Value,
    Growth,
    Overvalued,
    /// Unparsable label kept verbatim.
    Other(String),
}

impl CompanyType {
    /// Classify a raw label. Blank or missing input has no bucket.
    pub fn classify(raw: Option<&str>) -> Option<CompanyType> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
        if LOSS_MARKERS.iter().any(|m| m.eq_ignore_ascii_case(raw)) {
            return Some(CompanyType::LossMaking);
        }
        match raw.parse::<f64>() {
            Ok(pe) if !pe.is_finite() || pe <= 0.0 => Some(CompanyType::LossMaking),
            Ok(pe) if pe <= 15.0 => Some(CompanyType::Value),
            Ok(pe) if pe <= 50.0 => Some(CompanyType::Growth),
            Ok(_) => Some(CompanyType::Overvalued),
            Err(_) => Some(CompanyType::Other(raw.to_string())),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CompanyType::LossMaking => "loss-making",
            CompanyType::Value => "value",
            CompanyType::Growth => "growth",
            CompanyType::Overvalued => "overvalued",
            CompanyType::Other(raw) => raw,
        }
    }
}

/// Bucket labels present among the records.
pub fn company_type_set(records: &[InvestmentRecord]) -> BTreeSet<String> {
    records
        .iter()
        .filter_map(|r| CompanyType::classify(r.investment_type.as_deref()))
        .map(|t| t.label().to_string())
        .collect()
}
