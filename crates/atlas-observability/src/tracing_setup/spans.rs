//! Span definitions per operation: recalculation, pair scoring,
//! propagation, cached query.

/// Create a recalculation span.
#[macro_export]
macro_rules! recalculation_span {
    ($provinces:expr) => {
        tracing::info_span!("atlas.recalculation", provinces = $provinces)
    };
}

/// Create a per-pair scoring span.
#[macro_export]
macro_rules! pair_span {
    ($source:expr, $target:expr) => {
        tracing::debug_span!("atlas.pair", source = %$source, target = %$target)
    };
}

/// Create a propagation span.
#[macro_export]
macro_rules! propagation_span {
    ($top_n:expr) => {
        tracing::info_span!("atlas.propagation", top_n = $top_n)
    };
}

/// Create a query span.
#[macro_export]
macro_rules! query_span {
    ($operation:expr) => {
        tracing::debug_span!("atlas.query", operation = %$operation)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const RECALCULATION: &str = "atlas.recalculation";
    pub const PAIR: &str = "atlas.pair";
    pub const PROPAGATION: &str = "atlas.propagation";
    pub const QUERY: &str = "atlas.query";
}
