/// Atlas system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decimal places kept for persisted scores.
pub const SCORE_PRECISION: u32 = 6;

/// Separator used for denormalized code/tag lists.
pub const LIST_SEPARATOR: char = ',';

/// Upper bound on top-N requests against the store.
pub const MAX_TOP_N: usize = 100;

/// Number of leader records shown per province in relation details.
pub const DEFAULT_DETAIL_LEADERS: usize = 3;
