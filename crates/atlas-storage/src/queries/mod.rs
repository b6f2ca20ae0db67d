pub mod correlation_ops;
pub mod distance_ops;
pub mod investment_ops;
