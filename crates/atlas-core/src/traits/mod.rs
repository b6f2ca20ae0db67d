mod correlation_store;
mod geography;
mod ledger;

pub use correlation_store::ICorrelationStore;
pub use geography::IGeographyTable;
pub use ledger::IInvestmentLedger;
