pub mod builder;
pub mod export;
pub mod records;

pub use builder::{validate_position, MAX_HORIZON_YEARS};
pub use export::{ledger_rows, LedgerRow, LEDGER_COLUMNS};
pub use records::{CalculationResult, EngineKind, LedgerEvent, YearRecord};
