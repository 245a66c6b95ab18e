pub mod error;
pub mod ledger;
pub mod rates;
pub mod types;

#[cfg(feature = "fixed_schedule")]
pub mod fixed_schedule;

#[cfg(feature = "configurable")]
pub mod configurable;

#[cfg(feature = "comparison")]
pub mod comparison;

pub use error::FeeError;
pub use types::*;

/// Standard result type for all fee engine operations
pub type FeeResult<T> = Result<T, FeeError>;
