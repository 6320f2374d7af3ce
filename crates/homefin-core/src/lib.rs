pub mod amortization;
pub mod error;
pub mod input;
pub mod time_value;
pub mod types;

#[cfg(feature = "mortgage")]
pub mod mortgage;

#[cfg(feature = "debt")]
pub mod debt;

#[cfg(feature = "savings")]
pub mod savings;

#[cfg(feature = "real_estate")]
pub mod real_estate;

#[cfg(feature = "budget")]
pub mod budget;

#[cfg(feature = "scenarios")]
pub mod scenario;

pub use error::HomeFinanceError;
pub use types::*;

/// Standard result type for the fallible (non-calculator) operations
pub type HomeFinanceResult<T> = Result<T, HomeFinanceError>;
