//! refrates Common Types
//!
//! Shared value types for the refrates workspace: currency codes, requested
//! date windows, and the clock capability used wherever "now" matters.

pub mod currency;
pub mod error;
pub mod range;
pub mod time;

pub use currency::*;
pub use error::*;
pub use range::*;
pub use time::*;
