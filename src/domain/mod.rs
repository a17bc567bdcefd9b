//! Domain error and result types for LegalScan.
//!
//! All fatal failures surface as [`LegalScanError`]. The recoverable kinds
//! ([`ExtractionError`], [`TaggerError`]) never escape a pipeline run; they
//! are logged and the run continues with fewer candidates.
//!
//! ```rust
//! use legalscan::domain::{LegalScanError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(LegalScanError::InputTooLarge { len: 10, limit: 5 })
//! }
//! assert!(example().is_err());
//! ```

pub mod errors;
pub mod result;

pub use errors::{ExtractionError, LegalScanError, TaggerError};
pub use result::Result;
