//! Result type alias for LegalScan

use super::errors::LegalScanError;

/// Result type alias for LegalScan operations
///
/// # Examples
///
/// ```
/// use legalscan::domain::result::Result;
/// use legalscan::domain::errors::LegalScanError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(LegalScanError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LegalScanError>;
