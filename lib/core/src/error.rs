//! Error handling foundation for hrdesk.
//!
//! Only the `Result` alias lives here. Each crate defines its own error
//! enums next to the code that raises them and wraps them in a rootcause
//! `Report` as they propagate.

use rootcause::Report;

/// Result carrying a rootcause `Report` with context `C`.
///
/// Lookup seams use it as `Result<T, LookupError>`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
