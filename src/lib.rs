//! Sales reporting for the America marketplace segment.
//!
//! ```text
//! loader (CSV) → filter (allow-list, selection, category)
//!     → aggregate (grouped sums, shares) → rank (top-N)
//!     → reports (Report: rankings, pivot, narrative)
//! ```
//!
//! `cache::SourceCache` keeps the loaded table between report runs; every
//! other stage is a pure function of its input.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod pivot;
pub mod rank;
pub mod reports;
pub mod types;
pub mod util;

pub use cache::{LoadedSource, SourceCache};
pub use config::{ReportConfig, AMERICA_MARKETPLACES};
pub use error::{LoadError, ReportError};
pub use reports::{compose_report, generate_report, Report};
pub use types::SalesRecord;
