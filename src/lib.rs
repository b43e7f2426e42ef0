//! # VAT Core
//!
//! VAT breakdown engine for a point-of-sale tool: decimal-safe tax math,
//! receipt composition, and period sales summaries.
//!
//! ## Features
//!
//! - **Tax engine**: net/gross conversions and categorized VAT breakdowns
//! - **Tax categories**: standard-rated (tax-inclusive), exempt, and zero-rated,
//!   reported on separate lines
//! - **Explicit rounding**: full-precision math, rounded once per output field
//! - **Configuration**: rate and rounding from TOML and the environment, published
//!   as immutable snapshots
//! - **Receipts and reports**: draft/complete/void lifecycle and period summaries
//! - **Storage abstraction**: trait-based receipt storage with an in-memory backend
//!
//! ## Quick Start
//!
//! ```rust
//! use vat_core::{aggregate_breakdown, LineItem, TaxCategory};
//! use bigdecimal::BigDecimal;
//!
//! let items = vec![
//!     LineItem::new("a".to_string(), BigDecimal::from(1000), 1, TaxCategory::Standard),
//!     LineItem::new("b".to_string(), BigDecimal::from(500), 2, TaxCategory::Exempt),
//!     LineItem::new("c".to_string(), BigDecimal::from(200), 1, TaxCategory::ZeroRated),
//! ];
//!
//! let rate: BigDecimal = "0.12".parse().unwrap();
//! let breakdown = aggregate_breakdown(&items, &rate).unwrap();
//!
//! assert_eq!(breakdown.tax_amount, "107.14".parse::<BigDecimal>().unwrap());
//! assert_eq!(breakdown.total_sales, BigDecimal::from(2200));
//! ```

pub mod config;
pub mod receipt;
pub mod report;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use receipt::*;
pub use report::*;
pub use tax::*;
pub use traits::*;
pub use types::*;
