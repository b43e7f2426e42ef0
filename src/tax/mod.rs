//! Tax computation: VAT math and minor-unit rounding

pub mod rounding;
pub mod vat;

pub use rounding::*;
pub use vat::*;
