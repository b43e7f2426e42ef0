//! Receipt composition: building, completing, and voiding sales receipts

pub mod builder;
pub mod lifecycle;
pub mod manager;

pub use builder::*;
pub use manager::*;
