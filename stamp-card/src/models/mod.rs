//! Stamp card data model

pub mod coupon;
pub mod outcome;
pub mod profile;

pub use coupon::*;
pub use outcome::*;
pub use profile::*;
