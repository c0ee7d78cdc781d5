//! Pure domain logic for the product catalog: record shapes, validation,
//! the shallow-merge overlay used by edits, and list option parsing.
//!
//! Nothing in this crate performs I/O.

pub mod error;
pub mod listing;
pub mod product;
pub mod types;
pub mod validation;
