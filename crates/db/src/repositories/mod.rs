//! Repository layer. Each repository is a zero-sized struct with async
//! associated functions that take a store handle.

pub mod product_repo;

pub use product_repo::ProductRepo;
