//! Entity store: record drafts, patches, and the manager that mutates them

pub mod manager;
pub mod records;

pub use manager::*;
pub use records::*;
