//! Utility modules

pub mod input;
pub mod memory_storage;
pub mod validation;

pub use input::*;
pub use memory_storage::*;
pub use validation::*;
