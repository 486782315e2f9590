//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{create_test_dump, write_dump_file};
