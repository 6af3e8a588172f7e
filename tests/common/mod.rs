// Shared helpers; not every test binary uses every helper.
#![allow(dead_code)]

pub mod fixtures;
pub mod remotes;
pub mod testing;

pub use fixtures::*;
pub use remotes::*;
pub use testing::*;
