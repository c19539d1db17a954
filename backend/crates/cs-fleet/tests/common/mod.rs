#![allow(unused_imports)]

pub(crate) mod fake_toolchain;
pub(crate) mod test_fleet;

pub use fake_toolchain::*;
pub use test_fleet::*;
