#[macro_use]
extern crate arbitrary;

pub mod generators;
pub mod oracles;
