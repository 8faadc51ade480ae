#![allow(dead_code, unused_imports)]

pub mod builders;
pub mod strategies;

pub use builders::*;
