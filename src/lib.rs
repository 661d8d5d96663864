pub use sasc_core::*;

pub mod report;
