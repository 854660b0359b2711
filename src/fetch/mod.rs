// src/fetch/mod.rs
pub mod zips;

pub use zips::{ensure_extracted, extract_archive};
