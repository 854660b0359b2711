// src/export/mod.rs
pub mod chart;
pub mod workbook;

pub use chart::draw_chart;
pub use workbook::write_workbook;
