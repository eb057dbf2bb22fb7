//! Report Composer: turns the measurement records into a notebook document and a pair
//! of SVG charts. Nothing here runs a benchmark.

pub mod charts;
pub mod notebook;

pub use notebook::{compose, write_notebook, Notebook, ReportInput};
