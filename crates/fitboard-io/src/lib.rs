//! fitboard-io - Dataset I/O for the fitboard dashboard
//!
//! This crate provides:
//!
//! - **Table**: row-oriented table of typed values with a uniform column set
//! - **CSV**: comma-separated values with automatic column-type inference
//! - **Catalog**: the static list of loadable datasets and where they live
//!
//! # Design
//!
//! Tokenizing is delegated to the `csv` crate. This crate only decides what
//! type each column holds and turns the records into a [`Table`].

pub mod catalog;
pub mod csv_reader;
pub mod reader;
pub mod table;

pub use catalog::*;
pub use csv_reader::{read_table, CsvReader};
pub use reader::*;
pub use table::*;
