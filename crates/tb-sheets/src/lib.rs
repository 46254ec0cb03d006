//! tb-sheets: spreadsheet read adapter for taskbell
//!
//! Provides the production HTTP client for a Sheets-style values API and an
//! in-memory fake for tests. Both implement `tb_core::SheetStore`.

pub mod client;
pub mod error;
pub mod memory;

pub use client::SheetClient;
pub use error::{Result, SheetError};
pub use memory::MemorySheet;
