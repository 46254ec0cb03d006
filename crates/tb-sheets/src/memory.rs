//! In-memory sheet fake for tests

use async_trait::async_trait;
use std::sync::Mutex;

use tb_core::{Error, SheetStore};

/// In-memory `SheetStore` holding canned rows.
#[derive(Debug, Default)]
pub struct MemorySheet {
    rows: Vec<Vec<String>>,
    fail_reads: Mutex<bool>,
}

impl MemorySheet {
    /// Create a fake sheet from rows, header included.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows,
            fail_reads: Mutex::new(false),
        }
    }

    /// Build a fake sheet from string slices, header included.
    pub fn from_rows(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    /// Make subsequent reads fail.
    pub fn fail_reads(&self) {
        *self.fail_reads.lock().unwrap() = true;
    }
}

#[async_trait]
impl SheetStore for MemorySheet {
    async fn read_rows(&self) -> tb_core::Result<Vec<Vec<String>>> {
        if *self.fail_reads.lock().unwrap() {
            return Err(Error::Sheet("injected read failure".to_string()));
        }
        Ok(self.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_rows() {
        let sheet = MemorySheet::from_rows(&[
            &["Task", "Status", "Owner", "Deadline", "Email"],
            &["Ship report", "open", "Ana", "2024-06-04", "ana@example.com"],
        ]);
        let rows = sheet.read_rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][3], "2024-06-04");
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let sheet = MemorySheet::default();
        sheet.fail_reads();
        assert!(sheet.read_rows().await.is_err());
    }
}
