//! Tabular storage: named sheets of string cells
//!
//! Sheets are read and written whole. The mapping between cells and typed
//! records lives in [`crate::sheets`], not here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, TournamentError};

/// A header row followed by data rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `column` in the header
    pub fn column(&self, column: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == column)
    }

    /// Cell text, empty when the row is short
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|c| c.as_str())
            .unwrap_or("")
    }
}

/// Whole-sheet read and replace
pub trait TableStore {
    fn read_table(&self, sheet: &str) -> Result<Table>;
    fn write_table(&mut self, sheet: &str, table: &Table) -> Result<()>;
}

/// Sheets kept in memory; used for dry runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: BTreeMap<String, Table>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet: &str, table: Table) -> Self {
        self.sheets.insert(sheet.to_string(), table);
        self
    }

    pub fn sheet(&self, sheet: &str) -> Option<&Table> {
        self.sheets.get(sheet)
    }
}

impl TableStore for MemoryWorkbook {
    fn read_table(&self, sheet: &str) -> Result<Table> {
        self.sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| TournamentError::MissingSheet(sheet.to_string()))
    }

    fn write_table(&mut self, sheet: &str, table: &Table) -> Result<()> {
        self.sheets.insert(sheet.to_string(), table.clone());
        Ok(())
    }
}

/// Sheets persisted as a single pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct WorkbookFile {
    path: PathBuf,
}

impl WorkbookFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, Table>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|source| TournamentError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl TableStore for WorkbookFile {
    fn read_table(&self, sheet: &str) -> Result<Table> {
        self.load()?
            .remove(sheet)
            .ok_or_else(|| TournamentError::MissingSheet(sheet.to_string()))
    }

    fn write_table(&mut self, sheet: &str, table: &Table) -> Result<()> {
        let mut sheets = self.load()?;
        sheets.insert(sheet.to_string(), table.clone());
        let json = serde_json::to_string_pretty(&sheets)?;
        std::fs::write(&self.path, json).map_err(|source| TournamentError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_and_columns() {
        let mut table = Table::new(&["Player", " Score "]);
        table.push(vec!["Ana".into()]);
        assert_eq!(table.column("Score"), Some(1));
        assert_eq!(table.column("Elo"), None);
        assert_eq!(table.cell(0, 0), "Ana");
        assert_eq!(table.cell(0, 1), "");
        assert_eq!(table.cell(5, 0), "");
    }

    #[test]
    fn test_memory_workbook_replaces_sheets() {
        let mut book = MemoryWorkbook::new();
        assert!(matches!(book.read_table("Games"), Err(TournamentError::MissingSheet(_))));

        let mut table = Table::new(&["Round"]);
        table.push(vec!["1".into()]);
        book.write_table("Games", &table).unwrap();
        book.write_table("Games", &Table::new(&["Round"])).unwrap();
        assert!(book.read_table("Games").unwrap().is_empty());
    }

    #[test]
    fn test_workbook_file_persists_sheets() {
        let path = std::env::temp_dir().join(format!("workbook-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut book = WorkbookFile::new(&path);
        let mut players = Table::new(&["Player"]);
        players.push(vec!["Ana".into()]);
        book.write_table("Leaderboard", &players).unwrap();
        book.write_table("Games", &Table::new(&["Round"])).unwrap();

        let reopened = WorkbookFile::new(&path);
        assert_eq!(reopened.read_table("Leaderboard").unwrap(), players);
        assert!(reopened.read_table("Games").unwrap().is_empty());
        assert!(reopened.read_table("Other").is_err());

        std::fs::remove_file(&path).unwrap();
    }
}
