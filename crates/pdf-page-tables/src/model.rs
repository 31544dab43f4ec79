use crate::error::ExtractError;

/// Rectangular block of text cells.
pub type Grid = Vec<Vec<String>>;

/// Fragments detected on one page, in reading order.
pub type RawExtract = Vec<Grid>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// A page table with a unique header and equally wide body rows.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TableParts", into = "TableParts"))]
pub struct AssembledTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl AssembledTable {
    /// Builds a table from parts that were assembled earlier, checking
    /// that header names are unique and all rows match the header width.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ExtractError> {
        for (index, name) in header.iter().enumerate() {
            if header[..index].contains(name) {
                return Err(ExtractError::InvalidTable(format!(
                    "duplicate column name '{name}'"
                )));
            }
        }
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != header.len())
        {
            return Err(ExtractError::MalformedGrid {
                row: index + 1,
                expected: header.len(),
                found: row.len(),
            });
        }
        Ok(Self { header, rows })
    }

    pub(crate) fn from_checked_parts(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.header.len()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct TableParts {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[cfg(feature = "serde")]
impl TryFrom<TableParts> for AssembledTable {
    type Error = ExtractError;

    fn try_from(parts: TableParts) -> Result<Self, Self::Error> {
        Self::new(parts.header, parts.rows)
    }
}

#[cfg(feature = "serde")]
impl From<AssembledTable> for TableParts {
    fn from(table: AssembledTable) -> Self {
        Self {
            header: table.header,
            rows: table.rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", content = "table", rename_all = "snake_case"))]
pub enum PageOutcome {
    Table(AssembledTable),
    NoTable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageResult {
    pub page: u32,
    pub outcome: PageOutcome,
}

impl PageResult {
    #[must_use]
    pub fn table(&self) -> Option<&AssembledTable> {
        match &self.outcome {
            PageOutcome::Table(table) => Some(table),
            PageOutcome::NoTable => None,
        }
    }
}
