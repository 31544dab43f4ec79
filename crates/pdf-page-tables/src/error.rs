use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("the page list is empty")]
    EmptyPageList,

    #[error("no valid page number was found in the page list")]
    NoValidPages,

    #[error("invalid page number: '{0}'")]
    InvalidPageToken(String),

    #[error("page {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange { page: u32, page_count: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    MalformedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid table: {0}")]
    InvalidTable(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

impl ExtractError {
    /// True for failures caused by the page-list text the user typed.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyPageList | Self::NoValidPages | Self::InvalidPageToken(_)
        )
    }
}
