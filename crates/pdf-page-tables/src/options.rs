use crate::error::ExtractError;
use crate::page_selection::PageRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Minimum cells a text line needs to count as a table row.
    pub min_cols: usize,
    /// Reject the page list when any token is not a page number.
    pub strict_pages: bool,
}

impl ExtractOptions {
    pub(crate) fn validate(&self) -> Result<(), ExtractError> {
        if self.min_cols < 2 {
            return Err(ExtractError::InvalidOption(
                "min_cols must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn parse_pages(&self, input: &str) -> Result<PageRequest, ExtractError> {
        if self.strict_pages {
            PageRequest::parse_strict(input)
        } else {
            PageRequest::parse(input)
        }
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_cols: 2,
            strict_pages: false,
        }
    }
}
