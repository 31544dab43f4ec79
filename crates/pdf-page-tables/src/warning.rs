#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WarningCode {
    NoTableOnPage,
    IgnoredPageToken,
}

/// A non-fatal notice shown next to the results.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    pub code: WarningCode,
    pub message: String,
    pub page: Option<u32>,
}

impl ExtractWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            page: None,
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub(crate) fn no_table(page: u32) -> Self {
        Self::new(
            WarningCode::NoTableOnPage,
            format!("no table found on page {page}"),
        )
        .with_page(page)
    }

    pub(crate) fn ignored_token(token: &str) -> Self {
        Self::new(
            WarningCode::IgnoredPageToken,
            format!("ignored '{token}': not a page number"),
        )
    }
}
