use crate::error::ExtractError;
use crate::model::PageResult;
use crate::options::ExtractOptions;
use crate::pdf_reader::PdfSource;
use crate::{ExtractionReport, extract_page_tables};

/// State a front end keeps between interactions: the inputs of the last
/// run and its results.
///
/// `generation` changes on every [`ExtractionSession::reset`] so a front
/// end can key its input controls on it and get fresh ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractionSession {
    file_name: Option<String>,
    page_input: String,
    report: Option<ExtractionReport>,
    generation: u32,
}

impl ExtractionSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a fresh extraction, replacing whatever the previous run left.
    /// On failure the session holds no results.
    pub fn run(
        &mut self,
        source: PdfSource<'_>,
        file_name: &str,
        page_input: &str,
        options: &ExtractOptions,
    ) -> Result<&ExtractionReport, ExtractError> {
        self.report = None;
        self.file_name = Some(file_name.to_string());
        self.page_input = page_input.to_string();

        let report = extract_page_tables(source, page_input, options)?;
        Ok(&*self.report.insert(report))
    }

    pub fn reset(&mut self) {
        self.file_name = None;
        self.page_input.clear();
        self.report = None;
        self.generation = self.generation.wrapping_add(1);
    }

    #[must_use]
    pub fn results(&self) -> &[PageResult] {
        self.report
            .as_ref()
            .map(|report| report.results.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn report(&self) -> Option<&ExtractionReport> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    #[must_use]
    pub fn page_input(&self) -> &str {
        &self.page_input
    }

    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}
