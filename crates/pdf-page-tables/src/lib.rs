mod assemble;
mod csv_out;
mod detect;
mod error;
mod model;
mod options;
mod page_selection;
mod pdf_reader;
mod session;
mod table_parse;
mod warning;
mod xlsx_out;

pub use assemble::{assemble, dedup_header_names};
pub use csv_out::{csv_string, write_csv};
pub use detect::{TableDetector, TextTableDetector};
pub use error::ExtractError;
pub use model::{AssembledTable, Grid, PageOutcome, PageResult, RawExtract};
pub use options::ExtractOptions;
pub use page_selection::PageRequest;
pub use pdf_reader::PdfSource;
pub use session::ExtractionSession;
pub use warning::{ExtractWarning, WarningCode as ExtractWarningCode};
pub use xlsx_out::{DEFAULT_SHEET_NAME, XLSX_MIME_TYPE, export_file_name, write_xlsx, xlsx_bytes};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractionReport {
    pub results: Vec<PageResult>,
    pub warnings: Vec<ExtractWarning>,
}

impl ExtractionReport {
    /// Pages that produced a table, in request order.
    pub fn tables(&self) -> impl Iterator<Item = (u32, &AssembledTable)> + '_ {
        self.results
            .iter()
            .filter_map(|result| result.table().map(|table| (result.page, table)))
    }

    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables().count()
    }
}

/// Runs detection and assembly for every requested page, in order.
///
/// A page without tables is recorded as [`PageOutcome::NoTable`] together
/// with a warning and the loop moves on. Any detector or assembly error ends
/// the whole batch.
pub fn process_pages<D>(request: &PageRequest, detector: &D) -> Result<ExtractionReport, ExtractError>
where
    D: TableDetector + ?Sized,
{
    let mut report = ExtractionReport::default();

    for token in request.ignored_tokens() {
        tracing::warn!(token = %token, "ignoring page token that is not a number");
        report.warnings.push(ExtractWarning::ignored_token(token));
    }

    for page in request.iter() {
        tracing::info!(page, "processing page");
        let fragments = detector.detect(page).inspect_err(|error| {
            tracing::error!(page, "table detection failed: {error}");
        })?;

        let assembled = assemble(&fragments).inspect_err(|error| {
            tracing::error!(page, "table assembly failed: {error}");
        })?;
        let outcome = match assembled {
            Some(table) => {
                tracing::info!(
                    page,
                    fragments = fragments.len(),
                    rows = table.row_count(),
                    cols = table.width(),
                    "assembled table"
                );
                PageOutcome::Table(table)
            }
            None => {
                tracing::warn!(page, "no table found");
                report.warnings.push(ExtractWarning::no_table(page));
                PageOutcome::NoTable
            }
        };
        report.results.push(PageResult { page, outcome });
    }

    Ok(report)
}

/// Parses `page_input`, loads the PDF once and extracts each page's table.
pub fn extract_page_tables(
    source: PdfSource<'_>,
    page_input: &str,
    options: &ExtractOptions,
) -> Result<ExtractionReport, ExtractError> {
    let request = options.parse_pages(page_input)?;
    let detector = TextTableDetector::load(source, options)?;
    process_pages(&request, &detector)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::{ExtractWarningCode, PageOutcome, PageRequest, RawExtract, process_pages};
    use crate::error::ExtractError;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn records_tables_and_missing_tables_in_request_order() {
        let request = PageRequest::parse("1,2").expect("request should parse");
        let detector = |page: u32| -> Result<RawExtract, ExtractError> {
            if page == 1 {
                Ok(vec![grid(&[
                    &["Name", "Age", "Score"],
                    &["Alice", "30", "98"],
                    &["Bob", "22", "87"],
                ])])
            } else {
                Ok(Vec::new())
            }
        };

        let report = process_pages(&request, &detector).expect("processing should succeed");
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].page, 1);
        let table = report.results[0].table().expect("page 1 has a table");
        assert_eq!(table.row_count(), 2);
        assert_eq!(report.results[1].page, 2);
        assert_eq!(report.results[1].outcome, PageOutcome::NoTable);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].code, ExtractWarningCode::NoTableOnPage);
        assert_eq!(report.warnings[0].page, Some(2));
        assert_eq!(report.table_count(), 1);
    }

    #[test]
    fn duplicate_pages_are_detected_each_time() {
        let calls = RefCell::new(Vec::new());
        let request = PageRequest::parse("4,4,1").expect("request should parse");
        let detector = |page: u32| -> Result<RawExtract, ExtractError> {
            calls.borrow_mut().push(page);
            Ok(vec![grid(&[&["h"], &["v"]])])
        };

        let report = process_pages(&request, &detector).expect("processing should succeed");
        assert_eq!(calls.into_inner(), vec![4, 4, 1]);
        let pages = report.results.iter().map(|r| r.page).collect::<Vec<_>>();
        assert_eq!(pages, vec![4, 4, 1]);
    }

    #[test]
    fn detector_errors_stop_the_batch() {
        let calls = RefCell::new(0_usize);
        let request = PageRequest::parse("1,9,2").expect("request should parse");
        let detector = |page: u32| -> Result<RawExtract, ExtractError> {
            *calls.borrow_mut() += 1;
            if page == 9 {
                Err(ExtractError::PageOutOfRange {
                    page,
                    page_count: 2,
                })
            } else {
                Ok(Vec::new())
            }
        };

        let err = process_pages(&request, &detector).expect_err("page 9 should fail");
        assert!(matches!(err, ExtractError::PageOutOfRange { page: 9, .. }));
        assert_eq!(calls.into_inner(), 2);
    }

    #[test]
    fn ignored_tokens_become_warnings() {
        let request = PageRequest::parse("1,abc").expect("request should parse");
        let detector = |_: u32| -> Result<RawExtract, ExtractError> { Ok(Vec::new()) };

        let report = process_pages(&request, &detector).expect("processing should succeed");
        assert_eq!(report.warnings[0].code, ExtractWarningCode::IgnoredPageToken);
        assert!(report.warnings[0].message.contains("abc"));
    }

    #[test]
    fn malformed_fragments_fail_the_batch() {
        let calls = RefCell::new(Vec::new());
        let request = PageRequest::parse("1,2").expect("request should parse");
        let detector = |page: u32| -> Result<RawExtract, ExtractError> {
            calls.borrow_mut().push(page);
            Ok(vec![grid(&[&["a", "b"]]), grid(&[&["c"]])])
        };

        let err = process_pages(&request, &detector).expect_err("ragged fragments should fail");
        assert!(matches!(
            err,
            ExtractError::MalformedGrid {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
        assert_eq!(calls.into_inner(), vec![1]);
    }
}
