use crate::error::ExtractError;
use crate::model::{Grid, PageText, RawExtract};
use crate::options::ExtractOptions;
use crate::pdf_reader::{LoadedPdf, PdfSource};
use crate::table_parse::{pad_to_widest, soft_split_line_into_cells, split_line_into_cells};

/// Finds table fragments on a single 1-based page.
///
/// `Ok` with no fragments means the page has no table. `Err` means the
/// page could not be inspected at all, and callers stop the batch.
pub trait TableDetector {
    fn detect(&self, page: u32) -> Result<RawExtract, ExtractError>;
}

impl<F> TableDetector for F
where
    F: Fn(u32) -> Result<RawExtract, ExtractError>,
{
    fn detect(&self, page: u32) -> Result<RawExtract, ExtractError> {
        self(page)
    }
}

/// Detects tables from column-aligned text lines.
pub struct TextTableDetector {
    pdf: LoadedPdf,
    min_cols: usize,
}

impl TextTableDetector {
    pub fn load(source: PdfSource<'_>, options: &ExtractOptions) -> Result<Self, ExtractError> {
        options.validate()?;
        let pdf = LoadedPdf::load(source)?;
        tracing::debug!(pages = pdf.page_count(), "loaded PDF");
        Ok(Self {
            pdf,
            min_cols: options.min_cols,
        })
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pdf.page_count()
    }
}

impl TableDetector for TextTableDetector {
    fn detect(&self, page: u32) -> Result<RawExtract, ExtractError> {
        let text = self.pdf.page_text(page)?;
        Ok(detect_fragments(&text, self.min_cols))
    }
}

fn line_cells(line: &str, min_cols: usize) -> Vec<String> {
    let cells = split_line_into_cells(line);
    if cells.len() >= min_cols {
        return cells;
    }

    let soft_cells = soft_split_line_into_cells(line);
    let has_numeric = soft_cells
        .iter()
        .any(|cell| cell.chars().any(|ch| ch.is_ascii_digit()));
    let looks_like_sentence = ['.', '!', '?']
        .iter()
        .any(|punctuation| line.trim_end().ends_with(*punctuation));
    if soft_cells.len() >= min_cols && !looks_like_sentence && (has_numeric || soft_cells.len() <= 6)
    {
        soft_cells
    } else {
        cells
    }
}

pub(crate) fn detect_fragments(page: &PageText, min_cols: usize) -> RawExtract {
    let mut fragments = Vec::new();
    let mut current: Grid = Vec::new();

    let flush = |rows: &mut Grid, fragments: &mut RawExtract| {
        if rows.len() >= 2 {
            let mut grid = std::mem::take(rows);
            pad_to_widest(&mut grid);
            tracing::debug!(
                page = page.page_number,
                rows = grid.len(),
                cols = grid.first().map_or(0, Vec::len),
                "detected table fragment"
            );
            fragments.push(grid);
        } else {
            rows.clear();
        }
    };

    for line in page.text.lines() {
        let cells = line_cells(line, min_cols);
        if cells.len() >= min_cols {
            current.push(cells);
        } else {
            flush(&mut current, &mut fragments);
        }
    }

    flush(&mut current, &mut fragments);

    // Fragments of one page are stacked into a single table, so they share
    // the page's widest row.
    let page_width = fragments.iter().flatten().map(Vec::len).max().unwrap_or(0);
    for row in fragments.iter_mut().flatten() {
        row.resize(page_width, String::new());
    }
    fragments
}

#[cfg(test)]
mod tests {
    use super::{TableDetector, detect_fragments};
    use crate::error::ExtractError;
    use crate::model::{PageText, RawExtract};

    fn page(text: &str) -> PageText {
        PageText {
            page_number: 1,
            text: text.to_string(),
        }
    }

    #[test]
    fn groups_consecutive_aligned_lines_into_one_fragment() {
        let fragments = detect_fragments(&page("Name  Age  Score\nAlice  30  98\nBob  22  87"), 2);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0][0], vec!["Name", "Age", "Score"]);
        assert_eq!(fragments[0][2], vec!["Bob", "22", "87"]);
    }

    #[test]
    fn prose_breaks_fragments_apart() {
        let text = "A  B\n1  2\nSome narrative text ends here.\nC  D\n3  4";
        let fragments = detect_fragments(&page(text), 2);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[1][0], vec!["C", "D"]);
    }

    #[test]
    fn single_aligned_line_is_not_a_table() {
        let fragments = detect_fragments(&page("Total  12\nThe end."), 2);
        assert!(fragments.is_empty());
    }

    #[test]
    fn pads_short_rows_inside_a_fragment() {
        let fragments = detect_fragments(&page("A  B  C\n1  2\n3  4  5"), 2);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0][1], vec!["1", "2", ""]);
    }

    #[test]
    fn fragments_on_one_page_share_the_widest_row() {
        let text = "A  B  C\n1  2  3\nSome narrative text ends here.\nKey  Value\nRate  5";
        let fragments = detect_fragments(&page(text), 2);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[1][0], vec!["Key", "Value", ""]);
        assert_eq!(fragments[1][1], vec!["Rate", "5", ""]);
        assert!(crate::assemble::assemble(&fragments).is_ok());
    }

    #[test]
    fn plain_sentences_produce_no_fragments() {
        let fragments = detect_fragments(&page("This is plain narrative text without columns."), 2);
        assert!(fragments.is_empty());
    }

    #[test]
    fn closures_act_as_detectors() {
        let detector = |page: u32| -> Result<RawExtract, ExtractError> {
            if page == 1 {
                Ok(vec![vec![vec!["a".to_string()]]])
            } else {
                Err(ExtractError::PageOutOfRange {
                    page,
                    page_count: 1,
                })
            }
        };

        assert_eq!(detector.detect(1).expect("page 1 exists").len(), 1);
        assert!(detector.detect(2).is_err());
    }
}
