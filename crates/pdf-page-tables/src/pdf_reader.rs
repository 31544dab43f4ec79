use std::collections::BTreeMap;
use std::path::Path;

use encoding_rs::{BIG5, UTF_16BE};
use lopdf::Document;
use lopdf::Object;
use lopdf::content::Content;

use crate::error::ExtractError;
use crate::model::PageText;
use crate::table_parse::{soft_split_line_into_cells, split_line_into_cells};

fn split_text_into_pages(raw_text: &str) -> Vec<String> {
    let mut pages = raw_text.split('\u{000C}').collect::<Vec<_>>();
    if pages.last() == Some(&"") {
        pages.pop();
    }
    pages.into_iter().map(str::to_string).collect()
}

/// True when a decode left mostly replacement marks, stray control codes or
/// private-use glyph ids behind.
fn looks_decoding_broken(text: &str) -> bool {
    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let (total, garbled) = text.chars().fold((0_usize, 0_usize), |(total, garbled), ch| {
        let stray_control = ch.is_control() && !matches!(ch, '\n' | '\r' | '\t' | '\u{000C}');
        let private_use = ('\u{E000}'..='\u{F8FF}').contains(&ch);
        let bad = ch == '\u{FFFD}' || stray_control || private_use;
        (total + 1, garbled + usize::from(bad))
    });
    total > 0 && garbled * 6 > total
}

fn decode_utf16be(bytes: &[u8]) -> Option<String> {
    let (text, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
    (!had_errors && !text.is_empty()).then(|| text.into_owned())
}

fn decode_big5(bytes: &[u8]) -> Option<String> {
    let (text, _, had_errors) = BIG5.decode(bytes);
    (!had_errors && !text.is_empty()).then(|| text.into_owned())
}

fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    let decoded = Document::decode_text(encoding, bytes);
    if !looks_decoding_broken(&decoded) {
        return decoded;
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF])
        && let Some(text) = decode_utf16be(rest)
    {
        return text;
    }

    let hint = encoding.map(str::to_ascii_lowercase).unwrap_or_default();
    let is_two_byte = ["utf16", "ucs2", "identity-h", "unicode"]
        .iter()
        .any(|marker| hint.contains(marker));
    let is_big5 = ["big5", "b5", "eten", "cns"]
        .iter()
        .any(|marker| hint.contains(marker));

    let fallback = if is_two_byte {
        decode_utf16be(bytes)
    } else if is_big5 {
        decode_big5(bytes)
    } else {
        None
    };
    fallback.unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned())
}

fn extraction_quality_score(text: &str) -> i64 {
    if text.trim().is_empty() {
        return i64::MIN / 4;
    }

    let mut non_empty_lines = 0_i64;
    let mut multi_cell_lines = 0_i64;
    let mut numeric_lines = 0_i64;

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        non_empty_lines += 1;

        if split_line_into_cells(line).len() >= 2 || soft_split_line_into_cells(line).len() >= 3 {
            multi_cell_lines += 1;
        }
        if line.chars().any(|ch| ch.is_ascii_digit()) {
            numeric_lines += 1;
        }
    }

    let broken_penalty = if looks_decoding_broken(text) { 800 } else { 0 };
    multi_cell_lines * 50 + numeric_lines * 15 + non_empty_lines - broken_penalty
}

fn choose_best_text(candidates: &[String]) -> String {
    candidates
        .iter()
        .max_by_key(|text| extraction_quality_score(text))
        .cloned()
        .unwrap_or_default()
}

fn extract_text_from_page_content(document: &Document, page_id: lopdf::ObjectId) -> Option<String> {
    fn collect_text(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => {
                    text.push_str(&decode_pdf_bytes(encoding, bytes));
                }
                Object::Array(items) => {
                    collect_text(text, encoding, items);
                    text.push(' ');
                }
                Object::Integer(value) => {
                    if *value < -100 {
                        text.push(' ');
                    }
                }
                _ => {}
            }
        }
    }

    let raw_content = document.get_page_content(page_id).ok()?;
    let content = Content::decode(&raw_content).ok()?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_encoding = None;
    for operation in content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                if let Some(font_name) = operation
                    .operands
                    .first()
                    .and_then(|operand| operand.as_name().ok())
                {
                    current_encoding = encodings.get(font_name).copied();
                }
            }
            "Tj" | "TJ" | "'" | "\"" => {
                collect_text(&mut current, current_encoding, &operation.operands);
            }
            "T*" | "Td" | "TD" | "ET" => {
                if !current.trim().is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }

    if !current.trim().is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Where the PDF comes from: an uploaded buffer or a file on disk.
#[derive(Debug, Clone, Copy)]
pub enum PdfSource<'a> {
    Bytes(&'a [u8]),
    Path(&'a Path),
}

impl PdfSource<'_> {
    fn load_document(self) -> Result<Document, ExtractError> {
        let document = match self {
            Self::Bytes(bytes) => Document::load_mem(bytes)?,
            Self::Path(path) => Document::load(path)?,
        };
        Ok(document)
    }

    fn extract_full_text(self) -> Option<String> {
        let text = match self {
            Self::Bytes(bytes) => pdf_extract::extract_text_from_mem(bytes),
            Self::Path(path) => pdf_extract::extract_text(path),
        };
        text.inspect_err(|error| tracing::debug!("pdf-extract failed: {error}"))
            .ok()
    }
}

/// A parsed document plus the whole-document text used as a fallback
/// candidate when per-page decoding comes out poor.
pub(crate) struct LoadedPdf {
    document: Document,
    pages: BTreeMap<u32, lopdf::ObjectId>,
    extracted_pages: Option<Vec<String>>,
    extracted_whole: Option<String>,
}

impl LoadedPdf {
    pub(crate) fn load(source: PdfSource<'_>) -> Result<Self, ExtractError> {
        let document = source.load_document()?;
        let pages = document.get_pages();

        let (extracted_pages, extracted_whole) = match source.extract_full_text() {
            Some(text) => {
                let split = split_text_into_pages(&text);
                if split.len() == pages.len() {
                    (Some(split), None)
                } else {
                    (None, Some(text))
                }
            }
            None => (None, None),
        };

        Ok(Self {
            document,
            pages,
            extracted_pages,
            extracted_whole,
        })
    }

    pub(crate) fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub(crate) fn page_text(&self, page: u32) -> Result<PageText, ExtractError> {
        let out_of_range = || ExtractError::PageOutOfRange {
            page,
            page_count: self.pages.len(),
        };
        let index = self
            .pages
            .keys()
            .position(|number| *number == page)
            .ok_or_else(out_of_range)?;
        let page_id = self.pages.get(&page).copied().ok_or_else(out_of_range)?;

        let mut candidates = Vec::new();
        if let Some(text) = self
            .extracted_pages
            .as_ref()
            .and_then(|split| split.get(index).cloned())
            .filter(|text| !text.trim().is_empty())
        {
            candidates.push(text);
        }
        if let Some(text) = extract_text_from_page_content(&self.document, page_id) {
            candidates.push(text);
        }
        if let Some(text) = self
            .document
            .extract_text(&[page])
            .ok()
            .filter(|text| !text.trim().is_empty())
        {
            candidates.push(text);
        }

        let local_best_score = candidates
            .iter()
            .map(|text| extraction_quality_score(text))
            .max()
            .unwrap_or(i64::MIN / 4);
        if index == 0
            && local_best_score < 80
            && let Some(text) = self
                .extracted_whole
                .as_ref()
                .filter(|text| !text.trim().is_empty())
                .cloned()
        {
            candidates.push(text);
        }

        Ok(PageText {
            page_number: page,
            text: choose_best_text(&candidates),
        })
    }
}
