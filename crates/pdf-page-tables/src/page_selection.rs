use std::str::FromStr;

use crate::error::ExtractError;

/// Ordered list of 1-based page numbers typed by the user.
///
/// Order follows the input and duplicates are kept; every entry is
/// processed on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRequest {
    pages: Vec<u32>,
    ignored: Vec<String>,
}

impl PageRequest {
    /// Parses a comma-separated page list, silently dropping tokens that
    /// are not plain digit runs. Dropped tokens stay available through
    /// [`PageRequest::ignored_tokens`].
    pub fn parse(input: &str) -> Result<Self, ExtractError> {
        Self::parse_with(input, false)
    }

    /// Like [`PageRequest::parse`] but rejects the whole input on the
    /// first invalid token.
    pub fn parse_strict(input: &str) -> Result<Self, ExtractError> {
        Self::parse_with(input, true)
    }

    fn parse_with(input: &str, strict: bool) -> Result<Self, ExtractError> {
        if input.trim().is_empty() {
            return Err(ExtractError::EmptyPageList);
        }

        let mut pages = Vec::new();
        let mut ignored = Vec::new();
        for token in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match parse_page_token(token) {
                Some(page) => pages.push(page),
                None if strict => return Err(ExtractError::InvalidPageToken(token.to_string())),
                None => ignored.push(token.to_string()),
            }
        }

        if pages.is_empty() {
            return Err(ExtractError::NoValidPages);
        }

        Ok(Self { pages, ignored })
    }

    #[must_use]
    pub fn pages(&self) -> &[u32] {
        &self.pages
    }

    #[must_use]
    pub fn ignored_tokens(&self) -> &[String] {
        &self.ignored
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.iter().copied()
    }
}

fn parse_page_token(token: &str) -> Option<u32> {
    if !token.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

impl FromStr for PageRequest {
    type Err = ExtractError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

#[cfg(test)]
mod tests {
    use super::PageRequest;
    use crate::error::ExtractError;

    #[test]
    fn keeps_order_and_duplicates_and_drops_invalid_tokens() {
        let request = PageRequest::parse("3, 7,7,x,  2").expect("request should parse");
        assert_eq!(request.pages(), &[3, 7, 7, 2]);
        assert_eq!(request.ignored_tokens(), &["x".to_string()]);
    }

    #[test]
    fn rejects_blank_input() {
        for input in ["", "   ", "\t\n"] {
            let err = PageRequest::parse(input).expect_err("blank input should fail");
            assert!(matches!(err, ExtractError::EmptyPageList), "{input:?}: {err}");
        }
    }

    #[test]
    fn rejects_input_without_digit_tokens() {
        let err = PageRequest::parse("a,b,c").expect_err("no pages should fail");
        assert!(matches!(err, ExtractError::NoValidPages));

        let err = PageRequest::parse(" , ,").expect_err("only separators should fail");
        assert!(matches!(err, ExtractError::NoValidPages));
    }

    #[test]
    fn signed_decimal_and_overflowing_tokens_are_invalid() {
        let request = PageRequest::parse("-1,+2,3.0,99999999999,4").expect("request should parse");
        assert_eq!(request.pages(), &[4]);
        assert_eq!(request.ignored_tokens().len(), 4);
    }

    #[test]
    fn strict_mode_rejects_any_invalid_token() {
        let err = PageRequest::parse_strict("1, 2, x").expect_err("strict should fail");
        assert!(matches!(err, ExtractError::InvalidPageToken(ref token) if token == "x"));

        let request = PageRequest::parse_strict("5,1").expect("strict should accept digits");
        assert_eq!(request.pages(), &[5, 1]);
    }

    #[test]
    fn from_str_is_lenient() {
        let request: PageRequest = "1,foo".parse().expect("request should parse");
        assert_eq!(request.iter().collect::<Vec<_>>(), vec![1]);
    }
}
