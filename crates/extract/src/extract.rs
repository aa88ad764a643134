use crate::consts;
use crate::models::DocIndex;
use regex::{Regex, escape as regex_escape};
use tracing::instrument;

/// Extracts the index digits from a file name using the default prefix.
///
/// Returns the captured digit group as a slice of the input, or `None`
/// when the name does not carry an index token. Pure and total: a
/// non-matching name is not an error.
///
/// # Examples
///
/// ```
/// use skiff_extract::extract_index;
///
/// assert_eq!(extract_index("CKS 1043-20240117.pdf"), Some("1043"));
/// assert_eq!(extract_index("holiday-photos.zip"), None);
/// ```
#[instrument(level = "trace")]
pub fn extract_index(name: &str) -> Option<&str> {
    consts::INDEX_REGEX.captures(name).map(|captures| captures.get(1).map_or("", |m| m.as_str()))
}

/// A compiled index pattern with a custom prefix token.
///
/// The prefix is matched case-sensitively and literally (it is escaped
/// before compilation), so punctuation in a prefix cannot change the
/// shape of the pattern.
///
/// # Examples
///
/// ```
/// use skiff_extract::IndexPattern;
///
/// let pattern = IndexPattern::new("INV");
/// let doc = pattern.extract("INV 77-20231204(2).pdf").unwrap();
/// assert_eq!(doc.index, "77");
/// assert_eq!(doc.scan_date.as_deref(), Some("20231204"));
/// assert_eq!(doc.part.as_deref(), Some("2"));
/// ```
#[derive(Debug, Clone)]
pub struct IndexPattern {
    regex: Regex,
}

impl IndexPattern {
    /// Compile a pattern for the given prefix token.
    pub fn new(prefix: &str) -> Self {
        // The prefix is escaped and the tail is a fixed valid pattern, so
        // compilation cannot fail.
        let regex = Regex::new(&format!("{}{}", regex_escape(prefix), consts::INDEX_TAIL)).unwrap();
        Self { regex }
    }

    /// Extract the full structured index from a file name, or `None` when
    /// the name does not match.
    pub fn extract(&self, name: &str) -> Option<DocIndex> {
        self.regex.captures(name).map(|captures| DocIndex::from_captures(&captures))
    }

    /// Extract only the index digits from a file name.
    pub fn extract_index<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.regex.captures(name).map(|captures| captures.get(1).map_or("", |m| m.as_str()))
    }
}

impl Default for IndexPattern {
    fn default() -> Self {
        Self::new(crate::DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("CKS1043", Some("1043"))]
    #[case("CKS 1043", Some("1043"))]
    #[case("CKS  204881", Some("204881"))]
    #[case("CKS 1043.pdf", Some("1043"))]
    #[case("CKS 1043-20240117.pdf", Some("1043"))]
    #[case("CKS 1043-20240117(2).pdf", Some("1043"))]
    #[case("CKS 1043-20240117(11)", Some("1043"))]
    #[case("Box 7 CKS 1043.pdf", Some("1043"))]
    fn matching_names(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_index(name), expected);
    }

    #[rstest]
    #[case("")]
    #[case("holiday-photos.zip")]
    #[case("cks 1043.pdf")] // prefix is case-sensitive
    #[case("CKS.pdf")] // no digits
    #[case("CKS 1043.docx")] // wrong extension is not anchored at the end
    #[case("CKS 1043-2024.pdf")] // date token must be exactly eight digits
    fn non_matching_names(#[case] name: &str) {
        assert_eq!(extract_index(name), None);
    }

    #[test]
    fn structured_extraction() {
        let doc = IndexPattern::default().extract("CKS 31-20220101(3).pdf").unwrap();
        assert_eq!(doc.index, "31");
        assert_eq!(doc.scan_date.as_deref(), Some("20220101"));
        assert_eq!(doc.part.as_deref(), Some("3"));
        assert_eq!(doc.to_string(), "31-20220101(3)");
    }

    #[test]
    fn date_without_part() {
        let doc = IndexPattern::default().extract("CKS 31-20220101.pdf").unwrap();
        assert_eq!(doc.scan_date.as_deref(), Some("20220101"));
        assert_eq!(doc.part, None);
    }

    #[test]
    fn custom_prefix_is_escaped() {
        let pattern = IndexPattern::new("A.B");
        assert_eq!(pattern.extract_index("A.B 42.pdf"), Some("42"));
        // A literal dot must not act as a wildcard.
        assert_eq!(pattern.extract_index("AxB 42.pdf"), None);
    }

    #[test]
    fn custom_prefix_does_not_match_default() {
        let pattern = IndexPattern::new("INV");
        assert_eq!(pattern.extract_index("CKS 42.pdf"), None);
    }
}
