/// The structured parts of an index token found in a file name.
///
/// Only `index` is guaranteed; the scan date and part disambiguator are
/// present on rescanned or multi-part documents.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocIndex {
    /// The register index digits (the capture after the prefix token).
    pub index: String,
    /// Eight-digit date-like token following the index, if any.
    pub scan_date: Option<String>,
    /// Parenthesized disambiguator for multi-part scans, if any.
    pub part: Option<String>,
}

impl DocIndex {
    pub(crate) fn from_captures(captures: &regex::Captures<'_>) -> Self {
        Self {
            index: captures[1].to_string(),
            scan_date: captures.get(2).map(|m| m.as_str().to_string()),
            part: captures.get(3).map(|m| m.as_str().to_string()),
        }
    }
}

impl std::fmt::Display for DocIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index)?;
        if let Some(date) = &self.scan_date {
            write!(f, "-{date}")?;
        }
        if let Some(part) = &self.part {
            write!(f, "({part})")?;
        }
        Ok(())
    }
}
