use regex::Regex;
use std::sync::LazyLock;

/// Everything after the prefix token: optional whitespace, the index digits,
/// an optional `-YYYYMMDD` scan-date token with an optional `(n)` part
/// disambiguator, and an optional `.pdf` extension anchored at the end.
pub(crate) const INDEX_TAIL: &str = r"\s*(\d+)(?:-(\d{8})(?:\((\d+)\))?)?\s*(?:\.pdf)?$";

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

regex!(INDEX_REGEX, format!("{}{}", crate::DEFAULT_PREFIX, INDEX_TAIL).as_str());
