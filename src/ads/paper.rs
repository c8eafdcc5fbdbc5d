use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Every link letter the ADS result page can attach to a record, in display order.
pub const LINK_ALPHABET: &str = "ACDEFGNORSTUX";

/// A category of supplementary content attached to a result.
///
/// ADS identifies each category by a single upper-case letter; [`LinkKind::from_char`]
/// accepts either case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Abstract,
    Citations,
    DataTables,
    ElectronicArticle,
    FullText,
    ScannedArticle,
    NedObjects,
    Associated,
    References,
    RefereedCitations,
    TableOfContents,
    AlsoRead,
    ArxivPreprint,
}

impl LinkKind {
    pub const ALL: [LinkKind; 13] = [
        LinkKind::Abstract,
        LinkKind::Citations,
        LinkKind::DataTables,
        LinkKind::ElectronicArticle,
        LinkKind::FullText,
        LinkKind::ScannedArticle,
        LinkKind::NedObjects,
        LinkKind::Associated,
        LinkKind::References,
        LinkKind::RefereedCitations,
        LinkKind::TableOfContents,
        LinkKind::AlsoRead,
        LinkKind::ArxivPreprint,
    ];

    pub fn as_char(self) -> char {
        match self {
            LinkKind::Abstract => 'A',
            LinkKind::Citations => 'C',
            LinkKind::DataTables => 'D',
            LinkKind::ElectronicArticle => 'E',
            LinkKind::FullText => 'F',
            LinkKind::ScannedArticle => 'G',
            LinkKind::NedObjects => 'N',
            LinkKind::Associated => 'O',
            LinkKind::References => 'R',
            LinkKind::RefereedCitations => 'S',
            LinkKind::TableOfContents => 'T',
            LinkKind::AlsoRead => 'U',
            LinkKind::ArxivPreprint => 'X',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        Self::ALL.into_iter().find(|k| k.as_char() == upper)
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One record from an ADS result list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Paper {
    pub bibcode: String,
    pub authors: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    pub links: BTreeMap<LinkKind, String>,
}

impl Paper {
    pub fn new(bibcode: impl Into<String>) -> Self {
        Paper {
            bibcode: bibcode.into(),
            ..Paper::default()
        }
    }

    /// Record a link URL under its single-letter label.
    ///
    /// Returns `false` (and stores nothing) when the label is not a known link letter.
    pub fn set_link(&mut self, label: &str, url: &str) -> bool {
        let mut chars = label.trim().chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return false;
        };
        match LinkKind::from_char(c) {
            Some(kind) => {
                self.links.insert(kind, url.to_string());
                true
            }
            None => false,
        }
    }

    pub fn link(&self, kind: LinkKind) -> Option<&str> {
        self.links
            .get(&kind)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }

    pub fn has_link(&self, kind: LinkKind) -> bool {
        self.link(kind).is_some()
    }

    pub fn has_any_link(&self, kinds: &[LinkKind]) -> bool {
        kinds.iter().any(|&k| self.has_link(k))
    }

    /// Letters of every available link, in alphabet order (e.g. `"AEFX"`).
    pub fn available_link_types(&self) -> String {
        LinkKind::ALL
            .into_iter()
            .filter(|&k| self.has_link(k))
            .map(LinkKind::as_char)
            .collect()
    }

    /// Letters of the available links that also appear in `wanted`.
    pub fn available_link_types_in(&self, wanted: &[LinkKind]) -> String {
        LinkKind::ALL
            .into_iter()
            .filter(|k| wanted.contains(k) && self.has_link(*k))
            .map(LinkKind::as_char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_matches_kinds() {
        let letters: String = LinkKind::ALL.iter().map(|k| k.as_char()).collect();
        assert_eq!(letters, LINK_ALPHABET);
    }

    #[test]
    fn from_char_accepts_lower_case() {
        assert_eq!(LinkKind::from_char('x'), Some(LinkKind::ArxivPreprint));
        assert_eq!(LinkKind::from_char('A'), Some(LinkKind::Abstract));
        assert_eq!(LinkKind::from_char('B'), None);
    }

    #[test]
    fn set_link_rejects_unknown_labels() {
        let mut paper = Paper::new("2014ApJ...1..1T");
        assert!(!paper.set_link("B", "http://example.org"));
        assert!(!paper.set_link("AB", "http://example.org"));
        assert!(!paper.set_link("", "http://example.org"));
        assert!(paper.links.is_empty());
    }

    #[test]
    fn empty_url_does_not_count_as_link() {
        let mut paper = Paper::new("x");
        paper.set_link("A", "");
        assert!(!paper.has_link(LinkKind::Abstract));
    }

    #[test]
    fn available_links_in_alphabet_order() {
        let mut paper = Paper::new("x");
        paper.set_link("X", "http://arxiv");
        paper.set_link("a", "http://abs");
        paper.set_link("F", "http://pdf");
        assert_eq!(paper.available_link_types(), "AFX");
        assert_eq!(
            paper.available_link_types_in(&[LinkKind::FullText, LinkKind::ElectronicArticle]),
            "F"
        );
        assert!(paper.has_any_link(&[LinkKind::Citations, LinkKind::ArxivPreprint]));
        assert!(!paper.has_any_link(&[LinkKind::Citations]));
    }
}
