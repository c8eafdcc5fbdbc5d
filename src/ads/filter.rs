use std::str::FromStr;

use anyhow::{Result, bail};

use super::paper::{LINK_ALPHABET, LinkKind, Paper};

/// A set of link kinds a paper must offer (any of them) to be kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFilter {
    kinds: Vec<LinkKind>,
}

impl LinkFilter {
    pub fn new(kinds: Vec<LinkKind>) -> Self {
        LinkFilter { kinds }
    }

    pub fn kinds(&self) -> &[LinkKind] {
        &self.kinds
    }

    /// The requested link letters this paper actually has, or `None` if it has none of them.
    pub fn matches(&self, paper: &Paper) -> Option<String> {
        let letters = paper.available_link_types_in(&self.kinds);
        (!letters.is_empty()).then_some(letters)
    }
}

impl FromStr for LinkFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut kinds = Vec::new();
        for c in s.chars().filter(|c| !c.is_whitespace()) {
            let Some(kind) = LinkKind::from_char(c) else {
                bail!("unknown link type '{c}' (expected letters from {LINK_ALPHABET})");
            };
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(LinkFilter { kinds })
    }
}

/// A paper that passed a [`LinkFilter`], with the matching link letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'a> {
    pub paper: &'a Paper,
    pub links: String,
}

/// Keep the papers offering at least one of the filter's link kinds.
pub fn find<'a>(papers: &'a [Paper], filter: &LinkFilter) -> Vec<Match<'a>> {
    papers
        .iter()
        .filter_map(|paper| filter.matches(paper).map(|links| Match { paper, links }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(bibcode: &str, links: &[&str]) -> Paper {
        let mut p = Paper::new(bibcode);
        for l in links {
            p.set_link(l, "http://example.org");
        }
        p
    }

    #[test]
    fn parse_filter_dedups_and_ignores_case() {
        let filter: LinkFilter = "fEf".parse().unwrap();
        assert_eq!(
            filter.kinds(),
            &[LinkKind::FullText, LinkKind::ElectronicArticle]
        );
    }

    #[test]
    fn parse_filter_rejects_unknown_letter() {
        let err = "AZ".parse::<LinkFilter>().unwrap_err();
        assert!(err.to_string().contains('Z'));
    }

    #[test]
    fn find_keeps_papers_with_any_requested_link() {
        let papers = vec![
            paper("one", &["A", "F"]),
            paper("two", &["A"]),
            paper("three", &["E", "X"]),
        ];
        let filter: LinkFilter = "FE".parse().unwrap();
        let found = find(&papers, &filter);
        let summary: Vec<(&str, &str)> = found
            .iter()
            .map(|m| (m.paper.bibcode.as_str(), m.links.as_str()))
            .collect();
        assert_eq!(summary, vec![("one", "F"), ("three", "E")]);
    }

    #[test]
    fn empty_filter_matches_nothing() {
        let papers = vec![paper("one", &["A"])];
        assert!(find(&papers, &LinkFilter::new(vec![])).is_empty());
    }
}
