//! Extraction of papers, abstracts and BibTeX entries from ADS classic HTML.
//!
//! The pages are small and machine-generated, so a handful of regexes is
//! enough; nested tables inside the result table are not supported.

use std::sync::LazyLock;

use regex::Regex;

use super::paper::Paper;

static FORM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<form\b[^>]*>(.*?)</form>").expect("form regex is valid"));
static INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<input\b[^>]*>").expect("input regex is valid"));
static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bvalue\s*=\s*"([^"]*)""#).expect("value regex is valid")
});
static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<table\b[^>]*>(.*?)</table>").expect("table regex is valid")
});
static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").expect("row regex is valid"));
static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td>").expect("cell regex is valid"));
static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*"([^"]*)"[^>]*>(.*?)</a>"#)
        .expect("anchor regex is valid")
});
static ABSTRACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Abstract</h3>(.*?)<hr\s*/?>").expect("abstract regex is valid")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex is valid"));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("entity regex is valid")
});

/// Decode the handful of HTML entities ADS emits plus numeric references.
pub fn decode_entities(input: &str) -> String {
    ENTITY_RE
        .replace_all(input, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| name.strip_prefix('#').map(str::parse::<u32>))
                    .and_then(Result::ok)
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Drop tags and decode entities, keeping line structure.
pub fn html_to_text(html: &str) -> String {
    decode_entities(&TAG_RE.replace_all(html, ""))
}

/// Like [`html_to_text`] but collapses all whitespace runs into single spaces.
pub fn inline_text(html: &str) -> String {
    html_to_text(html)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse an abstract-connect result page into papers.
///
/// Bibcodes come from the hidden input of the result form (`;`-separated). In the
/// second table of that form every third row (from row 3) carries the link cell
/// and the row after it carries authors (cell 1) and title (cell 3).
pub fn parse_results(html: &str) -> Vec<Paper> {
    for form in FORM_RE.captures_iter(html) {
        let body = &form[1];
        let tables: Vec<&str> = TABLE_RE
            .captures_iter(body)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
        if tables.len() < 2 {
            continue;
        }
        let bibcodes = form_bibcodes(body);
        if bibcodes.is_empty() {
            continue;
        }
        return parse_result_table(tables[1], &bibcodes);
    }
    tracing::debug!("no result form found in response");
    Vec::new()
}

fn form_bibcodes(form_body: &str) -> Vec<String> {
    let Some(value) = INPUT_RE
        .find(form_body)
        .and_then(|input| VALUE_RE.captures(input.as_str()))
    else {
        return Vec::new();
    };
    decode_entities(&value[1])
        .split(';')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(String::from)
        .collect()
}

fn parse_result_table(table: &str, bibcodes: &[String]) -> Vec<Paper> {
    let mut papers = Vec::with_capacity(bibcodes.len());
    let mut pending: Option<Paper> = None;

    for (i, row) in ROW_RE.captures_iter(table).enumerate() {
        let cells: Vec<&str> = CELL_RE
            .captures_iter(&row[1])
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();

        if i > 0 && i % 3 == 0 {
            let Some(bibcode) = bibcodes.get(papers.len()) else {
                break;
            };
            let mut paper = Paper::new(bibcode.clone());
            if let Some(link_cell) = cells.last() {
                for anchor in ANCHOR_RE.captures_iter(link_cell) {
                    let url = decode_entities(&anchor[1]);
                    paper.set_link(&inline_text(&anchor[2]), &url);
                }
            }
            pending = Some(paper);
        } else if i > 1
            && i % 3 == 1
            && let Some(mut paper) = pending.take()
        {
            paper.authors = cells.get(1).map(|c| inline_text(c)).unwrap_or_default();
            paper.title = cells.get(3).map(|c| inline_text(c)).unwrap_or_default();
            papers.push(paper);
        }
    }

    papers
}

/// The abstract body between the `Abstract` heading and the following rule.
pub fn extract_abstract(html: &str) -> Option<String> {
    let caps = ABSTRACT_RE.captures(html)?;
    let text = inline_text(&caps[1]);
    (!text.is_empty()).then_some(text)
}

/// The BibTeX entry contained in a bibliography response (everything from the first `@`).
pub fn extract_bibtex(body: &str) -> Option<String> {
    let text = html_to_text(body);
    let start = text.find('@')?;
    let entry = text[start..].trim();
    (entry.len() > 1).then(|| entry.to_string())
}
