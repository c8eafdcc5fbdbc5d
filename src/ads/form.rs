use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Result, bail};

/// Every parameter name the abstract-connect endpoint accepts from us.
const KNOWN_KEYS: &[&str] = &[
    "db_key",
    "qform",
    "arxiv_sel",
    "sim_query",
    "ned_query",
    "adsobj_query",
    "aut_logic",
    "obj_logic",
    "nr_to_return",
    "start_nr",
    "jou_pick",
    "ref_stems",
    "data_and",
    "group_and",
    "start_entry_day",
    "start_entry_mon",
    "start_entry_year",
    "end_entry_day",
    "end_entry_mon",
    "end_entry_year",
    "min_score",
    "sort",
    "data_type",
    "aut_syn",
    "ttl_syn",
    "txt_syn",
    "aut_wt",
    "obj_wt",
    "ttl_wt",
    "txt_wt",
    "aut_wgt",
    "obj_wgt",
    "ttl_wgt",
    "txt_wgt",
    "ttl_sco",
    "txt_sco",
    "version",
    "author",
    "aut_req",
    "object",
    "start_mon",
    "start_year",
    "end_mon",
    "end_year",
    "text",
    "txt_req",
    "ttl_req",
    "ttl_logic",
    "title",
    "txt_logic",
];

const ARXIV_CLASSES: &[&str] = &[
    "astro-ph", "cond-mat", "cs", "gr-qc", "hep-ex", "hep-lat", "hep-ph", "hep-th", "math",
    "math-ph", "nlin", "nucl-ex", "nucl-th", "physics", "quant-ph", "q-bio",
];

/// Parameters sent with every query, before any user field is applied.
const DEFAULTS: &[(&str, &str)] = &[
    ("qform", "AST"),
    ("sim_query", "YES"),
    ("ned_query", "YES"),
    ("adsobj_query", "YES"),
    ("nr_to_return", "200"),
    ("start_nr", "1"),
    ("jou_pick", "ALL"),
    ("ref_stems", ""),
    ("data_and", "ALL"),
    ("group_and", "ALL"),
    ("start_entry_day", ""),
    ("start_entry_mon", ""),
    ("start_entry_year", ""),
    ("end_entry_day", ""),
    ("end_entry_mon", ""),
    ("end_entry_year", ""),
    ("min_score", ""),
    ("sort", "SCORE"),
    ("data_type", "SHORT"),
    ("aut_syn", "YES"),
    ("ttl_syn", "YES"),
    ("txt_syn", "YES"),
    ("aut_wt", "1.0"),
    ("obj_wt", "1.0"),
    ("ttl_wt", "0.3"),
    ("txt_wt", "3.0"),
    ("aut_wgt", "YES"),
    ("obj_wgt", "YES"),
    ("ttl_wgt", "YES"),
    ("txt_wgt", "YES"),
    ("ttl_sco", "YES"),
    ("txt_sco", "YES"),
    ("version", "1"),
    ("author", ""),
    ("aut_logic", "OR"),
    ("object", ""),
    ("obj_logic", "OR"),
    ("start_mon", ""),
    ("start_year", ""),
    ("end_mon", ""),
    ("end_year", ""),
    ("title", ""),
    ("ttl_logic", "OR"),
    ("text", ""),
    ("txt_logic", "OR"),
    ("ttl_req", "YES"),
];

/// User-facing fields shown when a form is printed.
const SUMMARY_KEYS: &[&str] = &[
    "author",
    "title",
    "text",
    "start_year",
    "start_mon",
    "end_year",
    "end_mon",
];

/// How terms inside one search field are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLogic {
    And,
    Or,
}

impl SearchLogic {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchLogic::And => "AND",
            SearchLogic::Or => "OR",
        }
    }
}

/// Which field(s) a [`SearchLogic`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicTarget {
    Author,
    Title,
    Text,
    Object,
    All,
}

impl LogicTarget {
    fn keys(self) -> &'static [&'static str] {
        match self {
            LogicTarget::Author => &["aut_logic"],
            LogicTarget::Title => &["ttl_logic"],
            LogicTarget::Text => &["txt_logic"],
            LogicTarget::Object => &["obj_logic"],
            LogicTarget::All => &["aut_logic", "ttl_logic", "txt_logic", "obj_logic"],
        }
    }
}

/// An outbound ADS query: an ordered, multi-valued list of form parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    values: Vec<(String, String)>,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchForm {
    /// A form carrying the standard database, arXiv and weighting defaults.
    pub fn new() -> Self {
        let mut values = vec![
            ("db_key".to_string(), "AST".to_string()),
            ("db_key".to_string(), "PRE".to_string()),
        ];
        values.extend(
            ARXIV_CLASSES
                .iter()
                .map(|c| ("arxiv_sel".to_string(), (*c).to_string())),
        );
        values.extend(
            DEFAULTS
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
        );
        SearchForm { values }
    }

    /// Build a query from collected field values. Unknown field names are rejected.
    pub fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self> {
        let mut form = SearchForm::new();
        for (key, value) in fields {
            form.set(key, value)?;
        }
        Ok(form)
    }

    pub fn has(key: &str) -> bool {
        KNOWN_KEYS.contains(&key)
    }

    /// Replace every value of `key` with a single `value`, keeping its original position.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if !Self::has(key) {
            bail!("unknown search parameter: {key}");
        }
        match self.values.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.values[first].1 = value.to_string();
                let mut index = 0;
                self.values.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => self.values.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Append another value for `key`.
    pub fn add(&mut self, key: &str, value: &str) -> Result<()> {
        if !Self::has(key) {
            bail!("unknown search parameter: {key}");
        }
        self.values.push((key.to_string(), value.to_string()));
        Ok(())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.values
    }

    pub fn set_author(&mut self, author: &str) -> Result<()> {
        self.set("author", author)
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.set("title", title)
    }

    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.set("text", text)
    }

    pub fn set_start_date(&mut self, year: &str, month: &str) -> Result<()> {
        self.set("start_year", year)?;
        self.set("start_mon", month)
    }

    pub fn set_end_date(&mut self, year: &str, month: &str) -> Result<()> {
        self.set("end_year", year)?;
        self.set("end_mon", month)
    }

    pub fn set_search_logic(&mut self, target: LogicTarget, logic: SearchLogic) -> Result<()> {
        for key in target.keys() {
            self.set(key, logic.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Display for SearchForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled: Vec<String> = SUMMARY_KEYS
            .iter()
            .filter_map(|k| {
                self.get(k)
                    .filter(|v| !v.is_empty())
                    .map(|v| format!("{k}={v}"))
            })
            .collect();
        write!(f, "{}", filled.join(" "))
    }
}
