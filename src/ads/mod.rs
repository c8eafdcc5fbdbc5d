//! Client side of the ADS classic abstract service.
//!
//! The TUI only talks to [`QueryBackend`]; [`client::AdsClient`] is the HTTP
//! implementation.

pub mod client;
pub mod filter;
pub mod form;
pub mod paper;
pub mod parse;

use anyhow::Result;

pub use client::AdsClient;
pub use filter::{LinkFilter, Match, find};
pub use form::{LogicTarget, SearchForm, SearchLogic};
pub use paper::{LinkKind, Paper};

/// The remote query collaborator.
pub trait QueryBackend {
    /// Run a search and return the result list in page order.
    fn search(&self, form: &SearchForm) -> Result<Vec<Paper>>;

    /// Retrieve the long-form content behind one of a paper's links.
    ///
    /// Fails if the paper does not carry a link of that kind.
    fn fetch_supplementary(&self, paper: &Paper, kind: LinkKind) -> Result<String>;

    /// Retrieve the BibTeX entry for a bibcode.
    fn fetch_bibtex(&self, bibcode: &str) -> Result<String>;
}
