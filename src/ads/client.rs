use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;

use crate::config::SearchConfig;

use super::paper::{LinkKind, Paper};
use super::parse;
use super::{QueryBackend, SearchForm};

/// Blocking HTTP client for the abstract-connect and bibliography endpoints.
pub struct AdsClient {
    http: Client,
    search_url: String,
    bibtex_url: String,
}

impl AdsClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("termads/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(AdsClient {
            http,
            search_url: config.search_url.clone(),
            bibtex_url: config.bibtex_url.clone(),
        })
    }

    fn post(&self, url: &str, params: &[(String, String)]) -> Result<String> {
        let response = self
            .http
            .post(url)
            .form(params)
            .send()
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?;
        response
            .text()
            .with_context(|| format!("failed to read response from {url}"))
    }

    fn get(&self, url: &str) -> Result<String> {
        self.http
            .get(url)
            .send()
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?
            .text()
            .with_context(|| format!("failed to read response from {url}"))
    }
}

impl QueryBackend for AdsClient {
    fn search(&self, form: &SearchForm) -> Result<Vec<Paper>> {
        tracing::info!("querying ADS: {form}");
        let body = self.post(&self.search_url, form.pairs())?;
        let papers = parse::parse_results(&body);
        tracing::info!("ADS returned {} papers", papers.len());
        Ok(papers)
    }

    fn fetch_supplementary(&self, paper: &Paper, kind: LinkKind) -> Result<String> {
        let Some(url) = paper.link(kind) else {
            bail!("{} has no '{kind}' link", paper.bibcode);
        };
        tracing::debug!("fetching {kind} for {} from {url}", paper.bibcode);
        let body = self.get(url)?;
        match kind {
            LinkKind::Abstract => parse::extract_abstract(&body)
                .with_context(|| format!("no abstract found for {}", paper.bibcode)),
            _ => Ok(parse::html_to_text(&body).trim().to_string()),
        }
    }

    fn fetch_bibtex(&self, bibcode: &str) -> Result<String> {
        let body = self.post(&self.bibtex_url, &bibtex_params(bibcode))?;
        parse::extract_bibtex(&body).with_context(|| format!("no BibTeX entry for {bibcode}"))
    }
}

/// Form sent to the bibliography endpoint for a single entry.
fn bibtex_params(bibcode: &str) -> [(String, String); 4] {
    [
        ("bibcode", bibcode),
        ("data_type", "BIBTEX"),
        ("db_key", "AST"),
        ("nocookieset", "1"),
    ]
    .map(|(k, v)| (k.to_string(), v.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AdsClient {
        // Nothing here reaches the network.
        let config = SearchConfig {
            search_url: "http://127.0.0.1:9/search".to_string(),
            bibtex_url: "http://127.0.0.1:9/bib".to_string(),
            timeout_secs: 1,
        };
        AdsClient::new(&config).unwrap()
    }

    #[test]
    fn bibtex_request_uses_fixed_parameters() {
        let params = bibtex_params("2014ApJ...780..1T");
        let pairs: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("bibcode", "2014ApJ...780..1T"),
                ("data_type", "BIBTEX"),
                ("db_key", "AST"),
                ("nocookieset", "1"),
            ]
        );
    }

    #[test]
    fn supplementary_without_link_fails_before_any_request() {
        let paper = Paper::new("2014ApJ...1T");
        let err = client()
            .fetch_supplementary(&paper, LinkKind::Abstract)
            .unwrap_err();
        assert_eq!(err.to_string(), "2014ApJ...1T has no 'A' link");
    }

    #[test]
    fn supplementary_checks_the_requested_kind() {
        let mut paper = Paper::new("2014ApJ...1T");
        paper.set_link("F", "http://127.0.0.1:9/full");
        let err = client()
            .fetch_supplementary(&paper, LinkKind::ArxivPreprint)
            .unwrap_err();
        assert!(err.to_string().contains("no 'X' link"));
    }

    #[test]
    fn client_keeps_configured_endpoints() {
        let c = client();
        assert_eq!(c.search_url, "http://127.0.0.1:9/search");
        assert_eq!(c.bibtex_url, "http://127.0.0.1:9/bib");
    }
}
