//! DBpedia-backed implementation of the act-name enrichment capability.
//!
//! Queries the DBpedia keyword-search endpoint and maps its results into
//! [`LookupCandidate`]s for the category filter in `billgraph-cite`. The
//! lookup service sheds load under pressure; every failure mode here is a
//! [`LookupError`], which resolution treats as "no enrichment".

use billgraph_cite::{ActLookup, LookupCandidate, LookupError};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Public keyword-search endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://lookup.dbpedia.org/api/search.asmx/KeywordSearch";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking DBpedia keyword lookup.
#[derive(Debug, Clone)]
pub struct DbpediaLookup {
    client: reqwest::blocking::Client,
    endpoint: Url,
}

impl DbpediaLookup {
    pub fn new() -> Result<Self, LookupError> {
        let endpoint = Url::parse(DEFAULT_ENDPOINT).map_err(|e| LookupError(e.to_string()))?;
        Self::with_endpoint(endpoint)
    }

    /// Point the lookup at a different endpoint (tests, mirrors).
    pub fn with_endpoint(endpoint: Url) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .map_err(|e| LookupError(e.to_string()))?;
        Ok(Self { client, endpoint })
    }
}

impl ActLookup for DbpediaLookup {
    fn lookup(&self, name: &str) -> Result<Vec<LookupCandidate>, LookupError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("QueryString", name)])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| LookupError(e.to_string()))?;
        let body: SearchResponse = response.json().map_err(|e| LookupError(e.to_string()))?;
        tracing::debug!(act = name, results = body.results.len(), "dbpedia lookup");
        Ok(body.results.into_iter().map(SearchResult::into_candidate).collect())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    uri: String,
    #[serde(default)]
    categories: Vec<Category>,
}

impl SearchResult {
    fn into_candidate(self) -> LookupCandidate {
        LookupCandidate {
            uri: self.uri,
            categories: self.categories.into_iter().map(|c| c.label).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Category {
    label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use billgraph_cite::enrich::first_legal_match;

    const SAMPLE: &str = r#"{
        "results": [
            {
                "uri": "http://dbpedia.org/resource/Social_Security_(band)",
                "label": "Social Security (band)",
                "categories": [ { "label": "Musical groups", "uri": "http://dbpedia.org/resource/Category:Musical_groups" } ]
            },
            {
                "uri": "http://dbpedia.org/resource/Social_Security_Act",
                "label": "Social Security Act",
                "categories": [ { "label": "United States federal legislation", "uri": "http://dbpedia.org/resource/Category:United_States_federal_legislation" } ]
            }
        ]
    }"#;

    #[test]
    fn response_maps_to_candidates_in_order() {
        let body: SearchResponse = serde_json::from_str(SAMPLE).expect("parsed");
        let candidates: Vec<LookupCandidate> = body
            .results
            .into_iter()
            .map(SearchResult::into_candidate)
            .collect();
        assert_eq!(candidates.len(), 2);
        assert_eq!(
            candidates[1].categories,
            vec!["United States federal legislation"]
        );
        let hit = first_legal_match(&candidates).expect("legal match");
        assert_eq!(hit.uri, "http://dbpedia.org/resource/Social_Security_Act");
    }

    #[test]
    fn empty_or_missing_results_deserialize_to_no_candidates() {
        let body: SearchResponse = serde_json::from_str("{}").expect("parsed");
        assert!(body.results.is_empty());
    }
}
