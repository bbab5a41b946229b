//! Injected enrichment capability for named-act references.
//!
//! Resolution stays synchronous and pure; anything that talks to an external
//! knowledge base implements [`ActLookup`] and gets handed in by the caller.
//! Lookup failure of any kind means "no enrichment", never an error in the
//! resolution result.

use serde::{Deserialize, Serialize};

/// One candidate returned by a lookup, with its category labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupCandidate {
    pub uri: String,
    pub categories: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("act lookup failed: {0}")]
pub struct LookupError(pub String);

/// Best-effort lookup of an act name in an external knowledge base.
pub trait ActLookup {
    /// Candidates in the knowledge base's own ranking order.
    fn lookup(&self, name: &str) -> Result<Vec<LookupCandidate>, LookupError>;
}

/// No-op lookup: resolution without any external knowledge base.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnrichment;

impl ActLookup for NoEnrichment {
    fn lookup(&self, _name: &str) -> Result<Vec<LookupCandidate>, LookupError> {
        Ok(Vec::new())
    }
}

/// Pick the first candidate whose category labels look legal-domain.
///
/// Knowledge-base class information is too patchy to filter on, so the
/// filter is a case-insensitive word match against category labels.
pub fn first_legal_match(candidates: &[LookupCandidate]) -> Option<&LookupCandidate> {
    candidates
        .iter()
        .find(|c| c.categories.iter().any(|label| is_legal_category(label)))
}

const LEGAL_WORDS: [&str; 4] = ["law", "legislation", "government", "act"];

fn is_legal_category(label: &str) -> bool {
    label
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| {
            LEGAL_WORDS
                .iter()
                .any(|legal| word.eq_ignore_ascii_case(legal))
        })
}
