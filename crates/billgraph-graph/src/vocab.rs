//! Fixed vocabulary for the emitted graph.
//!
//! Predicates and classes come from the legislative vocabularies the output
//! is consumed against; identifiers for bills live under the bills
//! namespace. All of these are valid IRIs by construction, which is what
//! lets the assembler materialize them without a validation path.

/// Bill identifiers: `{prefix}/{congress}_{flattened legis-num}`.
pub const BILL_URI_PREFIX: &str = "http://liicornell.org/id/us/congress/bills";
/// Human-readable bill pages.
pub const BILL_PAGE_PREFIX: &str = "https://beta.congress.gov/bill/";

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const DC_TITLE: &str = "http://purl.org/NET/dc_owl2dl/terms_od/title";
pub const HAS_SHORT_TITLE: &str = "http://liicornell.org/legis/hasShortTitle";
pub const HAS_SENATE_BILL_NUMBER: &str = "http://liicornell.org/legis/hasSenateBillNumber";
pub const HAS_HOUSE_BILL_NUMBER: &str = "http://liicornell.org/legis/hasHouseBillNumber";
pub const HAS_TOPICS: &str = "http://liicornell.org/top/hasTopics";
pub const HAS_PAGE: &str = "http://liicornell.org/top/hasPage";
/// Raw citation string, kept verbatim alongside the act entity.
pub const HAS_CATO_REF: &str = "http://liicornell.org/legis/hasCatoRef";
pub const REF_ACT: &str = "http://liicornell.org/legis/refAct";
pub const REF_USCODE: &str = "http://liicornell.org/top/refUSCode";
pub const REF_USCODE_COLLECTION: &str = "http://liicornell.org/top/refUSCodeCollection";
pub const REF_PUBL: &str = "http://liicornell.org/top/refPubL";
pub const REF_STATL: &str = "http://liicornell.org/top/refStatL";
pub const REF_DBPEDIA: &str = "http://liicornell.org/top/refDBPedia";
pub const CONTAINS_TRANSITIVE: &str = "http://liicornell.org/top/containsTransitive";
pub const FIRST_ITEM: &str = "http://purl.org/co/firstItem";
pub const LAST_ITEM: &str = "http://purl.org/co/lastItem";

// ---------------------------------------------------------------------------
// Classes
// ---------------------------------------------------------------------------

pub const LEGISLATIVE_MEASURE: &str = "http://liicornell.org/legis/LegislativeMeasure";
pub const LEGAL_WEB_PAGE: &str = "http://liicornell.org/top/LegalWebPage";
/// Ordered collection class used for ranges and "et seq." runs.
pub const UNIQUE_LIST: &str = "http://liicornell.org/top/UniqueList";
pub const SECTION: &str = "http://liicornell.org/top/section";
pub const SUBSECTION: &str = "http://liicornell.org/top/subsection";
