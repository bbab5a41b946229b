//! Canonical identifier and page-link construction.
//!
//! Every supported citation shape has one deterministic construction rule.
//! Identifiers are URIs under fixed per-category namespaces; page links point
//! at the public reading pages for the cited material. Equal inputs always
//! produce equal identifiers, which is what makes re-runs reproducible and
//! lets the same provision cited by many bills collapse to one node in the
//! graph.

use crate::classify::{classify, CitationRecord, CodeCite, Modifier, SkipReason};
use crate::enrich::{self, ActLookup};
use crate::hierarchy;
use crate::normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Code-section identifiers (`{title}_USC_...`).
pub const USC_URI_PREFIX: &str = "http://liicornell.org/id/uscode/";
/// Session-law volume identifiers (`{vol}_Stat_{page}`).
pub const STATL_URI_PREFIX: &str = "http://liicornell.org/id/statl/";
/// Published-law identifiers (`{congress}_PL_{num}`).
pub const PUBL_URI_PREFIX: &str = "http://liicornell.org/id/publ/";
/// Named-act identifiers (slugged display titles).
pub const ACT_URI_PREFIX: &str = "http://liicornell.org/id/us/congress/acts";
/// Public reading pages for code sections and chapters.
pub const USC_PAGE_PREFIX: &str = "http://www.law.cornell.edu/uscode/text/";

/// Earliest session-law volume with a page at the document repository.
/// Citations to older volumes get no page link.
pub const EARLIEST_STATL_VOLUME: u32 = 65;

// ============================================================================
// Resolved entities
// ============================================================================

/// Containment parent of a resolved provision, produced by re-running the
/// identifier builder on the truncated locator (see [`crate::hierarchy`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub uri: String,
    pub page: Option<String>,
}

/// Structural typing for code provisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvisionLevel {
    Section,
    Subsection,
}

/// What a resolved entity is, with the edges its shape carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Simple or note-form code reference. Notes carry no structural level.
    CodeProvision {
        level: Option<ProvisionLevel>,
        parent: Option<ParentRef>,
    },
    /// Closed or open-ended run of provisions. An ordered collection whose
    /// first (and for closed ranges, last) member is itself a provision
    /// identifier.
    CodeCollection {
        first: String,
        last: Option<String>,
    },
    /// Chapter or subchapter reference, optionally note-form.
    CodeChapter { parent: Option<ParentRef> },
    PublicLaw,
    StatuteAtLarge,
    /// Named act, keeping the raw citation string and an optional external
    /// knowledge-base cross-reference.
    Act {
        raw: String,
        enrichment: Option<String>,
    },
}

/// One citation, resolved to its canonical identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEntity {
    /// Canonical identifier, globally unique per shape and locator.
    pub uri: String,
    /// Display title for the graph.
    pub title: String,
    /// Human-readable reading page, where one exists.
    pub page: Option<String>,
    pub kind: EntityKind,
}

/// Non-fatal conditions accumulated during resolution, returned to the
/// caller for reporting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveWarning {
    #[error(transparent)]
    Skipped(#[from] SkipReason),
    #[error("non-ASCII content in `{raw}` transliterated to `{normalized}`")]
    NonAscii { raw: String, normalized: String },
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve a deduplicated list of raw reference strings.
///
/// References that classify to the same canonical identifier collapse to the
/// first occurrence. Skipped references become warnings; they never abort the
/// rest of the list.
pub fn resolve(
    raw_refs: &[String],
    lookup: &dyn ActLookup,
) -> (Vec<ResolvedEntity>, Vec<ResolveWarning>) {
    let mut entities = Vec::new();
    let mut warnings = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for raw in raw_refs {
        let (ascii, changed) = normalize::to_ascii(raw);
        if changed {
            tracing::debug!(raw = %raw, normalized = %ascii, "transliterated non-ASCII reference");
            warnings.push(ResolveWarning::NonAscii {
                raw: raw.clone(),
                normalized: ascii.clone(),
            });
        }
        match classify(&ascii) {
            Ok(record) => {
                let entity = resolve_record(&record, lookup);
                if seen.insert(entity.uri.clone()) {
                    entities.push(entity);
                }
            }
            Err(reason) => {
                tracing::warn!(%reason, "skipping reference");
                warnings.push(ResolveWarning::Skipped(reason));
            }
        }
    }

    (entities, warnings)
}

/// Resolve one classified record. Pure apart from the injected lookup, which
/// is consulted only for named acts.
pub fn resolve_record(record: &CitationRecord, lookup: &dyn ActLookup) -> ResolvedEntity {
    match record {
        CitationRecord::Section(cite) => {
            let parent = hierarchy::derive_parent(record).map(parent_ref);
            resolve_section(cite, parent)
        }
        CitationRecord::Chapter(cite) => {
            let parent = hierarchy::derive_parent(record).map(parent_ref);
            resolve_chapter(cite, parent)
        }
        CitationRecord::PublicLaw { congress, number } => resolve_public_law(congress, number),
        CitationRecord::StatuteAtLarge { volume, page } => resolve_statute(volume, page),
        CitationRecord::Act { title, raw } => resolve_act(title, raw, lookup),
    }
}

fn parent_ref(parent: ResolvedEntity) -> ParentRef {
    ParentRef {
        uri: parent.uri,
        page: parent.page,
    }
}

fn section_local(title: &str, locator: &[String]) -> String {
    format!("{title}_USC_{}", locator.join("_"))
}

fn usc_uri(local: &str) -> String {
    format!("{USC_URI_PREFIX}{local}")
}

fn section_page(title: &str, first_segment: &str) -> String {
    format!("{USC_PAGE_PREFIX}{title}/{first_segment}")
}

/// Endpoints of a range replace the token-bearing last segment.
fn replace_last(locator: &[String], segment: &str) -> Vec<String> {
    let mut out = locator.to_vec();
    if let Some(last) = out.last_mut() {
        *last = segment.to_string();
    }
    out
}

fn resolve_section(cite: &CodeCite, parent: Option<ParentRef>) -> ResolvedEntity {
    let CodeCite {
        title,
        locator,
        modifier,
    } = cite;

    match modifier {
        Modifier::None => {
            let local = section_local(title, locator);
            let level = if locator.len() > 1 {
                ProvisionLevel::Subsection
            } else {
                ProvisionLevel::Section
            };
            ResolvedEntity {
                uri: usc_uri(&local),
                title: local,
                // Reading pages exist at section granularity only; a
                // subsection shares its section's page.
                page: Some(section_page(title, &locator[0])),
                kind: EntityKind::CodeProvision {
                    level: Some(level),
                    parent,
                },
            }
        }
        Modifier::Range { first, last } => {
            let local = section_local(title, locator);
            ResolvedEntity {
                uri: usc_uri(&local),
                title: local.clone(),
                page: None,
                kind: EntityKind::CodeCollection {
                    first: usc_uri(&section_local(title, &replace_last(locator, first))),
                    last: Some(usc_uri(&section_local(title, &replace_last(locator, last)))),
                },
            }
        }
        Modifier::EtSeq => {
            let local = format!("{}_etseq", section_local(title, locator));
            ResolvedEntity {
                uri: usc_uri(&local),
                title: local.clone(),
                page: None,
                kind: EntityKind::CodeCollection {
                    first: usc_uri(&section_local(title, locator)),
                    // The upper bound of "et seq." is intentionally open.
                    last: None,
                },
            }
        }
        Modifier::Note => {
            let local = format!("{}_note", section_local(title, locator));
            ResolvedEntity {
                uri: usc_uri(&local),
                title: local,
                // Notes are not addressable below the section.
                page: Some(section_page(title, &locator[0])),
                kind: EntityKind::CodeProvision {
                    level: None,
                    parent: None,
                },
            }
        }
    }
}

fn resolve_chapter(cite: &CodeCite, parent: Option<ParentRef>) -> ResolvedEntity {
    let chapter = &cite.locator[0];
    let subchapter = cite.locator.get(1);

    let mut local = format!("{}_USC_chapter_{chapter}", cite.title);
    let mut page = format!("{USC_PAGE_PREFIX}{}/chapter-{chapter}", cite.title);
    if let Some(sub) = subchapter {
        local.push_str(&format!("_subchapter_{sub}"));
        page.push_str(&format!("/subchapter-{sub}"));
    }
    if matches!(cite.modifier, Modifier::Note) {
        local.push_str("_note");
    }

    ResolvedEntity {
        uri: usc_uri(&local),
        title: local.clone(),
        page: Some(page),
        kind: EntityKind::CodeChapter { parent },
    }
}

fn resolve_public_law(congress: &str, number: &str) -> ResolvedEntity {
    ResolvedEntity {
        uri: format!("{PUBL_URI_PREFIX}{congress}_PL_{number}"),
        title: format!("{congress} PL {number}"),
        page: Some(format!(
            "http://www.gpo.gov/fdsys/pkg/PLAW-{congress}publ{number}/pdf/PLAW-{congress}publ{number}.pdf"
        )),
        kind: EntityKind::PublicLaw,
    }
}

fn resolve_statute(volume: &str, page: &str) -> ResolvedEntity {
    // Volumes older than the repository's earliest holdings have no page.
    let page_link = volume
        .parse::<u32>()
        .ok()
        .filter(|v| *v >= EARLIEST_STATL_VOLUME)
        .map(|_| {
            format!("http://www.gpo.gov/fdsys/pkg/STATUTE-{volume}/pdf/STATUTE-{volume}pg{page}.pdf")
        });
    ResolvedEntity {
        uri: format!("{STATL_URI_PREFIX}{volume}_Stat_{page}"),
        title: format!("{volume} Stat.L {page}"),
        page: page_link,
        kind: EntityKind::StatuteAtLarge,
    }
}

fn resolve_act(title: &str, raw: &str, lookup: &dyn ActLookup) -> ResolvedEntity {
    let slug: String = title
        .chars()
        .map(|c| if c.is_whitespace() || c == ',' { '_' } else { c })
        .collect();
    let enrichment = match lookup.lookup(title) {
        Ok(candidates) => enrich::first_legal_match(&candidates).map(|c| c.uri.clone()),
        Err(err) => {
            tracing::debug!(%err, act = title, "enrichment lookup unavailable");
            None
        }
    };
    ResolvedEntity {
        uri: format!("{ACT_URI_PREFIX}/{slug}"),
        title: title.to_string(),
        page: None,
        kind: EntityKind::Act {
            raw: raw.to_string(),
            enrichment,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{LookupCandidate, LookupError, NoEnrichment};

    fn resolve_one(raw: &str) -> ResolvedEntity {
        resolve_record(&classify(raw).expect("classified"), &NoEnrichment)
    }

    #[test]
    fn simple_section_identifier_and_page() {
        let e = resolve_one("usc/15/78a");
        assert_eq!(e.uri, "http://liicornell.org/id/uscode/15_USC_78a");
        assert_eq!(e.title, "15_USC_78a");
        assert_eq!(
            e.page.as_deref(),
            Some("http://www.law.cornell.edu/uscode/text/15/78a")
        );
        assert_eq!(
            e.kind,
            EntityKind::CodeProvision {
                level: Some(ProvisionLevel::Section),
                parent: None,
            }
        );
    }

    #[test]
    fn subsection_gets_a_section_parent() {
        let e = resolve_one("usc/42/1395w-4/a/2");
        assert_eq!(
            e.uri,
            "http://liicornell.org/id/uscode/42_USC_1395w-4_a_2"
        );
        let EntityKind::CodeProvision {
            level: Some(ProvisionLevel::Subsection),
            parent: Some(parent),
        } = e.kind
        else {
            panic!("expected subsection with parent");
        };
        assert_eq!(parent.uri, "http://liicornell.org/id/uscode/42_USC_1395w-4");
        // Section-granularity page on both ends.
        assert_eq!(
            parent.page.as_deref(),
            Some("http://www.law.cornell.edu/uscode/text/42/1395w-4")
        );
        assert_eq!(
            e.page.as_deref(),
            Some("http://www.law.cornell.edu/uscode/text/42/1395w-4")
        );
    }

    #[test]
    fn range_emits_first_and_last_endpoints() {
        let e = resolve_one("usc/15/78a..78d");
        assert_eq!(e.uri, "http://liicornell.org/id/uscode/15_USC_78a..78d");
        assert_eq!(e.page, None);
        assert_eq!(
            e.kind,
            EntityKind::CodeCollection {
                first: "http://liicornell.org/id/uscode/15_USC_78a".to_string(),
                last: Some("http://liicornell.org/id/uscode/15_USC_78d".to_string()),
            }
        );
    }

    #[test]
    fn range_endpoints_substitute_within_the_last_segment() {
        let e = resolve_one("usc/26/401/a..k");
        assert_eq!(e.uri, "http://liicornell.org/id/uscode/26_USC_401_a..k");
        assert_eq!(
            e.kind,
            EntityKind::CodeCollection {
                first: "http://liicornell.org/id/uscode/26_USC_401_a".to_string(),
                last: Some("http://liicornell.org/id/uscode/26_USC_401_k".to_string()),
            }
        );
    }

    #[test]
    fn etseq_has_an_open_upper_bound() {
        let e = resolve_one("usc/15/78a/etseq");
        assert_eq!(e.uri, "http://liicornell.org/id/uscode/15_USC_78a_etseq");
        assert_eq!(
            e.kind,
            EntityKind::CodeCollection {
                first: "http://liicornell.org/id/uscode/15_USC_78a".to_string(),
                last: None,
            }
        );
    }

    #[test]
    fn note_appends_suffix_and_pages_at_section_granularity() {
        let e = resolve_one("usc/15/78a/note");
        assert_eq!(e.uri, "http://liicornell.org/id/uscode/15_USC_78a_note");
        assert_eq!(
            e.page.as_deref(),
            Some("http://www.law.cornell.edu/uscode/text/15/78a")
        );
        assert_eq!(
            e.kind,
            EntityKind::CodeProvision {
                level: None,
                parent: None,
            }
        );
    }

    #[test]
    fn chapter_and_subchapter_identifiers() {
        let e = resolve_one("usc-chapter/15/2B");
        assert_eq!(e.uri, "http://liicornell.org/id/uscode/15_USC_chapter_2B");
        assert_eq!(
            e.page.as_deref(),
            Some("http://www.law.cornell.edu/uscode/text/15/chapter-2B")
        );

        let e = resolve_one("usc-chapter/42/6A/II");
        assert_eq!(
            e.uri,
            "http://liicornell.org/id/uscode/42_USC_chapter_6A_subchapter_II"
        );
        assert_eq!(
            e.page.as_deref(),
            Some("http://www.law.cornell.edu/uscode/text/42/chapter-6A/subchapter-II")
        );
        let EntityKind::CodeChapter {
            parent: Some(parent),
        } = e.kind
        else {
            panic!("expected subchapter with chapter parent");
        };
        assert_eq!(
            parent.uri,
            "http://liicornell.org/id/uscode/42_USC_chapter_6A"
        );
    }

    #[test]
    fn chapter_note_keeps_the_chapter_page() {
        let e = resolve_one("usc-chapter/15/2B/note");
        assert_eq!(
            e.uri,
            "http://liicornell.org/id/uscode/15_USC_chapter_2B_note"
        );
        assert_eq!(
            e.page.as_deref(),
            Some("http://www.law.cornell.edu/uscode/text/15/chapter-2B")
        );
    }

    #[test]
    fn public_law_always_has_a_page() {
        let e = resolve_one("public-law/111/148");
        assert_eq!(e.uri, "http://liicornell.org/id/publ/111_PL_148");
        assert_eq!(e.title, "111 PL 148");
        assert_eq!(
            e.page.as_deref(),
            Some("http://www.gpo.gov/fdsys/pkg/PLAW-111publ148/pdf/PLAW-111publ148.pdf")
        );
    }

    #[test]
    fn statute_page_respects_the_earliest_volume() {
        let e = resolve_one("statute-at-large/64/108");
        assert_eq!(e.uri, "http://liicornell.org/id/statl/64_Stat_108");
        assert_eq!(e.page, None);

        let e = resolve_one("statute-at-large/80/108");
        assert_eq!(
            e.page.as_deref(),
            Some("http://www.gpo.gov/fdsys/pkg/STATUTE-80/pdf/STATUTE-80pg108.pdf")
        );
    }

    #[test]
    fn act_slug_replaces_whitespace_and_commas() {
        let e = resolve_one("Securities Exchange Act of 1934, as amended");
        assert_eq!(
            e.uri,
            "http://liicornell.org/id/us/congress/acts/Securities_Exchange_Act_of_1934__as_amended"
        );
        let EntityKind::Act { raw, enrichment } = e.kind else {
            panic!("expected act");
        };
        assert_eq!(raw, "Securities Exchange Act of 1934, as amended");
        assert_eq!(enrichment, None);
    }

    struct FixedLookup;

    impl ActLookup for FixedLookup {
        fn lookup(&self, _name: &str) -> Result<Vec<LookupCandidate>, LookupError> {
            Ok(vec![
                LookupCandidate {
                    uri: "http://kb.example/band".to_string(),
                    categories: vec!["Rock bands".to_string()],
                },
                LookupCandidate {
                    uri: "http://kb.example/ssa".to_string(),
                    categories: vec!["United States federal legislation".to_string()],
                },
            ])
        }
    }

    struct FailingLookup;

    impl ActLookup for FailingLookup {
        fn lookup(&self, _name: &str) -> Result<Vec<LookupCandidate>, LookupError> {
            Err(LookupError("connection refused".to_string()))
        }
    }

    #[test]
    fn act_enrichment_takes_the_first_legal_candidate() {
        let record = classify("Social Security Act").expect("classified");
        let e = resolve_record(&record, &FixedLookup);
        let EntityKind::Act { enrichment, .. } = e.kind else {
            panic!("expected act");
        };
        assert_eq!(enrichment.as_deref(), Some("http://kb.example/ssa"));
    }

    #[test]
    fn lookup_failure_is_treated_as_no_enrichment() {
        let record = classify("Social Security Act").expect("classified");
        let e = resolve_record(&record, &FailingLookup);
        let EntityKind::Act { enrichment, .. } = e.kind else {
            panic!("expected act");
        };
        assert_eq!(enrichment, None);
    }

    #[test]
    fn resolve_dedups_by_canonical_identifier() {
        // Distinct raw strings that normalize to the same citation collapse.
        let refs = vec![
            "usc/15/78a".to_string(),
            "  usc/15/78a ".to_string(),
            "usc/15/78a/etseq".to_string(),
        ];
        let (entities, warnings) = resolve(&refs, &NoEnrichment);
        assert_eq!(entities.len(), 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn skips_are_isolated_and_reported() {
        let refs = vec![
            "usc/15/78a".to_string(),
            "usc-appendix/50/5".to_string(),
            "usc/15".to_string(),
            "public-law/111/148".to_string(),
        ];
        let (entities, warnings) = resolve(&refs, &NoEnrichment);
        assert_eq!(entities.len(), 2);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(
            warnings[0],
            ResolveWarning::Skipped(SkipReason::Unsupported { .. })
        ));
        assert!(matches!(
            warnings[1],
            ResolveWarning::Skipped(SkipReason::Malformed { .. })
        ));
    }

    #[test]
    fn non_ascii_references_are_transliterated_with_a_warning() {
        let refs = vec!["Déficit Reduction Act".to_string()];
        let (entities, warnings) = resolve(&refs, &NoEnrichment);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].title, "Deficit Reduction Act");
        assert!(matches!(warnings[0], ResolveWarning::NonAscii { .. }));
    }
}
