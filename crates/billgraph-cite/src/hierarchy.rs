//! Containment hierarchy derivation.
//!
//! A multi-segment locator addresses a sub-part of a larger provision: a
//! subsection of a section, a subchapter of a chapter. The parent's identity
//! is derived by **re-running the identifier builder** on the locator
//! truncated to its first segment, never by truncating the child identifier
//! string. The two code paths can then never drift apart: a parent derived
//! here is byte-identical to what resolution would produce if the parent
//! were cited on its own.

use crate::classify::{CitationRecord, CodeCite, Modifier};
use crate::enrich::NoEnrichment;
use crate::resolve::{resolve_record, ResolvedEntity};

/// Resolve the immediate containing entity of `record`, if it has one.
///
/// Only simple section references and chapter references carry containment;
/// ranges and notes are leaf shapes.
pub fn derive_parent(record: &CitationRecord) -> Option<ResolvedEntity> {
    let truncated = container_record(record)?;
    // Parents are always code shapes; the lookup is never consulted.
    Some(resolve_record(&truncated, &NoEnrichment))
}

fn container_record(record: &CitationRecord) -> Option<CitationRecord> {
    match record {
        CitationRecord::Section(cite)
            if matches!(cite.modifier, Modifier::None) && cite.locator.len() > 1 =>
        {
            Some(CitationRecord::Section(truncate(cite)))
        }
        CitationRecord::Chapter(cite) if cite.locator.len() > 1 => {
            Some(CitationRecord::Chapter(truncate(cite)))
        }
        _ => None,
    }
}

fn truncate(cite: &CodeCite) -> CodeCite {
    CodeCite {
        title: cite.title.clone(),
        locator: vec![cite.locator[0].clone()],
        modifier: Modifier::None,
    }
}
