//! Per-bill graph assembly.
//!
//! Takes extracted bill metadata and the resolved citation entities and
//! produces the bill's triple block: bill typing and title edges, the bill's
//! public page, then one group of edges per entity. Assembly is purely
//! additive; an entity whose edges cannot be written (an illegal character
//! surviving into an IRI) is dropped with a warning while everything already
//! assembled stays.

use crate::triples::TripleBlock;
use crate::vocab;
use billgraph_cite::{EntityKind, ProvisionLevel, ResolvedEntity};
use billgraph_ingest_xml::BillMeta;
use oxrdf::{IriParseError, Literal, NamedNode, Triple};

/// Bill identity that cannot be expressed as an IRI. Nothing can be emitted
/// for such a bill; the caller skips it and moves on.
#[derive(Debug, thiserror::Error)]
#[error("bill `{key}` has no usable identifier: {source}")]
pub struct AssembleError {
    pub key: String,
    #[source]
    pub source: IriParseError,
}

/// Non-fatal conditions met while assembling one bill's block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssembleWarning {
    #[error("dropped edges for `{uri}`: {reason}")]
    EntityDropped { uri: String, reason: String },
    #[error("`{legis_num}` names neither chamber; bill number and page edges omitted")]
    UnknownChamber { legis_num: String },
}

/// Materialize one of the [`vocab`] constants. Those IRIs are fixed and
/// valid, so no parse path is needed.
fn term(iri: &str) -> NamedNode {
    NamedNode::new_unchecked(iri)
}

enum Chamber {
    Senate,
    House,
}

impl Chamber {
    fn of(legis_num: &str) -> Option<Self> {
        match legis_num.chars().next() {
            Some('S') => Some(Chamber::Senate),
            Some('H') => Some(Chamber::House),
            _ => None,
        }
    }

    fn page_segment(&self) -> &'static str {
        match self {
            Chamber::Senate => "senate-bill",
            Chamber::House => "house-bill",
        }
    }

    fn number_predicate(&self) -> &'static str {
        match self {
            Chamber::Senate => vocab::HAS_SENATE_BILL_NUMBER,
            Chamber::House => vocab::HAS_HOUSE_BILL_NUMBER,
        }
    }
}

/// Assemble one bill's triple block.
pub fn assemble(
    bill: &BillMeta,
    entities: &[ResolvedEntity],
) -> Result<(TripleBlock, Vec<AssembleWarning>), AssembleError> {
    let key = bill.bill_key();
    let bill_uri =
        NamedNode::new(format!("{}/{key}", vocab::BILL_URI_PREFIX)).map_err(|source| {
            AssembleError {
                key: key.clone(),
                source,
            }
        })?;

    let mut block = TripleBlock::new();
    let mut warnings = Vec::new();

    block.push(Triple::new(
        bill_uri.clone(),
        term(vocab::RDF_TYPE),
        term(vocab::LEGISLATIVE_MEASURE),
    ));
    block.push(Triple::new(
        bill_uri.clone(),
        term(vocab::DC_TITLE),
        Literal::new_simple_literal(bill.dc_title.clone()),
    ));
    if let Some(short_title) = &bill.short_title {
        block.push(Triple::new(
            bill_uri.clone(),
            term(vocab::HAS_SHORT_TITLE),
            Literal::new_simple_literal(short_title.clone()),
        ));
    }
    if !bill.topics.is_empty() {
        block.push(Triple::new(
            bill_uri.clone(),
            term(vocab::HAS_TOPICS),
            Literal::new_simple_literal(bill.topics.join(", ")),
        ));
    }

    match Chamber::of(&bill.legis_num) {
        Some(chamber) => {
            block.push(Triple::new(
                bill_uri.clone(),
                term(chamber.number_predicate()),
                Literal::new_simple_literal(format!(
                    "{} {}",
                    bill.identity.congress, bill.legis_num
                )),
            ));
            let page = format!(
                "{}{}-congress/{}/{}",
                vocab::BILL_PAGE_PREFIX,
                ordinalize(bill.identity.congress),
                chamber.page_segment(),
                bill.identity.bill_number
            );
            match NamedNode::new(page) {
                Ok(page) => {
                    block.push(Triple::new(bill_uri.clone(), term(vocab::HAS_PAGE), page));
                }
                Err(err) => warnings.push(AssembleWarning::EntityDropped {
                    uri: bill_uri.as_str().to_string(),
                    reason: err.to_string(),
                }),
            }
        }
        None => {
            tracing::warn!(legis_num = %bill.legis_num, "unrecognized chamber");
            warnings.push(AssembleWarning::UnknownChamber {
                legis_num: bill.legis_num.clone(),
            });
        }
    }

    for entity in entities {
        match entity_triples(&bill_uri, entity) {
            Ok(triples) => block.extend(triples),
            Err(err) => {
                tracing::warn!(uri = %entity.uri, %err, "dropping entity edges");
                warnings.push(AssembleWarning::EntityDropped {
                    uri: entity.uri.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok((block, warnings))
}

/// Edges for one resolved entity. Fails as a unit: either every edge for the
/// entity is writable or none are emitted.
fn entity_triples(
    bill_uri: &NamedNode,
    entity: &ResolvedEntity,
) -> Result<Vec<Triple>, IriParseError> {
    let uri = NamedNode::new(entity.uri.clone())?;
    let title = Literal::new_simple_literal(entity.title.clone());
    let mut out = Vec::new();

    match &entity.kind {
        EntityKind::CodeProvision { level, parent } => {
            out.push(Triple::new(
                bill_uri.clone(),
                term(vocab::REF_USCODE),
                uri.clone(),
            ));
            out.push(Triple::new(uri.clone(), term(vocab::DC_TITLE), title));
            match level {
                Some(ProvisionLevel::Section) => out.push(Triple::new(
                    uri.clone(),
                    term(vocab::RDF_TYPE),
                    term(vocab::SECTION),
                )),
                Some(ProvisionLevel::Subsection) => out.push(Triple::new(
                    uri.clone(),
                    term(vocab::RDF_TYPE),
                    term(vocab::SUBSECTION),
                )),
                None => {}
            }
            if let Some(page) = &entity.page {
                page_edges(&uri, page, &mut out)?;
            }
            if let Some(parent) = parent {
                let parent_uri = NamedNode::new(parent.uri.clone())?;
                out.push(Triple::new(
                    parent_uri.clone(),
                    term(vocab::CONTAINS_TRANSITIVE),
                    uri.clone(),
                ));
                out.push(Triple::new(
                    parent_uri.clone(),
                    term(vocab::RDF_TYPE),
                    term(vocab::SECTION),
                ));
                if let Some(page) = &parent.page {
                    page_edges(&parent_uri, page, &mut out)?;
                }
            }
        }
        EntityKind::CodeCollection { first, last } => {
            out.push(Triple::new(
                bill_uri.clone(),
                term(vocab::REF_USCODE_COLLECTION),
                uri.clone(),
            ));
            out.push(Triple::new(
                uri.clone(),
                term(vocab::RDF_TYPE),
                term(vocab::UNIQUE_LIST),
            ));
            out.push(Triple::new(
                uri.clone(),
                term(vocab::FIRST_ITEM),
                NamedNode::new(first.clone())?,
            ));
            if let Some(last) = last {
                out.push(Triple::new(
                    uri.clone(),
                    term(vocab::LAST_ITEM),
                    NamedNode::new(last.clone())?,
                ));
            }
            out.push(Triple::new(uri.clone(), term(vocab::DC_TITLE), title));
        }
        EntityKind::CodeChapter { parent } => {
            out.push(Triple::new(
                bill_uri.clone(),
                term(vocab::REF_USCODE),
                uri.clone(),
            ));
            out.push(Triple::new(uri.clone(), term(vocab::DC_TITLE), title));
            if let Some(page) = &entity.page {
                page_edges(&uri, page, &mut out)?;
            }
            if let Some(parent) = parent {
                let parent_uri = NamedNode::new(parent.uri.clone())?;
                out.push(Triple::new(
                    parent_uri.clone(),
                    term(vocab::CONTAINS_TRANSITIVE),
                    uri.clone(),
                ));
                if let Some(page) = &parent.page {
                    page_edges(&parent_uri, page, &mut out)?;
                }
            }
        }
        EntityKind::PublicLaw => {
            out.push(Triple::new(
                bill_uri.clone(),
                term(vocab::REF_PUBL),
                uri.clone(),
            ));
            out.push(Triple::new(uri.clone(), term(vocab::DC_TITLE), title));
            if let Some(page) = &entity.page {
                page_edges(&uri, page, &mut out)?;
            }
        }
        EntityKind::StatuteAtLarge => {
            out.push(Triple::new(
                bill_uri.clone(),
                term(vocab::REF_STATL),
                uri.clone(),
            ));
            out.push(Triple::new(uri.clone(), term(vocab::DC_TITLE), title));
            if let Some(page) = &entity.page {
                page_edges(&uri, page, &mut out)?;
            }
        }
        EntityKind::Act { raw, enrichment } => {
            out.push(Triple::new(
                bill_uri.clone(),
                term(vocab::REF_ACT),
                uri.clone(),
            ));
            out.push(Triple::new(uri.clone(), term(vocab::DC_TITLE), title));
            // The raw citation string rides along verbatim.
            out.push(Triple::new(
                bill_uri.clone(),
                term(vocab::HAS_CATO_REF),
                Literal::new_simple_literal(raw.clone()),
            ));
            if let Some(enrichment) = enrichment {
                out.push(Triple::new(
                    uri.clone(),
                    term(vocab::REF_DBPEDIA),
                    NamedNode::new(enrichment.clone())?,
                ));
            }
        }
    }

    Ok(out)
}

fn page_edges(
    subject: &NamedNode,
    page: &str,
    out: &mut Vec<Triple>,
) -> Result<(), IriParseError> {
    let page = NamedNode::new(page.to_string())?;
    out.push(Triple::new(
        subject.clone(),
        term(vocab::HAS_PAGE),
        page.clone(),
    ));
    out.push(Triple::new(
        page,
        term(vocab::RDF_TYPE),
        term(vocab::LEGAL_WEB_PAGE),
    ));
    Ok(())
}

fn ordinalize(n: u32) -> String {
    let suffix = match n % 100 {
        11..=13 => "th",
        _ => match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{n}{suffix}")
}
