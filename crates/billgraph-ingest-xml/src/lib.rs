//! Bill XML ingestion for billgraph (boundary adapter).
//!
//! This crate sits at the document boundary:
//!
//! - It scans bill XML (untrusted, schema drift happens) for the markup
//!   shapes that carry citations, producing a deduplicated, order-preserving
//!   list of raw reference strings.
//! - It pulls the bill metadata the graph needs (titles, legislative number,
//!   stage, subjects).
//!
//! Citation-bearing markup comes in two equivalent shapes per source type:
//! an inline annotated reference (`entity-ref` with an `entity-type`
//! attribute and the citation path in `value`) and an external
//! cross-reference (`external-xref` with a `legal-doc` attribute and the
//! path in `parsable-cite`), plus free-text `act-name` elements. Absence of
//! matches is an empty list, never an error.
//!
//! Everything here is a streaming event scan; no DOM is built.

use billgraph_cite::normalize;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Markup shape a raw reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefOrigin {
    /// `entity-ref` with a machine-readable `value` attribute.
    InlineEntity,
    /// Free-text `act-name` element.
    ActName,
    /// `external-xref` with a `parsable-cite` attribute.
    ExternalXref,
}

/// One raw citation string, scoped to the bill whose document produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReference {
    pub value: String,
    pub origin: RefOrigin,
}

/// Bill identity as handed over by the inventory collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillIdentity {
    pub congress: u32,
    pub bill_type: String,
    pub bill_number: u32,
    pub version: String,
}

/// Metadata extracted from one bill document, plus its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillMeta {
    pub identity: BillIdentity,
    /// Official title, whitespace-collapsed.
    pub title: String,
    /// Dublin Core title (falls back to the official title), ASCII-safe.
    pub dc_title: String,
    pub short_title: Option<String>,
    /// Legislative number as printed, e.g. `H. R. 3590`.
    pub legis_num: String,
    /// `bill-stage` / `resolution-stage` attribute, when present.
    pub stage: Option<String>,
    /// Dublin Core subjects, one tag per entry.
    pub topics: Vec<String>,
}

impl BillMeta {
    /// Stable identifier local name: `{congress}_{flattened legis-num}`.
    ///
    /// `H. R. 3590` in the 111th Congress becomes `111_h_r_3590`.
    pub fn bill_key(&self) -> String {
        static DOT_RUN: OnceLock<Regex> = OnceLock::new();
        let dot_run = DOT_RUN.get_or_init(|| Regex::new(r"\.\s+").expect("static pattern"));
        let flat = dot_run
            .replace_all(&self.legis_num, "_")
            .to_lowercase()
            .replace(' ', "_");
        format!("{}_{}", self.identity.congress, flat)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("bill document is not well-formed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("bill document has no `{0}` element")]
    MissingElement(&'static str),
}

/// `entity-type` attribute values whose `value` attribute is a citation path.
const ENTITY_TYPES: [&str; 4] = ["act", "uscode", "public-law", "statute-at-large"];
/// `legal-doc` attribute values whose `parsable-cite` attribute is a citation path.
const LEGAL_DOCS: [&str; 5] = [
    "usc",
    "usc-chapter",
    "usc-appendix",
    "public-law",
    "statute-at-large",
];

/// Scan a bill document for raw citation strings.
///
/// Order of first occurrence is preserved; repeated strings are dropped
/// (bills routinely cite the same provision dozens of times).
pub fn extract_references(xml: &str) -> Result<Vec<RawReference>, ExtractError> {
    let mut reader = Reader::from_str(xml);

    let mut refs: Vec<RawReference> = Vec::new();
    let mut seen: std::collections::HashSet<String> = std::collections::HashSet::new();
    // Text accumulates while inside an `act-name` element.
    let mut act_name: Option<String> = None;

    let mut push = |value: String, origin: RefOrigin, refs: &mut Vec<RawReference>| {
        let value = value.trim().to_string();
        if !value.is_empty() && seen.insert(value.clone()) {
            refs.push(RawReference { value, origin });
        }
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                match e.name().as_ref() {
                    b"entity-ref" => {
                        if let Some(value) =
                            attr_if(&e, b"entity-type", &ENTITY_TYPES, b"value")?
                        {
                            push(value, RefOrigin::InlineEntity, &mut refs);
                        }
                    }
                    b"external-xref" => {
                        if let Some(value) =
                            attr_if(&e, b"legal-doc", &LEGAL_DOCS, b"parsable-cite")?
                        {
                            push(value, RefOrigin::ExternalXref, &mut refs);
                        }
                    }
                    b"act-name" => act_name = Some(String::new()),
                    _ => {}
                }
            }
            // Self-closing carriers still hold their citation in attributes.
            Event::Empty(e) => {
                match e.name().as_ref() {
                    b"entity-ref" => {
                        if let Some(value) =
                            attr_if(&e, b"entity-type", &ENTITY_TYPES, b"value")?
                        {
                            push(value, RefOrigin::InlineEntity, &mut refs);
                        }
                    }
                    b"external-xref" => {
                        if let Some(value) =
                            attr_if(&e, b"legal-doc", &LEGAL_DOCS, b"parsable-cite")?
                        {
                            push(value, RefOrigin::ExternalXref, &mut refs);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                if let Some(buf) = act_name.as_mut() {
                    buf.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"act-name" {
                    if let Some(buf) = act_name.take() {
                        push(
                            normalize::collapse_whitespace(&buf),
                            RefOrigin::ActName,
                            &mut refs,
                        );
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::debug!(count = refs.len(), "reference strings compiled");
    Ok(refs)
}

/// When `e` carries `gate_attr` valued in `accepted`, return its
/// `value_attr` content.
fn attr_if(
    e: &quick_xml::events::BytesStart<'_>,
    gate_attr: &[u8],
    accepted: &[&str],
    value_attr: &[u8],
) -> Result<Option<String>, ExtractError> {
    let mut gate_ok = false;
    let mut value: Option<String> = None;
    for attr in e.attributes().with_checks(false).flatten() {
        if attr.key.as_ref() == gate_attr {
            let v = attr.unescape_value().map_err(quick_xml::Error::from)?;
            gate_ok = accepted.contains(&v.as_ref());
        } else if attr.key.as_ref() == value_attr {
            value = Some(
                attr.unescape_value()
                    .map_err(quick_xml::Error::from)?
                    .into_owned(),
            );
        }
    }
    Ok(if gate_ok { value } else { None })
}

/// Pull bill metadata out of a bill document.
pub fn extract_metadata(xml: &str, identity: &BillIdentity) -> Result<BillMeta, ExtractError> {
    let mut reader = Reader::from_str(xml);

    let mut title: Option<String> = None;
    let mut dc_title: Option<String> = None;
    let mut short_title: Option<String> = None;
    let mut legis_num: Option<String> = None;
    let mut stage: Option<String> = None;
    let mut topics: Vec<String> = Vec::new();

    // Name of the element whose text is being captured, with its buffer.
    let mut capture: Option<(Vec<u8>, String)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                match name.as_slice() {
                    b"bill" | b"resolution" if stage.is_none() => {
                        let stage_attr: &[u8] = if name.as_slice() == b"bill" {
                            b"bill-stage"
                        } else {
                            b"resolution-stage"
                        };
                        for attr in e.attributes().with_checks(false).flatten() {
                            if attr.key.as_ref() == stage_attr {
                                stage = Some(
                                    attr.unescape_value()
                                        .map_err(quick_xml::Error::from)?
                                        .into_owned(),
                                );
                            }
                        }
                    }
                    b"official-title" | b"short-title" | b"legis-num" | b"dc:title"
                    | b"dc:subject"
                        if capture.is_none() =>
                    {
                        capture = Some((name, String::new()));
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                if let Some((_, buf)) = capture.as_mut() {
                    buf.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => {
                let finished = match capture.as_ref() {
                    Some((name, _)) if name.as_slice() == e.name().as_ref() => capture.take(),
                    _ => None,
                };
                if let Some((name, buf)) = finished {
                    let text = normalize::collapse_whitespace(&buf);
                    if text.is_empty() {
                        continue;
                    }
                    match name.as_slice() {
                        b"official-title" => {
                            title.get_or_insert(text);
                        }
                        b"short-title" => {
                            short_title.get_or_insert(text);
                        }
                        b"legis-num" => {
                            legis_num.get_or_insert(text);
                        }
                        b"dc:title" => {
                            dc_title.get_or_insert(text);
                        }
                        b"dc:subject" => {
                            topics.extend(
                                text.split(',')
                                    .map(|s| s.trim().to_string())
                                    .filter(|s| !s.is_empty()),
                            );
                        }
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let title = title.ok_or(ExtractError::MissingElement("official-title"))?;
    let legis_num = legis_num.ok_or(ExtractError::MissingElement("legis-num"))?;

    let (dc_title, changed) = normalize::to_ascii(&dc_title.unwrap_or_else(|| title.clone()));
    if changed {
        tracing::debug!(bill = %legis_num, "transliterated non-ASCII bill title");
    }

    Ok(BillMeta {
        identity: identity.clone(),
        title,
        dc_title,
        short_title,
        legis_num,
        stage,
        topics,
    })
}
