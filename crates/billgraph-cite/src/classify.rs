//! Lexical classification of raw citation strings.
//!
//! A raw reference is a `/`-separated path: `[type/]title/locator[/locator...]`.
//! When more than one segment is present the first names the citation scheme
//! (`usc`, `usc-chapter`, `usc-appendix`, `public-law`, `statute-at-large`);
//! anything else falls back to a free-text named-act reference. Trailing
//! tokens on the last locator segment mark a modifier: `..` a closed range,
//! `etseq` an open-ended range, `note` a section note.
//!
//! Classification is purely lexical. It never consults external state, and a
//! shape we have no construction rule for is a typed [`SkipReason`], not a
//! crash.

use crate::normalize;
use serde::{Deserialize, Serialize};

/// Modifier carried by the last locator segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    None,
    /// Closed range. `first`/`last` are full replacement forms of the last
    /// locator segment (`78a..78d` yields `78a` and `78d`).
    Range { first: String, last: String },
    /// Open-ended range: lower bound only. The `etseq` token is dropped from
    /// the locator; identifier construction re-appends it literally.
    EtSeq,
    /// Section/chapter note. The `note` token is dropped from the locator.
    Note,
}

/// Title-plus-locator body shared by section and chapter citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeCite {
    /// Code title (`15` in `15 USC 78a`).
    pub title: String,
    /// Ordered locator segments below the title. Never empty: [`classify`]
    /// rejects references whose locator strips down to nothing.
    pub locator: Vec<String>,
    pub modifier: Modifier,
}

/// One raw reference, classified. The set of shapes is closed on purpose:
/// identifier construction matches on it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CitationRecord {
    /// `usc/{title}/{section}[/{subsection}...]` plus modifiers.
    Section(CodeCite),
    /// `usc-chapter/{title}/{chapter}[/{subchapter}]` plus `note`.
    Chapter(CodeCite),
    /// `public-law/{congress}/{number}`.
    PublicLaw { congress: String, number: String },
    /// `statute-at-large/{volume}/{page}`.
    StatuteAtLarge { volume: String, page: String },
    /// Free-text act name (the fallback when no scheme tag matches).
    Act { title: String, raw: String },
}

/// Why a raw reference was dropped. Skips are non-fatal: the caller logs the
/// reason and moves on to the next reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// A shape with no construction rule (chapter ranges, appendices).
    #[error("unsupported citation shape ({shape}) in `{raw}`")]
    Unsupported { raw: String, shape: String },
    /// Too few segments, or empty where content is required.
    #[error("malformed reference `{raw}`: {detail}")]
    Malformed { raw: String, detail: String },
    /// Named-act fallback whose title does not look like a title. Bills
    /// carry bare section fragments in act markup; those are noise here.
    #[error("act reference `{raw}` has no usable title")]
    UntitledAct { raw: String },
}

const TAG_USC: &str = "usc";
const TAG_USC_CHAPTER: &str = "usc-chapter";
const TAG_USC_APPENDIX: &str = "usc-appendix";
const TAG_PUBLIC_LAW: &str = "public-law";
const TAG_STATUTE: &str = "statute-at-large";

/// Classify one raw reference string.
pub fn classify(raw: &str) -> Result<CitationRecord, SkipReason> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SkipReason::Malformed {
            raw: raw.to_string(),
            detail: "empty reference".to_string(),
        });
    }

    let parts: Vec<&str> = trimmed.split('/').collect();
    if parts.len() == 1 {
        return classify_act(parts[0], raw);
    }

    match parts[0] {
        TAG_USC => {
            let cite = code_cite(raw, &parts)?;
            Ok(CitationRecord::Section(cite))
        }
        TAG_USC_CHAPTER => {
            let cite = code_cite(raw, &parts)?;
            match cite.modifier {
                Modifier::Range { .. } => Err(SkipReason::Unsupported {
                    raw: raw.to_string(),
                    shape: "chapter range".to_string(),
                }),
                Modifier::EtSeq => Err(SkipReason::Unsupported {
                    raw: raw.to_string(),
                    shape: "open-ended chapter range".to_string(),
                }),
                Modifier::None | Modifier::Note => Ok(CitationRecord::Chapter(cite)),
            }
        }
        TAG_USC_APPENDIX => Err(SkipReason::Unsupported {
            raw: raw.to_string(),
            shape: "code appendix".to_string(),
        }),
        TAG_PUBLIC_LAW => {
            let (first, second) = two_segments(raw, &parts)?;
            Ok(CitationRecord::PublicLaw {
                congress: first,
                number: second,
            })
        }
        TAG_STATUTE => {
            let (first, second) = two_segments(raw, &parts)?;
            Ok(CitationRecord::StatuteAtLarge {
                volume: first,
                page: second,
            })
        }
        // Unrecognized tag: a named-act path like `Social Security Act/s/201`.
        // The segment after the tag is the displayable title slot; bare
        // section fragments land here with a lowercase marker and get
        // filtered by the title check.
        _ => classify_act(parts[1], raw),
    }
}

fn classify_act(title_segment: &str, raw: &str) -> Result<CitationRecord, SkipReason> {
    if !title_segment
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase())
    {
        return Err(SkipReason::UntitledAct {
            raw: raw.to_string(),
        });
    }
    // Drop trailing citation detail after a colon ("Act of 1935: section 2").
    let display = title_segment
        .split(':')
        .next()
        .unwrap_or(title_segment)
        .trim();
    Ok(CitationRecord::Act {
        title: normalize::collapse_whitespace(display),
        raw: raw.trim().to_string(),
    })
}

fn code_cite(raw: &str, parts: &[&str]) -> Result<CodeCite, SkipReason> {
    if parts.len() < 3 {
        return Err(SkipReason::Malformed {
            raw: raw.to_string(),
            detail: "code reference needs a title and at least one locator".to_string(),
        });
    }
    let title = parts[1].to_string();
    let mut locator: Vec<String> = parts[2..].iter().map(|s| s.to_string()).collect();
    let modifier = detect_modifier(&mut locator);
    if locator.is_empty() || locator.iter().any(|s| s.is_empty()) {
        return Err(SkipReason::Malformed {
            raw: raw.to_string(),
            detail: "empty locator segment".to_string(),
        });
    }
    Ok(CodeCite {
        title,
        locator,
        modifier,
    })
}

/// Detect (and for `etseq`/`note`, strip) the modifier on the last locator
/// segment. Priority: range, then `etseq`, then `note`.
fn detect_modifier(locator: &mut Vec<String>) -> Modifier {
    let Some(last) = locator.last().cloned() else {
        return Modifier::None;
    };
    if let Some((first, rest)) = last.split_once("..") {
        return Modifier::Range {
            first: first.to_string(),
            last: rest.to_string(),
        };
    }
    if last.contains("etseq") {
        locator.pop();
        return Modifier::EtSeq;
    }
    if last.contains("note") {
        locator.pop();
        return Modifier::Note;
    }
    Modifier::None
}

fn two_segments(raw: &str, parts: &[&str]) -> Result<(String, String), SkipReason> {
    if parts.len() < 3 || parts[1].is_empty() || parts[2].is_empty() {
        return Err(SkipReason::Malformed {
            raw: raw.to_string(),
            detail: "expected `{tag}/{number}/{number}`".to_string(),
        });
    }
    Ok((parts[1].to_string(), parts[2].to_string()))
}
