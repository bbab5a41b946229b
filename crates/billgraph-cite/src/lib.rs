//! Citation resolution for billgraph (the reference-handling core).
//!
//! This crate turns raw citation strings harvested from bill documents into
//! canonical, deterministic entities:
//!
//! - [`classify`] parses one raw reference into a typed [`CitationRecord`]
//!   (a closed set of citation shapes; purely lexical, no external state).
//! - [`resolve`] builds canonical identifiers and human-readable page links
//!   from those records, derives containment parents, and de-duplicates.
//! - [`enrich`] defines the injected lookup capability used to attach an
//!   external cross-reference to named acts (best-effort, never fatal).
//!
//! Identifier construction is referentially transparent: equal
//! (shape, title, locator, modifier) inputs always produce the same
//! identifier, so re-runs and cross-bill de-duplication are safe. Everything
//! here is synchronous, in-memory work; network access lives behind the
//! [`enrich::ActLookup`] trait and in the surrounding orchestrator.

pub mod classify;
pub mod enrich;
pub mod hierarchy;
pub mod normalize;
pub mod resolve;

pub use classify::{classify, CitationRecord, CodeCite, Modifier, SkipReason};
pub use enrich::{ActLookup, LookupCandidate, LookupError, NoEnrichment};
pub use resolve::{
    resolve, resolve_record, EntityKind, ParentRef, ProvisionLevel, ResolveWarning,
    ResolvedEntity,
};
