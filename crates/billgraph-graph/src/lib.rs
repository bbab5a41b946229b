//! Triple graph emission for billgraph.
//!
//! One bill in, one self-contained [`TripleBlock`] out:
//!
//! - [`vocab`] pins the namespaces, predicates and classes of the output
//!   contract.
//! - [`assemble`] turns bill metadata plus resolved citation entities into
//!   the bill's statements, isolating per-entity failures.
//! - [`TripleSink`] owns the output writer and appends whole blocks, which
//!   is what keeps concurrent bill processing from interleaving statements.
//!
//! Because identifier construction upstream is deterministic, re-running a
//! bill reproduces its block statement-for-statement (ordering aside).

pub mod assemble;
pub mod triples;
pub mod vocab;

pub use assemble::{assemble, AssembleError, AssembleWarning};
pub use triples::{TripleBlock, TripleSink};
