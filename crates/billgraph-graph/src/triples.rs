//! Per-bill triple blocks and the shared output sink.
//!
//! A [`TripleBlock`] is the self-contained set of statements for one bill.
//! Blocks serialize to N-Triples; term escaping and IRI validity are handled
//! by the `oxrdf` term types, so anything that reaches a block is already
//! writable.
//!
//! The sink is the only shared resource in the pipeline: whole blocks are
//! appended one at a time, so concurrently-resolved bills can never
//! interleave statements (blocks from different bills may land in any
//! order).

use oxrdf::Triple;
use std::io::{self, Write};

/// Self-contained statement set for one bill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleBlock {
    triples: Vec<Triple>,
}

impl TripleBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    pub fn extend(&mut self, triples: impl IntoIterator<Item = Triple>) {
        self.triples.extend(triples);
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Serialize as N-Triples, one statement per line.
    pub fn write_ntriples<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for triple in &self.triples {
            writeln!(w, "{triple} .")?;
        }
        Ok(())
    }

    pub fn to_ntriples(&self) -> String {
        let mut out = Vec::new();
        self.write_ntriples(&mut out)
            .expect("writing to a Vec cannot fail");
        String::from_utf8(out).expect("N-Triples output is UTF-8")
    }
}

impl IntoIterator for TripleBlock {
    type Item = Triple;
    type IntoIter = std::vec::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

/// Owns the output writer; the one place bill blocks are serialized.
#[derive(Debug)]
pub struct TripleSink<W: Write> {
    writer: W,
    blocks: usize,
    statements: usize,
}

impl<W: Write> TripleSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            blocks: 0,
            statements: 0,
        }
    }

    /// Append one bill's block atomically with respect to other blocks.
    pub fn append(&mut self, block: &TripleBlock) -> io::Result<()> {
        block.write_ntriples(&mut self.writer)?;
        self.blocks += 1;
        self.statements += block.len();
        Ok(())
    }

    pub fn blocks_written(&self) -> usize {
        self.blocks
    }

    pub fn statements_written(&self) -> usize {
        self.statements
    }

    /// Flush and hand the writer back.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{Literal, NamedNode};

    fn sample_triple() -> Triple {
        Triple::new(
            NamedNode::new("http://example.org/bill").expect("iri"),
            NamedNode::new("http://example.org/title").expect("iri"),
            Literal::new_simple_literal("A \"quoted\" title"),
        )
    }

    #[test]
    fn ntriples_lines_are_terminated_and_escaped() {
        let mut block = TripleBlock::new();
        block.push(sample_triple());
        let out = block.to_ntriples();
        assert_eq!(
            out,
            "<http://example.org/bill> <http://example.org/title> \"A \\\"quoted\\\" title\" .\n"
        );
    }

    #[test]
    fn sink_appends_whole_blocks() {
        let mut sink = TripleSink::new(Vec::new());
        let mut block = TripleBlock::new();
        block.push(sample_triple());
        block.push(sample_triple());
        sink.append(&block).expect("append");
        sink.append(&block).expect("append");
        assert_eq!(sink.blocks_written(), 2);
        assert_eq!(sink.statements_written(), 4);
        let bytes = sink.finish().expect("finish");
        assert_eq!(String::from_utf8(bytes).expect("utf8").lines().count(), 4);
    }
}
