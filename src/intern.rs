//! A small string interner bounding memory for repeated feature-type and
//! biotype strings seen across a GFF3 stream.

use std::collections::HashSet;
use std::rc::Rc;

/// An interned string handle. Two handles produced by the same [`Interner`]
/// for equal text are pointer-equal, so comparisons downstream can skip the
/// byte-for-byte check.
pub type Symbol = Rc<str>;

/// Owns the set of distinct strings seen so far and hands out shared handles.
///
/// Feature types and biotypes drawn from a genome annotation have tiny
/// cardinality (tens to hundreds of distinct values) even when the file
/// itself has millions of rows, so a single interner kept by the graph
/// builder bounds string storage to that distinct-value count.
#[derive(Debug, Default)]
pub struct Interner {
    seen: HashSet<Symbol>,
}

impl Interner {
    /// Creates an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared handle for `text`, allocating one on first sight.
    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(existing) = self.seen.get(text) {
            return Rc::clone(existing);
        }
        let symbol: Symbol = Rc::from(text);
        self.seen.insert(Rc::clone(&symbol));
        symbol
    }

    /// Number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True when nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_text_yields_pointer_equal_handles() {
        let mut interner = Interner::new();
        let a = interner.intern("protein_coding");
        let b = interner.intern("protein_coding");
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn distinct_text_yields_distinct_handles() {
        let mut interner = Interner::new();
        let a = interner.intern("exon");
        let b = interner.intern("CDS");
        assert!(!Rc::ptr_eq(&a, &b));
        assert_eq!(interner.len(), 2);
    }
}
