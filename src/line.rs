//! Extracts the handful of semantic fields the graph builder needs from one
//! GFF3 row, without allocating more than necessary.

use memchr::memchr;

use crate::intern::{Interner, Symbol};

/// Feature types that are always dropped before attribute parsing even
/// starts, per the row-level skip-set. Genuine `##sequence-region` header
/// directives are comments and are already excluded by [`should_skip`].
const SKIP_TYPES: [&str; 3] = ["region", "chromosome", "scaffold"];

/// The fields consumed from one feature row, ready for the graph builder.
pub struct ParsedRow {
    pub feature_type: Symbol,
    pub length: u32,
    pub parent_ids: Vec<Box<str>>,
    pub biotype: Option<Symbol>,
    pub feature_id: Option<Box<str>>,
}

/// Why a row produced no [`ParsedRow`].
#[derive(Debug, PartialEq, Eq)]
pub enum SkipReason {
    Comment,
    Blank,
    TooFewColumns,
    SkippedType,
    InvalidCoordinates,
    MalformedAttribute,
}

/// True for comment lines (`#`-prefixed) and lines that are blank after
/// trimming; both are dropped before column splitting.
pub fn should_skip(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parses one GFF3 row into its semantic fields, or reports why it was
/// skipped. `interner` is shared across a stream so that repeated
/// feature-type and biotype strings collapse to one allocation.
pub fn parse_line(line: &str, interner: &mut Interner) -> Result<ParsedRow, SkipReason> {
    if line.trim().is_empty() {
        return Err(SkipReason::Blank);
    }
    if line.starts_with('#') {
        return Err(SkipReason::Comment);
    }

    let mut columns = line.split('\t');
    let _seqid = columns.next().ok_or(SkipReason::TooFewColumns)?;
    let _source = columns.next().ok_or(SkipReason::TooFewColumns)?;
    let feature_type = columns.next().ok_or(SkipReason::TooFewColumns)?;
    let start_col = columns.next().ok_or(SkipReason::TooFewColumns)?;
    let end_col = columns.next().ok_or(SkipReason::TooFewColumns)?;
    let _score = columns.next().ok_or(SkipReason::TooFewColumns)?;
    let _strand = columns.next().ok_or(SkipReason::TooFewColumns)?;
    let _phase = columns.next().ok_or(SkipReason::TooFewColumns)?;
    let attributes = columns.next().ok_or(SkipReason::TooFewColumns)?;

    if SKIP_TYPES.contains(&feature_type) {
        return Err(SkipReason::SkippedType);
    }

    let start: i64 = start_col.trim().parse().map_err(|_| SkipReason::InvalidCoordinates)?;
    let end: i64 = end_col.trim().parse().map_err(|_| SkipReason::InvalidCoordinates)?;
    if start > end {
        return Err(SkipReason::InvalidCoordinates);
    }
    let length = (end - start + 1) as u32;

    let (parent_ids, biotype, feature_id) =
        parse_attributes(attributes, interner).ok_or(SkipReason::MalformedAttribute)?;

    Ok(ParsedRow {
        feature_type: interner.intern(feature_type),
        length,
        parent_ids,
        biotype,
        feature_id,
    })
}

/// Extracts `ID`, `Parent`, and the biotype synonyms from a GFF3 attributes
/// column. Returns `None` if a `;`-separated pair lacks an `=`, per the
/// malformed-attribute skip policy: the whole row is dropped rather than
/// partially interpreted.
fn parse_attributes(
    attributes: &str,
    interner: &mut Interner,
) -> Option<(Vec<Box<str>>, Option<Symbol>, Option<Box<str>>)> {
    let mut parent_ids = Vec::new();
    let mut biotype = None;
    let mut feature_id = None;

    for pair in attributes.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let bytes = pair.as_bytes();
        let eq = memchr(b'=', bytes)?;
        let key = &pair[..eq];
        let value = &pair[eq + 1..];

        match key {
            "ID" => feature_id = Some(Box::from(value)),
            "Parent" => {
                parent_ids = value.split(',').map(Box::from).collect();
            }
            "biotype" | "gene_biotype" | "transcript_biotype" => {
                biotype = Some(interner.intern(value));
            }
            _ => {}
        }
    }

    Some((parent_ids, biotype, feature_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(line: &str) -> ParsedRow {
        let mut interner = Interner::new();
        parse_line(line, &mut interner).unwrap_or_else(|e| panic!("expected row, got {:?}", e))
    }

    #[test]
    fn parses_a_gene_row() {
        let r = row(".\t.\tgene\t1000\t2000\t.\t.\t.\tID=g1;biotype=protein_coding");
        assert_eq!(&*r.feature_type, "gene");
        assert_eq!(r.length, 1001);
        assert!(r.parent_ids.is_empty());
        assert_eq!(r.biotype.as_deref(), Some("protein_coding"));
        assert_eq!(r.feature_id.as_deref(), Some("g1"));
    }

    #[test]
    fn parses_multiple_parents() {
        let r = row(".\t.\texon\t1\t10\t.\t.\t.\tID=e1;Parent=t1,t2");
        assert_eq!(r.parent_ids.len(), 2);
        assert_eq!(&*r.parent_ids[0], "t1");
        assert_eq!(&*r.parent_ids[1], "t2");
    }

    #[test]
    fn skips_comments_and_blanks() {
        assert!(should_skip("# a comment"));
        assert!(should_skip("   "));
        assert!(!should_skip(".\t.\tgene\t1\t2\t.\t.\t.\tID=g1"));
    }

    #[test]
    fn skips_rows_in_the_skip_set() {
        let mut interner = Interner::new();
        let err = parse_line(".\t.\tregion\t1\t10\t.\t.\t.\tID=r1", &mut interner).unwrap_err();
        assert_eq!(err, SkipReason::SkippedType);
    }

    #[test]
    fn skips_malformed_attribute_pairs() {
        let mut interner = Interner::new();
        let err = parse_line(".\t.\tgene\t1\t10\t.\t.\t.\tID", &mut interner).unwrap_err();
        assert_eq!(err, SkipReason::MalformedAttribute);
    }

    #[test]
    fn skips_invalid_coordinates() {
        let mut interner = Interner::new();
        let err = parse_line(".\t.\tgene\tabc\t10\t.\t.\t.\tID=g1", &mut interner).unwrap_err();
        assert_eq!(err, SkipReason::InvalidCoordinates);
    }
}
