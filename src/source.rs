//! Resolves a single source string into a blocking, lossily-decoded line
//! iterator, dispatching on URL scheme and gzip compression.

use std::cell::RefCell;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::rc::Rc;

use flate2::read::MultiGzDecoder;

use crate::error::{GffStatError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Opens `source` and returns a line iterator over its decompressed,
/// lossily UTF-8-decoded text. `force_gzip` mirrors the CLI's `--gzipped`
/// flag: treat the stream as gzip regardless of suffix or magic bytes.
pub fn open_lines(source: &str, force_gzip: bool) -> Result<LossyLines> {
    let reader = if is_remote(source) {
        open_remote(source, force_gzip)?
    } else {
        open_local(source, force_gzip)?
    };
    Ok(LossyLines {
        reader,
        failure: Rc::new(RefCell::new(None)),
    })
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://") || source.starts_with("ftp://")
}

fn open_remote(source: &str, force_gzip: bool) -> Result<Box<dyn BufRead>> {
    if source.starts_with("ftp://") {
        return Err(GffStatError::UnsupportedScheme("ftp".to_string()));
    }

    let url = url::Url::parse(source)
        .map_err(|e| GffStatError::SourceUnavailable(format!("{source}: {e}")))?;

    let response = reqwest::blocking::get(url)
        .map_err(|e| GffStatError::SourceUnavailable(format!("{source}: {e}")))?
        .error_for_status()
        .map_err(|e| GffStatError::SourceUnavailable(format!("{source}: {e}")))?;

    let gzip = force_gzip || has_gzip_suffix(source);
    Ok(wrap(response, gzip))
}

fn open_local(path: &str, force_gzip: bool) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| GffStatError::SourceUnavailable(format!("{path}: {e}")))?;
    let mut buffered = BufReader::new(file);

    let gzip = if force_gzip {
        true
    } else {
        let peek = buffered
            .fill_buf()
            .map_err(|e| GffStatError::SourceUnavailable(format!("{path}: {e}")))?;
        peek.len() >= GZIP_MAGIC.len() && peek[..2] == GZIP_MAGIC
    };

    Ok(wrap(buffered, gzip))
}

fn has_gzip_suffix(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.ends_with(".gz") || lower.ends_with(".gzip")
}

fn wrap<R: Read + 'static>(reader: R, gzip: bool) -> Box<dyn BufRead> {
    if gzip {
        Box::new(BufReader::new(MultiGzDecoder::new(reader)))
    } else {
        Box::new(BufReader::new(reader))
    }
}

/// A blocking iterator over decoded text lines, with the trailing newline
/// stripped and invalid UTF-8 replaced rather than treated as fatal.
///
/// A mid-stream I/O or gzip-decode error is not UTF-8 decoding — it is not
/// replaced, it ends the iteration and is latched in `failure` for the
/// caller to surface as a fatal [`GffStatError::Decompression`] once the
/// stream has been drained, per the "partial results are discarded" policy.
pub struct LossyLines {
    reader: Box<dyn BufRead>,
    failure: Rc<RefCell<Option<String>>>,
}

impl LossyLines {
    /// A shared handle to the first read failure this iterator hits, if
    /// any. Kept independent of the iterator itself so a caller that has
    /// already moved `self` into a `for` loop can still observe it after.
    pub fn failure_handle(&self) -> Rc<RefCell<Option<String>>> {
        Rc::clone(&self.failure)
    }
}

impl Iterator for LossyLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut raw = Vec::new();
        match self.reader.read_until(b'\n', &mut raw) {
            Ok(0) => None,
            Ok(_) => {
                while matches!(raw.last(), Some(b'\n') | Some(b'\r')) {
                    raw.pop();
                }
                Some(String::from_utf8_lossy(&raw).into_owned())
            }
            Err(e) => {
                *self.failure.borrow_mut() = Some(e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_plain_text_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.gff3");
        std::fs::write(&path, "line one\nline two\n").unwrap();

        let lines: Vec<String> = open_lines(path.to_str().unwrap(), false).unwrap().collect();
        assert_eq!(lines, vec!["line one", "line two"]);
    }

    #[test]
    fn detects_gzip_by_magic_bytes() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compressed.gff3.gz");
        let file = File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(b"gzipped line\n").unwrap();
        encoder.finish().unwrap();

        let lines: Vec<String> = open_lines(path.to_str().unwrap(), false).unwrap().collect();
        assert_eq!(lines, vec!["gzipped line"]);
    }

    #[test]
    fn missing_local_file_is_source_unavailable() {
        let err = open_lines("/no/such/path.gff3", false).unwrap_err();
        assert!(matches!(err, GffStatError::SourceUnavailable(_)));
    }

    #[test]
    fn ftp_scheme_is_unsupported() {
        let err = open_lines("ftp://example.org/x.gff3", false).unwrap_err();
        assert!(matches!(err, GffStatError::UnsupportedScheme(_)));
    }

    #[test]
    fn truncated_gzip_latches_a_failure_instead_of_ending_silently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truncated.gff3.gz");
        std::fs::write(&path, [0x1F, 0x8B, 0x08, 0x00, 0x00, 0x00]).unwrap();

        let lines = open_lines(path.to_str().unwrap(), false).unwrap();
        let failure = lines.failure_handle();
        let collected: Vec<String> = lines.collect();

        assert!(collected.is_empty());
        assert!(failure.borrow().is_some());
    }
}
