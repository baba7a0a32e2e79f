use crate::types::HashRecord;
use std::io::{self, BufRead};

/// Lazily yields one [`HashRecord`] per non-blank input line.
///
/// Line terminators and surrounding whitespace are stripped; blank lines are
/// skipped without being counted. The first read error is yielded and ends
/// the sequence.
pub struct LineReader<R> {
    inner: R,
    buf: String,
    done: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: String::new(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<HashRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    let line = self.buf.trim();
                    if !line.is_empty() {
                        return Some(Ok(HashRecord::new(line)));
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(input: &[u8]) -> Vec<String> {
        LineReader::new(Cursor::new(input))
            .map(|r| r.unwrap().as_str().to_string())
            .collect()
    }

    #[test]
    fn test_skips_blank_lines() {
        assert_eq!(collect(b"h1\nh2\n\nh3\n"), vec!["h1", "h2", "h3"]);
    }

    #[test]
    fn test_strips_crlf_and_whitespace() {
        assert_eq!(collect(b"h1\r\n  \r\n h2 \r\nh3"), vec!["h1", "h2", "h3"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(collect(b"").is_empty());
        assert!(collect(b"\n\n\r\n").is_empty());
    }

    #[test]
    fn test_no_case_normalization() {
        assert_eq!(collect(b"AbCdEf\n"), vec!["AbCdEf"]);
    }

    #[test]
    fn test_invalid_utf8_ends_sequence() {
        let mut reader = LineReader::new(Cursor::new(&b"h1\n\xff\xfe\nh3\n"[..]));
        assert_eq!(reader.next().unwrap().unwrap().as_str(), "h1");
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }
}
