//! Dump stream segmentation.
//!
//! pg_dump output is line oriented: statements end with `;` at end of line,
//! with comment lines, blank lines, and session `SET` statements interleaved.
//! The stream is filtered first and then split on the `;\n` separator.

use std::io::{self, BufRead};

/// Statement separator in pg_dump output.
const SEPARATOR: &str = ";\n";

/// Iterator over statements in a filtered schema dump.
///
/// Each yielded statement keeps its `;\n` terminator. Trailing text without
/// a separator is yielded as-is at end of input.
pub struct Segments<R> {
    reader: R,
    buffer: String,
    line: String,
    done: bool,
}

impl<R: BufRead> Segments<R> {
    /// Create a segmenter over a dump stream.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            line: String::new(),
            done: false,
        }
    }
}

/// Filter applied to each raw dump line before segmentation.
fn keep_line(line: &str) -> bool {
    let body = line.trim_end_matches(['\n', '\r']);
    !(body.starts_with("--") || body.trim().is_empty() || body.starts_with("SET"))
}

impl<R: BufRead> Iterator for Segments<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pos) = self.buffer.find(SEPARATOR) {
                let rest = self.buffer.split_off(pos + SEPARATOR.len());
                let stmt = std::mem::replace(&mut self.buffer, rest);
                return Some(Ok(stmt));
            }

            if self.done {
                if self.buffer.is_empty() {
                    return None;
                }
                return Some(Ok(std::mem::take(&mut self.buffer)));
            }

            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    if keep_line(&self.line) {
                        self.buffer.push_str(&self.line);
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
