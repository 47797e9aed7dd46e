//! Content-based MIME detection
//!
//! Uploaded files arrive under temporary names, so the extension says
//! nothing. [`MagicSniffer`] looks at the first few kilobytes of content:
//! binary signatures first, then the shape of the text.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::config::DEFAULT_SNIFF_BYTES;

/// Detects the MIME type of a file from its content
pub trait MimeSniffer {
    fn detect(&self, path: &Path) -> io::Result<String>;
}

/// Binary signatures checked before any text heuristics
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\xff\xd8\xff", "image/jpeg"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1f\x8b", "application/gzip"),
    (b"\x7fELF", "application/x-executable"),
];

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";
const UTF16_LE_BOM: &[u8] = b"\xff\xfe";
const UTF16_BE_BOM: &[u8] = b"\xfe\xff";

/// [`MimeSniffer`] using magic numbers and text-shape heuristics
#[derive(Debug, Clone, Copy)]
pub struct MagicSniffer {
    sniff_bytes: usize,
}

impl Default for MagicSniffer {
    fn default() -> Self {
        Self::new(DEFAULT_SNIFF_BYTES)
    }
}

impl MagicSniffer {
    /// Create a sniffer that inspects at most `sniff_bytes` of each file
    pub fn new(sniff_bytes: usize) -> Self {
        Self {
            sniff_bytes: sniff_bytes.max(1),
        }
    }

    /// Classify a content prefix
    ///
    /// `complete` tells whether `head` is the whole file; a truncated prefix
    /// may end mid-character or mid-line.
    pub fn classify(head: &[u8], complete: bool) -> &'static str {
        if head.is_empty() {
            return "application/x-empty";
        }

        if let Some((_, mime)) = SIGNATURES.iter().find(|(magic, _)| head.starts_with(magic)) {
            return *mime;
        }

        // UTF-16 text is full of NUL bytes, so it has to be recognised first
        if let Some(text) = decode_utf16(head, complete) {
            return classify_text(&text, complete);
        }

        if head.contains(&0) {
            return "application/octet-stream";
        }

        let body = head.strip_prefix(UTF8_BOM).unwrap_or(head);
        match std::str::from_utf8(body) {
            Ok(text) => classify_text(text, complete),
            // A truncated prefix may cut a multi-byte character in half
            Err(e) if !complete && e.error_len().is_none() => {
                match std::str::from_utf8(&body[..e.valid_up_to()]) {
                    Ok(text) => classify_text(text, complete),
                    Err(_) => "application/octet-stream",
                }
            }
            // Legacy 8-bit encodings such as ISO-8859-1
            Err(_) if !body.iter().any(|&b| is_binary_control(b as char)) => {
                let text: String = body.iter().map(|&b| char::from(b)).collect();
                classify_text(&text, complete)
            }
            Err(_) => "application/octet-stream",
        }
    }
}

impl MimeSniffer for MagicSniffer {
    fn detect(&self, path: &Path) -> io::Result<String> {
        let file = File::open(path)?;
        let mut head = Vec::with_capacity(self.sniff_bytes.min(64 * 1024));
        // Read one byte past the window to learn whether the file is longer
        file.take(self.sniff_bytes as u64 + 1)
            .read_to_end(&mut head)?;

        let complete = head.len() <= self.sniff_bytes;
        head.truncate(self.sniff_bytes);

        Ok(Self::classify(&head, complete).to_string())
    }
}

/// Classify decoded text by its shape
fn classify_text(text: &str, complete: bool) -> &'static str {
    let trimmed = text.trim_start();
    let lowered: String = trimmed.chars().take(64).collect::<String>().to_lowercase();

    if lowered.starts_with("<?xml") {
        return "application/xml";
    }
    if lowered.starts_with("<!doctype html") || lowered.starts_with("<html") {
        return "text/html";
    }
    if complete
        && (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
    {
        return "application/json";
    }
    if looks_like_csv(text, complete) {
        return "text/csv";
    }

    "text/plain"
}

/// Decode a prefix that opens with a UTF-16 byte-order mark
///
/// Returns `None` when there is no BOM, or when the decoded content is not
/// text.
fn decode_utf16(head: &[u8], complete: bool) -> Option<String> {
    let (body, unit): (&[u8], fn([u8; 2]) -> u16) =
        if let Some(body) = head.strip_prefix(UTF16_LE_BOM) {
            (body, u16::from_le_bytes)
        } else if let Some(body) = head.strip_prefix(UTF16_BE_BOM) {
            (body, u16::from_be_bytes)
        } else {
            return None;
        };

    if complete && body.len() % 2 != 0 {
        return None;
    }

    let units = body.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    let mut text = String::with_capacity(body.len() / 2);
    for decoded in char::decode_utf16(units) {
        match decoded {
            Ok(c) if is_binary_control(c) => return None,
            Ok(c) => text.push(c),
            // A truncated prefix may cut a surrogate pair in half
            Err(_) if !complete => break,
            Err(_) => return None,
        }
    }
    Some(text)
}

/// C0 control characters that do not occur in text files
fn is_binary_control(c: char) -> bool {
    c < ' ' && !matches!(c, '\t' | '\n' | '\r' | '\x0c' | '\x1b')
}

/// At least two lines, each with the same non-zero number of unquoted commas
fn looks_like_csv(text: &str, complete: bool) -> bool {
    let mut lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if !complete && !text.ends_with('\n') {
        lines.pop();
    }
    if lines.len() < 2 {
        return false;
    }

    let expected = count_delimiters(lines[0]);
    expected > 0 && lines.iter().all(|line| count_delimiters(line) == expected)
}

fn count_delimiters(line: &str) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => count += 1,
            _ => {}
        }
    }
    count
}
