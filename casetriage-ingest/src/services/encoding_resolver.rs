//! Byte-to-text decoding for case exports
//!
//! Exports arrive in whatever encoding the producing system used, often an
//! Arabic code page or UTF-8 with a byte-order mark. Decoding runs in three
//! steps:
//! 1. Byte-order mark, then statistical guess (chardetng), decoded strictly
//! 2. Ordered fallback list, each decoded strictly, first success wins
//! 3. `EncodingExhausted` when nothing decodes cleanly
//!
//! Strict decoding means an invalid byte sequence fails the candidate instead
//! of being replaced, so a wrong guess never yields silently garbled text.
//!
//! The note field additionally goes through [`repair_double_encoded`], a
//! best-effort repair for UTF-8 text that was stored as if it were single-byte.

use crate::config::DEFAULT_FALLBACK_ENCODINGS;
use crate::error::{IngestError, IngestResult};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use tracing::{debug, warn};

/// Label accepted for UTF-8 with an optional byte-order mark
pub const UTF8_SIG_LABEL: &str = "utf-8-sig";

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decoder candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// UTF-8, stripping a leading byte-order mark if present
    Utf8Sig,
    /// Any WHATWG encoding; only a matching UTF-16 byte-order mark is skipped
    Codec(&'static Encoding),
}

impl Candidate {
    /// Resolve a configuration label (`utf-8-sig`, `windows-1256`, `cp1256`, ...)
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        if normalized == UTF8_SIG_LABEL || normalized == "utf_8_sig" {
            return Some(Candidate::Utf8Sig);
        }
        Encoding::for_label(normalized.as_bytes()).map(Candidate::Codec)
    }

    /// Display name of the candidate
    pub fn name(&self) -> &'static str {
        match self {
            Candidate::Utf8Sig => "UTF-8-SIG",
            Candidate::Codec(encoding) => encoding.name(),
        }
    }

    /// Decode the whole buffer, `None` on any malformed sequence
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            Candidate::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                UTF_8.decode_without_bom_handling_and_without_replacement(body)
            }
            Candidate::Codec(encoding) => {
                let body = match Encoding::for_bom(bytes) {
                    Some((bom_encoding, bom_len))
                        if bom_encoding == *encoding && *encoding != UTF_8 =>
                    {
                        &bytes[bom_len..]
                    }
                    _ => bytes,
                };
                encoding.decode_without_bom_handling_and_without_replacement(body)
            }
        }
    }
}

/// Source of a best-guess encoding for a byte buffer
pub trait CharsetDetector: Send + Sync {
    /// Best guess, or `None` when the detector has no opinion
    fn guess(&self, bytes: &[u8]) -> Option<Candidate>;
}

/// Statistical detection backed by chardetng
///
/// A byte-order mark, when present, overrides the statistical guess.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChardetngDetector;

impl CharsetDetector for ChardetngDetector {
    fn guess(&self, bytes: &[u8]) -> Option<Candidate> {
        if bytes.is_empty() {
            return None;
        }

        if let Some((encoding, _)) = Encoding::for_bom(bytes) {
            if encoding == UTF_8 {
                return Some(Candidate::Utf8Sig);
            }
            return Some(Candidate::Codec(encoding));
        }

        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        Some(Candidate::Codec(detector.guess(None, true)))
    }
}

/// Successfully decoded text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// Candidate that decoded the buffer
    pub encoding: &'static str,
    /// Detector's guess, if any
    pub guessed: Option<&'static str>,
    /// True when the guess was absent or failed
    pub used_fallback: bool,
}

/// Encoding resolver
pub struct EncodingResolver {
    detector: Box<dyn CharsetDetector>,
    fallbacks: Vec<Candidate>,
}

impl EncodingResolver {
    /// Resolver with chardetng detection and the default fallback chain
    pub fn new() -> Self {
        Self::with_fallbacks(DEFAULT_FALLBACK_ENCODINGS)
    }

    /// Resolver with chardetng detection and a custom fallback chain
    ///
    /// Unknown labels are skipped with a warning.
    pub fn with_fallbacks<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut fallbacks = Vec::with_capacity(labels.len());
        for label in labels {
            match Candidate::from_label(label.as_ref()) {
                Some(candidate) => fallbacks.push(candidate),
                None => warn!(label = label.as_ref(), "Unknown fallback encoding label, skipping"),
            }
        }
        Self {
            detector: Box::new(ChardetngDetector),
            fallbacks,
        }
    }

    /// Replace the charset detector
    pub fn with_detector(mut self, detector: Box<dyn CharsetDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Fallback chain in trial order
    pub fn fallbacks(&self) -> &[Candidate] {
        &self.fallbacks
    }

    /// Decode a byte buffer
    ///
    /// Returns `EncodingExhausted` if neither the guess nor any fallback
    /// decodes the whole buffer without error.
    pub fn resolve(&self, bytes: &[u8]) -> IngestResult<DecodedText> {
        let guess = self.detector.guess(bytes);
        let mut attempted = Vec::new();

        if let Some(candidate) = guess {
            debug!(guess = candidate.name(), bytes = bytes.len(), "Charset detector guess");
            if let Some(text) = candidate.decode(bytes) {
                return Ok(DecodedText {
                    text: text.into_owned(),
                    encoding: candidate.name(),
                    guessed: Some(candidate.name()),
                    used_fallback: false,
                });
            }
            debug!(guess = candidate.name(), "Guessed encoding failed to decode");
            attempted.push(candidate.name().to_string());
        }

        for candidate in &self.fallbacks {
            if let Some(text) = candidate.decode(bytes) {
                debug!(encoding = candidate.name(), "Decoded with fallback encoding");
                return Ok(DecodedText {
                    text: text.into_owned(),
                    encoding: candidate.name(),
                    guessed: guess.map(|g| g.name()),
                    used_fallback: true,
                });
            }
            attempted.push(candidate.name().to_string());
        }

        warn!(attempted = attempted.len(), "No candidate encoding decoded the input");
        Err(IngestError::EncodingExhausted { attempted })
    }
}

impl Default for EncodingResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-effort repair of UTF-8 text that was decoded as single-byte
///
/// Each character is mapped back to the byte it most likely came from:
/// code points up to U+00FF become that byte, and the windows-1252 specials
/// (`€`, `ƒ`, `‰`, ...) become their 0x80-0x9F byte. Any other character is
/// kept as its own UTF-8 bytes. The result is then decoded as UTF-8 with
/// malformed sequences replaced by U+FFFD.
///
/// Text that was already correct Arabic or ASCII comes back unchanged. Text
/// holding genuine Latin-1 letters (e.g. `é`) picks up replacement
/// characters. Apply only to the note field.
pub fn repair_double_encoded(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }

    let mut bytes = Vec::with_capacity(text.len());
    let mut utf8_buf = [0u8; 4];

    for ch in text.chars() {
        let cp = ch as u32;
        if cp <= 0xFF {
            bytes.push(cp as u8);
        } else if let Some(byte) = windows_1252_special(ch) {
            bytes.push(byte);
        } else {
            bytes.extend_from_slice(ch.encode_utf8(&mut utf8_buf).as_bytes());
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

/// Byte in 0x80-0x9F that windows-1252 maps to `ch`, if any
fn windows_1252_special(ch: char) -> Option<u8> {
    let mut buf = [0u8; 4];
    let (encoded, _, unmappable) = WINDOWS_1252.encode(ch.encode_utf8(&mut buf));
    match (unmappable, encoded.as_ref()) {
        (false, [byte]) if (0x80..=0x9F).contains(byte) => Some(*byte),
        _ => None,
    }
}
