//! Encoding fallback.

use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{IngestError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decoded text plus the name of the encoding that succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static str,
}

/// Decode `bytes` with the first encoding in `labels` that accepts them.
///
/// A UTF-8 byte-order mark is skipped. Decoding never substitutes
/// replacement characters: an encoding either maps every byte or is
/// skipped. Unknown labels are treated as a failed attempt.
pub fn decode_with_fallback(path: &Path, bytes: &[u8], labels: &[String]) -> Result<Decoded> {
    for label in labels {
        let Some(encoding) = Encoding::for_label(label.trim().as_bytes()) else {
            tracing::warn!(path = %path.display(), label = %label, "unknown encoding label");
            continue;
        };
        let input = if encoding == UTF_8 {
            bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
        } else {
            bytes
        };
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(input) {
            tracing::debug!(path = %path.display(), encoding = encoding.name(), "decoded source");
            return Ok(Decoded {
                text: text.into_owned(),
                encoding: encoding.name(),
            });
        }
        tracing::debug!(path = %path.display(), encoding = encoding.name(), "decode attempt failed");
    }
    Err(IngestError::UnsupportedEncoding {
        path: path.to_path_buf(),
        attempted: labels.join(", "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let decoded =
            decode_with_fallback(Path::new("a.csv"), b"\xEF\xBB\xBFname\n", &labels(&["utf-8"]))
                .unwrap();
        assert_eq!(decoded.text, "name\n");
        assert_eq!(decoded.encoding, "UTF-8");
    }

    #[test]
    fn falls_back_to_single_byte_encoding() {
        // 0xF4 is "ô" in windows-1252 and invalid on its own in UTF-8.
        let decoded = decode_with_fallback(
            Path::new("a.csv"),
            b"C\xF4te d'Ivoire",
            &labels(&["utf-8", "windows-1252"]),
        )
        .unwrap();
        assert_eq!(decoded.text, "Côte d'Ivoire");
        assert_eq!(decoded.encoding, "windows-1252");
    }

    #[test]
    fn fails_when_every_encoding_fails() {
        let err = decode_with_fallback(Path::new("a.csv"), b"\xFF\xFE", &labels(&["utf-8", "klingon"]))
            .unwrap_err();
        match err {
            IngestError::UnsupportedEncoding { attempted, .. } => {
                assert_eq!(attempted, "utf-8, klingon");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
