//! Text encodings for document contents
//!
//! Documents are stored as bytes in the file set and decoded to text before
//! parsing. Besides the common character sets this accepts the binary-to-text
//! forms `hex` and `base64`, where the document text is the hex/base64 view of
//! the stored bytes.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ExpandError;

/// Encoding used to turn stored bytes into document text and back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// One byte per code point, U+0000 to U+00FF (`latin1`, `binary`)
    Latin1,
    Ascii,
    Utf16Le,
    Hex,
    Base64,
    /// Any other WHATWG label understood by `encoding_rs`
    Labeled(&'static encoding_rs::Encoding),
}

impl TextEncoding {
    /// Decode stored bytes, `None` when they are invalid for this encoding
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Ascii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Utf16Le => encoding_rs::UTF_16LE
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
            TextEncoding::Hex => Some(hex::encode(bytes)),
            TextEncoding::Base64 => Some(STANDARD.encode(bytes)),
            TextEncoding::Labeled(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
        }
    }

    /// Encode document text, `None` when it cannot be represented
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Some(text.as_bytes().to_vec()),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).ok())
                .collect(),
            TextEncoding::Ascii => text.is_ascii().then(|| text.as_bytes().to_vec()),
            TextEncoding::Utf16Le => Some(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            TextEncoding::Hex => hex::decode(text.trim()).ok(),
            TextEncoding::Base64 => STANDARD.decode(text.trim()).ok(),
            TextEncoding::Labeled(encoding) => {
                let (bytes, _, had_errors) = encoding.encode(text);
                (!had_errors).then(|| bytes.into_owned())
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf8",
            TextEncoding::Latin1 => "latin1",
            TextEncoding::Ascii => "ascii",
            TextEncoding::Utf16Le => "utf16le",
            TextEncoding::Hex => "hex",
            TextEncoding::Base64 => "base64",
            TextEncoding::Labeled(encoding) => encoding.name(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = ExpandError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let normalized = label.trim().to_ascii_lowercase();
        let encoding = match normalized.as_str() {
            "utf8" | "utf-8" => TextEncoding::Utf8,
            "latin1" | "binary" => TextEncoding::Latin1,
            "ascii" => TextEncoding::Ascii,
            "ucs2" | "ucs-2" | "utf16le" | "utf-16le" => TextEncoding::Utf16Le,
            "hex" => TextEncoding::Hex,
            "base64" => TextEncoding::Base64,
            other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
                Some(encoding) if encoding == encoding_rs::UTF_8 => TextEncoding::Utf8,
                Some(encoding) if encoding == encoding_rs::UTF_16LE => TextEncoding::Utf16Le,
                // UTF-16BE and the replacement encoding cannot be written back
                Some(encoding) if encoding.output_encoding() == encoding => TextEncoding::Labeled(encoding),
                _ => {
                    return Err(ExpandError::Configuration(format!(
                        "unsupported encoding '{}'",
                        label
                    )));
                }
            },
        };
        Ok(encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!("utf8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("UTF-8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("binary".parse::<TextEncoding>().unwrap(), TextEncoding::Latin1);
        assert_eq!("hex".parse::<TextEncoding>().unwrap(), TextEncoding::Hex);
        assert_eq!(
            "shift_jis".parse::<TextEncoding>().unwrap(),
            TextEncoding::Labeled(encoding_rs::SHIFT_JIS)
        );
        assert!("klingon".parse::<TextEncoding>().is_err());
        assert!("utf-16be".parse::<TextEncoding>().is_err());
    }

    #[test]
    fn test_utf8_rejects_invalid_bytes() {
        assert_eq!(TextEncoding::Utf8.decode(b"<p>ok</p>").as_deref(), Some("<p>ok</p>"));
        assert!(TextEncoding::Utf8.decode(&[0xff, 0xfe, 0x3c]).is_none());
    }

    #[test]
    fn test_latin1() {
        let text = TextEncoding::Latin1.decode(&[0x63, 0x61, 0x66, 0xe9]).unwrap();
        assert_eq!(text, "café");
        assert_eq!(TextEncoding::Latin1.encode(&text).unwrap(), vec![0x63, 0x61, 0x66, 0xe9]);
        assert!(TextEncoding::Latin1.encode("→").is_none());
    }

    #[test]
    fn test_hex_views_bytes_as_text() {
        assert_eq!(TextEncoding::Hex.decode(b"abc").as_deref(), Some("616263"));
        assert_eq!(TextEncoding::Hex.encode("616263").unwrap(), b"abc".to_vec());
        assert!(TextEncoding::Hex.encode("<p>").is_none());
    }

    #[test]
    fn test_utf16le() {
        let bytes = TextEncoding::Utf16Le.encode("<a>").unwrap();
        assert_eq!(bytes, vec![0x3c, 0, 0x61, 0, 0x3e, 0]);
        assert_eq!(TextEncoding::Utf16Le.decode(&bytes).as_deref(), Some("<a>"));
    }

    #[test]
    fn test_labeled_encoding_round_trip() {
        let encoding: TextEncoding = "windows-1252".parse().unwrap();
        let bytes = encoding.encode("naïve").unwrap();
        assert_eq!(encoding.decode(&bytes).as_deref(), Some("naïve"));
    }
}
