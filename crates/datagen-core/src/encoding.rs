use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::document::FieldValue;
use crate::error::{Error, Result};

/// Encoding applied to every generated text value before it is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "base64")]
    Base64,
    #[serde(rename = "ascii")]
    Ascii,
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
}

impl TextEncoding {
    pub const ALL: [TextEncoding; 4] = [
        TextEncoding::Html,
        TextEncoding::Base64,
        TextEncoding::Ascii,
        TextEncoding::Utf8,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Html => "html",
            TextEncoding::Base64 => "base64",
            TextEncoding::Ascii => "ascii",
            TextEncoding::Utf8 => "utf-8",
        }
    }

    /// Encode a field value; lists are encoded item by item and references pass through.
    pub fn encode(&self, value: FieldValue) -> Result<FieldValue> {
        match value {
            FieldValue::Text(text) => Ok(FieldValue::Text(self.encode_text(&text)?)),
            FieldValue::List(items) => items
                .iter()
                .map(|item| self.encode_text(item))
                .collect::<Result<Vec<_>>>()
                .map(FieldValue::List),
            FieldValue::Reference(reference) => Ok(FieldValue::Reference(reference)),
        }
    }

    pub fn encode_text(&self, value: &str) -> Result<String> {
        match self {
            TextEncoding::Html => Ok(encode_html(value)),
            TextEncoding::Base64 => {
                ensure_ascii(self.as_str(), value)?;
                Ok(STANDARD.encode(value.as_bytes()))
            }
            TextEncoding::Ascii => {
                ensure_ascii(self.as_str(), value)?;
                Ok(value.to_string())
            }
            TextEncoding::Utf8 => Ok(value.to_string()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "html" => Ok(TextEncoding::Html),
            "base64" => Ok(TextEncoding::Base64),
            "ascii" => Ok(TextEncoding::Ascii),
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            other => Err(Error::Encoding {
                mode: "unknown",
                message: format!("unsupported encoding '{other}'"),
            }),
        }
    }
}

fn ensure_ascii(mode: &'static str, value: &str) -> Result<()> {
    match value.char_indices().find(|(_, ch)| !ch.is_ascii()) {
        None => Ok(()),
        Some((position, ch)) => Err(Error::Encoding {
            mode,
            message: format!(
                "non-ascii character {ch:?} (U+{:04X}) at byte {position}",
                ch as u32
            ),
        }),
    }
}

/// Escape markup, turn paragraph breaks into `</p>` and tab runs into `<p>`,
/// then emit non-ASCII characters as numeric character references.
fn encode_html(value: &str) -> String {
    let escaped = value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    let marked = escaped.replace("\n\n", "</p>");

    let mut output = String::with_capacity(marked.len());
    let mut in_tabs = false;
    for ch in marked.chars() {
        if ch == '\t' {
            if !in_tabs {
                output.push_str("<p>");
            }
            in_tabs = true;
            continue;
        }
        in_tabs = false;
        if ch.is_ascii() {
            output.push(ch);
        } else {
            output.push_str(&format!("&#{};", ch as u32));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_marks_paragraphs_and_escapes() {
        let encoded = TextEncoding::Html
            .encode_text("\tFish & <chips>. \n\n\t\tCafé.\n\n")
            .expect("html encoding");
        assert_eq!(encoded, "<p>Fish &amp; &lt;chips&gt;. </p><p>Caf&#233;.</p>");
    }

    #[test]
    fn base64_encodes_ascii_bytes() {
        let encoded = TextEncoding::Base64
            .encode_text("hello world")
            .expect("base64 encoding");
        assert_eq!(encoded, "aGVsbG8gd29ybGQ=");
    }

    #[test]
    fn ascii_rejects_non_ascii() {
        let result = TextEncoding::Ascii.encode_text("naïve");
        assert!(matches!(result, Err(Error::Encoding { mode: "ascii", .. })));
    }

    #[test]
    fn utf8_is_identity() {
        let text = "Zoë paid €5 for a crêpe";
        let encoded = TextEncoding::Utf8.encode_text(text).expect("utf-8 encoding");
        assert_eq!(encoded, text);
    }

    #[test]
    fn parses_cli_names() {
        for encoding in TextEncoding::ALL {
            let parsed: TextEncoding = encoding.as_str().parse().expect("parse encoding");
            assert_eq!(parsed, encoding);
        }
        assert!("latin-1".parse::<TextEncoding>().is_err());
    }
}
