//! Character encoding detection for fetched markup
//!
//! Saved documents are always UTF-8. The source encoding comes from the
//! first of:
//! - a byte order mark
//! - the `charset` parameter of the Content-Type header
//! - a declaration in the first 1024 bytes (`<meta charset>`, a
//!   `<meta http-equiv>` content value, or the XML declaration)
//!
//! Undeclared bytes that are not valid UTF-8 are read as windows-1252.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

const PRESCAN_LIMIT: usize = 1024;

/// Decodes a response body to text
pub(crate) fn decode(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect(bytes, content_type);
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!("Malformed {} input replaced while decoding", used.name());
    }
    text.into_owned()
}

/// Picks the encoding a body is written in
pub(crate) fn detect(bytes: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    if let Some(encoding) = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }

    // An in-document UTF-16 declaration cannot be true of ASCII-readable bytes
    if let Some(encoding) = prescan(bytes).and_then(|label| Encoding::for_label(label.as_bytes())) {
        return if encoding == UTF_16LE || encoding == UTF_16BE {
            UTF_8
        } else {
            encoding
        };
    }

    if std::str::from_utf8(bytes).is_ok() {
        UTF_8
    } else {
        WINDOWS_1252
    }
}

/// Returns the `charset` parameter of a media type
pub(crate) fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
            .filter(|value| !value.is_empty())
    })
}

pub(crate) fn is_utf8_label(label: &str) -> bool {
    Encoding::for_label(label.trim().as_bytes()) == Some(UTF_8)
}

/// Rewrites the `encoding` of an XML declaration body to UTF-8
///
/// `decl` is the text between `<?` and `?>`.
pub(crate) fn declare_utf8_xml(decl: &str) -> String {
    let Some(start) = decl.find("encoding") else {
        return decl.to_owned();
    };
    let rest = &decl[start + "encoding".len()..];
    let Some(eq) = rest.find('=') else {
        return decl.to_owned();
    };
    let after_eq = rest[eq + 1..].trim_start();
    let Some(quote) = after_eq.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return decl.to_owned();
    };
    let Some(len) = after_eq[1..].find(quote) else {
        return decl.to_owned();
    };
    if is_utf8_label(&after_eq[1..1 + len]) {
        return decl.to_owned();
    }

    let value_start = decl.len() - after_eq.len() + 1;
    format!(
        "{}UTF-8{}",
        &decl[..value_start],
        &decl[value_start + len..]
    )
}

/// Looks for an encoding declaration near the start of the body
fn prescan(bytes: &[u8]) -> Option<String> {
    let head = bytes[..bytes.len().min(PRESCAN_LIMIT)].to_ascii_lowercase();

    if head.starts_with(b"<?xml") {
        let end = find(&head, b"?>", 0).unwrap_or(head.len());
        if let Some(label) = value_after(&head[..end], b"encoding") {
            return Some(label);
        }
    }

    let mut from = 0;
    while let Some(start) = find(&head, b"<meta", from) {
        let end = find(&head, b">", start).unwrap_or(head.len());
        if let Some(label) = value_after(&head[start..end], b"charset") {
            return Some(label);
        }
        from = end;
    }

    None
}

/// Reads the value following `key=` inside a tag, quoted or not
fn value_after(tag: &[u8], key: &[u8]) -> Option<String> {
    let mut from = 0;
    while let Some(at) = find(tag, key, from) {
        from = at + key.len();
        let rest = skip_spaces(&tag[from..]);
        let Some(rest) = rest.strip_prefix(b"=") else {
            continue;
        };
        let rest = skip_spaces(rest);

        let value = match rest.first() {
            Some(&quote @ (b'"' | b'\'')) => {
                let inner = &rest[1..];
                let len = inner.iter().position(|b| *b == quote)?;
                &inner[..len]
            }
            _ => {
                let len = rest
                    .iter()
                    .position(|b| b.is_ascii_whitespace() || matches!(b, b';' | b'"' | b'\'' | b'>' | b'/'))
                    .unwrap_or(rest.len());
                &rest[..len]
            }
        };

        if !value.is_empty() {
            return Some(String::from_utf8_lossy(value).trim().to_owned());
        }
    }
    None
}

fn skip_spaces(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{ISO_8859_2, SHIFT_JIS};

    #[test]
    fn test_content_type_charset_wins_over_meta() {
        let body = b"<meta charset=\"shift_jis\"><p>x</p>";
        assert_eq!(detect(body, Some("text/html; charset=ISO-8859-2")), ISO_8859_2);
        assert_eq!(detect(body, Some("text/html")), SHIFT_JIS);
    }

    #[test]
    fn test_meta_charset_forms() {
        assert_eq!(detect(b"<meta charset=iso-8859-1>", None), WINDOWS_1252);
        assert_eq!(
            detect(
                br#"<head><meta http-equiv="Content-Type" content="text/html; charset=Shift_JIS"></head>"#,
                None
            ),
            SHIFT_JIS
        );
        assert_eq!(detect(br#"<meta charset="utf-16">"#, None), UTF_8);
    }

    #[test]
    fn test_xml_declaration() {
        let body = br#"<?xml version="1.0" encoding="ISO-8859-2"?><root/>"#;
        assert_eq!(detect(body, None), ISO_8859_2);
    }

    #[test]
    fn test_bom_and_fallbacks() {
        assert_eq!(detect(b"\xef\xbb\xbf<p>x</p>", Some("text/html; charset=latin1")), UTF_8);
        assert_eq!(detect("<p>café</p>".as_bytes(), None), UTF_8);
        assert_eq!(detect(b"<p>caf\xe9</p>", None), WINDOWS_1252);
    }

    #[test]
    fn test_decode_latin1() {
        let text = decode(b"<meta charset=\"iso-8859-1\"><p>caf\xe9</p>", None);
        assert!(text.contains("café"));
    }

    #[test]
    fn test_charset_param() {
        assert_eq!(charset_param("text/html; charset=\"UTF-8\""), Some("UTF-8"));
        assert_eq!(charset_param("text/html;CHARSET=latin1 "), Some("latin1"));
        assert_eq!(charset_param("text/html"), None);
        assert_eq!(charset_param("text/html; charset="), None);
    }

    #[test]
    fn test_declare_utf8_xml() {
        assert_eq!(
            declare_utf8_xml(r#"xml version="1.0" encoding="ISO-8859-1""#),
            r#"xml version="1.0" encoding="UTF-8""#
        );
        assert_eq!(
            declare_utf8_xml("xml version='1.0' encoding='latin1' standalone='yes'"),
            "xml version='1.0' encoding='UTF-8' standalone='yes'"
        );
        assert_eq!(declare_utf8_xml(r#"xml version="1.0""#), r#"xml version="1.0""#);
        assert_eq!(
            declare_utf8_xml(r#"xml version="1.0" encoding="utf-8""#),
            r#"xml version="1.0" encoding="utf-8""#
        );
    }
}
