//! Character encoding of the fetched page.
//!
//! The encoding comes from a byte order mark, then the `Content-Type`
//! charset, then a `<meta>` declaration near the top of the document.
//! Undeclared pages are read as UTF-8 and fall back to windows-1252 when
//! they are not valid UTF-8.

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE, WINDOWS_1252, X_USER_DEFINED};

const PRESCAN_LIMIT: usize = 1024;

/// Value of the `charset=` parameter in a `Content-Type` header or a
/// `<meta>` tag, without quotes.
pub fn charset_param(value: &str) -> Option<&str> {
    let start = value.to_ascii_lowercase().find("charset=")? + "charset=".len();
    let rest = value[start..]
        .trim_start()
        .trim_start_matches(|c: char| c == '"' || c == '\'');
    let end = rest
        .find(|c: char| matches!(c, ';' | '"' | '\'' | '/' | '>') || c.is_ascii_whitespace())
        .unwrap_or(rest.len());
    let label = &rest[..end];
    (!label.is_empty()).then_some(label)
}

pub fn decode_document(body: &[u8], header_charset: Option<&str>) -> (String, &'static Encoding) {
    let declared = Encoding::for_bom(body)
        .map(|(encoding, _)| encoding)
        .or_else(|| header_charset.and_then(|label| Encoding::for_label(label.as_bytes())))
        .or_else(|| sniff_meta(body));

    if let Some(encoding) = declared {
        let (text, used, _) = encoding.decode(body);
        return (text.into_owned(), used);
    }

    match UTF_8.decode_without_bom_handling_and_without_replacement(body) {
        Some(text) => (text.into_owned(), UTF_8),
        None => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(body);
            (text.into_owned(), WINDOWS_1252)
        }
    }
}

fn sniff_meta(body: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&body[..body.len().min(PRESCAN_LIMIT)]).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(pos) = rest.find("<meta") {
        let tag = &rest[pos..];
        let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
        if let Some(encoding) =
            charset_param(tag).and_then(|label| Encoding::for_label(label.as_bytes()))
        {
            // A document cannot declare itself UTF-16 from inside its own bytes.
            return Some(if encoding == UTF_16BE || encoding == UTF_16LE {
                UTF_8
            } else if encoding == X_USER_DEFINED {
                WINDOWS_1252
            } else {
                encoding
            });
        }
        rest = &rest[pos + "<meta".len()..];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const LATIN1_LABEL: &[u8] = b"<a href=\"/r\"><p>R\xe9sultats (R18)</p></a>";

    #[test]
    fn charset_param_reads_header_and_meta_forms() {
        assert_eq!(charset_param("text/html; charset=ISO-8859-1"), Some("ISO-8859-1"));
        assert_eq!(charset_param("text/html;charset=\"utf-8\""), Some("utf-8"));
        assert_eq!(charset_param(r#"<meta charset="windows-1252">"#), Some("windows-1252"));
        assert_eq!(charset_param("text/html"), None);
        assert_eq!(charset_param("text/html; charset="), None);
    }

    #[test]
    fn header_charset_decodes_latin1() {
        let (text, encoding) = decode_document(LATIN1_LABEL, Some("ISO-8859-1"));
        assert_eq!(encoding, WINDOWS_1252);
        assert!(text.contains("Résultats (R18)"));
    }

    #[test]
    fn meta_charset_is_used_without_header() {
        let mut body = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=iso-8859-1\"></head><body>".to_vec();
        body.extend_from_slice(LATIN1_LABEL);
        let (text, encoding) = decode_document(&body, None);
        assert_eq!(encoding, WINDOWS_1252);
        assert!(text.contains("Résultats"));
    }

    #[test]
    fn header_wins_over_meta() {
        let body = "<meta charset=\"iso-8859-1\"><p>Résultats</p>".as_bytes();
        let (text, encoding) = decode_document(body, Some("utf-8"));
        assert_eq!(encoding, UTF_8);
        assert!(text.contains("Résultats"));
    }

    #[test]
    fn byte_order_mark_wins_over_header() {
        let body = b"\xef\xbb\xbf<p>ok</p>";
        let (text, encoding) = decode_document(body, Some("iso-8859-1"));
        assert_eq!(encoding, UTF_8);
        assert_eq!(text, "<p>ok</p>");
    }

    #[test]
    fn undeclared_pages_fall_back_from_utf8() {
        let (text, encoding) = decode_document("<p>Résultats</p>".as_bytes(), None);
        assert_eq!((text.as_str(), encoding), ("<p>Résultats</p>", UTF_8));

        let (text, encoding) = decode_document(LATIN1_LABEL, None);
        assert_eq!(encoding, WINDOWS_1252);
        assert!(text.contains("Résultats"));
    }

    #[test]
    fn meta_utf16_means_utf8() {
        let (_, encoding) = decode_document(b"<meta charset=\"utf-16\"><p>x</p>", None);
        assert_eq!(encoding, UTF_8);
    }
}
