// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Render the embedded HTTP document array as C++ source.
// Author: Lukas Bower

use crate::ir::OutputConfig;
use std::fmt::Write as _;

/// Marker emitted in place of the fallback entry's absent path.
const NULL_MARKER: &str = "NULL";

/// One line of the generated array, borrowed from the manifest entry and
/// the bytes read for it.
#[derive(Debug)]
pub struct DocumentRecord<'a> {
    pub path: Option<&'a str>,
    pub content: &'a [u8],
    pub content_type: &'a str,
}

/// Quote a byte sequence as a C++ string literal. Printable ASCII outside
/// `"`, `\` and `?` passes through; every other byte becomes a three-digit
/// octal escape. The escape is always three digits so a literal digit
/// following it cannot extend the escape.
pub fn quote(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() + 2);
    output.push('"');
    for &byte in bytes {
        if is_plain(byte) {
            output.push(char::from(byte));
        } else {
            output.push('\\');
            output.push(char::from(b'0' + (byte >> 6)));
            output.push(char::from(b'0' + ((byte >> 3) & 7)));
            output.push(char::from(b'0' + (byte & 7)));
        }
    }
    output.push('"');
    output
}

fn is_plain(byte: u8) -> bool {
    (b' '..=b'~').contains(&byte) && byte != b'"' && byte != b'\\' && byte != b'?'
}

/// Quote an optional request path; the fallback entry renders as `NULL`.
pub fn quote_path(path: Option<&str>) -> String {
    match path {
        Some(path) => quote(path.as_bytes()),
        None => NULL_MARKER.to_owned(),
    }
}

/// Render the complete generated source: preamble, one record per document
/// in manifest order, closing terminator. The length field is the exact
/// byte count read for the document, independent of escaping.
pub fn render_source(output: &OutputConfig, records: &[DocumentRecord<'_>]) -> String {
    let mut contents = String::new();
    writeln!(contents, "/*").ok();
    writeln!(contents, " * HTTP Document data.").ok();
    writeln!(contents, " * Automatically generated by httpdocc.").ok();
    writeln!(contents, " */").ok();
    writeln!(contents).ok();
    writeln!(contents, "#include \"{}\"", output.include).ok();
    writeln!(contents).ok();
    writeln!(contents, "{} = {{", output.declaration).ok();
    for record in records {
        writeln!(
            contents,
            "{{ {}, {}, {}, {} }},",
            quote_path(record.path),
            quote(record.content),
            quote(record.content_type.as_bytes()),
            record.content.len()
        )
        .ok();
    }
    writeln!(contents, "}};").ok();
    contents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_printable_bytes_literally() {
        assert_eq!(quote(b"A"), "\"A\"");
        assert_eq!(quote(b"hello world ~"), "\"hello world ~\"");
    }

    #[test]
    fn quotes_empty_input() {
        assert_eq!(quote(b""), "\"\"");
    }

    #[test]
    fn escapes_reserved_and_unprintable_bytes() {
        assert_eq!(quote(b"\""), "\"\\042\"");
        assert_eq!(quote(b"\\"), "\"\\134\"");
        assert_eq!(quote(b"?"), "\"\\077\"");
        assert_eq!(quote(&[0x00]), "\"\\000\"");
        assert_eq!(quote(&[0x0a]), "\"\\012\"");
        assert_eq!(quote(&[0xff]), "\"\\377\"");
    }

    #[test]
    fn octal_escape_keeps_three_digits_before_literal_digits() {
        // A newline followed by '1' must read back as 0x0a then '1',
        // never as the two-byte escape \0121.
        assert_eq!(quote(&[0x0a, b'1']), "\"\\0121\"");
        assert_eq!(decode(&quote(&[0x0a, b'1'])), vec![0x0a, b'1']);
    }

    #[test]
    fn quoting_round_trips_every_byte_value() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        assert_eq!(decode(&quote(&bytes)), bytes);
    }

    #[test]
    fn fallback_path_renders_null_marker() {
        assert_eq!(quote_path(None), "NULL");
        assert_eq!(quote_path(Some("/")), "\"/\"");
    }

    #[test]
    fn renders_records_in_order_with_terminator() {
        let output = OutputConfig::default();
        let records = vec![
            DocumentRecord {
                path: Some("/"),
                content: b"hi",
                content_type: "text/html",
            },
            DocumentRecord {
                path: None,
                content: b"no",
                content_type: "text/html",
            },
        ];
        let source = render_source(&output, &records);
        assert!(source.starts_with("/*\n * HTTP Document data.\n"));
        assert!(source.contains("#include \"netserver.h\"\n"));
        assert!(source.contains("NetServer::HTTPDocument NetServer::httpDocumentList[] = {\n"));
        let records: Vec<&str> = source
            .lines()
            .filter(|line| line.starts_with("{ "))
            .collect();
        assert_eq!(
            records,
            vec![
                "{ \"/\", \"hi\", \"text/html\", 2 },",
                "{ NULL, \"no\", \"text/html\", 2 },",
            ]
        );
        assert!(source.ends_with("};\n"));
    }

    /// Undo `quote`: strip the wrapping quotes, then fold three-digit octal
    /// escapes and literal characters back into bytes.
    fn decode(quoted: &str) -> Vec<u8> {
        let inner = quoted
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .expect("quoted literal");
        let mut bytes = Vec::new();
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                let digits: String = (0..3).map(|_| chars.next().expect("octal digit")).collect();
                bytes.push(u8::from_str_radix(&digits, 8).expect("octal escape"));
            } else {
                bytes.push(u8::try_from(c).expect("ascii literal"));
            }
        }
        bytes
    }
}
