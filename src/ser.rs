//! Writing maps out as JSON.
//!
//! Every function here runs serde_json's compact serializer with an
//! [`HtmlFormatter`], so keys are written in the map's iteration order and
//! `<`, `>` and `&` in any string, at any depth, are escaped or not according
//! to a single flag for the whole document.

use crate::error::{Error, Result};
use crate::finite;
use crate::ordered_map::OrderedMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io;
use tracing::{debug, trace};

/// A compact [`serde_json::ser::Formatter`] which can additionally escape the
/// characters that are unsafe to embed in HTML.
///
/// With escaping on, `<`, `>` and `&` are written as `\u003c`, `\u003e` and
/// `\u0026`. Quotes, backslashes and control characters are escaped by
/// serde_json regardless.
#[derive(Clone, Copy, Debug)]
pub struct HtmlFormatter {
    escape_html: bool,
}

impl HtmlFormatter {
    pub fn new(escape_html: bool) -> Self {
        Self { escape_html }
    }

    pub fn escape_html(&self) -> bool {
        self.escape_html
    }
}

impl Default for HtmlFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl serde_json::ser::Formatter for HtmlFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !self.escape_html {
            return writer.write_all(fragment.as_bytes());
        }

        // the escaped characters are all ASCII, so splitting on their byte
        // offsets never cuts a multi-byte character in half
        let bytes = fragment.as_bytes();
        let mut start = 0;

        for (i, byte) in bytes.iter().enumerate() {
            let escape: &[u8] = match byte {
                b'<' => b"\\u003c",
                b'>' => b"\\u003e",
                b'&' => b"\\u0026",
                _ => continue,
            };

            if start < i {
                writer.write_all(&bytes[start..i])?;
            }
            writer.write_all(escape)?;
            start = i + 1;
        }

        if start < bytes.len() {
            writer.write_all(&bytes[start..])?;
        }

        Ok(())
    }
}

/// Writes the entries in iteration order. This impl knows nothing of the
/// map's escape flag; plain serde serializers write strings however they
/// normally do. Use [`encode`] to honour the flag.
impl<K, V, S> Serialize for OrderedMap<K, V, S>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<Ser>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

fn encode_error(e: serde_json::Error) -> Error {
    debug!(error = %e, "failed to encode JSON");
    Error::Encode(e)
}

/// Serializes any value as compact JSON into `writer`.
///
/// A NaN or infinite float anywhere in `value` is an encode error, and is
/// caught before anything is written.
pub fn to_writer<W, T>(writer: W, value: &T, escape_html: bool) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    finite::check(value).map_err(encode_error)?;

    let mut serializer =
        serde_json::Serializer::with_formatter(writer, HtmlFormatter::new(escape_html));
    value.serialize(&mut serializer).map_err(encode_error)
}

pub fn to_vec<T>(value: &T, escape_html: bool) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::with_capacity(128);
    to_writer(&mut buf, value, escape_html)?;
    Ok(buf)
}

pub fn to_string<T>(value: &T, escape_html: bool) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let buf = to_vec(value, escape_html)?;
    String::from_utf8(buf).map_err(|e| encode_error(serde::ser::Error::custom(e)))
}

/// Encodes `map` as a JSON object, members in iteration order, escaping HTML
/// characters according to the map's own flag. Nested maps are written with
/// that same flag.
///
/// ```
/// use jsonmap::{JsonMap, Value};
///
/// let mut map = JsonMap::new();
/// map.insert("range".to_owned(), Value::from(">1.0.0 && <2.0.0"));
///
/// assert_eq!(
///     r#"{"range":"\u003e1.0.0 \u0026\u0026 \u003c2.0.0"}"#,
///     jsonmap::encode_to_string(&map).unwrap()
/// );
///
/// map.set_escape_html(false);
/// assert_eq!(
///     r#"{"range":">1.0.0 && <2.0.0"}"#,
///     jsonmap::encode_to_string(&map).unwrap()
/// );
/// ```
pub fn encode<K, V, S>(map: &OrderedMap<K, V, S>) -> Result<Vec<u8>>
where
    K: Serialize,
    V: Serialize,
{
    trace!(len = map.len(), escape_html = map.escape_html(), "encoding map");
    to_vec(map, map.escape_html())
}

pub fn encode_to_string<K, V, S>(map: &OrderedMap<K, V, S>) -> Result<String>
where
    K: Serialize,
    V: Serialize,
{
    trace!(len = map.len(), escape_html = map.escape_html(), "encoding map");
    to_string(map, map.escape_html())
}

/// Like [`encode`], but streams into `writer`. On error, whatever was
/// already written must be thrown away.
pub fn encode_to_writer<W, K, V, S>(writer: W, map: &OrderedMap<K, V, S>) -> Result<()>
where
    W: io::Write,
    K: Serialize,
    V: Serialize,
{
    trace!(len = map.len(), escape_html = map.escape_html(), "encoding map");
    to_writer(writer, map, map.escape_html())
}

#[cfg(test)]
mod tests {
    use super::{encode, to_string, HtmlFormatter};
    use crate::{JsonMap, OrderedMap, Value};
    use serde::Serialize;

    fn escaped(s: &str) -> String {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, HtmlFormatter::default());
        s.serialize(&mut ser).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_formatter_escapes_only_html_characters() {
        assert_eq!(r#""\u003ca\u003e""#, escaped("<a>"));
        assert_eq!(r#""\u0026\u0026""#, escaped("&&"));
        assert_eq!(r#""plain""#, escaped("plain"));
        assert_eq!(r#""""#, escaped(""));
        // serde_json's own escapes still apply around ours
        assert_eq!(r#""\"\u003c\\""#, escaped("\"<\\"));
        assert_eq!(r#""é\u0026ü""#, escaped("é&ü"));
    }

    #[test]
    fn test_empty_map_encodes_to_braces() {
        let map = JsonMap::new();
        assert_eq!(b"{}".to_vec(), encode(&map).unwrap());
    }

    #[test]
    fn test_keys_are_escaped_too() {
        let mut map = OrderedMap::new();
        map.insert("<k>", 1);

        assert_eq!(r#"{"\u003ck\u003e":1}"#, to_string(&map, true).unwrap());
        assert_eq!(r#"{"<k>":1}"#, to_string(&map, false).unwrap());
    }

    #[test]
    fn test_outer_flag_covers_nested_maps() {
        let mut inner = JsonMap::new();
        inner.insert("op".to_owned(), Value::from(">="));
        assert!(inner.escape_html());

        let mut outer = JsonMap::new();
        outer.set_escape_html(false);
        outer.insert(
            "list".to_owned(),
            Value::from(vec![Value::from(inner.clone()), Value::from("&")]),
        );

        assert_eq!(
            br#"{"list":[{"op":">="},"&"]}"#.to_vec(),
            encode(&outer).unwrap()
        );
        assert_eq!(br#"{"op":"\u003e="}"#.to_vec(), encode(&inner).unwrap());
    }

    #[test]
    fn test_non_finite_float_is_encode_error() {
        let mut map = OrderedMap::new();
        map.insert("x".to_owned(), 1.0);
        map.insert("y".to_owned(), f64::NAN);

        let err = encode(&map).unwrap_err();
        assert!(err.is_encode());

        // nothing reaches the writer
        let mut buf = Vec::new();
        map.insert("y".to_owned(), f64::INFINITY);
        assert!(super::encode_to_writer(&mut buf, &map).is_err());
        assert!(buf.is_empty());

        map.insert("y".to_owned(), 2.0);
        assert_eq!(r#"{"x":1.0,"y":2.0}"#, to_string(&map, true).unwrap());
    }

    #[test]
    fn test_non_string_key_is_encode_error() {
        let mut map = OrderedMap::new();
        map.insert(vec![1u8, 2], "v");

        let err = encode(&map).unwrap_err();
        assert!(err.is_encode());
    }
}
