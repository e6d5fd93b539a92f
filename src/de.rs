//! Reading JSON objects into maps.
//!
//! Members are inserted in the order they appear in the document. When a
//! key appears more than once its position is that of its first appearance
//! while its value is that of its last, which falls out of [`OrderedMap::insert`]
//! keeping existing keys in place.

use crate::error::{Error, Result};
use crate::ordered_map::OrderedMap;
use crate::value::{JsonMap, Value};
use serde::de::{Deserialize, DeserializeOwned, Deserializer, MapAccess, Visitor};
use std::{
    fmt,
    hash::{BuildHasher, Hash},
    io,
    marker::PhantomData,
};
use tracing::{debug, trace};

impl<'de, K, V, S> Deserialize<'de> for OrderedMap<K, V, S>
where
    K: Deserialize<'de> + Eq + Hash + Clone,
    V: Deserialize<'de>,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MapVisitor<K, V, S>(PhantomData<OrderedMap<K, V, S>>);

        impl<'de, K, V, S> Visitor<'de> for MapVisitor<K, V, S>
        where
            K: Deserialize<'de> + Eq + Hash + Clone,
            V: Deserialize<'de>,
            S: BuildHasher + Default,
        {
            type Value = OrderedMap<K, V, S>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_unit<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(OrderedMap::default())
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                // size hints come from the input, so don't trust them with
                // an unbounded allocation
                let capacity = access.size_hint().unwrap_or(0).min(4096);
                let mut map = OrderedMap::with_capacity_and_hasher(capacity, S::default());

                while let Some((key, value)) = access.next_entry()? {
                    map.insert(key, value);
                }

                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor(PhantomData))
    }
}

fn parse_error(e: serde_json::Error) -> Error {
    debug!(error = %e, line = e.line(), column = e.column(), "failed to parse JSON");
    Error::Parse(e)
}

/// Deserializes any type from JSON bytes. Trailing characters other than
/// whitespace are an error.
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(bytes).map_err(parse_error)
}

pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(s).map_err(parse_error)
}

pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    serde_json::from_reader(reader).map_err(parse_error)
}

/// Decodes a JSON object into a fresh [`JsonMap`] whose keys, and the keys
/// of every nested object, are in document order.
///
/// Anything other than a single well-formed object is a parse error, and
/// nothing of a partially read document is ever returned.
///
/// ```
/// let map = jsonmap::decode(br#"{"a":1,"c":3,"b":2}"#).unwrap();
/// assert_eq!(vec!["a", "c", "b"], map.keys().collect::<Vec<_>>());
/// ```
pub fn decode(bytes: &[u8]) -> Result<JsonMap> {
    trace!(len = bytes.len(), "decoding JSON object");
    let map: JsonMap = from_slice(bytes)?;
    trace!(members = map.len(), "decoded JSON object");
    Ok(map)
}

pub fn decode_str(s: &str) -> Result<JsonMap> {
    decode(s.as_bytes())
}

/// Decodes a JSON object and inserts its members into `map` in document
/// order. Keys already in `map` keep their position and take the decoded
/// value; `map`'s escape flag is left as it was.
///
/// The document is fully parsed before `map` is touched, so on error `map`
/// is unchanged.
pub fn decode_into<S>(map: &mut OrderedMap<String, Value, S>, bytes: &[u8]) -> Result<()>
where
    S: BuildHasher,
{
    let decoded = decode(bytes)?;
    map.extend(decoded);
    Ok(())
}
