//! An insertion-ordered hash map, and a JSON codec that keeps object members
//! in the order the map holds them.
//!
//! [`OrderedMap`] iterates in the order keys were first inserted; updating a
//! key never moves it. Decoding a JSON object with [`decode`] inserts its
//! members in document order, nested objects included, and [`encode`] writes
//! them back out in iteration order, so a document with unique keys survives
//! the round trip byte for byte.
//!
//! ```
//! let input = r#"{"b":1,"a":{"z":null,"y":[true,"<x>"]}}"#;
//!
//! let mut map = jsonmap::decode_str(input).unwrap();
//! map.set_escape_html(false);
//!
//! assert_eq!(input, jsonmap::encode_to_string(&map).unwrap());
//! ```
//!
//! Each map carries an `escape_html` flag, on by default, which makes the
//! encoder write `<`, `>` and `&` as unicode escapes. The flag of the map being
//! encoded applies to the whole document.

mod collection;
mod de;
mod error;
mod finite;
mod linked_list;
mod ordered_map;
mod ser;
#[cfg(feature = "shared_map")]
mod shared_map;
mod value;

pub use collection::OrderedCollection;
pub use de::{decode, decode_into, decode_str, from_reader, from_slice, from_str};
pub use error::{Error, Result};
pub use ordered_map::{
    Cursor, IntoIter, Iter, IterMut, Keys, OrderedMap, Values, ValuesMut,
};
pub use ser::{
    encode, encode_to_string, encode_to_writer, to_string, to_vec, to_writer, HtmlFormatter,
};
#[cfg(feature = "shared_map")]
pub use shared_map::SharedMap;
pub use value::{JsonMap, Value};
