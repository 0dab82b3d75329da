//! Core types for docstore payloads
//!
//! This crate defines the serialization side of the store:
//! - Value: the structured form of a decoded payload
//! - Map: string-keyed mapping of values (a decoded JSON object)
//! - codec: encode/decode between payload text and `Value`, with the
//!   int-first-then-float numeric disambiguation applied on every decode
//! - CodecError: error type for the codec
//!
//! Nothing here knows about tables, revisions or SQL; see `docstore-engine`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod value;

pub use codec::{decode, decode_reader, decode_value, encode, normalize};
pub use error::{CodecError, Result};
pub use value::{Map, Value};
