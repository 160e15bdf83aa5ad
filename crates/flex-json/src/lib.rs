//! Typed path handles over JSON-shaped value trees.
//!
//! A [`Document`] owns a [`Value`] tree. [`PathHandle`]s derived from it
//! address nodes through a [`Route`] of keys and indices, read them without
//! null-checking every level, and write through auto-vivifying the
//! containers a route needs. With [`DocumentOptions::fast_mode`] each handle
//! keeps a snapshot of the value it resolved.

pub mod document;
pub mod error;
pub mod guards;
pub mod handle;
pub mod merge;
pub mod navigator;
pub mod options;
pub mod reader;
pub mod route;
pub mod transform;
pub mod value;

pub use document::Document;
pub use error::{JsonError, JsonResult};
pub use guards::{NumberOrBigInt, TypedRead};
pub use handle::PathHandle;
pub use num_bigint::BigInt;
pub use options::{DocumentOptions, JsonOptions};
pub use reader::JsonReader;
pub use route::{PathStep, Route};
pub use transform::{JsonTransformer, TransformerChain};
pub use value::{is_mapping, is_sequence, is_value, Mapping, Sequence, Value, ValueKind};

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
