//! Common utilities for mirdb.
//!
//! This crate provides the low-level stream primitives shared by the record
//! codecs:
//!
//! - [`BinaryReader`] - Forward-only cursor over a byte slice
//! - [`BinaryWriter`] - Little-endian writer over any `Write` sink
//! - [`string`] - 7-bit variable-length prefix and Latin-1 string codec
//! - [`Point`] - Map coordinate used by every spatial record

mod error;
mod point;
mod reader;
mod writer;

pub mod string;

pub use error::{Error, Result};
pub use point::Point;
pub use reader::BinaryReader;
pub use writer::BinaryWriter;
