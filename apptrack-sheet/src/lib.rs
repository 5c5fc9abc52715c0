#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod columns;
pub mod compensation;
pub mod date;
mod decode;
mod encode;
mod error;
pub mod timeline;

pub use columns::HEADERS;
pub use decode::{Decoded, SheetFormat, decode_row, read};
pub use encode::{encode_row, write_groups, write_records};
pub use error::{RowError, SheetError};
