//! csv-rollup infers the kind of each column of a CSV file, groups rows by a selection of
//! columns and rolls up the numeric columns with exact decimal arithmetic.
//!
//! The [`Session`] is the entry point for programmatic use. The [`engine`] functions can also be
//! called directly on a [`Dataset`].

pub mod args;
pub mod codec;
pub mod commands;
mod config;
pub mod engine;
mod error;
pub mod model;
mod session;
mod source;
mod utils;


pub use config::Job;
pub use error::{Error, Result, RollupError, RollupResult};
pub use model::{Classification, ColumnKind, Dataset, Percent};
pub use session::{Export, LoadTicket, Loaded, Session, SessionState};
pub use source::{FileSource, Source, TextSource};
