//! Catalog refresh pipeline for the TNS mirror.
//!
//! `Idle → Downloading → Parsing → Replacing → Idle`, or `Failed` from any
//! state. A failure at any point aborts the run and leaves the previously
//! served catalog untouched; only the Replacing step writes, and it writes
//! through [`tns_mirror_storage::PgCatalog::replace_catalog`]'s single
//! transaction.

mod error;
mod feed;
mod parse;
mod pipeline;

pub use error::IngestError;
pub use feed::{FeedClient, FeedConfig};
pub use parse::decode_feed;
pub use pipeline::{RefreshPipeline, RefreshResult};
