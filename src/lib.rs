//! kegdex: Keg Index Engine
//!
//! Maintains the index of a keg, a directory of numbered knowledge nodes.
//! The index is derived entirely from the node directories on disk and is
//! persisted as a reverse-chronological markdown change log and a tabular
//! file sorted by node id. Tags live in a separate line-oriented file.

pub mod config;
pub mod corpus;
pub mod dex;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod meta;
pub mod store;
pub mod tags;
pub mod title;
pub mod tooling;
pub mod types;
pub mod views;

pub use corpus::Corpus;
pub use dex::{Dex, DexEntry};
pub use error::KegError;
pub use types::NodeID;
