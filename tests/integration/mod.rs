//! Integration tests for the kegdex index engine

mod cli_contracts;
mod lifecycle_flow;
mod rebuild_determinism;
mod support;
mod tag_index;
