//! Config composition: defaults plus layered sources.

pub mod merge_policy;
pub mod service;
