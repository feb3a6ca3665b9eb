//! Per-category color strategies.

pub(crate) mod policy;
