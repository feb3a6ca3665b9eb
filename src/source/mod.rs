//! Event-log input and request building.

pub(crate) mod log;
