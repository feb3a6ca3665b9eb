//! Calendar-aware mapping from instants to dial coordinates.

pub(crate) mod mapper;
pub(crate) mod midnight;
