//! This module holds typed parameters for various endpoint inputs.
//!
//! Each parameter type is represented by a struct, which can be serialized and
//! deserialized as needed. By using typed parameters we ensure that endpoint
//! inputs are validated (by type) and correctly shaped before they reach the
//! application logic.

pub(crate) mod book;
