// Binding failures must report through tracing, never stderr
#![deny(clippy::print_stderr)]

//! Parser construction from grammar handles.
//!
//! A [`ParserFactory`] validates a [`GrammarHandle`](yamlbind_grammar::GrammarHandle)
//! against the ABI range it supports and, if the handle passes, binds it to a
//! fresh [`ParserInstance`]. Construction is all-or-nothing: a rejected handle
//! leaves nothing behind.
//!
//! [`verify`] runs the full check: obtain a handle from a provider and bind it.

// Only the integration tests build grammar libraries
#[cfg(test)]
use {cc as _, serde_json as _, tempfile as _};

pub mod abi;
pub mod factory;
pub mod instance;
pub mod verify;

pub use abi::{AbiRange, AbiRangeError};
pub use factory::{BindingError, MalformedReason, ParserFactory, bind};
pub use instance::ParserInstance;
pub use verify::{VerifyError, verify, verify_shipped};
