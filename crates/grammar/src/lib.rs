// Grammar loading must report through tracing, never stderr
#![deny(clippy::print_stderr)]

//! Compiled tree-sitter grammar handles.
//!
//! This crate hands out [`GrammarHandle`]s: opaque, immutable references to a
//! grammar's compiled tables together with the ABI marker stored in their
//! header. A handle is only ever produced once its tables have been checked,
//! so anything downstream can rely on it being internally consistent.
//!
//! # Architecture
//!
//! * [`handle`]: The opaque handle and its accessors
//! * [`provider`]: The [`GrammarProvider`] trait and compiled-in grammars
//! * [`library`]: Grammars loaded from shared libraries
//! * [`node_types`]: `node-types.json` metadata shipped alongside a grammar
//!
//! The shipped YAML grammar is available through [`obtain_handle`].

pub mod error;
pub mod handle;
pub mod library;
pub mod node_types;
pub mod provider;

pub use error::{GrammarUnavailable, UnavailableReason};
pub use handle::GrammarHandle;
pub use library::{LibraryGrammar, grammar_library_name, grammar_search_paths};
pub use node_types::{NodeTypeInfo, parse_node_types};
pub use provider::{BuiltinGrammar, GrammarProvider, YAML, obtain_handle};
