//! Errors raised when a provider cannot produce a grammar handle.

use thiserror::Error;

/// A provider could not produce any handle for the named grammar.
///
/// Providers cache this value, so it is cheap to clone and compares equal
/// across repeated calls for the same grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("grammar '{name}' unavailable: {reason}")]
pub struct GrammarUnavailable {
	/// Name of the grammar that was requested.
	pub name: String,
	/// What went wrong.
	pub reason: UnavailableReason,
}

impl GrammarUnavailable {
	pub(crate) fn new(name: impl Into<String>, reason: UnavailableReason) -> Self {
		Self { name: name.into(), reason }
	}
}

/// Why a grammar could not be loaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
	/// The language function returned a null table pointer.
	#[error("language function returned no tables")]
	NullTables,

	/// The table pointer is not aligned for the table header.
	#[error("grammar tables are misaligned")]
	Misaligned,

	/// The ABI marker in the table header is not a usable version.
	#[error("ABI marker {0} is not a valid version")]
	InvalidMarker(u32),

	/// No shared library for the grammar exists in any search path.
	#[error("grammar library not found")]
	NotFound,

	/// The shared library exists but could not be loaded.
	#[error("failed to load grammar library: {0}")]
	Load(String),

	/// The shared library does not export the expected language function.
	#[error("grammar library missing language function: {0}")]
	MissingSymbol(String),
}
