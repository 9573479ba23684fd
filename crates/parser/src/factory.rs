//! Binding grammar handles to parsers.
//!
//! [`ParserFactory::bind`] checks, in order:
//!
//! 1. The handle's ABI marker lies in the factory's [`AbiRange`].
//! 2. The table reference is non-null and aligned.
//! 3. The marker stored in the table header agrees with the handle's marker.
//!
//! Only then is a parser allocated. A handle that fails any check is rejected
//! the same way on every call.

use std::ptr::NonNull;

use thiserror::Error;
use tracing::{debug, warn};
use yamlbind_grammar::GrammarHandle;
use yamlbind_grammar::handle::{is_header_aligned, read_abi_marker};

use crate::abi::AbiRange;
use crate::instance::ParserInstance;

/// A grammar handle could not be bound to a parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
	/// The grammar's ABI version is outside the supported range.
	#[error("grammar '{grammar}' has ABI version {found}, supported range is {supported}")]
	IncompatibleGrammar { grammar: String, found: u32, supported: AbiRange },

	/// The handle's table reference is unusable.
	#[error("grammar '{grammar}' is malformed: {reason}")]
	MalformedGrammar { grammar: String, reason: MalformedReason },
}

/// Structural defect found in a grammar handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
	#[error("table reference is null")]
	NullTables,
	#[error("table reference is misaligned")]
	Misaligned,
	#[error("handle records ABI {handle} but tables declare {table}")]
	MarkerMismatch { handle: u32, table: u32 },
}

/// Constructs [`ParserInstance`]s from grammar handles.
///
/// The factory holds no state besides its configuration, so it is `Copy` and
/// may be shared freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserFactory {
	range: AbiRange,
}

impl ParserFactory {
	/// Factory accepting every ABI version the runtime supports.
	pub fn new() -> Self {
		Self::default()
	}

	/// Factory accepting only `range`.
	pub fn with_range(range: AbiRange) -> Self {
		Self { range }
	}

	pub fn range(&self) -> AbiRange {
		self.range
	}

	/// Binds `handle` to a new parser.
	///
	/// # Errors
	///
	/// * [`BindingError::IncompatibleGrammar`] if the ABI marker is out of range.
	/// * [`BindingError::MalformedGrammar`] if the table reference is unusable.
	pub fn bind(&self, handle: &GrammarHandle) -> Result<ParserInstance, BindingError> {
		self.check(handle)
			.and_then(|table| ParserInstance::new(handle, table))
			.inspect(|_| debug!(grammar = handle.name(), abi = handle.abi_version(), "Bound grammar to parser"))
			.inspect_err(|e| warn!(grammar = handle.name(), error = %e, "Rejected grammar"))
	}

	fn check(&self, handle: &GrammarHandle) -> Result<NonNull<()>, BindingError> {
		let found = handle.abi_version();
		if !self.range.contains(found) {
			return Err(BindingError::IncompatibleGrammar {
				grammar: handle.name().to_string(),
				found,
				supported: self.range,
			});
		}

		let malformed = |reason| BindingError::MalformedGrammar {
			grammar: handle.name().to_string(),
			reason,
		};

		let table = handle.table().ok_or_else(|| malformed(MalformedReason::NullTables))?;
		if !is_header_aligned(table) {
			return Err(malformed(MalformedReason::Misaligned));
		}

		// SAFETY: a non-null table reference points at live language tables;
		// alignment was checked above.
		let declared = unsafe { read_abi_marker(table) };
		if declared != found {
			return Err(malformed(MalformedReason::MarkerMismatch { handle: found, table: declared }));
		}

		Ok(table)
	}
}

/// Binds `handle` using a factory that accepts the runtime's full ABI range.
pub fn bind(handle: &GrammarHandle) -> Result<ParserInstance, BindingError> {
	ParserFactory::new().bind(handle)
}
