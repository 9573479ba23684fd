//! Supported grammar ABI versions.

use std::fmt;
use std::ops::RangeInclusive;

use thiserror::Error;

/// Inclusive range of grammar ABI versions a factory accepts.
///
/// The default is the full range the linked tree-sitter runtime can load.
/// A narrower range may be configured; a wider one cannot, since the runtime
/// would refuse those grammars anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbiRange {
	min: u32,
	max: u32,
}

/// Invalid [`AbiRange`] configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiRangeError {
	#[error("empty ABI range: minimum {min} is above maximum {max}")]
	Empty { min: u32, max: u32 },
	#[error("ABI range {min}..={max} exceeds runtime range {runtime}")]
	OutsideRuntime { min: u32, max: u32, runtime: AbiRange },
}

impl AbiRange {
	/// The range supported by the linked tree-sitter runtime.
	pub const RUNTIME: AbiRange = AbiRange {
		min: tree_sitter::MIN_COMPATIBLE_LANGUAGE_VERSION as u32,
		max: tree_sitter::LANGUAGE_VERSION as u32,
	};

	/// Creates a range, which must be non-empty and inside [`AbiRange::RUNTIME`].
	pub fn new(min: u32, max: u32) -> Result<Self, AbiRangeError> {
		if min > max {
			return Err(AbiRangeError::Empty { min, max });
		}
		let runtime = Self::RUNTIME;
		if min < runtime.min || max > runtime.max {
			return Err(AbiRangeError::OutsideRuntime { min, max, runtime });
		}
		Ok(Self { min, max })
	}

	/// Replaces either bound, keeping the other.
	pub fn narrowed(self, min: Option<u32>, max: Option<u32>) -> Result<Self, AbiRangeError> {
		Self::new(min.unwrap_or(self.min), max.unwrap_or(self.max))
	}

	pub fn min(&self) -> u32 {
		self.min
	}

	pub fn max(&self) -> u32 {
		self.max
	}

	pub fn contains(&self, version: u32) -> bool {
		(self.min..=self.max).contains(&version)
	}

	pub fn as_range(&self) -> RangeInclusive<u32> {
		self.min..=self.max
	}
}

impl Default for AbiRange {
	fn default() -> Self {
		Self::RUNTIME
	}
}

impl fmt::Display for AbiRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}..={}", self.min, self.max)
	}
}
