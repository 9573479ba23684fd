//! Opaque grammar handles.
//!
//! A [`GrammarHandle`] wraps a pointer to tree-sitter's compiled language
//! tables (a `TSLanguage`) and the ABI marker read from their header. The
//! handle never exposes the tables themselves; callers see the marker and an
//! untyped table reference and nothing else.

use std::borrow::Cow;
use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;

use libloading::Library;

use crate::error::UnavailableReason;

/// Opaque, immutable reference to a compiled grammar.
///
/// Cloning is cheap: all clones share the same tables. For grammars loaded
/// from a shared library the library stays mapped until the last clone is
/// dropped, so anything holding a clone may keep using the tables.
#[derive(Clone)]
pub struct GrammarHandle {
	inner: Arc<GrammarTables>,
}

struct GrammarTables {
	name: Cow<'static, str>,
	abi_version: u32,
	table: *const (),
	node_types: Option<&'static str>,
	_library: Option<Library>,
}

// SAFETY: the tables are never written after construction. They are either
// static data compiled into the binary or data owned by `_library`, which is
// dropped together with this value.
unsafe impl Send for GrammarTables {}
unsafe impl Sync for GrammarTables {}

impl GrammarHandle {
	/// Builds a handle from raw parts without validating them.
	///
	/// Parser factories still check the marker and table reference, so a
	/// handle built this way can be rejected at bind time.
	///
	/// # Safety
	///
	/// `table` must either be null or point to a tree-sitter language struct
	/// that stays valid and unmodified for the rest of the process.
	pub unsafe fn from_raw_parts(name: impl Into<Cow<'static, str>>, abi_version: u32, table: *const ()) -> Self {
		Self::assemble(name.into(), abi_version, table, None, None)
	}

	pub(crate) fn assemble(
		name: Cow<'static, str>,
		abi_version: u32,
		table: *const (),
		node_types: Option<&'static str>,
		library: Option<Library>,
	) -> Self {
		Self {
			inner: Arc::new(GrammarTables {
				name,
				abi_version,
				table,
				node_types,
				_library: library,
			}),
		}
	}

	/// Grammar name (e.g. `"yaml"`).
	pub fn name(&self) -> &str {
		&self.inner.name
	}

	/// ABI marker recorded when the handle was created.
	pub fn abi_version(&self) -> u32 {
		self.inner.abi_version
	}

	/// Reference to the compiled tables, or `None` if it is null.
	pub fn table(&self) -> Option<NonNull<()>> {
		NonNull::new(self.inner.table.cast_mut())
	}

	/// Raw `node-types.json` shipped with the grammar, if the provider has it.
	pub fn node_types(&self) -> Option<&'static str> {
		self.inner.node_types
	}

	/// Returns true if both handles share the same underlying grammar.
	pub fn same_grammar(&self, other: &GrammarHandle) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	/// Number of live clones of this handle, including `self`.
	///
	/// Every parser bound to the grammar holds one clone.
	pub fn strong_count(&self) -> usize {
		Arc::strong_count(&self.inner)
	}
}

impl fmt::Debug for GrammarHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GrammarHandle")
			.field("name", &self.inner.name)
			.field("abi_version", &self.inner.abi_version)
			.field("table", &self.inner.table)
			.finish()
	}
}

/// Reads the ABI marker from the header of a tree-sitter language struct.
///
/// The marker is the struct's first field, a `u32`.
///
/// # Safety
///
/// `table` must be aligned for `u32` and point to a live language struct.
pub unsafe fn read_abi_marker(table: NonNull<()>) -> u32 {
	// SAFETY: upheld by the caller.
	unsafe { table.cast::<u32>().read() }
}

/// Returns true if `table` can be read as a language header.
pub fn is_header_aligned(table: NonNull<()>) -> bool {
	table.as_ptr().cast::<u32>().is_aligned()
}

/// Checks a table pointer handed out by a language function and returns it
/// with its ABI marker.
///
/// # Safety
///
/// `table` must be null or point to memory readable for at least a `u32`.
pub(crate) unsafe fn inspect_tables(table: *const ()) -> Result<(NonNull<()>, u32), UnavailableReason> {
	let table = NonNull::new(table.cast_mut()).ok_or(UnavailableReason::NullTables)?;
	if !is_header_aligned(table) {
		return Err(UnavailableReason::Misaligned);
	}

	// SAFETY: non-null and aligned; readability is upheld by the caller.
	let marker = unsafe { read_abi_marker(table) };
	if marker == 0 {
		return Err(UnavailableReason::InvalidMarker(marker));
	}

	Ok((table, marker))
}

#[cfg(test)]
mod tests {
	use super::*;

	static HEADER: [u32; 4] = [14, 0, 0, 0];

	fn header_ptr() -> *const () {
		HEADER.as_ptr().cast()
	}

	#[test]
	fn inspect_reads_marker_from_header() {
		let (table, marker) = unsafe { inspect_tables(header_ptr()) }.unwrap();
		assert_eq!(marker, 14);
		assert_eq!(table.as_ptr().cast_const(), header_ptr());
	}

	#[test]
	fn inspect_rejects_null() {
		let err = unsafe { inspect_tables(std::ptr::null()) }.unwrap_err();
		assert_eq!(err, UnavailableReason::NullTables);
	}

	#[test]
	fn inspect_rejects_zero_marker() {
		static ZEROED: [u32; 2] = [0, 0];
		let err = unsafe { inspect_tables(ZEROED.as_ptr().cast()) }.unwrap_err();
		assert_eq!(err, UnavailableReason::InvalidMarker(0));
	}

	#[test]
	fn inspect_rejects_misaligned_header() {
		let misaligned = HEADER.as_ptr().cast::<u8>().wrapping_add(1).cast::<()>();
		let err = unsafe { inspect_tables(misaligned) }.unwrap_err();
		assert_eq!(err, UnavailableReason::Misaligned);
	}

	#[test]
	fn raw_parts_keep_null_table() {
		let handle = unsafe { GrammarHandle::from_raw_parts("nulled", 14, std::ptr::null()) };
		assert_eq!(handle.name(), "nulled");
		assert_eq!(handle.abi_version(), 14);
		assert!(handle.table().is_none());
		assert!(handle.node_types().is_none());
	}

	#[test]
	fn clones_share_grammar() {
		let handle = unsafe { GrammarHandle::from_raw_parts("header", 14, header_ptr()) };
		let other = unsafe { GrammarHandle::from_raw_parts("header", 14, header_ptr()) };
		let clone = handle.clone();

		assert!(handle.same_grammar(&clone));
		assert!(!handle.same_grammar(&other), "separately built handles are distinct");
		assert_eq!(handle.strong_count(), 2);
		drop(clone);
		assert_eq!(handle.strong_count(), 1);
	}
}
