//! Grammars loaded from shared libraries.
//!
//! A grammar library exports a `tree_sitter_<name>` function returning its
//! language tables. Libraries are looked up either at an explicit path or by
//! name in [`grammar_search_paths`].
//!
//! # Search order
//!
//! 1. `$YAMLBIND_RUNTIME/grammars`
//! 2. `<config dir>/yamlbind/grammars`
//! 3. `<local data dir>/yamlbind/grammars`
//! 4. `grammars/` next to the executable, then `../share/yamlbind/grammars`

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use libloading::{Library, Symbol};
use tracing::{debug, warn};

use crate::error::{GrammarUnavailable, UnavailableReason};
use crate::handle::{GrammarHandle, inspect_tables};
use crate::provider::GrammarProvider;

/// Environment variable naming a development runtime directory.
pub const RUNTIME_ENV: &str = "YAMLBIND_RUNTIME";

type LanguageSymbol = unsafe extern "C" fn() -> *const ();

/// A grammar provided by a shared library, loaded on first use.
#[derive(Debug)]
pub struct LibraryGrammar {
	name: String,
	path: Option<PathBuf>,
	loaded: OnceLock<Result<GrammarHandle, GrammarUnavailable>>,
}

impl LibraryGrammar {
	/// Looks the grammar up by name in [`grammar_search_paths`].
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			path: None,
			loaded: OnceLock::new(),
		}
	}

	/// Loads the grammar from an explicit library path.
	pub fn at_path(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
		Self {
			name: name.into(),
			path: Some(path.into()),
			loaded: OnceLock::new(),
		}
	}

	/// Grammar name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Symbol the library must export.
	pub fn symbol_name(&self) -> String {
		format!("tree_sitter_{}", self.name.replace('-', "_"))
	}

	fn locate(&self) -> Result<PathBuf, UnavailableReason> {
		if let Some(path) = &self.path {
			return if path.exists() { Ok(path.clone()) } else { Err(UnavailableReason::NotFound) };
		}

		let lib_name = grammar_library_name(&self.name);
		grammar_search_paths()
			.into_iter()
			.map(|dir| dir.join(&lib_name))
			.find(|candidate| candidate.exists())
			.ok_or(UnavailableReason::NotFound)
	}

	fn load(&self) -> Result<GrammarHandle, GrammarUnavailable> {
		let loaded = self.locate().and_then(|path| self.load_from_path(&path));
		if let Err(reason) = &loaded {
			warn!(grammar = %self.name, error = %reason, "Grammar library unavailable");
		}
		loaded.map_err(|reason| GrammarUnavailable::new(self.name.clone(), reason))
	}

	fn load_from_path(&self, path: &Path) -> Result<GrammarHandle, UnavailableReason> {
		// SAFETY: loading a tree-sitter grammar runs no initializers beyond
		// those of a plain C object.
		let library = unsafe { Library::new(path) }.map_err(|e| UnavailableReason::Load(format!("{}: {e}", path.display())))?;

		let symbol = self.symbol_name();
		let table = {
			// SAFETY: tree-sitter language functions have this signature.
			let language: Symbol<'_, LanguageSymbol> =
				unsafe { library.get(symbol.as_bytes()) }.map_err(|_| UnavailableReason::MissingSymbol(symbol.clone()))?;
			// SAFETY: the library is still loaded; the function takes no arguments.
			unsafe { language() }
		};

		// SAFETY: the pointer comes from the grammar's own language function
		// and stays valid while `library` is loaded.
		let (table, abi_version) = unsafe { inspect_tables(table) }?;
		debug!(grammar = %self.name, abi = abi_version, path = %path.display(), "Loaded grammar library");

		Ok(GrammarHandle::assemble(
			Cow::Owned(self.name.clone()),
			abi_version,
			table.as_ptr().cast_const(),
			None,
			Some(library),
		))
	}
}

impl GrammarProvider for LibraryGrammar {
	fn obtain_handle(&self) -> Result<GrammarHandle, GrammarUnavailable> {
		self.loaded.get_or_init(|| self.load()).clone()
	}
}

/// Returns the platform-specific library filename for a grammar.
pub fn grammar_library_name(name: &str) -> String {
	let safe_name = name.replace('-', "_");
	#[cfg(target_os = "macos")]
	{
		format!("lib{safe_name}.dylib")
	}
	#[cfg(target_os = "windows")]
	{
		format!("{safe_name}.dll")
	}
	#[cfg(not(any(target_os = "macos", target_os = "windows")))]
	{
		format!("lib{safe_name}.so")
	}
}

/// Returns the directories searched for grammar libraries, in order.
pub fn grammar_search_paths() -> Vec<PathBuf> {
	let mut paths = Vec::new();

	if let Some(runtime) = std::env::var_os(RUNTIME_ENV) {
		paths.push(PathBuf::from(runtime).join("grammars"));
	}

	if let Some(config_dir) = dirs::config_dir() {
		paths.push(config_dir.join("yamlbind").join("grammars"));
	}

	if let Some(data_dir) = dirs::data_local_dir() {
		paths.push(data_dir.join("yamlbind").join("grammars"));
	}

	if let Ok(exe_path) = std::env::current_exe()
		&& let Some(exe_dir) = exe_path.parent()
	{
		paths.push(exe_dir.join("grammars"));
		paths.push(exe_dir.join("..").join("share").join("yamlbind").join("grammars"));
	}

	paths
}
