//! Grammar providers and the compiled-in YAML grammar.

use std::borrow::Cow;
use std::sync::OnceLock;

use tracing::{debug, warn};
use tree_sitter_language::LanguageFn;

use crate::error::GrammarUnavailable;
use crate::handle::{GrammarHandle, inspect_tables};

/// Source of grammar handles.
///
/// Implementations return the same logical grammar on every call and never
/// hand out a handle whose tables failed validation.
pub trait GrammarProvider {
	/// Returns the provider's grammar, loading it on first use.
	fn obtain_handle(&self) -> Result<GrammarHandle, GrammarUnavailable>;
}

/// The tree-sitter YAML grammar compiled into this binary.
pub static YAML: BuiltinGrammar = BuiltinGrammar::with_node_types("yaml", tree_sitter_yaml::LANGUAGE, tree_sitter_yaml::NODE_TYPES);

/// Returns the shipped YAML grammar.
pub fn obtain_handle() -> Result<GrammarHandle, GrammarUnavailable> {
	YAML.obtain_handle()
}

/// A grammar whose tables are linked into the binary.
///
/// The language function runs at most once per value; the outcome, success or
/// failure, is cached and returned to every later caller.
pub struct BuiltinGrammar {
	name: &'static str,
	language: LanguageFn,
	node_types: Option<&'static str>,
	loaded: OnceLock<Result<GrammarHandle, GrammarUnavailable>>,
}

impl BuiltinGrammar {
	/// Wraps a compiled-in language function.
	pub const fn new(name: &'static str, language: LanguageFn) -> Self {
		Self {
			name,
			language,
			node_types: None,
			loaded: OnceLock::new(),
		}
	}

	/// Wraps a compiled-in language function together with its `node-types.json`.
	pub const fn with_node_types(name: &'static str, language: LanguageFn, node_types: &'static str) -> Self {
		Self {
			name,
			language,
			node_types: Some(node_types),
			loaded: OnceLock::new(),
		}
	}

	/// Grammar name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	fn load(&self) -> Result<GrammarHandle, GrammarUnavailable> {
		let language = self.language.into_raw();
		// SAFETY: language functions generated by tree-sitter take no
		// arguments and return a pointer to static tables.
		let table = unsafe { language() };

		// SAFETY: a non-null pointer from a language function points at a
		// static language struct.
		match unsafe { inspect_tables(table) } {
			Ok((table, abi_version)) => {
				debug!(grammar = self.name, abi = abi_version, "Initialized builtin grammar");
				Ok(GrammarHandle::assemble(
					Cow::Borrowed(self.name),
					abi_version,
					table.as_ptr().cast_const(),
					self.node_types,
					None,
				))
			}
			Err(reason) => {
				warn!(grammar = self.name, error = %reason, "Builtin grammar unavailable");
				Err(GrammarUnavailable::new(self.name, reason))
			}
		}
	}
}

impl GrammarProvider for BuiltinGrammar {
	fn obtain_handle(&self) -> Result<GrammarHandle, GrammarUnavailable> {
		self.loaded.get_or_init(|| self.load()).clone()
	}
}
