//! Parsers bound to a grammar.

use std::fmt;
use std::ptr::NonNull;

use tree_sitter::{Language, Parser, Tree};
use yamlbind_grammar::GrammarHandle;

use crate::abi::AbiRange;
use crate::factory::{BindingError, ParserFactory};

/// A tree-sitter parser bound to exactly one grammar.
///
/// Only [`ParserFactory`] creates instances. Each instance keeps a clone of
/// its grammar handle, so the grammar's tables (and any library backing them)
/// stay loaded for as long as the parser exists.
pub struct ParserInstance {
	// Dropped before `grammar`: the parser references the grammar's tables.
	parser: Parser,
	grammar: GrammarHandle,
}

impl ParserInstance {
	pub(crate) fn new(grammar: &GrammarHandle, table: NonNull<()>) -> Result<Self, BindingError> {
		// SAFETY: the factory validated `table`, and the handle clone stored
		// below keeps it alive for the parser's lifetime.
		let language = unsafe { Language::from_raw(table.as_ptr().cast_const().cast()) };

		let mut parser = Parser::new();
		parser.set_language(&language).map_err(|_| BindingError::IncompatibleGrammar {
			grammar: grammar.name().to_string(),
			found: grammar.abi_version(),
			supported: AbiRange::RUNTIME,
		})?;

		Ok(Self {
			parser,
			grammar: grammar.clone(),
		})
	}

	/// The grammar this parser is bound to.
	pub fn grammar(&self) -> &GrammarHandle {
		&self.grammar
	}

	pub fn abi_version(&self) -> u32 {
		self.grammar.abi_version()
	}

	/// Parses `text` from scratch.
	///
	/// Returns `None` only if parsing was cancelled, which this crate never
	/// requests.
	pub fn parse(&mut self, text: impl AsRef<[u8]>) -> Option<Tree> {
		self.parser.parse(text, None)
	}

	/// Rebinds this parser to another grammar.
	///
	/// On failure the instance is left untouched and stays bound to its
	/// previous grammar.
	pub fn rebind(&mut self, factory: &ParserFactory, grammar: &GrammarHandle) -> Result<(), BindingError> {
		*self = factory.bind(grammar)?;
		Ok(())
	}
}

impl fmt::Debug for ParserInstance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ParserInstance").field("grammar", &self.grammar).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use yamlbind_grammar::obtain_handle;

	use super::*;
	use crate::factory::bind;

	#[test]
	fn parses_yaml_mapping() {
		let mut parser = bind(&obtain_handle().unwrap()).unwrap();
		let tree = parser.parse("key: value\nlist:\n  - 1\n  - 2\n").expect("parse completes");
		let root = tree.root_node();

		assert_eq!(root.kind(), "stream");
		assert!(!root.has_error());
	}

	#[test]
	fn parser_is_reusable() {
		let mut parser = bind(&obtain_handle().unwrap()).unwrap();
		for text in ["a: 1\n", "- x\n- y\n", "plain\n"] {
			let tree = parser.parse(text).unwrap();
			assert_eq!(tree.root_node().kind(), "stream", "{text:?}");
		}
	}

	#[test]
	fn failed_rebind_keeps_previous_grammar() {
		let yaml = obtain_handle().unwrap();
		let mut parser = bind(&yaml).unwrap();
		let broken = unsafe { GrammarHandle::from_raw_parts("broken", yaml.abi_version(), std::ptr::null()) };

		let err = parser.rebind(&ParserFactory::new(), &broken).unwrap_err();
		assert!(matches!(err, BindingError::MalformedGrammar { .. }));
		assert!(parser.grammar().same_grammar(&yaml));
		assert_eq!(parser.parse("a: 1\n").unwrap().root_node().kind(), "stream");
	}

	#[test]
	fn rebind_switches_grammar() {
		let yaml = obtain_handle().unwrap();
		let table = yaml.table().unwrap().as_ptr().cast_const();
		let alias = unsafe { GrammarHandle::from_raw_parts("yaml-alias", yaml.abi_version(), table) };

		let mut parser = bind(&yaml).unwrap();
		parser.rebind(&ParserFactory::new(), &alias).unwrap();

		assert_eq!(parser.grammar().name(), "yaml-alias");
		assert!(parser.grammar().same_grammar(&alias));
	}

	#[test]
	fn debug_names_grammar() {
		let parser = bind(&obtain_handle().unwrap()).unwrap();
		assert!(format!("{parser:?}").contains("yaml"));
	}
}
