//! Grammar verification binary.
//!
//! Binds a grammar (the shipped YAML grammar unless `--library` is given) to a
//! tree-sitter parser and exits non-zero if that fails.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use yamlbind_grammar::{GrammarProvider, LibraryGrammar, YAML};
use yamlbind_parser::{AbiRange, ParserFactory, verify};

/// Verification command line arguments.
#[derive(Parser, Debug)]
#[command(name = "yamlbind-verify")]
#[command(about = "Check that a tree-sitter grammar binds to a parser")]
struct Args {
	/// Load the grammar from this shared library instead of the builtin one
	#[arg(short, long, value_name = "PATH")]
	library: Option<PathBuf>,

	/// Grammar name; with no --library, looked up in the grammar search paths
	#[arg(short, long, value_name = "NAME")]
	grammar: Option<String>,

	/// Lowest ABI version to accept
	#[arg(long, value_name = "VERSION")]
	min_abi: Option<u32>,

	/// Highest ABI version to accept
	#[arg(long, value_name = "VERSION")]
	max_abi: Option<u32>,

	/// Parse this text after binding
	#[arg(short, long, value_name = "TEXT")]
	parse: Option<String>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

fn main() -> ExitCode {
	let args = Args::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if args.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
		.with_writer(std::io::stderr)
		.finish();
	if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
		eprintln!("failed to install logger: {e}");
	}

	let range = match AbiRange::default().narrowed(args.min_abi, args.max_abi) {
		Ok(range) => range,
		Err(e) => {
			error!(error = %e, "Invalid ABI range");
			return ExitCode::from(1);
		}
	};

	let library;
	let provider: &dyn GrammarProvider = match (&args.library, &args.grammar) {
		(Some(path), name) => {
			library = LibraryGrammar::at_path(name.as_deref().unwrap_or("yaml"), path);
			&library
		}
		(None, Some(name)) => {
			library = LibraryGrammar::new(name.as_str());
			&library
		}
		(None, None) => &YAML,
	};

	let mut parser = match verify(provider, &ParserFactory::with_range(range)) {
		Ok(parser) => parser,
		Err(e) => {
			eprintln!("grammar failed to load: {e}");
			return e.exit_code();
		}
	};

	info!(grammar = parser.grammar().name(), abi = parser.abi_version(), supported = %range, "Grammar loaded");

	if let Some(text) = &args.parse {
		match parser.parse(text) {
			Some(tree) => println!("{}", tree.root_node().to_sexp()),
			None => {
				eprintln!("parse of --parse text did not complete");
				return ExitCode::FAILURE;
			}
		}
	}

	ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn cli_definition_is_consistent() {
		Args::command().debug_assert();
	}

	#[test]
	fn defaults_to_builtin_grammar() {
		let args = Args::try_parse_from(["yamlbind-verify"]).unwrap();
		assert!(args.library.is_none());
		assert!(args.grammar.is_none());
		assert!(args.min_abi.is_none() && args.max_abi.is_none());
		assert!(!args.verbose);
	}

	#[test]
	fn parses_library_and_abi_bounds() {
		let args = Args::try_parse_from([
			"yamlbind-verify",
			"--library",
			"/tmp/libyaml.so",
			"--grammar",
			"yaml",
			"--min-abi",
			"14",
			"--max-abi",
			"15",
			"-v",
		])
		.unwrap();

		assert_eq!(args.library, Some(PathBuf::from("/tmp/libyaml.so")));
		assert_eq!(args.grammar.as_deref(), Some("yaml"));
		assert_eq!((args.min_abi, args.max_abi), (Some(14), Some(15)));
		assert!(args.verbose);
	}

	#[test]
	fn rejects_non_numeric_abi() {
		assert!(Args::try_parse_from(["yamlbind-verify", "--max-abi", "latest"]).is_err());
	}
}
