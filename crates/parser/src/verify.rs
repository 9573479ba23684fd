//! Grammar/parser pairing verification.
//!
//! [`verify`] obtains a handle from a provider and binds it. There is no
//! recovery path: any failure means the grammar and the parser runtime do not
//! fit together and is handed straight back to the caller.

use std::process::ExitCode;

use thiserror::Error;
use yamlbind_grammar::{GrammarProvider, GrammarUnavailable, YAML};

use crate::factory::{BindingError, ParserFactory};
use crate::instance::ParserInstance;

/// Why verification failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
	#[error(transparent)]
	Unavailable(#[from] GrammarUnavailable),
	#[error(transparent)]
	Binding(#[from] BindingError),
}

impl VerifyError {
	/// Process exit code reported for this failure.
	pub fn exit_code(&self) -> ExitCode {
		ExitCode::from(self.code())
	}

	/// Numeric exit status: 2 unavailable, 3 incompatible, 4 malformed.
	pub fn code(&self) -> u8 {
		match self {
			VerifyError::Unavailable(_) => 2,
			VerifyError::Binding(BindingError::IncompatibleGrammar { .. }) => 3,
			VerifyError::Binding(BindingError::MalformedGrammar { .. }) => 4,
		}
	}
}

/// Obtains `provider`'s grammar and binds it with `factory`.
pub fn verify(provider: &dyn GrammarProvider, factory: &ParserFactory) -> Result<ParserInstance, VerifyError> {
	let handle = provider.obtain_handle()?;
	Ok(factory.bind(&handle)?)
}

/// Verifies the shipped YAML grammar against the runtime's full ABI range.
pub fn verify_shipped() -> Result<ParserInstance, VerifyError> {
	verify(&YAML, &ParserFactory::new())
}
