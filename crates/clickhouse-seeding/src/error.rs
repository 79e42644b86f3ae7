//! Error types for the seeding crate.
//!
//! All fallible operations in this crate return [`SeedingResult`]; the
//! variants below cover the full failure taxonomy. Gateway failures are an
//! opaque pass-through of the underlying transport and are never retried
//! here.

use thiserror::Error;

/// Errors that can occur during seeding operations.
#[derive(Debug, Error)]
pub enum SeedingError {
	/// A trait name passed to `build`/`create` is not defined on the factory.
	#[error("Unknown trait: {name} (factory: {factory})")]
	UnknownTrait {
		/// Factory the lookup ran against.
		factory: String,
		/// The unknown trait name.
		name: String,
	},

	/// Factory was not found in the registry.
	#[error("Factory not found: {0}")]
	FactoryNotFound(String),

	/// No model mapping is defined for the given type.
	#[error("No mapping defined for {0}")]
	NoMappingDefined(String),

	/// A model mapping was defined without a transform.
	#[error("Mapping block required for {0}")]
	MappingBlockRequired(String),

	/// The insert gateway reported a failure.
	#[error("Gateway failure: {0}")]
	GatewayFailure(String),

	/// An `after_create` callback failed.
	#[error("Callback error: {0}")]
	CallbackError(String),
}

/// Result type alias for seeding operations.
pub type SeedingResult<T> = Result<T, SeedingError>;
