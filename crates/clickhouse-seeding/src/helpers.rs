//! Convenience functions over the process-wide factory registry.
//!
//! The entry points suites actually call: look up a factory by name,
//! resolve it, insert. Mapper equivalents live in [`crate::mapper`].

use crate::error::SeedingResult;
use crate::factory::registry::find_factory;
use crate::gateway::InsertGateway;
use crate::value::Row;

/// Resolves a factory into a row without inserting it.
///
/// # Errors
///
/// [`crate::SeedingError::FactoryNotFound`] for an unregistered name,
/// [`crate::SeedingError::UnknownTrait`] for an unknown trait.
pub fn build(factory: &str, traits: &[&str], overrides: Row) -> SeedingResult<Row> {
	find_factory(factory)?.build(traits, overrides)
}

/// Creates one row through the named factory.
///
/// # Examples
///
/// ```ignore
/// let user = create(&gateway, "user", &[], row! {})?;
/// let admin = create(&gateway, "user", &["admin"], row! { "name" => "Root" })?;
/// ```
pub fn create(
	gateway: &dyn InsertGateway,
	factory: &str,
	traits: &[&str],
	overrides: Row,
) -> SeedingResult<Row> {
	find_factory(factory)?.create(gateway, traits, overrides)
}

/// Creates `count` rows through the named factory with one bulk insert.
pub fn create_list(
	gateway: &dyn InsertGateway,
	factory: &str,
	count: usize,
	traits: &[&str],
	overrides: Row,
) -> SeedingResult<Vec<Row>> {
	find_factory(factory)?.create_list(gateway, count, traits, overrides)
}
