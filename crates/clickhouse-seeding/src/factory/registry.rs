//! Factory registry: name to definition.
//!
//! An instantiable [`FactoryRegistry`] holds definitions for isolated use;
//! the process-wide instance behind [`define_factory`] / [`find_factory`] /
//! [`clear_factories`] backs the convenience helpers most suites use.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::{Factory, FactoryBuilder};
use crate::error::{SeedingError, SeedingResult};

/// Stores factory definitions by name.
#[derive(Default)]
pub struct FactoryRegistry {
	factories: HashMap<String, Arc<Factory>>,
}

impl FactoryRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Defines a factory, replacing any existing definition with the same
	/// name.
	///
	/// The definition closure receives a fresh [`FactoryBuilder`]; the
	/// finished factory is stored and also returned for direct use.
	///
	/// # Arguments
	///
	/// * `name` - Factory name, unique within this registry
	/// * `table` - Target table; immutable once the factory exists
	/// * `config` - Definition closure setting attributes, traits and callbacks
	pub fn define(
		&mut self,
		name: &str,
		table: &str,
		config: impl FnOnce(&mut FactoryBuilder),
	) -> Arc<Factory> {
		let mut builder = FactoryBuilder::new(name, table);
		config(&mut builder);
		let factory = Arc::new(builder.finish());
		self.factories.insert(name.to_string(), Arc::clone(&factory));
		factory
	}

	/// Finds a factory by name.
	///
	/// # Errors
	///
	/// [`SeedingError::FactoryNotFound`] when no factory with that name
	/// exists.
	pub fn find(&self, name: &str) -> SeedingResult<Arc<Factory>> {
		self.factories
			.get(name)
			.cloned()
			.ok_or_else(|| SeedingError::FactoryNotFound(name.to_string()))
	}

	/// Removes all definitions, dropping their sequence state with them.
	pub fn clear(&mut self) {
		self.factories.clear();
	}

	/// Returns all registered factory names.
	pub fn names(&self) -> Vec<String> {
		self.factories.keys().cloned().collect()
	}

	/// Returns the number of registered factories.
	pub fn len(&self) -> usize {
		self.factories.len()
	}

	/// Returns true if no factories are registered.
	pub fn is_empty(&self) -> bool {
		self.factories.is_empty()
	}
}

/// Process-wide factory registry.
static FACTORIES: Lazy<RwLock<FactoryRegistry>> =
	Lazy::new(|| RwLock::new(FactoryRegistry::new()));

/// Defines a factory in the process-wide registry.
///
/// # Example
///
/// ```ignore
/// define_factory("user", "users", |f| {
/// 	f.sequence("id");
/// 	f.set("name", "User");
/// });
/// ```
pub fn define_factory(
	name: &str,
	table: &str,
	config: impl FnOnce(&mut FactoryBuilder),
) -> Arc<Factory> {
	FACTORIES.write().define(name, table, config)
}

/// Finds a factory in the process-wide registry.
///
/// # Errors
///
/// [`SeedingError::FactoryNotFound`] when no factory with that name exists.
pub fn find_factory(name: &str) -> SeedingResult<Arc<Factory>> {
	FACTORIES.read().find(name)
}

/// Clears the process-wide registry.
///
/// This is primarily useful for testing.
pub fn clear_factories() {
	FACTORIES.write().clear();
}
