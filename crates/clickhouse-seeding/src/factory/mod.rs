//! Factory definitions and attribute resolution.
//!
//! A factory is a named row template for one table: ordered attribute rules
//! (literal or computed), sequence-backed attributes, named trait overlays
//! and `after_create` callbacks. [`Factory::build`] resolves the template
//! into a concrete [`Row`]; [`Factory::create`] and [`Factory::create_list`]
//! push resolved rows through an [`InsertGateway`].
//!
//! Resolution layers, in order: global factory defaults from the
//! configuration, the factory's own rules, the requested trait overlays,
//! literal overrides. Each layer is fully evaluated before the next merges,
//! and computed rules see every attribute resolved before them, so a rule
//! can derive its value from a sequence declared earlier in the same pass.

pub mod registry;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::config;
use crate::error::{SeedingError, SeedingResult};
use crate::gateway::InsertGateway;
use crate::sequence::Sequence;
use crate::value::{Row, Value};

pub use registry::{FactoryRegistry, clear_factories, define_factory, find_factory};

/// A computed attribute rule.
///
/// Receives the attributes resolved so far in the current build pass, in
/// layer order, and is re-invoked on every build with no memoization.
pub type ComputedRule = dyn Fn(&Row) -> Value + Send + Sync;

/// Side-effecting hook invoked with the resolved row after `create`.
pub type AfterCreate = dyn Fn(&Row) -> SeedingResult<()> + Send + Sync;

enum Attribute {
	Literal(Value),
	Computed(Box<ComputedRule>),
	Sequence(Arc<Sequence>),
}

/// A named row template targeting a single table.
///
/// Factories are immutable once defined; all per-call variation comes in
/// through trait names and overrides.
pub struct Factory {
	name: String,
	table: String,
	attributes: IndexMap<String, Attribute>,
	traits: IndexMap<String, IndexMap<String, Attribute>>,
	after_create: Vec<Box<AfterCreate>>,
}

impl std::fmt::Debug for Factory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Factory")
			.field("name", &self.name)
			.field("table", &self.table)
			.field("attributes", &self.attributes.keys().collect::<Vec<_>>())
			.field("traits", &self.traits.keys().collect::<Vec<_>>())
			.field("after_create", &self.after_create.len())
			.finish()
	}
}

impl Factory {
	/// Factory name as registered.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Target table.
	pub fn table(&self) -> &str {
		&self.table
	}

	/// Names of the defined traits, in declaration order.
	pub fn trait_names(&self) -> Vec<&str> {
		self.traits.keys().map(String::as_str).collect()
	}

	/// Resolves the factory into a concrete row without inserting it.
	///
	/// Sequences advance once per call and computed rules are re-evaluated,
	/// so consecutive builds differ exactly where the definition says they
	/// should. Overrides merge last and win over everything, including
	/// sequence attributes.
	///
	/// # Errors
	///
	/// Fails with [`SeedingError::UnknownTrait`] when a trait name is not
	/// defined on this factory. Trait names are validated before any rule
	/// is evaluated, so a failed build has no effect on sequence state.
	pub fn build(&self, traits: &[&str], overrides: Row) -> SeedingResult<Row> {
		let overlays = traits
			.iter()
			.map(|name| {
				self.traits.get(*name).ok_or_else(|| SeedingError::UnknownTrait {
					factory: self.name.clone(),
					name: (*name).to_string(),
				})
			})
			.collect::<SeedingResult<Vec<_>>>()?;

		let mut row = Row::new();
		for (name, value) in config::configuration().factory_defaults {
			row.insert(name, value);
		}
		Self::apply(&self.attributes, &mut row);
		for overlay in overlays {
			Self::apply(overlay, &mut row);
		}
		for (name, value) in overrides {
			row.insert(name, value);
		}
		Ok(row)
	}

	fn apply(rules: &IndexMap<String, Attribute>, row: &mut Row) {
		for (name, rule) in rules {
			let value = match rule {
				Attribute::Literal(value) => value.clone(),
				Attribute::Computed(rule) => rule(row),
				Attribute::Sequence(sequence) => Value::Int(sequence.next()),
			};
			row.insert(name.clone(), value);
		}
	}

	/// Builds one row and inserts it through the gateway.
	///
	/// `after_create` callbacks run after the insert, in declaration order,
	/// with the resolved row. A failing callback aborts the remaining ones
	/// and propagates; the insert has already happened at that point.
	pub fn create(
		&self,
		gateway: &dyn InsertGateway,
		traits: &[&str],
		overrides: Row,
	) -> SeedingResult<Row> {
		let row = self.build(traits, overrides)?;
		gateway.insert_one(&self.table, &row)?;
		for callback in &self.after_create {
			callback(&row)?;
		}
		Ok(row)
	}

	/// Builds `count` rows independently and bulk-inserts them in one call.
	///
	/// Sequence attributes advance per row while literal overrides repeat
	/// across rows. A zero count builds nothing and skips the gateway.
	/// `after_create` callbacks do not run for list creation; only single
	/// `create` fires them.
	pub fn create_list(
		&self,
		gateway: &dyn InsertGateway,
		count: usize,
		traits: &[&str],
		overrides: Row,
	) -> SeedingResult<Vec<Row>> {
		if count == 0 {
			return Ok(Vec::new());
		}
		let rows = (0..count)
			.map(|_| self.build(traits, overrides.clone()))
			.collect::<SeedingResult<Vec<_>>>()?;
		gateway.insert_many(&self.table, &rows)?;
		Ok(rows)
	}
}

/// Builder passed to factory definition closures.
///
/// # Examples
///
/// ```
/// use clickhouse_seeding::{FactoryRegistry, Value, row};
///
/// let mut registry = FactoryRegistry::new();
/// registry.define("user", "users", |f| {
/// 	f.sequence("id");
/// 	f.set("name", "User");
/// 	f.set_computed("email", |attrs| {
/// 		Value::from(format!("user{}@example.com", attrs["id"].as_i64().unwrap_or(0)))
/// 	});
/// 	f.define_trait("admin", |t| {
/// 		t.set("role", "admin");
/// 	});
/// });
///
/// let user = registry.find("user").unwrap().build(&[], row! {}).unwrap();
/// assert_eq!(user["email"], Value::from("user1@example.com"));
/// ```
pub struct FactoryBuilder {
	factory: Factory,
}

impl FactoryBuilder {
	pub(crate) fn new(name: &str, table: &str) -> Self {
		Self {
			factory: Factory {
				name: name.to_string(),
				table: table.to_string(),
				attributes: IndexMap::new(),
				traits: IndexMap::new(),
				after_create: Vec::new(),
			},
		}
	}

	pub(crate) fn finish(self) -> Factory {
		self.factory
	}

	/// Sets a literal attribute.
	pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
		self.factory
			.attributes
			.insert(name.to_string(), Attribute::Literal(value.into()));
		self
	}

	/// Sets a computed attribute, re-evaluated on every build.
	///
	/// The rule sees the attributes resolved before it in the current pass,
	/// so it can read a sequence value declared earlier.
	pub fn set_computed(
		&mut self,
		name: &str,
		rule: impl Fn(&Row) -> Value + Send + Sync + 'static,
	) -> &mut Self {
		self.factory
			.attributes
			.insert(name.to_string(), Attribute::Computed(Box::new(rule)));
		self
	}

	/// Binds an auto-incrementing sequence to the attribute.
	///
	/// The first build yields the configured global start value (1 unless
	/// `sequence_start` was changed).
	pub fn sequence(&mut self, name: &str) -> &mut Self {
		let start = config::configuration().sequence_start;
		self.sequence_from(name, start)
	}

	/// Binds a sequence starting at the given value.
	pub fn sequence_from(&mut self, name: &str, start: i64) -> &mut Self {
		self.factory.attributes.insert(
			name.to_string(),
			Attribute::Sequence(Arc::new(Sequence::new(start))),
		);
		self
	}

	/// Defines a named trait overlay.
	///
	/// Overlays carry attribute rules only; sequences and callbacks cannot
	/// be declared inside a trait.
	pub fn define_trait(
		&mut self,
		name: &str,
		config: impl FnOnce(&mut TraitBuilder),
	) -> &mut Self {
		let mut builder = TraitBuilder {
			attributes: IndexMap::new(),
		};
		config(&mut builder);
		self.factory.traits.insert(name.to_string(), builder.attributes);
		self
	}

	/// Appends an `after_create` callback.
	pub fn after_create(
		&mut self,
		callback: impl Fn(&Row) -> SeedingResult<()> + Send + Sync + 'static,
	) -> &mut Self {
		self.factory.after_create.push(Box::new(callback));
		self
	}
}

/// Builder passed to trait definition closures.
pub struct TraitBuilder {
	attributes: IndexMap<String, Attribute>,
}

impl TraitBuilder {
	/// Sets a literal attribute override.
	pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
		self.attributes
			.insert(name.to_string(), Attribute::Literal(value.into()));
		self
	}

	/// Sets a computed attribute override.
	pub fn set_computed(
		&mut self,
		name: &str,
		rule: impl Fn(&Row) -> Value + Send + Sync + 'static,
	) -> &mut Self {
		self.attributes
			.insert(name.to_string(), Attribute::Computed(Box::new(rule)));
		self
	}
}
