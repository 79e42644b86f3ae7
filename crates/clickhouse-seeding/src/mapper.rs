//! Domain-model-to-row mappings.
//!
//! Maps application objects to factory-shaped rows by type identity, so
//! production structs can be mirrored into ClickHouse tables during tests
//! without hand-written inserts. One mapping per source type; redefining a
//! type replaces its mapping.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::{SeedingError, SeedingResult};
use crate::gateway::InsertGateway;
use crate::value::Row;

struct Mapping {
	table: String,
	transform: Box<dyn Fn(&dyn Any) -> Row + Send + Sync>,
}

/// Builder passed to mapping definition closures.
pub struct MappingBuilder<T> {
	transform: Option<Box<dyn Fn(&T) -> Row + Send + Sync>>,
}

impl<T> MappingBuilder<T> {
	/// Sets the transform that converts a model into a row.
	pub fn transform(&mut self, f: impl Fn(&T) -> Row + Send + Sync + 'static) -> &mut Self {
		self.transform = Some(Box::new(f));
		self
	}
}

/// Stores model mappings by type identity.
///
/// # Examples
///
/// ```
/// use clickhouse_seeding::{MapperRegistry, RecordingGateway, row};
///
/// struct Visit {
/// 	user_id: i64,
/// 	path: String,
/// }
///
/// let mut registry = MapperRegistry::new();
/// registry
/// 	.define::<Visit>("visits", |m| {
/// 		m.transform(|visit| {
/// 			row! { "user_id" => visit.user_id, "path" => visit.path.clone() }
/// 		});
/// 	})
/// 	.unwrap();
///
/// let gateway = RecordingGateway::new();
/// let visit = Visit { user_id: 7, path: "/".to_string() };
/// registry.sync(&gateway, &visit).unwrap();
/// assert_eq!(gateway.call_count(), 1);
/// ```
#[derive(Default)]
pub struct MapperRegistry {
	mappings: HashMap<TypeId, Mapping>,
}

impl MapperRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Defines the mapping for `T`, replacing any previous one.
	///
	/// # Arguments
	///
	/// * `table` - Target table for synced rows
	/// * `config` - Definition closure; must call [`MappingBuilder::transform`]
	///
	/// # Errors
	///
	/// [`SeedingError::MappingBlockRequired`] when the definition closure
	/// does not supply a transform; nothing is stored in that case.
	pub fn define<T: 'static>(
		&mut self,
		table: &str,
		config: impl FnOnce(&mut MappingBuilder<T>),
	) -> SeedingResult<()> {
		let mut builder = MappingBuilder { transform: None };
		config(&mut builder);
		let transform = builder.transform.ok_or_else(|| {
			SeedingError::MappingBlockRequired(std::any::type_name::<T>().to_string())
		})?;
		let erased = move |model: &dyn Any| {
			// The map is keyed by this exact TypeId, so the downcast holds.
			let model = model.downcast_ref::<T>().expect("mapping keyed by TypeId");
			transform(model)
		};
		self.mappings.insert(
			TypeId::of::<T>(),
			Mapping {
				table: table.to_string(),
				transform: Box::new(erased),
			},
		);
		Ok(())
	}

	/// Maps one model and inserts the resulting row.
	///
	/// # Errors
	///
	/// [`SeedingError::NoMappingDefined`] when `T` has no mapping.
	pub fn sync<T: 'static>(&self, gateway: &dyn InsertGateway, model: &T) -> SeedingResult<Row> {
		let mapping = self.mapping_for::<T>()?;
		let row = (mapping.transform)(model);
		gateway.insert_one(&mapping.table, &row)?;
		Ok(row)
	}

	/// Maps a batch of models and bulk-inserts the rows in one call.
	///
	/// An empty slice is a no-op: no lookup, no gateway call, no error.
	///
	/// # Errors
	///
	/// [`SeedingError::NoMappingDefined`] when `T` has no mapping.
	pub fn bulk_sync<T: 'static>(
		&self,
		gateway: &dyn InsertGateway,
		models: &[T],
	) -> SeedingResult<Vec<Row>> {
		if models.is_empty() {
			return Ok(Vec::new());
		}
		let mapping = self.mapping_for::<T>()?;
		let rows: Vec<Row> = models.iter().map(|model| (mapping.transform)(model)).collect();
		gateway.insert_many(&mapping.table, &rows)?;
		Ok(rows)
	}

	/// Removes all mappings.
	pub fn clear(&mut self) {
		self.mappings.clear();
	}

	/// Returns true if a mapping exists for `T`.
	pub fn has_mapping<T: 'static>(&self) -> bool {
		self.mappings.contains_key(&TypeId::of::<T>())
	}

	fn mapping_for<T: 'static>(&self) -> SeedingResult<&Mapping> {
		self.mappings.get(&TypeId::of::<T>()).ok_or_else(|| {
			SeedingError::NoMappingDefined(std::any::type_name::<T>().to_string())
		})
	}
}

/// Process-wide mapper registry.
static MAPPINGS: Lazy<RwLock<MapperRegistry>> =
	Lazy::new(|| RwLock::new(MapperRegistry::new()));

/// Defines a mapping in the process-wide registry.
///
/// # Errors
///
/// [`SeedingError::MappingBlockRequired`] when no transform is supplied.
pub fn define_mapping<T: 'static>(
	table: &str,
	config: impl FnOnce(&mut MappingBuilder<T>),
) -> SeedingResult<()> {
	MAPPINGS.write().define(table, config)
}

/// Maps one model through the process-wide registry and inserts it.
///
/// # Errors
///
/// [`SeedingError::NoMappingDefined`] when the model's type has no mapping.
pub fn sync<T: 'static>(gateway: &dyn InsertGateway, model: &T) -> SeedingResult<Row> {
	MAPPINGS.read().sync(gateway, model)
}

/// Maps a batch through the process-wide registry and bulk-inserts it.
///
/// An empty slice is a no-op.
pub fn bulk_sync<T: 'static>(
	gateway: &dyn InsertGateway,
	models: &[T],
) -> SeedingResult<Vec<Row>> {
	MAPPINGS.read().bulk_sync(gateway, models)
}

/// Clears the process-wide registry.
///
/// This is primarily useful for testing.
pub fn clear_mappings() {
	MAPPINGS.write().clear();
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gateway::RecordingGateway;
	use crate::row;
	use crate::value::Value;
	use rstest::rstest;
	use serial_test::serial;

	struct Order {
		id: i64,
		total: f64,
	}

	struct Unmapped;

	#[rstest]
	fn test_sync_maps_and_inserts() {
		let mut registry = MapperRegistry::new();
		registry
			.define::<Order>("orders", |m| {
				m.transform(|order| row! { "id" => order.id, "total" => order.total });
			})
			.unwrap();

		let gateway = RecordingGateway::new();
		let row = registry.sync(&gateway, &Order { id: 1, total: 9.5 }).unwrap();

		assert_eq!(row["id"], Value::Int(1));
		let inserts = gateway.inserts();
		assert_eq!(inserts.len(), 1);
		assert_eq!(inserts[0].table, "orders");
		assert_eq!(inserts[0].rows.len(), 1);
	}

	#[rstest]
	fn test_sync_without_mapping_fails() {
		let registry = MapperRegistry::new();
		let gateway = RecordingGateway::new();

		let error = registry.sync(&gateway, &Unmapped).unwrap_err();
		assert!(matches!(error, SeedingError::NoMappingDefined(_)));
		assert_eq!(gateway.call_count(), 0);
	}

	#[rstest]
	fn test_define_without_transform_fails() {
		let mut registry = MapperRegistry::new();

		let error = registry.define::<Order>("orders", |_| {}).unwrap_err();
		assert!(matches!(error, SeedingError::MappingBlockRequired(_)));
		assert!(!registry.has_mapping::<Order>());
	}

	#[rstest]
	fn test_bulk_sync_maps_all_models_in_one_call() {
		let mut registry = MapperRegistry::new();
		registry
			.define::<Order>("orders", |m| {
				m.transform(|order| row! { "id" => order.id });
			})
			.unwrap();

		let gateway = RecordingGateway::new();
		let orders = vec![
			Order { id: 1, total: 1.0 },
			Order { id: 2, total: 2.0 },
			Order { id: 3, total: 3.0 },
		];
		let rows = registry.bulk_sync(&gateway, &orders).unwrap();

		assert_eq!(rows.len(), 3);
		let inserts = gateway.inserts();
		assert_eq!(inserts.len(), 1);
		assert_eq!(inserts[0].rows.len(), 3);
		assert_eq!(inserts[0].rows[2]["id"], Value::Int(3));
	}

	#[rstest]
	fn test_bulk_sync_empty_is_a_no_op() {
		let registry = MapperRegistry::new();
		let gateway = RecordingGateway::new();

		// No mapping defined for Order, and none is needed for an empty batch.
		let rows = registry.bulk_sync::<Order>(&gateway, &[]).unwrap();

		assert!(rows.is_empty());
		assert_eq!(gateway.call_count(), 0);
	}

	#[rstest]
	fn test_last_define_wins() {
		let mut registry = MapperRegistry::new();
		registry
			.define::<Order>("orders_v1", |m| {
				m.transform(|order| row! { "id" => order.id });
			})
			.unwrap();
		registry
			.define::<Order>("orders_v2", |m| {
				m.transform(|order| row! { "order_id" => order.id });
			})
			.unwrap();

		let gateway = RecordingGateway::new();
		registry.sync(&gateway, &Order { id: 5, total: 0.0 }).unwrap();

		let inserts = gateway.inserts();
		assert_eq!(inserts[0].table, "orders_v2");
		assert_eq!(inserts[0].rows[0]["order_id"], Value::Int(5));
	}

	#[rstest]
	fn test_clear_removes_all_mappings() {
		let mut registry = MapperRegistry::new();
		registry
			.define::<Order>("orders", |m| {
				m.transform(|_| row! {});
			})
			.unwrap();

		registry.clear();

		let gateway = RecordingGateway::new();
		let error = registry.sync(&gateway, &Order { id: 1, total: 0.0 }).unwrap_err();
		assert!(matches!(error, SeedingError::NoMappingDefined(_)));
	}

	#[rstest]
	#[serial]
	fn test_process_wide_mapper_lifecycle() {
		clear_mappings();

		define_mapping::<Order>("orders", |m| {
			m.transform(|order| row! { "id" => order.id });
		})
		.unwrap();

		let gateway = RecordingGateway::new();
		sync(&gateway, &Order { id: 1, total: 0.0 }).unwrap();
		assert_eq!(gateway.call_count(), 1);

		clear_mappings();
		let error = sync(&gateway, &Order { id: 2, total: 0.0 }).unwrap_err();
		assert!(matches!(error, SeedingError::NoMappingDefined(_)));
	}
}
