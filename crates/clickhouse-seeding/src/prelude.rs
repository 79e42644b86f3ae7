//! Convenience re-exports for common usage.
//!
//! A single import for the items most suites touch:
//!
//! ```
//! use clickhouse_seeding::prelude::*;
//! ```

pub use crate::config::{Configuration, configuration, configure, reset_configuration};
pub use crate::error::{SeedingError, SeedingResult};
pub use crate::factory::{
	Factory, FactoryBuilder, FactoryRegistry, TraitBuilder, clear_factories, define_factory,
	find_factory,
};
pub use crate::gateway::{HttpGateway, InsertGateway, RecordedInsert, RecordingGateway};
pub use crate::helpers::{build, create, create_list};
pub use crate::mapper::{
	MapperRegistry, MappingBuilder, bulk_sync, clear_mappings, define_mapping, sync,
};
pub use crate::row;
pub use crate::sequence::Sequence;
pub use crate::value::{Row, Value};
