//! Factory-based test data seeding for ClickHouse.
//!
//! This crate generates deterministic, uniquely-keyed test rows for a
//! ClickHouse database without hand-written INSERT statements:
//!
//! - **Factories**: named row templates with sequences, computed
//!   attributes, trait overlays, overrides and `after_create` callbacks
//! - **Model mappings**: convert application structs into rows by type
//!   identity and sync them into their tables
//! - **Gateways**: render rows into INSERT statements and push them over
//!   ClickHouse's HTTP interface, or record them in memory for assertions
//!
//! Row construction stays decoupled from the storage layer: factories and
//! mappers operate on raw typed [`Value`]s, and encoding into statement
//! literals happens only inside the gateway.
//!
//! # Quick Start
//!
//! ```
//! use clickhouse_seeding::prelude::*;
//!
//! define_factory("user", "users", |f| {
//! 	f.sequence("id");
//! 	f.set("name", "User");
//! 	f.set_computed("email", |attrs| {
//! 		Value::from(format!("user{}@example.com", attrs["id"].as_i64().unwrap_or(0)))
//! 	});
//! 	f.define_trait("admin", |t| {
//! 		t.set("role", "admin");
//! 	});
//! });
//!
//! let gateway = RecordingGateway::new();
//! let user = create(&gateway, "user", &[], row! {}).unwrap();
//! let admin = create(&gateway, "user", &["admin"], row! { "name" => "Root" }).unwrap();
//!
//! assert_eq!(user["id"], Value::Int(1));
//! assert_eq!(admin["role"], Value::from("admin"));
//! assert_eq!(gateway.call_count(), 2);
//! # clear_factories();
//! ```
//!
//! # Mirroring application models
//!
//! ```
//! use clickhouse_seeding::prelude::*;
//!
//! struct PageView {
//! 	user_id: i64,
//! 	path: String,
//! }
//!
//! define_mapping::<PageView>("page_views", |m| {
//! 	m.transform(|view| {
//! 		row! { "user_id" => view.user_id, "path" => view.path.clone() }
//! 	});
//! })
//! .unwrap();
//!
//! let gateway = RecordingGateway::new();
//! let view = PageView { user_id: 1, path: "/pricing".to_string() };
//! sync(&gateway, &view).unwrap();
//! # clear_mappings();
//! ```
//!
//! # Parallel test workers
//!
//! Registries and sequences are process-wide state with no cross-process
//! coordination: run parallel suites as separate processes, each configured
//! with its own database (`test_database_prefix` + `TEST_ENV_NUMBER`).

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod factory;
pub mod gateway;
pub mod helpers;
pub mod mapper;
pub mod prelude;
pub mod sequence;
pub mod value;

pub use config::{Configuration, configuration, configure, reset_configuration};
pub use error::{SeedingError, SeedingResult};
pub use factory::{
	Factory, FactoryBuilder, FactoryRegistry, TraitBuilder, clear_factories, define_factory,
	find_factory,
};
pub use gateway::{HttpGateway, InsertGateway, RecordedInsert, RecordingGateway};
pub use helpers::{build, create, create_list};
pub use mapper::{
	MapperRegistry, MappingBuilder, bulk_sync, clear_mappings, define_mapping, sync,
};
pub use sequence::Sequence;
pub use value::{Row, Value};
