//! Process-wide configuration.
//!
//! Connection coordinates and factory-system defaults, with environment
//! variable fallbacks so CI hosts can point a suite at their ClickHouse
//! instance without code changes. Parallel test workers get their own
//! database via `test_database_prefix` + `TEST_ENV_NUMBER`.

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::value::Row;

/// Seeding configuration for one test process.
#[derive(Debug, Clone)]
pub struct Configuration {
	/// ClickHouse HTTP endpoint (`CLICKHOUSE_URL`, default `http://localhost:8123`).
	pub url: String,
	/// HTTP basic-auth user (`CLICKHOUSE_USERNAME`, default `default`).
	pub username: String,
	/// HTTP basic-auth password (`CLICKHOUSE_PASSWORD`, default empty).
	pub password: String,
	/// Target database. `None` sends statements without a database parameter.
	pub database_name: Option<String>,
	/// Prefix for per-worker test databases.
	pub test_database_prefix: Option<String>,
	/// Attributes merged into every factory build before the factory's own
	/// rules apply.
	pub factory_defaults: Row,
	/// Default starting value for `sequence` attributes.
	pub sequence_start: i64,
}

impl Default for Configuration {
	fn default() -> Self {
		Self {
			url: env_or("CLICKHOUSE_URL", "http://localhost:8123"),
			username: env_or("CLICKHOUSE_USERNAME", "default"),
			password: env_or("CLICKHOUSE_PASSWORD", ""),
			database_name: None,
			test_database_prefix: None,
			factory_defaults: Row::new(),
			sequence_start: 1,
		}
	}
}

impl Configuration {
	/// Database name for the current test worker.
	///
	/// With a `test_database_prefix` set, appends `TEST_ENV_NUMBER` so each
	/// parallel worker writes to its own database; otherwise falls back to
	/// `database_name`.
	pub fn test_database_name(&self) -> Option<String> {
		let Some(prefix) = &self.test_database_prefix else {
			return self.database_name.clone();
		};
		let worker = std::env::var("TEST_ENV_NUMBER").unwrap_or_default();
		Some(format!("{prefix}{worker}"))
	}
}

fn env_or(key: &str, default: &str) -> String {
	std::env::var(key).unwrap_or_else(|_| default.to_string())
}

static CONFIGURATION: Lazy<RwLock<Configuration>> =
	Lazy::new(|| RwLock::new(Configuration::default()));

/// Mutates the process-wide configuration.
///
/// # Example
///
/// ```ignore
/// clickhouse_seeding::configure(|config| {
/// 	config.database_name = Some("analytics_test".to_string());
/// 	config.sequence_start = 1000;
/// });
/// ```
pub fn configure(f: impl FnOnce(&mut Configuration)) {
	f(&mut CONFIGURATION.write());
}

/// Returns a snapshot of the process-wide configuration.
pub fn configuration() -> Configuration {
	CONFIGURATION.read().clone()
}

/// Restores the default configuration.
///
/// This is primarily useful for testing.
pub fn reset_configuration() {
	*CONFIGURATION.write() = Configuration::default();
}
