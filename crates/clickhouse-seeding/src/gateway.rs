//! Insert gateways: the boundary where rows become INSERT statements.
//!
//! Factories and mappers hand raw typed rows to an [`InsertGateway`]; only
//! here are values rendered into statement literals via [`Value::to_sql`].
//! [`HttpGateway`] talks to ClickHouse's HTTP interface; [`RecordingGateway`]
//! captures calls in memory for assertions.

use parking_lot::Mutex;
use tracing::debug;

use crate::config::{self, Configuration};
use crate::error::{SeedingError, SeedingResult};
use crate::value::{Row, Value};

/// Destination for resolved rows.
///
/// Implementations perform the actual write. Failures surface as
/// [`SeedingError::GatewayFailure`] and are never retried by the engine;
/// retry policy, if any, belongs to the transport.
pub trait InsertGateway: Send + Sync {
	/// Inserts a single row.
	fn insert_one(&self, table: &str, row: &Row) -> SeedingResult<()>;

	/// Inserts a batch of rows in one statement. No-op on an empty batch.
	fn insert_many(&self, table: &str, rows: &[Row]) -> SeedingResult<()>;
}

/// Renders a single-row INSERT statement.
///
/// # Examples
///
/// ```
/// use clickhouse_seeding::gateway::insert_statement;
/// use clickhouse_seeding::row;
///
/// let sql = insert_statement("users", &row! { "id" => 1, "name" => "Alice" });
/// assert_eq!(sql, "INSERT INTO users (id, name) VALUES (1, 'Alice')");
/// ```
pub fn insert_statement(table: &str, row: &Row) -> String {
	let columns = row.keys().cloned().collect::<Vec<_>>().join(", ");
	let values = row.values().map(Value::to_sql).collect::<Vec<_>>().join(", ");
	format!("INSERT INTO {table} ({columns}) VALUES ({values})")
}

/// Renders a multi-row INSERT statement, or `None` for an empty batch.
///
/// The column list comes from the first row; batches are expected to be
/// uniformly shaped, which factory-built rows always are.
pub fn bulk_insert_statement(table: &str, rows: &[Row]) -> Option<String> {
	let first = rows.first()?;
	let columns = first.keys().cloned().collect::<Vec<_>>().join(", ");
	let values = rows
		.iter()
		.map(|row| {
			let row_values = row.values().map(Value::to_sql).collect::<Vec<_>>().join(", ");
			format!("({row_values})")
		})
		.collect::<Vec<_>>()
		.join(", ");
	Some(format!("INSERT INTO {table} ({columns}) VALUES {values}"))
}

/// Blocking gateway for ClickHouse's HTTP interface.
///
/// Statements are POSTed as the request body with basic auth and, when a
/// database is configured, a `database` query parameter. The per-worker
/// test database name takes precedence over the plain database name.
pub struct HttpGateway {
	client: reqwest::blocking::Client,
	url: String,
	username: String,
	password: String,
	database: Option<String>,
}

impl HttpGateway {
	/// Creates a gateway from the process-wide configuration.
	pub fn new() -> Self {
		Self::from_config(&config::configuration())
	}

	/// Creates a gateway from an explicit configuration.
	pub fn from_config(config: &Configuration) -> Self {
		Self {
			client: reqwest::blocking::Client::new(),
			url: config.url.clone(),
			username: config.username.clone(),
			password: config.password.clone(),
			database: config.test_database_name(),
		}
	}

	fn execute(&self, sql: &str) -> SeedingResult<()> {
		debug!("executing: {sql}");
		let mut request = self
			.client
			.post(&self.url)
			.basic_auth(&self.username, Some(&self.password))
			.body(sql.to_string());
		if let Some(database) = &self.database {
			request = request.query(&[("database", database)]);
		}
		let response = request
			.send()
			.map_err(|error| SeedingError::GatewayFailure(error.to_string()))?;
		let status = response.status();
		if status.is_success() {
			Ok(())
		} else {
			let body = response.text().unwrap_or_default();
			Err(SeedingError::GatewayFailure(format!("{status}: {body}")))
		}
	}
}

impl InsertGateway for HttpGateway {
	fn insert_one(&self, table: &str, row: &Row) -> SeedingResult<()> {
		self.execute(&insert_statement(table, row))
	}

	fn insert_many(&self, table: &str, rows: &[Row]) -> SeedingResult<()> {
		match bulk_insert_statement(table, rows) {
			Some(sql) => self.execute(&sql),
			None => Ok(()),
		}
	}
}

impl Default for HttpGateway {
	fn default() -> Self {
		Self::new()
	}
}

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedInsert {
	/// Target table of the call.
	pub table: String,
	/// Rows passed to the call.
	pub rows: Vec<Row>,
}

/// In-memory gateway that records calls instead of writing.
///
/// # Examples
///
/// ```
/// use clickhouse_seeding::{InsertGateway, RecordingGateway, row};
///
/// let gateway = RecordingGateway::new();
/// gateway.insert_one("users", &row! { "id" => 1 }).unwrap();
/// assert_eq!(gateway.call_count(), 1);
/// ```
#[derive(Default)]
pub struct RecordingGateway {
	inserts: Mutex<Vec<RecordedInsert>>,
}

impl RecordingGateway {
	/// Creates an empty recorder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the recorded calls in order.
	pub fn inserts(&self) -> Vec<RecordedInsert> {
		self.inserts.lock().clone()
	}

	/// Returns the number of gateway calls recorded.
	pub fn call_count(&self) -> usize {
		self.inserts.lock().len()
	}

	/// Returns every recorded row across all calls, in order.
	pub fn rows(&self) -> Vec<Row> {
		self.inserts
			.lock()
			.iter()
			.flat_map(|insert| insert.rows.clone())
			.collect()
	}
}

impl InsertGateway for RecordingGateway {
	fn insert_one(&self, table: &str, row: &Row) -> SeedingResult<()> {
		self.inserts.lock().push(RecordedInsert {
			table: table.to_string(),
			rows: vec![row.clone()],
		});
		Ok(())
	}

	fn insert_many(&self, table: &str, rows: &[Row]) -> SeedingResult<()> {
		if rows.is_empty() {
			return Ok(());
		}
		self.inserts.lock().push(RecordedInsert {
			table: table.to_string(),
			rows: rows.to_vec(),
		});
		Ok(())
	}
}
