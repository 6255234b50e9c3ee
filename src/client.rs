use std::{
	sync::{Arc, RwLock},
	time::Duration,
};

use diesel::{
	connection::SimpleConnection,
	prelude::*,
	query_builder::SqlQuery,
	query_dsl::LoadQuery,
	r2d2::{ConnectionManager, PooledConnection},
};
use serde::{Deserialize, Serialize};

use crate::{
	config::DbConfig,
	db::{self, DbPool},
	error::{DbError, DbResult},
	raw::{self, RawQuery},
	repo::{
		ActionConfigurationDelegate, ActionSymbolDelegate, GenerationHistoryDelegate,
		MultimediaApiConfigDelegate, QuickStoryboardConfigDelegate, SymbolDelegate,
		TransactionDelegate, UserDelegate,
	},
};

pub type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// One unit of work inside [`Client::batch`].
pub type BatchOp<T> = Box<dyn FnOnce(&mut PgConnection) -> DbResult<T> + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IsolationLevel {
	ReadCommitted,
	RepeatableRead,
	Serializable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionOptions {
	pub isolation_level: Option<IsolationLevel>,
	pub read_only: bool,
	/// Applied as `statement_timeout` for the duration of the transaction.
	pub timeout: Option<Duration>,
}

/// Entry point to the data layer. Cloning is cheap and every clone shares
/// the same pool.
///
/// The pool is created lazily: constructing a client never touches the
/// database, and after [`disconnect`](Client::disconnect) the next operation
/// transparently builds a fresh pool.
#[derive(Clone)]
pub struct Client {
	inner: Arc<Inner>,
}

struct Inner {
	config: DbConfig,
	pool: RwLock<Option<DbPool>>,
}

impl Client {
	pub fn new(config: DbConfig) -> Self {
		Self { inner: Arc::new(Inner { config, pool: RwLock::new(None) }) }
	}

	pub fn from_env() -> DbResult<Self> {
		let config = DbConfig::from_env().map_err(|e| DbError::Initialization(e.to_string()))?;
		Ok(Self::new(config))
	}

	pub fn config(&self) -> &DbConfig {
		&self.inner.config
	}

	/// Opens a connection eagerly and applies pending migrations when
	/// configured to. Safe to call more than once.
	pub fn connect(&self) -> DbResult<()> {
		let mut conn = self.connection().map_err(|e| match e {
			DbError::Pool(e) => DbError::Initialization(e.to_string()),
			other => other,
		})?;
		if self.inner.config.run_migrations {
			let applied = db::run_migrations(&mut conn)?;
			log::info!("Database ready, {} migration(s) applied", applied);
		} else {
			log::info!("Database ready");
		}
		Ok(())
	}

	/// Drops the pool and every idle connection in it.
	pub fn disconnect(&self) -> DbResult<()> {
		let mut pool = self.inner.pool.write().map_err(|e| DbError::Panic(e.to_string()))?;
		if pool.take().is_some() {
			log::info!("Database pool closed");
		}
		Ok(())
	}

	pub fn is_connected(&self) -> bool {
		self.inner.pool.read().map(|pool| pool.is_some()).unwrap_or(false)
	}

	fn pool(&self) -> DbResult<DbPool> {
		{
			let pool = self.inner.pool.read().map_err(|e| DbError::Panic(e.to_string()))?;
			if let Some(pool) = pool.as_ref() {
				return Ok(pool.clone());
			}
		}
		let mut pool = self.inner.pool.write().map_err(|e| DbError::Panic(e.to_string()))?;
		let pool = pool.get_or_insert_with(|| {
			log::debug!("Building database pool (max_size={})", self.inner.config.pool_size);
			db::build_pool(&self.inner.config)
		});
		Ok(pool.clone())
	}

	pub fn connection(&self) -> DbResult<PooledConn> {
		Ok(self.pool()?.get()?)
	}

	/// Runs `f` on a pooled connection, blocking the calling thread.
	pub fn with_connection<T, F>(&self, f: F) -> DbResult<T>
	where
		F: FnOnce(&mut PgConnection) -> DbResult<T>,
	{
		let mut conn = self.connection()?;
		f(&mut *conn)
	}

	/// Runs `f` on a pooled connection from the blocking thread pool.
	pub async fn run<T, F>(&self, f: F) -> DbResult<T>
	where
		F: FnOnce(&mut PgConnection) -> DbResult<T> + Send + 'static,
		T: Send + 'static,
	{
		let pool = self.pool()?;
		tokio::task::spawn_blocking(move || {
			let mut conn = pool.get()?;
			f(&mut *conn)
		})
		.await
		.map_err(|e| DbError::Panic(e.to_string()))?
	}

	/// Runs `f` inside a transaction that commits when `f` returns `Ok`.
	pub fn transaction<T, F>(&self, f: F) -> DbResult<T>
	where
		F: FnOnce(&mut PgConnection) -> DbResult<T>,
	{
		self.with_connection(|conn| conn.transaction(f))
	}

	pub fn transaction_with<T, F>(&self, options: TransactionOptions, f: F) -> DbResult<T>
	where
		F: FnOnce(&mut PgConnection) -> DbResult<T>,
	{
		self.with_connection(|conn| {
			let builder = conn.build_transaction();
			let builder = match options.isolation_level {
				Some(IsolationLevel::ReadCommitted) => builder.read_committed(),
				Some(IsolationLevel::RepeatableRead) => builder.repeatable_read(),
				Some(IsolationLevel::Serializable) => builder.serializable(),
				None => builder,
			};
			let mut builder = if options.read_only { builder.read_only() } else { builder };
			builder.run(|conn| {
				if let Some(timeout) = options.timeout {
					conn.batch_execute(&format!(
						"SET LOCAL statement_timeout = {}",
						timeout.as_millis()
					))?;
				}
				f(conn)
			})
		})
	}

	/// Runs every operation in order inside one transaction. The first error
	/// rolls back all of them.
	pub fn batch<T>(&self, ops: Vec<BatchOp<T>>) -> DbResult<Vec<T>> {
		log::debug!("Running batch of {} operation(s)", ops.len());
		self.transaction(|conn| {
			let mut results = Vec::with_capacity(ops.len());
			for op in ops {
				results.push(op(conn)?);
			}
			Ok(results)
		})
	}

	pub fn query_raw<'f, T>(&self, query: RawQuery<'f>) -> DbResult<Vec<T>>
	where
		RawQuery<'f>: for<'c> LoadQuery<'c, PgConnection, T>,
	{
		self.with_connection(|conn| raw::query(conn, query))
	}

	pub fn execute_raw(&self, query: RawQuery<'_>) -> DbResult<usize> {
		self.with_connection(|conn| raw::execute(conn, query))
	}

	pub fn query_raw_unsafe<T>(&self, sql: &str) -> DbResult<Vec<T>>
	where
		SqlQuery: for<'c> LoadQuery<'c, PgConnection, T>,
	{
		self.with_connection(|conn| raw::query_unsafe(conn, sql))
	}

	pub fn execute_raw_unsafe(&self, sql: &str) -> DbResult<()> {
		self.with_connection(|conn| raw::execute_unsafe(conn, sql))
	}

	pub fn users(&self) -> UserDelegate<'_> {
		UserDelegate::new(self)
	}

	pub fn transactions(&self) -> TransactionDelegate<'_> {
		TransactionDelegate::new(self)
	}

	pub fn symbols(&self) -> SymbolDelegate<'_> {
		SymbolDelegate::new(self)
	}

	pub fn quick_storyboard_configs(&self) -> QuickStoryboardConfigDelegate<'_> {
		QuickStoryboardConfigDelegate::new(self)
	}

	pub fn generation_histories(&self) -> GenerationHistoryDelegate<'_> {
		GenerationHistoryDelegate::new(self)
	}

	pub fn action_symbols(&self) -> ActionSymbolDelegate<'_> {
		ActionSymbolDelegate::new(self)
	}

	pub fn action_configurations(&self) -> ActionConfigurationDelegate<'_> {
		ActionConfigurationDelegate::new(self)
	}

	pub fn multimedia_api_configs(&self) -> MultimediaApiConfigDelegate<'_> {
		MultimediaApiConfigDelegate::new(self)
	}
}
