use diesel::{
	prelude::*,
	r2d2::{self, ConnectionManager},
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::{
	config::DbConfig,
	error::{DbError, DbResult},
};

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Builds a pool without opening any connection; the first checkout connects.
pub fn build_pool(config: &DbConfig) -> DbPool {
	let manager = ConnectionManager::<PgConnection>::new(config.database_url.as_str());
	r2d2::Pool::builder()
		.max_size(config.pool_size)
		.connection_timeout(config.connect_timeout)
		.test_on_check_out(true)
		.build_unchecked(manager)
}

pub fn run_migrations(conn: &mut PgConnection) -> DbResult<usize> {
	let applied = conn
		.run_pending_migrations(MIGRATIONS)
		.map_err(|e| DbError::Initialization(format!("migration failed: {}", e)))?;
	for version in &applied {
		log::info!("Applied migration {}", version);
	}
	Ok(applied.len())
}
