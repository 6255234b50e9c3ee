//! Raw SQL escape hatches.
//!
//! The checked variants only accept a [`BoxedSqlQuery`], so user values can
//! only reach the statement through `.bind()`. The `_unsafe` variants take a
//! plain SQL string and must never be fed unsanitised input.

use diesel::{
	connection::SimpleConnection,
	pg::Pg,
	prelude::*,
	query_builder::{BoxedSqlQuery, SqlQuery},
	query_dsl::LoadQuery,
};

use crate::error::DbResult;

pub type RawQuery<'f> = BoxedSqlQuery<'f, Pg, SqlQuery>;

pub fn query<'f, T>(conn: &mut PgConnection, query: RawQuery<'f>) -> DbResult<Vec<T>>
where
	RawQuery<'f>: for<'c> LoadQuery<'c, PgConnection, T>,
{
	log::debug!("raw query: {}", diesel::debug_query::<Pg, _>(&query));
	Ok(query.load::<T>(conn)?)
}

pub fn execute(conn: &mut PgConnection, query: RawQuery<'_>) -> DbResult<usize> {
	log::debug!("raw execute: {}", diesel::debug_query::<Pg, _>(&query));
	Ok(query.execute(conn)?)
}

pub fn query_unsafe<T>(conn: &mut PgConnection, sql: &str) -> DbResult<Vec<T>>
where
	SqlQuery: for<'c> LoadQuery<'c, PgConnection, T>,
{
	log::warn!("unchecked raw query: {}", sql);
	Ok(diesel::sql_query(sql).load::<T>(conn)?)
}

/// Runs one or more `;`-separated statements without binds.
pub fn execute_unsafe(conn: &mut PgConnection, sql: &str) -> DbResult<()> {
	log::warn!("unchecked raw execute: {}", sql);
	Ok(conn.batch_execute(sql)?)
}
