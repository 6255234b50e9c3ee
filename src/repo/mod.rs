//! One repository per model. Every repository exposes the same set of
//! operations, generated by [`delegate!`], operating on a borrowed
//! `PgConnection` so they compose inside transactions; the matching
//! `*Delegate` type runs the same operations against a [`Client`] pool.
//!
//! [`Client`]: crate::client::Client

pub mod action_configuration;
pub mod action_symbol;
pub mod generation_history;
pub mod multimedia_api_config;
pub mod quick_storyboard_config;
pub mod symbol;
pub mod transaction;
pub mod user;

pub use action_configuration::*;
pub use action_symbol::*;
pub use generation_history::*;
pub use multimedia_api_config::*;
pub use quick_storyboard_config::*;
pub use symbol::*;
pub use transaction::*;
pub use user::*;

/// Insert payloads. Models keyed by a string id get a UUIDv4 when the caller
/// leaves it empty.
pub trait CreateInput: Clone {
	fn assign_id(&mut self) {}
}

/// Update payloads.
pub trait UpdateInput: Clone {
	/// Stamps `updated_at` on models that track it.
	fn touch(&mut self) {}

	/// True when applying the update would change nothing.
	fn is_empty(&self) -> bool;
}

pub(crate) fn new_id() -> String {
	uuid::Uuid::new_v4().to_string()
}

/// Generates the field enum, the find-many argument alias, the repository
/// and the client delegate for one model.
///
/// The invoking module must have `diesel::prelude::*` in scope.
macro_rules! delegate {
	(
		model: $model:literal,
		table: $table:ident,
		row: $row:ident,
		create: $create:ident,
		update: $update:ident,
		filter: $filter:ident,
		unique: $unique:ident,
		args: $args:ident,
		field: $field:ident {
			$( $(#[$variant_meta:meta])* $variant:ident => $column:ident : $ty:ty ),+ $(,)?
		},
		primary_key: $pk:ident,
		repo: $repo:ident,
		delegate: $delegate:ident $(,)?
	) => {
		/// Scalar fields usable for ordering, cursors, `distinct` and grouping.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
		#[serde(rename_all = "camelCase")]
		pub enum $field {
			$( $(#[$variant_meta])* $variant ),+
		}

		impl $field {
			pub const ALL: &'static [$field] = &[$( $field::$variant ),+];

			/// The SQL column backing this field.
			pub fn column_name(self) -> &'static str {
				match self {
					$( $field::$variant => <$table::$column as diesel::Column>::NAME ),+
				}
			}
		}

		pub type $args = $crate::query::FindManyArgs<$filter, $field, $unique>;

		pub struct $repo;

		impl $repo {
			pub const MODEL: &'static str = $model;

			pub(crate) fn condition_of(
				filter: Option<&$filter>,
			) -> $crate::query::BoxedCondition<$table::table> {
				match filter {
					Some(filter) => $crate::query::Filter::condition(filter),
					None => $crate::query::all_of!(
						$table,
						Vec::<$crate::query::BoxedCondition<$table::table>>::new()
					),
				}
			}

			fn field_value(row: &$row, field: $field) -> serde_json::Value {
				match field {
					$( $field::$variant => serde_json::to_value(&row.$column).unwrap_or_default() ),+
				}
			}

			fn field_equals(
				row: &$row,
				field: $field,
			) -> $crate::query::BoxedCondition<$table::table> {
				let condition: $crate::query::BoxedCondition<$table::table> = match field {
					$( $field::$variant => Box::new($table::$column.eq(row.$column.clone())) ),+
				};
				condition
			}

			fn field_beyond(
				row: &$row,
				key: $crate::query::OrderBy<$field>,
			) -> $crate::query::BoxedCondition<$table::table> {
				use $crate::query::SortOrder;
				let condition: $crate::query::BoxedCondition<$table::table> = match key.field {
					$( $field::$variant => match key.order {
						SortOrder::Asc => Box::new($table::$column.gt(row.$column.clone())),
						SortOrder::Desc => Box::new($table::$column.lt(row.$column.clone())),
					} ),+
				};
				condition
			}

			fn apply_order(
				query: $table::BoxedQuery<'static, diesel::pg::Pg>,
				key: $crate::query::OrderBy<$field>,
			) -> $table::BoxedQuery<'static, diesel::pg::Pg> {
				use $crate::query::SortOrder;
				match key.field {
					$( $field::$variant => match key.order {
						SortOrder::Asc => query.then_order_by($table::$column.asc()),
						SortOrder::Desc => query.then_order_by($table::$column.desc()),
					} ),+
				}
			}

			/// The requested ordering followed by the primary key, flipped when
			/// paging backwards.
			pub(crate) fn effective_order(
				order_by: &[$crate::query::OrderBy<$field>],
				backwards: bool,
			) -> Vec<$crate::query::OrderBy<$field>> {
				let mut order = order_by.to_vec();
				if !order.iter().any(|key| key.field == $field::$pk) {
					order.push($crate::query::OrderBy::asc($field::$pk));
				}
				if backwards {
					order = order.into_iter().map($crate::query::OrderBy::reversed).collect();
				}
				order
			}

			/// Rows at or after `anchor` under `order`, which ends with the primary key.
			fn from_cursor(
				anchor: &$row,
				order: &[$crate::query::OrderBy<$field>],
			) -> $crate::query::BoxedCondition<$table::table> {
				let mut branches: Vec<$crate::query::BoxedCondition<$table::table>> =
					Vec::with_capacity(order.len() + 1);
				for (position, key) in order.iter().enumerate() {
					let mut parts: Vec<$crate::query::BoxedCondition<$table::table>> = order
						[..position]
						.iter()
						.map(|prior| Self::field_equals(anchor, prior.field))
						.collect();
					parts.push(Self::field_beyond(anchor, *key));
					branches.push($crate::query::all_of!($table, parts));
				}
				branches.push(Self::field_equals(anchor, $field::$pk));
				$crate::query::any_of!($table, branches)
			}

			fn load_page(
				conn: &mut diesel::PgConnection,
				args: &$args,
				take: Option<i64>,
			) -> $crate::error::DbResult<Vec<$row>> {
				args.validate()?;
				if take == Some(0) {
					return Ok(Vec::new());
				}
				let backwards = take.is_some_and(|take| take < 0);
				let order = Self::effective_order(&args.order_by, backwards);

				let mut query: $table::BoxedQuery<'static, diesel::pg::Pg> = $table::table.into_boxed();
				if let Some(filter) = &args.filter {
					query = query.filter($crate::query::Filter::condition(filter));
				}
				if let Some(cursor) = &args.cursor {
					let Some(anchor) = Self::find_unique(conn, cursor)? else {
						return Ok(Vec::new());
					};
					query = query.filter(Self::from_cursor(&anchor, &order));
				}
				for key in &order {
					query = Self::apply_order(query, *key);
				}

				let mut rows: Vec<$row> = if args.distinct.is_empty() {
					if let Some(skip) = args.skip {
						query = query.offset(skip);
					}
					if let Some(take) = take {
						query = query.limit(take.saturating_abs());
					}
					query.load::<$row>(conn)?
				} else {
					let mut seen = std::collections::HashSet::new();
					let skip = args.skip.and_then(|skip| usize::try_from(skip).ok()).unwrap_or(0);
					let limit = take
						.and_then(|take| usize::try_from(take.unsigned_abs()).ok())
						.unwrap_or(usize::MAX);
					query
						.load::<$row>(conn)?
						.into_iter()
						.filter(|row| {
							let key: Vec<serde_json::Value> =
								args.distinct.iter().map(|field| Self::field_value(row, *field)).collect();
							seen.insert(serde_json::Value::Array(key).to_string())
						})
						.skip(skip)
						.take(limit)
						.collect()
				};
				if backwards {
					rows.reverse();
				}
				Ok(rows)
			}

			pub fn find_unique(
				conn: &mut diesel::PgConnection,
				key: &$unique,
			) -> $crate::error::DbResult<Option<$row>> {
				log::debug!("{}.find_unique {:?}", $model, key);
				Ok($table::table
					.filter($crate::query::Filter::condition(key))
					.first::<$row>(conn)
					.optional()?)
			}

			pub fn find_unique_or_throw(
				conn: &mut diesel::PgConnection,
				key: &$unique,
			) -> $crate::error::DbResult<$row> {
				Self::find_unique(conn, key)?
					.ok_or_else(|| $crate::error::DbError::not_found($model))
			}

			pub fn find_first(
				conn: &mut diesel::PgConnection,
				args: &$args,
			) -> $crate::error::DbResult<Option<$row>> {
				log::debug!("{}.find_first", $model);
				let take = if args.is_backwards() { -1 } else { 1 };
				Ok(Self::load_page(conn, args, Some(take))?.into_iter().next())
			}

			pub fn find_first_or_throw(
				conn: &mut diesel::PgConnection,
				args: &$args,
			) -> $crate::error::DbResult<$row> {
				Self::find_first(conn, args)?
					.ok_or_else(|| $crate::error::DbError::not_found($model))
			}

			pub fn find_many(
				conn: &mut diesel::PgConnection,
				args: &$args,
			) -> $crate::error::DbResult<Vec<$row>> {
				log::debug!("{}.find_many take={:?} skip={:?}", $model, args.take, args.skip);
				Self::load_page(conn, args, args.take)
			}

			pub fn count(
				conn: &mut diesel::PgConnection,
				filter: Option<&$filter>,
			) -> $crate::error::DbResult<i64> {
				Ok($table::table
					.filter(Self::condition_of(filter))
					.select(diesel::dsl::count_star())
					.get_result::<i64>(conn)?)
			}

			pub fn create(
				conn: &mut diesel::PgConnection,
				data: &$create,
			) -> $crate::error::DbResult<$row> {
				log::debug!("{}.create", $model);
				let mut data = data.clone();
				$crate::repo::CreateInput::assign_id(&mut data);
				Ok(diesel::insert_into($table::table).values(&data).get_result::<$row>(conn)?)
			}

			fn prepare_rows(data: &[$create]) -> Vec<$create> {
				data.iter()
					.cloned()
					.map(|mut row| {
						$crate::repo::CreateInput::assign_id(&mut row);
						row
					})
					.collect()
			}

			/// Inserts every row in one statement. With `skip_duplicates`,
			/// conflicting rows are ignored and excluded from the count.
			pub fn create_many(
				conn: &mut diesel::PgConnection,
				data: &[$create],
				skip_duplicates: bool,
			) -> $crate::error::DbResult<usize> {
				log::debug!("{}.create_many rows={}", $model, data.len());
				if data.is_empty() {
					return Ok(0);
				}
				let rows = Self::prepare_rows(data);
				let statement = diesel::insert_into($table::table).values(&rows);
				let inserted = if skip_duplicates {
					statement.on_conflict_do_nothing().execute(conn)?
				} else {
					statement.execute(conn)?
				};
				Ok(inserted)
			}

			pub fn create_many_and_return(
				conn: &mut diesel::PgConnection,
				data: &[$create],
				skip_duplicates: bool,
			) -> $crate::error::DbResult<Vec<$row>> {
				log::debug!("{}.create_many_and_return rows={}", $model, data.len());
				if data.is_empty() {
					return Ok(Vec::new());
				}
				let rows = Self::prepare_rows(data);
				let statement = diesel::insert_into($table::table).values(&rows);
				let inserted = if skip_duplicates {
					statement.on_conflict_do_nothing().get_results::<$row>(conn)?
				} else {
					statement.get_results::<$row>(conn)?
				};
				Ok(inserted)
			}

			pub fn update(
				conn: &mut diesel::PgConnection,
				key: &$unique,
				data: &$update,
			) -> $crate::error::DbResult<$row> {
				log::debug!("{}.update {:?}", $model, key);
				let mut data = data.clone();
				$crate::repo::UpdateInput::touch(&mut data);
				if $crate::repo::UpdateInput::is_empty(&data) {
					return Self::find_unique_or_throw(conn, key);
				}
				diesel::update($table::table.filter($crate::query::Filter::condition(key)))
					.set(&data)
					.get_result::<$row>(conn)
					.optional()?
					.ok_or_else(|| $crate::error::DbError::not_found($model))
			}

			pub fn update_many(
				conn: &mut diesel::PgConnection,
				filter: Option<&$filter>,
				data: &$update,
			) -> $crate::error::DbResult<usize> {
				log::debug!("{}.update_many", $model);
				let mut data = data.clone();
				$crate::repo::UpdateInput::touch(&mut data);
				if $crate::repo::UpdateInput::is_empty(&data) {
					let matched = Self::count(conn, filter)?;
					return Ok(usize::try_from(matched).unwrap_or_default());
				}
				Ok(diesel::update($table::table.filter(Self::condition_of(filter)))
					.set(&data)
					.execute(conn)?)
			}

			/// Updates the row matching `key`, or creates it from `create`.
			pub fn upsert(
				conn: &mut diesel::PgConnection,
				key: &$unique,
				create: &$create,
				update: &$update,
			) -> $crate::error::DbResult<$row> {
				log::debug!("{}.upsert {:?}", $model, key);
				conn.transaction(|conn| match Self::find_unique(conn, key)? {
					Some(_) => Self::update(conn, key, update),
					None => Self::create(conn, create),
				})
			}

			pub fn delete(
				conn: &mut diesel::PgConnection,
				key: &$unique,
			) -> $crate::error::DbResult<$row> {
				log::debug!("{}.delete {:?}", $model, key);
				diesel::delete($table::table.filter($crate::query::Filter::condition(key)))
					.get_result::<$row>(conn)
					.optional()?
					.ok_or_else(|| $crate::error::DbError::not_found($model))
			}

			pub fn delete_many(
				conn: &mut diesel::PgConnection,
				filter: Option<&$filter>,
			) -> $crate::error::DbResult<usize> {
				log::debug!("{}.delete_many", $model);
				Ok(diesel::delete($table::table.filter(Self::condition_of(filter))).execute(conn)?)
			}

			/// Row count and `created_at` range of the matching rows.
			pub fn aggregate(
				conn: &mut diesel::PgConnection,
				filter: Option<&$filter>,
			) -> $crate::error::DbResult<$crate::query::CountAggregate> {
				use diesel::dsl::{count_star, max, min};
				let (count, created_at_min, created_at_max) = $table::table
					.filter(Self::condition_of(filter))
					.select((count_star(), min($table::created_at), max($table::created_at)))
					.get_result::<(
						i64,
						Option<chrono::DateTime<chrono::Utc>>,
						Option<chrono::DateTime<chrono::Utc>>,
					)>(conn)?;
				Ok($crate::query::CountAggregate { count, created_at_min, created_at_max })
			}

			/// Row counts per distinct value of `by`, ordered by that value.
			pub fn group_by(
				conn: &mut diesel::PgConnection,
				by: $field,
				filter: Option<&$filter>,
			) -> $crate::error::DbResult<Vec<$crate::query::GroupCount>> {
				log::debug!("{}.group_by {:?}", $model, by);
				let condition = Self::condition_of(filter);
				let groups = match by {
					$( $field::$variant => $table::table
						.filter(condition)
						.group_by($table::$column)
						.select(($table::$column, diesel::dsl::count_star()))
						.order_by($table::$column.asc())
						.load::<($ty, i64)>(conn)?
						.into_iter()
						.map(|(key, count)| $crate::query::GroupCount {
							key: serde_json::to_value(key).unwrap_or_default(),
							count,
						})
						.collect() ),+
				};
				Ok(groups)
			}
		}

		/// Runs the repository operations on a pooled connection of a client.
		pub struct $delegate<'c> {
			client: &'c $crate::client::Client,
		}

		impl<'c> $delegate<'c> {
			pub fn new(client: &'c $crate::client::Client) -> Self {
				Self { client }
			}

			pub fn find_unique(&self, key: &$unique) -> $crate::error::DbResult<Option<$row>> {
				self.client.with_connection(|conn| $repo::find_unique(conn, key))
			}

			pub fn find_unique_or_throw(&self, key: &$unique) -> $crate::error::DbResult<$row> {
				self.client.with_connection(|conn| $repo::find_unique_or_throw(conn, key))
			}

			pub fn find_first(&self, args: &$args) -> $crate::error::DbResult<Option<$row>> {
				self.client.with_connection(|conn| $repo::find_first(conn, args))
			}

			pub fn find_first_or_throw(&self, args: &$args) -> $crate::error::DbResult<$row> {
				self.client.with_connection(|conn| $repo::find_first_or_throw(conn, args))
			}

			pub fn find_many(&self, args: &$args) -> $crate::error::DbResult<Vec<$row>> {
				self.client.with_connection(|conn| $repo::find_many(conn, args))
			}

			pub fn count(&self, filter: Option<&$filter>) -> $crate::error::DbResult<i64> {
				self.client.with_connection(|conn| $repo::count(conn, filter))
			}

			pub fn create(&self, data: &$create) -> $crate::error::DbResult<$row> {
				self.client.with_connection(|conn| $repo::create(conn, data))
			}

			pub fn create_many(
				&self,
				data: &[$create],
				skip_duplicates: bool,
			) -> $crate::error::DbResult<usize> {
				self.client.with_connection(|conn| $repo::create_many(conn, data, skip_duplicates))
			}

			pub fn create_many_and_return(
				&self,
				data: &[$create],
				skip_duplicates: bool,
			) -> $crate::error::DbResult<Vec<$row>> {
				self.client
					.with_connection(|conn| $repo::create_many_and_return(conn, data, skip_duplicates))
			}

			pub fn update(&self, key: &$unique, data: &$update) -> $crate::error::DbResult<$row> {
				self.client.with_connection(|conn| $repo::update(conn, key, data))
			}

			pub fn update_many(
				&self,
				filter: Option<&$filter>,
				data: &$update,
			) -> $crate::error::DbResult<usize> {
				self.client.with_connection(|conn| $repo::update_many(conn, filter, data))
			}

			pub fn upsert(
				&self,
				key: &$unique,
				create: &$create,
				update: &$update,
			) -> $crate::error::DbResult<$row> {
				self.client.with_connection(|conn| $repo::upsert(conn, key, create, update))
			}

			pub fn delete(&self, key: &$unique) -> $crate::error::DbResult<$row> {
				self.client.with_connection(|conn| $repo::delete(conn, key))
			}

			pub fn delete_many(&self, filter: Option<&$filter>) -> $crate::error::DbResult<usize> {
				self.client.with_connection(|conn| $repo::delete_many(conn, filter))
			}

			pub fn aggregate(
				&self,
				filter: Option<&$filter>,
			) -> $crate::error::DbResult<$crate::query::CountAggregate> {
				self.client.with_connection(|conn| $repo::aggregate(conn, filter))
			}

			pub fn group_by(
				&self,
				by: $field,
				filter: Option<&$filter>,
			) -> $crate::error::DbResult<Vec<$crate::query::GroupCount>> {
				self.client.with_connection(|conn| $repo::group_by(conn, by, filter))
			}
		}
	};
}
pub(crate) use delegate;

/// Folds a model's `and` / `or` / `not` lists into the field conditions
/// already collected in `parts`.
macro_rules! compose_where {
	($table:ident, $where:expr, $parts:expr) => {{
		let mut parts: Vec<$crate::query::BoxedCondition<$table::table>> = $parts;
		for nested in &$where.and {
			parts.push($crate::query::Filter::condition(nested));
		}
		if let Some(any) = &$where.or {
			parts.push($crate::query::any_of!(
				$table,
				any.iter().map(|nested| $crate::query::Filter::condition(nested))
			));
		}
		for nested in &$where.not {
			parts.push($crate::query::negate!($table, $crate::query::Filter::condition(nested)));
		}
		$crate::query::all_of!($table, parts)
	}};
}
pub(crate) use compose_where;
