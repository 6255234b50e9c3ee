//! Argument types shared by every delegate: field filters, ordering,
//! pagination and the macros that turn them into diesel expressions.
//!
//! Conditions are built as boxed expressions so that arbitrary `and` / `or`
//! / `not` trees can be assembled at runtime and applied to select, update
//! and delete statements alike.

use chrono::{DateTime, Utc};
use diesel::{expression::BoxableExpression, pg::Pg, sql_types::Bool};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DbError, DbResult};

/// A runtime-composed `WHERE` condition over table `T`.
pub type BoxedCondition<T> = Box<dyn BoxableExpression<T, Pg, SqlType = Bool>>;

/// Implemented by every `Where` and unique selector type.
pub trait Filter<T> {
	fn condition(&self) -> BoxedCondition<T>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	#[default]
	Asc,
	Desc,
}

impl SortOrder {
	pub fn reversed(self) -> Self {
		match self {
			SortOrder::Asc => SortOrder::Desc,
			SortOrder::Desc => SortOrder::Asc,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy<F> {
	pub field: F,
	#[serde(default)]
	pub order: SortOrder,
}

impl<F> OrderBy<F> {
	pub fn asc(field: F) -> Self {
		Self { field, order: SortOrder::Asc }
	}

	pub fn desc(field: F) -> Self {
		Self { field, order: SortOrder::Desc }
	}

	pub fn reversed(self) -> Self {
		Self { field: self.field, order: self.order.reversed() }
	}
}

/// Filter for ordered scalars: integers, floats and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarFilter<T> {
	Equals(T),
	Not(T),
	In(Vec<T>),
	NotIn(Vec<T>),
	Lt(T),
	Lte(T),
	Gt(T),
	Gte(T),
}

pub type IntFilter = ScalarFilter<i32>;
pub type FloatFilter = ScalarFilter<f64>;
pub type DateTimeFilter = ScalarFilter<DateTime<Utc>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StringFilter {
	Equals(String),
	Not(String),
	In(Vec<String>),
	NotIn(Vec<String>),
	Lt(String),
	Gt(String),
	Contains(String),
	ContainsInsensitive(String),
	StartsWith(String),
	EndsWith(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NullableStringFilter {
	IsNull,
	IsNotNull,
	Value(StringFilter),
}

/// Filter over a JSONB column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JsonFilter {
	Equals(Value),
	Not(Value),
	Contains(Value),
	HasKey(String),
}

/// Filter over a `TEXT[]` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListFilter {
	Equals(Vec<String>),
	Has(String),
	HasEvery(Vec<String>),
	HasSome(Vec<String>),
	IsEmpty(bool),
}

/// Atomic numeric update applied in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberUpdate {
	Set(f64),
	Increment(f64),
	Decrement(f64),
	Multiply(f64),
	Divide(f64),
}

/// Escapes `%`, `_` and `\` so user input matches literally inside `LIKE`.
pub fn escape_like(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());
	for c in value.chars() {
		if matches!(c, '%' | '_' | '\\') {
			escaped.push('\\');
		}
		escaped.push(c);
	}
	escaped
}

/// Arguments for `find_many`, `find_first` and their variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
	rename_all = "camelCase",
	bound(deserialize = "W: Deserialize<'de>, F: Deserialize<'de>, U: Deserialize<'de>")
)]
pub struct FindManyArgs<W, F, U> {
	#[serde(default)]
	pub filter: Option<W>,
	#[serde(default)]
	pub order_by: Vec<OrderBy<F>>,
	#[serde(default)]
	pub cursor: Option<U>,
	#[serde(default)]
	pub take: Option<i64>,
	#[serde(default)]
	pub skip: Option<i64>,
	#[serde(default)]
	pub distinct: Vec<F>,
}

impl<W, F, U> Default for FindManyArgs<W, F, U> {
	fn default() -> Self {
		Self {
			filter: None,
			order_by: Vec::new(),
			cursor: None,
			take: None,
			skip: None,
			distinct: Vec::new(),
		}
	}
}

impl<W, F, U> FindManyArgs<W, F, U> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn filter(mut self, filter: W) -> Self {
		self.filter = Some(filter);
		self
	}

	pub fn order_by(mut self, field: F, order: SortOrder) -> Self {
		self.order_by.push(OrderBy { field, order });
		self
	}

	pub fn cursor(mut self, cursor: U) -> Self {
		self.cursor = Some(cursor);
		self
	}

	pub fn take(mut self, take: i64) -> Self {
		self.take = Some(take);
		self
	}

	pub fn skip(mut self, skip: i64) -> Self {
		self.skip = Some(skip);
		self
	}

	pub fn distinct(mut self, field: F) -> Self {
		self.distinct.push(field);
		self
	}

	pub fn validate(&self) -> DbResult<()> {
		match self.skip {
			Some(skip) if skip < 0 => {
				Err(DbError::Validation(format!("skip must not be negative, got {}", skip)))
			},
			_ => Ok(()),
		}
	}

	/// A negative `take` walks the ordering backwards from the cursor.
	pub fn is_backwards(&self) -> bool {
		self.take.is_some_and(|take| take < 0)
	}
}

/// Count of rows sharing one value of the grouped field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCount {
	pub key: Value,
	pub count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericAggregate {
	pub sum: Option<f64>,
	pub avg: Option<f64>,
	pub min: Option<f64>,
	pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountAggregate {
	pub count: i64,
	pub created_at_min: Option<DateTime<Utc>>,
	pub created_at_max: Option<DateTime<Utc>>,
}

/// Conjunction of the given conditions; `TRUE` when there are none.
macro_rules! all_of {
	($table:ident, $conditions:expr) => {{
		use diesel::prelude::*;
		let mut combined: Option<$crate::query::BoxedCondition<$table::table>> = None;
		for condition in $conditions {
			let next: $crate::query::BoxedCondition<$table::table> = match combined {
				Some(acc) => Box::new(acc.and(condition)),
				None => condition,
			};
			combined = Some(next);
		}
		match combined {
			Some(condition) => condition,
			None => {
				let always: $crate::query::BoxedCondition<$table::table> =
					Box::new(true.into_sql::<diesel::sql_types::Bool>());
				always
			},
		}
	}};
}
pub(crate) use all_of;

/// Disjunction of the given conditions; `FALSE` when there are none.
macro_rules! any_of {
	($table:ident, $conditions:expr) => {{
		use diesel::prelude::*;
		let mut combined: Option<$crate::query::BoxedCondition<$table::table>> = None;
		for condition in $conditions {
			let next: $crate::query::BoxedCondition<$table::table> = match combined {
				Some(acc) => Box::new(acc.or(condition)),
				None => condition,
			};
			combined = Some(next);
		}
		match combined {
			Some(condition) => condition,
			None => {
				let never: $crate::query::BoxedCondition<$table::table> =
					Box::new(false.into_sql::<diesel::sql_types::Bool>());
				never
			},
		}
	}};
}
pub(crate) use any_of;

macro_rules! negate {
	($table:ident, $condition:expr) => {{
		let negated: $crate::query::BoxedCondition<$table::table> =
			Box::new(diesel::dsl::not($condition));
		negated
	}};
}
pub(crate) use negate;

macro_rules! scalar_condition {
	($table:ident, $column:expr, $filter:expr) => {{
		use diesel::prelude::*;
		use $crate::query::ScalarFilter;
		let condition: $crate::query::BoxedCondition<$table::table> = match $filter {
			ScalarFilter::Equals(value) => Box::new($column.eq(value.clone())),
			ScalarFilter::Not(value) => Box::new($column.ne(value.clone())),
			ScalarFilter::In(values) => Box::new($column.eq_any(values.clone())),
			ScalarFilter::NotIn(values) => Box::new($column.ne_all(values.clone())),
			ScalarFilter::Lt(value) => Box::new($column.lt(value.clone())),
			ScalarFilter::Lte(value) => Box::new($column.le(value.clone())),
			ScalarFilter::Gt(value) => Box::new($column.gt(value.clone())),
			ScalarFilter::Gte(value) => Box::new($column.ge(value.clone())),
		};
		condition
	}};
}
pub(crate) use scalar_condition;

macro_rules! string_condition {
	($table:ident, $column:expr, $filter:expr) => {{
		use diesel::prelude::*;
		use $crate::query::{escape_like, StringFilter};
		let condition: $crate::query::BoxedCondition<$table::table> = match $filter {
			StringFilter::Equals(value) => Box::new($column.eq(value.clone())),
			StringFilter::Not(value) => Box::new($column.ne(value.clone())),
			StringFilter::In(values) => Box::new($column.eq_any(values.clone())),
			StringFilter::NotIn(values) => Box::new($column.ne_all(values.clone())),
			StringFilter::Lt(value) => Box::new($column.lt(value.clone())),
			StringFilter::Gt(value) => Box::new($column.gt(value.clone())),
			StringFilter::Contains(value) => {
				Box::new($column.like(format!("%{}%", escape_like(value))))
			},
			StringFilter::ContainsInsensitive(value) => {
				Box::new($column.ilike(format!("%{}%", escape_like(value))))
			},
			StringFilter::StartsWith(value) => {
				Box::new($column.like(format!("{}%", escape_like(value))))
			},
			StringFilter::EndsWith(value) => {
				Box::new($column.like(format!("%{}", escape_like(value))))
			},
		};
		condition
	}};
}
pub(crate) use string_condition;

macro_rules! nullable_string_condition {
	($table:ident, $column:expr, $filter:expr) => {{
		use diesel::prelude::*;
		use $crate::query::NullableStringFilter;
		let condition: $crate::query::BoxedCondition<$table::table> = match $filter {
			NullableStringFilter::IsNull => Box::new($column.is_null()),
			NullableStringFilter::IsNotNull => Box::new($column.is_not_null()),
			NullableStringFilter::Value(inner) => {
				$crate::query::string_condition!($table, $column.assume_not_null(), inner)
			},
		};
		condition
	}};
}
pub(crate) use nullable_string_condition;

macro_rules! json_condition {
	($table:ident, $column:expr, $filter:expr) => {{
		use diesel::prelude::*;
		use $crate::query::JsonFilter;
		let condition: $crate::query::BoxedCondition<$table::table> = match $filter {
			JsonFilter::Equals(value) => Box::new($column.eq(value.clone())),
			JsonFilter::Not(value) => Box::new($column.ne(value.clone())),
			JsonFilter::Contains(value) => Box::new($column.contains(value.clone())),
			JsonFilter::HasKey(key) => Box::new($column.has_key(key.clone())),
		};
		condition
	}};
}
pub(crate) use json_condition;

macro_rules! list_condition {
	($table:ident, $column:expr, $filter:expr) => {{
		use diesel::prelude::*;
		use $crate::query::ListFilter;
		let condition: $crate::query::BoxedCondition<$table::table> = match $filter {
			ListFilter::Equals(values) => Box::new($column.eq(values.clone())),
			ListFilter::Has(value) => Box::new($column.contains(vec![value.clone()])),
			ListFilter::HasEvery(values) => Box::new($column.contains(values.clone())),
			ListFilter::HasSome(values) => Box::new($column.overlaps_with(values.clone())),
			ListFilter::IsEmpty(true) => Box::new($column.eq(Vec::<String>::new())),
			ListFilter::IsEmpty(false) => Box::new($column.ne(Vec::<String>::new())),
		};
		condition
	}};
}
pub(crate) use list_condition;
