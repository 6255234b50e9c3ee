use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{compose_where, delegate, CreateInput, UpdateInput};
use crate::{
	error::DbResult,
	models::{NewTransaction, Transaction, TransactionUpdate},
	query::{
		nullable_string_condition, scalar_condition, string_condition, BoxedCondition,
		DateTimeFilter, Filter, FloatFilter, IntFilter, NullableStringFilter, NumericAggregate,
		StringFilter,
	},
	schema::transactions,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionWhere {
	pub id: Option<IntFilter>,
	pub user_id: Option<IntFilter>,
	#[serde(rename = "type")]
	pub kind: Option<StringFilter>,
	pub amount: Option<FloatFilter>,
	pub description: Option<NullableStringFilter>,
	pub created_at: Option<DateTimeFilter>,
	pub and: Vec<TransactionWhere>,
	pub or: Option<Vec<TransactionWhere>>,
	pub not: Vec<TransactionWhere>,
}

impl Filter<transactions::table> for TransactionWhere {
	fn condition(&self) -> BoxedCondition<transactions::table> {
		let mut parts = Vec::new();
		if let Some(filter) = &self.id {
			parts.push(scalar_condition!(transactions, transactions::id, filter));
		}
		if let Some(filter) = &self.user_id {
			parts.push(scalar_condition!(transactions, transactions::user_id, filter));
		}
		if let Some(filter) = &self.kind {
			parts.push(string_condition!(transactions, transactions::kind, filter));
		}
		if let Some(filter) = &self.amount {
			parts.push(scalar_condition!(transactions, transactions::amount, filter));
		}
		if let Some(filter) = &self.description {
			parts.push(nullable_string_condition!(transactions, transactions::description, filter));
		}
		if let Some(filter) = &self.created_at {
			parts.push(scalar_condition!(transactions, transactions::created_at, filter));
		}
		compose_where!(transactions, self, parts)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionUnique {
	Id(i32),
}

impl Filter<transactions::table> for TransactionUnique {
	fn condition(&self) -> BoxedCondition<transactions::table> {
		match self {
			TransactionUnique::Id(id) => Box::new(transactions::id.eq(*id)),
		}
	}
}

impl CreateInput for NewTransaction {}

impl UpdateInput for TransactionUpdate {
	fn is_empty(&self) -> bool {
		self.kind.is_none() && self.amount.is_none() && self.description.is_none()
	}
}

delegate! {
	model: "Transaction",
	table: transactions,
	row: Transaction,
	create: NewTransaction,
	update: TransactionUpdate,
	filter: TransactionWhere,
	unique: TransactionUnique,
	args: TransactionFindMany,
	field: TransactionField {
		Id => id: i32,
		UserId => user_id: i32,
		#[serde(rename = "type")]
		Kind => kind: String,
		Amount => amount: f64,
		CreatedAt => created_at: DateTime<Utc>,
	},
	primary_key: Id,
	repo: TransactionRepo,
	delegate: TransactionDelegate,
}

/// Grouping keys for per-group amount statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionGroupKey {
	#[serde(rename = "type")]
	Kind,
	UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionGroup {
	pub key: Value,
	pub count: i64,
	pub amount: NumericAggregate,
}

type AmountRow<K> = (K, i64, Option<f64>, Option<f64>, Option<f64>, Option<f64>);

fn into_group<K: Serialize>(row: AmountRow<K>) -> TransactionGroup {
	let (key, count, sum, avg, min, max) = row;
	TransactionGroup {
		key: serde_json::to_value(key).unwrap_or_default(),
		count,
		amount: NumericAggregate { sum, avg, min, max },
	}
}

impl TransactionRepo {
	pub fn aggregate_amount(
		conn: &mut PgConnection,
		filter: Option<&TransactionWhere>,
	) -> DbResult<NumericAggregate> {
		use diesel::dsl::{avg, max, min, sum};
		let (sum, avg, min, max) = transactions::table
			.filter(Self::condition_of(filter))
			.select((
				sum(transactions::amount),
				avg(transactions::amount),
				min(transactions::amount),
				max(transactions::amount),
			))
			.get_result::<(Option<f64>, Option<f64>, Option<f64>, Option<f64>)>(conn)?;
		Ok(NumericAggregate { sum, avg, min, max })
	}

	/// Count and amount statistics per transaction type or per user.
	pub fn group_amounts(
		conn: &mut PgConnection,
		by: TransactionGroupKey,
		filter: Option<&TransactionWhere>,
	) -> DbResult<Vec<TransactionGroup>> {
		use diesel::dsl::{avg, count_star, max, min, sum};
		let condition = Self::condition_of(filter);
		let groups = match by {
			TransactionGroupKey::Kind => transactions::table
				.filter(condition)
				.group_by(transactions::kind)
				.select((
					transactions::kind,
					count_star(),
					sum(transactions::amount),
					avg(transactions::amount),
					min(transactions::amount),
					max(transactions::amount),
				))
				.order_by(transactions::kind.asc())
				.load::<AmountRow<String>>(conn)?
				.into_iter()
				.map(into_group)
				.collect(),
			TransactionGroupKey::UserId => transactions::table
				.filter(condition)
				.group_by(transactions::user_id)
				.select((
					transactions::user_id,
					count_star(),
					sum(transactions::amount),
					avg(transactions::amount),
					min(transactions::amount),
					max(transactions::amount),
				))
				.order_by(transactions::user_id.asc())
				.load::<AmountRow<i32>>(conn)?
				.into_iter()
				.map(into_group)
				.collect(),
		};
		Ok(groups)
	}
}

impl<'c> TransactionDelegate<'c> {
	pub fn aggregate_amount(&self, filter: Option<&TransactionWhere>) -> DbResult<NumericAggregate> {
		self.client.with_connection(|conn| TransactionRepo::aggregate_amount(conn, filter))
	}

	pub fn group_amounts(
		&self,
		by: TransactionGroupKey,
		filter: Option<&TransactionWhere>,
	) -> DbResult<Vec<TransactionGroup>> {
		self.client.with_connection(|conn| TransactionRepo::group_amounts(conn, by, filter))
	}
}
