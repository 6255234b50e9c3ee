use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::{compose_where, delegate, CreateInput, UpdateInput};
use crate::{
	error::{DbError, DbResult},
	models::{
		ActionConfiguration, ActionSymbol, GenerationHistory, MultimediaApiConfig, NewUser,
		QuickStoryboardConfig, Symbol, Transaction, User, UserInclude, UserUpdate, UserWithRelations,
	},
	query::{
		scalar_condition, string_condition, BoxedCondition, DateTimeFilter, Filter, FloatFilter,
		IntFilter, NumberUpdate, NumericAggregate, StringFilter,
	},
	schema::{
		action_configurations, action_symbols, generation_histories, multimedia_api_configs,
		quick_storyboard_configs, symbols, transactions, users,
	},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserWhere {
	pub id: Option<IntFilter>,
	pub username: Option<StringFilter>,
	pub email: Option<StringFilter>,
	pub balance: Option<FloatFilter>,
	pub created_at: Option<DateTimeFilter>,
	pub updated_at: Option<DateTimeFilter>,
	pub and: Vec<UserWhere>,
	/// `Some(vec![])` matches nothing.
	pub or: Option<Vec<UserWhere>>,
	pub not: Vec<UserWhere>,
}

impl Filter<users::table> for UserWhere {
	fn condition(&self) -> BoxedCondition<users::table> {
		let mut parts = Vec::new();
		if let Some(filter) = &self.id {
			parts.push(scalar_condition!(users, users::id, filter));
		}
		if let Some(filter) = &self.username {
			parts.push(string_condition!(users, users::username, filter));
		}
		if let Some(filter) = &self.email {
			parts.push(string_condition!(users, users::email, filter));
		}
		if let Some(filter) = &self.balance {
			parts.push(scalar_condition!(users, users::balance, filter));
		}
		if let Some(filter) = &self.created_at {
			parts.push(scalar_condition!(users, users::created_at, filter));
		}
		if let Some(filter) = &self.updated_at {
			parts.push(scalar_condition!(users, users::updated_at, filter));
		}
		compose_where!(users, self, parts)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserUnique {
	Id(i32),
	Username(String),
	Email(String),
}

impl Filter<users::table> for UserUnique {
	fn condition(&self) -> BoxedCondition<users::table> {
		match self {
			UserUnique::Id(id) => Box::new(users::id.eq(*id)),
			UserUnique::Username(username) => Box::new(users::username.eq(username.clone())),
			UserUnique::Email(email) => Box::new(users::email.eq(email.clone())),
		}
	}
}

impl CreateInput for NewUser {}

impl UpdateInput for UserUpdate {
	fn touch(&mut self) {
		self.updated_at = Some(Utc::now());
	}

	fn is_empty(&self) -> bool {
		self.username.is_none()
			&& self.email.is_none()
			&& self.password.is_none()
			&& self.balance.is_none()
			&& self.updated_at.is_none()
	}
}

delegate! {
	model: "User",
	table: users,
	row: User,
	create: NewUser,
	update: UserUpdate,
	filter: UserWhere,
	unique: UserUnique,
	args: UserFindMany,
	field: UserField {
		Id => id: i32,
		Username => username: String,
		Email => email: String,
		Balance => balance: f64,
		CreatedAt => created_at: DateTime<Utc>,
		UpdatedAt => updated_at: DateTime<Utc>,
	},
	primary_key: Id,
	repo: UserRepo,
	delegate: UserDelegate,
}

impl UserRepo {
	/// Sum, average and range of `balance` over the matching users.
	pub fn aggregate_balance(
		conn: &mut PgConnection,
		filter: Option<&UserWhere>,
	) -> DbResult<NumericAggregate> {
		use diesel::dsl::{avg, max, min, sum};
		let (sum, avg, min, max) = users::table
			.filter(Self::condition_of(filter))
			.select((sum(users::balance), avg(users::balance), min(users::balance), max(users::balance)))
			.get_result::<(Option<f64>, Option<f64>, Option<f64>, Option<f64>)>(conn)?;
		Ok(NumericAggregate { sum, avg, min, max })
	}

	/// Applies `update` to the stored balance in a single statement, so
	/// concurrent adjustments never lose writes.
	pub fn update_balance(
		conn: &mut PgConnection,
		key: &UserUnique,
		update: NumberUpdate,
	) -> DbResult<User> {
		log::debug!("User.update_balance {:?} {:?}", key, update);
		let target = users::table.filter(key.condition());
		let now = Utc::now();
		let statement = diesel::update(target);
		let updated = match update {
			NumberUpdate::Set(value) => statement
				.set((users::balance.eq(value), users::updated_at.eq(now)))
				.get_result::<User>(conn),
			NumberUpdate::Increment(value) => statement
				.set((users::balance.eq(users::balance + value), users::updated_at.eq(now)))
				.get_result::<User>(conn),
			NumberUpdate::Decrement(value) => statement
				.set((users::balance.eq(users::balance - value), users::updated_at.eq(now)))
				.get_result::<User>(conn),
			NumberUpdate::Multiply(value) => statement
				.set((users::balance.eq(users::balance * value), users::updated_at.eq(now)))
				.get_result::<User>(conn),
			NumberUpdate::Divide(value) if value == 0.0 => {
				return Err(DbError::Validation("balance cannot be divided by zero".to_string()))
			},
			NumberUpdate::Divide(value) => statement
				.set((users::balance.eq(users::balance / value), users::updated_at.eq(now)))
				.get_result::<User>(conn),
		};
		updated.optional()?.ok_or_else(|| DbError::not_found(Self::MODEL))
	}

	pub fn find_unique_with(
		conn: &mut PgConnection,
		key: &UserUnique,
		include: &UserInclude,
	) -> DbResult<Option<UserWithRelations>> {
		let users: Vec<User> = Self::find_unique(conn, key)?.into_iter().collect();
		Ok(Self::load_relations(conn, users, include)?.into_iter().next())
	}

	pub fn find_many_with(
		conn: &mut PgConnection,
		args: &UserFindMany,
		include: &UserInclude,
	) -> DbResult<Vec<UserWithRelations>> {
		let users = Self::find_many(conn, args)?;
		Self::load_relations(conn, users, include)
	}

	/// Loads each requested relation with one query for all `users`.
	fn load_relations(
		conn: &mut PgConnection,
		users: Vec<User>,
		include: &UserInclude,
	) -> DbResult<Vec<UserWithRelations>> {
		let mut transactions = if include.transactions {
			Some(
				Transaction::belonging_to(&users)
					.order(transactions::id.asc())
					.load::<Transaction>(conn)?
					.grouped_by(&users)
					.into_iter(),
			)
		} else {
			None
		};
		let mut symbols = if include.symbols {
			Some(
				Symbol::belonging_to(&users)
					.order((symbols::created_at.asc(), symbols::id.asc()))
					.load::<Symbol>(conn)?
					.grouped_by(&users)
					.into_iter(),
			)
		} else {
			None
		};
		let mut storyboard_configs = if include.quick_storyboard_configs {
			Some(
				QuickStoryboardConfig::belonging_to(&users)
					.order((quick_storyboard_configs::created_at.asc(), quick_storyboard_configs::id.asc()))
					.load::<QuickStoryboardConfig>(conn)?
					.grouped_by(&users)
					.into_iter(),
			)
		} else {
			None
		};
		let mut generation_history = if include.generation_history {
			Some(
				GenerationHistory::belonging_to(&users)
					.order((generation_histories::created_at.asc(), generation_histories::id.asc()))
					.load::<GenerationHistory>(conn)?
					.grouped_by(&users)
					.into_iter(),
			)
		} else {
			None
		};
		let mut action_symbols = if include.action_symbols {
			Some(
				ActionSymbol::belonging_to(&users)
					.order((action_symbols::created_at.asc(), action_symbols::id.asc()))
					.load::<ActionSymbol>(conn)?
					.grouped_by(&users)
					.into_iter(),
			)
		} else {
			None
		};
		let mut action_configurations = if include.action_configurations {
			Some(
				ActionConfiguration::belonging_to(&users)
					.order((action_configurations::created_at.asc(), action_configurations::id.asc()))
					.load::<ActionConfiguration>(conn)?
					.grouped_by(&users)
					.into_iter(),
			)
		} else {
			None
		};
		let mut multimedia_configs = if include.multimedia_api_config {
			Some(
				MultimediaApiConfig::belonging_to(&users)
					.order(multimedia_api_configs::id.asc())
					.load::<MultimediaApiConfig>(conn)?
					.grouped_by(&users)
					.into_iter(),
			)
		} else {
			None
		};

		Ok(users
			.into_iter()
			.map(|user| UserWithRelations {
				transactions: transactions.as_mut().and_then(Iterator::next),
				symbols: symbols.as_mut().and_then(Iterator::next),
				quick_storyboard_configs: storyboard_configs.as_mut().and_then(Iterator::next),
				generation_history: generation_history.as_mut().and_then(Iterator::next),
				action_symbols: action_symbols.as_mut().and_then(Iterator::next),
				action_configurations: action_configurations.as_mut().and_then(Iterator::next),
				multimedia_api_config: multimedia_configs
					.as_mut()
					.and_then(Iterator::next)
					.map(|configs| configs.into_iter().next()),
				user,
			})
			.collect())
	}
}

impl<'c> UserDelegate<'c> {
	pub fn aggregate_balance(&self, filter: Option<&UserWhere>) -> DbResult<NumericAggregate> {
		self.client.with_connection(|conn| UserRepo::aggregate_balance(conn, filter))
	}

	pub fn update_balance(&self, key: &UserUnique, update: NumberUpdate) -> DbResult<User> {
		self.client.with_connection(|conn| UserRepo::update_balance(conn, key, update))
	}

	pub fn find_unique_with(
		&self,
		key: &UserUnique,
		include: &UserInclude,
	) -> DbResult<Option<UserWithRelations>> {
		self.client.with_connection(|conn| UserRepo::find_unique_with(conn, key, include))
	}

	pub fn find_many_with(
		&self,
		args: &UserFindMany,
		include: &UserInclude,
	) -> DbResult<Vec<UserWithRelations>> {
		self.client.with_connection(|conn| UserRepo::find_many_with(conn, args, include))
	}
}
