use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::{compose_where, delegate, new_id, CreateInput, UpdateInput};
use crate::{
	models::{NewSymbol, Symbol, SymbolUpdate},
	query::{
		scalar_condition, string_condition, BoxedCondition, DateTimeFilter, Filter, IntFilter,
		StringFilter,
	},
	schema::symbols,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SymbolWhere {
	pub id: Option<StringFilter>,
	pub user_id: Option<IntFilter>,
	pub icon: Option<StringFilter>,
	pub name: Option<StringFilter>,
	pub description: Option<StringFilter>,
	pub created_at: Option<DateTimeFilter>,
	pub updated_at: Option<DateTimeFilter>,
	pub and: Vec<SymbolWhere>,
	pub or: Option<Vec<SymbolWhere>>,
	pub not: Vec<SymbolWhere>,
}

impl Filter<symbols::table> for SymbolWhere {
	fn condition(&self) -> BoxedCondition<symbols::table> {
		let mut parts = Vec::new();
		if let Some(filter) = &self.id {
			parts.push(string_condition!(symbols, symbols::id, filter));
		}
		if let Some(filter) = &self.user_id {
			parts.push(scalar_condition!(symbols, symbols::user_id, filter));
		}
		if let Some(filter) = &self.icon {
			parts.push(string_condition!(symbols, symbols::icon, filter));
		}
		if let Some(filter) = &self.name {
			parts.push(string_condition!(symbols, symbols::name, filter));
		}
		if let Some(filter) = &self.description {
			parts.push(string_condition!(symbols, symbols::description, filter));
		}
		if let Some(filter) = &self.created_at {
			parts.push(scalar_condition!(symbols, symbols::created_at, filter));
		}
		if let Some(filter) = &self.updated_at {
			parts.push(scalar_condition!(symbols, symbols::updated_at, filter));
		}
		compose_where!(symbols, self, parts)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolUnique {
	Id(String),
}

impl Filter<symbols::table> for SymbolUnique {
	fn condition(&self) -> BoxedCondition<symbols::table> {
		match self {
			SymbolUnique::Id(id) => Box::new(symbols::id.eq(id.clone())),
		}
	}
}

impl CreateInput for NewSymbol {
	fn assign_id(&mut self) {
		self.id.get_or_insert_with(new_id);
	}
}

impl UpdateInput for SymbolUpdate {
	fn touch(&mut self) {
		self.updated_at = Some(Utc::now());
	}

	fn is_empty(&self) -> bool {
		self.icon.is_none()
			&& self.name.is_none()
			&& self.description.is_none()
			&& self.updated_at.is_none()
	}
}

delegate! {
	model: "Symbol",
	table: symbols,
	row: Symbol,
	create: NewSymbol,
	update: SymbolUpdate,
	filter: SymbolWhere,
	unique: SymbolUnique,
	args: SymbolFindMany,
	field: SymbolField {
		Id => id: String,
		UserId => user_id: i32,
		Icon => icon: String,
		Name => name: String,
		Description => description: String,
		CreatedAt => created_at: DateTime<Utc>,
		UpdatedAt => updated_at: DateTime<Utc>,
	},
	primary_key: Id,
	repo: SymbolRepo,
	delegate: SymbolDelegate,
}
