use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::{compose_where, delegate, new_id, CreateInput, UpdateInput};
use crate::{
	models::{ActionSymbol, ActionSymbolUpdate, NewActionSymbol},
	query::{
		scalar_condition, string_condition, BoxedCondition, DateTimeFilter, Filter, IntFilter,
		StringFilter,
	},
	schema::action_symbols,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionSymbolWhere {
	pub id: Option<StringFilter>,
	pub user_id: Option<IntFilter>,
	pub name: Option<StringFilter>,
	pub icon: Option<StringFilter>,
	pub description: Option<StringFilter>,
	pub prompt: Option<StringFilter>,
	pub created_at: Option<DateTimeFilter>,
	pub updated_at: Option<DateTimeFilter>,
	pub and: Vec<ActionSymbolWhere>,
	pub or: Option<Vec<ActionSymbolWhere>>,
	pub not: Vec<ActionSymbolWhere>,
}

impl Filter<action_symbols::table> for ActionSymbolWhere {
	fn condition(&self) -> BoxedCondition<action_symbols::table> {
		let mut parts = Vec::new();
		if let Some(filter) = &self.id {
			parts.push(string_condition!(action_symbols, action_symbols::id, filter));
		}
		if let Some(filter) = &self.user_id {
			parts.push(scalar_condition!(action_symbols, action_symbols::user_id, filter));
		}
		if let Some(filter) = &self.name {
			parts.push(string_condition!(action_symbols, action_symbols::name, filter));
		}
		if let Some(filter) = &self.icon {
			parts.push(string_condition!(action_symbols, action_symbols::icon, filter));
		}
		if let Some(filter) = &self.description {
			parts.push(string_condition!(action_symbols, action_symbols::description, filter));
		}
		if let Some(filter) = &self.prompt {
			parts.push(string_condition!(action_symbols, action_symbols::prompt, filter));
		}
		if let Some(filter) = &self.created_at {
			parts.push(scalar_condition!(action_symbols, action_symbols::created_at, filter));
		}
		if let Some(filter) = &self.updated_at {
			parts.push(scalar_condition!(action_symbols, action_symbols::updated_at, filter));
		}
		compose_where!(action_symbols, self, parts)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionSymbolUnique {
	Id(String),
}

impl Filter<action_symbols::table> for ActionSymbolUnique {
	fn condition(&self) -> BoxedCondition<action_symbols::table> {
		match self {
			ActionSymbolUnique::Id(id) => Box::new(action_symbols::id.eq(id.clone())),
		}
	}
}

impl CreateInput for NewActionSymbol {
	fn assign_id(&mut self) {
		self.id.get_or_insert_with(new_id);
	}
}

impl UpdateInput for ActionSymbolUpdate {
	fn touch(&mut self) {
		self.updated_at = Some(Utc::now());
	}

	fn is_empty(&self) -> bool {
		self.name.is_none()
			&& self.icon.is_none()
			&& self.description.is_none()
			&& self.prompt.is_none()
			&& self.updated_at.is_none()
	}
}

delegate! {
	model: "ActionSymbol",
	table: action_symbols,
	row: ActionSymbol,
	create: NewActionSymbol,
	update: ActionSymbolUpdate,
	filter: ActionSymbolWhere,
	unique: ActionSymbolUnique,
	args: ActionSymbolFindMany,
	field: ActionSymbolField {
		Id => id: String,
		UserId => user_id: i32,
		Name => name: String,
		Icon => icon: String,
		Description => description: String,
		Prompt => prompt: String,
		CreatedAt => created_at: DateTime<Utc>,
		UpdatedAt => updated_at: DateTime<Utc>,
	},
	primary_key: Id,
	repo: ActionSymbolRepo,
	delegate: ActionSymbolDelegate,
}
