use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::{compose_where, delegate, new_id, CreateInput, UpdateInput};
use crate::{
	models::{GenerationHistory, GenerationHistoryUpdate, NewGenerationHistory},
	query::{
		json_condition, list_condition, scalar_condition, string_condition, BoxedCondition,
		DateTimeFilter, Filter, IntFilter, JsonFilter, ListFilter, StringFilter,
	},
	schema::generation_histories,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationHistoryWhere {
	pub id: Option<StringFilter>,
	pub user_id: Option<IntFilter>,
	#[serde(rename = "type")]
	pub kind: Option<StringFilter>,
	pub prompt: Option<StringFilter>,
	pub images: Option<ListFilter>,
	pub metadata: Option<JsonFilter>,
	pub created_at: Option<DateTimeFilter>,
	pub and: Vec<GenerationHistoryWhere>,
	pub or: Option<Vec<GenerationHistoryWhere>>,
	pub not: Vec<GenerationHistoryWhere>,
}

impl Filter<generation_histories::table> for GenerationHistoryWhere {
	fn condition(&self) -> BoxedCondition<generation_histories::table> {
		use generation_histories as gh;
		let mut parts = Vec::new();
		if let Some(filter) = &self.id {
			parts.push(string_condition!(gh, gh::id, filter));
		}
		if let Some(filter) = &self.user_id {
			parts.push(scalar_condition!(gh, gh::user_id, filter));
		}
		if let Some(filter) = &self.kind {
			parts.push(string_condition!(gh, gh::kind, filter));
		}
		if let Some(filter) = &self.prompt {
			parts.push(string_condition!(gh, gh::prompt, filter));
		}
		if let Some(filter) = &self.images {
			parts.push(list_condition!(gh, gh::images, filter));
		}
		if let Some(filter) = &self.metadata {
			parts.push(json_condition!(gh, gh::metadata, filter));
		}
		if let Some(filter) = &self.created_at {
			parts.push(scalar_condition!(gh, gh::created_at, filter));
		}
		compose_where!(gh, self, parts)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationHistoryUnique {
	Id(String),
}

impl Filter<generation_histories::table> for GenerationHistoryUnique {
	fn condition(&self) -> BoxedCondition<generation_histories::table> {
		match self {
			GenerationHistoryUnique::Id(id) => Box::new(generation_histories::id.eq(id.clone())),
		}
	}
}

impl CreateInput for NewGenerationHistory {
	fn assign_id(&mut self) {
		self.id.get_or_insert_with(new_id);
	}
}

impl UpdateInput for GenerationHistoryUpdate {
	fn is_empty(&self) -> bool {
		self.kind.is_none()
			&& self.prompt.is_none()
			&& self.images.is_none()
			&& self.metadata.is_none()
	}
}

delegate! {
	model: "GenerationHistory",
	table: generation_histories,
	row: GenerationHistory,
	create: NewGenerationHistory,
	update: GenerationHistoryUpdate,
	filter: GenerationHistoryWhere,
	unique: GenerationHistoryUnique,
	args: GenerationHistoryFindMany,
	field: GenerationHistoryField {
		Id => id: String,
		UserId => user_id: i32,
		#[serde(rename = "type")]
		Kind => kind: String,
		Prompt => prompt: String,
		CreatedAt => created_at: DateTime<Utc>,
	},
	primary_key: Id,
	repo: GenerationHistoryRepo,
	delegate: GenerationHistoryDelegate,
}
