use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::{compose_where, delegate, new_id, CreateInput, UpdateInput};
use crate::{
	models::{MultimediaApiConfig, MultimediaApiConfigUpdate, NewMultimediaApiConfig},
	query::{
		json_condition, scalar_condition, string_condition, BoxedCondition, DateTimeFilter, Filter,
		IntFilter, JsonFilter, StringFilter,
	},
	schema::multimedia_api_configs,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MultimediaApiConfigWhere {
	pub id: Option<StringFilter>,
	pub user_id: Option<IntFilter>,
	pub config: Option<JsonFilter>,
	pub created_at: Option<DateTimeFilter>,
	pub updated_at: Option<DateTimeFilter>,
	pub and: Vec<MultimediaApiConfigWhere>,
	pub or: Option<Vec<MultimediaApiConfigWhere>>,
	pub not: Vec<MultimediaApiConfigWhere>,
}

impl Filter<multimedia_api_configs::table> for MultimediaApiConfigWhere {
	fn condition(&self) -> BoxedCondition<multimedia_api_configs::table> {
		use multimedia_api_configs as mac;
		let mut parts = Vec::new();
		if let Some(filter) = &self.id {
			parts.push(string_condition!(mac, mac::id, filter));
		}
		if let Some(filter) = &self.user_id {
			parts.push(scalar_condition!(mac, mac::user_id, filter));
		}
		if let Some(filter) = &self.config {
			parts.push(json_condition!(mac, mac::config, filter));
		}
		if let Some(filter) = &self.created_at {
			parts.push(scalar_condition!(mac, mac::created_at, filter));
		}
		if let Some(filter) = &self.updated_at {
			parts.push(scalar_condition!(mac, mac::updated_at, filter));
		}
		compose_where!(mac, self, parts)
	}
}

/// Each user owns at most one configuration, so `user_id` is unique too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MultimediaApiConfigUnique {
	Id(String),
	UserId(i32),
}

impl Filter<multimedia_api_configs::table> for MultimediaApiConfigUnique {
	fn condition(&self) -> BoxedCondition<multimedia_api_configs::table> {
		match self {
			MultimediaApiConfigUnique::Id(id) => Box::new(multimedia_api_configs::id.eq(id.clone())),
			MultimediaApiConfigUnique::UserId(user_id) => {
				Box::new(multimedia_api_configs::user_id.eq(*user_id))
			},
		}
	}
}

impl CreateInput for NewMultimediaApiConfig {
	fn assign_id(&mut self) {
		self.id.get_or_insert_with(new_id);
	}
}

impl UpdateInput for MultimediaApiConfigUpdate {
	fn touch(&mut self) {
		self.updated_at = Some(Utc::now());
	}

	fn is_empty(&self) -> bool {
		self.config.is_none() && self.updated_at.is_none()
	}
}

delegate! {
	model: "MultimediaApiConfig",
	table: multimedia_api_configs,
	row: MultimediaApiConfig,
	create: NewMultimediaApiConfig,
	update: MultimediaApiConfigUpdate,
	filter: MultimediaApiConfigWhere,
	unique: MultimediaApiConfigUnique,
	args: MultimediaApiConfigFindMany,
	field: MultimediaApiConfigField {
		Id => id: String,
		UserId => user_id: i32,
		CreatedAt => created_at: DateTime<Utc>,
		UpdatedAt => updated_at: DateTime<Utc>,
	},
	primary_key: Id,
	repo: MultimediaApiConfigRepo,
	delegate: MultimediaApiConfigDelegate,
}
