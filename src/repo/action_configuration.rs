use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::{compose_where, delegate, new_id, CreateInput, UpdateInput};
use crate::{
	models::{ActionConfiguration, ActionConfigurationUpdate, NewActionConfiguration},
	query::{
		scalar_condition, string_condition, BoxedCondition, DateTimeFilter, Filter, IntFilter,
		StringFilter,
	},
	schema::action_configurations,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionConfigurationWhere {
	pub id: Option<StringFilter>,
	pub user_id: Option<IntFilter>,
	pub name: Option<StringFilter>,
	pub description: Option<StringFilter>,
	pub system_template: Option<StringFilter>,
	pub user_template: Option<StringFilter>,
	pub image_template: Option<StringFilter>,
	pub video_template: Option<StringFilter>,
	pub created_at: Option<DateTimeFilter>,
	pub updated_at: Option<DateTimeFilter>,
	pub and: Vec<ActionConfigurationWhere>,
	pub or: Option<Vec<ActionConfigurationWhere>>,
	pub not: Vec<ActionConfigurationWhere>,
}

impl Filter<action_configurations::table> for ActionConfigurationWhere {
	fn condition(&self) -> BoxedCondition<action_configurations::table> {
		use action_configurations as ac;
		let mut parts = Vec::new();
		if let Some(filter) = &self.id {
			parts.push(string_condition!(ac, ac::id, filter));
		}
		if let Some(filter) = &self.user_id {
			parts.push(scalar_condition!(ac, ac::user_id, filter));
		}
		if let Some(filter) = &self.name {
			parts.push(string_condition!(ac, ac::name, filter));
		}
		if let Some(filter) = &self.description {
			parts.push(string_condition!(ac, ac::description, filter));
		}
		if let Some(filter) = &self.system_template {
			parts.push(string_condition!(ac, ac::system_template, filter));
		}
		if let Some(filter) = &self.user_template {
			parts.push(string_condition!(ac, ac::user_template, filter));
		}
		if let Some(filter) = &self.image_template {
			parts.push(string_condition!(ac, ac::image_template, filter));
		}
		if let Some(filter) = &self.video_template {
			parts.push(string_condition!(ac, ac::video_template, filter));
		}
		if let Some(filter) = &self.created_at {
			parts.push(scalar_condition!(ac, ac::created_at, filter));
		}
		if let Some(filter) = &self.updated_at {
			parts.push(scalar_condition!(ac, ac::updated_at, filter));
		}
		compose_where!(ac, self, parts)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionConfigurationUnique {
	Id(String),
}

impl Filter<action_configurations::table> for ActionConfigurationUnique {
	fn condition(&self) -> BoxedCondition<action_configurations::table> {
		match self {
			ActionConfigurationUnique::Id(id) => Box::new(action_configurations::id.eq(id.clone())),
		}
	}
}

impl CreateInput for NewActionConfiguration {
	fn assign_id(&mut self) {
		self.id.get_or_insert_with(new_id);
	}
}

impl UpdateInput for ActionConfigurationUpdate {
	fn touch(&mut self) {
		self.updated_at = Some(Utc::now());
	}

	fn is_empty(&self) -> bool {
		self.name.is_none()
			&& self.description.is_none()
			&& self.system_template.is_none()
			&& self.user_template.is_none()
			&& self.image_template.is_none()
			&& self.video_template.is_none()
			&& self.updated_at.is_none()
	}
}

delegate! {
	model: "ActionConfiguration",
	table: action_configurations,
	row: ActionConfiguration,
	create: NewActionConfiguration,
	update: ActionConfigurationUpdate,
	filter: ActionConfigurationWhere,
	unique: ActionConfigurationUnique,
	args: ActionConfigurationFindMany,
	field: ActionConfigurationField {
		Id => id: String,
		UserId => user_id: i32,
		Name => name: String,
		Description => description: String,
		SystemTemplate => system_template: String,
		UserTemplate => user_template: String,
		ImageTemplate => image_template: String,
		VideoTemplate => video_template: String,
		CreatedAt => created_at: DateTime<Utc>,
		UpdatedAt => updated_at: DateTime<Utc>,
	},
	primary_key: Id,
	repo: ActionConfigurationRepo,
	delegate: ActionConfigurationDelegate,
}
