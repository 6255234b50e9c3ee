use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::{compose_where, delegate, new_id, CreateInput, UpdateInput};
use crate::{
	models::{NewQuickStoryboardConfig, QuickStoryboardConfig, QuickStoryboardConfigUpdate},
	query::{
		scalar_condition, string_condition, BoxedCondition, DateTimeFilter, Filter, IntFilter,
		StringFilter,
	},
	schema::quick_storyboard_configs,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuickStoryboardConfigWhere {
	pub id: Option<StringFilter>,
	pub user_id: Option<IntFilter>,
	pub name: Option<StringFilter>,
	pub description: Option<StringFilter>,
	pub story_template: Option<StringFilter>,
	pub scene_template: Option<StringFilter>,
	pub image_template: Option<StringFilter>,
	pub video_template: Option<StringFilter>,
	pub created_at: Option<DateTimeFilter>,
	pub updated_at: Option<DateTimeFilter>,
	pub and: Vec<QuickStoryboardConfigWhere>,
	pub or: Option<Vec<QuickStoryboardConfigWhere>>,
	pub not: Vec<QuickStoryboardConfigWhere>,
}

impl Filter<quick_storyboard_configs::table> for QuickStoryboardConfigWhere {
	fn condition(&self) -> BoxedCondition<quick_storyboard_configs::table> {
		use quick_storyboard_configs as qsc;
		let mut parts = Vec::new();
		if let Some(filter) = &self.id {
			parts.push(string_condition!(qsc, qsc::id, filter));
		}
		if let Some(filter) = &self.user_id {
			parts.push(scalar_condition!(qsc, qsc::user_id, filter));
		}
		if let Some(filter) = &self.name {
			parts.push(string_condition!(qsc, qsc::name, filter));
		}
		if let Some(filter) = &self.description {
			parts.push(string_condition!(qsc, qsc::description, filter));
		}
		if let Some(filter) = &self.story_template {
			parts.push(string_condition!(qsc, qsc::story_template, filter));
		}
		if let Some(filter) = &self.scene_template {
			parts.push(string_condition!(qsc, qsc::scene_template, filter));
		}
		if let Some(filter) = &self.image_template {
			parts.push(string_condition!(qsc, qsc::image_template, filter));
		}
		if let Some(filter) = &self.video_template {
			parts.push(string_condition!(qsc, qsc::video_template, filter));
		}
		if let Some(filter) = &self.created_at {
			parts.push(scalar_condition!(qsc, qsc::created_at, filter));
		}
		if let Some(filter) = &self.updated_at {
			parts.push(scalar_condition!(qsc, qsc::updated_at, filter));
		}
		compose_where!(qsc, self, parts)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuickStoryboardConfigUnique {
	Id(String),
}

impl Filter<quick_storyboard_configs::table> for QuickStoryboardConfigUnique {
	fn condition(&self) -> BoxedCondition<quick_storyboard_configs::table> {
		match self {
			QuickStoryboardConfigUnique::Id(id) => {
				Box::new(quick_storyboard_configs::id.eq(id.clone()))
			},
		}
	}
}

impl CreateInput for NewQuickStoryboardConfig {
	fn assign_id(&mut self) {
		self.id.get_or_insert_with(new_id);
	}
}

impl UpdateInput for QuickStoryboardConfigUpdate {
	fn touch(&mut self) {
		self.updated_at = Some(Utc::now());
	}

	fn is_empty(&self) -> bool {
		self.name.is_none()
			&& self.description.is_none()
			&& self.story_template.is_none()
			&& self.scene_template.is_none()
			&& self.image_template.is_none()
			&& self.video_template.is_none()
			&& self.updated_at.is_none()
	}
}

delegate! {
	model: "QuickStoryboardConfig",
	table: quick_storyboard_configs,
	row: QuickStoryboardConfig,
	create: NewQuickStoryboardConfig,
	update: QuickStoryboardConfigUpdate,
	filter: QuickStoryboardConfigWhere,
	unique: QuickStoryboardConfigUnique,
	args: QuickStoryboardConfigFindMany,
	field: QuickStoryboardConfigField {
		Id => id: String,
		UserId => user_id: i32,
		Name => name: String,
		Description => description: String,
		StoryTemplate => story_template: String,
		SceneTemplate => scene_template: String,
		ImageTemplate => image_template: String,
		VideoTemplate => video_template: String,
		CreatedAt => created_at: DateTime<Utc>,
		UpdatedAt => updated_at: DateTime<Utc>,
	},
	primary_key: Id,
	repo: QuickStoryboardConfigRepo,
	delegate: QuickStoryboardConfigDelegate,
}
