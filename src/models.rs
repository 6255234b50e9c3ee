use crate::schema::*;
use chrono::{DateTime, Utc};
use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: i32,
	pub username: String,
	pub email: String,
	#[serde(skip_serializing, default)]
	pub password: String,
	pub balance: f64,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = users)]
pub struct NewUser {
	pub username: String,
	pub email: String,
	pub password: String,
	#[serde(default)]
	pub balance: Option<f64>,
}

#[derive(AsChangeset, Serialize, Deserialize, Default, Debug, Clone)]
#[diesel(table_name = users)]
pub struct UserUpdate {
	pub username: Option<String>,
	pub email: Option<String>,
	pub password: Option<String>,
	pub balance: Option<f64>,
	#[serde(skip)]
	pub updated_at: Option<DateTime<Utc>>,
}

#[derive(
	Queryable, Selectable, Identifiable, Associations, Serialize, Deserialize, Debug, Clone, PartialEq,
)]
#[diesel(table_name = transactions)]
#[diesel(belongs_to(User))]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
	pub id: i32,
	pub user_id: i32,
	#[serde(rename = "type")]
	pub kind: String,
	pub amount: f64,
	pub description: Option<String>,
	pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = transactions)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
	pub user_id: i32,
	#[serde(rename = "type")]
	pub kind: String,
	pub amount: f64,
	pub description: Option<String>,
}

#[derive(AsChangeset, Serialize, Deserialize, Default, Debug, Clone)]
#[diesel(table_name = transactions)]
pub struct TransactionUpdate {
	#[serde(rename = "type")]
	pub kind: Option<String>,
	pub amount: Option<f64>,
	pub description: Option<Option<String>>,
}

#[derive(
	Queryable, Selectable, Identifiable, Associations, Serialize, Deserialize, Debug, Clone, PartialEq,
)]
#[diesel(table_name = symbols)]
#[diesel(belongs_to(User))]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
	pub id: String,
	pub user_id: i32,
	pub icon: String,
	pub name: String,
	pub description: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = symbols)]
#[serde(rename_all = "camelCase")]
pub struct NewSymbol {
	#[serde(default)]
	pub id: Option<String>,
	pub user_id: i32,
	pub icon: String,
	pub name: String,
	pub description: String,
}

#[derive(AsChangeset, Serialize, Deserialize, Default, Debug, Clone, Validate)]
#[diesel(table_name = symbols)]
pub struct SymbolUpdate {
	#[validate(length(min = 1, max = 16))]
	pub icon: Option<String>,
	#[validate(length(min = 1, max = 100))]
	pub name: Option<String>,
	pub description: Option<String>,
	#[serde(skip)]
	pub updated_at: Option<DateTime<Utc>>,
}

#[derive(
	Queryable, Selectable, Identifiable, Associations, Serialize, Deserialize, Debug, Clone, PartialEq,
)]
#[diesel(table_name = quick_storyboard_configs)]
#[diesel(belongs_to(User))]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct QuickStoryboardConfig {
	pub id: String,
	pub user_id: i32,
	pub name: String,
	pub description: String,
	pub story_template: String,
	pub scene_template: String,
	pub image_template: String,
	pub video_template: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = quick_storyboard_configs)]
#[serde(rename_all = "camelCase")]
pub struct NewQuickStoryboardConfig {
	#[serde(default)]
	pub id: Option<String>,
	pub user_id: i32,
	pub name: String,
	pub description: String,
	pub story_template: String,
	pub scene_template: String,
	pub image_template: String,
	pub video_template: String,
}

#[derive(AsChangeset, Serialize, Deserialize, Default, Debug, Clone, Validate)]
#[diesel(table_name = quick_storyboard_configs)]
#[serde(rename_all = "camelCase")]
pub struct QuickStoryboardConfigUpdate {
	#[validate(length(min = 1, max = 100))]
	pub name: Option<String>,
	pub description: Option<String>,
	pub story_template: Option<String>,
	pub scene_template: Option<String>,
	pub image_template: Option<String>,
	pub video_template: Option<String>,
	#[serde(skip)]
	pub updated_at: Option<DateTime<Utc>>,
}

#[derive(
	Queryable, Selectable, Identifiable, Associations, Serialize, Deserialize, Debug, Clone, PartialEq,
)]
#[diesel(table_name = generation_histories)]
#[diesel(belongs_to(User))]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct GenerationHistory {
	pub id: String,
	pub user_id: i32,
	#[serde(rename = "type")]
	pub kind: String,
	pub prompt: String,
	pub images: Vec<String>,
	pub metadata: Value,
	pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = generation_histories)]
#[serde(rename_all = "camelCase")]
pub struct NewGenerationHistory {
	#[serde(default)]
	pub id: Option<String>,
	pub user_id: i32,
	#[serde(rename = "type")]
	pub kind: String,
	pub prompt: String,
	#[serde(default)]
	pub images: Vec<String>,
	#[serde(default)]
	pub metadata: Value,
}

#[derive(AsChangeset, Serialize, Deserialize, Default, Debug, Clone, Validate)]
#[diesel(table_name = generation_histories)]
pub struct GenerationHistoryUpdate {
	#[serde(rename = "type")]
	#[validate(length(min = 1, max = 50))]
	pub kind: Option<String>,
	#[validate(length(min = 1))]
	pub prompt: Option<String>,
	pub images: Option<Vec<String>>,
	pub metadata: Option<Value>,
}

#[derive(
	Queryable, Selectable, Identifiable, Associations, Serialize, Deserialize, Debug, Clone, PartialEq,
)]
#[diesel(table_name = action_symbols)]
#[diesel(belongs_to(User))]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct ActionSymbol {
	pub id: String,
	pub user_id: i32,
	pub name: String,
	pub icon: String,
	pub description: String,
	pub prompt: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = action_symbols)]
#[serde(rename_all = "camelCase")]
pub struct NewActionSymbol {
	#[serde(default)]
	pub id: Option<String>,
	pub user_id: i32,
	pub name: String,
	pub icon: String,
	pub description: String,
	pub prompt: String,
}

#[derive(AsChangeset, Serialize, Deserialize, Default, Debug, Clone, Validate)]
#[diesel(table_name = action_symbols)]
pub struct ActionSymbolUpdate {
	#[validate(length(min = 1, max = 100))]
	pub name: Option<String>,
	#[validate(length(min = 1, max = 16))]
	pub icon: Option<String>,
	pub description: Option<String>,
	#[validate(length(min = 1))]
	pub prompt: Option<String>,
	#[serde(skip)]
	pub updated_at: Option<DateTime<Utc>>,
}

#[derive(
	Queryable, Selectable, Identifiable, Associations, Serialize, Deserialize, Debug, Clone, PartialEq,
)]
#[diesel(table_name = action_configurations)]
#[diesel(belongs_to(User))]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct ActionConfiguration {
	pub id: String,
	pub user_id: i32,
	pub name: String,
	pub description: String,
	pub system_template: String,
	pub user_template: String,
	pub image_template: String,
	pub video_template: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = action_configurations)]
#[serde(rename_all = "camelCase")]
pub struct NewActionConfiguration {
	#[serde(default)]
	pub id: Option<String>,
	pub user_id: i32,
	pub name: String,
	pub description: String,
	pub system_template: String,
	pub user_template: String,
	pub image_template: String,
	pub video_template: String,
}

#[derive(AsChangeset, Serialize, Deserialize, Default, Debug, Clone, Validate)]
#[diesel(table_name = action_configurations)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfigurationUpdate {
	#[validate(length(min = 1, max = 100))]
	pub name: Option<String>,
	pub description: Option<String>,
	pub system_template: Option<String>,
	pub user_template: Option<String>,
	pub image_template: Option<String>,
	pub video_template: Option<String>,
	#[serde(skip)]
	pub updated_at: Option<DateTime<Utc>>,
}

#[derive(
	Queryable, Selectable, Identifiable, Associations, Serialize, Deserialize, Debug, Clone, PartialEq,
)]
#[diesel(table_name = multimedia_api_configs)]
#[diesel(belongs_to(User))]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct MultimediaApiConfig {
	pub id: String,
	pub user_id: i32,
	pub config: Value,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = multimedia_api_configs)]
#[serde(rename_all = "camelCase")]
pub struct NewMultimediaApiConfig {
	#[serde(default)]
	pub id: Option<String>,
	pub user_id: i32,
	pub config: Value,
}

#[derive(AsChangeset, Serialize, Deserialize, Default, Debug, Clone)]
#[diesel(table_name = multimedia_api_configs)]
pub struct MultimediaApiConfigUpdate {
	pub config: Option<Value>,
	#[serde(skip)]
	pub updated_at: Option<DateTime<Utc>>,
}

/// A user together with whichever relations were requested.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserWithRelations {
	#[serde(flatten)]
	pub user: User,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub transactions: Option<Vec<Transaction>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub symbols: Option<Vec<Symbol>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub quick_storyboard_configs: Option<Vec<QuickStoryboardConfig>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub generation_history: Option<Vec<GenerationHistory>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub action_symbols: Option<Vec<ActionSymbol>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub action_configurations: Option<Vec<ActionConfiguration>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub multimedia_api_config: Option<Option<MultimediaApiConfig>>,
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserInclude {
	pub transactions: bool,
	pub symbols: bool,
	pub quick_storyboard_configs: bool,
	pub generation_history: bool,
	pub action_symbols: bool,
	pub action_configurations: bool,
	pub multimedia_api_config: bool,
}

impl UserInclude {
	pub fn all() -> Self {
		Self {
			transactions: true,
			symbols: true,
			quick_storyboard_configs: true,
			generation_history: true,
			action_symbols: true,
			action_configurations: true,
			multimedia_api_config: true,
		}
	}
}

/// Envelope for every HTTP response body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
	pub status: String,
	pub data: Option<T>,
	pub error: Option<String>,
}

impl<T> ApiResponse<T> {
	pub fn success(data: T) -> Self {
		Self { status: "success".to_string(), data: Some(data), error: None }
	}

	pub fn failure(error: impl Into<String>) -> Self {
		Self { status: "error".to_string(), data: None, error: Some(error.into()) }
	}
}

#[derive(Deserialize, Debug, Validate)]
pub struct RegisterRequest {
	#[validate(length(min = 3, max = 50))]
	pub username: String,
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
}

#[derive(Deserialize, Debug, Validate)]
pub struct LoginRequest {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 1))]
	pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoginResp {
	pub uid: String,
	pub token: String,
}

#[derive(Deserialize, Debug, Validate)]
pub struct ProfileUpdate {
	#[validate(length(min = 3, max = 50))]
	pub username: Option<String>,
	#[validate(email)]
	pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BalanceResp {
	pub balance: f64,
}

/// Pagination and filtering accepted by list endpoints.
#[derive(Deserialize, Debug, Default, Clone, Validate)]
pub struct ListQuery {
	#[validate(range(min = 1, max = 100))]
	pub take: Option<i64>,
	#[validate(range(min = 0))]
	pub skip: Option<i64>,
	#[serde(rename = "type")]
	pub kind: Option<String>,
}

impl ListQuery {
	pub const DEFAULT_TAKE: i64 = 50;

	pub fn take(&self) -> i64 {
		self.take.unwrap_or(Self::DEFAULT_TAKE)
	}

	pub fn skip(&self) -> i64 {
		self.skip.unwrap_or(0)
	}
}

#[derive(Deserialize, Debug, Validate)]
pub struct SymbolRequest {
	#[validate(length(min = 1, max = 16))]
	pub icon: String,
	#[validate(length(min = 1, max = 100))]
	pub name: String,
	#[serde(default)]
	pub description: String,
}

#[derive(Deserialize, Debug, Validate)]
pub struct ActionSymbolRequest {
	#[validate(length(min = 1, max = 100))]
	pub name: String,
	#[validate(length(min = 1, max = 16))]
	pub icon: String,
	#[serde(default)]
	pub description: String,
	#[validate(length(min = 1))]
	pub prompt: String,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardConfigRequest {
	#[validate(length(min = 1, max = 100))]
	pub name: String,
	#[serde(default)]
	pub description: String,
	pub story_template: String,
	pub scene_template: String,
	pub image_template: String,
	pub video_template: String,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfigurationRequest {
	#[validate(length(min = 1, max = 100))]
	pub name: String,
	#[serde(default)]
	pub description: String,
	pub system_template: String,
	pub user_template: String,
	pub image_template: String,
	pub video_template: String,
}

#[derive(Deserialize, Debug, Validate)]
pub struct GenerationRequest {
	#[serde(rename = "type")]
	#[validate(length(min = 1, max = 50))]
	pub kind: String,
	#[validate(length(min = 1))]
	pub prompt: String,
	#[serde(default)]
	pub images: Vec<String>,
	#[serde(default)]
	pub metadata: Value,
}

#[derive(Deserialize, Debug)]
pub struct MultimediaConfigRequest {
	pub config: Value,
}
