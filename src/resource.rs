//! Per-user collections served over HTTP. Every operation is scoped to the
//! owning user: rows belonging to someone else behave as if they did not
//! exist.

use diesel::prelude::*;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
	error::DbResult,
	models::{
		ActionConfiguration, ActionConfigurationRequest, ActionConfigurationUpdate, ActionSymbol,
		ActionSymbolRequest, ActionSymbolUpdate, GenerationHistory, GenerationHistoryUpdate,
		GenerationRequest, ListQuery, NewActionConfiguration, NewActionSymbol,
		NewGenerationHistory, NewQuickStoryboardConfig, NewSymbol, QuickStoryboardConfig,
		QuickStoryboardConfigUpdate, StoryboardConfigRequest, Symbol, SymbolRequest, SymbolUpdate,
	},
	query::{FindManyArgs, ScalarFilter, SortOrder, StringFilter},
	repo::*,
};

pub trait OwnedResource: Serialize + Send + Sized + 'static {
	const NAME: &'static str;
	type Create: DeserializeOwned + Validate + Send + 'static;
	type Patch: DeserializeOwned + Validate + Send + 'static;

	fn list(conn: &mut PgConnection, user_id: i32, query: &ListQuery) -> DbResult<Vec<Self>>;
	fn create(conn: &mut PgConnection, user_id: i32, input: Self::Create) -> DbResult<Self>;
	fn update(conn: &mut PgConnection, user_id: i32, id: &str, patch: Self::Patch)
		-> DbResult<Self>;
	fn delete(conn: &mut PgConnection, user_id: i32, id: &str) -> DbResult<Self>;
}

fn page<W, F, U>(args: FindManyArgs<W, F, U>, query: &ListQuery) -> FindManyArgs<W, F, U> {
	args.take(query.take()).skip(query.skip())
}

fn owner(user_id: i32) -> Option<ScalarFilter<i32>> {
	Some(ScalarFilter::Equals(user_id))
}

fn exact(id: &str) -> Option<StringFilter> {
	Some(StringFilter::Equals(id.to_string()))
}

impl OwnedResource for Symbol {
	const NAME: &'static str = SymbolRepo::MODEL;
	type Create = SymbolRequest;
	type Patch = SymbolUpdate;

	fn list(conn: &mut PgConnection, user_id: i32, query: &ListQuery) -> DbResult<Vec<Self>> {
		let args = SymbolFindMany::new()
			.filter(SymbolWhere { user_id: owner(user_id), ..Default::default() })
			.order_by(SymbolField::CreatedAt, SortOrder::Desc);
		SymbolRepo::find_many(conn, &page(args, query))
	}

	fn create(conn: &mut PgConnection, user_id: i32, input: SymbolRequest) -> DbResult<Self> {
		let new_symbol = NewSymbol {
			id: None,
			user_id,
			icon: input.icon,
			name: input.name,
			description: input.description,
		};
		SymbolRepo::create(conn, &new_symbol)
	}

	fn update(
		conn: &mut PgConnection,
		user_id: i32,
		id: &str,
		patch: SymbolUpdate,
	) -> DbResult<Self> {
		let owned = SymbolFindMany::new().filter(SymbolWhere {
			id: exact(id),
			user_id: owner(user_id),
			..Default::default()
		});
		conn.transaction(|conn| {
			SymbolRepo::find_first_or_throw(conn, &owned)?;
			SymbolRepo::update(conn, &SymbolUnique::Id(id.to_string()), &patch)
		})
	}

	fn delete(conn: &mut PgConnection, user_id: i32, id: &str) -> DbResult<Self> {
		let owned = SymbolFindMany::new().filter(SymbolWhere {
			id: exact(id),
			user_id: owner(user_id),
			..Default::default()
		});
		conn.transaction(|conn| {
			SymbolRepo::find_first_or_throw(conn, &owned)?;
			SymbolRepo::delete(conn, &SymbolUnique::Id(id.to_string()))
		})
	}
}

impl OwnedResource for ActionSymbol {
	const NAME: &'static str = ActionSymbolRepo::MODEL;
	type Create = ActionSymbolRequest;
	type Patch = ActionSymbolUpdate;

	fn list(conn: &mut PgConnection, user_id: i32, query: &ListQuery) -> DbResult<Vec<Self>> {
		let args = ActionSymbolFindMany::new()
			.filter(ActionSymbolWhere { user_id: owner(user_id), ..Default::default() })
			.order_by(ActionSymbolField::CreatedAt, SortOrder::Desc);
		ActionSymbolRepo::find_many(conn, &page(args, query))
	}

	fn create(conn: &mut PgConnection, user_id: i32, input: ActionSymbolRequest) -> DbResult<Self> {
		let new_symbol = NewActionSymbol {
			id: None,
			user_id,
			name: input.name,
			icon: input.icon,
			description: input.description,
			prompt: input.prompt,
		};
		ActionSymbolRepo::create(conn, &new_symbol)
	}

	fn update(
		conn: &mut PgConnection,
		user_id: i32,
		id: &str,
		patch: ActionSymbolUpdate,
	) -> DbResult<Self> {
		let owned = ActionSymbolFindMany::new().filter(ActionSymbolWhere {
			id: exact(id),
			user_id: owner(user_id),
			..Default::default()
		});
		conn.transaction(|conn| {
			ActionSymbolRepo::find_first_or_throw(conn, &owned)?;
			ActionSymbolRepo::update(conn, &ActionSymbolUnique::Id(id.to_string()), &patch)
		})
	}

	fn delete(conn: &mut PgConnection, user_id: i32, id: &str) -> DbResult<Self> {
		let owned = ActionSymbolFindMany::new().filter(ActionSymbolWhere {
			id: exact(id),
			user_id: owner(user_id),
			..Default::default()
		});
		conn.transaction(|conn| {
			ActionSymbolRepo::find_first_or_throw(conn, &owned)?;
			ActionSymbolRepo::delete(conn, &ActionSymbolUnique::Id(id.to_string()))
		})
	}
}

impl OwnedResource for QuickStoryboardConfig {
	const NAME: &'static str = QuickStoryboardConfigRepo::MODEL;
	type Create = StoryboardConfigRequest;
	type Patch = QuickStoryboardConfigUpdate;

	fn list(conn: &mut PgConnection, user_id: i32, query: &ListQuery) -> DbResult<Vec<Self>> {
		let args = QuickStoryboardConfigFindMany::new()
			.filter(QuickStoryboardConfigWhere { user_id: owner(user_id), ..Default::default() })
			.order_by(QuickStoryboardConfigField::CreatedAt, SortOrder::Desc);
		QuickStoryboardConfigRepo::find_many(conn, &page(args, query))
	}

	fn create(
		conn: &mut PgConnection,
		user_id: i32,
		input: StoryboardConfigRequest,
	) -> DbResult<Self> {
		let new_config = NewQuickStoryboardConfig {
			id: None,
			user_id,
			name: input.name,
			description: input.description,
			story_template: input.story_template,
			scene_template: input.scene_template,
			image_template: input.image_template,
			video_template: input.video_template,
		};
		QuickStoryboardConfigRepo::create(conn, &new_config)
	}

	fn update(
		conn: &mut PgConnection,
		user_id: i32,
		id: &str,
		patch: QuickStoryboardConfigUpdate,
	) -> DbResult<Self> {
		let owned = QuickStoryboardConfigFindMany::new().filter(QuickStoryboardConfigWhere {
			id: exact(id),
			user_id: owner(user_id),
			..Default::default()
		});
		conn.transaction(|conn| {
			QuickStoryboardConfigRepo::find_first_or_throw(conn, &owned)?;
			QuickStoryboardConfigRepo::update(
				conn,
				&QuickStoryboardConfigUnique::Id(id.to_string()),
				&patch,
			)
		})
	}

	fn delete(conn: &mut PgConnection, user_id: i32, id: &str) -> DbResult<Self> {
		let owned = QuickStoryboardConfigFindMany::new().filter(QuickStoryboardConfigWhere {
			id: exact(id),
			user_id: owner(user_id),
			..Default::default()
		});
		conn.transaction(|conn| {
			QuickStoryboardConfigRepo::find_first_or_throw(conn, &owned)?;
			QuickStoryboardConfigRepo::delete(conn, &QuickStoryboardConfigUnique::Id(id.to_string()))
		})
	}
}

impl OwnedResource for ActionConfiguration {
	const NAME: &'static str = ActionConfigurationRepo::MODEL;
	type Create = ActionConfigurationRequest;
	type Patch = ActionConfigurationUpdate;

	fn list(conn: &mut PgConnection, user_id: i32, query: &ListQuery) -> DbResult<Vec<Self>> {
		let args = ActionConfigurationFindMany::new()
			.filter(ActionConfigurationWhere { user_id: owner(user_id), ..Default::default() })
			.order_by(ActionConfigurationField::CreatedAt, SortOrder::Desc);
		ActionConfigurationRepo::find_many(conn, &page(args, query))
	}

	fn create(
		conn: &mut PgConnection,
		user_id: i32,
		input: ActionConfigurationRequest,
	) -> DbResult<Self> {
		let new_config = NewActionConfiguration {
			id: None,
			user_id,
			name: input.name,
			description: input.description,
			system_template: input.system_template,
			user_template: input.user_template,
			image_template: input.image_template,
			video_template: input.video_template,
		};
		ActionConfigurationRepo::create(conn, &new_config)
	}

	fn update(
		conn: &mut PgConnection,
		user_id: i32,
		id: &str,
		patch: ActionConfigurationUpdate,
	) -> DbResult<Self> {
		let owned = ActionConfigurationFindMany::new().filter(ActionConfigurationWhere {
			id: exact(id),
			user_id: owner(user_id),
			..Default::default()
		});
		conn.transaction(|conn| {
			ActionConfigurationRepo::find_first_or_throw(conn, &owned)?;
			ActionConfigurationRepo::update(
				conn,
				&ActionConfigurationUnique::Id(id.to_string()),
				&patch,
			)
		})
	}

	fn delete(conn: &mut PgConnection, user_id: i32, id: &str) -> DbResult<Self> {
		let owned = ActionConfigurationFindMany::new().filter(ActionConfigurationWhere {
			id: exact(id),
			user_id: owner(user_id),
			..Default::default()
		});
		conn.transaction(|conn| {
			ActionConfigurationRepo::find_first_or_throw(conn, &owned)?;
			ActionConfigurationRepo::delete(conn, &ActionConfigurationUnique::Id(id.to_string()))
		})
	}
}

impl OwnedResource for GenerationHistory {
	const NAME: &'static str = GenerationHistoryRepo::MODEL;
	type Create = GenerationRequest;
	type Patch = GenerationHistoryUpdate;

	/// Newest first, optionally narrowed to one generation type.
	fn list(conn: &mut PgConnection, user_id: i32, query: &ListQuery) -> DbResult<Vec<Self>> {
		let args = GenerationHistoryFindMany::new()
			.filter(GenerationHistoryWhere {
				user_id: owner(user_id),
				kind: query.kind.clone().map(StringFilter::Equals),
				..Default::default()
			})
			.order_by(GenerationHistoryField::CreatedAt, SortOrder::Desc);
		GenerationHistoryRepo::find_many(conn, &page(args, query))
	}

	fn create(conn: &mut PgConnection, user_id: i32, input: GenerationRequest) -> DbResult<Self> {
		let metadata = match input.metadata {
			Value::Null => json!({}),
			metadata => metadata,
		};
		let new_generation = NewGenerationHistory {
			id: None,
			user_id,
			kind: input.kind,
			prompt: input.prompt,
			images: input.images,
			metadata,
		};
		GenerationHistoryRepo::create(conn, &new_generation)
	}

	fn update(
		conn: &mut PgConnection,
		user_id: i32,
		id: &str,
		patch: GenerationHistoryUpdate,
	) -> DbResult<Self> {
		let owned = GenerationHistoryFindMany::new().filter(GenerationHistoryWhere {
			id: exact(id),
			user_id: owner(user_id),
			..Default::default()
		});
		conn.transaction(|conn| {
			GenerationHistoryRepo::find_first_or_throw(conn, &owned)?;
			GenerationHistoryRepo::update(conn, &GenerationHistoryUnique::Id(id.to_string()), &patch)
		})
	}

	fn delete(conn: &mut PgConnection, user_id: i32, id: &str) -> DbResult<Self> {
		let owned = GenerationHistoryFindMany::new().filter(GenerationHistoryWhere {
			id: exact(id),
			user_id: owner(user_id),
			..Default::default()
		});
		conn.transaction(|conn| {
			GenerationHistoryRepo::find_first_or_throw(conn, &owned)?;
			GenerationHistoryRepo::delete(conn, &GenerationHistoryUnique::Id(id.to_string()))
		})
	}
}
