use diesel::{
	pg::Pg,
	prelude::*,
	sql_types::{Integer, Text},
};
use serde_json::json;

use crate::{
	error::{DbError, KnownErrorKind},
	models::{
		GenerationHistoryUpdate, MultimediaApiConfigUpdate, Symbol, SymbolUpdate, TransactionUpdate,
		UserInclude, UserUpdate,
	},
	query::{JsonFilter, ListFilter, NumberUpdate, ScalarFilter, SortOrder, StringFilter},
	raw,
	repo::{
		ActionConfigurationRepo, ActionSymbolRepo, ActionSymbolWhere, GenerationHistoryFindMany,
		GenerationHistoryRepo, GenerationHistoryUnique, GenerationHistoryWhere,
		MultimediaApiConfigRepo, MultimediaApiConfigUnique, QuickStoryboardConfigRepo, SymbolField,
		SymbolFindMany, SymbolRepo, SymbolUnique, SymbolWhere, TransactionFindMany, TransactionRepo,
		TransactionUnique, TransactionWhere, UserField, UserFindMany, UserRepo, UserUnique,
		UserWhere,
	},
	tests::{fixtures::TestFixtures, test_utils::test_connection},
};

#[derive(QueryableByName, Debug)]
struct NameRow {
	#[diesel(sql_type = Text)]
	username: String,
}

fn owned_by(user_id: i32) -> SymbolWhere {
	SymbolWhere { user_id: Some(ScalarFilter::Equals(user_id)), ..Default::default() }
}

fn names(rows: &[Symbol]) -> Vec<&str> {
	rows.iter().map(|row| row.name.as_str()).collect()
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_user_crud() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 10.0);
	assert_eq!(user.balance, 10.0);

	let found = UserRepo::find_unique(&mut conn, &UserUnique::Email(user.email.clone())).unwrap();
	assert_eq!(found.map(|found| found.id), Some(user.id));

	let update = UserUpdate { username: Some(format!("{}_renamed", user.username)), ..Default::default() };
	let renamed = UserRepo::update(&mut conn, &UserUnique::Id(user.id), &update).unwrap();
	assert!(renamed.username.ends_with("_renamed"));
	assert_eq!(renamed.email, user.email);

	let deleted = UserRepo::delete(&mut conn, &UserUnique::Id(user.id)).unwrap();
	assert_eq!(deleted.id, user.id);
	assert!(UserRepo::find_unique(&mut conn, &UserUnique::Id(user.id)).unwrap().is_none());

	let missing = UserRepo::find_unique_or_throw(&mut conn, &UserUnique::Id(user.id)).unwrap_err();
	assert!(matches!(missing, DbError::NotFound { model: "User" }));
	let missing = UserRepo::delete(&mut conn, &UserUnique::Id(user.id)).unwrap_err();
	assert!(missing.is_not_found());
	let missing = UserRepo::update(&mut conn, &UserUnique::Id(user.id), &update).unwrap_err();
	assert!(missing.is_not_found());
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_unique_violation_is_classified() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 0.0);

	let mut duplicate = TestFixtures::new_user(0.0);
	duplicate.email = user.email.clone();
	let error = conn
		.transaction(|conn| UserRepo::create(conn, &duplicate))
		.unwrap_err();
	assert_eq!(error.known_kind(), Some(KnownErrorKind::UniqueViolation));
	match error {
		DbError::KnownRequest { constraint, .. } => {
			assert_eq!(constraint.as_deref(), Some("users_email_key"))
		},
		other => panic!("unexpected error: {:?}", other),
	}

	// the outer transaction is still usable after the savepoint rolled back
	assert_eq!(
		UserRepo::count(
			&mut conn,
			Some(&UserWhere { email: Some(StringFilter::Equals(user.email)), ..Default::default() })
		)
		.unwrap(),
		1
	);
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_foreign_key_violation() {
	let mut conn = test_connection();
	let error = conn
		.transaction(|conn| SymbolRepo::create(conn, &TestFixtures::symbol(-1, "orphan")))
		.unwrap_err();
	assert_eq!(error.known_kind(), Some(KnownErrorKind::ForeignKeyViolation));
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_update_and_empty_update() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 5.0);
	let symbol = SymbolRepo::create(&mut conn, &TestFixtures::symbol(user.id, "star")).unwrap();
	assert_eq!(symbol.id.len(), 36);

	let transaction =
		TransactionRepo::create(&mut conn, &TestFixtures::transaction(user.id, "credit", 1.0)).unwrap();
	let unchanged = TransactionRepo::update(
		&mut conn,
		&TransactionUnique::Id(transaction.id),
		&TransactionUpdate::default(),
	)
	.unwrap();
	assert_eq!(unchanged, transaction);

	let renamed = SymbolRepo::update(
		&mut conn,
		&SymbolUnique::Id(symbol.id.clone()),
		&SymbolUpdate { name: Some("moon".to_string()), ..Default::default() },
	)
	.unwrap();
	assert_eq!(renamed.name, "moon");
	assert_eq!(renamed.description, symbol.description);
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_pagination_and_cursor() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 0.0);
	let data: Vec<_> =
		["a", "b", "c", "d", "e"].iter().map(|name| TestFixtures::symbol(user.id, name)).collect();
	let created = SymbolRepo::create_many_and_return(&mut conn, &data, false).unwrap();
	assert_eq!(created.len(), 5);

	let by_name = || SymbolFindMany::new().filter(owned_by(user.id)).order_by(SymbolField::Name, SortOrder::Asc);

	let page = SymbolRepo::find_many(&mut conn, &by_name().skip(1).take(2)).unwrap();
	assert_eq!(names(&page), vec!["b", "c"]);

	let c = created.iter().find(|row| row.name == "c").unwrap().id.clone();
	let forward =
		SymbolRepo::find_many(&mut conn, &by_name().cursor(SymbolUnique::Id(c.clone())).take(2))
			.unwrap();
	assert_eq!(names(&forward), vec!["c", "d"]);

	let backward =
		SymbolRepo::find_many(&mut conn, &by_name().cursor(SymbolUnique::Id(c.clone())).take(-2))
			.unwrap();
	assert_eq!(names(&backward), vec!["b", "c"]);

	let after = SymbolRepo::find_many(
		&mut conn,
		&by_name().cursor(SymbolUnique::Id(c)).skip(1).take(10),
	)
	.unwrap();
	assert_eq!(names(&after), vec!["d", "e"]);

	let descending = SymbolRepo::find_first(
		&mut conn,
		&SymbolFindMany::new().filter(owned_by(user.id)).order_by(SymbolField::Name, SortOrder::Desc),
	)
	.unwrap();
	assert_eq!(descending.map(|row| row.name), Some("e".to_string()));

	assert!(SymbolRepo::find_many(&mut conn, &by_name().take(0)).unwrap().is_empty());

	let missing_cursor =
		by_name().cursor(SymbolUnique::Id("does-not-exist".to_string())).take(2);
	assert!(SymbolRepo::find_many(&mut conn, &missing_cursor).unwrap().is_empty());

	let error = SymbolRepo::find_many(&mut conn, &by_name().skip(-1)).unwrap_err();
	assert!(matches!(error, DbError::Validation(_)));
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_distinct() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 0.0);
	let data: Vec<_> = ["sun", "sun", "rain", "sun", "rain", "snow"]
		.iter()
		.map(|name| TestFixtures::symbol(user.id, name))
		.collect();
	assert_eq!(SymbolRepo::create_many(&mut conn, &data, false).unwrap(), 6);

	let args = SymbolFindMany::new()
		.filter(owned_by(user.id))
		.order_by(SymbolField::Name, SortOrder::Asc)
		.distinct(SymbolField::Name);
	let rows = SymbolRepo::find_many(&mut conn, &args).unwrap();
	assert_eq!(names(&rows), vec!["rain", "snow", "sun"]);

	let rows = SymbolRepo::find_many(&mut conn, &args.clone().skip(1).take(1)).unwrap();
	assert_eq!(names(&rows), vec!["snow"]);
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_create_many_skip_duplicates() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 0.0);
	let mut fixed = TestFixtures::symbol(user.id, "fixed");
	fixed.id = Some(format!("fixed-{}", user.id));

	assert_eq!(SymbolRepo::create_many(&mut conn, &[fixed.clone()], false).unwrap(), 1);
	let again = vec![fixed.clone(), TestFixtures::symbol(user.id, "fresh")];
	assert_eq!(SymbolRepo::create_many(&mut conn, &again, true).unwrap(), 1);

	let error = conn
		.transaction(|conn| SymbolRepo::create_many(conn, &[fixed.clone()], false))
		.unwrap_err();
	assert_eq!(error.known_kind(), Some(KnownErrorKind::UniqueViolation));

	assert_eq!(SymbolRepo::count(&mut conn, Some(&owned_by(user.id))).unwrap(), 2);
	assert_eq!(SymbolRepo::create_many(&mut conn, &[], false).unwrap(), 0);
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_update_balance() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 100.0);
	let key = UserUnique::Id(user.id);

	let steps = [
		(NumberUpdate::Increment(50.0), 150.0),
		(NumberUpdate::Decrement(30.0), 120.0),
		(NumberUpdate::Multiply(2.0), 240.0),
		(NumberUpdate::Divide(4.0), 60.0),
		(NumberUpdate::Set(7.5), 7.5),
	];
	for (update, expected) in steps {
		let updated = UserRepo::update_balance(&mut conn, &key, update).unwrap();
		assert_eq!(updated.balance, expected, "{:?}", update);
	}

	let error = UserRepo::update_balance(&mut conn, &key, NumberUpdate::Divide(0.0)).unwrap_err();
	assert!(matches!(error, DbError::Validation(_)));

	let missing =
		UserRepo::update_balance(&mut conn, &UserUnique::Id(-1), NumberUpdate::Set(1.0)).unwrap_err();
	assert!(missing.is_not_found());

	let stats = UserRepo::aggregate_balance(
		&mut conn,
		Some(&UserWhere { id: Some(ScalarFilter::Equals(user.id)), ..Default::default() }),
	)
	.unwrap();
	assert_eq!(stats.sum, Some(7.5));
	assert_eq!(stats.max, Some(7.5));
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_upsert_multimedia_config() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 0.0);
	let key = MultimediaApiConfigUnique::UserId(user.id);
	let update =
		MultimediaApiConfigUpdate { config: Some(json!({ "provider": "second" })), ..Default::default() };

	let created = MultimediaApiConfigRepo::upsert(
		&mut conn,
		&key,
		&TestFixtures::multimedia_config(user.id, "first"),
		&update,
	)
	.unwrap();
	assert_eq!(created.config, json!({ "provider": "first" }));

	let updated = MultimediaApiConfigRepo::upsert(
		&mut conn,
		&key,
		&TestFixtures::multimedia_config(user.id, "first"),
		&update,
	)
	.unwrap();
	assert_eq!(updated.id, created.id);
	assert_eq!(updated.config, json!({ "provider": "second" }));

	let error = conn
		.transaction(|conn| {
			MultimediaApiConfigRepo::create(conn, &TestFixtures::multimedia_config(user.id, "third"))
		})
		.unwrap_err();
	assert_eq!(error.known_kind(), Some(KnownErrorKind::UniqueViolation));
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_update_many_and_delete_many() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 0.0);
	let data: Vec<_> =
		["one", "two", "three"].iter().map(|name| TestFixtures::symbol(user.id, name)).collect();
	SymbolRepo::create_many(&mut conn, &data, false).unwrap();

	let filter = SymbolWhere {
		name: Some(StringFilter::In(vec!["one".to_string(), "two".to_string()])),
		..owned_by(user.id)
	};
	let update = SymbolUpdate { icon: Some("#".to_string()), ..Default::default() };
	assert_eq!(SymbolRepo::update_many(&mut conn, Some(&filter), &update).unwrap(), 2);

	let hashed = SymbolWhere { icon: Some(StringFilter::Equals("#".to_string())), ..owned_by(user.id) };
	assert_eq!(SymbolRepo::count(&mut conn, Some(&hashed)).unwrap(), 2);

	assert_eq!(SymbolRepo::delete_many(&mut conn, Some(&filter)).unwrap(), 2);
	let remaining = SymbolRepo::find_many(&mut conn, &SymbolFindMany::new().filter(owned_by(user.id)))
		.unwrap();
	assert_eq!(names(&remaining), vec!["three"]);
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_deleting_user_cascades() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 0.0);
	SymbolRepo::create(&mut conn, &TestFixtures::symbol(user.id, "star")).unwrap();
	ActionSymbolRepo::create(&mut conn, &TestFixtures::action_symbol(user.id, "zoom")).unwrap();
	QuickStoryboardConfigRepo::create(&mut conn, &TestFixtures::storyboard_config(user.id, "quick"))
		.unwrap();
	ActionConfigurationRepo::create(&mut conn, &TestFixtures::action_configuration(user.id, "act"))
		.unwrap();
	TransactionRepo::create(&mut conn, &TestFixtures::transaction(user.id, "credit", 10.0)).unwrap();

	UserRepo::delete(&mut conn, &UserUnique::Id(user.id)).unwrap();

	assert_eq!(SymbolRepo::count(&mut conn, Some(&owned_by(user.id))).unwrap(), 0);
	let action_symbols =
		ActionSymbolWhere { user_id: Some(ScalarFilter::Equals(user.id)), ..Default::default() };
	assert_eq!(ActionSymbolRepo::count(&mut conn, Some(&action_symbols)).unwrap(), 0);
	let transactions = TransactionRepo::find_many(
		&mut conn,
		&TransactionFindMany::new().filter(TransactionWhere {
			user_id: Some(ScalarFilter::Equals(user.id)),
			..Default::default()
		}),
	)
	.unwrap();
	assert!(transactions.is_empty());
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_like_patterns_are_escaped() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 0.0);
	let data: Vec<_> = ["50%_off", "500 off", "half_price"]
		.iter()
		.map(|name| TestFixtures::symbol(user.id, name))
		.collect();
	SymbolRepo::create_many(&mut conn, &data, false).unwrap();

	let percent = SymbolWhere { name: Some(StringFilter::Contains("%".to_string())), ..owned_by(user.id) };
	let rows = SymbolRepo::find_many(&mut conn, &SymbolFindMany::new().filter(percent)).unwrap();
	assert_eq!(names(&rows), vec!["50%_off"]);

	let underscore = SymbolWhere {
		name: Some(StringFilter::Contains("_".to_string())),
		..owned_by(user.id)
	};
	let args = SymbolFindMany::new().filter(underscore).order_by(SymbolField::Name, SortOrder::Asc);
	let rows = SymbolRepo::find_many(&mut conn, &args).unwrap();
	assert_eq!(names(&rows), vec!["50%_off", "half_price"]);

	let insensitive = SymbolWhere {
		name: Some(StringFilter::ContainsInsensitive("HALF".to_string())),
		..owned_by(user.id)
	};
	assert_eq!(SymbolRepo::count(&mut conn, Some(&insensitive)).unwrap(), 1);
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_json_and_list_filters() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 0.0);
	let image = GenerationHistoryRepo::create(
		&mut conn,
		&TestFixtures::generation(user.id, "image", &["a.png", "b.png"], json!({ "seed": 7, "model": "v2" })),
	)
	.unwrap();
	let video = GenerationHistoryRepo::create(
		&mut conn,
		&TestFixtures::generation(user.id, "video", &[], json!({ "model": "v1" })),
	)
	.unwrap();

	let owned = |filter: GenerationHistoryWhere| GenerationHistoryWhere {
		user_id: Some(ScalarFilter::Equals(user.id)),
		..filter
	};
	let ids = |conn: &mut PgConnection, filter: GenerationHistoryWhere| -> Vec<String> {
		GenerationHistoryRepo::find_many(conn, &GenerationHistoryFindMany::new().filter(owned(filter)))
			.unwrap()
			.into_iter()
			.map(|row| row.id)
			.collect()
	};

	let has_seed = GenerationHistoryWhere { metadata: Some(JsonFilter::HasKey("seed".to_string())), ..Default::default() };
	assert_eq!(ids(&mut conn, has_seed), vec![image.id.clone()]);

	let v1 = GenerationHistoryWhere {
		metadata: Some(JsonFilter::Contains(json!({ "model": "v1" }))),
		..Default::default()
	};
	assert_eq!(ids(&mut conn, v1), vec![video.id.clone()]);

	let with_b = GenerationHistoryWhere { images: Some(ListFilter::Has("b.png".to_string())), ..Default::default() };
	assert_eq!(ids(&mut conn, with_b), vec![image.id.clone()]);

	let empty = GenerationHistoryWhere { images: Some(ListFilter::IsEmpty(true)), ..Default::default() };
	assert_eq!(ids(&mut conn, empty), vec![video.id.clone()]);

	let every = GenerationHistoryWhere {
		images: Some(ListFilter::HasEvery(vec!["a.png".to_string(), "c.png".to_string()])),
		..Default::default()
	};
	assert!(ids(&mut conn, every).is_empty());

	let patched = GenerationHistoryRepo::update(
		&mut conn,
		&GenerationHistoryUnique::Id(video.id.clone()),
		&GenerationHistoryUpdate { images: Some(vec!["v.mp4".to_string()]), ..Default::default() },
	)
	.unwrap();
	assert_eq!(patched.images, vec!["v.mp4".to_string()]);
	assert_eq!(patched.metadata, json!({ "model": "v1" }));
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_find_with_relations() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 0.0);
	let other = TestFixtures::seed_user(&mut conn, 0.0);
	SymbolRepo::create(&mut conn, &TestFixtures::symbol(user.id, "mine")).unwrap();
	SymbolRepo::create(&mut conn, &TestFixtures::symbol(other.id, "theirs")).unwrap();
	TransactionRepo::create(&mut conn, &TestFixtures::transaction(user.id, "credit", 3.0)).unwrap();
	MultimediaApiConfigRepo::create(&mut conn, &TestFixtures::multimedia_config(user.id, "x")).unwrap();

	let include = UserInclude { symbols: true, transactions: true, multimedia_api_config: true, ..Default::default() };
	let loaded = UserRepo::find_unique_with(&mut conn, &UserUnique::Id(user.id), &include)
		.unwrap()
		.unwrap();
	assert_eq!(loaded.user.id, user.id);
	assert_eq!(names(loaded.symbols.as_deref().unwrap()), vec!["mine"]);
	assert_eq!(loaded.transactions.as_ref().map(Vec::len), Some(1));
	assert!(matches!(loaded.multimedia_api_config, Some(Some(_))));
	assert!(loaded.action_symbols.is_none());

	let serialized = serde_json::to_value(&loaded).unwrap();
	assert!(serialized.get("symbols").is_some());
	assert!(serialized.get("actionSymbols").is_none());

	let args = UserFindMany::new()
		.filter(UserWhere { id: Some(ScalarFilter::In(vec![user.id, other.id])), ..Default::default() })
		.order_by(UserField::Id, SortOrder::Asc);
	let both = UserRepo::find_many_with(&mut conn, &args, &UserInclude::all()).unwrap();
	assert_eq!(both.len(), 2);
	assert_eq!(names(both[1].symbols.as_deref().unwrap()), vec!["theirs"]);
	assert!(matches!(both[1].multimedia_api_config, Some(None)));

	assert!(UserRepo::find_unique_with(&mut conn, &UserUnique::Id(-1), &include).unwrap().is_none());
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_group_by_and_aggregate() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 0.0);
	let data: Vec<_> = ["b", "a", "b", "b"].iter().map(|name| TestFixtures::symbol(user.id, name)).collect();
	SymbolRepo::create_many(&mut conn, &data, false).unwrap();

	let groups = SymbolRepo::group_by(&mut conn, SymbolField::Name, Some(&owned_by(user.id))).unwrap();
	let summary: Vec<_> = groups.iter().map(|group| (group.key.clone(), group.count)).collect();
	assert_eq!(summary, vec![(json!("a"), 1), (json!("b"), 3)]);

	let stats = SymbolRepo::aggregate(&mut conn, Some(&owned_by(user.id))).unwrap();
	assert_eq!(stats.count, 4);
	assert!(stats.created_at_min.is_some());
	assert!(stats.created_at_min <= stats.created_at_max);

	let none = SymbolRepo::aggregate(&mut conn, Some(&owned_by(-1))).unwrap();
	assert_eq!(none.count, 0);
	assert!(none.created_at_min.is_none());
}

#[test]
#[ignore = "requires a PostgreSQL database (TEST_DATABASE_URL)"]
fn test_raw_queries() {
	let mut conn = test_connection();
	let user = TestFixtures::seed_user(&mut conn, 0.0);

	let query = diesel::sql_query("SELECT username FROM users WHERE id = $1")
		.into_boxed::<Pg>()
		.bind::<Integer, _>(user.id);
	let rows: Vec<NameRow> = raw::query(&mut conn, query).unwrap();
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].username, user.username);

	let statement = diesel::sql_query("UPDATE users SET balance = 42 WHERE id = $1")
		.into_boxed::<Pg>()
		.bind::<Integer, _>(user.id);
	assert_eq!(raw::execute(&mut conn, statement).unwrap(), 1);

	raw::execute_unsafe(&mut conn, &format!("UPDATE users SET balance = balance + 1 WHERE id = {}", user.id))
		.unwrap();
	let reloaded = UserRepo::find_unique_or_throw(&mut conn, &UserUnique::Id(user.id)).unwrap();
	assert_eq!(reloaded.balance, 43.0);

	let rows: Vec<NameRow> =
		raw::query_unsafe(&mut conn, &format!("SELECT username FROM users WHERE id = {}", user.id))
			.unwrap();
	assert_eq!(rows[0].username, user.username);

	let error = conn
		.transaction(|conn| raw::execute_unsafe(conn, "SELECT * FROM no_such_table"))
		.unwrap_err();
	assert!(matches!(error, DbError::Unknown(_)));
}
