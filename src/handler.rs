use crate::{
	client::Client,
	constants::{MESSAGE_INVALID_CREDENTIALS, MESSAGE_INVALID_TOKEN},
	error::{DbError, DbResult, KnownErrorKind},
	midware::jwt::{Claims, JWT},
	models::{
		ApiResponse, BalanceResp, ListQuery, LoginRequest, LoginResp, MultimediaConfigRequest,
		MultimediaApiConfigUpdate, NewMultimediaApiConfig, NewUser, ProfileUpdate, RegisterRequest,
		UserUpdate,
	},
	query::{ScalarFilter, SortOrder, StringFilter},
	repo::{
		MultimediaApiConfigRepo, MultimediaApiConfigUnique, TransactionField, TransactionFindMany,
		TransactionRepo, TransactionWhere, UserRepo, UserUnique,
	},
	resource::OwnedResource,
};
use actix_web::{http::StatusCode, web, HttpMessage, HttpRequest, HttpResponse, Responder};
use bcrypt::{hash, verify, DEFAULT_COST};
use serde::Serialize;
use serde_json::json;
use validator::{Validate, ValidationErrors};

pub fn error_status(error: &DbError) -> StatusCode {
	match error {
		DbError::NotFound { .. } => StatusCode::NOT_FOUND,
		DbError::Validation(_) => StatusCode::BAD_REQUEST,
		DbError::KnownRequest { kind, .. } => match kind {
			KnownErrorKind::UniqueViolation | KnownErrorKind::SerializationFailure => {
				StatusCode::CONFLICT
			},
			KnownErrorKind::ForeignKeyViolation |
			KnownErrorKind::NotNullViolation |
			KnownErrorKind::CheckViolation => StatusCode::BAD_REQUEST,
			KnownErrorKind::ReadOnlyTransaction | KnownErrorKind::ClosedConnection => {
				StatusCode::INTERNAL_SERVER_ERROR
			},
		},
		DbError::Pool(_) | DbError::Initialization(_) => StatusCode::SERVICE_UNAVAILABLE,
		DbError::Panic(_) | DbError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
	}
}

pub fn db_error_response(error: &DbError) -> HttpResponse {
	let status = error_status(error);
	let message = if status.is_server_error() {
		log::error!("Database error: {}", error);
		"Database error".to_string()
	} else {
		log::info!("Request rejected: {}", error);
		error.to_string()
	};
	HttpResponse::build(status).json(ApiResponse::<()>::failure(message))
}

pub fn respond<T: Serialize>(result: DbResult<T>, status: StatusCode) -> HttpResponse {
	match result {
		Ok(data) => HttpResponse::build(status).json(ApiResponse::success(data)),
		Err(e) => db_error_response(&e),
	}
}

fn validation_error(e: ValidationErrors) -> HttpResponse {
	log::error!("Validation error: {:?}", e);
	HttpResponse::BadRequest().json(ApiResponse::<()>::failure(e.to_string()))
}

/// The user id carried by the claims the authentication middleware stored.
pub fn authenticate(http_req: &HttpRequest) -> Result<i32, HttpResponse> {
	let user_id = http_req.extensions().get::<Claims>().and_then(Claims::user_id);
	user_id.ok_or_else(|| {
		HttpResponse::Unauthorized().json(ApiResponse::<()>::failure(MESSAGE_INVALID_TOKEN))
	})
}

pub async fn health_handler() -> impl Responder {
	HttpResponse::Ok().json(ApiResponse::success(json!({ "status": "ok" })))
}

pub struct UserHandler;

impl UserHandler {
	pub async fn register_handler(
		client: web::Data<Client>,
		req: web::Json<RegisterRequest>,
	) -> impl Responder {
		if let Err(e) = req.validate() {
			return validation_error(e);
		}
		let req = req.into_inner();
		log::info!("Registering user: {}", req.email);

		let password = match hash(req.password.as_bytes(), DEFAULT_COST) {
			Ok(hash) => hash,
			Err(e) => {
				log::error!("Password hashing failed for email {}: {}", req.email, e);
				return HttpResponse::InternalServerError()
					.json(ApiResponse::<()>::failure("Failed to hash password"));
			},
		};
		let new_user =
			NewUser { username: req.username, email: req.email, password, balance: None };
		let created = client.run(move |conn| UserRepo::create(conn, &new_user)).await;
		if let Ok(user) = &created {
			log::info!("Registered user {}", user.id);
		}
		respond(created, StatusCode::CREATED)
	}

	pub async fn login_handler(
		client: web::Data<Client>,
		jwt: web::Data<JWT>,
		req: web::Json<LoginRequest>,
	) -> impl Responder {
		if let Err(e) = req.validate() {
			return validation_error(e);
		}
		let LoginRequest { email, password } = req.into_inner();
		let user = match client
			.run(move |conn| UserRepo::find_unique(conn, &UserUnique::Email(email)))
			.await
		{
			Ok(Some(user)) => user,
			Ok(None) => {
				return HttpResponse::Unauthorized()
					.json(ApiResponse::<()>::failure(MESSAGE_INVALID_CREDENTIALS))
			},
			Err(e) => return db_error_response(&e),
		};

		if !verify(password.as_bytes(), &user.password).unwrap_or(false) {
			log::warn!("Failed login for user {}", user.id);
			return HttpResponse::Unauthorized()
				.json(ApiResponse::<()>::failure(MESSAGE_INVALID_CREDENTIALS));
		}

		match jwt.create_jwt(user.id) {
			Ok(token) => {
				log::info!("Login successful for user ID: {}", user.id);
				HttpResponse::Ok()
					.json(ApiResponse::success(LoginResp { uid: user.id.to_string(), token }))
			},
			Err(e) => {
				log::error!("JWT creation error: {:?}", e);
				HttpResponse::InternalServerError()
					.json(ApiResponse::<()>::failure("Failed to create authentication token"))
			},
		}
	}

	pub async fn get_profile_handler(
		client: web::Data<Client>,
		http_req: HttpRequest,
	) -> impl Responder {
		let user_id = match authenticate(&http_req) {
			Ok(id) => id,
			Err(resp) => return resp,
		};
		let user = client
			.run(move |conn| UserRepo::find_unique_or_throw(conn, &UserUnique::Id(user_id)))
			.await;
		respond(user, StatusCode::OK)
	}

	pub async fn update_profile_handler(
		client: web::Data<Client>,
		req: web::Json<ProfileUpdate>,
		http_req: HttpRequest,
	) -> impl Responder {
		let user_id = match authenticate(&http_req) {
			Ok(id) => id,
			Err(resp) => return resp,
		};
		if let Err(e) = req.validate() {
			return validation_error(e);
		}
		let req = req.into_inner();
		let update = UserUpdate { username: req.username, email: req.email, ..Default::default() };
		let user =
			client.run(move |conn| UserRepo::update(conn, &UserUnique::Id(user_id), &update)).await;
		if user.is_ok() {
			log::info!("Profile updated successfully for user: {}", user_id);
		}
		respond(user, StatusCode::OK)
	}

	pub async fn get_balance_handler(
		client: web::Data<Client>,
		http_req: HttpRequest,
	) -> impl Responder {
		let user_id = match authenticate(&http_req) {
			Ok(id) => id,
			Err(resp) => return resp,
		};
		let balance = client
			.run(move |conn| UserRepo::find_unique_or_throw(conn, &UserUnique::Id(user_id)))
			.await
			.map(|user| BalanceResp { balance: user.balance });
		respond(balance, StatusCode::OK)
	}
}

pub struct TransactionHandler;

impl TransactionHandler {
	pub async fn list_transactions_handler(
		client: web::Data<Client>,
		query: web::Query<ListQuery>,
		http_req: HttpRequest,
	) -> impl Responder {
		let user_id = match authenticate(&http_req) {
			Ok(id) => id,
			Err(resp) => return resp,
		};
		if let Err(e) = query.validate() {
			return validation_error(e);
		}
		let query = query.into_inner();
		let args = TransactionFindMany::new()
			.filter(TransactionWhere {
				user_id: Some(ScalarFilter::Equals(user_id)),
				kind: query.kind.clone().map(StringFilter::Equals),
				..Default::default()
			})
			.order_by(TransactionField::CreatedAt, SortOrder::Desc)
			.take(query.take())
			.skip(query.skip());
		let transactions = client.run(move |conn| TransactionRepo::find_many(conn, &args)).await;
		if let Ok(transactions) = &transactions {
			log::info!(
				"Retrieved {} transactions for user: {}",
				transactions.len(),
				user_id
			);
		}
		respond(transactions, StatusCode::OK)
	}

	pub async fn get_transaction_handler(
		client: web::Data<Client>,
		path: web::Path<i32>,
		http_req: HttpRequest,
	) -> impl Responder {
		let user_id = match authenticate(&http_req) {
			Ok(id) => id,
			Err(resp) => return resp,
		};
		let transaction_id = path.into_inner();
		let args = TransactionFindMany::new().filter(TransactionWhere {
			id: Some(ScalarFilter::Equals(transaction_id)),
			user_id: Some(ScalarFilter::Equals(user_id)),
			..Default::default()
		});
		let transaction =
			client.run(move |conn| TransactionRepo::find_first_or_throw(conn, &args)).await;
		respond(transaction, StatusCode::OK)
	}
}

/// CRUD over the per-user collections implementing [`OwnedResource`].
pub struct ResourceHandler;

impl ResourceHandler {
	pub async fn list_handler<R: OwnedResource>(
		client: web::Data<Client>,
		query: web::Query<ListQuery>,
		http_req: HttpRequest,
	) -> impl Responder {
		let user_id = match authenticate(&http_req) {
			Ok(id) => id,
			Err(resp) => return resp,
		};
		if let Err(e) = query.validate() {
			return validation_error(e);
		}
		let query = query.into_inner();
		let items = client.run(move |conn| R::list(conn, user_id, &query)).await;
		respond(items, StatusCode::OK)
	}

	pub async fn create_handler<R: OwnedResource>(
		client: web::Data<Client>,
		req: web::Json<R::Create>,
		http_req: HttpRequest,
	) -> impl Responder {
		let user_id = match authenticate(&http_req) {
			Ok(id) => id,
			Err(resp) => return resp,
		};
		if let Err(e) = req.validate() {
			return validation_error(e);
		}
		let input = req.into_inner();
		let created = client.run(move |conn| R::create(conn, user_id, input)).await;
		if created.is_ok() {
			log::info!("{} created for user: {}", R::NAME, user_id);
		}
		respond(created, StatusCode::CREATED)
	}

	pub async fn update_handler<R: OwnedResource>(
		client: web::Data<Client>,
		path: web::Path<String>,
		req: web::Json<R::Patch>,
		http_req: HttpRequest,
	) -> impl Responder {
		let user_id = match authenticate(&http_req) {
			Ok(id) => id,
			Err(resp) => return resp,
		};
		if let Err(e) = req.validate() {
			return validation_error(e);
		}
		let id = path.into_inner();
		let patch = req.into_inner();
		let updated = client.run(move |conn| R::update(conn, user_id, &id, patch)).await;
		respond(updated, StatusCode::OK)
	}

	pub async fn delete_handler<R: OwnedResource>(
		client: web::Data<Client>,
		path: web::Path<String>,
		http_req: HttpRequest,
	) -> impl Responder {
		let user_id = match authenticate(&http_req) {
			Ok(id) => id,
			Err(resp) => return resp,
		};
		let id = path.into_inner();
		let deleted = client.run(move |conn| R::delete(conn, user_id, &id)).await;
		if deleted.is_ok() {
			log::info!("{} deleted for user: {}", R::NAME, user_id);
		}
		respond(deleted, StatusCode::OK)
	}
}

pub struct MultimediaConfigHandler;

impl MultimediaConfigHandler {
	pub async fn get_config_handler(
		client: web::Data<Client>,
		http_req: HttpRequest,
	) -> impl Responder {
		let user_id = match authenticate(&http_req) {
			Ok(id) => id,
			Err(resp) => return resp,
		};
		let config = client
			.run(move |conn| {
				MultimediaApiConfigRepo::find_unique_or_throw(
					conn,
					&MultimediaApiConfigUnique::UserId(user_id),
				)
			})
			.await;
		respond(config, StatusCode::OK)
	}

	pub async fn put_config_handler(
		client: web::Data<Client>,
		req: web::Json<MultimediaConfigRequest>,
		http_req: HttpRequest,
	) -> impl Responder {
		let user_id = match authenticate(&http_req) {
			Ok(id) => id,
			Err(resp) => return resp,
		};
		let config = req.into_inner().config;
		if !config.is_object() {
			return HttpResponse::BadRequest()
				.json(ApiResponse::<()>::failure("config must be a JSON object"));
		}
		let create = NewMultimediaApiConfig { id: None, user_id, config: config.clone() };
		let update = MultimediaApiConfigUpdate { config: Some(config), ..Default::default() };
		let saved = client
			.run(move |conn| {
				MultimediaApiConfigRepo::upsert(
					conn,
					&MultimediaApiConfigUnique::UserId(user_id),
					&create,
					&update,
				)
			})
			.await;
		respond(saved, StatusCode::OK)
	}
}
