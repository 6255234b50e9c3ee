use actix_web::{
	http::StatusCode,
	test::{init_service, read_body_json, TestRequest},
	web, App,
};
use serde_json::json;

use crate::{
	constants::MESSAGE_INVALID_TOKEN,
	generation_routes, library_routes,
	midware::jwt::{Authentication, JWT},
	models::ApiResponse,
	tests::test_utils::{
		bearer, expired_test_token, generate_test_token, offline_client, TEST_SECRET,
	},
	transaction_routes, user_routes,
};

macro_rules! offline_app {
	() => {
		init_service(
			App::new()
				.app_data(web::Data::new(offline_client()))
				.app_data(web::Data::new(JWT::new(TEST_SECRET)))
				.wrap(Authentication::new(TEST_SECRET))
				.configure(user_routes::init)
				.configure(transaction_routes::init)
				.configure(library_routes::init)
				.configure(generation_routes::init),
		)
		.await
	};
}

#[test]
fn test_jwt_round_trip() {
	let jwt = JWT::new(TEST_SECRET);
	let token = jwt.create_jwt(42).unwrap();
	let claims = jwt.verify_jwt(&token).unwrap();
	assert_eq!(claims.sub, "42");
	assert_eq!(claims.user_id(), Some(42));
	assert!(claims.exp > claims.iat);

	assert!(JWT::new("another_secret").verify_jwt(&token).is_err());
	assert!(jwt.verify_jwt(&expired_test_token(42)).is_err());
}

#[actix_web::test]
async fn test_health_is_public() {
	let app = offline_app!();
	let resp = TestRequest::get().uri("/health").send_request(&app).await;
	assert_eq!(resp.status(), StatusCode::OK);

	let body: ApiResponse<serde_json::Value> = read_body_json(resp).await;
	assert_eq!(body.status, "success");
	assert_eq!(body.data, Some(json!({ "status": "ok" })));
}

#[actix_web::test]
async fn test_protected_routes_require_token() {
	let app = offline_app!();
	for uri in ["/profile", "/balance", "/transactions", "/symbols", "/multimedia-config"] {
		let resp = TestRequest::get().uri(uri).send_request(&app).await;
		assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
	}
}

#[actix_web::test]
async fn test_invalid_and_expired_tokens_are_rejected() {
	let app = offline_app!();
	let resp = TestRequest::get()
		.uri("/profile")
		.insert_header(bearer("not-a-token"))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

	let resp = TestRequest::get()
		.uri("/profile")
		.insert_header(bearer(&expired_test_token(1)))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

	let forged = JWT::new("another_secret").create_jwt(1).unwrap();
	let resp = TestRequest::get()
		.uri("/profile")
		.insert_header(bearer(&forged))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_preflight_skips_authentication() {
	let app = offline_app!();
	let resp = TestRequest::default()
		.method(actix_web::http::Method::OPTIONS)
		.uri("/profile")
		.send_request(&app)
		.await;
	assert_ne!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_register_validation() {
	let app = offline_app!();
	let resp = TestRequest::post()
		.uri("/register")
		.set_json(json!({ "username": "jo", "email": "not-an-email", "password": "short" }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

	let body: ApiResponse<()> = read_body_json(resp).await;
	assert_eq!(body.status, "error");
	assert!(body.error.is_some());

	let resp = TestRequest::post()
		.uri("/register")
		.set_json(json!({ "email": "someone@example.com" }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_login_validation() {
	let app = offline_app!();
	let resp = TestRequest::post()
		.uri("/login")
		.set_json(json!({ "email": "nobody", "password": "" }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_profile_update_validation() {
	let app = offline_app!();
	let resp = TestRequest::put()
		.uri("/profile")
		.insert_header(bearer(&generate_test_token(1)))
		.set_json(json!({ "email": "broken" }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_list_query_validation() {
	let app = offline_app!();
	let token = generate_test_token(1);
	for uri in ["/symbols?take=1000", "/generations?skip=-1", "/transactions?take=0"] {
		let resp = TestRequest::get()
			.uri(uri)
			.insert_header(bearer(&token))
			.send_request(&app)
			.await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
	}
}

#[actix_web::test]
async fn test_resource_payload_validation() {
	let app = offline_app!();
	let token = generate_test_token(1);

	let resp = TestRequest::post()
		.uri("/symbols")
		.insert_header(bearer(&token))
		.set_json(json!({ "icon": "", "name": "" }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

	let resp = TestRequest::put()
		.uri("/multimedia-config")
		.insert_header(bearer(&token))
		.set_json(json!({ "config": [1, 2, 3] }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_resource_patch_validation() {
	let app = offline_app!();
	let token = generate_test_token(1);

	let rejected = [
		("/symbols/some-id", json!({ "icon": "", "name": "" })),
		("/symbols/some-id", json!({ "icon": "x".repeat(17) })),
		("/action-symbols/some-id", json!({ "prompt": "" })),
		("/storyboard-configs/some-id", json!({ "name": "x".repeat(101) })),
		("/action-configurations/some-id", json!({ "name": "" })),
		("/generations/some-id", json!({ "type": "" })),
	];
	for (uri, payload) in rejected {
		let resp = TestRequest::put()
			.uri(uri)
			.insert_header(bearer(&token))
			.set_json(payload)
			.send_request(&app)
			.await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
		let body: ApiResponse<()> = read_body_json(resp).await;
		assert_eq!(body.status, "error");
	}

	// a valid patch gets past validation and reaches the (unavailable) database
	let resp = TestRequest::put()
		.uri("/symbols/some-id")
		.insert_header(bearer(&token))
		.set_json(json!({ "name": "moon" }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_unauthorized_uses_api_envelope() {
	let app = offline_app!();
	let resp = TestRequest::get().uri("/symbols").send_request(&app).await;
	assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

	let body: ApiResponse<()> = read_body_json(resp).await;
	assert_eq!(body.status, "error");
	assert_eq!(body.error.as_deref(), Some(MESSAGE_INVALID_TOKEN));
	assert!(body.data.is_none());
}

#[actix_web::test]
async fn test_database_outage_is_reported() {
	let app = offline_app!();
	let resp = TestRequest::get()
		.uri("/profile")
		.insert_header(bearer(&generate_test_token(1)))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

	let body: ApiResponse<()> = read_body_json(resp).await;
	assert_eq!(body.error.as_deref(), Some("Database error"));
}
