use crate::{
	constants::{IGNORE_ROUTES, MESSAGE_INVALID_TOKEN, ONE_WEEK},
	models::ApiResponse,
};
use actix_service::forward_ready;
use actix_web::{
	body::EitherBody,
	dev::{Service, ServiceRequest, ServiceResponse, Transform},
	http::{header::Header, Method},
	Error as AxError, HttpMessage, HttpResponse,
};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use chrono::Utc;
use futures::future::{ok, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, encode, errors::Error, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
	pub iat: usize,
	pub exp: usize,
	pub sub: String,
}

impl Claims {
	pub fn user_id(&self) -> Option<i32> {
		self.sub.parse().ok()
	}
}

#[derive(Clone)]
pub struct JWT {
	secret: String,
}

impl JWT {
	pub fn new(s: &str) -> Self {
		Self { secret: s.to_string() }
	}

	pub fn create_jwt(&self, user_id: i32) -> Result<String, Error> {
		let now = usize::try_from(Utc::now().timestamp()).unwrap_or_default();
		let claims = Claims { iat: now, exp: now + ONE_WEEK, sub: user_id.to_string() };
		debug!("Issuing token for user {}", user_id);
		encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.secret.as_ref()))
	}

	pub fn verify_jwt(&self, token: &str) -> Result<Claims, Error> {
		decode::<Claims>(
			token,
			&DecodingKey::from_secret(self.secret.as_ref()),
			&Validation::default(),
		)
		.map(|data| data.claims)
	}
}

/// Rejects requests without a valid bearer token, except for preflight
/// requests and [`IGNORE_ROUTES`]. Verified [`Claims`] are stored in the
/// request extensions.
pub struct Authentication {
	secret: String,
}

impl Authentication {
	pub fn new(secret: &str) -> Self {
		Self { secret: secret.to_string() }
	}
}

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
	S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = AxError>,
	S::Future: 'static,
	B: 'static,
{
	type Response = ServiceResponse<EitherBody<B>>;
	type Error = AxError;
	type InitError = ();
	type Transform = AuthenticationMiddleware<S>;
	type Future = Ready<Result<Self::Transform, Self::InitError>>;

	fn new_transform(&self, service: S) -> Self::Future {
		ok(AuthenticationMiddleware { jwt: JWT::new(&self.secret), service })
	}
}

pub struct AuthenticationMiddleware<S> {
	jwt: JWT,
	service: S,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
	S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = AxError>,
	S::Future: 'static,
	B: 'static,
{
	type Response = ServiceResponse<EitherBody<B>>;
	type Error = AxError;
	type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

	forward_ready!(service);

	fn call(&self, req: ServiceRequest) -> Self::Future {
		debug!("## Req: {} {}", req.method(), req.path());
		let mut authenticate_pass =
			Method::OPTIONS == *req.method() || IGNORE_ROUTES.contains(&req.path());

		if !authenticate_pass {
			match Authorization::<Bearer>::parse(&req) {
				Ok(auth) => match self.jwt.verify_jwt(auth.as_ref().token()) {
					Ok(claims) => {
						req.extensions_mut().insert(claims);
						authenticate_pass = true;
					},
					Err(e) => warn!("Invalid token: {:?}", e),
				},
				Err(_) => debug!("Missing bearer token for {}", req.path()),
			}
		}

		if !authenticate_pass {
			let (request, _pl) = req.into_parts();
			let response = HttpResponse::Unauthorized()
				.json(ApiResponse::<()>::failure(MESSAGE_INVALID_TOKEN))
				.map_into_right_body();

			return Box::pin(async { Ok(ServiceResponse::new(request, response)) });
		}

		let res = self.service.call(req);

		Box::pin(async move { res.await.map(ServiceResponse::map_into_left_body) })
	}
}
