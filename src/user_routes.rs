use crate::handler::{health_handler, UserHandler};
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg
		// public routes
		.route("/health", web::get().to(health_handler))
		.route("/register", web::post().to(UserHandler::register_handler))
		.route("/login", web::post().to(UserHandler::login_handler))
		// user mgmt routes
		.route("/profile", web::get().to(UserHandler::get_profile_handler))
		.route("/profile", web::put().to(UserHandler::update_profile_handler))
		.route("/balance", web::get().to(UserHandler::get_balance_handler));
}
