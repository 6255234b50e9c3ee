use crate::{
	handler::ResourceHandler,
	models::{ActionConfiguration, ActionSymbol, QuickStoryboardConfig, Symbol},
	resource::OwnedResource,
};
use actix_web::web;

fn resource<R: OwnedResource>(cfg: &mut web::ServiceConfig, path: &str) {
	cfg.route(path, web::get().to(ResourceHandler::list_handler::<R>))
		.route(path, web::post().to(ResourceHandler::create_handler::<R>))
		.route(&format!("{}/{{id}}", path), web::put().to(ResourceHandler::update_handler::<R>))
		.route(&format!("{}/{{id}}", path), web::delete().to(ResourceHandler::delete_handler::<R>));
}

pub fn init(cfg: &mut web::ServiceConfig) {
	resource::<Symbol>(cfg, "/symbols");
	resource::<ActionSymbol>(cfg, "/action-symbols");
	resource::<QuickStoryboardConfig>(cfg, "/storyboard-configs");
	resource::<ActionConfiguration>(cfg, "/action-configurations");
}
