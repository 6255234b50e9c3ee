use crate::{
	handler::{MultimediaConfigHandler, ResourceHandler},
	models::GenerationHistory,
};
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg
		// generation history
		.route("/generations", web::get().to(ResourceHandler::list_handler::<GenerationHistory>))
		.route("/generations", web::post().to(ResourceHandler::create_handler::<GenerationHistory>))
		.route("/generations/{id}", web::put().to(ResourceHandler::update_handler::<GenerationHistory>))
		.route(
			"/generations/{id}",
			web::delete().to(ResourceHandler::delete_handler::<GenerationHistory>),
		)
		// multimedia provider settings
		.route("/multimedia-config", web::get().to(MultimediaConfigHandler::get_config_handler))
		.route("/multimedia-config", web::put().to(MultimediaConfigHandler::put_config_handler));
}
