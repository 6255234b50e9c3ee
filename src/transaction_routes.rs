use crate::handler::TransactionHandler;
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg.route("/transactions", web::get().to(TransactionHandler::list_transactions_handler))
		.route("/transactions/{id}", web::get().to(TransactionHandler::get_transaction_handler));
}
