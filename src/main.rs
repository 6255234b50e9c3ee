use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use clap::{Parser, Subcommand};
use env_logger::Env;
use storyboard_store::{
	config::flag_arg, generation_routes, library_routes, midware::jwt::{Authentication, JWT},
	transaction_routes, user_routes, Client, DbConfig,
};

#[derive(Parser)]
#[command(name = "storyboard-store", version, about = "Storyboard data service")]
struct Cli {
	#[arg(long, env = "DATABASE_URL")]
	database_url: String,

	#[arg(long, env = "DB_POOL_SIZE")]
	pool_size: Option<u32>,

	#[arg(long, env = "DB_CONNECT_TIMEOUT_SECS")]
	connect_timeout_secs: Option<u64>,

	/// Apply pending migrations when `serve` starts (default: true).
	#[arg(long, env = "RUN_MIGRATIONS", value_parser = flag_arg)]
	run_migrations: Option<bool>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Run the HTTP API.
	Serve {
		#[arg(long, env = "SOCKET_URL", default_value = "127.0.0.1:8080")]
		socket_url: String,

		#[arg(long, env = "JWT_SECRET", hide_env_values = true)]
		jwt_secret: String,

		/// Skip applying pending migrations at startup.
		#[arg(long)]
		skip_migrations: bool,
	},
	/// Apply pending migrations and exit.
	Migrate,
}

impl Cli {
	fn db_config(&self) -> DbConfig {
		let mut config = DbConfig::new(self.database_url.clone());
		if let Some(pool_size) = self.pool_size {
			config.pool_size = pool_size;
		}
		if let Some(secs) = self.connect_timeout_secs {
			config.connect_timeout = std::time::Duration::from_secs(secs);
		}
		if let Some(run_migrations) = self.run_migrations {
			config.run_migrations = run_migrations;
		}
		config
	}
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	dotenvy::dotenv().ok();
	env_logger::init_from_env(Env::default().default_filter_or("info"));
	let cli = Cli::parse();
	let mut config = cli.db_config();

	match cli.command {
		Command::Migrate => {
			config.run_migrations = true;
			Client::new(config).connect()?;
			Ok(())
		},
		Command::Serve { socket_url, jwt_secret, skip_migrations } => {
			config.run_migrations &= !skip_migrations;
			let client = Client::new(config);
			client.connect()?;
			serve(client, &socket_url, jwt_secret).await
		},
	}
}

async fn serve(client: Client, socket_url: &str, jwt_secret: String) -> anyhow::Result<()> {
	log::info!("Listening on: {}..", socket_url);

	HttpServer::new(move || {
		App::new()
			.app_data(web::Data::new(client.clone()))
			.app_data(web::Data::new(JWT::new(&jwt_secret)))
			.wrap(Authentication::new(&jwt_secret))
			.wrap(
				Cors::default()
					.allow_any_origin()
					.allow_any_method()
					.allow_any_header()
					.expose_headers(vec![header::CONTENT_DISPOSITION])
					.supports_credentials()
					.max_age(3600),
			)
			.wrap(Logger::default())
			.configure(user_routes::init)
			.configure(transaction_routes::init)
			.configure(library_routes::init)
			.configure(generation_routes::init)
	})
	.bind(socket_url)?
	.run()
	.await?;

	Ok(())
}
