use std::{env, str::FromStr, time::Duration};

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("{0} must be set")]
	Missing(&'static str),

	#[error("{name} has an invalid value: {value}")]
	Invalid { name: &'static str, value: String },
}

/// Connection settings for a [`Client`](crate::client::Client).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
	pub database_url: String,
	pub pool_size: u32,
	pub connect_timeout: Duration,
	/// Apply pending embedded migrations on `connect`.
	pub run_migrations: bool,
}

impl DbConfig {
	pub fn new(database_url: impl Into<String>) -> Self {
		Self {
			database_url: database_url.into(),
			pool_size: default_pool_size(),
			connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
			run_migrations: true,
		}
	}

	/// Reads `DATABASE_URL`, `DB_POOL_SIZE`, `DB_CONNECT_TIMEOUT_SECS` and
	/// `RUN_MIGRATIONS`, loading a `.env` file first when one exists.
	pub fn from_env() -> Result<Self, ConfigError> {
		dotenvy::dotenv().ok();
		let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
		let mut config = Self::new(database_url);
		if let Some(pool_size) = parse_var("DB_POOL_SIZE")? {
			config.pool_size = pool_size;
		}
		if let Some(secs) = parse_var::<u64>("DB_CONNECT_TIMEOUT_SECS")? {
			config.connect_timeout = Duration::from_secs(secs);
		}
		if let Ok(value) = env::var("RUN_MIGRATIONS") {
			config.run_migrations = parse_flag(&value)
				.ok_or(ConfigError::Invalid { name: "RUN_MIGRATIONS", value })?;
		}
		Ok(config)
	}
}

pub fn default_pool_size() -> u32 {
	u32::try_from(num_cpus::get() * 2).unwrap_or(10)
}

pub fn parse_flag(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}

/// `parse_flag` as a command-line value parser.
pub fn flag_arg(value: &str) -> Result<bool, String> {
	parse_flag(value).ok_or_else(|| format!("expected a boolean flag, got `{}`", value))
}

fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
	match env::var(name) {
		Ok(value) => {
			value.trim().parse().map(Some).map_err(|_| ConfigError::Invalid { name, value })
		},
		Err(_) => Ok(None),
	}
}
