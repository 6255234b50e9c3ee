use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Serialize;

pub type DbResult<T> = Result<T, DbError>;

/// Classification of database errors the client recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KnownErrorKind {
	UniqueViolation,
	ForeignKeyViolation,
	NotNullViolation,
	CheckViolation,
	SerializationFailure,
	ReadOnlyTransaction,
	ClosedConnection,
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("{model} not found")]
	NotFound { model: &'static str },

	#[error("{kind:?}: {message}")]
	KnownRequest { kind: KnownErrorKind, message: String, constraint: Option<String> },

	#[error("Validation error: {0}")]
	Validation(String),

	#[error("Initialization error: {0}")]
	Initialization(String),

	#[error("Connection pool error: {0}")]
	Pool(#[from] r2d2::Error),

	#[error("Engine panic: {0}")]
	Panic(String),

	#[error("Unknown request error: {0}")]
	Unknown(String),
}

impl DbError {
	pub fn not_found(model: &'static str) -> Self {
		DbError::NotFound { model }
	}

	pub fn known_kind(&self) -> Option<KnownErrorKind> {
		match self {
			DbError::KnownRequest { kind, .. } => Some(*kind),
			_ => None,
		}
	}

	pub fn is_not_found(&self) -> bool {
		matches!(self, DbError::NotFound { .. })
	}
}

impl From<DieselError> for DbError {
	fn from(error: DieselError) -> Self {
		match error {
			DieselError::NotFound => DbError::not_found("Record"),
			DieselError::DatabaseError(kind, info) => {
				let known = match kind {
					DatabaseErrorKind::UniqueViolation => Some(KnownErrorKind::UniqueViolation),
					DatabaseErrorKind::ForeignKeyViolation => {
						Some(KnownErrorKind::ForeignKeyViolation)
					},
					DatabaseErrorKind::NotNullViolation => Some(KnownErrorKind::NotNullViolation),
					DatabaseErrorKind::CheckViolation => Some(KnownErrorKind::CheckViolation),
					DatabaseErrorKind::SerializationFailure => {
						Some(KnownErrorKind::SerializationFailure)
					},
					DatabaseErrorKind::ReadOnlyTransaction => {
						Some(KnownErrorKind::ReadOnlyTransaction)
					},
					DatabaseErrorKind::ClosedConnection => Some(KnownErrorKind::ClosedConnection),
					_ => None,
				};
				match known {
					Some(kind) => DbError::KnownRequest {
						kind,
						message: info.message().to_string(),
						constraint: info.constraint_name().map(str::to_string),
					},
					None => {
						log::error!("Unrecognised database error {:?}: {}", kind, info.message());
						DbError::Unknown(info.message().to_string())
					},
				}
			},
			DieselError::QueryBuilderError(e) => DbError::Validation(e.to_string()),
			DieselError::SerializationError(e) | DieselError::DeserializationError(e) => {
				DbError::Unknown(e.to_string())
			},
			other => DbError::Unknown(other.to_string()),
		}
	}
}

impl From<diesel::ConnectionError> for DbError {
	fn from(error: diesel::ConnectionError) -> Self {
		DbError::Initialization(error.to_string())
	}
}
