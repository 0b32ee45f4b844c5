//! Unified error type for the data layer.
//!
//! Every fallible operation in the crate returns [`Result`]. Write-boundary
//! violations (missing references, values outside a closed enum, duplicate
//! records, overspent coins) each have their own variant so callers can map
//! them to distinct responses without string matching.

use thiserror::Error;

/// All errors the data layer can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// A looked-up or referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name, e.g. `"user"` or `"habit"`
        entity: &'static str,
        /// Identifier that failed to resolve
        id: i64,
    },

    /// A value was rejected at the write boundary (closed-enum violation,
    /// out-of-range field, self-reference, non-monotonic timestamp).
    #[error("invalid {field}: {message}")]
    InvalidValue {
        /// Field that carried the invalid value
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// A uniqueness rule was violated (duplicate email/username, an already
    /// existing friendship or ownership record).
    #[error("conflict: {message}")]
    Conflict {
        /// What already exists
        message: String,
    },

    /// Login failed. Deliberately carries no detail so a caller cannot tell
    /// a wrong password from an unknown email.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A coin-priced operation exceeded the user's balance.
    #[error("insufficient coins: have {available}, need {required}")]
    InsufficientCoins {
        /// Coins the operation costs
        required: i64,
        /// Coins the user currently holds
        available: i64,
    },

    /// A per-user resource cap was reached.
    #[error("{resource} limit reached ({limit})")]
    LimitExceeded {
        /// Resource being capped, e.g. `"habits"`
        resource: &'static str,
        /// The cap value
        limit: u64,
    },

    /// A configuration file or environment variable problem.
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Password hashing failed
    #[error("password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
