//! Constants

// environment keys
pub(crate) const DATABASE_URL_KEY: &str = "DATABASE_URL";
pub(crate) const ADDR_KEY: &str = "ADDR";
pub(crate) const DATABASE_MAX_CONNECTIONS_KEY: &str = "DATABASE_MAX_CONNECTIONS";

// defaults when the environment is silent
pub(crate) const DEFAULT_DATABASE_URL: &str = "sqlite://users.db";
pub(crate) const DEFAULT_ADDR: &str = "127.0.0.1:8000";
pub(crate) const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;
pub(crate) const DEFAULT_LOG_FILTER: &str = "roster_server=debug,tower_http=debug";

// response messages
pub(crate) const INVALID_INPUT_MESSAGE: &str = "Invalid input.";
pub(crate) const EMAIL_ALREADY_REGISTERED_MESSAGE: &str = "Email already registered.";
pub(crate) const USER_NOT_FOUND_MESSAGE: &str = "User not found.";
pub(crate) const USER_DELETED_MESSAGE: &str = "User deleted successfully.";
pub(crate) const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal server error.";
