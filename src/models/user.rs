use serde::Serialize;

/// User model, as represented in the database
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) email: String,
    /// The password exactly as it was submitted. It is not hashed.
    pub(crate) password: String,
}

/// The public view of a user. The password never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}
