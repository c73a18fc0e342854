/// Placeholder author name when the account has none.
pub const FALLBACK_USER_NAME: &str = "Usuario";

/// Identity attached to a request by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl AuthenticatedUser {
    /// Name recorded on the user's comments.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(FALLBACK_USER_NAME)
    }

    /// Email recorded on the user's comments.
    pub fn contact_email(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }
}
