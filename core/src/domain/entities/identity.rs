//! Identities that can hold a session: service operators and project users.

use serde::{Deserialize, Serialize};

/// Which identity table a session belongs to
///
/// The class is chosen by the route, never inferred from the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityClass {
    /// Service operator
    Admin,
    /// Project-scoped end user
    User,
}

impl IdentityClass {
    /// Cookie carrying the access token for this class
    pub fn access_cookie(&self) -> &'static str {
        match self {
            IdentityClass::Admin => "admins_access_token",
            IdentityClass::User => "users_access_token",
        }
    }

    /// Cookie carrying the refresh token for this class
    pub fn refresh_cookie(&self) -> &'static str {
        match self {
            IdentityClass::Admin => "admins_refresh_token",
            IdentityClass::User => "users_refresh_token",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityClass::Admin => "admin",
            IdentityClass::User => "user",
        }
    }
}

impl std::fmt::Display for IdentityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub class: IdentityClass,
    pub email: String,
    pub login: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Owning project; always `None` for admins
    pub project_id: Option<i64>,

    pub role: String,
}

impl Identity {
    /// Token subject for this identity
    pub fn subject(&self) -> String {
        self.id.to_string()
    }
}

/// Data needed to create an identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub class: IdentityClass,
    pub email: String,
    pub login: String,
    pub password_hash: String,
    pub project_id: Option<i64>,
    pub role: String,
}

/// Lookup criteria; set fields are combined with AND
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityFilter {
    pub class: IdentityClass,
    pub email: Option<String>,
    pub login: Option<String>,
    pub project_id: Option<i64>,
}

impl IdentityFilter {
    pub fn by_email(class: IdentityClass, email: impl Into<String>, project_id: Option<i64>) -> Self {
        Self {
            class,
            email: Some(email.into()),
            login: None,
            project_id,
        }
    }

    pub fn by_login(class: IdentityClass, login: impl Into<String>, project_id: Option<i64>) -> Self {
        Self {
            class,
            email: None,
            login: Some(login.into()),
            project_id,
        }
    }

    /// Whether `identity` satisfies every set criterion
    pub fn matches(&self, identity: &Identity) -> bool {
        identity.class == self.class
            && identity.project_id == self.project_id
            && self.email.as_ref().map_or(true, |e| identity.email.eq_ignore_ascii_case(e))
            && self.login.as_ref().map_or(true, |l| &identity.login == l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(class: IdentityClass, project_id: Option<i64>) -> Identity {
        Identity {
            id: 7,
            class,
            email: "Ops@Example.com".to_string(),
            login: "ops".to_string(),
            password_hash: "hash".to_string(),
            project_id,
            role: "admin".to_string(),
        }
    }

    #[test]
    fn test_cookie_names_per_class() {
        assert_eq!(IdentityClass::Admin.access_cookie(), "admins_access_token");
        assert_eq!(IdentityClass::Admin.refresh_cookie(), "admins_refresh_token");
        assert_eq!(IdentityClass::User.access_cookie(), "users_access_token");
        assert_eq!(IdentityClass::User.refresh_cookie(), "users_refresh_token");
    }

    #[test]
    fn test_filter_matches_email_case_insensitively() {
        let admin = identity(IdentityClass::Admin, None);
        let filter = IdentityFilter::by_email(IdentityClass::Admin, "ops@example.com", None);
        assert!(filter.matches(&admin));
    }

    #[test]
    fn test_filter_respects_class_and_project() {
        let user = identity(IdentityClass::User, Some(3));

        assert!(IdentityFilter::by_login(IdentityClass::User, "ops", Some(3)).matches(&user));
        assert!(!IdentityFilter::by_login(IdentityClass::User, "ops", Some(4)).matches(&user));
        assert!(!IdentityFilter::by_login(IdentityClass::Admin, "ops", Some(3)).matches(&user));
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let json = serde_json::to_value(identity(IdentityClass::Admin, None)).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
