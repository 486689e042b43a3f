use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The authenticated patient, as returned by `/api/login` and `/api/user`.
///
/// Immutable: the session replaces the whole value, it never patches fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "fname")]
    pub first_name: String,
    #[serde(rename = "lname")]
    pub last_name: String,
    pub email: String,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Body of `POST /api/login` and `POST /api/admin/login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let email = email.into().trim().to_string();
        let password = password.into();
        if email.is_empty() {
            return Err(ValidationError::Required("email"));
        }
        if password.is_empty() {
            return Err(ValidationError::Required("password"));
        }
        Ok(Self { email, password })
    }
}

/// Body of `POST /api/register`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub fname: String,
    pub lname: String,
    pub email: String,
    pub password: String,
    pub age: Option<u32>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub age: Option<String>,
    pub phone: Option<String>,
}

impl RegistrationForm {
    pub fn validate(self) -> Result<Registration, ValidationError> {
        let required = [
            ("fname", &self.first_name),
            ("lname", &self.last_name),
            ("email", &self.email),
            ("password", &self.password),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ValidationError::Required(*field));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        let age = match self.age.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| ValidationError::Invalid {
                field: "age",
                value: raw.to_string(),
            })?),
            None => None,
        };

        Ok(Registration {
            fname: self.first_name.trim().to_string(),
            lname: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
            age,
            phone: self
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        })
    }
}

/// A row of `GET /api/users` (admin only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub fname: String,
    pub lname: String,
    #[serde(default)]
    pub age: Option<i64>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

impl AdminUser {
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.fname.to_lowercase().contains(&term)
            || self.lname.to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn form() -> RegistrationForm {
        RegistrationForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: " ada@example.com ".into(),
            password: "pw".into(),
            confirm_password: "pw".into(),
            age: Some("36".into()),
            phone: Some("".into()),
        }
    }

    #[test]
    fn test_user_uses_backend_field_names() {
        let user: User =
            serde_json::from_str(r#"{"id":3,"fname":"Ada","lname":"Lovelace","email":"a@x.io"}"#)
                .unwrap();
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_registration_form_validates() {
        let reg = form().validate().unwrap();
        assert_eq!(reg.email, "ada@example.com");
        assert_eq!(reg.age, Some(36));
        assert_eq!(reg.phone, None);
    }

    #[test]
    fn test_registration_form_rejects_mismatch_and_missing() {
        let mut f = form();
        f.confirm_password = "other".into();
        assert_eq!(f.validate().unwrap_err(), ValidationError::PasswordMismatch);

        let mut f = form();
        f.last_name = " ".into();
        assert_eq!(f.validate().unwrap_err(), ValidationError::Required("lname"));

        let mut f = form();
        f.age = Some("old".into());
        assert!(matches!(
            f.validate().unwrap_err(),
            ValidationError::Invalid { field: "age", .. }
        ));
    }

    #[test]
    fn test_credentials_require_both_fields() {
        assert_eq!(
            Credentials::new("", "pw").unwrap_err(),
            ValidationError::Required("email")
        );
        assert_eq!(
            Credentials::new("a@x.io", "").unwrap_err(),
            ValidationError::Required("password")
        );
    }

    #[test]
    fn test_admin_user_search() {
        let u: AdminUser = serde_json::from_str(
            r#"{"id":1,"fname":"Grace","lname":"Hopper","age":null,"email":"grace@navy.mil","phone":null,"createdAt":"Mon, 01 Jan 2024 00:00:00 GMT"}"#,
        )
        .unwrap();
        assert!(u.matches("NAVY"));
        assert!(u.matches("hop"));
        assert!(!u.matches("lovelace"));
    }
}
