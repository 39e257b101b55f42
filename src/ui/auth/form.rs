/// Login form input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Per-field validation messages; `None` means the field is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }

    /// First message in field order, for single-line displays.
    pub fn first_message(&self) -> Option<&str> {
        self.email.as_deref().or(self.password.as_deref())
    }
}

const MIN_PASSWORD_LEN: usize = 6;

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FormErrors> {
        let errors = FormErrors {
            email: if self.email.trim().is_empty() {
                Some("Email is required".to_string())
            } else if !is_valid_email(self.email.trim()) {
                Some("Enter a valid email".to_string())
            } else {
                None
            },
            password: if self.password.trim().is_empty() {
                Some("Password is required".to_string())
            } else if self.password.chars().count() < MIN_PASSWORD_LEN {
                Some("Password must be at least 6 characters".to_string())
            } else {
                None
            },
        };

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// `local@domain.tld` with no whitespace and a dotted domain.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let allowed = |c: char| c.is_ascii_alphanumeric() || "+._%-".contains(c);
    !local.is_empty()
        && local.len() <= 64
        && local.chars().all(allowed)
        && domain.contains('.')
        && !domain.starts_with(['.', '-'])
        && !domain.ends_with(['.', '-'])
        && !domain.contains("..")
        && domain.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}
