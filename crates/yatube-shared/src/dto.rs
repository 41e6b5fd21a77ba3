//! Data Transfer Objects - form and query payloads.

use serde::{Deserialize, Serialize};

/// `?page=N` on listing routes. Kept raw; the paginator decides what it means.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// `?next=/path/` on the login route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Submitted post form. Missing fields bind as empty so the form, not the
/// extractor, reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFormData {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: String,
}

/// Submitted login form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: String,
}

/// Submitted signup form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_form_fields_default_to_empty() {
        let form: PostFormData = serde_json::from_str("{}").unwrap();
        assert!(form.text.is_empty());
        assert!(form.group.is_empty());
    }
}
