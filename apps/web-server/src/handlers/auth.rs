//! Authentication handlers: login, logout and signup pages.

use actix_web::{HttpResponse, http::header, web};
use std::sync::Arc;

use yatube_core::RepoError;
use yatube_core::domain::{NewUser, User};
use yatube_core::ports::{PasswordService, TokenService};
use yatube_shared::dto::{LoginForm, NextQuery, SignupForm};

use crate::middleware::auth::{removal_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::templates::{LoginTemplate, SignupTemplate, render};
use crate::urls;

const USERNAME_MAX_CHARS: usize = 150;
const PASSWORD_MIN_CHARS: usize = 8;
const BAD_CREDENTIALS: &str =
    "Please enter a correct username and password. Both fields may be case-sensitive.";

/// GET /auth/login/
pub async fn login_form(query: web::Query<NextQuery>) -> AppResult<HttpResponse> {
    render(&LoginTemplate {
        username: String::new(),
        next: query.into_inner().next.unwrap_or_default(),
        error: None,
    })
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let user = match state.users.find_by_username(&form.username).await? {
        Some(user) => user,
        None => return login_failed(form),
    };

    let valid = password_service
        .verify(&form.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return login_failed(form);
    }

    tracing::info!(user_id = user.id, "User logged in");
    let target = urls::safe_next(Some(form.next.as_str())).unwrap_or(urls::INDEX);
    logged_in(&user, token_service.get_ref().as_ref(), target)
}

/// GET|POST /auth/logout/
pub async fn logout() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, urls::INDEX))
        .cookie(removal_cookie())
        .finish()
}

/// GET /auth/signup/
pub async fn signup_form() -> AppResult<HttpResponse> {
    render(&SignupTemplate {
        username: String::new(),
        errors: Vec::new(),
    })
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    form: web::Form<SignupForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let username = form.username.trim().to_string();

    let mut errors = validate_signup(&username, &form);
    if errors.is_empty() && state.users.find_by_username(&username).await?.is_some() {
        errors.push("A user with that username already exists.".to_string());
    }
    if !errors.is_empty() {
        return render(&SignupTemplate { username, errors });
    }

    let password_hash = password_service
        .hash(&form.password1)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = match state
        .users
        .create_user(NewUser::new(username.clone(), password_hash))
        .await
    {
        Ok(user) => user,
        Err(RepoError::Constraint(_)) => {
            return render(&SignupTemplate {
                username,
                errors: vec!["A user with that username already exists.".to_string()],
            });
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, "User signed up");
    logged_in(&user, token_service.get_ref().as_ref(), urls::INDEX)
}

fn validate_signup(username: &str, form: &SignupForm) -> Vec<String> {
    let mut errors = Vec::new();

    if username.is_empty() {
        errors.push("Username: This field is required.".to_string());
    } else if username.chars().count() > USERNAME_MAX_CHARS {
        errors.push(format!(
            "Username: Ensure this value has at most {USERNAME_MAX_CHARS} characters."
        ));
    } else if !username
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        errors.push(
            "Username: Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .to_string(),
        );
    }

    if form.password1.chars().count() < PASSWORD_MIN_CHARS {
        errors.push(format!(
            "Password: This password is too short. It must contain at least {PASSWORD_MIN_CHARS} characters."
        ));
    }
    if form.password1 != form.password2 {
        errors.push("The two password fields didn't match.".to_string());
    }

    errors
}

fn login_failed(form: LoginForm) -> AppResult<HttpResponse> {
    tracing::debug!(username = %form.username, "Login rejected");
    render(&LoginTemplate {
        username: form.username,
        next: form.next,
        error: Some(BAD_CREDENTIALS.to_string()),
    })
}

/// Issues the session cookie for `user` and redirects to `target`.
fn logged_in(user: &User, tokens: &dyn TokenService, target: &str) -> AppResult<HttpResponse> {
    let token = tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, target))
        .cookie(session_cookie(token, tokens.expiration_seconds()))
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, password1: &str, password2: &str) -> Vec<String> {
        let form = SignupForm {
            username: username.to_string(),
            password1: password1.to_string(),
            password2: password2.to_string(),
        };
        validate_signup(username, &form)
    }

    #[test]
    fn accepts_valid_signup() {
        assert!(signup("leo.tolstoy", "war-and-peace", "war-and-peace").is_empty());
    }

    #[test]
    fn rejects_bad_usernames() {
        assert_eq!(signup("", "password123", "password123").len(), 1);
        assert_eq!(signup("has space", "password123", "password123").len(), 1);
        assert_eq!(signup(&"a".repeat(151), "password123", "password123").len(), 1);
        assert!(signup(&"a".repeat(150), "password123", "password123").is_empty());
    }

    #[test]
    fn rejects_short_or_mismatched_passwords() {
        assert_eq!(signup("reader", "short", "short").len(), 1);
        assert_eq!(signup("reader", "password123", "password124").len(), 1);
    }
}
