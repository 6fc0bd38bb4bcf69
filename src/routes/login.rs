//! Login routes — form page and the credential check.

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use tracing::{debug, info, warn};

use crate::error::ErrorCode;
use crate::state::HostState;

const LOGIN_PAGE: &str = r#"<!doctype html>
<html>
  <head><title>Login</title></head>
  <body>
    <h1>Login</h1>
    <form method="post">
      <label for="email">Email</label>
      <input type="text" id="email" name="email" />
      <label for="password">Password</label>
      <input type="password" id="password" name="password" />
      <button type="submit">Login</button>
    </form>
  </body>
</html>
"#;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// A required field is absent or empty.
    #[error("Email and password are required")]
    MissingCredentials,
    /// Well-formed credentials that match no known user.
    #[error("Invalid email or password")]
    InvalidCredentials,
}

impl ErrorCode for LoginError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "E_VALIDATION",
            Self::InvalidCredentials => "E_AUTHENTICATION",
        }
    }
}

impl LoginError {
    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            Self::MissingCredentials => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string(), "code": self.error_code() });
        (self.status(), Json(body)).into_response()
    }
}

// =============================================================================
// FORM
// =============================================================================

/// Raw `application/x-www-form-urlencoded` pairs, in body order.
pub type FormPairs = Vec<(String, String)>;

#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    /// Pick the login fields out of raw form pairs. A repeated field keeps
    /// its first value; unknown fields are ignored.
    #[must_use]
    pub fn from_pairs(pairs: FormPairs) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            let field = match key.as_str() {
                "email" => &mut form.email,
                "password" => &mut form.password,
                _ => continue,
            };
            field.get_or_insert(value);
        }
        form
    }

    /// Both fields, or [`LoginError::MissingCredentials`] if either is absent
    /// or empty.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn credentials(&self) -> Result<(&str, &str), LoginError> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => Ok((email, password)),
            _ => Err(LoginError::MissingCredentials),
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /<name>/` — the login form.
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

/// `POST /<name>/` — check credentials against the user directory.
///
/// Success returns `204` with no body and no session. A body that is not a
/// readable form counts as missing credentials.
pub async fn login(
    State(state): State<HostState>,
    form: Result<Form<FormPairs>, FormRejection>,
) -> Result<StatusCode, LoginError> {
    let form = match form {
        Ok(Form(pairs)) => LoginForm::from_pairs(pairs),
        Err(rejection) => {
            debug!(error = %rejection, "login body is not a readable form");
            LoginForm::default()
        }
    };
    let (email, password) = form.credentials().inspect_err(|_| warn!("login rejected: missing credentials"))?;

    let Some(user) = state.users.authenticate(email, password) else {
        debug!("login failed: no matching user");
        return Err(LoginError::InvalidCredentials);
    };

    info!(user_id = %user.id, "login succeeded");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;
