//! Login form.
//!
//! There is no user store: any non-empty email and password log the
//! session in.

use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use minijinja::context;
use serde::{Deserialize, Serialize};

use super::found;
use crate::error::ServerError;
use crate::session::Session;
use crate::state::AppState;

/// Flash shown on the home page after logging in.
const LOGGED_IN_FLASH: &str = "You have been logged in successfully.";

/// Posted login form.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default, rename = "CSRF")]
    csrf: String,
}

/// Per-field validation messages.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) struct LoginErrors {
    email: Option<String>,
    password: Option<String>,
}

impl LoginErrors {
    fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

impl LoginForm {
    fn validate(&self) -> LoginErrors {
        LoginErrors {
            email: self
                .email
                .trim()
                .is_empty()
                .then(|| "Please enter an email.".to_owned()),
            password: self
                .password
                .is_empty()
                .then(|| "Please enter a password.".to_owned()),
        }
    }
}

fn render_form(
    state: &AppState,
    session: &mut Session,
    email: &str,
    errors: &LoginErrors,
) -> Result<String, ServerError> {
    Ok(state.templates.render(
        "login.html",
        context! {
            authenticated => session.is_authenticated(),
            csrf => session.csrf_token(),
            email,
            errors,
        },
    )?)
}

/// Handle GET /login.
pub(crate) async fn login_form(
    State(state): State<Arc<AppState>>,
    mut session: Session,
) -> Result<Response, ServerError> {
    if session.is_authenticated() {
        return Ok(found("/"));
    }

    let html = render_form(&state, &mut session, "", &LoginErrors::default())?;
    Ok((session, Html(html)).into_response())
}

/// Handle POST /login.
pub(crate) async fn login_submit(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, ServerError> {
    if !session.verify_csrf(&form.csrf) {
        return Err(ServerError::Csrf);
    }

    let errors = form.validate();
    if !errors.is_empty() {
        let html = render_form(&state, &mut session, &form.email, &errors)?;
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, session, Html(html)).into_response());
    }

    session.set_authenticated(true);
    session.add_flash(LOGGED_IN_FLASH);
    session.rotate_csrf();
    tracing::info!("Session logged in");

    Ok((session, found("/")).into_response())
}
