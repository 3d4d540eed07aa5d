use axum::{
    extract::{Form, State},
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::application::{
    auth::{AdminAuthError, LOGIN_PATH, SessionStatus},
    error::HttpError,
};
use crate::presentation::{
    admin::views::{AdminLoginTemplate, AdminLoginView},
    views::render_template_response,
};

use super::AdminState;
use super::forms::LoginForm;
use crate::infra::http::repo_error_to_http;

const ADMIN_HOME: &str = "/admin";

pub(crate) async fn login_page(State(state): State<AdminState>, jar: CookieJar) -> Response {
    let token = jar
        .get(&state.session_cookie.name)
        .map(|cookie| cookie.value().to_string());
    if let SessionStatus::Authenticated(_) = state.auth.resolve(token.as_deref()).await {
        return Redirect::to(ADMIN_HOME).into_response();
    }

    render_login(AdminLoginView::default(), StatusCode::OK)
}

pub(crate) async fn login_submit(
    State(state): State<AdminState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth.login(&form.email, &form.password).await {
        Ok(session) => {
            let jar = jar.add(state.session_cookie.issue(session.token));
            (jar, Redirect::to(ADMIN_HOME)).into_response()
        }
        Err(AdminAuthError::InvalidCredentials) | Err(AdminAuthError::InvalidInput(_)) => {
            render_login(
                AdminLoginView {
                    email: form.email,
                    error: Some("Invalid email or password".to_string()),
                },
                StatusCode::UNAUTHORIZED,
            )
        }
        Err(AdminAuthError::RateLimited { retry_after_secs }) => {
            let mut response = render_login(
                AdminLoginView {
                    email: form.email,
                    error: Some("Too many attempts. Please try again later.".to_string()),
                },
                StatusCode::TOO_MANY_REQUESTS,
            );
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after_secs));
            response
        }
        Err(AdminAuthError::Repo(err)) => {
            repo_error_to_http("infra::http::admin::login_submit", err).into_response()
        }
        Err(err) => HttpError::from_error(
            "infra::http::admin::login_submit",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            &err,
        )
        .into_response(),
    }
}

pub(crate) async fn logout(State(state): State<AdminState>, jar: CookieJar) -> Response {
    let token = jar
        .get(&state.session_cookie.name)
        .map(|cookie| cookie.value().to_string())
        .unwrap_or_default();

    if let Err(err) = state.auth.logout(&token).await {
        return HttpError::from_error(
            "infra::http::admin::logout",
            StatusCode::SERVICE_UNAVAILABLE,
            "Sign out failed",
            &err,
        )
        .into_response();
    }

    let jar = jar.remove(state.session_cookie.removal());
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}

fn render_login(view: AdminLoginView, status: StatusCode) -> Response {
    render_template_response(AdminLoginTemplate::new(view), status)
}
