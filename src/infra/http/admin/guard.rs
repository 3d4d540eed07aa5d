use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::application::{auth::GateDecision, error::ErrorReport};
use crate::presentation::{
    admin::views::AdminLoadingTemplate, views::render_template_response,
};

use super::AdminState;

/// Seconds before the loading placeholder retries the request.
pub(crate) const PLACEHOLDER_RETRY_SECS: u64 = 2;

/// Resolve the session cookie and gate every protected admin route on it.
///
/// Only a definite "no session" redirects to the login page. A lookup that
/// could not complete renders the loading placeholder instead.
pub(crate) async fn require_admin(
    State(state): State<AdminState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = jar
        .get(&state.session_cookie.name)
        .map(|cookie| cookie.value().to_string());
    let status = state.auth.resolve(token.as_deref()).await;

    match status.decide() {
        GateDecision::Render(principal) => {
            request.extensions_mut().insert(principal.clone());
            let mut response = next.run(request).await;
            response.extensions_mut().insert(principal);
            response
        }
        GateDecision::Redirect(location) => {
            metrics::counter!("pressroom_admin_gate_redirect_total").increment(1);
            debug!(
                target = "pressroom::http::admin::guard",
                path = %request.uri().path(),
                "no admin session; redirecting to login"
            );
            Redirect::to(location).into_response()
        }
        GateDecision::Placeholder => {
            metrics::counter!("pressroom_admin_gate_pending_total").increment(1);
            loading_placeholder()
        }
    }
}

fn loading_placeholder() -> Response {
    let mut response = render_template_response(
        AdminLoadingTemplate {
            refresh_seconds: PLACEHOLDER_RETRY_SECS,
        },
        StatusCode::SERVICE_UNAVAILABLE,
    );
    response.headers_mut().insert(
        RETRY_AFTER,
        HeaderValue::from(PLACEHOLDER_RETRY_SECS),
    );
    ErrorReport::from_message(
        "infra::http::admin::guard",
        StatusCode::SERVICE_UNAVAILABLE,
        "admin session could not be resolved",
    )
    .attach(&mut response);
    response
}
