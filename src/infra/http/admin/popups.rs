//! Popup table, editor, toggle and delete handlers.

use axum::{
    extract::{Extension, Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::application::{
    admin::{AdminPopupError, PopupInput},
    auth::AdminPrincipal,
    error::HttpError,
};
use crate::presentation::{
    admin::views::{
        AdminChrome, AdminLayout, AdminPopupFormTemplate, AdminPopupFormView,
        AdminPopupTableView, AdminPopupsTemplate, AdminSection,
    },
    views::render_template_response,
};
use crate::util::timezone;

use super::AdminState;
use super::forms::PopupForm;
use super::shared::{parse_id, render_admin_not_found};
use crate::infra::http::repo_error_to_http;

const POPUPS_PATH: &str = "/admin/popup";
const CREATE_PATH: &str = "/admin/popup/create";
const POPUP_NOT_FOUND: &str = "Popup not found";

pub(crate) async fn admin_popups(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
) -> Response {
    let popups = match state.popups.list().await {
        Ok(popups) => popups,
        Err(err) => return admin_popup_error("infra::http::admin_popups", err).into_response(),
    };

    let chrome = AdminChrome::new(&principal, "Popups", AdminSection::Popups);
    let view = AdminLayout::new(chrome, AdminPopupTableView::new(&popups));
    render_template_response(AdminPopupsTemplate { view }, StatusCode::OK)
}

pub(crate) async fn admin_popup_new(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
) -> Response {
    let today = timezone::today(state.timezone);
    render_form(&principal, AdminPopupFormView::blank(today), StatusCode::OK)
}

pub(crate) async fn admin_popup_create(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Form(form): Form<PopupForm>,
) -> Response {
    let input = PopupInput::from(form);
    match state.popups.create(&principal, input.clone()).await {
        Ok(_) => Redirect::to(POPUPS_PATH).into_response(),
        Err(err) if is_input_error(&err) => {
            let view =
                AdminPopupFormView::resubmitted(CREATE_PATH.to_string(), true, input, err.to_string());
            render_form(&principal, view, StatusCode::BAD_REQUEST)
        }
        Err(err) => admin_popup_error("infra::http::admin_popup_create", err).into_response(),
    }
}

pub(crate) async fn admin_popup_edit(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<String>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_popup_edit";
    let Some(id) = parse_id(&id) else {
        return popup_not_found(SOURCE, &principal);
    };

    match state.popups.load(id).await {
        Ok(Some(popup)) => render_form(
            &principal,
            AdminPopupFormView::for_record(&popup),
            StatusCode::OK,
        ),
        Ok(None) => popup_not_found(SOURCE, &principal),
        Err(err) => admin_popup_error(SOURCE, err).into_response(),
    }
}

pub(crate) async fn admin_popup_update(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<String>,
    Form(form): Form<PopupForm>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_popup_update";
    let Some(id) = parse_id(&id) else {
        return popup_not_found(SOURCE, &principal);
    };

    let input = PopupInput::from(form);
    match state.popups.update(&principal, id, input.clone()).await {
        Ok(_) => Redirect::to(POPUPS_PATH).into_response(),
        Err(AdminPopupError::NotFound) => popup_not_found(SOURCE, &principal),
        Err(err) if is_input_error(&err) => {
            let view = AdminPopupFormView::resubmitted(
                format!("/admin/popup/edit/{id}"),
                false,
                input,
                err.to_string(),
            );
            render_form(&principal, view, StatusCode::BAD_REQUEST)
        }
        Err(err) => admin_popup_error(SOURCE, err).into_response(),
    }
}

pub(crate) async fn admin_popup_toggle(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<String>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_popup_toggle";
    let Some(id) = parse_id(&id) else {
        return popup_not_found(SOURCE, &principal);
    };

    match state.popups.toggle_active(&principal, id).await {
        Ok(_) => Redirect::to(POPUPS_PATH).into_response(),
        Err(AdminPopupError::NotFound) => popup_not_found(SOURCE, &principal),
        Err(err) => admin_popup_error(SOURCE, err).into_response(),
    }
}

pub(crate) async fn admin_popup_delete(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<String>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_popup_delete";
    let Some(id) = parse_id(&id) else {
        return popup_not_found(SOURCE, &principal);
    };

    match state.popups.delete(&principal, id).await {
        Ok(()) => Redirect::to(POPUPS_PATH).into_response(),
        Err(AdminPopupError::NotFound) => popup_not_found(SOURCE, &principal),
        Err(err) => admin_popup_error(SOURCE, err).into_response(),
    }
}

fn render_form(principal: &AdminPrincipal, content: AdminPopupFormView, status: StatusCode) -> Response {
    let chrome = AdminChrome::new(principal, content.heading.clone(), AdminSection::Popups);
    let view = AdminLayout::new(chrome, content);
    render_template_response(AdminPopupFormTemplate { view }, status)
}

fn is_input_error(err: &AdminPopupError) -> bool {
    matches!(
        err,
        AdminPopupError::InvalidField { .. } | AdminPopupError::Domain(_)
    )
}

fn popup_not_found(source: &'static str, principal: &AdminPrincipal) -> Response {
    render_admin_not_found(source, principal, AdminSection::Popups, POPUP_NOT_FOUND)
}

fn admin_popup_error(source: &'static str, err: AdminPopupError) -> HttpError {
    match err {
        AdminPopupError::InvalidField { .. } | AdminPopupError::Domain(_) => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Popup request could not be processed",
            err.to_string(),
        ),
        AdminPopupError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            POPUP_NOT_FOUND,
            "popup not found",
        ),
        AdminPopupError::Repo(repo) => repo_error_to_http(source, repo),
    }
}
