//! Super-admin console for sub-admin accounts.

use axum::{
    extract::{Extension, Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::application::{
    auth::{AdminAuthError, AdminPrincipal, NewSubAdmin},
    error::HttpError,
};
use crate::presentation::{
    admin::views::{AdminChrome, AdminLayout, AdminSection, AdminSubManagersTemplate, AdminSubManagersView},
    views::render_template_response,
};

use super::AdminState;
use super::forms::SubAdminForm;
use super::shared::{parse_id, render_admin_forbidden, render_admin_not_found};
use crate::infra::http::repo_error_to_http;

const SUB_MANAGERS_PATH: &str = "/admin/sub-managers";
const SUB_ADMIN_NOT_FOUND: &str = "Sub-manager not found";
const SUPER_ADMIN_ONLY: &str = "Only super admins can manage sub-managers";

pub(crate) async fn admin_sub_managers(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_sub_managers";
    match state.auth.list_sub_admins(&principal).await {
        Ok(admins) => render_page(
            &principal,
            AdminSubManagersView::new(&admins, state.timezone),
            StatusCode::OK,
        ),
        Err(err) => sub_admin_error(SOURCE, &principal, err),
    }
}

pub(crate) async fn admin_sub_manager_create(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Form(form): Form<SubAdminForm>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_sub_manager_create";
    let input = NewSubAdmin::from(form);
    let (email, name) = (input.email.clone(), input.name.clone());

    match state.auth.create_sub_admin(&principal, input).await {
        Ok(_) => Redirect::to(SUB_MANAGERS_PATH).into_response(),
        Err(err @ (AdminAuthError::InvalidInput(_) | AdminAuthError::DuplicateEmail)) => {
            let admins = match state.auth.list_sub_admins(&principal).await {
                Ok(admins) => admins,
                Err(list_err) => return sub_admin_error(SOURCE, &principal, list_err),
            };
            let view = AdminSubManagersView::new(&admins, state.timezone).with_rejected_input(
                email,
                name,
                err.to_string(),
            );
            render_page(&principal, view, StatusCode::BAD_REQUEST)
        }
        Err(err) => sub_admin_error(SOURCE, &principal, err),
    }
}

pub(crate) async fn admin_sub_manager_delete(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<String>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_sub_manager_delete";
    let Some(id) = parse_id(&id) else {
        return sub_admin_error(SOURCE, &principal, AdminAuthError::NotFound);
    };

    match state.auth.delete_sub_admin(&principal, id).await {
        Ok(()) => Redirect::to(SUB_MANAGERS_PATH).into_response(),
        Err(err) => sub_admin_error(SOURCE, &principal, err),
    }
}

fn render_page(principal: &AdminPrincipal, content: AdminSubManagersView, status: StatusCode) -> Response {
    let chrome = AdminChrome::new(principal, "Sub-managers", AdminSection::SubManagers);
    let view = AdminLayout::new(chrome, content);
    render_template_response(AdminSubManagersTemplate { view }, status)
}

fn sub_admin_error(source: &'static str, principal: &AdminPrincipal, err: AdminAuthError) -> Response {
    match err {
        AdminAuthError::Forbidden => {
            render_admin_forbidden(source, principal, AdminSection::Articles, SUPER_ADMIN_ONLY)
        }
        AdminAuthError::NotFound => render_admin_not_found(
            source,
            principal,
            AdminSection::SubManagers,
            SUB_ADMIN_NOT_FOUND,
        ),
        AdminAuthError::Repo(repo) => repo_error_to_http(source, repo).into_response(),
        other => HttpError::from_error(
            source,
            StatusCode::BAD_REQUEST,
            "Sub-manager request could not be processed",
            &other,
        )
        .into_response(),
    }
}
