use axum::{
    extract::{Extension, Form, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::{auth::AdminPrincipal, profile::ProfileError};
use crate::presentation::{
    admin::views::{AdminChrome, AdminLayout, AdminProfileFormView, AdminProfileTemplate, AdminSection},
    views::render_template_response,
};

use super::AdminState;
use super::forms::ProfileForm;
use crate::infra::http::repo_error_to_http;

pub(crate) async fn admin_about_me(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
) -> Response {
    let profile = state.profile.load().await;
    render(&principal, AdminProfileFormView::from_record(profile.as_ref()), StatusCode::OK)
}

pub(crate) async fn admin_about_me_update(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Form(form): Form<ProfileForm>,
) -> Response {
    match state.profile.update(form.to_params()).await {
        Ok(record) => {
            let view = AdminProfileFormView {
                saved: true,
                ..AdminProfileFormView::from_record(Some(&record))
            };
            render(&principal, view, StatusCode::OK)
        }
        Err(ProfileError::ConstraintViolation(field)) => {
            let view = AdminProfileFormView {
                name: form.name,
                title: form.title,
                introduction: form.introduction,
                career: form.career,
                industry_expertise: form.industry_expertise,
                area_of_expertise: form.area_of_expertise,
                profile_image_url: form.profile_image_url,
                error: Some(format!("{field} is required")),
                saved: false,
            };
            render(&principal, view, StatusCode::BAD_REQUEST)
        }
        Err(ProfileError::Repo(err)) => {
            repo_error_to_http("infra::http::admin_about_me_update", err).into_response()
        }
    }
}

fn render(principal: &AdminPrincipal, content: AdminProfileFormView, status: StatusCode) -> Response {
    let chrome = AdminChrome::new(principal, "About me", AdminSection::Profile);
    let view = AdminLayout::new(chrome, content);
    render_template_response(AdminProfileTemplate { view }, status)
}
