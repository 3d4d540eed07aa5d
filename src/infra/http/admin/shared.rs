use axum::http::StatusCode;
use axum::response::Response;
use uuid::Uuid;

use crate::application::auth::AdminPrincipal;
use crate::application::error::ErrorReport;
use crate::presentation::admin::views::{
    AdminChrome, AdminLayout, AdminNoticeTemplate, AdminNoticeView, AdminSection,
};
use crate::presentation::views::render_template_response;

pub(super) fn blank_to_none_opt(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub(super) fn parse_checkbox_flag(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("true") | Some("on") | Some("1"))
}

pub(super) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// Inline "not found" panel inside the admin layout.
pub(super) fn render_admin_not_found(
    source: &'static str,
    principal: &AdminPrincipal,
    section: AdminSection,
    message: &'static str,
) -> Response {
    let (back_href, back_label) = match section {
        AdminSection::Articles => ("/admin/articles", "Back to articles"),
        AdminSection::Popups => ("/admin/popup", "Back to popups"),
        AdminSection::Profile => ("/admin", "Back to dashboard"),
        AdminSection::SubManagers => ("/admin/sub-managers", "Back to sub-managers"),
    };
    render_admin_notice(
        source,
        principal,
        section,
        StatusCode::NOT_FOUND,
        AdminNoticeView {
            message,
            back_href,
            back_label,
        },
    )
}

/// Shown to signed-in admins whose role does not cover the page.
pub(super) fn render_admin_forbidden(
    source: &'static str,
    principal: &AdminPrincipal,
    section: AdminSection,
    message: &'static str,
) -> Response {
    render_admin_notice(
        source,
        principal,
        section,
        StatusCode::FORBIDDEN,
        AdminNoticeView {
            message,
            back_href: "/admin",
            back_label: "Back to dashboard",
        },
    )
}

fn render_admin_notice(
    source: &'static str,
    principal: &AdminPrincipal,
    section: AdminSection,
    status: StatusCode,
    notice: AdminNoticeView,
) -> Response {
    let title = if status == StatusCode::FORBIDDEN {
        "Forbidden"
    } else {
        "Not found"
    };
    let message = notice.message;
    let chrome = AdminChrome::new(principal, title, section);
    let view = AdminLayout::new(chrome, notice);
    let mut response = render_template_response(AdminNoticeTemplate { view }, status);
    ErrorReport::from_message(source, status, message).attach(&mut response);
    response
}
