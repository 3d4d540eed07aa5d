use crate::application::admin::PopupInput;
use crate::application::auth::AdminPrincipal;
use crate::domain::entities::{AboutMeRecord, AdminUserRecord, PopupRecord, PostRecord};
use crate::domain::popups::{DEFAULT_DISPLAY_ORDER, DEFAULT_SIZE_PERCENTAGE, DEFAULT_WINDOW_DAYS};
use crate::presentation::views::SITE_TITLE;
use crate::util::timezone;
use askama::Template;
use chrono_tz::Tz;
use time::{Date, Duration};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum AdminSection {
    Articles,
    Popups,
    Profile,
    SubManagers,
}

#[derive(Clone)]
pub struct AdminNavigationItemView {
    pub label: &'static str,
    pub href: &'static str,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct AdminChrome {
    pub site_title: String,
    pub page_title: String,
    pub admin_name: String,
    pub admin_role: &'static str,
    pub navigation: Vec<AdminNavigationItemView>,
}

impl AdminChrome {
    pub fn new(principal: &AdminPrincipal, page_title: impl Into<String>, active: AdminSection) -> Self {
        let item = |label, href, section| AdminNavigationItemView {
            label,
            href,
            is_active: active == section,
        };
        let mut navigation = vec![
            item("Articles", "/admin/articles", AdminSection::Articles),
            item("Popups", "/admin/popup", AdminSection::Popups),
            item("About me", "/admin/about-me", AdminSection::Profile),
        ];
        if principal.is_super_admin() {
            navigation.push(item(
                "Sub-managers",
                "/admin/sub-managers",
                AdminSection::SubManagers,
            ));
        }
        Self {
            site_title: SITE_TITLE.to_string(),
            page_title: page_title.into(),
            admin_name: principal.name.clone(),
            admin_role: principal.role.display_name(),
            navigation,
        }
    }
}

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub chrome: AdminChrome,
    pub asset_version: String,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(chrome: AdminChrome, content: T) -> Self {
        Self {
            chrome,
            asset_version: env!("CARGO_PKG_VERSION").to_string(),
            content,
        }
    }
}

#[derive(Clone, Default)]
pub struct AdminLoginView {
    pub email: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct AdminLoginTemplate {
    pub site_title: String,
    pub view: AdminLoginView,
}

impl AdminLoginTemplate {
    pub fn new(view: AdminLoginView) -> Self {
        Self {
            site_title: SITE_TITLE.to_string(),
            view,
        }
    }
}

/// Shown while the session lookup cannot be completed.
#[derive(Template)]
#[template(path = "admin/loading.html")]
pub struct AdminLoadingTemplate {
    pub refresh_seconds: u64,
}

#[derive(Clone)]
pub struct AdminArticleRowView {
    pub title: String,
    pub category: String,
    pub created_on: String,
    pub view_count: i64,
    pub public_href: String,
    pub edit_href: String,
    pub delete_href: String,
}

impl AdminArticleRowView {
    pub fn from_record(post: &PostRecord, tz: Tz) -> Self {
        Self {
            title: post.title.clone(),
            category: post.category.clone(),
            created_on: timezone::iso_date(post.created_at, tz),
            view_count: post.view_count,
            public_href: format!("/article/{}", post.id),
            edit_href: format!("/admin/articles/edit/{}", post.id),
            delete_href: format!("/admin/articles/{}/delete", post.id),
        }
    }
}

#[derive(Clone)]
pub struct AdminArticleListView {
    pub heading: String,
    pub rows: Vec<AdminArticleRowView>,
    pub new_href: &'static str,
}

impl AdminArticleListView {
    pub fn new(heading: impl Into<String>, posts: &[PostRecord], tz: Tz) -> Self {
        Self {
            heading: heading.into(),
            rows: posts
                .iter()
                .map(|post| AdminArticleRowView::from_record(post, tz))
                .collect(),
            new_href: "/admin/articles/create",
        }
    }

    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}

#[derive(Template)]
#[template(path = "admin/articles.html")]
pub struct AdminArticlesTemplate {
    pub view: AdminLayout<AdminArticleListView>,
}

/// Article editor state; values are echoed back verbatim on validation errors.
#[derive(Clone, Default)]
pub struct AdminArticleFormView {
    pub heading: String,
    pub action: String,
    pub submit_label: &'static str,
    pub title: String,
    pub category: String,
    pub subcategory: String,
    pub description: String,
    pub image_url: String,
    pub content: String,
    pub error: Option<String>,
}

impl AdminArticleFormView {
    pub fn blank() -> Self {
        Self {
            heading: "New article".to_string(),
            action: "/admin/articles/create".to_string(),
            submit_label: "Publish",
            ..Default::default()
        }
    }

    pub fn for_record(post: &PostRecord) -> Self {
        Self {
            heading: "Edit article".to_string(),
            action: format!("/admin/articles/edit/{}", post.id),
            submit_label: "Save changes",
            title: post.title.clone(),
            category: post.category.clone(),
            subcategory: post.subcategory.clone().unwrap_or_default(),
            description: post.description.clone().unwrap_or_default(),
            image_url: post.image_url.clone().unwrap_or_default(),
            content: post.content.clone(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[derive(Template)]
#[template(path = "admin/article_form.html")]
pub struct AdminArticleFormTemplate {
    pub view: AdminLayout<AdminArticleFormView>,
}

#[derive(Clone)]
pub struct AdminNoticeView {
    pub message: &'static str,
    pub back_href: &'static str,
    pub back_label: &'static str,
}

#[derive(Template)]
#[template(path = "admin/notice.html")]
pub struct AdminNoticeTemplate {
    pub view: AdminLayout<AdminNoticeView>,
}

#[derive(Clone)]
pub struct AdminPopupRowView {
    pub title: String,
    pub date_range: String,
    pub display_order: i32,
    pub size_label: String,
    pub position: String,
    pub is_active: bool,
    pub status_label: &'static str,
    pub toggle_label: &'static str,
    pub edit_href: String,
    pub toggle_href: String,
    pub delete_href: String,
}

impl From<&PopupRecord> for AdminPopupRowView {
    fn from(popup: &PopupRecord) -> Self {
        Self {
            title: popup.title.clone(),
            date_range: format!(
                "{} ~ {}",
                timezone::format_day(popup.start_date),
                timezone::format_day(popup.end_date)
            ),
            display_order: popup.display_order_or_default(),
            size_label: format!("{}%", popup.size_percentage_or_default()),
            position: popup.position_display(),
            is_active: popup.is_active,
            status_label: if popup.is_active { "Active" } else { "Inactive" },
            toggle_label: if popup.is_active { "Deactivate" } else { "Activate" },
            edit_href: format!("/admin/popup/edit/{}", popup.id),
            toggle_href: format!("/admin/popup/{}/toggle", popup.id),
            delete_href: format!("/admin/popup/{}/delete", popup.id),
        }
    }
}

#[derive(Clone)]
pub struct AdminPopupTableView {
    pub rows: Vec<AdminPopupRowView>,
    pub new_href: &'static str,
    pub error: Option<String>,
}

impl AdminPopupTableView {
    pub fn new(popups: &[PopupRecord]) -> Self {
        Self {
            rows: popups.iter().map(AdminPopupRowView::from).collect(),
            new_href: "/admin/popup/create",
            error: None,
        }
    }

    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}

#[derive(Template)]
#[template(path = "admin/popups.html")]
pub struct AdminPopupsTemplate {
    pub view: AdminLayout<AdminPopupTableView>,
}

#[derive(Clone)]
pub struct AdminPopupFormView {
    pub heading: String,
    pub action: String,
    pub submit_label: &'static str,
    pub values: PopupInput,
    pub error: Option<String>,
}

impl AdminPopupFormView {
    /// Create form pre-filled with a week-long window starting `today`.
    pub fn blank(today: Date) -> Self {
        let end = today.saturating_add(Duration::days(DEFAULT_WINDOW_DAYS));
        Self {
            heading: "New popup".to_string(),
            action: "/admin/popup/create".to_string(),
            submit_label: "Create popup",
            values: PopupInput {
                start_date: timezone::format_day(today),
                end_date: timezone::format_day(end),
                is_active: true,
                position: "0".to_string(),
                size_percentage: DEFAULT_SIZE_PERCENTAGE.to_string(),
                display_order: DEFAULT_DISPLAY_ORDER.to_string(),
                ..Default::default()
            },
            error: None,
        }
    }

    pub fn for_record(popup: &PopupRecord) -> Self {
        let optional = |value: Option<i32>| value.map(|v| v.to_string()).unwrap_or_default();
        Self {
            heading: "Edit popup".to_string(),
            action: format!("/admin/popup/edit/{}", popup.id),
            submit_label: "Save changes",
            values: PopupInput {
                title: popup.title.clone(),
                content: popup.content.clone().unwrap_or_default(),
                image_url: popup.image_url.clone().unwrap_or_default(),
                link_url: popup.link_url.clone().unwrap_or_default(),
                start_date: timezone::format_day(popup.start_date),
                end_date: timezone::format_day(popup.end_date),
                is_active: popup.is_active,
                position: optional(popup.position),
                size_percentage: optional(popup.size_percentage),
                display_order: optional(popup.display_order),
            },
            error: None,
        }
    }

    /// Re-render a submitted form with the validation message.
    pub fn resubmitted(action: String, is_new: bool, values: PopupInput, error: String) -> Self {
        Self {
            heading: if is_new { "New popup" } else { "Edit popup" }.to_string(),
            action,
            submit_label: if is_new { "Create popup" } else { "Save changes" },
            values,
            error: Some(error),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/popup_form.html")]
pub struct AdminPopupFormTemplate {
    pub view: AdminLayout<AdminPopupFormView>,
}

#[derive(Clone)]
pub struct AdminSubAdminRowView {
    pub name: String,
    pub email: String,
    pub created_on: String,
    pub delete_href: String,
}

impl AdminSubAdminRowView {
    pub fn from_record(admin: &AdminUserRecord, tz: Tz) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.clone(),
            created_on: timezone::iso_date(admin.created_at, tz),
            delete_href: format!("/admin/sub-managers/{}/delete", admin.id),
        }
    }
}

/// Sub-admin table plus the "add" form; the password is never echoed back.
#[derive(Clone, Default)]
pub struct AdminSubManagersView {
    pub rows: Vec<AdminSubAdminRowView>,
    pub email: String,
    pub name: String,
    pub error: Option<String>,
}

impl AdminSubManagersView {
    pub fn new(admins: &[AdminUserRecord], tz: Tz) -> Self {
        Self {
            rows: admins
                .iter()
                .map(|admin| AdminSubAdminRowView::from_record(admin, tz))
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_rejected_input(mut self, email: String, name: String, error: String) -> Self {
        self.email = email;
        self.name = name;
        self.error = Some(error);
        self
    }

    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}

#[derive(Template)]
#[template(path = "admin/sub_managers.html")]
pub struct AdminSubManagersTemplate {
    pub view: AdminLayout<AdminSubManagersView>,
}

/// List fields are edited one entry per line.
#[derive(Clone, Default)]
pub struct AdminProfileFormView {
    pub name: String,
    pub title: String,
    pub introduction: String,
    pub career: String,
    pub industry_expertise: String,
    pub area_of_expertise: String,
    pub profile_image_url: String,
    pub error: Option<String>,
    pub saved: bool,
}

impl AdminProfileFormView {
    pub fn from_record(record: Option<&AboutMeRecord>) -> Self {
        match record {
            Some(record) => Self {
                name: record.name.clone(),
                title: record.title.clone(),
                introduction: record.introduction.clone(),
                career: record.career.join("\n"),
                industry_expertise: record.industry_expertise.join("\n"),
                area_of_expertise: record.area_of_expertise.join("\n"),
                profile_image_url: record.profile_image_url.clone().unwrap_or_default(),
                error: None,
                saved: false,
            },
            None => Self::default(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/about_me.html")]
pub struct AdminProfileTemplate {
    pub view: AdminLayout<AdminProfileFormView>,
}
