use crate::application::error::{ErrorReport, HttpError};
use crate::application::render::{ArticleContent, CONTENT_UNAVAILABLE};
use crate::domain::entities::{AboutMeRecord, PopupRecord, PostRecord};
use crate::domain::popups::HorizontalPlacement;
use crate::domain::posts::first_image_url;
use crate::util::timezone;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono_tz::Tz;
use thiserror::Error;

pub const SITE_TITLE: &str = "Pressroom";
pub const ARTICLE_NOT_FOUND: &str = "Article not found";
pub const PROFILE_UNAVAILABLE: &str = "Profile unavailable";

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Renders the public 404 page and tags the response for the access log.
pub fn render_not_found_response(message: &'static str) -> Response {
    let view = LayoutContext::new(LayoutChrome::new("Not found"), ErrorPageView::not_found(message));
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        message,
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub site_title: String,
    pub page_title: String,
    pub asset_version: String,
}

impl LayoutChrome {
    pub fn new(page_title: impl Into<String>) -> Self {
        Self {
            site_title: SITE_TITLE.to_string(),
            page_title: page_title.into(),
            asset_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub chrome: LayoutChrome,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self { chrome, content }
    }
}

#[derive(Clone)]
pub struct PostCardView {
    pub href: String,
    pub title: String,
    pub category: String,
    pub category_href: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub published_on: String,
    pub view_count: i64,
}

impl PostCardView {
    /// Falls back to the first `<img>` in the body when no featured image is set.
    pub fn from_record(post: &PostRecord, tz: Tz) -> Self {
        let image_url = post
            .image_url
            .clone()
            .or_else(|| first_image_url(&post.content).map(str::to_string));
        Self {
            href: format!("/article/{}", post.id),
            title: post.title.clone(),
            category: post.category.clone(),
            category_href: format!("/{}", post.category),
            description: post.description.clone(),
            image_url,
            published_on: timezone::human_date(post.created_at, tz),
            view_count: post.view_count,
        }
    }
}

#[derive(Clone)]
pub struct PopupView {
    pub title: String,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    /// Inline `left`/`top`/`width` declarations for the overlay.
    pub style: String,
}

impl PopupView {
    /// `index` is the popup's slot in display order; it drives the cascade.
    pub fn new(popup: &PopupRecord, index: usize) -> Self {
        let placement = popup.placement(index);
        let left = match placement.left {
            HorizontalPlacement::Centered => "left: 50%; transform: translateX(-50%)".to_string(),
            HorizontalPlacement::Left(px) => format!("left: {px}px"),
        };
        Self {
            title: popup.title.clone(),
            content: popup.content.clone(),
            image_url: popup.image_url.clone(),
            link_url: popup.link_url.clone(),
            style: format!(
                "{left}; top: {}px; width: {}%;",
                placement.top,
                popup.size_percentage_or_default()
            ),
        }
    }
}

#[derive(Clone)]
pub struct SlideView {
    pub href: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl From<&PostRecord> for SlideView {
    fn from(post: &PostRecord) -> Self {
        Self {
            href: format!("/article/{}", post.id),
            title: post.title.clone(),
            description: post.description.clone(),
            image_url: post
                .image_url
                .clone()
                .or_else(|| first_image_url(&post.content).map(str::to_string)),
        }
    }
}

#[derive(Clone)]
pub struct HomeView {
    pub slides: Vec<SlideView>,
    pub posts: Vec<PostCardView>,
    pub popups: Vec<PopupView>,
}

impl HomeView {
    pub fn new(
        slides: &[PostRecord],
        posts: &[PostRecord],
        popups: &[PopupRecord],
        tz: Tz,
    ) -> Self {
        Self {
            slides: slides.iter().map(SlideView::from).collect(),
            posts: posts
                .iter()
                .map(|post| PostCardView::from_record(post, tz))
                .collect(),
            popups: popups
                .iter()
                .enumerate()
                .map(|(index, popup)| PopupView::new(popup, index))
                .collect(),
        }
    }

    pub fn has_slides(&self) -> bool {
        !self.slides.is_empty()
    }

    pub fn has_posts(&self) -> bool {
        !self.posts.is_empty()
    }

    pub fn has_popups(&self) -> bool {
        !self.popups.is_empty()
    }
}

/// A category or subcategory listing.
#[derive(Clone)]
pub struct CategoryPageView {
    pub heading: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub posts: Vec<PostCardView>,
}

impl CategoryPageView {
    pub fn new(category: &str, subcategory: Option<&str>, posts: &[PostRecord], tz: Tz) -> Self {
        let heading = match subcategory {
            Some(sub) => format!("{category} / {sub}"),
            None => category.to_string(),
        };
        Self {
            heading,
            category: category.to_string(),
            subcategory: subcategory.map(str::to_string),
            posts: posts
                .iter()
                .map(|post| PostCardView::from_record(post, tz))
                .collect(),
        }
    }

    pub fn has_posts(&self) -> bool {
        !self.posts.is_empty()
    }
}

#[derive(Clone)]
pub struct ArticlePageView {
    pub title: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub published_on: String,
    pub published_iso: String,
    pub view_count: i64,
    pub image_url: Option<String>,
    pub content_available: bool,
    pub content_html: String,
    pub unavailable_message: &'static str,
    pub related: Vec<PostCardView>,
}

impl ArticlePageView {
    pub fn new(post: &PostRecord, content: ArticleContent, related: &[PostRecord], tz: Tz) -> Self {
        Self {
            title: post.title.clone(),
            category: post.category.clone(),
            subcategory: post.subcategory.clone(),
            published_on: timezone::human_date(post.created_at, tz),
            published_iso: timezone::iso_date(post.created_at, tz),
            view_count: post.view_count,
            image_url: post.image_url.clone(),
            content_available: content.is_available(),
            content_html: content.html().to_string(),
            unavailable_message: CONTENT_UNAVAILABLE,
            related: related
                .iter()
                .map(|post| PostCardView::from_record(post, tz))
                .collect(),
        }
    }

    pub fn has_related(&self) -> bool {
        !self.related.is_empty()
    }
}

#[derive(Clone)]
pub struct ProfileView {
    pub name: String,
    pub title: String,
    pub introduction: String,
    pub career: Vec<String>,
    pub industry_expertise: Vec<String>,
    pub area_of_expertise: Vec<String>,
    pub profile_image_url: Option<String>,
}

impl From<AboutMeRecord> for ProfileView {
    fn from(record: AboutMeRecord) -> Self {
        Self {
            name: record.name,
            title: record.title,
            introduction: record.introduction,
            career: record.career,
            industry_expertise: record.industry_expertise,
            area_of_expertise: record.area_of_expertise,
            profile_image_url: record.profile_image_url,
        }
    }
}

#[derive(Clone)]
pub struct AboutPageView {
    pub profile: Option<ProfileView>,
    pub unavailable_message: &'static str,
}

impl AboutPageView {
    pub fn new(profile: Option<AboutMeRecord>) -> Self {
        Self {
            profile: profile.map(ProfileView::from),
            unavailable_message: PROFILE_UNAVAILABLE,
        }
    }
}

#[derive(Clone)]
pub struct ErrorPageView {
    pub title: String,
    pub message: String,
}

impl ErrorPageView {
    pub fn not_found(message: &str) -> Self {
        Self {
            title: "404".to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<HomeView>,
}

#[derive(Template)]
#[template(path = "category.html")]
pub struct CategoryTemplate {
    pub view: LayoutContext<CategoryPageView>,
}

#[derive(Template)]
#[template(path = "article.html")]
pub struct ArticleTemplate {
    pub view: LayoutContext<ArticlePageView>,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub view: LayoutContext<AboutPageView>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}
