use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{
        HeaderValue, StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::get,
};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::{
    application::{
        feed::PostFeedService, popups::PopupService, profile::ProfileService,
        render::render_article_content, repos::HealthRepo,
    },
    domain::posts::category_slug,
    presentation::views::{
        ARTICLE_NOT_FOUND, AboutPageView, AboutTemplate, ArticlePageView, ArticleTemplate,
        CategoryPageView, CategoryTemplate, HomeView, IndexTemplate, LayoutChrome, LayoutContext,
        render_not_found_response, render_template_response,
    },
};

use super::{RouterState, db_health_response};

const APP_CSS: &str = include_str!("../../../static/app.css");
const PAGE_NOT_FOUND: &str = "Page not found";
/// First path segments owned by other routers.
const RESERVED_SECTIONS: [&str; 5] = ["admin", "api", "article", "static", "about"];

#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<PostFeedService>,
    pub popups: Arc<PopupService>,
    pub profile: Arc<ProfileService>,
    pub health: Arc<dyn HealthRepo>,
    pub timezone: Tz,
    pub recent_limit: u32,
    pub related_limit: u32,
    pub category_limit: u32,
    pub slider_limit: u32,
}

pub fn build_public_router() -> Router<RouterState> {
    Router::new()
        .route("/", get(index))
        .route("/article/{id}", get(article_detail))
        .route("/about", get(about))
        .route("/_health/db", get(public_health))
        .route("/static/app.css", get(stylesheet))
        .route("/{category}", get(category_page))
        .route("/{category}/{subcategory}", get(subcategory_page))
        .fallback(fallback)
}

async fn index(State(state): State<HttpState>) -> Response {
    let (slides, posts, popups) = tokio::join!(
        state.feed.slide_posts(state.slider_limit),
        state.feed.recent_posts(state.recent_limit),
        state.popups.active_popups()
    );

    let content = HomeView::new(&slides, &posts, &popups, state.timezone);
    let view = LayoutContext::new(LayoutChrome::new("Home"), content);
    render_template_response(IndexTemplate { view }, StatusCode::OK)
}

async fn article_detail(State(state): State<HttpState>, Path(id): Path<String>) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return render_not_found_response(ARTICLE_NOT_FOUND);
    };

    let Some(article) = state.feed.article(id, state.related_limit).await else {
        return render_not_found_response(ARTICLE_NOT_FOUND);
    };

    state.feed.record_view(id);

    let content = render_article_content(&article.post.content);
    let page = ArticlePageView::new(&article.post, content, &article.related, state.timezone);
    let view = LayoutContext::new(LayoutChrome::new(article.post.title.clone()), page);
    render_template_response(ArticleTemplate { view }, StatusCode::OK)
}

async fn category_page(State(state): State<HttpState>, Path(category): Path<String>) -> Response {
    render_category(&state, &category, None).await
}

async fn subcategory_page(
    State(state): State<HttpState>,
    Path((category, subcategory)): Path<(String, String)>,
) -> Response {
    render_category(&state, &category, Some(&subcategory)).await
}

/// Only canonical slugs name a section; anything else is a plain 404.
async fn render_category(state: &HttpState, category: &str, subcategory: Option<&str>) -> Response {
    let canonical = |segment: &str| !segment.is_empty() && category_slug(segment) == segment;
    if RESERVED_SECTIONS.contains(&category)
        || !canonical(category)
        || !subcategory.is_none_or(canonical)
    {
        return render_not_found_response(PAGE_NOT_FOUND);
    }

    let posts = state
        .feed
        .category_posts(category, subcategory, state.category_limit)
        .await;
    let page = CategoryPageView::new(category, subcategory, &posts, state.timezone);
    let view = LayoutContext::new(LayoutChrome::new(page.heading.clone()), page);
    render_template_response(CategoryTemplate { view }, StatusCode::OK)
}

async fn about(State(state): State<HttpState>) -> Response {
    let profile = state.profile.load().await;
    let view = LayoutContext::new(LayoutChrome::new("About"), AboutPageView::new(profile));
    render_template_response(AboutTemplate { view }, StatusCode::OK)
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.health_check().await)
}

async fn stylesheet() -> Response {
    let mut response = APP_CSS.into_response();
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/css; charset=utf-8"),
    );
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=3600"),
    );
    response
}

async fn fallback() -> Response {
    render_not_found_response(PAGE_NOT_FOUND)
}
