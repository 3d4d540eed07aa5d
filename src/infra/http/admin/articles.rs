//! Article list, editor and delete handlers.

use axum::{
    extract::{Extension, Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::application::{
    admin::posts::{AdminPostError, CreatePostCommand, UpdatePostCommand},
    auth::AdminPrincipal,
    error::HttpError,
};
use crate::presentation::{
    admin::views::{
        AdminArticleFormTemplate, AdminArticleFormView, AdminArticleListView,
        AdminArticlesTemplate, AdminChrome, AdminLayout, AdminSection,
    },
    views::{ARTICLE_NOT_FOUND, render_template_response},
};

use super::AdminState;
use super::forms::ArticleForm;
use super::shared::{parse_id, render_admin_not_found};
use crate::infra::http::repo_error_to_http;

const ARTICLES_PATH: &str = "/admin/articles";

pub(crate) async fn admin_dashboard(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
) -> Response {
    render_article_list(&state, &principal, "Dashboard").await
}

pub(crate) async fn admin_articles(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
) -> Response {
    render_article_list(&state, &principal, "Articles").await
}

async fn render_article_list(
    state: &AdminState,
    principal: &AdminPrincipal,
    heading: &'static str,
) -> Response {
    let posts = match state.posts.list(state.page_size).await {
        Ok(posts) => posts,
        Err(err) => return admin_post_error("infra::http::admin_articles", err).into_response(),
    };

    let content = AdminArticleListView::new(heading, &posts, state.timezone);
    let chrome = AdminChrome::new(principal, heading, AdminSection::Articles);
    let view = AdminLayout::new(chrome, content);
    render_template_response(AdminArticlesTemplate { view }, StatusCode::OK)
}

pub(crate) async fn admin_article_new(Extension(principal): Extension<AdminPrincipal>) -> Response {
    render_form(&principal, AdminArticleFormView::blank(), StatusCode::OK)
}

pub(crate) async fn admin_article_create(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Form(form): Form<ArticleForm>,
) -> Response {
    let command = CreatePostCommand {
        title: form.title.clone(),
        content: form.content.clone(),
        category: form.category.clone(),
        subcategory: form.subcategory(),
        description: form.description(),
        image_url: form.image_url(),
    };

    match state.posts.create_post(&principal, command).await {
        Ok(_) => Redirect::to(ARTICLES_PATH).into_response(),
        Err(AdminPostError::ConstraintViolation(field)) => {
            let view = echo_form(AdminArticleFormView::blank(), form)
                .with_error(constraint_message(field));
            render_form(&principal, view, StatusCode::BAD_REQUEST)
        }
        Err(err) => admin_post_error("infra::http::admin_article_create", err).into_response(),
    }
}

pub(crate) async fn admin_article_edit(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<String>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_article_edit";
    let Some(id) = parse_id(&id) else {
        return article_not_found(SOURCE, &principal);
    };

    match state.posts.load_post(id).await {
        Ok(Some(post)) => render_form(
            &principal,
            AdminArticleFormView::for_record(&post),
            StatusCode::OK,
        ),
        Ok(None) => article_not_found(SOURCE, &principal),
        Err(err) => admin_post_error(SOURCE, err).into_response(),
    }
}

pub(crate) async fn admin_article_update(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<String>,
    Form(form): Form<ArticleForm>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_article_update";
    let Some(id) = parse_id(&id) else {
        return article_not_found(SOURCE, &principal);
    };

    let command = UpdatePostCommand {
        id,
        title: form.title.clone(),
        content: form.content.clone(),
        category: form.category.clone(),
        subcategory: form.subcategory(),
        description: form.description(),
        image_url: form.image_url(),
    };

    match state.posts.update_post(&principal, command).await {
        Ok(_) => Redirect::to(ARTICLES_PATH).into_response(),
        Err(AdminPostError::NotFound) => article_not_found(SOURCE, &principal),
        Err(AdminPostError::ConstraintViolation(field)) => {
            let base = AdminArticleFormView {
                heading: "Edit article".to_string(),
                action: format!("/admin/articles/edit/{id}"),
                submit_label: "Save changes",
                ..Default::default()
            };
            let view = echo_form(base, form).with_error(constraint_message(field));
            render_form(&principal, view, StatusCode::BAD_REQUEST)
        }
        Err(err) => admin_post_error(SOURCE, err).into_response(),
    }
}

pub(crate) async fn admin_article_delete(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<String>,
) -> Response {
    const SOURCE: &str = "infra::http::admin_article_delete";
    let Some(id) = parse_id(&id) else {
        return article_not_found(SOURCE, &principal);
    };

    match state.posts.delete_post(&principal, id).await {
        Ok(()) => Redirect::to(ARTICLES_PATH).into_response(),
        Err(AdminPostError::NotFound) => article_not_found(SOURCE, &principal),
        Err(err) => admin_post_error(SOURCE, err).into_response(),
    }
}

fn render_form(principal: &AdminPrincipal, content: AdminArticleFormView, status: StatusCode) -> Response {
    let chrome = AdminChrome::new(principal, content.heading.clone(), AdminSection::Articles);
    let view = AdminLayout::new(chrome, content);
    render_template_response(AdminArticleFormTemplate { view }, status)
}

fn echo_form(base: AdminArticleFormView, form: ArticleForm) -> AdminArticleFormView {
    AdminArticleFormView {
        title: form.title,
        category: form.category,
        subcategory: form.subcategory.unwrap_or_default(),
        description: form.description.unwrap_or_default(),
        image_url: form.image_url.unwrap_or_default(),
        content: form.content,
        ..base
    }
}

fn constraint_message(field: &str) -> String {
    format!("Please provide a valid {field}.")
}

fn article_not_found(source: &'static str, principal: &AdminPrincipal) -> Response {
    render_admin_not_found(source, principal, AdminSection::Articles, ARTICLE_NOT_FOUND)
}

fn admin_post_error(source: &'static str, err: AdminPostError) -> HttpError {
    match err {
        AdminPostError::ConstraintViolation(field) => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Article request could not be processed",
            format!("Invalid field `{field}`"),
        ),
        AdminPostError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            ARTICLE_NOT_FOUND,
            "article not found",
        ),
        AdminPostError::Repo(repo) => repo_error_to_http(source, repo),
    }
}
