mod articles;
mod auth;
mod forms;
mod guard;
mod popups;
mod profile;
mod shared;
mod state;
mod sub_managers;

pub use state::{AdminState, SessionCookie};

use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::RouterState;

pub fn build_admin_router(state: AdminState) -> Router<RouterState> {
    let protected = Router::new()
        .route("/admin", get(articles::admin_dashboard))
        .route("/admin/logout", post(auth::logout))
        .route("/admin/articles", get(articles::admin_articles))
        .route(
            "/admin/articles/create",
            get(articles::admin_article_new).post(articles::admin_article_create),
        )
        .route(
            "/admin/articles/edit/{id}",
            get(articles::admin_article_edit).post(articles::admin_article_update),
        )
        .route(
            "/admin/articles/{id}/delete",
            post(articles::admin_article_delete),
        )
        .route("/admin/popup", get(popups::admin_popups))
        .route(
            "/admin/popup/create",
            get(popups::admin_popup_new).post(popups::admin_popup_create),
        )
        .route(
            "/admin/popup/edit/{id}",
            get(popups::admin_popup_edit).post(popups::admin_popup_update),
        )
        .route("/admin/popup/{id}/toggle", post(popups::admin_popup_toggle))
        .route("/admin/popup/{id}/delete", post(popups::admin_popup_delete))
        .route(
            "/admin/about-me",
            get(profile::admin_about_me).post(profile::admin_about_me_update),
        )
        .route(
            "/admin/sub-managers",
            get(sub_managers::admin_sub_managers).post(sub_managers::admin_sub_manager_create),
        )
        .route(
            "/admin/sub-managers/{id}/delete",
            post(sub_managers::admin_sub_manager_delete),
        )
        .route_layer(middleware::from_fn_with_state(state, guard::require_admin));

    Router::new()
        .route(
            "/admin/login",
            get(auth::login_page).post(auth::login_submit),
        )
        .merge(protected)
}
