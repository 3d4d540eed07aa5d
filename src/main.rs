use std::{future::IntoFuture, process, sync::Arc, time::Duration};

use clap::Parser;
use pressroom::{
    application::{
        admin::{AdminPopupService, AdminPostService},
        auth::{AdminAuthError, AdminAuthService, CreateAdminCommand, LoginRateLimiter},
        error::AppError,
        feed::PostFeedService,
        popups::PopupService,
        profile::ProfileService,
        repos::{
            AdminUsersRepo, HealthRepo, PopupsRepo, PopupsWriteRepo, PostsRepo, PostsWriteRepo,
            ProfileRepo, SessionsRepo,
        },
    },
    config::{self, CliArgs},
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, ApiState, HttpState, RouterState, SessionCookie},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let cli_args = CliArgs::parse();
    let settings = config::load(&cli_args)
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::CreateAdmin(args) => run_create_admin(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let router_state = build_router_state(repositories, &settings);
    serve_http(&settings, router_state).await
}

async fn run_create_admin(
    settings: config::Settings,
    args: config::CreateAdminArgs,
) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let auth = auth_service(&repositories, &settings);

    let admin = auth
        .create_admin(CreateAdminCommand {
            email: args.email,
            name: args.name,
            role: args.role,
            password: args.password,
        })
        .await
        .map_err(|err| match err {
            AdminAuthError::InvalidInput(message) => AppError::validation(message),
            err @ AdminAuthError::DuplicateEmail => AppError::validation(err.to_string()),
            other => AppError::unexpected(other.to_string()),
        })?;

    info!(
        target = "pressroom::cli::create_admin",
        admin_id = %admin.id,
        email = %admin.email,
        role = %admin.role,
        "admin account created"
    );
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn auth_service(
    repositories: &Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> AdminAuthService {
    let admins: Arc<dyn AdminUsersRepo> = repositories.clone();
    let sessions: Arc<dyn SessionsRepo> = repositories.clone();
    let limiter = LoginRateLimiter::new(
        settings.auth.login_window,
        settings.auth.login_max_attempts.get(),
    );
    AdminAuthService::new(admins, sessions, limiter, settings.auth.session_ttl)
}

fn build_router_state(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> RouterState {
    let posts_reader: Arc<dyn PostsRepo> = repositories.clone();
    let posts_writer: Arc<dyn PostsWriteRepo> = repositories.clone();
    let popups_reader: Arc<dyn PopupsRepo> = repositories.clone();
    let popups_writer: Arc<dyn PopupsWriteRepo> = repositories.clone();
    let profile_repo: Arc<dyn ProfileRepo> = repositories.clone();
    let health: Arc<dyn HealthRepo> = repositories.clone();

    let timezone = settings.display.timezone;
    let feed = Arc::new(PostFeedService::new(posts_reader.clone(), posts_writer.clone()));
    let profile = Arc::new(ProfileService::new(profile_repo, settings.profile.cache_ttl));

    let http_state = HttpState {
        feed: feed.clone(),
        popups: Arc::new(PopupService::new(
            popups_reader.clone(),
            settings.popups.max_displayed,
            timezone,
        )),
        profile: profile.clone(),
        health,
        timezone,
        recent_limit: settings.feed.recent_limit,
        related_limit: settings.feed.related_limit,
        category_limit: settings.feed.category_limit,
        slider_limit: settings.feed.slider_limit,
    };

    let admin_state = AdminState {
        auth: Arc::new(auth_service(&repositories, settings)),
        posts: Arc::new(AdminPostService::new(posts_reader, posts_writer)),
        popups: Arc::new(AdminPopupService::new(popups_reader, popups_writer)),
        profile,
        session_cookie: SessionCookie {
            name: settings.auth.cookie_name.clone(),
            secure: settings.auth.secure_cookie,
            ttl: settings.auth.session_ttl,
        },
        timezone,
        page_size: settings.feed.admin_page_size.get(),
    };

    RouterState {
        http: http_state,
        api: ApiState { feed },
        admin: admin_state,
    }
}

async fn serve_http(settings: &config::Settings, router_state: RouterState) -> Result<(), AppError> {
    let router = http::build_router(router_state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "pressroom::server",
        addr = %settings.server.addr,
        "listening"
    );

    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .into_future();
    let grace = settings.server.graceful_shutdown;

    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = drain_deadline(grace) => {
            warn!(
                target = "pressroom::server",
                grace_secs = grace.as_secs(),
                "graceful shutdown timed out; dropping open connections"
            );
        }
    }

    info!(target = "pressroom::server", "server stopped");
    Ok(())
}

async fn drain_deadline(grace: Duration) {
    wait_for_shutdown_signal().await;
    tokio::time::sleep(grace).await;
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(err) => {
                warn!(
                    target = "pressroom::server",
                    error = %err,
                    "SIGTERM handler unavailable; listening for ctrl-c only"
                );
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
