//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

pub use cli::{CliArgs, Command, CreateAdminArgs, DatabaseOverride, ServeArgs, ServeOverrides};

use std::{net::SocketAddr, num::NonZeroU32, str::FromStr, time::Duration};

use chrono_tz::Tz;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "pressroom";
const ENV_PREFIX: &str = "PRESSROOM";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24 * 7;
const DEFAULT_SESSION_COOKIE: &str = "pressroom_admin";
const DEFAULT_LOGIN_WINDOW_SECS: u64 = 300;
const DEFAULT_LOGIN_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_RECENT_LIMIT: u32 = 5;
const DEFAULT_RELATED_LIMIT: u32 = 3;
const DEFAULT_CATEGORY_LIMIT: u32 = 30;
const DEFAULT_SLIDER_LIMIT: u32 = 5;
const DEFAULT_ADMIN_PAGE_SIZE: u32 = 50;
const DEFAULT_MAX_POPUPS: u32 = 3;
const DEFAULT_PROFILE_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_TIMEZONE: &str = "Asia/Seoul";

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub feed: FeedSettings,
    pub popups: PopupSettings,
    pub profile: ProfileSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub graceful_shutdown: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub session_ttl: Duration,
    pub cookie_name: String,
    pub secure_cookie: bool,
    pub login_window: Duration,
    pub login_max_attempts: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub recent_limit: u32,
    pub related_limit: u32,
    pub category_limit: u32,
    pub slider_limit: u32,
    pub admin_page_size: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct PopupSettings {
    pub max_displayed: u32,
}

#[derive(Debug, Clone)]
pub struct ProfileSettings {
    pub cache_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub timezone: Tz,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
                graceful_shutdown: Duration::from_secs(DEFAULT_GRACEFUL_SHUTDOWN_SECS),
            },
            logging: LoggingSettings {
                level: LevelFilter::INFO,
                format: LogFormat::Compact,
            },
            database: DatabaseSettings {
                url: None,
                max_connections: NonZeroU32::MIN.saturating_add(DEFAULT_DB_MAX_CONNECTIONS - 1),
            },
            auth: AuthSettings {
                session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
                cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
                secure_cookie: false,
                login_window: Duration::from_secs(DEFAULT_LOGIN_WINDOW_SECS),
                login_max_attempts: NonZeroU32::MIN.saturating_add(DEFAULT_LOGIN_MAX_ATTEMPTS - 1),
            },
            feed: FeedSettings {
                recent_limit: DEFAULT_RECENT_LIMIT,
                related_limit: DEFAULT_RELATED_LIMIT,
                category_limit: DEFAULT_CATEGORY_LIMIT,
                slider_limit: DEFAULT_SLIDER_LIMIT,
                admin_page_size: NonZeroU32::MIN.saturating_add(DEFAULT_ADMIN_PAGE_SIZE - 1),
            },
            popups: PopupSettings {
                max_displayed: DEFAULT_MAX_POPUPS,
            },
            profile: ProfileSettings {
                cache_ttl: Duration::from_secs(DEFAULT_PROFILE_CACHE_TTL_SECS),
            },
            display: DisplaySettings {
                timezone: chrono_tz::Asia::Seoul,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    let mut raw = layered(builder, environment())?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::CreateAdmin(args)) => raw.apply_database_override(&args.database),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}

/// Environment variables override every file source already on `builder`.
fn layered(
    builder: ConfigBuilder<DefaultState>,
    environment: Environment,
) -> Result<RawSettings, LoadError> {
    Ok(builder.add_source(environment).build()?.try_deserialize()?)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    database: RawDatabaseSettings,
    auth: RawAuthSettings,
    feed: RawFeedSettings,
    popups: RawPopupSettings,
    profile: RawProfileSettings,
    display: RawDisplaySettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
            self.server.graceful_shutdown_seconds = Some(seconds);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(max) = overrides.database_max_connections {
            self.database.max_connections = Some(max);
        }
        if let Some(secure) = overrides.auth_secure_cookie {
            self.auth.secure_cookie = Some(secure);
        }
        if let Some(tz) = overrides.display_timezone.as_ref() {
            self.display.timezone = Some(tz.clone());
        }

        self.apply_database_override(&overrides.database);
    }

    fn apply_database_override(&mut self, overrides: &DatabaseOverride) {
        if let Some(url) = overrides.database_url.as_ref() {
            self.database.url = Some(url.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            database,
            auth,
            feed,
            popups,
            profile,
            display,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            database: build_database_settings(database)?,
            auth: build_auth_settings(auth)?,
            feed: build_feed_settings(feed)?,
            popups: PopupSettings {
                max_displayed: popups.max_displayed.unwrap_or(DEFAULT_MAX_POPUPS),
            },
            profile: ProfileSettings {
                cache_ttl: Duration::from_secs(
                    profile
                        .cache_ttl_seconds
                        .unwrap_or(DEFAULT_PROFILE_CACHE_TTL_SECS),
                ),
            },
            display: build_display_settings(display)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    let graceful_secs = server
        .graceful_shutdown_seconds
        .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS);
    if graceful_secs == 0 {
        return Err(LoadError::invalid(
            "server.graceful_shutdown_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ServerSettings {
        addr,
        graceful_shutdown: Duration::from_secs(graceful_secs),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_database_settings(database: RawDatabaseSettings) -> Result<DatabaseSettings, LoadError> {
    let url = database.url.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    let max_connections = non_zero_u32(
        database
            .max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .into(),
        "database.max_connections",
    )?;

    Ok(DatabaseSettings {
        url,
        max_connections,
    })
}

fn build_auth_settings(auth: RawAuthSettings) -> Result<AuthSettings, LoadError> {
    let session_ttl_secs = auth.session_ttl_seconds.unwrap_or(DEFAULT_SESSION_TTL_SECS);
    if session_ttl_secs == 0 {
        return Err(LoadError::invalid(
            "auth.session_ttl_seconds",
            "must be greater than zero",
        ));
    }

    let cookie_name = auth
        .cookie_name
        .map(|name| name.trim().to_string())
        .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());
    if cookie_name.is_empty()
        || !cookie_name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
    {
        return Err(LoadError::invalid(
            "auth.cookie_name",
            "must be a non-empty token of letters, digits, `_` or `-`",
        ));
    }

    let login_window_secs = auth
        .login_window_seconds
        .unwrap_or(DEFAULT_LOGIN_WINDOW_SECS);
    if login_window_secs == 0 {
        return Err(LoadError::invalid(
            "auth.login_window_seconds",
            "must be greater than zero",
        ));
    }

    let login_max_attempts = non_zero_u32(
        auth.login_max_attempts
            .unwrap_or(DEFAULT_LOGIN_MAX_ATTEMPTS)
            .into(),
        "auth.login_max_attempts",
    )?;

    Ok(AuthSettings {
        session_ttl: Duration::from_secs(session_ttl_secs),
        cookie_name,
        secure_cookie: auth.secure_cookie.unwrap_or(false),
        login_window: Duration::from_secs(login_window_secs),
        login_max_attempts,
    })
}

fn build_feed_settings(feed: RawFeedSettings) -> Result<FeedSettings, LoadError> {
    let admin_page_size = non_zero_u32(
        feed.admin_page_size
            .unwrap_or(DEFAULT_ADMIN_PAGE_SIZE)
            .into(),
        "feed.admin_page_size",
    )?;

    Ok(FeedSettings {
        recent_limit: feed.recent_limit.unwrap_or(DEFAULT_RECENT_LIMIT),
        related_limit: feed.related_limit.unwrap_or(DEFAULT_RELATED_LIMIT),
        category_limit: feed.category_limit.unwrap_or(DEFAULT_CATEGORY_LIMIT),
        slider_limit: feed.slider_limit.unwrap_or(DEFAULT_SLIDER_LIMIT),
        admin_page_size,
    })
}

fn build_display_settings(display: RawDisplaySettings) -> Result<DisplaySettings, LoadError> {
    let name = display
        .timezone
        .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
    let timezone = Tz::from_str(name.trim()).map_err(|_| {
        LoadError::invalid(
            "display.timezone",
            format!("`{name}` is not an IANA timezone"),
        )
    })?;
    Ok(DisplaySettings { timezone })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDatabaseSettings {
    url: Option<String>,
    max_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAuthSettings {
    session_ttl_seconds: Option<u64>,
    cookie_name: Option<String>,
    secure_cookie: Option<bool>,
    login_window_seconds: Option<u64>,
    login_max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawFeedSettings {
    recent_limit: Option<u32>,
    related_limit: Option<u32>,
    category_limit: Option<u32>,
    slider_limit: Option<u32>,
    admin_page_size: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPopupSettings {
    max_displayed: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawProfileSettings {
    cache_ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDisplaySettings {
    timezone: Option<String>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}
