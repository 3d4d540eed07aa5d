use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

use crate::domain::types::AdminRole;

/// Command-line arguments for the pressroom binary.
#[derive(Debug, Parser)]
#[command(name = "pressroom", version, about = "Pressroom news site and admin console")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "PRESSROOM_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP server.
    Serve(Box<ServeArgs>),
    /// Create an administrator account.
    #[command(name = "create-admin")]
    CreateAdmin(CreateAdminArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseOverride {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    #[command(flatten)]
    pub database: DatabaseOverride,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Mark the admin session cookie `Secure`.
    #[arg(
        long = "auth-secure-cookie",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub auth_secure_cookie: Option<bool>,

    /// Override the IANA timezone used to display dates.
    #[arg(long = "display-timezone", value_name = "TZ")]
    pub display_timezone: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct CreateAdminArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,

    /// Login email, stored lowercased.
    #[arg(long, value_name = "EMAIL")]
    pub email: String,

    /// Display name.
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// `super_admin` or `sub_admin`.
    #[arg(long, value_name = "ROLE", default_value = "sub_admin", value_parser = parse_role)]
    pub role: AdminRole,

    /// Initial password.
    #[arg(long, env = "PRESSROOM_ADMIN_PASSWORD", value_name = "PASSWORD", hide_env_values = true)]
    pub password: String,
}

fn parse_role(value: &str) -> Result<AdminRole, String> {
    value
        .parse::<AdminRole>()
        .map_err(|_| format!("unknown role `{value}`; expected super_admin or sub_admin"))
}
