//! Admin authentication: session resolution, login and the page gate.

pub mod gate;
pub mod rate_limit;
pub mod service;

pub use gate::{AdminPrincipal, GateDecision, LOGIN_PATH, SessionStatus};
pub use rate_limit::LoginRateLimiter;
pub use service::{
    AdminAuthError, AdminAuthService, CreateAdminCommand, IssuedSession, NewSubAdmin,
};
