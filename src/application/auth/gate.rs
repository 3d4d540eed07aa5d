use uuid::Uuid;

use crate::domain::entities::AdminUserRecord;
use crate::domain::types::AdminRole;

pub const LOGIN_PATH: &str = "/admin/login";

/// The signed-in administrator attached to gated requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPrincipal {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
}

impl AdminPrincipal {
    pub fn is_super_admin(&self) -> bool {
        self.role == AdminRole::SuperAdmin
    }
}

impl From<AdminUserRecord> for AdminPrincipal {
    fn from(record: AdminUserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            name: record.name,
            role: record.role,
        }
    }
}

/// Outcome of resolving the admin session cookie.
///
/// `Pending` means the lookup could not complete (the store was unreachable),
/// which is distinct from a visitor who definitely has no session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    Authenticated(AdminPrincipal),
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Placeholder,
    Redirect(&'static str),
    Render(AdminPrincipal),
}

impl SessionStatus {
    pub fn decide(self) -> GateDecision {
        match self {
            SessionStatus::Pending => GateDecision::Placeholder,
            SessionStatus::Unauthenticated => GateDecision::Redirect(LOGIN_PATH),
            SessionStatus::Authenticated(principal) => GateDecision::Render(principal),
        }
    }

    pub fn principal(&self) -> Option<&AdminPrincipal> {
        match self {
            SessionStatus::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }
}
