//! Shared domain enumerations aligned with persisted database enums.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "admin_role", rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    SubAdmin,
}

impl AdminRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::SubAdmin => "sub_admin",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super admin",
            Self::SubAdmin => "Sub admin",
        }
    }
}

impl Display for AdminRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "sub_admin" => Ok(Self::SubAdmin),
            _ => Err(()),
        }
    }
}
