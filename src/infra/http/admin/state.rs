use std::sync::Arc;
use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono_tz::Tz;

use crate::application::{
    admin::{AdminPopupService, AdminPostService},
    auth::AdminAuthService,
    profile::ProfileService,
};

#[derive(Clone)]
pub struct AdminState {
    pub auth: Arc<AdminAuthService>,
    pub posts: Arc<AdminPostService>,
    pub popups: Arc<AdminPopupService>,
    pub profile: Arc<ProfileService>,
    pub session_cookie: SessionCookie,
    pub timezone: Tz,
    pub page_size: u32,
}

/// Attributes of the admin session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub name: String,
    pub secure: bool,
    pub ttl: Duration,
}

impl SessionCookie {
    pub fn issue(&self, token: String) -> Cookie<'static> {
        let max_age = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        Cookie::build((self.name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::seconds(max_age))
            .build()
    }

    pub fn removal(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), String::new()))
            .path("/")
            .build()
    }
}
