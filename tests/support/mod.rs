//! In-memory repositories and router wiring shared by the HTTP tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use time::{Date, OffsetDateTime};
use tower::ServiceExt;
use uuid::Uuid;

use pressroom::application::admin::{AdminPopupService, AdminPostService};
use pressroom::application::auth::service::{hash_password, hash_token};
use pressroom::application::auth::{AdminAuthService, LoginRateLimiter};
use pressroom::application::feed::PostFeedService;
use pressroom::application::popups::PopupService;
use pressroom::application::profile::ProfileService;
use pressroom::application::repos::{
    AdminUsersRepo, CreateAdminParams, CreatePostParams, CreateSessionParams, HealthRepo,
    PopupFields, PopupsRepo, PopupsWriteRepo, PostQueryFilter, PostsRepo, PostsWriteRepo, ProfileRepo, RepoError,
    SaveProfileParams, SessionsRepo, UpdatePostParams,
};
use pressroom::domain::entities::{
    AboutMeRecord, AdminSessionRecord, AdminUserRecord, PopupRecord, PostRecord,
};
use pressroom::domain::types::AdminRole;
use pressroom::infra::http::{
    AdminState, ApiState, HttpState, RouterState, SessionCookie, build_router,
};

pub const COOKIE_NAME: &str = "pressroom_admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery";

#[derive(Default)]
pub struct MemoryStore {
    pub posts: Mutex<Vec<PostRecord>>,
    pub popups: Mutex<Vec<PopupRecord>>,
    pub admins: Mutex<Vec<AdminUserRecord>>,
    pub sessions: Mutex<Vec<AdminSessionRecord>>,
    pub profile: Mutex<Option<AboutMeRecord>>,
    pub fail_posts: AtomicBool,
    pub fail_sessions: AtomicBool,
    pub post_list_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_posts(&self) {
        self.fail_posts.store(true, Ordering::SeqCst);
    }

    pub fn fail_sessions(&self) {
        self.fail_sessions.store(true, Ordering::SeqCst);
    }

    pub fn post_list_calls(&self) -> usize {
        self.post_list_calls.load(Ordering::SeqCst)
    }

    pub fn seed_post(&self, title: &str, content: &str, age_minutes: i64) -> PostRecord {
        self.insert_post(title, content, "news", None, age_minutes)
    }

    pub fn seed_post_in(&self, title: &str, category: &str, subcategory: Option<&str>, age_minutes: i64) -> PostRecord {
        self.insert_post(title, &format!("<p>{title} body</p>"), category, subcategory, age_minutes)
    }

    fn insert_post(
        &self,
        title: &str,
        content: &str,
        category: &str,
        subcategory: Option<&str>,
        age_minutes: i64,
    ) -> PostRecord {
        let created_at = OffsetDateTime::now_utc() - time::Duration::minutes(age_minutes);
        let post = PostRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            subcategory: subcategory.map(str::to_string),
            description: None,
            image_url: None,
            author_id: None,
            view_count: 0,
            is_slide: false,
            created_at,
            updated_at: created_at,
        };
        self.posts.lock().unwrap().push(post.clone());
        post
    }

    pub fn seed_slide(&self, title: &str, age_minutes: i64) -> PostRecord {
        let mut post = self.seed_post_in(title, "report", None, age_minutes);
        let mut posts = self.posts.lock().unwrap();
        if let Some(stored) = posts.iter_mut().find(|stored| stored.id == post.id) {
            stored.is_slide = true;
        }
        post.is_slide = true;
        post
    }

    pub fn seed_popup(&self, title: &str, start_date: Date, end_date: Date, is_active: bool) -> PopupRecord {
        let now = OffsetDateTime::now_utc();
        let popup = PopupRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: Some(format!("{title} body")),
            image_url: None,
            link_url: None,
            start_date,
            end_date,
            is_active,
            position: None,
            size_percentage: None,
            display_order: None,
            created_at: now,
            updated_at: now,
        };
        self.popups.lock().unwrap().push(popup.clone());
        popup
    }

    pub fn seed_admin(&self, email: &str) -> AdminUserRecord {
        self.seed_admin_with_role(email, AdminRole::SuperAdmin)
    }

    pub fn seed_admin_with_role(&self, email: &str, role: AdminRole) -> AdminUserRecord {
        let salt = Uuid::new_v4().simple().to_string();
        let admin = AdminUserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: "Desk Editor".to_string(),
            role,
            password_hash: hash_password(&salt, ADMIN_PASSWORD),
            password_salt: salt,
            created_at: OffsetDateTime::now_utc(),
        };
        self.admins.lock().unwrap().push(admin.clone());
        admin
    }

    /// Store a live session for `admin` and return the raw cookie token.
    pub fn sign_in(&self, admin: &AdminUserRecord) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let now = OffsetDateTime::now_utc();
        self.sessions.lock().unwrap().push(AdminSessionRecord {
            id: Uuid::new_v4(),
            admin_id: admin.id,
            token_hash: hash_token(&token),
            expires_at: now + time::Duration::hours(1),
            created_at: now,
        });
        token
    }

    fn posts_unavailable(&self) -> Result<(), RepoError> {
        if self.fail_posts.load(Ordering::SeqCst) {
            return Err(RepoError::Persistence("posts table unavailable".into()));
        }
        Ok(())
    }

    fn sessions_unavailable(&self) -> Result<(), RepoError> {
        if self.fail_sessions.load(Ordering::SeqCst) {
            return Err(RepoError::Timeout);
        }
        Ok(())
    }
}

#[async_trait]
impl PostsRepo for MemoryStore {
    async fn list_recent(&self, filter: &PostQueryFilter, limit: u32) -> Result<Vec<PostRecord>, RepoError> {
        self.post_list_calls.fetch_add(1, Ordering::SeqCst);
        self.posts_unavailable()?;
        let mut posts: Vec<_> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|post| filter.matches(post))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        self.posts_unavailable()?;
        Ok(self.posts.lock().unwrap().iter().find(|post| post.id == id).cloned())
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryStore {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let post = PostRecord {
            id: Uuid::new_v4(),
            title: params.title,
            content: params.content,
            category: params.category,
            subcategory: params.subcategory,
            description: params.description,
            image_url: params.image_url,
            author_id: params.author_id,
            view_count: 0,
            is_slide: params.is_slide,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|post| post.id == params.id)
            .ok_or(RepoError::NotFound)?;
        post.title = params.title;
        post.content = params.content;
        post.category = params.category;
        post.subcategory = params.subcategory;
        post.description = params.description;
        post.image_url = params.image_url;
        post.is_slide = params.is_slide;
        post.updated_at = OffsetDateTime::now_utc();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|post| post.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<i64, RepoError> {
        self.posts_unavailable()?;
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(RepoError::NotFound)?;
        post.view_count += 1;
        Ok(post.view_count)
    }
}

#[async_trait]
impl PopupsRepo for MemoryStore {
    async fn list_all(&self) -> Result<Vec<PopupRecord>, RepoError> {
        Ok(self.popups.lock().unwrap().clone())
    }

    async fn list_displayable(&self, day: Date, limit: u32) -> Result<Vec<PopupRecord>, RepoError> {
        let mut popups: Vec<_> = self
            .popups
            .lock()
            .unwrap()
            .iter()
            .filter(|popup| popup.is_displayable_on(day))
            .cloned()
            .collect();
        popups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        popups.truncate(limit as usize);
        Ok(popups)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PopupRecord>, RepoError> {
        Ok(self.popups.lock().unwrap().iter().find(|popup| popup.id == id).cloned())
    }
}

#[async_trait]
impl PopupsWriteRepo for MemoryStore {
    async fn create_popup(&self, fields: PopupFields) -> Result<PopupRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let popup = PopupRecord {
            id: Uuid::new_v4(),
            title: fields.title,
            content: fields.content,
            image_url: fields.image_url,
            link_url: fields.link_url,
            start_date: fields.start_date,
            end_date: fields.end_date,
            is_active: fields.is_active,
            position: fields.position,
            size_percentage: fields.size_percentage,
            display_order: fields.display_order,
            created_at: now,
            updated_at: now,
        };
        self.popups.lock().unwrap().push(popup.clone());
        Ok(popup)
    }

    async fn update_popup(&self, id: Uuid, fields: PopupFields) -> Result<PopupRecord, RepoError> {
        let mut popups = self.popups.lock().unwrap();
        let popup = popups
            .iter_mut()
            .find(|popup| popup.id == id)
            .ok_or(RepoError::NotFound)?;
        popup.title = fields.title;
        popup.content = fields.content;
        popup.image_url = fields.image_url;
        popup.link_url = fields.link_url;
        popup.start_date = fields.start_date;
        popup.end_date = fields.end_date;
        popup.is_active = fields.is_active;
        popup.position = fields.position;
        popup.size_percentage = fields.size_percentage;
        popup.display_order = fields.display_order;
        Ok(popup.clone())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<PopupRecord, RepoError> {
        let mut popups = self.popups.lock().unwrap();
        let popup = popups
            .iter_mut()
            .find(|popup| popup.id == id)
            .ok_or(RepoError::NotFound)?;
        popup.is_active = is_active;
        Ok(popup.clone())
    }

    async fn delete_popup(&self, id: Uuid) -> Result<(), RepoError> {
        let mut popups = self.popups.lock().unwrap();
        let before = popups.len();
        popups.retain(|popup| popup.id != id);
        if popups.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl AdminUsersRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUserRecord>, RepoError> {
        Ok(self.admins.lock().unwrap().iter().find(|admin| admin.email == email).cloned())
    }

    async fn find_admin(&self, id: Uuid) -> Result<Option<AdminUserRecord>, RepoError> {
        self.sessions_unavailable()?;
        Ok(self.admins.lock().unwrap().iter().find(|admin| admin.id == id).cloned())
    }

    async fn create_admin(&self, params: CreateAdminParams) -> Result<AdminUserRecord, RepoError> {
        let admin = AdminUserRecord {
            id: Uuid::new_v4(),
            email: params.email,
            name: params.name,
            role: params.role,
            password_salt: params.password_salt,
            password_hash: params.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        self.admins.lock().unwrap().push(admin.clone());
        Ok(admin)
    }

    async fn list_admins(&self, role: AdminRole) -> Result<Vec<AdminUserRecord>, RepoError> {
        let mut admins: Vec<_> = self
            .admins
            .lock()
            .unwrap()
            .iter()
            .filter(|admin| admin.role == role)
            .cloned()
            .collect();
        admins.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(admins)
    }

    async fn delete_admin(&self, id: Uuid) -> Result<(), RepoError> {
        let mut admins = self.admins.lock().unwrap();
        let before = admins.len();
        admins.retain(|admin| admin.id != id);
        if admins.len() == before {
            return Err(RepoError::NotFound);
        }
        self.sessions.lock().unwrap().retain(|session| session.admin_id != id);
        Ok(())
    }
}

#[async_trait]
impl SessionsRepo for MemoryStore {
    async fn create_session(&self, params: CreateSessionParams) -> Result<AdminSessionRecord, RepoError> {
        let session = AdminSessionRecord {
            id: Uuid::new_v4(),
            admin_id: params.admin_id,
            token_hash: params.token_hash,
            expires_at: params.expires_at,
            created_at: OffsetDateTime::now_utc(),
        };
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    async fn find_session(&self, token_hash: &str) -> Result<Option<AdminSessionRecord>, RepoError> {
        self.sessions_unavailable()?;
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|session| session.token_hash == token_hash)
            .cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> Result<(), RepoError> {
        self.sessions
            .lock()
            .unwrap()
            .retain(|session| session.token_hash != token_hash);
        Ok(())
    }

    async fn delete_sessions_for(&self, admin_id: Uuid) -> Result<(), RepoError> {
        self.sessions
            .lock()
            .unwrap()
            .retain(|session| session.admin_id != admin_id);
        Ok(())
    }

    async fn purge_expired(&self, now: OffsetDateTime) -> Result<u64, RepoError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|session| session.expires_at > now);
        Ok((before - sessions.len()) as u64)
    }
}

#[async_trait]
impl ProfileRepo for MemoryStore {
    async fn load_profile(&self) -> Result<Option<AboutMeRecord>, RepoError> {
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn save_profile(&self, params: SaveProfileParams) -> Result<AboutMeRecord, RepoError> {
        let record = AboutMeRecord {
            name: params.name,
            title: params.title,
            introduction: params.introduction,
            career: params.career,
            industry_expertise: params.industry_expertise,
            area_of_expertise: params.area_of_expertise,
            profile_image_url: params.profile_image_url,
            updated_at: OffsetDateTime::now_utc(),
        };
        *self.profile.lock().unwrap() = Some(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl HealthRepo for MemoryStore {
    async fn health_check(&self) -> Result<(), RepoError> {
        self.posts_unavailable()
    }
}

/// Full application router over `store`, configured like a default deployment in UTC.
pub fn app(store: Arc<MemoryStore>) -> Router {
    let timezone = chrono_tz::UTC;
    let feed = Arc::new(PostFeedService::new(store.clone(), store.clone()));
    let profile = Arc::new(ProfileService::new(store.clone(), Duration::from_secs(60)));
    let auth = AdminAuthService::new(
        store.clone(),
        store.clone(),
        LoginRateLimiter::new(Duration::from_secs(300), 3),
        Duration::from_secs(3600),
    );

    build_router(RouterState {
        http: HttpState {
            feed: feed.clone(),
            popups: Arc::new(PopupService::new(store.clone(), 3, timezone)),
            profile: profile.clone(),
            health: store.clone(),
            timezone,
            recent_limit: 5,
            related_limit: 3,
            category_limit: 20,
            slider_limit: 5,
        },
        api: ApiState { feed },
        admin: AdminState {
            auth: Arc::new(auth),
            posts: Arc::new(AdminPostService::new(store.clone(), store.clone())),
            popups: Arc::new(AdminPopupService::new(store.clone(), store.clone())),
            profile,
            session_cookie: SessionCookie {
                name: COOKIE_NAME.to_string(),
                secure: false,
                ttl: Duration::from_secs(3600),
            },
            timezone,
            page_size: 50,
        },
    })
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(axum::http::header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_session(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("cookie", format!("{COOKIE_NAME}={token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(token) = token {
        builder = builder.header("cookie", format!("{COOKIE_NAME}={token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
