use std::sync::Arc;

use thiserror::Error;
use time::Date;
use tracing::info;
use url::Url;
use uuid::Uuid;

use crate::application::auth::AdminPrincipal;
use crate::application::repos::{PopupFields, PopupsRepo, PopupsWriteRepo, RepoError};
use crate::domain::entities::PopupRecord;
use crate::domain::error::DomainError;
use crate::domain::popups::{
    CENTERED_POSITION, MAX_SIZE_PERCENTAGE, MIN_SIZE_PERCENTAGE, ensure_window,
};
use crate::domain::posts::ISO_DATE_FORMAT;

#[derive(Debug, Error)]
pub enum AdminPopupError {
    #[error("{field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("popup not found")]
    NotFound,
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for AdminPopupError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AdminPopupError::NotFound,
            other => AdminPopupError::Repo(other),
        }
    }
}

impl AdminPopupError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }
}

/// Raw popup form values as submitted.
#[derive(Debug, Clone, Default)]
pub struct PopupInput {
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub link_url: String,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
    pub position: String,
    pub size_percentage: String,
    pub display_order: String,
}

impl PopupInput {
    /// Validate and convert into storable fields.
    pub fn into_fields(self) -> Result<PopupFields, AdminPopupError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AdminPopupError::invalid("title", "must not be empty"));
        }

        let start_date = parse_date("start_date", &self.start_date)?;
        let end_date = parse_date("end_date", &self.end_date)?;
        ensure_window(start_date, end_date)?;

        let size_percentage = parse_int("size_percentage", &self.size_percentage)?;
        if let Some(size) = size_percentage
            && !(MIN_SIZE_PERCENTAGE..=MAX_SIZE_PERCENTAGE).contains(&size)
        {
            return Err(AdminPopupError::invalid(
                "size_percentage",
                format!("must be between {MIN_SIZE_PERCENTAGE} and {MAX_SIZE_PERCENTAGE}"),
            ));
        }
        let display_order = parse_int("display_order", &self.display_order)?;
        if matches!(display_order, Some(order) if order < 1) {
            return Err(AdminPopupError::invalid("display_order", "must be at least 1"));
        }
        let position = parse_int("position", &self.position)?;
        if matches!(position, Some(px) if px < CENTERED_POSITION) {
            return Err(AdminPopupError::invalid(
                "position",
                "must be -1 (centred) or a pixel offset",
            ));
        }

        Ok(PopupFields {
            title,
            content: non_blank(&self.content),
            image_url: parse_url("image_url", &self.image_url)?,
            link_url: parse_url("link_url", &self.link_url)?,
            start_date,
            end_date,
            is_active: self.is_active,
            position,
            size_percentage,
            display_order,
        })
    }
}

#[derive(Clone)]
pub struct AdminPopupService {
    reader: Arc<dyn PopupsRepo>,
    writer: Arc<dyn PopupsWriteRepo>,
}

impl AdminPopupService {
    pub fn new(reader: Arc<dyn PopupsRepo>, writer: Arc<dyn PopupsWriteRepo>) -> Self {
        Self { reader, writer }
    }

    /// Every popup, newest first.
    pub async fn list(&self) -> Result<Vec<PopupRecord>, AdminPopupError> {
        let mut popups = self.reader.list_all().await?;
        popups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(popups)
    }

    pub async fn load(&self, id: Uuid) -> Result<Option<PopupRecord>, AdminPopupError> {
        self.reader.find_by_id(id).await.map_err(AdminPopupError::from)
    }

    pub async fn create(
        &self,
        actor: &AdminPrincipal,
        input: PopupInput,
    ) -> Result<PopupRecord, AdminPopupError> {
        let fields = input.into_fields()?;
        let popup = self.writer.create_popup(fields).await?;
        log_action("popup.create", actor, popup.id);
        Ok(popup)
    }

    pub async fn update(
        &self,
        actor: &AdminPrincipal,
        id: Uuid,
        input: PopupInput,
    ) -> Result<PopupRecord, AdminPopupError> {
        let fields = input.into_fields()?;
        let popup = self.writer.update_popup(id, fields).await?;
        log_action("popup.update", actor, popup.id);
        Ok(popup)
    }

    pub async fn toggle_active(
        &self,
        actor: &AdminPrincipal,
        id: Uuid,
    ) -> Result<PopupRecord, AdminPopupError> {
        let current = self.load(id).await?.ok_or(AdminPopupError::NotFound)?;
        let popup = self.writer.set_active(id, !current.is_active).await?;
        log_action("popup.toggle", actor, popup.id);
        Ok(popup)
    }

    pub async fn delete(&self, actor: &AdminPrincipal, id: Uuid) -> Result<(), AdminPopupError> {
        self.writer.delete_popup(id).await?;
        log_action("popup.delete", actor, id);
        Ok(())
    }
}

fn log_action(action: &'static str, actor: &AdminPrincipal, popup_id: Uuid) {
    info!(
        target = "pressroom::application::admin::popups",
        action,
        actor = %actor.email,
        popup_id = %popup_id,
        "popup changed"
    );
}

fn parse_date(field: &'static str, value: &str) -> Result<Date, AdminPopupError> {
    Date::parse(value.trim(), ISO_DATE_FORMAT)
        .map_err(|_| AdminPopupError::invalid(field, "expected a date formatted YYYY-MM-DD"))
}

fn parse_int(field: &'static str, value: &str) -> Result<Option<i32>, AdminPopupError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i32>()
        .map(Some)
        .map_err(|_| AdminPopupError::invalid(field, "expected a whole number"))
}

fn parse_url(field: &'static str, value: &str) -> Result<Option<String>, AdminPopupError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Some(value.to_string())),
        _ => Err(AdminPopupError::invalid(field, "expected an http(s) URL")),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use time::{Duration, OffsetDateTime, macros::date};

    use crate::domain::types::AdminRole;

    #[derive(Default)]
    struct MemoryPopups {
        popups: Mutex<Vec<PopupRecord>>,
    }

    fn record(id: Uuid, fields: PopupFields, created_at: OffsetDateTime) -> PopupRecord {
        PopupRecord {
            id,
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
            created_at,
            updated_at: created_at,
        }
    }

    #[async_trait]
    impl PopupsRepo for MemoryPopups {
        async fn list_all(&self) -> Result<Vec<PopupRecord>, RepoError> {
            Ok(self.popups.lock().unwrap().clone())
        }

        async fn list_displayable(
            &self,
            day: Date,
            limit: u32,
        ) -> Result<Vec<PopupRecord>, RepoError> {
            let popups = self.popups.lock().unwrap();
            Ok(popups
                .iter()
                .filter(|popup| popup.is_displayable_on(day))
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<PopupRecord>, RepoError> {
            let popups = self.popups.lock().unwrap();
            Ok(popups.iter().find(|popup| popup.id == id).cloned())
        }
    }

    #[async_trait]
    impl PopupsWriteRepo for MemoryPopups {
        async fn create_popup(&self, fields: PopupFields) -> Result<PopupRecord, RepoError> {
            let mut popups = self.popups.lock().unwrap();
            // distinct timestamps keep ordering deterministic
            let created = OffsetDateTime::now_utc() + Duration::seconds(popups.len() as i64);
            let popup = record(Uuid::new_v4(), fields, created);
            popups.push(popup.clone());
            Ok(popup)
        }

        async fn update_popup(
            &self,
            id: Uuid,
            fields: PopupFields,
        ) -> Result<PopupRecord, RepoError> {
            let mut popups = self.popups.lock().unwrap();
            let slot = popups
                .iter_mut()
                .find(|popup| popup.id == id)
                .ok_or(RepoError::NotFound)?;
            *slot = record(id, fields, slot.created_at);
            Ok(slot.clone())
        }

        async fn set_active(&self, id: Uuid, is_active: bool) -> Result<PopupRecord, RepoError> {
            let mut popups = self.popups.lock().unwrap();
            let slot = popups
                .iter_mut()
                .find(|popup| popup.id == id)
                .ok_or(RepoError::NotFound)?;
            slot.is_active = is_active;
            Ok(slot.clone())
        }

        async fn delete_popup(&self, id: Uuid) -> Result<(), RepoError> {
            self.popups.lock().unwrap().retain(|popup| popup.id != id);
            Ok(())
        }
    }

    fn service() -> AdminPopupService {
        let repo = Arc::new(MemoryPopups::default());
        AdminPopupService::new(repo.clone(), repo)
    }

    fn actor() -> AdminPrincipal {
        AdminPrincipal {
            id: Uuid::new_v4(),
            email: "admin@example.com".into(),
            name: "Admin".into(),
            role: AdminRole::SuperAdmin,
        }
    }

    fn input(title: &str) -> PopupInput {
        PopupInput {
            title: title.into(),
            start_date: "2025-05-01".into(),
            end_date: "2025-05-07".into(),
            is_active: true,
            ..PopupInput::default()
        }
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let fields = input("Sale").into_fields().unwrap();
        assert_eq!(fields.start_date, date!(2025 - 05 - 01));
        assert_eq!(fields.position, None);
        assert_eq!(fields.size_percentage, None);
        assert_eq!(fields.link_url, None);
        assert_eq!(fields.content, None);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let mut raw = input("Sale");
        raw.start_date = "2025-05-08".into();
        assert!(matches!(
            raw.into_fields(),
            Err(AdminPopupError::Domain(DomainError::Validation { .. }))
        ));
    }

    #[test]
    fn field_errors_name_the_field() {
        let cases: [(&str, fn(&mut PopupInput)); 7] = [
            ("title", |raw| raw.title = "   ".into()),
            ("start_date", |raw| raw.start_date = "05/01/2025".into()),
            ("position", |raw| raw.position = "12.5".into()),
            ("position", |raw| raw.position = "-3".into()),
            ("size_percentage", |raw| raw.size_percentage = "5".into()),
            ("display_order", |raw| raw.display_order = "0".into()),
            ("link_url", |raw| raw.link_url = "javascript:alert(1)".into()),
        ];
        for (expected, mutate) in cases {
            let mut raw = input("Sale");
            mutate(&mut raw);
            match raw.into_fields() {
                Err(AdminPopupError::InvalidField { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected invalid {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn numeric_and_url_fields_parse() {
        let mut raw = input("Sale");
        raw.position = " 240 ".into();
        raw.size_percentage = "80".into();
        raw.display_order = "2".into();
        raw.link_url = "https://example.com/sale".into();
        let fields = raw.into_fields().unwrap();
        assert_eq!(fields.position, Some(240));
        assert_eq!(fields.size_percentage, Some(80));
        assert_eq!(fields.display_order, Some(2));
        assert_eq!(fields.link_url.as_deref(), Some("https://example.com/sale"));
    }

    #[test]
    fn minus_one_position_means_centred() {
        let mut raw = input("Sale");
        raw.position = "-1".into();
        assert_eq!(raw.into_fields().unwrap().position, Some(CENTERED_POSITION));

        let mut raw = input("Sale");
        raw.position = "-2".into();
        assert!(matches!(
            raw.into_fields(),
            Err(AdminPopupError::InvalidField { field: "position", .. })
        ));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let service = service();
        let actor = actor();
        service.create(&actor, input("first")).await.unwrap();
        service.create(&actor, input("second")).await.unwrap();

        let titles: Vec<_> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|popup| popup.title)
            .collect();
        assert_eq!(titles, ["second", "first"]);
    }

    #[tokio::test]
    async fn toggle_flips_active_flag() {
        let service = service();
        let actor = actor();
        let popup = service.create(&actor, input("Sale")).await.unwrap();

        let toggled = service.toggle_active(&actor, popup.id).await.unwrap();
        assert!(!toggled.is_active);
        let toggled = service.toggle_active(&actor, popup.id).await.unwrap();
        assert!(toggled.is_active);
    }

    #[tokio::test]
    async fn missing_popup_is_not_found() {
        let service = service();
        let actor = actor();
        assert!(matches!(
            service.toggle_active(&actor, Uuid::new_v4()).await,
            Err(AdminPopupError::NotFound)
        ));
        assert!(matches!(
            service.update(&actor, Uuid::new_v4(), input("Sale")).await,
            Err(AdminPopupError::NotFound)
        ));
        assert!(service.load(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_popup() {
        let service = service();
        let actor = actor();
        let popup = service.create(&actor, input("Sale")).await.unwrap();
        service.delete(&actor, popup.id).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
    }
}
