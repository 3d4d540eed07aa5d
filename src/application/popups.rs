use std::sync::Arc;

use chrono_tz::Tz;
use tracing::error;

use crate::application::repos::PopupsRepo;
use crate::domain::entities::PopupRecord;
use crate::util::timezone;

/// Popups shown as overlays on the public home page.
#[derive(Clone)]
pub struct PopupService {
    popups: Arc<dyn PopupsRepo>,
    max_displayed: u32,
    tz: Tz,
}

impl PopupService {
    pub fn new(popups: Arc<dyn PopupsRepo>, max_displayed: u32, tz: Tz) -> Self {
        Self {
            popups,
            max_displayed,
            tz,
        }
    }

    /// Displayable popups for today in the display timezone.
    pub async fn active_popups(&self) -> Vec<PopupRecord> {
        self.active_on(timezone::today(self.tz)).await
    }

    /// The newest displayable popups, capped, then arranged by display order.
    pub async fn active_on(&self, day: time::Date) -> Vec<PopupRecord> {
        if self.max_displayed == 0 {
            return Vec::new();
        }

        match self.popups.list_displayable(day, self.max_displayed).await {
            Ok(mut popups) => {
                popups.retain(|popup| popup.is_displayable_on(day));
                popups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                popups.truncate(self.max_displayed as usize);
                // stable, so unranked popups stay newest first
                popups.sort_by_key(PopupRecord::display_rank);
                popups
            }
            Err(err) => {
                error!(
                    target = "pressroom::application::popups",
                    error = %err,
                    "failed to fetch active popups"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use time::{Date, Duration, OffsetDateTime, macros::date};
    use uuid::Uuid;

    use crate::application::repos::RepoError;

    struct StubPopups {
        popups: Vec<PopupRecord>,
        fail: bool,
    }

    #[async_trait]
    impl PopupsRepo for StubPopups {
        async fn list_all(&self) -> Result<Vec<PopupRecord>, RepoError> {
            Ok(self.popups.clone())
        }

        // Deliberately unfiltered so the service-side checks are exercised.
        async fn list_displayable(
            &self,
            _day: Date,
            _limit: u32,
        ) -> Result<Vec<PopupRecord>, RepoError> {
            if self.fail {
                return Err(RepoError::Timeout);
            }
            Ok(self.popups.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<PopupRecord>, RepoError> {
            Ok(self.popups.iter().find(|popup| popup.id == id).cloned())
        }
    }

    fn popup(title: &str, active: bool, start: Date, end: Date, age_minutes: i64) -> PopupRecord {
        let created = OffsetDateTime::now_utc() - Duration::minutes(age_minutes);
        PopupRecord {
            id: Uuid::new_v4(),
            title: title.into(),
            content: None,
            image_url: None,
            link_url: None,
            start_date: start,
            end_date: end,
            is_active: active,
            position: None,
            size_percentage: None,
            display_order: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn only_displayable_popups_newest_first_and_capped() {
        let start = date!(2025 - 05 - 01);
        let end = date!(2025 - 05 - 31);
        let popups = vec![
            popup("a", true, start, end, 40),
            popup("inactive", false, start, end, 1),
            popup("b", true, start, end, 5),
            popup("expired", true, start, date!(2025 - 05 - 02), 2),
            popup("c", true, start, end, 20),
            popup("d", true, start, end, 60),
        ];
        let service = PopupService::new(
            Arc::new(StubPopups {
                popups,
                fail: false,
            }),
            3,
            chrono_tz::Asia::Seoul,
        );

        let titles: Vec<_> = service
            .active_on(date!(2025 - 05 - 10))
            .await
            .into_iter()
            .map(|popup| popup.title)
            .collect();
        assert_eq!(titles, ["b", "c", "a"]);
    }

    #[tokio::test]
    async fn display_order_arranges_the_capped_set() {
        let start = date!(2025 - 05 - 01);
        let end = date!(2025 - 05 - 31);
        let ranked = |title: &str, order: Option<i32>, age_minutes: i64| {
            let mut record = popup(title, true, start, end, age_minutes);
            record.display_order = order;
            record
        };
        let popups = vec![
            ranked("unranked-new", None, 1),
            ranked("second", Some(2), 2),
            ranked("unranked-old", None, 3),
            ranked("first", Some(1), 4),
            // ranked first but too old to make the cap
            ranked("stale", Some(1), 50),
        ];
        let service = PopupService::new(
            Arc::new(StubPopups {
                popups,
                fail: false,
            }),
            4,
            chrono_tz::UTC,
        );

        let titles: Vec<_> = service
            .active_on(date!(2025 - 05 - 10))
            .await
            .into_iter()
            .map(|popup| popup.title)
            .collect();
        assert_eq!(titles, ["first", "second", "unranked-new", "unranked-old"]);
    }

    #[tokio::test]
    async fn fetch_failure_shows_no_popups() {
        let service = PopupService::new(
            Arc::new(StubPopups {
                popups: Vec::new(),
                fail: true,
            }),
            3,
            chrono_tz::UTC,
        );
        assert!(service.active_popups().await.is_empty());
    }
}
