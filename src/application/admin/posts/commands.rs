use tracing::info;
use uuid::Uuid;

use crate::application::auth::AdminPrincipal;
use crate::application::repos::{CreatePostParams, UpdatePostParams};
use crate::domain::entities::PostRecord;

use super::service::AdminPostService;
use super::types::{AdminPostError, CreatePostCommand, UpdatePostCommand, normalize_fields};

impl AdminPostService {
    pub async fn create_post(
        &self,
        actor: &AdminPrincipal,
        command: CreatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        let fields = normalize_fields(
            command.title,
            command.content,
            command.category,
            command.subcategory,
            command.description,
            command.image_url,
        )?;

        let post = self
            .writer
            .create_post(CreatePostParams {
                title: fields.title,
                content: fields.content,
                category: fields.category,
                subcategory: fields.subcategory,
                description: fields.description,
                image_url: fields.image_url,
                author_id: Some(actor.id),
                is_slide: fields.is_slide,
            })
            .await?;

        log_write("post.create", actor, &post);
        Ok(post)
    }

    pub async fn update_post(
        &self,
        actor: &AdminPrincipal,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        let fields = normalize_fields(
            command.title,
            command.content,
            command.category,
            command.subcategory,
            command.description,
            command.image_url,
        )?;

        let post = self
            .writer
            .update_post(UpdatePostParams {
                id: command.id,
                title: fields.title,
                content: fields.content,
                category: fields.category,
                subcategory: fields.subcategory,
                description: fields.description,
                image_url: fields.image_url,
                is_slide: fields.is_slide,
            })
            .await?;

        log_write("post.update", actor, &post);
        Ok(post)
    }

    pub async fn delete_post(&self, actor: &AdminPrincipal, id: Uuid) -> Result<(), AdminPostError> {
        self.writer.delete_post(id).await?;
        info!(
            target = "pressroom::application::admin::posts",
            action = "post.delete",
            actor = %actor.email,
            post_id = %id,
            "article deleted"
        );
        Ok(())
    }
}

fn log_write(action: &'static str, actor: &AdminPrincipal, post: &PostRecord) {
    info!(
        target = "pressroom::application::admin::posts",
        action,
        actor = %actor.email,
        post_id = %post.id,
        title = %post.title,
        category = %post.category,
        subcategory = post.subcategory.as_deref(),
        "article saved"
    );
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use time::OffsetDateTime;

    use super::*;
    use crate::application::repos::{PostQueryFilter, PostsRepo, PostsWriteRepo, RepoError};
    use crate::domain::types::AdminRole;

    #[derive(Default)]
    struct MemoryPosts {
        posts: Mutex<Vec<PostRecord>>,
    }

    #[async_trait]
    impl PostsRepo for MemoryPosts {
        async fn list_recent(
            &self,
            filter: &PostQueryFilter,
            limit: u32,
        ) -> Result<Vec<PostRecord>, RepoError> {
            let mut posts: Vec<PostRecord> = self
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
            let posts = self.posts.lock().unwrap();
            Ok(posts.iter().find(|post| post.id == id).cloned())
        }
    }

    #[async_trait]
    impl PostsWriteRepo for MemoryPosts {
        async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
            let now = OffsetDateTime::now_utc();
            let record = PostRecord {
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
            self.posts.lock().unwrap().push(record.clone());
            Ok(record)
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

        async fn increment_view_count(&self, _id: Uuid) -> Result<i64, RepoError> {
            unreachable!("not used in these tests")
        }
    }

    fn service() -> (AdminPostService, Arc<MemoryPosts>) {
        let repo = Arc::new(MemoryPosts::default());
        (AdminPostService::new(repo.clone(), repo.clone()), repo)
    }

    fn actor() -> AdminPrincipal {
        AdminPrincipal {
            id: Uuid::new_v4(),
            email: "editor@example.com".into(),
            name: "Editor".into(),
            role: AdminRole::SubAdmin,
        }
    }

    fn command(title: &str, category: &str, content: &str) -> CreatePostCommand {
        CreatePostCommand {
            title: title.into(),
            content: content.into(),
            category: category.into(),
            subcategory: Some("  Market Watch ".into()),
            description: Some("   ".into()),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn create_normalizes_fields_and_records_author() {
        let (service, _) = service();
        let actor = actor();

        let post = service
            .create_post(&actor, command(" Quarterly outlook ", "Report", "<p>Body</p>"))
            .await
            .unwrap();

        assert_eq!(post.title, "Quarterly outlook");
        assert_eq!(post.category, "report");
        assert_eq!(post.subcategory.as_deref(), Some("market-watch"));
        assert_eq!(post.description, None);
        assert_eq!(post.author_id, Some(actor.id));
        assert!(post.is_slide);
    }

    #[tokio::test]
    async fn required_fields_are_enforced() {
        let (service, repo) = service();
        let actor = actor();

        for (cmd, field) in [
            (command("  ", "news", "<p>x</p>"), "title"),
            (command("Title", "", "<p>x</p>"), "category"),
            (command("Title", "news", "   "), "content"),
            (command("Title", "!!!", "<p>x</p>"), "category"),
        ] {
            match service.create_post(&actor, cmd).await {
                Err(AdminPostError::ConstraintViolation(actual)) => assert_eq!(actual, field),
                other => panic!("expected constraint violation on {field}, got {other:?}"),
            }
        }
        assert!(repo.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_article_is_not_found() {
        let (service, _) = service();
        let result = service
            .update_post(
                &actor(),
                UpdatePostCommand {
                    id: Uuid::new_v4(),
                    title: "Title".into(),
                    content: "<p>x</p>".into(),
                    category: "news".into(),
                    subcategory: None,
                    description: None,
                    image_url: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AdminPostError::NotFound)));
    }

    #[tokio::test]
    async fn update_recomputes_slide_flag() {
        let (service, _) = service();
        let actor = actor();
        let post = service
            .create_post(&actor, command("Title", "report", "<p>x</p>"))
            .await
            .unwrap();

        let updated = service
            .update_post(
                &actor,
                UpdatePostCommand {
                    id: post.id,
                    title: "Title".into(),
                    content: "<p>y</p>".into(),
                    category: "Policy".into(),
                    subcategory: None,
                    description: Some("Summary".into()),
                    image_url: None,
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_slide);
        assert_eq!(updated.category, "policy");
        assert_eq!(updated.description.as_deref(), Some("Summary"));
    }

    #[tokio::test]
    async fn delete_and_list() {
        let (service, _) = service();
        let actor = actor();
        let post = service
            .create_post(&actor, command("Title", "news", "<p>x</p>"))
            .await
            .unwrap();
        assert_eq!(service.list(50).await.unwrap().len(), 1);

        service.delete_post(&actor, post.id).await.unwrap();
        assert!(service.load_post(post.id).await.unwrap().is_none());
        assert!(matches!(
            service.delete_post(&actor, post.id).await,
            Err(AdminPostError::NotFound)
        ));
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn article_writes_log_fields_individually() {
        let captured = CapturedLog::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let now = OffsetDateTime::now_utc();
        let post = PostRecord {
            id: Uuid::new_v4(),
            title: "Rates \"on hold\"".into(),
            content: "<p>x</p>".into(),
            category: "economy".into(),
            subcategory: Some("markets".into()),
            description: None,
            image_url: None,
            author_id: None,
            view_count: 0,
            is_slide: false,
            created_at: now,
            updated_at: now,
        };
        tracing::subscriber::with_default(subscriber, || {
            log_write("post.create", &actor(), &post);
        });

        let line = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(line.contains(&format!("post_id={}", post.id)));
        assert!(line.contains("category=economy"));
        assert!(line.contains("subcategory=\"markets\""));
        assert!(line.contains("Rates \"on hold\""));
        assert!(!line.contains("snapshot"));
    }
}
