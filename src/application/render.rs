//! Article body processing for the public article page.

use crate::domain::posts::first_youtube_video_id;

pub const CONTENT_UNAVAILABLE: &str = "Content unavailable.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleContent {
    /// Sanitized HTML, safe to emit unescaped.
    Html(String),
    /// Nothing renderable remained after sanitization.
    Unavailable,
}

impl ArticleContent {
    pub fn is_available(&self) -> bool {
        matches!(self, ArticleContent::Html(_))
    }

    pub fn html(&self) -> &str {
        match self {
            ArticleContent::Html(html) => html,
            ArticleContent::Unavailable => "",
        }
    }
}

/// Sanitize stored article HTML and prepend an embed for the first linked YouTube video.
pub fn render_article_content(raw: &str) -> ArticleContent {
    if raw.trim().is_empty() {
        return ArticleContent::Unavailable;
    }

    let sanitized = ammonia::clean(raw);
    if sanitized.trim().is_empty() {
        return ArticleContent::Unavailable;
    }

    match first_youtube_video_id(&sanitized) {
        Some(video_id) => ArticleContent::Html(format!("{}{sanitized}", youtube_embed(&video_id))),
        None => ArticleContent::Html(sanitized),
    }
}

fn youtube_embed(video_id: &str) -> String {
    format!(
        "<div class=\"video-embed\"><iframe src=\"https://www.youtube.com/embed/{video_id}\" \
         title=\"YouTube video\" loading=\"lazy\" allowfullscreen></iframe></div>"
    )
}
