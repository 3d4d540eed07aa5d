//! Article helpers shared by the public site and the admin console.

use time::{format_description::FormatItem, macros::format_description};
use url::Url;

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");
pub const ISO_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month padding:zero]-[day padding:zero]");

/// Category whose articles feed the home page slider.
pub const SLIDE_CATEGORY: &str = "report";

const YOUTUBE_ID_LEN: usize = 11;

/// Normalise a free-form category label into the stored slug form.
pub fn category_slug(label: &str) -> String {
    slug::slugify(label.trim())
}

pub fn is_slide_category(category: &str) -> bool {
    category.eq_ignore_ascii_case(SLIDE_CATEGORY)
}

/// Iterate over the double-quoted values of `attr="..."` occurrences in an HTML fragment.
pub fn attribute_values<'a>(html: &'a str, attr: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    let needle = format!("{attr}=\"");
    let mut rest = html;
    std::iter::from_fn(move || {
        let start = rest.find(needle.as_str())? + needle.len();
        let tail = &rest[start..];
        let end = tail.find('"')?;
        let value = &tail[..end];
        rest = &tail[end + 1..];
        Some(value)
    })
}

/// First `<img src="...">` in the content, used as a fallback thumbnail.
pub fn first_image_url(html: &str) -> Option<&str> {
    attribute_values(html, "src").find(|value| !value.trim().is_empty())
}

/// Video id of the first anchor in `html` pointing at a YouTube video.
pub fn first_youtube_video_id(html: &str) -> Option<String> {
    attribute_values(html, "href").find_map(youtube_video_id)
}

/// Extract the 11-character video id from a `youtube.com/watch?v=` or `youtu.be/` link.
pub fn youtube_video_id(link: &str) -> Option<String> {
    let url = Url::parse(link.trim()).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let candidate = match host {
        "youtube.com" => {
            if url.path() == "/watch" {
                url.query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned())
            } else {
                let mut segments = url.path_segments()?;
                match segments.next() {
                    Some("embed") | Some("v") | Some("shorts") => {
                        segments.next().map(str::to_string)
                    }
                    _ => None,
                }
            }
        }
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        _ => None,
    }?;

    is_video_id(&candidate).then_some(candidate)
}

fn is_video_id(value: &str) -> bool {
    value.len() == YOUTUBE_ID_LEN
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}
