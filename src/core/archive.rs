//! Plain-text views of the blog archive for the `blogs` subcommand.

use crate::api::Blog;

/// Reading speed used for the "min read" estimate.
const WORDS_PER_MINUTE: usize = 200;

/// Characters of post content shown per entry in the listing.
const PREVIEW_CHARS: usize = 160;
const WRAP_WIDTH: usize = 76;
const INDENT: &str = "       ";

/// Minutes needed to read `content`, never less than one.
pub fn read_time_minutes(content: &str) -> usize {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

pub fn find(blogs: &[Blog], id: i64) -> Option<&Blog> {
    blogs.iter().find(|b| b.id == id)
}

/// One entry per post: id, date, topic and a short wrapped preview.
pub fn render_listing(blogs: &[Blog]) -> String {
    if blogs.is_empty() {
        return String::from("No blogs generated yet.\n");
    }

    let mut out = String::new();
    for blog in blogs {
        out.push_str(&format!(
            "#{:<5} {}  {}\n",
            blog.id,
            blog.timestamp.format("%Y-%m-%d %H:%M"),
            title(blog)
        ));
        for line in textwrap::wrap(&preview(&blog.content), WRAP_WIDTH) {
            out.push_str(INDENT);
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// The whole post as markdown, under a header with date and read time.
pub fn render_post(blog: &Blog) -> String {
    let heading = title(blog);
    let byline = format!(
        "{} · {} min read",
        blog.timestamp.format("%B %-d, %Y"),
        read_time_minutes(&blog.content)
    );
    let rule = "─".repeat(heading.chars().count().max(byline.chars().count()));
    format!("{heading}\n{byline}\n{rule}\n\n{}\n", blog.content.trim_end())
}

/// The topic may carry the composed settings block; only its first line
/// names the post.
fn title(blog: &Blog) -> &str {
    let first = blog.topic.lines().next().unwrap_or_default();
    first.strip_prefix("Topic: ").unwrap_or(first)
}

fn preview(content: &str) -> String {
    let head: String = content.chars().take(PREVIEW_CHARS).collect();
    let head = head.split_whitespace().collect::<Vec<_>>().join(" ");
    if content.chars().count() > PREVIEW_CHARS {
        format!("{head}…")
    } else {
        head
    }
}
