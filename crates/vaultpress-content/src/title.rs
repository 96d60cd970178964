//! Heading injection for untitled notes.

use vaultpress_core::config::strip_markdown_ext;
use vaultpress_core::frontmatter::{
    has_frontmatter_title, has_top_level_heading, split_frontmatter,
};

/// Prepend `# <name>` to a note that has neither a level-one heading nor a
/// frontmatter `title`. The heading goes after any frontmatter block.
///
/// Applying this twice is the same as applying it once.
#[must_use]
pub fn inject_title(content: &str, original_name: &str) -> String {
    let frontmatter = split_frontmatter(content);
    let body = frontmatter.map_or(content, |(_, start)| &content[start..]);
    if has_top_level_heading(body) || has_frontmatter_title(content) {
        return content.to_string();
    }
    let heading = format!("# {}\n\n", strip_markdown_ext(original_name));

    match frontmatter {
        Some((_, body_start)) => {
            let (front, body) = content.split_at(body_start);
            let mut out = String::with_capacity(content.len() + heading.len() + 2);
            out.push_str(front);
            if !front.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&heading);
            out.push_str(body.trim_start_matches(['\r', '\n']));
            out
        }
        None => format!("{heading}{content}"),
    }
}
