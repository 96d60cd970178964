//! YAML frontmatter and top-level heading detection.
//!
//! Handles the `---` delimited YAML block at the very start of a note:
//! ```markdown
//! ---
//! title: "Alpha Project"
//! tags: [rust]
//! ---
//!
//! Body content here
//! ```

/// Split a note into its raw frontmatter YAML and the byte offset where the
/// body starts.
///
/// Returns `None` when the note does not open with a `---` line or the block
/// is never closed.
#[must_use]
pub fn split_frontmatter(content: &str) -> Option<(&str, usize)> {
    let first_line_end = content.find('\n')?;
    if content[..first_line_end].trim_end_matches('\r') != "---" {
        return None;
    }
    let yaml_start = first_line_end + 1;
    let mut pos = yaml_start;

    for line in content[yaml_start..].split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed == "---" || trimmed == "..." {
            return Some((&content[yaml_start..pos], pos + line.len()));
        }
        pos += line.len();
    }
    None
}

/// `true` if the frontmatter carries a non-empty `title` field.
///
/// Malformed YAML falls back to scanning for a `title:` line so a typo
/// elsewhere in the block does not trigger a duplicate heading.
#[must_use]
pub fn has_frontmatter_title(content: &str) -> bool {
    let Some((yaml, _)) = split_frontmatter(content) else {
        return false;
    };
    match serde_yaml::from_str::<serde_yaml::Value>(yaml) {
        Ok(serde_yaml::Value::Mapping(map)) => map
            .get("title")
            .is_some_and(|v| match v {
                serde_yaml::Value::Null => false,
                serde_yaml::Value::String(s) => !s.trim().is_empty(),
                _ => true,
            }),
        Ok(_) => false,
        Err(_) => yaml.lines().any(|l| {
            l.strip_prefix("title:")
                .is_some_and(|rest| !rest.trim().trim_matches(['"', '\'']).is_empty())
        }),
    }
}

/// Fence marker opening or closing a fenced code block on `line`.
///
/// Fences are ```` ``` ```` or `~~~` indented at most three spaces; a block
/// only closes on the marker that opened it.
#[must_use]
pub fn fence_marker(line: &str) -> Option<&'static str> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// `true` if any line outside fenced code blocks is a level-one ATX heading.
#[must_use]
pub fn has_top_level_heading(content: &str) -> bool {
    let mut fence: Option<&str> = None;
    for line in content.lines() {
        let marker = fence_marker(line);
        match fence {
            Some(open) => {
                if marker == Some(open) {
                    fence = None;
                }
                continue;
            }
            None if marker.is_some() => {
                fence = marker;
                continue;
            }
            None => {}
        }
        if let Some(rest) = line.strip_prefix('#') {
            if rest.starts_with([' ', '\t']) && !rest.trim().is_empty() {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_frontmatter_extracts_yaml_and_body_offset() {
        let content = "---\ntitle: Hello\ntags: [a]\n---\n\n## Body\n";
        let (yaml, offset) = split_frontmatter(content).unwrap();
        assert!(yaml.contains("title: Hello"));
        assert_eq!(&content[offset..], "\n## Body\n");
    }

    #[test]
    fn split_frontmatter_rejects_missing_opener_or_closer() {
        assert!(split_frontmatter("title: x\n---\n").is_none());
        assert!(split_frontmatter("---\ntitle: x\n").is_none());
        assert!(split_frontmatter("").is_none());
    }

    #[test]
    fn frontmatter_title_detected() {
        assert!(has_frontmatter_title("---\ntitle: Alpha\n---\nbody"));
        assert!(!has_frontmatter_title("---\ntags: [a]\n---\nbody"));
        assert!(!has_frontmatter_title("---\ntitle:\n---\nbody"));
        assert!(!has_frontmatter_title("---\ntitle: \"\"\n---\nbody"));
        assert!(!has_frontmatter_title("---\ntitle: '  '\n---\nbody"));
        assert!(has_frontmatter_title("---\ntitle: 2024\n---\nbody"));
        assert!(!has_frontmatter_title("title: Alpha\n"));
    }

    #[test]
    fn malformed_yaml_falls_back_to_line_scan() {
        assert!(has_frontmatter_title("---\ntitle: Alpha\nbad: [unclosed\n---\n"));
        assert!(!has_frontmatter_title("---\ntitle: \"\"\nbad: [unclosed\n---\n"));
    }

    #[test]
    fn heading_detection_ignores_h2_and_code_fences() {
        assert!(has_top_level_heading("intro\n# Title\n"));
        assert!(!has_top_level_heading("## Sub\n#hashtag\n"));
        assert!(!has_top_level_heading("```sh\n# not a heading\n```\n"));
        assert!(!has_top_level_heading("#   \n"));
    }

    #[test]
    fn heading_detection_follows_fence_rules() {
        // A `~~~` line does not close a backtick fence.
        assert!(!has_top_level_heading("```\n~~~\n# inside\n```\n"));
        // Indented four spaces is not a fence, so the heading is live.
        assert!(has_top_level_heading("    ```\n# Title\n"));
        assert!(has_top_level_heading("~~~\ncode\n~~~\n# After\n"));
    }

    #[test]
    fn fence_marker_limits_indent() {
        assert_eq!(fence_marker("```rust"), Some("```"));
        assert_eq!(fence_marker("   ~~~"), Some("~~~"));
        assert_eq!(fence_marker("    ```"), None);
        assert_eq!(fence_marker("text ```"), None);
    }
}
