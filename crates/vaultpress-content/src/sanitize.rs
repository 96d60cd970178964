//! Escape markup the site generator would otherwise interpret.
//!
//! The generator compiles markdown into component templates, so a stray
//! `<script>`, an unknown `<Component>`, or a `{{ expr }}` in a note would
//! be executed or fail the build. Inert formatting tags pass through.

use std::convert::Infallible;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::map_prose;

/// Formatting-only tags left as live HTML.
pub const SAFE_TAGS: &[&str] = &[
    "a", "abbr", "address", "b", "bdi", "bdo", "blockquote", "br", "caption", "cite", "code",
    "col", "colgroup", "data", "dd", "del", "details", "dfn", "div", "dl", "dt", "em",
    "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header",
    "hgroup", "hr", "i", "img", "ins", "kbd", "li", "mark", "ol", "p", "pre", "q", "rp", "rt",
    "ruby", "s", "samp", "small", "span", "strong", "sub", "summary", "sup", "table", "tbody",
    "td", "tfoot", "th", "thead", "time", "tr", "u", "ul", "var", "wbr",
];

// Anything shaped like an opening or closing tag, up to the next `>`.
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9_.:-]*)([^>]*)>").expect("Invalid tag regex")
});

// URI (`<scheme:...>`) and email (`<user@host>`) autolinks.
static AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[A-Za-z][A-Za-z0-9+.-]{1,31}:[^\s<>]*|[A-Za-z0-9.!#$%&'*+=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*)$",
    )
    .expect("Invalid autolink regex")
});

/// Escape disallowed tags and template delimiters outside fenced code.
#[must_use]
pub fn sanitize(content: &str) -> String {
    let Ok(out) = map_prose(content, |prose| Ok::<_, Infallible>(sanitize_prose(prose)));
    out
}

fn sanitize_prose(prose: &str) -> String {
    // An escaped tag can still hold a `<` that opens another tag, so repeat
    // until nothing changes. Every changing pass removes a `<`.
    let mut escaped = prose.to_string();
    loop {
        let next = escape_tags(&escaped);
        if next == escaped {
            break;
        }
        escaped = next;
    }
    escaped
        .replace("{{", "&#123;&#123;")
        .replace("}}", "&#125;&#125;")
}

fn escape_tags(text: &str) -> String {
    TAG.replace_all(text, |caps: &Captures<'_>| {
        let whole = &caps[0];
        let name = &caps[2];
        if is_safe_tag(name) || is_autolink(whole) {
            caps[0].to_string()
        } else {
            let attrs = caps.get(3).map_or("", |m| m.as_str());
            format!("&lt;{}{}{}&gt;", &caps[1], name, attrs)
        }
    })
    .into_owned()
}

fn is_autolink(tag: &str) -> bool {
    AUTOLINK.is_match(&tag[1..tag.len() - 1])
}

fn is_safe_tag(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    SAFE_TAGS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn escapes_unknown_tags_and_keeps_attributes() {
        assert_eq!(
            sanitize(r#"<script src="x.js">alert(1)</script>"#),
            r#"&lt;script src="x.js"&gt;alert(1)&lt;/script&gt;"#
        );
        assert_eq!(sanitize("Vec<T> here"), "Vec&lt;T&gt; here");
        assert_eq!(sanitize("<MyWidget/>"), "&lt;MyWidget/&gt;");
        assert_eq!(sanitize("<svg/onload=alert(1)>"), "&lt;svg/onload=alert(1)&gt;");
        assert_eq!(
            sanitize("<script/src=x.js></script>"),
            "&lt;script/src=x.js&gt;&lt;/script&gt;"
        );
        assert_eq!(
            sanitize(r#"<iframe title="a<b" src=x>"#),
            r#"&lt;iframe title="a<b" src=x&gt;"#
        );
        assert_eq!(sanitize("<Foo.Bar>"), "&lt;Foo.Bar&gt;");
        assert_eq!(sanitize("<Foo_Bar.Baz/>"), "&lt;Foo_Bar.Baz/&gt;");
    }

    #[test]
    fn keeps_safe_tags_in_any_case() {
        let text = "<div class=\"x\"><B>bold</B><br/><br /></div>";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn leaves_autolinks_and_comparisons() {
        let text = "see <https://example.com> and 1 < 2 > 0";
        assert_eq!(sanitize(text), text);
        let text = "mail <someone@example.com> or <mailto:a@b.org?subject=hi>";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn encodes_double_braces() {
        assert_eq!(
            sanitize("{{ user.name }}"),
            "&#123;&#123; user.name &#125;&#125;"
        );
        assert_eq!(sanitize("{single}"), "{single}");
    }

    #[test]
    fn fenced_code_is_untouched() {
        let text = "<x>\n```html\n<script>{{a}}</script>\n```\n";
        assert_eq!(
            sanitize(text),
            "&lt;x&gt;\n```html\n<script>{{a}}</script>\n```\n"
        );
    }

    #[test]
    fn escapes_tags_exposed_by_inner_escapes() {
        assert_eq!(sanitize("<z <x>y>"), "&lt;z &lt;x&gt;y&gt;");
    }

    #[test]
    fn does_not_double_encode() {
        let once = sanitize("<iframe> {{x}} &lt;b&gt;");
        assert_eq!(sanitize(&once), once);
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(text in "[a-zA-Z <>/{}=\"\n]{0,60}") {
            let once = sanitize(&text);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn safe_tags_only_content_is_unchanged(
            tags in proptest::collection::vec(proptest::sample::select(SAFE_TAGS), 0..6),
            word in "[a-z ]{0,10}",
        ) {
            let text: String = tags
                .iter()
                .map(|t| format!("<{t}>{word}</{t}>"))
                .collect();
            prop_assert_eq!(sanitize(&text), text);
        }
    }
}
