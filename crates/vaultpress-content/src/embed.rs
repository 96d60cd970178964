//! Media embeds.
//!
//! Handles `![[target]]` / `![[target|modifier]]` and standard
//! `![alt](path)` images. Each reference is resolved by basename through
//! the [`NameIndex`]; resolved images are published under their safe name
//! and rewritten to point into the asset namespace. Anything else degrades
//! to an `(Attachment: name)` placeholder.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::warn;

use vaultpress_core::{Result, SyncConfig};
use vaultpress_vault::name_index::{basename, decode};
use vaultpress_vault::{safe_name, NameIndex};

use crate::map_prose;
use crate::sink::AssetSink;

static WIKI_EMBED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^\[\]]+?)\]\]").expect("Invalid embed regex"));

static MARKDOWN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\[\]]*)\]\(([^()]*)\)").expect("Invalid markdown image regex")
});

/// Outcome of resolving one media reference.
enum Media {
    Image(String),
    Placeholder,
}

/// Rewrite every embed and local markdown image outside fenced code.
///
/// # Errors
///
/// Propagates asset publishing failures.
pub fn resolve_embeds(
    content: &str,
    names: &NameIndex,
    config: &SyncConfig,
    sink: &mut dyn AssetSink,
    unresolved: &mut usize,
) -> Result<String> {
    map_prose(content, |prose| -> Result<String> {
        let prose = replace_all(&WIKI_EMBED, prose, |caps| {
            let target = caps[1].split('|').next().unwrap_or_default().trim();
            Ok(match publish(target, names, config, sink, unresolved)? {
                Media::Image(url) => format!("![{target}]({url})"),
                Media::Placeholder => placeholder(target),
            })
        })?;

        replace_all(&MARKDOWN_IMAGE, &prose, |caps| {
            let alt = &caps[1];
            let link = link_destination(&caps[2]);
            if is_external(link) || is_published(link, config) {
                return Ok(caps[0].to_string());
            }
            Ok(match publish(link, names, config, sink, unresolved)? {
                Media::Image(url) => format!("![{alt}]({url})"),
                Media::Placeholder => placeholder(basename(&decode(link))),
            })
        })
    })
}

fn publish(
    reference: &str,
    names: &NameIndex,
    config: &SyncConfig,
    sink: &mut dyn AssetSink,
    unresolved: &mut usize,
) -> Result<Media> {
    let Some(source) = names.resolve(reference) else {
        *unresolved += 1;
        warn!("unresolved attachment: {reference}");
        return Ok(Media::Placeholder);
    };

    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !config.is_image(&file_name) {
        return Ok(Media::Placeholder);
    }

    let asset_name = safe_name(&file_name, &config.landing_document);
    sink.publish(&source, &asset_name)?;
    Ok(Media::Image(format!(
        "{}/{}",
        config.asset_url_prefix.trim_end_matches('/'),
        asset_name
    )))
}

fn placeholder(name: &str) -> String {
    format!("(Attachment: {name})")
}

/// Strip an optional `"title"` and `<...>` wrapping from a link destination.
fn link_destination(raw: &str) -> &str {
    let raw = raw.trim();
    let raw = match raw.find(" \"") {
        Some(pos) if raw.ends_with('"') => raw[..pos].trim_end(),
        _ => raw,
    };
    raw.strip_prefix('<')
        .and_then(|r| r.strip_suffix('>'))
        .unwrap_or(raw)
}

fn is_external(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://") || link.starts_with("data:")
}

fn is_published(link: &str, config: &SyncConfig) -> bool {
    let prefix = config.asset_url_prefix.trim_end_matches('/');
    link.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// `Regex::replace_all` with a fallible replacer.
pub(crate) fn replace_all(
    re: &Regex,
    text: &str,
    mut replace: impl FnMut(&Captures<'_>) -> Result<String>,
) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        out.push_str(&replace(&caps)?);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}
