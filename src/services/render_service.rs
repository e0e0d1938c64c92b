use std::collections::HashSet;

use ammonia::Builder;
use log::debug;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

/// Route prefix used by the hash-routed frontend
pub const DEFAULT_LINK_PREFIX: &str = "#/wiki";

/// Service that turns untrusted markdown into HTML safe for embedding
pub struct RenderService {
    link_prefix: String,
    sanitizer: Builder<'static>,
}

impl RenderService {
    /// Create a render service rooting site links at `link_prefix`
    pub fn new(link_prefix: impl Into<String>) -> Self {
        let mut sanitizer = Builder::default();
        sanitizer
            .strip_comments(true)
            .link_rel(Some("nofollow noopener noreferrer"))
            .url_schemes(HashSet::from(["http", "https", "mailto"]))
            .clean_content_tags(HashSet::from(["script", "style", "iframe", "object", "embed"]));
        Self {
            link_prefix: link_prefix.into(),
            sanitizer,
        }
    }

    /// Render markdown and sanitize the result. Never fails; malformed
    /// markup degrades to best-effort HTML.
    pub fn render(&self, markup: &str) -> String {
        let html = self.markdown_to_html(markup);
        let clean = self.sanitizer.clean(&html).to_string();
        debug!("Rendered {} bytes of markup into {} bytes of HTML", markup.len(), clean.len());
        clean
    }

    fn markdown_to_html(&self, markup: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);

        let events = Parser::new_ext(markup, options).map(|ev| match ev {
            Event::Start(Tag::Link { link_type, dest_url, title, id }) => Event::Start(Tag::Link {
                link_type,
                dest_url: self.rewrite_link(dest_url),
                title,
                id,
            }),
            Event::Start(Tag::Image { link_type, dest_url, title, id }) => Event::Start(Tag::Image {
                link_type,
                dest_url: self.rewrite_link(dest_url),
                title,
                id,
            }),
            other => other,
        });

        let mut out = String::with_capacity(markup.len() * 3 / 2);
        html::push_html(&mut out, events);
        out
    }

    fn rewrite_link<'a>(&self, dest: CowStr<'a>) -> CowStr<'a> {
        if self.link_prefix.is_empty() || !is_site_relative(&dest) {
            return dest;
        }
        let sep = if dest.starts_with('/') { "" } else { "/" };
        CowStr::from(format!("{}{}{}", self.link_prefix, sep, dest))
    }
}

impl Default for RenderService {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_PREFIX)
    }
}

/// Fragment or root-relative link; `//host` links are protocol-relative
fn is_site_relative(dest: &str) -> bool {
    dest.starts_with('#') || (dest.starts_with('/') && !dest.starts_with("//"))
}
