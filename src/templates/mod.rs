//! Built-in theme templates using the Tera template engine
//!
//! Templates and static assets are embedded in the binary. Plain text fields
//! are escaped in the templates; rich-text HTML from the content service is
//! trusted and inserted verbatim.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Stylesheet written to `css/style.css`
pub const STYLE_CSS: &str = include_str!("assets/css/style.css");

/// Site logo written to `Logo.svg`
pub const LOGO_SVG: &str = include_str!("assets/Logo.svg");

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Escaping is explicit in the templates (`| escape`) so that
        // rich-text HTML can pass through untouched
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("theme/partials/header.html"),
            ),
            (
                "partials/post_meta.html",
                include_str!("theme/partials/post_meta.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub url: String,
    pub root: String,
}

/// A post card on the listing page
#[derive(Debug, Clone, Serialize)]
pub struct PostCardData {
    pub uid: String,
    pub path: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    /// Formatted publication date
    pub date: Option<String>,
}

/// One heading + body section of a post
#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: String,
    /// Rendered rich-text body
    pub html: String,
}

/// A post page; `is_fallback` marks the loading state of a missing post
#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub uid: String,
    pub path: String,
    pub title: String,
    pub subtitle: String,
    pub banner_url: Option<String>,
    pub author: String,
    pub date: Option<String>,
    pub datetime: Option<String>,
    pub read_time: Option<u64>,
    pub sections: Vec<SectionData>,
    pub is_fallback: bool,
}
