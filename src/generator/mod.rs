//! Generator module - renders the site from CMS content using Tera templates

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use tera::Context;
use walkdir::WalkDir;

use crate::cms::{ContentSource, QueryOptions};
use crate::content::{read_time, ListingState, PostDetail, PostSummary};
use crate::helpers::{
    date_xml, format_date_localized, full_url_for, meta_generator, open_graph, post_path,
};
use crate::i18n::{I18n, Labels};
use crate::templates::{
    ConfigData, PostCardData, PostPageData, SectionData, TemplateRenderer, LOGO_SVG, STYLE_CSS,
};
use crate::Blog;

/// Static site generator
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    labels: Labels,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;

        let mut i18n = I18n::new(&blog.config.language);
        i18n.load_languages(blog.base_dir.join(&blog.config.languages_dir))?;

        Ok(Self {
            blog: blog.clone(),
            renderer,
            labels: i18n.labels(),
        })
    }

    /// Generate the entire site
    pub async fn generate(&self, source: &dyn ContentSource) -> Result<()> {
        fs::create_dir_all(&self.blog.public_dir)?;

        self.write_builtin_assets()?;
        self.copy_source_assets()?;

        let listing = self.fetch_listing(source).await?;
        tracing::info!(
            "Fetched {} posts for the listing (more: {})",
            listing.posts().len(),
            listing.has_more()
        );
        self.write_output("index.html", &self.render_index(&listing)?)?;

        let uids = self.fetch_static_paths(source).await?;
        let mut written = 0;
        for uid in &uids {
            if !is_safe_segment(uid) {
                tracing::warn!("Skipping post with unusable uid {:?}", uid);
                continue;
            }
            // A post that vanished gets no page; the server renders it on request
            let Some(post) = self.fetch_post(source, uid).await? else {
                tracing::warn!("Post {:?} disappeared while generating; skipped", uid);
                continue;
            };
            let html = self.render_post(Some(&post))?;
            self.write_output(&format!("post/{}/index.html", uid), &html)?;
            written += 1;
            tracing::debug!("Generated post: {}", uid);
        }

        tracing::info!("Pre-rendered {} post pages", written);
        Ok(())
    }

    /// First page of the post listing
    pub async fn fetch_listing(&self, source: &dyn ContentSource) -> Result<ListingState> {
        let query = QueryOptions::listing(&self.blog.config.cms);
        let page = source.query(&query).await?;
        let page = page.try_map(|doc| PostSummary::from_document(&doc))?;
        Ok(ListingState::initialize(page))
    }

    /// Uids of the posts pre-rendered at build time
    pub async fn fetch_static_paths(&self, source: &dyn ContentSource) -> Result<Vec<String>> {
        let query = QueryOptions::static_paths(&self.blog.config.cms);
        let page = source.query(&query).await?;

        Ok(page
            .results
            .into_iter()
            .filter_map(|doc| {
                if doc.uid.is_none() {
                    tracing::warn!("Document {} has no uid; no page generated", doc.id);
                }
                doc.uid
            })
            .collect())
    }

    /// A single post, or `None` when the content service does not know it
    pub async fn fetch_post(
        &self,
        source: &dyn ContentSource,
        uid: &str,
    ) -> Result<Option<PostDetail>> {
        let document = source
            .get_by_uid(&self.blog.config.cms.document_type, uid)
            .await?;
        Ok(document
            .map(|doc| PostDetail::from_document(&doc))
            .transpose()?)
    }

    /// Render the listing page
    pub fn render_index(&self, listing: &ListingState) -> Result<String> {
        let posts: Vec<PostCardData> = listing
            .posts()
            .iter()
            .map(|p| self.build_post_card(p))
            .collect();

        let mut context = self.create_base_context();
        context.insert("posts", &posts);
        context.insert("next_page", &listing.cursor().map(|c| c.as_str()));

        self.renderer.render("index.html", &context)
    }

    /// Render a post page; `None` renders the loading state
    pub fn render_post(&self, post: Option<&PostDetail>) -> Result<String> {
        let data = match post {
            Some(post) => self.build_post_page(post),
            None => self.build_fallback_page(),
        };

        let og = open_graph(
            &data.title,
            &data.subtitle,
            &full_url_for(&self.blog.config, &data.path),
            data.banner_url.as_deref(),
            &self.blog.config.title,
        );

        let mut context = self.create_base_context();
        context.insert("post", &data);
        context.insert("open_graph", &og);

        self.renderer.render("post.html", &context)
    }

    /// Create a base context with common variables
    fn create_base_context(&self) -> Context {
        let config = &self.blog.config;
        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: config.title.clone(),
                description: config.description.clone(),
                language: config.language.clone(),
                url: config.url.clone(),
                root: config.root.clone(),
            },
        );
        context.insert("labels", &self.labels);
        context.insert("meta_generator", &meta_generator());
        context
    }

    fn format_date(&self, date: &chrono::DateTime<chrono::Utc>) -> String {
        format_date_localized(date, &self.blog.config.date_format, &self.blog.config.language)
    }

    fn build_post_card(&self, post: &PostSummary) -> PostCardData {
        PostCardData {
            uid: post.uid.clone(),
            path: post_path(&self.blog.config, &post.uid),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            date: post.first_publication_date.as_ref().map(|d| self.format_date(d)),
        }
    }

    fn build_post_page(&self, post: &PostDetail) -> PostPageData {
        let sections = post
            .content
            .iter()
            .map(|block| SectionData {
                heading: block.heading.clone(),
                html: block.body.as_html(),
            })
            .collect();

        PostPageData {
            uid: post.uid.clone(),
            path: post_path(&self.blog.config, &post.uid),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            banner_url: post.banner_url.clone(),
            author: post.author.clone(),
            date: post.first_publication_date.as_ref().map(|d| self.format_date(d)),
            datetime: post.first_publication_date.as_ref().map(date_xml),
            read_time: read_time::estimate(Some(post.content.as_slice())).minutes(),
            sections,
            is_fallback: false,
        }
    }

    fn build_fallback_page(&self) -> PostPageData {
        PostPageData {
            uid: String::new(),
            path: "/".to_string(),
            title: self.labels.loading.clone(),
            subtitle: String::new(),
            banner_url: None,
            author: String::new(),
            date: None,
            datetime: None,
            read_time: read_time::estimate(None).minutes(),
            sections: Vec::new(),
            is_fallback: true,
        }
    }

    /// Write the embedded stylesheet and logo
    fn write_builtin_assets(&self) -> Result<()> {
        self.write_output("css/style.css", STYLE_CSS)?;
        self.write_output("Logo.svg", LOGO_SVG)?;
        Ok(())
    }

    /// Copy static files from the source directory, overriding built-ins
    fn copy_source_assets(&self) -> Result<()> {
        let source_dir = &self.blog.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(source_dir)?;
            let dest = self.blog.public_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::copy(path, &dest)?;
            tracing::debug!("Copied asset: {:?}", relative);
        }

        Ok(())
    }

    fn write_output(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let output_path = self.blog.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(output_path)
    }
}

/// Whether a uid can be used as a single directory name
pub fn is_safe_segment(uid: &str) -> bool {
    !uid.is_empty() && uid != "." && uid != ".." && !uid.contains(['/', '\\'])
}
