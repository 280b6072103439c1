//! Structured text as delivered by the content API
//!
//! Rich text is an ordered list of blocks. Text-bearing blocks carry spans
//! (bold, italic, links, labels) as character ranges over the block text.
//! Two projections exist: [`RichText::as_text`] for word counting and
//! [`RichText::as_html`] for rendering.

use serde::{Deserialize, Serialize};

use crate::helpers::html_escape;

/// An ordered sequence of rich-text blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<Block>);

/// One rich-text block, tagged by its `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    #[serde(rename = "paragraph")]
    Paragraph(TextBlock),
    #[serde(rename = "heading1")]
    Heading1(TextBlock),
    #[serde(rename = "heading2")]
    Heading2(TextBlock),
    #[serde(rename = "heading3")]
    Heading3(TextBlock),
    #[serde(rename = "heading4")]
    Heading4(TextBlock),
    #[serde(rename = "heading5")]
    Heading5(TextBlock),
    #[serde(rename = "heading6")]
    Heading6(TextBlock),
    #[serde(rename = "preformatted")]
    Preformatted(TextBlock),
    #[serde(rename = "list-item")]
    ListItem(TextBlock),
    #[serde(rename = "o-list-item")]
    OrderedListItem(TextBlock),
    #[serde(rename = "image")]
    Image(ImageBlock),
    #[serde(rename = "embed")]
    Embed(EmbedBlock),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TextBlock {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
            label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default, rename = "linkTo")]
    pub link_to: Option<LinkData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedBlock {
    pub oembed: OEmbed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OEmbed {
    pub embed_url: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

/// A formatted range `[start, end)` of a text block, in UTF-16 code units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub kind: SpanKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SpanKind {
    #[serde(rename = "strong")]
    Strong,
    #[serde(rename = "em")]
    Em,
    #[serde(rename = "hyperlink")]
    Hyperlink { data: LinkData },
    #[serde(rename = "label")]
    Label { data: LabelData },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelData {
    pub label: String,
}

/// Target of a hyperlink span or a linked image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkData {
    #[serde(default)]
    pub link_type: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

/// Maps document links to site paths, web links to their URL
pub fn default_link_resolver(link: &LinkData) -> String {
    if let Some(url) = &link.url {
        return url.clone();
    }
    match (&link.document_type, &link.uid) {
        (Some(kind), Some(uid)) if kind == "posts" => format!("/post/{}", uid),
        _ => "/".to_string(),
    }
}

impl Block {
    fn text_block(&self) -> Option<&TextBlock> {
        match self {
            Block::Paragraph(t)
            | Block::Heading1(t)
            | Block::Heading2(t)
            | Block::Heading3(t)
            | Block::Heading4(t)
            | Block::Heading5(t)
            | Block::Heading6(t)
            | Block::Preformatted(t)
            | Block::ListItem(t)
            | Block::OrderedListItem(t) => Some(t),
            Block::Image(_) | Block::Embed(_) => None,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "p",
            Block::Heading1(_) => "h1",
            Block::Heading2(_) => "h2",
            Block::Heading3(_) => "h3",
            Block::Heading4(_) => "h4",
            Block::Heading5(_) => "h5",
            Block::Heading6(_) => "h6",
            Block::Preformatted(_) => "pre",
            Block::ListItem(_) | Block::OrderedListItem(_) => "li",
            Block::Image(_) | Block::Embed(_) => "div",
        }
    }
}

impl RichText {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self(blocks)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plain text of all text-bearing blocks, joined by a space
    pub fn as_text(&self) -> String {
        self.0
            .iter()
            .filter_map(Block::text_block)
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Serialize to HTML, resolving document links to `/post/<uid>`
    pub fn as_html(&self) -> String {
        self.as_html_with(&default_link_resolver)
    }

    /// Serialize to HTML with a custom link resolver
    pub fn as_html_with(&self, resolve: &dyn Fn(&LinkData) -> String) -> String {
        let mut out = String::new();
        let mut open_list: Option<&'static str> = None;

        for block in &self.0 {
            let wanted = match block {
                Block::ListItem(_) => Some("ul"),
                Block::OrderedListItem(_) => Some("ol"),
                _ => None,
            };
            if open_list != wanted {
                if let Some(tag) = open_list {
                    out.push_str(&format!("</{}>", tag));
                }
                if let Some(tag) = wanted {
                    out.push_str(&format!("<{}>", tag));
                }
                open_list = wanted;
            }
            out.push_str(&block_html(block, resolve));
        }

        if let Some(tag) = open_list {
            out.push_str(&format!("</{}>", tag));
        }

        out
    }
}

fn block_html(block: &Block, resolve: &dyn Fn(&LinkData) -> String) -> String {
    match block {
        Block::Image(image) => {
            let img = format!(
                r#"<img src="{}" alt="{}"{} />"#,
                html_escape(&image.url),
                html_escape(image.alt.as_deref().unwrap_or("")),
                image
                    .copyright
                    .as_deref()
                    .map(|c| format!(r#" copyright="{}""#, html_escape(c)))
                    .unwrap_or_default()
            );
            let inner = match &image.link_to {
                Some(link) => format!(r#"<a href="{}">{}</a>"#, html_escape(&resolve(link)), img),
                None => img,
            };
            format!(r#"<p class="block-img">{}</p>"#, inner)
        }
        Block::Embed(embed) => format!(
            r#"<div data-oembed="{}" data-oembed-type="{}" data-oembed-provider="{}">{}</div>"#,
            html_escape(&embed.oembed.embed_url),
            html_escape(&embed.oembed.kind),
            html_escape(
                &embed
                    .oembed
                    .provider_name
                    .as_deref()
                    .unwrap_or("")
                    .to_lowercase()
            ),
            embed.oembed.html.as_deref().unwrap_or("")
        ),
        _ => {
            let text = block.text_block().map(|t| (t, block.tag()));
            match text {
                Some((t, tag)) => {
                    let class = t
                        .label
                        .as_deref()
                        .map(|l| format!(r#" class="{}""#, html_escape(l)))
                        .unwrap_or_default();
                    format!(
                        "<{tag}{class}>{}</{tag}>",
                        spans_html(&t.text, &t.spans, resolve)
                    )
                }
                None => String::new(),
            }
        }
    }
}

/// Render text with its spans.
///
/// Span offsets count UTF-16 code units, so they are mapped to char indices
/// first. The text is cut at every span boundary; each piece is wrapped in
/// the tags of all spans covering it, outermost (earliest start, latest end)
/// first. Overlapping spans therefore produce well-nested markup.
fn spans_html(text: &str, spans: &[Span], resolve: &dyn Fn(&LinkData) -> String) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    // utf16_starts[i] is the UTF-16 offset of chars[i]; the last entry is the total
    let mut utf16_starts = Vec::with_capacity(len + 1);
    let mut offset = 0;
    for c in &chars {
        utf16_starts.push(offset);
        offset += c.len_utf16();
    }
    utf16_starts.push(offset);

    // An offset inside a surrogate pair snaps forward to the next char
    let to_char = |unit: usize| utf16_starts.partition_point(|&start| start < unit).min(len);

    let ranges: Vec<(usize, usize, &Span)> = spans
        .iter()
        .map(|s| (to_char(s.start), to_char(s.end), s))
        .collect();

    let mut bounds = vec![0, len];
    for (start, end, _) in &ranges {
        bounds.push(*start);
        bounds.push(*end);
    }
    bounds.sort_unstable();
    bounds.dedup();

    let mut out = String::with_capacity(text.len());
    for pair in bounds.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let piece: String = chars[from..to].iter().collect();

        let mut covering: Vec<(usize, usize, &Span)> = ranges
            .iter()
            .copied()
            .filter(|(start, end, _)| start < end && *start <= from && *end >= to)
            .collect();
        covering.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        for (_, _, span) in &covering {
            out.push_str(&open_tag(&span.kind, resolve));
        }
        out.push_str(&escape_text(&piece));
        for (_, _, span) in covering.iter().rev() {
            out.push_str(close_tag(&span.kind));
        }
    }

    out
}

fn open_tag(kind: &SpanKind, resolve: &dyn Fn(&LinkData) -> String) -> String {
    match kind {
        SpanKind::Strong => "<strong>".to_string(),
        SpanKind::Em => "<em>".to_string(),
        SpanKind::Hyperlink { data } => {
            let target = data
                .target
                .as_deref()
                .map(|t| format!(r#" target="{}" rel="noopener""#, html_escape(t)))
                .unwrap_or_default();
            format!(r#"<a href="{}"{}>"#, html_escape(&resolve(data)), target)
        }
        SpanKind::Label { data } => format!(r#"<span class="{}">"#, html_escape(&data.label)),
    }
}

fn close_tag(kind: &SpanKind) -> &'static str {
    match kind {
        SpanKind::Strong => "</strong>",
        SpanKind::Em => "</em>",
        SpanKind::Hyperlink { .. } => "</a>",
        SpanKind::Label { .. } => "</span>",
    }
}

fn escape_text(s: &str) -> String {
    html_escape(s).replace('\n', "<br />")
}
