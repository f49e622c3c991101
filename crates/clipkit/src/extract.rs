//! Page extraction from rendered HTML
//!
//! Used by the browser reader: pulls the title and meta tags out of the
//! rendered document, locates the main article element, and flattens it to
//! plain text.

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// Elements whose content is never rendered
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "svg", "template"];

/// Page furniture dropped when falling back to the whole body
const BODY_SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "iframe", "svg", "template", "nav", "header", "footer",
    "aside",
];

/// Elements rendered as a separate paragraph
const PARAGRAPH_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "ul", "ol", "table",
];

/// Elements rendered on their own line
const LINE_TAGS: &[&str] = &[
    "div", "br", "li", "tr", "article", "section", "main", "figure", "figcaption", "dd", "dt",
];

/// Main-content candidates, tried in order
const ARTICLE_SELECTORS: &[&str] = &[
    "article",
    "[role=\"main\"]",
    ".post-content",
    ".article-content",
    ".entry-content",
    ".content",
    "#content",
    // WeChat
    ".rich_media_content",
    // Zhihu
    ".Post-RichTextContainer",
    // Xiaohongshu
    ".note-content",
];

/// Fields extracted from a rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtract {
    pub title: String,
    pub og_title: Option<String>,
    pub description: Option<String>,
    pub og_description: Option<String>,
    pub content: String,
}

/// Extract title, meta tags, and main content from a rendered page
pub fn extract_page(html: &str) -> PageExtract {
    let doc = Html::parse_document(html);

    let title = first_match(&doc, "title")
        .map(|t| collapse_whitespace(&t.text().collect::<String>()))
        .unwrap_or_default();

    let content = ARTICLE_SELECTORS
        .iter()
        .find_map(|selector| first_match(&doc, selector))
        .map(|element| render_text(element, SKIP_TAGS))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| {
            let body = first_match(&doc, "body").unwrap_or_else(|| doc.root_element());
            render_text(body, BODY_SKIP_TAGS)
        });

    PageExtract {
        title,
        og_title: meta_content(&doc, r#"meta[property="og:title"]"#),
        description: meta_content(&doc, r#"meta[name="description"]"#),
        og_description: meta_content(&doc, r#"meta[property="og:description"]"#),
        content,
    }
}

/// Convert an HTML fragment to plain text
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    render_text(fragment.root_element(), SKIP_TAGS)
}

fn first_match<'a>(doc: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector).next()
}

fn meta_content(doc: &Html, selector: &str) -> Option<String> {
    first_match(doc, selector)
        .and_then(|meta| meta.value().attr("content"))
        .map(collapse_whitespace)
        .filter(|c| !c.is_empty())
}

/// Single-line text with every whitespace run collapsed to one space
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn render_text(element: ElementRef<'_>, skip_tags: &[&str]) -> String {
    let mut output = String::new();
    render_children(element, skip_tags, &mut output);
    clean_whitespace(&output)
}

fn render_children(element: ElementRef<'_>, skip_tags: &[&str], out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_text(out, text),
            Node::Element(el) => {
                let name = el.name();
                if skip_tags.contains(&name) {
                    continue;
                }
                let breaks = if PARAGRAPH_TAGS.contains(&name) {
                    2
                } else if LINE_TAGS.contains(&name) {
                    1
                } else {
                    0
                };

                end_line(out, breaks);
                if let Some(child_el) = ElementRef::wrap(child) {
                    render_children(child_el, skip_tags, out);
                }
                end_line(out, breaks);
            }
            _ => {}
        }
    }
}

/// Append text, collapsing whitespace the way a browser would
fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.is_empty() && !out.ends_with(char::is_whitespace) {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}

/// Make the output end with at least `breaks` newlines (none at the start)
fn end_line(out: &mut String, breaks: usize) {
    if breaks == 0 || out.is_empty() {
        return;
    }
    while out.ends_with(' ') {
        out.pop();
    }
    let existing = out.chars().rev().take_while(|&c| c == '\n').count();
    for _ in existing..breaks {
        out.push('\n');
    }
}

/// Clean whitespace: collapse runs, trim, keep max 2 newlines
pub fn clean_whitespace(s: &str) -> String {
    let mut result = String::new();
    let mut last_was_space = false;
    let mut newline_count = 0;

    for c in s.chars() {
        if c == '\n' {
            if last_was_space && result.ends_with(' ') {
                result.pop();
            }
            newline_count += 1;
            last_was_space = true;
            if newline_count <= 2 {
                result.push(c);
            }
        } else if c.is_whitespace() {
            newline_count = 0;
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            newline_count = 0;
            last_was_space = false;
            result.push(c);
        }
    }

    result.trim().to_string()
}

/// Filter excessive newlines: keep at most 2 consecutive newlines
pub fn filter_excessive_newlines(s: &str) -> String {
    let mut result = String::new();
    let mut newline_count = 0;

    for c in s.chars() {
        if c == '\n' {
            newline_count += 1;
            if newline_count <= 2 {
                result.push(c);
            }
        } else {
            newline_count = 0;
            result.push(c);
        }
    }

    result
}
