//! HTML output for rendered pages.
//!
//! Two targets share the same node markup:
//!
//! - [`preview_html`]: a fragment for the builder's preview pane. Nodes carry
//!   `data-element-id` so the editor can map clicks back to elements.
//! - [`export_html`]: a standalone HTML document for outbound email, every
//!   page stacked top to bottom.

use std::fmt::Write;

use super::{NodeContent, Rendered, RenderedNode, RenderedPage, num, render_all};
use crate::document::CanvasDocument;

/// Markup used when there is nothing to show.
pub const EMPTY_PLACEHOLDER: &str =
    r#"<div class="canvas-empty" data-empty="true">No content to display</div>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Preview,
    Export,
}

/// Escape text for use inside an attribute value or as element text.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Editor preview markup for a rendered page (or the empty placeholder).
pub fn preview_html(rendered: &Rendered) -> String {
    match rendered {
        Rendered::Empty => EMPTY_PLACEHOLDER.to_string(),
        Rendered::Page(page) => page_html(page, Target::Preview),
    }
}

/// A complete email HTML document with every page of `document`.
pub fn export_html(document: &CanvasDocument, title: &str, zoom: f64) -> String {
    let mut body = String::new();
    let pages = render_all(document, zoom);
    if pages.is_empty() {
        body.push_str(EMPTY_PLACEHOLDER);
    }
    for rendered in &pages {
        match rendered {
            Rendered::Page(page) => {
                body.push_str(r#"<div class="email-page" style="margin:0 auto 24px auto;width:max-content">"#);
                body.push_str(&page_html(page, Target::Export));
                body.push_str("</div>");
            }
            Rendered::Empty => body.push_str(EMPTY_PLACEHOLDER),
        }
    }

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html>\n",
            "<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            "<title>{}</title>\n",
            "</head>\n",
            "<body style=\"margin:0;padding:24px 0;background-color:#f4f4f5\">\n",
            "{}\n",
            "</body>\n",
            "</html>\n"
        ),
        escape(title),
        body
    )
}

fn page_html(page: &RenderedPage, target: Target) -> String {
    let canvas = &page.canvas;
    let mut out = String::new();

    let page_attr = match target {
        Target::Preview => format!(r#" data-page="{}""#, page.page_index),
        Target::Export => String::new(),
    };
    let _ = write!(
        out,
        r#"<div class="canvas"{} style="position:relative;overflow:hidden;width:{}px;height:{}px;background-color:#ffffff">"#,
        page_attr,
        num(canvas.width),
        num(canvas.height)
    );
    let _ = write!(
        out,
        r#"<div class="canvas-stage" style="position:absolute;left:0;top:0;width:{}px;height:{}px;transform:scale({});transform-origin:top left">"#,
        num(canvas.base_width),
        num(canvas.base_height),
        num(canvas.scale)
    );
    for node in &page.nodes {
        out.push_str(&node_html(node, target));
    }
    out.push_str("</div></div>");
    out
}

fn node_html(node: &RenderedNode, target: Target) -> String {
    let id_attr = match target {
        Target::Preview => format!(r#" data-element-id="{}""#, escape(&node.element_id)),
        Target::Export => String::new(),
    };
    let style = escape(&node.style.to_css());

    // Buttons are the link themselves.
    if let NodeContent::Button { label, href } = &node.content {
        return format!(
            r#"<a{} href="{}" target="_blank" rel="noopener noreferrer" style="{}">{}</a>"#,
            id_attr,
            escape(href),
            style,
            escape(label)
        );
    }

    let inner = match &node.content {
        NodeContent::Text { html } => html.clone(),
        NodeContent::Image {
            src,
            alt,
            object_fit,
        } => format!(
            r#"<img src="{}" alt="{}" style="display:block;width:100%;height:100%;object-fit:{}">"#,
            escape(src),
            escape(alt),
            object_fit.as_css()
        ),
        NodeContent::Video { src } => format!(
            r#"<video src="{}" controls style="display:block;width:100%;height:100%"></video>"#,
            escape(src)
        ),
        NodeContent::Audio { src } => format!(
            r#"<audio src="{}" controls style="display:block;width:100%"></audio>"#,
            escape(src)
        ),
        NodeContent::Shape | NodeContent::Button { .. } => String::new(),
    };

    let inner = match &node.link {
        Some(link) => format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer" style="display:block;width:100%;height:100%;color:inherit;text-decoration:inherit">{}</a>"#,
            escape(link),
            inner
        ),
        None => inner,
    };

    format!(r#"<div{} style="{}">{}</div>"#, id_attr, style, inner)
}
