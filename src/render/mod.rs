//! # Rendering Module
//!
//! Projects one page of a [`CanvasDocument`] into a visual tree, then into
//! target-specific HTML.
//!
//! ## Modules
//!
//! - [`html`]: editor preview fragments and exported email documents
//!
//! ## Usage Example
//!
//! ```
//! use canvasmail::{catalog, render};
//!
//! let doc = catalog::instantiate_document("t1")?;
//! let rendered = render::render(&doc, 0, 0.5);
//! let html = render::html::preview_html(&rendered);
//! assert!(html.contains("width:300px"));
//! # Ok::<(), canvasmail::CanvasError>(())
//! ```
//!
//! Rendering is a pure function of `(document, page index, zoom)`. It never
//! fails: an out-of-range page yields [`Rendered::Empty`], elements with an
//! unknown type are skipped and reported in [`RenderedPage::warnings`].
//!
//! Rich-text content is emitted verbatim. Authors are trusted; nothing in
//! this module sanitizes HTML.

pub mod html;

use serde::Serialize;

use crate::document::{CanvasDocument, Element, ElementKind, ElementType, ObjectFit};

/// Logical canvas width before zoom.
pub const CANVAS_WIDTH: f64 = 600.0;
/// Logical canvas height before zoom.
pub const CANVAS_HEIGHT: f64 = 800.0;

/// Button defaults.
pub const BUTTON_BACKGROUND: &str = "#c2831f";
pub const BUTTON_COLOR: &str = "#fff";
pub const BUTTON_RADIUS: f64 = 6.0;
/// Background of every other element when none is set.
pub const DEFAULT_BACKGROUND: &str = "transparent";
/// Text defaults.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Result of rendering one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rendered {
    /// The requested page does not exist (no pages, or index out of range).
    Empty,
    Page(RenderedPage),
}

impl Rendered {
    pub fn is_empty(&self) -> bool {
        matches!(self, Rendered::Empty)
    }

    pub fn as_page(&self) -> Option<&RenderedPage> {
        match self {
            Rendered::Page(p) => Some(p),
            Rendered::Empty => None,
        }
    }
}

/// Visual tree of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    pub page_index: usize,
    pub canvas: CanvasBox,
    /// Nodes in paint order (first painted first).
    pub nodes: Vec<RenderedNode>,
    pub warnings: Vec<RenderWarning>,
}

/// The canvas area. `width`/`height` are the presented size; the inner
/// coordinate system stays at base size and is scaled by `scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasBox {
    pub width: f64,
    pub height: f64,
    pub base_width: f64,
    pub base_height: f64,
    pub scale: f64,
}

impl CanvasBox {
    fn at_zoom(zoom: f64) -> Self {
        Self {
            width: CANVAS_WIDTH * zoom,
            height: CANVAS_HEIGHT * zoom,
            base_width: CANVAS_WIDTH,
            base_height: CANVAS_HEIGHT,
            scale: zoom,
        }
    }
}

/// One positioned element, ready for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedNode {
    pub element_id: String,
    pub style: StyleBlock,
    pub content: NodeContent,
    /// Hyperlink wrapping the node (non-button elements only).
    pub link: Option<String>,
}

/// Type-specific output of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeContent {
    /// Trusted HTML, emitted as-is.
    Text { html: String },
    Image {
        src: String,
        alt: String,
        object_fit: ObjectFit,
    },
    Button { label: String, href: String },
    Video { src: String },
    Audio { src: String },
    Shape,
}

/// Non-fatal problems found while rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderWarning {
    /// Element skipped because its type is not supported.
    UnknownType { element_id: String, type_tag: String },
    /// Zoom was not a positive number; rendered at 1.
    InvalidZoom { requested: f64 },
    /// fontSize was not a positive number; the default was used.
    InvalidFontSize { element_id: String, requested: f64 },
}

/// Ordered CSS declarations. Order is fixed so output is reproducible.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StyleBlock(Vec<(&'static str, String)>);

impl StyleBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value,
            None => self.0.push((property, value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(p, v)| (*p, v.as_str()))
    }

    /// `prop:value;prop:value` form for a `style` attribute.
    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|(p, v)| format!("{}:{}", p, v))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Format a number the way CSS wants it (`10`, not `10.0`).
pub(crate) fn num(v: f64) -> String {
    if v == 0.0 { "0".to_string() } else { format!("{}", v) }
}

fn px(v: f64) -> String {
    if v == 0.0 { "0".to_string() } else { format!("{}px", v) }
}

/// Render page `page_index` of `document` at `zoom`.
pub fn render(document: &CanvasDocument, page_index: usize, zoom: f64) -> Rendered {
    let Some(page) = document.page(page_index) else {
        return Rendered::Empty;
    };

    let mut warnings = Vec::new();
    let zoom = if zoom.is_finite() && zoom > 0.0 {
        zoom
    } else {
        warnings.push(RenderWarning::InvalidZoom { requested: zoom });
        1.0
    };

    // Stable: equal zIndex keeps array order.
    let mut ordered: Vec<&Element> = page.iter().collect();
    ordered.sort_by_key(|e| e.geometry.z_index);

    let mut nodes = Vec::with_capacity(ordered.len());
    for element in ordered {
        match render_element(element, &mut warnings) {
            Some(node) => nodes.push(node),
            None => warnings.push(RenderWarning::UnknownType {
                element_id: element.id().to_string(),
                type_tag: element.type_tag().to_string(),
            }),
        }
    }

    Rendered::Page(RenderedPage {
        page_index,
        canvas: CanvasBox::at_zoom(zoom),
        nodes,
        warnings,
    })
}

/// Render every page at `zoom`, in order.
pub fn render_all(document: &CanvasDocument, zoom: f64) -> Vec<Rendered> {
    (0..document.page_count())
        .map(|i| render(document, i, zoom))
        .collect()
}

/// Dispatch on the element kind. `None` means "render nothing".
fn render_element(element: &Element, warnings: &mut Vec<RenderWarning>) -> Option<RenderedNode> {
    let ty = element.kind().element_type()?;
    let style = style_block(element, ty, warnings);

    let content = match element.kind() {
        ElementKind::Text { content } => NodeContent::Text {
            html: content.clone(),
        },
        ElementKind::Image {
            src,
            alt,
            object_fit,
        } => NodeContent::Image {
            src: src.clone(),
            alt: alt.clone().unwrap_or_default(),
            object_fit: object_fit.unwrap_or_default(),
        },
        ElementKind::Button { label } => NodeContent::Button {
            label: label.clone(),
            href: element
                .link
                .clone()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| "#".to_string()),
        },
        ElementKind::Video { src } => NodeContent::Video { src: src.clone() },
        ElementKind::Audio { src } => NodeContent::Audio { src: src.clone() },
        ElementKind::Shape => NodeContent::Shape,
        ElementKind::Unknown(_) => return None,
    };

    let link = match ty {
        ElementType::Button => None,
        _ => element.link.clone().filter(|l| !l.trim().is_empty()),
    };

    Some(RenderedNode {
        element_id: element.id().to_string(),
        style,
        content,
        link,
    })
}

/// Compute the CSS for an element, applying type defaults.
fn style_block(element: &Element, ty: ElementType, warnings: &mut Vec<RenderWarning>) -> StyleBlock {
    let g = &element.geometry;
    let s = &element.style;
    let is_button = ty == ElementType::Button;
    let is_textual = matches!(ty, ElementType::Text | ElementType::Button);

    let mut css = StyleBlock::new();
    css.set("position", "absolute");
    css.set("left", px(g.x));
    css.set("top", px(g.y));
    css.set("width", px(g.width));
    css.set("height", px(g.height));
    css.set("box-sizing", "border-box");
    if g.rotation != 0.0 {
        css.set("transform", format!("rotate({}deg)", num(g.rotation)));
    }
    css.set("z-index", g.z_index.to_string());
    css.set("opacity", num(s.opacity.unwrap_or(1.0)));

    let background = match (&s.background_color, is_button) {
        (Some(bg), _) => bg.as_str(),
        (None, true) => BUTTON_BACKGROUND,
        (None, false) => DEFAULT_BACKGROUND,
    };
    css.set("background-color", background);

    let color = match (&s.color, ty) {
        (Some(c), _) => Some(c.as_str()),
        (None, ElementType::Button) => Some(BUTTON_COLOR),
        (None, ElementType::Text) => Some(DEFAULT_TEXT_COLOR),
        (None, _) => None,
    };
    if let Some(color) = color {
        css.set("color", color);
    }

    let font_size = match s.font_size {
        Some(size) if !size.is_finite() || size <= 0.0 => {
            warnings.push(RenderWarning::InvalidFontSize {
                element_id: element.id().to_string(),
                requested: size,
            });
            None
        }
        other => other,
    };
    match font_size {
        Some(size) => css.set("font-size", px(size)),
        None if is_textual => css.set("font-size", px(DEFAULT_FONT_SIZE)),
        None => {}
    }
    if s.bold {
        css.set("font-weight", "bold");
    }
    if s.italic {
        css.set("font-style", "italic");
    }
    if s.underline {
        css.set("text-decoration", "underline");
    } else if is_button {
        css.set("text-decoration", "none");
    }

    match s.border_radius {
        Some(r) => css.set("border-radius", px(r)),
        None if is_button => css.set("border-radius", px(BUTTON_RADIUS)),
        None => {}
    }
    if let Some(border) = &s.border {
        css.set("border", border.clone());
    }

    match (s.align, is_button) {
        (Some(align), _) => css.set("text-align", align.as_css()),
        (None, true) => css.set("text-align", "center"),
        (None, false) => {}
    }

    if is_button {
        css.set("display", "block");
        css.set("line-height", px(g.height));
    }
    if ty == ElementType::Text {
        css.set("overflow-wrap", "break-word");
    }

    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::document::{Geometry, Page, Style};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc_with(elements: Vec<Element>) -> CanvasDocument {
        CanvasDocument::from_pages(vec![Page::from_elements(elements).unwrap()])
    }

    fn shape(id: &str, z: i32) -> Element {
        Element::with_id(id, ElementKind::Shape, Geometry::new(0.0, 0.0, 10.0, 10.0).layer(z))
            .unwrap()
    }

    fn order(rendered: &Rendered) -> Vec<&str> {
        rendered
            .as_page()
            .unwrap()
            .nodes
            .iter()
            .map(|n| n.element_id.as_str())
            .collect()
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(render(&CanvasDocument::default(), 0, 1.0), Rendered::Empty);
    }

    #[test]
    fn test_out_of_range_page() {
        let doc = CanvasDocument::new();
        assert_eq!(render(&doc, 1, 1.0), Rendered::Empty);
        assert_eq!(render(&doc, usize::MAX, 1.0), Rendered::Empty);
    }

    #[test]
    fn test_deterministic() {
        let doc = catalog::instantiate_document("t2").unwrap();
        assert_eq!(render(&doc, 0, 0.8), render(&doc, 0, 0.8));
    }

    #[test]
    fn test_paint_order_stable_by_z_index() {
        let doc = doc_with(vec![shape("a", 1), shape("b", 0), shape("c", 1), shape("d", -1)]);
        assert_eq!(order(&render(&doc, 0, 1.0)), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_zoom_scales_canvas_not_geometry() {
        let doc = catalog::instantiate_document("t1").unwrap();
        let full = render(&doc, 0, 1.0);
        let half = render(&doc, 0, 0.5);
        let (full, half) = (full.as_page().unwrap(), half.as_page().unwrap());

        assert_eq!(full.canvas.width, 600.0);
        assert_eq!(half.canvas.width, 300.0);
        assert_eq!(half.canvas.height, 400.0);
        assert_eq!(half.canvas.scale, 0.5);
        // Node styles are in canvas space either way.
        assert_eq!(full.nodes, half.nodes);
    }

    #[test]
    fn test_invalid_zoom_falls_back() {
        let doc = CanvasDocument::new();
        let rendered = render(&doc, 0, -2.0);
        let page = rendered.as_page().unwrap();
        assert_eq!(page.canvas.scale, 1.0);
        assert_eq!(page.warnings, vec![RenderWarning::InvalidZoom { requested: -2.0 }]);
    }

    #[test]
    fn test_button_defaults() {
        let button =
            Element::with_id("b", ElementKind::button("Go"), Geometry::new(10.0, 20.0, 200.0, 50.0))
                .unwrap();
        let rendered = render(&doc_with(vec![button]), 0, 1.0);
        let node = &rendered.as_page().unwrap().nodes[0];
        assert_eq!(node.style.get("background-color"), Some("#c2831f"));
        assert_eq!(node.style.get("color"), Some("#fff"));
        assert_eq!(node.style.get("border-radius"), Some("6px"));
        assert_eq!(
            node.content,
            NodeContent::Button {
                label: "Go".into(),
                href: "#".into()
            }
        );
        assert_eq!(node.link, None);
    }

    #[test]
    fn test_blank_button_link_falls_back_to_hash() {
        let button =
            Element::with_id("b", ElementKind::button("Go"), Geometry::new(0.0, 0.0, 100.0, 40.0))
                .unwrap()
                .linked("  ");
        let rendered = render(&doc_with(vec![button]), 0, 1.0);
        assert_eq!(
            rendered.as_page().unwrap().nodes[0].content,
            NodeContent::Button {
                label: "Go".into(),
                href: "#".into()
            }
        );
    }

    #[test]
    fn test_bad_font_size_uses_default_and_warns() {
        let doc = CanvasDocument::from_json(
            &json!({"pages": [{"elements": [
                {"id": "a", "type": "text", "content": "x", "fontSize": 0, "width": 10, "height": 10},
                {"id": "b", "type": "text", "content": "y", "fontSize": 12, "width": 10, "height": 10}
            ]}]})
            .to_string(),
        )
        .unwrap();
        let rendered = render(&doc, 0, 1.0);
        let page = rendered.as_page().unwrap();
        assert_eq!(page.nodes.len(), 2);
        assert_eq!(page.nodes[0].style.get("font-size"), Some("16px"));
        assert_eq!(page.nodes[1].style.get("font-size"), Some("12px"));
        assert_eq!(
            page.warnings,
            vec![RenderWarning::InvalidFontSize {
                element_id: "a".into(),
                requested: 0.0
            }]
        );
    }

    #[test]
    fn test_style_passthrough() {
        let el = Element::with_id(
            "t",
            ElementKind::text("<b>x</b>"),
            Geometry::new(5.0, 6.0, 7.0, 8.0).rotated(45.0),
        )
        .unwrap()
        .styled(Style {
            opacity: Some(0.3),
            background_color: Some("#eee".into()),
            font_size: Some(22.0),
            italic: true,
            ..Default::default()
        })
        .unwrap();
        let rendered = render(&doc_with(vec![el]), 0, 2.0);
        let node = &rendered.as_page().unwrap().nodes[0];
        let css = &node.style;
        assert_eq!(css.get("left"), Some("5px"));
        assert_eq!(css.get("width"), Some("7px"));
        assert_eq!(css.get("transform"), Some("rotate(45deg)"));
        assert_eq!(css.get("opacity"), Some("0.3"));
        assert_eq!(css.get("background-color"), Some("#eee"));
        assert_eq!(css.get("font-size"), Some("22px"));
        assert_eq!(css.get("font-style"), Some("italic"));
        assert_eq!(css.get("color"), Some("#000000"));
        assert_eq!(node.content, NodeContent::Text { html: "<b>x</b>".into() });
    }

    #[test]
    fn test_shape_defaults_transparent() {
        let rendered = render(&doc_with(vec![shape("s", 0)]), 0, 1.0);
        let css = &rendered.as_page().unwrap().nodes[0].style;
        assert_eq!(css.get("background-color"), Some("transparent"));
        assert_eq!(css.get("color"), None);
        assert_eq!(css.get("transform"), None);
    }

    #[test]
    fn test_unknown_type_skipped_with_warning() {
        let doc = CanvasDocument::from_json(
            &json!({"pages": [{"elements": [
                {"id": "a", "type": "text", "content": "hi"},
                {"id": "x", "type": "bogus"},
                {"id": "b", "type": "image", "src": "p.png"}
            ]}]})
            .to_string(),
        )
        .unwrap();
        let rendered = render(&doc, 0, 1.0);
        assert_eq!(order(&rendered), vec!["a", "b"]);
        assert_eq!(
            rendered.as_page().unwrap().warnings,
            vec![RenderWarning::UnknownType {
                element_id: "x".into(),
                type_tag: "bogus".into()
            }]
        );
    }

    #[test]
    fn test_link_wraps_non_button() {
        let img = Element::with_id("i", ElementKind::image("a.png", "A"), Geometry::default())
            .unwrap()
            .linked("https://example.com");
        let rendered = render(&doc_with(vec![img]), 0, 1.0);
        let node = &rendered.as_page().unwrap().nodes[0];
        assert_eq!(node.link.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_style_block_set_overwrites() {
        let mut css = StyleBlock::new();
        css.set("color", "red");
        css.set("left", "0");
        css.set("color", "blue");
        assert_eq!(css.to_css(), "color:blue;left:0");
    }
}
