//! Element types for the canvas document model.
//!
//! All types derive `Serialize + Deserialize` so the same types work for
//! both Rust API construction and the persisted JSON document.
//!
//! The JSON form of an [`Element`] is a flat camelCase object:
//!
//! ```json
//! {"id": "cta", "type": "button", "x": 200, "y": 400, "width": 200, "height": 48,
//!  "label": "Get started", "link": "https://example.com"}
//! ```
//!
//! Fields the model does not know about are kept in [`Element::extra`] and
//! written back unchanged, so documents from newer clients survive a
//! load/save cycle.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{CanvasError, Result};

/// Generate a fresh element id.
pub fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Accepts either a string or an integer and stores it as a string.
///
/// Older documents used numeric (timestamp) ids.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdValue {
        Text(String),
        Int(i64),
    }

    match IdValue::deserialize(deserializer)? {
        IdValue::Text(s) => Ok(s),
        IdValue::Int(n) => Ok(n.to_string()),
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

// ============================================================================
// TAGS
// ============================================================================

/// The closed set of element kinds the builder can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Text,
    Image,
    Button,
    Video,
    Audio,
    Shape,
}

impl ElementType {
    /// Every supported type, in builder palette order.
    pub const ALL: [ElementType; 6] = [
        ElementType::Text,
        ElementType::Image,
        ElementType::Button,
        ElementType::Video,
        ElementType::Audio,
        ElementType::Shape,
    ];

    /// The JSON `type` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Text => "text",
            ElementType::Image => "image",
            ElementType::Button => "button",
            ElementType::Video => "video",
            ElementType::Audio => "audio",
            ElementType::Shape => "shape",
        }
    }
}

impl FromStr for ElementType {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        ElementType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CanvasError::validation(format!("unknown element type '{}'", s)))
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_css(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// CSS `object-fit` for images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectFit {
    #[default]
    Cover,
    Contain,
    Fill,
    #[serde(rename = "none")]
    NoScale,
    ScaleDown,
}

impl ObjectFit {
    pub fn as_css(&self) -> &'static str {
        match self {
            ObjectFit::Cover => "cover",
            ObjectFit::Contain => "contain",
            ObjectFit::Fill => "fill",
            ObjectFit::NoScale => "none",
            ObjectFit::ScaleDown => "scale-down",
        }
    }
}

// ============================================================================
// GEOMETRY & STYLE
// ============================================================================

/// Position and size in canvas-space pixels. Never scaled by zoom.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Paint order; ties are broken by position in the page.
    pub z_index: i32,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Default::default()
        }
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn layer(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("x", self.x), ("y", self.y), ("rotation", self.rotation)] {
            if !value.is_finite() {
                return Err(CanvasError::validation(format!("{} must be finite", name)));
            }
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value < 0.0 {
                return Err(CanvasError::validation(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Visual style. Absent fields fall back to renderer defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    /// 0.0 (transparent) to 1.0 (opaque).
    pub opacity: Option<f64>,
    pub font_size: Option<f64>,
    pub color: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub background_color: Option<String>,
    pub border_radius: Option<f64>,
    /// CSS border shorthand, e.g. `"1px solid #ddd"`.
    pub border: Option<String>,
    pub align: Option<Align>,
}

impl Style {
    /// Only opacity is checked. A non-positive `font_size` is left for the
    /// renderer, which falls back to its default and reports a warning.
    pub fn validate(&self) -> Result<()> {
        if let Some(opacity) = self.opacity
            && !(0.0..=1.0).contains(&opacity)
        {
            return Err(CanvasError::validation(format!(
                "opacity must be within [0, 1] (got {})",
                opacity
            )));
        }
        Ok(())
    }
}

// ============================================================================
// ELEMENT
// ============================================================================

/// Type-specific payload of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Rich-text / HTML fragment, rendered verbatim.
    Text { content: String },
    Image {
        src: String,
        alt: Option<String>,
        object_fit: Option<ObjectFit>,
    },
    /// Clickable button; its target is [`Element::link`].
    Button { label: String },
    Video { src: String },
    Audio { src: String },
    Shape,
    /// A `type` tag this version does not know. Kept for round-tripping;
    /// the renderer skips it.
    Unknown(String),
}

impl ElementKind {
    /// An empty payload of the given type.
    pub fn empty(ty: ElementType) -> Self {
        match ty {
            ElementType::Text => ElementKind::Text {
                content: String::new(),
            },
            ElementType::Image => ElementKind::Image {
                src: String::new(),
                alt: None,
                object_fit: None,
            },
            ElementType::Button => ElementKind::Button {
                label: String::new(),
            },
            ElementType::Video => ElementKind::Video { src: String::new() },
            ElementType::Audio => ElementKind::Audio { src: String::new() },
            ElementType::Shape => ElementKind::Shape,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        ElementKind::Text {
            content: content.into(),
        }
    }

    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        ElementKind::Image {
            src: src.into(),
            alt: Some(alt.into()),
            object_fit: None,
        }
    }

    pub fn button(label: impl Into<String>) -> Self {
        ElementKind::Button {
            label: label.into(),
        }
    }

    /// The supported type, or `None` for [`ElementKind::Unknown`].
    pub fn element_type(&self) -> Option<ElementType> {
        match self {
            ElementKind::Text { .. } => Some(ElementType::Text),
            ElementKind::Image { .. } => Some(ElementType::Image),
            ElementKind::Button { .. } => Some(ElementType::Button),
            ElementKind::Video { .. } => Some(ElementType::Video),
            ElementKind::Audio { .. } => Some(ElementType::Audio),
            ElementKind::Shape => Some(ElementType::Shape),
            ElementKind::Unknown(_) => None,
        }
    }

    /// The JSON `type` tag, including unknown ones.
    pub fn type_tag(&self) -> &str {
        match self {
            ElementKind::Unknown(tag) => tag,
            other => other.element_type().map(|t| t.as_str()).unwrap_or_default(),
        }
    }
}

/// A single positioned visual node on a page.
///
/// `id` and the element's type are fixed at construction. Edits replace the
/// whole element (see [`crate::document::Page::replace`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawElement", into = "RawElement")]
pub struct Element {
    id: String,
    kind: ElementKind,
    pub geometry: Geometry,
    pub style: Style,
    /// Optional click target. Buttons default to `#` when absent.
    pub link: Option<String>,
    /// Unrecognised JSON fields, preserved verbatim.
    pub extra: Map<String, Value>,
}

impl Element {
    /// Create an element with a fresh id.
    pub fn new(kind: ElementKind, geometry: Geometry) -> Result<Self> {
        Self::with_id(fresh_id(), kind, geometry)
    }

    /// Create an element with a caller-chosen id.
    ///
    /// Rejects unknown kinds, empty ids, and invalid geometry.
    pub fn with_id(id: impl Into<String>, kind: ElementKind, geometry: Geometry) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CanvasError::validation("element id must not be empty"));
        }
        if let ElementKind::Unknown(tag) = &kind {
            return Err(CanvasError::validation(format!(
                "unknown element type '{}'",
                tag
            )));
        }
        geometry.validate()?;
        Ok(Self {
            id,
            kind,
            geometry,
            style: Style::default(),
            link: None,
            extra: Map::new(),
        })
    }

    /// Build seed data without validation. Only for constant catalog content.
    pub(crate) fn seed(id: &str, kind: ElementKind, geometry: Geometry, style: Style) -> Self {
        Self {
            id: id.to_string(),
            kind,
            geometry,
            style,
            link: None,
            extra: Map::new(),
        }
    }

    /// Create an empty element from a type tag such as `"button"`.
    pub fn from_tag(id: impl Into<String>, tag: &str, geometry: Geometry) -> Result<Self> {
        let ty: ElementType = tag.parse()?;
        Self::with_id(id, ElementKind::empty(ty), geometry)
    }

    /// Replace the style, validating it.
    pub fn styled(mut self, style: Style) -> Result<Self> {
        style.validate()?;
        self.style = style;
        Ok(self)
    }

    pub fn linked(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn type_tag(&self) -> &str {
        self.kind.type_tag()
    }

    /// Swap the payload for one of the same type.
    pub fn set_payload(&mut self, kind: ElementKind) -> Result<()> {
        if kind.type_tag() != self.kind.type_tag() {
            return Err(CanvasError::validation(format!(
                "element '{}' is a {}; cannot change it to {}",
                self.id,
                self.kind.type_tag(),
                kind.type_tag()
            )));
        }
        self.kind = kind;
        Ok(())
    }

    /// Same element with a new id (used when duplicating pages).
    pub(crate) fn with_fresh_id(&self) -> Self {
        Self {
            id: fresh_id(),
            ..self.clone()
        }
    }

    /// Validate geometry and style after direct field edits.
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        self.style.validate()
    }
}

// ============================================================================
// JSON FORM
// ============================================================================

/// Flat wire form of an [`Element`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawElement {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(rename = "type")]
    type_tag: String,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    rotation: f64,
    #[serde(default)]
    z_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    underline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    border: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    align: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    object_fit: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Move a payload field the element's type does not use into `extra`.
fn stash<T: Serialize>(extra: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(v) = value
        && let Ok(json) = serde_json::to_value(v)
    {
        extra.insert(key.to_string(), json);
    }
}

/// Parse an enum-valued field. Values this version does not know go to
/// `extra` untouched and the field reads as absent.
fn lenient<T: DeserializeOwned>(
    extra: &mut Map<String, Value>,
    key: &str,
    value: Option<Value>,
) -> Option<T> {
    let value = value?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            extra.insert(key.to_string(), value);
            None
        }
    }
}

impl TryFrom<RawElement> for Element {
    type Error = CanvasError;

    fn try_from(raw: RawElement) -> Result<Self> {
        if raw.id.trim().is_empty() {
            return Err(CanvasError::validation("element id must not be empty"));
        }
        let mut extra = raw.extra;
        let align = lenient(&mut extra, "align", raw.align);
        let (content, src, alt, object_fit, label) =
            (raw.content, raw.src, raw.alt, raw.object_fit, raw.label);

        let kind = match raw.type_tag.parse::<ElementType>() {
            Ok(ElementType::Text) => {
                stash(&mut extra, "src", src);
                stash(&mut extra, "alt", alt);
                stash(&mut extra, "objectFit", object_fit);
                stash(&mut extra, "label", label);
                ElementKind::Text {
                    content: content.unwrap_or_default(),
                }
            }
            Ok(ElementType::Image) => {
                stash(&mut extra, "content", content);
                stash(&mut extra, "label", label);
                ElementKind::Image {
                    src: src.unwrap_or_default(),
                    alt,
                    object_fit: lenient(&mut extra, "objectFit", object_fit),
                }
            }
            Ok(ElementType::Button) => {
                stash(&mut extra, "content", content);
                stash(&mut extra, "src", src);
                stash(&mut extra, "alt", alt);
                stash(&mut extra, "objectFit", object_fit);
                ElementKind::Button {
                    label: label.unwrap_or_default(),
                }
            }
            Ok(ty @ (ElementType::Video | ElementType::Audio)) => {
                stash(&mut extra, "content", content);
                stash(&mut extra, "alt", alt);
                stash(&mut extra, "objectFit", object_fit);
                stash(&mut extra, "label", label);
                let src = src.unwrap_or_default();
                if ty == ElementType::Video {
                    ElementKind::Video { src }
                } else {
                    ElementKind::Audio { src }
                }
            }
            parsed => {
                stash(&mut extra, "content", content);
                stash(&mut extra, "src", src);
                stash(&mut extra, "alt", alt);
                stash(&mut extra, "objectFit", object_fit);
                stash(&mut extra, "label", label);
                match parsed {
                    Ok(_) => ElementKind::Shape,
                    Err(_) => ElementKind::Unknown(raw.type_tag),
                }
            }
        };

        let element = Element {
            id: raw.id,
            kind,
            geometry: Geometry {
                x: raw.x,
                y: raw.y,
                width: raw.width,
                height: raw.height,
                rotation: raw.rotation,
                z_index: raw.z_index,
            },
            style: Style {
                opacity: raw.opacity,
                font_size: raw.font_size,
                color: raw.color,
                bold: raw.bold,
                italic: raw.italic,
                underline: raw.underline,
                background_color: raw.background_color,
                border_radius: raw.border_radius,
                border: raw.border,
                align,
            },
            link: raw.link,
            extra,
        };
        element
            .validate()
            .map_err(|e| CanvasError::validation(format!("element '{}': {}", element.id, e)))?;
        Ok(element)
    }
}

impl From<Element> for RawElement {
    fn from(el: Element) -> Self {
        let type_tag = el.kind.type_tag().to_string();
        let mut raw = RawElement {
            id: el.id,
            type_tag,
            x: el.geometry.x,
            y: el.geometry.y,
            width: el.geometry.width,
            height: el.geometry.height,
            rotation: el.geometry.rotation,
            z_index: el.geometry.z_index,
            opacity: el.style.opacity,
            font_size: el.style.font_size,
            color: el.style.color,
            bold: el.style.bold,
            italic: el.style.italic,
            underline: el.style.underline,
            background_color: el.style.background_color,
            border_radius: el.style.border_radius,
            border: el.style.border,
            align: el.style.align.and_then(|a| serde_json::to_value(a).ok()),
            link: el.link,
            content: None,
            src: None,
            alt: None,
            object_fit: None,
            label: None,
            extra: el.extra,
        };
        match el.kind {
            ElementKind::Text { content } => raw.content = Some(content),
            ElementKind::Image {
                src,
                alt,
                object_fit,
            } => {
                raw.src = Some(src);
                raw.alt = alt;
                raw.object_fit = object_fit.and_then(|f| serde_json::to_value(f).ok());
            }
            ElementKind::Button { label } => raw.label = Some(label),
            ElementKind::Video { src } | ElementKind::Audio { src } => raw.src = Some(src),
            ElementKind::Shape | ElementKind::Unknown(_) => {}
        }
        // A value set in Rust replaces one kept from an older load.
        if raw.align.is_some() {
            raw.extra.remove("align");
        }
        if raw.object_fit.is_some() {
            raw.extra.remove("objectFit");
        }
        raw
    }
}
