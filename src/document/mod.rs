//! # Canvas Document Model
//!
//! A single type hierarchy that is both the Rust API and the persisted JSON.
//! [`CanvasDocument`] is constructible in Rust and deserializable from JSON.
//!
//! ```
//! use canvasmail::document::*;
//!
//! // Rust construction
//! let mut doc = CanvasDocument::new();
//! let title = Element::with_id(
//!     "title",
//!     ElementKind::text("<h1>Hello</h1>"),
//!     Geometry::new(40.0, 40.0, 520.0, 60.0),
//! )?;
//! doc.active_page_mut().unwrap().insert(title)?;
//!
//! // JSON deserialization
//! let same = CanvasDocument::from_json(&doc.to_json()?)?;
//! assert_eq!(same, doc);
//! # Ok::<(), canvasmail::CanvasError>(())
//! ```
//!
//! Edits are whole-element replacements: callers build a complete new
//! [`Element`] and hand it to [`Page::replace`]. That keeps snapshots
//! (see [`crate::editor`]) a plain `clone()`.

pub mod types;

pub use types::*;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CanvasError, Result};

/// Zoom step used by [`CanvasDocument::zoom_in`] / [`CanvasDocument::zoom_out`].
pub const ZOOM_STEP: f64 = 0.1;
/// Smallest zoom reachable by stepping.
pub const MIN_ZOOM: f64 = 0.25;
/// Largest zoom reachable by stepping.
pub const MAX_ZOOM: f64 = 3.0;

fn default_zoom() -> f64 {
    1.0
}

// ============================================================================
// PAGE
// ============================================================================

/// An ordered sequence of elements. Order is paint order at equal `zIndex`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, deserialize_with = "deserialize_elements")]
    elements: Vec<Element>,
    /// Unrecognised JSON fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deserialize a page's elements, rejecting duplicate ids and reporting
/// the failing index.
fn deserialize_elements<'de, D>(deserializer: D) -> std::result::Result<Vec<Element>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<Value> = Vec::deserialize(deserializer)?;
    let mut elements: Vec<Element> = Vec::with_capacity(values.len());
    for (i, v) in values.into_iter().enumerate() {
        let el: Element = serde_json::from_value(v)
            .map_err(|e| serde::de::Error::custom(format!("elements[{}]: {}", i, e)))?;
        if elements.iter().any(|other| other.id() == el.id()) {
            return Err(serde::de::Error::custom(format!(
                "elements[{}]: duplicate element id '{}'",
                i,
                el.id()
            )));
        }
        elements.push(el);
    }
    Ok(elements)
}

impl Page {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a page from elements, rejecting duplicate ids.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Result<Self> {
        let mut page = Page::new();
        for el in elements {
            page.insert(el)?;
        }
        Ok(page)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.elements
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| CanvasError::not_found(format!("element '{}'", id)))
    }

    fn check_insertable(&self, element: &Element) -> Result<()> {
        if self.get(element.id()).is_some() {
            return Err(CanvasError::validation(format!(
                "duplicate element id '{}'",
                element.id()
            )));
        }
        element.validate()
    }

    /// Append an element on top of the page.
    pub fn insert(&mut self, element: Element) -> Result<()> {
        self.check_insertable(&element)?;
        self.elements.push(element);
        Ok(())
    }

    /// Insert an element at `index` (0 = bottom).
    pub fn insert_at(&mut self, index: usize, element: Element) -> Result<()> {
        if index > self.elements.len() {
            return Err(CanvasError::validation(format!(
                "insert index {} out of range (page has {} elements)",
                index,
                self.elements.len()
            )));
        }
        self.check_insertable(&element)?;
        self.elements.insert(index, element);
        Ok(())
    }

    /// Replace the element with `id` by a complete new value.
    ///
    /// The replacement must carry the same id and the same type.
    pub fn replace(&mut self, id: &str, element: Element) -> Result<()> {
        let idx = self.position(id)?;
        let current = &self.elements[idx];
        if element.id() != id {
            return Err(CanvasError::validation(format!(
                "replacement for '{}' carries id '{}'",
                id,
                element.id()
            )));
        }
        if element.type_tag() != current.type_tag() {
            return Err(CanvasError::validation(format!(
                "element '{}' is a {}; create a new element instead of changing it to {}",
                id,
                current.type_tag(),
                element.type_tag()
            )));
        }
        element.validate()?;
        self.elements[idx] = element;
        Ok(())
    }

    /// Remove and return the element with `id`.
    pub fn remove(&mut self, id: &str) -> Result<Element> {
        let idx = self.position(id)?;
        Ok(self.elements.remove(idx))
    }

    /// Move the element with `id` to `index` in paint order.
    pub fn move_to(&mut self, id: &str, index: usize) -> Result<()> {
        let from = self.position(id)?;
        if index >= self.elements.len() {
            return Err(CanvasError::validation(format!(
                "move index {} out of range (page has {} elements)",
                index,
                self.elements.len()
            )));
        }
        let el = self.elements.remove(from);
        self.elements.insert(index, el);
        Ok(())
    }

    pub fn bring_to_front(&mut self, id: &str) -> Result<()> {
        let last = self.elements.len().saturating_sub(1);
        self.move_to(id, last)
    }

    pub fn send_to_back(&mut self, id: &str) -> Result<()> {
        self.move_to(id, 0)
    }

    /// Deep copy with fresh element ids.
    pub fn duplicate(&self) -> Page {
        Page {
            elements: self.elements.iter().map(Element::with_fresh_id).collect(),
            extra: self.extra.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a Page {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

// ============================================================================
// CANVAS DOCUMENT
// ============================================================================

/// The full editable state of one email template.
///
/// Invariant: when `pages` is non-empty, `active_page_index < pages.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDocument", into = "RawDocument")]
pub struct CanvasDocument {
    pages: Vec<Page>,
    active_page_index: usize,
    zoom_level: f64,
    /// Unrecognised JSON fields, preserved verbatim.
    pub extra: Map<String, Value>,
}

/// Wire form of a [`CanvasDocument`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    pages: Vec<Page>,
    #[serde(default)]
    active_page_index: usize,
    #[serde(default = "default_zoom")]
    zoom_level: f64,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn check_zoom(zoom: f64) -> Result<()> {
    if !zoom.is_finite() || zoom <= 0.0 {
        return Err(CanvasError::validation(format!(
            "zoomLevel must be a positive number (got {})",
            zoom
        )));
    }
    Ok(())
}

impl TryFrom<RawDocument> for CanvasDocument {
    type Error = CanvasError;

    fn try_from(raw: RawDocument) -> Result<Self> {
        check_zoom(raw.zoom_level)?;
        if !raw.pages.is_empty() && raw.active_page_index >= raw.pages.len() {
            return Err(CanvasError::validation(format!(
                "activePageIndex {} out of range ({} pages)",
                raw.active_page_index,
                raw.pages.len()
            )));
        }
        Ok(Self {
            pages: raw.pages,
            active_page_index: raw.active_page_index,
            zoom_level: raw.zoom_level,
            extra: raw.extra,
        })
    }
}

impl From<CanvasDocument> for RawDocument {
    fn from(doc: CanvasDocument) -> Self {
        Self {
            pages: doc.pages,
            active_page_index: doc.active_page_index,
            zoom_level: doc.zoom_level,
            extra: doc.extra,
        }
    }
}

impl Default for CanvasDocument {
    /// A document with no pages, zoom 1.
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            active_page_index: 0,
            zoom_level: 1.0,
            extra: Map::new(),
        }
    }
}

impl CanvasDocument {
    /// A document with one empty page.
    pub fn new() -> Self {
        Self::from_pages(vec![Page::new()])
    }

    /// A document over the given pages, first page active, zoom 1.
    pub fn from_pages(pages: Vec<Page>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn active_page_index(&self) -> usize {
        self.active_page_index
    }

    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    /// The active page, or `None` when the document has no pages.
    pub fn active_page(&self) -> Option<&Page> {
        self.pages.get(self.active_page_index)
    }

    pub fn active_page_mut(&mut self) -> Option<&mut Page> {
        self.pages.get_mut(self.active_page_index)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.pages.len() {
            return Err(CanvasError::validation(format!(
                "page index {} out of range ({} pages)",
                index,
                self.pages.len()
            )));
        }
        Ok(())
    }

    pub fn set_active_page(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.active_page_index = index;
        Ok(())
    }

    /// Append a page and return its index.
    pub fn add_page(&mut self, page: Page) -> usize {
        self.pages.push(page);
        self.pages.len() - 1
    }

    /// Insert a page at `index`; the active page stays the same page.
    pub fn insert_page(&mut self, index: usize, page: Page) -> Result<()> {
        if index > self.pages.len() {
            return Err(CanvasError::validation(format!(
                "insert index {} out of range ({} pages)",
                index,
                self.pages.len()
            )));
        }
        let had_pages = !self.pages.is_empty();
        self.pages.insert(index, page);
        if had_pages && index <= self.active_page_index {
            self.active_page_index += 1;
        }
        Ok(())
    }

    /// Remove and return a page, keeping the active index valid.
    pub fn remove_page(&mut self, index: usize) -> Result<Page> {
        self.check_index(index)?;
        let page = self.pages.remove(index);
        if index < self.active_page_index {
            self.active_page_index -= 1;
        }
        if self.active_page_index >= self.pages.len() {
            self.active_page_index = self.pages.len().saturating_sub(1);
        }
        Ok(page)
    }

    /// Duplicate a page (fresh element ids) right after it. Returns the new index.
    pub fn duplicate_page(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        let copy = self.pages[index].duplicate();
        self.insert_page(index + 1, copy)?;
        Ok(index + 1)
    }

    /// Move a page; the active page follows its page.
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let active = self.active_page_index;
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        self.active_page_index = if active == from {
            to
        } else if from < active && active <= to {
            active - 1
        } else if to <= active && active < from {
            active + 1
        } else {
            active
        };
        Ok(())
    }

    /// Set the presentation zoom. Geometry is untouched.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        check_zoom(zoom)?;
        self.zoom_level = zoom;
        Ok(())
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.zoom_level = step_zoom(self.zoom_level, ZOOM_STEP);
        self.zoom_level
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.zoom_level = step_zoom(self.zoom_level, -ZOOM_STEP);
        self.zoom_level
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Step zoom and round to two decimals so repeated steps don't drift.
fn step_zoom(current: f64, delta: f64) -> f64 {
    let next = ((current + delta) * 100.0).round() / 100.0;
    next.clamp(MIN_ZOOM, MAX_ZOOM)
}
