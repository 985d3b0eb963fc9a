//! # canvasmail - Email Template Canvas
//!
//! A positioned-element document model for email templates: text, image,
//! button, video, audio and shape elements placed on one or more pages,
//! serialized to JSON, rendered to editor-preview and email HTML, and
//! persisted per user.
//!
//! ## Quick Start
//!
//! ```
//! use canvasmail::{catalog, document::{Element, ElementKind, Geometry}, render};
//!
//! // Seed a document from a built-in template
//! let mut doc = catalog::instantiate_document("t1")?;
//!
//! // Add a line of text to the active page
//! let page = doc.active_page_mut().expect("one page");
//! let note = Element::new(
//!     ElementKind::text("<p>Thanks for joining!</p>"),
//!     Geometry::new(50.0, 300.0, 500.0, 40.0),
//! )?;
//! page.insert(note)?;
//!
//! // Render the editor preview at 50%
//! let rendered = render::render(&doc, 0, 0.5);
//! let html = render::html::preview_html(&rendered);
//! assert!(html.contains("Thanks for joining!"));
//!
//! # Ok::<(), canvasmail::CanvasError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`document`] | Elements, pages and the canvas document |
//! | [`editor`] | Edit sessions with undo/redo |
//! | [`catalog`] | Built-in starter templates |
//! | [`render`] | Visual tree and HTML output |
//! | [`store`] | Saved-template persistence |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod catalog;
pub mod document;
pub mod editor;
pub mod error;
pub mod render;
pub mod server;
pub mod store;

// Re-exports for convenience
pub use document::{CanvasDocument, Element, Page};
pub use error::CanvasError;
