//! # Template Catalog
//!
//! Built-in starter templates used to seed a new campaign.
//!
//! The catalog is static seed data: [`list_templates`] rebuilds it on every
//! call and [`instantiate`] hands out deep copies, so nothing a caller does to
//! an instantiated page can leak back into the catalog.

use serde::Serialize;

use crate::document::{
    Align, CanvasDocument, Element, ElementKind, Geometry, ObjectFit, Page, Style,
};
use crate::error::{CanvasError, Result};

/// A read-only starter template (one page of elements).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub category: String,
    pub elements: Vec<Element>,
}

impl CatalogEntry {
    fn new(id: &str, name: &str, category: &str, elements: Vec<Element>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            elements,
        }
    }
}

// ============================================================================
// STYLE HELPERS
// ============================================================================

fn heading(size: f64, color: &str) -> Style {
    Style {
        font_size: Some(size),
        color: Some(color.to_string()),
        bold: true,
        align: Some(Align::Center),
        ..Default::default()
    }
}

fn body(size: f64, color: &str) -> Style {
    Style {
        font_size: Some(size),
        color: Some(color.to_string()),
        align: Some(Align::Left),
        ..Default::default()
    }
}

fn fill(color: &str, radius: f64) -> Style {
    Style {
        background_color: Some(color.to_string()),
        border_radius: Some(radius),
        ..Default::default()
    }
}

fn button(id: &str, label: &str, link: &str, geometry: Geometry) -> Element {
    Element::seed(
        id,
        ElementKind::button(label),
        geometry,
        Style {
            font_size: Some(18.0),
            bold: true,
            align: Some(Align::Center),
            ..Default::default()
        },
    )
    .linked(link)
}

// ============================================================================
// TEMPLATES
// ============================================================================

fn welcome_email() -> CatalogEntry {
    CatalogEntry::new(
        "t1",
        "Welcome Email",
        "onboarding",
        vec![
            Element::seed(
                "title",
                ElementKind::text("<h1>Welcome aboard!</h1>"),
                Geometry::new(50.0, 60.0, 500.0, 60.0),
                heading(32.0, "#1f2937"),
            ),
            Element::seed(
                "text",
                ElementKind::text(
                    "<p>Thanks for signing up. We're glad to have you with us. \
                     Here's everything you need to get started.</p>",
                ),
                Geometry::new(50.0, 150.0, 500.0, 120.0),
                body(16.0, "#4b5563"),
            ),
            button(
                "button",
                "Get Started",
                "https://example.com/start",
                Geometry::new(200.0, 300.0, 200.0, 50.0),
            ),
        ],
    )
}

fn monthly_newsletter() -> CatalogEntry {
    CatalogEntry::new(
        "t2",
        "Monthly Newsletter",
        "newsletter",
        vec![
            Element::seed(
                "banner",
                ElementKind::Image {
                    src: "https://placehold.co/600x200".to_string(),
                    alt: Some("Newsletter banner".to_string()),
                    object_fit: Some(ObjectFit::Cover),
                },
                Geometry::new(0.0, 0.0, 600.0, 200.0),
                Style::default(),
            ),
            Element::seed(
                "headline",
                ElementKind::text("<h2>This Month's Highlights</h2>"),
                Geometry::new(40.0, 230.0, 520.0, 50.0),
                heading(26.0, "#111827"),
            ),
            Element::seed(
                "story",
                ElementKind::text(
                    "<p>Catch up on product updates, customer stories and tips \
                     from our team.</p>",
                ),
                Geometry::new(40.0, 300.0, 520.0, 140.0),
                body(16.0, "#374151"),
            ),
            Element::seed(
                "rule",
                ElementKind::Shape,
                Geometry::new(40.0, 460.0, 520.0, 2.0),
                fill("#e5e7eb", 0.0),
            ),
            button(
                "read-more",
                "Read More",
                "https://example.com/blog",
                Geometry::new(200.0, 490.0, 200.0, 48.0),
            ),
        ],
    )
}

fn flash_sale() -> CatalogEntry {
    CatalogEntry::new(
        "t3",
        "Flash Sale",
        "promotion",
        vec![
            Element::seed(
                "backdrop",
                ElementKind::Shape,
                Geometry::new(30.0, 40.0, 540.0, 360.0),
                fill("#fef3c7", 16.0),
            ),
            Element::seed(
                "headline",
                ElementKind::text("<h1>48-Hour Flash Sale</h1>"),
                Geometry::new(60.0, 80.0, 480.0, 60.0),
                heading(34.0, "#92400e"),
            ),
            Element::seed(
                "offer",
                ElementKind::text("<p><strong>30% off</strong> everything in store.</p>"),
                Geometry::new(60.0, 170.0, 480.0, 60.0),
                Style {
                    align: Some(Align::Center),
                    ..body(20.0, "#78350f")
                },
            ),
            button(
                "shop",
                "Shop Now",
                "https://example.com/sale",
                Geometry::new(200.0, 280.0, 200.0, 56.0).layer(1),
            ),
        ],
    )
}

fn product_launch() -> CatalogEntry {
    CatalogEntry::new(
        "t4",
        "Product Launch",
        "announcement",
        vec![
            Element::seed(
                "title",
                ElementKind::text("<h1>Meet the new release</h1>"),
                Geometry::new(50.0, 40.0, 500.0, 60.0),
                heading(30.0, "#0f172a"),
            ),
            Element::seed(
                "teaser",
                ElementKind::Video {
                    src: "https://example.com/launch.mp4".to_string(),
                },
                Geometry::new(50.0, 120.0, 500.0, 280.0),
                Style::default(),
            ),
            Element::seed(
                "summary",
                ElementKind::text("<p>Faster, simpler and built around your feedback.</p>"),
                Geometry::new(50.0, 420.0, 500.0, 80.0),
                body(16.0, "#334155"),
            ),
            button(
                "learn-more",
                "Learn More",
                "https://example.com/launch",
                Geometry::new(200.0, 520.0, 200.0, 50.0),
            ),
        ],
    )
}

fn event_invitation() -> CatalogEntry {
    CatalogEntry::new(
        "t5",
        "Event Invitation",
        "event",
        vec![
            Element::seed(
                "frame",
                ElementKind::Shape,
                Geometry::new(20.0, 20.0, 560.0, 560.0),
                Style {
                    border: Some("2px solid #c2831f".to_string()),
                    ..fill("transparent", 12.0)
                },
            ),
            Element::seed(
                "title",
                ElementKind::text("<h1>You're Invited</h1>"),
                Geometry::new(60.0, 70.0, 480.0, 60.0),
                heading(32.0, "#c2831f"),
            ),
            Element::seed(
                "details",
                ElementKind::text("<p>Join us for an evening of talks and networking.</p>"),
                Geometry::new(60.0, 160.0, 480.0, 100.0),
                Style {
                    align: Some(Align::Center),
                    ..body(18.0, "#1f2937")
                },
            ),
            Element::seed(
                "jingle",
                ElementKind::Audio {
                    src: "https://example.com/invite.mp3".to_string(),
                },
                Geometry::new(150.0, 290.0, 300.0, 40.0),
                Style::default(),
            ),
            button(
                "rsvp",
                "RSVP",
                "https://example.com/rsvp",
                Geometry::new(200.0, 380.0, 200.0, 50.0),
            ),
        ],
    )
}

fn blank_canvas() -> CatalogEntry {
    CatalogEntry::new("t6", "Blank Canvas", "basic", Vec::new())
}

// ============================================================================
// LOOKUP
// ============================================================================

/// All built-in templates, in display order.
pub fn list_templates() -> Vec<CatalogEntry> {
    vec![
        welcome_email(),
        monthly_newsletter(),
        flash_sale(),
        product_launch(),
        event_invitation(),
        blank_canvas(),
    ]
}

/// Look up a template by id.
pub fn get(id: &str) -> Option<CatalogEntry> {
    list_templates().into_iter().find(|t| t.id == id)
}

/// Copy a template's elements into a new, independent page.
pub fn instantiate(id: &str) -> Result<Page> {
    let entry = get(id).ok_or_else(|| CanvasError::not_found(format!("template '{}'", id)))?;
    Page::from_elements(entry.elements)
}

/// A one-page document seeded from a template, zoom 1.
pub fn instantiate_document(id: &str) -> Result<CanvasDocument> {
    Ok(CanvasDocument::from_pages(vec![instantiate(id)?]))
}
