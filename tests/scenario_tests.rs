//! # Scenario Tests
//!
//! End-to-end flows through the library: seed from the catalog, edit,
//! render, persist, reload.

use pretty_assertions::assert_eq;

use canvasmail::catalog;
use canvasmail::document::{CanvasDocument, Element, ElementKind, Geometry, ObjectFit, Page};
use canvasmail::editor::EditSession;
use canvasmail::render::{self, NodeContent, RenderWarning, html};
use canvasmail::store::{FileStore, MemoryStore, SaveTemplate, TemplateStore, UserId};

#[tokio::test]
async fn welcome_template_saved_for_user() {
    let store = MemoryStore::new();
    let doc = catalog::instantiate_document("t1").unwrap();
    store
        .save(SaveTemplate::new(42u64, "t1-copy", "Welcome Email", doc))
        .await
        .unwrap();

    let records = store.list(&UserId::from(42u64)).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].template_id, "t1-copy");
    assert_eq!(records[0].content.pages()[0].len(), 3);
}

#[test]
fn bogus_type_renders_nothing_but_the_rest() {
    let doc = CanvasDocument::from_json(
        r#"{
            "pages": [{"elements": [
                {"id": "x", "type": "bogus", "x": 10, "y": 10, "width": 50, "height": 50},
                {"id": "t", "type": "text", "content": "<b>hi</b>", "width": 200, "height": 40}
            ]}],
            "activePageIndex": 0,
            "zoomLevel": 1
        }"#,
    )
    .unwrap();

    let rendered = render::render(&doc, 0, 1.0);
    let page = rendered.as_page().unwrap();
    assert_eq!(page.nodes.len(), 1);
    assert_eq!(page.nodes[0].element_id, "t");
    assert_eq!(
        page.warnings,
        vec![RenderWarning::UnknownType {
            element_id: "x".to_string(),
            type_tag: "bogus".to_string(),
        }]
    );

    // The unknown element survives a save/load cycle untouched.
    let reloaded = CanvasDocument::from_json(&doc.to_json().unwrap()).unwrap();
    assert_eq!(reloaded, doc);
    assert_eq!(reloaded.pages()[0].get("x").unwrap().type_tag(), "bogus");
}

#[test]
fn newer_style_values_do_not_sink_the_document() {
    let doc = CanvasDocument::from_json(
        r#"{
            "pages": [{"elements": [
                {"id": "p", "type": "poll", "align": "justify"},
                {"id": "i", "type": "image", "src": "a.png", "objectFit": "tile", "width": 50, "height": 50},
                {"id": "a", "type": "text", "content": "small", "fontSize": 0, "width": 100, "height": 20},
                {"id": "b", "type": "text", "content": "kept", "width": 100, "height": 20}
            ]}]
        }"#,
    )
    .unwrap();

    let rendered = render::render(&doc, 0, 1.0);
    let page = rendered.as_page().unwrap();
    let ids: Vec<_> = page.nodes.iter().map(|n| n.element_id.as_str()).collect();
    assert_eq!(ids, vec!["i", "a", "b"]);
    assert_eq!(page.warnings.len(), 2);
    assert!(matches!(
        page.nodes[0].content,
        NodeContent::Image { object_fit: ObjectFit::Cover, .. }
    ));

    let saved = doc.to_json().unwrap();
    assert!(saved.contains(r#""align":"justify""#));
    assert!(saved.contains(r#""objectFit":"tile""#));
    assert_eq!(CanvasDocument::from_json(&saved).unwrap(), doc);
}

#[test]
fn half_zoom_halves_the_canvas_only() {
    let doc = catalog::instantiate_document("t1").unwrap();
    let rendered = render::render(&doc, 0, 0.5);
    let page = rendered.as_page().unwrap();
    assert_eq!((page.canvas.width, page.canvas.height), (300.0, 400.0));
    assert_eq!(page.canvas.scale, 0.5);

    // Element coordinates stay in base units; the stage does the scaling.
    let title = page.nodes.iter().find(|n| n.element_id == "title").unwrap();
    assert_eq!(title.style.get("left"), Some("50px"));

    let markup = html::preview_html(&rendered);
    assert!(markup.contains("width:300px;height:400px"));
    assert!(markup.contains("transform:scale(0.5)"));
}

#[test]
fn rendering_is_deterministic() {
    for entry in catalog::list_templates() {
        let doc = catalog::instantiate_document(&entry.id).unwrap();
        let a = html::preview_html(&render::render(&doc, 0, 1.0));
        let b = html::preview_html(&render::render(&doc, 0, 1.0));
        assert_eq!(a, b, "template {}", entry.id);
        assert_eq!(
            html::export_html(&doc, &entry.name, 1.0),
            html::export_html(&doc, &entry.name, 1.0)
        );
    }
}

#[test]
fn every_catalog_template_round_trips() {
    for entry in catalog::list_templates() {
        let doc = catalog::instantiate_document(&entry.id).unwrap();
        let json = doc.to_json().unwrap();
        assert_eq!(CanvasDocument::from_json(&json).unwrap(), doc, "template {}", entry.id);
    }
}

#[test]
fn instantiated_pages_are_independent_of_the_catalog() {
    let mut page = catalog::instantiate("t1").unwrap();
    page.remove("title").unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(catalog::instantiate("t1").unwrap().len(), 3);
}

#[test]
fn edit_session_builds_and_undoes_a_campaign() {
    let mut session = EditSession::new(catalog::instantiate_document("t1").unwrap());

    // Add a second page from another template and switch to it.
    let added = session
        .apply(|doc| {
            let index = doc.add_page(catalog::instantiate("t3")?);
            doc.set_active_page(index)?;
            Ok(index)
        })
        .unwrap();
    assert_eq!(added, 1);
    assert_eq!(session.document().active_page_index(), 1);

    // Relabel the first page's button.
    session
        .apply(|doc| {
            let page = doc.page_mut(0).unwrap();
            let mut button = page.get("button").unwrap().clone();
            button.set_payload(ElementKind::button("Start now"))?;
            page.replace("button", button)
        })
        .unwrap();

    // Changing an element's type is refused and leaves the document as it was.
    let before = session.document().clone();
    let err = session.apply(|doc| {
        let page = doc.page_mut(0).unwrap();
        let image = Element::with_id(
            "button",
            ElementKind::image("https://example.com/a.png", "a"),
            Geometry::new(0.0, 0.0, 10.0, 10.0),
        )?;
        page.replace("button", image)
    });
    assert!(err.is_err());
    assert_eq!(session.document(), &before);

    let rendered = render::render(session.document(), 0, 1.0);
    let labels: Vec<_> = rendered
        .as_page()
        .unwrap()
        .nodes
        .iter()
        .filter_map(|n| match &n.content {
            NodeContent::Button { label, .. } => Some(label.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["Start now"]);

    assert!(session.undo());
    assert!(session.undo());
    assert_eq!(session.document().page_count(), 1);
    assert!(!session.can_undo());
    assert!(session.redo());
    assert_eq!(session.document().page_count(), 2);
}

#[test]
fn removing_last_page_renders_placeholder() {
    let mut doc = CanvasDocument::from_pages(vec![Page::new()]);
    doc.remove_page(0).unwrap();
    assert_eq!(doc.page_count(), 0);
    let rendered = render::render(&doc, 0, 1.0);
    assert!(rendered.is_empty());
    assert_eq!(html::preview_html(&rendered), html::EMPTY_PLACEHOLDER);
}

#[tokio::test]
async fn file_store_keeps_templates_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("templates.json");
    let doc = catalog::instantiate_document("t2").unwrap();

    {
        let store = FileStore::open(&path).await.unwrap();
        store
            .save(SaveTemplate::new("ana", "news", "Newsletter", doc.clone()).preview("data:,"))
            .await
            .unwrap();
    }

    let store = FileStore::open(&path).await.unwrap();
    let record = store
        .get(&UserId::from("ana"), "news")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.content, doc);
    assert_eq!(record.preview.as_deref(), Some("data:,"));
    assert_eq!(
        html::export_html(&record.content, &record.name, 1.0),
        html::export_html(&doc, "Newsletter", 1.0)
    );
}
