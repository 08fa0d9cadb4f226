//! Integration tests for the model viewer: object URL lifetime and rendering.

mod common;

use std::f32::consts::PI;

use shapecast::viewer::blob::BlobStore;
use shapecast::viewer::{ModelViewer, ViewerError};

use common::{triangle_payload, BLUE, RED};

#[test]
fn test_show_and_render_generated_model() {
    let mut viewer = ModelViewer::new();
    viewer.show(&triangle_payload(RED)).expect("Failed to show model");

    assert_eq!(viewer.model().unwrap().triangles.len(), 1);
    assert!(viewer.object_url().unwrap().starts_with("blob:"));

    let frame = viewer.render(64, 64).unwrap();
    let [r, g, b, a] = frame.pixel(32, 32).unwrap();
    assert_eq!(a, 255);
    assert!(r > g && r > b);
}

#[test]
fn test_replacing_model_revokes_previous_url() {
    let store = BlobStore::new();
    let mut viewer = ModelViewer::with_store(store.clone());

    viewer.show(&triangle_payload(RED)).unwrap();
    let first_url = viewer.object_url().unwrap().to_string();

    viewer.show(&triangle_payload(BLUE)).unwrap();
    let second_url = viewer.object_url().unwrap().to_string();

    assert_ne!(first_url, second_url);
    assert!(store.resolve(&first_url).is_none());
    assert!(store.resolve(&second_url).is_some());
    assert_eq!(store.live_count(), 1);
}

#[test]
fn test_same_payload_is_not_reloaded() {
    let store = BlobStore::new();
    let mut viewer = ModelViewer::with_store(store.clone());
    let payload = triangle_payload(RED);

    viewer.show(&payload).unwrap();
    let url = viewer.object_url().unwrap().to_string();
    viewer.show(&payload).unwrap();

    assert_eq!(viewer.object_url(), Some(url.as_str()));
    assert_eq!(store.live_count(), 1);
}

#[test]
fn test_unmount_revokes_url() {
    let store = BlobStore::new();
    let mut viewer = ModelViewer::with_store(store.clone());
    viewer.show(&triangle_payload(RED)).unwrap();
    assert_eq!(store.live_count(), 1);

    viewer.clear();
    assert_eq!(store.live_count(), 0);
    assert!(viewer.render(8, 8).is_none());

    viewer.show(&triangle_payload(RED)).unwrap();
    drop(viewer);
    assert_eq!(store.live_count(), 0);
}

#[test]
fn test_bad_payload_keeps_current_model() {
    let store = BlobStore::new();
    let mut viewer = ModelViewer::with_store(store.clone());
    let good = triangle_payload(RED);
    viewer.show(&good).unwrap();

    let err = viewer.show("Z2xURg==").unwrap_err();
    assert!(matches!(err, ViewerError::Load(_)));
    assert!(err.to_string().starts_with("Could not load model"));

    assert_eq!(viewer.current_payload(), Some(good.as_str()));
    assert_eq!(store.live_count(), 1);
}

#[test]
fn test_orbiting_behind_still_shows_two_sided_faces() {
    let mut viewer = ModelViewer::new();
    viewer.show(&triangle_payload(BLUE)).unwrap();
    viewer.controls_mut().rotate(PI, 0.0);

    let eye = viewer.camera().eye;
    assert!(eye.z < 0.0, "camera should be behind the model, got {:?}", eye);

    let frame = viewer.render(64, 64).unwrap();
    let [r, _, b, _] = frame.pixel(32, 32).unwrap();
    assert!(b > r);
}

#[test]
fn test_zoom_out_shrinks_coverage() {
    let mut viewer = ModelViewer::new();
    viewer.show(&triangle_payload(RED)).unwrap();

    let coverage = |viewer: &ModelViewer| {
        let frame = viewer.render(64, 64).unwrap();
        let background = frame.pixel(0, 0).unwrap();
        frame
            .pixels()
            .chunks(4)
            .filter(|p| *p != background.as_slice())
            .count()
    };

    let near = coverage(&viewer);
    viewer.controls_mut().dolly(3.0);
    let far = coverage(&viewer);
    assert!(far < near, "expected {} < {}", far, near);
}
