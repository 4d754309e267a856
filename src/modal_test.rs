use serde_json::json;
use uuid::Uuid;

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialog {
    A,
    B,
    FullScreen,
}

impl ModalKind for Dialog {
    fn self_backdrop(&self) -> bool {
        *self == Dialog::FullScreen
    }
}

fn kinds(stack: &ModalStack<Dialog>) -> Vec<Dialog> {
    stack.entries().iter().map(|e| e.kind).collect()
}

// =============================================================
// Ordering
// =============================================================

#[test]
fn close_pops_only_top_and_close_all_empties() {
    let mut stack = ModalStack::new();
    stack.open(Dialog::A, json!(null));
    stack.open(Dialog::B, json!(null));
    stack.close();
    assert_eq!(kinds(&stack), vec![Dialog::A]);

    stack.open(Dialog::A, json!(null));
    stack.open(Dialog::B, json!(null));
    assert_eq!(stack.close_all(), 3);
    assert!(stack.is_empty());
}

#[test]
fn close_on_empty_is_noop() {
    let mut stack: ModalStack<Dialog> = ModalStack::new();
    assert!(stack.close().is_none());
    assert_eq!(stack.close_all(), 0);
    assert_eq!(stack.len(), 0);
}

#[test]
fn close_returns_payload() {
    let mut stack = ModalStack::new();
    stack.open(Dialog::A, json!({ "actor": "a1" }));
    let closed = stack.close().unwrap();
    assert_eq!(closed.kind, Dialog::A);
    assert_eq!(closed.data["actor"], "a1");
}

#[test]
fn top_is_last_opened() {
    let mut stack = ModalStack::new();
    assert!(stack.top().is_none());
    stack.open(Dialog::A, json!(null));
    stack.open(Dialog::B, json!(1));
    assert_eq!(stack.top().map(|e| e.kind), Some(Dialog::B));
}

// =============================================================
// Layers
// =============================================================

#[test]
fn z_index_steps_from_base() {
    let mut stack = ModalStack::new();
    for _ in 0..3 {
        stack.open(Dialog::A, json!(null));
    }
    let z: Vec<i32> = stack.layers(1000, 10).iter().map(|l| l.z_index).collect();
    assert_eq!(z, vec![1000, 1010, 1020]);
}

#[test]
fn bottom_is_dark_and_nested_is_light() {
    let mut stack = ModalStack::new();
    stack.open(Dialog::A, json!(null));
    stack.open(Dialog::B, json!(null));
    let layers = stack.layers(0, 1);
    assert_eq!(layers[0].backdrop, Backdrop::Dark);
    assert_eq!(layers[1].backdrop, Backdrop::Light);
}

#[test]
fn entry_above_self_backdrop_is_dark() {
    let mut stack = ModalStack::new();
    stack.open(Dialog::FullScreen, json!(null));
    stack.open(Dialog::A, json!(null));
    stack.open(Dialog::B, json!(null));
    let backdrops: Vec<Backdrop> = stack.layers(0, 1).iter().map(|l| l.backdrop).collect();
    assert_eq!(backdrops, vec![Backdrop::Dark, Backdrop::Dark, Backdrop::Light]);
}

#[test]
fn layers_empty_for_empty_stack() {
    let stack: ModalStack<Dialog> = ModalStack::new();
    assert!(stack.layers(1000, 10).is_empty());
}

// =============================================================
// Canvas dialogs
// =============================================================

#[test]
fn canvas_and_image_viewer_dim_themselves() {
    assert!(CanvasModal::Canvas.self_backdrop());
    assert!(CanvasModal::ImageViewer { entity_id: Uuid::new_v4() }.self_backdrop());
    assert!(!CanvasModal::CreateGroup.self_backdrop());
    assert!(!CanvasModal::ConfirmDelete { count: 2 }.self_backdrop());
}

#[test]
fn canvas_modal_serializes_tagged() {
    let id = Uuid::new_v4();
    let v = serde_json::to_value(CanvasModal::MoveActor { entity_id: id }).unwrap();
    assert_eq!(v, json!({ "type": "move_actor", "entity_id": id }));
}
