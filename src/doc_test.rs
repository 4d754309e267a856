#![allow(clippy::float_cmp)]

use super::*;

const CARD: CardSize = CardSize { width: 280.0, height: 200.0 };

fn store() -> DocStore {
    DocStore::new(CARD)
}

fn entity_at(x: f64, y: f64) -> CanvasEntity {
    CanvasEntity::new("actor-1", CanvasPoint::new(x, y))
}

fn add(store: &mut DocStore, x: f64, y: f64) -> EntityId {
    let e = entity_at(x, y);
    let id = e.id;
    store.insert_entity(e);
    id
}

fn assert_bounds_consistent(store: &DocStore) {
    for g in store.groups() {
        let members = store.entities_by_ids(&store.members_of(&g.id));
        assert_eq!(g.bounds, calculate_bounds(members, CARD), "group {} bounds drifted", g.id);
        assert_eq!(g.member_ids, store.members_of(&g.id));
    }
}

// =============================================================
// calculate_bounds
// =============================================================

#[test]
fn bounds_empty_is_zero_box_at_origin() {
    let b = calculate_bounds(std::iter::empty(), CARD);
    assert_eq!(b, Bounds::default());
    assert!(b.width.is_finite());
}

#[test]
fn bounds_single_entity_is_card_rect() {
    let e = entity_at(10.0, 20.0);
    let b = calculate_bounds([&e], CARD);
    assert_eq!(b, Bounds { x: 10.0, y: 20.0, width: 280.0, height: 200.0 });
}

#[test]
fn bounds_two_entities_span_both_cards() {
    let a = entity_at(0.0, 0.0);
    let b = entity_at(500.0, -100.0);
    let bounds = calculate_bounds([&a, &b], CARD);
    assert_eq!(bounds, Bounds { x: 0.0, y: -100.0, width: 780.0, height: 300.0 });
    assert_eq!(bounds.right(), 780.0);
    assert_eq!(bounds.bottom(), 200.0);
}

#[test]
fn bounds_center() {
    let b = Bounds { x: 0.0, y: 0.0, width: 100.0, height: 50.0 };
    assert_eq!(b.center(), CanvasPoint::new(50.0, 25.0));
}

// =============================================================
// Serde
// =============================================================

#[test]
fn entity_serializes_camel_case_without_empty_group() {
    let e = entity_at(1.0, 2.0);
    let json = serde_json::to_value(&e).unwrap();
    assert_eq!(json["actorRef"], "actor-1");
    assert_eq!(json["position"]["x"], 1.0);
    assert!(json.get("groupId").is_none());
}

#[test]
fn entity_decodes_without_label_or_group() {
    let raw = r#"{ "id": "6f1c7c36-5d84-4a8e-9d0b-6d2b8f0c1a11", "actorRef": "a", "position": { "x": 3, "y": 4 } }"#;
    let e: CanvasEntity = serde_json::from_str(raw).unwrap();
    assert_eq!(e.label, "");
    assert!(e.group_id.is_none());
}

#[test]
fn group_color_serde_lowercase() {
    assert_eq!(serde_json::to_string(&GroupColor::Teal).unwrap(), "\"teal\"");
    let c: GroupColor = serde_json::from_str("\"purple\"").unwrap();
    assert_eq!(c, GroupColor::Purple);
}

#[test]
fn group_color_unknown_tag_falls_back_to_gray() {
    let c: GroupColor = serde_json::from_str("\"chartreuse\"").unwrap();
    assert_eq!(c, GroupColor::Gray);
}

// =============================================================
// Entity operations
// =============================================================

#[test]
fn insert_and_lookup() {
    let mut s = store();
    let id = add(&mut s, 0.0, 0.0);
    assert_eq!(s.len(), 1);
    assert!(s.contains_entity(&id));
}

#[test]
fn insert_same_id_replaces() {
    let mut s = store();
    let mut e = entity_at(0.0, 0.0);
    s.insert_entity(e.clone());
    e.position = CanvasPoint::new(9.0, 9.0);
    s.insert_entity(e.clone());
    assert_eq!(s.len(), 1);
    assert_eq!(s.entity(&e.id).map(|e| e.position), Some(CanvasPoint::new(9.0, 9.0)));
}

#[test]
fn insert_with_unknown_group_is_ungrouped() {
    let mut s = store();
    let mut e = entity_at(0.0, 0.0);
    e.group_id = Some(Uuid::new_v4());
    let id = e.id;
    s.insert_entity(e);
    assert!(s.entity(&id).is_some_and(|e| e.group_id.is_none()));
}

#[test]
fn remove_missing_is_none() {
    let mut s = store();
    assert!(s.remove_entity(&Uuid::new_v4()).is_none());
}

#[test]
fn remove_entities_returns_only_existing() {
    let mut s = store();
    let a = add(&mut s, 0.0, 0.0);
    let b = add(&mut s, 10.0, 0.0);
    let removed = s.remove_entities(&[a, Uuid::new_v4()]);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].id, a);
    assert!(s.contains_entity(&b));
}

#[test]
fn duplicate_offsets_and_ungroups() {
    let mut s = store();
    let a = add(&mut s, 100.0, 100.0);
    s.set_label(&a, "Hamlet");
    let g = s.create_group("Leads", GroupColor::Blue, &[a]).unwrap();
    let copy = s.duplicate_entity(&a, CanvasDelta::new(30.0, 30.0)).unwrap();
    let dup = s.entity(&copy).unwrap();
    assert_ne!(copy, a);
    assert_eq!(dup.position, CanvasPoint::new(130.0, 130.0));
    assert_eq!(dup.label, "Hamlet");
    assert_eq!(dup.actor_ref, "actor-1");
    assert!(dup.group_id.is_none());
    assert_eq!(s.group(&g).unwrap().member_ids, vec![a]);
}

#[test]
fn duplicate_missing_is_none() {
    let mut s = store();
    assert!(s.duplicate_entity(&Uuid::new_v4(), CanvasDelta::default()).is_none());
    assert!(s.is_empty());
}

#[test]
fn translate_skips_missing_ids() {
    let mut s = store();
    let a = add(&mut s, 0.0, 0.0);
    let moved = s.translate_entities(&[a, Uuid::new_v4()], CanvasDelta::new(5.0, -5.0));
    assert_eq!(moved, 1);
    assert_eq!(s.entity(&a).unwrap().position, CanvasPoint::new(5.0, -5.0));
}

#[test]
fn set_label_missing_is_false() {
    let mut s = store();
    assert!(!s.set_label(&Uuid::new_v4(), "x"));
}

// =============================================================
// Groups
// =============================================================

#[test]
fn create_group_assigns_members_and_bounds() {
    let mut s = store();
    let a = add(&mut s, 0.0, 0.0);
    let b = add(&mut s, 400.0, 300.0);
    let g = s.create_group("Leads", GroupColor::Blue, &[a, b]).unwrap();
    let group = s.group(&g).unwrap();
    assert_eq!(group.member_ids, vec![a, b]);
    assert_eq!(group.bounds, Bounds { x: 0.0, y: 0.0, width: 680.0, height: 500.0 });
    assert_eq!(group.color, GroupColor::Blue);
    assert_eq!(s.entity(&a).unwrap().group_id, Some(g));
}

#[test]
fn create_group_with_no_existing_members_is_none() {
    let mut s = store();
    assert!(s.create_group("Empty", GroupColor::Red, &[Uuid::new_v4()]).is_none());
    assert!(s.create_group("Empty", GroupColor::Red, &[]).is_none());
    assert!(s.groups().is_empty());
}

#[test]
fn create_group_increments_created_seq() {
    let mut s = store();
    let a = add(&mut s, 0.0, 0.0);
    let b = add(&mut s, 0.0, 0.0);
    let g1 = s.create_group("One", GroupColor::Blue, &[a]).unwrap();
    let g2 = s.create_group("Two", GroupColor::Blue, &[b]).unwrap();
    assert!(s.group(&g1).unwrap().created_seq < s.group(&g2).unwrap().created_seq);
}

#[test]
fn delete_group_ungroups_members_without_moving_them() {
    let mut s = store();
    let a = add(&mut s, 10.0, 20.0);
    let b = add(&mut s, 30.0, 40.0);
    let g = s.create_group("Leads", GroupColor::Blue, &[a, b]).unwrap();
    assert!(s.delete_group(&g));
    assert!(s.group(&g).is_none());
    assert!(s.entity(&a).unwrap().group_id.is_none());
    assert!(s.entity(&b).unwrap().group_id.is_none());
    assert_eq!(s.entity(&a).unwrap().position, CanvasPoint::new(10.0, 20.0));
    assert_eq!(s.len(), 2);
}

#[test]
fn delete_missing_group_is_false() {
    let mut s = store();
    assert!(!s.delete_group(&Uuid::new_v4()));
}

#[test]
fn rename_trims_and_blank_falls_back_to_placeholder() {
    let mut s = store();
    let a = add(&mut s, 0.0, 0.0);
    let g = s.create_group("  Leads  ", GroupColor::Blue, &[a]).unwrap();
    assert_eq!(s.group(&g).unwrap().name, "Leads");
    assert!(s.rename_group(&g, "   "));
    assert_eq!(s.group(&g).unwrap().display_name(), UNTITLED_GROUP);
}

#[test]
fn set_group_color_changes_tag() {
    let mut s = store();
    let a = add(&mut s, 0.0, 0.0);
    let g = s.create_group("Leads", GroupColor::Blue, &[a]).unwrap();
    assert!(s.set_group_color(&g, GroupColor::Orange));
    assert_eq!(s.group(&g).unwrap().color, GroupColor::Orange);
}

#[test]
fn add_entity_to_group_moves_between_groups() {
    let mut s = store();
    let a = add(&mut s, 0.0, 0.0);
    let b = add(&mut s, 500.0, 0.0);
    let g1 = s.create_group("One", GroupColor::Blue, &[a]).unwrap();
    let g2 = s.create_group("Two", GroupColor::Green, &[b]).unwrap();
    assert!(s.add_entity_to_group(&a, &g2));
    assert!(s.group(&g1).unwrap().member_ids.is_empty());
    assert_eq!(s.group(&g1).unwrap().bounds, Bounds::default());
    assert_eq!(s.group(&g2).unwrap().member_count(), 2);
    assert_bounds_consistent(&s);
}

#[test]
fn add_entity_to_unknown_group_is_false() {
    let mut s = store();
    let a = add(&mut s, 0.0, 0.0);
    assert!(!s.add_entity_to_group(&a, &Uuid::new_v4()));
}

#[test]
fn remove_entity_from_group() {
    let mut s = store();
    let a = add(&mut s, 0.0, 0.0);
    let b = add(&mut s, 100.0, 100.0);
    let g = s.create_group("G", GroupColor::Blue, &[a, b]).unwrap();
    assert!(s.remove_entity_from_group(&a));
    assert!(!s.remove_entity_from_group(&a));
    assert_eq!(s.group(&g).unwrap().member_ids, vec![b]);
    assert_eq!(s.group(&g).unwrap().bounds.x, 100.0);
}

#[test]
fn bounds_follow_every_kind_of_member_mutation() {
    let mut s = store();
    let a = add(&mut s, 0.0, 0.0);
    let b = add(&mut s, 300.0, 0.0);
    let c = add(&mut s, 600.0, 600.0);
    let g = s.create_group("G", GroupColor::Blue, &[a, b]).unwrap();
    assert_bounds_consistent(&s);

    s.translate_entities(&[a], CanvasDelta::new(-50.0, -50.0));
    assert_bounds_consistent(&s);
    s.set_position(&b, CanvasPoint::new(1000.0, 10.0));
    assert_bounds_consistent(&s);
    s.add_entity_to_group(&c, &g);
    assert_bounds_consistent(&s);
    s.remove_entity(&a);
    assert_bounds_consistent(&s);
    s.remove_entities(&[b, c]);
    assert_bounds_consistent(&s);
    assert_eq!(s.group(&g).unwrap().bounds, Bounds::default());
}

// =============================================================
// load
// =============================================================

#[test]
fn load_recomputes_bounds_and_prunes_dangling_refs() {
    let mut s = store();
    let group = Group {
        id: Uuid::new_v4(),
        name: "Saved".into(),
        color: GroupColor::Pink,
        bounds: Bounds { x: -1.0, y: -1.0, width: 9999.0, height: 9999.0 },
        member_ids: vec![Uuid::new_v4()],
        created_seq: 7,
    };
    let mut a = entity_at(0.0, 0.0);
    a.group_id = Some(group.id);
    let mut orphan = entity_at(50.0, 50.0);
    orphan.group_id = Some(Uuid::new_v4());
    let gid = group.id;
    let report = s.load(vec![a.clone(), orphan.clone(), a.clone()], vec![group.clone(), group]);
    assert_eq!(report.dangling_group_refs, 1);
    assert_eq!(report.duplicate_entities, 1);
    assert_eq!(report.duplicate_groups, 1);
    assert_eq!(s.len(), 2);
    assert!(s.entity(&orphan.id).unwrap().group_id.is_none());
    let g = s.group(&gid).unwrap();
    assert_eq!(g.member_ids, vec![a.id]);
    assert_eq!(g.bounds, Bounds { x: 0.0, y: 0.0, width: 280.0, height: 200.0 });
}

#[test]
fn load_continues_created_seq_after_highest() {
    let mut s = store();
    let group = Group {
        id: Uuid::new_v4(),
        name: String::new(),
        color: GroupColor::Blue,
        bounds: Bounds::default(),
        member_ids: Vec::new(),
        created_seq: 4,
    };
    s.load(vec![entity_at(0.0, 0.0)], vec![group]);
    let a = s.entities()[0].id;
    let g = s.create_group("Next", GroupColor::Blue, &[a]).unwrap();
    assert_eq!(s.group(&g).unwrap().created_seq, 5);
}
