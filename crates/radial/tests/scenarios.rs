use radial::drag::DropTarget;
use radial::geometry::polar_offset;
use radial::hit;
use radial::{
    CategoryId, DragPhase, DropDecision, Item, ItemId, ItemSource, KeyAction, MenuController,
    MenuEvent, MutationSink, PinnedControlSpec, Point, PointerEvent, RevealState, Tunables,
    ZoneColor, ZoneSpec,
};

const CONTROLS: [&str; 4] = ["menu", "add", "edit", "config"];

fn tunables() -> Tunables {
    Tunables {
        categories: ["a", "b", "c"]
            .iter()
            .map(|id| ZoneSpec {
                id: CategoryId::from(*id),
                color: ZoneColor::new(200, 80, 40),
            })
            .collect(),
        pinned_controls: CONTROLS
            .iter()
            .map(|id| PinnedControlSpec {
                id: ItemId::from(*id),
                default_visible: *id == "menu",
            })
            .collect(),
        ..Tunables::default()
    }
}

/// a0 a1 a2 b0 b1 b2 c0 c1 c2, then the pinned controls.
fn zoned_items() -> Vec<Item> {
    let mut items: Vec<Item> = ["a", "b", "c"]
        .iter()
        .flat_map(|zone| (0..3).map(move |i| Item::clip(format!("{zone}{i}"), Some(*zone))))
        .collect();
    items.extend(CONTROLS.map(Item::control));
    items
}

fn open<S: ItemSource>(source: &S) -> MenuController {
    let mut menu = MenuController::new(tunables());
    menu.open(source);
    menu
}

fn on_ring(menu: &MenuController, angle: f64) -> Point {
    polar_offset(angle, menu.layout().radius)
}

fn start_drag(menu: &mut MenuController, index: usize) {
    let origin = menu.layout().slot_offset(index);
    menu.pointer(PointerEvent::Press(origin));
    menu.pointer(PointerEvent::Move(Point::new(origin.x + 15.0, origin.y)));
    assert_eq!(menu.drag_state(), DragPhase::Active);
}

fn drop_at(menu: &mut MenuController, p: Point) -> Vec<MenuEvent> {
    menu.pointer(PointerEvent::Move(p));
    menu.pointer(PointerEvent::Release(p)).events
}

/// Minimal data layer: applies reorders and merges to a flat list.
struct Board {
    items: Vec<Item>,
}

impl Board {
    fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}

impl MutationSink for Board {
    fn on_reorder(
        &mut self,
        dragged: &ItemId,
        target: &ItemId,
        insert_before: bool,
        category: Option<&CategoryId>,
    ) {
        let Some(from) = self.position(dragged) else {
            return;
        };
        let mut item = self.items.remove(from);
        item.category = category.cloned();
        let Some(to) = self.position(target) else {
            return;
        };
        let at = if insert_before { to } else { to + 1 };
        self.items.insert(at, item);
    }

    fn on_merge_to_group(&mut self, dragged: &ItemId, target: &ItemId) {
        if let Some(from) = self.position(dragged) {
            self.items.remove(from);
        }
        if let Some(to) = self.position(target) {
            self.items[to].is_group = true;
        }
    }

    fn on_store_request(&mut self, _: &ItemId) {}

    fn on_delete_request(&mut self, dragged: &ItemId) {
        self.items.retain(|item| &item.id != dragged);
    }

    fn on_extract_from_group(
        &mut self,
        _: &ItemId,
        _: &ItemId,
        _: &ItemId,
        _: bool,
        _: Option<&CategoryId>,
    ) {
    }
}

#[test]
fn nine_clips_fit_on_one_page() {
    let menu = open(&zoned_items());
    assert_eq!(menu.page().total_pages, 1);
    // nine clips plus the entry control
    assert_eq!(menu.layout().n, 10);
    assert_eq!(
        menu.zone_adjacency(),
        vec![true, true, false, true, true, false, true, true, false, false]
    );
    assert_eq!(menu.badges().len(), 3);
}

#[test]
fn same_zone_gap_has_single_candidate() {
    let mut menu = open(&zoned_items());
    let candidates =
        hit::insertion_candidates(menu.ring_items(), menu.layout(), Some(4), menu.tunables());
    // slots 3 and 5 sit at 108° and 180° once slot 4 is lifted
    let between = candidates
        .iter()
        .filter(|c| c.angle > 108.0 && c.angle < 180.0)
        .count();
    assert_eq!(between, 1);

    start_drag(&mut menu, 4);
    menu.pointer(PointerEvent::Move(on_ring(&menu, 144.0)));
    assert!(matches!(
        menu.drop_target(),
        Some(DropTarget::ReorderBetween {
            target: 5,
            insert_before: true,
            ..
        })
    ));
    let indicator = menu.drop_indicator_angle().unwrap();
    assert!((indicator - 144.0).abs() < 1e-6);

    let p = on_ring(&menu, 144.0);
    let events = drop_at(&mut menu, p);
    assert_eq!(
        events,
        vec![MenuEvent::Drop(DropDecision::Reorder {
            dragged: ItemId::from("b1"),
            target: ItemId::from("b2"),
            insert_before: true,
            category: Some(CategoryId::from("b")),
        })]
    );
}

#[test]
fn zone_boundary_has_two_candidates() {
    let mut menu = open(&zoned_items());
    let candidates =
        hit::insertion_candidates(menu.ring_items(), menu.layout(), Some(7), menu.tunables());
    let boundary: Vec<f64> = candidates
        .iter()
        .filter(|c| c.angle > 72.0 && c.angle < 108.0)
        .map(|c| c.angle)
        .collect();
    assert_eq!(boundary.len(), 2);
    assert!((boundary[0] - 84.0).abs() < 1e-6);
    assert!((boundary[1] - 96.0).abs() < 1e-6);

    // end of zone a
    start_drag(&mut menu, 7);
    let p = on_ring(&menu, 84.0);
    let events = drop_at(&mut menu, p);
    assert_eq!(
        events,
        vec![MenuEvent::Drop(DropDecision::Reorder {
            dragged: ItemId::from("c1"),
            target: ItemId::from("a2"),
            insert_before: false,
            category: Some(CategoryId::from("a")),
        })]
    );

    // start of zone b
    start_drag(&mut menu, 7);
    let p = on_ring(&menu, 96.0);
    let events = drop_at(&mut menu, p);
    assert_eq!(
        events,
        vec![MenuEvent::Drop(DropDecision::Reorder {
            dragged: ItemId::from("c1"),
            target: ItemId::from("b0"),
            insert_before: true,
            category: Some(CategoryId::from("b")),
        })]
    );
}

#[test]
fn merged_group_keeps_accepting_merges() {
    let mut board = Board {
        items: zoned_items(),
    };
    let mut menu = open(&board.items);

    start_drag(&mut menu, 0);
    let target = menu.layout().slot_offset(1);
    let events = drop_at(&mut menu, target);
    let [MenuEvent::Drop(decision)] = events.as_slice() else {
        panic!("expected a single drop, got {events:?}");
    };
    assert_eq!(
        decision,
        &DropDecision::MergeToGroup {
            dragged: ItemId::from("a0"),
            target: ItemId::from("a1"),
        }
    );

    decision.dispatch(&mut board);
    menu.refresh(board.items.clone());
    assert_eq!(menu.ring_items()[0].id, ItemId::from("a1"));
    assert!(menu.ring_items()[0].is_group);

    // a2 now sits at slot 1, drop it onto the group at slot 0
    start_drag(&mut menu, 1);
    let group = menu.layout().slot_offset(0);
    menu.pointer(PointerEvent::Move(group));
    assert_eq!(menu.drop_target(), Some(&DropTarget::MergeOnto { target: 0 }));
    let events = drop_at(&mut menu, group);
    assert_eq!(
        events,
        vec![MenuEvent::Drop(DropDecision::MergeToGroup {
            dragged: ItemId::from("a2"),
            target: ItemId::from("a1"),
        })]
    );
}

#[test]
fn reorder_round_trips_through_data_layer() {
    let mut board = Board {
        items: zoned_items(),
    };
    let mut menu = open(&board.items);

    start_drag(&mut menu, 0);
    let p = on_ring(&menu, 96.0);
    let events = drop_at(&mut menu, p);
    for event in &events {
        if let MenuEvent::Drop(decision) = event {
            decision.dispatch(&mut board);
        }
    }
    menu.refresh(board.items.clone());

    let ids: Vec<&str> = menu.ring_items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["a1", "a2", "a0", "b0", "b1", "b2", "c0", "c1", "c2", "menu"]
    );
    // the moved clip joined zone b
    assert_eq!(menu.ring_items()[2].category, Some(CategoryId::from("b")));
    assert!(!menu.zone_adjacency()[1]);
    assert!(menu.zone_adjacency()[2]);
}

#[test]
fn page_requests_clamp_to_last_page() {
    let mut items: Vec<Item> = (0..45)
        .map(|i| Item::clip(format!("clip{i}"), None))
        .collect();
    items.extend(CONTROLS.map(Item::control));
    let mut menu = open(&items);
    assert_eq!(menu.page().total_pages, 3);

    let response = menu.set_page(5).unwrap();
    assert_eq!(
        response.events,
        vec![MenuEvent::PageChanged { page: 2, total: 3 }]
    );
    assert_eq!(menu.page().index, 2);
    assert_eq!(menu.ring_items().len(), 6);
    assert!(menu.next_page().unwrap().events.is_empty());

    // shrinking the list snaps back onto a page that still exists
    items.drain(20..45);
    menu.refresh(items);
    assert_eq!(menu.page().index, 0);
}

#[test]
fn click_versus_drag() {
    let mut menu = open(&zoned_items());
    let origin = menu.layout().slot_offset(2);

    menu.pointer(PointerEvent::Press(origin));
    let nudge = Point::new(origin.x + 4.0, origin.y + 4.0);
    menu.pointer(PointerEvent::Move(nudge));
    let events = menu.pointer(PointerEvent::Release(nudge)).events;
    assert_eq!(
        events,
        vec![MenuEvent::Activated {
            item: ItemId::from("a2")
        }]
    );

    menu.pointer(PointerEvent::Press(origin));
    let far = Point::new(origin.x + 12.0, origin.y);
    menu.pointer(PointerEvent::Move(far));
    let events = menu.pointer(PointerEvent::Release(far)).events;
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, MenuEvent::Activated { .. }))
    );
}

#[test]
fn controls_reveal_nearest_first_and_hide_in_reverse() {
    let mut menu = open(&zoned_items());
    let visible = |menu: &MenuController| -> Vec<String> {
        menu.reveal_progress()
            .visible
            .into_iter()
            .map(Into::into)
            .collect()
    };
    assert_eq!(visible(&menu), vec!["menu"]);

    menu.pointer(PointerEvent::Move(menu.layout().slot_offset(9)));
    assert_eq!(visible(&menu), vec!["menu", "add"]);
    menu.tick(30);
    assert_eq!(visible(&menu), vec!["menu", "add", "edit"]);
    menu.tick(30);
    assert_eq!(menu.reveal_progress().state, RevealState::Revealed);
    assert_eq!(menu.layout().n, 13);

    menu.pointer(PointerEvent::Move(Point::new(0.0, 0.0)));
    assert_eq!(visible(&menu), vec!["menu", "add", "edit"]);
    menu.tick(30);
    assert_eq!(visible(&menu), vec!["menu", "add"]);
    menu.tick(30);
    assert_eq!(visible(&menu), vec!["menu"]);
    assert_eq!(menu.reveal_progress().state, RevealState::Collapsed);
}

#[test]
fn close_mid_drag_emits_no_decision() {
    let mut menu = open(&zoned_items());
    start_drag(&mut menu, 3);
    menu.pointer(PointerEvent::Move(Point::new(0.0, 0.0)));

    let events = menu.key(KeyAction::Cancel).events;
    assert!(events.is_empty());
    assert_eq!(menu.drag_state(), DragPhase::Idle);

    start_drag(&mut menu, 3);
    let events = menu.close().events;
    assert_eq!(events, vec![MenuEvent::Closed]);
    assert!(
        menu.pointer(PointerEvent::Release(Point::new(0.0, 0.0)))
            .events
            .is_empty()
    );
}
