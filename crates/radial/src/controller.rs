use crate::drag::{DragPhase, DragSession, DropDecision, MotionOutcome, ReleaseOutcome};
use crate::geometry::{Point, RingLayout};
use crate::hit::{self, Region};
use crate::item::{CategoryId, Item, ItemId, ItemSource};
use crate::page::{Page, Paginator};
use crate::reveal::{RevealAnimator, RevealProgress, RevealState, RevealStep};
use crate::tunables::Tunables;
use crate::zone::{ZoneBadge, ZoneTable};
use strum::{Display, EnumString};
use thiserror::Error;

/// Pointer input, relative to the ring anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press(Point),
    Move(Point),
    Release(Point),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum KeyAction {
    Next,
    Previous,
    Activate,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    Activated { item: ItemId },
    Drop(DropDecision),
    PageChanged { page: usize, total: usize },
    Closed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuResponse {
    pub events: Vec<MenuEvent>,
    pub redraw: bool,
}

impl MenuResponse {
    fn redraw(redraw: bool) -> Self {
        Self {
            events: Vec::new(),
            redraw,
        }
    }

    fn with_event(mut self, event: MenuEvent) -> Self {
        self.events.push(event);
        self
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("cannot change page while an item is being dragged")]
    DragInProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RefreshOutcome {
    Applied,
    /// Held back until the active drag ends.
    Deferred,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotPosition {
    pub index: usize,
    pub item: ItemId,
    pub angle: f64,
    pub offset: Point,
}

/// Everything mutable about an open menu. Owned by exactly one controller.
#[derive(Debug)]
pub struct MenuState {
    items: Vec<Item>,
    ring: Vec<Item>,
    layout: RingLayout,
    pager: Paginator,
    drag: DragSession,
    animator: RevealAnimator,
    hovered: Option<usize>,
    hovered_category: Option<CategoryId>,
    pressed: Option<ItemId>,
    pending_refresh: Option<Vec<Item>>,
    pending_tunables: Option<Tunables>,
    hide_deferred: bool,
    page_flip_active: bool,
    open: bool,
}

impl MenuState {
    fn new(tunables: &Tunables) -> Self {
        Self {
            items: Vec::new(),
            ring: Vec::new(),
            layout: RingLayout::new(0, tunables),
            pager: Paginator::new(tunables.page_size),
            drag: DragSession::new(),
            animator: RevealAnimator::new(tunables.reveal_step_ms),
            hovered: None,
            hovered_category: None,
            pressed: None,
            pending_refresh: None,
            pending_tunables: None,
            hide_deferred: false,
            page_flip_active: false,
            open: false,
        }
    }
}

pub struct MenuController {
    tunables: Tunables,
    zones: ZoneTable,
    state: MenuState,
}

impl MenuController {
    pub fn new(tunables: Tunables) -> Self {
        Self {
            zones: ZoneTable::new(tunables.categories.clone()),
            state: MenuState::new(&tunables),
            tunables,
        }
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    /// Swaps in new tunables. Like `refresh`, this waits for an active drag
    /// to end before the ring is rebuilt.
    pub fn set_tunables(&mut self, tunables: Tunables) -> RefreshOutcome {
        if self.state.drag.is_active() {
            log::info!("Tunables deferred until the current drag ends");
            self.state.pending_tunables = Some(tunables);
            return RefreshOutcome::Deferred;
        }
        self.state.drag.abandon();
        self.state.pressed = None;
        self.retune(tunables);

        let items = std::mem::take(&mut self.state.items);
        self.apply_items(items);
        RefreshOutcome::Applied
    }

    fn retune(&mut self, tunables: Tunables) {
        self.zones = ZoneTable::new(tunables.categories.clone());
        self.state.pager.set_page_size(tunables.page_size);
        self.state.animator.set_step_ms(tunables.reveal_step_ms);
        self.tunables = tunables;
    }

    pub fn is_open(&self) -> bool {
        self.state.open
    }

    pub fn open<S: ItemSource + ?Sized>(&mut self, source: &S) -> MenuResponse {
        self.state.drag.abandon();
        self.state.animator.collapse_all();
        self.state.pending_refresh = None;
        if let Some(tunables) = self.state.pending_tunables.take() {
            self.retune(tunables);
        }
        self.state.pressed = None;
        self.state.hide_deferred = false;
        self.state.hovered = None;
        self.state.open = true;
        self.apply_items(source.visible_items());
        log::debug!("Menu opened with {} slot(s)", self.state.layout.n);
        MenuResponse::redraw(true)
    }

    /// Replaces the item list. During an active drag the new list is held
    /// until the drag ends so slot indices stay valid mid-gesture.
    pub fn refresh(&mut self, items: Vec<Item>) -> RefreshOutcome {
        if self.state.drag.is_active() {
            log::info!("Refresh deferred until the current drag ends");
            self.state.pending_refresh = Some(items);
            return RefreshOutcome::Deferred;
        }
        self.state.drag.abandon();
        self.state.pressed = None;
        self.apply_items(items);
        RefreshOutcome::Applied
    }

    /// Collapses controls without animating and abandons any drag without a decision.
    pub fn close(&mut self) -> MenuResponse {
        let was_open = self.state.open;
        self.state.animator.collapse_all();
        if self.state.drag.abandon() {
            log::debug!("Drag abandoned on close");
        }
        self.state.pressed = None;
        self.state.hide_deferred = false;
        self.state.hovered = None;
        self.state.hovered_category = None;
        self.state.open = false;

        if !self.flush_pending() {
            self.rebuild();
        }

        let response = MenuResponse::redraw(was_open);
        if was_open {
            response.with_event(MenuEvent::Closed)
        } else {
            response
        }
    }

    pub fn set_page(&mut self, page: usize) -> Result<MenuResponse, MenuError> {
        if self.state.drag.is_active() {
            log::info!("Page change to {} rejected during drag", page);
            return Err(MenuError::DragInProgress);
        }
        self.state.drag.abandon();

        let before = self.state.pager.current_page();
        let now = self.state.pager.set_page(page);
        if now == before {
            return Ok(MenuResponse::default());
        }

        self.state.hovered = None;
        self.rebuild();
        let total = self.state.pager.total_pages();
        log::debug!("Page {}/{}", now + 1, total);
        Ok(MenuResponse::redraw(true).with_event(MenuEvent::PageChanged { page: now, total }))
    }

    pub fn next_page(&mut self) -> Result<MenuResponse, MenuError> {
        self.set_page(self.state.pager.current_page() + 1)
    }

    pub fn previous_page(&mut self) -> Result<MenuResponse, MenuError> {
        self.set_page(self.state.pager.current_page().saturating_sub(1))
    }

    /// While the host animates a page flip, drags neither start nor reclassify.
    pub fn set_page_flip_active(&mut self, active: bool) {
        self.state.page_flip_active = active;
    }

    pub fn pointer(&mut self, event: PointerEvent) -> MenuResponse {
        if !self.state.open {
            return MenuResponse::default();
        }
        // an active drag owns the pointer; hover and reveal stay frozen
        if self.state.drag.is_active() {
            return self.drag_pointer(event);
        }

        match event {
            PointerEvent::Press(p) => self.press(p),
            PointerEvent::Move(p) => self.motion(p),
            PointerEvent::Release(p) => self.release(p),
        }
    }

    pub fn key(&mut self, action: KeyAction) -> MenuResponse {
        if !self.state.open {
            return MenuResponse::default();
        }

        if action == KeyAction::Cancel {
            if self.state.drag.abandon() {
                self.after_drag();
                return MenuResponse::redraw(true);
            }
            return self.close();
        }
        if !self.state.drag.is_idle() {
            return MenuResponse::default();
        }

        let n = self.state.ring.len();
        match action {
            KeyAction::Next | KeyAction::Previous if n > 0 => {
                let next = match (action, self.state.hovered) {
                    (KeyAction::Next, Some(i)) => (i + 1) % n,
                    (KeyAction::Next, None) => 0,
                    (_, Some(i)) => (i + n - 1) % n,
                    (_, None) => n - 1,
                };
                self.set_hover(Some(next))
            }
            KeyAction::Activate => self.activate(self.state.hovered),
            _ => MenuResponse::default(),
        }
    }

    /// Advances the reveal/hide queue. Held while a drag is active.
    pub fn tick(&mut self, elapsed_ms: u64) -> MenuResponse {
        if !self.state.open || self.state.drag.is_active() {
            return MenuResponse::default();
        }

        let steps = self.state.animator.tick(elapsed_ms);
        let mut redraw = self.apply_steps(steps);

        if self.state.hide_deferred && self.state.animator.state() == RevealState::Revealed {
            self.state.hide_deferred = false;
            if let Ok(steps) = self.state.animator.begin_hide() {
                redraw |= self.apply_steps(steps);
            }
        }
        MenuResponse::redraw(redraw)
    }

    pub fn ring_items(&self) -> &[Item] {
        &self.state.ring
    }

    pub fn layout(&self) -> &RingLayout {
        &self.state.layout
    }

    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    pub fn slot_positions(&self) -> Vec<SlotPosition> {
        self.state
            .ring
            .iter()
            .enumerate()
            .map(|(index, item)| SlotPosition {
                index,
                item: item.id.clone(),
                angle: self.state.layout.slot_angle(index),
                offset: self.state.layout.slot_offset(index),
            })
            .collect()
    }

    pub fn hovered_slot(&self) -> Option<usize> {
        self.state.hovered
    }

    pub fn hovered_category(&self) -> Option<&CategoryId> {
        self.state.hovered_category.as_ref()
    }

    pub fn drop_indicator_angle(&self) -> Option<f64> {
        self.state.drag.indicator_angle()
    }

    pub fn drop_target(&self) -> Option<&crate::drag::DropTarget> {
        self.state.drag.target()
    }

    pub fn reveal_progress(&self) -> RevealProgress {
        self.state.animator.progress()
    }

    pub fn zone_adjacency(&self) -> Vec<bool> {
        self.zones.adjacency(&self.state.ring)
    }

    pub fn badges(&self) -> Vec<ZoneBadge> {
        self.zones.badges(&self.state.ring, &self.state.layout)
    }

    pub fn drag_state(&self) -> DragPhase {
        self.state.drag.phase()
    }

    pub fn dragged_item(&self) -> Option<&ItemId> {
        self.state.drag.dragged_item().map(|item| &item.id)
    }

    pub fn dragged_slot(&self) -> Option<usize> {
        self.state.drag.dragged_index()
    }

    pub fn page(&self) -> Page {
        self.state.pager.page()
    }

    fn press(&mut self, p: Point) -> MenuResponse {
        self.state.pressed = None;
        if let Some(index) = self.slot_at(p) {
            let started = !self.state.page_flip_active
                && self.state.drag.press(index, p, &self.state.ring);
            if !started {
                self.state.pressed = self.state.ring.get(index).map(|item| item.id.clone());
            }
        }
        self.update_hover(p)
    }

    fn motion(&mut self, p: Point) -> MenuResponse {
        if self.state.drag.phase() == DragPhase::Pending && !self.state.page_flip_active {
            let outcome = self.state.drag.motion(
                p,
                &self.state.ring,
                &self.state.layout,
                &self.tunables,
            );
            if outcome == MotionOutcome::Started {
                self.state.hovered = None;
                self.state.hovered_category = self.state.drag.hovered_category().cloned();
                return MenuResponse::redraw(true);
            }
        }
        self.update_hover(p)
    }

    fn release(&mut self, p: Point) -> MenuResponse {
        let pressed = self.state.pressed.take();
        match self.state.drag.release() {
            ReleaseOutcome::Click(index) => self.activate(Some(index)),
            // a reveal may have reshaped the ring since the press
            ReleaseOutcome::Nothing => match pressed {
                Some(item) if self.slot_at(p).is_some() => {
                    MenuResponse::default().with_event(MenuEvent::Activated { item })
                }
                _ => MenuResponse::default(),
            },
            // active drags are released through drag_pointer
            ReleaseOutcome::Drop(_) => MenuResponse::default(),
        }
    }

    fn drag_pointer(&mut self, event: PointerEvent) -> MenuResponse {
        match event {
            PointerEvent::Press(_) => MenuResponse::default(),
            PointerEvent::Move(p) => {
                if self.state.page_flip_active {
                    return MenuResponse::default();
                }
                let outcome = self.state.drag.motion(
                    p,
                    &self.state.ring,
                    &self.state.layout,
                    &self.tunables,
                );
                self.state.hovered_category = self.state.drag.hovered_category().cloned();
                MenuResponse::redraw(matches!(outcome, MotionOutcome::Updated { changed: true }))
            }
            PointerEvent::Release(p) => {
                let mut response = MenuResponse::redraw(true);
                if let ReleaseOutcome::Drop(Some(decision)) = self.state.drag.release() {
                    log::info!("Drop: {:?}", decision);
                    response = response.with_event(MenuEvent::Drop(decision));
                }
                self.after_drag();
                self.update_hover(p);
                response
            }
        }
    }

    fn after_drag(&mut self) {
        self.state.hovered = None;
        self.state.hovered_category = None;
        self.flush_pending();
    }

    /// Applies tunables and items held back during a drag.
    fn flush_pending(&mut self) -> bool {
        let retuned = match self.state.pending_tunables.take() {
            Some(tunables) => {
                self.retune(tunables);
                true
            }
            None => false,
        };
        match self.state.pending_refresh.take() {
            Some(items) => self.apply_items(items),
            None if retuned => {
                let items = std::mem::take(&mut self.state.items);
                self.apply_items(items);
            }
            None => return false,
        }
        true
    }

    fn activate(&self, index: Option<usize>) -> MenuResponse {
        index
            .and_then(|i| self.state.ring.get(i))
            .map(|item| {
                MenuResponse::default().with_event(MenuEvent::Activated {
                    item: item.id.clone(),
                })
            })
            .unwrap_or_default()
    }

    fn slot_at(&self, p: Point) -> Option<usize> {
        let hit = hit::classify(p, &self.state.layout, &self.tunables);
        (hit.region == Region::Ring)
            .then(|| self.state.layout.nearest_slot(hit.angle))
            .flatten()
    }

    fn update_hover(&mut self, p: Point) -> MenuResponse {
        let hit = hit::classify(p, &self.state.layout, &self.tunables);
        let slot = match hit.region {
            Region::Dead => None,
            Region::Ring | Region::Outer => self.state.layout.nearest_slot(hit.angle),
        };
        self.set_hover(slot)
    }

    fn set_hover(&mut self, slot: Option<usize>) -> MenuResponse {
        let changed = slot != self.state.hovered;
        self.state.hovered = slot;
        self.state.hovered_category = slot
            .and_then(|i| self.state.ring.get(i))
            .and_then(|item| item.category.clone());

        let reshaped = self.follow_hover();
        MenuResponse::redraw(changed || reshaped)
    }

    /// Reveals controls while a control is hovered, hides them otherwise.
    fn follow_hover(&mut self) -> bool {
        let over_control = self
            .state
            .hovered
            .and_then(|i| self.state.ring.get(i))
            .is_some_and(|item| item.is_pinned_control);

        let steps = if over_control {
            self.state.hide_deferred = false;
            self.state.animator.begin_reveal()
        } else {
            match self.state.animator.begin_hide() {
                Ok(steps) => steps,
                Err(e) => {
                    if !self.state.hide_deferred {
                        log::debug!("Hide deferred: {}", e);
                    }
                    self.state.hide_deferred = true;
                    Vec::new()
                }
            }
        };
        self.apply_steps(steps)
    }

    fn apply_steps(&mut self, steps: Vec<RevealStep>) -> bool {
        if steps.is_empty() {
            return false;
        }
        for step in &steps {
            log::debug!(
                "Control '{}' {}",
                step.control,
                if step.visible { "shown" } else { "hidden" }
            );
        }
        self.rebuild();
        true
    }

    fn apply_items(&mut self, items: Vec<Item>) {
        let controls: Vec<ItemId> = items
            .iter()
            .filter(|item| item.is_pinned_control)
            .map(|item| item.id.clone())
            .collect();
        self.state
            .animator
            .sync_controls(&controls, &self.tunables.pinned_controls);

        let content = items.len() - controls.len();
        if self.state.pager.refresh(content) {
            log::debug!(
                "Current page snapped to {}",
                self.state.pager.current_page()
            );
        }
        self.state.items = items;
        self.rebuild();
    }

    /// Lays out the current page plus visible controls, keeping the hovered
    /// item hovered if it survived.
    fn rebuild(&mut self) {
        let hovered_id = self
            .state
            .hovered
            .and_then(|i| self.state.ring.get(i))
            .map(|item| item.id.clone());

        let content: Vec<&Item> = self
            .state
            .items
            .iter()
            .filter(|item| !item.is_pinned_control)
            .collect();
        let mut ring: Vec<Item> = self
            .state
            .pager
            .current_page_items(&content)
            .iter()
            .map(|&item| item.clone())
            .collect();
        ring.extend(
            self.state
                .items
                .iter()
                .filter(|item| item.is_pinned_control && self.state.animator.is_visible(&item.id))
                .cloned(),
        );
        for item in &mut ring {
            self.zones.normalize(item);
        }

        self.state.layout = RingLayout::new(ring.len(), &self.tunables);
        self.state.hovered = hovered_id.and_then(|id| ring.iter().position(|item| item.id == id));
        self.state.hovered_category = self
            .state
            .hovered
            .and_then(|i| ring.get(i))
            .and_then(|item| item.category.clone());
        self.state.ring = ring;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DropTarget;
    use crate::geometry::polar_offset;
    use crate::tunables::{PinnedControlSpec, ZoneColor, ZoneSpec};

    fn tunables() -> Tunables {
        Tunables {
            categories: ["a", "b"]
                .iter()
                .map(|id| ZoneSpec {
                    id: CategoryId::from(*id),
                    color: ZoneColor::new(10, 20, 30),
                })
                .collect(),
            pinned_controls: ["menu", "add", "edit"]
                .iter()
                .map(|id| PinnedControlSpec {
                    id: ItemId::from(*id),
                    default_visible: *id == "menu",
                })
                .collect(),
            page_size: 5,
            ..Tunables::default()
        }
    }

    fn items(clips: usize) -> Vec<Item> {
        let mut items: Vec<Item> = (0..clips)
            .map(|i| Item::clip(format!("c{i}"), Some(if i % 2 == 0 { "a" } else { "b" })))
            .collect();
        items.extend(["menu", "add", "edit"].map(Item::control));
        items
    }

    fn opened(clips: usize) -> MenuController {
        let mut menu = MenuController::new(tunables());
        menu.open(&items(clips));
        menu
    }

    fn at_slot(menu: &MenuController, index: usize) -> Point {
        menu.layout().slot_offset(index)
    }

    fn start_drag(menu: &mut MenuController, index: usize) {
        let origin = at_slot(menu, index);
        menu.pointer(PointerEvent::Press(origin));
        menu.pointer(PointerEvent::Move(Point::new(origin.x + 15.0, origin.y)));
        assert_eq!(menu.drag_state(), DragPhase::Active);
    }

    #[test]
    fn test_open_lays_out_page_and_entry_control() {
        let menu = opened(3);
        let ids: Vec<&str> = menu.ring_items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c0", "c1", "c2", "menu"]);
        assert_eq!(menu.slot_positions().len(), 4);
        assert_eq!(menu.page().total_pages, 1);
    }

    #[test]
    fn test_closed_menu_ignores_input() {
        let mut menu = MenuController::new(tunables());
        let response = menu.pointer(PointerEvent::Move(Point::new(0.0, -150.0)));
        assert_eq!(response, MenuResponse::default());
        assert_eq!(menu.key(KeyAction::Next), MenuResponse::default());
    }

    #[test]
    fn test_click_activates_item() {
        let mut menu = opened(3);
        let p = at_slot(&menu, 1);
        menu.pointer(PointerEvent::Press(p));
        menu.pointer(PointerEvent::Move(Point::new(p.x + 2.0, p.y)));
        let response = menu.pointer(PointerEvent::Release(p));
        assert_eq!(
            response.events,
            vec![MenuEvent::Activated {
                item: ItemId::from("c1")
            }]
        );
    }

    #[test]
    fn test_click_on_control_activates_it() {
        let mut menu = opened(3);
        let p = at_slot(&menu, 3);
        menu.pointer(PointerEvent::Press(p));
        let response = menu.pointer(PointerEvent::Release(p));
        assert!(response.events.contains(&MenuEvent::Activated {
            item: ItemId::from("menu")
        }));
    }

    #[test]
    fn test_drag_to_center_requests_store() {
        let mut menu = opened(4);
        start_drag(&mut menu, 2);
        menu.pointer(PointerEvent::Move(Point::new(1.0, 1.0)));
        let response = menu.pointer(PointerEvent::Release(Point::new(1.0, 1.0)));
        assert_eq!(
            response.events,
            vec![MenuEvent::Drop(DropDecision::Store {
                dragged: ItemId::from("c2")
            })]
        );
        assert_eq!(menu.drag_state(), DragPhase::Idle);
    }

    #[test]
    fn test_group_child_never_merges_and_deletes_alone() {
        let mut ring = items(4);
        ring[1] = Item::clip("kid", Some("b")).child_of("g1");
        let mut menu = MenuController::new(tunables());
        menu.open(&ring);

        start_drag(&mut menu, 1);
        let sibling = at_slot(&menu, 3);
        menu.pointer(PointerEvent::Move(sibling));
        assert!(!matches!(menu.drop_target(), Some(DropTarget::MergeOnto { .. })));
        let response = menu.pointer(PointerEvent::Release(sibling));
        assert!(
            !response
                .events
                .iter()
                .any(|e| matches!(e, MenuEvent::Drop(DropDecision::MergeToGroup { .. })))
        );

        start_drag(&mut menu, 1);
        let past = menu.layout().bounds.width / 2.0 + 10.0;
        let outside = Point::new(past, past);
        menu.pointer(PointerEvent::Move(outside));
        let response = menu.pointer(PointerEvent::Release(outside));
        assert_eq!(
            response.events,
            vec![MenuEvent::Drop(DropDecision::Delete {
                dragged: ItemId::from("kid")
            })]
        );
    }

    #[test]
    fn test_hover_frozen_during_drag() {
        let mut menu = opened(4);
        start_drag(&mut menu, 0);
        assert_eq!(menu.hovered_slot(), None);

        menu.pointer(PointerEvent::Move(polar_offset(
            menu.layout().slot_angle(1),
            menu.layout().radius,
        )));
        assert_eq!(menu.hovered_slot(), None);
        // category badge tracking keeps running
        assert_eq!(menu.hovered_category(), Some(&CategoryId::from("b")));
    }

    #[test]
    fn test_page_change_rejected_during_drag() {
        let mut menu = opened(12);
        start_drag(&mut menu, 0);
        assert_eq!(menu.next_page(), Err(MenuError::DragInProgress));
        assert_eq!(menu.page().index, 0);

        menu.key(KeyAction::Cancel);
        let response = menu.next_page().unwrap();
        assert_eq!(
            response.events,
            vec![MenuEvent::PageChanged { page: 1, total: 3 }]
        );
        assert_eq!(menu.ring_items()[0].id, ItemId::from("c5"));
        assert_eq!(menu.set_page(99).unwrap().events.len(), 1);
        assert_eq!(menu.page().index, 2);
        assert_eq!(menu.ring_items().len(), 3);
    }

    #[test]
    fn test_refresh_deferred_during_drag() {
        let mut menu = opened(4);
        start_drag(&mut menu, 0);
        assert_eq!(menu.refresh(items(2)), RefreshOutcome::Deferred);
        assert_eq!(menu.ring_items().len(), 5);

        let p = at_slot(&menu, 2);
        menu.pointer(PointerEvent::Move(p));
        let response = menu.pointer(PointerEvent::Release(p));
        assert!(matches!(
            response.events.as_slice(),
            [MenuEvent::Drop(DropDecision::MergeToGroup { .. })]
        ));
        assert_eq!(menu.ring_items().len(), 3);
    }

    #[test]
    fn test_tunables_deferred_during_drag() {
        let mut menu = opened(12);
        assert_eq!(menu.ring_items().len(), 6);

        start_drag(&mut menu, 0);
        let smaller = Tunables {
            page_size: 2,
            ..tunables()
        };
        assert_eq!(menu.set_tunables(smaller), RefreshOutcome::Deferred);
        assert_eq!(menu.tunables().page_size, 5);
        assert_eq!(menu.ring_items().len(), 6);
        assert_eq!(menu.layout().n, 6);
        assert_eq!(menu.dragged_slot(), Some(0));

        menu.key(KeyAction::Cancel);
        assert_eq!(menu.drag_state(), DragPhase::Idle);
        assert_eq!(menu.tunables().page_size, 2);
        assert_eq!(menu.ring_items().len(), 3);
        assert_eq!(menu.page().total_pages, 6);
    }

    #[test]
    fn test_tunables_apply_immediately_when_idle() {
        let mut menu = opened(12);
        let smaller = Tunables {
            page_size: 2,
            ..tunables()
        };
        assert_eq!(menu.set_tunables(smaller), RefreshOutcome::Applied);
        assert_eq!(menu.ring_items().len(), 3);
        assert_eq!(menu.layout().n, 3);
    }

    #[test]
    fn test_close_abandons_drag_and_collapses() {
        let mut menu = opened(4);
        menu.pointer(PointerEvent::Move(at_slot(&menu, 4)));
        assert_eq!(menu.reveal_progress().state, RevealState::Revealing);

        start_drag(&mut menu, 1);
        let response = menu.close();
        assert_eq!(response.events, vec![MenuEvent::Closed]);
        assert_eq!(menu.drag_state(), DragPhase::Idle);
        assert_eq!(menu.reveal_progress().state, RevealState::Collapsed);
        assert_eq!(menu.reveal_progress().visible, vec![ItemId::from("menu")]);
        assert!(!menu.is_open());
    }

    #[test]
    fn test_hover_on_entry_reveals_controls() {
        let mut menu = opened(4);
        assert_eq!(menu.layout().n, 5);

        let response = menu.pointer(PointerEvent::Move(at_slot(&menu, 4)));
        assert!(response.redraw);
        assert_eq!(menu.layout().n, 6);
        // the entry control stays hovered after the ring grows
        assert_eq!(menu.hovered_slot(), Some(4));

        menu.tick(30);
        assert_eq!(menu.layout().n, 7);
        assert_eq!(menu.reveal_progress().state, RevealState::Revealed);
    }

    #[test]
    fn test_leaving_mid_reveal_hides_after_completion() {
        let mut menu = opened(4);
        menu.pointer(PointerEvent::Move(at_slot(&menu, 4)));
        assert_eq!(menu.reveal_progress().state, RevealState::Revealing);

        menu.pointer(PointerEvent::Move(Point::new(0.0, 0.0)));
        assert_eq!(menu.reveal_progress().state, RevealState::Revealing);

        // finishing the reveal starts the deferred hide
        menu.tick(30);
        assert_eq!(menu.reveal_progress().state, RevealState::Hiding);
        menu.tick(30);
        assert_eq!(menu.reveal_progress().state, RevealState::Collapsed);
        assert_eq!(menu.layout().n, 5);
    }

    #[test]
    fn test_tick_held_during_drag() {
        let mut menu = opened(4);
        menu.pointer(PointerEvent::Move(at_slot(&menu, 4)));
        menu.pointer(PointerEvent::Move(Point::new(0.0, 0.0)));
        start_drag(&mut menu, 0);
        assert_eq!(menu.tick(1000), MenuResponse::default());
        assert_eq!(menu.reveal_progress().state, RevealState::Revealing);
    }

    #[test]
    fn test_keyboard_walks_slots_and_reveals() {
        let mut menu = opened(2);
        menu.key(KeyAction::Next);
        assert_eq!(menu.hovered_slot(), Some(0));
        menu.key(KeyAction::Previous);
        assert_eq!(menu.hovered_slot(), Some(2));
        assert_eq!(menu.ring_items()[2].id, ItemId::from("menu"));
        assert_eq!(menu.reveal_progress().state, RevealState::Revealing);

        menu.tick(30);
        menu.key(KeyAction::Next);
        assert_eq!(menu.ring_items()[3].id, ItemId::from("add"));
        let response = menu.key(KeyAction::Activate);
        assert_eq!(
            response.events,
            vec![MenuEvent::Activated {
                item: ItemId::from("add")
            }]
        );

        let response = menu.key(KeyAction::Cancel);
        assert_eq!(response.events, vec![MenuEvent::Closed]);
    }

    #[test]
    fn test_empty_ring_is_dead() {
        let mut menu = MenuController::new(Tunables::default());
        menu.open(&Vec::<Item>::new());
        assert_eq!(menu.layout().n, 0);
        let response = menu.pointer(PointerEvent::Press(Point::new(0.0, -150.0)));
        assert_eq!(response, MenuResponse::default());
        assert_eq!(menu.hovered_slot(), None);
    }

    #[test]
    fn test_page_flip_suspends_drag_start() {
        let mut menu = opened(4);
        menu.set_page_flip_active(true);
        let origin = at_slot(&menu, 0);
        menu.pointer(PointerEvent::Press(origin));
        menu.pointer(PointerEvent::Move(Point::new(origin.x + 30.0, origin.y)));
        assert_eq!(menu.drag_state(), DragPhase::Idle);
        menu.set_page_flip_active(false);
    }

    #[test]
    fn test_key_action_parsing() {
        assert_eq!("next".parse::<KeyAction>().unwrap(), KeyAction::Next);
        assert_eq!("Cancel".parse::<KeyAction>().unwrap(), KeyAction::Cancel);
        assert!("jump".parse::<KeyAction>().is_err());
    }
}
