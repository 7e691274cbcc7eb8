//! Press / move / release state machine for dragging ring items.
//!
//! `Idle -> Pending` on press over a draggable item, `Pending -> Active` once
//! the pointer travels `drag_threshold` away from the press point, and back to
//! `Idle` on release. A release while `Pending` is a plain click; a release
//! while `Active` yields the drop decision matching the last classification.
//! The engine only reports decisions, the data layer carries them out.

use crate::geometry::{Point, RingLayout};
use crate::hit::{self, Region};
use crate::item::{CategoryId, Item, ItemId};
use crate::tunables::Tunables;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DragPhase {
    Idle,
    Pending,
    Active,
}

/// What releasing the pointer right now would mean.
#[derive(Debug, Clone, PartialEq)]
pub enum DropTarget {
    None,
    ReorderBetween {
        target: usize,
        insert_before: bool,
        category: Option<CategoryId>,
        angle: f64,
    },
    MergeOnto {
        target: usize,
    },
    /// Store intent.
    Center,
    /// Delete intent.
    Outside,
}

impl DropTarget {
    pub fn indicator_angle(&self, layout: &RingLayout) -> Option<f64> {
        match self {
            Self::ReorderBetween { angle, .. } => Some(*angle),
            Self::MergeOnto { target } => Some(layout.slot_angle(*target)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropDecision {
    Reorder {
        dragged: ItemId,
        target: ItemId,
        insert_before: bool,
        category: Option<CategoryId>,
    },
    MergeToGroup {
        dragged: ItemId,
        target: ItemId,
    },
    Store {
        dragged: ItemId,
    },
    Delete {
        dragged: ItemId,
    },
    ExtractFromGroup {
        child: ItemId,
        group: ItemId,
        target: ItemId,
        insert_before: bool,
        category: Option<CategoryId>,
    },
}

impl DropDecision {
    pub fn dragged(&self) -> &ItemId {
        match self {
            Self::Reorder { dragged, .. }
            | Self::MergeToGroup { dragged, .. }
            | Self::Store { dragged }
            | Self::Delete { dragged } => dragged,
            Self::ExtractFromGroup { child, .. } => child,
        }
    }

    pub fn dispatch<S: MutationSink + ?Sized>(&self, sink: &mut S) {
        match self {
            Self::Reorder {
                dragged,
                target,
                insert_before,
                category,
            } => sink.on_reorder(dragged, target, *insert_before, category.as_ref()),
            Self::MergeToGroup { dragged, target } => sink.on_merge_to_group(dragged, target),
            Self::Store { dragged } => sink.on_store_request(dragged),
            Self::Delete { dragged } => sink.on_delete_request(dragged),
            Self::ExtractFromGroup {
                child,
                group,
                target,
                insert_before,
                category,
            } => sink.on_extract_from_group(child, group, target, *insert_before, category.as_ref()),
        }
    }
}

/// Data layer side of a drop. Every handler is expected to end with a
/// `refresh` of the engine once the item list has changed.
pub trait MutationSink {
    fn on_reorder(
        &mut self,
        dragged: &ItemId,
        target: &ItemId,
        insert_before: bool,
        category: Option<&CategoryId>,
    );
    fn on_merge_to_group(&mut self, dragged: &ItemId, target: &ItemId);
    fn on_store_request(&mut self, dragged: &ItemId);
    fn on_delete_request(&mut self, dragged: &ItemId);
    fn on_extract_from_group(
        &mut self,
        child: &ItemId,
        group: &ItemId,
        target: &ItemId,
        insert_before: bool,
        category: Option<&CategoryId>,
    );
}

/// Ring contents frozen when the drag became active; decisions are resolved
/// against it even if the live list changes.
#[derive(Debug, Clone)]
struct Snapshot {
    items: Vec<Item>,
    layout: RingLayout,
}

#[derive(Debug, Clone, Default)]
enum DragState {
    #[default]
    Idle,
    Pending {
        index: usize,
        origin: Point,
    },
    Active {
        index: usize,
        snapshot: Snapshot,
        target: DropTarget,
        hovered: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOutcome {
    Ignored,
    /// Still below the threshold.
    Waiting,
    Started,
    Updated { changed: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Nothing,
    Click(usize),
    Drop(Option<DropDecision>),
}

pub fn classify_drop(
    p: Point,
    items: &[Item],
    layout: &RingLayout,
    dragged: usize,
    tunables: &Tunables,
) -> DropTarget {
    let hit = hit::classify(p, layout, tunables);

    if hit.region == Region::Dead {
        return DropTarget::Center;
    }
    if !layout.bounds.contains(p) {
        return DropTarget::Outside;
    }
    if let Some(target) = hit::fusion_target(hit.angle, items, layout, dragged, tunables) {
        return DropTarget::MergeOnto { target };
    }

    let candidates = hit::insertion_candidates(items, layout, Some(dragged), tunables);
    hit::nearest_insertion(&candidates, hit.angle, layout, tunables)
        .map(|c| DropTarget::ReorderBetween {
            target: c.target,
            insert_before: c.insert_before,
            category: c.category.clone(),
            angle: c.angle,
        })
        .unwrap_or(DropTarget::None)
}

fn resolve(items: &[Item], dragged: usize, target: &DropTarget) -> Option<DropDecision> {
    let item = items.get(dragged)?;
    let dragged_id = item.id.clone();

    match target {
        DropTarget::None => None,
        DropTarget::Center => Some(DropDecision::Store {
            dragged: dragged_id,
        }),
        DropTarget::Outside => Some(DropDecision::Delete {
            dragged: dragged_id,
        }),
        DropTarget::MergeOnto { target } => {
            if item.is_group_child() {
                log::warn!("Ignoring merge of group child '{}'", item.id);
                return None;
            }
            Some(DropDecision::MergeToGroup {
                dragged: dragged_id,
                target: items.get(*target)?.id.clone(),
            })
        }
        DropTarget::ReorderBetween {
            target,
            insert_before,
            category,
            ..
        } => {
            let target_id = items.get(*target)?.id.clone();
            Some(match &item.group {
                Some(group) => DropDecision::ExtractFromGroup {
                    child: dragged_id,
                    group: group.clone(),
                    target: target_id,
                    insert_before: *insert_before,
                    category: category.clone(),
                },
                None => DropDecision::Reorder {
                    dragged: dragged_id,
                    target: target_id,
                    insert_before: *insert_before,
                    category: category.clone(),
                },
            })
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        match self.state {
            DragState::Idle => DragPhase::Idle,
            DragState::Pending { .. } => DragPhase::Pending,
            DragState::Active { .. } => DragPhase::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Active { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    pub fn dragged_index(&self) -> Option<usize> {
        match self.state {
            DragState::Idle => None,
            DragState::Pending { index, .. } | DragState::Active { index, .. } => Some(index),
        }
    }

    pub fn dragged_item(&self) -> Option<&Item> {
        match &self.state {
            DragState::Active {
                index, snapshot, ..
            } => snapshot.items.get(*index),
            _ => None,
        }
    }

    pub fn target(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Active { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Slot whose wedge the pointer is in while dragging.
    pub fn hovered_slot(&self) -> Option<usize> {
        match &self.state {
            DragState::Active { hovered, .. } => *hovered,
            _ => None,
        }
    }

    pub fn hovered_category(&self) -> Option<&CategoryId> {
        match &self.state {
            DragState::Active {
                hovered, snapshot, ..
            } => hovered
                .and_then(|i| snapshot.items.get(i))
                .and_then(|item| item.category.as_ref()),
            _ => None,
        }
    }

    pub fn indicator_angle(&self) -> Option<f64> {
        match &self.state {
            DragState::Active {
                target, snapshot, ..
            } => target.indicator_angle(&snapshot.layout),
            _ => None,
        }
    }

    pub fn press(&mut self, index: usize, origin: Point, items: &[Item]) -> bool {
        if !self.is_idle() || !items.get(index).is_some_and(Item::is_draggable) {
            return false;
        }
        self.state = DragState::Pending { index, origin };
        true
    }

    pub fn motion(
        &mut self,
        p: Point,
        items: &[Item],
        layout: &RingLayout,
        tunables: &Tunables,
    ) -> MotionOutcome {
        match &mut self.state {
            DragState::Idle => MotionOutcome::Ignored,
            DragState::Pending { index, origin } => {
                if origin.distance_to(p) < tunables.drag_threshold {
                    return MotionOutcome::Waiting;
                }
                let index = *index;
                let snapshot = Snapshot {
                    items: items.to_vec(),
                    layout: layout.clone(),
                };
                let target = classify_drop(p, &snapshot.items, &snapshot.layout, index, tunables);
                let hovered = wedge_under(p, &snapshot.layout, tunables);
                log::debug!("Drag started on slot {} ({:?})", index, target);
                self.state = DragState::Active {
                    index,
                    snapshot,
                    target,
                    hovered,
                };
                MotionOutcome::Started
            }
            DragState::Active {
                index,
                snapshot,
                target,
                hovered,
            } => {
                let next = classify_drop(p, &snapshot.items, &snapshot.layout, *index, tunables);
                let next_hover = wedge_under(p, &snapshot.layout, tunables);
                let changed = next != *target || next_hover != *hovered;
                *target = next;
                *hovered = next_hover;
                MotionOutcome::Updated { changed }
            }
        }
    }

    pub fn release(&mut self) -> ReleaseOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Idle => ReleaseOutcome::Nothing,
            DragState::Pending { index, .. } => ReleaseOutcome::Click(index),
            DragState::Active {
                index,
                snapshot,
                target,
                ..
            } => {
                let decision = resolve(&snapshot.items, index, &target);
                if decision.is_none() {
                    log::debug!("Drag of slot {} released without a target", index);
                }
                ReleaseOutcome::Drop(decision)
            }
        }
    }

    /// Drops any pending or active drag without producing a decision.
    pub fn abandon(&mut self) -> bool {
        let was_dragging = !self.is_idle();
        self.state = DragState::Idle;
        was_dragging
    }
}

fn wedge_under(p: Point, layout: &RingLayout, tunables: &Tunables) -> Option<usize> {
    let hit = hit::classify(p, layout, tunables);
    match hit.region {
        Region::Dead => None,
        _ => layout.nearest_slot(hit.angle),
    }
}
