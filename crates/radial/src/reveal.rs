//! Progressive reveal and hide of pinned controls.
//!
//! Controls that are not visible by default stay collapsed until the pointer
//! (or keyboard focus) reaches a visible control. They are then shown one per
//! step, closest to an always-visible control first, and hidden again in the
//! opposite order. The host drives time through `tick`.

use crate::item::ItemId;
use crate::tunables::PinnedControlSpec;
use std::collections::VecDeque;
use strum::Display;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RevealState {
    Collapsed,
    Revealing,
    Revealed,
    Hiding,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevealError {
    #[error("reveal still running, {remaining} control(s) queued")]
    RevealInFlight { remaining: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealStep {
    pub control: ItemId,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealProgress {
    pub state: RevealState,
    pub visible: Vec<ItemId>,
    pub queued: usize,
}

#[derive(Debug, Clone)]
struct Control {
    id: ItemId,
    always_visible: bool,
    visible: bool,
}

#[derive(Debug, Clone)]
pub struct RevealAnimator {
    controls: Vec<Control>,
    state: RevealState,
    queue: VecDeque<usize>,
    elapsed_ms: u64,
    step_ms: u64,
}

impl RevealAnimator {
    pub fn new(step_ms: u64) -> Self {
        Self {
            controls: Vec::new(),
            state: RevealState::Collapsed,
            queue: VecDeque::new(),
            elapsed_ms: 0,
            step_ms,
        }
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn set_step_ms(&mut self, step_ms: u64) {
        self.step_ms = step_ms;
    }

    /// Replaces the known controls, in ring order. Controls without a spec
    /// entry are always visible. Visibility of surviving controls carries over.
    pub fn sync_controls(&mut self, ids: &[ItemId], specs: &[PinnedControlSpec]) {
        let previous = std::mem::take(&mut self.controls);
        let queued: Vec<ItemId> = self
            .queue
            .iter()
            .filter_map(|&i| previous.get(i).map(|c| c.id.clone()))
            .collect();

        self.controls = ids
            .iter()
            .map(|id| {
                let always_visible = specs
                    .iter()
                    .find(|s| &s.id == id)
                    .is_none_or(|s| s.default_visible);
                // newcomers join an already revealed set as visible
                let visible = always_visible
                    || previous
                        .iter()
                        .find(|c| &c.id == id)
                        .map_or(self.state == RevealState::Revealed, |c| c.visible);
                Control {
                    id: id.clone(),
                    always_visible,
                    visible,
                }
            })
            .collect();

        self.queue = queued
            .iter()
            .filter_map(|id| self.position(id))
            .collect();
        if self.queue.is_empty() {
            self.settle();
        }
    }

    pub fn is_visible(&self, id: &ItemId) -> bool {
        self.controls
            .iter()
            .find(|c| &c.id == id)
            .is_none_or(|c| c.visible)
    }

    pub fn progress(&self) -> RevealProgress {
        RevealProgress {
            state: self.state,
            visible: self
                .controls
                .iter()
                .filter(|c| c.visible)
                .map(|c| c.id.clone())
                .collect(),
            queued: self.queue.len(),
        }
    }

    /// Collapsible controls, nearest to an always-visible control first.
    pub fn reveal_order(&self) -> Vec<ItemId> {
        self.ordered_indices()
            .into_iter()
            .map(|i| self.controls[i].id.clone())
            .collect()
    }

    pub fn begin_reveal(&mut self) -> Vec<RevealStep> {
        match self.state {
            RevealState::Revealing | RevealState::Revealed => return Vec::new(),
            RevealState::Collapsed | RevealState::Hiding => {}
        }

        self.queue = self
            .ordered_indices()
            .into_iter()
            .filter(|&i| !self.controls[i].visible)
            .collect();
        self.elapsed_ms = 0;
        log::debug!("Revealing {} control(s)", self.queue.len());
        self.state = RevealState::Revealing;
        self.advance()
    }

    pub fn begin_hide(&mut self) -> Result<Vec<RevealStep>, RevealError> {
        match self.state {
            RevealState::Revealing => {
                return Err(RevealError::RevealInFlight {
                    remaining: self.queue.len(),
                });
            }
            RevealState::Collapsed | RevealState::Hiding => return Ok(Vec::new()),
            RevealState::Revealed => {}
        }

        self.queue = self
            .ordered_indices()
            .into_iter()
            .rev()
            .filter(|&i| self.controls[i].visible)
            .collect();
        self.elapsed_ms = 0;
        log::debug!("Hiding {} control(s)", self.queue.len());
        self.state = RevealState::Hiding;
        Ok(self.advance())
    }

    pub fn tick(&mut self, elapsed_ms: u64) -> Vec<RevealStep> {
        if self.queue.is_empty() {
            return Vec::new();
        }
        self.elapsed_ms += elapsed_ms;

        let mut steps = Vec::new();
        while !self.queue.is_empty() && self.elapsed_ms >= self.step_ms {
            self.elapsed_ms -= self.step_ms;
            steps.extend(self.advance());
        }
        steps
    }

    /// Instantly hides every collapsible control and drops any queued steps.
    pub fn collapse_all(&mut self) -> bool {
        let mut changed = !self.queue.is_empty();
        self.queue.clear();
        self.elapsed_ms = 0;
        for control in self.controls.iter_mut().filter(|c| !c.always_visible) {
            changed |= control.visible;
            control.visible = false;
        }
        self.state = RevealState::Collapsed;
        changed
    }

    fn advance(&mut self) -> Vec<RevealStep> {
        let step = self.queue.pop_front().map(|i| {
            let visible = self.state == RevealState::Revealing;
            let control = &mut self.controls[i];
            control.visible = visible;
            RevealStep {
                control: control.id.clone(),
                visible,
            }
        });
        if self.queue.is_empty() {
            self.settle();
        }
        step.into_iter().collect()
    }

    fn settle(&mut self) {
        self.elapsed_ms = 0;
        self.state = match self.state {
            RevealState::Revealing => RevealState::Revealed,
            RevealState::Hiding => RevealState::Collapsed,
            other => other,
        };
    }

    fn position(&self, id: &ItemId) -> Option<usize> {
        self.controls.iter().position(|c| &c.id == id)
    }

    fn ordered_indices(&self) -> Vec<usize> {
        let anchors: Vec<usize> = self
            .controls
            .iter()
            .enumerate()
            .filter(|(_, c)| c.always_visible)
            .map(|(i, _)| i)
            .collect();

        let mut order: Vec<usize> = (0..self.controls.len())
            .filter(|&i| !self.controls[i].always_visible)
            .collect();
        order.sort_by_key(|&i| {
            let distance = anchors.iter().map(|&a| a.abs_diff(i)).min().unwrap_or(i);
            (distance, i)
        });
        order
    }
}
