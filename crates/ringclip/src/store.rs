//! In-memory clip list backing the ring.
//!
//! Top-level entries are clips or groups of clips. At most one group is open
//! at a time; its children are shown on the ring in place of the group.

use crate::config::{ClipSeed, Config};
use radial::{CategoryId, Item, ItemId, ItemSource, MutationSink, PinnedControlSpec};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown item '{0}'")]
    UnknownItem(ItemId),
    #[error("'{0}' is a group and cannot be merged")]
    GroupMerge(ItemId),
    #[error("cannot merge '{0}' onto itself")]
    SelfMerge(ItemId),
    #[error("'{child}' is not in group '{group}'")]
    NotInGroup { child: ItemId, group: ItemId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub id: ItemId,
    pub text: String,
    pub category: Option<CategoryId>,
    pub saved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: ItemId,
    pub category: Option<CategoryId>,
    pub children: Vec<Clip>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Clip(Clip),
    Group(Group),
}

impl Entry {
    pub fn id(&self) -> &ItemId {
        match self {
            Self::Clip(c) => &c.id,
            Self::Group(g) => &g.id,
        }
    }

    pub fn category(&self) -> Option<&CategoryId> {
        match self {
            Self::Clip(c) => c.category.as_ref(),
            Self::Group(g) => g.category.as_ref(),
        }
    }

    fn set_category(&mut self, category: Option<CategoryId>) {
        match self {
            Self::Clip(c) => c.category = category,
            Self::Group(g) => g.category = category,
        }
    }
}

#[derive(Debug, Default)]
pub struct ClipStore {
    entries: Vec<Entry>,
    controls: Vec<PinnedControlSpec>,
    open_group: Option<ItemId>,
    next_id: u64,
}

impl ClipStore {
    pub fn new(controls: Vec<PinnedControlSpec>) -> Self {
        Self {
            controls,
            ..Self::default()
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut store = Self::new(config.menu.pinned_controls.clone());
        for seed in &config.clips {
            store.seed(seed);
        }
        store
    }

    pub fn set_controls(&mut self, controls: Vec<PinnedControlSpec>) {
        self.controls = controls;
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn open_group(&self) -> Option<&ItemId> {
        self.open_group.as_ref()
    }

    pub fn is_control(&self, id: &ItemId) -> bool {
        self.controls.iter().any(|c| &c.id == id)
    }

    /// Adds a fresh clip at the front of the ring.
    pub fn push(&mut self, text: impl Into<String>, category: Option<CategoryId>) -> ItemId {
        let clip = self.new_clip(text.into(), category);
        let id = clip.id.clone();
        log::info!("Added clip '{}'", id);
        self.entries.insert(0, Entry::Clip(clip));
        id
    }

    fn seed(&mut self, seed: &ClipSeed) {
        let clip = self.new_clip(seed.text.clone(), seed.category.clone());
        self.entries.push(Entry::Clip(clip));
    }

    pub fn clip(&self, id: &ItemId) -> Option<&Clip> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Clip(c) if &c.id == id => Some(c),
            Entry::Clip(_) => None,
            Entry::Group(g) => g.children.iter().find(|c| &c.id == id),
        })
    }

    pub fn group(&self, id: &ItemId) -> Option<&Group> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Group(g) if &g.id == id => Some(g),
            _ => None,
        })
    }

    /// Text shown on a slot: the clip text, or a count for groups.
    pub fn label(&self, id: &ItemId) -> Option<String> {
        self.clip(id)
            .map(|c| c.text.clone())
            .or_else(|| self.group(id).map(|g| format!("{} clips", g.children.len())))
    }

    /// Opens `id` if it is a closed group, closes it if it is the open one.
    pub fn toggle_group(&mut self, id: &ItemId) -> Result<bool, StoreError> {
        if self.group(id).is_none() {
            return Err(StoreError::UnknownItem(id.clone()));
        }
        if self.open_group.as_ref() == Some(id) {
            self.open_group = None;
            Ok(false)
        } else {
            self.open_group = Some(id.clone());
            Ok(true)
        }
    }

    pub fn close_group(&mut self) {
        self.open_group = None;
    }

    pub fn reorder(
        &mut self,
        dragged: &ItemId,
        target: &ItemId,
        insert_before: bool,
        category: Option<&CategoryId>,
    ) -> Result<(), StoreError> {
        let from = self
            .top_level(dragged)
            .ok_or_else(|| StoreError::UnknownItem(dragged.clone()))?;
        let mut entry = self.entries.remove(from);
        entry.set_category(category.cloned());

        let Some(to) = self.anchor(target) else {
            self.entries.insert(from, entry);
            return Err(StoreError::UnknownItem(target.clone()));
        };
        let at = if insert_before { to } else { to + 1 };
        log::info!("Moved '{}' next to '{}'", dragged, target);
        self.entries.insert(at, entry);
        Ok(())
    }

    /// Merges a top-level clip onto another clip (creating a group) or onto
    /// an existing group (appending to it).
    pub fn merge(&mut self, dragged: &ItemId, target: &ItemId) -> Result<(), StoreError> {
        if dragged == target {
            return Err(StoreError::SelfMerge(dragged.clone()));
        }
        let from = self
            .top_level(dragged)
            .ok_or_else(|| StoreError::UnknownItem(dragged.clone()))?;
        if matches!(self.entries[from], Entry::Group(_)) {
            return Err(StoreError::GroupMerge(dragged.clone()));
        }
        let to = self
            .anchor(target)
            .ok_or_else(|| StoreError::UnknownItem(target.clone()))?;

        let Entry::Clip(clip) = self.entries.remove(from) else {
            return Err(StoreError::GroupMerge(dragged.clone()));
        };
        let to = if from < to { to - 1 } else { to };

        match &mut self.entries[to] {
            Entry::Group(group) => {
                log::info!("Added '{}' to group '{}'", clip.id, group.id);
                group.children.push(clip);
            }
            Entry::Clip(existing) => {
                let existing = existing.clone();
                let group = Group {
                    id: self.fresh_id("group"),
                    category: existing.category.clone(),
                    children: vec![existing, clip],
                };
                log::info!("Grouped '{}' and '{}' as '{}'", target, dragged, group.id);
                self.entries[to] = Entry::Group(group);
            }
        }
        Ok(())
    }

    /// Marks an item as kept. A group child is pulled out next to its group first.
    pub fn store(&mut self, id: &ItemId) -> Result<(), StoreError> {
        if let Some(index) = self.top_level(id) {
            match &mut self.entries[index] {
                Entry::Clip(c) => c.saved = true,
                Entry::Group(g) => g.children.iter_mut().for_each(|c| c.saved = true),
            }
            log::info!("Stored '{}'", id);
            return Ok(());
        }

        let group = self
            .parent_of(id)
            .ok_or_else(|| StoreError::UnknownItem(id.clone()))?;
        let mut clip = self.take_child(id, &group)?;
        clip.saved = true;
        let at = self.top_level(&group).map_or(0, |i| i + 1);
        self.entries.insert(at, Entry::Clip(clip));
        self.tidy_group(&group);
        log::info!("Stored '{}' out of group '{}'", id, group);
        Ok(())
    }

    pub fn delete(&mut self, id: &ItemId) -> Result<(), StoreError> {
        if let Some(index) = self.top_level(id) {
            self.entries.remove(index);
            if self.open_group.as_ref() == Some(id) {
                self.open_group = None;
            }
            log::info!("Deleted '{}'", id);
            return Ok(());
        }

        let group = self
            .parent_of(id)
            .ok_or_else(|| StoreError::UnknownItem(id.clone()))?;
        self.take_child(id, &group)?;
        self.tidy_group(&group);
        log::info!("Deleted '{}' from group '{}'", id, group);
        Ok(())
    }

    /// Moves a child out of its group next to `target`. A sibling target
    /// reorders the child within the group instead.
    pub fn extract(
        &mut self,
        child: &ItemId,
        group: &ItemId,
        target: &ItemId,
        insert_before: bool,
        category: Option<&CategoryId>,
    ) -> Result<(), StoreError> {
        if self.parent_of(child).as_ref() != Some(group) {
            return Err(StoreError::NotInGroup {
                child: child.clone(),
                group: group.clone(),
            });
        }

        if self.parent_of(target).as_ref() == Some(group) {
            let clip = self.take_child(child, group)?;
            if let Some(Entry::Group(g)) = self.top_level(group).map(|i| &mut self.entries[i]) {
                let to = g.children.iter().position(|c| &c.id == target).unwrap_or(0);
                let at = if insert_before { to } else { to + 1 };
                g.children.insert(at, clip);
            }
            log::info!("Moved '{}' within group '{}'", child, group);
            return Ok(());
        }

        let Some(to) = self.top_level(target) else {
            return Err(StoreError::UnknownItem(target.clone()));
        };
        let mut clip = self.take_child(child, group)?;
        clip.category = category.cloned();
        let to = self.top_level(target).unwrap_or(to);
        let at = if insert_before { to } else { to + 1 };
        self.entries.insert(at, Entry::Clip(clip));
        self.tidy_group(group);
        log::info!("Extracted '{}' from group '{}'", child, group);
        Ok(())
    }

    fn new_clip(&mut self, text: String, category: Option<CategoryId>) -> Clip {
        Clip {
            id: self.fresh_id("clip"),
            text,
            category,
            saved: false,
        }
    }

    fn fresh_id(&mut self, prefix: &str) -> ItemId {
        self.next_id += 1;
        ItemId::new(format!("{prefix}-{}", self.next_id))
    }

    fn top_level(&self, id: &ItemId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    fn parent_of(&self, id: &ItemId) -> Option<ItemId> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Group(g) if g.children.iter().any(|c| &c.id == id) => Some(g.id.clone()),
            _ => None,
        })
    }

    /// Top-level index an insertion next to `id` lands at; children of the
    /// open group resolve to the group itself.
    fn anchor(&self, id: &ItemId) -> Option<usize> {
        self.top_level(id)
            .or_else(|| self.parent_of(id).and_then(|g| self.top_level(&g)))
    }

    fn take_child(&mut self, id: &ItemId, group: &ItemId) -> Result<Clip, StoreError> {
        let not_in_group = || StoreError::NotInGroup {
            child: id.clone(),
            group: group.clone(),
        };
        let index = self.top_level(group).ok_or_else(not_in_group)?;
        let Entry::Group(g) = &mut self.entries[index] else {
            return Err(not_in_group());
        };
        let pos = g
            .children
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(not_in_group)?;
        Ok(g.children.remove(pos))
    }

    /// Dissolves an empty group and unwraps a group left with one child.
    fn tidy_group(&mut self, id: &ItemId) {
        let Some(index) = self.top_level(id) else {
            return;
        };
        let Entry::Group(g) = &mut self.entries[index] else {
            return;
        };

        match g.children.len() {
            0 => {
                self.entries.remove(index);
            }
            1 => {
                let mut only = g.children.remove(0);
                if only.category.is_none() {
                    only.category = g.category.clone();
                }
                self.entries[index] = Entry::Clip(only);
            }
            _ => return,
        }
        log::debug!("Group '{}' dissolved", id);
        if self.open_group.as_ref() == Some(id) {
            self.open_group = None;
        }
    }
}

impl ItemSource for ClipStore {
    fn visible_items(&self) -> Vec<Item> {
        let mut items = Vec::with_capacity(self.entries.len() + self.controls.len());

        for entry in &self.entries {
            match entry {
                Entry::Clip(c) => items.push(Item {
                    id: c.id.clone(),
                    category: c.category.clone(),
                    is_group: false,
                    is_pinned_control: false,
                    group: None,
                }),
                Entry::Group(g) if self.open_group.as_ref() == Some(&g.id) => {
                    items.extend(g.children.iter().map(|c| Item {
                        id: c.id.clone(),
                        category: g.category.clone(),
                        is_group: false,
                        is_pinned_control: false,
                        group: Some(g.id.clone()),
                    }));
                }
                Entry::Group(g) => items.push(Item {
                    id: g.id.clone(),
                    category: g.category.clone(),
                    is_group: true,
                    is_pinned_control: false,
                    group: None,
                }),
            }
        }

        items.extend(self.controls.iter().map(|c| Item::control(c.id.to_string())));
        items
    }
}

impl MutationSink for ClipStore {
    fn on_reorder(
        &mut self,
        dragged: &ItemId,
        target: &ItemId,
        insert_before: bool,
        category: Option<&CategoryId>,
    ) {
        if let Err(e) = self.reorder(dragged, target, insert_before, category) {
            log::warn!("Ignoring reorder: {}", e);
        }
    }

    fn on_merge_to_group(&mut self, dragged: &ItemId, target: &ItemId) {
        if let Err(e) = self.merge(dragged, target) {
            log::warn!("Ignoring merge: {}", e);
        }
    }

    fn on_store_request(&mut self, dragged: &ItemId) {
        if let Err(e) = self.store(dragged) {
            log::warn!("Ignoring store: {}", e);
        }
    }

    fn on_delete_request(&mut self, dragged: &ItemId) {
        if let Err(e) = self.delete(dragged) {
            log::warn!("Ignoring delete: {}", e);
        }
    }

    fn on_extract_from_group(
        &mut self,
        child: &ItemId,
        group: &ItemId,
        target: &ItemId,
        insert_before: bool,
        category: Option<&CategoryId>,
    ) {
        if let Err(e) = self.extract(child, group, target, insert_before, category) {
            log::warn!("Ignoring extract: {}", e);
        }
    }
}
