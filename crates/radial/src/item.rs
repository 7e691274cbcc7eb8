use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemId(String);

crate::impl_string_newtype!(ItemId);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct CategoryId(String);

crate::impl_string_newtype!(CategoryId);

/// One entry of the list handed to the engine on open/refresh.
///
/// The engine keeps no identity across refreshes: everything it needs is the
/// ordinal position of the item in the list plus the flags below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub category: Option<CategoryId>,
    pub is_group: bool,
    pub is_pinned_control: bool,
    /// Parent group when the item is a group child expanded onto the ring.
    pub group: Option<ItemId>,
}

impl Item {
    pub fn clip(id: impl Into<String>, category: Option<&str>) -> Self {
        Self {
            id: ItemId::new(id),
            category: category.map(CategoryId::from),
            is_group: false,
            is_pinned_control: false,
            group: None,
        }
    }

    pub fn control(id: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            category: None,
            is_group: false,
            is_pinned_control: true,
            group: None,
        }
    }

    pub fn grouped(mut self) -> Self {
        self.is_group = true;
        self
    }

    pub fn child_of(mut self, group: impl Into<String>) -> Self {
        self.group = Some(ItemId::new(group));
        self
    }

    pub fn is_draggable(&self) -> bool {
        !self.is_pinned_control
    }

    pub fn is_group_child(&self) -> bool {
        self.group.is_some()
    }
}

/// Supplies the ordered item list, pinned controls included.
pub trait ItemSource {
    fn visible_items(&self) -> Vec<Item>;
}

impl ItemSource for Vec<Item> {
    fn visible_items(&self) -> Vec<Item> {
        self.clone()
    }
}
