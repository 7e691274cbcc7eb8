//! Interaction engine for a radial popup menu: ring geometry, category zones,
//! hit testing, drag and drop, progressive reveal of pinned controls and
//! pagination. Rendering and persistence live with the host.

pub mod controller;
pub mod drag;
pub mod geometry;
pub mod hit;
pub mod item;
mod macros;
pub mod page;
pub mod reveal;
pub mod tunables;
pub mod zone;

pub use controller::{
    KeyAction, MenuController, MenuError, MenuEvent, MenuResponse, PointerEvent, RefreshOutcome,
    SlotPosition,
};
pub use drag::{DragPhase, DropDecision, DropTarget, MutationSink};
pub use geometry::{Point, RingLayout};
pub use item::{CategoryId, Item, ItemId, ItemSource};
pub use page::Page;
pub use reveal::{RevealProgress, RevealState};
pub use tunables::{PinnedControlSpec, Tunables, ZoneColor, ZoneSpec};
pub use zone::{ZoneBadge, ZoneTable};
