use crate::gui::menu::{LABEL_CHARS, control_glyph};
use radial::{ItemId, ItemSource, MenuController, Point, Tunables};
use ringclip::store::ClipStore;
use std::collections::HashMap;

/// Engine plus what the host needs to paint it.
pub struct MenuView {
    pub controller: MenuController,
    /// Ring center in window coordinates.
    pub anchor: Point,
    /// Last pointer position relative to the anchor.
    pub pointer: Option<Point>,
    labels: HashMap<ItemId, String>,
}

impl MenuView {
    pub fn new(tunables: Tunables) -> Self {
        Self {
            controller: MenuController::new(tunables),
            anchor: Point::default(),
            pointer: None,
            labels: HashMap::new(),
        }
    }

    pub fn to_ring(&mut self, x: f64, y: f64) -> Point {
        let p = Point::new(x - self.anchor.x, y - self.anchor.y);
        self.pointer = Some(p);
        p
    }

    pub fn label<'a>(&'a self, id: &'a ItemId) -> &'a str {
        self.labels.get(id).map_or(id.as_str(), String::as_str)
    }

    pub fn sync_labels(&mut self, store: &ClipStore) {
        self.labels = store
            .visible_items()
            .into_iter()
            .map(|item| {
                let label = if item.is_pinned_control {
                    control_glyph(&item.id).to_string()
                } else {
                    snippet(&store.label(&item.id).unwrap_or_default())
                };
                (item.id, label)
            })
            .collect();
    }
}

/// First line of a clip, cut to fit a slot.
fn snippet(text: &str) -> String {
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if line.chars().count() > LABEL_CHARS {
        let cut: String = line.chars().take(LABEL_CHARS - 1).collect();
        format!("{cut}…")
    } else {
        line.to_string()
    }
}
