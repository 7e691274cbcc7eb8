use crate::geometry::{RingLayout, normalize_degrees};
use crate::item::{CategoryId, Item};
use crate::tunables::ZoneSpec;
use palette::Srgba;

pub const ZONE_ALPHA: f64 = 0.85;

pub fn neutral_color() -> Srgba<f64> {
    Srgba::new(0.15, 0.15, 0.15, 0.5)
}

/// Adjacent slots merge only when both carry the same known category.
pub fn same_zone(a: &Item, b: &Item) -> bool {
    matches!((&a.category, &b.category), (Some(x), Some(y)) if x == y)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneBadge {
    pub category: CategoryId,
    pub angle: f64,
    pub color: Srgba<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct ZoneTable {
    zones: Vec<ZoneSpec>,
}

impl ZoneTable {
    pub fn new(zones: Vec<ZoneSpec>) -> Self {
        Self { zones }
    }

    pub fn contains(&self, category: &CategoryId) -> bool {
        self.zones.iter().any(|z| &z.id == category)
    }

    /// Categories outside the configured set are treated as uncategorized.
    pub fn normalize(&self, item: &mut Item) {
        if let Some(category) = &item.category
            && !self.contains(category)
        {
            log::debug!(
                "Item '{}' has unknown category '{}', treating as uncategorized",
                item.id,
                category
            );
            item.category = None;
        }
    }

    pub fn category_of<'a>(&self, items: &'a [Item], index: usize) -> Option<&'a CategoryId> {
        items
            .get(index)
            .and_then(|item| item.category.as_ref())
            .filter(|c| self.contains(c))
    }

    pub fn color_of(&self, category: Option<&CategoryId>) -> Srgba<f64> {
        category
            .and_then(|c| self.zones.iter().find(|z| &z.id == c))
            .map(|z| z.color.to_srgba(ZONE_ALPHA))
            .unwrap_or_else(neutral_color)
    }

    /// `adjacency[i]` tells whether slot `i` merges with slot `i + 1` (wrapping).
    pub fn adjacency(&self, items: &[Item]) -> Vec<bool> {
        let n = items.len();
        if n < 2 {
            return vec![false; n];
        }
        (0..n)
            .map(|i| same_zone(&items[i], &items[(i + 1) % n]))
            .collect()
    }

    /// Vector mean of the slot angles sharing `category`, so a zone spanning
    /// 350° and 10° averages to 0° rather than 180°.
    pub fn average_angle(
        &self,
        category: &CategoryId,
        items: &[Item],
        layout: &RingLayout,
    ) -> Option<f64> {
        let angles: Vec<f64> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.category.as_ref() == Some(category))
            .map(|(i, _)| layout.slot_angle(i))
            .collect();

        let first = *angles.first()?;
        let (sin, cos) = angles.iter().fold((0.0, 0.0), |(s, c), a| {
            let rad = a.to_radians();
            (s + rad.sin(), c + rad.cos())
        });

        if sin.hypot(cos) < 1e-9 {
            // evenly spread around the whole ring, no meaningful mean
            return Some(first);
        }
        Some(normalize_degrees(sin.atan2(cos).to_degrees()))
    }

    /// One badge per configured category present on the ring, in table order.
    pub fn badges(&self, items: &[Item], layout: &RingLayout) -> Vec<ZoneBadge> {
        self.zones
            .iter()
            .filter_map(|zone| {
                self.average_angle(&zone.id, items, layout)
                    .map(|angle| ZoneBadge {
                        category: zone.id.clone(),
                        angle,
                        color: zone.color.to_srgba(ZONE_ALPHA),
                    })
            })
            .collect()
    }
}
