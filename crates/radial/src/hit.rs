//! Pointer hit testing against the ring: dead zone / ring / outer zone,
//! nearest slot, insertion points between slots and merge ("fusion") arcs.

use crate::geometry::{FULL_TURN, Point, RingLayout, angular_distance, normalize_degrees};
use crate::item::{CategoryId, Item};
use crate::tunables::Tunables;
use crate::zone::same_zone;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Region {
    Dead,
    Ring,
    Outer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub distance: f64,
    pub angle: f64,
    pub region: Region,
}

pub fn classify(p: Point, layout: &RingLayout, tunables: &Tunables) -> Hit {
    let distance = p.distance_from_origin();
    let angle = p.angle();

    let region = if layout.is_empty() || distance < tunables.dead_radius {
        Region::Dead
    } else if distance > layout.outer_limit {
        Region::Outer
    } else {
        Region::Ring
    };

    Hit {
        distance,
        angle,
        region,
    }
}

/// A place an item can be dropped between two ring neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertionCandidate {
    pub angle: f64,
    pub target: usize,
    pub insert_before: bool,
    /// Category the dropped item adopts.
    pub category: Option<CategoryId>,
}

impl InsertionCandidate {
    fn new(angle: f64, target: usize, insert_before: bool, item: &Item) -> Self {
        Self {
            angle: normalize_degrees(angle),
            target,
            insert_before,
            category: item.category.clone(),
        }
    }
}

/// Candidate insertion angles for every neighbouring pair on the ring, the
/// dragged slot left out so its former neighbours become adjacent.
///
/// Same-zone neighbours get a single midpoint. Neighbours in different zones
/// get two points, at `split_low` ("end of the first zone") and `split_high`
/// ("start of the second") of the gap. Pinned controls are never targets; a
/// control/clip pair yields one midpoint anchored on the clip.
pub fn insertion_candidates(
    items: &[Item],
    layout: &RingLayout,
    dragged: Option<usize>,
    tunables: &Tunables,
) -> Vec<InsertionCandidate> {
    let order: Vec<usize> = (0..items.len().min(layout.n))
        .filter(|&i| Some(i) != dragged)
        .collect();

    let mut candidates = Vec::new();
    if order.is_empty() {
        return candidates;
    }

    for (k, &a) in order.iter().enumerate() {
        let b = order[(k + 1) % order.len()];
        let start = layout.slot_angle(a);
        let mut gap = (layout.slot_angle(b) - start).rem_euclid(FULL_TURN);
        if gap == 0.0 {
            gap = FULL_TURN;
        }
        let (ia, ib) = (&items[a], &items[b]);

        match (ia.is_pinned_control, ib.is_pinned_control) {
            (true, true) => {}
            (false, true) => candidates.push(InsertionCandidate::new(start + gap / 2.0, a, false, ia)),
            (true, false) => candidates.push(InsertionCandidate::new(start + gap / 2.0, b, true, ib)),
            (false, false) if a == b => {
                // lone neighbour: the whole ring is one gap
                candidates.push(InsertionCandidate::new(start + gap / 2.0, a, false, ia));
            }
            (false, false) if same_zone(ia, ib) => {
                candidates.push(InsertionCandidate::new(start + gap / 2.0, b, true, ib));
            }
            (false, false) => {
                candidates.push(InsertionCandidate::new(
                    start + gap * tunables.split_low,
                    a,
                    false,
                    ia,
                ));
                candidates.push(InsertionCandidate::new(
                    start + gap * tunables.split_high,
                    b,
                    true,
                    ib,
                ));
            }
        }
    }
    candidates
}

/// Closest candidate to `angle`, provided it lies within the acceptance arc.
pub fn nearest_insertion<'a>(
    candidates: &'a [InsertionCandidate],
    angle: f64,
    layout: &RingLayout,
    tunables: &Tunables,
) -> Option<&'a InsertionCandidate> {
    let limit = layout.step * tunables.acceptance_fraction;
    candidates
        .iter()
        .map(|c| (angular_distance(angle, c.angle), c))
        .filter(|(d, _)| *d < limit)
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, c)| c)
}

/// Slot whose merge arc contains `angle`.
///
/// Groups never merge into anything, and neither do group children being
/// pulled out of their group.
pub fn fusion_target(
    angle: f64,
    items: &[Item],
    layout: &RingLayout,
    dragged: usize,
    tunables: &Tunables,
) -> Option<usize> {
    let source = items.get(dragged)?;
    if source.is_group || source.is_group_child() {
        return None;
    }
    let half_arc = layout.step * tunables.fusion_fraction / 2.0;

    (0..items.len().min(layout.n))
        .filter(|&i| i != dragged && !items[i].is_pinned_control)
        .map(|i| (angular_distance(angle, layout.slot_angle(i)), i))
        .filter(|(d, _)| *d <= half_arc)
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, i)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polar_offset;

    const EPS: f64 = 1e-9;

    fn ring(categories: &[Option<&str>]) -> (Vec<Item>, RingLayout, Tunables) {
        let t = Tunables::default();
        let items: Vec<Item> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| Item::clip(format!("i{i}"), *c))
            .collect();
        let layout = RingLayout::new(items.len(), &t);
        (items, layout, t)
    }

    #[test]
    fn test_regions() {
        let (_, layout, t) = ring(&[None; 6]);
        assert_eq!(classify(Point::new(5.0, 5.0), &layout, &t).region, Region::Dead);
        assert_eq!(
            classify(polar_offset(30.0, layout.radius), &layout, &t).region,
            Region::Ring
        );
        assert_eq!(
            classify(polar_offset(30.0, layout.outer_limit + 1.0), &layout, &t).region,
            Region::Outer
        );

        let empty = RingLayout::new(0, &t);
        assert_eq!(
            classify(polar_offset(30.0, 150.0), &empty, &t).region,
            Region::Dead
        );
    }

    #[test]
    fn test_same_zone_neighbours_share_one_midpoint() {
        let (items, layout, t) = ring(&[Some("a"), Some("a"), Some("a"), Some("a")]);
        let candidates = insertion_candidates(&items, &layout, None, &t);
        assert_eq!(candidates.len(), 4);
        assert!((candidates[0].angle - 45.0).abs() < EPS);
        assert_eq!(candidates[0].target, 1);
        assert!(candidates[0].insert_before);
    }

    #[test]
    fn test_zone_boundary_yields_two_points() {
        let (items, layout, t) = ring(&[Some("a"), Some("b"), Some("b"), Some("b")]);
        let candidates = insertion_candidates(&items, &layout, None, &t);
        let boundary: Vec<_> = candidates
            .iter()
            .filter(|c| c.angle > 0.0 && c.angle < 90.0)
            .collect();
        assert_eq!(boundary.len(), 2);
        assert!((boundary[0].angle - 30.0).abs() < EPS);
        assert_eq!(boundary[0].target, 0);
        assert!(!boundary[0].insert_before);
        assert_eq!(boundary[0].category, Some(CategoryId::from("a")));
        assert!((boundary[1].angle - 60.0).abs() < EPS);
        assert_eq!(boundary[1].target, 1);
        assert!(boundary[1].insert_before);
        assert_eq!(boundary[1].category, Some(CategoryId::from("b")));
    }

    #[test]
    fn test_dragged_slot_is_skipped() {
        let (items, layout, t) = ring(&[Some("a"); 6]);
        let candidates = insertion_candidates(&items, &layout, Some(2), &t);
        assert_eq!(candidates.len(), 5);
        // slots 1 and 3 are now neighbours, midpoint lands where slot 2 sits
        assert!(candidates.iter().any(|c| (c.angle - 120.0).abs() < EPS && c.target == 3));
    }

    #[test]
    fn test_controls_are_never_targets() {
        let t = Tunables::default();
        let items = vec![
            Item::clip("c0", Some("a")),
            Item::control("menu"),
            Item::control("add"),
            Item::clip("c1", Some("a")),
        ];
        let layout = RingLayout::new(items.len(), &t);
        let candidates = insertion_candidates(&items, &layout, None, &t);
        assert!(candidates.iter().all(|c| !items[c.target].is_pinned_control));
        // c0|menu, add|c1, c1|c0
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_acceptance_threshold() {
        let (items, layout, t) = ring(&[Some("a"); 4]);
        let candidates = insertion_candidates(&items, &layout, Some(0), &t);
        // remaining candidates sit at 135°, 225° and 0° (between 3 and 1)
        let hit = nearest_insertion(&candidates, 140.0, &layout, &t).unwrap();
        assert!((hit.angle - 135.0).abs() < EPS);

        let mut strict = t.clone();
        strict.acceptance_fraction = 0.05;
        assert!(nearest_insertion(&candidates, 150.0, &layout, &strict).is_none());
    }

    #[test]
    fn test_fusion_arc() {
        let (mut items, layout, t) = ring(&[Some("a"); 5]);
        // step 72°, arc ±7.2°
        assert_eq!(fusion_target(147.0, &items, &layout, 0, &t), Some(2));
        assert_eq!(fusion_target(152.0, &items, &layout, 0, &t), None);
        assert_eq!(fusion_target(1.0, &items, &layout, 0, &t), None);

        items[2].is_group = true;
        assert_eq!(fusion_target(144.0, &items, &layout, 0, &t), Some(2));

        items[0].is_group = true;
        assert_eq!(fusion_target(144.0, &items, &layout, 0, &t), None);

        items[0].is_group = false;
        items[0].group = Some("g".into());
        assert_eq!(fusion_target(144.0, &items, &layout, 0, &t), None);
    }
}
