use super::model::MenuView;
use super::{
    BADGE_DISTANCE, BADGE_FONT_SIZE, BAND_WIDTH, GHOST_ALPHA, INDICATOR_WIDTH, LABEL_FONT_SIZE,
};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use palette::Srgba;
use radial::drag::DropTarget;
use radial::geometry::polar_offset;
use radial::{DragPhase, MenuController, Point, SlotPosition};
use std::f64::consts::PI;

/// Ring angles start at 12 o'clock, cairo's at 3 o'clock.
fn cairo_angle(degrees: f64) -> f64 {
    (degrees - 90.0).to_radians()
}

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn draw_label(
    cr: &Context,
    text: &str,
    at: Point,
    size: f64,
    color: Srgba<f64>,
) -> Result<(), cairo::Error> {
    set_color(cr, color);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(size);
    if let Ok(ext) = cr.text_extents(text) {
        cr.move_to(at.x - ext.width() / 2.0, at.y + ext.height() / 2.0);
        cr.show_text(text)?;
    }
    Ok(())
}

struct SlotRenderer<'a> {
    slot: &'a SlotPosition,
    label: &'a str,
    fill: Srgba<f64>,
    radius: f64,
    hovered: bool,
    is_group: bool,
    dimmed: bool,
}

impl SlotRenderer<'_> {
    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_circle(cr, colors)?;
        if self.is_group {
            self.draw_group_ring(cr, colors)?;
        }
        draw_label(cr, self.label, self.slot.offset, LABEL_FONT_SIZE, colors.text)
    }

    fn draw_circle(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let mut color = if self.hovered { colors.hovered } else { self.fill };
        if self.dimmed {
            color.alpha *= GHOST_ALPHA;
        }
        set_color(cr, color);
        cr.arc(self.slot.offset.x, self.slot.offset.y, self.radius, 0.0, 2.0 * PI);
        cr.fill()
    }

    // groups read as stacked clips
    fn draw_group_ring(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        set_color(cr, colors.text);
        cr.set_line_width(2.0);
        cr.arc(
            self.slot.offset.x,
            self.slot.offset.y,
            self.radius - 4.0,
            0.0,
            2.0 * PI,
        );
        cr.stroke()
    }
}

pub fn draw(cr: &Context, view: &MenuView, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let menu = &view.controller;
    if !menu.is_open() {
        return Ok(());
    }

    cr.save()?;
    cr.translate(view.anchor.x, view.anchor.y);

    draw_center_circle(cr, menu, colors)?;
    draw_zone_bands(cr, menu)?;
    draw_slots(cr, view, colors)?;
    draw_badges(cr, menu)?;
    draw_drop_target(cr, menu, colors)?;
    draw_ghost(cr, view, colors)?;
    draw_page_label(cr, menu, colors)?;

    cr.restore()
}

fn draw_center_circle(
    cr: &Context,
    menu: &MenuController,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let color = match menu.drop_target() {
        Some(DropTarget::Center) => colors.hovered,
        _ => colors.center_circle,
    };
    set_color(cr, color);
    cr.arc(0.0, 0.0, menu.tunables().dead_radius, 0.0, 2.0 * PI);
    cr.fill()
}

/// Thick arcs joining neighbouring slots of the same zone.
fn draw_zone_bands(cr: &Context, menu: &MenuController) -> Result<(), cairo::Error> {
    let layout = menu.layout();
    let items = menu.ring_items();
    cr.set_line_width(menu.tunables().item_size * BAND_WIDTH);

    for (i, merges) in menu.zone_adjacency().into_iter().enumerate() {
        if !merges {
            continue;
        }
        set_color(cr, menu.zones().color_of(items[i].category.as_ref()));
        let start = layout.slot_angle(i);
        cr.new_sub_path();
        cr.arc(
            0.0,
            0.0,
            layout.radius,
            cairo_angle(start),
            cairo_angle(start + layout.step),
        );
        cr.stroke()?;
    }
    Ok(())
}

fn draw_slots(cr: &Context, view: &MenuView, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let menu = &view.controller;
    let items = menu.ring_items();
    let dragged = (menu.drag_state() == DragPhase::Active)
        .then(|| menu.dragged_slot())
        .flatten();

    for slot in menu.slot_positions() {
        let Some(item) = items.get(slot.index) else {
            continue;
        };
        let fill = if item.is_pinned_control {
            colors.control
        } else {
            menu.zones().color_of(item.category.as_ref())
        };

        SlotRenderer {
            slot: &slot,
            label: view.label(&item.id),
            fill,
            radius: menu.tunables().item_size / 2.0,
            hovered: menu.hovered_slot() == Some(slot.index),
            is_group: item.is_group,
            dimmed: dragged == Some(slot.index),
        }
        .draw(cr, colors)?;
    }
    Ok(())
}

fn draw_badges(cr: &Context, menu: &MenuController) -> Result<(), cairo::Error> {
    let layout = menu.layout();
    let distance = layout.radius + menu.tunables().item_size * BADGE_DISTANCE;

    for badge in menu.badges() {
        let size = if menu.hovered_category() == Some(&badge.category) {
            BADGE_FONT_SIZE * 1.4
        } else {
            BADGE_FONT_SIZE
        };
        let mut color = badge.color;
        color.alpha = 1.0;
        draw_label(
            cr,
            badge.category.as_str(),
            polar_offset(badge.angle, distance),
            size,
            color,
        )?;
    }
    Ok(())
}

fn draw_drop_target(
    cr: &Context,
    menu: &MenuController,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let layout = menu.layout();
    let half = menu.tunables().item_size / 2.0;

    match menu.drop_target() {
        Some(DropTarget::ReorderBetween { angle, .. }) => {
            let (from, to) = (
                polar_offset(*angle, layout.radius - half),
                polar_offset(*angle, layout.radius + half),
            );
            set_color(cr, colors.indicator);
            cr.set_line_width(INDICATOR_WIDTH);
            cr.move_to(from.x, from.y);
            cr.line_to(to.x, to.y);
            cr.stroke()
        }
        Some(DropTarget::MergeOnto { target }) => {
            let at = layout.slot_offset(*target);
            set_color(cr, colors.indicator);
            cr.set_line_width(INDICATOR_WIDTH);
            cr.new_sub_path();
            cr.arc(at.x, at.y, half + INDICATOR_WIDTH, 0.0, 2.0 * PI);
            cr.stroke()
        }
        Some(DropTarget::Outside) => {
            let b = layout.bounds;
            set_color(cr, colors.delete);
            cr.set_line_width(INDICATOR_WIDTH);
            cr.rectangle(b.x, b.y, b.width, b.height);
            cr.stroke()
        }
        _ => Ok(()),
    }
}

/// The dragged item follows the pointer.
fn draw_ghost(cr: &Context, view: &MenuView, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let menu = &view.controller;
    let (Some(id), Some(p)) = (menu.dragged_item(), view.pointer) else {
        return Ok(());
    };

    let mut color = colors.hovered;
    color.alpha *= GHOST_ALPHA;
    set_color(cr, color);
    cr.arc(p.x, p.y, menu.tunables().item_size / 2.0, 0.0, 2.0 * PI);
    cr.fill()?;
    draw_label(cr, view.label(id), p, LABEL_FONT_SIZE, colors.text)
}

fn draw_page_label(
    cr: &Context,
    menu: &MenuController,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let page = menu.page();
    if page.total_pages < 2 {
        return Ok(());
    }
    let text = format!("{}/{}", page.index + 1, page.total_pages);
    draw_label(cr, &text, Point::default(), LABEL_FONT_SIZE, colors.text)
}
