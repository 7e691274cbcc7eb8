use crate::gui::menu::{self, MenuView, TICK_MS};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use gtk::prelude::*;
use gtk4 as gtk;
use radial::{
    DragPhase, ItemId, ItemSource, KeyAction, MenuEvent, MenuResponse, Point, PointerEvent,
    RevealProgress,
};
use relm4::prelude::*;
use ringclip::config;
use ringclip::events::AppEvent;
use ringclip::store::ClipStore;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub struct AppModel {
    pub view: Rc<RefCell<MenuView>>,
    pub store: ClipStore,
    pub visible: bool,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
    last_tick: Instant,
    ticker: Option<glib::SourceId>,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    NextPage,
    PreviousPage,
    Add(String),
    ConfigReload,
    Press(f64, f64),
    Motion(f64, f64),
    Release(f64, f64),
    Key(KeyAction),
    Tick,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::NextPage => AppMsg::NextPage,
            AppEvent::PreviousPage => AppMsg::PreviousPage,
            AppEvent::Add(text) => AppMsg::Add(text),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn needs_ticks(visible: bool, progress: &RevealProgress) -> bool {
    visible && progress.queued > 0
}

fn key_action(key: gtk::gdk::Key) -> Option<AppMsg> {
    use gtk::gdk::Key;
    Some(match key {
        Key::Escape => AppMsg::Key(KeyAction::Cancel),
        Key::Right | Key::Tab => AppMsg::Key(KeyAction::Next),
        Key::Left => AppMsg::Key(KeyAction::Previous),
        Key::Return | Key::space => AppMsg::Key(KeyAction::Activate),
        Key::Page_Down => AppMsg::NextPage,
        Key::Page_Up => AppMsg::PreviousPage,
        _ => return None,
    })
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (MenuView, ClipStore, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Ringclip"),
            #[watch]
            set_visible: model.visible,
            #[watch]
            set_opacity: if model.visible { 1.0 } else { 0.0 },
            add_css_class: "ringclip-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key_action(key) {
                        Some(msg) => {
                            sender.input(msg);
                            glib::Propagation::Stop
                        }
                        None => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "ringclip-drawing-area",

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::Motion(x, y));
                    }
                },

                add_controller = gtk::GestureDrag {
                    set_button: 1,
                    connect_drag_begin[sender] => move |_, x, y| {
                        sender.input(AppMsg::Press(x, y));
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::Motion(x + dx, y + dy));
                        }
                    },
                    connect_drag_end[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::Release(x + dx, y + dy));
                        }
                    },
                },

                add_controller = gtk::GestureClick {
                    set_button: 3,
                    connect_released[sender] => move |_, _, _, _| {
                        sender.input(AppMsg::Key(KeyAction::Cancel));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (view, store, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let model = AppModel {
            view: Rc::new(RefCell::new(view)),
            store,
            visible: false,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
            last_tick: Instant::now(),
            ticker: None,
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let view_draw = model.view.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = menu::draw(cr, &view_draw.borrow(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                self.visible = true;
                let anchor = window::get_cursor_position(&self.root)
                    .unwrap_or_else(|| window::get_center(&self.root));

                let response = {
                    let mut view = self.view.borrow_mut();
                    view.anchor = anchor;
                    view.pointer = None;
                    view.sync_labels(&self.store);
                    view.controller.open(&self.store)
                };
                self.handle(response, &sender);
            }
            AppMsg::Hide => {
                self.visible = false;
                let response = self.view.borrow_mut().controller.close();
                self.handle(response, &sender);
            }
            AppMsg::NextPage => self.flip_page(true, &sender),
            AppMsg::PreviousPage => self.flip_page(false, &sender),
            AppMsg::Add(text) => {
                if text.trim().is_empty() {
                    log::debug!("Ignoring empty clip");
                    return;
                }
                self.store.push(text, None);
                self.refresh();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.store
                        .set_controls(new_config.menu.pinned_controls.clone());
                    self.view
                        .borrow_mut()
                        .controller
                        .set_tunables(new_config.menu);
                    self.refresh();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Press(x, y) => self.pointer(x, y, PointerEvent::Press, &sender),
            AppMsg::Motion(x, y) => self.pointer(x, y, PointerEvent::Move, &sender),
            AppMsg::Release(x, y) => self.pointer(x, y, PointerEvent::Release, &sender),
            AppMsg::Key(action) => {
                if !self.visible {
                    return;
                }
                let response = self.view.borrow_mut().controller.key(action);
                self.handle(response, &sender);
            }
            AppMsg::Tick => {
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_tick).as_millis() as u64;
                self.last_tick = now;
                if !self.visible {
                    self.sync_ticker(&sender);
                    return;
                }
                let response = self.view.borrow_mut().controller.tick(elapsed);
                self.handle(response, &sender);
            }
        }
    }
}

impl AppModel {
    fn flip_page(&mut self, forward: bool, sender: &ComponentSender<Self>) {
        let result = {
            let mut view = self.view.borrow_mut();
            if forward {
                view.controller.next_page()
            } else {
                view.controller.previous_page()
            }
        };
        match result {
            Ok(response) => self.handle(response, sender),
            Err(e) => log::info!("Page change ignored: {}", e),
        }
    }

    fn pointer(
        &mut self,
        x: f64,
        y: f64,
        event: fn(Point) -> PointerEvent,
        sender: &ComponentSender<Self>,
    ) {
        if !self.visible {
            return;
        }
        let (response, dragging) = {
            let mut view = self.view.borrow_mut();
            let p = view.to_ring(x, y);
            let response = view.controller.pointer(event(p));
            (response, view.controller.drag_state() == DragPhase::Active)
        };
        // the ghost follows the pointer even when the target is unchanged
        if dragging {
            self.drawing_area.queue_draw();
        }
        self.handle(response, sender);
    }

    fn handle(&mut self, response: MenuResponse, sender: &ComponentSender<Self>) {
        for event in response.events {
            match event {
                MenuEvent::Activated { item } => self.activate(&item, sender),
                MenuEvent::Drop(decision) => {
                    decision.dispatch(&mut self.store);
                    self.refresh();
                }
                MenuEvent::PageChanged { page, total } => {
                    log::debug!("Showing page {} of {}", page + 1, total);
                }
                MenuEvent::Closed => {
                    self.visible = false;
                    self.store.close_group();
                }
            }
        }
        if response.redraw {
            self.drawing_area.queue_draw();
        }
        self.sync_ticker(sender);
    }

    /// Runs the tick timer only while controls are still revealing or hiding.
    fn sync_ticker(&mut self, sender: &ComponentSender<Self>) {
        let animating = needs_ticks(self.visible, &self.view.borrow().controller.reveal_progress());

        match (animating, self.ticker.is_some()) {
            (true, false) => {
                self.last_tick = Instant::now();
                let sender = sender.clone();
                self.ticker = Some(glib::timeout_add_local(
                    Duration::from_millis(TICK_MS),
                    move || {
                        sender.input(AppMsg::Tick);
                        glib::ControlFlow::Continue
                    },
                ));
            }
            (false, true) => {
                if let Some(id) = self.ticker.take() {
                    id.remove();
                }
            }
            _ => {}
        }
    }

    fn activate(&mut self, item: &ItemId, sender: &ComponentSender<Self>) {
        if self.store.is_control(item) {
            match item.as_str() {
                "add" => self.add_from_clipboard(sender),
                "prev" => sender.input(AppMsg::PreviousPage),
                "next" => sender.input(AppMsg::NextPage),
                "menu" => {
                    self.store.close_group();
                    self.refresh();
                }
                "config" => {
                    match config::write_default_config() {
                        Ok(path) => {
                            if let Err(e) = std::process::Command::new("xdg-open").arg(&path).spawn() {
                                log::error!("Failed to open {}: {}", path.display(), e);
                            }
                        }
                        Err(e) => log::error!("Failed to write default config: {}", e),
                    }
                    sender.input(AppMsg::Hide);
                }
                other => log::warn!("No action bound to control '{}'", other),
            }
        } else if self.store.group(item).is_some() {
            match self.store.toggle_group(item) {
                Ok(open) => {
                    log::debug!("Group '{}' {}", item, if open { "opened" } else { "closed" });
                    self.refresh();
                }
                Err(e) => log::warn!("{}", e),
            }
        } else if let Some(clip) = self.store.clip(item) {
            self.root.clipboard().set_text(&clip.text);
            log::info!("Copied clip '{}'", item);
            sender.input(AppMsg::Hide);
        }
    }

    fn add_from_clipboard(&self, sender: &ComponentSender<Self>) {
        let clipboard = self.root.clipboard();
        let sender = sender.clone();
        relm4::spawn_local(async move {
            match clipboard.read_text_future().await {
                Ok(Some(text)) => sender.input(AppMsg::Add(text.to_string())),
                Ok(None) => log::info!("Clipboard holds no text"),
                Err(e) => log::error!("Failed to read clipboard: {}", e),
            }
        });
    }

    /// Pushes the store's current items into the engine.
    fn refresh(&mut self) {
        let items = self.store.visible_items();
        {
            let mut view = self.view.borrow_mut();
            view.sync_labels(&self.store);
            view.controller.refresh(items);
        }
        self.drawing_area.queue_draw();
    }
}
