mod gui;

use gui::app::AppModel;
use gui::menu::MenuView;
use relm4::prelude::*;
use ringclip::config;
use ringclip::store::ClipStore;
use ringclip::sys::runtime;

fn main() {
    env_logger::init();

    let config = config::load_or_default();
    let store = ClipStore::from_config(&config);
    let view = MenuView::new(config.menu);

    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(tx);

    let app = RelmApp::new("org.troia.ringclip");

    app.run::<AppModel>((view, store, rx));
}
