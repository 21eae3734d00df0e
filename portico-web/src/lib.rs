#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod a11y;
pub mod app;
pub mod config;
pub mod dom;
pub mod feed;
pub mod form;
pub mod logging;
pub mod nav;
pub mod node;
pub mod reveal;
pub mod storage;
pub mod theme;

pub use app::{MountReport, mount, mount_with};
pub use node::WebNode;
pub use reveal::RevealMode;
pub use storage::LocalStoragePrefs;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::Level::Info);
    let Some(doc) = dom::document() else {
        dom::console_error("portico: no document; page enhancements disabled");
        return;
    };
    let cfg = config::load(&doc);
    logging::init(logging::parse_level(&cfg.log_level));
    app::run(&doc, cfg);
}
