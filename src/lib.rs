mod api;
mod app;
mod config;
mod controller;
mod error;
mod geojson;
mod leaflet;

use wasm_bindgen::prelude::*;
use yew::Renderer;

#[wasm_bindgen(start)]
pub fn run() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(config::LOG_LEVEL) {
        web_sys::console::error_1(&JsValue::from_str(&format!("logger init failed: {}", err)));
    }
    log::info!("starting device map console");
    Renderer::<app::App>::new().render();
}
