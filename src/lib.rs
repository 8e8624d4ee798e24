#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Two cosmetic page effects: a CRT static overlay with a travelling scan
//! band, and a glitchy slice-tear crossfade that cycles through page panels.
//!
//! The synthesis and state machines are plain Rust and build everywhere; the
//! canvas and DOM glue only exists on wasm32.

pub mod config;
pub mod cycle;
pub mod entropy;
pub mod field;
pub mod noise;
pub mod raster;
pub mod transition;

pub use config::{CycleConfig, NoiseConfig};
pub use cycle::{PanelCycler, Ring, Stage};
pub use field::NoiseField;
pub use raster::Raster;
pub use transition::{Direction, Phase, Surface, Tick, Transition};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    mod capture;
    pub mod panels;
    mod render;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        match document.get_element_by_id("tv") {
            Some(el) => {
                let canvas = el.dyn_into::<web_sys::HtmlCanvasElement>()?;
                if let Err(e) = render::start(canvas) {
                    log::error!("noise overlay disabled: {:?}", e);
                }
            }
            None => log::error!("noise overlay disabled: canvas #tv not found"),
        }

        if document.ready_state() == "loading" {
            let on_ready = Closure::once_into_js(move || {
                if let Err(e) = panels::start() {
                    log::error!("panel cycle not started: {:?}", e);
                }
            });
            document
                .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
        } else {
            panels::start()?;
        }
        Ok(())
    }
}
