//! Binding to the page's `html2canvas` global.
//!
//! Current releases return a promise; old ones only report through an
//! `onrendered` option. The callback is offered up front and released as soon
//! as the return value shows a promise.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, HtmlElement};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = html2canvas, catch)]
    fn html2canvas(element: &HtmlElement, options: &JsValue) -> Result<JsValue, JsValue>;
}

type Done = Box<dyn FnOnce(HtmlCanvasElement)>;

fn resolve(slot: &RefCell<Option<Done>>, value: JsValue) {
    match value.dyn_into::<HtmlCanvasElement>() {
        Ok(canvas) => {
            let done = slot.borrow_mut().take();
            if let Some(done) = done {
                done(canvas);
            }
        }
        Err(other) => log::warn!("html2canvas returned a non-canvas: {:?}", other),
    }
}

/// Rasterize `element`. `done` runs at most once; it never runs if
/// html2canvas is missing or fails.
pub fn capture(element: &HtmlElement, done: Done) -> Result<(), JsValue> {
    let slot = Rc::new(RefCell::new(Some(done)));

    let on_rendered = {
        let slot = slot.clone();
        Closure::once(move |value: JsValue| resolve(&slot, value))
    };
    let options = Object::new();
    Reflect::set(&options, &"onrendered".into(), on_rendered.as_ref())?;

    let ret = html2canvas(element, &options)?;
    match ret.dyn_into::<Promise>() {
        Ok(promise) => {
            drop(on_rendered);
            wasm_bindgen_futures::spawn_local(async move {
                match JsFuture::from(promise).await {
                    Ok(value) => resolve(&slot, value),
                    Err(e) => log::error!("html2canvas rejected: {:?}", e),
                }
            });
        }
        // legacy API: JS owns the callback until it fires
        Err(_) => {
            let _ = on_rendered.into_js_value();
        }
    }
    Ok(())
}
