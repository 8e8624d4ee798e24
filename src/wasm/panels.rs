//! DOM side of the panel cycler.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use super::capture;
use crate::config::CycleConfig;
use crate::cycle::{PanelCycler, Stage, Task};
use crate::entropy::MathRandom;
use crate::transition::Surface;

fn style(el: &HtmlElement, name: &str, value: &str) -> Result<(), JsValue> {
    el.style().set_property(name, value)
}

/// Canvas layered over one panel.
pub struct Scratch {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Scratch {
    /// Blank, hidden scratch canvas of `width x height` pixels, not yet attached.
    pub fn new(document: &Document, width: u32, height: u32) -> Result<Self, JsValue> {
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        canvas.set_width(width);
        canvas.set_height(height);
        style(&canvas, "visibility", "hidden")?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2D canvas not supported")?
            .dyn_into()?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }
}

impl Surface<HtmlCanvasElement> for Scratch {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }

    fn draw_image(&mut self, image: &HtmlCanvasElement) {
        let (w, h) = self.size();
        if let Err(e) = self
            .ctx
            .draw_image_with_html_canvas_element_and_dw_and_dh(image, 0.0, 0.0, w, h)
        {
            log::warn!("snapshot draw failed: {:?}", e);
        }
    }

    // Snapshots may be rendered at device pixel ratio; map surface units onto
    // the image before sampling.
    fn draw_image_region(
        &mut self,
        image: &HtmlCanvasElement,
        (sx, sy, sw, sh): (f64, f64, f64, f64),
        (dx, dy): (f64, f64),
    ) {
        let (w, h) = self.size();
        if w <= 0.0 || h <= 0.0 || sw <= 0.0 || sh <= 0.0 {
            return;
        }
        let kx = image.width() as f64 / w;
        let ky = image.height() as f64 / h;
        if let Err(e) = self
            .ctx
            .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                sx * kx,
                sy * ky,
                sw * kx,
                sh * ky,
                dx,
                dy,
                sw,
                sh,
            )
        {
            log::warn!("strip draw failed: {:?}", e);
        }
    }
}

/// The page's panels, in selector order.
pub struct DomStage {
    document: Document,
    panels: Vec<HtmlElement>,
}

impl DomStage {
    pub fn from_selector(document: &Document, selector: &str) -> Result<Self, JsValue> {
        let list = document.query_selector_all(selector)?;
        let panels = (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect();
        Ok(Self {
            document: document.clone(),
            panels,
        })
    }

    fn panel(&self, index: usize) -> Option<&HtmlElement> {
        self.panels.get(index)
    }

    fn set_style(&self, index: usize, name: &str, value: &str) {
        if let Some(el) = self.panel(index) {
            if let Err(e) = style(el, name, value) {
                log::warn!("panel {index}: cannot set {name}: {:?}", e);
            }
        }
    }
}

impl Stage for DomStage {
    type Bitmap = HtmlCanvasElement;
    type Scratch = Scratch;
    type Error = JsValue;

    fn panel_count(&self) -> usize {
        self.panels.len()
    }

    fn set_displayed(&self, panel: usize, shown: bool) {
        self.set_style(panel, "display", if shown { "block" } else { "none" });
    }

    fn set_veiled(&self, panel: usize, veiled: bool) {
        self.set_style(panel, "visibility", if veiled { "hidden" } else { "visible" });
    }

    fn open_scratch(&self, panel: usize) -> Result<Scratch, JsValue> {
        let el = self.panel(panel).ok_or("no such panel")?;
        let (w, h) = (el.offset_width(), el.offset_height());
        let scratch = Scratch::new(&self.document, w.max(0) as u32, h.max(0) as u32)?;

        let canvas: &HtmlElement = scratch.canvas();
        style(canvas, "position", "absolute")?;
        style(canvas, "width", &format!("{w}px"))?;
        style(canvas, "height", &format!("{h}px"))?;
        style(canvas, "top", &format!("{}px", el.offset_top()))?;
        style(canvas, "left", &format!("{}px", el.offset_left()))?;
        style(canvas, "z-index", "auto")?;

        el.parent_element()
            .ok_or("panel has no parent")?
            .append_child(canvas)?;
        Ok(scratch)
    }

    fn show_scratch(&self, scratch: &Scratch) {
        if let Err(e) = style(scratch.canvas(), "visibility", "visible") {
            log::warn!("cannot show scratch canvas: {:?}", e);
        }
    }

    fn close_scratch(&self, scratch: Scratch) {
        scratch.canvas().remove();
    }

    fn capture(&self, panel: usize, done: Box<dyn FnOnce(HtmlCanvasElement)>) {
        let Some(el) = self.panel(panel) else {
            return;
        };
        if let Err(e) = capture::capture(el, done) {
            log::error!("capture of panel {panel} failed: {:?}", e);
        }
    }

    fn schedule(&self, delay_ms: f64, task: Task) {
        let Some(win) = window() else {
            return;
        };
        let cb = Closure::once_into_js(move || task());
        if let Err(e) = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.unchecked_ref(),
            delay_ms.max(0.0) as i32,
        ) {
            log::error!("setTimeout failed: {:?}", e);
        }
    }
}

/// Build the ring from the page and start cycling.
pub fn start() -> Result<(), JsValue> {
    let document = window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let body = document.body().ok_or("no body")?;
    let dataset = body.dataset();
    let config = CycleConfig::from_lookup(|key| dataset.get(key));

    let stage = DomStage::from_selector(&document, &config.panel_selector)?;
    let selector = config.panel_selector.clone();
    match PanelCycler::new(stage, config, MathRandom) {
        Some(cycler) => cycler.start(),
        None => log::warn!("no panels match {selector:?}; nothing to cycle"),
    }
    Ok(())
}
