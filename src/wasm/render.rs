use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, Clamped, JsCast, JsValue};
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::config::NoiseConfig;
use crate::entropy::MathRandom;
use crate::field::{NoiseField, SCAN_STOPS};

/// Noise overlay bound to one canvas.
struct Overlay {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    field: NoiseField,
    // `ImageData` twins of the field's pool, rebuilt with it
    frames: Vec<ImageData>,
    last_frame: Option<f64>,
}

impl Overlay {
    fn resize(&mut self) -> Result<(), JsValue> {
        let display_w = self.canvas.offset_width() as f64;
        let display_h = self.canvas.offset_height() as f64;
        let (w, h) = self.field.resize(display_w, display_h, &mut MathRandom);
        self.canvas.set_width(w);
        self.canvas.set_height(h);

        self.frames = self
            .field
            .samples()
            .iter()
            .map(|s| {
                let (w, h) = (s.width(), s.height());
                ImageData::new_with_u8_clamped_array_and_sh(Clamped(s.data()), w, h)
            })
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    #[allow(deprecated)]
    fn draw(&self) -> Result<(), JsValue> {
        let index = self.field.sample_index().floor() as usize;
        if let Some(frame) = self.frames.get(index) {
            self.ctx.put_image_data(frame, 0.0, 0.0)?;
        }

        let band = self.field.scan_band();
        let grd = self.ctx.create_linear_gradient(0.0, band.top, 0.0, band.bottom());
        for (offset, alpha) in SCAN_STOPS {
            grd.add_color_stop(offset as f32, &format!("rgba(255,255,255,{alpha})"))?;
        }
        self.ctx.set_global_composite_operation("lighter")?;
        self.ctx.set_fill_style(&grd);
        self.ctx
            .fill_rect(0.0, band.top, self.canvas.width() as f64, band.height);
        self.ctx.set_global_composite_operation("source-over")?;
        Ok(())
    }

    /// One animation frame at timestamp `now` (ms).
    fn frame(&mut self, now: f64) -> Result<(), JsValue> {
        let elapsed = match self.last_frame {
            Some(prev) => now - prev,
            None => 1000.0 / self.field.config().target_fps,
        };
        self.last_frame = Some(now);

        self.draw()?;
        self.field.tick(elapsed);
        Ok(())
    }
}

/// Start the noise loop on `canvas`. Fails only if there is no 2D context.
pub fn start(canvas: HtmlCanvasElement) -> Result<(), JsValue> {
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or("2D canvas not supported")?
        .dyn_into()?;

    let dataset = canvas.dataset();
    let config = NoiseConfig::from_lookup(|key| dataset.get(key));
    log::info!(
        "noise overlay: scale {} / {} samples @ {} fps",
        config.scale_factor,
        config.sample_count,
        config.target_fps
    );

    let overlay = Rc::new(RefCell::new(Overlay {
        canvas,
        ctx,
        field: NoiseField::new(config),
        frames: Vec::new(),
        last_frame: None,
    }));
    overlay.borrow_mut().resize()?;

    // Regenerate the pool whenever the viewport changes
    let resize_closure = {
        let overlay = overlay.clone();
        Closure::wrap(Box::new(move || {
            if let Err(e) = overlay.borrow_mut().resize() {
                log::error!("noise resize failed: {:?}", e);
            }
        }) as Box<dyn FnMut()>)
    };
    let win = window().ok_or("no window")?;
    win.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    // Animation loop
    // `f` holds the animation-frame closure so that it can keep calling
    // `request_animation_frame` on itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        if let Err(e) = overlay.borrow_mut().frame(now) {
            log::error!("noise frame failed: {:?}", e);
        }

        // schedule next
        let next = f.borrow();
        if let (Some(win), Some(cb)) = (window(), next.as_ref()) {
            if let Err(e) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                log::error!("noise loop stopped: {:?}", e);
            }
        }
    }) as Box<dyn FnMut(f64)>));

    win.request_animation_frame(
        g.borrow()
            .as_ref()
            .ok_or("animation closure missing")?
            .as_ref()
            .unchecked_ref(),
    )?;

    Ok(())
}
