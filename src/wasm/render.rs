use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, Document, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent, Window};

use super::gl::WebGlBackend;
use crate::backdrop::BackdropFader;
use crate::config::{EngineConfig, EngineProps};
use crate::error::{Result, VizError};
use crate::host::Engine;
use crate::pointer::PointerState;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// An event listener that unregisters itself when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(target: &EventTarget, event: &'static str, callback: Closure<dyn FnMut(Event)>) -> Result<Self> {
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Two stacked layers behind the canvas; `back` shows the outgoing media.
struct BackdropLayers {
    back: HtmlElement,
    front: HtmlElement,
    shown: (Option<String>, Option<String>),
}

impl BackdropLayers {
    fn new(document: &Document, container: &HtmlElement, canvas: &HtmlCanvasElement) -> Result<Self> {
        let layer = || -> Result<HtmlElement> {
            let el: HtmlElement = document.create_element("div")?.dyn_into().map_err(|_| VizError::NoDocument)?;
            let style = el.style();
            style.set_property("position", "absolute")?;
            style.set_property("inset", "0")?;
            style.set_property("background-size", "cover")?;
            style.set_property("background-position", "center")?;
            style.set_property("pointer-events", "none")?;
            style.set_property("opacity", "0")?;
            container.insert_before(&el, Some(canvas))?;
            Ok(el)
        };
        let back = layer()?;
        let front = match layer() {
            Ok(front) => front,
            Err(err) => {
                back.remove();
                return Err(err);
            }
        };
        Ok(Self {
            back,
            front,
            shown: (None, None),
        })
    }

    fn apply(&mut self, fader: &BackdropFader) {
        let previous = fader.previous().map(str::to_owned);
        let current = fader.current().map(str::to_owned);
        if self.shown.0 != previous {
            set_image(&self.back, previous.as_deref());
        }
        if self.shown.1 != current {
            set_image(&self.front, current.as_deref());
        }
        self.shown = (previous, current);
        let _ = self
            .back
            .style()
            .set_property("opacity", &format!("{:.3}", fader.previous_opacity()));
        let _ = self
            .front
            .style()
            .set_property("opacity", &format!("{:.3}", fader.current_opacity()));
    }

    fn remove(&self) {
        self.back.remove();
        self.front.remove();
    }
}

fn set_image(el: &HtmlElement, url: Option<&str>) {
    let value = match url {
        Some(url) => format!("url(\"{}\")", url.replace('"', "\\\"")),
        None => "none".to_owned(),
    };
    let _ = el.style().set_property("background-image", &value);
}

fn container_size(container: &HtmlElement) -> (f32, f32) {
    (container.client_width() as f32, container.client_height() as f32)
}

/// A live engine attached to a container element. Dropping it has the
/// same effect as [`Mount::unmount`].
pub struct Mount {
    window: Window,
    engine: Rc<RefCell<Engine<WebGlBackend>>>,
    canvas: HtmlCanvasElement,
    backdrop: Option<Rc<RefCell<BackdropLayers>>>,
    frame: FrameCallback,
    handle: Rc<Cell<Option<i32>>>,
    running: Rc<Cell<bool>>,
    listeners: Vec<Listener>,
}

/// Builds the canvas inside `container` and starts the frame loop.
/// Returns `Ok(None)` when no WebGL2 context is available; the container is
/// left as it was.
pub fn mount(container: &HtmlElement, props: EngineProps, config: EngineConfig) -> Result<Option<Mount>> {
    let window = window().ok_or(VizError::NoWindow)?;
    let document = window.document().ok_or(VizError::NoDocument)?;
    if !container.is_connected() {
        return Err(VizError::ContainerMissing);
    }

    // Pointer input goes first so an early return drops it again.
    let pointer = PointerState::new();
    let on_pointer = {
        let pointer = pointer.clone();
        let window = window.clone();
        Closure::wrap(Box::new(move |event: Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            pointer.set_from_client(event.client_x() as f32, event.client_y() as f32, width as f32, height as f32);
        }) as Box<dyn FnMut(Event)>)
    };
    let on_pointer = Listener::new(&window, "pointermove", on_pointer)?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| VizError::ContextUnavailable)?;
    let style = canvas.style();
    style.set_property("display", "block")?;
    style.set_property("position", "relative")?;
    style.set_property("width", "100%")?;
    style.set_property("height", "100%")?;
    container.append_child(&canvas)?;

    let backend = match WebGlBackend::new(&canvas) {
        Ok(backend) => backend,
        Err(err) => {
            log::warn!("visualization disabled: {err}");
            canvas.remove();
            return Ok(None);
        }
    };

    // From here on the mount owns the canvas and the backend; if any later
    // step fails, dropping it detaches the canvas and frees the GPU objects.
    let mut mount = Mount {
        engine: Rc::new(RefCell::new(Engine::new(backend, config, &props, pointer))),
        window,
        canvas,
        backdrop: None,
        frame: Rc::new(RefCell::new(None)),
        handle: Rc::new(Cell::new(None)),
        running: Rc::new(Cell::new(true)),
        listeners: vec![on_pointer],
    };
    mount.start(&document, container)?;
    log::info!("visualization mounted");
    Ok(Some(mount))
}

impl Mount {
    fn start(&mut self, document: &Document, container: &HtmlElement) -> Result<()> {
        let backdrop = Rc::new(RefCell::new(BackdropLayers::new(document, container, &self.canvas)?));
        self.backdrop = Some(backdrop.clone());

        let (width, height) = container_size(container);
        self.engine
            .borrow_mut()
            .resize(width, height, self.window.device_pixel_ratio() as f32);

        let on_resize = {
            let engine = self.engine.clone();
            let container = container.clone();
            let window = self.window.clone();
            Closure::wrap(Box::new(move |_: Event| {
                let (width, height) = container_size(&container);
                engine
                    .borrow_mut()
                    .resize(width, height, window.device_pixel_ratio() as f32);
            }) as Box<dyn FnMut(Event)>)
        };
        self.listeners.push(Listener::new(&self.window, "resize", on_resize)?);

        // `frame` holds the animation-frame closure so that it can re-request
        // itself; the handle of the pending request is kept for cancellation.
        {
            let f = self.frame.clone();
            let engine = self.engine.clone();
            let handle = self.handle.clone();
            let running = self.running.clone();
            let window = self.window.clone();
            *self.frame.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
                if !running.get() {
                    return;
                }
                {
                    let mut engine = engine.borrow_mut();
                    engine.frame(timestamp);
                    backdrop.borrow_mut().apply(engine.backdrop());
                }

                // schedule next
                if let Some(callback) = f.borrow().as_ref() {
                    match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                        Ok(id) => handle.set(Some(id)),
                        Err(err) => log::warn!("frame loop stopped: {err:?}"),
                    }
                }
            }) as Box<dyn FnMut(f64)>));
        }

        if let Some(callback) = self.frame.borrow().as_ref() {
            self.handle
                .set(Some(self.window.request_animation_frame(callback.as_ref().unchecked_ref())?));
        }
        Ok(())
    }

    pub fn set_domain_index(&self, index: i64) {
        self.engine.borrow_mut().set_domain_index(index);
    }

    pub fn set_background_media_url(&self, url: &str) {
        self.engine.borrow_mut().set_background_media_url(url);
    }

    /// Stops the loop, removes listeners, frees every GPU object, releases
    /// the context and detaches the elements. Idempotent.
    pub fn unmount(&mut self) {
        if !self.running.replace(false) {
            return;
        }
        if let Some(id) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // Breaks the closure's self-reference.
        self.frame.borrow_mut().take();
        self.listeners.clear();
        match self.engine.try_borrow_mut() {
            Ok(mut engine) => engine.shutdown(),
            Err(_) => log::warn!("engine busy during unmount; GPU objects left to the context"),
        }
        if let Some(backdrop) = self.backdrop.take() {
            backdrop.borrow().remove();
        }
        self.canvas.remove();
        log::info!("visualization unmounted");
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.unmount();
    }
}
