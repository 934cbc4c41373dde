#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod animation;
pub mod backdrop;
pub mod camera;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod host;
pub mod lifecycle;
pub mod overlay;
pub mod pipeline;
pub mod pointer;
pub mod scene;

pub use config::{EngineConfig, EngineProps};
pub use controller::VizController;
pub use error::{Result, VizError};
pub use host::Engine;

// Only compile browser-facing code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlElement;

    use crate::config::{EngineConfig, EngineProps};

    mod gl;
    mod render;

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }

    fn session_seed() -> u64 {
        let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
        let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
        hi << 32 | lo
    }

    /// Handle owned by the page. Construction never throws: a missing
    /// container or WebGL2 context yields an inert handle.
    #[wasm_bindgen]
    pub struct DomainViz {
        mount: Option<render::Mount>,
    }

    #[wasm_bindgen]
    impl DomainViz {
        #[wasm_bindgen(constructor)]
        pub fn new(
            container: Option<HtmlElement>,
            domain_index: i32,
            background_media_url: String,
            options: Option<String>,
        ) -> DomainViz {
            let Some(container) = container else {
                log::warn!("no container, nothing to mount");
                return DomainViz { mount: None };
            };
            let mut config = match options.as_deref().map(EngineConfig::from_json).transpose() {
                Ok(config) => config.unwrap_or_default(),
                Err(err) => {
                    log::warn!("{err}; falling back to defaults");
                    EngineConfig::default()
                }
            };
            config.seed.get_or_insert_with(session_seed);
            let props = EngineProps {
                domain_index: domain_index.into(),
                background_media_url,
            };
            let mount = render::mount(&container, props, config).unwrap_or_else(|err| {
                log::warn!("mount failed: {err}");
                None
            });
            DomainViz { mount }
        }

        #[wasm_bindgen(js_name = setDomainIndex)]
        pub fn set_domain_index(&self, index: i32) {
            if let Some(mount) = &self.mount {
                mount.set_domain_index(index.into());
            }
        }

        #[wasm_bindgen(js_name = setBackgroundMediaUrl)]
        pub fn set_background_media_url(&self, url: String) {
            if let Some(mount) = &self.mount {
                mount.set_background_media_url(&url);
            }
        }

        #[wasm_bindgen(getter, js_name = isRendering)]
        pub fn is_rendering(&self) -> bool {
            self.mount.is_some()
        }

        /// Tears everything down. Safe to call more than once.
        pub fn destroy(&mut self) {
            if let Some(mut mount) = self.mount.take() {
                mount.unmount();
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::DomainViz;
