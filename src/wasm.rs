//! WebAssembly bindings for the synthesis lab.
//!
//! Provides a thin wrapper around `SynthesisSession` for the browser page. The
//! page keeps its DOM event listeners and `requestAnimationFrame` loop; every
//! click is forwarded here and every frame calls `tick`.

use std::time::Duration;

use wasm_bindgen::prelude::*;

use crate::{
    compute::{ActionError, SynthesisSession},
    schema::{Reagent, SynthesisConfig, UserAction, lookup},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn action_error(err: ActionError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WebAssembly wrapper for a synthesis session.
#[wasm_bindgen]
pub struct WasmSynthesis {
    session: SynthesisSession,
}

impl WasmSynthesis {
    fn dispatch(&mut self, action: UserAction) -> Result<(), JsValue> {
        self.session.handle(&action).map_err(action_error)
    }
}

#[wasm_bindgen]
impl WasmSynthesis {
    /// Create a new session from JSON configuration.
    ///
    /// An empty string selects the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmSynthesis, JsValue> {
        let config = if config_json.trim().is_empty() {
            SynthesisConfig::default()
        } else {
            SynthesisConfig::from_json(config_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?
        };

        Ok(WasmSynthesis {
            session: SynthesisSession::new(config),
        })
    }

    /// Flask click, identified by the flask's `data-name`.
    #[wasm_bindgen(js_name = handleFlaskClick)]
    pub fn handle_flask_click(&mut self, name: &str) -> Result<(), JsValue> {
        let reagent = Reagent::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown reagent: {name}")))?;
        self.dispatch(UserAction::AddReagent { reagent })
    }

    #[wasm_bindgen(js_name = handleBeakerClick)]
    pub fn handle_beaker_click(&mut self) -> Result<(), JsValue> {
        self.dispatch(UserAction::ClickBeaker)
    }

    #[wasm_bindgen(js_name = handleFiltration)]
    pub fn handle_filtration(&mut self) -> Result<(), JsValue> {
        self.dispatch(UserAction::Filter)
    }

    #[wasm_bindgen(js_name = handleCrystallization)]
    pub fn handle_crystallization(&mut self) -> Result<(), JsValue> {
        self.dispatch(UserAction::Crystallize)
    }

    /// Show an element in the info panel.
    #[wasm_bindgen]
    pub fn inspect(&mut self, name: &str) {
        self.session.inspect(name);
    }

    /// Advance by `dt_ms` milliseconds and step particles once.
    ///
    /// Returns `{ finished, particlesAlive }`. Negative, NaN or unrepresentable
    /// deltas count as an empty frame.
    #[wasm_bindgen]
    pub fn tick(&mut self, dt_ms: f64) -> Result<JsValue, JsValue> {
        let dt = Duration::try_from_secs_f64(dt_ms.max(0.0) / 1000.0).unwrap_or_default();
        let report = self.session.advance(dt);
        to_js(&report)
    }

    /// Page state (instructions, equipment, toasts, info panel) as an object.
    #[wasm_bindgen(js_name = getView)]
    pub fn get_view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.view())
    }

    /// Canvas commands for the current frame.
    #[wasm_bindgen(js_name = getDrawCommands)]
    pub fn get_draw_commands(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.draw_commands())
    }

    /// Live particles as `[x, y, size, angle]` quadruples.
    #[wasm_bindgen(js_name = particleBuffer)]
    pub fn particle_buffer(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&self.session.particles().to_buffer()[..])
    }

    #[wasm_bindgen(js_name = hasParticles)]
    pub fn has_particles(&self) -> bool {
        !self.session.particles().is_empty()
    }

    /// Tooltip content for an element name.
    #[wasm_bindgen]
    pub fn tooltip(&self, name: &str) -> Result<JsValue, JsValue> {
        to_js(&lookup(name))
    }

    #[wasm_bindgen(js_name = getStep)]
    pub fn get_step(&self) -> usize {
        self.session.step().index()
    }

    #[wasm_bindgen(js_name = isComplete)]
    pub fn is_complete(&self) -> bool {
        self.session.controller().is_complete()
    }

    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    /// Track the canvas element's size.
    #[wasm_bindgen]
    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(width, height);
    }

    /// Restart from the first step.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.session.reset();
    }
}
