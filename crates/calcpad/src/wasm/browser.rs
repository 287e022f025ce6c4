//! Browser WASM bindings for Calculator
//!
//! The page's script forwards clicks and key presses here, re-renders from
//! [`BrowserCalculator::render_json`], and calls
//! [`BrowserCalculator::advance`] from its own timer.

use std::fmt;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use web_sys::{console, Storage};

use crate::core::{CalculatorEngine, EngineOptions};
use crate::storage::{KeyValueStore, StorageError, StorageResult};
use crate::wasm::keypad::{command_for_id, WasmKeypad};

/// `window.localStorage`, or nothing when the page has no storage
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    /// Grabs the window's local storage if it can be reached
    #[must_use]
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            console::warn_1(&"localStorage unavailable, state will not persist".into());
        }
        Self { storage }
    }
}

impl fmt::Debug for LocalStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStorage")
            .field("available", &self.storage.is_some())
            .finish()
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("no localStorage".into()))?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }
}

/// Browser Calculator - the main WASM entry point
#[derive(Debug)]
#[wasm_bindgen]
pub struct BrowserCalculator {
    engine: CalculatorEngine<LocalStorage>,
}

#[wasm_bindgen]
impl BrowserCalculator {
    /// Restores state from local storage and starts the loader timer
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        Self {
            engine: CalculatorEngine::new(LocalStorage::open(), EngineOptions::default()),
        }
    }

    /// Text for the main display
    #[wasm_bindgen(getter)]
    pub fn display(&self) -> String {
        self.engine.render().display
    }

    /// Handles a click on an element; returns false for unknown ids
    pub fn handle_button(&mut self, element_id: &str) -> bool {
        match command_for_id(element_id) {
            Some(command) => {
                self.engine.dispatch(command);
                true
            }
            None => false,
        }
    }

    /// Handles a keydown; returns whether the page should prevent the default
    pub fn handle_key(&mut self, key: &str) -> bool {
        match WasmKeypad::key_to_binding(key) {
            Some(binding) => {
                self.engine.dispatch(binding.command);
                binding.prevent_default
            }
            None => false,
        }
    }

    /// Moves the clock forward; returns true if anything fired
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        !self
            .engine
            .advance(Duration::from_millis(u64::from(elapsed_ms)))
            .is_empty()
    }

    /// Milliseconds until the next deferred action, if any is pending
    pub fn next_timer_ms(&self) -> Option<u32> {
        self.engine
            .scheduler()
            .next_due_in()
            .map(|d| u32::try_from(d.as_millis()).unwrap_or(u32::MAX))
    }

    /// Everything the page needs to redraw, as JSON
    pub fn render_json(&self) -> String {
        serde_json::to_string(&self.engine.render()).unwrap_or_else(|e| {
            console::error_1(&format!("render failed: {e}").into());
            String::from("{}")
        })
    }
}

impl Default for BrowserCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize the calculator in the browser
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console::log_1(&"Calculator WASM initialized".into());
}
