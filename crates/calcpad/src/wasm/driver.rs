//! WASM Driver - engine plus mock page
//!
//! Routes clicks and keys through the same ids and bindings the browser page
//! uses, then copies the engine's [`RenderState`] onto the mock DOM. Reads go
//! through the DOM, so the shared scenarios in [`crate::driver`] check the
//! page as well as the engine.

use std::time::Duration;

use super::dom::{empty_history, ids, DomElement, DomEvent, MockDom};
use super::keypad::{button_id, command_for_id, MockDomKeypadExt, WasmKeypad, HISTORY_ITEM_PREFIX};
use crate::core::{CalculatorEngine, Command, EngineOptions, RenderState, Theme};
use crate::driver::CalculatorDriver;
use crate::storage::{KeyValueStore, MemoryStore};

/// CSS class put on the display while an error is shown
pub const ERROR_CLASS: &str = "error";

/// WASM Driver wrapping the engine and a mock DOM
#[derive(Debug)]
pub struct WasmDriver<S = MemoryStore> {
    engine: CalculatorEngine<S>,
    dom: MockDom,
}

impl Default for WasmDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmDriver {
    /// Creates a driver over an empty in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new(), EngineOptions::default())
    }
}

impl<S: KeyValueStore> WasmDriver<S> {
    /// Creates a driver over `store`, rendering the loaded state immediately
    pub fn with_store(store: S, options: EngineOptions) -> Self {
        let mut dom = MockDom::calculator();
        dom.add_keypad(&WasmKeypad::new());
        let mut driver = Self {
            engine: CalculatorEngine::new(store, options),
            dom,
        };
        driver.sync_dom();
        driver
    }

    /// Returns a reference to the engine
    #[must_use]
    pub const fn engine(&self) -> &CalculatorEngine<S> {
        &self.engine
    }

    /// Returns a reference to the DOM
    #[must_use]
    pub const fn dom(&self) -> &MockDom {
        &self.dom
    }

    /// Simulates clicking an element by id.
    ///
    /// Returns false if the id is not wired to anything (or is not on the
    /// page, as with a history item beyond the list).
    pub fn click(&mut self, element_id: &str) -> bool {
        self.dom.dispatch_event(DomEvent::click(element_id));
        if self.dom.get_element(element_id).is_none() {
            return false;
        }
        match command_for_id(element_id) {
            Some(command) => {
                self.engine.dispatch(command);
                self.sync_dom();
                true
            }
            None => false,
        }
    }

    /// Simulates a document keydown; returns whether the default was prevented
    pub fn key_down(&mut self, key: &str) -> bool {
        let binding = WasmKeypad::key_to_binding(key);
        let prevented = binding.is_some_and(|b| b.prevent_default);
        self.dom.dispatch_event(DomEvent::key_down(key, prevented));
        if let Some(binding) = binding {
            self.engine.dispatch(binding.command);
            self.sync_dom();
        }
        prevented
    }

    /// Advances the virtual clock and re-renders
    pub fn tick(&mut self, elapsed: Duration) {
        self.engine.advance(elapsed);
        self.sync_dom();
    }

    /// Copies the engine state onto the page
    fn sync_dom(&mut self) {
        let state = self.engine.render();

        self.dom.set_element_value(ids::DISPLAY, &state.display);
        self.dom
            .set_element_class(ids::DISPLAY, ERROR_CLASS, state.error.is_some());
        self.dom
            .set_element_text(ids::EXPRESSION_PREVIEW, &state.expression);
        self.dom.set_element_text(ids::MEMORY_INDICATOR, &state.memory);
        self.dom.set_element_visible(ids::LOADER, state.loader_visible);

        let light = state.theme == Theme::Light;
        self.dom.set_element_class(ids::BODY, "light-theme", light);
        self.dom
            .set_element_class(ids::THEME_ICON, Theme::Dark.icon(), !light);
        self.dom
            .set_element_class(ids::THEME_ICON, Theme::Light.icon(), light);

        self.render_history(&state);
    }

    fn render_history(&mut self, state: &RenderState) {
        self.dom.clear_children(ids::HISTORY_LIST);
        if state.history.is_empty() {
            self.dom.append_child(ids::HISTORY_LIST, empty_history());
            return;
        }
        for (index, line) in state.history.iter().enumerate() {
            let item = DomElement::new("div")
                .with_id(&button_id(Command::SelectHistory(index)))
                .with_class("history-item")
                .with_attr("data-index", &index.to_string())
                .with_text(line);
            self.dom.append_child(ids::HISTORY_LIST, item);
        }
    }

    /// Display value as shown on the page
    #[must_use]
    pub fn display_value(&self) -> &str {
        self.dom.get_element_value(ids::DISPLAY).unwrap_or_default()
    }

    /// True while the display carries the error class
    #[must_use]
    pub fn display_has_error_class(&self) -> bool {
        self.dom
            .get_element(ids::DISPLAY)
            .is_some_and(|e| e.has_class(ERROR_CLASS))
    }

    /// History item texts in page order
    #[must_use]
    pub fn history_list_items(&self) -> Vec<String> {
        self.dom
            .get_element(ids::HISTORY_LIST)
            .map(|list| {
                list.children
                    .iter()
                    .filter(|c| c.id.starts_with(HISTORY_ITEM_PREFIX))
                    .map(|c| c.text_content.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl<S: KeyValueStore> CalculatorDriver for WasmDriver<S> {
    fn press(&mut self, command: Command) {
        self.click(&button_id(command));
    }

    fn press_key(&mut self, key: &str) -> bool {
        self.key_down(key)
    }

    fn advance(&mut self, elapsed: Duration) {
        self.tick(elapsed);
    }

    fn display(&self) -> String {
        self.display_value().to_string()
    }

    fn expression(&self) -> String {
        self.dom
            .get_element_text(ids::EXPRESSION_PREVIEW)
            .unwrap_or_default()
            .to_string()
    }

    fn memory_text(&self) -> String {
        self.dom
            .get_element_text(ids::MEMORY_INDICATOR)
            .unwrap_or_default()
            .to_string()
    }

    fn history(&self) -> Vec<String> {
        self.history_list_items()
    }

    fn theme(&self) -> Theme {
        let light = self
            .dom
            .get_element(ids::BODY)
            .is_some_and(|b| b.has_class("light-theme"));
        if light {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    fn has_error(&self) -> bool {
        self.display_has_error_class()
    }

    fn loader_visible(&self) -> bool {
        self.dom.get_element(ids::LOADER).is_some_and(|e| e.visible)
    }
}
