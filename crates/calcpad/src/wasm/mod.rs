//! WASM Frontend for Calculator
//!
//! The page model ([`MockDom`]), the keypad layout and key bindings, and a
//! driver that renders the engine onto the page. Everything except
//! `browser` compiles natively so the page wiring can be tested without a
//! browser.

#[cfg(feature = "wasm")]
mod browser;
pub mod dom;
mod driver;
pub mod keypad;

#[cfg(feature = "wasm")]
pub use browser::{BrowserCalculator, LocalStorage};
pub use dom::{DomElement, DomEvent, MockDom};
pub use driver::{WasmDriver, ERROR_CLASS};
pub use keypad::{KeyBinding, KeypadButtonDef, MockDomKeypadExt, WasmKeypad};
