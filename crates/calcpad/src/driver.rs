//! Unified Calculator Driver
//!
//! Scenario logic is written once against [`CalculatorDriver`] and run on
//! every front end: [`HeadlessDriver`] talks to the engine directly, while
//! [`crate::wasm::WasmDriver`] goes through the mock page.

use std::time::Duration;

use crate::core::{CalculatorEngine, Command, EngineOptions, Theme};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::wasm::WasmKeypad;

/// Abstract driver trait for calculator interactions
pub trait CalculatorDriver {
    /// Sends a command as if its button were clicked
    fn press(&mut self, command: Command);

    /// Sends a keyboard key; returns whether the default action was prevented
    fn press_key(&mut self, key: &str) -> bool {
        match WasmKeypad::key_to_binding(key) {
            Some(binding) => {
                self.press(binding.command);
                binding.prevent_default
            }
            None => false,
        }
    }

    /// Types each character of `keys` as a keyboard key
    fn type_keys(&mut self, keys: &str) {
        for ch in keys.chars() {
            self.press_key(ch.encode_utf8(&mut [0; 4]));
        }
    }

    /// Lets virtual time pass
    fn advance(&mut self, elapsed: Duration);

    /// Main display text
    fn display(&self) -> String;

    /// Pending operation preview
    fn expression(&self) -> String;

    /// Memory indicator text
    fn memory_text(&self) -> String;

    /// History lines, newest first
    fn history(&self) -> Vec<String>;

    /// Active theme
    fn theme(&self) -> Theme;

    /// True while an error is displayed
    fn has_error(&self) -> bool;

    /// Whether the startup loader is showing
    fn loader_visible(&self) -> bool;
}

/// Driver that talks to the engine with no page in between
#[derive(Debug)]
pub struct HeadlessDriver<S = MemoryStore> {
    engine: CalculatorEngine<S>,
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDriver {
    /// Creates a driver over an empty in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::with_engine(CalculatorEngine::new(
            MemoryStore::new(),
            EngineOptions::default(),
        ))
    }
}

impl<S: KeyValueStore> HeadlessDriver<S> {
    /// Wraps an existing engine
    pub const fn with_engine(engine: CalculatorEngine<S>) -> Self {
        Self { engine }
    }

    /// Returns a reference to the engine
    #[must_use]
    pub const fn engine(&self) -> &CalculatorEngine<S> {
        &self.engine
    }

    /// Returns the engine
    pub fn into_engine(self) -> CalculatorEngine<S> {
        self.engine
    }
}

impl<S: KeyValueStore> CalculatorDriver for HeadlessDriver<S> {
    fn press(&mut self, command: Command) {
        self.engine.dispatch(command);
    }

    fn advance(&mut self, elapsed: Duration) {
        self.engine.advance(elapsed);
    }

    fn display(&self) -> String {
        self.engine.render().display
    }

    fn expression(&self) -> String {
        self.engine.expression()
    }

    fn memory_text(&self) -> String {
        self.engine.render().memory
    }

    fn history(&self) -> Vec<String> {
        self.engine.history().lines()
    }

    fn theme(&self) -> Theme {
        self.engine.theme()
    }

    fn has_error(&self) -> bool {
        self.engine.error().is_some()
    }

    fn loader_visible(&self) -> bool {
        self.engine.loader_visible()
    }
}

// ===== Shared scenarios =====
// These run against ANY CalculatorDriver implementation

/// Long enough for every deferred action to have run
const SETTLE: Duration = Duration::from_secs(60);

/// Brings a driver back to a blank calculator
fn reset<D: CalculatorDriver>(driver: &mut D) {
    driver.advance(SETTLE);
    driver.press(Command::ClearAll);
    driver.press(Command::ClearHistory);
    driver.press(Command::MemoryClear);
}

/// Verifies digit entry, decimal point handling, delete and clear
pub fn verify_entry_composition<D: CalculatorDriver>(driver: &mut D) {
    reset(driver);

    driver.type_keys("05");
    assert_eq!(driver.display(), "5", "leading zero collapses");

    driver.type_keys("..2");
    assert_eq!(driver.display(), "5.2", "second decimal point ignored");

    driver.press(Command::Delete);
    assert_eq!(driver.display(), "5.");
    driver.press(Command::Delete);
    driver.press(Command::Delete);
    assert_eq!(driver.display(), "0");

    driver.type_keys("42c");
    assert_eq!(driver.display(), "0", "soft clear");
}

/// Verifies left-to-right chaining and each operator
pub fn verify_chained_operations<D: CalculatorDriver>(driver: &mut D) {
    reset(driver);

    driver.type_keys("2+3*");
    assert_eq!(driver.display(), "5");
    assert_eq!(driver.expression(), "5 *");
    driver.type_keys("4=");
    assert_eq!(driver.display(), "20");
    assert_eq!(driver.expression(), "");
    assert_eq!(driver.history()[0], "5 * 4 = 20");

    driver.type_keys("6/3=");
    assert_eq!(driver.display(), "2");

    driver.type_keys("10-4=");
    assert_eq!(driver.display(), "6");

    driver.type_keys("7%3=");
    assert_eq!(driver.display(), "1");
}

/// Verifies results are rounded to 8 decimal places
pub fn verify_rounding<D: CalculatorDriver>(driver: &mut D) {
    reset(driver);

    driver.type_keys("0.1+0.2=");
    assert_eq!(driver.display(), "0.3");

    driver.type_keys("1/3=");
    assert_eq!(driver.display(), "0.33333333");
}

/// Verifies the division-by-zero message and its delayed recovery
pub fn verify_division_by_zero_recovery<D: CalculatorDriver>(driver: &mut D) {
    reset(driver);

    driver.type_keys("5/0=");
    assert!(driver.has_error());
    assert_eq!(driver.display(), "Division by zero");

    driver.advance(Duration::from_millis(1499));
    assert!(driver.has_error(), "error still shown before 1.5s");

    driver.advance(Duration::from_millis(1));
    assert!(!driver.has_error());
    assert_eq!(driver.display(), "0");
    assert!(driver.history().is_empty(), "failed division is not recorded");
}

/// Verifies history order, the 50-entry cap and selection
pub fn verify_history_cap<D: CalculatorDriver>(driver: &mut D) {
    reset(driver);

    for i in 0..51 {
        driver.type_keys(&format!("{i}+0="));
    }
    let history = driver.history();
    assert_eq!(history.len(), 50);
    assert_eq!(history[0], "50 + 0 = 50");
    assert_eq!(history[49], "1 + 0 = 1");

    driver.press(Command::SelectHistory(49));
    assert_eq!(driver.display(), "1");

    driver.press(Command::ClearHistory);
    assert!(driver.history().is_empty());
}

/// Verifies memory add, subtract, recall and clear
pub fn verify_memory_register<D: CalculatorDriver>(driver: &mut D) {
    reset(driver);
    assert_eq!(driver.memory_text(), "M: 0.00");

    driver.type_keys("5");
    driver.press(Command::MemoryAdd);
    assert_eq!(driver.display(), "5", "memory add leaves the entry alone");
    driver.type_keys("3");
    driver.press(Command::MemoryAdd);
    assert_eq!(driver.memory_text(), "M: 8.00");

    driver.press(Command::MemoryRecall);
    assert_eq!(driver.display(), "8");

    driver.type_keys("2");
    driver.press(Command::MemorySubtract);
    assert_eq!(driver.memory_text(), "M: 6.00");

    driver.press(Command::MemoryClear);
    assert_eq!(driver.memory_text(), "M: 0.00");
    driver.press(Command::MemoryRecall);
    assert_eq!(driver.display(), "0");
}

/// Verifies the theme toggles back and forth
pub fn verify_theme_toggle<D: CalculatorDriver>(driver: &mut D) {
    let initial = driver.theme();
    driver.press(Command::ToggleTheme);
    assert_eq!(driver.theme(), initial.toggle());
    driver.press(Command::ToggleTheme);
    assert_eq!(driver.theme(), initial);
}

/// Verifies keyboard bindings and which keys suppress the default action
pub fn verify_keyboard<D: CalculatorDriver>(driver: &mut D) {
    reset(driver);

    assert!(!driver.press_key("9"));
    assert!(driver.press_key("*"));
    assert!(!driver.press_key("4"));
    assert!(driver.press_key("Enter"));
    assert_eq!(driver.display(), "36");

    assert!(driver.press_key("Backspace"));
    assert_eq!(driver.display(), "3");

    assert!(!driver.press_key("Escape"));
    assert_eq!(driver.display(), "0");

    assert!(!driver.press_key("x"));
    assert_eq!(driver.display(), "0");
}

/// Complete verification suite - runs every scenario in turn
pub fn run_all_scenarios<D: CalculatorDriver>(driver: &mut D) {
    verify_entry_composition(driver);
    verify_chained_operations(driver);
    verify_rounding(driver);
    verify_division_by_zero_recovery(driver);
    verify_history_cap(driver);
    verify_memory_register(driver);
    verify_theme_toggle(driver);
    verify_keyboard(driver);
}
