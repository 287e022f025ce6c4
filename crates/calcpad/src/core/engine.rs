//! The calculator state machine
//!
//! [`CalculatorEngine`] owns the entry, the pending binary operation and the
//! reset flag, plus the persisted memory register, history and theme. Every
//! method is a synchronous transition. Persisted substate is written back to
//! the [`KeyValueStore`] right after it changes; write failures are logged and
//! otherwise ignored.

use crate::core::number::{format_fixed, format_number, parse_number};
use crate::core::{
    CalcError, Command, DeferredAction, Entry, History, HistoryEntry, Operation, Scheduler,
    Theme,
};
use crate::storage::{KeyValueStore, HISTORY_KEY, MEMORY_KEY, THEME_KEY};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default delay before the error message is cleared
pub const DEFAULT_ERROR_RECOVERY_DELAY: Duration = Duration::from_millis(1500);
/// Default delay before the startup loader is hidden
pub const DEFAULT_LOADER_DELAY: Duration = Duration::from_millis(1500);

/// Engine timing options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineOptions {
    /// How long an error stays on the display
    pub error_recovery_delay: Duration,
    /// How long the startup loader stays visible
    pub loader_delay: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            error_recovery_delay: DEFAULT_ERROR_RECOVERY_DELAY,
            loader_delay: DEFAULT_LOADER_DELAY,
        }
    }
}

impl EngineOptions {
    /// Sets the error recovery delay
    #[must_use]
    pub const fn with_error_recovery_delay(mut self, delay: Duration) -> Self {
        self.error_recovery_delay = delay;
        self
    }

    /// Sets the loader delay
    #[must_use]
    pub const fn with_loader_delay(mut self, delay: Duration) -> Self {
        self.loader_delay = delay;
        self
    }
}

/// Left operand and operator waiting for a right operand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingOperation {
    /// Entry value when the operator was chosen
    pub operand: f64,
    /// Chosen operator
    pub operation: Operation,
}

/// Outcome of [`CalculatorEngine::evaluate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// Nothing to evaluate, or the right operand has not been typed yet
    Skipped,
    /// The operation ran; carries the rounded result
    Completed(f64),
    /// The operation failed; state was left untouched
    Failed(CalcError),
}

/// Snapshot of everything the page shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderState {
    /// Main display: the error message until the next display update, else
    /// the entry
    pub display: String,
    /// Current entry text
    pub entry: String,
    /// Pending operation preview, `"<operand> <symbol>"` or empty
    pub expression: String,
    /// Memory indicator, `"M: <value>"` with two decimals
    pub memory: String,
    /// History lines, newest first
    pub history: Vec<String>,
    /// Active theme
    pub theme: Theme,
    /// Error message while the display carries the error class
    pub error: Option<String>,
    /// Whether the startup loader is visible
    pub loader_visible: bool,
}

/// Calculator state machine over a persistent store
#[derive(Debug)]
pub struct CalculatorEngine<S> {
    store: S,
    options: EngineOptions,
    entry: Entry,
    pending: Option<PendingOperation>,
    reset_next: bool,
    memory: f64,
    history: History,
    theme: Theme,
    error: Option<CalcError>,
    message_shown: bool,
    loader_visible: bool,
    scheduler: Scheduler,
}

impl<S: KeyValueStore> CalculatorEngine<S> {
    /// Creates an engine, loading memory, history and theme from `store`.
    ///
    /// Missing or malformed stored values fall back to their defaults.
    pub fn new(store: S, options: EngineOptions) -> Self {
        let memory = load_memory(&store);
        let history = load_history(&store);
        let theme = load_theme(&store);
        info!(
            memory,
            history = history.len(),
            theme = %theme,
            "calculator state loaded"
        );

        let mut scheduler = Scheduler::new();
        scheduler.schedule(options.loader_delay, DeferredAction::HideLoader);

        Self {
            store,
            options,
            entry: Entry::new(),
            pending: None,
            reset_next: false,
            memory,
            history,
            theme,
            error: None,
            message_shown: false,
            loader_visible: true,
            scheduler,
        }
    }

    /// Creates an engine with default options
    pub fn with_store(store: S) -> Self {
        Self::new(store, EngineOptions::default())
    }

    // ===== Entry composition =====

    /// Types a digit or decimal point.
    ///
    /// After an operator, a result or a recall the character starts a fresh
    /// entry, so the entry can become a lone `"."`.
    pub fn append_digit(&mut self, ch: char) {
        if !Entry::accepts(ch) {
            debug!(%ch, "ignoring non-digit input");
            return;
        }
        if self.reset_next {
            self.entry.replace(ch);
            self.reset_next = false;
        } else if !self.entry.push(ch) {
            return;
        }
        self.refresh_display();
    }

    /// Drops the last character of the entry
    pub fn delete(&mut self) {
        self.entry.delete_last();
        self.refresh_display();
    }

    /// Resets the entry, keeping any pending operation
    pub fn clear_entry(&mut self) {
        self.entry.clear();
        self.refresh_display();
    }

    /// Resets the entry and forgets the pending operation
    pub fn clear_all(&mut self) {
        self.entry.clear();
        self.pending = None;
        self.reset_next = false;
        self.refresh_display();
    }

    // ===== Operators =====

    /// Chooses a binary operator.
    ///
    /// A pending operation whose right operand has been typed is evaluated
    /// first, so chains run left to right. `.` appends a decimal point and
    /// unknown symbols are ignored.
    pub fn choose_operator(&mut self, symbol: char) {
        if symbol == '.' {
            self.append_digit('.');
            return;
        }
        let Some(operation) = Operation::from_symbol(symbol) else {
            debug!(%symbol, "ignoring unknown operator");
            return;
        };

        if self.pending.is_some() && !self.reset_next {
            // A failed chain still falls through and captures the entry
            self.evaluate();
        }

        self.pending = Some(PendingOperation {
            operand: self.entry.value(),
            operation,
        });
        self.reset_next = true;
        self.refresh_display();
    }

    /// Resolves the pending operation against the entry
    pub fn evaluate(&mut self) -> Evaluation {
        let Some(pending) = self.pending else {
            debug!("evaluate skipped: no pending operation");
            return Evaluation::Skipped;
        };
        if self.reset_next {
            debug!("evaluate skipped: right operand not entered");
            return Evaluation::Skipped;
        }

        let operand_b = self.entry.value();
        match pending.operation.evaluate(pending.operand, operand_b) {
            Ok(result) => {
                let record = HistoryEntry::new(pending.operand, pending.operation, operand_b, result);
                debug!(calculation = %record, "evaluated");
                self.history.record(record);
                self.persist_history();

                self.entry.set_number(result);
                self.pending = None;
                self.reset_next = true;
                self.refresh_display();
                Evaluation::Completed(result)
            }
            Err(err) => {
                warn!(
                    operand_a = pending.operand,
                    operation = %pending.operation,
                    operand_b,
                    "{err}"
                );
                self.error = Some(err);
                self.message_shown = true;
                self.scheduler
                    .schedule(self.options.error_recovery_delay, DeferredAction::RecoverFromError);
                Evaluation::Failed(err)
            }
        }
    }

    // ===== Memory register =====

    /// Resets the memory register to 0
    pub fn memory_clear(&mut self) {
        self.memory = 0.0;
        self.persist_memory();
    }

    /// Shows the memory register in the entry
    pub fn memory_recall(&mut self) {
        self.entry.set_number(self.memory);
        self.reset_next = true;
        self.refresh_display();
    }

    /// Adds the entry to the memory register; the entry stays as is
    pub fn memory_add(&mut self) {
        self.memory += self.entry.value();
        self.persist_memory();
        self.reset_next = true;
    }

    /// Subtracts the entry from the memory register; the entry stays as is
    pub fn memory_subtract(&mut self) {
        self.memory -= self.entry.value();
        self.persist_memory();
        self.reset_next = true;
    }

    // ===== History =====

    /// Forgets every recorded calculation
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.persist_history();
    }

    /// Loads the result of history entry `index` (0 = newest) into the entry
    pub fn select_history(&mut self, index: usize) {
        let Some(result) = self.history.get(index).map(|e| e.result) else {
            debug!(index, "history selection out of range");
            return;
        };
        self.entry.set_number(result);
        self.reset_next = true;
        self.refresh_display();
    }

    // ===== Theme =====

    /// Switches between dark and light
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        let value = self.theme.as_str();
        self.persist(THEME_KEY, value);
    }

    // ===== Time =====

    /// Moves the virtual clock forward and runs whatever became due.
    ///
    /// Returns the actions that ran, in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<DeferredAction> {
        let due = self.scheduler.advance(elapsed);
        for action in &due {
            self.run_deferred(*action);
        }
        due
    }

    /// Advances the clock until nothing is left pending
    pub fn settle(&mut self) -> Vec<DeferredAction> {
        let mut ran = Vec::new();
        while let Some(wait) = self.scheduler.next_due_in() {
            ran.extend(self.advance(wait));
        }
        ran
    }

    fn run_deferred(&mut self, action: DeferredAction) {
        match action {
            DeferredAction::RecoverFromError => {
                info!("recovering from error");
                self.error = None;
                self.entry.clear();
                self.refresh_display();
            }
            DeferredAction::HideLoader => {
                self.loader_visible = false;
            }
        }
    }

    /// The display goes back to showing the entry. An error class stays
    /// until recovery runs.
    fn refresh_display(&mut self) {
        self.message_shown = false;
    }

    // ===== Commands =====

    /// Applies a command and returns the resulting snapshot
    pub fn dispatch(&mut self, command: Command) -> RenderState {
        match command {
            Command::Digit(_) | Command::Decimal => match command.entry_char() {
                Some(ch) => self.append_digit(ch),
                None => debug!(?command, "ignoring out-of-range digit"),
            },
            Command::Operator(symbol) => self.choose_operator(symbol),
            Command::Equals => {
                self.evaluate();
            }
            Command::Clear => self.clear_entry(),
            Command::ClearAll => self.clear_all(),
            Command::Delete => self.delete(),
            Command::MemoryRecall => self.memory_recall(),
            Command::MemoryClear => self.memory_clear(),
            Command::MemoryAdd => self.memory_add(),
            Command::MemorySubtract => self.memory_subtract(),
            Command::SelectHistory(index) => self.select_history(index),
            Command::ClearHistory => self.clear_history(),
            Command::ToggleTheme => self.toggle_theme(),
        }
        self.render()
    }

    /// Builds the presentation snapshot
    #[must_use]
    pub fn render(&self) -> RenderState {
        let error = self.error.map(|e| e.to_string());
        let display = match &error {
            Some(message) if self.message_shown => message.clone(),
            _ => self.entry.to_string(),
        };
        RenderState {
            display,
            entry: self.entry.to_string(),
            expression: self.expression(),
            memory: format!("M: {}", format_fixed(self.memory, 2)),
            history: self.history.lines(),
            theme: self.theme,
            error,
            loader_visible: self.loader_visible,
        }
    }

    /// Pending operation preview, `"<operand> <symbol>"` or empty
    #[must_use]
    pub fn expression(&self) -> String {
        self.pending
            .map(|p| format!("{} {}", format_number(p.operand), p.operation))
            .unwrap_or_default()
    }

    // ===== Accessors =====

    /// Current entry
    #[must_use]
    pub const fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Pending operation, if any
    #[must_use]
    pub const fn pending(&self) -> Option<PendingOperation> {
        self.pending
    }

    /// True if the next digit starts a fresh entry
    #[must_use]
    pub const fn reset_next(&self) -> bool {
        self.reset_next
    }

    /// Memory register value
    #[must_use]
    pub const fn memory(&self) -> f64 {
        self.memory
    }

    /// Calculation history
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Active theme
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Error currently shown, if any
    #[must_use]
    pub const fn error(&self) -> Option<CalcError> {
        self.error
    }

    /// Whether the startup loader is visible
    #[must_use]
    pub const fn loader_visible(&self) -> bool {
        self.loader_visible
    }

    /// Deferred-action queue
    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Options the engine was built with
    #[must_use]
    pub const fn options(&self) -> EngineOptions {
        self.options
    }

    /// Backing store
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the engine, returning the backing store
    pub fn into_store(self) -> S {
        self.store
    }

    // ===== Persistence =====

    fn persist_memory(&mut self) {
        let value = format_number(self.memory);
        self.persist(MEMORY_KEY, &value);
    }

    fn persist_history(&mut self) {
        match self.history.to_json() {
            Ok(json) => self.persist(HISTORY_KEY, &json),
            Err(e) => warn!(error = %e, "failed to serialize history"),
        }
    }

    fn persist(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!(key, error = %e, "failed to persist calculator state");
        }
    }
}

fn load_memory(store: &impl KeyValueStore) -> f64 {
    let Some(text) = store.get(MEMORY_KEY) else {
        return 0.0;
    };
    parse_number(&text).unwrap_or_else(|| {
        warn!(value = %text, "stored memory is not a number, using 0");
        0.0
    })
}

fn load_history(store: &impl KeyValueStore) -> History {
    let Some(json) = store.get(HISTORY_KEY) else {
        return History::new();
    };
    History::from_json(&json).unwrap_or_else(|e| {
        warn!(error = %e, "stored history is malformed, starting empty");
        History::new()
    })
}

fn load_theme(store: &impl KeyValueStore) -> Theme {
    let Some(text) = store.get(THEME_KEY) else {
        return Theme::default();
    };
    Theme::parse(&text).unwrap_or_else(|| {
        warn!(value = %text, "stored theme is unknown, using dark");
        Theme::default()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError, StorageResult};

    fn new_engine() -> CalculatorEngine<MemoryStore> {
        CalculatorEngine::with_store(MemoryStore::new())
    }

    /// Feeds keypad-style input: digits, `.`, operators, `=`
    fn press(engine: &mut CalculatorEngine<MemoryStore>, keys: &str) {
        for ch in keys.chars() {
            match ch {
                '=' => {
                    engine.evaluate();
                }
                ' ' => {}
                c if Entry::accepts(c) => engine.append_digit(c),
                c => engine.choose_operator(c),
            }
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[derive(Debug, Default)]
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("read-only".into()))
        }
    }

    // ===== Construction =====

    #[test]
    fn test_initial_state() {
        let engine = new_engine();
        assert_eq!(engine.entry().as_str(), "0");
        assert_eq!(engine.pending(), None);
        assert!(!engine.reset_next());
        assert_eq!(engine.memory(), 0.0);
        assert!(engine.history().is_empty());
        assert_eq!(engine.theme(), Theme::Dark);
        assert_eq!(engine.error(), None);
        assert!(engine.loader_visible());
    }

    #[test]
    fn test_loads_persisted_state() {
        let store = MemoryStore::new()
            .with_value(MEMORY_KEY, "12.5")
            .with_value(HISTORY_KEY, r#"[{"operandA":2,"operator":"+","operandB":3,"result":5}]"#)
            .with_value(THEME_KEY, "light");
        let engine = CalculatorEngine::with_store(store);
        assert_eq!(engine.memory(), 12.5);
        assert_eq!(engine.history().lines(), vec!["2 + 3 = 5"]);
        assert_eq!(engine.theme(), Theme::Light);
    }

    #[test]
    fn test_malformed_persisted_state_falls_back() {
        let store = MemoryStore::new()
            .with_value(MEMORY_KEY, "lots")
            .with_value(HISTORY_KEY, "{not json")
            .with_value(THEME_KEY, "purple");
        let engine = CalculatorEngine::with_store(store);
        assert_eq!(engine.memory(), 0.0);
        assert!(engine.history().is_empty());
        assert_eq!(engine.theme(), Theme::Dark);
    }

    #[test]
    fn test_loader_hidden_after_delay() {
        let mut engine = new_engine();
        engine.advance(ms(1499));
        assert!(engine.loader_visible());
        assert_eq!(engine.advance(ms(1)), vec![DeferredAction::HideLoader]);
        assert!(!engine.loader_visible());
        assert!(!engine.render().loader_visible);
    }

    #[test]
    fn test_custom_loader_delay() {
        let options = EngineOptions::default().with_loader_delay(Duration::ZERO);
        let mut engine = CalculatorEngine::new(MemoryStore::new(), options);
        engine.advance(Duration::ZERO);
        assert!(!engine.loader_visible());
    }

    // ===== Entry composition =====

    #[test]
    fn test_leading_zero_collapse() {
        let mut engine = new_engine();
        engine.append_digit('5');
        assert_eq!(engine.entry().as_str(), "5");
    }

    #[test]
    fn test_digits_concatenate() {
        let mut engine = new_engine();
        press(&mut engine, "1024.75");
        assert_eq!(engine.entry().as_str(), "1024.75");
    }

    #[test]
    fn test_second_decimal_point_is_noop() {
        let mut engine = new_engine();
        press(&mut engine, "3.1.4");
        assert_eq!(engine.entry().as_str(), "3.14");
    }

    #[test]
    fn test_non_digit_ignored() {
        let mut engine = new_engine();
        engine.append_digit('x');
        assert_eq!(engine.entry().as_str(), "0");
    }

    #[test]
    fn test_digit_after_operator_starts_fresh_entry() {
        let mut engine = new_engine();
        press(&mut engine, "12+");
        assert!(engine.reset_next());
        engine.append_digit('7');
        assert_eq!(engine.entry().as_str(), "7");
        assert!(!engine.reset_next());
    }

    #[test]
    fn test_decimal_point_after_reset_is_lone_point() {
        let mut engine = new_engine();
        press(&mut engine, "12+.");
        assert_eq!(engine.entry().as_str(), ".");
        engine.append_digit('5');
        assert_eq!(engine.entry().as_str(), ".5");
        engine.evaluate();
        assert_eq!(engine.entry().as_str(), "12.5");
    }

    #[test]
    fn test_delete() {
        let mut engine = new_engine();
        press(&mut engine, "123");
        engine.delete();
        assert_eq!(engine.entry().as_str(), "12");
        engine.delete();
        engine.delete();
        assert_eq!(engine.entry().as_str(), "0");
    }

    #[test]
    fn test_clear_entry_keeps_pending() {
        let mut engine = new_engine();
        press(&mut engine, "8*5");
        engine.clear_entry();
        assert_eq!(engine.entry().as_str(), "0");
        assert_eq!(engine.expression(), "8 *");
        press(&mut engine, "3=");
        assert_eq!(engine.entry().as_str(), "24");
    }

    #[test]
    fn test_clear_all() {
        let mut engine = new_engine();
        press(&mut engine, "8*");
        engine.clear_all();
        assert_eq!(engine.entry().as_str(), "0");
        assert_eq!(engine.pending(), None);
        assert!(!engine.reset_next());
        assert_eq!(engine.expression(), "");
    }

    // ===== Operators & evaluation =====

    #[test]
    fn test_simple_division() {
        let mut engine = new_engine();
        press(&mut engine, "6/3");
        assert_eq!(engine.evaluate(), Evaluation::Completed(2.0));
        assert_eq!(engine.entry().as_str(), "2");
        assert_eq!(engine.pending(), None);
        assert!(engine.reset_next());
    }

    #[test]
    fn test_chaining_left_to_right() {
        let mut engine = new_engine();
        press(&mut engine, "2+3*4=");
        assert_eq!(engine.entry().as_str(), "20");
        assert_eq!(engine.history().lines(), vec!["5 * 4 = 20", "2 + 3 = 5"]);
    }

    #[test]
    fn test_operator_replaced_before_right_operand() {
        let mut engine = new_engine();
        press(&mut engine, "9+-");
        assert_eq!(engine.expression(), "9 -");
        assert!(engine.history().is_empty());
        press(&mut engine, "4=");
        assert_eq!(engine.entry().as_str(), "5");
    }

    #[test]
    fn test_choose_operator_point_appends_decimal() {
        let mut engine = new_engine();
        press(&mut engine, "7");
        engine.choose_operator('.');
        assert_eq!(engine.entry().as_str(), "7.");
        assert_eq!(engine.pending(), None);
    }

    #[test]
    fn test_unknown_operator_ignored() {
        let mut engine = new_engine();
        press(&mut engine, "7");
        engine.choose_operator('^');
        assert_eq!(engine.pending(), None);
        assert!(!engine.reset_next());
    }

    #[test]
    fn test_float_noise_rounded_away() {
        let mut engine = new_engine();
        press(&mut engine, "0.1+0.2=");
        assert_eq!(engine.entry().as_str(), "0.3");
    }

    #[test]
    fn test_modulo_truncated_remainder() {
        let mut engine = new_engine();
        press(&mut engine, "7%3=");
        assert_eq!(engine.entry().as_str(), "1");

        // Negative operands only reach the entry through results
        let mut engine = new_engine();
        press(&mut engine, "0-7=%3=");
        assert_eq!(engine.entry().as_str(), "-1");
    }

    #[test]
    fn test_modulo_by_zero_is_nan() {
        let mut engine = new_engine();
        press(&mut engine, "5%0");
        assert!(matches!(engine.evaluate(), Evaluation::Completed(r) if r.is_nan()));
        assert_eq!(engine.entry().as_str(), "NaN");
        assert_eq!(engine.error(), None);
    }

    #[test]
    fn test_evaluate_without_pending_is_skipped() {
        let mut engine = new_engine();
        press(&mut engine, "42");
        assert_eq!(engine.evaluate(), Evaluation::Skipped);
        assert_eq!(engine.entry().as_str(), "42");
    }

    #[test]
    fn test_evaluate_before_right_operand_is_skipped() {
        let mut engine = new_engine();
        press(&mut engine, "42+");
        assert_eq!(engine.evaluate(), Evaluation::Skipped);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_repeated_equals_does_nothing() {
        let mut engine = new_engine();
        press(&mut engine, "2+2==");
        assert_eq!(engine.entry().as_str(), "4");
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_result_continues_as_left_operand() {
        let mut engine = new_engine();
        press(&mut engine, "2+2=*10=");
        assert_eq!(engine.entry().as_str(), "40");
    }

    // ===== Division by zero =====

    #[test]
    fn test_division_by_zero_shows_error_then_recovers() {
        let mut engine = new_engine();
        press(&mut engine, "5/0");
        assert_eq!(
            engine.evaluate(),
            Evaluation::Failed(CalcError::DivisionByZero)
        );

        let state = engine.render();
        assert_eq!(state.display, "Division by zero");
        assert_eq!(state.error.as_deref(), Some("Division by zero"));
        assert_eq!(engine.entry().as_str(), "0");
        assert!(engine.pending().is_some());

        assert!(!engine.advance(ms(1499)).contains(&DeferredAction::RecoverFromError));
        assert!(engine.error().is_some());

        assert!(engine.advance(ms(1)).contains(&DeferredAction::RecoverFromError));
        assert_eq!(engine.error(), None);
        assert_eq!(engine.entry().as_str(), "0");
        assert!(engine.history().is_empty());
        assert_eq!(engine.render().display, "0");
    }

    #[test]
    fn test_division_by_zero_leaves_state_untouched() {
        let mut engine = new_engine();
        press(&mut engine, "5/0.0");
        engine.evaluate();
        assert_eq!(engine.entry().as_str(), "0.0");
        assert_eq!(
            engine.pending(),
            Some(PendingOperation {
                operand: 5.0,
                operation: Operation::Divide
            })
        );
        assert!(!engine.reset_next());
    }

    #[test]
    fn test_recovery_resets_entry_typed_during_error() {
        let mut engine = new_engine();
        press(&mut engine, "5/0=");
        press(&mut engine, "7");
        let state = engine.render();
        assert_eq!(state.entry, "7");
        assert_eq!(state.display, "7");
        assert_eq!(state.error.as_deref(), Some("Division by zero"));
        engine.settle();
        assert_eq!(engine.entry().as_str(), "0");
        assert_eq!(engine.render().display, "0");
    }

    #[test]
    fn test_error_message_stays_until_display_update() {
        let mut engine = new_engine();
        press(&mut engine, "5/0=");
        // Neither memory nor theme changes touch the display
        engine.dispatch(Command::MemoryAdd);
        engine.dispatch(Command::ToggleTheme);
        assert_eq!(engine.render().display, "Division by zero");
        engine.dispatch(Command::Delete);
        let state = engine.render();
        assert_eq!(state.display, "0");
        assert!(state.error.is_some());
    }

    #[test]
    fn test_failed_chain_shows_entry_with_error_class() {
        let mut engine = new_engine();
        press(&mut engine, "5/0+");
        let state = engine.render();
        assert_eq!(state.display, "0");
        assert_eq!(state.expression, "0 +");
        assert_eq!(state.error.as_deref(), Some("Division by zero"));
    }

    #[test]
    fn test_failed_chain_still_captures_operator() {
        let mut engine = new_engine();
        press(&mut engine, "5/0+");
        assert_eq!(engine.error(), Some(CalcError::DivisionByZero));
        assert_eq!(
            engine.pending(),
            Some(PendingOperation {
                operand: 0.0,
                operation: Operation::Add
            })
        );
        assert!(engine.reset_next());
    }

    #[test]
    fn test_custom_error_recovery_delay() {
        let options = EngineOptions::default().with_error_recovery_delay(ms(10));
        let mut engine = CalculatorEngine::new(MemoryStore::new(), options);
        engine.append_digit('1');
        engine.choose_operator('/');
        engine.append_digit('0');
        engine.evaluate();
        engine.advance(ms(10));
        assert_eq!(engine.error(), None);
    }

    // ===== History =====

    #[test]
    fn test_history_persisted_on_evaluate() {
        let mut engine = new_engine();
        press(&mut engine, "2+3=");
        assert_eq!(
            engine.store().get(HISTORY_KEY).as_deref(),
            Some(r#"[{"operandA":2,"operator":"+","operandB":3,"result":5}]"#)
        );
    }

    #[test]
    fn test_history_capped_at_fifty() {
        let mut engine = new_engine();
        for _ in 0..51 {
            press(&mut engine, "1+1=");
        }
        assert_eq!(engine.history().len(), 50);
        let stored = History::from_json(&engine.store().get(HISTORY_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 50);
    }

    #[test]
    fn test_select_history() {
        let mut engine = new_engine();
        press(&mut engine, "2+3=6*7=");
        engine.select_history(1);
        assert_eq!(engine.entry().as_str(), "5");
        assert!(engine.reset_next());
        engine.append_digit('9');
        assert_eq!(engine.entry().as_str(), "9");
    }

    #[test]
    fn test_select_history_out_of_range_is_noop() {
        let mut engine = new_engine();
        press(&mut engine, "2+3=4");
        engine.select_history(5);
        assert_eq!(engine.entry().as_str(), "4");
        assert!(!engine.reset_next());
    }

    #[test]
    fn test_clear_history_persists_empty_list() {
        let mut engine = new_engine();
        press(&mut engine, "2+3=");
        engine.clear_history();
        assert!(engine.history().is_empty());
        assert_eq!(engine.store().get(HISTORY_KEY).as_deref(), Some("[]"));
    }

    // ===== Memory =====

    #[test]
    fn test_memory_add_then_recall() {
        let mut engine = new_engine();
        press(&mut engine, "5");
        engine.memory_add();
        assert_eq!(engine.entry().as_str(), "5");
        assert!(engine.reset_next());
        press(&mut engine, "3");
        engine.memory_add();
        engine.clear_all();
        engine.memory_recall();
        assert_eq!(engine.entry().as_str(), "8");
        assert_eq!(engine.store().get(MEMORY_KEY).as_deref(), Some("8"));
    }

    #[test]
    fn test_memory_indicator_rounds_ties_up() {
        let mut engine = new_engine();
        press(&mut engine, "0.125");
        assert_eq!(engine.dispatch(Command::MemoryAdd).memory, "M: 0.13");

        engine.memory_clear();
        press(&mut engine, "1000000000000000000000");
        assert_eq!(engine.dispatch(Command::MemoryAdd).memory, "M: 1e+21");
    }

    #[test]
    fn test_memory_subtract() {
        let mut engine = new_engine();
        press(&mut engine, "2");
        engine.memory_subtract();
        assert_eq!(engine.memory(), -2.0);
        assert_eq!(engine.render().memory, "M: -2.00");
    }

    #[test]
    fn test_memory_clear_persists_zero() {
        let mut engine = new_engine();
        press(&mut engine, "9");
        engine.memory_add();
        engine.memory_clear();
        assert_eq!(engine.memory(), 0.0);
        assert_eq!(engine.store().get(MEMORY_KEY).as_deref(), Some("0"));
        assert_eq!(engine.render().memory, "M: 0.00");
    }

    #[test]
    fn test_memory_add_lone_point_is_nan() {
        let mut engine = new_engine();
        press(&mut engine, "1+.");
        engine.memory_add();
        assert!(engine.memory().is_nan());
        assert_eq!(engine.store().get(MEMORY_KEY).as_deref(), Some("NaN"));
    }

    // ===== Theme =====

    #[test]
    fn test_toggle_theme_persists() {
        let mut engine = new_engine();
        engine.toggle_theme();
        assert_eq!(engine.theme(), Theme::Light);
        assert_eq!(engine.store().get(THEME_KEY).as_deref(), Some("light"));
        engine.toggle_theme();
        assert_eq!(engine.store().get(THEME_KEY).as_deref(), Some("dark"));
    }

    // ===== Persistence round trip =====

    #[test]
    fn test_state_survives_restart() {
        let mut engine = new_engine();
        press(&mut engine, "0.1+0.2=");
        engine.memory_add();
        engine.toggle_theme();

        let restored = CalculatorEngine::with_store(engine.into_store());
        assert_eq!(restored.memory(), 0.3);
        assert_eq!(restored.history().lines(), vec!["0.1 + 0.2 = 0.3"]);
        assert_eq!(restored.theme(), Theme::Light);
        assert_eq!(restored.entry().as_str(), "0");
    }

    #[test]
    fn test_write_failures_do_not_propagate() {
        let mut engine = CalculatorEngine::with_store(FailingStore);
        engine.append_digit('4');
        engine.memory_add();
        engine.choose_operator('+');
        engine.append_digit('1');
        assert_eq!(engine.evaluate(), Evaluation::Completed(5.0));
        engine.toggle_theme();
        assert_eq!(engine.memory(), 4.0);
        assert_eq!(engine.theme(), Theme::Light);
    }

    // ===== Dispatch & render =====

    #[test]
    fn test_dispatch_returns_snapshot() {
        let mut engine = new_engine();
        engine.dispatch(Command::Digit(4));
        let state = engine.dispatch(Command::Operator('*'));
        assert_eq!(state.expression, "4 *");
        engine.dispatch(Command::Digit(2));
        let state = engine.dispatch(Command::Equals);
        assert_eq!(state.display, "8");
        assert_eq!(state.history, vec!["4 * 2 = 8"]);
        assert_eq!(state.expression, "");
    }

    #[test]
    fn test_dispatch_covers_every_command() {
        let mut engine = new_engine();
        engine.dispatch(Command::Digit(1));
        engine.dispatch(Command::Decimal);
        engine.dispatch(Command::Digit(5));
        engine.dispatch(Command::Delete);
        engine.dispatch(Command::Digit(25));
        assert_eq!(engine.entry().as_str(), "1.");
        engine.dispatch(Command::MemoryAdd);
        engine.dispatch(Command::MemorySubtract);
        engine.dispatch(Command::MemoryRecall);
        assert_eq!(engine.entry().as_str(), "0");
        engine.dispatch(Command::MemoryClear);
        engine.dispatch(Command::Clear);
        engine.dispatch(Command::ClearAll);
        engine.dispatch(Command::ClearHistory);
        engine.dispatch(Command::SelectHistory(0));
        let state = engine.dispatch(Command::ToggleTheme);
        assert_eq!(state.theme, Theme::Light);
    }

    #[test]
    fn test_render_defaults() {
        let state = new_engine().render();
        assert_eq!(
            state,
            RenderState {
                display: "0".into(),
                entry: "0".into(),
                expression: String::new(),
                memory: "M: 0.00".into(),
                history: Vec::new(),
                theme: Theme::Dark,
                error: None,
                loader_visible: true,
            }
        );
    }

    #[test]
    fn test_render_state_serializes() {
        let json = serde_json::to_value(new_engine().render()).unwrap();
        assert_eq!(json["display"], "0");
        assert_eq!(json["theme"], "dark");
        assert_eq!(json["loader_visible"], true);
    }

    #[test]
    fn test_settle_runs_everything() {
        let mut engine = new_engine();
        press(&mut engine, "1/0=");
        let ran = engine.settle();
        assert_eq!(
            ran,
            vec![DeferredAction::HideLoader, DeferredAction::RecoverFromError]
        );
        assert!(engine.scheduler().is_idle());
    }
}
