//! Keypad layout, button ids and keyboard bindings
//!
//! Every clickable element on the page and every handled keyboard key maps to
//! a [`Command`]. Button ids match the browser page so the same strings work
//! for the mock DOM, the wasm entry point and the CLI.

use super::dom::{ids, DomElement, MockDom};
use crate::core::{Command, Operation};

/// Prefix of history list item ids (`history-item-<index>`)
pub const HISTORY_ITEM_PREFIX: &str = "history-item-";

/// Returns the element id that triggers `command`
#[must_use]
pub fn button_id(command: Command) -> String {
    match command {
        Command::Digit(d) => format!("num-{d}"),
        Command::Decimal => "num-decimal".to_string(),
        Command::Operator(symbol) => match Operation::from_symbol(symbol) {
            Some(op) => format!("op-{}", op.name()),
            None if symbol == '.' => "num-decimal".to_string(),
            None => format!("op-{symbol}"),
        },
        Command::Equals => "equalsBtn".to_string(),
        Command::Clear => "clearBtn".to_string(),
        Command::ClearAll => "clearAllBtn".to_string(),
        Command::Delete => "deleteBtn".to_string(),
        Command::MemoryRecall => "memRecall".to_string(),
        Command::MemoryClear => "memClear".to_string(),
        Command::MemoryAdd => "memAdd".to_string(),
        Command::MemorySubtract => "memSubtract".to_string(),
        Command::SelectHistory(index) => format!("{HISTORY_ITEM_PREFIX}{index}"),
        Command::ClearHistory => ids::CLEAR_HISTORY.to_string(),
        Command::ToggleTheme => ids::THEME_TOGGLE.to_string(),
    }
}

/// Returns the command an element id triggers, if any
#[must_use]
pub fn command_for_id(id: &str) -> Option<Command> {
    if let Some(index) = id.strip_prefix(HISTORY_ITEM_PREFIX) {
        return index.parse().ok().map(Command::SelectHistory);
    }
    if let Some(digit) = id.strip_prefix("num-") {
        return match digit {
            "decimal" => Some(Command::Decimal),
            d => d.parse().ok().and_then(Command::digit),
        };
    }
    if let Some(name) = id.strip_prefix("op-") {
        return Operation::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .and_then(|op| op.symbol().chars().next())
            .map(Command::Operator);
    }
    match id {
        "equalsBtn" => Some(Command::Equals),
        "clearBtn" => Some(Command::Clear),
        "clearAllBtn" => Some(Command::ClearAll),
        "deleteBtn" => Some(Command::Delete),
        "memRecall" => Some(Command::MemoryRecall),
        "memClear" => Some(Command::MemoryClear),
        "memAdd" => Some(Command::MemoryAdd),
        "memSubtract" => Some(Command::MemorySubtract),
        ids::CLEAR_HISTORY => Some(Command::ClearHistory),
        ids::THEME_TOGGLE => Some(Command::ToggleTheme),
        _ => None,
    }
}

/// Button caption for a command
#[must_use]
pub fn label(command: Command) -> String {
    match command {
        Command::Digit(d) => d.to_string(),
        Command::Decimal => ".".to_string(),
        Command::Operator(symbol) => symbol.to_string(),
        Command::Equals => "=".to_string(),
        Command::Clear => "C".to_string(),
        Command::ClearAll => "AC".to_string(),
        Command::Delete => "DEL".to_string(),
        Command::MemoryRecall => "MR".to_string(),
        Command::MemoryClear => "MC".to_string(),
        Command::MemoryAdd => "M+".to_string(),
        Command::MemorySubtract => "M-".to_string(),
        Command::SelectHistory(index) => format!("#{index}"),
        Command::ClearHistory => "Clear".to_string(),
        Command::ToggleTheme => "Theme".to_string(),
    }
}

/// Result of a keyboard key lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    /// Command to run
    pub command: Command,
    /// Whether the browser's default action must be suppressed
    pub prevent_default: bool,
}

impl KeyBinding {
    const fn new(command: Command, prevent_default: bool) -> Self {
        Self {
            command,
            prevent_default,
        }
    }
}

/// A single keypad button definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadButtonDef {
    /// The command this button sends
    pub command: Command,
    /// The DOM element ID for this button
    pub id: String,
    /// Grid row (0-indexed)
    pub row: usize,
    /// Grid column (0-indexed)
    pub col: usize,
}

impl KeypadButtonDef {
    /// Creates a new button definition
    #[must_use]
    pub fn new(command: Command, row: usize, col: usize) -> Self {
        Self {
            command,
            id: button_id(command),
            row,
            col,
        }
    }

    /// CSS class for the button group
    #[must_use]
    pub const fn group_class(&self) -> &'static str {
        match self.command {
            Command::Digit(_) | Command::Decimal => "number-btn",
            Command::Operator(_) => "operator-btn",
            Command::MemoryRecall
            | Command::MemoryClear
            | Command::MemoryAdd
            | Command::MemorySubtract => "memory-btn",
            _ => "function-btn",
        }
    }
}

/// Calculator keypad layout
///
/// ```text
/// [ MC ] [ MR ] [ M+ ] [ M- ]
/// [ AC ] [ C  ] [DEL ] [ %  ]
/// [ 7  ] [ 8  ] [ 9  ] [ /  ]
/// [ 4  ] [ 5  ] [ 6  ] [ *  ]
/// [ 1  ] [ 2  ] [ 3  ] [ -  ]
/// [ 0  ] [ .  ] [ =  ] [ +  ]
/// ```
#[derive(Debug, Clone)]
pub struct WasmKeypad {
    buttons: Vec<KeypadButtonDef>,
    cols: usize,
    rows: usize,
}

impl Default for WasmKeypad {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmKeypad {
    /// Creates the standard keypad
    #[must_use]
    pub fn new() -> Self {
        let grid = [
            [
                Command::MemoryClear,
                Command::MemoryRecall,
                Command::MemoryAdd,
                Command::MemorySubtract,
            ],
            [
                Command::ClearAll,
                Command::Clear,
                Command::Delete,
                Command::Operator('%'),
            ],
            [
                Command::Digit(7),
                Command::Digit(8),
                Command::Digit(9),
                Command::Operator('/'),
            ],
            [
                Command::Digit(4),
                Command::Digit(5),
                Command::Digit(6),
                Command::Operator('*'),
            ],
            [
                Command::Digit(1),
                Command::Digit(2),
                Command::Digit(3),
                Command::Operator('-'),
            ],
            [
                Command::Digit(0),
                Command::Decimal,
                Command::Equals,
                Command::Operator('+'),
            ],
        ];

        let buttons = grid
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(move |(col, command)| KeypadButtonDef::new(*command, row, col))
            })
            .collect();

        Self {
            buttons,
            cols: 4,
            rows: grid.len(),
        }
    }

    /// Returns the number of buttons
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Returns the grid dimensions (rows, cols)
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Gets all button definitions
    #[must_use]
    pub fn buttons(&self) -> &[KeypadButtonDef] {
        &self.buttons
    }

    /// Gets a button by row and column
    #[must_use]
    pub fn get_button_at(&self, row: usize, col: usize) -> Option<&KeypadButtonDef> {
        if row < self.rows && col < self.cols {
            self.buttons.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Finds a button by element ID
    #[must_use]
    pub fn find_button_by_id(&self, id: &str) -> Option<&KeypadButtonDef> {
        self.buttons.iter().find(|b| b.id == id)
    }

    /// Creates DOM elements for all keypad buttons
    pub fn create_dom_elements(&self) -> Vec<DomElement> {
        self.buttons.iter().map(button_element).collect()
    }

    /// Creates a keypad container element with all buttons
    #[must_use]
    pub fn create_keypad_element(&self) -> DomElement {
        self.create_dom_elements()
            .into_iter()
            .fold(
                DomElement::new("div").with_id(ids::KEYPAD).with_class("keypad"),
                DomElement::with_child,
            )
    }

    /// Maps a keyboard key to a command.
    ///
    /// Operator, equals and backspace keys suppress the browser default;
    /// digits, `.`, `Escape` and `c` do not.
    #[must_use]
    pub fn key_to_binding(key: &str) -> Option<KeyBinding> {
        let mut chars = key.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if let Some(d) = ch.to_digit(10) {
                // to_digit(10) is always < 10
                #[allow(clippy::cast_possible_truncation)]
                return Some(KeyBinding::new(Command::Digit(d as u8), false));
            }
            if Operation::from_symbol(ch).is_some() {
                return Some(KeyBinding::new(Command::Operator(ch), true));
            }
        }
        match key {
            "." => Some(KeyBinding::new(Command::Decimal, false)),
            "Enter" | "=" => Some(KeyBinding::new(Command::Equals, true)),
            "Backspace" => Some(KeyBinding::new(Command::Delete, true)),
            "Escape" => Some(KeyBinding::new(Command::ClearAll, false)),
            "c" | "C" => Some(KeyBinding::new(Command::Clear, false)),
            _ => None,
        }
    }
}

fn button_element(btn: &KeypadButtonDef) -> DomElement {
    let element = DomElement::new("button")
        .with_id(&btn.id)
        .with_text(&label(btn.command))
        .with_class("btn")
        .with_class(btn.group_class());
    match btn.command {
        Command::Digit(d) => element.with_attr("data-number", &d.to_string()),
        Command::Decimal => element.with_attr("data-number", "."),
        Command::Operator(symbol) => element.with_attr("data-operator", &symbol.to_string()),
        _ => element,
    }
}

/// Extension trait for MockDom to add keypad
pub trait MockDomKeypadExt {
    /// Adds keypad buttons to an existing calculator DOM
    fn add_keypad(&mut self, keypad: &WasmKeypad);
}

impl MockDomKeypadExt for MockDom {
    fn add_keypad(&mut self, keypad: &WasmKeypad) {
        let keypad_elem = keypad.create_keypad_element();
        self.root.children.push(keypad_elem.clone());
        self.register_element(keypad_elem);

        for btn_def in keypad.buttons() {
            self.register_element(button_element(btn_def));
        }
    }
}
