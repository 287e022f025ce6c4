//! Mock DOM for the calculator page
//!
//! Mirrors the elements the browser page exposes (display, expression
//! preview, memory indicator, history list, loader, theme toggle) so the
//! whole input → engine → page loop can be tested without a browser.

use std::collections::HashMap;

/// Element ids of the calculator page
pub mod ids {
    /// Main display (`<input>`, text lives in its `value`)
    pub const DISPLAY: &str = "display";
    /// Pending operation preview
    pub const EXPRESSION_PREVIEW: &str = "expressionPreview";
    /// Memory register indicator
    pub const MEMORY_INDICATOR: &str = "memoryIndicator";
    /// History list container
    pub const HISTORY_LIST: &str = "historyList";
    /// Startup loader overlay
    pub const LOADER: &str = "loader";
    /// Theme toggle button
    pub const THEME_TOGGLE: &str = "themeToggle";
    /// Icon inside the theme toggle
    pub const THEME_ICON: &str = "themeIcon";
    /// Clear-history button
    pub const CLEAR_HISTORY: &str = "clearHistory";
    /// Document body
    pub const BODY: &str = "body";
    /// Keypad container
    pub const KEYPAD: &str = "keypad";
}

/// Text shown in the history list when it is empty
pub const EMPTY_HISTORY_TEXT: &str = "No calculations yet";

/// Most events a [`MockDom`] remembers; older ones are dropped first
pub const EVENT_HISTORY_LIMIT: usize = 1024;

/// Represents a DOM element for testing
#[derive(Debug, Clone, PartialEq)]
pub struct DomElement {
    /// Element ID
    pub id: String,
    /// Element tag name
    pub tag: String,
    /// Text content
    pub text_content: String,
    /// Element attributes
    pub attributes: HashMap<String, String>,
    /// CSS classes
    pub classes: Vec<String>,
    /// Whether element is visible
    pub visible: bool,
    /// Child elements
    pub children: Vec<DomElement>,
}

impl Default for DomElement {
    fn default() -> Self {
        Self::new("div")
    }
}

impl DomElement {
    /// Creates a new DOM element with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            id: String::new(),
            tag: tag.to_string(),
            text_content: String::new(),
            attributes: HashMap::new(),
            classes: Vec::new(),
            visible: true,
            children: Vec::new(),
        }
    }

    /// Creates an element with an ID
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Sets the text content
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text_content = text.to_string();
        self
    }

    /// Adds a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Sets an attribute
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Adds a child element
    #[must_use]
    pub fn with_child(mut self, child: DomElement) -> Self {
        self.children.push(child);
        self
    }

    /// Sets visibility
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Sets text content
    pub fn set_text(&mut self, text: &str) {
        self.text_content = text.to_string();
    }

    /// Sets an attribute
    pub fn set_attr(&mut self, key: &str, value: &str) {
        self.attributes.insert(key.to_string(), value.to_string());
    }

    /// Adds a class
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Removes a class
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Adds or removes a class
    pub fn set_class(&mut self, class: &str, present: bool) {
        if present {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// Checks if element has a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Gets an attribute value
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// DOM events that can be dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    /// Click event on an element
    Click {
        /// The ID of the clicked element
        element_id: String,
    },
    /// Document-level keydown
    KeyDown {
        /// The `KeyboardEvent.key` value
        key: String,
        /// Whether the handler called `preventDefault`
        default_prevented: bool,
    },
}

impl DomEvent {
    /// Creates a click event
    #[must_use]
    pub fn click(element_id: &str) -> Self {
        Self::Click {
            element_id: element_id.to_string(),
        }
    }

    /// Creates a keydown event
    #[must_use]
    pub fn key_down(key: &str, default_prevented: bool) -> Self {
        Self::KeyDown {
            key: key.to_string(),
            default_prevented,
        }
    }
}

/// Mock DOM for testing the calculator page without a browser
#[derive(Debug)]
pub struct MockDom {
    /// Root element
    pub root: DomElement,
    /// Elements by ID for quick lookup
    elements: HashMap<String, DomElement>,
    /// Event history for verification
    event_history: Vec<DomEvent>,
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDom {
    /// Creates a new mock DOM
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: DomElement::new("div").with_id("root"),
            elements: HashMap::new(),
            event_history: Vec::new(),
        }
    }

    /// Creates the calculator page structure, without keypad buttons
    #[must_use]
    pub fn calculator() -> Self {
        let mut dom = Self::new();

        let body = DomElement::new("body").with_id(ids::BODY);

        let loader = DomElement::new("div")
            .with_id(ids::LOADER)
            .with_class("loader");

        let display = DomElement::new("input")
            .with_id(ids::DISPLAY)
            .with_class("display")
            .with_attr("type", "text")
            .with_attr("readonly", "true")
            .with_attr("value", "0");

        let preview = DomElement::new("div")
            .with_id(ids::EXPRESSION_PREVIEW)
            .with_class("expression-preview");

        let memory = DomElement::new("div")
            .with_id(ids::MEMORY_INDICATOR)
            .with_class("memory-indicator")
            .with_text("M: 0.00");

        let history = DomElement::new("div")
            .with_id(ids::HISTORY_LIST)
            .with_class("history-list")
            .with_child(empty_history());

        let clear_history = DomElement::new("button")
            .with_id(ids::CLEAR_HISTORY)
            .with_class("clear-history-btn")
            .with_text("Clear");

        let icon = DomElement::new("i")
            .with_id(ids::THEME_ICON)
            .with_class("fas")
            .with_class("fa-moon");

        let toggle = DomElement::new("button")
            .with_id(ids::THEME_TOGGLE)
            .with_class("theme-toggle")
            .with_child(icon.clone());

        dom.root = DomElement::new("div")
            .with_id("calculator")
            .with_class("calculator-container")
            .with_child(loader.clone())
            .with_child(toggle.clone())
            .with_child(preview.clone())
            .with_child(display.clone())
            .with_child(memory.clone())
            .with_child(history.clone())
            .with_child(clear_history.clone());

        for element in [
            body,
            loader,
            display,
            preview,
            memory,
            history,
            clear_history,
            icon,
            toggle,
        ] {
            dom.register_element(element);
        }

        dom
    }

    /// Registers an element for ID lookup
    pub fn register_element(&mut self, element: DomElement) {
        if !element.id.is_empty() {
            self.elements.insert(element.id.clone(), element);
        }
    }

    /// Gets an element by ID
    #[must_use]
    pub fn get_element(&self, id: &str) -> Option<&DomElement> {
        self.elements.get(id)
    }

    /// Gets a mutable element by ID
    pub fn get_element_mut(&mut self, id: &str) -> Option<&mut DomElement> {
        self.elements.get_mut(id)
    }

    /// Records an event, forgetting the oldest past [`EVENT_HISTORY_LIMIT`]
    pub fn dispatch_event(&mut self, event: DomEvent) {
        self.event_history.push(event);
        if self.event_history.len() > EVENT_HISTORY_LIMIT {
            let excess = self.event_history.len() - EVENT_HISTORY_LIMIT;
            self.event_history.drain(..excess);
        }
    }

    /// Gets the event history, oldest first
    #[must_use]
    pub fn event_history(&self) -> &[DomEvent] {
        &self.event_history
    }

    /// Clears event history
    pub fn clear_event_history(&mut self) {
        self.event_history.clear();
    }

    /// Updates element text by ID
    pub fn set_element_text(&mut self, id: &str, text: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.set_text(text);
        }
    }

    /// Gets element text by ID
    #[must_use]
    pub fn get_element_text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text_content.as_str())
    }

    /// Sets an `<input>`'s value by ID
    pub fn set_element_value(&mut self, id: &str, value: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.set_attr("value", value);
        }
    }

    /// Gets an `<input>`'s value by ID
    #[must_use]
    pub fn get_element_value(&self, id: &str) -> Option<&str> {
        self.elements.get(id).and_then(|e| e.get_attr("value"))
    }

    /// Adds or removes a class by ID
    pub fn set_element_class(&mut self, id: &str, class: &str, present: bool) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.set_class(class, present);
        }
    }

    /// Shows or hides an element by ID
    pub fn set_element_visible(&mut self, id: &str, visible: bool) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.set_visible(visible);
        }
    }

    /// Adds a child element to a parent
    pub fn append_child(&mut self, parent_id: &str, child: DomElement) {
        let child_id = child.id.clone();
        if let Some(parent) = self.elements.get_mut(parent_id) {
            parent.children.push(child.clone());
        }
        if !child_id.is_empty() {
            self.elements.insert(child_id, child);
        }
    }

    /// Clears children of an element
    pub fn clear_children(&mut self, id: &str) {
        let child_ids: Vec<String> = self
            .elements
            .get(id)
            .map(|elem| {
                elem.children
                    .iter()
                    .filter(|c| !c.id.is_empty())
                    .map(|c| c.id.clone())
                    .collect()
            })
            .unwrap_or_default();

        for child_id in child_ids {
            self.elements.remove(&child_id);
        }

        if let Some(elem) = self.elements.get_mut(id) {
            elem.children.clear();
        }
    }
}

/// Placeholder shown in an empty history list
#[must_use]
pub fn empty_history() -> DomElement {
    DomElement::new("p")
        .with_class("empty-history")
        .with_text(EMPTY_HISTORY_TEXT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // ===== DomElement tests =====

    #[test]
    fn test_dom_element_builder() {
        let elem = DomElement::new("button")
            .with_id("equalsBtn")
            .with_text("=")
            .with_class("btn")
            .with_class("btn")
            .with_attr("data-action", "equals");
        assert_eq!(elem.tag, "button");
        assert_eq!(elem.id, "equalsBtn");
        assert_eq!(elem.text_content, "=");
        assert_eq!(elem.classes, vec!["btn"]);
        assert_eq!(elem.get_attr("data-action"), Some("equals"));
        assert!(elem.visible);
    }

    #[test]
    fn test_dom_element_default_is_div() {
        assert_eq!(DomElement::default().tag, "div");
    }

    #[test]
    fn test_dom_element_classes() {
        let mut elem = DomElement::new("div");
        elem.set_class("error", true);
        assert!(elem.has_class("error"));
        elem.set_class("error", false);
        assert!(!elem.has_class("error"));
        elem.add_class("a");
        elem.remove_class("a");
        assert!(elem.classes.is_empty());
    }

    #[test]
    fn test_dom_element_setters() {
        let mut elem = DomElement::new("input");
        elem.set_attr("value", "42");
        elem.set_text("ignored");
        elem.set_visible(false);
        assert_eq!(elem.get_attr("value"), Some("42"));
        assert_eq!(elem.text_content, "ignored");
        assert!(!elem.visible);
    }

    // ===== DomEvent tests =====

    #[test]
    fn test_dom_event_constructors() {
        assert_eq!(
            DomEvent::click("equalsBtn"),
            DomEvent::Click {
                element_id: "equalsBtn".into()
            }
        );
        assert_eq!(
            DomEvent::key_down("Enter", true),
            DomEvent::KeyDown {
                key: "Enter".into(),
                default_prevented: true
            }
        );
    }

    // ===== MockDom tests =====

    #[test]
    fn test_calculator_page_elements() {
        let dom = MockDom::calculator();
        for id in [
            ids::BODY,
            ids::LOADER,
            ids::DISPLAY,
            ids::EXPRESSION_PREVIEW,
            ids::MEMORY_INDICATOR,
            ids::HISTORY_LIST,
            ids::CLEAR_HISTORY,
            ids::THEME_TOGGLE,
            ids::THEME_ICON,
        ] {
            assert!(dom.get_element(id).is_some(), "missing #{id}");
        }
        assert_eq!(dom.get_element_value(ids::DISPLAY), Some("0"));
        assert_eq!(dom.get_element_text(ids::MEMORY_INDICATOR), Some("M: 0.00"));
        assert!(dom.get_element(ids::THEME_ICON).unwrap().has_class("fa-moon"));
        assert!(dom.get_element(ids::LOADER).unwrap().visible);
    }

    #[test]
    fn test_calculator_page_starts_with_empty_history_placeholder() {
        let dom = MockDom::calculator();
        let list = dom.get_element(ids::HISTORY_LIST).unwrap();
        assert_eq!(list.children.len(), 1);
        assert!(list.children[0].has_class("empty-history"));
        assert_eq!(list.children[0].text_content, EMPTY_HISTORY_TEXT);
    }

    #[test]
    fn test_event_history() {
        let mut dom = MockDom::new();
        dom.dispatch_event(DomEvent::click("num-1"));
        dom.dispatch_event(DomEvent::key_down("Escape", false));
        assert_eq!(dom.event_history().len(), 2);
        dom.clear_event_history();
        assert!(dom.event_history().is_empty());
    }

    #[test]
    fn test_event_history_is_bounded() {
        let mut dom = MockDom::new();
        for i in 0..EVENT_HISTORY_LIMIT + 10 {
            dom.dispatch_event(DomEvent::click(&format!("btn-{i}")));
        }
        let events = dom.event_history();
        assert_eq!(events.len(), EVENT_HISTORY_LIMIT);
        assert_eq!(events[0], DomEvent::click("btn-10"));
        assert_eq!(
            events.last(),
            Some(&DomEvent::click(&format!("btn-{}", EVENT_HISTORY_LIMIT + 9)))
        );
    }

    #[test]
    fn test_set_element_helpers() {
        let mut dom = MockDom::calculator();
        dom.set_element_value(ids::DISPLAY, "12");
        dom.set_element_text(ids::EXPRESSION_PREVIEW, "12 +");
        dom.set_element_class(ids::BODY, "light-theme", true);
        dom.set_element_visible(ids::LOADER, false);
        assert_eq!(dom.get_element_value(ids::DISPLAY), Some("12"));
        assert_eq!(dom.get_element_text(ids::EXPRESSION_PREVIEW), Some("12 +"));
        assert!(dom.get_element(ids::BODY).unwrap().has_class("light-theme"));
        assert!(!dom.get_element(ids::LOADER).unwrap().visible);
    }

    #[test]
    fn test_helpers_ignore_unknown_ids() {
        let mut dom = MockDom::new();
        dom.set_element_text("nope", "x");
        dom.set_element_value("nope", "x");
        dom.set_element_class("nope", "x", true);
        dom.set_element_visible("nope", false);
        assert!(dom.get_element("nope").is_none());
        assert_eq!(dom.get_element_text("nope"), None);
        assert_eq!(dom.get_element_value("nope"), None);
    }

    #[test]
    fn test_append_and_clear_children() {
        let mut dom = MockDom::calculator();
        dom.clear_children(ids::HISTORY_LIST);
        dom.append_child(
            ids::HISTORY_LIST,
            DomElement::new("div").with_id("history-item-0").with_text("2 + 3 = 5"),
        );
        assert_eq!(dom.get_element(ids::HISTORY_LIST).unwrap().children.len(), 1);
        assert!(dom.get_element("history-item-0").is_some());

        dom.clear_children(ids::HISTORY_LIST);
        assert!(dom.get_element("history-item-0").is_none());
        assert!(dom.get_element(ids::HISTORY_LIST).unwrap().children.is_empty());
    }
}
