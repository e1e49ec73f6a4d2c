//! In-memory form model for native hosts and tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{ElementKind, Form, FormElement, SelectOption};
use crate::error::Result;
use crate::platform::{ListenerId, Signal, SignalBus, SignalHandler, SignalTarget};

#[derive(Debug)]
struct ElementState {
    kind: ElementKind,
    name: String,
    id: String,
    attributes: HashMap<String, String>,
    value: String,
    checked: bool,
    options: Vec<SelectOption>,
}

/// Shared handle to an in-memory control; clones observe the same state
#[derive(Debug, Clone)]
pub struct MemoryElement(Rc<RefCell<ElementState>>);

impl MemoryElement {
    fn build(kind: ElementKind, name: &str) -> Self {
        Self(Rc::new(RefCell::new(ElementState {
            kind,
            name: name.to_string(),
            id: String::new(),
            attributes: HashMap::new(),
            value: String::new(),
            checked: false,
            options: Vec::new(),
        })))
    }

    fn with_value(self, value: &str) -> Self {
        self.0.borrow_mut().value = value.to_string();
        self
    }

    fn with_checked(self, checked: bool) -> Self {
        self.0.borrow_mut().checked = checked;
        self
    }

    pub fn text(name: &str, value: &str) -> Self {
        Self::build(ElementKind::Text, name).with_value(value)
    }

    pub fn textarea(name: &str, value: &str) -> Self {
        Self::build(ElementKind::Textarea, name).with_value(value)
    }

    pub fn password(name: &str, value: &str) -> Self {
        Self::build(ElementKind::Password, name).with_value(value)
    }

    pub fn file(name: &str) -> Self {
        Self::build(ElementKind::File, name)
    }

    pub fn button(name: &str, value: &str) -> Self {
        Self::build(ElementKind::Button, name).with_value(value)
    }

    pub fn checkbox(name: &str, value: &str, checked: bool) -> Self {
        Self::build(ElementKind::Checkbox, name)
            .with_value(value)
            .with_checked(checked)
    }

    pub fn radio(name: &str, value: &str, checked: bool) -> Self {
        Self::build(ElementKind::Radio, name)
            .with_value(value)
            .with_checked(checked)
    }

    /// Single select over `options`, with `selected` chosen if present
    pub fn select(name: &str, options: &[&str], selected: Option<&str>) -> Self {
        let element = Self::build(ElementKind::Select, name);
        element.0.borrow_mut().options = options
            .iter()
            .map(|v| SelectOption::new(*v, Some(*v) == selected))
            .collect();
        element
    }

    /// Multi-select over `options` with every value in `selected` chosen
    pub fn select_multiple(name: &str, options: &[&str], selected: &[&str]) -> Self {
        let element = Self::build(ElementKind::SelectMultiple, name);
        element.0.borrow_mut().options = options
            .iter()
            .map(|v| SelectOption::new(*v, selected.contains(v)))
            .collect();
        element
    }

    pub fn with_id(self, id: &str) -> Self {
        self.0.borrow_mut().id = id.to_string();
        self
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Values of the currently selected options
    pub fn selected_values(&self) -> Vec<String> {
        self.0
            .borrow()
            .options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.clone())
            .collect()
    }
}

impl FormElement for MemoryElement {
    fn kind(&self) -> ElementKind {
        self.0.borrow().kind
    }

    fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    fn id(&self) -> String {
        self.0.borrow().id.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        let state = self.0.borrow();
        match name {
            "name" => Some(state.name.clone()),
            "id" if !state.id.is_empty() => Some(state.id.clone()),
            _ => state.attributes.get(name).cloned(),
        }
    }

    fn value(&self) -> String {
        let state = self.0.borrow();
        match state.kind {
            ElementKind::Select | ElementKind::SelectMultiple => state
                .options
                .iter()
                .find(|o| o.selected)
                .map(|o| o.value.clone())
                .unwrap_or_default(),
            _ => state.value.clone(),
        }
    }

    fn set_value(&self, value: &str) {
        let mut state = self.0.borrow_mut();
        match state.kind {
            ElementKind::Select | ElementKind::SelectMultiple => {
                for option in state.options.iter_mut() {
                    option.selected = option.value == value;
                }
            }
            _ => state.value = value.to_string(),
        }
    }

    fn checked(&self) -> bool {
        self.0.borrow().checked
    }

    fn set_checked(&self, checked: bool) {
        self.0.borrow_mut().checked = checked;
    }

    fn options(&self) -> Vec<SelectOption> {
        self.0.borrow().options.clone()
    }

    fn set_option_selected(&self, index: usize, selected: bool) {
        if let Some(option) = self.0.borrow_mut().options.get_mut(index) {
            option.selected = selected;
        }
    }
}

/// In-memory form with its own submit signal
#[derive(Default)]
pub struct MemoryForm {
    identifier: String,
    elements: RefCell<Vec<MemoryElement>>,
    bus: SignalBus,
}

impl MemoryForm {
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            ..Self::default()
        }
    }

    /// Builder-style append
    pub fn with_element(self, element: MemoryElement) -> Self {
        self.push(element);
        self
    }

    pub fn push(&self, element: MemoryElement) {
        self.elements.borrow_mut().push(element);
    }

    /// First control named `name`
    pub fn element(&self, name: &str) -> Option<MemoryElement> {
        self.elements
            .borrow()
            .iter()
            .find(|e| e.name() == name)
            .cloned()
    }

    /// Fire the submit signal
    pub fn submit(&self) {
        self.bus.emit(Signal::Submit);
    }

    pub fn listener_count(&self, signal: Signal) -> usize {
        self.bus.listener_count(signal)
    }
}

impl SignalTarget for MemoryForm {
    fn attach(&self, signal: Signal, handler: SignalHandler) -> Result<ListenerId> {
        self.bus.attach(signal, handler)
    }

    fn detach(&self, id: ListenerId) {
        self.bus.detach(id);
    }
}

impl Form for MemoryForm {
    type Element = MemoryElement;

    fn identifier(&self) -> String {
        self.identifier.clone()
    }

    fn elements(&self) -> Vec<MemoryElement> {
        self.elements.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let a = MemoryElement::text("name", "alice");
        let b = a.clone();
        b.set_value("bob");
        assert_eq!(a.value(), "bob");
    }

    #[test]
    fn test_single_select_value_tracks_options() {
        let select = MemoryElement::select("size", &["s", "m", "l"], Some("m"));
        assert_eq!(select.value(), "m");

        select.set_value("l");
        assert_eq!(select.selected_values(), vec!["l"]);

        select.set_value("xl");
        assert_eq!(select.value(), "");
    }

    #[test]
    fn test_attribute_lookup() {
        let el = MemoryElement::text("q", "")
            .with_id("search")
            .with_attribute("data-skip", "1");
        assert_eq!(el.attribute("id").as_deref(), Some("search"));
        assert_eq!(el.attribute("data-skip").as_deref(), Some("1"));
        assert_eq!(el.attribute("missing"), None);
    }

    #[test]
    fn test_elements_named_keeps_document_order() {
        let form = MemoryForm::new("f")
            .with_element(MemoryElement::checkbox("tag", "a", true))
            .with_element(MemoryElement::text("other", "x"))
            .with_element(MemoryElement::checkbox("tag", "b", false));

        let tags: Vec<String> = form.elements_named("tag").iter().map(|e| e.value()).collect();
        assert_eq!(tags, vec!["a", "b"]);
    }
}
