//! Form model
//!
//! A form is an ordered collection of named controls plus an identifier.
//! Elements are handles: setters take `&self`, the same way DOM nodes are
//! shared references whose state lives elsewhere.

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use memory::{MemoryElement, MemoryForm};
#[cfg(target_arch = "wasm32")]
pub use web::{WebElement, WebForm};

use crate::platform::SignalTarget;

/// Control kind, as far as persistence cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Any single-value `<input>` (text, email, number, date, hidden, ...)
    Text,
    Checkbox,
    Radio,
    Textarea,
    /// `<select>` without `multiple`
    Select,
    /// `<select multiple>`
    SelectMultiple,
    /// `<input type="file">`, never persisted
    File,
    /// `<input type="password">`, never persisted
    Password,
    /// Submit/reset/image inputs and `<button>`
    Button,
    /// Fieldsets, outputs and anything else without a user value
    Other,
}

impl ElementKind {
    /// Classify an `<input>` by its `type` attribute
    pub fn from_input_type(input_type: &str) -> Self {
        match input_type.to_ascii_lowercase().as_str() {
            "checkbox" => ElementKind::Checkbox,
            "radio" => ElementKind::Radio,
            "file" => ElementKind::File,
            "password" => ElementKind::Password,
            "submit" | "reset" | "button" | "image" => ElementKind::Button,
            _ => ElementKind::Text,
        }
    }

    /// File and password controls never leave the client
    pub fn is_secret(&self) -> bool {
        matches!(self, ElementKind::File | ElementKind::Password)
    }

    /// Whether this kind carries user-entered state worth persisting
    pub fn holds_data(&self) -> bool {
        !self.is_secret() && !matches!(self, ElementKind::Button | ElementKind::Other)
    }
}

/// One `<option>` of a select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            selected,
        }
    }
}

/// A form control handle
pub trait FormElement {
    fn kind(&self) -> ElementKind;
    /// `name` attribute; empty when unnamed
    fn name(&self) -> String;
    /// `id` attribute; empty when absent
    fn id(&self) -> String;
    fn attribute(&self, name: &str) -> Option<String>;

    /// Current value (selected value for single selects)
    fn value(&self) -> String;
    fn set_value(&self, value: &str);

    fn checked(&self) -> bool;
    fn set_checked(&self, checked: bool);

    /// Options in document order; empty for non-select controls
    fn options(&self) -> Vec<SelectOption>;
    fn set_option_selected(&self, index: usize, selected: bool);
}

/// A form: identifier, ordered controls, and a submit signal
pub trait Form: SignalTarget {
    type Element: FormElement;

    /// The form's `id` attribute; empty when absent
    fn identifier(&self) -> String;

    /// Every control in document order
    fn elements(&self) -> Vec<Self::Element>;

    /// Controls sharing `name`, in document order
    fn elements_named(&self, name: &str) -> Vec<Self::Element> {
        self.elements()
            .into_iter()
            .filter(|e| e.name() == name)
            .collect()
    }
}
