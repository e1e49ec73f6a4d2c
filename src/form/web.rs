//! DOM-backed forms

use wasm_bindgen::JsCast;
use web_sys::{
    Element, EventTarget, HtmlFormElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

use super::{ElementKind, Form, FormElement, SelectOption};
use crate::error::Result;
use crate::platform::web::DomListeners;
use crate::platform::{ListenerId, Signal, SignalHandler, SignalTarget};

/// A control inside an `HtmlFormElement`
#[derive(Debug, Clone)]
pub struct WebElement {
    element: Element,
    kind: ElementKind,
}

impl WebElement {
    pub fn new(element: Element) -> Self {
        let kind = classify(&element);
        Self { element, kind }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    fn input(&self) -> Option<&HtmlInputElement> {
        self.element.dyn_ref::<HtmlInputElement>()
    }

    fn select(&self) -> Option<&HtmlSelectElement> {
        self.element.dyn_ref::<HtmlSelectElement>()
    }

    fn option_at(&self, index: usize) -> Option<HtmlOptionElement> {
        let select = self.select()?;
        select
            .item(u32::try_from(index).ok()?)?
            .dyn_into::<HtmlOptionElement>()
            .ok()
    }
}

fn classify(element: &Element) -> ElementKind {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        ElementKind::from_input_type(&input.type_())
    } else if element.is_instance_of::<HtmlTextAreaElement>() {
        ElementKind::Textarea
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        if select.multiple() {
            ElementKind::SelectMultiple
        } else {
            ElementKind::Select
        }
    } else if element.tag_name().eq_ignore_ascii_case("button") {
        ElementKind::Button
    } else {
        ElementKind::Other
    }
}

impl FormElement for WebElement {
    fn kind(&self) -> ElementKind {
        self.kind
    }

    fn name(&self) -> String {
        self.element.get_attribute("name").unwrap_or_default()
    }

    fn id(&self) -> String {
        self.element.id()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn value(&self) -> String {
        if let Some(input) = self.input() {
            input.value()
        } else if let Some(textarea) = self.element.dyn_ref::<HtmlTextAreaElement>() {
            textarea.value()
        } else if let Some(select) = self.select() {
            select.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, value: &str) {
        if let Some(input) = self.input() {
            input.set_value(value);
        } else if let Some(textarea) = self.element.dyn_ref::<HtmlTextAreaElement>() {
            textarea.set_value(value);
        } else if let Some(select) = self.select() {
            select.set_value(value);
        }
    }

    fn checked(&self) -> bool {
        self.input().is_some_and(HtmlInputElement::checked)
    }

    fn set_checked(&self, checked: bool) {
        if let Some(input) = self.input() {
            input.set_checked(checked);
        }
    }

    fn options(&self) -> Vec<SelectOption> {
        let Some(select) = self.select() else {
            return Vec::new();
        };
        (0..select.length())
            .filter_map(|i| select.item(i))
            .filter_map(|el| el.dyn_into::<HtmlOptionElement>().ok())
            .map(|opt| SelectOption::new(opt.value(), opt.selected()))
            .collect()
    }

    fn set_option_selected(&self, index: usize, selected: bool) {
        if let Some(option) = self.option_at(index) {
            option.set_selected(selected);
        }
    }
}

/// An `HtmlFormElement` with its submit listener registry
pub struct WebForm {
    form: HtmlFormElement,
    listeners: DomListeners,
}

impl WebForm {
    pub fn new(form: HtmlFormElement) -> Self {
        let target: EventTarget = form.clone().into();
        Self {
            form,
            listeners: DomListeners::new(target),
        }
    }

    pub fn form(&self) -> &HtmlFormElement {
        &self.form
    }
}

impl SignalTarget for WebForm {
    fn attach(&self, signal: Signal, handler: SignalHandler) -> Result<ListenerId> {
        self.listeners.attach(signal, handler)
    }

    fn detach(&self, id: ListenerId) {
        self.listeners.detach(id);
    }
}

impl Form for WebForm {
    type Element = WebElement;

    fn identifier(&self) -> String {
        self.form.id()
    }

    fn elements(&self) -> Vec<WebElement> {
        let controls = self.form.elements();
        (0..controls.length())
            .filter_map(|i| controls.item(i))
            .map(WebElement::new)
            .collect()
    }
}
