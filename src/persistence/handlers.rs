//! Per-field restore overrides
//!
//! A field with a registered handler is restored by that handler alone;
//! the generic deserializer never touches it.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::record::{FieldValue, FormRecord};
use crate::form::Form;
use crate::settings::PersistOptions;

/// Handler receiving the form and one stored value
pub type ValueFunction<F> = Box<dyn Fn(&F, &FieldValue)>;

/// Ordered table of field name → restore handler
pub struct ValueFunctions<F> {
    entries: IndexMap<String, ValueFunction<F>>,
}

impl<F> Default for ValueFunctions<F> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<F> ValueFunctions<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `name`; re-registering keeps the original slot
    pub fn insert(&mut self, name: impl Into<String>, handler: impl Fn(&F, &FieldValue) + 'static) {
        self.entries.insert(name.into(), Box::new(handler));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &ValueFunction<F>)> {
        self.entries.iter().map(|(n, h)| (n.as_str(), h))
    }
}

/// Run every handler whose field is present in `record`
///
/// Handlers run in table order, once per stored value. Returns the names
/// handled so the generic path can skip them.
pub fn apply_special_handlers<F: Form>(
    record: &FormRecord,
    form: &F,
    options: &PersistOptions<F>,
) -> HashSet<String> {
    let mut handled = HashSet::new();

    for (name, handler) in options.value_functions.iter() {
        let Some(values) = record.get(name) else {
            continue;
        };
        if options.is_name_filtered(name) {
            continue;
        }
        log::debug!("Restoring {:?} via custom handler ({} values)", name, values.len());
        for value in values {
            handler(form, value);
        }
        handled.insert(name.to_string());
    }

    handled
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::form::MemoryForm;

    #[test]
    fn test_handler_invoked_once_per_value() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let options = PersistOptions::<MemoryForm>::new()
            .value_function("x", move |_form, value| sink.borrow_mut().push(value.clone()));

        let mut record = FormRecord::new();
        record.push("x", "v1");
        record.push("x", "v2");

        let handled = apply_special_handlers(&record, &MemoryForm::new("f"), &options);
        assert_eq!(*seen.borrow(), vec![FieldValue::from("v1"), FieldValue::from("v2")]);
        assert!(handled.contains("x"));
    }

    #[test]
    fn test_absent_field_not_invoked() {
        let calls = Rc::new(RefCell::new(0));
        let c = calls.clone();
        let options = PersistOptions::<MemoryForm>::new()
            .value_function("missing", move |_, _| *c.borrow_mut() += 1);

        let handled = apply_special_handlers(&FormRecord::new(), &MemoryForm::new("f"), &options);
        assert_eq!(*calls.borrow(), 0);
        assert!(handled.is_empty());
    }

    #[test]
    fn test_filtered_field_not_invoked() {
        let calls = Rc::new(RefCell::new(0));
        let c = calls.clone();
        let options = PersistOptions::<MemoryForm>::new()
            .exclude(["x"])
            .value_function("x", move |_, _| *c.borrow_mut() += 1);

        let mut record = FormRecord::new();
        record.push("x", "v");

        let handled = apply_special_handlers(&record, &MemoryForm::new("f"), &options);
        assert_eq!(*calls.borrow(), 0);
        assert!(!handled.contains("x"));
    }

    #[test]
    fn test_table_order_drives_invocation() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let (o1, o2, o3) = (order.clone(), order.clone(), order.clone());
        let options = PersistOptions::<MemoryForm>::new()
            .value_function("b", move |_, _| o1.borrow_mut().push("b"))
            .value_function("a", move |_, _| o2.borrow_mut().push("a"))
            // Replacement keeps the original position
            .value_function("b", move |_, _| o3.borrow_mut().push("b2"));

        let mut record = FormRecord::new();
        record.push("a", "1");
        record.push("b", "2");

        apply_special_handlers(&record, &MemoryForm::new("f"), &options);
        assert_eq!(*order.borrow(), vec!["b2", "a"]);
        assert_eq!(options.value_functions.len(), 2);
    }
}
