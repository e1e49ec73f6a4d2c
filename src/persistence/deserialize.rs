//! Record → form

use super::handlers::apply_special_handlers;
use super::record::{FieldValue, FormRecord};
use crate::form::{ElementKind, Form, FormElement};
use crate::settings::PersistOptions;

/// Write `record` back onto `form`
///
/// Fields owned by a value function are handed to it first and skipped
/// here. Remaining fields are applied in record order; within a field,
/// matching elements are visited in document order.
///
/// Checkbox groups are restored by position, so they assume the form has
/// the same checkboxes, in the same order, as when the record was saved.
pub fn deserialize<F: Form>(form: &F, record: &FormRecord, options: &PersistOptions<F>) {
    let handled = apply_special_handlers(record, form, options);

    for (name, values) in record.iter() {
        if handled.contains(name) || options.is_name_filtered(name) {
            continue;
        }

        let elements: Vec<F::Element> = form
            .elements_named(name)
            .into_iter()
            .filter(|e| !options.is_element_filtered(e))
            .collect();
        if elements.is_empty() {
            log::debug!("No elements for stored field {:?}", name);
            continue;
        }

        for (index, element) in elements.iter().enumerate() {
            apply_value(element, index, values);
        }
    }
}

fn apply_value<E: FormElement>(element: &E, index: usize, values: &[FieldValue]) {
    match element.kind() {
        ElementKind::Radio => {
            let first = values.first().map(FieldValue::as_text);
            let own = element.value();
            element.set_checked(first.as_deref() == Some(own.as_str()));
        }
        ElementKind::Checkbox => {
            if let Some(value) = values.get(index) {
                element.set_checked(value.as_bool());
            }
        }
        ElementKind::SelectMultiple => {
            for (i, option) in element.options().iter().enumerate() {
                let selected = values.iter().any(|v| v.as_text() == option.value);
                element.set_option_selected(i, selected);
            }
        }
        ElementKind::Text | ElementKind::Textarea | ElementKind::Select => {
            if let Some(value) = values.get(index) {
                element.set_value(&value.as_text());
            }
        }
        // Secret and non-data controls are never written
        ElementKind::File | ElementKind::Password | ElementKind::Button | ElementKind::Other => {}
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;
    use crate::form::{MemoryElement, MemoryForm};
    use crate::persistence::serialize::serialize;

    fn options() -> PersistOptions<MemoryForm> {
        PersistOptions::new()
    }

    fn blank_signup() -> MemoryForm {
        MemoryForm::new("signup")
            .with_element(MemoryElement::text("name", ""))
            .with_element(MemoryElement::checkbox("agree", "on", false))
            .with_element(MemoryElement::select_multiple("color", &["red", "green", "blue"], &[]))
    }

    #[test]
    fn test_round_trip_into_blank_form() {
        let filled = MemoryForm::new("signup")
            .with_element(MemoryElement::text("name", "alice"))
            .with_element(MemoryElement::checkbox("agree", "on", true))
            .with_element(MemoryElement::select_multiple(
                "color",
                &["red", "green", "blue"],
                &["red", "blue"],
            ));
        let record = serialize(&filled, &options());

        let blank = blank_signup();
        deserialize(&blank, &record, &options());

        let name = blank.element("name").unwrap();
        let agree = blank.element("agree").unwrap();
        let color = blank.element("color").unwrap();
        assert_eq!(name.value(), "alice");
        assert!(agree.checked());
        assert_eq!(color.selected_values(), vec!["red", "blue"]);
        assert_eq!(serialize(&blank, &options()), record);
    }

    #[test]
    fn test_radio_group_uses_first_value() {
        let form = MemoryForm::new("f")
            .with_element(MemoryElement::radio("plan", "free", true))
            .with_element(MemoryElement::radio("plan", "pro", false))
            .with_element(MemoryElement::radio("plan", "team", false));

        let mut record = FormRecord::new();
        record.push("plan", "team");
        record.push("plan", "free");
        deserialize(&form, &record, &options());

        let checked: Vec<bool> = form.elements_named("plan").iter().map(|e| e.checked()).collect();
        assert_eq!(checked, vec![false, false, true]);
    }

    #[test]
    fn test_checkbox_group_is_positional() {
        let form = MemoryForm::new("f")
            .with_element(MemoryElement::checkbox("tag", "a", false))
            .with_element(MemoryElement::checkbox("tag", "b", true))
            .with_element(MemoryElement::checkbox("tag", "c", true));

        let mut record = FormRecord::new();
        record.push("tag", true);
        record.push("tag", false);
        deserialize(&form, &record, &options());

        let checked: Vec<bool> = form.elements_named("tag").iter().map(|e| e.checked()).collect();
        // Third checkbox has no stored position and keeps its state
        assert_eq!(checked, vec![true, false, true]);
    }

    #[test]
    fn test_multi_select_deselects_unstored_options() {
        let form = MemoryForm::new("f").with_element(MemoryElement::select_multiple(
            "color",
            &["red", "green", "blue"],
            &["green"],
        ));

        let mut record = FormRecord::new();
        record.push("color", "red");
        deserialize(&form, &record, &options());

        assert_eq!(form.element("color").unwrap().selected_values(), vec!["red"]);
    }

    #[test]
    fn test_repeated_text_inputs_are_positional() {
        let form = MemoryForm::new("f")
            .with_element(MemoryElement::text("phone", ""))
            .with_element(MemoryElement::text("phone", ""));

        let mut record = FormRecord::new();
        record.push("phone", "555-1");
        record.push("phone", "555-2");
        deserialize(&form, &record, &options());

        let values: Vec<String> = form.elements_named("phone").iter().map(|e| e.value()).collect();
        assert_eq!(values, vec!["555-1", "555-2"]);
    }

    #[test]
    fn test_bool_written_to_text_control() {
        let form = MemoryForm::new("f").with_element(MemoryElement::text("flag", ""));
        let mut record = FormRecord::new();
        record.push("flag", true);
        deserialize(&form, &record, &options());
        assert_eq!(form.element("flag").unwrap().value(), "true");
    }

    #[test]
    fn test_special_handler_owns_field() {
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let opts = options().value_function("x", move |form: &MemoryForm, value| {
            c.set(c.get() + 1);
            if let Some(mirror) = form.element("mirror") {
                mirror.set_value(&value.as_text());
            }
        });

        let form = MemoryForm::new("f")
            .with_element(MemoryElement::text("x", "untouched"))
            .with_element(MemoryElement::text("x", "untouched"))
            .with_element(MemoryElement::text("mirror", ""));

        let mut record = FormRecord::new();
        record.push("x", "v1");
        record.push("x", "v2");
        deserialize(&form, &record, &opts);

        assert_eq!(calls.get(), 2);
        for x in form.elements_named("x") {
            assert_eq!(x.value(), "untouched");
        }
        assert_eq!(form.element("mirror").unwrap().value(), "v2");
    }

    #[test]
    fn test_filters_apply_on_restore() {
        let form = MemoryForm::new("f")
            .with_element(MemoryElement::text("a", ""))
            .with_element(MemoryElement::text("b", ""))
            .with_element(MemoryElement::text("c", "").with_id("locked"));

        let mut record = FormRecord::new();
        record.push("a", "1");
        record.push("b", "2");
        record.push("c", "3");

        let opts = options()
            .exclude(["b"])
            .exclude_filter(|e: &MemoryElement| e.id() == "locked");
        deserialize(&form, &record, &opts);

        assert_eq!(form.element("a").unwrap().value(), "1");
        assert_eq!(form.element("b").unwrap().value(), "");
        assert_eq!(form.element("c").unwrap().value(), "");
    }

    #[test]
    fn test_crafted_record_never_writes_secrets() {
        let form = MemoryForm::new("f").with_element(MemoryElement::password("pw", ""));
        let record = FormRecord::from_json(r#"{"pw":["stolen"]}"#).unwrap();
        deserialize(&form, &record, &options());
        assert_eq!(form.element("pw").unwrap().value(), "");
    }

    #[test]
    fn test_unknown_field_ignored() {
        let form = blank_signup();
        let record = FormRecord::from_json(r#"{"gone":["x"]}"#).unwrap();
        deserialize(&form, &record, &options());
        assert!(serialize(&form, &options()).get("name").is_none());
    }

    proptest! {
        #[test]
        fn prop_text_round_trip(value in "\\PC{1,40}") {
            let source = MemoryForm::new("f").with_element(MemoryElement::textarea("notes", &value));
            let record = serialize(&source, &options());
            let json = record.to_json().unwrap();

            let target = MemoryForm::new("f").with_element(MemoryElement::textarea("notes", ""));
            deserialize(&target, &FormRecord::from_json(&json).unwrap(), &options());
            prop_assert_eq!(target.element("notes").unwrap().value(), value);
        }

        #[test]
        fn prop_checkbox_group_round_trip(states in prop::collection::vec(any::<bool>(), 1..8)) {
            let source = MemoryForm::new("f");
            let target = MemoryForm::new("f");
            for (i, checked) in states.iter().enumerate() {
                source.push(MemoryElement::checkbox("opt", &i.to_string(), *checked));
                target.push(MemoryElement::checkbox("opt", &i.to_string(), !*checked));
            }

            deserialize(&target, &serialize(&source, &options()), &options());
            let restored: Vec<bool> = target.elements_named("opt").iter().map(|e| e.checked()).collect();
            prop_assert_eq!(restored, states);
        }
    }
}
