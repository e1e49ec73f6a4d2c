//! Form → record

use super::record::FormRecord;
use crate::form::{ElementKind, Form, FormElement};
use crate::settings::PersistOptions;

/// Capture the participating state of `form`
///
/// Read-only. Password and file controls are skipped regardless of the
/// filter configuration.
pub fn serialize<F: Form>(form: &F, options: &PersistOptions<F>) -> FormRecord {
    let mut record = FormRecord::new();

    for element in form.elements() {
        let kind = element.kind();
        if !kind.holds_data() {
            continue;
        }
        let name = element.name();
        if options.is_name_filtered(&name) || options.is_element_filtered(&element) {
            log::debug!("Skipping filtered field {:?}", name);
            continue;
        }

        match kind {
            ElementKind::Checkbox => record.push(&name, element.checked()),
            ElementKind::Radio => {
                if element.checked() {
                    push_non_empty(&mut record, &name, element.value());
                }
            }
            ElementKind::SelectMultiple => {
                for option in element.options().into_iter().filter(|o| o.selected) {
                    push_non_empty(&mut record, &name, option.value);
                }
            }
            ElementKind::Text | ElementKind::Textarea | ElementKind::Select => {
                push_non_empty(&mut record, &name, element.value());
            }
            ElementKind::File | ElementKind::Password | ElementKind::Button | ElementKind::Other => {}
        }
    }

    record
}

fn push_non_empty(record: &mut FormRecord, name: &str, value: String) {
    if !value.is_empty() {
        record.push(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{MemoryElement, MemoryForm};
    use crate::persistence::record::FieldValue;

    fn options() -> PersistOptions<MemoryForm> {
        PersistOptions::new()
    }

    #[test]
    fn test_serialize_mixed_form() {
        let form = MemoryForm::new("signup")
            .with_element(MemoryElement::text("name", "alice"))
            .with_element(MemoryElement::checkbox("agree", "on", true))
            .with_element(MemoryElement::select_multiple(
                "color",
                &["red", "green", "blue"],
                &["red", "blue"],
            ))
            .with_element(MemoryElement::textarea("bio", "hi"))
            .with_element(MemoryElement::select("size", &["s", "m"], Some("m")));

        let record = serialize(&form, &options());
        assert_eq!(
            record.to_json().unwrap(),
            r#"{"name":["alice"],"agree":[true],"color":["red","blue"],"bio":["hi"],"size":["m"]}"#
        );
    }

    #[test]
    fn test_empty_text_is_omitted() {
        let form = MemoryForm::new("f")
            .with_element(MemoryElement::text("empty", ""))
            .with_element(MemoryElement::textarea("notes", ""))
            .with_element(MemoryElement::select("size", &["s"], None));

        let record = serialize(&form, &options());
        assert!(record.is_empty());
    }

    #[test]
    fn test_unchecked_checkbox_is_stored_false() {
        let form = MemoryForm::new("f").with_element(MemoryElement::checkbox("agree", "on", false));
        let record = serialize(&form, &options());
        assert_eq!(record.get("agree"), Some(&[FieldValue::Bool(false)][..]));
    }

    #[test]
    fn test_radio_group_stores_checked_value_only() {
        let form = MemoryForm::new("f")
            .with_element(MemoryElement::radio("plan", "free", false))
            .with_element(MemoryElement::radio("plan", "pro", true))
            .with_element(MemoryElement::radio("unset", "a", false));

        let record = serialize(&form, &options());
        assert_eq!(record.get("plan"), Some(&[FieldValue::from("pro")][..]));
        assert!(!record.contains("unset"));
    }

    #[test]
    fn test_secret_fields_never_serialized() {
        let form = MemoryForm::new("f")
            .with_element(MemoryElement::password("pw", "hunter2"))
            .with_element(MemoryElement::file("avatar"))
            .with_element(MemoryElement::text("user", "bob"));

        let opts = options().include(["pw", "avatar", "user"]);
        let record = serialize(&form, &opts);
        assert!(!record.contains("pw"));
        assert!(!record.contains("avatar"));
        assert!(record.contains("user"));
    }

    #[test]
    fn test_buttons_and_unnamed_fields_skipped() {
        let form = MemoryForm::new("f")
            .with_element(MemoryElement::button("go", "Send"))
            .with_element(MemoryElement::text("", "orphan"));

        assert!(serialize(&form, &options()).is_empty());
    }

    #[test]
    fn test_repeated_names_accumulate_in_order() {
        let form = MemoryForm::new("f")
            .with_element(MemoryElement::checkbox("tag", "a", true))
            .with_element(MemoryElement::text("tag", "free"))
            .with_element(MemoryElement::checkbox("tag", "b", false));

        let record = serialize(&form, &options());
        assert_eq!(
            record.get("tag"),
            Some(&[FieldValue::Bool(true), FieldValue::from("free"), FieldValue::Bool(false)][..])
        );
    }

    #[test]
    fn test_include_exclude_precedence() {
        let form = MemoryForm::new("f")
            .with_element(MemoryElement::text("a", "1"))
            .with_element(MemoryElement::text("b", "2"))
            .with_element(MemoryElement::text("c", "3"));

        let record = serialize(&form, &options().include(["a", "b"]).exclude(["b"]));
        let names: Vec<&str> = record.names().collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_element_filters() {
        let form = MemoryForm::new("f")
            .with_element(MemoryElement::text("a", "1").with_attribute("data-persist", "on"))
            .with_element(MemoryElement::text("b", "2"))
            .with_element(
                MemoryElement::text("c", "3")
                    .with_attribute("data-persist", "on")
                    .with_id("skip-me"),
            );

        let opts = options()
            .include_filter(|e: &MemoryElement| e.attribute("data-persist").is_some())
            .exclude_filter(|e: &MemoryElement| e.id() == "skip-me");
        let record = serialize(&form, &opts);
        let names: Vec<&str> = record.names().collect();
        assert_eq!(names, vec!["a"]);
    }
}
