//! Field participation rules
//!
//! Two independent checks: by name (allow/deny lists) and by element
//! (predicates). A field must pass both.

/// Predicate over a form control
pub type ElementPredicate<E> = Box<dyn Fn(&E) -> bool>;

/// True when `name` must be skipped
///
/// Empty names are always skipped; `exclude` wins over `include`; an empty
/// `include` allows everything.
pub fn is_name_filtered(name: &str, include: &[String], exclude: &[String]) -> bool {
    if name.is_empty() {
        return true;
    }
    if exclude.iter().any(|n| n == name) {
        return true;
    }
    !include.is_empty() && !include.iter().any(|n| n == name)
}

/// True when `element` must be skipped
///
/// `exclude_filter` wins over `include_filter`.
pub fn is_element_filtered<E>(
    element: &E,
    include_filter: Option<&ElementPredicate<E>>,
    exclude_filter: Option<&ElementPredicate<E>>,
) -> bool {
    if exclude_filter.is_some_and(|f| f(element)) {
        return true;
    }
    include_filter.is_some_and(|f| !f(element))
}
