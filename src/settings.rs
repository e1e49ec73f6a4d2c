//! Persistence settings and options
//!
//! `PersistSettings` is the plain-data half of the configuration and can be
//! read from JSON (for example a form's `data-persist` attribute).
//! `PersistOptions` adds the parts that are code: per-field restore
//! handlers and element predicates.

use serde::{Deserialize, Serialize};

use crate::consts::STORAGE_KEY_PREFIX;
use crate::error::{PersistError, Result};
use crate::form::Form;
use crate::persistence::filter::{self, ElementPredicate};
use crate::persistence::handlers::ValueFunctions;
use crate::persistence::record::FieldValue;
use crate::platform::StorageScope;

/// Serializable persistence settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistSettings {
    /// Storage identity overriding the form's id
    pub uuid: Option<String>,
    /// Store in `sessionStorage` instead of `localStorage`
    pub use_session_storage: bool,
    /// Keep the draft when the form is submitted
    pub save_on_submit: bool,
    /// Only these field names participate (empty = all)
    pub include: Vec<String>,
    /// These field names never participate; wins over `include`
    pub exclude: Vec<String>,
}

impl PersistSettings {
    /// Parse settings from JSON; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(PersistError::InvalidSettings)
    }

    pub fn scope(&self) -> StorageScope {
        if self.use_session_storage {
            StorageScope::Session
        } else {
            StorageScope::Local
        }
    }

    /// Storage key for a form with the given `id` attribute
    ///
    /// A non-empty uuid takes precedence over the form id.
    pub fn storage_key(&self, form_identifier: &str) -> Result<String> {
        let identity = match self.uuid.as_deref() {
            Some(uuid) if !uuid.is_empty() => uuid,
            _ if !form_identifier.is_empty() => form_identifier,
            _ => return Err(PersistError::MissingIdentity),
        };
        Ok(format!("{STORAGE_KEY_PREFIX}{identity}"))
    }
}

/// Full configuration for one form
pub struct PersistOptions<F: Form> {
    pub settings: PersistSettings,
    /// Restore handlers that take over specific fields
    pub value_functions: ValueFunctions<F>,
    /// Elements must match this to participate
    pub include_filter: Option<ElementPredicate<F::Element>>,
    /// Matching elements never participate; wins over `include_filter`
    pub exclude_filter: Option<ElementPredicate<F::Element>>,
}

impl<F: Form> Default for PersistOptions<F> {
    fn default() -> Self {
        Self::from_settings(PersistSettings::default())
    }
}

impl<F: Form> PersistOptions<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: PersistSettings) -> Self {
        Self {
            settings,
            value_functions: ValueFunctions::new(),
            include_filter: None,
            exclude_filter: None,
        }
    }

    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.settings.uuid = Some(uuid.into());
        self
    }

    pub fn use_session_storage(mut self, enabled: bool) -> Self {
        self.settings.use_session_storage = enabled;
        self
    }

    pub fn save_on_submit(mut self, enabled: bool) -> Self {
        self.settings.save_on_submit = enabled;
        self
    }

    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.include = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_filter(mut self, predicate: impl Fn(&F::Element) -> bool + 'static) -> Self {
        self.include_filter = Some(Box::new(predicate));
        self
    }

    pub fn exclude_filter(mut self, predicate: impl Fn(&F::Element) -> bool + 'static) -> Self {
        self.exclude_filter = Some(Box::new(predicate));
        self
    }

    /// Register a restore handler for `name`, replacing any earlier one
    pub fn value_function(
        mut self,
        name: impl Into<String>,
        handler: impl Fn(&F, &FieldValue) + 'static,
    ) -> Self {
        self.value_functions.insert(name, handler);
        self
    }

    /// Storage key for `form` under these settings
    pub fn storage_key(&self, form: &F) -> Result<String> {
        self.settings.storage_key(&form.identifier())
    }

    /// Name-level filter under these settings
    pub fn is_name_filtered(&self, name: &str) -> bool {
        filter::is_name_filtered(name, &self.settings.include, &self.settings.exclude)
    }

    /// Element-level filter under these settings
    pub fn is_element_filtered(&self, element: &F::Element) -> bool {
        filter::is_element_filtered(
            element,
            self.include_filter.as_ref(),
            self.exclude_filter.as_ref(),
        )
    }
}
