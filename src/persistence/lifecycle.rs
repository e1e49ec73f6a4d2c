//! Storage lifecycle: save, load, clear, and auto-persist sessions

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::deserialize::deserialize;
use super::record::FormRecord;
use super::serialize::serialize;
use crate::error::{PersistError, Result};
use crate::form::Form;
use crate::platform::{Environment, ListenerId, Signal, StorageArea};
use crate::settings::PersistOptions;

fn open_storage<F: Form, E: Environment + ?Sized>(
    env: &E,
    options: &PersistOptions<F>,
) -> Result<Rc<dyn StorageArea>> {
    env.storage(options.settings.scope())
}

/// Serialize `form` and overwrite its stored record
pub fn save<F: Form, E: Environment + ?Sized>(
    form: &F,
    env: &E,
    options: &PersistOptions<F>,
) -> Result<()> {
    let key = options.storage_key(form)?;
    let record = serialize(form, options);
    let json = record.to_json().map_err(PersistError::Encode)?;
    open_storage(env, options)?.set_item(&key, &json)?;
    log::info!("Form saved under {} ({} fields)", key, record.len());
    Ok(())
}

/// Restore `form` from its stored record, if any
///
/// Returns whether a record was found. A stored value that is not a valid
/// record is an error.
pub fn load<F: Form, E: Environment + ?Sized>(
    form: &F,
    env: &E,
    options: &PersistOptions<F>,
) -> Result<bool> {
    let key = options.storage_key(form)?;
    let Some(json) = open_storage(env, options)?.get_item(&key)? else {
        log::debug!("No saved state under {}", key);
        return Ok(false);
    };
    let record = FormRecord::from_json(&json)
        .map_err(|source| PersistError::MalformedRecord { key: key.clone(), source })?;
    deserialize(form, &record, options);
    log::info!("Form restored from {} ({} fields)", key, record.len());
    Ok(true)
}

/// Remove `form`'s stored record; absent keys are fine
pub fn clear_storage<F: Form, E: Environment + ?Sized>(
    form: &F,
    env: &E,
    options: &PersistOptions<F>,
) -> Result<()> {
    let key = options.storage_key(form)?;
    open_storage(env, options)?.remove_item(&key)?;
    log::info!("Cleared saved state under {}", key);
    Ok(())
}

/// Shared by every trigger of one session
struct SessionCore<F: Form, E: Environment> {
    form: Weak<F>,
    env: Weak<E>,
    options: PersistOptions<F>,
    triggers: RefCell<Triggers>,
}

#[derive(Debug, Default)]
struct Triggers {
    navigation: Option<ListenerId>,
    before_unload: Option<ListenerId>,
    unload: Option<ListenerId>,
    submit: Option<ListenerId>,
}

impl<F: Form + 'static, E: Environment + 'static> SessionCore<F, E> {
    /// Attach every trigger, recording each id as it is issued
    ///
    /// The listeners own the core, so the session stays armed after its
    /// handle is dropped.
    fn arm(self: &Rc<Self>, form: &F, env: &E) -> Result<()> {
        let core = Rc::clone(self);
        let save_handler: Rc<dyn Fn()> = Rc::new(move || core.save_logged());

        let navigation = env.attach(Signal::NavigationChange, save_handler.clone())?;
        self.triggers.borrow_mut().navigation = Some(navigation);

        let core = Rc::clone(self);
        let before_unload = env.attach(
            Signal::BeforeUnload,
            Rc::new(move || core.on_before_unload()),
        )?;
        self.triggers.borrow_mut().before_unload = Some(before_unload);

        let unload = env.attach(Signal::Unload, save_handler)?;
        self.triggers.borrow_mut().unload = Some(unload);

        if !self.options.settings.save_on_submit {
            let core = Rc::clone(self);
            let submit = form.attach(Signal::Submit, Rc::new(move || core.on_submit()))?;
            self.triggers.borrow_mut().submit = Some(submit);
        }
        Ok(())
    }

    /// Save from a signal handler, where errors can only be logged
    fn save_logged(&self) {
        let (Some(form), Some(env)) = (self.form.upgrade(), self.env.upgrade()) else {
            return;
        };
        if let Err(err) = save(&*form, &*env, &self.options) {
            log::warn!("Auto-save failed: {}", err);
        }
    }

    /// Detach the navigation and unload triggers that are still armed
    fn disarm_window_triggers(&self) {
        let ids = {
            let mut triggers = self.triggers.borrow_mut();
            [
                triggers.navigation.take(),
                triggers.before_unload.take(),
                triggers.unload.take(),
            ]
        };
        if let Some(env) = self.env.upgrade() {
            for id in ids.into_iter().flatten() {
                env.detach(id);
            }
        }
    }

    /// Detach every trigger, the form's submit listener included
    fn disarm(&self) {
        self.disarm_window_triggers();
        let submit = self.triggers.borrow_mut().submit.take();
        if let (Some(id), Some(form)) = (submit, self.form.upgrade()) {
            form.detach(id);
        }
    }

    fn on_before_unload(&self) {
        // The save happens here; skip the duplicate on unload
        let unload = self.triggers.borrow_mut().unload.take();
        if let (Some(id), Some(env)) = (unload, self.env.upgrade()) {
            env.detach(id);
        }
        self.save_logged();
    }

    fn on_submit(&self) {
        self.disarm_window_triggers();
        let (Some(form), Some(env)) = (self.form.upgrade(), self.env.upgrade()) else {
            return;
        };
        if let Err(err) = clear_storage(&*form, &*env, &self.options) {
            log::warn!("Failed to discard draft on submit: {}", err);
        }
    }
}

/// A running auto-persist session
///
/// Created by [`persist`]; ends with [`PersistSession::dispose`]. Dropping
/// a session without disposing it leaves its triggers armed, and they keep
/// saving for as long as the form and environment are alive.
#[must_use = "dropping the session leaves it armed; call dispose() to end it"]
pub struct PersistSession<F: Form + 'static, E: Environment + 'static> {
    form: Rc<F>,
    env: Rc<E>,
    core: Rc<SessionCore<F, E>>,
}

impl<F: Form + 'static, E: Environment + 'static> PersistSession<F, E> {
    /// Storage key this session writes to
    pub fn storage_key(&self) -> Result<String> {
        self.core.options.storage_key(&self.form)
    }

    /// Save now without ending the session
    pub fn save(&self) -> Result<()> {
        save(&*self.form, &*self.env, &self.core.options)
    }

    /// Whether the navigation/unload triggers are still armed
    pub fn is_armed(&self) -> bool {
        let triggers = self.core.triggers.borrow();
        triggers.navigation.is_some() || triggers.before_unload.is_some() || triggers.unload.is_some()
    }

    /// Final save, then detach every trigger the session still holds
    pub fn dispose(self) -> Result<()> {
        let saved = self.save();
        self.core.disarm();
        log::info!("Persist session disposed");
        saved
    }
}

/// Restore `form` now and keep it saved until the session is disposed
///
/// Saves on navigation change, before unload and on unload. Unless
/// `save_on_submit` is set, submitting the form disarms those triggers and
/// discards the stored draft.
pub fn persist<F, E>(form: &Rc<F>, env: &Rc<E>, options: PersistOptions<F>) -> Result<PersistSession<F, E>>
where
    F: Form + 'static,
    E: Environment + 'static,
{
    // Fail on missing identity before anything is armed
    options.storage_key(form)?;
    load(&**form, &**env, &options)?;

    let core = Rc::new(SessionCore {
        form: Rc::downgrade(form),
        env: Rc::downgrade(env),
        options,
        triggers: RefCell::new(Triggers::default()),
    });
    let session = PersistSession {
        form: Rc::clone(form),
        env: Rc::clone(env),
        core: Rc::clone(&core),
    };

    if let Err(err) = core.arm(&**form, &**env) {
        core.disarm();
        return Err(err);
    }

    log::info!(
        "Persist session armed for {}",
        session.storage_key().unwrap_or_default()
    );
    Ok(session)
}
