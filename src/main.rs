//! Form Persist entry point
//!
//! On the web, arms an auto-persist session for every `form[data-persist]`.
//! Natively, runs a save/restore round trip against the in-memory backends.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use web_sys::HtmlFormElement;

    use form_persist::consts::SETTINGS_ATTRIBUTE;
    use form_persist::form::WebForm;
    use form_persist::platform::BrowserEnvironment;
    use form_persist::{PersistOptions, PersistSession, PersistSettings, persist};

    thread_local! {
        static SESSIONS: RefCell<Vec<PersistSession<WebForm, BrowserEnvironment>>> =
            const { RefCell::new(Vec::new()) };
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        let env = match BrowserEnvironment::new() {
            Ok(env) => Rc::new(env),
            Err(err) => {
                log::error!("Form persist disabled: {}", err);
                return;
            }
        };
        let Some(document) = env.window().document() else {
            log::error!("Form persist disabled: no document");
            return;
        };

        let selector = format!("form[{}]", SETTINGS_ATTRIBUTE);
        let forms = match document.query_selector_all(&selector) {
            Ok(forms) => forms,
            Err(err) => {
                log::error!("Form lookup failed: {:?}", err);
                return;
            }
        };

        for i in 0..forms.length() {
            let Some(form) = forms
                .item(i)
                .and_then(|node| node.dyn_into::<HtmlFormElement>().ok())
            else {
                continue;
            };
            arm(form, &env);
        }

        log::info!("Form persist running ({} sessions)", session_count());
    }

    fn arm(form: HtmlFormElement, env: &Rc<BrowserEnvironment>) {
        let raw = form.get_attribute(SETTINGS_ATTRIBUTE).unwrap_or_default();
        let settings = if raw.trim().is_empty() {
            PersistSettings::default()
        } else {
            match PersistSettings::from_json(&raw) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!("Skipping form {:?}: {}", form.id(), err);
                    return;
                }
            }
        };

        let id = form.id();
        let form = Rc::new(WebForm::new(form));
        match persist(&form, env, PersistOptions::from_settings(settings)) {
            Ok(session) => SESSIONS.with(|s| s.borrow_mut().push(session)),
            Err(err) => log::warn!("Could not persist form {:?}: {}", id, err),
        }
    }

    fn session_count() -> usize {
        SESSIONS.with(|s| s.borrow().len())
    }

    /// Save every form and end all sessions
    pub fn dispose_all() {
        let sessions = SESSIONS.with(|s| std::mem::take(&mut *s.borrow_mut()));
        for session in sessions {
            if let Err(err) = session.dispose() {
                log::warn!("Final save failed: {}", err);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

/// Flush and detach every auto-persist session on the page
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn dispose_form_persistence() {
    wasm_app::dispose_all();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Form Persist (native) starting...");
    log::info!("Browser mode requires a wasm32 build - run with `trunk serve` for the web version");

    if let Err(err) = demo_round_trip() {
        eprintln!("Round trip failed: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_round_trip() -> form_persist::Result<()> {
    use std::rc::Rc;

    use form_persist::{
        FormElement, MemoryElement, MemoryEnvironment, MemoryForm, PersistOptions, Signal,
        StorageArea, persist,
    };

    fn signup() -> Rc<MemoryForm> {
        Rc::new(
            MemoryForm::new("signup")
                .with_element(MemoryElement::text("name", ""))
                .with_element(MemoryElement::password("password", ""))
                .with_element(MemoryElement::checkbox("agree", "on", false))
                .with_element(MemoryElement::select_multiple(
                    "color",
                    &["red", "green", "blue"],
                    &[],
                )),
        )
    }

    let env = Rc::new(MemoryEnvironment::new());

    let form = signup();
    let session = persist(&form, &env, PersistOptions::new())?;
    if let Some(name) = form.element("name") {
        name.set_value("alice");
    }
    if let Some(password) = form.element("password") {
        password.set_value("hunter2");
    }
    if let Some(agree) = form.element("agree") {
        agree.set_checked(true);
    }
    if let Some(color) = form.element("color") {
        color.set_option_selected(0, true);
        color.set_option_selected(2, true);
    }
    env.emit(Signal::BeforeUnload);

    let key = session.storage_key()?;
    let stored = env.local_storage().get_item(&key)?.unwrap_or_default();
    println!("{key} = {stored}");
    session.dispose()?;

    let reloaded = signup();
    let session = persist(&reloaded, &env, PersistOptions::new())?;
    for name in ["name", "password", "agree", "color"] {
        if let Some(el) = reloaded.element(name) {
            println!(
                "restored {name}: value={:?} checked={} selected={:?}",
                el.value(),
                el.checked(),
                el.selected_values()
            );
        }
    }
    session.dispose()?;

    println!("✓ Round trip complete");
    Ok(())
}
