//! Per-component view of a [`LocaleStore`].
//!
//! A binding is what a UI component holds while mounted: it hydrates the
//! shared store, mirrors the current locale, and counts the re-renders caused
//! by locale changes. Dropping the binding unsubscribes it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::interpolate::Variables;
use super::store::{LocaleStore, Subscription};
use super::table::TranslationValue;

struct BindingState {
    locale: RefCell<String>,
    revision: Cell<u64>,
}

pub struct LocaleBinding {
    store: Rc<LocaleStore>,
    state: Rc<BindingState>,
    subscription: Option<Subscription>,
}

impl LocaleBinding {
    /// Mount a binding on `store`, hydrating it if this is the first mount.
    pub fn attach(store: Rc<LocaleStore>) -> Self {
        store.hydrate();

        let state = Rc::new(BindingState {
            locale: RefCell::new(store.get_locale()),
            revision: Cell::new(0),
        });

        let weak_store = Rc::downgrade(&store);
        let weak_state = Rc::downgrade(&state);
        let subscription = store.subscribe(move || {
            let (Some(store), Some(state)) = (weak_store.upgrade(), weak_state.upgrade()) else {
                return;
            };
            let locale = store.get_locale();
            tracing::debug!("Binding received locale change: {}", locale);
            state.locale.replace(locale);
            state.revision.set(state.revision.get() + 1);
        });

        Self {
            store,
            state,
            subscription: Some(subscription),
        }
    }

    /// Locale as last observed by this binding.
    pub fn locale(&self) -> String {
        self.state.locale.borrow().clone()
    }

    /// Number of locale changes this binding has observed.
    pub fn revision(&self) -> u64 {
        self.state.revision.get()
    }

    pub fn is_hydrated(&self) -> bool {
        self.store.is_hydrated()
    }

    pub fn available_locales(&self) -> &[String] {
        self.store.locales()
    }

    pub fn set_locale(&self, locale: &str) -> bool {
        self.store.set_locale(locale)
    }

    pub fn t(&self, key: &str) -> TranslationValue {
        self.store.t(key)
    }

    pub fn t_args(&self, key: &str, variables: &Variables) -> TranslationValue {
        self.store.t_args(key, variables)
    }

    pub fn text(&self, key: &str) -> String {
        self.store.text(key)
    }

    /// Unmount the binding.
    pub fn detach(self) {}
}

impl Drop for LocaleBinding {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}
