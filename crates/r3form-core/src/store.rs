//! Form store: field values, the focused field and the submit callback.
//!
//! The store is owned by a [`FormProvider`]. Widgets never own it; they get a
//! [`FormContext`] when they are mounted, which is a weak handle that fails
//! with [`FormError::OutsideProvider`] once the provider is gone (or if the
//! widget was never mounted at all).
//!
//! The store also owns the one keyboard binding of the form. Text fields
//! register a key handler when they mount; the binding follows the focused
//! field, so only the focused field ever receives keystrokes.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{FormError, FormResult};
use crate::input::KeyEvent;
use crate::value::{FieldValue, FormValues};

/// Callback invoked with a snapshot of the values on submit.
pub type SubmitHandler = Box<dyn FnMut(FormValues)>;

/// Turns a key press into the field's next value, given its current value.
/// Returning `None` leaves the field untouched.
pub type KeyHandler = Rc<dyn Fn(&KeyEvent, Option<&FieldValue>) -> Option<FieldValue>>;

/// Identifies a subscription created by [`FormStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    FieldChanged { name: String, value: FieldValue },
    FocusChanged {
        previous: Option<String>,
        current: Option<String>,
    },
}

type Subscriber = Box<dyn FnMut(&StoreEvent)>;

/// The keyboard listener while a field holds focus.
struct KeyboardBinding {
    field: String,
    handler: KeyHandler,
}

/// Reactive form state.
#[derive(Default)]
pub struct FormStore {
    values: FormValues,
    focused: Option<String>,
    on_submit: Option<SubmitHandler>,
    fields: HashSet<String>,
    key_handlers: BTreeMap<String, KeyHandler>,
    keyboard: Option<KeyboardBinding>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl fmt::Debug for FormStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormStore")
            .field("values", &self.values)
            .field("focused", &self.focused)
            .field("has_submit", &self.on_submit.is_some())
            .field("keyboard", &self.keyboard.as_ref().map(|k| &k.field))
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl FormStore {
    /// Create an empty store without a submit callback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that submits to `on_submit`.
    pub fn with_submit(on_submit: impl FnMut(FormValues) + 'static) -> Self {
        Self {
            on_submit: Some(Box::new(on_submit)),
            ..Self::default()
        }
    }

    /// Replace the submit callback.
    pub fn set_submit_handler(&mut self, on_submit: Option<SubmitHandler>) {
        self.on_submit = on_submit;
    }

    /// Replace the value of a field. Focus is not affected.
    pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        self.values.insert(name.to_string(), value.clone());
        self.notify(&StoreEvent::FieldChanged {
            name: name.to_string(),
            value,
        });
    }

    /// Current value of a field, if it was ever set.
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Text value of a field, empty if unset or not text.
    pub fn text(&self, name: &str) -> &str {
        self.value(name).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Flag value of a field, `false` if unset or not a flag.
    pub fn flag(&self, name: &str) -> bool {
        self.value(name).and_then(FieldValue::as_flag).unwrap_or(false)
    }

    /// Numeric value of a field, `0.0` if unset or not a number.
    pub fn number(&self, name: &str) -> f64 {
        self.value(name).and_then(FieldValue::as_number).unwrap_or(0.0)
    }

    /// All values currently set.
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// The focused field, if any.
    pub fn focused_field(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Check if `name` holds focus.
    pub fn is_focused(&self, name: &str) -> bool {
        self.focused.as_deref() == Some(name)
    }

    /// Move focus to `name`, or clear it with `None`. Last caller wins.
    ///
    /// The keyboard binding follows: it is released from the previously
    /// focused field and acquired for the new one if that field registered a
    /// key handler.
    pub fn set_focused_field(&mut self, name: Option<&str>) {
        let previous = self.focused.take();
        self.focused = name.map(str::to_string);
        self.rebind_keyboard();

        if previous != self.focused {
            log::debug!("Focus moved from {:?} to {:?}", previous, self.focused);
            let current = self.focused.clone();
            self.notify(&StoreEvent::FocusChanged { previous, current });
        }
    }

    /// Hand a snapshot of the values to the submit callback.
    ///
    /// Without a callback this does nothing. State is left as is.
    pub fn submit(&mut self) {
        let snapshot = self.values.clone();
        match self.on_submit.as_mut() {
            Some(on_submit) => {
                log::info!("Submitting form with {} value(s)", snapshot.len());
                on_submit(snapshot);
            }
            None => log::debug!("Submit requested without a submit handler"),
        }
    }

    /// Claim a field name for a mounted widget.
    pub fn register_field(&mut self, name: &str) -> FormResult<()> {
        if !self.fields.insert(name.to_string()) {
            return Err(FormError::DuplicateField(name.to_string()));
        }
        Ok(())
    }

    /// Release a field name, its key handler and, if it holds focus, the
    /// keyboard binding. The value stays in the store.
    pub fn unregister_field(&mut self, name: &str) {
        self.fields.remove(name);
        self.key_handlers.remove(name);
        if self.focused.as_deref() == Some(name) {
            self.rebind_keyboard();
        }
    }

    /// Check if a field name is claimed.
    pub fn is_registered(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    /// Let `name` receive keystrokes while it is focused.
    pub fn register_key_handler(&mut self, name: &str, handler: KeyHandler) {
        self.key_handlers.insert(name.to_string(), handler);
        if self.focused.as_deref() == Some(name) {
            self.rebind_keyboard();
        }
    }

    /// Field currently bound to the keyboard.
    pub fn keyboard_target(&self) -> Option<&str> {
        self.keyboard.as_ref().map(|binding| binding.field.as_str())
    }

    /// Route a key event to the focused field.
    ///
    /// Returns `false` without touching any value when no field holds the
    /// keyboard.
    pub fn dispatch_key(&mut self, event: &KeyEvent) -> bool {
        let Some(binding) = self.keyboard.as_ref() else {
            return false;
        };
        let field = binding.field.clone();
        let handler = Rc::clone(&binding.handler);
        if let Some(next) = handler(event, self.values.get(&field)) {
            self.set_value(&field, next);
        }
        true
    }

    /// Be notified of every value and focus change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Stop a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub, _)| *sub != id);
    }

    fn notify(&mut self, event: &StoreEvent) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(event);
        }
    }

    fn rebind_keyboard(&mut self) {
        let next = self.focused.as_ref().and_then(|field| {
            self.key_handlers.get(field).map(|handler| KeyboardBinding {
                field: field.clone(),
                handler: Rc::clone(handler),
            })
        });

        if let Some(old) = &self.keyboard {
            if next.as_ref().map(|b| &b.field) != Some(&old.field) {
                log::debug!("Keyboard released by {:?}", old.field);
            }
        }
        if let Some(new) = &next {
            if self.keyboard.as_ref().map(|b| &b.field) != Some(&new.field) {
                log::debug!("Keyboard bound to {:?}", new.field);
            }
        }
        self.keyboard = next;
    }
}

/// Owns the store for the lifetime of a mounted form.
#[derive(Debug, Default)]
pub struct FormProvider {
    store: Rc<RefCell<FormStore>>,
}

impl FormProvider {
    /// Create a provider around an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider around an existing store.
    pub fn with_store(store: FormStore) -> Self {
        Self {
            store: Rc::new(RefCell::new(store)),
        }
    }

    /// A handle for widgets mounted under this provider.
    pub fn context(&self) -> FormContext {
        FormContext {
            store: Rc::downgrade(&self.store),
        }
    }
}

/// A widget's handle on the store of the provider it is mounted under.
#[derive(Debug, Clone, Default)]
pub struct FormContext {
    store: Weak<RefCell<FormStore>>,
}

impl FormContext {
    /// A context that is not attached to any provider.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Whether the provider is still alive.
    pub fn is_attached(&self) -> bool {
        self.store.strong_count() > 0
    }

    /// Read from the store.
    pub fn with<R>(&self, f: impl FnOnce(&FormStore) -> R) -> FormResult<R> {
        let store = self.store.upgrade().ok_or(FormError::OutsideProvider)?;
        let guard = store.try_borrow().map_err(|_| FormError::StoreBusy)?;
        Ok(f(&guard))
    }

    /// Mutate the store.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut FormStore) -> R) -> FormResult<R> {
        let store = self.store.upgrade().ok_or(FormError::OutsideProvider)?;
        let mut guard = store.try_borrow_mut().map_err(|_| FormError::StoreBusy)?;
        Ok(f(&mut guard))
    }
}
