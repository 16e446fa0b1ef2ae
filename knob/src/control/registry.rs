//! Owns every control's state and tells listeners when a value changes.
//!
//! The registry is shared as `Rc<ControlRegistry>` and mutated through `&self`.
//! No internal borrow is held while listeners run, so a listener (or a render
//! function it triggers) may itself call [`ControlRegistry::set_value`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use log::{error, trace};

use super::error::ControlError;
use super::ui_controls::{ControlConfig, ControlValue, UpdateMode};

/// Passed to listeners after a successful [`ControlRegistry::set_value`]
#[derive(Clone, Debug, PartialEq)]
pub struct ControlEvent<'a> {
    pub id: &'a str,
    pub value: &'a ControlValue,
}

pub type Listener = Rc<dyn Fn(&ControlEvent)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    listener: Listener,
}

struct Control {
    config: ControlConfig,
    value: ControlValue,
    /// Latest uncommitted interaction of an [`UpdateMode::OnCommit`] control
    pending: Option<ControlValue>,
    subscriptions: Vec<Subscription>,
}

#[derive(Default)]
pub struct ControlRegistry {
    controls: RefCell<IndexMap<String, Control>>,
    next_subscription: Cell<u64>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_configs(
        configs: impl IntoIterator<Item = ControlConfig>,
    ) -> Result<Self, ControlError> {
        let registry = Self::new();
        for config in configs {
            registry.create(config)?;
        }
        Ok(registry)
    }

    /// Validates `config` and registers a new control holding its initial
    /// value. Returns the control's id.
    pub fn create(&self, config: ControlConfig) -> Result<String, ControlError> {
        config.validate()?;
        let value = config.check_value(&config.value)?;

        let mut controls = self.controls.borrow_mut();
        if controls.contains_key(&config.id) {
            return Err(ControlError::DuplicateControl(config.id));
        }

        let id = config.id.clone();
        trace!("Creating {} control `{}` = {}", config.kind, id, value);
        controls.insert(
            id.clone(),
            Control {
                config,
                value,
                pending: None,
                subscriptions: vec![],
            },
        );

        Ok(id)
    }

    /// Validates and stores `value`, then fires every listener subscribed to
    /// `id` in registration order. On error nothing is stored and nobody is
    /// notified.
    pub fn set_value(
        &self,
        id: &str,
        value: impl Into<ControlValue>,
    ) -> Result<(), ControlError> {
        let value = value.into();

        let (value, listeners) = {
            let mut controls = self.controls.borrow_mut();
            let control = controls
                .get_mut(id)
                .ok_or_else(|| ControlError::UnknownControl(id.to_string()))?;

            let value = control.config.check_value(&value)?;
            control.value = value.clone();
            control.pending = None;

            let listeners: Vec<Listener> = control
                .subscriptions
                .iter()
                .map(|s| s.listener.clone())
                .collect();

            (value, listeners)
        };

        trace!(
            "`{}` = {} ({} listener(s))",
            id,
            value,
            listeners.len()
        );

        let event = ControlEvent { id, value: &value };
        for listener in listeners {
            listener(&event);
        }

        Ok(())
    }

    pub fn get_value(&self, id: &str) -> Result<ControlValue, ControlError> {
        self.controls
            .borrow()
            .get(id)
            .map(|c| c.value.clone())
            .ok_or_else(|| ControlError::UnknownControl(id.to_string()))
    }

    pub fn subscribe<F>(
        &self,
        id: &str,
        listener: F,
    ) -> Result<SubscriptionId, ControlError>
    where
        F: Fn(&ControlEvent) + 'static,
    {
        let mut controls = self.controls.borrow_mut();
        let control = controls
            .get_mut(id)
            .ok_or_else(|| ControlError::UnknownControl(id.to_string()))?;

        let subscription_id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(subscription_id.0 + 1);

        control.subscriptions.push(Subscription {
            id: subscription_id,
            listener: Rc::new(listener),
        });

        Ok(subscription_id)
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&self, id: &str, subscription: SubscriptionId) -> bool {
        let mut controls = self.controls.borrow_mut();
        let Some(control) = controls.get_mut(id) else {
            return false;
        };
        let before = control.subscriptions.len();
        control.subscriptions.retain(|s| s.id != subscription);
        control.subscriptions.len() != before
    }

    /// Models one step of user interaction (a drag tick, a keystroke).
    /// [`UpdateMode::Immediate`] controls apply it right away;
    /// [`UpdateMode::OnCommit`] controls validate and buffer it until
    /// [`Self::commit`].
    pub fn interact(
        &self,
        id: &str,
        value: impl Into<ControlValue>,
    ) -> Result<(), ControlError> {
        let value = value.into();

        {
            let mut controls = self.controls.borrow_mut();
            let control = controls
                .get_mut(id)
                .ok_or_else(|| ControlError::UnknownControl(id.to_string()))?;

            if control.config.update_mode == UpdateMode::OnCommit {
                control.pending = Some(control.config.check_value(&value)?);
                return Ok(());
            }
        }

        self.set_value(id, value)
    }

    /// Ends an interaction. Applies the buffered value of an on-commit control
    /// and returns whether anything was applied.
    pub fn commit(&self, id: &str) -> Result<bool, ControlError> {
        let pending = {
            let mut controls = self.controls.borrow_mut();
            let control = controls
                .get_mut(id)
                .ok_or_else(|| ControlError::UnknownControl(id.to_string()))?;
            control.pending.take()
        };

        match pending {
            Some(value) => self.set_value(id, value).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn pending(&self, id: &str) -> Option<ControlValue> {
        self.controls.borrow().get(id).and_then(|c| c.pending.clone())
    }

    pub fn has(&self, id: &str) -> bool {
        self.controls.borrow().contains_key(id)
    }

    pub fn config(&self, id: &str) -> Option<ControlConfig> {
        self.controls.borrow().get(id).map(|c| c.config.clone())
    }

    /// Control ids in registration order
    pub fn ids(&self) -> Vec<String> {
        self.controls.borrow().keys().cloned().collect()
    }

    pub fn values(&self) -> IndexMap<String, ControlValue> {
        self.controls
            .borrow()
            .iter()
            .map(|(id, c)| (id.clone(), c.value.clone()))
            .collect()
    }

    pub fn listener_count(&self, id: &str) -> usize {
        self.controls
            .borrow()
            .get(id)
            .map_or(0, |c| c.subscriptions.len())
    }

    pub fn float(&self, id: &str) -> f64 {
        self.get_value(id)
            .ok()
            .and_then(|v| v.as_float())
            .unwrap_or_else(|| {
                error!("No float for `{}`. Returning 0.0.", id);
                0.0
            })
    }

    pub fn int(&self, id: &str) -> i64 {
        self.get_value(id)
            .ok()
            .and_then(|v| v.as_int())
            .unwrap_or_else(|| {
                error!("No int for `{}`. Returning 0.", id);
                0
            })
    }

    pub fn bool(&self, id: &str) -> bool {
        self.get_value(id)
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or_else(|| {
                error!("No bool for `{}`. Returning false.", id);
                false
            })
    }

    pub fn string(&self, id: &str) -> String {
        self.get_value(id)
            .ok()
            .and_then(|v| v.as_string().map(ToOwned::to_owned))
            .unwrap_or_else(|| {
                error!("No String for Control named `{}`. Returning empty.", id);
                "".to_string()
            })
    }
}

impl fmt::Debug for ControlRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let controls = self.controls.borrow();
        let mut debug_struct = f.debug_struct("ControlRegistry");
        for (id, control) in controls.iter() {
            debug_struct.field(id, &control.value);
        }
        debug_struct.finish()
    }
}
