//! Re-runs render functions when the controls they are bound to change.
//!
//! Each [`RenderDispatcher::bind`] produces a handle that listens to every
//! control named in its [`Binding`]. When one fires, the handle snapshots the
//! current value of all its controls and calls the render function with them.
//!
//! A handle never runs two invocations at once. A trigger that arrives while an
//! invocation is running (e.g. a render function that nudges a control, or a
//! listener further up the stack) only records the snapshot as pending. When
//! the running invocation returns, the most recent pending snapshot is
//! rendered and any older ones are dropped.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use log::{debug, error, trace, warn};
use thiserror::Error;

use super::render_fn::{Args, RenderError, RenderFn};
use super::surface::SharedSurface;
use crate::control::{
    ControlError, ControlRegistry, ControlValue, InferenceError,
    SubscriptionId,
};
use crate::render::{Artifact, Scene};

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DispatchError {
    #[error("`{render_fn}` requires `{param}` but it has no binding or default")]
    UnboundParameter { render_fn: String, param: String },

    #[error("`{render_fn}` has no parameter named `{param}`")]
    UnknownParameter { render_fn: String, param: String },

    #[error("`{param}` is bound more than once")]
    DuplicateBinding { param: String },

    #[error("binding for `{param}` references unknown control `{control}`")]
    UnknownControl { param: String, control: String },

    #[error("no render handle {0:?}")]
    UnknownHandle(HandleId),

    #[error("the control registry has been dropped")]
    RegistryDropped,

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Ordered `parameter -> control id` pairs
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Binding {
    pairs: Vec<(String, String)>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds each name to the control of the same name
    pub fn identity<S: AsRef<str>>(names: &[S]) -> Self {
        names
            .iter()
            .fold(Self::new(), |b, n| b.bind(n.as_ref(), n.as_ref()))
    }

    pub fn bind(mut self, param: &str, control: &str) -> Self {
        self.pairs.push((param.to_string(), control.to_string()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn control_for(&self, param: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(p, _)| p == param)
            .map(|(_, c)| c.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<P: AsRef<str>, C: AsRef<str>> FromIterator<(P, C)> for Binding {
    fn from_iter<T: IntoIterator<Item = (P, C)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |b, (p, c)| b.bind(p.as_ref(), c.as_ref()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandleStats {
    pub invocations: u64,
    pub failures: u64,
    /// Snapshots that were replaced by a newer one before they could render
    pub coalesced: u64,
}

/// One pending or running invocation: the bound values at trigger time
#[derive(Clone, Debug, PartialEq)]
pub struct RenderJob {
    handle: HandleId,
    snapshot: IndexMap<String, ControlValue>,
}

impl RenderJob {
    pub fn handle(&self) -> HandleId {
        self.handle
    }

    pub fn snapshot(&self) -> &IndexMap<String, ControlValue> {
        &self.snapshot
    }
}

struct Handle {
    id: HandleId,
    render_fn: RenderFn,
    binding: Binding,
    registry: Weak<ControlRegistry>,
    surface: SharedSurface,
    slot: String,
    active: Cell<bool>,
    in_flight: Cell<bool>,
    pending: RefCell<Option<RenderJob>>,
    stats: Cell<HandleStats>,
    subscriptions: RefCell<Vec<(String, SubscriptionId)>>,
}

impl Handle {
    fn trigger(&self) {
        if !self.active.get() {
            return;
        }

        let job = match self.snapshot() {
            Ok(job) => job,
            Err(err) => {
                self.report_failure(&err);
                return;
            }
        };

        if self.in_flight.get() {
            if self.pending.replace(Some(job)).is_some() {
                self.update_stats(|s| s.coalesced += 1);
            }
            trace!(
                "`{}` busy, holding latest snapshot for slot `{}`",
                self.render_fn.name(),
                self.slot
            );
            return;
        }

        self.run(job);
    }

    fn snapshot(&self) -> Result<RenderJob, RenderError> {
        let registry = self.registry.upgrade().ok_or_else(|| {
            RenderError::failed("the control registry has been dropped")
        })?;

        let mut snapshot = IndexMap::with_capacity(self.binding.pairs().len());
        for (param, control) in self.binding.pairs() {
            let value = registry
                .get_value(control)
                .map_err(|_| RenderError::MissingArgument(param.clone()))?;
            snapshot.insert(param.clone(), value);
        }

        Ok(RenderJob {
            handle: self.id,
            snapshot,
        })
    }

    fn run(&self, job: RenderJob) {
        let mut job = job;
        loop {
            {
                let _in_flight = InFlight::enter(&self.in_flight);
                self.invoke(&job);
            }

            let next = self.pending.borrow_mut().take();
            match next {
                Some(next) if self.active.get() => job = next,
                _ => break,
            }
        }
    }

    fn invoke(&self, job: &RenderJob) {
        self.update_stats(|s| s.invocations += 1);
        let sequence = self.stats.get().invocations;

        debug!(
            "Rendering `{}` #{} into `{}` with {:?}",
            self.render_fn.name(),
            sequence,
            self.slot,
            job.snapshot
        );

        // Transforms run user code too, so they share the unwind boundary
        let result = panic::catch_unwind(AssertUnwindSafe(
            || -> Result<(Args, Scene), RenderError> {
                let args = self.render_fn.prepare_args(&job.snapshot)?;
                let scene = self.render_fn.call(&args)?;
                Ok((args, scene))
            },
        ))
        .unwrap_or_else(|payload| {
            Err(RenderError::Panicked(panic_message(payload.as_ref())))
        });

        match result {
            Ok((args, scene)) => {
                let artifact = Artifact::new(
                    self.render_fn.name(),
                    sequence,
                    args.into_values(),
                    scene,
                );
                self.surface.borrow_mut().display(&self.slot, artifact);
            }
            Err(err) => self.report_failure(&err),
        }
    }

    fn report_failure(&self, err: &RenderError) {
        self.update_stats(|s| s.failures += 1);
        error!("`{}` failed: {}", self.render_fn.name(), err);
        self.surface.borrow_mut().display_error(&self.slot, err);
    }

    fn update_stats(&self, f: impl FnOnce(&mut HandleStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    fn detach(&self) {
        self.active.set(false);
        self.pending.borrow_mut().take();
        let subscriptions = std::mem::take(&mut *self.subscriptions.borrow_mut());
        if let Some(registry) = self.registry.upgrade() {
            for (control, subscription) in subscriptions {
                registry.unsubscribe(&control, subscription);
            }
        }
    }
}

/// Clears the in-flight flag on scope exit, unwinding included
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Owns render handles. Holds only a weak reference to the registry whose
/// controls it observes.
pub struct RenderDispatcher {
    registry: Weak<ControlRegistry>,
    handles: RefCell<IndexMap<HandleId, Rc<Handle>>>,
    next_id: Cell<u64>,
}

impl RenderDispatcher {
    pub fn new(registry: &Rc<ControlRegistry>) -> Self {
        Self {
            registry: Rc::downgrade(registry),
            handles: RefCell::new(IndexMap::new()),
            next_id: Cell::new(0),
        }
    }

    /// Checks `binding` against `render_fn` and the registry, then subscribes
    /// to every bound control. Does not render; see [`Self::render_now`].
    pub fn bind(
        &self,
        render_fn: RenderFn,
        binding: Binding,
        surface: SharedSurface,
        slot: &str,
    ) -> Result<HandleId, DispatchError> {
        let registry =
            self.registry.upgrade().ok_or(DispatchError::RegistryDropped)?;

        validate_binding(&render_fn, &binding, &registry)?;

        let id = HandleId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let handle = Rc::new(Handle {
            id,
            render_fn,
            binding,
            registry: self.registry.clone(),
            surface,
            slot: slot.to_string(),
            active: Cell::new(true),
            in_flight: Cell::new(false),
            pending: RefCell::new(None),
            stats: Cell::new(HandleStats::default()),
            subscriptions: RefCell::new(vec![]),
        });

        let mut controls: Vec<&str> = vec![];
        for (_, control) in handle.binding.pairs() {
            if !controls.contains(&control.as_str()) {
                controls.push(control);
            }
        }

        for control in controls {
            let weak = Rc::downgrade(&handle);
            let subscription = registry.subscribe(control, move |_| {
                if let Some(handle) = weak.upgrade() {
                    handle.trigger();
                }
            })?;
            handle
                .subscriptions
                .borrow_mut()
                .push((control.to_string(), subscription));
        }

        debug!(
            "Bound `{}` to slot `{}` as {:?}",
            handle.render_fn.name(),
            slot,
            id
        );

        self.handles.borrow_mut().insert(id, handle);
        Ok(id)
    }

    /// Renders with the current control values as if a bound control had
    /// fired
    pub fn render_now(&self, id: HandleId) -> Result<(), DispatchError> {
        self.handle(id)?.trigger();
        Ok(())
    }

    /// Stops listening. Idempotent per handle; unknown ids are an error.
    pub fn unbind(&self, id: HandleId) -> Result<(), DispatchError> {
        let handle = self
            .handles
            .borrow_mut()
            .shift_remove(&id)
            .ok_or(DispatchError::UnknownHandle(id))?;
        handle.detach();
        Ok(())
    }

    pub fn stats(&self, id: HandleId) -> Option<HandleStats> {
        self.handles.borrow().get(&id).map(|h| h.stats.get())
    }

    pub fn is_in_flight(&self, id: HandleId) -> bool {
        self.handles
            .borrow()
            .get(&id)
            .is_some_and(|h| h.in_flight.get())
    }

    pub fn pending(&self, id: HandleId) -> Option<RenderJob> {
        self.handles
            .borrow()
            .get(&id)
            .and_then(|h| h.pending.borrow().clone())
    }

    pub fn handle_ids(&self) -> Vec<HandleId> {
        self.handles.borrow().keys().copied().collect()
    }

    fn handle(&self, id: HandleId) -> Result<Rc<Handle>, DispatchError> {
        self.handles
            .borrow()
            .get(&id)
            .cloned()
            .ok_or(DispatchError::UnknownHandle(id))
    }
}

impl Drop for RenderDispatcher {
    fn drop(&mut self) {
        for (_, handle) in self.handles.get_mut().drain(..) {
            handle.detach();
        }
    }
}

impl fmt::Debug for RenderDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderDispatcher")
            .field("handles", &self.handle_ids())
            .finish()
    }
}

fn validate_binding(
    render_fn: &RenderFn,
    binding: &Binding,
    registry: &ControlRegistry,
) -> Result<(), DispatchError> {
    let mut seen: Vec<&str> = vec![];

    for (param, control) in binding.pairs() {
        if seen.contains(&param.as_str()) {
            return Err(DispatchError::DuplicateBinding {
                param: param.clone(),
            });
        }
        seen.push(param);

        if render_fn.param_named(param).is_none() {
            return Err(DispatchError::UnknownParameter {
                render_fn: render_fn.name().to_string(),
                param: param.clone(),
            });
        }

        if !registry.has(control) {
            return Err(DispatchError::UnknownControl {
                param: param.clone(),
                control: control.clone(),
            });
        }
    }

    if let Some(param) = render_fn
        .required_params()
        .find(|p| binding.control_for(p.name()).is_none())
    {
        return Err(DispatchError::UnboundParameter {
            render_fn: render_fn.name().to_string(),
            param: param.name().to_string(),
        });
    }

    if binding.is_empty() {
        warn!(
            "`{}` is bound to no controls and will only render on demand",
            render_fn.name()
        );
    }

    Ok(())
}
