//! The widget abstraction shared by every form child.
//!
//! A widget is mounted under a form, which hands it a [`WidgetContext`]
//! (store handle + UI coordinator). Until then, and after unmount, every
//! operation fails with [`FormError::OutsideProvider`].

mod state;

pub use state::Interaction;

use r3form_core::{
    FormContext, FormError, FormResult, Frame, PointerEvent, Propagation, RenderHost, SceneNode,
    UiCoordinator,
};

/// What kind of widget a form child is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Input,
    Switch,
    Slider,
    Button,
    Tooltip,
}

/// Everything a mounted widget may talk to.
#[derive(Debug, Clone, Default)]
pub struct WidgetContext {
    pub form: FormContext,
    pub ui: UiCoordinator,
}

impl WidgetContext {
    /// Create a context for a widget mounted under a form.
    pub fn new(form: FormContext, ui: UiCoordinator) -> Self {
        Self { form, ui }
    }

    /// A context outside of any form.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Fail unless the widget is mounted under a live form.
    pub fn require(&self) -> FormResult<()> {
        if self.form.is_attached() {
            Ok(())
        } else {
            Err(FormError::OutsideProvider)
        }
    }

    /// Give up field `name` on unmount.
    ///
    /// A form that is already gone has nothing left to release; any other
    /// failure leaves the field registered and is returned.
    pub fn release_field(&self, name: &str) -> FormResult<()> {
        match self.form.with_mut(|store| store.unregister_field(name)) {
            Ok(()) | Err(FormError::OutsideProvider) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

/// Release field `name` from unmount, where errors can only be logged.
pub(crate) fn release_on_unmount(ctx: &WidgetContext, name: &str) {
    if let Err(err) = ctx.release_field(name) {
        log::warn!("Field {name:?} was not released on unmount: {err}");
    }
}

/// A child of a form.
pub trait Widget {
    /// What kind of widget this is.
    fn kind(&self) -> WidgetKind;

    /// Store key of the field, for widgets bound to one.
    fn field_name(&self) -> Option<&str> {
        None
    }

    /// Attach to a form. Field widgets claim their name here.
    fn mount(&mut self, ctx: WidgetContext) -> FormResult<()>;

    /// Detach from the form, releasing anything acquired at mount.
    fn unmount(&mut self);

    /// Width assigned by the form and vertical offset from the layout engine.
    fn set_layout(&mut self, width: f64, y_offset: f64);

    /// React to a pointer event on the widget's hit region.
    fn pointer(&mut self, event: PointerEvent) -> FormResult<Propagation>;

    /// Advance animations by one frame.
    fn tick(&mut self, frame: &Frame, host: &dyn RenderHost) -> FormResult<()>;

    /// Describe the widget in its local coordinates.
    fn render(&self) -> FormResult<SceneNode>;
}
