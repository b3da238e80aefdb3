//! Shared UI coordination between widgets of one form.
//!
//! Only one tooltip may be expanded at a time. Each tooltip gets a clone of
//! the form's [`UiCoordinator`]; activating one runs the deactivation handle
//! of whichever tooltip was expanded before. Tooltips also use the
//! coordinator to ask the form's camera to frame them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TooltipId(Uuid);

impl TooltipId {
    /// Generate a new random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TooltipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TooltipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Collapses a tooltip that lost its activation.
pub type Deactivate = Box<dyn FnOnce()>;

/// A request for the camera rig to move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRequest {
    pub position: DVec3,
    pub look_at: DVec3,
}

struct Activation {
    id: TooltipId,
    deactivate: Deactivate,
}

#[derive(Default)]
struct CoordinatorState {
    active: Option<Activation>,
    camera: Option<CameraRequest>,
}

/// Handle shared by every widget of a form.
#[derive(Clone, Default)]
pub struct UiCoordinator {
    state: Rc<RefCell<CoordinatorState>>,
}

impl fmt::Debug for UiCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiCoordinator")
            .field("active", &self.active())
            .finish()
    }
}

impl UiCoordinator {
    /// Create a coordinator with nothing active.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `id` the expanded tooltip.
    ///
    /// The previous tooltip's handle runs after the coordinator has been
    /// updated, so it may safely call back into the coordinator.
    pub fn activate(&self, id: TooltipId, deactivate: Deactivate) {
        let previous = self
            .state
            .borrow_mut()
            .active
            .replace(Activation { id, deactivate });

        match previous {
            Some(previous) if previous.id != id => {
                log::debug!("Tooltip {} collapsed by {}", previous.id, id);
                (previous.deactivate)();
            }
            Some(_) => {}
            None => log::debug!("Tooltip {id} expanded"),
        }
    }

    /// Forget `id` if it is the expanded tooltip, without running its handle.
    pub fn release(&self, id: TooltipId) {
        let mut state = self.state.borrow_mut();
        if state.active.as_ref().is_some_and(|active| active.id == id) {
            state.active = None;
        }
    }

    /// The expanded tooltip, if any.
    pub fn active(&self) -> Option<TooltipId> {
        self.state.borrow().active.as_ref().map(|active| active.id)
    }

    /// Ask the camera to move. A later request replaces an earlier one.
    pub fn request_camera(&self, position: DVec3, look_at: DVec3) {
        self.state.borrow_mut().camera = Some(CameraRequest { position, look_at });
    }

    /// Take the pending camera request.
    pub fn take_camera_request(&self) -> Option<CameraRequest> {
        self.state.borrow_mut().camera.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn flag_handle(flag: &Rc<Cell<bool>>) -> Deactivate {
        let flag = Rc::clone(flag);
        Box::new(move || flag.set(false))
    }

    #[test]
    fn test_activating_another_collapses_previous() {
        let ui = UiCoordinator::new();
        let (a, b) = (TooltipId::new(), TooltipId::new());
        let a_open = Rc::new(Cell::new(true));
        let b_open = Rc::new(Cell::new(true));

        ui.activate(a, flag_handle(&a_open));
        assert_eq!(ui.active(), Some(a));

        ui.activate(b, flag_handle(&b_open));
        assert_eq!(ui.active(), Some(b));
        assert!(!a_open.get());
        assert!(b_open.get());
    }

    #[test]
    fn test_reactivating_same_keeps_it_open() {
        let ui = UiCoordinator::new();
        let a = TooltipId::new();
        let open = Rc::new(Cell::new(true));

        ui.activate(a, flag_handle(&open));
        ui.activate(a, flag_handle(&open));
        assert!(open.get());
        assert_eq!(ui.active(), Some(a));
    }

    #[test]
    fn test_release() {
        let ui = UiCoordinator::new();
        let (a, b) = (TooltipId::new(), TooltipId::new());
        let open = Rc::new(Cell::new(true));

        ui.activate(a, flag_handle(&open));
        ui.release(b);
        assert_eq!(ui.active(), Some(a));
        ui.release(a);
        assert_eq!(ui.active(), None);
        assert!(open.get());
    }

    #[test]
    fn test_deactivate_may_reenter() {
        let ui = UiCoordinator::new();
        let (a, b) = (TooltipId::new(), TooltipId::new());
        let inner = ui.clone();
        ui.activate(a, Box::new(move || assert_eq!(inner.active(), Some(b))));
        ui.activate(b, Box::new(|| {}));
    }

    #[test]
    fn test_camera_request_is_taken_once() {
        let ui = UiCoordinator::new();
        ui.request_camera(DVec3::new(1.0, 2.0, 6.0), DVec3::ZERO);
        ui.request_camera(DVec3::new(3.0, 2.0, 6.0), DVec3::ZERO);
        let request = ui.take_camera_request().unwrap();
        assert_eq!(request.position.x, 3.0);
        assert!(ui.take_camera_request().is_none());
    }
}
