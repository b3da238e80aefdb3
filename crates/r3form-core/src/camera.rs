//! Camera placement presets and the smooth camera rig.

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::animation::Animated;

/// Per-frame smoothing rate of the camera rig.
pub const CAMERA_RATE: f64 = 0.01;

/// A named camera placement around the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Viewpoint {
    #[default]
    Front,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Viewpoint {
    /// All viewpoints.
    pub const ALL: [Viewpoint; 9] = [
        Viewpoint::Front,
        Viewpoint::Top,
        Viewpoint::Bottom,
        Viewpoint::Left,
        Viewpoint::Right,
        Viewpoint::TopLeft,
        Viewpoint::TopRight,
        Viewpoint::BottomLeft,
        Viewpoint::BottomRight,
    ];

    /// Look up a viewpoint by name. Unknown names fall back to [`Viewpoint::Front`].
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|viewpoint| viewpoint.name() == name)
            .unwrap_or_else(|| {
                log::debug!("Unknown viewpoint {name:?}, using front");
                Viewpoint::Front
            })
    }

    /// The preset's name.
    pub fn name(self) -> &'static str {
        match self {
            Viewpoint::Front => "front",
            Viewpoint::Top => "top",
            Viewpoint::Bottom => "bottom",
            Viewpoint::Left => "left",
            Viewpoint::Right => "right",
            Viewpoint::TopLeft => "top-left",
            Viewpoint::TopRight => "top-right",
            Viewpoint::BottomLeft => "bottom-left",
            Viewpoint::BottomRight => "bottom-right",
        }
    }

    /// Horizontal and vertical direction of the preset, each -1, 0 or 1.
    fn direction(self) -> (f64, f64) {
        match self {
            Viewpoint::Front => (0.0, 0.0),
            Viewpoint::Top => (0.0, 1.0),
            Viewpoint::Bottom => (0.0, -1.0),
            Viewpoint::Left => (-1.0, 0.0),
            Viewpoint::Right => (1.0, 0.0),
            Viewpoint::TopLeft => (-1.0, 1.0),
            Viewpoint::TopRight => (1.0, 1.0),
            Viewpoint::BottomLeft => (-1.0, -1.0),
            Viewpoint::BottomRight => (1.0, -1.0),
        }
    }

    /// Camera position for this preset.
    pub fn position(self, distance: f64, container_height: f64) -> DVec3 {
        let half = container_height / 2.0;
        let (x, y) = self.direction();
        DVec3::new(x * half, y * half, distance)
    }
}

impl fmt::Display for Viewpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Camera position for a named viewpoint.
///
/// The camera sits `distance` in front of the form and is shifted by half the
/// container height toward the named side(s). Unknown names are placed in
/// front.
pub fn place(viewpoint: &str, distance: f64, container_height: f64) -> DVec3 {
    Viewpoint::from_name(viewpoint).position(distance, container_height)
}

/// Distance of the camera from the form plane for a given zoom factor.
pub fn camera_distance(container_height: f64, zoom: f64) -> f64 {
    container_height + 2.0 * (1.0 / zoom)
}

/// Smoothly moves the camera toward a requested position and look-at point.
///
/// The rig stays idle until [`CameraRig::set_target`] is first called.
#[derive(Debug, Clone)]
pub struct CameraRig {
    position: Animated<DVec3>,
    look_at: Animated<DVec3>,
    active: bool,
}

impl CameraRig {
    /// Create an idle rig at `position`, looking at the origin.
    pub fn new(position: DVec3) -> Self {
        Self {
            position: Animated::new(position, CAMERA_RATE),
            look_at: Animated::new(DVec3::ZERO, CAMERA_RATE),
            active: false,
        }
    }

    /// Current camera position.
    pub fn position(&self) -> DVec3 {
        self.position.value()
    }

    /// Point the camera currently looks at.
    pub fn look_at(&self) -> DVec3 {
        self.look_at.value()
    }

    /// Whether the rig is moving toward a requested target.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start moving toward `position`, turning to face `look_at`.
    pub fn set_target(&mut self, position: DVec3, look_at: DVec3) {
        self.position.set_target(position);
        self.look_at.set_target(look_at);
        self.active = true;
    }

    /// Jump to `position` looking at the origin and go idle.
    pub fn reset(&mut self, position: DVec3) {
        self.position.snap_to(position);
        self.look_at.snap_to(DVec3::ZERO);
        self.active = false;
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        if !self.active {
            return;
        }
        self.position.step();
        self.look_at.step();
    }
}
