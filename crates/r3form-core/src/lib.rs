//! R3Form Core Library
//!
//! Platform-agnostic state and logic behind the 3D form widgets: the form
//! store, per-frame animation, measured layout, camera placement and the
//! renderer-neutral scene description.

pub mod animation;
pub mod camera;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod input;
pub mod layout;
pub mod scene;
pub mod store;
pub mod value;

pub use animation::{Animated, Lerp, caret_visible};
pub use camera::{CameraRig, Viewpoint, camera_distance, place};
pub use config::{FormConfig, parse_css_color};
pub use coordinator::{CameraRequest, TooltipId, UiCoordinator};
pub use error::{FormError, FormResult};
pub use input::{Frame, FrameClock, KeyEvent, PointerEvent, Propagation};
pub use layout::{DEFAULT_FORM_HEIGHT, LayoutEngine, LayoutEntry, LayoutPhase, compute_offsets};
pub use scene::{Geometry, HeadlessHost, Material, NodeKind, RenderHost, SceneNode, TextAnchor, Transform};
pub use store::{FormContext, FormProvider, FormStore, KeyHandler, StoreEvent, SubscriptionId};
pub use value::{FieldValue, FormValues};
