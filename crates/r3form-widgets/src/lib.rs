//! 3D form widgets and the form container.
//!
//! This crate provides the interactive pieces of an R3Form scene:
//!
//! - **Input**: bordered text field with a floating label and blinking caret
//! - **Switch**: labelled on/off toggle
//! - **Slider**: labelled rail mapping clicks to a value in `[0, 1]`
//! - **Buttons**: pressable rounded button and the submit button
//! - **Tooltip**: "?" icon expanding into an info box
//! - **Form**: the container stacking widgets over a background panel
//!
//! Widgets are renderer-neutral: they produce [`r3form_core::SceneNode`]
//! trees each frame and react to pointer events pushed in by the host.

pub mod blueprint;
pub mod buttons;
pub mod form;
pub mod input;
pub mod slider;
pub mod switch;
pub mod tooltip;
pub mod widget;

pub use blueprint::{FieldBlueprint, FormBlueprint};
pub use buttons::{Button, ButtonAction, ButtonStyle};
pub use form::{Form, FormBuilder, HitTarget};
pub use input::{Input, InputConfig};
pub use slider::{Slider, SliderConfig};
pub use switch::{Switch, SwitchConfig};
pub use tooltip::{Tooltip, TooltipConfig};
pub use widget::{Interaction, Widget, WidgetContext, WidgetKind};

/// Smoothing rates of the widget animations (fraction per frame).
pub mod rates {
    /// Border color fades.
    pub const BORDER: f64 = 0.08;
    /// Glow, label, hover lift and most motion.
    pub const DEFAULT: f64 = 0.1;
    /// Switch handle travel.
    pub const HANDLE: f64 = 0.12;
    /// Slider knob travel.
    pub const KNOB: f64 = 0.15;
    /// Button glow and press depth.
    pub const PRESS: f64 = 0.2;
}

/// Standard colors used across widgets.
pub mod theme {
    use peniko::Color;

    /// Label and value text
    pub const TEXT: Color = Color::from_rgb8(0, 0, 0);
    /// Focus / enabled accent (cyan)
    pub const ACCENT: Color = Color::from_rgb8(0x00, 0xff, 0xff);
    /// Border before the first frame
    pub const BORDER_INITIAL: Color = Color::from_rgb8(0xa0, 0xa0, 0xa0);
    /// Border when idle
    pub const BORDER_IDLE: Color = Color::from_rgb8(0x23, 0x23, 0x23);
    /// Border when hovered
    pub const BORDER_HOVER: Color = Color::from_rgb8(0xab, 0xab, 0xab);
    /// Border glow when hovered
    pub const GLOW_HOVER: Color = Color::from_rgb8(0x44, 0x44, 0x44);
    /// No glow
    pub const GLOW_NONE: Color = Color::from_rgb8(0, 0, 0);
    /// Switch track and handle when off
    pub const TRACK_OFF: Color = Color::from_rgb8(0x55, 0x55, 0x55);
    /// Switch track glow
    pub const TRACK_GLOW: Color = Color::from_rgb8(0x00, 0xcc, 0xcc);
    /// Input field background
    pub const FIELD_BG: Color = Color::from_rgb8(0xff, 0xff, 0xff);
    /// Slider rail
    pub const RAIL: Color = Color::from_rgb8(0, 0, 0);
    /// Slider knob
    pub const KNOB: Color = Color::from_rgb8(0x80, 0x80, 0x80);
    /// Button body
    pub const BUTTON: Color = Color::from_rgb8(0x35, 0xb6, 0x25);
    /// Button body when hovered
    pub const BUTTON_HOVER: Color = Color::from_rgb8(0x3e, 0xc0, 0x2d);
    /// Button glow when hovered
    pub const BUTTON_GLOW: Color = Color::from_rgb8(0xa0, 0xff, 0x50);
    /// Submit button body
    pub const SUBMIT: Color = Color::from_rgb8(0x00, 0xcc, 0x88);
    /// Submit button body when hovered
    pub const SUBMIT_HOVER: Color = Color::from_rgb8(0x00, 0xff, 0xaa);
    /// Tooltip icon and text
    pub const TOOLTIP_TEXT: Color = Color::from_rgb8(0xff, 0xff, 0xff);
    /// Tooltip info box
    pub const TOOLTIP_BOX: Color = Color::from_rgb8(0x1a, 0x1a, 0x1a);
    /// Tooltip info box glow
    pub const TOOLTIP_BOX_GLOW: Color = Color::from_rgb8(0x44, 0x44, 0x44);
}
