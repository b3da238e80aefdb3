//! Pressable buttons: a generic button and the form's submit button.

use std::fmt;

use glam::DVec3;
use peniko::Color;
use r3form_core::config::css_color;
use r3form_core::{
    Animated, FormError, FormResult, Frame, Geometry, Material, PointerEvent, Propagation,
    RenderHost, SceneNode, TextAnchor,
};
use serde::{Deserialize, Serialize};

use crate::widget::{Interaction, Widget, WidgetContext, WidgetKind};
use crate::{rates, theme};

/// Style configuration for buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonStyle {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// Corner radius of the body
    pub radius: f64,
    /// Corner segments of the body
    pub smoothness: u32,
    /// Body color
    #[serde(with = "css_color")]
    pub color: Color,
    /// Body color when hovered
    #[serde(with = "css_color")]
    pub hover_color: Color,
    /// Glow when hovered
    #[serde(with = "css_color")]
    pub glow_color: Color,
    /// Z offset while pressed
    pub press_depth: f64,
    pub font_size: f64,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            width: 2.0,
            height: 0.8,
            depth: 0.2,
            radius: 0.1,
            smoothness: 4,
            color: theme::BUTTON,
            hover_color: theme::BUTTON_HOVER,
            glow_color: theme::BUTTON_GLOW,
            press_depth: -0.05,
            font_size: 0.3,
        }
    }
}

impl ButtonStyle {
    /// Style of the submit button.
    pub fn submit() -> Self {
        Self {
            color: theme::SUBMIT,
            hover_color: theme::SUBMIT_HOVER,
            ..Self::default()
        }
    }
}

/// What a button does when pressed.
#[derive(Default)]
pub enum ButtonAction {
    #[default]
    None,
    Callback(Box<dyn FnMut()>),
    /// Submit the enclosing form.
    Submit,
}

impl fmt::Debug for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::Submit => f.write_str("Submit"),
        }
    }
}

/// A rounded, pressable button with a centered label.
#[derive(Debug)]
pub struct Button {
    label: String,
    style: ButtonStyle,
    action: ButtonAction,
    ctx: Option<WidgetContext>,
    interaction: Interaction,
    color: Animated<Color>,
    glow: Animated<Color>,
    press_z: Animated<f64>,
}

impl Button {
    /// Create a button with the default style and no action.
    pub fn new(label: impl Into<String>) -> Self {
        Self::styled(label, ButtonStyle::default())
    }

    /// Create a button with a custom style.
    pub fn styled(label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            label: label.into(),
            color: Animated::new(style.color, rates::DEFAULT),
            glow: Animated::new(theme::GLOW_NONE, rates::PRESS),
            press_z: Animated::new(0.0, rates::PRESS),
            style,
            action: ButtonAction::None,
            ctx: None,
            interaction: Interaction::default(),
        }
    }

    /// The form's submit button.
    pub fn submit() -> Self {
        Self::styled("Submit", ButtonStyle::submit()).with_action(ButtonAction::Submit)
    }

    /// Set the action.
    pub fn with_action(mut self, action: ButtonAction) -> Self {
        self.action = action;
        self
    }

    /// Run `callback` on every press.
    pub fn on_press(self, callback: impl FnMut() + 'static) -> Self {
        self.with_action(ButtonAction::Callback(Box::new(callback)))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn style(&self) -> &ButtonStyle {
        &self.style
    }

    pub fn is_pressed(&self) -> bool {
        self.interaction.pressed
    }

    /// Current z offset of the press animation.
    pub fn press_offset(&self) -> f64 {
        self.press_z.value()
    }

    fn context(&self) -> FormResult<&WidgetContext> {
        let ctx = self.ctx.as_ref().ok_or(FormError::OutsideProvider)?;
        ctx.require()?;
        Ok(ctx)
    }

    fn fire(&mut self) -> FormResult<()> {
        match &mut self.action {
            ButtonAction::None => {}
            ButtonAction::Callback(callback) => callback(),
            ButtonAction::Submit => {
                let ctx = self.ctx.as_ref().ok_or(FormError::OutsideProvider)?;
                ctx.form.with_mut(|store| store.submit())?;
            }
        }
        Ok(())
    }
}

impl Widget for Button {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Button
    }

    fn mount(&mut self, ctx: WidgetContext) -> FormResult<()> {
        ctx.require()?;
        self.ctx = Some(ctx);
        Ok(())
    }

    fn unmount(&mut self) {
        self.ctx = None;
        self.interaction = Interaction::default();
    }

    fn set_layout(&mut self, _width: f64, _y_offset: f64) {}

    fn pointer(&mut self, event: PointerEvent) -> FormResult<Propagation> {
        self.context()?;
        self.interaction.apply(&event);
        match event {
            PointerEvent::Down { .. } => {
                log::debug!("Button {:?} pressed", self.label);
                self.fire()?;
                Ok(Propagation::Stop)
            }
            _ => Ok(Propagation::Continue),
        }
    }

    fn tick(&mut self, _frame: &Frame, _host: &dyn RenderHost) -> FormResult<()> {
        self.context()?;
        let Interaction { hovered, pressed } = self.interaction;
        let color = if hovered { self.style.hover_color } else { self.style.color };
        let glow = if hovered { self.style.glow_color } else { theme::GLOW_NONE };
        let press = if pressed { self.style.press_depth } else { 0.0 };

        self.color = self.color.advanced(color);
        self.glow = self.glow.advanced(glow);
        self.press_z = self.press_z.advanced(press);
        Ok(())
    }

    fn render(&self) -> FormResult<SceneNode> {
        self.context()?;
        let style = &self.style;

        let mut material = Material::color(self.color.value()).with_emissive(self.glow.value(), 1.5);
        material.tone_mapped = false;
        let body = SceneNode::mesh(
            Geometry::RoundedBox {
                size: DVec3::new(style.width, style.height, style.depth),
                radius: style.radius,
                smoothness: style.smoothness,
            },
            material,
        )
        .named("body");

        let label = SceneNode::text(self.label.as_str(), style.font_size, TextAnchor::Center, theme::TEXT)
            .at(DVec3::new(0.0, 0.0, style.depth / 2.0 + 0.05))
            .named("label");

        Ok(SceneNode::group()
            .at(DVec3::new(0.0, 0.0, self.press_z.value()))
            .with_children([body, label]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use r3form_core::{FormProvider, FormStore, FormValues, HeadlessHost, UiCoordinator};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_callback_fires_on_press() {
        let provider = FormProvider::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let mut button = Button::new("Ping").on_press(move || counter.set(counter.get() + 1));
        button
            .mount(WidgetContext::new(provider.context(), UiCoordinator::new()))
            .unwrap();

        assert_eq!(button.pointer(PointerEvent::down()).unwrap(), Propagation::Stop);
        assert!(button.is_pressed());
        button.pointer(PointerEvent::up()).unwrap();
        assert!(!button.is_pressed());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_submit_button_submits_snapshot() {
        let submitted: Rc<RefCell<Vec<FormValues>>> = Rc::default();
        let sink = Rc::clone(&submitted);
        let mut store = FormStore::with_submit(move |values| sink.borrow_mut().push(values));
        store.set_value("email", "a@b.c");
        let provider = FormProvider::with_store(store);

        let mut button = Button::submit();
        assert_eq!(button.label(), "Submit");
        button
            .mount(WidgetContext::new(provider.context(), UiCoordinator::new()))
            .unwrap();
        button.pointer(PointerEvent::down()).unwrap();

        let submitted = submitted.borrow();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0]["email"].as_text(), Some("a@b.c"));
    }

    #[test]
    fn test_press_depth_animates_and_releases_on_leave() {
        let provider = FormProvider::new();
        let mut button = Button::new("Ping");
        button
            .mount(WidgetContext::new(provider.context(), UiCoordinator::new()))
            .unwrap();
        let host = HeadlessHost::default();

        button.pointer(PointerEvent::Enter).unwrap();
        button.pointer(PointerEvent::down()).unwrap();
        for _ in 0..100 {
            button.tick(&Frame::default(), &host).unwrap();
        }
        assert!((button.press_offset() + 0.05).abs() < 1e-6);

        button.pointer(PointerEvent::Leave).unwrap();
        for _ in 0..100 {
            button.tick(&Frame::default(), &host).unwrap();
        }
        assert!(button.press_offset().abs() < 1e-6);
    }

    #[test]
    fn test_style_from_json() {
        let style: ButtonStyle = serde_json::from_str(r##"{"color": "#ff0000", "width": 3}"##).unwrap();
        assert_eq!(style.color.to_rgba8().r, 255);
        assert!((style.width - 3.0).abs() < f64::EPSILON);
        assert!((style.height - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unmounted_button_fails() {
        let mut button = Button::new("Ping");
        assert!(matches!(button.pointer(PointerEvent::down()), Err(FormError::OutsideProvider)));
    }
}
