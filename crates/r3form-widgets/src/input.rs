//! Bordered 3D text field with a floating label.

use std::rc::Rc;

use glam::DVec3;
use peniko::Color;
use r3form_core::{
    Animated, FieldValue, FormError, FormResult, Frame, KeyEvent, KeyHandler, Material,
    PointerEvent, Propagation, RenderHost, SceneNode, TextAnchor, caret_visible,
};
use serde::{Deserialize, Serialize};

use crate::widget::{Interaction, Widget, WidgetContext, WidgetKind, release_on_unmount};
use crate::{rates, theme};

const VALUE_FONT_SIZE: f64 = 0.45;
const LABEL_SIZE_RESTING: f64 = 0.4;
const LABEL_SIZE_RAISED: f64 = 0.3;
const LABEL_RAISED_Y: f64 = 0.6;

/// Input field configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Field name; also shown as the label.
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub border_width: f64,
    pub border_depth: f64,
    /// How far the field lifts toward the camera when hovered.
    pub hover_depth: f64,
    /// Draw a white plate behind the text.
    pub show_field_background: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            width: 6.0,
            height: 1.0,
            border_width: 0.05,
            border_depth: 0.1,
            hover_depth: 0.1,
            show_field_background: false,
        }
    }
}

impl InputConfig {
    /// Configuration with default dimensions for the field `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Where the animated properties are heading.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VisualTargets {
    border: Color,
    emissive: Color,
    intensity: f64,
    top_scale: f64,
    top_offset: f64,
    label_position: DVec3,
    label_size: f64,
    hover_z: f64,
}

impl VisualTargets {
    fn resolve(config: &InputConfig, state: Interaction, focused: bool, filled: bool, label_width: f64) -> Self {
        let (border, emissive, intensity) = if focused {
            (theme::ACCENT, theme::ACCENT, 1.5)
        } else if state.hovered {
            (theme::BORDER_HOVER, theme::GLOW_HOVER, 0.6)
        } else {
            (theme::BORDER_IDLE, theme::GLOW_NONE, 0.0)
        };

        let label_x = -config.width / 2.0 + 0.05;
        let label_z = config.border_depth / 2.0;
        let (top_scale, top_offset, label_position, label_size) = if focused || filled {
            let gap = label_width + 0.4;
            (
                (config.width - gap / 2.0) / config.width,
                gap / 4.0,
                DVec3::new(label_x, LABEL_RAISED_Y, label_z),
                LABEL_SIZE_RAISED,
            )
        } else {
            (1.0, 0.0, DVec3::new(label_x, 0.0, label_z), LABEL_SIZE_RESTING)
        };

        Self {
            border,
            emissive,
            intensity,
            top_scale,
            top_offset,
            label_position,
            label_size,
            hover_z: if state.hovered { config.hover_depth } else { 0.0 },
        }
    }
}

/// Animated state of the field's decoration.
#[derive(Debug, Clone, Copy)]
struct InputVisuals {
    border: Animated<Color>,
    emissive: Animated<Color>,
    intensity: Animated<f64>,
    top_scale: Animated<f64>,
    top_offset: Animated<f64>,
    label_position: Animated<DVec3>,
    label_size: Animated<f64>,
    hover_z: Animated<f64>,
}

impl InputVisuals {
    fn initial(config: &InputConfig) -> Self {
        Self {
            border: Animated::new(theme::BORDER_INITIAL, rates::BORDER),
            emissive: Animated::new(theme::GLOW_NONE, rates::DEFAULT),
            intensity: Animated::new(0.0, rates::DEFAULT),
            top_scale: Animated::new(1.0, rates::DEFAULT),
            top_offset: Animated::new(0.0, rates::DEFAULT),
            label_position: Animated::new(DVec3::new(-config.width / 2.0 + 0.05, 0.0, 0.2), rates::DEFAULT),
            label_size: Animated::new(LABEL_SIZE_RESTING, rates::DEFAULT),
            hover_z: Animated::new(0.0, rates::DEFAULT),
        }
    }

    fn next(self, targets: &VisualTargets) -> Self {
        Self {
            border: self.border.advanced(targets.border),
            emissive: self.emissive.advanced(targets.emissive),
            intensity: self.intensity.advanced(targets.intensity),
            top_scale: self.top_scale.advanced(targets.top_scale),
            top_offset: self.top_offset.advanced(targets.top_offset),
            label_position: self.label_position.advanced(targets.label_position),
            label_size: self.label_size.advanced(targets.label_size),
            hover_z: self.hover_z.advanced(targets.hover_z),
        }
    }
}

/// Keystroke handling of a text field: Backspace deletes the last character,
/// any single printable key is appended.
fn edit_text(event: &KeyEvent, current: Option<&FieldValue>) -> Option<FieldValue> {
    let KeyEvent::Pressed(key) = event else {
        return None;
    };
    let mut text = current.and_then(FieldValue::as_text).unwrap_or_default().to_string();
    if key == "Backspace" {
        text.pop();
    } else {
        text.push(event.printable()?);
    }
    Some(FieldValue::Text(text))
}

/// A text field.
#[derive(Debug)]
pub struct Input {
    config: InputConfig,
    ctx: Option<WidgetContext>,
    interaction: Interaction,
    visuals: InputVisuals,
    text_width: f64,
    caret_on: bool,
}

impl Input {
    pub fn new(config: InputConfig) -> Self {
        let visuals = InputVisuals::initial(&config);
        Self {
            config,
            ctx: None,
            interaction: Interaction::default(),
            visuals,
            text_width: 0.0,
            caret_on: false,
        }
    }

    /// Field with default dimensions.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(InputConfig::named(name))
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Current label font size.
    pub fn label_size(&self) -> f64 {
        self.visuals.label_size.value()
    }

    /// Current border color.
    pub fn border_color(&self) -> Color {
        self.visuals.border.value()
    }

    /// Whether the caret is drawn this frame.
    pub fn caret_shown(&self) -> bool {
        self.caret_on
    }

    fn context(&self) -> FormResult<&WidgetContext> {
        let ctx = self.ctx.as_ref().ok_or(FormError::OutsideProvider)?;
        ctx.require()?;
        Ok(ctx)
    }

    fn border(&self, size: DVec3, position: DVec3) -> SceneNode {
        let material = Material::color(self.visuals.border.value())
            .with_emissive(self.visuals.emissive.value(), self.visuals.intensity.value() as f32);
        SceneNode::cuboid(size, material).at(position)
    }
}

impl Widget for Input {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Input
    }

    fn field_name(&self) -> Option<&str> {
        Some(&self.config.name)
    }

    fn mount(&mut self, ctx: WidgetContext) -> FormResult<()> {
        if self.config.name.is_empty() {
            return Err(FormError::InvalidConfig("input field needs a name".to_string()));
        }
        ctx.require()?;
        let name = self.config.name.clone();
        ctx.form.with_mut(|store| -> FormResult<()> {
            store.register_field(&name)?;
            let handler: KeyHandler = Rc::new(edit_text);
            store.register_key_handler(&name, handler);
            Ok(())
        })??;
        self.ctx = Some(ctx);
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            release_on_unmount(&ctx, &self.config.name);
        }
        self.interaction = Interaction::default();
    }

    fn set_layout(&mut self, width: f64, _y_offset: f64) {
        self.config.width = width;
    }

    fn pointer(&mut self, event: PointerEvent) -> FormResult<Propagation> {
        let ctx = self.context()?;
        let propagation = match event {
            PointerEvent::Down { .. } => {
                ctx.form.with_mut(|store| store.set_focused_field(Some(&self.config.name)))?;
                Propagation::Stop
            }
            PointerEvent::Click { .. } => Propagation::Stop,
            _ => Propagation::Continue,
        };
        self.interaction.apply(&event);
        Ok(propagation)
    }

    fn tick(&mut self, frame: &Frame, host: &dyn RenderHost) -> FormResult<()> {
        let name = &self.config.name;
        let (focused, text) = self
            .context()?
            .form
            .with(|store| (store.is_focused(name), store.text(name).to_string()))?;

        let label_width = host.text_size(name, self.visuals.label_size.value()).width * 1.5;
        let targets = VisualTargets::resolve(&self.config, self.interaction, focused, !text.is_empty(), label_width);
        self.visuals = self.visuals.next(&targets);
        self.text_width = host.text_size(&text, VALUE_FONT_SIZE).width;
        self.caret_on = focused && caret_visible(frame.elapsed);
        Ok(())
    }

    fn render(&self) -> FormResult<SceneNode> {
        let name = &self.config.name;
        let (focused, text) = self
            .context()?
            .form
            .with(|store| (store.is_focused(name), store.text(name).to_string()))?;

        let InputConfig {
            width,
            height,
            border_width: bw,
            border_depth: bd,
            ..
        } = self.config;
        let z = bd / 2.0;

        let top = self
            .border(DVec3::new(width, bw, bd), DVec3::new(self.visuals.top_offset.value(), height / 2.0 + bw / 2.0, z))
            .scaled(DVec3::new(self.visuals.top_scale.value(), 1.0, 1.0))
            .named("border-top");
        let bottom = self
            .border(DVec3::new(width + bw * 2.0, bw, bd), DVec3::new(0.0, -(height / 2.0 + bw / 2.0), z))
            .named("border-bottom");
        let left = self
            .border(DVec3::new(bw, height + bw * 2.0, bd), DVec3::new(-(width / 2.0 + bw / 2.0), 0.0, z))
            .named("border-left");
        let right = self
            .border(DVec3::new(bw, height + bw * 2.0, bd), DVec3::new(width / 2.0 + bw / 2.0, 0.0, z))
            .named("border-right");

        let label = SceneNode::text(name.as_str(), self.visuals.label_size.value(), TextAnchor::Left, theme::TEXT)
            .at(self.visuals.label_position.value())
            .named("label");

        let background = SceneNode::cuboid(DVec3::new(width, height, 0.01), Material::color(theme::FIELD_BG))
            .at(DVec3::new(0.0, 0.0, z - 0.01))
            .visible(self.config.show_field_background)
            .named("field-background");

        let value = SceneNode::text(text, VALUE_FONT_SIZE, TextAnchor::Left, theme::TEXT)
            .at(DVec3::new(-width / 2.0 + 0.2, 0.0, z))
            .named("value");

        let mut node = SceneNode::group()
            .at(DVec3::new(0.0, 0.0, self.visuals.hover_z.value()))
            .with_children([top, bottom, left, right, label, background, value]);

        if focused {
            let caret = SceneNode::cuboid(DVec3::new(0.08, height * 0.7, 0.05), Material::color(theme::TEXT))
                .at(DVec3::new(self.text_width - width / 2.0 + 0.3, 0.0, z))
                .visible(self.caret_on)
                .named("caret");
            node = node.child(caret);
        }
        Ok(node)
    }
}
