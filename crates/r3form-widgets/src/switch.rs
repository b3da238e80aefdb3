//! Labelled on/off toggle.

use glam::DVec3;
use peniko::Color;
use r3form_core::{
    Animated, FormError, FormResult, Frame, Material, PointerEvent, Propagation, RenderHost,
    SceneNode, TextAnchor,
};
use serde::{Deserialize, Serialize};

use crate::widget::{Interaction, Widget, WidgetContext, WidgetKind, release_on_unmount};
use crate::{rates, theme};

const LABEL_FONT_SIZE: f64 = 0.4;

/// Switch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchConfig {
    pub name: String,
    /// Width of the whole row; the label sits on the left edge.
    pub width: f64,
    /// Width of the track on the right edge.
    pub switch_width: f64,
    pub height: f64,
    pub border_width: f64,
    pub border_depth: f64,
    /// Width of the sliding handle.
    pub toggle_width: f64,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            width: 6.0,
            switch_width: 1.2,
            height: 0.5,
            border_width: 0.05,
            border_depth: 0.1,
            toggle_width: 0.6,
        }
    }
}

impl SwitchConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn handle_x(&self, enabled: bool) -> f64 {
        let travel = self.switch_width / 2.0 - self.toggle_width / 2.0;
        if enabled { travel } else { -travel }
    }
}

#[derive(Debug, Clone, Copy)]
struct SwitchVisuals {
    handle_x: Animated<f64>,
    border: Animated<Color>,
    emissive: Animated<Color>,
    intensity: Animated<f64>,
    track_glow: Animated<f64>,
}

/// An on/off toggle bound to a flag field.
#[derive(Debug)]
pub struct Switch {
    config: SwitchConfig,
    ctx: Option<WidgetContext>,
    interaction: Interaction,
    visuals: SwitchVisuals,
    enabled: bool,
}

impl Switch {
    pub fn new(config: SwitchConfig) -> Self {
        let visuals = SwitchVisuals {
            handle_x: Animated::new(config.handle_x(false), rates::HANDLE),
            border: Animated::new(theme::BORDER_INITIAL, rates::BORDER),
            emissive: Animated::new(theme::GLOW_NONE, rates::DEFAULT),
            intensity: Animated::new(0.0, rates::DEFAULT),
            track_glow: Animated::new(0.0, rates::DEFAULT),
        };
        Self {
            config,
            ctx: None,
            interaction: Interaction::default(),
            visuals,
            enabled: false,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(SwitchConfig::named(name))
    }

    pub fn config(&self) -> &SwitchConfig {
        &self.config
    }

    /// Current handle position along the track.
    pub fn handle_x(&self) -> f64 {
        self.visuals.handle_x.value()
    }

    /// Current track glow intensity.
    pub fn track_glow(&self) -> f64 {
        self.visuals.track_glow.value()
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

impl Widget for Switch {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Switch
    }

    fn field_name(&self) -> Option<&str> {
        Some(&self.config.name)
    }

    fn mount(&mut self, ctx: WidgetContext) -> FormResult<()> {
        if self.config.name.is_empty() {
            return Err(FormError::InvalidConfig("switch needs a name".to_string()));
        }
        ctx.require()?;
        ctx.form.with_mut(|store| store.register_field(&self.config.name))??;
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
        if event.is_down() {
            let name = &self.config.name;
            let enabled = ctx.form.with_mut(|store| {
                let next = !store.flag(name);
                store.set_value(name, next);
                next
            })?;
            log::debug!("Switch {name:?} turned {}", if enabled { "on" } else { "off" });
        }
        self.interaction.apply(&event);
        Ok(Propagation::Continue)
    }

    fn tick(&mut self, _frame: &Frame, _host: &dyn RenderHost) -> FormResult<()> {
        let name = &self.config.name;
        let enabled = self.context()?.form.with(|store| store.flag(name))?;
        let hovered = self.interaction.hovered;

        let border = if enabled {
            theme::ACCENT
        } else if hovered {
            theme::BORDER_HOVER
        } else {
            theme::BORDER_IDLE
        };
        let emissive = if hovered { theme::ACCENT } else { theme::GLOW_NONE };
        let intensity = if enabled {
            1.5
        } else if hovered {
            0.2
        } else {
            0.0
        };

        let visuals = self.visuals;
        self.visuals = SwitchVisuals {
            handle_x: visuals.handle_x.advanced(self.config.handle_x(enabled)),
            border: visuals.border.advanced(border),
            emissive: visuals.emissive.advanced(emissive),
            intensity: visuals.intensity.advanced(intensity),
            track_glow: visuals.track_glow.advanced(if enabled { 1.5 } else { 0.2 }),
        };
        self.enabled = enabled;
        Ok(())
    }

    fn render(&self) -> FormResult<SceneNode> {
        self.context()?;
        let SwitchConfig {
            width,
            switch_width: sw,
            height,
            border_width: bw,
            border_depth: bd,
            toggle_width,
            ..
        } = self.config;
        let z = bd / 2.0;
        let fill = if self.enabled { theme::ACCENT } else { theme::TRACK_OFF };

        let label = SceneNode::text(self.config.name.as_str(), LABEL_FONT_SIZE, TextAnchor::Left, theme::TEXT)
            .at(DVec3::new(-width / 2.0 - bw / 2.0, 0.0, 0.1))
            .named("label");

        let track = SceneNode::cuboid(
            DVec3::new(sw, height, 0.01),
            Material::color(fill).with_emissive(theme::TRACK_GLOW, self.visuals.track_glow.value() as f32),
        )
        .named("track");

        let handle = SceneNode::cuboid(DVec3::new(toggle_width, height, bd), Material::color(fill))
            .at(DVec3::new(self.visuals.handle_x.value(), 0.0, z))
            .named("handle");

        let switch = SceneNode::group()
            .at(DVec3::new(width / 2.0 - sw / 2.0, 0.0, 0.0))
            .with_children([
                self.border(DVec3::new(sw, bw, bd), DVec3::new(0.0, height / 2.0 + bw / 2.0, z)),
                self.border(DVec3::new(sw, bw, bd), DVec3::new(0.0, -(height / 2.0 + bw / 2.0), z)),
                self.border(DVec3::new(bw, height + bw * 2.0, bd), DVec3::new(-(sw / 2.0 + bw / 2.0), 0.0, z)),
                self.border(DVec3::new(bw, height + bw * 2.0, bd), DVec3::new(sw / 2.0 + bw / 2.0, 0.0, z)),
                track,
                handle,
            ]);

        Ok(SceneNode::group().with_children([label, switch]))
    }
}
