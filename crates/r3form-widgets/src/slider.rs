//! Labelled rail with a knob, storing a value in `[0, 1]`.

use glam::DVec3;
use r3form_core::{
    Animated, FormError, FormResult, Frame, Geometry, Material, PointerEvent, Propagation,
    RenderHost, SceneNode, TextAnchor,
};
use serde::{Deserialize, Serialize};

use crate::widget::{Interaction, Widget, WidgetContext, WidgetKind, release_on_unmount};
use crate::{rates, theme};

const LABEL_FONT_SIZE: f64 = 0.4;

/// Slider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    pub name: String,
    /// Width of the whole row; the rail takes `width - 2` on the right.
    pub width: f64,
    pub knob_radius: f64,
    pub rail_thickness: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            width: 4.0,
            knob_radius: 0.4,
            rail_thickness: 0.1,
        }
    }
}

impl SliderConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Length of the rail.
    pub fn rail_length(&self) -> f64 {
        (self.width - 2.0).max(0.0)
    }

    /// Horizontal center of the rail in widget coordinates.
    pub fn rail_center(&self) -> f64 {
        self.width / 2.0 - self.rail_length() / 2.0
    }

    /// Map a widget-local x coordinate onto the rail, clamped into `[0, 1]`.
    ///
    /// Returns `None` for points beyond the rail ends (plus the knob radius)
    /// or when the rail has no length.
    pub fn value_at(&self, x: f64) -> Option<f64> {
        let rail = self.rail_length();
        if rail <= 0.0 {
            return None;
        }
        let local = x - self.rail_center();
        if local.abs() > rail / 2.0 + self.knob_radius {
            return None;
        }
        Some(((local + rail / 2.0) / rail).clamp(0.0, 1.0))
    }

    fn knob_x(&self, value: f64) -> f64 {
        let rail = self.rail_length();
        -rail / 2.0 + value.clamp(0.0, 1.0) * rail
    }
}

/// A slider bound to a number field.
#[derive(Debug)]
pub struct Slider {
    config: SliderConfig,
    ctx: Option<WidgetContext>,
    interaction: Interaction,
    knob_x: Animated<f64>,
}

impl Slider {
    pub fn new(config: SliderConfig) -> Self {
        let knob_x = Animated::new(config.knob_x(0.0), rates::KNOB);
        Self {
            config,
            ctx: None,
            interaction: Interaction::default(),
            knob_x,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(SliderConfig::named(name))
    }

    pub fn config(&self) -> &SliderConfig {
        &self.config
    }

    /// Current knob position along the rail.
    pub fn knob_x(&self) -> f64 {
        self.knob_x.value()
    }

    fn context(&self) -> FormResult<&WidgetContext> {
        let ctx = self.ctx.as_ref().ok_or(FormError::OutsideProvider)?;
        ctx.require()?;
        Ok(ctx)
    }
}

impl Widget for Slider {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Slider
    }

    fn field_name(&self) -> Option<&str> {
        Some(&self.config.name)
    }

    fn mount(&mut self, ctx: WidgetContext) -> FormResult<()> {
        if self.config.name.is_empty() {
            return Err(FormError::InvalidConfig("slider needs a name".to_string()));
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
        let mut propagation = Propagation::Continue;
        if let PointerEvent::Down { position } = event {
            match self.config.value_at(position.x) {
                Some(value) => {
                    ctx.form.with_mut(|store| store.set_value(&self.config.name, value))?;
                    propagation = Propagation::Stop;
                }
                None => log::warn!(
                    "Ignoring pointer at x = {} outside the rail of slider {:?}",
                    position.x,
                    self.config.name
                ),
            }
        }
        self.interaction.apply(&event);
        Ok(propagation)
    }

    fn tick(&mut self, _frame: &Frame, _host: &dyn RenderHost) -> FormResult<()> {
        let name = &self.config.name;
        let value = self.context()?.form.with(|store| store.number(name))?;
        let target = self.config.knob_x(value);
        self.knob_x = self.knob_x.advanced(target);
        Ok(())
    }

    fn render(&self) -> FormResult<SceneNode> {
        self.context()?;
        let SliderConfig {
            width,
            knob_radius,
            rail_thickness,
            ..
        } = self.config;

        let label = SceneNode::text(self.config.name.as_str(), LABEL_FONT_SIZE, TextAnchor::Left, theme::TEXT)
            .at(DVec3::new(-width / 2.0, 0.0, 0.1))
            .named("label");

        let knob = SceneNode::mesh(Geometry::Sphere { radius: knob_radius }, Material::color(theme::KNOB))
            .at(DVec3::new(self.knob_x.value(), 0.0, 0.0))
            .named("knob");

        let rail = SceneNode::cuboid(
            DVec3::new(self.config.rail_length(), rail_thickness, rail_thickness),
            Material::color(theme::RAIL),
        )
        .named("rail");

        let track = SceneNode::group()
            .at(DVec3::new(self.config.rail_center(), 0.0, 0.0))
            .with_children([knob, rail]);

        Ok(SceneNode::group().with_children([label, track]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use r3form_core::{FormProvider, HeadlessHost, UiCoordinator};

    fn down_at(x: f64) -> PointerEvent {
        PointerEvent::Down {
            position: DVec3::new(x, 0.0, 0.0),
        }
    }

    #[test]
    fn test_value_at_maps_rail_ends() {
        // Rail of length 2 centered at x = 1.
        let config = SliderConfig::named("volume");
        assert!((config.value_at(0.0).unwrap() - 0.0).abs() < 1e-9);
        assert!((config.value_at(1.0).unwrap() - 0.5).abs() < 1e-9);
        assert!((config.value_at(2.0).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_value_at_clamps_near_ends() {
        let config = SliderConfig::named("volume");
        assert_eq!(config.value_at(-0.3), Some(0.0));
        assert_eq!(config.value_at(2.3), Some(1.0));
        assert_eq!(config.value_at(-1.0), None);
        assert_eq!(config.value_at(3.5), None);
    }

    #[test]
    fn test_pointer_down_stores_value() {
        let provider = FormProvider::new();
        let mut slider = Slider::named("volume");
        slider
            .mount(WidgetContext::new(provider.context(), UiCoordinator::new()))
            .unwrap();

        assert_eq!(slider.pointer(down_at(1.5)).unwrap(), Propagation::Stop);
        let value = provider.context().with(|store| store.number("volume")).unwrap();
        assert!((value - 0.75).abs() < 1e-9);

        assert_eq!(slider.pointer(down_at(-2.0)).unwrap(), Propagation::Continue);
        let value = provider.context().with(|store| store.number("volume")).unwrap();
        assert!((value - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_knob_follows_value() {
        let provider = FormProvider::new();
        let mut slider = Slider::named("volume");
        slider
            .mount(WidgetContext::new(provider.context(), UiCoordinator::new()))
            .unwrap();
        assert!((slider.knob_x() + 1.0).abs() < 1e-9);

        slider.pointer(down_at(2.0)).unwrap();
        let host = HeadlessHost::default();
        let mut previous = slider.knob_x();
        for _ in 0..150 {
            slider.tick(&Frame::default(), &host).unwrap();
            assert!(slider.knob_x() >= previous);
            assert!(slider.knob_x() <= 1.0 + 1e-12);
            previous = slider.knob_x();
        }
        assert!((slider.knob_x() - 1.0).abs() < 1e-6);
    }
}
