//! "?" icon that expands into an info box.
//!
//! Only one tooltip of a form is expanded at a time: expanding goes through
//! the shared [`r3form_core::UiCoordinator`], which collapses the previous
//! one. Expanding also asks the form's camera rig to frame the tooltip.

use std::cell::Cell;
use std::f64::consts::PI;
use std::rc::Rc;

use glam::DVec3;
use r3form_core::{
    Animated, FormError, FormResult, Frame, Geometry, Material, PointerEvent, Propagation,
    RenderHost, SceneNode, TooltipId,
};
use serde::{Deserialize, Serialize};

use crate::widget::{Interaction, Widget, WidgetContext, WidgetKind};
use crate::{rates, theme};

const ICON: &str = "?";
const ICON_SIZE: f64 = 0.2;
const TEXT_SIZE: f64 = 0.15;
const TEXT_DEPTH: f64 = 0.01;
const BOX_HEIGHT: f64 = 0.6;
const BOX_DEPTH: f64 = 0.1;
const BOX_PADDING: f64 = 0.5;
/// Where the collapsed info box waits, behind the camera.
const BOX_PARKED_Z: f64 = 20.0;

/// Tooltip configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub text: String,
    /// Icon position within the row.
    pub position: DVec3,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            text: "This is a tooltip".to_string(),
            position: DVec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TooltipVisuals {
    lift: Animated<f64>,
    scale: Animated<DVec3>,
    spin: Animated<f64>,
    box_position: Animated<DVec3>,
}

/// An expandable info icon.
#[derive(Debug)]
pub struct Tooltip {
    id: TooltipId,
    config: TooltipConfig,
    ctx: Option<WidgetContext>,
    interaction: Interaction,
    expanded: Rc<Cell<bool>>,
    visuals: TooltipVisuals,
    y_offset: f64,
    box_width: f64,
    icon_center: DVec3,
}

impl Tooltip {
    pub fn new(config: TooltipConfig) -> Self {
        let p = config.position;
        let visuals = TooltipVisuals {
            lift: Animated::new(0.0, rates::DEFAULT),
            scale: Animated::new(DVec3::ONE, rates::DEFAULT),
            spin: Animated::new(0.0, rates::DEFAULT),
            box_position: Animated::new(DVec3::new(p.x + 0.5, p.y, BOX_PARKED_Z), rates::DEFAULT),
        };
        Self {
            id: TooltipId::new(),
            config,
            ctx: None,
            interaction: Interaction::default(),
            expanded: Rc::new(Cell::new(false)),
            visuals,
            y_offset: 0.0,
            box_width: 1.5,
            icon_center: DVec3::ZERO,
        }
    }

    /// Tooltip showing `text` at the row origin.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(TooltipConfig {
            text: text.into(),
            ..TooltipConfig::default()
        })
    }

    pub fn id(&self) -> TooltipId {
        self.id
    }

    pub fn config(&self) -> &TooltipConfig {
        &self.config
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.get()
    }

    /// Current width of the info box.
    pub fn box_width(&self) -> f64 {
        self.box_width
    }

    /// Current position of the info box.
    pub fn box_position(&self) -> DVec3 {
        self.visuals.box_position.value()
    }

    /// Current icon scale.
    pub fn scale(&self) -> DVec3 {
        self.visuals.scale.value()
    }

    fn context(&self) -> FormResult<&WidgetContext> {
        let ctx = self.ctx.as_ref().ok_or(FormError::OutsideProvider)?;
        ctx.require()?;
        Ok(ctx)
    }

    fn expand(&self, ctx: &WidgetContext) {
        let expanded = Rc::clone(&self.expanded);
        expanded.set(true);
        ctx.ui.activate(self.id, Box::new(move || expanded.set(false)));

        let x = self.config.position.x;
        ctx.ui.request_camera(
            DVec3::new(x, self.y_offset, 6.0),
            DVec3::new(x / 2.0, self.y_offset, 0.0),
        );
    }
}

impl Widget for Tooltip {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Tooltip
    }

    fn mount(&mut self, ctx: WidgetContext) -> FormResult<()> {
        ctx.require()?;
        self.ctx = Some(ctx);
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            ctx.ui.release(self.id);
        }
        self.expanded.set(false);
        self.interaction = Interaction::default();
    }

    fn set_layout(&mut self, _width: f64, y_offset: f64) {
        self.y_offset = y_offset;
    }

    fn pointer(&mut self, event: PointerEvent) -> FormResult<Propagation> {
        let ctx = self.context()?;
        let propagation = match event {
            PointerEvent::Click { .. } => {
                self.expand(ctx);
                Propagation::Stop
            }
            _ => Propagation::Continue,
        };
        self.interaction.apply(&event);
        Ok(propagation)
    }

    fn tick(&mut self, frame: &Frame, host: &dyn RenderHost) -> FormResult<()> {
        self.context()?;
        let expanded = self.expanded.get();
        let p = self.config.position;

        let (lift, scale, spin, box_position) = if expanded {
            (0.5, 2.0, frame.elapsed * PI, DVec3::new(p.x + 1.0, p.y, p.z + 1.0))
        } else {
            let scale = if self.interaction.hovered { 1.2 } else { 1.0 };
            (0.0, scale, 0.0, DVec3::new(0.0, 0.0, BOX_PARKED_Z))
        };

        let visuals = self.visuals;
        self.visuals = TooltipVisuals {
            lift: visuals.lift.advanced(lift),
            scale: visuals.scale.advanced(DVec3::splat(scale)),
            spin: visuals.spin.advanced(spin),
            box_position: visuals.box_position.advanced(box_position),
        };

        if expanded {
            self.box_width = host.text_size(&self.config.text, TEXT_SIZE).width + BOX_PADDING;
        }
        let icon = host.text_size(ICON, ICON_SIZE);
        self.icon_center = DVec3::new(icon.width / 2.0, icon.height / 2.0, TEXT_DEPTH / 2.0);
        Ok(())
    }

    fn render(&self) -> FormResult<SceneNode> {
        self.context()?;
        let glowing = Material::color(theme::TOOLTIP_TEXT).with_emissive(theme::TOOLTIP_TEXT, 0.5);

        let glyph = SceneNode::mesh(
            Geometry::Text3D {
                content: ICON.to_string(),
                size: ICON_SIZE,
                depth: TEXT_DEPTH,
            },
            glowing,
        )
        .at(-self.icon_center);

        let icon = SceneNode::group()
            .named("icon")
            .at(self.config.position + DVec3::new(0.0, 0.0, self.visuals.lift.value()))
            .scaled(self.visuals.scale.value())
            .rotated_y(self.visuals.spin.value())
            .child(glyph);

        let panel = SceneNode::cuboid(
            DVec3::new(self.box_width, BOX_HEIGHT, BOX_DEPTH),
            Material::color(theme::TOOLTIP_BOX).with_emissive(theme::TOOLTIP_BOX_GLOW, 1.0),
        )
        .shadows(false, false);

        let text = SceneNode::mesh(
            Geometry::Text3D {
                content: self.config.text.clone(),
                size: TEXT_SIZE,
                depth: TEXT_DEPTH,
            },
            glowing,
        )
        .at(DVec3::new(-self.box_width / 2.0 + BOX_PADDING / 2.0, -TEXT_SIZE / 2.0, 0.06))
        .shadows(false, false);

        let info = SceneNode::group()
            .named("info-box")
            .at(self.visuals.box_position.value())
            .with_children([panel, text]);

        Ok(SceneNode::group().with_children([icon, info]))
    }
}
