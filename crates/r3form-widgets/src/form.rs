//! The form container.
//!
//! A [`Form`] owns the store provider, the UI coordinator, the layout engine
//! and the camera rig, and stacks its children over a background panel. The
//! host drives it with [`Form::pointer`], [`Form::key`] and [`Form::tick`],
//! and draws whatever [`Form::render`] returns.

use glam::DVec3;
use kurbo::Rect;
use peniko::Color;
use r3form_core::{
    CameraRig, FormConfig, FormContext, FormError, FormProvider, FormResult, FormStore,
    FormValues, Frame, FrameClock, Geometry, KeyEvent, LayoutEngine, LayoutPhase, Material,
    NodeKind, PointerEvent, Propagation, RenderHost, SceneNode, UiCoordinator, camera_distance,
    place,
};

use crate::widget::{Widget, WidgetContext, WidgetKind};

/// What a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// The child at this composition index.
    Child(usize),
    /// The background panel.
    Background,
}

/// Builder for [`Form`].
pub struct FormBuilder {
    config: FormConfig,
    children: Vec<Box<dyn Widget>>,
    store: FormStore,
}

impl FormBuilder {
    pub fn new(config: FormConfig) -> Self {
        Self {
            config,
            children: Vec::new(),
            store: FormStore::new(),
        }
    }

    /// Append a child. Children are stacked top to bottom in call order.
    pub fn child(mut self, widget: impl Widget + 'static) -> Self {
        self.children.push(Box::new(widget));
        self
    }

    /// Append an already boxed child.
    pub fn boxed_child(mut self, widget: Box<dyn Widget>) -> Self {
        self.children.push(widget);
        self
    }

    /// Receive a snapshot of the values when the form is submitted.
    pub fn on_submit(mut self, on_submit: impl FnMut(FormValues) + 'static) -> Self {
        self.store.set_submit_handler(Some(Box::new(on_submit)));
        self
    }

    /// Validate the configuration and mount every child.
    pub fn build(self) -> FormResult<Form> {
        self.config.validate()?;

        let provider = FormProvider::with_store(self.store);
        let ui = UiCoordinator::new();
        let mut children = self.children;

        let ctx = WidgetContext::new(provider.context(), ui.clone());
        for index in 0..children.len() {
            if let Err(err) = children[index].mount(ctx.clone()) {
                log::warn!("Failed to mount form child {index}: {err}");
                for mounted in &mut children[..index] {
                    mounted.unmount();
                }
                return Err(err);
            }
        }

        let layout = LayoutEngine::new(children.len(), self.config.gap, self.config.padding);
        let height = layout.container_height();
        let camera = CameraRig::new(place(
            &self.config.camera,
            camera_distance(height, self.config.zoom),
            height,
        ));

        let mut form = Form {
            config: self.config,
            provider,
            ui,
            children,
            layout,
            camera,
            clock: FrameClock::new(),
            pressed: None,
            placed_height: height,
        };
        form.apply_layout();
        log::debug!("Form built with {} child(ren)", form.children.len());
        Ok(form)
    }
}

/// A mounted form.
pub struct Form {
    config: FormConfig,
    provider: FormProvider,
    ui: UiCoordinator,
    children: Vec<Box<dyn Widget>>,
    layout: LayoutEngine,
    camera: CameraRig,
    clock: FrameClock,
    pressed: Option<HitTarget>,
    /// Container height the camera was last placed for.
    placed_height: f64,
}

impl Form {
    /// Start building a form.
    pub fn builder(config: FormConfig) -> FormBuilder {
        FormBuilder::new(config)
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// A handle on the form's store.
    pub fn context(&self) -> FormContext {
        self.provider.context()
    }

    pub fn ui(&self) -> &UiCoordinator {
        &self.ui
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Kinds of the children in composition order.
    pub fn child_kinds(&self) -> Vec<WidgetKind> {
        self.children.iter().map(|child| child.kind()).collect()
    }

    /// Index of the child bound to field `name`.
    pub fn child_index(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|child| child.field_name() == Some(name))
    }

    /// Snapshot of the current values.
    pub fn values(&self) -> FormResult<FormValues> {
        self.context().with(|store| store.values().clone())
    }

    /// Name of the focused field.
    pub fn focused_field(&self) -> FormResult<Option<String>> {
        self.context()
            .with(|store| store.focused_field().map(str::to_string))
    }

    /// Submit the form as the submit button would.
    pub fn submit(&self) -> FormResult<()> {
        self.context().with_mut(FormStore::submit)
    }

    pub fn layout_phase(&self) -> &LayoutPhase {
        self.layout.phase()
    }

    /// Vertical offset of each child.
    pub fn offsets(&self) -> Vec<f64> {
        self.layout.offsets()
    }

    /// Height of the container, padding included.
    pub fn container_height(&self) -> f64 {
        self.layout.container_height()
    }

    pub fn camera_position(&self) -> DVec3 {
        self.camera.position()
    }

    pub fn camera_look_at(&self) -> DVec3 {
        self.camera.look_at()
    }

    /// Color the host should clear the viewport with.
    pub fn clear_color(&self) -> Color {
        self.config.background_color
    }

    /// Elapsed time of the form's clock.
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    /// Route a pointer event.
    ///
    /// A child sees the event first. Unless it stops propagation, the
    /// background sees it next; a pointer-down on the background clears
    /// focus. Pointer-down followed by pointer-up on the same child is also
    /// delivered to that child as a click.
    pub fn pointer(&mut self, target: HitTarget, event: PointerEvent) -> FormResult<Propagation> {
        let index = match target {
            HitTarget::Background => {
                self.track_press(target, &event);
                self.background_pointer(&event)?;
                return Ok(Propagation::Stop);
            }
            HitTarget::Child(index) => index,
        };

        if index >= self.children.len() {
            return Err(FormError::UnknownChild(index));
        }
        let clicked = self.track_press(target, &event);
        let child = &mut self.children[index];

        let propagation = child.pointer(event)?;
        if let Some(position) = clicked {
            child.pointer(PointerEvent::Click { position })?;
        }

        if propagation == Propagation::Continue {
            self.background_pointer(&event)?;
        }
        Ok(propagation)
    }

    /// Route a key event to the field holding the keyboard.
    ///
    /// Returns `false` when no field is focused.
    pub fn key(&mut self, event: &KeyEvent) -> FormResult<bool> {
        self.context().with_mut(|store| store.dispatch_key(event))
    }

    /// Advance one frame of `dt` seconds.
    ///
    /// Children are ticked and re-measured through `host`. When a height
    /// differs from the recorded one, the new offsets are pushed to every
    /// child before the camera moves.
    pub fn tick(&mut self, dt: f64, host: &dyn RenderHost) -> FormResult<Frame> {
        let frame = self.clock.tick(dt);
        for child in &mut self.children {
            child.tick(&frame, host)?;
        }

        let mut changed = false;
        for index in 0..self.children.len() {
            let height = self.child_extent(index, host)?.map_or(0.0, |extent| extent.height());
            changed |= self.layout.register_measurement(index, height)?;
        }
        if changed {
            log::debug!("Layout changed: {:?}", self.layout.phase());
            self.apply_layout();
        }

        if let Some(request) = self.ui.take_camera_request() {
            self.camera.set_target(request.position, request.look_at);
        }
        self.camera.tick();
        Ok(frame)
    }

    /// Forget the height of child `index`, returning the form to provisional
    /// rows until the next tick measures it again.
    pub fn invalidate_child(&mut self, index: usize) -> FormResult<()> {
        if index >= self.children.len() {
            return Err(FormError::UnknownChild(index));
        }
        if self.layout.invalidate(index)? {
            self.apply_layout();
        }
        Ok(())
    }

    /// Describe the whole scene: lights, background panel and the children at
    /// their offsets.
    pub fn render(&self) -> FormResult<SceneNode> {
        let config = &self.config;

        let ambient = SceneNode::light(NodeKind::AmbientLight { intensity: 0.8 }).named("ambient-light");
        let directional = SceneNode::light(NodeKind::DirectionalLight {
            intensity: 0.4,
            shadow_map_size: 4096,
        })
        .named("directional-light")
        .at(DVec3::new(15.0, 20.0, 40.0))
        .shadows(true, false);

        let mut panel = Material::color(config.form_color);
        panel.metalness = 0.1;
        panel.roughness = 0.8;
        let background = SceneNode::mesh(
            Geometry::Plane {
                width: config.width + config.padding * 2.0,
                height: self.layout.container_height(),
            },
            panel,
        )
        .named("background")
        .visible(config.background);

        let mut scene = SceneNode::group()
            .named("form")
            .with_children([ambient, directional, background]);

        for (index, child) in self.children.iter().enumerate() {
            let offset = self.layout.offset(index).unwrap_or_default();
            scene = scene.child(
                SceneNode::group()
                    .named(format!("child-{index}"))
                    .at(DVec3::new(0.0, offset, 0.0))
                    .child(child.render()?),
            );
        }

        if !config.shadows {
            disable_shadows(&mut scene);
        }
        Ok(scene)
    }

    fn child_extent(&self, index: usize, host: &dyn RenderHost) -> FormResult<Option<Rect>> {
        let child = self.children.get(index).ok_or(FormError::UnknownChild(index))?;
        Ok(host.extent(&child.render()?))
    }

    /// Remember where the pointer went down; on pointer-up over the same
    /// target, return the position of the resulting click.
    fn track_press(&mut self, target: HitTarget, event: &PointerEvent) -> Option<DVec3> {
        match *event {
            PointerEvent::Down { .. } => {
                self.pressed = Some(target);
                None
            }
            PointerEvent::Up { position } => {
                (self.pressed.take() == Some(target) && target != HitTarget::Background).then_some(position)
            }
            _ => None,
        }
    }

    fn background_pointer(&mut self, event: &PointerEvent) -> FormResult<()> {
        if event.is_down() {
            self.context().with_mut(|store| store.set_focused_field(None))?;
        }
        Ok(())
    }

    fn apply_layout(&mut self) {
        let width = self.config.width;
        for (index, child) in self.children.iter_mut().enumerate() {
            child.set_layout(width, self.layout.offset(index).unwrap_or_default());
        }

        let height = self.layout.container_height();
        if (height - self.placed_height).abs() > f64::EPSILON {
            self.placed_height = height;
            if !self.camera.is_active() {
                let position = place(&self.config.camera, camera_distance(height, self.config.zoom), height);
                log::debug!("Camera placed at {position} for container height {height}");
                self.camera.reset(position);
            }
        }
    }
}

impl Drop for Form {
    fn drop(&mut self) {
        for child in &mut self.children {
            child.unmount();
        }
    }
}

fn disable_shadows(node: &mut SceneNode) {
    node.cast_shadow = false;
    node.receive_shadow = false;
    for child in &mut node.children {
        disable_shadows(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Button, Input, Slider, Switch, Tooltip};
    use crate::theme;
    use r3form_core::{FieldValue, HeadlessHost, compute_offsets};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// A plain box whose height can be changed from outside.
    struct Block {
        height: Rc<Cell<f64>>,
    }

    impl Widget for Block {
        fn kind(&self) -> WidgetKind {
            WidgetKind::Button
        }

        fn mount(&mut self, _ctx: WidgetContext) -> FormResult<()> {
            Ok(())
        }

        fn unmount(&mut self) {}

        fn set_layout(&mut self, _width: f64, _y_offset: f64) {}

        fn pointer(&mut self, _event: PointerEvent) -> FormResult<Propagation> {
            Ok(Propagation::Continue)
        }

        fn tick(&mut self, _frame: &Frame, _host: &dyn RenderHost) -> FormResult<()> {
            Ok(())
        }

        fn render(&self) -> FormResult<SceneNode> {
            Ok(SceneNode::cuboid(
                DVec3::new(1.0, self.height.get(), 0.1),
                Material::color(theme::TEXT),
            ))
        }
    }

    fn assert_offsets(form: &Form, heights: &[f64]) {
        let config = form.config();
        let (total, expected) = compute_offsets(heights, config.gap, config.padding);
        assert!((form.container_height() - total).abs() < 1e-9);
        for (offset, expected) in form.offsets().iter().zip(&expected) {
            assert!((offset - expected).abs() < 1e-9);
        }
    }

    fn sample_form() -> Form {
        Form::builder(FormConfig::default())
            .child(Input::named("email"))
            .child(Switch::named("newsletter"))
            .child(Button::submit())
            .build()
            .unwrap()
    }

    fn settle(form: &mut Form, frames: usize) {
        let host = HeadlessHost::default();
        for _ in 0..frames {
            form.tick(1.0 / 60.0, &host).unwrap();
        }
    }

    fn press(key: &str) -> KeyEvent {
        KeyEvent::Pressed(key.to_string())
    }

    #[test]
    fn test_focus_then_background_click_ignores_keys() {
        let mut form = sample_form();

        let propagation = form.pointer(HitTarget::Child(0), PointerEvent::down()).unwrap();
        assert_eq!(propagation, Propagation::Stop);
        assert_eq!(form.focused_field().unwrap().as_deref(), Some("email"));
        assert!(form.key(&press("a")).unwrap());

        form.pointer(HitTarget::Background, PointerEvent::down()).unwrap();
        assert_eq!(form.focused_field().unwrap(), None);
        assert!(!form.key(&press("b")).unwrap());

        let values = form.values().unwrap();
        assert_eq!(values["email"].as_text(), Some("a"));
    }

    #[test]
    fn test_switch_press_propagates_and_blurs_input() {
        let mut form = sample_form();
        form.pointer(HitTarget::Child(0), PointerEvent::down()).unwrap();

        let propagation = form.pointer(HitTarget::Child(1), PointerEvent::down()).unwrap();
        assert_eq!(propagation, Propagation::Continue);
        assert_eq!(form.focused_field().unwrap(), None);
        assert_eq!(form.values().unwrap()["newsletter"], FieldValue::Flag(true));
    }

    #[test]
    fn test_submit_button_delivers_snapshot() {
        let submitted: Rc<RefCell<Vec<FormValues>>> = Rc::default();
        let sink = Rc::clone(&submitted);
        let mut form = Form::builder(FormConfig::default())
            .child(Input::named("email"))
            .child(Button::submit())
            .on_submit(move |values| sink.borrow_mut().push(values))
            .build()
            .unwrap();

        form.pointer(HitTarget::Child(0), PointerEvent::down()).unwrap();
        for key in ["h", "i"] {
            form.key(&press(key)).unwrap();
        }
        form.pointer(HitTarget::Child(1), PointerEvent::down()).unwrap();
        form.pointer(HitTarget::Child(1), PointerEvent::up()).unwrap();

        // Later edits do not reach the delivered snapshot.
        form.pointer(HitTarget::Child(0), PointerEvent::down()).unwrap();
        form.key(&press("!")).unwrap();

        let submitted = submitted.borrow();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0]["email"].as_text(), Some("hi"));
    }

    #[test]
    fn test_duplicate_field_names_rejected() {
        let result = Form::builder(FormConfig::default())
            .child(Input::named("email"))
            .child(Input::named("email"))
            .build();
        assert!(matches!(result, Err(FormError::DuplicateField(name)) if name == "email"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FormConfig {
            zoom: 0.0,
            ..FormConfig::default()
        };
        assert!(matches!(Form::builder(config).build(), Err(FormError::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_child() {
        let mut form = sample_form();
        assert!(matches!(
            form.pointer(HitTarget::Child(9), PointerEvent::down()),
            Err(FormError::UnknownChild(9))
        ));
    }

    #[test]
    fn test_provisional_then_measured_layout() {
        let mut form = sample_form();
        assert_eq!(form.layout_phase(), &LayoutPhase::Unmeasured);
        assert!((form.container_height() - 6.0).abs() < 1e-9);
        assert_eq!(form.offsets(), vec![3.0, 1.5, 0.0]);

        settle(&mut form, 1);
        assert!(form.layout_phase().is_measured());

        let offsets = form.offsets();
        assert!(offsets[0] > offsets[1] && offsets[1] > offsets[2]);
        let top = form.container_height() / 2.0;
        assert!(offsets[0] < top && offsets[2] > -top);
    }

    #[test]
    fn test_growing_child_moves_siblings() {
        let height = Rc::new(Cell::new(1.0));
        let mut form = Form::builder(FormConfig::default())
            .child(Block {
                height: Rc::clone(&height),
            })
            .child(Block {
                height: Rc::new(Cell::new(1.0)),
            })
            .build()
            .unwrap();
        settle(&mut form, 1);
        assert_offsets(&form, &[1.0, 1.0]);

        height.set(3.0);
        settle(&mut form, 1);
        assert_offsets(&form, &[3.0, 1.0]);
        assert_eq!(
            form.camera_position(),
            DVec3::new(0.0, 0.0, form.container_height() + 2.0)
        );
    }

    #[test]
    fn test_focused_input_is_remeasured() {
        let host = HeadlessHost::default();
        let mut form = Form::builder(FormConfig::default())
            .child(Input::named("email"))
            .child(Input::named("name"))
            .build()
            .unwrap();
        settle(&mut form, 1);
        let height = form.container_height();
        let below = form.offsets()[1];

        // The label rises above the field while it is focused.
        form.pointer(HitTarget::Child(0), PointerEvent::down()).unwrap();
        settle(&mut form, 300);
        assert!(form.container_height() > height + 0.1);
        assert!((form.offsets()[1] - below).abs() > 0.01);

        let recorded = form.layout.entries()[0].measured_height.unwrap();
        let current = form.child_extent(0, &host).unwrap().unwrap().height();
        assert!((recorded - current).abs() < 1e-9);
    }

    #[test]
    fn test_invalidated_child_is_measured_again() {
        let mut form = sample_form();
        settle(&mut form, 1);
        let offsets = form.offsets();

        form.invalidate_child(1).unwrap();
        assert!(!form.layout_phase().is_measured());
        assert!((form.container_height() - 6.0).abs() < 1e-9);

        settle(&mut form, 1);
        assert!(form.layout_phase().is_measured());
        assert_eq!(form.offsets().len(), offsets.len());
        assert!(matches!(form.invalidate_child(7), Err(FormError::UnknownChild(7))));
    }

    #[test]
    fn test_camera_follows_measured_height() {
        let mut form = sample_form();
        assert_eq!(form.camera_position(), DVec3::new(0.0, 0.0, 8.0));

        settle(&mut form, 1);
        let height = form.container_height();
        assert_eq!(form.camera_position(), DVec3::new(0.0, 0.0, height + 2.0));
    }

    #[test]
    fn test_tooltip_click_moves_camera() {
        let mut form = Form::builder(FormConfig::default())
            .child(Input::named("email"))
            .child(Tooltip::with_text("Your address"))
            .build()
            .unwrap();
        settle(&mut form, 1);
        let start = form.camera_position();

        form.pointer(HitTarget::Child(1), PointerEvent::down()).unwrap();
        form.pointer(HitTarget::Child(1), PointerEvent::up()).unwrap();
        assert!(form.ui().active().is_some());

        settle(&mut form, 10);
        assert!(form.camera_position() != start);
        assert!(form.camera_position().z < start.z);
    }

    #[test]
    fn test_render_background_and_shadows() {
        let mut form = Form::builder(FormConfig {
            background: false,
            shadows: false,
            ..FormConfig::default()
        })
        .child(Slider::named("volume"))
        .build()
        .unwrap();
        settle(&mut form, 1);

        let scene = form.render().unwrap();
        let background = scene.find("background").unwrap();
        assert!(!background.visible);
        match &background.kind {
            NodeKind::Mesh {
                geometry: Geometry::Plane { width, height },
                ..
            } => {
                assert!((width - 8.0).abs() < 1e-9);
                assert!((height - form.container_height()).abs() < 1e-9);
            }
            other => panic!("unexpected background {other:?}"),
        }
        assert!(!scene.find("directional-light").unwrap().cast_shadow);
        assert!(scene.find("child-0").is_some());
    }

    #[test]
    fn test_drop_releases_fields() {
        let form = sample_form();
        let ctx = form.context();
        drop(form);
        assert!(!ctx.is_attached());
    }

    #[test]
    fn test_child_index_by_field_name() {
        let form = sample_form();
        assert_eq!(form.child_index("newsletter"), Some(1));
        assert_eq!(form.child_index("missing"), None);
        assert_eq!(
            form.child_kinds(),
            vec![WidgetKind::Input, WidgetKind::Switch, WidgetKind::Button]
        );
    }
}
