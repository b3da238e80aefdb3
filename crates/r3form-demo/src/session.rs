//! Scripted form sessions without a renderer.
//!
//! A session builds a [`Form`] from a blueprint, replays a list of
//! [`Step`]s against it (pointer clicks, typing, waiting for frames) and
//! reports the resulting state.

use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec3;
use r3form_core::{FormError, FormResult, FormValues, HeadlessHost, KeyEvent, PointerEvent};
use r3form_widgets::{Form, FormBlueprint, HitTarget};
use serde::{Deserialize, Serialize};

/// Blueprint used when none is given.
pub const DEFAULT_BLUEPRINT: &str = include_str!("../sessions/signup.form.json");

/// Steps used when none are given.
pub const DEFAULT_STEPS: &str = include_str!("../sessions/signup.steps.json");

/// Host frame rate assumed by sessions.
const FRAME_TIME: f64 = 1.0 / 60.0;

/// One scripted user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Press and release on a field, or on the background when `field` is
    /// absent. `x` is the horizontal position within the field.
    Click {
        #[serde(default)]
        field: Option<String>,
        #[serde(default)]
        x: f64,
    },
    /// Press and release on the child at `index`.
    ClickChild {
        index: usize,
        #[serde(default)]
        x: f64,
    },
    /// Press and release one key per character.
    Type { text: String },
    /// Press and release a named key.
    Key { key: String },
    /// Let frames pass.
    Wait { frames: usize },
}

/// State of the form after a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    /// Every snapshot handed to the submit callback.
    pub submissions: Vec<FormValues>,
    pub values: FormValues,
    pub focused: Option<String>,
    pub camera: DVec3,
    pub container_height: f64,
    pub frames: u64,
}

/// A form driven by scripted steps.
pub struct Session {
    form: Form,
    host: HeadlessHost,
    submissions: Rc<RefCell<Vec<FormValues>>>,
    frames: u64,
}

impl Session {
    /// Build the form described by `blueprint`, recording its submissions.
    pub fn new(blueprint: FormBlueprint) -> FormResult<Self> {
        let submissions: Rc<RefCell<Vec<FormValues>>> = Rc::default();
        let sink = Rc::clone(&submissions);
        let form = blueprint
            .into_builder()
            .on_submit(move |values| sink.borrow_mut().push(values))
            .build()?;

        Ok(Self {
            form,
            host: HeadlessHost::default(),
            submissions,
            frames: 0,
        })
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Replay `steps` in order, stopping at the first failure.
    pub fn run(&mut self, steps: &[Step]) -> FormResult<()> {
        for (number, step) in steps.iter().enumerate() {
            log::debug!("Step {number}: {step:?}");
            self.step(step)?;
        }
        Ok(())
    }

    /// Perform one step followed by a frame. A wait runs exactly its own
    /// frames.
    pub fn step(&mut self, step: &Step) -> FormResult<()> {
        match step {
            Step::Click { field, x } => {
                let target = match field {
                    Some(name) => HitTarget::Child(self.form.child_index(name).ok_or_else(|| {
                        FormError::InvalidConfig(format!("no field named {name:?}"))
                    })?),
                    None => HitTarget::Background,
                };
                self.click(target, *x)?;
            }
            Step::ClickChild { index, x } => self.click(HitTarget::Child(*index), *x)?,
            Step::Type { text } => {
                for c in text.chars() {
                    self.key(&c.to_string())?;
                }
            }
            Step::Key { key } => self.key(key)?,
            Step::Wait { frames } => {
                for _ in 0..*frames {
                    self.frame()?;
                }
                return Ok(());
            }
        }
        self.frame()
    }

    /// Summarize the form's current state.
    pub fn report(&self) -> FormResult<SessionReport> {
        Ok(SessionReport {
            submissions: self.submissions.borrow().clone(),
            values: self.form.values()?,
            focused: self.form.focused_field()?,
            camera: self.form.camera_position(),
            container_height: self.form.container_height(),
            frames: self.frames,
        })
    }

    fn click(&mut self, target: HitTarget, x: f64) -> FormResult<()> {
        let position = DVec3::new(x, 0.0, 0.0);
        self.form.pointer(target, PointerEvent::Down { position })?;
        self.form.pointer(target, PointerEvent::Up { position })?;
        Ok(())
    }

    fn key(&mut self, key: &str) -> FormResult<()> {
        if !self.form.key(&KeyEvent::Pressed(key.to_string()))? {
            log::debug!("Key {key:?} ignored, no field is focused");
        }
        self.form.key(&KeyEvent::Released(key.to_string()))?;
        Ok(())
    }

    fn frame(&mut self) -> FormResult<()> {
        self.form.tick(FRAME_TIME, &self.host)?;
        self.frames += 1;
        Ok(())
    }
}
