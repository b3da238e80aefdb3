//! R3Form demo
//!
//! Runs a form blueprint through a scripted, renderer-less session and
//! reports what the form ended up with.

mod session;

pub use session::{DEFAULT_BLUEPRINT, DEFAULT_STEPS, Session, SessionReport, Step};
