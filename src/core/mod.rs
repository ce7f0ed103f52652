// src/core/mod.rs — Session state machine and request orchestration

pub mod controller;
pub mod driver;
pub mod types;

pub use controller::{Outcome, Request, Resolution, SessionController, Submission};
pub use driver::SessionDriver;
