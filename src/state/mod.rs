/// State management module
///
/// This module handles all wizard state, including:
/// - The form model each step exposes (form.rs)
/// - The fixed eight-step layout (steps.rs)
/// - The accumulating field store (fields.rs)
/// - Per-step validation (validator.rs)
/// - The confirmation summary (summary.rs)
/// - The step state machine that ties them together (session.rs)

pub mod fields;
pub mod form;
pub mod session;
pub mod steps;
pub mod summary;
pub mod validator;
