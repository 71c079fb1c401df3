/// User interface module
///
/// - `step.rs` renders the active step (controls, option cards, photo, summary)
/// - `overlay.rs` renders the camera modal, loading overlay, notices and results

pub mod overlay;
pub mod step;
