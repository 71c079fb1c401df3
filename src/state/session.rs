/// The wizard session: step state machine plus everything collected so far
///
/// One session lives for the lifetime of the application window. Step
/// visibility is derived from `current_step`; nothing else stores it.
use tracing::{info, warn};

use super::fields::FieldStore;
use super::form::StepForm;
use super::steps::build_steps;
use super::summary::SummaryView;
use super::validator::{validate, ValidationError};
use crate::media::photo::{LoadedPhoto, PhotoAsset};

/// Outcome of an approved `advance()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved forward to the given step
    Moved { from: usize, to: usize },
    /// Already on the terminal step; data was committed but nothing moved
    Stayed,
}

#[derive(Debug)]
pub struct WizardSession {
    /// Active step, always within [1, total_steps]
    current_step: usize,
    steps: Vec<StepForm>,
    store: FieldStore,
    photo: Option<LoadedPhoto>,
    summary: SummaryView,
    /// True while a submission request is in flight
    submitting: bool,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    /// Start a session on step 1 with the standard intake layout
    pub fn new() -> Self {
        Self::with_steps(build_steps())
    }

    /// Start a session over custom step forms (numbered 1..=N in order)
    pub fn with_steps(steps: Vec<StepForm>) -> Self {
        assert!(!steps.is_empty(), "a wizard needs at least one step");
        Self {
            current_step: 1,
            steps,
            store: FieldStore::new(),
            photo: None,
            summary: SummaryView::default(),
            submitting: false,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn is_terminal(&self) -> bool {
        self.current_step == self.total_steps()
    }

    /// Position in the wizard as a percentage
    pub fn progress(&self) -> f32 {
        self.current_step as f32 / self.total_steps() as f32 * 100.0
    }

    /// Text for the step counter, e.g. "Step 3 of 8"
    pub fn step_counter(&self) -> String {
        format!("Step {} of {}", self.current_step, self.total_steps())
    }

    /// Exactly the active step is visible
    pub fn is_visible(&self, step: usize) -> bool {
        step == self.current_step
    }

    /// All step forms in order
    pub fn steps(&self) -> &[StepForm] {
        &self.steps
    }

    pub fn active_step(&self) -> &StepForm {
        &self.steps[self.current_step - 1]
    }

    fn active_step_mut(&mut self) -> &mut StepForm {
        let index = self.current_step - 1;
        &mut self.steps[index]
    }

    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    pub fn summary(&self) -> &SummaryView {
        &self.summary
    }

    /// Record text or select input on the active step
    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        self.active_step_mut().set_value(name, value)
    }

    /// Record a checkbox toggle on the active step
    pub fn set_checked(&mut self, name: &str, checked: bool) -> bool {
        self.active_step_mut().set_checked(name, checked)
    }

    /// Card-style selection on the active step
    pub fn select_option(&mut self, group: &str, field_name: &str, value: &str) -> bool {
        let index = self.current_step - 1;
        self.store
            .select_option(&mut self.steps[index], group, field_name, value)
    }

    /// Validate, commit, and move forward one step.
    ///
    /// A rejected step leaves the session untouched.
    pub fn advance(&mut self) -> Result<Transition, ValidationError> {
        if let Err(e) = validate(self.active_step()) {
            warn!("Step {} blocked: {} ({})", self.current_step, e, e.field());
            return Err(e);
        }

        let index = self.current_step - 1;
        self.store.commit(&self.steps[index]);

        if self.is_terminal() {
            return Ok(Transition::Stayed);
        }

        let from = self.current_step;
        self.current_step += 1;

        if self.is_terminal() {
            self.summary = SummaryView::from_store(&self.store);
        }

        Ok(Transition::Moved {
            from,
            to: self.current_step,
        })
    }

    /// Move back one step without validation. Returns false at step 1.
    pub fn retreat(&mut self) -> bool {
        if self.current_step <= 1 {
            return false;
        }
        self.current_step -= 1;
        info!("⬅️  Back to step {} ({:.0}%)", self.current_step, self.progress());
        true
    }

    /// Replace the photo (last write wins)
    pub fn install_photo(&mut self, photo: LoadedPhoto) {
        info!("🖼️  Photo set: {} ({:?})", photo.asset.file_name, photo.asset.origin);
        self.photo = Some(photo);
    }

    pub fn photo(&self) -> Option<&PhotoAsset> {
        self.photo.as_ref().map(|p| &p.asset)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Claim the single submission slot.
    ///
    /// Returns false when not on the terminal step or when a request is
    /// already in flight; the caller must not send anything in that case.
    pub fn begin_submission(&mut self) -> bool {
        if !self.is_terminal() || self.submitting {
            return false;
        }
        self.submitting = true;
        true
    }

    /// Release the submission slot after a response (either outcome)
    pub fn finish_submission(&mut self) {
        self.submitting = false;
    }
}
