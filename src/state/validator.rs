/// Step validation
///
/// Approves or blocks forward navigation. Never mutates anything.
use thiserror::Error;

use super::form::StepForm;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required visible control is empty
    #[error("Please complete all required fields")]
    MissingField(String),

    /// A required option card group has no selection
    #[error("Please select an option")]
    MissingSelection(String),
}

impl ValidationError {
    /// Name of the field that failed
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField(name) | ValidationError::MissingSelection(name) => name,
        }
    }
}

/// Check the step's required controls, stopping at the first failure.
///
/// Visible controls are checked before hidden proxies, so an empty text
/// field is reported ahead of a missing card selection.
pub fn validate(step: &StepForm) -> Result<(), ValidationError> {
    let required = step.controls.iter().filter(|c| c.required);

    for control in required.clone().filter(|c| !c.is_hidden()) {
        if !has_value(control.is_checkbox(), control.is_checked(), &control.value) {
            return Err(ValidationError::MissingField(control.name.clone()));
        }
    }

    for control in required.filter(|c| c.is_hidden()) {
        if control.value.is_empty() {
            return Err(ValidationError::MissingSelection(control.name.clone()));
        }
    }

    Ok(())
}

fn has_value(is_checkbox: bool, checked: bool, value: &str) -> bool {
    if is_checkbox {
        checked
    } else {
        !value.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::form::{Control, OptionGroup};

    #[test]
    fn test_empty_required_text_blocks() {
        let step = StepForm::new(1, "About you").with_control(Control::text("nombre", "Name").required());
        assert_eq!(
            validate(&step),
            Err(ValidationError::MissingField("nombre".to_string()))
        );
    }

    #[test]
    fn test_optional_fields_pass_empty() {
        let step = StepForm::new(7, "Photo")
            .with_control(Control::file("photo", "Photo"))
            .with_control(Control::checkbox("no_tops", "No tops"));
        assert_eq!(validate(&step), Ok(()));
    }

    #[test]
    fn test_hidden_proxy_requires_selection() {
        let mut step = StepForm::new(2, "Gender")
            .with_control(Control::hidden("genero").required())
            .with_group(OptionGroup::new("genero", &["Mujer", "Hombre"]));

        let err = validate(&step).unwrap_err();
        assert_eq!(err, ValidationError::MissingSelection("genero".to_string()));
        assert_eq!(err.to_string(), "Please select an option");

        step.control_mut("genero").unwrap().value = "Mujer".to_string();
        assert_eq!(validate(&step), Ok(()));
    }

    #[test]
    fn test_visible_failure_reported_first() {
        let step = StepForm::new(1, "Mixed")
            .with_control(Control::hidden("genero").required())
            .with_control(Control::text("nombre", "Name").required());

        let err = validate(&step).unwrap_err();
        assert_eq!(err.field(), "nombre");
    }

    #[test]
    fn test_validation_does_not_mutate() {
        let step = StepForm::new(3, "Location")
            .with_control(Control::select("provincia", "Province", &["Madrid"]).required());
        let before = step.clone();
        let _ = validate(&step);
        assert_eq!(step, before);
    }
}
