/// The field store: an accumulating map of field name to committed value
///
/// Values are only ever inserted or overwritten, never removed. Navigating
/// backward and unchecking a box does not erase what was committed earlier.
use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::form::StepForm;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldStore {
    values: BTreeMap<String, String>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate entries in field name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every control of `step` into the store.
    ///
    /// Checkboxes write only when checked; file controls are skipped;
    /// everything else overwrites unconditionally.
    pub fn commit(&mut self, step: &StepForm) {
        for control in &step.controls {
            if control.is_checkbox() {
                if control.is_checked() {
                    self.insert(&control.name, &control.value);
                }
            } else if !control.is_file() {
                self.insert(&control.name, &control.value);
            }
        }
        debug!("Committed step {} ({} fields stored)", step.number, self.len());
    }

    /// Card-style single choice: mark `value` in `group`, fill the backing
    /// control named `field_name`, and store the value directly.
    ///
    /// Returns false if the group or card does not exist on `step`.
    pub fn select_option(
        &mut self,
        step: &mut StepForm,
        group: &str,
        field_name: &str,
        value: &str,
    ) -> bool {
        let marked = step
            .group_mut(group)
            .map(|g| g.mark(value))
            .unwrap_or(false);

        if !marked {
            warn!("Option {:?} not found in group {:?} on step {}", value, group, step.number);
            return false;
        }

        if let Some(control) = step.control_mut(field_name) {
            control.value = value.to_string();
        }
        self.insert(field_name, value);
        true
    }
}
