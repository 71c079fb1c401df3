/// Shared data structures for the wizard's form model
///
/// These structs describe the controls that each step exposes.
/// The render layer reads them to build widgets, and the session
/// writes user input back into them as it happens.

/// The kind of input a control represents
#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    /// Free text entry
    Text,
    /// Single choice from a fixed list of values
    Select(Vec<String>),
    /// Boolean-gated value: contributes `value` only while checked
    Checkbox { checked: bool },
    /// Proxy value filled by an option card selection
    Hidden,
    /// File picker; never stored in the field store
    File,
}

/// A single named input within a step
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    /// Field name sent to the backend (e.g., "nombre")
    pub name: String,
    /// Label shown next to the widget
    pub label: String,
    pub kind: ControlKind,
    /// Current value. For checkboxes this is the value submitted when checked.
    pub value: String,
    /// Whether the control must hold a non-empty value to advance
    pub required: bool,
}

impl Control {
    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, ControlKind::Text)
    }

    pub fn select(name: &str, label: &str, options: &[&str]) -> Self {
        let options = options.iter().map(|o| o.to_string()).collect();
        Self::new(name, label, ControlKind::Select(options))
    }

    /// A checkbox that submits "true" when checked
    pub fn checkbox(name: &str, label: &str) -> Self {
        let mut control = Self::new(name, label, ControlKind::Checkbox { checked: false });
        control.value = "true".to_string();
        control
    }

    pub fn hidden(name: &str) -> Self {
        Self::new(name, "", ControlKind::Hidden)
    }

    pub fn file(name: &str, label: &str) -> Self {
        Self::new(name, label, ControlKind::File)
    }

    fn new(name: &str, label: &str, kind: ControlKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            value: String::new(),
            required: false,
        }
    }

    /// Mark this control as mandatory
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_checkbox(&self) -> bool {
        matches!(self.kind, ControlKind::Checkbox { .. })
    }

    pub fn is_checked(&self) -> bool {
        matches!(self.kind, ControlKind::Checkbox { checked: true })
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self.kind, ControlKind::Hidden)
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, ControlKind::File)
    }
}

/// One selectable card in an option group
#[derive(Debug, Clone, PartialEq)]
pub struct OptionCard {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

/// A single-choice group of option cards backed by a hidden control
#[derive(Debug, Clone, PartialEq)]
pub struct OptionGroup {
    /// Group identifier, unique within its step
    pub id: String,
    pub cards: Vec<OptionCard>,
}

impl OptionGroup {
    /// Build a group whose cards use the same text for label and value
    pub fn new(id: &str, values: &[&str]) -> Self {
        let cards = values
            .iter()
            .map(|v| OptionCard {
                label: v.to_string(),
                value: v.to_string(),
                selected: false,
            })
            .collect();

        Self {
            id: id.to_string(),
            cards,
        }
    }

    /// Clear every sibling's marker and mark the card holding `value`.
    /// Returns false (leaving markers untouched) if no card holds it.
    pub fn mark(&mut self, value: &str) -> bool {
        if !self.cards.iter().any(|c| c.value == value) {
            return false;
        }
        for card in &mut self.cards {
            card.selected = card.value == value;
        }
        true
    }

    /// The currently selected card, if any
    #[cfg(test)]
    pub fn selected(&self) -> Option<&OptionCard> {
        self.cards.iter().find(|c| c.selected)
    }
}

/// What the render layer should show below a step's controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepExtra {
    None,
    /// Photo preview with upload and camera buttons
    Photo,
    /// Summary view with the confirm button
    Summary,
}

/// One page of the wizard holding a subset of input fields
#[derive(Debug, Clone, PartialEq)]
pub struct StepForm {
    /// 1-based step number
    pub number: usize,
    pub title: String,
    pub controls: Vec<Control>,
    pub option_groups: Vec<OptionGroup>,
    pub extra: StepExtra,
}

impl StepForm {
    pub fn new(number: usize, title: &str) -> Self {
        Self {
            number,
            title: title.to_string(),
            controls: Vec::new(),
            option_groups: Vec::new(),
            extra: StepExtra::None,
        }
    }

    pub fn with_control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    pub fn with_group(mut self, group: OptionGroup) -> Self {
        self.option_groups.push(group);
        self
    }

    pub fn with_extra(mut self, extra: StepExtra) -> Self {
        self.extra = extra;
        self
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.name == name)
    }

    pub fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls.iter_mut().find(|c| c.name == name)
    }

    #[cfg(test)]
    pub fn group(&self, id: &str) -> Option<&OptionGroup> {
        self.option_groups.iter().find(|g| g.id == id)
    }

    pub fn group_mut(&mut self, id: &str) -> Option<&mut OptionGroup> {
        self.option_groups.iter_mut().find(|g| g.id == id)
    }

    /// Set a text/select control's value. Returns false for unknown names
    /// and for controls that are not user-editable this way.
    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        match self.control_mut(name) {
            Some(control) if matches!(control.kind, ControlKind::Text | ControlKind::Select(_)) => {
                control.value = value.to_string();
                true
            }
            _ => false,
        }
    }

    /// Toggle a checkbox control. Returns false if `name` is not a checkbox.
    pub fn set_checked(&mut self, name: &str, checked: bool) -> bool {
        match self.control_mut(name) {
            Some(control) if control.is_checkbox() => {
                control.kind = ControlKind::Checkbox { checked };
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_leaves_single_selection() {
        let mut group = OptionGroup::new("fit", &["Ajustado", "Regular", "Holgado"]);
        assert!(group.mark("Ajustado"));
        assert!(group.mark("Holgado"));

        let selected: Vec<_> = group.cards.iter().filter(|c| c.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, "Holgado");
    }

    #[test]
    fn test_mark_unknown_value_keeps_markers() {
        let mut group = OptionGroup::new("genero", &["Mujer", "Hombre"]);
        group.mark("Mujer");
        assert!(!group.mark("Nadie"));
        assert_eq!(group.selected().map(|c| c.value.as_str()), Some("Mujer"));
    }

    #[test]
    fn test_set_value_rejects_non_text_controls() {
        let mut form = StepForm::new(1, "Test")
            .with_control(Control::text("nombre", "Name"))
            .with_control(Control::checkbox("no_tops", "No tops"))
            .with_control(Control::hidden("fit"));

        assert!(form.set_value("nombre", "Ana"));
        assert!(!form.set_value("no_tops", "false"));
        assert!(!form.set_value("fit", "Regular"));
        assert!(!form.set_value("missing", "x"));
        assert_eq!(form.control("nombre").unwrap().value, "Ana");
    }

    #[test]
    fn test_checkbox_keeps_submit_value() {
        let mut form = StepForm::new(6, "Fit").with_control(Control::checkbox("no_faldas", "No skirts"));
        assert!(form.set_checked("no_faldas", true));

        let control = form.control("no_faldas").unwrap();
        assert!(control.is_checked());
        assert_eq!(control.value, "true");
    }
}
