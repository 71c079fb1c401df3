/// Read-only confirmation view built from the field store
use super::fields::FieldStore;

/// One labelled line of the summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryView {
    pub lines: Vec<SummaryLine>,
    /// Informational note about what happens after submission
    pub note: String,
}

impl SummaryView {
    /// Project the allow-listed fields of `store`, omitting absent ones.
    pub fn from_store(store: &FieldStore) -> Self {
        let mut lines = Vec::new();
        let mut push = |label: &'static str, value: String| lines.push(SummaryLine { label, value });

        if let Some(name) = store.get("nombre") {
            push("Name", name.to_string());
        }
        if let Some(gender) = store.get("genero") {
            push("Gender", gender.to_string());
        }
        if let (Some(province), Some(month)) = (store.get("provincia"), store.get("mes")) {
            push("Location", format!("{}, {}", province, month));
        }
        if let Some(occasion) = store.get("ocasion") {
            push("Occasion", occasion.to_string());
        }
        if let Some(fit) = store.get("fit") {
            push("Fit preference", fit.to_string());
        }

        let note = format!(
            "We'll analyse your photo to work out your personal colour palette and check \
             the real weather in {} for {} to build your recommendation.",
            store.get("provincia").unwrap_or("your location"),
            store.get("mes").unwrap_or("the selected month"),
        );

        Self { lines, note }
    }

    #[cfg(test)]
    pub fn line(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_omitted() {
        let mut store = FieldStore::new();
        store.insert("nombre", "Lucía");
        store.insert("fit", "Regular");

        let view = SummaryView::from_store(&store);
        assert_eq!(view.line("Name"), Some("Lucía"));
        assert_eq!(view.line("Fit preference"), Some("Regular"));
        assert_eq!(view.line("Occasion"), None);
        assert_eq!(view.lines.len(), 2);
    }

    #[test]
    fn test_location_needs_both_parts() {
        let mut store = FieldStore::new();
        store.insert("provincia", "Sevilla");

        let view = SummaryView::from_store(&store);
        assert_eq!(view.line("Location"), None);
        assert!(view.note.contains("Sevilla"));
        assert!(view.note.contains("the selected month"));

        store.insert("mes", "Julio");
        let view = SummaryView::from_store(&store);
        assert_eq!(view.line("Location"), Some("Sevilla, Julio"));
    }

    #[test]
    fn test_note_falls_back_when_empty() {
        let view = SummaryView::from_store(&FieldStore::new());
        assert!(view.lines.is_empty());
        assert!(view.note.contains("your location"));
    }

    #[test]
    fn test_unlisted_fields_not_rendered() {
        let mut store = FieldStore::new();
        store.insert("no_tops", "true");
        let view = SummaryView::from_store(&store);
        assert!(view.lines.is_empty());
    }
}
