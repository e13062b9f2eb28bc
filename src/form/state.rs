use crate::form::format::FieldFormat;
use crate::form::schema::{fields_for, find_field, title_for, FieldSpec};
use crate::form::submission::FormSubmission;
use crate::storage::Table;

/// Editing state of the data-entry dialog.
#[derive(Debug, Clone)]
pub struct FormState {
    pub table: Table,
    pub values: Vec<String>,
    pub focus: usize,
    pub error: Option<String>,
    /// Row being edited; `None` for a new row.
    pub target: Option<i32>,
    /// Set when only one column of `target` is edited.
    single: Option<&'static FieldSpec>,
}

impl FormState {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            values: vec![String::new(); fields_for(table).len()],
            focus: 0,
            error: None,
            target: None,
            single: None,
        }
    }

    /// One-field dialog that edits column `field` of row `id`.
    pub fn single_field(table: Table, id: i32, field: &str) -> Option<Self> {
        let spec = find_field(table, field)?;
        Some(Self {
            table,
            values: vec![String::new()],
            focus: 0,
            error: None,
            target: Some(id),
            single: Some(spec),
        })
    }

    pub fn title(&self) -> String {
        match self.target {
            Some(id) => format!("Edit {} #{}", self.table, id),
            None => title_for(self.table).to_string(),
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self.single {
            Some(spec) => std::slice::from_ref(spec),
            None => fields_for(self.table),
        }
    }

    pub fn focused(&self) -> &'static FieldSpec {
        &self.fields()[self.focus]
    }

    /// Table the focused field looks names up in, if any.
    pub fn focused_lookup(&self) -> Option<Table> {
        match self.focused().format {
            FieldFormat::Lookup(t) => Some(t),
            _ => None,
        }
    }

    /// Appends `ch` when the focused field's format allows it.
    pub fn insert_char(&mut self, ch: char) -> bool {
        let format = self.focused().format;
        let current = &mut self.values[self.focus];
        if format.accepts(current, ch) {
            current.push(ch);
            true
        } else {
            false
        }
    }

    pub fn backspace(&mut self) {
        self.values[self.focus].pop();
    }

    pub fn next_field(&mut self) {
        if self.single.is_some() {
            self.step_column(1);
        } else if self.focus + 1 < self.values.len() {
            self.focus += 1;
        }
    }

    pub fn prev_field(&mut self) {
        if self.single.is_some() {
            self.step_column(fields_for(self.table).len() - 1);
        } else {
            self.focus = self.focus.saturating_sub(1);
        }
    }

    /// Moves a one-field dialog to another column, wrapping around.
    fn step_column(&mut self, by: usize) {
        let Some(spec) = self.single else {
            return;
        };
        let all = fields_for(self.table);
        let pos = all.iter().position(|f| f.key == spec.key).unwrap_or(0);
        self.single = Some(&all[(pos + by) % all.len()]);
        self.values[0].clear();
        self.error = None;
    }

    pub fn is_last_field(&self) -> bool {
        self.focus + 1 == self.values.len()
    }

    /// Candidates starting with the focused text, case-insensitively.
    pub fn suggestions<'a>(&self, candidates: &'a [String]) -> Vec<&'a str> {
        let typed = &self.values[self.focus];
        candidates
            .iter()
            .filter(|c| rest_after_prefix(c, typed).is_some())
            .map(String::as_str)
            .collect()
    }

    /// Remaining text of the first suggestion, for the ghost hint.
    pub fn completion_hint(&self, candidates: &[String]) -> Option<String> {
        let typed = &self.values[self.focus];
        if typed.is_empty() {
            return None;
        }
        candidates
            .iter()
            .find_map(|c| rest_after_prefix(c, typed))
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }

    /// Replaces the focused text with the first suggestion.
    pub fn complete(&mut self, candidates: &[String]) -> bool {
        let pick = self.suggestions(candidates).first().map(|s| s.to_string());
        match pick {
            Some(s) => {
                self.values[self.focus] = s;
                true
            }
            None => false,
        }
    }

    /// Validates every field; on failure focuses the first bad one.
    pub fn submit(&mut self) -> Option<FormSubmission> {
        if let (Some(id), Some(spec)) = (self.target, self.single) {
            return match FormSubmission::single(self.table, id, spec.key, &self.values[0]) {
                Ok(sub) => {
                    self.error = None;
                    Some(sub)
                }
                Err(e) => {
                    self.error = Some(e.to_string());
                    None
                }
            };
        }
        match FormSubmission::from_inputs(self.table, &self.values) {
            Ok(sub) => {
                self.error = None;
                Some(sub)
            }
            Err(errors) => {
                if let Some((idx, err)) = errors.first() {
                    self.focus = *idx;
                    self.error = Some(if errors.len() > 1 {
                        format!("{} (+{} more)", err, errors.len() - 1)
                    } else {
                        err.to_string()
                    });
                }
                None
            }
        }
    }
}

/// The part of `candidate` after `prefix`, comparing one char at a time
/// with case folded. Folding a single char may yield several chars, so
/// byte or char counts of the lowered strings cannot be used to slice.
fn rest_after_prefix<'a>(candidate: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = candidate.char_indices();
    for p in prefix.chars() {
        let (_, c) = chars.next()?;
        if !c.to_lowercase().eq(p.to_lowercase()) {
            return None;
        }
    }
    Some(chars.next().map_or("", |(i, _)| &candidate[i..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(form: &mut FormState, s: &str) {
        for ch in s.chars() {
            form.insert_char(ch);
        }
    }

    #[test]
    fn typing_is_filtered_by_format() {
        let mut form = FormState::new(Table::Referee);
        form.focus = 3; // phone
        type_str(&mut form, "+7(9a1b2)");
        assert_eq!(form.values[3], "+7(912)");
        form.backspace();
        assert_eq!(form.values[3], "+7(912");
    }

    #[test]
    fn focus_stays_in_bounds() {
        let mut form = FormState::new(Table::Team);
        form.prev_field();
        assert_eq!(form.focus, 0);
        form.next_field();
        assert_eq!(form.focus, 0);
        assert!(form.is_last_field());
    }

    #[test]
    fn autocomplete_from_candidates() {
        let names = vec!["Ivanova Anna".to_string(), "Petrov Ivan".to_string(), "Petrova Olga".to_string()];
        let mut form = FormState::new(Table::Games);
        form.focus = 8; // chief referee
        assert_eq!(form.focused_lookup(), Some(Table::Referee));
        type_str(&mut form, "pet");
        assert_eq!(form.suggestions(&names), vec!["Petrov Ivan", "Petrova Olga"]);
        assert_eq!(form.completion_hint(&names).as_deref(), Some("rov Ivan"));
        assert!(form.complete(&names));
        assert_eq!(form.values[8], "Petrov Ivan");
    }

    #[test]
    fn submit_reports_first_error_and_focuses_it() {
        let mut form = FormState::new(Table::Stadium);
        form.focus = 2;
        assert!(form.submit().is_none());
        assert_eq!(form.focus, 0);
        assert_eq!(form.error.as_deref(), Some("Name is required"));

        type_str(&mut form, "Luzhniki");
        let sub = form.submit().unwrap();
        assert_eq!(sub.table, Table::Stadium);
        assert!(form.error.is_none());
    }

    #[test]
    fn hint_slices_by_candidate_chars_when_case_folding_changes_length() {
        let names = vec!["İstanbul Arena".to_string()];
        let mut form = FormState::new(Table::Stadium);
        // the lowercase form of 'İ' is two chars
        type_str(&mut form, "i\u{307}s");
        assert_eq!(form.completion_hint(&names), None);
        assert!(form.suggestions(&names).is_empty());

        let mut form = FormState::new(Table::Stadium);
        type_str(&mut form, "İs");
        assert_eq!(form.completion_hint(&names).as_deref(), Some("tanbul Arena"));
        assert_eq!(form.suggestions(&names), vec!["İstanbul Arena"]);
    }

    #[test]
    fn single_field_dialog_edits_one_column_of_a_row() {
        assert!(FormState::single_field(Table::Games, 4, "colour").is_none());

        let mut form = FormState::single_field(Table::Games, 4, "payment").unwrap();
        assert_eq!(form.title(), "Edit Games #4");
        assert_eq!(form.fields().len(), 1);
        assert!(form.is_last_field());

        type_str(&mut form, "25x00");
        assert_eq!(form.values[0], "2500");
        let sub = form.submit().unwrap();
        assert_eq!(sub.target, Some(4));
        assert_eq!(sub.fields.len(), 1);
        assert_eq!(sub.fields[0].0.key, "payment");
    }

    #[test]
    fn single_field_dialog_cycles_columns() {
        let mut form = FormState::single_field(Table::Stadium, 2, "name").unwrap();
        assert!(form.submit().is_none());
        assert_eq!(form.error.as_deref(), Some("Name is required"));
        type_str(&mut form, "Arena");
        form.next_field();
        assert_eq!(form.focused().key, "address");
        assert!(form.values[0].is_empty());
        assert!(form.error.is_none());
        form.prev_field();
        form.prev_field();
        assert_eq!(form.focused().key, "city_id");
    }
}
