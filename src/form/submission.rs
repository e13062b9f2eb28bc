use crate::form::format::{FieldError, FieldFormat, FieldValue};
use crate::form::schema::{fields_for, find_field, FieldSpec};
use crate::storage::{RowData, StorageError, Table};
use async_trait::async_trait;
use chrono::Datelike;

/// Maps lookup names typed into a form to row ids.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn id_of(&self, table: Table, name: &str) -> Result<Option<i32>, StorageError>;
    async fn exists(&self, table: Table, id: i32) -> Result<bool, StorageError>;
}

#[derive(thiserror::Error, Debug)]
pub enum FormError {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Format-checked form contents; lookups are still names.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSubmission {
    pub table: Table,
    /// `Some(id)` updates that row, `None` inserts a new one.
    pub target: Option<i32>,
    pub fields: Vec<(&'static FieldSpec, FieldValue)>,
}

impl FormSubmission {
    /// Parses one raw string per field of `table`, in form order.
    pub fn from_inputs(table: Table, inputs: &[String]) -> Result<Self, Vec<(usize, FieldError)>> {
        let mut fields = Vec::new();
        let mut errors = Vec::new();
        for (idx, spec) in fields_for(table).iter().enumerate() {
            let raw = inputs.get(idx).map(String::as_str).unwrap_or("");
            match parse_required(spec, raw) {
                Ok(v) => fields.push((spec, v)),
                Err(e) => errors.push((idx, e)),
            }
        }
        if errors.is_empty() {
            Ok(Self {
                table,
                target: None,
                fields,
            })
        } else {
            Err(errors)
        }
    }

    /// A single-field edit of row `id`.
    pub fn single(table: Table, id: i32, field: &str, raw: &str) -> Result<Self, FieldError> {
        let spec = find_field(table, field).ok_or_else(|| FieldError::UnknownField {
            table: table.name(),
            field: field.to_string(),
        })?;
        let value = parse_required(spec, raw)?;
        Ok(Self {
            table,
            target: Some(id),
            fields: vec![(spec, value)],
        })
    }

    /// Resolves lookups and expands composite fields into table columns.
    pub async fn into_row(&self, resolver: &dyn NameResolver) -> Result<RowData, FormError> {
        let mut row = RowData::new();
        for (spec, value) in &self.fields {
            match value {
                FieldValue::Empty => {
                    // inserts leave the column to its default, edits clear it
                    if self.target.is_some() {
                        row.set(spec.key, crate::storage::CellValue::Null);
                    }
                }
                FieldValue::Text(s) => {
                    row.set(spec.key, s.clone());
                }
                FieldValue::Int(v) => {
                    row.set(spec.key, *v);
                }
                FieldValue::Flag(b) => {
                    row.set(spec.key, *b);
                }
                FieldValue::Time(t) => {
                    row.set(spec.key, *t);
                }
                FieldValue::Date(d) => {
                    row.set("year", d.year())
                        .set("month", d.month() as i32)
                        .set("day", d.day() as i32);
                }
                FieldValue::Name(name) => {
                    let id = resolve_name(spec, name, resolver).await?;
                    row.set(spec.key, id);
                }
            }
        }
        Ok(row)
    }
}

fn parse_required(spec: &'static FieldSpec, raw: &str) -> Result<FieldValue, FieldError> {
    let value = spec.format.parse(spec.label, raw)?;
    if spec.required && value == FieldValue::Empty {
        return Err(FieldError::Required(spec.label));
    }
    Ok(value)
}

async fn resolve_name(
    spec: &'static FieldSpec,
    name: &str,
    resolver: &dyn NameResolver,
) -> Result<i32, FormError> {
    let FieldFormat::Lookup(table) = spec.format else {
        return Err(FieldError::UnknownField {
            table: "lookup",
            field: spec.key.to_string(),
        }
        .into());
    };
    let unknown = || FieldError::UnknownName {
        label: spec.label,
        table: table.name(),
        name: name.to_string(),
    };

    // "#12" names a row by id
    if let Some(id) = name.strip_prefix('#').and_then(|s| s.trim().parse::<i32>().ok()) {
        return if resolver.exists(table, id).await? {
            Ok(id)
        } else {
            Err(unknown().into())
        };
    }
    resolver
        .id_of(table, name)
        .await?
        .ok_or_else(|| unknown().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CellValue;
    use std::collections::HashMap;

    struct StubResolver {
        names: HashMap<(Table, String), i32>,
    }

    impl StubResolver {
        fn new() -> Self {
            let mut names = HashMap::new();
            names.insert((Table::Stadium, "Luzhniki".to_string()), 3);
            names.insert((Table::Referee, "Petrov Ivan".to_string()), 7);
            names.insert((Table::Team, "Spartak".to_string()), 1);
            Self { names }
        }
    }

    #[async_trait]
    impl NameResolver for StubResolver {
        async fn id_of(&self, table: Table, name: &str) -> Result<Option<i32>, StorageError> {
            Ok(self.names.get(&(table, name.to_string())).copied())
        }

        async fn exists(&self, table: Table, id: i32) -> Result<bool, StorageError> {
            Ok(self.names.iter().any(|((t, _), v)| *t == table && *v == id))
        }
    }

    fn game_inputs(pairs: &[(&str, &str)]) -> Vec<String> {
        fields_for(Table::Games)
            .iter()
            .map(|f| {
                pairs
                    .iter()
                    .find(|(k, _)| *k == f.key)
                    .map(|(_, v)| v.to_string())
                    .unwrap_or_default()
            })
            .collect()
    }

    #[tokio::test]
    async fn game_form_becomes_row() {
        let inputs = game_inputs(&[
            ("date", "12.05.2024"),
            ("time", "18:30"),
            ("stadium_id", "Luzhniki"),
            ("team_home", "Spartak"),
            ("team_home_year", "2010"),
            ("referee_chief", "Petrov Ivan"),
            ("payment", "1500"),
            ("game_passed", "1"),
        ]);
        let sub = FormSubmission::from_inputs(Table::Games, &inputs).unwrap();
        let row = sub.into_row(&StubResolver::new()).await.unwrap();

        assert_eq!(row.get("year"), Some(&CellValue::Int(2024)));
        assert_eq!(row.get("month"), Some(&CellValue::Int(5)));
        assert_eq!(row.get("day"), Some(&CellValue::Int(12)));
        assert_eq!(row.get("time"), Some(&CellValue::Int(1830)));
        assert_eq!(row.get("stadium_id"), Some(&CellValue::Int(3)));
        assert_eq!(row.get("referee_chief"), Some(&CellValue::Int(7)));
        assert_eq!(row.get("team_home"), Some(&CellValue::Int(1)));
        assert_eq!(row.get("game_passed"), Some(&CellValue::Int(1)));
        assert_eq!(row.get("league_id"), None);
        assert!(row.columns().all(|c| Table::Games.has_column(c)));
    }

    #[test]
    fn missing_required_fields_are_all_reported() {
        let inputs = game_inputs(&[("time", "25:00")]);
        let errors = FormSubmission::from_inputs(Table::Games, &inputs).unwrap_err();
        let idx: Vec<usize> = errors.iter().map(|(i, _)| *i).collect();
        // date, time (bad format), stadium, chief referee
        assert_eq!(idx, vec![1, 2, 3, 8]);
        assert_eq!(errors[0].1, FieldError::Required("Date"));
        assert!(matches!(errors[1].1, FieldError::Format { .. }));
    }

    #[tokio::test]
    async fn unknown_lookup_name_is_an_error() {
        let inputs = game_inputs(&[
            ("date", "12.05.2024"),
            ("time", "18:30"),
            ("stadium_id", "Wembley"),
            ("referee_chief", "Petrov Ivan"),
        ]);
        let sub = FormSubmission::from_inputs(Table::Games, &inputs).unwrap();
        let err = sub.into_row(&StubResolver::new()).await.unwrap_err();
        assert!(matches!(
            err,
            FormError::Field(FieldError::UnknownName { table: "Stadium", .. })
        ));
    }

    #[tokio::test]
    async fn explicit_ids_are_checked() {
        let sub = FormSubmission::single(Table::Games, 1, "stadium", "#3").unwrap();
        let row = sub.into_row(&StubResolver::new()).await.unwrap();
        assert_eq!(row.get("stadium_id"), Some(&CellValue::Int(3)));

        let sub = FormSubmission::single(Table::Games, 1, "stadium", "#99").unwrap();
        assert!(sub.into_row(&StubResolver::new()).await.is_err());
    }

    #[tokio::test]
    async fn single_edit_of_optional_field_can_clear_it() {
        let sub = FormSubmission::single(Table::Referee, 4, "phone", "").unwrap();
        let row = sub.into_row(&StubResolver::new()).await.unwrap();
        assert_eq!(row.get("phone"), Some(&CellValue::Null));

        assert_eq!(
            FormSubmission::single(Table::Referee, 4, "second_name", " "),
            Err(FieldError::Required("Second name"))
        );
        assert!(matches!(
            FormSubmission::single(Table::Team, 1, "colour", "red"),
            Err(FieldError::UnknownField { .. })
        ));
    }
}
