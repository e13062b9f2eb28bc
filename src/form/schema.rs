use crate::form::format::FieldFormat;
use crate::storage::Table;

/// One input of a data-entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column written by this field. `date` expands to `year`/`month`/`day`.
    pub key: &'static str,
    pub label: &'static str,
    pub format: FieldFormat,
    pub required: bool,
}

const fn field(key: &'static str, label: &'static str, format: FieldFormat, required: bool) -> FieldSpec {
    FieldSpec {
        key,
        label,
        format,
        required,
    }
}

pub const DATE_KEY: &str = "date";

static GAME_FIELDS: [FieldSpec; 15] = [
    field("league_id", "League", FieldFormat::Lookup(Table::League), false),
    field(DATE_KEY, "Date", FieldFormat::Date, true),
    field("time", "Time", FieldFormat::Time, true),
    field("stadium_id", "Stadium", FieldFormat::Lookup(Table::Stadium), true),
    field("team_home", "Home team", FieldFormat::Lookup(Table::Team), false),
    field("team_home_year", "Home team year", FieldFormat::Year, false),
    field("team_guest", "Guest team", FieldFormat::Lookup(Table::Team), false),
    field("team_guest_year", "Guest team year", FieldFormat::Year, false),
    field("referee_chief", "Chief referee", FieldFormat::Lookup(Table::Referee), true),
    field("referee_first", "First assistant", FieldFormat::Lookup(Table::Referee), false),
    field("referee_second", "Second assistant", FieldFormat::Lookup(Table::Referee), false),
    field("referee_reserve", "Reserve referee", FieldFormat::Lookup(Table::Referee), false),
    field("payment", "Payment", FieldFormat::Integer, false),
    field("game_passed", "Game passed", FieldFormat::Flag, false),
    field("pay_done", "Payment done", FieldFormat::Flag, false),
];

static REFEREE_FIELDS: [FieldSpec; 5] = [
    field("second_name", "Second name", FieldFormat::Text, true),
    field("first_name", "First name", FieldFormat::Text, true),
    field("third_name", "Third name", FieldFormat::Text, false),
    field("phone", "Phone", FieldFormat::Phone, false),
    field("category_id", "Category", FieldFormat::Lookup(Table::Category), false),
];

static STADIUM_FIELDS: [FieldSpec; 3] = [
    field("name", "Name", FieldFormat::Text, true),
    field("address", "Address", FieldFormat::Text, false),
    field("city_id", "City", FieldFormat::Lookup(Table::City), false),
];

static NAME_FIELDS: [FieldSpec; 1] = [field("name", "Name", FieldFormat::Text, true)];

/// The field list rendered by the data-entry dialog for `table`.
pub fn fields_for(table: Table) -> &'static [FieldSpec] {
    match table {
        Table::Games => &GAME_FIELDS,
        Table::Referee => &REFEREE_FIELDS,
        Table::Stadium => &STADIUM_FIELDS,
        Table::Team | Table::League | Table::Category | Table::City => &NAME_FIELDS,
    }
}

/// Finds a field by column key or by label, case-insensitively.
pub fn find_field(table: Table, name: &str) -> Option<&'static FieldSpec> {
    let name = name.trim();
    fields_for(table).iter().find(|f| {
        f.key.eq_ignore_ascii_case(name)
            || f.label.eq_ignore_ascii_case(name)
            || f.key.trim_end_matches("_id").eq_ignore_ascii_case(name)
    })
}

pub fn title_for(table: Table) -> &'static str {
    match table {
        Table::Games => "New game",
        Table::Referee => "New referee",
        Table::Stadium => "New stadium",
        Table::Team => "New team",
        Table::League => "New league",
        Table::Category => "New category",
        Table::City => "New city",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_is_a_real_column() {
        for table in Table::ALL {
            for f in fields_for(table) {
                assert!(
                    f.key == DATE_KEY || table.has_column(f.key),
                    "{} has no column {}",
                    table,
                    f.key
                );
            }
        }
    }

    #[test]
    fn game_form_requires_stadium_and_chief() {
        let required: Vec<&str> = fields_for(Table::Games)
            .iter()
            .filter(|f| f.required)
            .map(|f| f.key)
            .collect();
        assert_eq!(required, vec!["date", "time", "stadium_id", "referee_chief"]);
    }

    #[test]
    fn find_field_by_key_label_or_short_key() {
        assert_eq!(find_field(Table::Games, "payment").map(|f| f.key), Some("payment"));
        assert_eq!(find_field(Table::Games, "chief referee").map(|f| f.key), Some("referee_chief"));
        assert_eq!(find_field(Table::Games, "stadium").map(|f| f.key), Some("stadium_id"));
        assert_eq!(find_field(Table::Referee, "category").map(|f| f.key), Some("category_id"));
        assert!(find_field(Table::Team, "address").is_none());
    }
}
