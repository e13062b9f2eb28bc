use crate::commands::AppCommand;
use crate::form::schema::fields_for;
use crate::form::FormState;
use crate::schedule::{GameStatus, GameView, PaymentSummary, RefereeView, StadiumView};
use crate::storage::Table;
use crossterm::event::KeyCode;
use ratatui::widgets::ListState;
use std::collections::HashMap;
use std::str::FromStr;
use tokio::sync::mpsc;

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum ViewMode {
    Games,
    Referees,
    Stadiums,
    Directory,
    Detail,
}

impl ViewMode {
    pub const MENU: [ViewMode; 5] = [
        ViewMode::Games,
        ViewMode::Referees,
        ViewMode::Stadiums,
        ViewMode::Directory,
        ViewMode::Detail,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Games => "Games",
            ViewMode::Referees => "Referees",
            ViewMode::Stadiums => "Stadiums",
            ViewMode::Directory => "Directory",
            ViewMode::Detail => "Game detail",
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum InputMode {
    Normal,
    Command,
    Form,
}

#[derive(PartialEq, Debug, Clone)]
pub enum FocusArea {
    Menu,
    MainView,
}

#[derive(Debug)]
pub enum AppEvent {
    Log(String),
    Message(String),
    Error(String),
    Games(Vec<GameView>),
    Referees(Vec<RefereeView>),
    Stadiums(Vec<StadiumView>),
    Names(Table, Vec<String>),
    Summary(PaymentSummary),
    FormSaved(String),
    FormRejected(String),
}

const COMMANDS: [&str; 11] = [
    "add", "set", "passed", "paid", "delete", "names", "export", "filter", "refresh", "help",
    "quit",
];

const TABLE_WORDS: [&str; 7] = [
    "game", "referee", "stadium", "team", "league", "category", "city",
];

pub struct App {
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub focus_area: FocusArea,
    pub menu_selected_index: usize,
    pub games_all: Vec<GameView>,
    pub game_list: Vec<GameView>,
    pub referees: Vec<RefereeView>,
    pub stadiums: Vec<StadiumView>,
    pub names: HashMap<Table, Vec<String>>,
    pub directory_table: Table,
    pub summary: PaymentSummary,
    pub selected_index: usize,
    pub list_state: ListState,
    pub detail_scroll: u16,
    pub form: Option<FormState>,
    pub command_input: String,
    pub command_cursor: usize,
    pub command_history: Vec<String>,
    pub command_history_index: Option<usize>,
    pub filter_status: Option<GameStatus>,
    pub filter_query: String,
    pub log_messages: Vec<String>,
    pub cmd_tx: mpsc::UnboundedSender<AppCommand>,
    pub evt_rx: Option<mpsc::UnboundedReceiver<AppEvent>>,
}

impl App {
    pub fn new(
        startup_info: Vec<String>,
        cmd_tx: mpsc::UnboundedSender<AppCommand>,
        evt_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> App {
        let mut log_messages = vec!["refdesk started".to_string()];
        log_messages.extend(startup_info);

        App {
            view_mode: ViewMode::Games,
            input_mode: InputMode::Normal,
            focus_area: FocusArea::Menu,
            menu_selected_index: 0,
            games_all: Vec::new(),
            game_list: Vec::new(),
            referees: Vec::new(),
            stadiums: Vec::new(),
            names: HashMap::new(),
            directory_table: Table::Team,
            summary: PaymentSummary::default(),
            selected_index: 0,
            list_state: {
                let mut s = ListState::default();
                s.select(Some(0));
                s
            },
            detail_scroll: 0,
            form: None,
            command_input: String::new(),
            command_cursor: 0,
            command_history: Vec::new(),
            command_history_index: None,
            filter_status: None,
            filter_query: String::new(),
            log_messages,
            cmd_tx,
            evt_rx: Some(evt_rx),
        }
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    /// Applies one event from the background task.
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Log(msg) | AppEvent::Message(msg) | AppEvent::Error(msg) => self.add_log(msg),
            // list refreshes keep the current filter and selection
            AppEvent::Games(list) => {
                self.games_all = list;
                self.apply_filters();
                self.clamp_selection();
            }
            AppEvent::Referees(list) => {
                self.referees = list;
                self.clamp_selection();
            }
            AppEvent::Stadiums(list) => {
                self.stadiums = list;
                self.clamp_selection();
            }
            AppEvent::Names(table, names) => {
                self.names.insert(table, names);
                self.clamp_selection();
            }
            AppEvent::Summary(summary) => self.summary = summary,
            // a save closes the dialog, a rejection keeps it open
            AppEvent::FormSaved(msg) => {
                self.form = None;
                if self.input_mode == InputMode::Form {
                    self.input_mode = InputMode::Normal;
                }
                self.add_log(msg);
            }
            AppEvent::FormRejected(msg) => match self.form.as_mut() {
                Some(form) => form.error = Some(msg),
                None => self.add_log(msg),
            },
        }
    }

    pub fn directory_names(&self) -> &[String] {
        self.names
            .get(&self.directory_table)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn selected_game(&self) -> Option<&GameView> {
        self.game_list.get(self.selected_index)
    }

    fn current_len(&self) -> usize {
        match self.view_mode {
            ViewMode::Games | ViewMode::Detail => self.game_list.len(),
            ViewMode::Referees => self.referees.len(),
            ViewMode::Stadiums => self.stadiums.len(),
            ViewMode::Directory => self.directory_names().len(),
        }
    }

    /// Table the `a` key adds to from the current view.
    fn current_table(&self) -> Table {
        match self.view_mode {
            ViewMode::Games | ViewMode::Detail => Table::Games,
            ViewMode::Referees => Table::Referee,
            ViewMode::Stadiums => Table::Stadium,
            ViewMode::Directory => self.directory_table,
        }
    }

    /// Ghost-text suggestion for the command bar.
    pub fn get_completion_hint(&self) -> Option<String> {
        let input = self.command_input.trim_start();
        if input.is_empty() {
            return None;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        let trailing_space = input.ends_with(' ');
        if parts.len() == 1 && !trailing_space {
            return COMMANDS
                .iter()
                .find(|c| c.starts_with(parts[0]) && **c != parts[0])
                .map(|c| c[parts[0].len()..].to_string());
        }

        let takes_table = matches!(parts[0], "add" | "set" | "delete" | "names");
        if !takes_table {
            return None;
        }
        let cur = match (parts.len(), trailing_space) {
            (1, true) => "",
            (2, false) => parts[1],
            _ => return None,
        };
        if cur.is_empty() {
            return None;
        }
        TABLE_WORDS
            .iter()
            .find(|t| t.starts_with(cur) && **t != cur)
            .map(|t| t[cur.len()..].to_string())
    }

    pub fn clamp_selection(&mut self) {
        let len = self.current_len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
        self.list_state.select(Some(self.selected_index));
    }

    pub fn apply_filters(&mut self) {
        let filtered: Vec<GameView> = self
            .games_all
            .iter()
            .filter(|g| self.filter_status.map_or(true, |s| g.status == s))
            .filter(|g| self.filter_query.is_empty() || g.matches(&self.filter_query))
            .cloned()
            .collect();

        self.game_list = filtered;
        if self.selected_index >= self.game_list.len() {
            self.selected_index = 0;
        }
        self.list_state.select(Some(self.selected_index));
    }

    pub fn open_form(&mut self, table: Table) {
        self.form = Some(FormState::new(table));
        self.input_mode = InputMode::Form;
    }

    /// Opens a one-field dialog on the selected row, starting at its first column.
    fn open_edit_form(&mut self) {
        let id = match self.view_mode {
            ViewMode::Games | ViewMode::Detail => self.selected_game().map(|g| g.id),
            ViewMode::Referees => self.referees.get(self.selected_index).map(|r| r.id),
            ViewMode::Stadiums => self.stadiums.get(self.selected_index).map(|s| s.id),
            ViewMode::Directory => None,
        };
        let table = self.current_table();
        let Some(first) = fields_for(table).first() else {
            return;
        };
        if let Some(form) = id.and_then(|id| FormState::single_field(table, id, first.key)) {
            self.form = Some(form);
            self.input_mode = InputMode::Form;
        }
    }

    fn switch_view(&mut self, mode: ViewMode) {
        if self.view_mode != mode && mode != ViewMode::Detail && self.view_mode != ViewMode::Detail {
            self.selected_index = 0;
        }
        self.view_mode = mode;
        self.detail_scroll = 0;
        if let Some(i) = ViewMode::MENU.iter().position(|m| *m == mode) {
            self.menu_selected_index = i;
        }
        self.clamp_selection();
    }

    fn apply_filter_command(&mut self, args: &str) {
        let args = args.trim();
        if args.is_empty() || args == "clear" || args == "--clear" {
            self.filter_query.clear();
            self.filter_status = None;
        } else if let Ok(status) = GameStatus::from_str(args) {
            self.filter_status = Some(status);
        } else {
            self.filter_query = args.to_string();
        }
        self.apply_filters();
    }

    fn finish_command(&mut self, cmd: String) {
        self.command_history.push(cmd);
        self.command_history_index = None;
        self.command_input.clear();
        self.command_cursor = 0;
        if self.input_mode == InputMode::Command {
            self.input_mode = InputMode::Normal;
        }
    }

    fn send_for_selected_game(&mut self, make: impl Fn(i32) -> AppCommand) {
        if !matches!(self.view_mode, ViewMode::Games | ViewMode::Detail) {
            return;
        }
        if let Some(id) = self.selected_game().map(|g| g.id) {
            let _ = self.cmd_tx.send(make(id));
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) -> bool {
        let Some(form) = self.form.as_mut() else {
            self.input_mode = InputMode::Normal;
            return false;
        };
        match key {
            KeyCode::Esc => {
                self.form = None;
                self.input_mode = InputMode::Normal;
            }
            // Enter walks the fields and saves from the last one
            KeyCode::Enter if !form.is_last_field() => form.next_field(),
            KeyCode::Enter => {
                if let Some(sub) = form.submit() {
                    let _ = self.cmd_tx.send(AppCommand::Save(sub));
                }
            }
            KeyCode::Tab => {
                let names = form.focused_lookup().and_then(|t| self.names.get(&t));
                let completed = match names {
                    Some(names) if form.completion_hint(names).is_some() => form.complete(names),
                    _ => false,
                };
                if !completed {
                    form.next_field();
                }
            }
            KeyCode::Down => form.next_field(),
            KeyCode::Up | KeyCode::BackTab => form.prev_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => {
                form.insert_char(c);
            }
            _ => {}
        }
        false
    }

    fn handle_command_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Enter => {
                let cmd_owned = self.command_input.trim().to_string();
                if cmd_owned.is_empty() || cmd_owned == "q" {
                    self.command_input.clear();
                    self.command_cursor = 0;
                    self.input_mode = InputMode::Normal;
                    return false;
                }

                // filtering is local to the screen, everything else goes to the worker
                let mut words = cmd_owned.split_whitespace();
                if words.next() == Some("filter") {
                    let rest = words.collect::<Vec<_>>().join(" ");
                    self.apply_filter_command(&rest);
                    self.finish_command(cmd_owned);
                    return false;
                }

                let cmd = AppCommand::from_str(&cmd_owned)
                    .unwrap_or_else(|_| AppCommand::Unknown(cmd_owned.clone()));
                self.finish_command(cmd_owned);
                match cmd {
                    AppCommand::Add { table } => self.open_form(table),
                    AppCommand::Quit => return true,
                    other => {
                        let _ = self.cmd_tx.send(other);
                    }
                }
                false
            }
            KeyCode::Esc => {
                self.command_input.clear();
                self.command_cursor = 0;
                self.input_mode = InputMode::Normal;
                false
            }
            KeyCode::Tab => {
                if let Some(hint) = self.get_completion_hint() {
                    let insert = format!("{} ", hint);
                    self.command_input.insert_str(self.command_cursor, &insert);
                    self.command_cursor += insert.len();
                }
                false
            }
            KeyCode::Up => {
                if self.command_history.is_empty() {
                    return false;
                }
                let next = match self.command_history_index {
                    None => self.command_history.len().saturating_sub(1),
                    Some(i) => i.saturating_sub(1),
                };
                self.command_history_index = Some(next);
                if let Some(cmd) = self.command_history.get(next) {
                    self.command_input = cmd.clone();
                    self.command_cursor = self.command_input.len();
                }
                false
            }
            KeyCode::Down => {
                let Some(i) = self.command_history_index else {
                    return false;
                };
                let next = i + 1;
                if next >= self.command_history.len() {
                    self.command_history_index = None;
                    self.command_input.clear();
                    self.command_cursor = 0;
                    return false;
                }
                self.command_history_index = Some(next);
                if let Some(cmd) = self.command_history.get(next) {
                    self.command_input = cmd.clone();
                    self.command_cursor = self.command_input.len();
                }
                false
            }
            KeyCode::Backspace => {
                if self.command_cursor > 0 {
                    let idx = prev_char_boundary(&self.command_input, self.command_cursor);
                    self.command_input.remove(idx);
                    self.command_cursor = idx;
                }
                false
            }
            KeyCode::Delete => {
                if self.command_cursor < self.command_input.len() {
                    self.command_input.remove(self.command_cursor);
                }
                false
            }
            KeyCode::Left => {
                if self.command_cursor > 0 {
                    self.command_cursor = prev_char_boundary(&self.command_input, self.command_cursor);
                }
                false
            }
            KeyCode::Right => {
                if let Some(c) = self.command_input[self.command_cursor..].chars().next() {
                    self.command_cursor += c.len_utf8();
                }
                false
            }
            KeyCode::Home => {
                self.command_cursor = 0;
                false
            }
            KeyCode::End => {
                self.command_cursor = self.command_input.len();
                false
            }
            KeyCode::Char(c) => {
                self.command_input.insert(self.command_cursor, c);
                self.command_cursor += c.len_utf8();
                false
            }
            _ => false,
        }
    }

    /// Returns `true` when the application should exit.
    pub fn handle_key_event(&mut self, key: KeyCode) -> bool {
        // dialog and command bar take every key while open
        match self.input_mode {
            InputMode::Form => return self.handle_form_key(key),
            InputMode::Command => return self.handle_command_key(key),
            InputMode::Normal => {}
        }

        match key {
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Command;
                self.command_input.clear();
                self.command_cursor = 0;
                false
            }
            KeyCode::Char('q') => true,
            KeyCode::Left => {
                self.focus_area = FocusArea::Menu;
                false
            }
            KeyCode::Right => {
                self.focus_area = FocusArea::MainView;
                false
            }
            // arrows move in the menu, scroll the detail, or move the list selection
            KeyCode::Up => {
                if self.focus_area == FocusArea::Menu {
                    self.menu_selected_index = self.menu_selected_index.saturating_sub(1);
                } else if self.view_mode == ViewMode::Detail {
                    self.detail_scroll = self.detail_scroll.saturating_sub(1);
                } else if self.selected_index > 0 {
                    self.selected_index -= 1;
                    self.list_state.select(Some(self.selected_index));
                }
                false
            }
            KeyCode::Down => {
                if self.focus_area == FocusArea::Menu {
                    if self.menu_selected_index + 1 < ViewMode::MENU.len() {
                        self.menu_selected_index += 1;
                    }
                } else if self.view_mode == ViewMode::Detail {
                    self.detail_scroll = self.detail_scroll.saturating_add(1);
                } else if self.selected_index + 1 < self.current_len() {
                    self.selected_index += 1;
                    self.list_state.select(Some(self.selected_index));
                }
                false
            }
            KeyCode::Enter | KeyCode::Char('c') => {
                if self.focus_area == FocusArea::Menu {
                    let mode = ViewMode::MENU[self.menu_selected_index];
                    self.switch_view(mode);
                    self.focus_area = FocusArea::MainView;
                } else if self.view_mode == ViewMode::Games && !self.game_list.is_empty() {
                    self.switch_view(ViewMode::Detail);
                }
                false
            }
            KeyCode::Char('x') => {
                if self.focus_area == FocusArea::MainView && self.view_mode == ViewMode::Detail {
                    self.switch_view(ViewMode::Games);
                }
                false
            }
            // status filter on games, next lookup table in the directory
            KeyCode::Char('f') => {
                if self.focus_area == FocusArea::MainView {
                    match self.view_mode {
                        ViewMode::Games => {
                            self.filter_status = GameStatus::cycle(self.filter_status);
                            self.apply_filters();
                        }
                        ViewMode::Directory => {
                            let tables = Table::name_tables();
                            let pos = tables
                                .iter()
                                .position(|t| *t == self.directory_table)
                                .unwrap_or(0);
                            self.directory_table = tables[(pos + 1) % tables.len()];
                            self.selected_index = 0;
                            self.clamp_selection();
                        }
                        _ => {}
                    }
                }
                false
            }
            KeyCode::Char('a') => {
                let table = self.current_table();
                self.open_form(table);
                false
            }
            KeyCode::Char('e') => {
                if self.focus_area == FocusArea::MainView {
                    self.open_edit_form();
                }
                false
            }
            KeyCode::Char('p') => {
                self.send_for_selected_game(|id| AppCommand::MarkPassed { id });
                false
            }
            KeyCode::Char('$') => {
                self.send_for_selected_game(|id| AppCommand::MarkPaid { id });
                false
            }
            _ => false,
        }
    }
}

fn prev_char_boundary(s: &str, idx: usize) -> usize {
    s[..idx].char_indices().last().map(|(i, _)| i).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::model::tests::game;

    fn app() -> (App, mpsc::UnboundedReceiver<AppCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (_evt_tx, evt_rx) = mpsc::unbounded_channel();
        (App::new(Vec::new(), cmd_tx, evt_rx), cmd_rx)
    }

    fn type_str(app: &mut App, s: &str) {
        for ch in s.chars() {
            app.handle_key_event(KeyCode::Char(ch));
        }
    }

    #[test]
    fn status_filter_cycles_through_games() {
        let (mut app, _rx) = app();
        app.apply_event(AppEvent::Games(vec![
            game(1, false, false, None),
            game(2, true, false, None),
            game(3, true, true, None),
        ]));
        app.focus_area = FocusArea::MainView;

        app.handle_key_event(KeyCode::Char('f'));
        assert_eq!(app.game_list.iter().map(|g| g.id).collect::<Vec<_>>(), vec![1]);
        app.handle_key_event(KeyCode::Char('f'));
        assert_eq!(app.game_list.iter().map(|g| g.id).collect::<Vec<_>>(), vec![2]);
        app.handle_key_event(KeyCode::Char('f'));
        app.handle_key_event(KeyCode::Char('f'));
        assert_eq!(app.game_list.len(), 3);
    }

    #[test]
    fn filter_command_sets_status_or_text() {
        let (mut app, _rx) = app();
        let mut other = game(2, true, false, None);
        other.stadium = Some("Dynamo Arena".into());
        app.apply_event(AppEvent::Games(vec![game(1, false, false, None), other]));

        app.handle_key_event(KeyCode::Char('/'));
        type_str(&mut app, "filter passed");
        app.handle_key_event(KeyCode::Enter);
        assert_eq!(app.filter_status, Some(GameStatus::Passed));
        assert_eq!(app.game_list.len(), 1);

        app.handle_key_event(KeyCode::Char('/'));
        type_str(&mut app, "filter clear");
        app.handle_key_event(KeyCode::Enter);
        app.handle_key_event(KeyCode::Char('/'));
        type_str(&mut app, "filter arena");
        app.handle_key_event(KeyCode::Enter);
        assert_eq!(app.game_list.iter().map(|g| g.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn add_command_opens_form_and_enter_sends_save() {
        let (mut app, mut rx) = app();
        app.handle_key_event(KeyCode::Char('/'));
        type_str(&mut app, "add team");
        app.handle_key_event(KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Form);
        assert_eq!(app.form.as_ref().map(|f| f.table), Some(Table::Team));

        type_str(&mut app, "Zenit");
        app.handle_key_event(KeyCode::Enter);
        match rx.try_recv() {
            Ok(AppCommand::Save(sub)) => assert_eq!(sub.table, Table::Team),
            other => panic!("unexpected {other:?}"),
        }

        app.apply_event(AppEvent::FormSaved("✓ saved".into()));
        assert!(app.form.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn form_tab_completes_lookup_names() {
        let (mut app, _rx) = app();
        app.apply_event(AppEvent::Names(
            Table::League,
            vec!["Youth Cup".into(), "Premier".into()],
        ));
        app.handle_key_event(KeyCode::Char('a'));
        assert_eq!(app.form.as_ref().map(|f| f.table), Some(Table::Games));

        type_str(&mut app, "you");
        app.handle_key_event(KeyCode::Tab);
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.values[0], "Youth Cup");
        assert_eq!(form.focus, 0);

        app.handle_key_event(KeyCode::Tab);
        assert_eq!(app.form.as_ref().unwrap().focus, 1);
    }

    #[test]
    fn rejected_save_keeps_form_open_with_error() {
        let (mut app, _rx) = app();
        app.open_form(Table::Stadium);
        app.apply_event(AppEvent::FormRejected("City: no City named \"X\"".into()));
        assert_eq!(
            app.form.as_ref().and_then(|f| f.error.as_deref()),
            Some("City: no City named \"X\"")
        );
        app.handle_key_event(KeyCode::Esc);
        assert!(app.form.is_none());
    }

    #[test]
    fn mark_keys_target_selected_game() {
        let (mut app, mut rx) = app();
        app.apply_event(AppEvent::Games(vec![game(5, false, false, None), game(6, false, false, None)]));
        app.focus_area = FocusArea::MainView;
        app.handle_key_event(KeyCode::Down);
        app.handle_key_event(KeyCode::Char('$'));
        assert!(matches!(rx.try_recv(), Ok(AppCommand::MarkPaid { id: 6 })));
        app.handle_key_event(KeyCode::Char('p'));
        assert!(matches!(rx.try_recv(), Ok(AppCommand::MarkPassed { id: 6 })));
    }

    #[test]
    fn completion_hint_for_commands_and_tables() {
        let (mut app, _rx) = app();
        app.command_input = "exp".into();
        assert_eq!(app.get_completion_hint().as_deref(), Some("ort"));
        app.command_input = "add ref".into();
        assert_eq!(app.get_completion_hint().as_deref(), Some("eree"));
        app.command_input = "paid 3".into();
        assert_eq!(app.get_completion_hint(), None);
    }

    #[test]
    fn directory_view_cycles_name_tables() {
        let (mut app, _rx) = app();
        app.focus_area = FocusArea::Menu;
        app.menu_selected_index = 3;
        app.handle_key_event(KeyCode::Enter);
        assert_eq!(app.view_mode, ViewMode::Directory);
        assert_eq!(app.directory_table, Table::Team);
        app.handle_key_event(KeyCode::Char('f'));
        assert_eq!(app.directory_table, Table::League);
        app.handle_key_event(KeyCode::Char('a'));
        assert_eq!(app.form.as_ref().map(|f| f.table), Some(Table::League));
    }

    #[test]
    fn edit_key_saves_one_column_of_selected_row() {
        let (mut app, mut rx) = app();
        app.apply_event(AppEvent::Games(vec![game(5, false, false, None), game(6, false, false, None)]));
        app.focus_area = FocusArea::MainView;
        app.handle_key_event(KeyCode::Down);
        app.handle_key_event(KeyCode::Char('e'));
        assert_eq!(app.input_mode, InputMode::Form);
        assert_eq!(app.form.as_ref().map(|f| f.title()).as_deref(), Some("Edit Games #6"));

        // league, then back around to payment
        for _ in 0..3 {
            app.handle_key_event(KeyCode::Up);
        }
        assert_eq!(app.form.as_ref().map(|f| f.focused().key), Some("payment"));
        type_str(&mut app, "1800");
        app.handle_key_event(KeyCode::Enter);
        match rx.try_recv() {
            Ok(AppCommand::Save(sub)) => {
                assert_eq!(sub.table, Table::Games);
                assert_eq!(sub.target, Some(6));
                assert_eq!(sub.fields.len(), 1);
                assert_eq!(sub.fields[0].0.key, "payment");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn edit_key_targets_selected_stadium_and_skips_directory() {
        let (mut app, mut rx) = app();
        app.apply_event(AppEvent::Stadiums(vec![StadiumView {
            id: 9,
            name: "Old Arena".into(),
            address: None,
            city: None,
        }]));
        app.focus_area = FocusArea::MainView;
        app.view_mode = ViewMode::Stadiums;
        app.handle_key_event(KeyCode::Char('e'));
        type_str(&mut app, "New Arena");
        app.handle_key_event(KeyCode::Enter);
        match rx.try_recv() {
            Ok(AppCommand::Save(sub)) => {
                assert_eq!(sub.table, Table::Stadium);
                assert_eq!(sub.target, Some(9));
            }
            other => panic!("unexpected {other:?}"),
        }

        app.apply_event(AppEvent::FormSaved("✓ Stadium #9 saved".into()));
        app.view_mode = ViewMode::Directory;
        app.handle_key_event(KeyCode::Char('e'));
        assert!(app.form.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn only_the_filter_word_filters_locally() {
        let (mut app, mut rx) = app();
        app.apply_event(AppEvent::Games(vec![game(1, true, false, None), game(2, false, false, None)]));
        for typed in ["filters x", "filterpassed"] {
            app.handle_key_event(KeyCode::Char('/'));
            type_str(&mut app, typed);
            app.handle_key_event(KeyCode::Enter);
            assert!(matches!(rx.try_recv(), Ok(AppCommand::Unknown(_))));
            assert_eq!(app.filter_status, None);
            assert!(app.filter_query.is_empty());
            assert_eq!(app.game_list.len(), 2);
        }

        app.handle_key_event(KeyCode::Char('/'));
        type_str(&mut app, "filter passed");
        app.handle_key_event(KeyCode::Enter);
        assert_eq!(app.filter_status, Some(GameStatus::Passed));
        assert!(rx.try_recv().is_err());
    }
}
