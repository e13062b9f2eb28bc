use crate::app_state::{App, FocusArea, InputMode, ViewMode};
use crate::form::FormState;
use crate::schedule::{GameStatus, GameView};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title and payment summary
            Constraint::Min(0),    // menu + main view
            Constraint::Min(8),    // command bar and log
        ])
        .split(f.size());

    render_top_bar(f, chunks[0], app);

    // menu on the left, active view on the right
    let middle_chunks = Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(0)])
        .split(chunks[1]);

    render_left_menu(f, middle_chunks[0], app);
    render_main_view(f, middle_chunks[1], app);
    render_bottom_bar(f, chunks[2], app);

    // the dialog is drawn last so it covers the views
    if let Some(form) = app.form.as_ref() {
        render_form(f, chunks[1], form, app);
    }
}

pub fn status_color(status: GameStatus) -> Color {
    match status {
        GameStatus::NotPassed => Color::Red,
        GameStatus::Passed => Color::Yellow,
        GameStatus::PayDone => Color::Green,
    }
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_top_bar(f: &mut Frame, area: Rect, app: &App) {
    let title = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Cyan));

    let s = &app.summary;
    let title_text = Line::from(vec![
        Span::styled(
            " Referee desk ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" games {} ", s.total)),
        Span::styled(
            format!(" ○ {} ", s.not_passed),
            Style::default().fg(status_color(GameStatus::NotPassed)),
        ),
        Span::styled(
            format!(" ✓ {} ", s.passed),
            Style::default().fg(status_color(GameStatus::Passed)),
        ),
        Span::styled(
            format!(" $ {} ", s.pay_done),
            Style::default().fg(status_color(GameStatus::PayDone)),
        ),
        Span::raw(format!(
            " | earned {} outstanding {} paid {}",
            s.earned, s.outstanding, s.paid
        )),
    ]);

    let paragraph = Paragraph::new(title_text)
        .block(title)
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(paragraph, area);
}

fn render_left_menu(f: &mut Frame, area: Rect, app: &App) {
    let menu_items: Vec<ListItem> = ViewMode::MENU
        .iter()
        .enumerate()
        .map(|(i, mode)| {
            let is_selected = i == app.menu_selected_index;
            let is_active = *mode == app.view_mode;

            let style = if is_selected {
                if app.focus_area == FocusArea::Menu {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Magenta)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD)
                }
            } else if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };

            let prefix = if is_active { "● " } else { "○ " };
            ListItem::new(format!("{}{}", prefix, mode.label())).style(style)
        })
        .collect();

    let title = if app.focus_area == FocusArea::Menu {
        "Menu (Enter/c)"
    } else {
        "Menu (←)"
    };

    let menu = List::new(menu_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(border_style(app.focus_area == FocusArea::Menu)),
    );

    f.render_widget(menu, area);
}

fn selectable_list<'a>(items: Vec<ListItem<'a>>, title: String, active: bool) -> List<'a> {
    List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(border_style(active)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ")
}

fn game_line(g: &GameView) -> Line<'_> {
    let color = status_color(g.status);
    Line::from(vec![
        Span::styled(format!("{} ", g.status.symbol()), Style::default().fg(color)),
        Span::styled(format!("#{:<4}", g.id), Style::default().fg(Color::Gray)),
        Span::raw(format!("{} {} ", g.date_label(), g.time_label())),
        Span::styled(
            format!("{:<28}", g.matchup()),
            Style::default().fg(Color::White),
        ),
        Span::raw(format!(
            " {} | {}",
            g.stadium.as_deref().unwrap_or("-"),
            g.referee_chief.as_deref().unwrap_or("-")
        )),
        Span::styled(
            g.payment.map(|p| format!("  {}", p)).unwrap_or_default(),
            Style::default().fg(color),
        ),
    ])
}

fn render_main_view(f: &mut Frame, area: Rect, app: &mut App) {
    let active = app.focus_area == FocusArea::MainView;
    match app.view_mode {
        ViewMode::Games => {
            let items: Vec<ListItem> = app
                .game_list
                .iter()
                .map(|g| ListItem::new(game_line(g)))
                .collect();

            let status_filter = app
                .filter_status
                .map(|s| s.key().to_string())
                .unwrap_or_else(|| "all".to_string());
            let query_info = if app.filter_query.is_empty() {
                String::new()
            } else {
                format!(" search: \"{}\"", app.filter_query)
            };
            let title = if active {
                format!(
                    "Games [{}]{} (f filter, a add, e edit, p passed, $ paid, Enter detail)",
                    status_filter, query_info
                )
            } else {
                format!("Games [{}]{}", status_filter, query_info)
            };

            let list = selectable_list(items, title, active);
            app.list_state.select(Some(app.selected_index));
            f.render_stateful_widget(list, area, &mut app.list_state);
        }
        ViewMode::Referees => {
            let items: Vec<ListItem> = app
                .referees
                .iter()
                .map(|r| {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("#{:<4}", r.id), Style::default().fg(Color::Gray)),
                        Span::styled(
                            format!("{:<36}", r.full_name()),
                            Style::default().fg(Color::White),
                        ),
                        Span::styled(
                            format!("{:<18}", r.phone.as_deref().unwrap_or("")),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::styled(
                            r.category.clone().unwrap_or_default(),
                            Style::default().fg(Color::Magenta),
                        ),
                    ]))
                })
                .collect();
            let title = if active {
                format!("Referees ({}) (a add, e edit)", app.referees.len())
            } else {
                format!("Referees ({})", app.referees.len())
            };
            let list = selectable_list(items, title, active);
            app.list_state.select(Some(app.selected_index));
            f.render_stateful_widget(list, area, &mut app.list_state);
        }
        ViewMode::Stadiums => {
            let items: Vec<ListItem> = app
                .stadiums
                .iter()
                .map(|s| {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("#{:<4}", s.id), Style::default().fg(Color::Gray)),
                        Span::styled(format!("{:<24}", s.name), Style::default().fg(Color::White)),
                        Span::raw(format!("{:<32}", s.address.as_deref().unwrap_or(""))),
                        Span::styled(
                            s.city.clone().unwrap_or_default(),
                            Style::default().fg(Color::Magenta),
                        ),
                    ]))
                })
                .collect();
            let title = if active {
                format!("Stadiums ({}) (a add, e edit)", app.stadiums.len())
            } else {
                format!("Stadiums ({})", app.stadiums.len())
            };
            let list = selectable_list(items, title, active);
            app.list_state.select(Some(app.selected_index));
            f.render_stateful_widget(list, area, &mut app.list_state);
        }
        // lookup tables only carry names, so there is no per-row edit here
        ViewMode::Directory => {
            let items: Vec<ListItem> = app
                .directory_names()
                .iter()
                .map(|n| ListItem::new(n.clone()))
                .collect();
            let title = if active {
                format!("{} (f next table, a add)", app.directory_table)
            } else {
                app.directory_table.to_string()
            };
            let list = selectable_list(items, title, active);
            app.list_state.select(Some(app.selected_index));
            f.render_stateful_widget(list, area, &mut app.list_state);
        }
        ViewMode::Detail => {
            let content = match app.selected_game() {
                Some(g) => detail_lines(g),
                None => vec![Line::from("No game selected")],
            };

            let title = if active {
                "Game detail (↑↓ scroll, x back, e edit, p passed, $ paid)"
            } else {
                "Game detail"
            };

            let paragraph = Paragraph::new(content)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(title)
                        .style(border_style(active)),
                )
                .scroll((app.detail_scroll, 0));
            f.render_widget(paragraph, area);
        }
    }
}

fn detail_lines(g: &GameView) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let row = |label: &str, value: Option<&str>| {
        Line::from(vec![
            Span::styled(format!("{:<18}", label), bold),
            Span::raw(value.unwrap_or("-").to_string()),
        ])
    };
    let color = status_color(g.status);

    vec![
        Line::from(vec![
            Span::styled(format!("Game #{}  ", g.id), bold),
            Span::styled(
                format!("{} {}", g.status.symbol(), g.status),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  [{}]", g.status.icon()), Style::default().fg(Color::Gray)),
        ]),
        Line::from(""),
        row("League", g.league.as_deref()),
        row("Date", Some(&g.date_label())),
        row(
            "Kick-off",
            g.kickoff()
                .map(|k| k.format("%A %H:%M").to_string())
                .as_deref(),
        ),
        row("Stadium", g.stadium.as_deref()),
        row("Match", Some(&g.matchup())),
        Line::from(""),
        Line::from(vec![Span::styled(
            "--- Referees ---",
            Style::default().fg(Color::Yellow),
        )]),
        row("Chief", g.referee_chief.as_deref()),
        row("First assistant", g.referee_first.as_deref()),
        row("Second assistant", g.referee_second.as_deref()),
        row("Reserve", g.referee_reserve.as_deref()),
        Line::from(""),
        Line::from(vec![Span::styled(
            "--- Payment ---",
            Style::default().fg(Color::Yellow),
        )]),
        row("Amount", g.payment.map(|p| p.to_string()).as_deref()),
        row("Game passed", Some(if g.game_passed { "yes" } else { "no" })),
        row("Payment done", Some(if g.pay_done { "yes" } else { "no" })),
    ]
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

fn render_form(f: &mut Frame, area: Rect, form: &FormState, app: &App) {
    let fields = form.fields();
    let popup = centered(area, 72, fields.len() as u16 + 6);
    f.render_widget(Clear, popup);

    let candidates = form.focused_lookup().and_then(|t| app.names.get(&t));
    let mut lines: Vec<Line> = fields
        .iter()
        .zip(&form.values)
        .enumerate()
        .map(|(i, (spec, value))| {
            let focused = i == form.focus;
            let marker = if spec.required { "*" } else { " " };
            let label_style = if focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let mut spans = vec![
                Span::styled(format!("{}{:<18}", marker, spec.label), label_style),
                Span::raw(value.clone()),
            ];
            if focused {
                spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
                // ghost text for lookups, the expected format for blank fields
                match candidates.and_then(|c| form.completion_hint(c)) {
                    Some(hint) => {
                        spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)))
                    }
                    None if value.is_empty() => spans.push(Span::styled(
                        format!(" {}", spec.format.hint()),
                        Style::default().fg(Color::DarkGray),
                    )),
                    None => {}
                }
            }
            Line::from(spans)
        })
        .collect();

    lines.push(Line::from(""));
    match form.error.as_deref() {
        Some(err) => lines.push(Line::from(Span::styled(
            format!("✗ {}", err),
            Style::default().fg(Color::Red),
        ))),
        None if form.target.is_some() => lines.push(Line::from(Span::styled(
            "Enter save  Tab complete/next column  ↑↓ column  Esc cancel",
            Style::default().fg(Color::Gray),
        ))),
        None => lines.push(Line::from(Span::styled(
            "Enter next/save  Tab complete/next  ↑↓ move  Esc cancel",
            Style::default().fg(Color::Gray),
        ))),
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(form.title())
            .style(Style::default().fg(Color::Green)),
    );
    f.render_widget(paragraph, popup);
}

fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App) {
    let bottom_chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let command_prompt = if app.input_mode == InputMode::Command {
        let mut spans = vec![Span::styled(
            "Command: ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )];
        let cur = app.command_cursor.min(app.command_input.len());
        let (left, right) = app.command_input.split_at(cur);
        spans.push(Span::raw(left));
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(right));

        if let Some(hint) = app.get_completion_hint() {
            spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
        }

        vec![
            Line::from(spans),
            Line::from("Enter run  Esc cancel  Tab complete  ←→ cursor  ↑↓ history"),
        ]
    } else {
        vec![
            Line::from(vec![
                Span::styled("Command: ", Style::default().fg(Color::Yellow)),
                Span::raw("(press / for commands)"),
            ]),
            Line::from("/ command  a add  e edit  f filter  p passed  $ paid  ←→ focus  ↑↓ move  Enter/c open  x back  q quit"),
        ]
    };
    let command_paragraph = Paragraph::new(command_prompt).block(
        Block::default()
            .borders(Borders::ALL)
            .title(if app.input_mode == InputMode::Command {
                "Command mode"
            } else {
                "Command"
            })
            .style(if app.input_mode == InputMode::Command {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            }),
    );
    f.render_widget(command_paragraph, bottom_chunks[0]);

    // newest first, coloured by the message prefix
    let log_items: Vec<ListItem> = app
        .log_messages
        .iter()
        .rev()
        .take(20)
        .map(|msg| {
            let style = if msg.starts_with("✓") {
                Style::default().fg(Color::Green)
            } else if msg.starts_with("✗") {
                Style::default().fg(Color::Red)
            } else if msg.starts_with("⚠") {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(msg.as_str()).style(style)
        })
        .collect();

    let log = List::new(log_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Log ({})", app.log_messages.len()))
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(log, bottom_chunks[1]);
}
