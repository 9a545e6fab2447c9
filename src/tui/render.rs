//! Drawing for each tab and overlay of the terminal user interface.

use chrono::Datelike;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Tabs,
        Wrap,
    },
    Frame,
};

use crate::fields::Status;
use crate::gateway::PersistenceGateway;
use crate::tui::app::App;
use crate::tui::colors::{priority_color, status_color, DARK_PURPLE, DARK_RED, GOLD};
use crate::tui::enums::{AppState, Tab};
use crate::tui::input::InputField;
use crate::tui::task_form::{
    DATE_ORDER, DESCRIPTION_ORDER, FIELD_COUNT, FIELD_LABELS, KIND_ORDER, REPORT_ORDER,
};
use crate::tui::utils::{centered_rect, clip};
use crate::views::{
    self, calendar_month, format_date, CalendarCell, KanbanColumn, WEEKDAY_HEADERS,
};

const CARD_HEIGHT: u16 = 5;

fn text_on(bg: Color) -> Color {
    if bg == GOLD {
        Color::Rgb(20, 20, 20)
    } else {
        Color::White
    }
}

impl<G: PersistenceGateway> App<G> {
    /// Main render function that dispatches to the active tab and overlay.
    pub(super) fn render(&mut self, f: &mut Frame) {
        let screen = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(screen);

        self.render_tabs(f, chunks[0]);
        match self.tab {
            Tab::Table => self.render_table(f, chunks[1]),
            Tab::Kanban => self.render_kanban(f, chunks[1]),
            Tab::Calendar => self.render_calendar(f, chunks[1]),
            Tab::Dashboard => self.render_dashboard(f, chunks[1]),
        }
        self.render_status_bar(f, chunks[2]);

        match self.state {
            AppState::AddTask => self.render_form(f, chunks[1], "Add Task"),
            AppState::EditTask => self.render_form(f, chunks[1], "Edit Task"),
            AppState::ConfirmDelete => self.render_confirm(f, chunks[1]),
            AppState::Help => self.render_help(f, chunks[1]),
            AppState::Browse => {}
        }
        self.render_toasts(f, screen);
    }

    fn render_tabs(&self, f: &mut Frame, area: Rect) {
        let titles = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{} {}", i + 1, t.title()));
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(
                        " TASK TRACKER ",
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
            )
            .highlight_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, area);
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect) {
        let rows = self.table_rows();
        let total = self.store.list().len();
        let title = format!(
            " {} ({}/{}) ",
            if self.compact { "List" } else { "Tasks" },
            rows.len(),
            total
        );
        let block = Block::default().borders(Borders::ALL).title(title);

        if rows.is_empty() {
            let message = if total == 0 {
                "No tasks yet. Press 'a' to add one."
            } else {
                "No tasks match the current filters. Press 'x' to clear them."
            };
            let empty = Paragraph::new(message)
                .block(block)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(empty, area);
            return;
        }

        let headers: &[&str] = if self.compact {
            &["Report", "Description", "Date", "Status"]
        } else {
            &[
                "Type",
                "Report",
                "Description",
                "Date",
                "Status",
                "Priority",
                "Depends on",
            ]
        };
        let header = Row::new(
            headers
                .iter()
                .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .style(Style::default().bg(DARK_PURPLE).fg(Color::White))
        .height(1);

        let table_rows = rows.iter().map(|r| {
            let status = Cell::from(Span::styled(
                r.status.label(),
                Style::default().fg(status_color(r.status)),
            ));
            let style = if r.status == Status::Completed {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            if self.compact {
                Row::new(vec![
                    Cell::from(r.report.clone()),
                    Cell::from(r.description.clone()),
                    Cell::from(r.date.clone()),
                    status,
                ])
                .style(style)
            } else {
                Row::new(vec![
                    Cell::from(r.kind.clone()),
                    Cell::from(r.report.clone()),
                    Cell::from(r.description.clone()),
                    Cell::from(r.date.clone()),
                    status,
                    Cell::from(Span::styled(
                        r.priority.label(),
                        Style::default().fg(priority_color(r.priority)),
                    )),
                    Cell::from(r.dependency.clone()),
                ])
                .style(style)
            }
        });

        let widths: Vec<Constraint> = if self.compact {
            vec![
                Constraint::Length(16),
                Constraint::Min(20),
                Constraint::Length(20),
                Constraint::Length(12),
            ]
        } else {
            vec![
                Constraint::Length(12),
                Constraint::Length(16),
                Constraint::Min(25),
                Constraint::Length(20),
                Constraint::Length(12),
                Constraint::Length(9),
                Constraint::Length(16),
            ]
        };

        let table = Table::new(table_rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_kanban(&self, f: &mut Frame, area: Rect) {
        let board = self.board();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, board.columns.len() as u32); board.columns.len()])
            .split(area);

        for (i, column) in board.columns.iter().enumerate() {
            let selected = (i == self.kanban_column).then_some(self.kanban_card);
            self.render_column(f, columns[i], column, selected);
        }
    }

    /// One status column; `selected` is the highlighted card when this column has focus.
    fn render_column(&self, f: &mut Frame, area: Rect, column: &KanbanColumn, selected: Option<usize>) {
        let accent = status_color(column.status);
        let border_style = if selected.is_some() {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                column.title(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ))
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        if column.cards.is_empty() {
            let empty = Paragraph::new("No tasks")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(empty, inner);
            return;
        }

        let visible = (inner.height / CARD_HEIGHT).max(1) as usize;
        let offset = match selected {
            Some(card) if card >= visible => card + 1 - visible,
            _ => 0,
        };

        let mut y = inner.y;
        let mut rendered = 0;
        for (idx, card) in column.cards.iter().enumerate().skip(offset) {
            if y + CARD_HEIGHT > inner.y + inner.height {
                break;
            }
            let card_area = Rect {
                x: inner.x,
                y,
                width: inner.width,
                height: CARD_HEIGHT,
            };
            let is_selected = selected == Some(idx);
            let width = inner.width.saturating_sub(2) as usize;

            let card_block = Block::default().borders(Borders::ALL).border_style(if is_selected {
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            });
            let mut lines = vec![
                Line::from(Span::styled(
                    clip(&card.report, width),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![
                    Span::raw(clip(&card.kind, width / 2)),
                    Span::raw(" · "),
                    Span::styled(
                        card.priority.label(),
                        Style::default().fg(priority_color(card.priority)),
                    ),
                ]),
            ];
            let mut meta = format_date(card.date, "%Y-%m-%d");
            if !card.dependency.is_empty() {
                meta.push_str(&format!(" ← {}", card.dependency));
            }
            lines.push(Line::from(Span::styled(
                clip(&meta, width),
                Style::default().fg(Color::Gray),
            )));

            f.render_widget(Paragraph::new(lines).block(card_block), card_area);
            y += CARD_HEIGHT;
            rendered += 1;
        }

        let below = column.cards.len() - offset - rendered;
        if below > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▼ +{below} more"))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    x: inner.x,
                    y: inner.y + inner.height - 1,
                    width: inner.width,
                    height: 1,
                },
            );
        }
    }

    fn render_calendar(&self, f: &mut Frame, area: Rect) {
        let (year, month) = self.calendar;
        let Some(cal) = calendar_month(self.store.list(), Some(&self.filter), year, month) else {
            f.render_widget(Paragraph::new("Month out of range"), area);
            return;
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" ◀ {} ▶  ([ and ] change month) ", cal.title()))
            .title_alignment(Alignment::Center);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let weeks: Vec<&[CalendarCell]> = cal.weeks().collect();
        let mut rows = vec![Constraint::Length(1)];
        rows.extend(vec![Constraint::Ratio(1, weeks.len() as u32); weeks.len()]);
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(rows)
            .split(inner);
        let seven = vec![Constraint::Ratio(1, 7); 7];

        let header_cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(seven.clone())
            .split(row_areas[0]);
        for (i, name) in WEEKDAY_HEADERS.iter().enumerate() {
            let head = Paragraph::new(*name)
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::BOLD));
            f.render_widget(head, header_cells[i]);
        }

        let today = self.today();
        for (w, week) in weeks.iter().enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(seven.clone())
                .split(row_areas[w + 1]);
            for (d, cell) in week.iter().enumerate() {
                let CalendarCell::Day { date, entries } = cell else {
                    continue;
                };
                let border = if *date == today {
                    Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                let day_block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(format!("{}", date.day()));
                let day_inner = day_block.inner(cells[d]);
                let width = day_inner.width as usize;
                let capacity = day_inner.height as usize;

                let mut lines: Vec<Line> = entries
                    .iter()
                    .map(|e| {
                        Line::from(Span::styled(
                            clip(&format!("• {}", e.report), width),
                            Style::default().fg(status_color(e.status)),
                        ))
                    })
                    .collect();
                if lines.len() > capacity && capacity > 0 {
                    let hidden = lines.len() - (capacity - 1);
                    lines.truncate(capacity - 1);
                    lines.push(Line::from(Span::styled(
                        format!("+{hidden} more"),
                        Style::default().fg(Color::Cyan),
                    )));
                }

                f.render_widget(Paragraph::new(lines).block(day_block), cells[d]);
            }
        }
    }

    fn render_dashboard(&self, f: &mut Frame, area: Rect) {
        let d = views::dashboard(
            self.store.list(),
            Some(&self.filter),
            self.store.history(),
            self.today(),
            self.config.dashboard.trend_months,
        );

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Percentage(50),
                Constraint::Min(6),
            ])
            .split(area);

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(format!(
                " {} task(s) · {} completed ",
                d.total,
                d.status_count(Status::Completed)
            )))
            .gauge_style(Style::default().fg(Color::Green))
            .percent(d.completion_percent());
        f.render_widget(gauge, rows[0]);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(35),
                Constraint::Percentage(25),
            ])
            .split(rows[1]);

        let status_bars: Vec<Bar> = d
            .by_status
            .iter()
            .map(|(s, n)| {
                Bar::default()
                    .value(*n as u64)
                    .label(Line::from(s.label()))
                    .style(Style::default().fg(status_color(*s)))
            })
            .collect();
        let status_chart = BarChart::default()
            .block(Block::default().borders(Borders::ALL).title(" By status "))
            .data(BarGroup::default().bars(&status_bars))
            .bar_width(11)
            .bar_gap(1);
        f.render_widget(status_chart, middle[0]);

        let priority_bars: Vec<Bar> = d
            .by_priority
            .iter()
            .map(|(p, n)| {
                Bar::default()
                    .value(*n as u64)
                    .label(Line::from(p.label()))
                    .style(Style::default().fg(priority_color(*p)))
            })
            .collect();
        let priority_chart = BarChart::default()
            .block(Block::default().borders(Borders::ALL).title(" By priority "))
            .data(BarGroup::default().bars(&priority_bars))
            .bar_width(8)
            .bar_gap(1);
        f.render_widget(priority_chart, middle[1]);

        let type_lines: Vec<Line> = if d.by_type.is_empty() {
            vec![Line::from(Span::styled(
                "No tasks",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            d.by_type
                .iter()
                .map(|(kind, n)| {
                    Line::from(vec![
                        Span::styled(format!("{n:>4} "), Style::default().add_modifier(Modifier::BOLD)),
                        Span::raw(kind.clone()),
                    ])
                })
                .collect()
        };
        let types = Paragraph::new(type_lines)
            .block(Block::default().borders(Borders::ALL).title(" By type "))
            .wrap(Wrap { trim: true });
        f.render_widget(types, middle[2]);

        let mut trend = BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Line::from(vec![
                        Span::raw(" Monthly activity: "),
                        Span::styled("created", Style::default().fg(Color::Cyan)),
                        Span::raw(" / "),
                        Span::styled("completed ", Style::default().fg(Color::Green)),
                    ])),
            )
            .bar_width(4)
            .bar_gap(0)
            .group_gap(3);
        for point in &d.trend {
            let bars = [
                Bar::default()
                    .value(point.created)
                    .style(Style::default().fg(Color::Cyan)),
                Bar::default()
                    .value(point.completed)
                    .style(Style::default().fg(Color::Green)),
            ];
            trend = trend.data(
                BarGroup::default()
                    .label(Line::from(point.label.clone()))
                    .bars(&bars),
            );
        }
        f.render_widget(trend, rows[2]);
    }

    fn render_form(&self, f: &mut Frame, area: Rect, title: &str) {
        let Some(form) = &self.form else {
            return;
        };
        let today = self.today();
        let area = centered_rect(70, 80, area);
        f.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {title} "))
            .border_style(Style::default().fg(GOLD));

        let mut lines = vec![Line::from("")];
        for field in 0..FIELD_COUNT {
            let is_current = field == form.current_field;
            let label_style = if is_current {
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            let value = match field {
                KIND_ORDER => field_text(&form.kind, is_current),
                REPORT_ORDER => field_text(&form.report, is_current),
                DESCRIPTION_ORDER => field_text(&form.description, is_current),
                DATE_ORDER => field_text(&form.date, is_current),
                _ if is_current => format!("◀ {} ▶", form.selector_label(field)),
                _ => form.selector_label(field),
            };
            let value_style = if field == DATE_ORDER && form.date_is_invalid(today) {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{:>12}: ", FIELD_LABELS[field]), label_style),
                Span::styled(value, value_style),
            ]));
            if field == DATE_ORDER {
                lines.push(Line::from(Span::styled(
                    "              YYYY-MM-DD, today, tomorrow, in 3d, in 2w",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Tab/↑↓ move  ←→ change choice  Enter save  Esc cancel",
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    /// Render a confirmation dialog for deleting the selected task.
    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let Some(pending) = &self.pending_delete else {
            return;
        };
        let block = Block::default()
            .title(" Confirm Delete ")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED).fg(text_on(DARK_RED)));

        let area = centered_rect(60, 40, area);
        f.render_widget(Clear, area);

        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Delete '{}'?", pending.report),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        if pending.dependents.is_empty() {
            text.push(Line::from("This action cannot be undone."));
            text.push(Line::from(""));
            text.push(Line::from("Press 'y' to confirm, 'n' to cancel"));
        } else {
            text.push(Line::from(format!(
                "Blocked: {} task(s) depend on it: {}",
                pending.dependents.len(),
                pending.dependents.join(", ")
            )));
            text.push(Line::from(""));
            text.push(Line::from(
                "Press 'c' to clear those dependencies and delete, 'n' to cancel",
            ));
        }

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 80, area);
        f.render_widget(Clear, area);

        let entries = [
            ("1-4, Tab", "switch tab"),
            ("↑↓ / j k", "move selection (calendar: month)"),
            ("←→ / h l", "kanban column, calendar month"),
            ("[ ]", "previous / next month"),
            ("a", "add task"),
            ("e, Enter", "edit selected task"),
            ("d", "delete selected task"),
            ("s / p / t", "cycle status / priority / type filter"),
            ("x", "clear filters"),
            ("v", "toggle compact list in the Table tab"),
            ("?", "this help"),
            ("q", "quit"),
        ];
        let mut lines = vec![Line::from("")];
        lines.extend(entries.iter().map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{keys:>12}  "), Style::default().fg(GOLD)),
                Span::raw(*what),
            ])
        }));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )));

        let help = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(GOLD)),
        );
        f.render_widget(help, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let filters = if self.filter.is_empty() {
            "none".to_string()
        } else {
            self.filter.describe()
        };
        let mode = match self.state {
            AppState::Browse => self.tab.title(),
            AppState::AddTask => "Add Task",
            AppState::EditTask => "Edit Task",
            AppState::ConfirmDelete => "Confirm Delete",
            AppState::Help => "Help",
        };
        let text = format!(
            " {mode} | Tasks: {} | Filters: {filters} | ? help  q quit",
            self.store.list().len()
        );
        let status = Paragraph::new(text)
            .style(Style::default().bg(DARK_PURPLE).fg(text_on(DARK_PURPLE)))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render_toasts(&self, f: &mut Frame, area: Rect) {
        let mut y = area.y + 1;
        for toast in self.toasts.visible() {
            let width = (toast.message.chars().count() as u16 + 4)
                .min(area.width / 2)
                .max(10)
                .min(area.width);
            if y + 3 > area.y + area.height {
                break;
            }
            let rect = Rect {
                x: area.x + area.width - width,
                y,
                width,
                height: 3,
            };
            let bg = toast.level.color();
            f.render_widget(Clear, rect);
            let body = Paragraph::new(toast.message.as_str())
                .style(Style::default().bg(bg).fg(text_on(bg)))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(body, rect);
            y += 3;
        }
    }
}

fn field_text(input: &InputField, is_current: bool) -> String {
    if is_current {
        input.display_with_cursor()
    } else {
        input.value.clone()
    }
}
