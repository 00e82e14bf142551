use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use railadvice_core::{ChatRole, ConnectionStatus, View};

use crate::app::{App, InputMode, QUICK_ACTIONS};

/// Render `**bold**` runs; an unmatched marker stays literal
fn styled_line(text: &str) -> Line<'static> {
    let parts: Vec<&str> = text.split("**").collect();
    let last = parts.len() - 1;
    let balanced = parts.len() % 2 == 1;

    let mut spans: Vec<Span<'static>> = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        let bold = i % 2 == 1;
        if bold && !balanced && i == last {
            spans.push(Span::raw(format!("**{}", part)));
        } else if part.is_empty() {
            continue;
        } else if bold {
            spans.push(Span::styled(
                part.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(part.to_string()));
        }
    }

    Line::from(spans)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.controller.view() {
        View::Initial => render_initial_view(app, frame, body_area),
        View::Chat => render_chat_view(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let status = app.controller.status();
    let dot_color = match status.status {
        ConnectionStatus::Connecting => Color::Yellow,
        ConnectionStatus::Connected => Color::Green,
        ConnectionStatus::Error => Color::Red,
    };

    let title = Line::from(vec![
        Span::styled(" RailAdvice AI ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("[{}] ", app.environment.display_name()),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let indicator = Line::from(vec![
        Span::styled("● ", Style::default().fg(dot_color)),
        Span::styled(format!("{} ", status.label), Style::default().fg(Color::White)),
    ])
    .alignment(Alignment::Right);

    let [left, right] = Layout::horizontal([Constraint::Min(0), Constraint::Length(20)]).areas(area);

    let style = Style::default().bg(Color::DarkGray);
    frame.render_widget(Paragraph::new(title).style(style), left);
    frame.render_widget(Paragraph::new(indicator).style(style), right);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " SKRIV ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hint = |key: &'static str, label: &'static str| {
        [Span::styled(key, key_style), Span::styled(label, label_style)]
    };

    let hints: Vec<Span> = match (app.controller.view(), app.input_mode) {
        (View::Initial, InputMode::Editing) => [
            hint(" Enter ", " send "),
            hint(" ↑/↓ ", " suggestion "),
            hint(" Esc ", " stop typing "),
        ]
        .concat(),
        (View::Initial, InputMode::Normal) => [
            hint(" j/k ", " suggestion "),
            hint(" Enter ", " ask "),
            hint(" i ", " type "),
            hint(" r ", " reconnect "),
            hint(" q ", " quit "),
        ]
        .concat(),
        (View::Chat, InputMode::Editing) => [
            hint(" Enter ", " send "),
            hint(" Esc ", " stop typing "),
        ]
        .concat(),
        (View::Chat, InputMode::Normal) => [
            hint(" j/k ", " scroll "),
            hint(" g/G ", " top/bottom "),
            hint(" i ", " type "),
            hint(" r ", " reconnect "),
            hint(" q ", " quit "),
        ]
        .concat(),
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_initial_view(app: &mut App, frame: &mut Frame, area: Rect) {
    app.chat_area = None;

    let [column] = Layout::horizontal([Constraint::Max(72)])
        .flex(Flex::Center)
        .areas(area);

    let [intro_area, input_area, actions_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Length(QUICK_ACTIONS.len() as u16 + 2),
    ])
    .flex(Flex::Center)
    .areas(column);

    let intro = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            "Hva kan jeg hjelpe deg med?",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Still et spørsmål om ETCS og signalanlegg.",
            Style::default().fg(Color::Gray),
        )),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(intro, intro_area);

    render_input(app, frame, input_area, " Spør RailAdvice ");

    let items: Vec<ListItem> = QUICK_ACTIONS
        .iter()
        .map(|prompt| ListItem::new(format!(" {} ", prompt)))
        .collect();

    let actions = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Forslag "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Magenta)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(actions, actions_area, &mut app.quick_action_state);
}

fn render_chat_view(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, input_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

    // Store area for mouse hit-testing and inner size for scroll calculations
    app.chat_area = Some(chat_area);
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    // Measured against this frame's size, so a resize or new message keeps
    // the tail pinned before anything is drawn
    app.clamp_scroll();

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", app.base_url()));

    let chat = chat_paragraph(app)
        .block(chat_block)
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, chat_area);

    render_input(app, frame, input_area, " Melding ");
}

/// The chat log, wrapped the way it is drawn. Scroll limits are measured
/// on this same paragraph.
pub fn chat_paragraph(app: &App) -> Paragraph<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for (i, msg) in app.controller.messages().iter().enumerate() {
        // Freshly appended messages fade in for one tick
        let fade = if app.is_fresh(i) {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        };

        match msg.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    "Du:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                for line in msg.text.lines() {
                    lines.push(Line::from(line.to_string()).patch_style(fade));
                }
            }
            ChatRole::Assistant => {
                lines.push(Line::from(Span::styled(
                    "AI:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                for line in msg.text.lines() {
                    lines.push(styled_line(line).patch_style(fade));
                }
            }
        }
        lines.push(Line::default());
    }

    if app.controller.is_typing() {
        lines.push(Line::from(Span::styled(
            "AI:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated dots: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Søker{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false })
}

fn render_input(app: &App, frame: &mut Frame, area: Rect, title: &'static str) {
    let editing = app.input_mode == InputMode::Editing;
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Horizontal scrolling keeps the cursor inside the box
    let inner_width = area.width.saturating_sub(2) as usize;
    let scroll_offset = if inner_width == 0 || app.cursor < inner_width {
        0
    } else {
        app.cursor - inner_width + 1
    };

    let visible_text: String = app.input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(block);

    frame.render_widget(input, area);

    if editing {
        let cursor_x = (app.cursor - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}
