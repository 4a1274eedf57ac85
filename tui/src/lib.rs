//! TUI rendering for Scribe using ratatui.
//!
//! One page: header, a settings sidebar on the left, and the task column on
//! the right (mode selector, input, mode option, Run, result, prompt preview),
//! with a status bar underneath.
//!
//! The result and prompt-preview panels scroll. Drawing reports each panel's
//! wrapped height back to the [`App`], which is why [`draw`] takes it mutably.

mod input;
mod theme;

pub use input::{InputPump, apply_event, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use scribe_engine::{
    App, Completed, Focus, ModeKind, RunPhase, ScrollPanel, StatusKind, Temperature,
};
use scribe_types::sanitize_terminal_text;

pub const TITLE: &str = "AI-Powered Text Assistant";
pub const CAPTION: &str = "Rewrite • Summarize • Explain • Ideate • Sentiment";
pub const THINKING: &str = "Thinking...";

const SIDEBAR_WIDTH: u16 = 44;
const INPUT_HEIGHT: u16 = 8;
const PREVIEW_EXPANDED_HEIGHT: u16 = 12;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);

    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], &palette);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(chunks[1]);

    draw_settings(frame, app, body[0], &palette, &glyphs);
    draw_task_column(frame, app, body[1], &palette, &glyphs);
    draw_status_bar(frame, app, chunks[2], &palette);
}

fn draw_header(frame: &mut Frame, area: Rect, palette: &Palette) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(TITLE, styles::title(palette))),
        Line::from(Span::styled(CAPTION, styles::key_hint(palette))),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn panel<'a>(title: impl Into<Line<'a>>, focused: bool, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border(palette, focused))
        .style(Style::default().bg(palette.bg_panel))
        .title(title)
}

/// Field value line with a trailing cursor when focused.
fn field_line(value: String, focused: bool, palette: &Palette, glyphs: &Glyphs) -> Line<'static> {
    let mut spans = vec![
        Span::raw("  "),
        Span::styled(value, Style::default().fg(palette.text_primary)),
    ];
    if focused {
        spans.push(Span::styled(glyphs.cursor, Style::default().fg(palette.accent)));
    }
    Line::from(spans)
}

fn draw_settings(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let form = app.settings_form();
    let focus = app.focus();
    let sidebar_focused = matches!(focus, Focus::ApiKey | Focus::Model | Focus::Temperature);

    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "OpenAI API Key",
        styles::label(palette, focus == Focus::ApiKey),
    )));
    let key_len = form.api_key_len();
    if key_len == 0 && focus != Focus::ApiKey {
        lines.push(Line::from(Span::styled(
            "  (not set)",
            styles::key_hint(palette),
        )));
    } else {
        let max = usize::from(area.width.saturating_sub(6));
        let masked: String = std::iter::repeat_n(glyphs.mask, key_len.min(max)).collect();
        lines.push(field_line(masked, focus == Focus::ApiKey, palette, glyphs));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "Model",
        styles::label(palette, focus == Focus::Model),
    )));
    lines.push(field_line(
        sanitize_terminal_text(form.model()).into_owned(),
        focus == Focus::Model,
        palette,
        glyphs,
    ));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        format!("Temperature: {}", form.temperature()),
        styles::label(palette, focus == Focus::Temperature),
    )));
    lines.push(slider_line(form.temperature(), palette, glyphs));
    lines.push(Line::from(""));

    if let Some(help) = focus.help() {
        lines.push(Line::from(Span::styled(
            help,
            Style::default()
                .fg(palette.text_muted)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let settings = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel(" Settings ", sidebar_focused, palette));
    frame.render_widget(settings, area);
}

fn slider_line(temperature: Temperature, palette: &Palette, glyphs: &Glyphs) -> Line<'static> {
    let position = usize::from(temperature.tenths());
    let steps = usize::from(Temperature::MAX.tenths());
    let left = glyphs.track.repeat(position);
    let right = glyphs.track.repeat(steps - position);
    Line::from(vec![
        Span::styled("  0.0 ", styles::key_hint(palette)),
        Span::styled(left, Style::default().fg(palette.primary)),
        Span::styled(glyphs.thumb, Style::default().fg(palette.accent)),
        Span::styled(right, Style::default().fg(palette.bg_border)),
        Span::styled(" 1.0", styles::key_hint(palette)),
    ])
}

fn draw_task_column(frame: &mut Frame, app: &mut App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let mode = app.task_form().mode();
    let option_height = if mode.has_options() { 1 } else { 0 };
    let preview_height = if app.preview_expanded() {
        PREVIEW_EXPANDED_HEIGHT
    } else {
        3
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),              // Mode selector
            Constraint::Length(INPUT_HEIGHT),   // Input
            Constraint::Length(option_height),  // Mode option
            Constraint::Length(1),              // Run
            Constraint::Min(3),                 // Result
            Constraint::Length(preview_height), // Prompt preview
        ])
        .split(area);

    draw_mode_selector(frame, app, chunks[0], palette, glyphs);
    draw_input(frame, app, chunks[1], palette, glyphs);
    if mode.has_options() {
        draw_mode_option(frame, app, chunks[2], palette);
    }
    draw_run_button(frame, app, chunks[3], palette);
    draw_result(frame, app, chunks[4], palette);
    draw_preview(frame, app, chunks[5], palette, glyphs);
}

fn draw_mode_selector(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let current = app.task_form().mode();
    let mut spans = Vec::new();
    for mode in ModeKind::ALL {
        let (marker, style) = if mode == current {
            (
                glyphs.selected,
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (glyphs.unselected, Style::default().fg(palette.text_secondary))
        };
        spans.push(Span::styled(format!(" {marker} {} ", mode.label()), style));
    }

    let selector = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: true })
        .block(panel(" Mode ", app.focus() == Focus::Mode, palette));
    frame.render_widget(selector, area);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let form = app.task_form();
    let focused = app.focus() == Focus::Input;
    let text = sanitize_terminal_text(form.input());

    let mut lines: Vec<Line> = text
        .split('\n')
        .map(|line| Line::from(Span::raw(line.to_string())))
        .collect();

    // Keep the tail visible: the block has two border rows.
    let visible = usize::from(area.height.saturating_sub(2)).max(1);
    if lines.len() > visible {
        lines.drain(..lines.len() - visible);
    }

    if focused && let Some(last) = lines.last_mut() {
        last.push_span(Span::styled(glyphs.cursor, Style::default().fg(palette.accent)));
    }

    let title = format!(" {} ", form.mode().input_label());
    let input = Paragraph::new(lines)
        .style(Style::default().fg(palette.text_primary))
        .wrap(Wrap { trim: false })
        .block(panel(title, focused, palette));
    frame.render_widget(input, area);
}

fn draw_mode_option(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let form = app.task_form();
    let (label, value) = match form.mode() {
        ModeKind::Rewrite => ("Tone", form.tone().label().to_string()),
        ModeKind::Explain => ("Explain to", form.audience().label().to_string()),
        ModeKind::IdeaGenerator => ("Number of ideas", form.idea_count().get().to_string()),
        ModeKind::Summarize | ModeKind::SentimentAnalysis => return,
    };
    let focused = app.focus() == Focus::ModeOption;

    let line = Line::from(vec![
        Span::styled(format!(" {label}: "), styles::label(palette, focused)),
        Span::styled("< ", styles::key_hint(palette)),
        Span::styled(value, Style::default().fg(palette.text_primary)),
        Span::styled(" >", styles::key_hint(palette)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_run_button(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let label = if app.is_busy() { " Running… " } else { " Run " };
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(label, styles::button(palette, app.focus() == Focus::Run)),
        Span::styled("  Ctrl-R", styles::key_hint(palette)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_result(frame: &mut Frame, app: &mut App, area: Rect, palette: &Palette) {
    let (lines, style) = match app.phase() {
        RunPhase::Calling => (
            vec![Line::from(format!(
                "{} {THINKING}",
                spinner_frame(app.tick_count(), app.ui_options())
            ))],
            Style::default().fg(palette.primary),
        ),
        RunPhase::Displaying => {
            let (text, color) = match app.completed().map(Completed::outcome) {
                Some(outcome) if outcome.is_failure() => (outcome.display_text(), palette.error),
                Some(outcome) => (outcome.display_text(), palette.text_primary),
                None => (String::new(), palette.text_primary),
            };
            let text = sanitize_terminal_text(&text).into_owned();
            (
                text.lines().map(|l| Line::from(l.to_string())).collect(),
                Style::default().fg(color),
            )
        }
        RunPhase::Idle | RunPhase::Halted(_) => (
            vec![Line::from("Results will appear here.")],
            styles::key_hint(palette),
        ),
    };

    let block = panel(" Result ", app.focus() == Focus::Result, palette);
    draw_scrollable(frame, app, ScrollPanel::Result, area, lines, style, block, palette);
}

fn draw_preview(frame: &mut Frame, app: &mut App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let focused = app.focus() == Focus::Preview;
    let expanded = app.preview_expanded();
    let marker = if expanded {
        glyphs.expanded
    } else {
        glyphs.collapsed
    };
    let title = format!(" {marker} Prompt preview ");

    let lines = match app.completed() {
        Some(completed) if expanded => {
            let prompt = completed.prompt();
            let heading = Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD);
            let mut lines = vec![Line::from(Span::styled("System:", heading))];
            lines.extend(
                sanitize_terminal_text(prompt.system())
                    .lines()
                    .map(|l| Line::from(l.to_string())),
            );
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("User:", heading)));
            lines.extend(
                sanitize_terminal_text(prompt.user())
                    .lines()
                    .map(|l| Line::from(l.to_string())),
            );
            lines
        }
        Some(_) => vec![Line::from(Span::styled(
            "Enter to show the exact instructions sent",
            styles::key_hint(palette),
        ))],
        None => vec![Line::from(Span::styled(
            "Available after a run",
            styles::key_hint(palette),
        ))],
    };

    let style = Style::default().fg(palette.text_secondary);
    let block = panel(title, focused, palette);
    draw_scrollable(frame, app, ScrollPanel::Preview, area, lines, style, block, palette);
}

/// Wrapped text panel drawn at the engine's scroll offset for `panel`.
#[allow(clippy::too_many_arguments)]
fn draw_scrollable(
    frame: &mut Frame,
    app: &mut App,
    panel: ScrollPanel,
    area: Rect,
    lines: Vec<Line<'static>>,
    style: Style,
    block: Block<'static>,
    palette: &Palette,
) {
    let inner = block.inner(area);
    let total_lines = wrapped_line_count(&lines, inner.width);
    let visible_height = inner.height;
    let max_scroll = total_lines.saturating_sub(visible_height);
    app.update_scroll_max(panel, max_scroll, visible_height);
    let scroll_offset = app.scroll_offset(panel);

    let block = if max_scroll > 0 {
        let last_visible = scroll_offset.saturating_add(visible_height).min(total_lines);
        block.title_bottom(
            Line::from(Span::styled(
                format!(" {last_visible}/{total_lines} "),
                styles::key_hint(palette),
            ))
            .alignment(Alignment::Right),
        )
    } else {
        block
    };

    let paragraph = Paragraph::new(lines)
        .style(style)
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset, 0))
        .block(block);
    frame.render_widget(paragraph, area);
}

fn wrapped_line_count(lines: &[Line], width: u16) -> u16 {
    if lines.is_empty() {
        return 0;
    }

    let count = Paragraph::new(lines.to_vec())
        .wrap(Wrap { trim: false })
        .line_count(width.max(1));
    u16::try_from(count).unwrap_or(u16::MAX)
}

pub(crate) fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let line = if let Some(msg) = app.status_message() {
        let (prefix, color) = match app.status_kind() {
            Some(StatusKind::Error) => ("Error: ", palette.error),
            Some(StatusKind::Warning) => ("Warning: ", palette.warning),
            Some(StatusKind::Success) => ("Success: ", palette.success),
            Some(StatusKind::Info) | None => ("", palette.text_secondary),
        };
        Line::from(vec![
            Span::raw(" "),
            Span::styled(format!("{prefix}{msg}"), Style::default().fg(color)),
        ])
    } else if app.is_busy() {
        let spinner = spinner_frame(app.tick_count(), app.ui_options());
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!("{spinner} {THINKING}"),
                Style::default().fg(palette.primary),
            ),
        ])
    } else {
        key_hints(palette)
    };

    // Clip to the bar so a long provider error cannot spill into the layout.
    let width = usize::from(area.width);
    let line = if line.width() > width {
        truncate_line(line, width)
    } else {
        line
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn key_hints(palette: &Palette) -> Line<'static> {
    let hints = [
        ("Tab", "focus"),
        ("←/→", "adjust"),
        ("↑/↓", "scroll"),
        ("Ctrl-R", "run"),
        ("Ctrl-Y", "copy"),
        ("Ctrl-Q", "quit"),
    ];
    let mut spans = vec![Span::raw(" ")];
    for (i, (key, action)) in hints.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", styles::key_hint(palette)));
        }
        spans.push(Span::styled(key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {action}"), styles::key_hint(palette)));
    }
    Line::from(spans)
}

fn truncate_line(line: Line<'static>, width: usize) -> Line<'static> {
    let mut remaining = width;
    let mut spans = Vec::new();
    for span in line.spans {
        if remaining == 0 {
            break;
        }
        let span_width = span.content.width();
        if span_width <= remaining {
            remaining -= span_width;
            spans.push(span);
            continue;
        }
        let mut clipped = String::new();
        for c in span.content.chars() {
            let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if w > remaining {
                break;
            }
            remaining -= w;
            clipped.push(c);
        }
        spans.push(Span::styled(clipped, span.style));
        break;
    }
    Line::from(spans)
}
