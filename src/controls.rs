use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::Theme;

const BACKWARD: &str = "◀◀";
const FORWARD: &str = "▶▶";
const PLAY: &str = "▶";
const PAUSE: &str = "❚❚";

/// Backward, play/pause and forward. Only the middle one does anything.
pub fn draw_transport(frame: &mut Frame, area: Rect, playing: bool, enabled: bool, theme: &Theme) {
    let [back, main, fwd] = Layout::horizontal([Constraint::Length(6); 3])
        .flex(Flex::SpaceAround)
        .areas(area);

    let side = Style::default().fg(theme.text);
    let main_style = if enabled {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dimmed)
    };
    let glyph = if playing { PAUSE } else { PLAY };

    frame.render_widget(Paragraph::new(BACKWARD).style(side).alignment(Alignment::Center), back);
    frame.render_widget(Paragraph::new(glyph).style(main_style).alignment(Alignment::Center), main);
    frame.render_widget(Paragraph::new(FORWARD).style(side).alignment(Alignment::Center), fwd);
}

/// Lyrics, output device (with its caption) and queue icons. Decorative.
pub fn draw_accessories(frame: &mut Frame, area: Rect, device_label: &str, theme: &Theme) {
    let [quote, device, list] = Layout::horizontal([Constraint::Length(8); 3])
        .flex(Flex::SpaceAround)
        .areas(area);
    let style = Style::default().fg(theme.dimmed);

    frame.render_widget(Paragraph::new("❝❞").style(style).alignment(Alignment::Center), quote);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from("((•))"),
            Line::from(Span::styled(device_label.to_string(), Style::default().fg(theme.text))),
        ])
        .style(style)
        .alignment(Alignment::Center),
        device,
    );
    frame.render_widget(Paragraph::new("☰").style(style).alignment(Alignment::Center), list);
}

fn build_help_spans(theme: &Theme) -> Vec<Span<'static>> {
    let key_style = Style::default().fg(Color::Black).bg(theme.secondary);
    vec![
        Span::styled(" Space ", key_style),
        Span::raw(" Play/Pause  "),
        Span::styled(" ←/→ ", key_style),
        Span::raw(" Seek  "),
        Span::styled(" Home/End ", key_style),
        Span::raw(" Start/End  "),
        Span::styled(" Click ", key_style),
        Span::raw(" Scrub  "),
        Span::styled(" t ", key_style),
        Span::raw(" Theme  "),
        Span::styled(" q ", key_style),
        Span::raw(" Quit"),
    ]
}

/// Wrap spans into lines, breaking at group boundaries (every 2 spans = key + label).
fn wrap_lines(spans: Vec<Span<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![Line::from(spans)];
    }
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_w: usize = 0;
    for chunk in spans.chunks(2) {
        let group_w: usize = Line::from(chunk.to_vec()).width();
        if current_w + group_w > width && current_w > 0 {
            lines.push(Line::from(std::mem::take(&mut current)));
            current_w = 0;
        }
        current.extend(chunk.iter().cloned());
        current_w += group_w;
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

pub fn help_height(width: u16, theme: &Theme) -> u16 {
    wrap_lines(build_help_spans(theme), width as usize).len() as u16
}

pub fn draw_help(frame: &mut Frame, area: Rect, theme: &Theme) {
    let lines = wrap_lines(build_help_spans(theme), area.width as usize);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
