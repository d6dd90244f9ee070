use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

use crate::gauge::RoundedGauge;
use crate::theme::Theme;

/// Speaker icons around a capsule. Output volume is not adjustable here;
/// the capsule shows the system level as full.
pub fn draw_volume(frame: &mut Frame, area: Rect, theme: &Theme) {
    let [low, capsule, high] = Layout::horizontal([
        Constraint::Length(3),
        Constraint::Min(4),
        Constraint::Length(4),
    ])
    .spacing(1)
    .areas(area);

    let icon = Style::default().fg(theme.dimmed);
    frame.render_widget(Paragraph::new("🔈").style(icon), low);
    frame.render_widget(
        RoundedGauge::new(1.0, theme.dimmed).dimmed_color(theme.dimmed),
        capsule,
    );
    frame.render_widget(Paragraph::new("🔊").style(icon), high);
}
