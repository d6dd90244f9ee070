use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::gauge::RoundedGauge;
use crate::session::format_time;
use crate::theme::Theme;

pub const PROGRESS_ROWS: u16 = 2;

/// The slider row within the progress area.
pub fn scrub_bar_area(area: Rect) -> Rect {
    Rect { height: area.height.min(1), ..area }
}

/// Where along the slider a click at `column` lands, as a fraction of the
/// track. `None` if the click is outside the bar.
pub fn scrub_ratio(bar: Rect, column: u16, row: u16) -> Option<f64> {
    if bar.width == 0 || row != bar.y || column < bar.x || column >= bar.x + bar.width {
        return None;
    }
    if bar.width == 1 {
        return Some(0.0);
    }
    Some((column - bar.x) as f64 / (bar.width - 1) as f64)
}

pub fn draw_progress(
    frame: &mut Frame,
    area: Rect,
    elapsed: f64,
    total: f64,
    enabled: bool,
    theme: &Theme,
) {
    let [bar, labels] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    let ratio = if total > 0.0 { elapsed / total } else { 0.0 };
    let fill = if enabled { theme.accent } else { theme.dimmed };
    let gauge = RoundedGauge::new(ratio, fill)
        .dimmed_color(theme.dimmed)
        .thumb(enabled);
    frame.render_widget(gauge, bar);

    let [left, right] = Layout::horizontal([Constraint::Fill(1); 2]).areas(labels);
    let style = Style::default().fg(theme.dimmed);
    frame.render_widget(
        Paragraph::new(Line::from(format_time(elapsed))).style(style),
        left,
    );
    frame.render_widget(
        Paragraph::new(Line::from(format_time(total)))
            .style(style)
            .alignment(Alignment::Right),
        right,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicks_map_to_fractions() {
        let bar = Rect::new(4, 10, 11, 1);
        assert_eq!(scrub_ratio(bar, 4, 10), Some(0.0));
        assert_eq!(scrub_ratio(bar, 9, 10), Some(0.5));
        assert_eq!(scrub_ratio(bar, 14, 10), Some(1.0));
    }

    #[test]
    fn clicks_off_the_bar_are_ignored() {
        let bar = Rect::new(4, 10, 11, 1);
        assert_eq!(scrub_ratio(bar, 3, 10), None);
        assert_eq!(scrub_ratio(bar, 15, 10), None);
        assert_eq!(scrub_ratio(bar, 8, 11), None);
        assert_eq!(scrub_ratio(Rect::new(0, 0, 0, 1), 0, 0), None);
    }

    #[test]
    fn bar_is_top_row() {
        let area = Rect::new(2, 5, 30, PROGRESS_ROWS);
        assert_eq!(scrub_bar_area(area), Rect::new(2, 5, 30, 1));
    }
}
