use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
};

const THUMB: char = '●';

/// One-row rounded bar, used for the scrub slider and the volume capsule.
pub struct RoundedGauge {
    ratio: f64,
    filled_color: Color,
    dimmed_color: Color,
    thumb: bool,
}

impl RoundedGauge {
    pub fn new(ratio: f64, filled_color: Color) -> Self {
        RoundedGauge {
            ratio: if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) },
            filled_color,
            dimmed_color: Color::DarkGray,
            thumb: false,
        }
    }

    pub fn dimmed_color(mut self, color: Color) -> Self {
        self.dimmed_color = color;
        self
    }

    /// Draw a knob at the fill boundary, slider style.
    pub fn thumb(mut self, thumb: bool) -> Self {
        self.thumb = thumb;
        self
    }
}

/// Column of the fill boundary within a bar `width` cells wide.
pub fn thumb_column(ratio: f64, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let last = (width - 1) as f64;
    (ratio.clamp(0.0, 1.0) * last).round() as u16
}

impl Widget for RoundedGauge {
    fn render(self, inner: Rect, buf: &mut Buffer) {
        if inner.width < 2 || inner.height == 0 {
            return;
        }

        let width = inner.width as usize;
        let filled = (self.ratio * width as f64).round() as usize;
        let y = inner.y + inner.height / 2;

        for col in 0..width {
            let x = inner.x + col as u16;
            let (ch, fg) = if filled == 0 {
                if col == 0 {
                    ('╶', self.dimmed_color)
                } else if col == width - 1 {
                    ('╴', self.dimmed_color)
                } else {
                    ('─', self.dimmed_color)
                }
            } else if col < filled {
                if col == 0 {
                    ('╺', self.filled_color)
                } else if col == filled - 1 && filled < width {
                    ('╸', self.filled_color)
                } else {
                    ('━', self.filled_color)
                }
            } else if col == width - 1 {
                ('╴', self.dimmed_color)
            } else {
                ('─', self.dimmed_color)
            };

            buf[(x, y)].set_char(ch).set_fg(fg);
        }

        if self.thumb {
            let x = inner.x + thumb_column(self.ratio, inner.width);
            buf[(x, y)].set_char(THUMB).set_fg(self.filled_color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn half_filled_bar() {
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        RoundedGauge::new(0.5, Color::White).render(area, &mut buf);
        assert_eq!(row(&buf, 0), "╺━━━╸────╴");
    }

    #[test]
    fn empty_bar_with_thumb_at_start() {
        let area = Rect::new(0, 0, 6, 1);
        let mut buf = Buffer::empty(area);
        RoundedGauge::new(0.0, Color::White).thumb(true).render(area, &mut buf);
        assert_eq!(row(&buf, 0), "●────╴");
    }

    #[test]
    fn thumb_tracks_ratio() {
        assert_eq!(thumb_column(0.0, 11), 0);
        assert_eq!(thumb_column(0.5, 11), 5);
        assert_eq!(thumb_column(1.0, 11), 10);
        assert_eq!(thumb_column(2.0, 11), 10);
        assert_eq!(thumb_column(0.3, 0), 0);
    }
}
