use image::{imageops::FilterType, DynamicImage};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};

use crate::theme::Theme;

pub const HEADER_ROWS: u16 = 2;
const BACKDROP_BLUR: f32 = 2.5;
const BACKDROP_DIM: f32 = 0.35;

// Album art pixel grid: rows of (R, G, B) tuples
pub type ArtPixels = Vec<Vec<(u8, u8, u8)>>;

fn to_pixels(img: &DynamicImage, px_w: u32, px_h: u32, scale: f32) -> ArtPixels {
    let resized = img.resize_exact(px_w, px_h, FilterType::Triangle);
    let rgb = resized.to_rgb8();
    (0..px_h)
        .map(|y| {
            (0..px_w)
                .map(|x| {
                    let p = rgb.get_pixel(x, y);
                    let s = |c: u8| (c as f32 * scale) as u8;
                    (s(p[0]), s(p[1]), s(p[2]))
                })
                .collect()
        })
        .collect()
}

/// Decoded cover art with its last rasterisations cached per size.
pub struct Artwork {
    image: DynamicImage,
    cover: Option<((u16, u16), ArtPixels)>,
    backdrop: Option<((u16, u16), ArtPixels)>,
}

impl Artwork {
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match image::load_from_memory(bytes) {
            Ok(image) => Some(Artwork {
                image,
                cover: None,
                backdrop: None,
            }),
            Err(err) => {
                tracing::warn!(%err, "artwork is not a readable image");
                None
            }
        }
    }

    /// Half-block pixels for a `cols` x `rows` cell area.
    pub fn cover(&mut self, cols: u16, rows: u16) -> &ArtPixels {
        let key = (cols, rows);
        if self.cover.as_ref().is_some_and(|(k, _)| *k != key) {
            self.cover = None;
        }
        let image = &self.image;
        &self
            .cover
            .get_or_insert_with(|| (key, to_pixels(image, cols as u32, rows as u32 * 2, 1.0)))
            .1
    }

    /// Blurred, dimmed full-cell pixels for the screen background.
    pub fn backdrop(&mut self, cols: u16, rows: u16) -> &ArtPixels {
        let key = (cols, rows);
        if self.backdrop.as_ref().is_some_and(|(k, _)| *k != key) {
            self.backdrop = None;
        }
        let image = &self.image;
        &self
            .backdrop
            .get_or_insert_with(|| {
                let (w, h) = (cols.max(1) as u32, rows.max(1) as u32);
                let blurred = image
                    .resize_exact(w, h, FilterType::Triangle)
                    .blur(BACKDROP_BLUR);
                (key, to_pixels(&blurred, w, h, BACKDROP_DIM))
            })
            .1
    }
}

/// Largest square (in pixels) of half-block cells that fits in `area`,
/// centred horizontally.
pub fn art_rect(area: Rect) -> Rect {
    let rows = area.height.min(area.width / 2);
    let cols = rows * 2;
    let x = area.x + (area.width - cols) / 2;
    Rect::new(x, area.y, cols, rows)
}

struct AlbumArtWidget<'a> {
    pixels: &'a [Vec<(u8, u8, u8)>],
}

impl Widget for AlbumArtWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let art_rows = self.pixels.len() / 2;
        let art_cols = self.pixels.first().map(|r| r.len()).unwrap_or(0);
        let rows = (area.height as usize).min(art_rows);
        let cols = (area.width as usize).min(art_cols);
        for cy in 0..rows {
            let top_y = cy * 2;
            let bot_y = top_y + 1;
            for cx in 0..cols {
                let top = self.pixels[top_y][cx];
                let bot = self.pixels.get(bot_y).map(|r| r[cx]).unwrap_or(top);
                buf[(area.x + cx as u16, area.y + cy as u16)]
                    .set_char('▀')
                    .set_fg(Color::Rgb(top.0, top.1, top.2))
                    .set_bg(Color::Rgb(bot.0, bot.1, bot.2));
            }
        }
    }
}

struct BackdropWidget<'a> {
    pixels: &'a [Vec<(u8, u8, u8)>],
}

impl Widget for BackdropWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (cy, row) in self.pixels.iter().enumerate().take(area.height as usize) {
            for (cx, &(r, g, b)) in row.iter().enumerate().take(area.width as usize) {
                buf[(area.x + cx as u16, area.y + cy as u16)]
                    .set_char(' ')
                    .set_bg(Color::Rgb(r, g, b));
            }
        }
    }
}

pub fn draw_backdrop(frame: &mut Frame, art: Option<&mut Artwork>, theme: &Theme) {
    let area = frame.area();
    if area.is_empty() {
        return;
    }
    match art {
        Some(art) => {
            let pixels = art.backdrop(area.width, area.height);
            frame.render_widget(BackdropWidget { pixels }, area);
        }
        None => {
            frame.buffer_mut().set_style(area, Style::default().bg(theme.surface));
        }
    }
}

/// Square cover art, or a placeholder tile when there is none.
pub fn draw_art(frame: &mut Frame, area: Rect, art: Option<&mut Artwork>, theme: &Theme) {
    let rect = art_rect(area);
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    match art {
        Some(art) => {
            let pixels = art.cover(rect.width, rect.height);
            frame.render_widget(AlbumArtWidget { pixels }, rect);
        }
        None => {
            let note_row = Rect::new(rect.x, rect.y + rect.height / 2, rect.width, 1);
            frame.buffer_mut().set_style(rect, Style::default().bg(theme.dimmed));
            frame.render_widget(
                Paragraph::new("♪").style(Style::default().fg(theme.text)).centered(),
                note_row,
            );
        }
    }
}

/// Title and artist on the left, the (inert) ellipsis button on the right.
/// A `status` line replaces the artist, e.g. when nothing could be loaded.
pub fn draw_header(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    artist: &str,
    status: Option<&str>,
    theme: &Theme,
) {
    let [text, button] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(3)]).areas(area);

    let second = match status {
        Some(status) => Span::styled(status.to_string(), Style::default().fg(Color::Red)),
        None => Span::styled(artist.to_string(), Style::default().fg(theme.dimmed)),
    };
    let lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(second),
    ];
    frame.render_widget(Paragraph::new(lines), text);
    frame.render_widget(
        Paragraph::new("⋯").style(Style::default().fg(theme.text)),
        button,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn art_is_square_and_centred() {
        let rect = art_rect(Rect::new(0, 0, 40, 10));
        assert_eq!(rect, Rect::new(10, 0, 20, 10));

        let narrow = art_rect(Rect::new(2, 1, 9, 10));
        assert_eq!(narrow, Rect::new(2, 1, 8, 4));
    }

    #[test]
    fn rasterisation_is_cached_per_size() {
        let img = DynamicImage::new_rgb8(4, 4);
        let mut art = Artwork {
            image: img,
            cover: None,
            backdrop: None,
        };
        assert_eq!(art.cover(6, 3).len(), 6);
        assert_eq!(art.cover(6, 3)[0].len(), 6);
        assert_eq!(art.backdrop(5, 2).len(), 2);
        assert_eq!(art.backdrop(5, 2)[0].len(), 5);
    }

    #[test]
    fn unreadable_bytes_give_no_artwork() {
        assert!(Artwork::from_bytes(b"not an image").is_none());
    }
}
