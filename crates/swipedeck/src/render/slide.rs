use std::sync::Arc;

use eframe::egui::{self, Color32, FontFamily, FontId, Galley, Pos2, Stroke};

use crate::deck::{Block, RevealContent, Slide, SlideKind, TextStyle};
use crate::render::{Action, CardContext, HitMap};
use crate::session::Command;
use crate::session::selection::{Choice, SelectionView};
use crate::theme::Theme;

/// One vertically stacked element of a card, measured before painting so the
/// stack can be centered.
enum Piece {
    Text {
        galley: Arc<Galley>,
        right_to_left: bool,
    },
    Media {
        label: String,
        height: f32,
    },
    Button {
        galley: Arc<Galley>,
        size: egui::Vec2,
        fill: Color32,
        stroke: Option<Color32>,
        action: Option<Action>,
    },
    Panel {
        lines: Vec<Arc<Galley>>,
        padding: f32,
    },
    Number {
        galley: Arc<Galley>,
        diameter: f32,
    },
    Gap(f32),
}

impl Piece {
    fn height(&self) -> f32 {
        match self {
            Piece::Text { galley, .. } => galley.rect.height(),
            Piece::Media { height, .. } => *height,
            Piece::Button { size, .. } => size.y,
            Piece::Panel { lines, padding } => {
                lines.iter().map(|g| g.rect.height()).sum::<f32>() + padding * 2.0
            }
            Piece::Number { diameter, .. } => *diameter,
            Piece::Gap(h) => *h,
        }
    }
}

struct Styler<'a> {
    ui: &'a egui::Ui,
    theme: &'a Theme,
    opacity: f32,
    scale: f32,
    width: f32,
}

impl Styler<'_> {
    fn galley(&self, text: &str, size: f32, color: Color32, italics: bool) -> Arc<Galley> {
        let mut job = egui::text::LayoutJob::default();
        job.wrap.max_width = self.width;
        job.append(
            text,
            0.0,
            egui::text::TextFormat {
                font_id: FontId::new(size * self.scale, FontFamily::Proportional),
                color: Theme::with_opacity(color, self.opacity),
                italics,
                ..Default::default()
            },
        );
        self.ui.painter().layout_job(job)
    }

    fn block(&self, block: &Block, right_to_left: bool) -> Piece {
        let theme = self.theme;
        match block {
            Block::Heading(text) => Piece::Text {
                galley: self.galley(text, theme.heading_size, theme.primary, false),
                right_to_left,
            },
            Block::Text { text, style } => {
                let (size, color, italics) = match style {
                    TextStyle::Plain => (theme.body_size, theme.foreground, false),
                    TextStyle::Italic => (theme.body_size, theme.foreground, true),
                    TextStyle::Strong => (theme.body_size * 1.15, theme.primary, false),
                    TextStyle::Muted => (
                        theme.body_size * 0.85,
                        Theme::with_opacity(theme.foreground, 0.6),
                        false,
                    ),
                    TextStyle::Accent => (theme.body_size * 1.1, theme.accent, false),
                };
                Piece::Text {
                    galley: self.galley(text, size, color, italics),
                    right_to_left,
                }
            }
            Block::Image { url, alt } => Piece::Media {
                label: image_label(url, alt),
                height: 160.0 * self.scale,
            },
        }
    }

    fn button(
        &self,
        label: &str,
        fill: Color32,
        text: Color32,
        stroke: Option<Color32>,
        action: Option<Action>,
    ) -> Piece {
        let galley = self.galley(label, self.theme.body_size * 0.85, text, false);
        let size = egui::vec2(
            (galley.rect.width() + 48.0 * self.scale).max(192.0 * self.scale),
            galley.rect.height() + 24.0 * self.scale,
        );
        Piece::Button {
            galley,
            size,
            fill: Theme::with_opacity(fill, self.opacity),
            stroke: stroke.map(|c| Theme::with_opacity(c, self.opacity)),
            action,
        }
    }
}

/// Placeholder caption for an image: its alt text, else the last segment of
/// its URL.
fn image_label(url: &str, alt: &str) -> String {
    if !alt.is_empty() {
        return format!("[Image: {alt}]");
    }
    match url.trim_end_matches('/').rsplit('/').next() {
        Some(name) if !name.is_empty() => format!("[Image: {name}]"),
        _ => "[Image]".to_string(),
    }
}

/// Option label, marked when it is the one already picked.
fn option_label(label: &str, option: Choice, selection: SelectionView) -> String {
    if selection.choice == Some(option) {
        format!("\u{2713} {label}")
    } else {
        label.to_string()
    }
}

fn choice_pieces(
    styler: &Styler<'_>,
    prompt: &str,
    options: &[String; 2],
    selection: SelectionView,
    pieces: &mut Vec<Piece>,
) {
    let theme = styler.theme;
    pieces.push(Piece::Text {
        galley: styler.galley(prompt, theme.heading_size * 0.75, theme.primary, true),
        right_to_left: false,
    });
    pieces.push(Piece::Gap(24.0 * styler.scale));
    pieces.push(styler.button(
        &option_label(&options[0], Choice::OptionA, selection),
        theme.primary,
        theme.on_accent,
        None,
        Some(Action::Session(Command::Choose(Choice::OptionA))),
    ));
    pieces.push(Piece::Gap(12.0 * styler.scale));
    pieces.push(styler.button(
        &option_label(&options[1], Choice::OptionB, selection),
        theme.card_border,
        theme.primary,
        Some(theme.primary),
        Some(Action::Session(Command::Choose(Choice::OptionB))),
    ));
}

fn reveal_pieces(
    styler: &Styler<'_>,
    reveal: &RevealContent,
    selection: SelectionView,
    picked: Option<&str>,
    right_to_left: bool,
    pieces: &mut Vec<Piece>,
) {
    let theme = styler.theme;
    let scale = styler.scale;
    pieces.push(Piece::Panel {
        lines: vec![
            styler.galley(&reveal.picked_label, theme.body_size * 0.85, theme.foreground, false),
            styler.galley(
                picked.unwrap_or("..."),
                theme.heading_size * 0.8,
                theme.primary,
                true,
            ),
        ],
        padding: 16.0 * scale,
    });
    pieces.push(Piece::Gap(20.0 * scale));

    match selection.revealed_value {
        Some(value) => {
            pieces.push(Piece::Number {
                galley: styler.galley(&value.to_string(), theme.number_size * 0.5, theme.primary, false),
                diameter: 80.0 * scale,
            });
            pieces.push(Piece::Gap(16.0 * scale));
            for caption in &reveal.captions {
                pieces.push(styler.block(caption, right_to_left));
                pieces.push(Piece::Gap(8.0 * scale));
            }
        }
        None => {
            let enabled = selection.can_request_reveal();
            let label = if selection.is_computing {
                format!("\u{2728} {}\u{2026}", reveal.button)
            } else {
                format!("\u{2728} {}", reveal.button)
            };
            let fill = if enabled {
                theme.accent
            } else {
                Theme::with_opacity(theme.accent, 0.5)
            };
            pieces.push(styler.button(
                &label,
                fill,
                theme.on_accent,
                None,
                enabled.then_some(Action::Session(Command::RequestReveal)),
            ));
        }
    }
}

/// Lay out and paint the slide's blocks and any in-slide controls, centered
/// vertically in `area`.
pub fn draw_content(
    ui: &egui::Ui,
    slide: &Slide,
    ctx: &CardContext<'_>,
    area: egui::Rect,
    opacity: f32,
    scale: f32,
    mut hits: Option<&mut HitMap>,
) {
    let styler = Styler {
        ui,
        theme: ctx.theme,
        opacity,
        scale,
        width: area.width(),
    };
    let rtl = slide.descriptor.right_to_left;

    let mut pieces = Vec::new();
    for block in &slide.blocks {
        if !pieces.is_empty() {
            pieces.push(Piece::Gap(14.0 * scale));
        }
        pieces.push(styler.block(block, rtl));
    }
    if !matches!(slide.kind, SlideKind::Content) && !pieces.is_empty() {
        pieces.push(Piece::Gap(20.0 * scale));
    }
    match &slide.kind {
        SlideKind::Content => {}
        SlideKind::Choice { prompt, options } => {
            choice_pieces(&styler, prompt, options, ctx.selection, &mut pieces);
        }
        SlideKind::Reveal(reveal) => {
            reveal_pieces(&styler, reveal, ctx.selection, ctx.picked, rtl, &mut pieces);
        }
    }

    let total: f32 = pieces.iter().map(Piece::height).sum();
    let mut y = (area.center().y - total / 2.0).max(area.top());
    let painter = ui.painter();
    let fallback = Theme::with_opacity(ctx.theme.foreground, opacity);

    for piece in pieces {
        let height = piece.height();
        match piece {
            Piece::Text {
                galley,
                right_to_left,
            } => {
                let x = if right_to_left {
                    area.right() - galley.rect.width()
                } else {
                    area.center().x - galley.rect.width() / 2.0
                };
                painter.galley(Pos2::new(x, y), galley, fallback);
            }
            Piece::Media { label, height } => {
                let rect = egui::Rect::from_min_size(
                    Pos2::new(area.left(), y),
                    egui::vec2(area.width(), height),
                );
                draw_media_placeholder(ui, ctx.theme, rect, &label, opacity, scale);
            }
            Piece::Button {
                galley,
                size,
                fill,
                stroke,
                action,
            } => {
                let rect = egui::Rect::from_center_size(
                    Pos2::new(area.center().x, y + size.y / 2.0),
                    size,
                );
                painter.rect_filled(rect, size.y / 2.0, fill);
                if let Some(color) = stroke {
                    painter.rect_stroke(
                        rect,
                        size.y / 2.0,
                        Stroke::new(2.0 * scale, color),
                        egui::StrokeKind::Inside,
                    );
                }
                let text_pos = rect.center() - galley.rect.size() / 2.0;
                painter.galley(text_pos, galley, fallback);
                if let (Some(action), Some(hits)) = (action, hits.as_deref_mut()) {
                    hits.push(rect, action);
                }
            }
            Piece::Panel { lines, padding } => {
                let rect = egui::Rect::from_min_size(
                    Pos2::new(area.left(), y),
                    egui::vec2(area.width(), height),
                );
                painter.rect_filled(
                    rect,
                    16.0 * scale,
                    Theme::with_opacity(ctx.theme.card_border, opacity * 0.75),
                );
                let mut line_y = y + padding;
                for galley in lines {
                    let line_h = galley.rect.height();
                    let x = area.center().x - galley.rect.width() / 2.0;
                    painter.galley(Pos2::new(x, line_y), galley, fallback);
                    line_y += line_h;
                }
            }
            Piece::Number { galley, diameter } => {
                let center = Pos2::new(area.center().x, y + diameter / 2.0);
                painter.circle_filled(
                    center,
                    diameter / 2.0,
                    Theme::with_opacity(Color32::WHITE, opacity),
                );
                painter.circle_stroke(
                    center,
                    diameter / 2.0,
                    Stroke::new(4.0 * scale, Theme::with_opacity(ctx.theme.accent, opacity)),
                );
                painter.galley(center - galley.rect.size() / 2.0, galley, fallback);
            }
            Piece::Gap(_) => {}
        }
        y += height;
    }
}

pub fn draw_media_placeholder(
    ui: &egui::Ui,
    theme: &Theme,
    rect: egui::Rect,
    label: &str,
    opacity: f32,
    scale: f32,
) {
    let color = Theme::with_opacity(theme.foreground, opacity * 0.5);
    ui.painter().rect_filled(
        rect,
        12.0 * scale,
        Theme::with_opacity(theme.card_border, opacity * 0.4),
    );
    ui.painter().rect_stroke(
        rect,
        12.0 * scale,
        Stroke::new(1.0, color),
        egui::StrokeKind::Inside,
    );
    let galley = ui.painter().layout(
        label.to_string(),
        FontId::proportional(theme.caption_size * 1.2 * scale),
        color,
        rect.width() - 16.0 * scale,
    );
    let pos = rect.center() - galley.rect.size() / 2.0;
    ui.painter().galley(pos, galley, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_label_prefers_alt_text() {
        assert_eq!(image_label("https://x.test/a/cake.jpg", "Cake"), "[Image: Cake]");
        assert_eq!(image_label("https://x.test/a/cake.jpg", ""), "[Image: cake.jpg]");
        assert_eq!(image_label("", ""), "[Image]");
    }

    #[test]
    fn test_picked_option_is_marked() {
        let chosen = SelectionView {
            choice: Some(Choice::OptionB),
            revealed_value: None,
            is_computing: false,
        };
        assert_eq!(option_label("Gift", Choice::OptionB, chosen), "\u{2713} Gift");
        assert_eq!(option_label("Surprise", Choice::OptionA, chosen), "Surprise");

        let unset = SelectionView {
            choice: None,
            ..chosen
        };
        assert_eq!(option_label("Gift", Choice::OptionB, unset), "Gift");
    }
}
