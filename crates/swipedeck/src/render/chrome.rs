use eframe::egui::{self, FontId, Pos2, Stroke};

use crate::deck::DeckMeta;
use crate::render::{Action, HitMap};
use crate::session::Command;
use crate::theme::Theme;

pub const MUSIC_ON: &str = "MUSIC ON";
pub const MUSIC_OFF: &str = "PLAY MUSIC";
pub const MUSIC_RETRY: &str = "TAP TO PLAY MUSIC";
pub const SWIPE_HINT: &str = "SWIPE TO NAVIGATE";

/// Playback state reflected by the music controls.
#[derive(Debug, Clone, Copy)]
pub struct MusicState {
    pub desired_playing: bool,
    /// The device has confirmed it is playing.
    pub confirmed: bool,
    pub show_retry: bool,
}

impl MusicState {
    /// Toggle opacity; dimmed while a play request waits on the device.
    pub fn toggle_opacity(&self) -> f32 {
        if self.desired_playing && !self.confirmed {
            0.6
        } else {
            1.0
        }
    }
}

pub fn music_label(desired_playing: bool) -> &'static str {
    if desired_playing { MUSIC_ON } else { MUSIC_OFF }
}

/// Width of each indicator dot, left to right.
pub fn dot_widths(count: usize, current: usize, scale: f32) -> Vec<f32> {
    (0..count)
        .map(|i| if i == current { 16.0 * scale } else { 4.0 * scale })
        .collect()
}

/// Position dots and the swipe hint below the card. Returns the bottom edge.
pub fn draw_indicators(
    ui: &egui::Ui,
    theme: &Theme,
    card: egui::Rect,
    count: usize,
    current: usize,
    scale: f32,
) -> f32 {
    let gap = 6.0 * scale;
    let height = 4.0 * scale;
    let widths = dot_widths(count, current, scale);
    let total: f32 = widths.iter().sum::<f32>() + gap * count.saturating_sub(1) as f32;

    let top = card.bottom() + 32.0 * scale;
    let mut x = card.center().x - total / 2.0;
    for (i, w) in widths.into_iter().enumerate() {
        let color = if i == current {
            theme.primary
        } else {
            Theme::with_opacity(theme.primary, 0.2)
        };
        let rect = egui::Rect::from_min_size(Pos2::new(x, top), egui::vec2(w, height));
        ui.painter().rect_filled(rect, height / 2.0, color);
        x += w + gap;
    }

    let hint_color = Theme::with_opacity(theme.primary, 0.4);
    let galley = ui.painter().layout_no_wrap(
        SWIPE_HINT.to_string(),
        FontId::proportional(theme.caption_size * scale),
        hint_color,
    );
    let hint_top = top + height + 16.0 * scale;
    let bottom = hint_top + galley.rect.height();
    ui.painter().galley(
        Pos2::new(card.center().x - galley.rect.width() / 2.0, hint_top),
        galley,
        hint_color,
    );
    bottom
}

/// Previous/next buttons beside the card, each shown only when it would do
/// something.
#[allow(clippy::too_many_arguments)]
pub fn draw_chevrons(
    ui: &egui::Ui,
    theme: &Theme,
    window: egui::Rect,
    card: egui::Rect,
    can_retreat: bool,
    can_advance: bool,
    scale: f32,
    hits: &mut HitMap,
) {
    let radius = 22.0 * scale;
    let margin = 24.0 * scale;
    // No room beside a card that fills the window width.
    if card.left() - window.left() < radius * 2.0 + margin {
        return;
    }
    let y = card.center().y;
    let buttons = [
        (
            can_retreat,
            Pos2::new(card.left() - margin - radius, y),
            "\u{2039}",
            Command::Retreat,
        ),
        (
            can_advance,
            Pos2::new(card.right() + margin + radius, y),
            "\u{203A}",
            Command::Advance,
        ),
    ];
    for (visible, center, glyph, command) in buttons {
        if !visible {
            continue;
        }
        ui.painter()
            .circle_filled(center, radius, Theme::with_opacity(theme.card_border, 0.9));
        let galley = ui.painter().layout_no_wrap(
            glyph.to_string(),
            FontId::proportional(radius * 1.4),
            theme.primary,
        );
        ui.painter()
            .galley(center - galley.rect.size() / 2.0, galley, theme.primary);
        hits.push(
            egui::Rect::from_center_size(center, egui::vec2(radius * 2.0, radius * 2.0)),
            Action::Session(command),
        );
    }
}

fn pill(
    ui: &egui::Ui,
    top_right: Pos2,
    label: &str,
    fill: egui::Color32,
    text: egui::Color32,
    theme: &Theme,
    scale: f32,
) -> egui::Rect {
    let galley = ui.painter().layout_no_wrap(
        label.to_string(),
        FontId::proportional(theme.caption_size * scale),
        text,
    );
    let padding = egui::vec2(16.0 * scale, 10.0 * scale);
    let size = galley.rect.size() + padding * 2.0;
    let rect = egui::Rect::from_min_size(Pos2::new(top_right.x - size.x, top_right.y), size);
    ui.painter().rect_filled(rect, size.y / 2.0, fill);
    ui.painter().galley(rect.min + padding, galley, text);
    rect
}

/// Music toggle in the top-right corner, with the retry pill under it while
/// playback is wanted but not running.
pub fn draw_music_controls(
    ui: &egui::Ui,
    theme: &Theme,
    window: egui::Rect,
    music: MusicState,
    scale: f32,
    hits: &mut HitMap,
) {
    let anchor = Pos2::new(window.right() - 24.0 * scale, window.top() + 24.0 * scale);
    let (fill, text) = if music.desired_playing {
        (theme.accent, theme.on_accent)
    } else {
        (theme.card_border, theme.primary)
    };
    let fill = Theme::with_opacity(fill, music.toggle_opacity());
    let toggle = pill(
        ui,
        anchor,
        music_label(music.desired_playing),
        fill,
        text,
        theme,
        scale,
    );
    hits.push(toggle, Action::Session(Command::TogglePlayback));

    if music.show_retry {
        let below = Pos2::new(anchor.x, toggle.bottom() + 8.0 * scale);
        let retry = pill(
            ui,
            below,
            MUSIC_RETRY,
            theme.accent,
            theme.on_accent,
            theme,
            scale,
        );
        hits.push(retry, Action::Session(Command::RetryPlayback));
    }
}

/// Title, subtitle and the OPEN button shown before the session begins.
pub fn draw_entry(
    ui: &egui::Ui,
    theme: &Theme,
    meta: &DeckMeta,
    window: egui::Rect,
    scale: f32,
    hits: &mut HitMap,
) {
    let painter = ui.painter();
    let width = window.width() * 0.8;

    let title = painter.layout(
        meta.title.clone(),
        FontId::proportional(theme.heading_size * 1.4 * scale),
        theme.primary,
        width,
    );
    let subtitle = (!meta.subtitle.is_empty()).then(|| {
        painter.layout(
            meta.subtitle.clone(),
            FontId::proportional(theme.body_size * scale),
            Theme::with_opacity(theme.foreground, 0.7),
            width,
        )
    });
    let button_label = painter.layout_no_wrap(
        meta.open_label.clone(),
        FontId::proportional(theme.body_size * scale),
        theme.primary,
    );
    let button_size = button_label.rect.size() + egui::vec2(64.0 * scale, 28.0 * scale);

    let gap = 24.0 * scale;
    let total = title.rect.height()
        + subtitle.as_ref().map_or(0.0, |g| g.rect.height() + gap)
        + gap * 1.5
        + button_size.y;
    let mut y = window.center().y - total / 2.0;
    let cx = window.center().x;

    let title_h = title.rect.height();
    painter.galley(Pos2::new(cx - title.rect.width() / 2.0, y), title, theme.primary);
    y += title_h + gap;

    if let Some(subtitle) = subtitle {
        let h = subtitle.rect.height();
        painter.galley(
            Pos2::new(cx - subtitle.rect.width() / 2.0, y),
            subtitle,
            theme.foreground,
        );
        y += h + gap;
    }
    y += gap * 0.5;

    let button = egui::Rect::from_min_size(
        Pos2::new(cx - button_size.x / 2.0, y),
        button_size,
    );
    painter.rect_stroke(
        button,
        button_size.y / 2.0,
        Stroke::new(2.0 * scale, theme.primary),
        egui::StrokeKind::Inside,
    );
    painter.galley(
        button.center() - button_label.rect.size() / 2.0,
        button_label,
        theme.primary,
    );
    hits.push(button, Action::Open);
}
