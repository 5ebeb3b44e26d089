pub mod chrome;
pub mod slide;
pub mod transition;

use eframe::egui;

use crate::deck::Slide;
use crate::session::Command;
use crate::session::selection::SelectionView;
use crate::theme::Theme;

use transition::CardFrame;

/// Something a tap can trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Leave the entry screen.
    Open,
    Session(Command),
}

/// Clickable regions collected while painting a frame. Later entries sit on
/// top of earlier ones.
#[derive(Debug, Default)]
pub struct HitMap {
    targets: Vec<(egui::Rect, Action)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn push(&mut self, rect: egui::Rect, action: Action) {
        self.targets.push((rect, action));
    }

    pub fn hit(&self, pos: egui::Pos2) -> Option<Action> {
        self.targets
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, action)| *action)
    }
}

/// Per-frame inputs shared by every card.
pub struct CardContext<'a> {
    pub theme: &'a Theme,
    pub selection: SelectionView,
    /// Label of the picked option, for the reveal slide.
    pub picked: Option<&'a str>,
    pub scale: f32,
}

/// Size everything relative to a phone-like portrait card.
pub fn compute_scale(rect: egui::Rect) -> f32 {
    let ref_w = 420.0;
    let ref_h = 860.0;
    (rect.width() / ref_w).min(rect.height() / ref_h).clamp(0.5, 2.5)
}

/// Resting position of the card inside the window.
pub fn card_rect(rect: egui::Rect, scale: f32) -> egui::Rect {
    let width = (rect.width() - 32.0 * scale).min(384.0 * scale);
    let height = rect.height() * 0.72;
    let center = egui::pos2(rect.center().x, rect.center().y - 24.0 * scale);
    egui::Rect::from_center_size(center, egui::vec2(width, height))
}

/// Paint one slide card. Hit targets are only registered when `hits` is
/// given, so cards in motion stay inert.
pub fn render_card(
    ui: &egui::Ui,
    slide: &Slide,
    ctx: &CardContext<'_>,
    rest: egui::Rect,
    frame: CardFrame,
    hits: Option<&mut HitMap>,
) {
    if frame.opacity <= 0.0 {
        return;
    }
    let center = rest.center() + egui::vec2(frame.offset, 0.0);
    let rect = egui::Rect::from_center_size(center, rest.size() * frame.scale);
    let scale = ctx.scale * frame.scale;
    let theme = ctx.theme;

    let rounding = 40.0 * scale;
    ui.painter().rect_filled(
        rect,
        rounding,
        Theme::with_opacity(theme.card, frame.opacity),
    );
    ui.painter().rect_stroke(
        rect,
        rounding,
        egui::Stroke::new(1.0, Theme::with_opacity(theme.card_border, frame.opacity)),
        egui::StrokeKind::Outside,
    );

    let mut content = rect.shrink(24.0 * scale);
    if let Some(sticker) = &slide.sticker {
        let strip_h = 128.0 * scale;
        let strip = egui::Rect::from_min_max(
            egui::pos2(content.left(), content.bottom() - strip_h),
            content.max,
        );
        slide::draw_media_placeholder(
            ui,
            theme,
            strip,
            &format!("Sticker {sticker}"),
            frame.opacity,
            scale,
        );
        content.max.y = strip.top() - 16.0 * scale;
    }

    slide::draw_content(ui, slide, ctx, content, frame.opacity, scale, hits);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_prefers_topmost() {
        let mut hits = HitMap::default();
        let big = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let small = egui::Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(20.0, 20.0));
        hits.push(big, Action::Session(Command::Advance));
        hits.push(small, Action::Open);

        assert_eq!(hits.hit(egui::pos2(15.0, 15.0)), Some(Action::Open));
        assert_eq!(
            hits.hit(egui::pos2(80.0, 80.0)),
            Some(Action::Session(Command::Advance))
        );
        assert_eq!(hits.hit(egui::pos2(150.0, 15.0)), None);

        hits.clear();
        assert_eq!(hits.hit(egui::pos2(15.0, 15.0)), None);
    }

    #[test]
    fn test_card_fits_inside_window() {
        let window = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1280.0, 720.0));
        let scale = compute_scale(window);
        let card = card_rect(window, scale);
        assert!(window.contains_rect(card));
        assert!(card.height() > card.width(), "card is portrait");
    }
}
