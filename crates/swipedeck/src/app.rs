use eframe::egui;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;

use crate::audio;
use crate::config::Config;
use crate::deck::{Deck, DeckMeta};
use crate::render::transition::{ActiveTransition, CardFrame, TransitionDirection};
use crate::render::chrome::{self, MusicState};
use crate::render::{self, Action, CardContext, HitMap};
use crate::session::gesture::DRAG_ELASTICITY;
use crate::session::playback::PlaybackAck;
use crate::session::{Command, Effect, Session};
use crate::theme::Theme;

/// Pointer travel below which a press counts as a tap.
const TAP_SLOP: f32 = 6.0;
/// How often to look at the audio device while playback is wanted.
const DEVICE_POLL_INTERVAL: Duration = Duration::from_millis(250);
const TOAST_DURATION: f32 = 2.5;
const TOAST_FADE_START: f32 = 2.0;

/// How the carousel window should start.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub windowed: bool,
    /// 1-indexed.
    pub start_slide: Option<usize>,
    pub skip_intro: bool,
    pub mute: bool,
}

enum Pointer {
    Idle,
    Pressed {
        origin: egui::Pos2,
        current: egui::Pos2,
        dragging: bool,
    },
}

impl Pointer {
    /// Fold one frame of primary-button input into the gesture. Returns the
    /// release once the button is up.
    fn step(&mut self, pressed: bool, down: bool, pos: Option<egui::Pos2>) -> Option<Release> {
        if pressed {
            let pos = pos?;
            if !down {
                // Pressed and released within one frame.
                *self = Pointer::Idle;
                return Some(Release::Tap(pos));
            }
            *self = Pointer::Pressed {
                origin: pos,
                current: pos,
                dragging: false,
            };
            return None;
        }

        if down {
            if let (
                Pointer::Pressed {
                    origin,
                    current,
                    dragging,
                },
                Some(pos),
            ) = (&mut *self, pos)
            {
                *current = pos;
                if (pos.x - origin.x).abs() > TAP_SLOP {
                    *dragging = true;
                }
            }
            return None;
        }

        match std::mem::replace(self, Pointer::Idle) {
            Pointer::Pressed {
                current,
                dragging: false,
                ..
            } => Some(Release::Tap(current)),
            Pointer::Pressed {
                origin, current, ..
            } => Some(Release::Swipe(current.x - origin.x)),
            Pointer::Idle => None,
        }
    }

    fn is_pressed(&self) -> bool {
        matches!(self, Pointer::Pressed { .. })
    }
}

#[derive(Debug, PartialEq)]
enum Release {
    Tap(egui::Pos2),
    Swipe(f32),
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        if elapsed < TOAST_FADE_START {
            1.0
        } else if elapsed < TOAST_DURATION {
            1.0 - (elapsed - TOAST_FADE_START) / (TOAST_DURATION - TOAST_FADE_START)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= TOAST_DURATION
    }
}

struct CarouselApp {
    session: Session,
    meta: DeckMeta,
    theme: Theme,
    transition: Option<ActiveTransition>,
    pointer: Pointer,
    /// Clickable regions from the last painted frame.
    hits: HitMap,
    toast: Option<Toast>,
}

impl CarouselApp {
    fn new(session: Session, meta: DeckMeta, theme: Theme) -> Self {
        Self {
            session,
            meta,
            theme,
            transition: None,
            pointer: Pointer::Idle,
            hits: HitMap::default(),
            toast: None,
        }
    }

    fn open(&mut self, now: Instant) {
        if self.session.started() {
            return;
        }
        self.dispatch(Command::StartPlayback, now);
    }

    fn dispatch(&mut self, command: Command, now: Instant) {
        let from = self.session.navigation().position();
        match self.session.apply(command, now) {
            Effect::Moved(direction) => {
                let to = self.session.navigation().position();
                if let Some(direction) = TransitionDirection::from_direction(direction) {
                    self.transition = Some(ActiveTransition::new(from, to, direction, now));
                }
            }
            Effect::Playback(ack) => self.report_playback(ack),
            Effect::RevealStarted => {
                tracing::debug!("Reveal requested");
            }
            Effect::None => {}
        }
    }

    fn perform(&mut self, action: Action, now: Instant) {
        match action {
            Action::Open => self.open(now),
            Action::Session(command) => self.dispatch(command, now),
        }
    }

    fn report_playback(&mut self, ack: PlaybackAck) {
        if ack.intent_accepted {
            return;
        }
        let reason = ack.reason.unwrap_or_else(|| "unknown error".to_string());
        tracing::warn!(%reason, "Music could not start");
        self.toast = Some(Toast::new(format!("Music unavailable: {reason}")));
    }

    fn drag_offset(&self) -> f32 {
        match self.pointer {
            Pointer::Pressed {
                origin,
                current,
                dragging: true,
            } => (current.x - origin.x) * DRAG_ELASTICITY,
            _ => 0.0,
        }
    }

    fn handle_pointer(&mut self, ctx: &egui::Context) -> Option<Release> {
        let (pressed, down, pos) = ctx.input(|i| {
            (
                i.pointer.button_pressed(egui::PointerButton::Primary),
                i.pointer.button_down(egui::PointerButton::Primary),
                i.pointer.latest_pos(),
            )
        });
        let release = self.pointer.step(pressed, down, pos);
        if self.pointer.is_pressed() {
            ctx.request_repaint();
        }
        release
    }

    fn draw_carousel(&mut self, ui: &egui::Ui, rect: egui::Rect, scale: f32, now: Instant) {
        let card = render::card_rect(rect, scale);
        let selection = self.session.selection();
        let options = self.session.registry().choice_options();
        let picked = selection
            .choice
            .and_then(|choice| options.map(|o| o[choice.index()].as_str()));
        let card_ctx = CardContext {
            theme: &self.theme,
            selection,
            picked,
            scale,
        };
        let registry = self.session.registry();

        match self.transition {
            Some(t) => {
                let (outgoing, incoming) = t.frames(now, rect.width());
                for (position, frame) in [(t.from, outgoing), (t.to, incoming)] {
                    if let Ok(slide) = registry.get(position) {
                        render::render_card(ui, slide, &card_ctx, card, frame, None);
                    }
                }
            }
            None => {
                let frame = CardFrame {
                    offset: self.drag_offset(),
                    ..CardFrame::CENTER
                };
                render::render_card(
                    ui,
                    self.session.current_slide(),
                    &card_ctx,
                    card,
                    frame,
                    Some(&mut self.hits),
                );
            }
        }

        let navigation = self.session.navigation();
        chrome::draw_indicators(
            ui,
            &self.theme,
            card,
            navigation.size(),
            self.session.navigation_state().position,
            scale,
        );
        chrome::draw_chevrons(
            ui,
            &self.theme,
            rect,
            card,
            navigation.can_retreat(),
            navigation.can_advance(),
            scale,
            &mut self.hits,
        );

        let playback = self.session.playback();
        let music = MusicState {
            desired_playing: playback.desired_playing(),
            confirmed: playback.device_playing(),
            show_retry: playback.needs_retry() && self.session.started(),
        };
        chrome::draw_music_controls(ui, &self.theme, rect, music, scale, &mut self.hits);
    }

    fn draw_toast(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) {
        let Some(toast) = &self.toast else { return };
        let opacity = toast.opacity();
        if opacity <= 0.0 {
            return;
        }
        let color = Theme::with_opacity(self.theme.on_accent, opacity);
        let galley = ui.painter().layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional(self.theme.caption_size * 1.3 * scale),
            color,
        );
        let padding = 14.0 * scale;
        let toast_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - galley.rect.width() / 2.0 - padding,
                rect.bottom() - 64.0 * scale,
            ),
            galley.rect.size() + egui::vec2(padding * 2.0, padding * 2.0),
        );
        ui.painter().rect_filled(
            toast_rect,
            8.0 * scale,
            Theme::with_opacity(self.theme.primary, opacity * 0.9),
        );
        ui.painter()
            .galley(toast_rect.min + egui::vec2(padding, padding), galley, color);
    }
}

impl eframe::App for CarouselApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let started = self.session.started();

        // Viewport commands go out after the input closure releases its lock.
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let mut commands: Vec<Command> = Vec::new();
        let mut open = false;

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }
            if !started {
                if i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Space) {
                    open = true;
                }
                return;
            }
            if i.key_pressed(egui::Key::ArrowRight)
                || i.key_pressed(egui::Key::Space)
                || i.key_pressed(egui::Key::N)
            {
                commands.push(Command::Advance);
            }
            if i.key_pressed(egui::Key::ArrowLeft) || i.key_pressed(egui::Key::P) {
                commands.push(Command::Retreat);
            }
            if i.key_pressed(egui::Key::M) {
                commands.push(Command::TogglePlayback);
            }
        });

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }
        if open {
            self.open(now);
        }
        for command in commands {
            self.dispatch(command, now);
        }

        match self.handle_pointer(ctx) {
            Some(Release::Tap(pos)) => {
                if let Some(action) = self.hits.hit(pos) {
                    self.perform(action, now);
                }
            }
            Some(Release::Swipe(offset)) if self.session.started() => {
                self.dispatch(Command::DragReleased { offset }, now);
            }
            _ => {}
        }

        if let Some(value) = self.session.tick(now) {
            tracing::info!(value, "Number revealed");
        }

        if self.transition.is_some_and(|t| t.is_complete(now)) {
            self.transition = None;
        }
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                let scale = render::compute_scale(rect);

                self.hits.clear();
                if self.session.started() {
                    self.draw_carousel(ui, rect, scale, now);
                } else {
                    chrome::draw_entry(ui, &self.theme, &self.meta, rect, scale, &mut self.hits);
                }
                self.draw_toast(ui, rect, scale);
            });

        if self.transition.is_some() || self.toast.is_some() {
            ctx.request_repaint();
        } else if let Some(wait) = self.session.next_deadline(now) {
            ctx.request_repaint_after(wait);
        }
        if self.session.playback().desired_playing() {
            ctx.request_repaint_after(DEVICE_POLL_INTERVAL);
        }
    }
}

/// Add a font file as the last fallback of both families.
fn install_font(ctx: &egui::Context, path: &Path) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?;
    let mut fonts = egui::FontDefinitions::default();
    let name = "deck-fallback".to_string();
    fonts
        .font_data
        .insert(name.clone(), Arc::new(egui::FontData::from_owned(bytes)));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push(name.clone());
    }
    ctx.set_fonts(fonts);
    tracing::debug!(path = %path.display(), "Installed fallback font");
    Ok(())
}

pub fn run(deck: Deck, options: LaunchOptions, config: Config) -> anyhow::Result<()> {
    let Deck { meta, slides } = deck;
    let title = meta.title.clone();
    let theme = Theme::from_name(config.theme_name());
    let font = config.font().map(Path::to_path_buf);

    let device = audio::device_for(&config.audio_settings(), options.mute);
    let mut session = Session::new(slides, config.session_settings(), device);
    if let Some(slide) = options.start_slide {
        session.jump_to(slide.saturating_sub(1));
    }
    if options.skip_intro {
        session.begin_silently();
    }
    tracing::debug!(
        threshold = session.gesture().threshold(),
        start = session.navigation_state().position,
        "Carousel ready"
    );

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([480.0, 900.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native,
        Box::new(move |cc| {
            if let Some(path) = font {
                if let Err(e) = install_font(&cc.egui_ctx, &path) {
                    tracing::warn!(error = %e, "Continuing with built-in fonts");
                }
            }
            Ok(Box::new(CarouselApp::new(session, meta, theme)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release_in_one_frame_is_a_tap() {
        let mut pointer = Pointer::Idle;
        let pos = egui::pos2(120.0, 300.0);
        assert_eq!(pointer.step(true, false, Some(pos)), Some(Release::Tap(pos)));
        assert!(!pointer.is_pressed());
    }

    #[test]
    fn test_short_press_is_a_tap() {
        let mut pointer = Pointer::Idle;
        let pos = egui::pos2(50.0, 50.0);
        assert_eq!(pointer.step(true, true, Some(pos)), None);
        assert!(pointer.is_pressed());
        assert_eq!(pointer.step(false, true, Some(egui::pos2(53.0, 50.0))), None);
        assert_eq!(
            pointer.step(false, false, None),
            Some(Release::Tap(egui::pos2(53.0, 50.0)))
        );
    }

    #[test]
    fn test_drag_is_a_swipe_with_raw_offset() {
        let mut pointer = Pointer::Idle;
        pointer.step(true, true, Some(egui::pos2(200.0, 50.0)));
        pointer.step(false, true, Some(egui::pos2(160.0, 55.0)));
        assert_eq!(pointer.step(false, false, None), Some(Release::Swipe(-40.0)));
        assert_eq!(pointer.step(false, false, None), None);
    }
}
