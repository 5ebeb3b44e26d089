use std::path::Path;

use colored::Colorize;

use crate::cli::resolve_deck;
use crate::deck::{Slide, SlideKind};

const PREVIEW_WIDTH: usize = 56;

fn flags(slide: &Slide) -> Vec<&'static str> {
    let d = slide.descriptor;
    let mut flags = Vec::new();
    match slide.kind {
        SlideKind::Choice { .. } => flags.push("choice"),
        SlideKind::Reveal(_) => flags.push("reveal"),
        SlideKind::Content => {}
    }
    if d.right_to_left {
        flags.push("rtl");
    }
    if d.has_auxiliary_media {
        flags.push("media");
    }
    flags
}

/// Shorten to `max` characters, ending with an ellipsis when cut.
fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}\u{2026}", cut.trim_end())
}

pub fn run(path: Option<&Path>) -> anyhow::Result<()> {
    let deck = resolve_deck(path)?;
    let source = path.map_or_else(|| "bundled deck".to_string(), |p| p.display().to_string());
    println!(
        "{} ({} slides)",
        source.bold(),
        deck.slides.size()
    );

    for slide in deck.slides.iter() {
        let flags = flags(slide).join(",");
        let line = preview(slide.first_line(), PREVIEW_WIDTH);
        let id = format!("{:>3}", slide.descriptor.id);
        if flags.is_empty() {
            println!("{}  {line}", id.cyan());
        } else {
            println!("{}  {line} {}", id.cyan(), format!("[{flags}]").dimmed());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck;

    #[test]
    fn test_preview_keeps_short_text() {
        assert_eq!(preview("hello", 10), "hello");
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let arabic = "الحب دعاء والدعاء حب";
        let cut = preview(arabic, 6);
        assert!(cut.chars().count() <= 6);
        assert!(cut.starts_with("الحب"));
        assert!(cut.ends_with('\u{2026}'));
    }

    #[test]
    fn test_flags_for_bundled_slides() {
        let deck = deck::bundled().unwrap();
        let choice = deck.slides.get(17).unwrap();
        assert_eq!(flags(choice), vec!["choice", "media"]);
        let arabic = deck.slides.get(16).unwrap();
        assert!(flags(arabic).contains(&"rtl"));
    }
}
