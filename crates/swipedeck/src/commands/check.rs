use std::path::Path;

use colored::Colorize;

use crate::deck::{self, Deck, SlideKind};

/// Counts printed after a deck validates.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeckSummary {
    pub slides: usize,
    pub right_to_left: usize,
    pub with_media: usize,
    /// Id of the choice slide.
    pub choice: Option<u32>,
    pub reveals: Vec<u32>,
}

pub fn summarize(deck: &Deck) -> DeckSummary {
    let mut summary = DeckSummary {
        slides: deck.slides.size(),
        ..Default::default()
    };
    for slide in deck.slides.iter() {
        let d = slide.descriptor;
        if d.right_to_left {
            summary.right_to_left += 1;
        }
        if d.has_auxiliary_media {
            summary.with_media += 1;
        }
        match slide.kind {
            SlideKind::Choice { .. } => summary.choice = Some(d.id),
            SlideKind::Reveal(_) => summary.reveals.push(d.id),
            SlideKind::Content => {}
        }
    }
    summary
}

pub fn run(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let deck = deck::load(path)?;
    let summary = summarize(&deck);

    println!(
        "{} {} is a valid deck",
        "\u{2713}".green().bold(),
        path.display().to_string().bold()
    );
    println!("  {:<14} {}", "Title:".dimmed(), deck.meta.title);
    println!("  {:<14} {}", "Slides:".dimmed(), summary.slides);
    println!("  {:<14} {}", "Right-to-left:".dimmed(), summary.right_to_left);
    println!("  {:<14} {}", "With media:".dimmed(), summary.with_media);
    match summary.choice {
        Some(id) => println!("  {:<14} slide {id}", "Choice:".dimmed()),
        None => println!("  {:<14} {}", "Choice:".dimmed(), "none".dimmed()),
    }
    if !summary.reveals.is_empty() {
        let ids: Vec<String> = summary.reveals.iter().map(u32::to_string).collect();
        println!("  {:<14} slide {}", "Reveal:".dimmed(), ids.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_summary() {
        let deck = deck::bundled().unwrap();
        let summary = summarize(&deck);
        assert_eq!(summary.slides, 19);
        assert_eq!(summary.choice, Some(18));
        assert_eq!(summary.reveals, vec![19]);
        assert!(summary.right_to_left >= 2);
        assert!(summary.with_media > 0);
    }

    #[test]
    fn test_plain_deck_summary() {
        let deck = deck::loader::parse(
            "slides:\n  - id: 1\n    blocks:\n      - text: hi\n",
        )
        .unwrap();
        assert_eq!(
            summarize(&deck),
            DeckSummary {
                slides: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_run_reports_missing_file() {
        let err = run(Path::new("/no/such/deck.yaml")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_run_rejects_invalid_deck() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "slides: []\n").unwrap();
        assert!(run(&path).is_err());
    }
}
