use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use super::{
    Block, Deck, DeckMeta, RevealContent, Slide, SlideDescriptor, SlideKind, SlideRegistry,
    TextStyle,
};
use crate::error::DeckError;

const BUNDLED_DECK: &str = include_str!("../../decks/amira.yaml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeck {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    open_label: Option<String>,
    slides: Vec<RawSlide>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSlide {
    id: u32,
    #[serde(default)]
    rtl: bool,
    #[serde(default)]
    kind: RawKind,
    #[serde(default)]
    sticker: Option<String>,
    #[serde(default)]
    blocks: Vec<RawBlock>,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    reveal: Option<RawReveal>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawKind {
    #[default]
    Content,
    Choice,
    Reveal,
}

/// One of `heading`, `text` or `image` must be set.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBlock {
    #[serde(default)]
    heading: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    image: Option<RawImage>,
    #[serde(default)]
    style: TextStyle,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawImage {
    url: String,
    #[serde(default)]
    alt: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReveal {
    #[serde(default = "default_picked_label")]
    picked_label: String,
    #[serde(default = "default_reveal_button")]
    button: String,
    #[serde(default)]
    captions: Vec<RawBlock>,
}

fn default_picked_label() -> String {
    "You picked:".to_string()
}

fn default_reveal_button() -> String {
    "Generate a number from 1 to 20".to_string()
}

/// Parse a deck from YAML source.
pub fn parse(source: &str) -> Result<Deck, DeckError> {
    let raw: RawDeck = serde_yaml::from_str(source)?;

    let defaults = DeckMeta::default();
    let meta = DeckMeta {
        title: raw.title.unwrap_or(defaults.title),
        subtitle: raw.subtitle.unwrap_or(defaults.subtitle),
        open_label: raw.open_label.unwrap_or(defaults.open_label),
    };

    let slides = raw
        .slides
        .into_iter()
        .map(convert_slide)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Deck {
        meta,
        slides: SlideRegistry::new(slides)?,
    })
}

/// Read and parse a deck file.
pub fn load(path: &Path) -> anyhow::Result<Deck> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let deck = parse(&source).with_context(|| format!("Invalid deck {}", path.display()))?;
    tracing::debug!(path = %path.display(), slides = deck.slides.size(), "Loaded deck");
    Ok(deck)
}

/// The deck compiled into the binary.
pub fn bundled() -> Result<Deck, DeckError> {
    parse(BUNDLED_DECK)
}

fn convert_slide(raw: RawSlide) -> Result<Slide, DeckError> {
    let id = raw.id;
    let blocks = raw
        .blocks
        .into_iter()
        .map(|b| convert_block(id, b))
        .collect::<Result<Vec<_>, _>>()?;

    let kind = match raw.kind {
        RawKind::Content => SlideKind::Content,
        RawKind::Choice => {
            let count = raw.options.len();
            let options: [String; 2] = raw
                .options
                .try_into()
                .map_err(|_| DeckError::ChoiceOptions { slide: id, count })?;
            let prompt = raw.prompt.ok_or(DeckError::MissingSection {
                slide: id,
                kind: "choice",
                field: "prompt",
            })?;
            SlideKind::Choice { prompt, options }
        }
        RawKind::Reveal => {
            let reveal = raw.reveal.ok_or(DeckError::MissingSection {
                slide: id,
                kind: "reveal",
                field: "reveal",
            })?;
            let captions = reveal
                .captions
                .into_iter()
                .map(|b| convert_block(id, b))
                .collect::<Result<Vec<_>, _>>()?;
            SlideKind::Reveal(RevealContent {
                picked_label: reveal.picked_label,
                button: reveal.button,
                captions,
            })
        }
    };

    let has_image = blocks.iter().any(|b| matches!(b, Block::Image { .. }));
    let descriptor = SlideDescriptor {
        id,
        right_to_left: raw.rtl,
        has_auxiliary_media: has_image || raw.sticker.is_some(),
        forward_requires_action: matches!(kind, SlideKind::Choice { .. }),
    };

    Ok(Slide {
        descriptor,
        blocks,
        sticker: raw.sticker,
        kind,
    })
}

fn convert_block(slide: u32, raw: RawBlock) -> Result<Block, DeckError> {
    match (raw.heading, raw.text, raw.image) {
        (Some(heading), None, None) => Ok(Block::Heading(heading)),
        (None, Some(text), None) => Ok(Block::Text {
            text,
            style: raw.style,
        }),
        (None, None, Some(image)) => Ok(Block::Image {
            url: image.url,
            alt: image.alt,
        }),
        (None, None, None) => Err(DeckError::InvalidBlock {
            slide,
            reason: "block needs one of `heading`, `text` or `image`".to_string(),
        }),
        _ => Err(DeckError::InvalidBlock {
            slide,
            reason: "block may set only one of `heading`, `text` or `image`".to_string(),
        }),
    }
}
