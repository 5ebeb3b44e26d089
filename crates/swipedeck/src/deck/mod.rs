pub mod loader;

use crate::error::DeckError;

pub use loader::{bundled, load};

#[derive(Debug, Clone)]
pub struct Deck {
    pub meta: DeckMeta,
    pub slides: SlideRegistry,
}

/// Entry-screen copy shown before the carousel starts.
#[derive(Debug, Clone)]
pub struct DeckMeta {
    pub title: String,
    pub subtitle: String,
    pub open_label: String,
}

impl Default for DeckMeta {
    fn default() -> Self {
        Self {
            title: "A little something".to_string(),
            subtitle: String::new(),
            open_label: "OPEN".to_string(),
        }
    }
}

/// The part of a slide the navigation logic cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideDescriptor {
    /// 1-indexed, sequential.
    pub id: u32,
    pub right_to_left: bool,
    pub has_auxiliary_media: bool,
    /// Generic "next" navigation and forward swipes stop here; only an
    /// in-slide action moves past it.
    pub forward_requires_action: bool,
}

#[derive(Debug, Clone)]
pub struct Slide {
    pub descriptor: SlideDescriptor,
    pub blocks: Vec<Block>,
    pub sticker: Option<String>,
    pub kind: SlideKind,
}

#[derive(Debug, Clone)]
pub enum SlideKind {
    Content,
    Choice {
        prompt: String,
        options: [String; 2],
    },
    Reveal(RevealContent),
}

#[derive(Debug, Clone)]
pub struct RevealContent {
    pub picked_label: String,
    pub button: String,
    /// Shown under the number once it is revealed.
    pub captions: Vec<Block>,
}

#[derive(Debug, Clone)]
pub enum Block {
    Heading(String),
    Text { text: String, style: TextStyle },
    Image { url: String, alt: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    #[default]
    Plain,
    Italic,
    Strong,
    Muted,
    Accent,
}

impl Slide {
    pub fn first_line(&self) -> &str {
        let from_blocks = self.blocks.iter().find_map(|b| match b {
            Block::Heading(text) | Block::Text { text, .. } => Some(text.as_str()),
            Block::Image { .. } => None,
        });
        match (&self.kind, from_blocks) {
            (_, Some(text)) => text,
            (SlideKind::Choice { prompt, .. }, None) => prompt,
            (SlideKind::Reveal(reveal), None) => &reveal.picked_label,
            (SlideKind::Content, None) => "",
        }
    }
}

/// Ordered slides, fixed once built.
#[derive(Debug, Clone)]
pub struct SlideRegistry {
    slides: Vec<Slide>,
}

impl SlideRegistry {
    pub fn new(slides: Vec<Slide>) -> Result<Self, DeckError> {
        if slides.is_empty() {
            return Err(DeckError::Empty);
        }

        let mut choice: Option<u32> = None;
        for (index, slide) in slides.iter().enumerate() {
            let id = slide.descriptor.id;
            let expected = index as u32 + 1;
            if id != expected {
                return Err(DeckError::NonSequentialId {
                    expected,
                    found: id,
                });
            }
            match slide.kind {
                SlideKind::Choice { .. } => {
                    if let Some(first) = choice {
                        return Err(DeckError::MultipleChoice { slide: id, first });
                    }
                    if index + 1 == slides.len() {
                        return Err(DeckError::ChoiceIsLast { slide: id });
                    }
                    choice = Some(id);
                }
                SlideKind::Reveal(_) if choice.is_none() => {
                    return Err(DeckError::RevealWithoutChoice { slide: id });
                }
                _ => {}
            }
        }

        Ok(Self { slides })
    }

    pub fn get(&self, position: usize) -> Result<&Slide, DeckError> {
        self.slides.get(position).ok_or(DeckError::OutOfRange {
            position,
            size: self.slides.len(),
        })
    }

    /// The slide at `position`, or the last slide when past the end.
    pub fn clamped(&self, position: usize) -> &Slide {
        // `new` rejects empty decks, so the index is always in bounds.
        &self.slides[position.min(self.slides.len() - 1)]
    }

    pub fn size(&self) -> usize {
        self.slides.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter()
    }

    /// Option labels of the choice slide, if the deck has one.
    pub fn choice_options(&self) -> Option<&[String; 2]> {
        self.slides.iter().find_map(|s| match &s.kind {
            SlideKind::Choice { options, .. } => Some(options),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(id: u32) -> Slide {
        Slide {
            descriptor: SlideDescriptor {
                id,
                right_to_left: false,
                has_auxiliary_media: false,
                forward_requires_action: false,
            },
            blocks: vec![Block::Text {
                text: format!("slide {id}"),
                style: TextStyle::Plain,
            }],
            sticker: None,
            kind: SlideKind::Content,
        }
    }

    fn choice(id: u32) -> Slide {
        let mut slide = content(id);
        slide.descriptor.forward_requires_action = true;
        slide.kind = SlideKind::Choice {
            prompt: "Pick".to_string(),
            options: ["A".to_string(), "B".to_string()],
        };
        slide
    }

    fn reveal(id: u32) -> Slide {
        let mut slide = content(id);
        slide.kind = SlideKind::Reveal(RevealContent {
            picked_label: "You picked:".to_string(),
            button: "Go".to_string(),
            captions: Vec::new(),
        });
        slide
    }

    #[test]
    fn test_get_out_of_range_is_an_error() {
        let registry = SlideRegistry::new(vec![content(1), content(2)]).unwrap();
        assert_eq!(registry.size(), 2);
        assert_eq!(registry.get(1).unwrap().descriptor.id, 2);
        assert!(matches!(
            registry.get(2),
            Err(DeckError::OutOfRange {
                position: 2,
                size: 2
            })
        ));
    }

    #[test]
    fn test_empty_deck_rejected() {
        assert!(matches!(SlideRegistry::new(vec![]), Err(DeckError::Empty)));
    }

    #[test]
    fn test_ids_must_be_sequential() {
        let err = SlideRegistry::new(vec![content(1), content(3)]).unwrap_err();
        assert!(matches!(
            err,
            DeckError::NonSequentialId {
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_choice_cannot_be_last() {
        let err = SlideRegistry::new(vec![content(1), choice(2)]).unwrap_err();
        assert!(matches!(err, DeckError::ChoiceIsLast { slide: 2 }));
    }

    #[test]
    fn test_only_one_choice_slide() {
        let err =
            SlideRegistry::new(vec![choice(1), choice(2), reveal(3)]).unwrap_err();
        assert!(matches!(
            err,
            DeckError::MultipleChoice { slide: 2, first: 1 }
        ));
    }

    #[test]
    fn test_reveal_needs_preceding_choice() {
        let err = SlideRegistry::new(vec![reveal(1), choice(2), content(3)]).unwrap_err();
        assert!(matches!(err, DeckError::RevealWithoutChoice { slide: 1 }));
    }

    #[test]
    fn test_choice_options_lookup() {
        let plain = SlideRegistry::new(vec![content(1)]).unwrap();
        assert!(plain.choice_options().is_none());

        let registry = SlideRegistry::new(vec![content(1), choice(2), reveal(3)]).unwrap();
        let options = registry.choice_options().unwrap();
        assert_eq!(options[1], "B");
    }

    #[test]
    fn test_first_line_falls_back_to_prompt() {
        let mut slide = choice(1);
        slide.blocks.clear();
        assert_eq!(slide.first_line(), "Pick");
    }
}
