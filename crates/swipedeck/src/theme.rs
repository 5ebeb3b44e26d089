use eframe::egui::Color32;

pub const THEMES: &[&str] = &["soft", "night"];

#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color32,
    /// Headings, active dot, chevrons.
    pub primary: Color32,
    pub foreground: Color32,
    pub accent: Color32,
    pub card: Color32,
    pub card_border: Color32,
    pub on_accent: Color32,
    pub heading_size: f32,
    pub body_size: f32,
    pub caption_size: f32,
    pub number_size: f32,
}

impl Theme {
    pub fn soft() -> Self {
        Self {
            background: Color32::from_rgb(0xF7, 0xF0, 0xE8),
            primary: Color32::from_rgb(0x5D, 0x40, 0x37),
            foreground: Color32::from_rgb(0x6D, 0x4C, 0x41),
            accent: Color32::from_rgb(0xA1, 0x66, 0x4A),
            card: Color32::from_rgba_unmultiplied(0xFF, 0xFF, 0xFF, 0x80),
            card_border: Color32::from_rgba_unmultiplied(0xFF, 0xFF, 0xFF, 0xCC),
            on_accent: Color32::WHITE,
            heading_size: 30.0,
            body_size: 19.0,
            caption_size: 11.0,
            number_size: 96.0,
        }
    }

    pub fn night() -> Self {
        Self {
            background: Color32::from_rgb(0x1F, 0x1A, 0x17),
            primary: Color32::from_rgb(0xEF, 0xDF, 0xD0),
            foreground: Color32::from_rgb(0xD7, 0xC4, 0xB5),
            accent: Color32::from_rgb(0xC8, 0x8A, 0x6A),
            card: Color32::from_rgba_unmultiplied(0x3A, 0x30, 0x2B, 0xB0),
            card_border: Color32::from_rgba_unmultiplied(0x5A, 0x4A, 0x40, 0xCC),
            on_accent: Color32::from_rgb(0x1F, 0x1A, 0x17),
            heading_size: 30.0,
            body_size: 19.0,
            caption_size: 11.0,
            number_size: 96.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "night" => Self::night(),
            _ => Self::soft(),
        }
    }

    /// Apply opacity to a color, keeping any alpha it already has.
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let alpha = color.a() as f32 * opacity.clamp(0.0, 1.0);
        let [r, g, b, _] = color.to_srgba_unmultiplied();
        Color32::from_rgba_unmultiplied(r, g, b, alpha as u8)
    }
}
