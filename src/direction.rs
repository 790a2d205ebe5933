//! Translation direction and everything derived from it: the prompt sent to
//! the endpoint and how each text area lays out its script.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    EnglishToDarija,
    DarijaToEnglish,
}

/// Writing direction plus matching alignment for a text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLayout {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::EnglishToDarija, Direction::DarijaToEnglish];

    pub fn label(self) -> &'static str {
        match self {
            Direction::EnglishToDarija => "English → Darija",
            Direction::DarijaToEnglish => "Darija → English",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::EnglishToDarija => Direction::DarijaToEnglish,
            Direction::DarijaToEnglish => Direction::EnglishToDarija,
        }
    }

    /// Layouts for (input, output). English is Latin script, Darija is written
    /// in Arabic script.
    pub fn layouts(self) -> (TextLayout, TextLayout) {
        match self {
            Direction::EnglishToDarija => (TextLayout::LeftToRight, TextLayout::RightToLeft),
            Direction::DarijaToEnglish => (TextLayout::RightToLeft, TextLayout::LeftToRight),
        }
    }

    /// `text` is expected to be trimmed already.
    pub fn build_prompt(self, text: &str) -> String {
        match self {
            Direction::EnglishToDarija => format!(
                "Translate the following English text to Moroccan Darija. \
                 IMPORTANT: Write the translation ONLY in Arabic script (not Latin letters). \
                 Use Arabic letters: ا، ب، ت، ث، etc. \
                 Text: {}",
                text
            ),
            Direction::DarijaToEnglish => format!(
                "Translate the following Moroccan Darija text (in Arabic script) to English. \
                 Text: {}",
                text
            ),
        }
    }
}
