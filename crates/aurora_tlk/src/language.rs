//! Languages of flat talk tables
//!
//! The language ID stored in a talk table only means something together with the game it
//! belongs to. Every game numbers its languages differently and stores strings in its own set
//! of encodings.

use aurora_encoding::Encoding;
use derive_more::derive::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Language ID of a talk table that isn't a talk table at all
pub const LANGUAGE_INVALID: u32 = 0xFFFF_FFFF;

#[derive(Display, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Language {
    English,
    French,
    German,
    Italian,
    Spanish,
    Polish,
    Russian,
    Czech,
    Hungarian,
    Korean,
    #[display("Chinese (Traditional)")]
    ChineseTraditional,
    #[display("Chinese (Simplified)")]
    ChineseSimplified,
    Japanese,
}

/// A language a game ships, with the ID and encoding its talk tables use
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub language: Language,
    pub id: u32,
    pub encoding: Encoding,
}

const fn declare(language: Language, id: u32, encoding: Encoding) -> Declaration {
    Declaration {
        language,
        id,
        encoding,
    }
}

#[rustfmt::skip]
const NEVERWINTER_NIGHTS: &[Declaration] = &[
    declare(Language::English,            0,   Encoding::Cp1252),
    declare(Language::French,             1,   Encoding::Cp1252),
    declare(Language::German,             2,   Encoding::Cp1252),
    declare(Language::Italian,            3,   Encoding::Cp1252),
    declare(Language::Spanish,            4,   Encoding::Cp1252),
    declare(Language::Polish,             5,   Encoding::Cp1250),
    declare(Language::Korean,             128, Encoding::Cp949),
    declare(Language::ChineseTraditional, 129, Encoding::Cp950),
    declare(Language::ChineseSimplified,  130, Encoding::Cp936),
    declare(Language::Japanese,           131, Encoding::Cp932),
];

#[rustfmt::skip]
const KNIGHTS_OF_THE_OLD_REPUBLIC: &[Declaration] = &[
    declare(Language::English, 0, Encoding::Cp1252),
    declare(Language::French,  1, Encoding::Cp1252),
    declare(Language::German,  2, Encoding::Cp1252),
    declare(Language::Italian, 3, Encoding::Cp1252),
    declare(Language::Spanish, 4, Encoding::Cp1252),
    declare(Language::Polish,  5, Encoding::Cp1250),
];

#[rustfmt::skip]
const THE_WITCHER: &[Declaration] = &[
    declare(Language::German,    1, Encoding::Utf8),
    declare(Language::French,    2, Encoding::Utf8),
    declare(Language::English,   3, Encoding::Utf8),
    declare(Language::Italian,   4, Encoding::Utf8),
    declare(Language::Polish,    5, Encoding::Utf8),
    declare(Language::Spanish,   6, Encoding::Utf8),
    declare(Language::Czech,     7, Encoding::Utf8),
    declare(Language::Hungarian, 8, Encoding::Utf8),
    declare(Language::Russian,   9, Encoding::Utf8),
];

#[rustfmt::skip]
const DRAGON_AGE: &[Declaration] = &[
    declare(Language::English,   0, Encoding::Utf16Le),
    declare(Language::French,    1, Encoding::Utf16Le),
    declare(Language::Russian,   2, Encoding::Utf16Le),
    declare(Language::Italian,   3, Encoding::Utf16Le),
    declare(Language::German,    4, Encoding::Utf16Le),
    declare(Language::Polish,    5, Encoding::Utf16Le),
    declare(Language::Spanish,   6, Encoding::Utf16Le),
    declare(Language::Czech,     7, Encoding::Utf16Le),
    declare(Language::Hungarian, 8, Encoding::Utf16Le),
];

/// Games using talk tables
#[derive(Display, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Game {
    #[default]
    #[display("Neverwinter Nights")]
    Nwn,
    #[display("Neverwinter Nights 2")]
    Nwn2,
    #[display("Star Wars: Knights of the Old Republic")]
    Kotor,
    #[display("Star Wars: Knights of the Old Republic II")]
    Kotor2,
    #[display("Jade Empire")]
    Jade,
    #[display("The Witcher")]
    Witcher,
    #[display("Dragon Age: Origins")]
    DragonAge,
    #[display("Dragon Age II")]
    DragonAge2,
}

impl Game {
    pub const ALL: [Game; 8] = [
        Game::Nwn,
        Game::Nwn2,
        Game::Kotor,
        Game::Kotor2,
        Game::Jade,
        Game::Witcher,
        Game::DragonAge,
        Game::DragonAge2,
    ];

    /// Every language this game knows
    pub const fn declarations(&self) -> &'static [Declaration] {
        match self {
            Game::Nwn | Game::Nwn2 => NEVERWINTER_NIGHTS,
            Game::Kotor | Game::Kotor2 | Game::Jade => KNIGHTS_OF_THE_OLD_REPUBLIC,
            Game::Witcher => THE_WITCHER,
            Game::DragonAge | Game::DragonAge2 => DRAGON_AGE,
        }
    }

    pub fn declaration(&self, id: u32) -> Option<&'static Declaration> {
        self.declarations().iter().find(|d| d.id == id)
    }

    /// The language with the ID `id`, `None` if the game doesn't have one
    pub fn language(&self, id: u32) -> Option<Language> {
        self.declaration(id).map(|d| d.language)
    }

    /// The ID this game stores `language` as
    pub fn language_id(&self, language: Language) -> Option<u32> {
        self.declarations()
            .iter()
            .find(|d| d.language == language)
            .map(|d| d.id)
    }

    /// The encoding strings of the language `id` are stored in
    pub fn encoding(&self, id: u32) -> Option<Encoding> {
        self.declaration(id).map(|d| d.encoding)
    }
}

#[cfg(test)]
mod test {
    use aurora_encoding::Encoding;
    use pretty_assertions::assert_eq;

    use crate::language::{Game, Language, LANGUAGE_INVALID};

    #[test]
    fn ids_round_trip() {
        for game in Game::ALL {
            for declaration in game.declarations() {
                assert_eq!(game.language(declaration.id), Some(declaration.language));
                assert_eq!(game.language_id(declaration.language), Some(declaration.id));
            }

            assert_eq!(game.language(LANGUAGE_INVALID), None);
        }
    }

    #[test]
    fn neverwinter_nights() {
        let game = Game::default();

        assert_eq!(game.language(2), Some(Language::German));
        assert_eq!(game.encoding(2), Some(Encoding::Cp1252));
        assert_eq!(game.encoding(5), Some(Encoding::Cp1250));
        assert_eq!(game.language(131), Some(Language::Japanese));
        assert_eq!(game.encoding(131), Some(Encoding::Cp932));
        assert_eq!(game.language(6), None);
    }

    #[test]
    fn ids_depend_on_the_game() {
        assert_eq!(Game::Nwn.language(3), Some(Language::Italian));
        assert_eq!(Game::Witcher.language(3), Some(Language::English));
        assert_eq!(Game::DragonAge.language(2), Some(Language::Russian));

        assert_eq!(Game::Kotor.language(128), None);
        assert_eq!(Game::Witcher.language_id(Language::Korean), None);
    }

    #[test]
    fn encodings_depend_on_the_game() {
        assert_eq!(Game::Nwn2.encoding(5), Some(Encoding::Cp1250));
        assert_eq!(Game::Witcher.encoding(5), Some(Encoding::Utf8));
        assert_eq!(Game::DragonAge2.encoding(5), Some(Encoding::Utf16Le));
        assert_eq!(Game::DragonAge.encoding(9), None);
    }

    #[test]
    fn display() {
        assert_eq!(Language::English.to_string(), "English");
        assert_eq!(Language::ChineseSimplified.to_string(), "Chinese (Simplified)");
        assert_eq!(Game::Witcher.to_string(), "The Witcher");
    }
}
