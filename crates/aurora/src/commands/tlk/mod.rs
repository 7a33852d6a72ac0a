use clap::ValueEnum;

pub mod build;
pub mod dump;
pub mod language;

/// Game a talk table belongs to, picks how language IDs are read
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum Game {
    #[default]
    Nwn,
    Nwn2,
    Kotor,
    Kotor2,
    Jade,
    Witcher,
    #[value(name = "dragonage")]
    DragonAge,
    #[value(name = "dragonage2")]
    DragonAge2,
}

impl From<Game> for aurora_tlk::Game {
    fn from(value: Game) -> Self {
        match value {
            Game::Nwn => aurora_tlk::Game::Nwn,
            Game::Nwn2 => aurora_tlk::Game::Nwn2,
            Game::Kotor => aurora_tlk::Game::Kotor,
            Game::Kotor2 => aurora_tlk::Game::Kotor2,
            Game::Jade => aurora_tlk::Game::Jade,
            Game::Witcher => aurora_tlk::Game::Witcher,
            Game::DragonAge => aurora_tlk::Game::DragonAge,
            Game::DragonAge2 => aurora_tlk::Game::DragonAge2,
        }
    }
}

#[derive(clap::Subcommand)]
pub enum TlkCommands {
    /// Write the strings of a talk table as JSON
    Dump(dump::DumpArgs),
    /// Show the language of a flat talk table
    Language(language::LanguageArgs),
    /// Build a flat talk table from JSON
    Build(build::BuildArgs),
}

impl TlkCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            TlkCommands::Dump(dump) => dump.handle(),
            TlkCommands::Language(language) => language.handle(),
            TlkCommands::Build(build) => build.handle(),
        }
    }
}
