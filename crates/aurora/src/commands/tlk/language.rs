use std::{fs::File, path::PathBuf};

use aurora_tlk::{TlkTalkTable, LANGUAGE_INVALID};
use clap::Args;
use miette::{Context, IntoDiagnostic, Result};

use super::Game;

#[derive(Args)]
pub struct LanguageArgs {
    /// An input talk table
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Game the talk table belongs to
    #[arg(short, long, value_enum, default_value_t = Game::Nwn)]
    game: Game,
}

impl LanguageArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;

        match TlkTalkTable::peek_language_id(f)? {
            LANGUAGE_INVALID => println!("not a flat talk table"),
            id => match aurora_tlk::Game::from(self.game).declaration(id) {
                Some(declaration) => {
                    println!("{id}: {} ({})", declaration.language, declaration.encoding)
                }
                None => println!("{id}: unknown"),
            },
        }

        Ok(())
    }
}
