use std::{
    fs::File,
    io::{BufReader, BufWriter, Seek, Write},
    path::PathBuf,
};

use aurora_encoding::Encoding;
use aurora_tlk::{serde::Dump, AnyTalkTable, TalkTable, TlkTalkTable, LANGUAGE_INVALID};
use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use tracing::{info, warn};

use super::Game;

#[derive(Args)]
pub struct DumpArgs {
    /// An input talk table
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Encoding of the strings, guessed from the language of flat tables if not given
    #[arg(short, long)]
    encoding: Option<Encoding>,

    /// Game the talk table belongs to, used to guess the encoding
    #[arg(short, long, value_enum, default_value_t = Game::Nwn)]
    game: Game,

    /// A target JSON file, standard output if not given
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

/// Pick the encoding of a talk table with the language `language_id`
fn guess_encoding(game: aurora_tlk::Game, language_id: u32) -> Result<Encoding> {
    if language_id == LANGUAGE_INVALID {
        // GFF talk tables store UTF-16
        warn!("not a flat talk table, falling back to utf16le");
        return Ok(Encoding::Utf16Le);
    }

    let Some(declaration) = game.declaration(language_id) else {
        return Err(miette::miette!(
            help = "pass the encoding with --encoding",
            "unknown language {language_id} for {game}"
        ));
    };

    info!(
        "guessing {} from language {}",
        declaration.encoding, declaration.language
    );
    Ok(declaration.encoding)
}

impl DumpArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let mut reader = BufReader::new(f);

        let encoding = match self.encoding {
            Some(encoding) => encoding,
            None => {
                let language_id = TlkTalkTable::peek_language_id(&mut reader)?;
                reader.rewind().into_diagnostic()?;

                guess_encoding(self.game.into(), language_id)?
            }
        };

        let tlk = AnyTalkTable::read(reader, Some(encoding))?;
        info!("read {} strings", tlk.len());

        match &self.output {
            Some(path) => {
                let out = if !self.overwrite {
                    File::create_new(path)
                        .into_diagnostic()
                        .context(format!("creating {}", path.display()))?
                } else {
                    File::create(path)
                        .into_diagnostic()
                        .context(format!("creating {}", path.display()))?
                };

                let mut out = BufWriter::new(out);
                serde_json::to_writer_pretty(&mut out, &Dump(&tlk)).into_diagnostic()?;
                out.flush().into_diagnostic()?;
            }
            None => {
                let mut out = std::io::stdout().lock();
                serde_json::to_writer_pretty(&mut out, &Dump(&tlk)).into_diagnostic()?;
                writeln!(out).into_diagnostic()?;
            }
        }

        Ok(())
    }
}
