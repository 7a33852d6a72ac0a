use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};

use aurora_encoding::Encoding;
use aurora_tlk::{write::TlkWriterOptions, TalkTable, TlkTalkTable, TlkVersion};
use clap::{Args, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};
use tracing::info;

use super::Game;

#[derive(Clone, Copy, ValueEnum)]
enum Version {
    V3,
    V4,
}

impl From<Version> for TlkVersion {
    fn from(value: Version) -> Self {
        match value {
            Version::V3 => TlkVersion::V3,
            Version::V4 => TlkVersion::V4,
        }
    }
}

#[derive(Args)]
pub struct BuildArgs {
    /// A JSON file as written by `tlk dump`
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// The talk table to write
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Language ID stored in the header
    #[arg(short, long, default_value_t = 0)]
    language: u32,

    /// Encoding of the strings, derived from the language if not given
    #[arg(short, long)]
    encoding: Option<Encoding>,

    /// Game the talk table is for, used to derive the encoding
    #[arg(short, long, value_enum, default_value_t = Game::Nwn)]
    game: Game,

    /// Layout version to write
    #[arg(long, value_enum, default_value_t = Version::V3)]
    version: Version,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl BuildArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;

        let mut tlk: TlkTalkTable<std::io::Empty> = serde_json::from_reader(BufReader::new(f))
            .into_diagnostic()
            .context(format!("parsing {}", &self.file.display()))?;
        tlk.set_language_id(self.language);

        let game = aurora_tlk::Game::from(self.game);
        let encoding = self
            .encoding
            .or_else(|| game.encoding(self.language))
            .ok_or_else(|| {
                miette::miette!(
                    help = "pass the encoding with --encoding",
                    "unknown language {} for {game}",
                    self.language
                )
            })?;

        let out = if !self.overwrite {
            File::create_new(&self.output)
                .into_diagnostic()
                .context(format!("creating {}", &self.output.display()))?
        } else {
            File::create(&self.output)
                .into_diagnostic()
                .context(format!("creating {}", &self.output.display()))?
        };

        let options = TlkWriterOptions::builder()
            .version(self.version.into())
            .encoding(encoding)
            .build();

        info!(
            "writing {} strings to {}",
            tlk.len(),
            &self.output.display()
        );
        tlk.write(BufWriter::new(out), options)?
            .flush()
            .into_diagnostic()?;

        Ok(())
    }
}
