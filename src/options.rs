use std::{num::NonZeroU32, path::PathBuf};

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "build-sprite-sheets",
    about = "Packs folders of animation frames into sprite sheets"
)]
pub struct Options {
    /// Folder containing one subfolder per sheet. Each subfolder holds PNG
    /// frames named like `walk_0.png` and/or animated GIFs named like
    /// `walk.gif`.
    pub input: Option<PathBuf>,

    /// Folder to write one PNG per sheet into, along with sheets.json
    /// describing where every frame ended up. Created if it doesn't exist.
    pub output: Option<PathBuf>,

    /// The width in pixels that rows of frames are wrapped at.
    #[structopt(long, default_value = "1024")]
    pub max_width: NonZeroU32,

    /// Anything after the two folders is accepted and ignored.
    #[structopt(hidden = true)]
    pub extra: Vec<String>,
}

impl Options {
    /// Returns `None` unless both folders were given.
    pub fn into_build_options(self) -> Option<BuildOptions> {
        if !self.extra.is_empty() {
            log::warn!("Ignoring extra arguments: {}", self.extra.join(" "));
        }

        Some(BuildOptions {
            input: self.input?,
            output: self.output?,
            max_width: self.max_width,
        })
    }
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub max_width: NonZeroU32,
}
