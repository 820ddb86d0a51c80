//! Finds the frame images inside a sheet folder and decodes them.

use std::{
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use fs_err as fs;
use thiserror::Error;
use walkdir::WalkDir;

use crate::{
    frame_name::parse_frame_name,
    image::{Image, ImageError},
};

/// A single decoded animation frame, tagged with the sequence it belongs to.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    pub sequence: String,
    pub number: u64,
    pub image: Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    /// One frame per file, named `<sequence>_<number>.png`.
    Png,

    /// A whole sequence in one file, named `<sequence>.gif`.
    Gif,
}

impl SourceKind {
    fn for_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();

        match extension.as_str() {
            "png" => Some(SourceKind::Png),
            "gif" => Some(SourceKind::Gif),
            _ => None,
        }
    }
}

/// Decodes every PNG and GIF directly inside `folder` into frames.
///
/// Files are visited in file name order, so frames that share a sequence and
/// number keep a predictable relative order. Anything that isn't a PNG or GIF
/// file is skipped.
pub(crate) fn collect_frames(folder: &Path) -> Result<Vec<Frame>, FrameSourceError> {
    let mut frames = Vec::new();

    let entries = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()));

    for entry in entries {
        let entry = entry.map_err(|source| FrameSourceError::Walk {
            path: folder.to_owned(),
            source,
        })?;

        let path = entry.path();

        let kind = match SourceKind::for_path(path) {
            Some(kind) if entry.file_type().is_file() => kind,
            _ => {
                log::debug!("Skipping {}", path.display());
                continue;
            }
        };

        match kind {
            SourceKind::Png => frames.push(read_png_frame(path)?),
            SourceKind::Gif => frames.extend(read_gif_frames(path)?),
        }
    }

    Ok(frames)
}

fn read_png_frame(path: &Path) -> Result<Frame, FrameSourceError> {
    let name = parse_frame_name(path).ok_or_else(|| FrameSourceError::FrameNumberMissing {
        path: path.to_owned(),
    })?;

    let file = BufReader::new(fs::File::open(path)?);
    let image = Image::decode_png(file).map_err(|source| FrameSourceError::Decode {
        path: path.to_owned(),
        source,
    })?;

    log::debug!(
        "Decoded {} as frame {} of '{}'",
        path.display(),
        name.number,
        name.sequence
    );

    Ok(Frame {
        sequence: name.sequence,
        number: name.number,
        image,
    })
}

fn read_gif_frames(path: &Path) -> Result<Vec<Frame>, FrameSourceError> {
    let sequence = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file = BufReader::new(fs::File::open(path)?);
    let images = Image::decode_gif_frames(file).map_err(|source| FrameSourceError::Decode {
        path: path.to_owned(),
        source,
    })?;

    log::debug!(
        "Decoded {} as {} frames of '{}'",
        path.display(),
        images.len(),
        sequence
    );

    let frames = images
        .into_iter()
        .enumerate()
        .map(|(index, image)| Frame {
            sequence: sequence.clone(),
            number: index as u64,
            image,
        })
        .collect();

    Ok(frames)
}

#[derive(Debug, Error)]
pub(crate) enum FrameSourceError {
    #[error("Could not decode {}", path.display())]
    Decode { path: PathBuf, source: ImageError },

    #[error(
        "No frame number in the name of {}; expected something like 'walk_0.png'",
        path.display()
    )]
    FrameNumberMissing { path: PathBuf },

    #[error("Could not list the contents of {}", path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error(transparent)]
    Io {
        #[from]
        source: io::Error,
    },
}
