use std::{
    io::{self, BufWriter, Write},
    path::Path,
};

use fs_err as fs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sheet::{PlacedSequence, Placement, Sheet};

pub(crate) static SHEETS_FILENAME: &str = "sheets.json";

/// Describes every sheet produced by a run, contained in a sheets.json file
/// next to the sheet images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct SheetIndex {
    pub sheets: Vec<SheetRecord>,
}

impl SheetIndex {
    pub fn push(&mut self, record: SheetRecord) {
        self.sheets.push(record);
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn write_to_folder<P: AsRef<Path>>(&self, folder_path: P) -> Result<(), SheetIndexError> {
        let file_path = folder_path.as_ref().join(SHEETS_FILENAME);

        let mut file = BufWriter::new(fs::File::create(&file_path)?);
        serde_json::to_writer_pretty(&mut file, self)?;
        writeln!(file)?;
        file.flush()?;

        log::trace!("Saved sheet index to {}", file_path.display());

        Ok(())
    }
}

/// The portion of sheets.json describing one sheet image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SheetRecord {
    /// The name of the input folder, which is also the image's file stem.
    pub name: String,

    pub sequences: Vec<SequenceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SequenceRecord {
    pub name: String,

    /// Frame rectangles in playback order.
    pub frames: Vec<FrameRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FrameRecord {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<&Sheet> for SheetRecord {
    fn from(sheet: &Sheet) -> Self {
        SheetRecord {
            name: sheet.name.clone(),
            sequences: sheet.sequences.iter().map(SequenceRecord::from).collect(),
        }
    }
}

impl From<&PlacedSequence> for SequenceRecord {
    fn from(sequence: &PlacedSequence) -> Self {
        SequenceRecord {
            name: sequence.name.clone(),
            frames: sequence.frames.iter().map(FrameRecord::from).collect(),
        }
    }
}

impl From<&Placement> for FrameRecord {
    fn from(placement: &Placement) -> Self {
        FrameRecord {
            x: placement.x,
            y: placement.y,
            width: placement.width,
            height: placement.height,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum SheetIndexError {
    #[error(transparent)]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io {
        #[from]
        source: io::Error,
    },
}
