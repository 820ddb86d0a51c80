use std::fmt;

use shelfpack::{InputItem, ShelfPacker};
use thiserror::Error;

use crate::{
    image::{Image, ImageError},
    sequence::Sequence,
};

/// The rectangle a frame occupies within its sheet's image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct PlacedSequence {
    pub name: String,
    pub frames: Vec<Placement>,
}

/// One packed image along with where each frame of each sequence ended up.
pub(crate) struct Sheet {
    pub name: String,
    pub sequences: Vec<PlacedSequence>,
    pub image: Image,
}

impl Sheet {
    /// Packs every frame of `sequences`, in order, and draws them into a
    /// single image sized to fit exactly.
    ///
    /// Layout happens first and on its own, so the image can be allocated at
    /// its final size and every frame drawn exactly once.
    pub fn build(
        name: &str,
        sequences: Vec<Sequence>,
        packer: &ShelfPacker,
    ) -> Result<Self, SheetError> {
        let inputs: Vec<_> = sequences
            .iter()
            .flat_map(|sequence| &sequence.frames)
            .map(|frame| InputItem::new(frame.image.size()))
            .collect();

        let output = packer.pack(&inputs);
        let mut image = Image::try_new_empty_rgba8(output.size()).map_err(|source| {
            SheetError::CanvasTooLarge {
                sheet: name.to_owned(),
                source,
            }
        })?;

        log::trace!(
            "Sheet '{}' needs a {}x{} image for {} frames",
            name,
            output.size().0,
            output.size().1,
            inputs.len()
        );

        let mut packed = output.items().iter();
        let mut placed_sequences = Vec::with_capacity(sequences.len());

        for sequence in &sequences {
            let mut placements = Vec::with_capacity(sequence.frames.len());

            for (frame, item) in sequence.frames.iter().zip(packed.by_ref()) {
                image
                    .blit(&frame.image, item.position())
                    .map_err(|source| SheetError::CanvasOverflow {
                        sheet: name.to_owned(),
                        sequence: sequence.name.clone(),
                        number: frame.number,
                        source,
                    })?;

                let (x, y) = item.position();
                let (width, height) = item.size();
                placements.push(Placement {
                    x,
                    y,
                    width,
                    height,
                });
            }

            placed_sequences.push(PlacedSequence {
                name: sequence.name.clone(),
                frames: placements,
            });
        }

        Ok(Self {
            name: name.to_owned(),
            sequences: placed_sequences,
            image,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.sequences
            .iter()
            .map(|sequence| sequence.frames.len())
            .sum()
    }
}

impl fmt::Debug for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = String::new();
        for sequence in &self.sequences {
            lines.push_str(&format!("\t{}:\n", sequence.name));

            for frame in &sequence.frames {
                lines.push_str(&format!(
                    "\t\t({}, {}) ({}, {})\n",
                    frame.x, frame.y, frame.width, frame.height
                ));
            }
        }

        write!(
            f,
            "Sheet {}\nDimensions: ({}, {})\nSequences:\n{}",
            self.name,
            self.image.size().0,
            self.image.size().1,
            lines
        )
    }
}

#[derive(Debug, Error)]
pub(crate) enum SheetError {
    #[error("Frame {number} of sequence '{sequence}' does not fit inside sheet '{sheet}'")]
    CanvasOverflow {
        sheet: String,
        sequence: String,
        number: u64,
        source: ImageError,
    },

    #[error("The packed canvas for sheet '{sheet}' is too large")]
    CanvasTooLarge { sheet: String, source: ImageError },
}
