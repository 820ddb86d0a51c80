use std::borrow::Borrow;

use crate::{
    geometry::Rect,
    types::{InputItem, OutputItem, PackOutput},
};

/// Width of the canvas the packer lays rows out in when none is configured.
pub const DEFAULT_MAX_WIDTH: u32 = 1024;

/// Packs rectangles left-to-right into rows ("shelves") of a fixed-width
/// canvas, wrapping to a new row whenever the next rectangle would cross the
/// right edge.
///
/// Items are placed strictly in the order they're given; the packer never
/// reorders them to find a tighter fit. Every item is followed by a one pixel
/// gap horizontally, and every row by a one pixel gap vertically. The very
/// first row starts one pixel in from the top-left corner, while later rows
/// start at the left edge.
#[derive(Debug, Clone, Copy)]
pub struct ShelfPacker {
    max_width: u32,
}

impl Default for ShelfPacker {
    fn default() -> Self {
        Self::new()
    }
}

impl ShelfPacker {
    pub fn new() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
        }
    }

    pub fn max_width(self, max_width: u32) -> Self {
        Self { max_width }
    }

    pub fn pack<I>(&self, items: I) -> PackOutput
    where
        I: IntoIterator,
        I::Item: Borrow<InputItem>,
    {
        let mut shelf = Shelf::new();

        let items: Vec<OutputItem> = items
            .into_iter()
            .map(|item| {
                let item = item.borrow();
                let rect = shelf.place(item.size, self.max_width);

                log::trace!(
                    "Placed item {:?} ({}x{}) at {:?}",
                    item.id,
                    item.size.0,
                    item.size.1,
                    rect.pos
                );

                OutputItem { id: item.id, rect }
            })
            .collect();

        log::trace!(
            "Packed {} items into {}x{}",
            items.len(),
            shelf.max_x,
            shelf.max_y
        );

        PackOutput {
            size: (shelf.max_x, shelf.max_y),
            items,
        }
    }
}

/// Cursor state threaded through a single packing pass.
#[derive(Debug, Clone, Copy)]
struct Shelf {
    x: u32,
    y: u32,
    row_height: u32,

    /// Nothing has been placed in the current row yet. Only true before the
    /// first item, since the item that opens a new row is always placed in it.
    row_empty: bool,

    max_x: u32,
    max_y: u32,
}

impl Shelf {
    fn new() -> Self {
        Self {
            x: 1,
            y: 1,
            row_height: 0,
            row_empty: true,
            max_x: 0,
            max_y: 0,
        }
    }

    fn place(&mut self, size: (u32, u32), max_width: u32) -> Rect {
        let (width, height) = size;

        // An item too wide for the canvas has nowhere better to go than an
        // empty row, so it stays where it is and overhangs the right edge.
        if self.x + width + 1 > max_width && !self.row_empty {
            log::trace!("Starting new row below y = {}", self.y);

            self.x = 0;
            self.y += self.row_height + 1;
            self.row_height = height;
        } else {
            self.row_height = self.row_height.max(height);
        }

        let rect = Rect {
            pos: (self.x, self.y),
            size,
        };

        self.row_empty = false;
        self.x += width + 1;
        self.max_x = self.max_x.max(self.x);
        self.max_y = self.max_y.max(self.y + self.row_height + 1);

        rect
    }
}
