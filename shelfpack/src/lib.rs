//! Shelfpack is a small library for packing rectangles into rows of a
//! fixed-width canvas. It was built for `build-sprite-sheets`, which packs
//! animation frames into sprite sheets, and cares more about predictable
//! layouts than about squeezing out every last pixel.
//!
//! Packing is a single pass over the inputs in the order given: nothing is
//! rotated or reordered, so the same inputs always produce the same layout.
//!
//! ## Example
//! ```
//! use shelfpack::{InputItem, ShelfPacker};
//!
//! // First, transform the rectangles you want to pack into the InputItem
//! // type, remembering which ID belongs to which of your objects.
//! let my_items = &[
//!     InputItem::new((128, 64)),
//!     InputItem::new((64, 64)),
//!     InputItem::new((1, 300)),
//! ];
//!
//! // Construct a packer with the width of the canvas rows should fill.
//! let packer = ShelfPacker::new().max_width(512);
//!
//! // ShelfPacker::pack accepts anything that can turn into an iterator of
//! // InputItem or &InputItem.
//! let output = packer.pack(my_items);
//!
//! assert_eq!(output.items()[0].position(), (1, 1));
//! assert_eq!(output.size(), (197, 302));
//! ```

mod geometry;
mod id;
mod packer;
mod types;

pub use id::*;
pub use packer::*;
pub use types::*;
