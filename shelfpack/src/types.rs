use crate::{geometry::Rect, id::Id};

/// An input to the shelf packer.
///
/// `InputItem` is just a 2D size and a generated unique identifier. Consumers
/// are expected to remember which of their own objects each ID belongs to and
/// use it to associate the packing results back to them.
#[derive(Debug, Clone, Copy)]
pub struct InputItem {
    pub(crate) id: Id,
    pub(crate) size: (u32, u32),
}

impl InputItem {
    #[inline]
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            id: Id::new(),
            size,
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }
}

/// An item that was placed by the packer.
///
/// `OutputItem` corresponds 1:1 to the `InputItem` values that were passed
/// into the packer, in the same order. It exposes the ID from the input as
/// well as the assigned position and the (unchanged) size.
#[derive(Debug, Clone, Copy)]
pub struct OutputItem {
    pub(crate) id: Id,
    pub(crate) rect: Rect,
}

impl OutputItem {
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn position(&self) -> (u32, u32) {
        self.rect.pos
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.rect.size
    }

    #[inline]
    pub fn min(&self) -> (u32, u32) {
        self.rect.pos
    }

    #[inline]
    pub fn max(&self) -> (u32, u32) {
        self.rect.max()
    }

    /// Whether this item shares any pixel with `other`.
    #[inline]
    pub fn overlaps(&self, other: &OutputItem) -> bool {
        self.rect.intersects(&other.rect)
    }
}

/// The results from running the packer.
#[derive(Debug, Clone)]
pub struct PackOutput {
    pub(crate) size: (u32, u32),
    pub(crate) items: Vec<OutputItem>,
}

impl PackOutput {
    /// The tight bounding size of everything that was placed, including the
    /// one pixel gap trailing the last column and row. This is the size the
    /// final canvas needs to be.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Placed items, in the order they were given to the packer.
    #[inline]
    pub fn items(&self) -> &[OutputItem] {
        &self.items
    }

    #[inline]
    pub fn into_items(self) -> Vec<OutputItem> {
        self.items
    }
}
