use crate::raster::surface::Surface;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Stable index of an image slot in a sprite's [`Stock`].
pub struct ImageIndex(pub(crate) usize);

impl ImageIndex {
    /// Construct an [`ImageIndex`] from a raw slot number.
    pub fn from_usize(raw: usize) -> Self {
        Self(raw)
    }

    /// Access the raw slot number.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Indexed pool of shared pixel images.
///
/// The stock exclusively owns every stored image; cels reference slots by
/// [`ImageIndex`], and several cels (even across layers) may share one slot.
/// Slots are never renumbered: removal vacates a slot in place so that undo
/// replay can restore an image at exactly the index it was removed from.
pub struct Stock {
    slots: Vec<Option<Surface>>,
}

impl Stock {
    /// An empty stock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots ever allocated, vacated ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no slot has ever been allocated.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The index the next [`Stock::insert`] will return.
    pub fn next_index(&self) -> ImageIndex {
        ImageIndex(self.slots.len())
    }

    /// True when `index` names a live (non-vacated) slot.
    pub fn is_live(&self, index: ImageIndex) -> bool {
        matches!(self.slots.get(index.0), Some(Some(_)))
    }

    /// Indices of all live slots, in slot order.
    pub fn live_indices(&self) -> Vec<ImageIndex> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| ImageIndex(i))
            .collect()
    }

    /// Append an image and return its slot index.
    pub fn insert(&mut self, surface: Surface) -> ImageIndex {
        self.slots.push(Some(surface));
        ImageIndex(self.slots.len() - 1)
    }

    /// Remove the image at a live slot, leaving the slot vacant. Trailing
    /// vacant slots are trimmed so that undoing an append restores the exact
    /// prior pool shape.
    pub fn remove(&mut self, index: ImageIndex) -> Surface {
        let surface = self
            .slots
            .get_mut(index.0)
            .and_then(Option::take)
            .unwrap_or_else(|| panic!("stock slot {} is not live", index.0));
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        surface
    }

    /// Re-fill a vacant slot (extending the pool if the slot is past the
    /// end). The slot must not be live.
    pub fn restore(&mut self, index: ImageIndex, surface: Surface) {
        if index.0 >= self.slots.len() {
            self.slots.resize_with(index.0 + 1, || None);
        }
        let slot = &mut self.slots[index.0];
        assert!(slot.is_none(), "stock slot {} is already live", index.0);
        *slot = Some(surface);
    }

    /// Swap the image at a live slot, returning the previous image.
    pub fn replace(&mut self, index: ImageIndex, surface: Surface) -> Surface {
        let slot = self
            .slots
            .get_mut(index.0)
            .unwrap_or_else(|| panic!("stock slot {} does not exist", index.0));
        assert!(slot.is_some(), "stock slot {} is not live", index.0);
        slot.replace(surface).unwrap_or_else(|| unreachable!())
    }

    /// Image at a live slot.
    pub fn get(&self, index: ImageIndex) -> &Surface {
        self.try_get(index)
            .unwrap_or_else(|| panic!("stock slot {} is not live", index.0))
    }

    /// Mutable image at a live slot.
    pub fn get_mut(&mut self, index: ImageIndex) -> &mut Surface {
        self.slots
            .get_mut(index.0)
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("stock slot {} is not live", index.0))
    }

    /// Image at `index`, or `None` for vacant/unknown slots.
    pub fn try_get(&self, index: ImageIndex) -> Option<&Surface> {
        self.slots.get(index.0).and_then(Option::as_ref)
    }
}
