use super::data::{Image, ImageId};

/// Running list of images fetched for the active query.
///
/// Pure bookkeeping: arrival order is preserved and nothing is
/// deduplicated here. Uniqueness of ids comes from requesting each
/// page exactly once.
#[derive(Debug, Default, Clone)]
pub struct ResultAccumulator {
    images: Vec<Image>,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every accumulated image
    pub fn reset(&mut self) {
        self.images.clear();
    }

    /// Append a page of images to the end
    pub fn append(&mut self, images: impl IntoIterator<Item = Image>) {
        self.images.extend(images);
    }

    pub fn count(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn as_slice(&self) -> &[Image] {
        &self.images
    }

    /// Look up an accumulated image by id
    pub fn get(&self, id: ImageId) -> Option<&Image> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.get(id).is_some()
    }
}
