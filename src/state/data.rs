/// Shared data structures for the search state
///
/// These structs represent the data model that flows between
/// the search service and the UI layer.

/// Identifier assigned to an image by the search service
pub type ImageId = u64;

/// Represents a single search hit
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Unique id reported by the service
    pub id: ImageId,
    /// Small preview used in the gallery grid
    pub thumbnail_url: String,
    /// Large rendition shown in the overlay
    pub full_size_url: String,
    /// Comma separated tags, used as the description
    pub tags: String,
    /// Thumbnail dimensions when the service reports them
    pub thumbnail_size: Option<(u32, u32)>,
    /// Full-size dimensions when the service reports them
    pub full_size: Option<(u32, u32)>,
}

/// One page of results returned by the search service
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPage {
    /// Images on this page, in the order the service returned them
    pub images: Vec<Image>,
    /// Total number of hits the service is willing to serve for the query
    pub total_matches: usize,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn image(id: ImageId) -> Image {
        Image {
            id,
            thumbnail_url: format!("https://cdn.example/{id}_640.jpg"),
            full_size_url: format!("https://cdn.example/{id}_1280.jpg"),
            tags: format!("tag{id}, animal"),
            thumbnail_size: Some((640, 427)),
            full_size: None,
        }
    }

    /// Page holding images `ids` with the given reported total.
    pub fn page(ids: std::ops::Range<ImageId>, total_matches: usize) -> SearchPage {
        SearchPage {
            images: ids.map(image).collect(),
            total_matches,
        }
    }
}
