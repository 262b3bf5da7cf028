/*!
 * Archive container types and the container service interface.
 *
 * The container format itself (EPUB-style zip handling, manifest parsing) is
 * an external collaborator; the pipeline only needs an ordered resource list
 * going in and a resource list to persist coming out.
 */

use crate::errors::ContainerError;

/// Encoding assumed when a resource declares none
pub const DEFAULT_ENCODING: &str = "utf-8";

/// One addressable document unit inside the source archive.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Stable identity within the archive (href or manifest id)
    pub id: String,

    /// Declared media type
    pub media_type: String,

    /// Declared text encoding, if any
    pub encoding: Option<String>,

    /// Raw resource bytes
    pub data: Vec<u8>,
}

impl Resource {
    /// Create a resource with no declared encoding
    pub fn new(id: impl Into<String>, media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            media_type: media_type.into(),
            encoding: None,
            data,
        }
    }

    /// Set the declared encoding
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Effective text encoding, defaulting to UTF-8
    pub fn encoding(&self) -> &str {
        self.encoding.as_deref().unwrap_or(DEFAULT_ENCODING)
    }

    /// Whether the declared media type denotes a translatable markup document
    pub fn is_markup(&self) -> bool {
        self.media_type.to_ascii_lowercase().contains("html")
    }
}

/// Interface to the archive container implementation.
///
/// `save` receives the full resource list, translated entries already swapped
/// in; resources the pipeline did not touch keep their original bytes.
pub trait ContainerService: Send {
    /// Ordered resource list of the open archive
    fn list_resources(&self) -> Vec<Resource>;

    /// Serialize and persist the archive from the given resource list
    fn save(&mut self, resources: &[Resource]) -> Result<Vec<u8>, ContainerError>;
}
