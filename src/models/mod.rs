mod media_entry;

pub use media_entry::{ExtractedMedia, MediaEntry, MediaType};
