//! Photo upload helpers: content-type to extension mapping and disk writes
//! under the configured upload directory.

use std::path::Path;
use uuid::Uuid;

use crate::config;

pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Write the photo bytes and return the stored filename.
pub async fn save_photo(
    bootcamp_id: Uuid,
    extension: &str,
    bytes: &[u8],
) -> std::io::Result<String> {
    let dir = &config::config().uploads.dir;
    tokio::fs::create_dir_all(dir).await?;

    let filename = format!("photo_{}.{}", bootcamp_id, extension);
    tokio::fs::write(Path::new(dir).join(&filename), bytes).await?;
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_image_types_map_to_extensions() {
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("image/png"), Some("png"));
    }

    #[test]
    fn non_image_types_are_rejected() {
        assert_eq!(extension_for("application/pdf"), None);
        assert_eq!(extension_for("text/html"), None);
    }
}
