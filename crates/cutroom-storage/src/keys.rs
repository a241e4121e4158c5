//! Storage key derivation.
//!
//! Temp keys: `tmp/uploads/{session_id}.part`, unique per session.
//! Permanent keys: `videos/{uuid}.{ext}`, collision-resistant and
//! independent of the client-supplied filename.

use uuid::Uuid;

/// Temp storage key for a chunked upload session.
pub fn temp_upload_key(session_id: Uuid) -> String {
    format!("tmp/uploads/{}.part", session_id)
}

/// Permanent storage key for a promoted asset.
pub fn asset_key(extension: &str) -> String {
    format!("videos/{}.{}", Uuid::new_v4(), extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_upload_key_format() {
        let id = Uuid::new_v4();
        let key = temp_upload_key(id);
        assert_eq!(key, format!("tmp/uploads/{}.part", id));
    }

    #[test]
    fn test_asset_keys_are_unique() {
        let a = asset_key("mp4");
        let b = asset_key("mp4");
        assert_ne!(a, b);
        assert!(a.starts_with("videos/"));
        assert!(a.ends_with(".mp4"));
    }
}
