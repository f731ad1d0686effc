//! World metadata file (`world.json`)

use std::fs;
use std::path::Path;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::world::world::WorldMeta;

const META_FILE: &str = "world.json";

/// Write world metadata as pretty-printed JSON into the world directory
pub fn save_world_meta(world_dir: impl AsRef<Path>, meta: &WorldMeta) -> Result<()> {
    let dir = world_dir.as_ref();
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(meta)
        .map_err(|e| Error::Persist(format!("failed to serialize world metadata: {}", e)))?;
    fs::write(dir.join(META_FILE), json)?;
    Ok(())
}

/// Read world metadata from the world directory
pub fn load_world_meta(world_dir: impl AsRef<Path>) -> Result<WorldMeta> {
    let path = world_dir.as_ref().join(META_FILE);
    let data = fs::read_to_string(&path)?;
    serde_json::from_str(&data)
        .map_err(|e| Error::Persist(format!("invalid world metadata {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::world::{GameMode, WorldSize};
    use tempfile::TempDir;

    #[test]
    fn test_meta_roundtrip() {
        let dir = TempDir::new().unwrap();
        let meta = WorldMeta::new(
            "island",
            GameMode::Survival,
            WorldSize {
                width: 512,
                height: 128,
                depth: 512,
            },
            42,
        );
        save_world_meta(dir.path(), &meta).unwrap();
        let loaded = load_world_meta(dir.path()).unwrap();
        assert_eq!(loaded, meta);
    }

    #[test]
    fn test_missing_meta_errors() {
        let dir = TempDir::new().unwrap();
        assert!(load_world_meta(dir.path()).is_err());
    }
}
