// Training artifacts: bincode catalog and scaler plus a checksummed manifest
use anyhow::{anyhow, Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::{DateTime, Utc};
use homematch_core::{Catalog, Error, FeatureScaler, ResourceBundle};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const FORMAT_VERSION: u32 = 1;

pub const CATALOG_FILE: &str = "catalog.bin";
pub const SCALER_FILE: &str = "scaler.bin";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDigest {
    pub name: String,
    pub size: u64,
    pub sha256: String,
}

/// Describes one saved set of artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub rows: usize,
    pub artifacts: Vec<ArtifactDigest>,
}

impl Manifest {
    pub fn digest(&self, name: &str) -> Option<&ArtifactDigest> {
        self.artifacts.iter().find(|a| a.name == name)
    }
}

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exists(&self) -> bool {
        self.dir.join(MANIFEST_FILE).is_file()
    }

    /// Write the catalog, scaler and manifest. Each file is replaced
    /// atomically; the manifest is written last.
    pub fn save(&self, bundle: &ResourceBundle) -> Result<Manifest> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create artifact directory {:?}", self.dir))?;

        let catalog = bincode::serialize(bundle.catalog()).context("Failed to serialize catalog")?;
        let scaler = bincode::serialize(bundle.scaler()).context("Failed to serialize scaler")?;

        let artifacts = vec![
            self.write_artifact(CATALOG_FILE, &catalog)?,
            self.write_artifact(SCALER_FILE, &scaler)?,
        ];

        let manifest = Manifest {
            format_version: FORMAT_VERSION,
            created_at: Utc::now(),
            rows: bundle.catalog().len(),
            artifacts,
        };
        let json = serde_json::to_vec_pretty(&manifest)?;
        self.write_file(MANIFEST_FILE, &json)?;

        info!(
            "Saved artifacts for {} listings to {:?}",
            manifest.rows, self.dir
        );
        Ok(manifest)
    }

    pub fn manifest(&self) -> Result<Manifest> {
        let bytes = self.read_required(MANIFEST_FILE)?;
        let manifest: Manifest =
            serde_json::from_slice(&bytes)
                .map_err(Error::from)
                .context("Failed to parse artifact manifest")?;
        if manifest.format_version != FORMAT_VERSION {
            return Err(Error::Storage(format!(
                "unsupported artifact format version {} (expected {})",
                manifest.format_version, FORMAT_VERSION
            ))
            .into());
        }
        Ok(manifest)
    }

    /// Verify and load the artifacts, rebuilding the derived indexes
    pub fn load(&self) -> Result<ResourceBundle> {
        let manifest = self.manifest()?;

        let catalog_bytes = self.read_verified(&manifest, CATALOG_FILE)?;
        let scaler_bytes = self.read_verified(&manifest, SCALER_FILE)?;

        let catalog: Catalog = bincode::deserialize(&catalog_bytes)
            .map_err(|e| Error::Serialization(e.to_string()))
            .context("Failed to deserialize catalog")?;
        let scaler: FeatureScaler = bincode::deserialize(&scaler_bytes)
            .map_err(|e| Error::Serialization(e.to_string()))
            .context("Failed to deserialize scaler")?;

        if catalog.len() != manifest.rows {
            return Err(Error::Storage(format!(
                "manifest lists {} rows but catalog has {}",
                manifest.rows,
                catalog.len()
            ))
            .into());
        }

        let bundle = ResourceBundle::from_parts(catalog, scaler)?;
        info!(
            "Loaded artifacts for {} listings from {:?} (created {})",
            manifest.rows,
            self.dir,
            manifest.created_at.to_rfc3339()
        );
        Ok(bundle)
    }

    fn write_artifact(&self, name: &str, bytes: &[u8]) -> Result<ArtifactDigest> {
        self.write_file(name, bytes)?;
        debug!("Wrote {} ({} bytes)", name, bytes.len());
        Ok(ArtifactDigest {
            name: name.to_string(),
            size: bytes.len() as u64,
            sha256: checksum(bytes),
        })
    }

    fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.dir.join(name);
        AtomicFile::new(&path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(bytes))
            .with_context(|| format!("Failed to write {:?}", path))
    }

    fn read_required(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(Error::InsufficientData(format!("missing artifact {:?}", path)).into());
        }
        fs::read(&path)
            .map_err(Error::from)
            .with_context(|| format!("Failed to read {:?}", path))
    }

    fn read_verified(&self, manifest: &Manifest, name: &str) -> Result<Vec<u8>> {
        let expected = manifest
            .digest(name)
            .ok_or_else(|| anyhow!(Error::Storage(format!("manifest has no entry for {}", name))))?;
        let bytes = self.read_required(name)?;
        let actual = checksum(&bytes);
        if actual != expected.sha256 {
            return Err(Error::Storage(format!(
                "checksum mismatch for {}: expected {}, got {}",
                name, expected.sha256, actual
            ))
            .into());
        }
        Ok(bytes)
    }
}

fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use homematch_core::RawListing;
    use tempfile::tempdir;

    fn bundle() -> ResourceBundle {
        let rows: Vec<RawListing> = [("Austin", 300_000.0), ("Dallas", 250_000.0), ("Boston", 600_000.0)]
            .iter()
            .map(|(city, price)| RawListing {
                price: Some(*price),
                bed: Some(3.0),
                bath: Some(2.0),
                house_size: Some(1500.0),
                city: Some(city.to_string()),
                state: Some("Texas".to_string()),
            })
            .collect();
        ResourceBundle::fit(Catalog::from_raw(&rows).unwrap()).unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("artifacts"));
        assert!(!store.exists());

        let original = bundle();
        let manifest = store.save(&original).unwrap();
        assert_eq!(manifest.rows, 3);
        assert_eq!(manifest.artifacts.len(), 2);
        assert!(store.exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.catalog().listings(), original.catalog().listings());
        assert_eq!(loaded.scaler(), original.scaler());
        assert_eq!(loaded.normalized(1), original.normalized(1));
        assert_eq!(loaded.catalog().city_encoder().encode("Dallas"), Some(2));
    }

    #[test]
    fn test_missing_artifacts() {
        let dir = tempdir().unwrap();
        let err = ArtifactStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InsufficientData(_))
        ));
    }

    #[test]
    fn test_corrupt_manifest() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save(&bundle()).unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), b"{\"format_version\": 1,").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_checksum_mismatch() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save(&bundle()).unwrap();

        let path = dir.path().join(SCALER_FILE);
        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        fs::write(&path, bytes).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Storage(_))));
    }
}
