pub mod artifacts;
pub mod dataset;

pub use artifacts::{ArtifactDigest, ArtifactStore, Manifest, CATALOG_FILE, MANIFEST_FILE, SCALER_FILE};
pub use dataset::{load_dataset, parse_dataset};
