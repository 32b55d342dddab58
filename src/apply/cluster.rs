//! Cluster clients the applier writes to

use crate::resources::{ObjectKey, ResourceKind, TargetObject};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Object store keyed by (kind, name, namespace)
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Fails when the object already exists
    async fn create(&self, obj: &TargetObject) -> Result<()>;

    async fn get(&self, key: &ObjectKey) -> Result<Option<serde_json::Value>>;

    /// Fails when the object does not exist
    async fn update(&self, obj: &TargetObject) -> Result<()>;

    async fn delete(&self, key: &ObjectKey) -> Result<()>;

    async fn list(&self, kind: ResourceKind, namespace: &str) -> Result<Vec<ObjectKey>>;
}

/// In-memory cluster, mostly for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryCluster {
    objects: Mutex<BTreeMap<ObjectKey, serde_json::Value>>,
}

impl MemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.lock().await.is_empty()
    }
}

#[async_trait]
impl ClusterClient for MemoryCluster {
    async fn create(&self, obj: &TargetObject) -> Result<()> {
        let key = obj.key();
        let mut objects = self.objects.lock().await;
        if objects.contains_key(&key) {
            bail!("{} already exists", key);
        }
        objects.insert(key, serde_json::to_value(obj)?);
        Ok(())
    }

    async fn get(&self, key: &ObjectKey) -> Result<Option<serde_json::Value>> {
        Ok(self.objects.lock().await.get(key).cloned())
    }

    async fn update(&self, obj: &TargetObject) -> Result<()> {
        let key = obj.key();
        let mut objects = self.objects.lock().await;
        let slot = objects
            .get_mut(&key)
            .ok_or_else(|| anyhow!("{} not found", key))?;
        *slot = serde_json::to_value(obj)?;
        Ok(())
    }

    async fn delete(&self, key: &ObjectKey) -> Result<()> {
        self.objects
            .lock()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| anyhow!("{} not found", key))
    }

    async fn list(&self, kind: ResourceKind, namespace: &str) -> Result<Vec<ObjectKey>> {
        Ok(self
            .objects
            .lock()
            .await
            .keys()
            .filter(|k| k.kind == kind && k.namespace == namespace)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
struct DirectoryState {
    files: BTreeMap<ObjectKey, PathBuf>,
    next_sequence: usize,
}

/// Writes each created object to `NNNN-<kind>-<name>.yaml`.
///
/// The sequence prefix records creation order, so the directory can be
/// applied as-is by tools that process files alphabetically.
#[derive(Debug)]
pub struct DirectoryCluster {
    root: PathBuf,
    state: Mutex<DirectoryState>,
}

/// Identity of a manifest read back from disk
fn manifest_key(value: &serde_json::Value) -> Option<ObjectKey> {
    let kind = ResourceKind::from_kind_name(value.get("kind")?.as_str()?)?;
    let metadata = value.get("metadata")?;
    let name = metadata.get("name")?.as_str()?;
    let namespace = metadata
        .get("namespace")
        .and_then(|n| n.as_str())
        .unwrap_or_default();
    Some(ObjectKey::new(kind, name, namespace))
}

fn sequence_of(file_name: &str) -> Option<usize> {
    file_name.split('-').next()?.parse().ok()
}

impl DirectoryCluster {
    /// Open (creating if needed) a manifest directory, indexing what it holds
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("Failed to create {}", root.display()))?;

        let mut state = DirectoryState::default();
        let mut entries = tokio::fs::read_dir(&root)
            .await
            .with_context(|| format!("Failed to read {}", root.display()))?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let Some(key) = serde_yaml::from_str::<serde_json::Value>(&content)
                .ok()
                .as_ref()
                .and_then(manifest_key)
            else {
                tracing::debug!("Ignoring {}: not an object manifest", path.display());
                continue;
            };
            if let Some(seq) = sequence_of(&file_name) {
                state.next_sequence = state.next_sequence.max(seq + 1);
            }
            state.files.insert(key, path);
        }

        tracing::debug!(
            "Opened manifest directory {} with {} object(s)",
            root.display(),
            state.files.len()
        );
        Ok(Self {
            root,
            state: Mutex::new(state),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_name(sequence: usize, key: &ObjectKey) -> String {
        format!(
            "{:04}-{}-{}.yaml",
            sequence,
            key.kind.kind_name().to_lowercase(),
            key.name
        )
    }
}

#[async_trait]
impl ClusterClient for DirectoryCluster {
    async fn create(&self, obj: &TargetObject) -> Result<()> {
        let key = obj.key();
        let mut state = self.state.lock().await;
        if let Some(existing) = state.files.get(&key) {
            bail!("{} already exists in {}", key, existing.display());
        }

        let path = self.root.join(Self::file_name(state.next_sequence, &key));
        let content = serde_yaml::to_string(obj)?;
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::debug!("Wrote {} to {}", key, path.display());
        state.next_sequence += 1;
        state.files.insert(key, path);
        Ok(())
    }

    async fn get(&self, key: &ObjectKey) -> Result<Option<serde_json::Value>> {
        let state = self.state.lock().await;
        let Some(path) = state.files.get(key) else {
            return Ok(None);
        };
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(serde_yaml::from_str(&content)?))
    }

    async fn update(&self, obj: &TargetObject) -> Result<()> {
        let key = obj.key();
        let state = self.state.lock().await;
        let path = state
            .files
            .get(&key)
            .ok_or_else(|| anyhow!("{} not found", key))?;
        tokio::fs::write(path, serde_yaml::to_string(obj)?)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    async fn delete(&self, key: &ObjectKey) -> Result<()> {
        let mut state = self.state.lock().await;
        let path = state
            .files
            .remove(key)
            .ok_or_else(|| anyhow!("{} not found", key))?;
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("Failed to remove {}", path.display()))
    }

    async fn list(&self, kind: ResourceKind, namespace: &str) -> Result<Vec<ObjectKey>> {
        Ok(self
            .state
            .lock()
            .await
            .files
            .keys()
            .filter(|k| k.kind == kind && k.namespace == namespace)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::team::TeamSpec;
    use crate::resources::Resource;

    fn team(name: &str) -> TargetObject {
        TargetObject::Team(Resource::new(
            ResourceKind::Team,
            name,
            "default",
            "2.5.0",
            TeamSpec {
                name: name.into(),
                usernames: Vec::new(),
            },
        ))
    }

    #[tokio::test]
    async fn test_memory_cluster_rejects_duplicates() {
        let cluster = MemoryCluster::new();
        cluster.create(&team("ops")).await.unwrap();
        assert!(cluster.create(&team("ops")).await.is_err());

        let stored = cluster.get(&team("ops").key()).await.unwrap().unwrap();
        assert_eq!(stored["spec"]["name"], "ops");
        assert_eq!(cluster.list(ResourceKind::Team, "default").await.unwrap().len(), 1);

        cluster.delete(&team("ops").key()).await.unwrap();
        assert!(cluster.is_empty().await);
        assert!(cluster.update(&team("ops")).await.is_err());
    }

    #[tokio::test]
    async fn test_directory_cluster_sequences_files() {
        let dir = tempfile::tempdir().unwrap();
        let cluster = DirectoryCluster::open(dir.path()).await.unwrap();
        cluster.create(&team("ops")).await.unwrap();
        cluster.create(&team("dev")).await.unwrap();

        assert!(dir.path().join("0000-atlasteam-ops.yaml").exists());
        assert!(dir.path().join("0001-atlasteam-dev.yaml").exists());
        assert!(cluster.create(&team("ops")).await.is_err());

        let stored = cluster.get(&team("dev").key()).await.unwrap().unwrap();
        assert_eq!(stored["metadata"]["name"], "dev");
    }

    #[tokio::test]
    async fn test_directory_cluster_reopens_existing_tree() {
        let dir = tempfile::tempdir().unwrap();
        {
            let cluster = DirectoryCluster::open(dir.path()).await.unwrap();
            cluster.create(&team("ops")).await.unwrap();
        }

        let cluster = DirectoryCluster::open(dir.path()).await.unwrap();
        assert!(cluster.create(&team("ops")).await.is_err());
        cluster.create(&team("dev")).await.unwrap();
        assert!(dir.path().join("0001-atlasteam-dev.yaml").exists());
    }
}
