use std::{collections::BTreeMap, path::Path, sync::Arc};

use log::{debug, info, warn};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use strum::{AsRefStr, EnumIter};
use tokio::sync::RwLock;
use uuid::Uuid;

use mundofit_domain as domain;

type Document = Map<String, Value>;
type Collections = BTreeMap<String, BTreeMap<String, Document>>;

/// In-process store of JSON documents, grouped into collections and keyed by document id.
///
/// The id is not part of the stored fields. It is added to a document when it is read and
/// removed again when it is written, so records carry their id like any other field.
#[derive(Clone, Default)]
pub struct DocumentStore {
    collections: Arc<RwLock<Collections>>,
}

impl DocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a snapshot written by [`DocumentStore::save`]. A missing file yields an empty store.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let content = match tokio::fs::read(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("no snapshot at {}, starting with empty store", path.display());
                return Ok(Self::new());
            }
            Err(err) => return Err(err.into()),
        };
        let collections: Collections = serde_json::from_slice(&content)?;
        info!(
            "loaded {} documents from {}",
            collections.values().map(BTreeMap::len).sum::<usize>(),
            path.display()
        );
        Ok(Self {
            collections: Arc::new(RwLock::new(collections)),
        })
    }

    pub async fn save(&self, path: &Path) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(&*self.collections.read().await)?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, path).await?;
        info!("saved snapshot to {}", path.display());
        Ok(())
    }

    #[must_use]
    pub fn new_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(collection.as_ref())
            .map_or(0, BTreeMap::len)
    }

    pub async fn get<R, V>(&self, collection: Collection, id: &str) -> Result<R, StoreError>
    where
        R: TryFrom<V>,
        V: DeserializeOwned,
        <R as TryFrom<V>>::Error: std::error::Error + Send + Sync + 'static,
    {
        let document = self
            .collections
            .read()
            .await
            .get(collection.as_ref())
            .and_then(|documents| documents.get(id))
            .cloned()
            .ok_or(StoreError::NotFound)?;
        decode(id, document)
    }

    /// All documents of a collection, ordered by id.
    pub async fn get_all<R, V>(&self, collection: Collection) -> Result<Vec<R>, StoreError>
    where
        R: TryFrom<V>,
        V: DeserializeOwned,
        <R as TryFrom<V>>::Error: std::error::Error + Send + Sync + 'static,
    {
        let documents = self
            .collections
            .read()
            .await
            .get(collection.as_ref())
            .cloned()
            .unwrap_or_default();
        documents
            .into_iter()
            .map(|(id, document)| decode(&id, document))
            .collect()
    }

    /// Like [`DocumentStore::get_all`], but documents that cannot be decoded are skipped.
    pub async fn get_all_valid<R, V>(&self, collection: Collection) -> Vec<R>
    where
        R: TryFrom<V>,
        V: DeserializeOwned,
        <R as TryFrom<V>>::Error: std::error::Error + Send + Sync + 'static,
    {
        let documents = self
            .collections
            .read()
            .await
            .get(collection.as_ref())
            .cloned()
            .unwrap_or_default();
        documents
            .into_iter()
            .filter_map(|(id, document)| match decode(&id, document) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!("skipping document {id} in {}: {err}", collection.as_ref());
                    None
                }
            })
            .collect()
    }

    /// Inserts a new document. Fails if a document with the same id exists.
    pub async fn add<V: Serialize, R>(
        &self,
        collection: Collection,
        value: V,
        result: R,
    ) -> Result<R, StoreError> {
        let (id, document) = encode(value)?;
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.as_ref().to_string()).or_default();
        if documents.contains_key(&id) {
            return Err(StoreError::Exists(id));
        }
        debug!("adding document {id} to {}", collection.as_ref());
        documents.insert(id, document);
        Ok(result)
    }

    /// Inserts or overwrites a document.
    pub async fn put<V: Serialize, R>(
        &self,
        collection: Collection,
        value: V,
        result: R,
    ) -> Result<R, StoreError> {
        let (id, document) = encode(value)?;
        debug!("putting document {id} into {}", collection.as_ref());
        self.collections
            .write()
            .await
            .entry(collection.as_ref().to_string())
            .or_default()
            .insert(id, document);
        Ok(result)
    }

    /// Overwrites an existing document. Fails if there is none.
    pub async fn replace<V: Serialize, R>(
        &self,
        collection: Collection,
        value: V,
        result: R,
    ) -> Result<R, StoreError> {
        let (id, document) = encode(value)?;
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection.as_ref())
            .and_then(|documents| documents.get_mut(&id))
            .ok_or(StoreError::NotFound)?;
        debug!("replacing document {id} in {}", collection.as_ref());
        *existing = document;
        Ok(result)
    }

    /// Deleting a missing document is not an error.
    pub async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        if let Some(documents) = self.collections.write().await.get_mut(collection.as_ref()) {
            if documents.remove(id).is_some() {
                debug!("deleted document {id} from {}", collection.as_ref());
            }
        }
        Ok(())
    }
}

fn decode<R, V>(id: &str, mut document: Document) -> Result<R, StoreError>
where
    R: TryFrom<V>,
    V: DeserializeOwned,
    <R as TryFrom<V>>::Error: std::error::Error + Send + Sync + 'static,
{
    document.insert("id".to_string(), Value::String(id.to_string()));
    let value: V = serde_json::from_value(Value::Object(document))?;
    R::try_from(value).map_err(|err| StoreError::InvalidDocument(id.to_string(), Box::new(err)))
}

fn encode<V: Serialize>(value: V) -> Result<(String, Document), StoreError> {
    let Value::Object(mut document) = serde_json::to_value(value)? else {
        return Err(StoreError::MissingId);
    };
    match document.remove("id") {
        Some(Value::String(id)) if !id.is_empty() => Ok((id, document)),
        _ => Err(StoreError::MissingId),
    }
}

#[derive(AsRefStr, EnumIter, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    #[strum(serialize = "alunos")]
    Students,
    #[strum(serialize = "professores")]
    Instructors,
    #[strum(serialize = "exercicios")]
    Exercises,
    #[strum(serialize = "treinos")]
    Workouts,
    #[strum(serialize = "historicos")]
    History,
    #[strum(serialize = "codigosRecuperacao")]
    RecoveryCodes,
    #[strum(serialize = "recomendacoes")]
    Recommendations,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,
    #[error("document {0} already exists")]
    Exists(String),
    #[error("document has no id")]
    MissingId,
    #[error("invalid document {0}: {1}")]
    InvalidDocument(String, domain::BoxError),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for domain::StorageError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::InvalidDocument(..) | StoreError::Serialization(_) => {
                domain::StorageError::Corrupt(value.to_string())
            }
            _ => domain::StorageError::Other(Box::new(value)),
        }
    }
}

impl From<StoreError> for domain::ReadError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => domain::ReadError::NotFound,
            _ => domain::ReadError::Storage(value.into()),
        }
    }
}

impl From<StoreError> for domain::CreateError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Exists(id) => domain::CreateError::Conflict(id),
            _ => domain::CreateError::Storage(value.into()),
        }
    }
}

impl From<StoreError> for domain::UpdateError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => domain::UpdateError::NotFound,
            _ => domain::UpdateError::Storage(value.into()),
        }
    }
}

impl From<StoreError> for domain::DeleteError {
    fn from(value: StoreError) -> Self {
        domain::DeleteError::Storage(value.into())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;

    #[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
    struct Note {
        id: String,
        texto: String,
    }

    #[derive(Debug, PartialEq)]
    struct Text(String);

    impl TryFrom<Note> for Text {
        type Error = std::num::ParseIntError;

        fn try_from(value: Note) -> Result<Self, Self::Error> {
            value.texto.parse::<u32>()?;
            Ok(Self(value.texto))
        }
    }

    fn note(id: &str, texto: &str) -> Note {
        Note {
            id: id.to_string(),
            texto: texto.to_string(),
        }
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(
            Collection::iter()
                .map(|c| c.as_ref().to_string())
                .collect::<Vec<_>>(),
            vec![
                "alunos",
                "professores",
                "exercicios",
                "treinos",
                "historicos",
                "codigosRecuperacao",
                "recomendacoes",
            ]
        );
    }

    #[tokio::test]
    async fn test_add_get_replace_delete() {
        let store = DocumentStore::new();

        store
            .add(Collection::Exercises, note("b", "2"), ())
            .await
            .unwrap();
        store
            .add(Collection::Exercises, note("a", "1"), ())
            .await
            .unwrap();

        assert_eq!(
            store.get::<Note, Note>(Collection::Exercises, "a").await.unwrap(),
            note("a", "1")
        );
        assert_eq!(
            store
                .get_all::<Note, Note>(Collection::Exercises)
                .await
                .unwrap(),
            vec![note("a", "1"), note("b", "2")]
        );
        assert!(matches!(
            store.add(Collection::Exercises, note("a", "3"), ()).await,
            Err(StoreError::Exists(id)) if id == "a"
        ));

        store
            .replace(Collection::Exercises, note("a", "3"), ())
            .await
            .unwrap();
        assert_eq!(
            store.get::<Note, Note>(Collection::Exercises, "a").await.unwrap(),
            note("a", "3")
        );
        assert!(matches!(
            store.replace(Collection::Exercises, note("c", "1"), ()).await,
            Err(StoreError::NotFound)
        ));

        store.delete(Collection::Exercises, "a").await.unwrap();
        store.delete(Collection::Exercises, "a").await.unwrap();
        assert!(matches!(
            store.get::<Note, Note>(Collection::Exercises, "a").await,
            Err(StoreError::NotFound)
        ));
        assert_eq!(store.count(Collection::Exercises).await, 1);
        assert_eq!(store.count(Collection::Workouts).await, 0);
    }

    #[tokio::test]
    async fn test_collections_are_separate() {
        let store = DocumentStore::new();

        store.put(Collection::Students, note("x", "1"), ()).await.unwrap();

        assert!(
            store
                .get_all::<Note, Note>(Collection::Instructors)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(matches!(
            store.get::<Note, Note>(Collection::Instructors, "x").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = DocumentStore::new();

        store.put(Collection::RecoveryCodes, note("k", "1"), ()).await.unwrap();
        store.put(Collection::RecoveryCodes, note("k", "2"), ()).await.unwrap();

        assert_eq!(
            store
                .get_all::<Note, Note>(Collection::RecoveryCodes)
                .await
                .unwrap(),
            vec![note("k", "2")]
        );
    }

    #[tokio::test]
    async fn test_missing_id() {
        let store = DocumentStore::new();

        assert!(matches!(
            store.add(Collection::Exercises, note("", "1"), ()).await,
            Err(StoreError::MissingId)
        ));
        assert!(matches!(
            store.add(Collection::Exercises, json!({"texto": "1"}), ()).await,
            Err(StoreError::MissingId)
        ));
    }

    #[tokio::test]
    async fn test_invalid_document() {
        let store = DocumentStore::new();
        store.add(Collection::Exercises, note("a", "x"), ()).await.unwrap();

        assert!(matches!(
            store.get::<Text, Note>(Collection::Exercises, "a").await,
            Err(StoreError::InvalidDocument(id, _)) if id == "a"
        ));
        assert!(matches!(
            domain::ReadError::from(
                store
                    .get::<Text, Note>(Collection::Exercises, "a")
                    .await
                    .unwrap_err()
            ),
            domain::ReadError::Storage(domain::StorageError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn test_get_all_valid_skips_invalid_documents() {
        let store = DocumentStore::new();
        store.add(Collection::Exercises, note("a", "1"), ()).await.unwrap();
        store.add(Collection::Exercises, note("b", "x"), ()).await.unwrap();
        store
            .add(Collection::Exercises, json!({"id": "c", "texto": 3}), ())
            .await
            .unwrap();

        assert!(
            store
                .get_all::<Text, Note>(Collection::Exercises)
                .await
                .is_err()
        );
        assert_eq!(
            store.get_all_valid::<Text, Note>(Collection::Exercises).await,
            vec![Text("1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mundofit.json");
        let store = DocumentStore::new();
        store.add(Collection::Students, note("a", "1"), ()).await.unwrap();
        store.add(Collection::Workouts, note("b", "2"), ()).await.unwrap();

        store.save(&path).await.unwrap();
        let loaded = DocumentStore::load(&path).await.unwrap();

        assert_eq!(
            loaded.get::<Note, Note>(Collection::Students, "a").await.unwrap(),
            note("a", "1")
        );
        assert_eq!(
            loaded.get::<Note, Note>(Collection::Workouts, "b").await.unwrap(),
            note("b", "2")
        );
        let snapshot: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(snapshot["alunos"]["a"], json!({"texto": "1"}));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let store = DocumentStore::load(&dir.path().join("missing.json"))
            .await
            .unwrap();

        assert_eq!(store.count(Collection::Students).await, 0);
    }

    #[test]
    fn test_new_id() {
        let id = DocumentStore::new_id();
        assert_eq!(id.len(), 32);
        assert_ne!(id, DocumentStore::new_id());
    }
}
