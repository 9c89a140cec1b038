use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use triage_cell::normalize;

use crate::error::RetrievalError;
use crate::models::KnowledgeCollection;

/// Returns up to `k` text snippets from `collection` relevant to `query`.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, collection: &str, query: &str, k: usize) -> Result<Vec<String>, RetrievalError>;
}

struct Document {
    text: String,
    tokens: HashSet<String>,
}

impl Document {
    fn new(text: String) -> Self {
        let tokens = tokenize(&text);
        Self { text, tokens }
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    normalize(text)
        .split(' ')
        .filter(|token| token.chars().count() > 1)
        .map(String::from)
        .collect()
}

/// In-process knowledge base: one `*.txt` file per document, one
/// subdirectory per collection, ranked by normalized-token overlap.
#[derive(Default)]
pub struct KnowledgeBase {
    collections: HashMap<String, Vec<Document>>,
}

impl KnowledgeBase {
    /// Loads the `lab` and `daily` collections under `root`. Missing
    /// directories yield empty collections.
    pub fn load(root: &Path) -> Result<Self, RetrievalError> {
        let mut base = Self::default();
        for collection in [KnowledgeCollection::Lab, KnowledgeCollection::Daily] {
            let documents = read_documents(&root.join(collection.as_str()))?;
            info!(
                "Loaded {} documents into knowledge collection '{}'",
                documents.len(),
                collection.as_str()
            );
            base.insert(collection.as_str(), documents);
        }
        Ok(base)
    }

    pub fn insert(&mut self, collection: &str, documents: Vec<String>) {
        let entry = self.collections.entry(collection.to_string()).or_default();
        entry.extend(
            documents
                .into_iter()
                .filter(|text| !text.trim().is_empty())
                .map(|text| Document::new(text.trim().to_string())),
        );
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, Vec::len)
    }

    pub fn search(&self, collection: &str, query: &str, k: usize) -> Result<Vec<String>, RetrievalError> {
        let documents = self
            .collections
            .get(collection)
            .ok_or_else(|| RetrievalError::UnknownCollection(collection.to_string()))?;

        let query_tokens = tokenize(query);
        if query_tokens.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, usize)> = documents
            .iter()
            .enumerate()
            .map(|(index, doc)| (index, doc.tokens.intersection(&query_tokens).count()))
            .filter(|(_, score)| *score > 0)
            .collect();

        // Stable sort keeps file order among equal scores.
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        let snippets: Vec<String> = scored
            .into_iter()
            .take(k)
            .map(|(index, _)| documents[index].text.clone())
            .collect();

        debug!("Retrieved {} snippets from '{}'", snippets.len(), collection);
        Ok(snippets)
    }
}

fn read_documents(dir: &Path) -> Result<Vec<String>, RetrievalError> {
    if !dir.is_dir() {
        warn!("Knowledge directory {} not found, collection is empty", dir.display());
        return Ok(Vec::new());
    }

    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        match fs::read_to_string(&path) {
            Ok(text) if !text.trim().is_empty() => documents.push(text),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable knowledge file {}: {}", path.display(), e),
        }
    }
    Ok(documents)
}

#[async_trait]
impl Retriever for KnowledgeBase {
    async fn retrieve(&self, collection: &str, query: &str, k: usize) -> Result<Vec<String>, RetrievalError> {
        self.search(collection, query, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sample() -> KnowledgeBase {
        let mut base = KnowledgeBase::default();
        base.insert(
            "lab",
            vec![
                "Ferritin vücuttaki demir deposunu gösterir.".to_string(),
                "HbA1c son üç ayın ortalama kan şekerini yansıtır.".to_string(),
                "   ".to_string(),
                "Kan şekeri açlıkta ölçülür; kan testi sabah yapılır.".to_string(),
            ],
        );
        base
    }

    #[test]
    fn blank_documents_are_skipped() {
        assert_eq!(sample().len("lab"), 3);
    }

    #[test]
    fn ranks_by_token_overlap() {
        let hits = sample().search("lab", "Kan şekeri yüksek", 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].starts_with("Kan şekeri açlıkta"));
        assert!(hits[1].starts_with("HbA1c"));
    }

    #[test]
    fn respects_k_and_drops_unrelated_documents() {
        let hits = sample().search("lab", "ferritin", 3).unwrap();
        assert_eq!(hits, vec!["Ferritin vücuttaki demir deposunu gösterir.".to_string()]);
    }

    #[test]
    fn empty_query_returns_nothing() {
        assert!(sample().search("lab", "  ", 3).unwrap().is_empty());
    }

    #[test]
    fn unknown_collection_is_an_error() {
        assert_matches!(
            sample().search("radiology", "ferritin", 3),
            Err(RetrievalError::UnknownCollection(name)) if name == "radiology"
        );
    }

    #[test]
    fn load_reads_sorted_txt_files_and_tolerates_missing_dirs() {
        let root = tempfile::tempdir().unwrap();
        let lab = root.path().join("lab");
        fs::create_dir(&lab).unwrap();
        fs::write(lab.join("b.txt"), "Kolesterol değerleri").unwrap();
        fs::write(lab.join("a.txt"), "Kolesterol ve trigliserid").unwrap();
        fs::write(lab.join("notes.md"), "Kolesterol markdown").unwrap();
        fs::write(lab.join("empty.txt"), "\n").unwrap();

        let base = KnowledgeBase::load(root.path()).unwrap();

        assert_eq!(base.len("lab"), 2);
        assert_eq!(base.len("daily"), 0);
        let hits = base.search("lab", "kolesterol", 5).unwrap();
        assert_eq!(hits[0], "Kolesterol ve trigliserid");
    }
}
