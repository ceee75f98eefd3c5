use crate::error::LoadError;
use crate::index::{DocId, Document, IndexBuilder, IndexOptions, InvertedIndex, RawDocument};
use std::path::{Path, PathBuf};
use url::Url;

/// Where the published document collection comes from.
#[allow(async_fn_in_trait)]
pub trait IndexSource {
    async fn fetch(&self) -> Result<String, LoadError>;
}

/// Fetches the collection over HTTP, e.g. `https://example.com/api/search.json`.
pub struct HttpSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpSource {
    pub fn new(base: &str, index_path: &str) -> Result<Self, LoadError> {
        let url = Url::parse(base)?.join(index_path)?;
        Ok(Self { client: reqwest::Client::new(), url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl IndexSource for HttpSource {
    async fn fetch(&self) -> Result<String, LoadError> {
        let resp = self.client.get(self.url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }
        Ok(resp.text().await?)
    }
}

/// Reads the collection from a file on disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IndexSource for FileSource {
    async fn fetch(&self) -> Result<String, LoadError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

/// An already-available body.
pub struct StaticSource(pub String);

impl IndexSource for StaticSource {
    async fn fetch(&self) -> Result<String, LoadError> {
        Ok(self.0.clone())
    }
}

/// Documents together with the index built over them.
#[derive(Debug)]
pub struct LoadedIndex {
    docs: Vec<Document>,
    index: InvertedIndex,
}

impl LoadedIndex {
    pub fn build(raw: Vec<RawDocument>, options: IndexOptions) -> Self {
        let mut builder = IndexBuilder::new(options);
        let docs = raw
            .into_iter()
            .map(|r| {
                let id = builder.add(&r.title, &r.content);
                Document { id, title: r.title, content: r.content, url: r.url }
            })
            .collect();
        Self { docs, index: builder.build() }
    }

    pub fn docs(&self) -> &[Document] {
        &self.docs
    }

    pub fn doc(&self, id: DocId) -> Option<&Document> {
        self.docs.get(id as usize)
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }
}

pub fn parse_documents(body: &str) -> Result<Vec<RawDocument>, LoadError> {
    Ok(serde_json::from_str(body)?)
}

/// Fetch, parse and index the collection.
pub async fn load<S: IndexSource>(source: &S, options: IndexOptions) -> Result<LoadedIndex, LoadError> {
    let outcome = source.fetch().await.and_then(|body| parse_documents(&body));
    match outcome {
        Ok(raw) => {
            let loaded = LoadedIndex::build(raw, options);
            tracing::info!(num_docs = loaded.docs.len(), num_terms = loaded.index.num_terms(), "search data loaded");
            Ok(loaded)
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load search data");
            Err(err)
        }
    }
}
