use crate::tokenizer::terms;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub type TermId = u32;
pub type DocId = u32;

/// One entry of the collection as published in `search.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDocument {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub url: String,
}

/// A loaded document. `id` is its position in the fetched collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub content: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Content,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Title, Field::Content];
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    pub title_boost: f32,
    pub content_boost: f32,
    /// Use smoothed IDF = ln(1 + N/df) instead of ln(N/df)
    pub smoothed_idf: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self { title_boost: 1.0, content_boost: 1.0, smoothed_idf: true }
    }
}

impl IndexOptions {
    fn boost(&self, field: Field) -> f32 {
        match field {
            Field::Title => self.title_boost,
            Field::Content => self.content_boost,
        }
    }

    fn idf(&self, num_docs: u32, df: u32) -> f32 {
        let ratio = num_docs.max(1) as f32 / df.max(1) as f32;
        if self.smoothed_idf { (1.0 + ratio).ln() } else { ratio.ln() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub field: Field,
    pub weight: f32, // normalized tf-idf weight within (doc, field)
}

/// A ranked reference back into the document collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub doc_id: DocId,
    pub score: f32,
}

#[derive(Debug, Default)]
pub struct InvertedIndex {
    dictionary: HashMap<String, TermId>,
    df: Vec<u32>,
    postings: HashMap<TermId, Vec<Posting>>, // postings sorted by doc_id
    num_docs: u32,
    options: IndexOptions,
}

impl InvertedIndex {
    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }

    pub fn num_terms(&self) -> usize {
        self.dictionary.len()
    }

    pub fn postings(&self, term: &str) -> &[Posting] {
        self.dictionary
            .get(term)
            .and_then(|tid| self.postings.get(tid))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rank documents for a free-text query by cosine similarity summed over fields.
    pub fn query(&self, text: &str) -> Vec<Hit> {
        let mut tf_q_raw: HashMap<TermId, u32> = HashMap::new();
        for term in terms(text) {
            if let Some(&tid) = self.dictionary.get(&term) {
                *tf_q_raw.entry(tid).or_insert(0) += 1;
            }
        }
        if tf_q_raw.is_empty() {
            return Vec::new();
        }

        let mut q_weights: HashMap<TermId, f32> = tf_q_raw
            .iter()
            .map(|(&tid, &tf_raw)| {
                let df_t = self.df.get(tid as usize).copied().unwrap_or(1);
                (tid, log_tf(tf_raw) * self.options.idf(self.num_docs, df_t))
            })
            .collect();
        let mut norm = q_weights.values().map(|w| w * w).sum::<f32>().sqrt();
        if norm == 0.0 {
            norm = 1.0;
        }
        for w in q_weights.values_mut() {
            *w /= norm;
        }

        let mut scores: HashMap<DocId, f32> = HashMap::new();
        for (tid, q_w) in &q_weights {
            for p in self.postings.get(tid).into_iter().flatten() {
                *scores.entry(p.doc_id).or_insert(0.0) += p.weight * q_w * self.options.boost(p.field);
            }
        }

        let mut hits: Vec<Hit> = scores.into_iter().map(|(doc_id, score)| Hit { doc_id, score }).collect();
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        hits
    }
}

/// Accumulates documents and computes normalized TF-IDF postings on `build`.
#[derive(Default)]
pub struct IndexBuilder {
    options: IndexOptions,
    next_doc_id: DocId,
    dictionary: HashMap<String, TermId>,
    df: Vec<u32>,
    postings_raw: HashMap<TermId, Vec<(DocId, Field, u32)>>,
}

impl IndexBuilder {
    pub fn new(options: IndexOptions) -> Self {
        Self { options, ..Self::default() }
    }

    /// Index one document and return the id assigned to it. Ids are dense and
    /// follow insertion order.
    pub fn add(&mut self, title: &str, content: &str) -> DocId {
        let doc_id = self.next_doc_id;
        self.next_doc_id += 1;

        let mut seen_in_doc: HashSet<TermId> = HashSet::new();
        for (field, text) in [(Field::Title, title), (Field::Content, content)] {
            let mut tf_counts: HashMap<TermId, u32> = HashMap::new();
            for term in terms(text) {
                let tid = self.term_id(term);
                *tf_counts.entry(tid).or_insert(0) += 1;
                if seen_in_doc.insert(tid) {
                    self.df[tid as usize] += 1;
                }
            }
            for (tid, tf_raw) in tf_counts {
                self.postings_raw.entry(tid).or_default().push((doc_id, field, tf_raw));
            }
        }
        doc_id
    }

    fn term_id(&mut self, term: String) -> TermId {
        let next = self.df.len() as TermId;
        let tid = *self.dictionary.entry(term).or_insert(next);
        if tid == next {
            self.df.push(0);
        }
        tid
    }

    pub fn build(self) -> InvertedIndex {
        let Self { options, next_doc_id: num_docs, dictionary, df, postings_raw } = self;

        // First pass: raw tf-idf per posting, accumulating (doc, field) norms.
        let mut norms: HashMap<(DocId, Field), f32> = HashMap::new();
        let weighted: Vec<(TermId, Vec<(DocId, Field, f32)>)> = postings_raw
            .into_iter()
            .map(|(tid, plist)| {
                let idf = options.idf(num_docs, df[tid as usize]);
                let plist = plist
                    .into_iter()
                    .map(|(doc_id, field, tf_raw)| {
                        let tfidf = log_tf(tf_raw) * idf;
                        *norms.entry((doc_id, field)).or_insert(0.0) += tfidf * tfidf;
                        (doc_id, field, tfidf)
                    })
                    .collect();
                (tid, plist)
            })
            .collect();

        // Second pass: normalize.
        let mut postings: HashMap<TermId, Vec<Posting>> = HashMap::with_capacity(weighted.len());
        for (tid, plist) in weighted {
            let mut out: Vec<Posting> = plist
                .into_iter()
                .map(|(doc_id, field, tfidf)| {
                    let norm = norms.get(&(doc_id, field)).map(|n| n.sqrt()).filter(|n| *n > 0.0).unwrap_or(1.0);
                    Posting { doc_id, field, weight: tfidf / norm }
                })
                .collect();
            out.sort_by_key(|p| p.doc_id);
            postings.insert(tid, out);
        }

        tracing::debug!(num_docs, num_terms = dictionary.len(), "built inverted index");
        InvertedIndex { dictionary, df, postings, num_docs, options }
    }
}

#[inline]
fn log_tf(tf_raw: u32) -> f32 {
    if tf_raw > 0 { 1.0 + (tf_raw as f32).ln() } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(docs: &[(&str, &str)]) -> InvertedIndex {
        let mut builder = IndexBuilder::new(IndexOptions::default());
        for (title, content) in docs {
            builder.add(title, content);
        }
        builder.build()
    }

    #[test]
    fn assigns_dense_ids_in_insertion_order() {
        let mut builder = IndexBuilder::default();
        assert_eq!(builder.add("a", "x"), 0);
        assert_eq!(builder.add("b", "y"), 1);
        assert_eq!(builder.add("c", "z"), 2);
        assert_eq!(builder.build().num_docs(), 3);
    }

    #[test]
    fn postings_reference_existing_docs_only() {
        let index = index_of(&[("Rust", "systems programming"), ("Go", "programming language")]);
        for p in index.postings("program") {
            assert!(p.doc_id < index.num_docs());
        }
        assert_eq!(index.postings("program").len(), 2);
    }

    #[test]
    fn query_matches_title_and_content_fields() {
        let index = index_of(&[("Cats", "are great pets"), ("Dogs", "loyal friends to cats")]);
        let hits = index.query("cats");
        let ids: Vec<DocId> = hits.iter().map(|h| h.doc_id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&0) && ids.contains(&1));
    }

    #[test]
    fn unknown_and_stopword_queries_return_nothing() {
        let index = index_of(&[("Cats", "are great pets")]);
        assert!(index.query("zzz").is_empty());
        assert!(index.query("the").is_empty());
        assert!(index.query("").is_empty());
    }

    #[test]
    fn title_boost_promotes_title_matches() {
        let mut builder = IndexBuilder::new(IndexOptions { title_boost: 10.0, ..IndexOptions::default() });
        builder.add("Gardening", "notes about rust on tools");
        builder.add("Rust", "a language");
        let hits = builder.build().query("rust");
        assert_eq!(hits[0].doc_id, 1);
    }

    #[test]
    fn equal_scores_rank_by_doc_id() {
        let index = index_of(&[("rust", "text"), ("rust", "text"), ("rust", "text")]);
        let ids: Vec<DocId> = index.query("rust").iter().map(|h| h.doc_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn unsmoothed_idf_still_returns_matches_present_everywhere() {
        let mut builder = IndexBuilder::new(IndexOptions { smoothed_idf: false, ..IndexOptions::default() });
        builder.add("rust", "");
        let hits = builder.build().query("rust");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, 0.0);
    }
}
