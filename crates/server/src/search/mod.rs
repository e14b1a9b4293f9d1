//! Product name search using Tantivy.
//!
//! Relevance-ranked lookup over product names, scoped to in-stock items.
//!
//! The app starts immediately with an empty index. A background task builds
//! the real index from the catalog and swaps it in atomically when ready;
//! catalog mutations schedule a rebuild the same way. Searching before the
//! first build completes returns empty results rather than erroring.

mod indexer;

use std::sync::{Arc, RwLock};

use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, FuzzyTermQuery, Occur, Query, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, NumericOptions, STORED, STRING, Schema, TextFieldIndexing,
    TextOptions, Value,
};
use tantivy::{Index, IndexReader, ReloadPolicy, TantivyDocument, Term, doc};
use tracing::instrument;

use sugar_maple_core::ProductId;

pub use indexer::spawn_rebuild;

/// Search errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Index construction or maintenance failed.
    #[error("search index error: {0}")]
    Index(String),
    /// A query could not be executed.
    #[error("search query error: {0}")]
    Query(String),
}

/// A product document to index.
#[derive(Debug, Clone)]
pub struct IndexedProduct {
    pub id: ProductId,
    pub name: String,
    pub in_stock: bool,
}

/// Schema field handles for the search index.
#[derive(Clone)]
struct SearchFields {
    id: Field,
    name_text: Field,
    in_stock: Field,
}

/// Inner index state (once built).
struct ReadyIndex {
    #[allow(dead_code)]
    index: Index,
    reader: IndexReader,
    fields: SearchFields,
}

/// The search index.
///
/// Starts empty and is populated asynchronously by a background task.
#[derive(Clone)]
pub struct SearchIndex {
    inner: Arc<RwLock<Option<ReadyIndex>>>,
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchIndex {
    /// Create a new empty search index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }

    /// Check if the index is ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.read().map(|guard| guard.is_some()).unwrap_or(false)
    }

    /// Get the number of documents in the index, or 0 if not ready.
    #[must_use]
    pub fn num_docs(&self) -> u64 {
        self.inner
            .read()
            .ok()
            .and_then(|guard| {
                guard
                    .as_ref()
                    .map(|ready| ready.reader.searcher().num_docs())
            })
            .unwrap_or(0)
    }

    /// Build a fresh index over `products` and swap it in atomically.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Index` if index construction fails.
    pub fn replace(&self, products: &[IndexedProduct]) -> Result<(), SearchError> {
        let (schema, fields) = Self::build_schema();

        let index = Index::create_in_ram(schema);

        // Register the English stemmer tokenizer
        index.tokenizers().register(
            "en_stem",
            tantivy::tokenizer::TextAnalyzer::builder(
                tantivy::tokenizer::SimpleTokenizer::default(),
            )
            .filter(tantivy::tokenizer::RemoveLongFilter::limit(40))
            .filter(tantivy::tokenizer::LowerCaser)
            .filter(tantivy::tokenizer::Stemmer::new(
                tantivy::tokenizer::Language::English,
            ))
            .build(),
        );

        let mut writer: tantivy::IndexWriter = index
            .writer(15_000_000)
            .map_err(|e| SearchError::Index(format!("Failed to create writer: {e}")))?;

        for product in products {
            writer
                .add_document(doc!(
                    fields.id => product.id.to_string(),
                    fields.name_text => product.name.as_str(),
                    fields.in_stock => u64::from(product.in_stock),
                ))
                .map_err(|e| SearchError::Index(format!("Failed to add document: {e}")))?;
        }

        writer
            .commit()
            .map_err(|e| SearchError::Index(format!("Failed to commit index: {e}")))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| SearchError::Index(format!("Failed to create reader: {e}")))?;

        let ready = ReadyIndex {
            index,
            reader,
            fields,
        };

        *self
            .inner
            .write()
            .map_err(|_| SearchError::Index("Lock poisoned".to_string()))? = Some(ready);

        Ok(())
    }

    /// Build the schema for the search index.
    fn build_schema() -> (Schema, SearchFields) {
        let mut schema_builder = Schema::builder();

        // STRING means indexed but not tokenized (exact match on the UUID)
        let id = schema_builder.add_text_field("id", STRING | STORED);

        let text_indexing = TextFieldIndexing::default()
            .set_tokenizer("en_stem")
            .set_index_option(IndexRecordOption::WithFreqsAndPositions);
        let text_options = TextOptions::default().set_indexing_options(text_indexing);
        let name_text = schema_builder.add_text_field("name_text", text_options);

        let in_stock = schema_builder.add_u64_field(
            "in_stock",
            NumericOptions::default().set_indexed().set_fast(),
        );

        let schema = schema_builder.build();
        let fields = SearchFields {
            id,
            name_text,
            in_stock,
        };

        (schema, fields)
    }

    /// Search for in-stock products by name, relevance-ranked.
    ///
    /// Returns matching product IDs, best first. Empty results if the index
    /// isn't ready yet or the query is blank.
    ///
    /// # Errors
    ///
    /// Returns an error if the index lock is poisoned or the query fails.
    #[instrument(skip(self))]
    // Allow: the guard must outlive `ready`, which borrows from it for the
    // whole search.
    #[allow(clippy::significant_drop_tightening)]
    pub fn search(&self, query_str: &str, limit: usize) -> Result<Vec<ProductId>, SearchError> {
        let query_str = query_str.trim().to_lowercase();
        if query_str.is_empty() {
            return Ok(Vec::new());
        }

        let guard = self
            .inner
            .read()
            .map_err(|_| SearchError::Index("Lock poisoned".to_string()))?;

        let Some(ready) = guard.as_ref() else {
            return Ok(Vec::new());
        };

        let searcher = ready.reader.searcher();

        let mut subqueries: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for term in query_str.split_whitespace() {
            let name_term = Term::from_field_text(ready.fields.name_text, term);
            subqueries.push((
                Occur::Should,
                Box::new(TermQuery::new(name_term.clone(), IndexRecordOption::Basic)),
            ));
            if term.len() >= 3 {
                subqueries.push((
                    Occur::Should,
                    Box::new(FuzzyTermQuery::new(name_term, 1, true)),
                ));
            }
        }
        let text_query = BooleanQuery::new(subqueries);

        let in_stock_term = Term::from_field_u64(ready.fields.in_stock, 1);
        let query = BooleanQuery::new(vec![
            (Occur::Must, Box::new(text_query) as Box<dyn Query>),
            (
                Occur::Must,
                Box::new(TermQuery::new(in_stock_term, IndexRecordOption::Basic)),
            ),
        ]);

        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit))
            .map_err(|e| SearchError::Query(format!("Search failed: {e}")))?;

        let mut ids = Vec::with_capacity(top_docs.len());
        for (_score, doc_address) in top_docs {
            let doc = searcher
                .doc::<TantivyDocument>(doc_address)
                .map_err(|e| SearchError::Query(format!("Failed to retrieve doc: {e}")))?;

            let id = doc
                .get_first(ready.fields.id)
                .and_then(|v| v.as_str())
                .ok_or_else(|| SearchError::Query("document missing id field".to_string()))?;

            let id: ProductId = id
                .parse()
                .map_err(|e| SearchError::Query(format!("invalid id in index: {e}")))?;
            ids.push(id);
        }

        Ok(ids)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> (ProductId, ProductId, ProductId, SearchIndex) {
        let lamp = ProductId::generate();
        let desk_lamp = ProductId::generate();
        let kettle = ProductId::generate();

        let index = SearchIndex::new();
        index
            .replace(&[
                IndexedProduct {
                    id: lamp,
                    name: "Brass Lamp".to_string(),
                    in_stock: true,
                },
                IndexedProduct {
                    id: desk_lamp,
                    name: "Desk Lamp".to_string(),
                    in_stock: false,
                },
                IndexedProduct {
                    id: kettle,
                    name: "Copper Kettle".to_string(),
                    in_stock: true,
                },
            ])
            .unwrap();

        (lamp, desk_lamp, kettle, index)
    }

    #[test]
    fn test_search_before_build_is_empty() {
        let index = SearchIndex::new();
        assert!(!index.is_ready());
        assert!(index.search("lamp", 10).unwrap().is_empty());
    }

    #[test]
    fn test_search_matches_by_name() {
        let (lamp, _, _, index) = sample();
        let hits = index.search("lamp", 10).unwrap();
        assert_eq!(hits, vec![lamp]);
    }

    #[test]
    fn test_search_excludes_out_of_stock() {
        let (_, desk_lamp, _, index) = sample();
        let hits = index.search("desk", 10).unwrap();
        assert!(!hits.contains(&desk_lamp));
    }

    #[test]
    fn test_search_is_fuzzy_for_longer_terms() {
        let (lamp, _, _, index) = sample();
        // One transposition away from "lamp"
        let hits = index.search("lmap", 10).unwrap();
        assert_eq!(hits, vec![lamp]);
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let (_, _, _, index) = sample();
        assert!(index.search("   ", 10).unwrap().is_empty());
    }

    #[test]
    fn test_replace_swaps_atomically() {
        let (lamp, _, _, index) = sample();
        assert_eq!(index.num_docs(), 3);

        index
            .replace(&[IndexedProduct {
                id: lamp,
                name: "Brass Lamp".to_string(),
                in_stock: false,
            }])
            .unwrap();

        assert_eq!(index.num_docs(), 1);
        assert!(index.search("lamp", 10).unwrap().is_empty());
    }
}
