//! Articles and the relay's wire protocol.
//!
//! ## Protocol
//!
//! REST bodies and WebSocket text frames are JSON:
//! ```json
//! { "type": "initial-snapshot", "articles": [{ "id": 1, "name": "Milk", "price": 2.5 }] }
//! { "type": "article-added", "article": { "id": 2, "name": "Bread", "price": 1.2 } }
//! { "type": "articles-cleared" }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Relay-assigned article identity.
pub type ArticleId = i64;

/// An externally submitted name/price record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub name: String,
    pub price: f64,
}

impl Article {
    /// Display line used by every articles panel, e.g. `Milk - $2.50`.
    pub fn label(&self) -> String {
        format!("{} - ${:.2}", self.name, self.price)
    }
}

/// Validation failures for submitted articles.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArticleError {
    #[error("Article name and price are required")]
    MissingFields,
}

/// Body of `POST /api/article`. Both fields are optional on the wire so that
/// missing values can be reported as a validation error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl NewArticle {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
        }
    }

    /// Accept a non-blank name and a positive, finite price.
    pub fn validate(&self) -> Result<(String, f64), ArticleError> {
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or(ArticleError::MissingFields)?;
        let price = self
            .price
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or(ArticleError::MissingFields)?;
        Ok((name.to_string(), price))
    }
}

/// Response to a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleAccepted {
    pub message: String,
    pub article: Article,
}

/// Plain `{ "message": ... }` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Plain `{ "error": ... }` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Events broadcast by the relay to every connected viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RelayEvent {
    /// Full article list, sent once when a viewer connects.
    InitialSnapshot { articles: Vec<Article> },
    /// A single newly submitted article.
    ArticleAdded { article: Article },
    /// Every article was removed.
    ArticlesCleared,
}

/// Local copy of the relay's article list.
///
/// Kept eventually consistent by applying relay events in arrival order:
/// snapshots replace, additions append, clears empty. Nothing else mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleMirror {
    articles: Vec<Article>,
}

impl ArticleMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: RelayEvent) {
        match event {
            RelayEvent::InitialSnapshot { articles } => {
                log::debug!("Article snapshot with {} entries", articles.len());
                self.articles = articles;
            }
            RelayEvent::ArticleAdded { article } => {
                log::debug!("Article added: {}", article.label());
                self.articles.push(article);
            }
            RelayEvent::ArticlesCleared => {
                log::debug!("Articles cleared");
                self.articles.clear();
            }
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milk() -> Article {
        Article {
            id: 1,
            name: "Milk".into(),
            price: 2.5,
        }
    }

    #[test]
    fn test_label() {
        assert_eq!(milk().label(), "Milk - $2.50");
    }

    #[test]
    fn test_validate() {
        assert_eq!(NewArticle::new("Milk", 2.5).validate(), Ok(("Milk".into(), 2.5)));
        assert!(NewArticle::new("", 2.5).validate().is_err());
        assert!(NewArticle::new("  ", 2.5).validate().is_err());
        assert!(NewArticle::new("Milk", 0.0).validate().is_err());
        assert!(NewArticle::new("Milk", -1.0).validate().is_err());
        assert!(NewArticle::default().validate().is_err());
    }

    #[test]
    fn test_event_wire_format() {
        let json = serde_json::to_value(RelayEvent::ArticleAdded { article: milk() }).unwrap();
        assert_eq!(json["type"], "article-added");
        assert_eq!(json["article"]["name"], "Milk");

        let cleared: RelayEvent = serde_json::from_str(r#"{"type":"articles-cleared"}"#).unwrap();
        assert_eq!(cleared, RelayEvent::ArticlesCleared);

        let snapshot: RelayEvent =
            serde_json::from_str(r#"{"type":"initial-snapshot","articles":[{"id":1,"name":"Milk","price":2.5}]}"#)
                .unwrap();
        assert_eq!(snapshot, RelayEvent::InitialSnapshot { articles: vec![milk()] });
    }

    #[test]
    fn test_mirror_applies_in_order() {
        let mut mirror = ArticleMirror::new();
        mirror.apply(RelayEvent::InitialSnapshot { articles: vec![milk()] });
        mirror.apply(RelayEvent::ArticleAdded {
            article: Article {
                id: 2,
                name: "Bread".into(),
                price: 1.2,
            },
        });
        let names: Vec<_> = mirror.articles().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Bread"]);

        mirror.apply(RelayEvent::ArticlesCleared);
        assert!(mirror.is_empty());

        // A later snapshot replaces rather than merges.
        mirror.apply(RelayEvent::ArticleAdded { article: milk() });
        mirror.apply(RelayEvent::InitialSnapshot { articles: vec![] });
        assert!(mirror.is_empty());
    }
}
