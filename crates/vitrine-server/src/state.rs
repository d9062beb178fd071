//! Shared relay state.

use tokio::sync::{Mutex, broadcast};
use vitrine_core::ids;
use vitrine_core::{Article, RelayEvent};

/// Article list plus the channel every viewer listens on.
///
/// Mutations broadcast while still holding the list lock, and subscribers
/// snapshot and subscribe under the same lock, so each viewer sees its
/// snapshot followed by exactly the events that came after it.
pub struct AppState {
    articles: Mutex<Vec<Article>>,
    events: broadcast::Sender<RelayEvent>,
}

impl AppState {
    pub fn new(channel_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            articles: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Append a validated article and announce it.
    pub async fn add_article(&self, name: String, price: f64) -> Article {
        let mut articles = self.articles.lock().await;
        let article = Article {
            id: ids::next_id(),
            name,
            price,
        };
        articles.push(article.clone());
        self.publish(RelayEvent::ArticleAdded {
            article: article.clone(),
        });
        article
    }

    pub async fn articles(&self) -> Vec<Article> {
        self.articles.lock().await.clone()
    }

    /// Remove every article and announce it.
    pub async fn clear(&self) -> usize {
        let mut articles = self.articles.lock().await;
        let removed = articles.len();
        articles.clear();
        self.publish(RelayEvent::ArticlesCleared);
        removed
    }

    /// Current list and a receiver for every event after it.
    pub async fn subscribe(&self) -> (Vec<Article>, broadcast::Receiver<RelayEvent>) {
        let articles = self.articles.lock().await;
        (articles.clone(), self.events.subscribe())
    }

    pub fn viewer_count(&self) -> usize {
        self.events.receiver_count()
    }

    fn publish(&self, event: RelayEvent) {
        // No receivers is not an error: nobody is watching yet.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_and_clear_broadcast_in_order() {
        let state = AppState::new(8);
        let (snapshot, mut rx) = state.subscribe().await;
        assert!(snapshot.is_empty());

        let milk = state.add_article("Milk".into(), 2.5).await;
        let bread = state.add_article("Bread".into(), 1.2).await;
        assert!(bread.id > milk.id);
        assert_eq!(state.clear().await, 2);

        assert_eq!(rx.recv().await.unwrap(), RelayEvent::ArticleAdded { article: milk });
        assert_eq!(rx.recv().await.unwrap(), RelayEvent::ArticleAdded { article: bread });
        assert_eq!(rx.recv().await.unwrap(), RelayEvent::ArticlesCleared);
        assert!(state.articles().await.is_empty());
    }

    #[tokio::test]
    async fn late_subscriber_gets_snapshot_without_replay() {
        let state = AppState::new(8);
        let milk = state.add_article("Milk".into(), 2.5).await;

        let (snapshot, mut rx) = state.subscribe().await;
        assert_eq!(snapshot, vec![milk]);
        assert!(matches!(rx.try_recv(), Err(broadcast::error::TryRecvError::Empty)));
        assert_eq!(state.viewer_count(), 1);
    }
}
