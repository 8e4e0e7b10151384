use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use uuid::Uuid;

/// Drops all but the last call of a client within a quiet period
pub struct Debouncer {
    quiet: Duration,
    generations: Mutex<Generations>,
}

/// Tickets increase across all clients
#[derive(Default)]
struct Generations {
    next: u64,
    latest: HashMap<Uuid, u64>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            generations: Mutex::new(Generations::default()),
        }
    }

    /// Wait for the quiet period.
    ///
    /// Returns `false` if another call of the same client started meanwhile.
    pub async fn settle(&self, client: Uuid) -> bool {
        if self.quiet.is_zero() {
            return true;
        }

        let ticket = {
            let mut generations = self.generations.lock().await;
            generations.next += 1;
            let ticket = generations.next;
            generations.latest.insert(client, ticket);
            ticket
        };

        tokio::time::sleep(self.quiet).await;

        let mut generations = self.generations.lock().await;
        if generations.latest.get(&client) == Some(&ticket) {
            generations.latest.remove(&client);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn only_latest_call_settles() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(50)));
        let client = Uuid::new_v4();

        let first = tokio::spawn({
            let debouncer = debouncer.clone();
            async move { debouncer.settle(client).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = debouncer.settle(client).await;

        assert!(!first.await.unwrap());
        assert!(second);
    }

    #[tokio::test]
    async fn clients_are_independent() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(30)));

        let other = tokio::spawn({
            let debouncer = debouncer.clone();
            async move { debouncer.settle(Uuid::new_v4()).await }
        });
        let own = debouncer.settle(Uuid::new_v4()).await;

        assert!(own);
        assert!(other.await.unwrap());
    }

    #[tokio::test]
    async fn settled_clients_are_forgotten() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(20)));
        let client = Uuid::new_v4();

        let first = tokio::spawn({
            let debouncer = debouncer.clone();
            async move { debouncer.settle(client).await }
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(debouncer.settle(client).await);
        assert!(!first.await.unwrap());

        assert!(debouncer.generations.lock().await.latest.is_empty());

        assert!(debouncer.settle(client).await);
        assert!(debouncer.generations.lock().await.latest.is_empty());
    }

    #[tokio::test]
    async fn zero_quiet_period_always_settles() {
        let debouncer = Debouncer::new(Duration::ZERO);
        assert!(debouncer.settle(Uuid::new_v4()).await);
    }
}
