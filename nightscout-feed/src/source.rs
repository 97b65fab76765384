use async_trait::async_trait;
use nightscout_core::Measurement;

use crate::FeedError;

/// Where the pipeline gets its readings from.
///
/// Implementations return entries in feed order, newest first.
#[async_trait]
pub trait EntrySource: Send + Sync {
    async fn fetch_entries(&self, count: u32) -> Result<Vec<Measurement>, FeedError>;
}

/// In-memory source, used for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEntries {
    entries: Vec<Measurement>,
}

impl StaticEntries {
    pub fn new(entries: Vec<Measurement>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl EntrySource for StaticEntries {
    async fn fetch_entries(&self, count: u32) -> Result<Vec<Measurement>, FeedError> {
        Ok(self
            .entries
            .iter()
            .take(count as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_entries_honour_count() {
        let source = StaticEntries::new(vec![
            Measurement::new(120, None),
            Measurement::new(118, None),
            Measurement::new(117, None),
        ]);

        let entries = source.fetch_entries(2).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, 120);
    }
}
