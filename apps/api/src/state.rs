use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::matching::sort::ResultSet;
use crate::resume::vocabulary::Vocabulary;
use crate::store::TrackingStore;

/// How many filter results are kept for re-sorting before the oldest is dropped.
pub const RESULT_SET_CAPACITY: usize = 256;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Query history + applied-job tracking. Postgres when configured, else in-memory.
    pub store: Arc<dyn TrackingStore>,
    /// Static skill / role / education vocabulary, read-only after startup.
    pub vocab: &'static Vocabulary,
    pub results: Arc<RwLock<ResultSetCache>>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn TrackingStore>) -> Self {
        Self {
            config,
            store,
            vocab: Vocabulary::builtin(),
            results: Arc::new(RwLock::new(ResultSetCache::new(RESULT_SET_CAPACITY))),
        }
    }
}

/// Filter results by id, oldest evicted first once `capacity` is reached.
pub struct ResultSetCache {
    capacity: usize,
    sets: HashMap<Uuid, ResultSet>,
    order: VecDeque<Uuid>,
}

impl ResultSetCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            sets: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn insert(&mut self, set: ResultSet) -> Uuid {
        while self.sets.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.sets.remove(&oldest);
                }
                None => break,
            }
        }
        let id = Uuid::new_v4();
        self.sets.insert(id, set);
        self.order.push_back(id);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<&ResultSet> {
        self.sets.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut ResultSet> {
        self.sets.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_evicts_oldest() {
        let mut cache = ResultSetCache::new(2);
        let first = cache.insert(ResultSet::new("a", 0.3, vec![]));
        let second = cache.insert(ResultSet::new("b", 0.3, vec![]));
        let third = cache.insert(ResultSet::new("c", 0.3, vec![]));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&first).is_none());
        assert_eq!(cache.get(&second).unwrap().query(), "b");
        assert_eq!(cache.get(&third).unwrap().query(), "c");
    }
}
