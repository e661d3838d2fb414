use dashmap::DashMap;

/// Shared document storage, keyed by instance name.
///
/// Holds the last document published for each mounted instance. Readers get
/// a clone of the stored handle (use an `Arc` for `V`); only the thread that
/// owns a scan writes.
pub struct DocumentStore<V> {
    documents: DashMap<String, V>,
}

impl<V: Clone> DocumentStore<V> {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    pub fn get(&self, instance_name: &str) -> Option<V> {
        self.documents.get(instance_name).map(|doc| doc.value().clone())
    }

    /// Store `document` under `instance_name`, returning what it replaced.
    pub fn publish(&self, instance_name: &str, document: V) -> Option<V> {
        tracing::debug!(instance = instance_name, "publishing document");
        self.documents.insert(instance_name.to_string(), document)
    }

    pub fn contains(&self, instance_name: &str) -> bool {
        self.documents.contains_key(instance_name)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl<V: Clone> Default for DocumentStore<V> {
    fn default() -> Self {
        Self::new()
    }
}
