//! In-memory realtime store.
//!
//! Implements [`RealtimeStore`] over a single `serde_json` tree.  Used by
//! the host simulation binary and by tests; a hosted-database adapter would
//! implement the same trait.
//!
//! Semantics follow the hosted store closely enough for the core:
//! - writing `null` removes the node,
//! - writing through a non-object parent replaces it with an object,
//! - a new subscriber first receives the node's current value,
//! - every write touching a subscribed path sends that path's new value,
//!   then one creation event per leaf below it that did not exist before.

use std::sync::mpsc::Sender;

use log::{debug, info, warn};
use serde_json::{Map, Value};

use crate::app::ports::{RealtimeStore, StoreError, Subscription, ValueChanged};

pub struct MemoryStore {
    root: Value,
    subscribers: Vec<(String, Sender<ValueChanged>)>,
    offline: bool,
    write_count: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        info!("MemoryStore: simulation backend");
        Self {
            root: Value::Object(Map::new()),
            subscribers: Vec::new(),
            offline: false,
            write_count: 0,
        }
    }

    /// Simulate losing the connection.  While offline every read and write
    /// fails with [`StoreError::Unavailable`].
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    fn segments(path: &str) -> impl Iterator<Item = &str> {
        path.split('/').filter(|s| !s.is_empty())
    }

    fn normalize(path: &str) -> String {
        Self::segments(path).collect::<Vec<_>>().join("/")
    }

    fn node(&self, path: &str) -> Option<&Value> {
        node_at(&self.root, path)
    }

    fn set(&mut self, path: &str, value: Value) {
        let segs: Vec<&str> = Self::segments(path).collect();
        let Some((last, parents)) = segs.split_last() else {
            self.root = if value.is_null() { Value::Object(Map::new()) } else { value };
            return;
        };

        let mut node = &mut self.root;
        for seg in parents {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            node = match node {
                Value::Object(map) => map.entry((*seg).to_owned()).or_insert(Value::Object(Map::new())),
                _ => unreachable!("node was just made an object"),
            };
        }
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        if let Value::Object(map) = node {
            if value.is_null() {
                map.remove(*last);
            } else {
                map.insert((*last).to_owned(), value);
            }
        }
    }

    fn notify(&mut self, path: &str, created: &[(String, Value)]) {
        let Self { root, subscribers, .. } = self;
        let root = &*root;
        subscribers.retain(|(sub, tx)| {
            if !related(sub, path) {
                return true;
            }
            let current = node_at(root, sub).cloned();
            if tx.send(ValueChanged::value(sub.clone(), current)).is_err() {
                return false;
            }
            created
                .iter()
                .filter(|(leaf, _)| is_prefix(sub, leaf))
                .all(|(leaf, v)| tx.send(ValueChanged::created(leaf.clone(), v.clone())).is_ok())
        });
    }
}

fn node_at<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .try_fold(root, |node, seg| node.get(seg))
}

/// True if `p` is `q` or an ancestor of it.
fn is_prefix(p: &str, q: &str) -> bool {
    p.is_empty() || q == p || q.strip_prefix(p).is_some_and(|rest| rest.starts_with('/'))
}

/// True if either path is the other or an ancestor of it.
fn related(a: &str, b: &str) -> bool {
    is_prefix(a, b) || is_prefix(b, a)
}

/// Collect the leaves of `new` (rooted at `path`) that have no node at the
/// same path in `old`.
fn created_leaves(path: &str, old: Option<&Value>, new: &Value, out: &mut Vec<(String, Value)>) {
    match new {
        Value::Null => {}
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() { key.clone() } else { format!("{path}/{key}") };
                created_leaves(&child_path, old.and_then(|o| o.get(key)), child, out);
            }
        }
        leaf => {
            if old.is_none() {
                out.push((path.to_owned(), leaf.clone()));
            }
        }
    }
}

impl RealtimeStore for MemoryStore {
    fn write(&mut self, path: &str, value: Value) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable);
        }
        debug!("write {path} = {value}");
        let path = Self::normalize(path);
        let old = self.node(&path).cloned();
        let mut created = Vec::new();
        created_leaves(&path, old.as_ref(), &value, &mut created);
        self.set(&path, value);
        self.write_count += 1;
        self.notify(&path, &created);
        Ok(())
    }

    fn read(&self, path: &str) -> Result<Option<Value>, StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable);
        }
        Ok(self.node(path).cloned())
    }

    fn subscribe(&mut self, path: &str) -> Subscription {
        let (tx, sub) = Subscription::channel();
        let path = Self::normalize(path);
        if let Some(current) = self.node(&path).cloned() {
            if tx.send(ValueChanged::value(path.clone(), Some(current))).is_err() {
                warn!("subscriber for {path} hung up before the initial value");
            }
        }
        self.subscribers.push((path, tx));
        sub
    }
}
