use crate::models::{TaskEntry, TaskId};
use std::collections::HashMap;

#[derive(Debug)]
struct Node {
    entry: TaskEntry,
    prev: Option<usize>,
    next: Option<usize>,
}

/// The sequence of most-recently-viewed entities, most recent at the tail,
/// at most one entry per id.
///
/// Backed by a doubly linked list whose nodes live in an index-addressed
/// arena with a free list, plus a map from task id to node index. Recording,
/// touching and removing are all O(1) regardless of history length. There is
/// no size bound and no eviction.
#[derive(Debug, Default)]
pub struct HistoryTracker {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    index: HashMap<TaskId, usize>,
}

impl HistoryTracker {
    /// Records a view of `entry`. An existing entry for the same id is moved
    /// to the tail and replaced by the new snapshot ("touch"), so the list
    /// never grows on a re-view.
    pub fn record(&mut self, entry: TaskEntry) {
        let id = entry.id();
        if let Some(at) = self.index.remove(&id) {
            self.detach(at);
        }
        let at = self.link_tail(entry);
        self.index.insert(id, at);
    }

    /// Drops the entry for `id` if present; unknown ids are a no-op.
    pub fn remove(&mut self, id: TaskId) {
        if let Some(at) = self.index.remove(&id) {
            self.detach(at);
        }
    }

    /// Snapshots in view order, oldest first.
    pub fn entries(&self) -> Vec<TaskEntry> {
        let mut out = Vec::with_capacity(self.index.len());
        let mut cursor = self.head;
        while let Some(at) = cursor {
            let Some(node) = self.nodes[at].as_ref() else { break };
            out.push(node.entry.clone());
            cursor = node.next;
        }
        out
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn link_tail(&mut self, entry: TaskEntry) -> usize {
        let node = Node {
            entry,
            prev: self.tail,
            next: None,
        };
        let at = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };
        if let Some(tail) = self.tail {
            if let Some(old_tail) = self.nodes[tail].as_mut() {
                old_tail.next = Some(at);
            }
        }
        if self.head.is_none() {
            self.head = Some(at);
        }
        self.tail = Some(at);
        at
    }

    fn detach(&mut self, at: usize) {
        let Some(node) = self.nodes[at].take() else { return };
        match node.prev {
            Some(prev) => {
                if let Some(prev_node) = self.nodes[prev].as_mut() {
                    prev_node.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => {
                if let Some(next_node) = self.nodes[next].as_mut() {
                    next_node.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }
        self.free.push(at);
    }
}
