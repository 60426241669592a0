//! Per-reference success and failure hooks.
//!
//! Every [`Reference`] owns one [`CallbackSet`]: a (success, failure)
//! [`CallbackPair`] for each [`Operation`]. A [`Hook`] fans a result out to
//! zero or more subscribers.
//!
//! Cloning a hook copies its subscriber list. The closures themselves are
//! shared, but adding or clearing subscribers on the clone never affects the
//! original, which is what callback inheritance between references relies on.

use std::fmt;
use std::sync::Arc;

use rtdb_transport::Method;
use rtdb_types::{RequestError, Snapshot};

use crate::reference::Reference;

/// A subscriber invoked with the originating reference and the result.
pub type Subscriber<T> = Arc<dyn Fn(&Reference, &T) + Send + Sync>;

/// REST operations that carry callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    Set,
    Update,
    Push,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 5] = [Self::Get, Self::Set, Self::Update, Self::Push, Self::Delete];

    pub fn method(&self) -> Method {
        match self {
            Self::Get => Method::Get,
            Self::Set => Method::Put,
            Self::Update => Method::Patch,
            Self::Push => Method::Post,
            Self::Delete => Method::Delete,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Update => "update",
            Self::Push => "push",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A multi-subscriber callback.
pub struct Hook<T> {
    subscribers: Vec<Subscriber<T>>,
}

impl<T> Hook<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Reference, &T) + Send + Sync + 'static,
    {
        self.subscribers.push(Arc::new(f));
        self
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Invoke every subscriber in registration order.
    pub fn fire(&self, reference: &Reference, value: &T) {
        for subscriber in &self.subscribers {
            subscriber(reference, value);
        }
    }
}

impl<T> Clone for Hook<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: self.subscribers.clone(),
        }
    }
}

impl<T> Default for Hook<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Hook<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Success and failure hooks for one operation.
#[derive(Clone, Debug, Default)]
pub struct CallbackPair {
    pub on_success: Hook<Snapshot>,
    pub on_failure: Hook<RequestError>,
}

impl CallbackPair {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pair from one success and one failure subscriber.
    pub fn from_fns<S, F>(on_success: S, on_failure: F) -> Self
    where
        S: Fn(&Reference, &Snapshot) + Send + Sync + 'static,
        F: Fn(&Reference, &RequestError) + Send + Sync + 'static,
    {
        let mut pair = Self::new();
        pair.on_success.subscribe(on_success);
        pair.on_failure.subscribe(on_failure);
        pair
    }

    pub fn is_empty(&self) -> bool {
        self.on_success.is_empty() && self.on_failure.is_empty()
    }
}

/// The five callback pairs owned by a reference.
#[derive(Clone, Debug, Default)]
pub struct CallbackSet {
    pub get: CallbackPair,
    pub set: CallbackPair,
    pub update: CallbackPair,
    pub push: CallbackPair,
    pub delete: CallbackPair,
}

impl CallbackSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pair(&self, op: Operation) -> &CallbackPair {
        match op {
            Operation::Get => &self.get,
            Operation::Set => &self.set,
            Operation::Update => &self.update,
            Operation::Push => &self.push,
            Operation::Delete => &self.delete,
        }
    }

    pub fn pair_mut(&mut self, op: Operation) -> &mut CallbackPair {
        match op {
            Operation::Get => &mut self.get,
            Operation::Set => &mut self.set,
            Operation::Update => &mut self.update,
            Operation::Push => &mut self.push,
            Operation::Delete => &mut self.delete,
        }
    }

    /// Total number of subscribers across all pairs.
    pub fn subscriber_count(&self) -> usize {
        Operation::ALL
            .iter()
            .map(|op| {
                let pair = self.pair(*op);
                pair.on_success.len() + pair.on_failure.len()
            })
            .sum()
    }
}
