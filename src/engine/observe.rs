// src/engine/observe.rs

//! Change notifications for presentation hosts.
//!
//! The core describes what changed in a step as a list of [`ViewChange`]s.
//! A [`ChangeBatch`] coalesces them so each [`ViewTopic`] appears at most
//! once per step (the last write wins), and a [`ChangeHub`] delivers the
//! batch to whoever subscribed to those topics.

use std::fmt;

use crate::monitor::ProgressView;
use crate::selector::SelectorOption;
use crate::types::Pk;

/// Observable attributes of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewTopic {
    Process,
    Selection,
    Options,
    Progress,
    LogWindow,
    RawLog,
    LogAppend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewChange {
    /// The watched process reference changed. `description` is empty when
    /// nothing is watched.
    Process { pk: Option<Pk>, description: String },
    Selection(Option<Pk>),
    Options(Vec<SelectorOption>),
    Progress(ProgressView),
    /// Rolling window, already wrapped in its display block.
    LogWindow(String),
    /// Full history as raw text.
    RawLog(String),
    /// Lines added to the history in this step, for hosts that print
    /// incrementally.
    LogAppend(Vec<String>),
}

impl ViewChange {
    pub fn topic(&self) -> ViewTopic {
        match self {
            ViewChange::Process { .. } => ViewTopic::Process,
            ViewChange::Selection(_) => ViewTopic::Selection,
            ViewChange::Options(_) => ViewTopic::Options,
            ViewChange::Progress(_) => ViewTopic::Progress,
            ViewChange::LogWindow(_) => ViewTopic::LogWindow,
            ViewChange::RawLog(_) => ViewTopic::RawLog,
            ViewChange::LogAppend(_) => ViewTopic::LogAppend,
        }
    }
}

/// Changes collected during one step, at most one per topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    changes: Vec<ViewChange>,
}

impl ChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change, replacing an earlier one for the same topic in place.
    pub fn push(&mut self, change: ViewChange) {
        let topic = change.topic();
        match self.changes.iter_mut().find(|c| c.topic() == topic) {
            Some(slot) => *slot = change,
            None => self.changes.push(change),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn get(&self, topic: ViewTopic) -> Option<&ViewChange> {
        self.changes.iter().find(|c| c.topic() == topic)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewChange> {
        self.changes.iter()
    }

    pub fn into_vec(self) -> Vec<ViewChange> {
        self.changes
    }
}

impl IntoIterator for ChangeBatch {
    type Item = ViewChange;
    type IntoIter = std::vec::IntoIter<ViewChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeBatch {
    type Item = &'a ViewChange;
    type IntoIter = std::slice::Iter<'a, ViewChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

impl Extend<ViewChange> for ChangeBatch {
    fn extend<I: IntoIterator<Item = ViewChange>>(&mut self, iter: I) {
        for change in iter {
            self.push(change);
        }
    }
}

/// Handle returned by [`ChangeHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&ViewChange) + Send>;

struct Subscriber {
    id: SubscriptionId,
    topic: Option<ViewTopic>,
    callback: Callback,
}

/// Registry of host callbacks.
#[derive(Default)]
pub struct ChangeHub {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl fmt::Debug for ChangeHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeHub")
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `callback` for every change on `topic`.
    pub fn subscribe<F>(&mut self, topic: ViewTopic, callback: F) -> SubscriptionId
    where
        F: FnMut(&ViewChange) + Send + 'static,
    {
        self.add(Some(topic), Box::new(callback))
    }

    /// Call `callback` for every change on any topic.
    pub fn subscribe_all<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ViewChange) + Send + 'static,
    {
        self.add(None, Box::new(callback))
    }

    fn add(&mut self, topic: Option<ViewTopic>, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            topic,
            callback,
        });
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Deliver changes in order, each to the subscribers of its topic.
    pub fn publish<'a, I>(&mut self, changes: I)
    where
        I: IntoIterator<Item = &'a ViewChange>,
    {
        for change in changes {
            let topic = change.topic();
            for sub in self
                .subscribers
                .iter_mut()
                .filter(|s| s.topic.is_none_or(|t| t == topic))
            {
                (sub.callback)(change);
            }
        }
    }
}
