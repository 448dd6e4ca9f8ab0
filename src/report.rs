//! Diagnostic events and the reporters that receive them.
//!
//! Library code never prints. Every notable step of loading, extraction and
//! injection is described by an [`Event`] handed to a caller-supplied
//! [`Reporter`]. The binaries use [`TracingReporter`]; tests use
//! [`CollectingReporter`] to assert on what happened.

use crate::bridge::MatchedBy;
use crate::container::RecordMarker;

/// Something the bridge did or decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A record was read from a container.
    RecordLoaded { marker: RecordMarker, owner: String, name: String, size: usize },
    /// A property was written to a container.
    PropertyExtracted { owner: String, name: String, type_tag: String, bytes: usize },
    /// An auxiliary array was written to a container.
    ArrayExtracted { owner: String, name: String, count: usize },
    /// A user-data layer did not match any name filter.
    UserDataIgnored { owner: String, name: String },
    /// A mesh node had neither a node name nor a mesh name to key it by.
    UnnamedMeshSkipped,
    /// A mesh-bearing node was visited.
    NodeVisited { node: String, mesh: String },
    /// A node was matched to a container owner.
    OwnerMatched { node: String, key: String, by: MatchedBy },
    /// Neither node nor mesh name is in the container.
    OwnerSkipped { node: String, mesh: String },
    /// A property was created and given its recorded value.
    PropertyCreated { owner: String, path: String, type_tag: String, bytes: usize },
    /// A property could not be created on the target.
    PropertyCreationFailed { owner: String, name: String },
    /// A document chain link had no recorded value.
    ChainLinkMissing { name: String },
    /// A per-polygon layer was created from an auxiliary array.
    LayerCreated { owner: String, name: String, count: usize },
    /// The recorded element count differs from the target's polygon count.
    ElementCountMismatch { owner: String, polygons: usize, elements: usize },
    /// An auxiliary array was recorded with zero elements; no layer was made.
    EmptyArraySkipped { owner: String, name: String },
    /// The preferred scene writer was unavailable.
    SceneWriterFallback { requested: String, used: String },
}

/// Receiver for [`Event`]s.
pub trait Reporter {
    fn record(&mut self, event: Event);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn record(&mut self, event: Event) {
        (**self).record(event)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn record(&mut self, _event: Event) {}
}

/// Keeps every event in order.
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    pub events: Vec<Event>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count events matching a predicate.
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Reporter for CollectingReporter {
    fn record(&mut self, event: Event) {
        self.events.push(event);
    }
}

/// Forwards events to `tracing` with structured fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn record(&mut self, event: Event) {
        match event {
            Event::RecordLoaded { marker, owner, name, size } => {
                tracing::debug!(marker = %marker.as_char(), %owner, %name, size, "loaded record");
            }
            Event::PropertyExtracted { owner, name, type_tag, bytes } => {
                tracing::info!(%owner, %name, %type_tag, bytes, "saved property");
            }
            Event::ArrayExtracted { owner, name, count } => {
                tracing::info!(%owner, %name, count, "saved island group ids");
            }
            Event::UserDataIgnored { owner, name } => {
                tracing::debug!(%owner, %name, "user data does not match filters");
            }
            Event::UnnamedMeshSkipped => {
                tracing::warn!("mesh node has no name, not extracted");
            }
            Event::NodeVisited { node, mesh } => {
                tracing::debug!(%node, %mesh, "checking node");
            }
            Event::OwnerMatched { node, key, by } => {
                tracing::info!(%node, %key, ?by, "found data");
            }
            Event::OwnerSkipped { node, mesh } => {
                tracing::info!(%node, %mesh, "no data found");
            }
            Event::PropertyCreated { owner, path, type_tag, bytes } => {
                tracing::info!(%owner, %path, %type_tag, bytes, "created property");
            }
            Event::PropertyCreationFailed { owner, name } => {
                tracing::warn!(%owner, %name, "could not create property");
            }
            Event::ChainLinkMissing { name } => {
                tracing::debug!(%name, "no recorded value for document property");
            }
            Event::LayerCreated { owner, name, count } => {
                tracing::info!(%owner, %name, count, "created island group layer");
            }
            Event::ElementCountMismatch { owner, polygons, elements } => {
                tracing::warn!(%owner, polygons, elements, "island group count differs from polygon count");
            }
            Event::EmptyArraySkipped { owner, name } => {
                tracing::debug!(%owner, %name, "empty island group array, no layer created");
            }
            Event::SceneWriterFallback { requested, used } => {
                tracing::warn!(%requested, %used, "scene writer not found, falling back");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_reporter() {
        fn feed(mut reporter: impl Reporter) {
            reporter.record(Event::ChainLinkMissing { name: "Scene".into() });
        }

        let mut reporter = CollectingReporter::new();
        feed(&mut reporter);
        reporter.record(Event::OwnerSkipped { node: "a".into(), mesh: "b".into() });
        assert_eq!(reporter.events.len(), 2);
        assert_eq!(reporter.count(|e| matches!(e, Event::OwnerSkipped { .. })), 1);
    }
}
