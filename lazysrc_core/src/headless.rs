// Copyright 2026 the Lazysrc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host.
//!
//! [`HeadlessDocument`] is an arena-backed element tree that implements
//! [`Host`]. It lets a loader run where there is no browser: markup
//! post-processing, server-side rendering, and tests. Visibility and
//! completion are driven by hand:
//!
//! - notifications are passed straight to
//!   [`LazyLoader::handle_intersections`](crate::loader::LazyLoader::handle_intersections);
//! - [`HeadlessDocument::dispatch`] fires a completion signal on an element,
//!   applying any pending [`ReadyMarker`] once;
//! - [`set_online`](HeadlessDocument::set_online) and
//!   [`set_observer_supported`](HeadlessDocument::set_observer_supported)
//!   toggle the environment signals.
//!
//! Every mutation the loader performs is appended to a [`Mutation`] log.

use alloc::string::{String, ToString as _};
use alloc::vec::Vec;
use core::fmt::{self, Write as _};

use crate::host::{ElementKind, Host, Intersection, ReadyMarker, ReadySignal, VisibilityObserver};

/// A handle to an element in a [`HeadlessDocument`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A recorded change to the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// An attribute was written.
    SetAttribute {
        /// Target element.
        node: NodeId,
        /// Attribute name.
        name: String,
        /// New value.
        value: String,
    },
    /// An attribute was removed.
    RemoveAttribute {
        /// Target element.
        node: NodeId,
        /// Attribute name.
        name: String,
    },
    /// A class marker was added.
    AddClass {
        /// Target element.
        node: NodeId,
        /// Class name.
        class: String,
    },
    /// A class marker was removed.
    RemoveClass {
        /// Target element.
        node: NodeId,
        /// Class name.
        class: String,
    },
}

#[derive(Debug)]
struct Node {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
}

#[derive(Debug)]
struct PendingReady {
    node: NodeId,
    signal: ReadySignal,
    marker: ReadyMarker,
}

/// An in-memory element tree implementing [`Host`].
///
/// A new document contains a single `body` element. Handles from another
/// document are not detected; using one panics or addresses an unrelated
/// element.
#[derive(Debug)]
pub struct HeadlessDocument {
    nodes: Vec<Node>,
    pending: Vec<PendingReady>,
    mutations: Vec<Mutation>,
    online: bool,
    observer_supported: bool,
    observers_created: usize,
}

impl Default for HeadlessDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDocument {
    /// Creates an online document that supports visibility observation.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            pending: Vec::new(),
            mutations: Vec::new(),
            online: true,
            observer_supported: true,
            observers_created: 0,
        };
        doc.create_element("body");
        doc
    }

    /// Creates an online document without visibility observation.
    #[must_use]
    pub fn without_observer() -> Self {
        let mut doc = Self::new();
        doc.observer_supported = false;
        doc
    }

    /// Returns the root `body` element.
    #[must_use]
    pub const fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a document never holds more than u32::MAX elements"
        )]
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
            classes: Vec::new(),
        });
        id
    }

    /// Appends `child` as the last child of `parent`, detaching it first if
    /// it already has a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.node(child).parent {
            self.node_mut(old).children.retain(|&c| c != child);
        }
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Creates an element with the given attributes and appends it to
    /// `parent`. Attributes set here are not logged as mutations.
    pub fn element(&mut self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let id = self.create_element(tag);
        self.node_mut(id).attributes = attributes
            .iter()
            .map(|&(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self.append_child(parent, id);
        id
    }

    /// Returns the tag name of `node` as it was created.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        &self.node(node).tag
    }

    /// Returns the parent of `node`.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    /// Returns the children of `node`.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// Returns the class markers on `node`, in the order they were added.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.node(node).classes
    }

    /// Returns `true` if `node` carries `class`.
    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).classes.iter().any(|c| c == class)
    }

    /// Removes a class marker from `node`.
    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        let classes = &mut self.node_mut(node).classes;
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() != before {
            self.mutations.push(Mutation::RemoveClass {
                node,
                class: class.to_string(),
            });
        }
    }

    /// Sets the connectivity signal read by loaders.
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    /// Controls whether [`Host::create_observer`] succeeds.
    pub fn set_observer_supported(&mut self, supported: bool) {
        self.observer_supported = supported;
    }

    /// Returns how many observers have been created.
    #[must_use]
    pub fn observers_created(&self) -> usize {
        self.observers_created
    }

    /// Fires `signal` on `node`.
    ///
    /// Every pending marker registered for that element and signal is applied
    /// and discarded. Returns `true` if anything was applied.
    pub fn dispatch(&mut self, node: NodeId, signal: ReadySignal) -> bool {
        let (fired, pending): (Vec<_>, Vec<_>) = core::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.node == node && p.signal == signal);
        self.pending = pending;

        for PendingReady { marker, .. } in &fired {
            self.add_class(&node, &marker.add);
            if let Some(class) = &marker.remove {
                self.remove_class(node, class);
            }
        }
        !fired.is_empty()
    }

    /// Returns the number of completion markers waiting on `node`.
    #[must_use]
    pub fn pending_ready(&self, node: NodeId) -> usize {
        self.pending.iter().filter(|p| p.node == node).count()
    }

    /// Returns every mutation made through the [`Host`] interface, oldest
    /// first.
    #[must_use]
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Returns the elements that lost `placeholder`, in the order they lost
    /// it.
    #[must_use]
    pub fn activation_order(&self, placeholder: &str) -> Vec<NodeId> {
        self.mutations
            .iter()
            .filter_map(|m| match m {
                Mutation::RemoveAttribute { node, name } if name == placeholder => Some(*node),
                _ => None,
            })
            .collect()
    }

    /// Serializes `node` and its subtree as markup.
    ///
    /// Class markers are emitted as a trailing `class` attribute. Values are
    /// escaped for double-quoted attribute context only.
    #[must_use]
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        let _ = write!(out, "<{}", node.tag);
        for (name, value) in &node.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
        }
        if !node.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", node.classes.join(" "));
        }
        out.push('>');
        for &child in &node.children {
            self.write_html(child, out);
        }
        let _ = write!(out, "</{}>", node.tag);
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    fn collect_with_attribute(&self, id: NodeId, attribute: &str, out: &mut Vec<NodeId>) {
        for &child in &self.node(id).children {
            if self.node(child).attributes.iter().any(|(n, _)| n == attribute) {
                out.push(child);
            }
            self.collect_with_attribute(child, attribute, out);
        }
    }
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

impl Host for HeadlessDocument {
    type Element = NodeId;
    type Observer = HeadlessObserver;

    fn create_observer(&mut self, threshold: f64) -> Option<HeadlessObserver> {
        if !self.observer_supported {
            return None;
        }
        self.observers_created += 1;
        Some(HeadlessObserver {
            threshold,
            observed: Vec::new(),
            observe_calls: 0,
            queued: Vec::new(),
        })
    }

    fn is_online(&self) -> bool {
        self.online
    }

    fn deferred_sources(&self, wrapper: &NodeId, attribute: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_with_attribute(*wrapper, attribute, &mut out);
        out
    }

    fn element_kind(&self, element: &NodeId) -> ElementKind {
        if self.node(*element).tag.eq_ignore_ascii_case("video") {
            ElementKind::Video
        } else {
            ElementKind::Other
        }
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.node(*element)
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) {
        let attributes = &mut self.node_mut(*element).attributes;
        match attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
        self.mutations.push(Mutation::SetAttribute {
            node: *element,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn remove_attribute(&mut self, element: &NodeId, name: &str) {
        let attributes = &mut self.node_mut(*element).attributes;
        let before = attributes.len();
        attributes.retain(|(n, _)| n != name);
        if attributes.len() != before {
            self.mutations.push(Mutation::RemoveAttribute {
                node: *element,
                name: name.to_string(),
            });
        }
    }

    fn add_class(&mut self, element: &NodeId, class: &str) {
        if self.has_class(*element, class) {
            return;
        }
        self.node_mut(*element).classes.push(class.to_string());
        self.mutations.push(Mutation::AddClass {
            node: *element,
            class: class.to_string(),
        });
    }

    fn on_ready_once(&mut self, element: &NodeId, signal: ReadySignal, marker: ReadyMarker) {
        self.pending.push(PendingReady {
            node: *element,
            signal,
            marker,
        });
    }
}

/// The visibility observer handed out by [`HeadlessDocument`].
///
/// It records which elements are observed. Notifications are produced by the
/// caller, either directly or by [`queue`](Self::queue)ing them and draining
/// with [`take_records`](Self::take_records).
#[derive(Clone, Debug)]
pub struct HeadlessObserver {
    threshold: f64,
    observed: Vec<NodeId>,
    observe_calls: usize,
    queued: Vec<Intersection<NodeId>>,
}

impl HeadlessObserver {
    /// Returns the threshold the observer was created with.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns `true` if `node` is observed.
    #[must_use]
    pub fn is_observing(&self, node: NodeId) -> bool {
        self.observed.contains(&node)
    }

    /// Returns the observed elements.
    #[must_use]
    pub fn observed(&self) -> &[NodeId] {
        &self.observed
    }

    /// Returns how many times [`VisibilityObserver::observe`] was called.
    #[must_use]
    pub fn observe_calls(&self) -> usize {
        self.observe_calls
    }

    /// Queues a notification for `target` if it is observed.
    pub fn queue(&mut self, target: NodeId, ratio: f64) {
        if self.is_observing(target) {
            self.queued.push(Intersection { target, ratio });
        }
    }

    /// Drains the notifications queued so far.
    pub fn take_records(&mut self) -> Vec<Intersection<NodeId>> {
        core::mem::take(&mut self.queued)
    }
}

impl VisibilityObserver for HeadlessObserver {
    type Element = NodeId;

    fn observe(&mut self, target: &NodeId) {
        self.observe_calls += 1;
        if !self.observed.contains(target) {
            self.observed.push(*target);
        }
    }

    fn unobserve(&mut self, target: &NodeId) {
        self.observed.retain(|n| n != target);
    }

    fn disconnect(&mut self) {
        self.observed.clear();
        self.queued.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deferred_sources_are_in_document_order() {
        let mut doc = HeadlessDocument::new();
        let root = doc.element(doc.body(), "div", &[]);
        let a = doc.element(root, "img", &[("data-src", "a")]);
        let group = doc.element(root, "picture", &[("data-src", "group")]);
        let b = doc.element(group, "source", &[("data-src", "b")]);
        let _plain = doc.element(root, "img", &[("src", "plain")]);
        let c = doc.element(root, "img", &[("data-src", "c")]);

        assert_eq!(doc.deferred_sources(&root, "data-src"), [a, group, b, c]);
        assert!(doc.deferred_sources(&a, "data-src").is_empty());
    }

    #[test]
    fn append_child_moves_existing_children() {
        let mut doc = HeadlessDocument::new();
        let first = doc.element(doc.body(), "div", &[]);
        let second = doc.element(doc.body(), "div", &[]);
        let img = doc.element(first, "img", &[]);

        doc.append_child(second, img);
        assert!(doc.children(first).is_empty());
        assert_eq!(doc.children(second), [img]);
        assert_eq!(doc.parent(img), Some(second));
    }

    #[test]
    fn set_attribute_replaces_in_place() {
        let mut doc = HeadlessDocument::new();
        let img = doc.element(doc.body(), "img", &[("alt", "cat"), ("src", "old")]);

        doc.set_attribute(&img, "src", "new");
        doc.remove_attribute(&img, "missing");

        assert_eq!(doc.to_html(img), "<img alt=\"cat\" src=\"new\"></img>");
        assert_eq!(
            doc.mutations(),
            [Mutation::SetAttribute {
                node: img,
                name: "src".to_string(),
                value: "new".to_string(),
            }]
        );
    }

    #[test]
    fn dispatch_applies_matching_markers_once() {
        let mut doc = HeadlessDocument::new();
        let img = doc.element(doc.body(), "img", &[]);
        doc.add_class(&img, "is-loading");
        doc.on_ready_once(
            &img,
            ReadySignal::Load,
            ReadyMarker {
                add: "is-loaded".to_string(),
                remove: Some("is-loading".to_string()),
            },
        );

        assert!(!doc.dispatch(img, ReadySignal::CanPlayThrough));
        assert_eq!(doc.pending_ready(img), 1);
        assert!(doc.dispatch(img, ReadySignal::Load));
        assert_eq!(doc.pending_ready(img), 0);
        assert_eq!(doc.classes(img), ["is-loaded"]);
        assert!(!doc.dispatch(img, ReadySignal::Load));
    }

    #[test]
    fn to_html_serializes_subtree_with_classes() {
        let mut doc = HeadlessDocument::new();
        let figure = doc.element(doc.body(), "figure", &[]);
        let img = doc.element(figure, "img", &[("alt", "say \"hi\" & bye")]);
        doc.add_class(&img, "is-loading");

        assert_eq!(
            doc.to_html(figure),
            "<figure><img alt=\"say &quot;hi&quot; &amp; bye\" class=\"is-loading\"></img></figure>"
        );
    }

    #[test]
    fn observer_tracks_targets() {
        let mut doc = HeadlessDocument::new();
        let a = doc.element(doc.body(), "div", &[]);
        let b = doc.element(doc.body(), "div", &[]);
        let mut observer = doc.create_observer(0.25).unwrap();
        assert_eq!(doc.observers_created(), 1);

        observer.observe(&a);
        observer.observe(&b);
        observer.observe(&a);
        assert_eq!(observer.observed(), [a, b]);
        assert_eq!(observer.observe_calls(), 3);

        observer.unobserve(&a);
        assert!(!observer.is_observing(a));
        observer.disconnect();
        assert!(observer.observed().is_empty());
        assert_eq!(observer.threshold(), 0.25);
    }

    #[test]
    fn disconnect_discards_queued_notifications() {
        let mut doc = HeadlessDocument::new();
        let a = doc.element(doc.body(), "div", &[]);
        let b = doc.element(doc.body(), "div", &[]);
        let mut observer = doc.create_observer(0.0).unwrap();
        observer.observe(&a);

        observer.queue(a, 1.0);
        observer.queue(b, 1.0);
        assert_eq!(observer.take_records().len(), 1);
        assert!(observer.take_records().is_empty());

        observer.queue(a, 0.5);
        observer.disconnect();
        assert!(observer.take_records().is_empty());
    }

    #[test]
    fn observer_can_be_unsupported() {
        let mut doc = HeadlessDocument::without_observer();
        assert!(doc.create_observer(0.0).is_none());
        doc.set_observer_supported(true);
        assert!(doc.create_observer(0.0).is_some());
    }
}
