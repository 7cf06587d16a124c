use crate::dom::Dom;
use crate::error::DomError;
use crate::error::Result;
use crate::host;
use crate::node::ElementSpec;
use crate::node::MutationKind;
use crate::node::MutationRecord;
use crate::node::NodeId;
use crate::node::ObserveOptions;
use crate::node::ObserverId;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    classes: BTreeSet<String>,
    text: String,
    attributes: BTreeMap<String, String>,
    open: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn from_spec(spec: ElementSpec) -> Self {
        Self {
            tag: spec.tag,
            classes: spec.classes.into_iter().collect(),
            text: spec.text,
            attributes: spec.attributes.into_iter().collect(),
            open: false,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct Observer {
    target: NodeId,
    options: ObserveOptions,
    pending: Vec<MutationRecord>,
}

/// Arena-backed document that behaves like the host's.
///
/// Removing a node only detaches it, so stale handles stay valid for lookups
/// the way detached DOM nodes do. [`Dom::discard`] frees a subtree for good;
/// ids are never handed out twice.
#[derive(Debug)]
pub struct MemoryDom {
    nodes: BTreeMap<NodeId, Element>,
    next_id: usize,
    observers: Vec<Option<Observer>>,
    activations: Vec<NodeId>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::from([(NodeId(0), Element::from_spec(ElementSpec::new("body")))]),
            next_id: 1,
            observers: Vec::new(),
            activations: Vec::new(),
        }
    }

    /// Every node the host activated, oldest first.
    pub fn activations(&self) -> &[NodeId] {
        &self.activations
    }

    pub fn last_activation(&self) -> Option<NodeId> {
        self.activations.last().copied()
    }

    /// Elements currently held, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.get(node).map(|element| element.tag.as_str())
    }

    fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(&node)
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(&node)
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.get(candidate).and_then(|element| element.parent);
        }
        false
    }

    fn collect_descendants(&self, scope: NodeId, class: &str, out: &mut Vec<NodeId>) {
        let Some(element) = self.get(scope) else {
            return;
        };
        for &child in &element.children {
            if self.has_class(child, class) {
                out.push(child);
            }
            self.collect_descendants(child, class, out);
        }
    }

    fn notify(&mut self, record: MutationRecord) {
        let wanted: Vec<usize> = self
            .observers
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let observer = slot.as_ref()?;
                let kind_enabled = match record.kind {
                    MutationKind::ChildList { .. } => observer.options.child_list,
                    MutationKind::Attributes { .. } => observer.options.attributes,
                };
                let in_scope = record.target == observer.target
                    || (observer.options.subtree
                        && self.is_inclusive_ancestor(observer.target, record.target));
                (kind_enabled && in_scope).then_some(idx)
            })
            .collect();
        for idx in wanted {
            if let Some(Some(observer)) = self.observers.get_mut(idx) {
                observer.pending.push(record.clone());
            }
        }
    }

    fn detach(&mut self, node: NodeId) -> Option<NodeId> {
        let parent = self.get(node)?.parent?;
        if let Some(parent_element) = self.get_mut(parent) {
            parent_element.children.retain(|&child| child != node);
        }
        if let Some(element) = self.get_mut(node) {
            element.parent = None;
        }
        Some(parent)
    }
}

impl Dom for MemoryDom {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.contains(node) && self.is_inclusive_ancestor(self.root(), node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|element| element.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.get(node)
            .map(|element| element.children.clone())
            .unwrap_or_default()
    }

    fn query_all(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(scope, class, &mut out);
        out
    }

    fn text(&self, node: NodeId) -> String {
        self.get(node)
            .map(|element| element.text.clone())
            .unwrap_or_default()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        let Some(element) = self.get_mut(node) else {
            return;
        };
        if element.text == text {
            return;
        }
        element.text = text.to_string();
        self.notify(MutationRecord {
            target: node,
            kind: MutationKind::ChildList {
                added: Vec::new(),
                removed: Vec::new(),
            },
        });
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node)
            .is_some_and(|element| element.classes.contains(class))
    }

    fn set_class(&mut self, node: NodeId, class: &str, on: bool) -> bool {
        let Some(element) = self.get_mut(node) else {
            return false;
        };
        let changed = if on {
            element.classes.insert(class.to_string())
        } else {
            element.classes.remove(class)
        };
        if changed {
            self.notify(MutationRecord {
                target: node,
                kind: MutationKind::Attributes {
                    name: "class".to_string(),
                },
            });
        }
        changed
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.get(node)
            .and_then(|element| element.attributes.get(name).cloned())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(element) = self.get_mut(node) else {
            return;
        };
        if element.attributes.get(name).map(String::as_str) == Some(value) {
            return;
        }
        element
            .attributes
            .insert(name.to_string(), value.to_string());
        self.notify(MutationRecord {
            target: node,
            kind: MutationKind::Attributes {
                name: name.to_string(),
            },
        });
    }

    fn is_open(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|element| element.open)
    }

    fn set_open(&mut self, node: NodeId, open: bool) {
        let Some(element) = self.get_mut(node) else {
            return;
        };
        if element.open == open {
            return;
        }
        element.open = open;
        self.notify(MutationRecord {
            target: node,
            kind: MutationKind::Attributes {
                name: "open".to_string(),
            },
        });
    }

    fn create_element(&mut self, spec: ElementSpec) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Element::from_spec(spec));
        id
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        if !self.contains(parent) {
            return Err(DomError::UnknownNode(parent));
        }
        if !self.contains(child) {
            return Err(DomError::UnknownNode(child));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if let Some(reference) = reference
            && self.parent(reference) != Some(parent)
        {
            return Err(DomError::NotAChild { parent, reference });
        }

        if let Some(old_parent) = self.detach(child) {
            self.notify(MutationRecord {
                target: old_parent,
                kind: MutationKind::ChildList {
                    added: Vec::new(),
                    removed: vec![child],
                },
            });
        }

        let Some(parent_element) = self.get_mut(parent) else {
            return Err(DomError::UnknownNode(parent));
        };
        let position = reference
            .and_then(|reference| {
                parent_element
                    .children
                    .iter()
                    .position(|&existing| existing == reference)
            })
            .unwrap_or(parent_element.children.len());
        parent_element.children.insert(position, child);
        if let Some(element) = self.get_mut(child) {
            element.parent = Some(parent);
        }
        self.notify(MutationRecord {
            target: parent,
            kind: MutationKind::ChildList {
                added: vec![child],
                removed: Vec::new(),
            },
        });
        Ok(())
    }

    fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.detach(node) {
            self.notify(MutationRecord {
                target: parent,
                kind: MutationKind::ChildList {
                    added: Vec::new(),
                    removed: vec![node],
                },
            });
        }
    }

    fn discard(&mut self, node: NodeId) {
        if node == self.root() {
            return;
        }
        self.remove(node);
        let mut pending = vec![node];
        while let Some(next) = pending.pop() {
            if let Some(element) = self.nodes.remove(&next) {
                pending.extend(element.children);
            }
        }
    }

    fn click(&mut self, node: NodeId) {
        if !self.contains(node) {
            return;
        }
        // The host moves its selection highlight to an activated tab.
        if self.has_class(node, host::NAV_ITEM) {
            for item in self.query_all(self.root(), host::NAV_ITEM) {
                if item != node {
                    self.set_class(item, host::ACTIVE, false);
                }
            }
            self.set_class(node, host::ACTIVE, true);
        }
        debug!(node = %node, "host activation");
        self.activations.push(node);
    }

    fn observe(&mut self, target: NodeId, options: ObserveOptions) -> ObserverId {
        let id = ObserverId(self.observers.len());
        self.observers.push(Some(Observer {
            target,
            options,
            pending: Vec::new(),
        }));
        id
    }

    fn disconnect(&mut self, observer: ObserverId) {
        if let Some(slot) = self.observers.get_mut(observer.0) {
            *slot = None;
        }
    }

    fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        match self.observers.get_mut(observer.0) {
            Some(Some(observer)) => std::mem::take(&mut observer.pending),
            _ => Vec::new(),
        }
    }

    fn pending_records(&self, observer: ObserverId) -> usize {
        match self.observers.get(observer.0) {
            Some(Some(observer)) => observer.pending.len(),
            _ => 0,
        }
    }
}
