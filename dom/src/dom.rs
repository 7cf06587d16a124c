use crate::error::Result;
use crate::node::ElementSpec;
use crate::node::MutationRecord;
use crate::node::NodeId;
use crate::node::ObserveOptions;
use crate::node::ObserverId;

/// The slice of a host document the engine is allowed to touch.
///
/// Reads are unrestricted. Writes are limited to toggling classes and
/// attributes, and to inserting/removing elements; implementations report
/// every structural and attribute change to matching observers.
pub trait Dom {
    fn root(&self) -> NodeId;

    /// Whether the handle refers to an element known to this document,
    /// attached or not.
    fn contains(&self, node: NodeId) -> bool;

    fn is_connected(&self, node: NodeId) -> bool;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Descendants of `scope` (not `scope` itself) carrying `class`, in
    /// document order.
    fn query_all(&self, scope: NodeId, class: &str) -> Vec<NodeId>;

    /// The element's own text.
    fn text(&self, node: NodeId) -> String;

    fn set_text(&mut self, node: NodeId, text: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Adds or removes `class`. Returns whether anything changed.
    fn set_class(&mut self, node: NodeId, class: &str, on: bool) -> bool;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Open state of a disclosure element.
    fn is_open(&self, node: NodeId) -> bool;

    fn set_open(&mut self, node: NodeId, open: bool);

    fn create_element(&mut self, spec: ElementSpec) -> NodeId;

    /// Inserts `child` under `parent` before `reference`, or at the end when
    /// `reference` is `None`. An attached `child` is moved.
    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()>;

    /// Detaches `node` from its parent. Detached or unknown nodes are ignored.
    fn remove(&mut self, node: NodeId);

    /// Removes `node` and gives up every handle into its subtree. The
    /// document may release the nodes; later lookups treat them as unknown.
    fn discard(&mut self, node: NodeId) {
        self.remove(node);
    }

    /// Dispatches a user activation to `node` as the host would handle it.
    fn click(&mut self, node: NodeId);

    fn observe(&mut self, target: NodeId, options: ObserveOptions) -> ObserverId;

    fn disconnect(&mut self, observer: ObserverId);

    /// Records queued for `observer` since the last call.
    fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord>;

    fn pending_records(&self, observer: ObserverId) -> usize;

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert_before(parent, child, None)
    }

    fn query_first(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.query_all(scope, class).into_iter().next()
    }

    /// `node` itself or its nearest ancestor carrying `class`.
    fn closest(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if self.has_class(candidate, class) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// Trimmed text, the only identity host items have.
    fn label(&self, node: NodeId) -> String {
        self.text(node).trim().to_string()
    }
}
