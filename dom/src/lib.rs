/*!
# navgroup-dom

The host document the grouping engine runs against.

The host application owns its navigation sidebar and re-renders it whenever it
likes. The engine only sees it through the [`Dom`] trait: element lookup by
class, class toggling, insertion/removal of its own nodes, and a mutation
observer that hands out recorded changes in batches.

[`MemoryDom`] is an arena-backed implementation that behaves like the host
(clicking a nav item moves the active highlight, records queue up until they
are taken). [`layout`] builds a host-shaped sidebar from a TOML description.

```text
div.vertical-tab-header
  div.vertical-tab-header-group
    div.vertical-tab-header-group-title   "Community plugins"
    div.vertical-tab-header-group-items
      div.vertical-tab-nav-item           "Calendar"
      div.vertical-tab-nav-item.is-active "Dataview"
```
*/

mod dom;
mod error;
pub mod host;
pub mod layout;
mod memory;
mod node;

pub use dom::Dom;
pub use error::DomError;
pub use error::Result;
pub use memory::MemoryDom;
pub use node::ElementSpec;
pub use node::MutationKind;
pub use node::MutationRecord;
pub use node::NodeId;
pub use node::ObserveOptions;
pub use node::ObserverId;
