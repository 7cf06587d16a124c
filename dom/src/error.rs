use crate::node::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("cannot insert {child} under its own descendant {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("{reference} is not a child of {parent}")]
    NotAChild { parent: NodeId, reference: NodeId },

    #[error("invalid layout: {0}")]
    Layout(#[from] toml::de::Error),

    #[error("section not found: {0}")]
    SectionNotFound(String),
}

pub type Result<T> = std::result::Result<T, DomError>;
