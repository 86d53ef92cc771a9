use std::fmt;
use thiserror::Error;

/// The axis a containment check failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "width"),
            Axis::Vertical => write!(f, "height"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Child {object} exceeds parent's {axis} (parent: {parent_bound}, child: {offset} + {extent})")]
    Containment {
        object: String,
        axis: Axis,
        parent_bound: f32,
        offset: f32,
        extent: f32,
    },

    #[error("Band '{band}' has a height of {height:.2} which exceeds the usable page height of {available:.2}")]
    BandTooTall {
        band: String,
        height: f32,
        available: f32,
    },

    #[error("Unknown page size '{0}'")]
    UnknownPageSize(String),

    #[error("Invalid page size {width} x {height}: both dimensions must be positive")]
    InvalidPageSize { width: f32, height: f32 },

    #[error("Object {0} is not a container and cannot hold children")]
    NotAContainer(String),

    #[error("Object {0} already has a parent")]
    AlreadyAttached(String),

    #[error("Adding {0} would make it its own ancestor")]
    Cycle(String),

    #[error("Node {0} does not belong to this object tree")]
    UnknownNode(usize),
}
