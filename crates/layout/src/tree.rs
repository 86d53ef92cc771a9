//! The object tree: an arena owning every drawable of a report.
//!
//! Parents own their children through [`NodeId`] lists; a child refers back
//! to its parent through a plain id. Inherited sizes are resolved on every
//! read by walking up the parent chain, never cached.

use crate::error::{Axis, LayoutError};
use crate::object::Drawable;
use banded_types::{Extent, Position, Rect, Size, SizeSpec};
use std::fmt;
use std::ops::Index;

/// Absorbs float noise from unit conversions (e.g. `cm(0.3)`).
const TOLERANCE: f32 = 1e-4;

/// A handle to a node of an [`ObjectTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectTree {
    nodes: Vec<Drawable>,
}

impl ObjectTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves a detached object into the tree.
    pub fn insert(&mut self, mut object: Drawable) -> NodeId {
        object.parent = None;
        if let Some(container) = object.as_container_mut() {
            container.children.clear();
        }
        self.nodes.push(object);
        NodeId(self.nodes.len() - 1)
    }

    /// A tree rooted at a page container of `size` holding one empty band per
    /// name, in order: zero height, inherited width, at the origin. Empty
    /// bands fit any page, so they are attached without validation.
    pub fn with_bands<const N: usize>(
        size: impl Into<SizeSpec>,
        names: [&str; N],
    ) -> (Self, NodeId, [NodeId; N]) {
        let mut tree = Self::new();
        let root = tree.insert(Drawable::container(size));
        let bands = names.map(|name| {
            let id = tree.insert(Drawable::section(name, (-1.0, 0.0)));
            tree.nodes[id.0].parent = Some(root);
            id
        });
        if let Some(container) = tree.nodes[root.0].as_container_mut() {
            container.children.extend(bands);
        }
        (tree, root, bands)
    }

    pub fn get(&self, id: NodeId) -> Option<&Drawable> {
        self.nodes.get(id.0)
    }

    /// Mutable access for non-geometric properties (colors, text, fonts).
    /// Geometry is only changed through the validating setters.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Drawable> {
        self.nodes.get_mut(id.0)
    }

    fn checked(&self, id: NodeId) -> Result<&Drawable, LayoutError> {
        self.nodes.get(id.0).ok_or(LayoutError::UnknownNode(id.0))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Drawable::parent)
    }

    /// Children in draw order; empty for leaves.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .and_then(Drawable::as_container)
            .map(|c| c.children())
            .unwrap_or(&[])
    }

    /// The current resolved size, substituting inherited components with the
    /// parent's resolved size (recursively). Detached objects resolve an
    /// inherited component to `0`.
    pub fn resolved_size(&self, id: NodeId) -> Size {
        let Some(node) = self.get(id) else {
            return Size::zero();
        };
        let parent = node.parent.map(|p| self.resolved_size(p));
        node.size.resolve(parent)
    }

    pub fn width(&self, id: NodeId) -> f32 {
        self.resolved_size(id).width
    }

    pub fn height(&self, id: NodeId) -> f32 {
        self.resolved_size(id).height
    }

    pub fn position(&self, id: NodeId) -> Position {
        self.get(id).map(Drawable::position).unwrap_or_default()
    }

    /// Position relative to the root of the node's tree.
    pub fn absolute_position(&self, id: NodeId) -> Position {
        let mut position = Position::origin();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.get(c)) {
            position = position + node.position;
            current = node.parent;
        }
        position
    }

    /// The node's absolute frame.
    pub fn frame(&self, id: NodeId) -> Rect {
        Rect::new(self.absolute_position(id), self.resolved_size(id))
    }

    pub fn is_ancestor(&self, ancestor: NodeId, of: NodeId) -> bool {
        let mut current = self.parent(of);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// `<Kind> size (w, h), pos (x, y)` with resolved numbers.
    pub fn describe(&self, id: NodeId) -> String {
        match self.get(id) {
            Some(node) => format!(
                "<{}> size {}, pos {}",
                node.label(),
                self.resolved_size(id),
                node.position
            ),
            None => format!("<unknown node {}>", id),
        }
    }

    /// Checks that `child`, placed at `position` with declared size `size`,
    /// fits inside `parent` on both axes.
    fn check_fit(
        &self,
        child: NodeId,
        size: SizeSpec,
        position: Position,
        parent: NodeId,
    ) -> Result<(), LayoutError> {
        let bounds = self.resolved_size(parent);
        let extent = size.resolve(Some(bounds));
        let checks = [
            (Axis::Horizontal, position.x, extent.width, bounds.width),
            (Axis::Vertical, position.y, extent.height, bounds.height),
        ];
        for (axis, offset, extent, parent_bound) in checks {
            if offset + extent > parent_bound + TOLERANCE {
                return Err(LayoutError::Containment {
                    object: self.describe(child),
                    axis,
                    parent_bound,
                    offset,
                    extent,
                });
            }
        }
        Ok(())
    }

    /// Verifies that `child`'s current position plus resolved size lies
    /// within `parent`'s resolved size.
    pub fn validate_containment(&self, child: NodeId, parent: NodeId) -> Result<(), LayoutError> {
        let node = self.checked(child)?;
        self.checked(parent)?;
        self.check_fit(child, node.size, node.position, parent)
    }

    /// Validates `id` against its parent (if any) and every descendant
    /// against its own parent.
    fn validate_subtree(&self, id: NodeId) -> Result<(), LayoutError> {
        if let Some(parent) = self.parent(id) {
            self.validate_containment(id, parent)?;
        }
        let mut pending: Vec<NodeId> = self.children(id).to_vec();
        while let Some(child) = pending.pop() {
            if let Some(parent) = self.parent(child) {
                self.validate_containment(child, parent)?;
            }
            pending.extend_from_slice(self.children(child));
        }
        Ok(())
    }

    /// Places `child` inside `parent` at `position`.
    ///
    /// On failure nothing changes: the child stays detached and the parent's
    /// child list is untouched.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        position: impl Into<Position>,
        child: NodeId,
    ) -> Result<(), LayoutError> {
        let position = position.into();
        let parent_node = self.checked(parent)?;
        if parent_node.as_container().is_none() {
            return Err(LayoutError::NotAContainer(self.describe(parent)));
        }
        let child_node = self.checked(child)?;
        if child_node.parent.is_some() {
            return Err(LayoutError::AlreadyAttached(self.describe(child)));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(LayoutError::Cycle(self.describe(child)));
        }
        self.check_fit(child, child_node.size, position, parent)?;

        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.position = position;

        // Descendants that inherit may have grown with the new parent.
        if let Err(err) = self.validate_subtree(child) {
            let node = &mut self.nodes[child.0];
            node.parent = None;
            node.position = Position::origin();
            return Err(err);
        }
        if let Some(container) = self.nodes[parent.0].as_container_mut() {
            container.children.push(child);
        }
        log::trace!("Attached {} to {}", self.describe(child), self.describe(parent));
        Ok(())
    }

    /// Applies a geometry change, rolling it back if validation fails.
    fn mutate_geometry<F>(&mut self, id: NodeId, change: F) -> Result<(), LayoutError>
    where
        F: FnOnce(&mut Drawable),
    {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or(LayoutError::UnknownNode(id.0))?;
        let (old_size, old_position) = (node.size, node.position);
        change(node);

        if let Err(err) = self.validate_subtree(id) {
            let node = &mut self.nodes[id.0];
            node.size = old_size;
            node.position = old_position;
            return Err(err);
        }
        Ok(())
    }

    pub fn set_size(&mut self, id: NodeId, size: impl Into<SizeSpec>) -> Result<(), LayoutError> {
        let size = size.into();
        self.mutate_geometry(id, |node| node.size = size)
    }

    pub fn set_width(&mut self, id: NodeId, width: impl Into<Extent>) -> Result<(), LayoutError> {
        let width = width.into();
        self.mutate_geometry(id, |node| node.size.width = width)
    }

    pub fn set_height(&mut self, id: NodeId, height: impl Into<Extent>) -> Result<(), LayoutError> {
        let height = height.into();
        self.mutate_geometry(id, |node| node.size.height = height)
    }

    pub fn set_position(
        &mut self,
        id: NodeId,
        position: impl Into<Position>,
    ) -> Result<(), LayoutError> {
        let position = position.into();
        self.mutate_geometry(id, |node| node.position = position)
    }

    pub fn set_x(&mut self, id: NodeId, x: f32) -> Result<(), LayoutError> {
        self.mutate_geometry(id, |node| node.position.x = x)
    }

    pub fn set_y(&mut self, id: NodeId, y: f32) -> Result<(), LayoutError> {
        self.mutate_geometry(id, |node| node.position.y = y)
    }
}

impl Index<NodeId> for ObjectTree {
    type Output = Drawable;

    /// # Panics
    ///
    /// Panics if `id` was issued by a different tree.
    fn index(&self, id: NodeId) -> &Drawable {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_band() -> (ObjectTree, NodeId, NodeId) {
        let mut tree = ObjectTree::new();
        let page = tree.insert(Drawable::container((210.0, 297.0)));
        let band = tree.insert(Drawable::section("body", (-1.0, 20.0)));
        tree.add_child(page, (0.0, 0.0), band).unwrap();
        (tree, page, band)
    }

    #[test]
    fn test_with_bands_attaches_empty_bands_in_order() {
        let (mut tree, page, [header, body]) =
            ObjectTree::with_bands((210.0, 297.0), ["header", "body"]);

        assert_eq!(tree.children(page), &[header, body]);
        assert_eq!(tree.parent(body), Some(page));
        assert_eq!(tree.resolved_size(body), Size::new(210.0, 0.0));
        // Attached bands are validated from then on.
        tree.set_height(body, 20.0).unwrap();
        assert!(tree.set_height(header, 300.0).is_err());
    }

    #[test]
    fn test_add_child_sets_parent_and_position() {
        let (mut tree, _, band) = page_with_band();
        let text = tree.insert(Drawable::text((30.0, 5.0), "row"));
        tree.add_child(band, (10.0, 2.0), text).unwrap();

        assert_eq!(tree.parent(text), Some(band));
        assert_eq!(tree.position(text), Position::new(10.0, 2.0));
        assert_eq!(tree.children(band), &[text]);
    }

    #[test]
    fn test_add_child_rejects_overflow_and_leaves_parent_unchanged() {
        let (mut tree, _, band) = page_with_band();
        let text = tree.insert(Drawable::text((30.0, 5.0), "row"));
        let err = tree.add_child(band, (190.0, 0.0), text).unwrap_err();

        match err {
            LayoutError::Containment {
                axis,
                parent_bound,
                offset,
                extent,
                ref object,
            } => {
                assert_eq!(axis, Axis::Horizontal);
                assert_eq!(parent_bound, 210.0);
                assert_eq!(offset, 190.0);
                assert_eq!(extent, 30.0);
                assert!(object.contains("Text 'row'"));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(tree.children(band).is_empty());
        assert_eq!(tree.parent(text), None);
        assert!(err.to_string().contains("exceeds parent's width"));
    }

    #[test]
    fn test_inherited_width_tracks_parent_resize() {
        let (mut tree, page, band) = page_with_band();
        let line = tree.insert(Drawable::hline(-1.0));
        // Detached: inherited width resolves to zero.
        assert_eq!(tree.width(line), 0.0);

        tree.add_child(band, (0.0, 0.0), line).unwrap();
        assert_eq!(tree.width(line), 210.0);

        tree.set_width(page, 180.0).unwrap();
        assert_eq!(tree.width(band), 180.0);
        assert_eq!(tree.width(line), 180.0);
    }

    #[test]
    fn test_mutation_is_validated_and_rolled_back() {
        let (mut tree, page, band) = page_with_band();
        assert!(tree.set_y(band, 290.0).is_err());
        assert_eq!(tree.position(band).y, 0.0);

        assert!(tree.set_height(band, 300.0).is_err());
        assert_eq!(tree.height(band), 20.0);

        // Shrinking a parent below a fixed child is rejected too.
        let text = tree.insert(Drawable::text((100.0, 10.0), "row"));
        tree.add_child(band, (0.0, 0.0), text).unwrap();
        assert!(tree.set_height(band, 5.0).is_err());
        assert!(tree.set_width(page, 50.0).is_err());
        assert_eq!(tree.width(page), 210.0);

        tree.set_y(band, 277.0).unwrap();
        assert_eq!(tree.frame(band), Rect::new(Position::new(0.0, 277.0), Size::new(210.0, 20.0)));
    }

    #[test]
    fn test_detached_mutation_only_stores() {
        let mut tree = ObjectTree::new();
        let text = tree.insert(Drawable::text((10.0, 5.0), "1"));
        tree.set_size(text, (5000.0, 5000.0)).unwrap();
        assert_eq!(tree.resolved_size(text), Size::new(5000.0, 5000.0));
    }

    #[test]
    fn test_structural_errors() {
        let (mut tree, page, band) = page_with_band();
        let text = tree.insert(Drawable::text((10.0, 5.0), "1"));
        let other = tree.insert(Drawable::text((10.0, 5.0), "2"));
        tree.add_child(band, (0.0, 0.0), text).unwrap();

        assert!(matches!(
            tree.add_child(text, (0.0, 0.0), other),
            Err(LayoutError::NotAContainer(_))
        ));
        assert!(matches!(
            tree.add_child(page, (0.0, 0.0), text),
            Err(LayoutError::AlreadyAttached(_))
        ));

        let inner = tree.insert(Drawable::container((10.0, 10.0)));
        tree.add_child(band, (0.0, 0.0), inner).unwrap();
        let detached_root = tree.insert(Drawable::container((300.0, 300.0)));
        assert!(matches!(
            tree.add_child(detached_root, (0.0, 0.0), detached_root),
            Err(LayoutError::Cycle(_))
        ));
    }

    #[test]
    fn test_absolute_frames_accumulate() {
        let (mut tree, page, band) = page_with_band();
        tree.set_y(band, 40.0).unwrap();
        let text = tree.insert(Drawable::text((30.0, 5.0), "row"));
        tree.add_child(band, (12.0, 3.0), text).unwrap();
        assert_eq!(tree.absolute_position(text), Position::new(12.0, 43.0));
        assert_eq!(tree.absolute_position(page), Position::origin());
        assert!(tree.is_ancestor(page, text));
    }
}
