use slotmap::SlotMap;
use trellis_geom::{Point, Rect};

use crate::core::{
    builder::NodeBuilder,
    error::{Error, Result},
    id::NodeId,
    node::Node,
};

/// The node arena. Children lists are the owning edges; parent links are
/// back-references kept in step with them.
#[derive(Debug)]
pub struct Tree {
    /// Node storage.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// The root node.
    pub(crate) root: NodeId,
}

impl Tree {
    /// Build a tree from a root description.
    pub fn new(root: NodeBuilder) -> Self {
        let mut tree = Self {
            nodes: SlotMap::with_key(),
            root: NodeId::default(),
        };
        tree.root = tree.insert(root);
        tree
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the arena is empty. A constructed tree always holds its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Look up a node, failing with `NodeNotFound`.
    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Look up a node mutably, failing with `NodeNotFound`.
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// The parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// The children of a node; empty for unknown nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Create a detached subtree from a description, returning its root.
    pub fn insert(&mut self, builder: NodeBuilder) -> NodeId {
        let NodeBuilder {
            kind,
            config,
            pos,
            content,
            pinned,
            handlers,
            children,
        } = builder;
        let id = self.nodes.insert(Node {
            kind,
            config,
            handlers,
            parent: None,
            children: Vec::with_capacity(children.len()),
            pos,
            content,
            size: content,
            pinned,
            hovered: false,
            focused: false,
            is_dirty: true,
        });
        for child in children {
            let cid = self.insert(child);
            self.link(id, cid);
        }
        id
    }

    /// Append both sides of a parent/child edge.
    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
    }

    /// Is `ancestor` equal to `node` or above it?
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(parent)?;
        self.get(child)?;
        if child == self.root {
            return Err(Error::InvalidOperation("cannot attach the root".into()));
        }
        if self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }
        self.detach(child)?;
        self.link(parent, child);
        Ok(())
    }

    /// Unlink a node from its parent. Detaching a parentless node is a no-op.
    pub fn detach(&mut self, child: NodeId) -> Result<()> {
        let Some(parent) = self.get(child)?.parent else {
            return Ok(());
        };
        self.get_mut(parent)?.children.retain(|c| *c != child);
        self.get_mut(child)?.parent = None;
        Ok(())
    }

    /// Pre-order list of a subtree.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let Some(node) = self.nodes.get(n) else {
                continue;
            };
            out.push(n);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Unlink a subtree and free its nodes, returning the freed IDs.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        if id == self.root {
            return Err(Error::InvalidOperation("cannot remove the root".into()));
        }
        self.detach(id)?;
        let removed = self.descendants(id);
        for n in &removed {
            self.nodes.remove(*n);
        }
        Ok(removed)
    }

    /// Does the node's padded box, in its own frame, contain `p`?
    pub fn contains_point(&self, id: NodeId, p: Point) -> bool {
        self.nodes.get(id).is_some_and(|n| {
            Rect::new(0.0, 0.0, n.size.w, n.size.h).contains_point(p)
        })
    }

    /// The deepest node under `p`, given in `id`'s frame, and `p` in that
    /// node's frame. Children are tested in order and the first hit wins.
    pub fn child_under(&self, id: NodeId, p: Point) -> Option<(NodeId, Point)> {
        if !self.contains_point(id, p) {
            return None;
        }
        for c in self.children(id) {
            let Some(child) = self.nodes.get(*c) else {
                continue;
            };
            if let Some(hit) = self.child_under(*c, p - child.pos) {
                return Some(hit);
            }
        }
        Some((id, p))
    }

    /// Translate `p` from `id`'s frame to screen coordinates.
    pub fn to_screen_point(&self, id: NodeId, p: Point) -> Point {
        let mut out = p;
        let mut current = Some(id);
        while let Some(n) = current {
            let Some(node) = self.nodes.get(n) else {
                break;
            };
            out = out + node.pos;
            current = node.parent;
        }
        out
    }

    /// Set the pinned flag.
    pub fn set_pinned(&mut self, id: NodeId, pinned: bool) -> Result<()> {
        self.get_mut(id)?.pinned = pinned;
        Ok(())
    }

    /// Move a node to the end of its parent's child list, so it paints last
    /// among its peers.
    pub fn bring_to_front(&mut self, id: NodeId) -> Result<()> {
        let Some(parent) = self.get(id)?.parent else {
            return Ok(());
        };
        let children = &mut self.get_mut(parent)?.children;
        children.retain(|c| *c != id);
        children.push(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::NodeBuilder as B;

    /// A root at the origin with two sized siblings.
    fn siblings() -> (Tree, NodeId, NodeId) {
        let mut tree = Tree::new(B::boxed().content(40.0, 10.0));
        let root = tree.root();
        let a = tree.insert(B::space(10.0, 10.0));
        let b = tree.insert(B::space(10.0, 10.0).at(20.0, 0.0));
        tree.add(root, a).unwrap();
        tree.add(root, b).unwrap();
        (tree, a, b)
    }

    #[test]
    fn hit_testing() {
        let (tree, a, b) = siblings();
        let root = tree.root();
        assert_eq!(
            tree.child_under(root, Point::new(5.0, 5.0)),
            Some((a, Point::new(5.0, 5.0)))
        );
        assert_eq!(
            tree.child_under(root, Point::new(25.0, 5.0)),
            Some((b, Point::new(5.0, 5.0)))
        );
        assert_eq!(
            tree.child_under(root, Point::new(15.0, 5.0)),
            Some((root, Point::new(15.0, 5.0)))
        );
        assert_eq!(tree.child_under(root, Point::new(50.0, 5.0)), None);
        assert_eq!(tree.child_under(b, Point::new(-1.0, 0.0)), None);
    }

    #[test]
    fn first_match_wins() {
        let mut tree = Tree::new(B::boxed().content(20.0, 20.0));
        let root = tree.root();
        let under = tree.insert(B::space(10.0, 10.0));
        let over = tree.insert(B::space(10.0, 10.0).pinned(true));
        tree.add(root, under).unwrap();
        tree.add(root, over).unwrap();
        assert_eq!(tree.child_under(root, Point::new(1.0, 1.0)).unwrap().0, under);
        tree.bring_to_front(under).unwrap();
        assert_eq!(tree.children(root), &[over, under]);
        assert_eq!(tree.child_under(root, Point::new(1.0, 1.0)).unwrap().0, over);
    }

    #[test]
    fn screen_points() {
        let mut tree = Tree::new(B::boxed().at(1.0, 2.0));
        let root = tree.root();
        let mid = tree.insert(B::boxed().at(10.0, 20.0));
        let leaf = tree.insert(B::boxed().at(100.0, 200.0));
        tree.add(root, mid).unwrap();
        tree.add(mid, leaf).unwrap();
        assert_eq!(
            tree.to_screen_point(leaf, Point::new(3.0, 4.0)),
            Point::new(114.0, 226.0)
        );
        assert_eq!(tree.to_screen_point(root, Point::zero()), Point::new(1.0, 2.0));
    }

    #[test]
    fn add_moves_between_parents() -> Result<()> {
        let mut tree = Tree::new(B::vstack());
        let root = tree.root();
        let left = tree.insert(B::boxed());
        let right = tree.insert(B::boxed());
        let leaf = tree.insert(B::boxed());
        tree.add(root, left)?;
        tree.add(root, right)?;
        tree.add(left, leaf)?;
        tree.add(right, leaf)?;
        assert!(tree.children(left).is_empty());
        assert_eq!(tree.children(right), &[leaf]);
        assert_eq!(tree.parent(leaf), Some(right));
        Ok(())
    }

    #[test]
    fn cycles_rejected() -> Result<()> {
        let mut tree = Tree::new(B::vstack());
        let root = tree.root();
        let mid = tree.insert(B::boxed());
        let leaf = tree.insert(B::boxed());
        tree.add(root, mid)?;
        tree.add(mid, leaf)?;
        assert_eq!(
            tree.add(leaf, mid),
            Err(Error::WouldCreateCycle {
                parent: leaf,
                child: mid
            })
        );
        assert!(matches!(
            tree.add(mid, mid),
            Err(Error::WouldCreateCycle { .. })
        ));
        assert!(matches!(
            tree.add(mid, root),
            Err(Error::InvalidOperation(_))
        ));
        assert_eq!(tree.parent(mid), Some(root));
        assert_eq!(tree.parent(leaf), Some(mid));
        Ok(())
    }

    #[test]
    fn remove() -> Result<()> {
        let mut tree = Tree::new(B::vstack().child(B::boxed().child(B::boxed())));
        let root = tree.root();
        let mid = tree.children(root)[0];
        let leaf = tree.children(mid)[0];
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.remove_subtree(mid)?, vec![mid, leaf]);
        assert_eq!(tree.len(), 1);
        assert!(tree.children(root).is_empty());
        assert!(tree.node(leaf).is_none());
        assert!(matches!(
            tree.remove_subtree(root),
            Err(Error::InvalidOperation(_))
        ));
        assert_eq!(tree.detach(leaf), Err(Error::NodeNotFound(leaf)));
        Ok(())
    }

    proptest! {
        #[test]
        fn parent_links_consistent(ops in prop::collection::vec((0usize..8, 0usize..8), 0..40)) {
            let mut tree = Tree::new(B::vstack());
            let mut ids = vec![tree.root()];
            for _ in 0..7 {
                let id = tree.insert(B::boxed());
                ids.push(id);
            }
            for (p, c) in ops {
                if let Err(e) = tree.add(ids[p], ids[c]) {
                    let expected =
                        matches!(e, Error::WouldCreateCycle { .. } | Error::InvalidOperation(_));
                    prop_assert!(expected, "unexpected error: {}", e);
                }
            }
            for id in &ids {
                for c in tree.children(*id) {
                    prop_assert_eq!(tree.parent(*c), Some(*id));
                }
                if let Some(p) = tree.parent(*id) {
                    prop_assert_eq!(
                        tree.children(p).iter().filter(|c| *c == id).count(),
                        1
                    );
                }
                prop_assert!(tree.parent(tree.root()).is_none());
            }
        }
    }
}
