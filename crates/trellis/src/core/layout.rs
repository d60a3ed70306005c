//! Two-phase layout: a bottom-up measure pass that computes content sizes
//! and a top-down pack pass that assigns positions and padded sizes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use trellis_geom::{Axis, Point, Size};

use crate::{
    core::{
        backend::Metrics,
        error::{Error, Result},
        id::NodeId,
        node::NodeKind,
        tree::Tree,
    },
    widgets::{button, label},
};

/// Sizing along the parent stack's major axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OnAxis {
    /// Use the measured size.
    #[default]
    Normal,
    /// Take an even share of the space left over after other siblings.
    Fill,
    /// Take this percentage of the space remaining when the node is reached.
    Percent(f64),
}

impl FromStr for OnAxis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "normal" => Ok(Self::Normal),
            "fill" => Ok(Self::Fill),
            other => {
                let Some(num) = other.strip_suffix('%') else {
                    return Err(Error::parse(format!("invalid on-axis sizing: {other:?}")));
                };
                let p: f64 = num
                    .trim()
                    .parse()
                    .map_err(|_| Error::parse(format!("invalid percentage: {other:?}")))?;
                if !p.is_finite() || p < 0.0 {
                    return Err(Error::parse(format!("invalid percentage: {other:?}")));
                }
                Ok(Self::Percent(p))
            }
        }
    }
}

impl fmt::Display for OnAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Fill => write!(f, "fill"),
            Self::Percent(p) => write!(f, "{p}%"),
        }
    }
}

impl TryFrom<String> for OnAxis {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<OnAxis> for String {
    fn from(v: OnAxis) -> Self {
        v.to_string()
    }
}

/// Alignment along the parent stack's minor axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffAxis {
    /// Flush with the leading edge.
    #[default]
    Start,
    /// Centered in the available space.
    Center,
    /// Flush with the trailing edge.
    End,
    /// Stretched to the available space.
    Fill,
}

impl FromStr for OffAxis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "start" => Ok(Self::Start),
            "center" => Ok(Self::Center),
            "end" => Ok(Self::End),
            "fill" => Ok(Self::Fill),
            other => Err(Error::parse(format!("invalid off-axis alignment: {other:?}"))),
        }
    }
}

/// Stack arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackLayout {
    /// The major axis.
    pub direction: Axis,
    /// Spread leftover space between children when none fill.
    pub justify: bool,
}

/// Result of the share pass over a stack's children.
#[derive(Debug, Clone, PartialEq)]
struct Shares {
    /// Major-axis size of each fill child, including its border and margin.
    fill: f64,
    /// Extra spacing after each child when justifying.
    gap: f64,
    /// Resolved major-axis size of each percent child, by position.
    percent: Vec<Option<f64>>,
}

/// A layout pass over a tree.
pub struct LayoutPass<'a> {
    /// The tree being laid out.
    tree: &'a mut Tree,
    /// Font resolution for text measurement.
    metrics: Metrics<'a>,
}

impl<'a> LayoutPass<'a> {
    /// Start a pass.
    pub fn new(tree: &'a mut Tree, metrics: Metrics<'a>) -> Self {
        Self { tree, metrics }
    }

    /// Measure `id` and its subtree, returning the content size of `id`.
    pub fn measure(&mut self, id: NodeId) -> Result<Size> {
        let children = self.tree.get(id)?.children.clone();
        for c in &children {
            self.measure(*c)?;
        }
        let node = self.tree.get(id)?;
        let content = match &node.kind {
            NodeKind::Box | NodeKind::Debug => node.content,
            NodeKind::Stack(stack) => {
                let pad = Size::new(node.config.pad_x, node.config.pad_y);
                self.stack_content(stack.direction, pad, &children)?
            }
            NodeKind::Label(state) => {
                let font = self.metrics.font_for(&node.config);
                label::measure(state, &font, &self.metrics)
            }
            NodeKind::Button(state) => {
                if children.is_empty() {
                    let font = self.metrics.font_for(&node.config);
                    button::measure(state, &font, &self.metrics)
                } else {
                    self.widest_child(&children)?
                }
            }
        };
        self.tree.get_mut(id)?.content = content;
        Ok(content)
    }

    /// Sum along the major axis and maximum across it, over non-pinned
    /// children, plus the stack's own padding once on each side.
    fn stack_content(&self, direction: Axis, pad: Size, children: &[NodeId]) -> Result<Size> {
        let minor = direction.cross();
        let mut out = Size::default();
        for c in children {
            let child = self.tree.get(*c)?;
            if child.pinned {
                continue;
            }
            out.set_on(direction, out.on(direction) + child.outer(direction));
            out.set_on(minor, out.on(minor).max(child.outer(minor)));
        }
        Ok(Size::new(out.w + 2.0 * pad.w, out.h + 2.0 * pad.h))
    }

    /// The largest outer extent of any child on each axis.
    fn widest_child(&self, children: &[NodeId]) -> Result<Size> {
        let mut out = Size::default();
        for c in children {
            let child = self.tree.get(*c)?;
            out.w = out.w.max(child.outer(Axis::Horizontal));
            out.h = out.h.max(child.outer(Axis::Vertical));
        }
        Ok(out)
    }

    /// Position and size the children of `id` within `avail`, the padded
    /// size of `id`.
    pub fn pack(&mut self, id: NodeId, avail: Size) -> Result<()> {
        let stack = match &self.tree.get(id)?.kind {
            NodeKind::Stack(stack) => Some(*stack),
            _ => None,
        };
        match stack {
            Some(stack) => self.pack_stack(id, stack, avail),
            None => self.pack_forward(id),
        }
    }

    /// Give each child its measured padded size.
    fn pack_forward(&mut self, id: NodeId) -> Result<()> {
        let children = self.tree.get(id)?.children.clone();
        for c in children {
            let child = self.tree.get_mut(c)?;
            child.size = Size::new(child.inner(Axis::Horizontal), child.inner(Axis::Vertical));
            let size = child.size;
            self.pack(c, size)?;
        }
        Ok(())
    }

    /// Divide the major axis among non-pinned children.
    fn share(&self, children: &[NodeId], major: Axis, avail: f64, justify: bool) -> Result<Shares> {
        let mut remaining = avail;
        let mut fills = 0usize;
        let mut percent = Vec::with_capacity(children.len());
        for c in children {
            let child = self.tree.get(*c)?;
            match child.config.on_axis {
                OnAxis::Fill => {
                    fills += 1;
                    percent.push(None);
                }
                OnAxis::Percent(p) => {
                    let size = remaining * p / 100.0;
                    remaining -= size;
                    percent.push(Some(size));
                }
                OnAxis::Normal => {
                    remaining -= child.outer(major);
                    percent.push(None);
                }
            }
        }
        let (fill, gap) = if fills > 0 {
            (remaining / fills as f64, 0.0)
        } else if justify {
            (0.0, remaining / children.len().saturating_sub(1).max(1) as f64)
        } else {
            (0.0, 0.0)
        };
        Ok(Shares { fill, gap, percent })
    }

    /// Lay out a stack's non-pinned children in sequence.
    fn pack_stack(&mut self, id: NodeId, stack: StackLayout, avail: Size) -> Result<()> {
        let node = self.tree.get(id)?;
        let pad = Point::new(node.config.pad_x, node.config.pad_y);
        let children: Vec<NodeId> = node
            .children
            .iter()
            .copied()
            .filter(|c| self.tree.node(*c).is_some_and(|n| !n.pinned))
            .collect();
        if children.is_empty() {
            return Ok(());
        }

        let major = stack.direction;
        let minor = major.cross();
        let inner = Size::new(avail.w - 2.0 * pad.x, avail.h - 2.0 * pad.y);
        let shares = self.share(&children, major, inner.on(major), stack.justify)?;
        tracing::trace!(?id, ?shares, "pack stack");

        let mut cursor = pad;
        for (i, c) in children.iter().enumerate() {
            let child = self.tree.get_mut(*c)?;
            let mut pos = Point::new(cursor.x + child.config.margin_x, cursor.y + child.config.margin_y);
            let mut size = Size::new(child.inner(Axis::Horizontal), child.inner(Axis::Vertical));

            match (child.config.on_axis, shares.percent.get(i).copied().flatten()) {
                (OnAxis::Percent(_), Some(resolved)) => size.set_on(major, resolved),
                (OnAxis::Fill, _) => size.set_on(major, shares.fill - child.extra(major)),
                _ => {}
            }

            let space = inner.on(minor) - child.extra(minor);
            let lead = pos.on(minor);
            match child.config.off_axis {
                OffAxis::Start => {}
                OffAxis::Center => pos.set_on(minor, lead + (space - size.on(minor)) * 0.5),
                OffAxis::End => pos.set_on(minor, lead + space - size.on(minor)),
                OffAxis::Fill => size.set_on(minor, space),
            }

            child.pos = pos;
            child.size = size;
            cursor.set_on(
                major,
                shares.gap + pos.on(major) + size.on(major) + 2.0 * child.config.border + child.margin(major),
            );
            self.pack(*c, size)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        InteractionManager, NodeBuilder as B,
        core::{
            event::{Button, Mods},
            handlers::MouseInput,
            style::FontHandle,
        },
        testing::{FixedFonts, Harness},
    };

    /// Measure and pack `root` into `avail`, returning the tree.
    fn layout(root: B, avail: Size) -> Result<Tree> {
        let fonts = FixedFonts::default();
        let base = FontHandle {
            face: 0,
            family: "fixed".into(),
            pixel_size: 0.0,
        };
        let mut tree = Tree::new(root);
        let id = tree.root();
        let mut pass = LayoutPass::new(&mut tree, Metrics::new(&fonts, &base, 72.0));
        pass.measure(id)?;
        pass.pack(id, avail)?;
        Ok(tree)
    }

    /// Padded sizes of the root's children.
    fn sizes(tree: &Tree) -> Vec<Size> {
        tree.children(tree.root())
            .iter()
            .map(|c| tree.node(*c).map(|n| n.size).unwrap_or_default())
            .collect()
    }

    /// Positions of the root's children.
    fn positions(tree: &Tree) -> Vec<Point> {
        tree.children(tree.root())
            .iter()
            .map(|c| tree.node(*c).map(|n| n.pos).unwrap_or_default())
            .collect()
    }

    #[test]
    fn parse_axes() -> Result<()> {
        assert_eq!("normal".parse::<OnAxis>()?, OnAxis::Normal);
        assert_eq!("fill".parse::<OnAxis>()?, OnAxis::Fill);
        assert_eq!("25%".parse::<OnAxis>()?, OnAxis::Percent(25.0));
        assert_eq!("12.5 %".parse::<OnAxis>()?, OnAxis::Percent(12.5));
        assert!("25".parse::<OnAxis>().is_err());
        assert!("x%".parse::<OnAxis>().is_err());
        assert!("-3%".parse::<OnAxis>().is_err());
        assert_eq!(OnAxis::Percent(25.0).to_string(), "25%");
        assert_eq!("center".parse::<OffAxis>()?, OffAxis::Center);
        assert!(matches!("middle".parse::<OffAxis>(), Err(Error::Parse(_))));
        Ok(())
    }

    #[test]
    fn sidebar_and_panel() -> Result<()> {
        let root = B::hstack()
            .child(B::vstack().on_axis(OnAxis::Percent(25.0)).off_axis(OffAxis::Fill))
            .child(B::boxed().fill());
        let tree = layout(root, Size::new(300.0, 200.0))?;
        assert_eq!(
            sizes(&tree),
            vec![Size::new(75.0, 200.0), Size::new(225.0, 200.0)]
        );
        assert_eq!(positions(&tree), vec![Point::zero(), Point::new(75.0, 0.0)]);
        Ok(())
    }

    #[test]
    fn sequential_percent() -> Result<()> {
        let root = B::vstack()
            .child(B::boxed().on_axis(OnAxis::Percent(30.0)))
            .child(B::boxed().on_axis(OnAxis::Percent(50.0)))
            .child(B::space(0.0, 10.0));
        let tree = layout(root, Size::new(50.0, 200.0))?;
        let s = sizes(&tree);
        assert_eq!(s[0].h, 60.0);
        assert_eq!(s[1].h, 70.0);
        assert_eq!(s[2].h, 10.0);
        Ok(())
    }

    #[test]
    fn padding_margin_border() -> Result<()> {
        let root = B::vstack()
            .pad(5.0, 5.0)
            .child(B::space(10.0, 10.0).margin(2.0, 3.0).border(1.0))
            .child(B::space(10.0, 10.0));
        let tree = layout(root, Size::new(100.0, 100.0))?;
        let root = tree.get(tree.root())?;
        assert_eq!(root.content, Size::new(26.0, 38.0));
        assert_eq!(
            positions(&tree),
            vec![Point::new(7.0, 8.0), Point::new(5.0, 5.0 + 3.0 + 10.0 + 2.0 + 3.0)]
        );
        Ok(())
    }

    #[test]
    fn nested_stack_counts_its_padding() -> Result<()> {
        let root = B::hstack().child(B::vstack().pad(5.0, 5.0).child(B::space(10.0, 10.0)));
        let tree = layout(root, Size::new(100.0, 100.0))?;
        let inner = tree.get(tree.children(tree.root())[0])?;
        assert_eq!(inner.content, Size::new(20.0, 20.0));
        assert_eq!(tree.get(tree.root())?.content, Size::new(30.0, 30.0));
        let leaf = tree.get(inner.children()[0])?;
        assert_eq!(leaf.pos(), Point::new(5.0, 5.0));
        Ok(())
    }

    #[test]
    fn dragged_node_keeps_its_size() -> Result<()> {
        let root = B::vstack().child(B::control().content(10.0, 10.0).off_axis(OffAxis::Fill));
        let mut h = Harness::new(root)?;
        let id = h.ui.tree().children(h.root())[0];
        assert_eq!(h.ui.node(id).unwrap().size(), Size::new(400.0, 10.0));

        let m = MouseInput::new(2.0, 2.0, Button::Left, Mods::Empty);
        assert!(h.ui.begin_drag(id, &m)?);
        h.ui.drag_move(&MouseInput::new(50.0, 60.0, Button::Left, Mods::Empty))?;
        h.render()?;
        let node = h.ui.node(id).unwrap();
        assert!(node.pinned());
        assert_eq!(node.pos(), Point::new(48.0, 58.0));
        assert_eq!(node.size(), Size::new(400.0, 10.0));
        Ok(())
    }

    #[test]
    fn off_axis_alignment() -> Result<()> {
        let root = B::vstack()
            .pad(4.0, 0.0)
            .child(B::space(10.0, 5.0).off_axis(OffAxis::Center))
            .child(B::space(10.0, 5.0).off_axis(OffAxis::End).margin(1.0, 0.0))
            .child(B::space(10.0, 5.0).off_axis(OffAxis::Fill).margin(1.0, 0.0));
        let tree = layout(root, Size::new(48.0, 100.0))?;
        let p = positions(&tree);
        let s = sizes(&tree);
        assert_eq!(p[0].x, 4.0 + 15.0);
        assert_eq!(p[1].x, 5.0 + 38.0 - 10.0);
        assert_eq!(p[2].x, 5.0);
        assert_eq!(s[2].w, 38.0);
        Ok(())
    }

    #[test]
    fn justify_spreads_leftover() -> Result<()> {
        let root = B::hstack()
            .justify(true)
            .children((0..3).map(|_| B::space(10.0, 10.0)));
        let tree = layout(root, Size::new(100.0, 10.0))?;
        let xs: Vec<f64> = positions(&tree).iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 45.0, 90.0]);
        Ok(())
    }

    #[test]
    fn pinned_children_excluded() -> Result<()> {
        let root = B::hstack()
            .child(B::space(10.0, 10.0))
            .child(B::space(50.0, 50.0).pad(1.0, 1.0).pinned(true).at(3.0, 4.0))
            .child(B::boxed().fill());
        let tree = layout(root, Size::new(100.0, 20.0))?;
        assert_eq!(tree.get(tree.root())?.content, Size::new(10.0, 10.0));
        let p = positions(&tree);
        let s = sizes(&tree);
        assert_eq!(p[1], Point::new(3.0, 4.0));
        // Pinned nodes keep the size they had when pinned.
        assert_eq!(s[1], Size::new(50.0, 50.0));
        assert_eq!(s[2].w, 90.0);
        assert_eq!(p[2].x, 10.0);
        Ok(())
    }

    #[test]
    fn forward_pack_and_labels() -> Result<()> {
        let root = B::boxed().child(B::label("abcd").pad(2.0, 1.0));
        let tree = layout(root, Size::new(100.0, 100.0))?;
        let label = tree.get(tree.children(tree.root())[0])?;
        // Fixed fonts advance half the pixel size per character; 11pt at 72dpi.
        assert_eq!(label.content, Size::new(22.0, 11.0));
        assert_eq!(label.size, Size::new(26.0, 13.0));
        Ok(())
    }

    #[test]
    fn button_wraps_children() -> Result<()> {
        let root = B::boxed().child(B::button("").child(B::space(30.0, 8.0).margin(1.0, 1.0)));
        let tree = layout(root, Size::new(100.0, 100.0))?;
        let button = tree.get(tree.children(tree.root())[0])?;
        assert_eq!(button.content, Size::new(32.0, 10.0));
        assert_eq!(button.size, Size::new(32.0 + 24.0, 10.0 + 16.0));
        Ok(())
    }

    proptest! {
        #[test]
        fn normal_children_sum(
            dims in prop::collection::vec((0.0f64..50.0, 0.0f64..50.0, 0.0f64..4.0, 0.0f64..4.0, 0.0f64..3.0), 1..8),
            vertical in any::<bool>(),
        ) {
            let axis = if vertical { Axis::Vertical } else { Axis::Horizontal };
            let root = B::stack(axis).children(dims.iter().map(|(cx, cy, pad, margin, border)| {
                B::space(*cx, *cy).pad(*pad, *pad).margin(*margin, *margin).border(*border)
            }));
            let tree = layout(root, Size::new(1000.0, 1000.0))?;
            let total: f64 = tree
                .children(tree.root())
                .iter()
                .filter_map(|c| tree.node(*c))
                .map(|n| n.size.on(axis) + n.extra(axis))
                .sum();
            let content = tree.get(tree.root())?.content.on(axis);
            prop_assert!((total - content).abs() < 1e-9);
        }

        #[test]
        fn fill_shares_even(
            fixed in prop::collection::vec(0.0f64..40.0, 0..4),
            fills in 1usize..6,
            avail in 200.0f64..1000.0,
        ) {
            let root = B::hstack()
                .children(fixed.iter().map(|w| B::space(*w, 1.0)))
                .children((0..fills).map(|_| B::boxed().on_axis(OnAxis::Fill)));
            let tree = layout(root, Size::new(avail, 10.0))?;
            let shares: Vec<f64> = sizes(&tree)[fixed.len()..].iter().map(|s| s.w).collect();
            let leftover = avail - fixed.iter().sum::<f64>();
            let sum: f64 = shares.iter().sum();
            prop_assert!((sum - leftover).abs() < 1e-6);
            let max = shares.iter().copied().fold(f64::MIN, f64::max);
            let min = shares.iter().copied().fold(f64::MAX, f64::min);
            prop_assert!(max - min < 1e-9);
        }

        #[test]
        fn percent_uses_remainder(p1 in 0.0f64..100.0, p2 in 0.0f64..100.0, avail in 1.0f64..2000.0) {
            let root = B::vstack()
                .child(B::boxed().on_axis(OnAxis::Percent(p1)))
                .child(B::boxed().on_axis(OnAxis::Percent(p2)))
                .child(B::space(1.0, 1.0));
            let tree = layout(root, Size::new(10.0, avail))?;
            let s = sizes(&tree);
            let first = avail * p1 / 100.0;
            prop_assert!((s[0].h - first).abs() < 1e-9);
            prop_assert!((s[1].h - (avail - first) * p2 / 100.0).abs() < 1e-9);
        }
    }
}
