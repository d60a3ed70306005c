use std::mem;

use serde::{Deserialize, Serialize};
use trellis_geom::{Point, Size};

use crate::core::{
    backend::{FontBackend, Metrics},
    builder::NodeBuilder,
    dispatch,
    error::{Error, Result},
    event::PlatformEvent,
    handlers::{Handlers, MouseInput, Slot},
    id::NodeId,
    interaction::{Interaction, InteractionManager},
    layout::LayoutPass,
    node::Node,
    render::{RenderPass, Surface},
    style::FontHandle,
    tree::Tree,
};

/// Default base font family.
pub const DEFAULT_FONT_FAMILY: &str = "system-ui";
/// Default base font weight.
pub const DEFAULT_FONT_WEIGHT: u16 = 500;
/// Default DPI.
pub const DEFAULT_DPI: f64 = 96.0;

/// UI-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Base font family.
    pub font_family: String,
    /// Base font weight.
    pub font_weight: u16,
    /// Dots per inch used to turn point sizes into pixel sizes.
    pub dpi: f64,
    /// Initial window width.
    pub width: f64,
    /// Initial window height.
    pub height: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.into(),
            font_weight: DEFAULT_FONT_WEIGHT,
            dpi: DEFAULT_DPI,
            width: 800.0,
            height: 600.0,
        }
    }
}

/// The top-level object: a node tree, its interaction state, and the font
/// backend used to measure it.
pub struct Ui {
    /// The node arena.
    pub(crate) tree: Tree,
    /// Hover, focus, and drag state.
    pub(crate) interaction: Interaction,
    /// Font backend.
    fonts: Box<dyn FontBackend>,
    /// Resolved base font.
    base_font: FontHandle,
    /// Settings.
    config: UiConfig,
    /// Current window size.
    pub(crate) window: Size,
    /// A relayout and repaint is pending.
    redraw: bool,
    /// A handler asked the run loop to stop.
    exit_requested: bool,
}

impl Ui {
    /// Build a UI over `root`. Fails if the base font cannot be resolved.
    pub fn new(root: NodeBuilder, fonts: impl FontBackend + 'static, config: UiConfig) -> Result<Self> {
        let base_font = fonts
            .find_font(&config.font_family, config.font_weight)
            .ok_or_else(|| Error::FontNotFound(config.font_family.clone()))?;
        tracing::debug!(family = %config.font_family, weight = config.font_weight, "base font resolved");
        Ok(Self {
            tree: Tree::new(root),
            interaction: Interaction::default(),
            fonts: Box::new(fonts),
            base_font,
            window: Size::new(config.width, config.height),
            config,
            redraw: true,
            exit_requested: false,
        })
    }

    /// The node tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The node tree, mutably. Structural edits made here do not dirty
    /// anything; prefer the methods on `Ui`.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.tree.root
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.node(id)
    }

    /// Look up a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.tree.node_mut(id)
    }

    /// Hover, focus, and drag state.
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Settings.
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// The base font.
    pub fn base_font(&self) -> &FontHandle {
        &self.base_font
    }

    /// Current window size.
    pub fn window_size(&self) -> Size {
        self.window
    }

    /// Is a relayout and repaint scheduled?
    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    /// Clear and return the scheduled-repaint flag.
    pub fn take_redraw(&mut self) -> bool {
        mem::take(&mut self.redraw)
    }

    /// Ask the run loop to stop after the current event.
    pub fn request_exit(&mut self) {
        tracing::debug!("exit requested");
        self.exit_requested = true;
    }

    /// Take and clear a pending exit request.
    pub fn take_exit_request(&mut self) -> bool {
        mem::take(&mut self.exit_requested)
    }

    /// Create a detached subtree.
    pub fn insert(&mut self, builder: NodeBuilder) -> NodeId {
        self.tree.insert(builder)
    }

    /// Attach `child` to `parent` and dirty the parent.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.tree.add(parent, child)?;
        self.dirty(parent)
    }

    /// Create a subtree under `parent`.
    pub fn add_new(&mut self, parent: NodeId, builder: NodeBuilder) -> Result<NodeId> {
        self.tree.get(parent)?;
        let id = self.tree.insert(builder);
        self.add(parent, id)?;
        Ok(id)
    }

    /// Remove a subtree. Hover and focus held inside it are cleared first,
    /// firing the lost hooks; a drag held inside it is dropped silently.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.tree.root {
            return Err(Error::InvalidOperation("cannot remove the root".into()));
        }
        self.tree.get(id)?;
        let doomed = self.tree.descendants(id);
        self.clear_status(&doomed)?;
        let parent = self.tree.parent(id);
        self.tree.remove_subtree(id)?;
        if let Some(parent) = parent {
            self.dirty(parent)?;
        }
        Ok(())
    }

    /// Set or clear the pinned flag and dirty the node.
    pub fn set_pinned(&mut self, id: NodeId, pinned: bool) -> Result<()> {
        self.tree.set_pinned(id, pinned)?;
        self.dirty(id)
    }

    /// Raise a node above its siblings and dirty it.
    pub fn bring_to_front(&mut self, id: NodeId) -> Result<()> {
        self.tree.bring_to_front(id)?;
        self.dirty(id)
    }

    /// Mark `id` and every ancestor dirty, leaf to root, firing each node's
    /// dirty hook. Reaching the root schedules a relayout and repaint.
    pub fn dirty(&mut self, id: NodeId) -> Result<()> {
        self.tree.get(id)?;
        let mut current = Some(id);
        while let Some(n) = current {
            let Some(node) = self.tree.node_mut(n) else {
                break;
            };
            node.is_dirty = true;
            tracing::trace!(?n, "dirty");
            self.fire(n, |h| &h.dirty, &())?;
            if n == self.tree.root {
                self.redraw = true;
            }
            current = self.tree.parent(n);
        }
        Ok(())
    }

    /// Invoke a handler slot of `id`. Returns false when the slot is empty.
    /// A handler that is already running is not re-entered.
    pub(crate) fn fire<A>(
        &mut self,
        id: NodeId,
        select: fn(&Handlers) -> &Slot<A>,
        args: &A,
    ) -> Result<bool> {
        let Some(handler) = self.tree.node(id).and_then(|n| select(&n.handlers).clone()) else {
            return Ok(false);
        };
        let Ok(mut f) = handler.try_borrow_mut() else {
            tracing::warn!(?id, "skipping re-entrant handler");
            return Ok(true);
        };
        let mut ctx = Context { ui: self, node: id };
        (&mut *f)(&mut ctx, args)?;
        Ok(true)
    }

    /// Font metrics for the current configuration.
    fn metrics(&self) -> Metrics<'_> {
        Metrics::new(self.fonts.as_ref(), &self.base_font, self.config.dpi)
    }

    /// Measure the tree, give the root the available size, and pack.
    pub fn layout(&mut self, avail_x: f64, avail_y: f64) -> Result<()> {
        let root = self.tree.root;
        let avail = Size::new(avail_x, avail_y);
        let metrics = Metrics::new(self.fonts.as_ref(), &self.base_font, self.config.dpi);
        LayoutPass::new(&mut self.tree, metrics).measure(root)?;
        self.tree.get_mut(root)?.size = avail;
        LayoutPass::new(&mut self.tree, metrics).pack(root, avail)?;
        tracing::trace!(?avail, "layout");
        Ok(())
    }

    /// Draw the whole tree. The surface origin is the root's padded origin.
    pub fn draw(&mut self, surface: &mut dyn Surface) -> Result<()> {
        let root = self.tree.root;
        let metrics = Metrics::new(self.fonts.as_ref(), &self.base_font, self.config.dpi);
        RenderPass::new(&mut self.tree, metrics).draw(root, surface)
    }

    /// Measure a string with a node's font.
    pub fn measure_text(&self, id: NodeId, text: &str) -> Result<Size> {
        let metrics = self.metrics();
        let font = metrics.font_for(&self.tree.get(id)?.config);
        Ok(metrics.text_size(&font, text))
    }

    /// Find the deepest node under a screen point, with the point in that
    /// node's frame.
    pub fn locate(&self, p: Point) -> Option<(NodeId, Point)> {
        let root = self.tree.node(self.tree.root)?;
        self.tree.child_under(self.tree.root, p - root.pos)
    }

    /// Route a platform event.
    pub fn dispatch(&mut self, event: &PlatformEvent) -> Result<()> {
        tracing::debug!(?event, "dispatch");
        dispatch::route(self, event)
    }
}

/// The view a handler gets: the UI and the node the handler belongs to.
pub struct Context<'a> {
    /// The UI.
    ui: &'a mut Ui,
    /// The node whose handler is running.
    node: NodeId,
}

impl Context<'_> {
    /// The node whose handler is running.
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// The UI.
    pub fn ui(&mut self) -> &mut Ui {
        self.ui
    }

    /// The handler's node. `None` if a handler removed it.
    pub fn node(&self) -> Option<&Node> {
        self.ui.tree.node(self.node)
    }

    /// The handler's node, mutably.
    pub fn node_mut(&mut self) -> Option<&mut Node> {
        self.ui.tree.node_mut(self.node)
    }

    /// Dirty the handler's node.
    pub fn dirty(&mut self) -> Result<()> {
        self.ui.dirty(self.node)
    }

    /// Focus the handler's node.
    pub fn focus(&mut self) -> Result<bool> {
        self.ui.set_focus(Some(self.node))
    }

    /// Ask the run loop to stop after the current event.
    pub fn request_exit(&mut self) {
        self.ui.request_exit();
    }

    /// Start dragging the handler's node from `m`, given in the node's frame.
    pub fn begin_drag(&mut self, m: &MouseInput) -> Result<bool> {
        self.ui.begin_drag(self.node, m)
    }
}
