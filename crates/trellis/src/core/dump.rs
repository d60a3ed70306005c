use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use crate::core::{error::Result, id::NodeId, node::NodeKind, ui::Ui};

/// Format a number without a trailing `.0`.
fn num(v: f64) -> String {
    format!("{}", (v * 100.0).round() / 100.0)
}

/// Render the subtree at `root` as a table of geometry and flags, one row
/// per node in pre-order. This is a debug function.
pub fn dump(ui: &Ui, root: NodeId) -> Result<String> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["node", "pos", "size", "content", "flags"]);
    let tree = ui.tree();
    tree.get(root)?;
    for id in tree.descendants(root) {
        let node = tree.get(id)?;
        let mut depth = 0;
        let mut up = node.parent();
        while let Some(p) = up
            && tree.is_ancestor(root, p)
        {
            depth += 1;
            up = tree.parent(p);
        }
        let label = match node.kind() {
            NodeKind::Label(s) => format!("{} {:?}", node.kind().name(), s.text),
            NodeKind::Button(s) if !s.text.is_empty() => {
                format!("{} {:?}", node.kind().name(), s.text)
            }
            kind => kind.name().to_string(),
        };
        let mut flags = Vec::new();
        if node.hovered() {
            flags.push("hovered");
        }
        if node.focused() {
            flags.push("focused");
        }
        if node.pinned() {
            flags.push("pinned");
        }
        if node.is_dirty() {
            flags.push("dirty");
        }
        if ui.interaction().drag().is_some_and(|d| d.node == id) {
            flags.push("dragging");
        }
        table.add_row(vec![
            Cell::new(format!("{}{label}", "  ".repeat(depth))).fg(Color::Green),
            Cell::new(format!("{},{}", num(node.pos().x), num(node.pos().y))),
            Cell::new(format!("{}x{}", num(node.size().w), num(node.size().h))),
            Cell::new(format!("{}x{}", num(node.content().w), num(node.content().h))),
            Cell::new(flags.join(" ")),
        ]);
    }
    Ok(table.to_string())
}
