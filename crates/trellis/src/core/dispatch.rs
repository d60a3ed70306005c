use trellis_geom::{Point, Size};

use crate::{
    core::{
        error::{Error, Result},
        event::{Button, PlatformEvent},
        handlers::{Handlers, KeyInput, MouseInput, Slot},
        id::NodeId,
        interaction::InteractionManager,
        ui::Ui,
    },
    widgets::button,
};

/// Route one platform event.
pub(crate) fn route(ui: &mut Ui, event: &PlatformEvent) -> Result<()> {
    let root = ui.root();
    match *event {
        PlatformEvent::Resize { width, height } => {
            ui.window = Size::checked(width, height)
                .map_err(|e| Error::Backend(format!("bad window size: {e}")))?;
            ui.dirty(root)
        }
        PlatformEvent::RedrawRequested => ui.dirty(root),
        PlatformEvent::MouseMove { x, y, button, mods } => {
            mouse_move(ui, MouseInput::new(x, y, button, mods))
        }
        PlatformEvent::MouseDown { x, y, button, mods } => {
            mouse_down(ui, MouseInput::new(x, y, button, mods))
        }
        PlatformEvent::MouseUp { x, y, button, mods } => {
            mouse_up(ui, MouseInput::new(x, y, button, mods))
        }
        PlatformEvent::KeyDown { key, mods } => key_down(ui, KeyInput { key, mods }),
        PlatformEvent::KeyUp { key, mods } => {
            let Some(focused) = ui.interaction.focused else {
                return Ok(());
            };
            delegate(ui, focused, |h| &h.key_up, &KeyInput { key, mods })
        }
        PlatformEvent::Char { codepoint } => {
            if let Some(focused) = ui.interaction.focused {
                ui.fire(focused, |h| &h.char, &codepoint)?;
            }
            Ok(())
        }
        PlatformEvent::Close => Ok(()),
    }
}

/// Pointer movement: drives an active drag, otherwise tracks hover.
fn mouse_move(ui: &mut Ui, m: MouseInput) -> Result<()> {
    if let Some(drag) = ui.interaction.drag {
        let origin = ui
            .tree
            .parent(drag.node)
            .map_or(Point::zero(), |p| ui.tree.to_screen_point(p, Point::zero()));
        return ui.drag_move(&MouseInput {
            pos: m.pos - origin,
            ..m
        });
    }
    match ui.locate(m.pos) {
        Some((id, local)) => {
            ui.set_hover(Some(id), local)?;
            ui.fire(id, |h| &h.mouse_move, &MouseInput { pos: local, ..m })?;
        }
        None => {
            ui.set_hover(None, Point::zero())?;
        }
    }
    Ok(())
}

/// Mouse-down: focus a focusable target before its handler runs.
fn mouse_down(ui: &mut Ui, m: MouseInput) -> Result<()> {
    let Some((id, local)) = ui.locate(m.pos) else {
        return Ok(());
    };
    let m = MouseInput { pos: local, ..m };
    if ui.tree.get(id)?.config.can_focus {
        ui.set_focus(Some(id))?;
    }
    button::press(ui, id, &m)?;
    ui.fire(id, |h| &h.mouse_down, &m)?;
    Ok(())
}

/// Mouse-up: ends a drag, or fires mouse-up and then click on a node that
/// either cannot focus or already holds focus.
fn mouse_up(ui: &mut Ui, m: MouseInput) -> Result<()> {
    if ui.interaction.drag.is_some() {
        ui.end_drag(&m)?;
        return Ok(());
    }
    let Some((id, local)) = ui.locate(m.pos) else {
        return Ok(());
    };
    let m = MouseInput { pos: local, ..m };
    ui.fire(id, |h| &h.mouse_up, &m)?;
    let was_pressed = button::release(ui, id)?;
    let Some(node) = ui.tree.node(id) else {
        return Ok(());
    };
    if (!node.config.can_focus || node.focused) && button::allows_click(node, was_pressed) {
        ui.fire(id, |h| &h.click, &m)?;
    }
    Ok(())
}

/// Key-down: button activation, then the focused node's hook with one level
/// of delegation.
fn key_down(ui: &mut Ui, k: KeyInput) -> Result<()> {
    let Some(focused) = ui.interaction.focused else {
        return Ok(());
    };
    if ui.tree.node(focused).is_some_and(|n| button::activates(n, &k)) {
        tracing::debug!(?focused, "button activated from keyboard");
        let m = MouseInput {
            pos: Point::zero(),
            button: Button::Left,
            mods: k.mods,
        };
        ui.fire(focused, |h| &h.click, &m)?;
        return Ok(());
    }
    delegate(ui, focused, |h| &h.key_down, &k)
}

/// Fire a key slot on `id`, or on its parent when the slot is empty.
fn delegate(
    ui: &mut Ui,
    id: NodeId,
    select: fn(&Handlers) -> &Slot<KeyInput>,
    k: &KeyInput,
) -> Result<()> {
    if ui.fire(id, select, k)? {
        return Ok(());
    }
    if let Some(parent) = ui.tree.parent(id) {
        tracing::trace!(?id, ?parent, "delegating key to parent");
        ui.fire(parent, select, k)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        NodeBuilder as B,
        core::{
            event::{Key, Mods},
            node::NodeKind,
        },
        testing::{Harness, HookLog},
    };

    /// Two 10x10 siblings at x=0 and x=20 in a root box.
    fn siblings(log: &HookLog) -> Result<(Harness, NodeId, NodeId)> {
        let root = B::boxed()
            .child(
                B::space(10.0, 10.0)
                    .on_hover(log.hook("a:hover"))
                    .on_hover_lost(log.hook("a:lost"))
                    .on_mouse_move(log.hook("a:move")),
            )
            .child(
                B::space(10.0, 10.0)
                    .at(20.0, 0.0)
                    .on_hover(log.hook("b:hover"))
                    .on_mouse_move(log.hook("b:move")),
            );
        let h = Harness::new(root)?;
        let ids = h.ui.tree().children(h.root()).to_vec();
        Ok((h, ids[0], ids[1]))
    }

    #[test]
    fn locate_siblings() -> Result<()> {
        let log = HookLog::default();
        let (h, a, b) = siblings(&log)?;
        assert_eq!(h.ui.locate(Point::new(5.0, 5.0)), Some((a, Point::new(5.0, 5.0))));
        assert_eq!(h.ui.locate(Point::new(25.0, 5.0)), Some((b, Point::new(5.0, 5.0))));
        assert_eq!(
            h.ui.locate(Point::new(15.0, 5.0)),
            Some((h.root(), Point::new(15.0, 5.0)))
        );
        assert_eq!(h.ui.locate(Point::new(500.0, 5.0)), None);
        Ok(())
    }

    #[test]
    fn hover_follows_pointer() -> Result<()> {
        let log = HookLog::default();
        let (mut h, _, b) = siblings(&log)?;
        h.mouse_move(5.0, 5.0)?;
        h.mouse_move(6.0, 5.0)?;
        h.mouse_move(25.0, 5.0)?;
        assert_eq!(
            log.entries(),
            vec!["a:hover", "a:move", "a:move", "a:lost", "b:hover", "b:move"]
        );
        assert_eq!(h.ui.interaction().hovered(), Some(b));
        h.mouse_move(1000.0, 1000.0)?;
        assert_eq!(h.ui.interaction().hovered(), None);
        Ok(())
    }

    #[test]
    fn hover_change_redraws() -> Result<()> {
        let log = HookLog::default();
        let (mut h, _, _) = siblings(&log)?;
        let frames = h.frames;
        h.mouse_move(5.0, 5.0)?;
        assert_eq!(h.frames, frames + 1);
        h.mouse_move(6.0, 6.0)?;
        assert_eq!(h.frames, frames + 1);
        Ok(())
    }

    #[test]
    fn click_focuses_then_clicks() -> Result<()> {
        let log = HookLog::default();
        let root = B::boxed().child(
            B::control()
                .content(10.0, 10.0)
                .on_focus(log.hook("focus"))
                .on_mouse_down(log.hook("down"))
                .on_mouse_up(log.hook("up"))
                .on_click(log.hook("click")),
        );
        let mut h = Harness::new(root)?;
        h.mouse_down(5.0, 5.0)?;
        h.mouse_up(5.0, 5.0)?;
        assert_eq!(log.entries(), vec!["focus", "down", "up", "click"]);
        Ok(())
    }

    #[test]
    fn plain_box_clicks_without_focus() -> Result<()> {
        let log = HookLog::default();
        let root = B::boxed().child(B::space(10.0, 10.0).on_click(log.hook("click")));
        let mut h = Harness::new(root)?;
        h.click(5.0, 5.0)?;
        assert_eq!(log.count("click"), 1);
        assert_eq!(h.ui.interaction().focused(), None);
        Ok(())
    }

    #[test]
    fn unfocused_control_does_not_click() -> Result<()> {
        let log = HookLog::default();
        let root = B::boxed()
            .child(B::control().content(10.0, 10.0).on_click(log.hook("a:click")))
            .child(
                B::control()
                    .content(10.0, 10.0)
                    .at(20.0, 0.0)
                    .on_mouse_up(log.hook("b:up"))
                    .on_click(log.hook("b:click")),
            );
        let mut h = Harness::new(root)?;
        h.mouse_down(5.0, 5.0)?;
        h.mouse_up(25.0, 5.0)?;
        assert_eq!(log.entries(), vec!["b:up"]);
        Ok(())
    }

    #[test]
    fn key_delegation_is_one_level() -> Result<()> {
        let log = HookLog::default();
        let root = B::vstack().on_key_down(log.hook("root:down")).on_key_up(log.hook("root:up")).children([
            B::control().content(10.0, 10.0),
            B::control().content(10.0, 10.0).on_key_down(log.hook("own:down")),
            B::boxed().child(B::control().content(10.0, 10.0)),
        ]);
        let mut h = Harness::new(root)?;
        let ids = h.ui.tree().children(h.root()).to_vec();
        let nested = h.ui.tree().children(ids[2])[0];

        h.ui.set_focus(Some(ids[0]))?;
        h.key(Key::Tab)?;
        assert_eq!(log.entries(), vec!["root:down", "root:up"]);

        log.reset();
        h.ui.set_focus(Some(ids[1]))?;
        h.key('x')?;
        assert_eq!(log.entries(), vec!["own:down", "root:up"]);

        log.reset();
        h.ui.set_focus(Some(nested))?;
        h.key('x')?;
        assert!(log.entries().is_empty());
        Ok(())
    }

    #[test]
    fn keys_need_focus() -> Result<()> {
        let log = HookLog::default();
        let root = B::vstack()
            .on_key_down(log.hook("down"))
            .on_char(log.hook("char"));
        let mut h = Harness::new(root)?;
        h.key(Key::Enter)?;
        h.type_text("ab")?;
        assert!(log.entries().is_empty());
        Ok(())
    }

    #[test]
    fn chars_go_to_focus() -> Result<()> {
        let typed = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&typed);
        let root = B::vstack().child(B::control().content(10.0, 10.0).on_char(move |_, c| {
            sink.borrow_mut().push(*c);
            Ok(())
        }));
        let mut h = Harness::new(root)?;
        h.click(5.0, 5.0)?;
        h.type_text("hi")?;
        assert_eq!(*typed.borrow(), "hi");
        Ok(())
    }

    #[test]
    fn drag_through_events() -> Result<()> {
        let log = HookLog::default();
        let root = B::boxed()
            .child(
                B::boxed()
                    .at(50.0, 50.0)
                    .content(100.0, 100.0)
                    .on_mouse_move(log.hook("panel:move"))
                    .child(
                        B::control()
                            .at(10.0, 10.0)
                            .content(20.0, 20.0)
                            .on_mouse_down(|ctx, m| {
                                ctx.begin_drag(m)?;
                                Ok(())
                            })
                            .on_mouse_move(log.hook("tack:move"))
                            .on_drag_move(log.hook("drag"))
                            .on_drag_end(log.hook("end")),
                    ),
            )
            .child(
                B::space(20.0, 20.0)
                    .at(300.0, 0.0)
                    .on_hover(log.hook("other:hover"))
                    .on_mouse_move(log.hook("other:move")),
            );
        let mut h = Harness::new(root)?;
        let panel = h.ui.tree().children(h.root())[0];
        let tack = h.ui.tree().children(panel)[0];

        h.mouse_move(65.0, 65.0)?;
        assert_eq!(h.ui.interaction().hovered(), Some(tack));
        h.mouse_down(65.0, 65.0)?;
        let drag = h.ui.interaction().drag().unwrap();
        assert_eq!(drag.node, tack);
        assert_eq!(drag.anchor, Point::new(5.0, 5.0));
        assert_eq!(h.ui.interaction().focused(), Some(tack));

        h.mouse_move(100.0, 80.0)?;
        assert_eq!(h.ui.node(tack).unwrap().pos(), Point::new(45.0, 25.0));
        assert_eq!(h.screen_origin(tack), Point::new(95.0, 75.0));

        // Over another node mid-drag: no hit-test, hover stays put.
        h.mouse_move(310.0, 5.0)?;
        assert_eq!(h.ui.interaction().hovered(), Some(tack));
        assert_eq!(h.ui.node(tack).unwrap().pos(), Point::new(255.0, -50.0));
        assert_eq!(log.count("tack:move"), 1);
        assert_eq!(log.count("panel:move"), 0);
        assert_eq!(log.count("other:move"), 0);
        assert_eq!(log.count("other:hover"), 0);
        assert_eq!(log.count("drag"), 2);

        h.mouse_up(310.0, 5.0)?;
        assert_eq!(log.count("end"), 1);
        assert_eq!(h.ui.interaction().drag(), None);
        assert!(h.ui.node(tack).unwrap().pinned());
        assert_eq!(h.ui.node(tack).unwrap().pos(), Point::new(255.0, -50.0));
        Ok(())
    }

    #[test]
    fn handlers_mutate_tree() -> Result<()> {
        let root = B::boxed().child(B::space(50.0, 50.0).on_click(|ctx, m| {
            let id = ctx.node_id();
            ctx.ui().add_new(id, B::space(4.0, 4.0).at(m.pos.x, m.pos.y))?;
            Ok(())
        }));
        let mut h = Harness::new(root)?;
        let canvas = h.ui.tree().children(h.root())[0];
        let frames = h.frames;
        h.mouse_down(10.0, 12.0)?;
        h.mouse_up(10.0, 12.0)?;
        let tacks = h.ui.tree().children(canvas).to_vec();
        assert_eq!(tacks.len(), 1);
        assert_eq!(h.ui.node(tacks[0]).unwrap().pos(), Point::new(10.0, 12.0));
        assert!(h.frames > frames);
        Ok(())
    }

    #[test]
    fn handler_removes_its_node() -> Result<()> {
        let log = HookLog::default();
        let root = B::boxed().child(
            B::space(10.0, 10.0)
                .on_hover_lost(log.hook("lost"))
                .on_click(|ctx, _| {
                    let id = ctx.node_id();
                    ctx.ui().remove(id)?;
                    assert!(ctx.node().is_none());
                    Ok(())
                }),
        );
        let mut h = Harness::new(root)?;
        h.click(5.0, 5.0)?;
        assert!(h.ui.tree().children(h.root()).is_empty());
        assert_eq!(h.ui.interaction().hovered(), None);
        assert_eq!(log.entries(), vec!["lost"]);
        Ok(())
    }

    #[test]
    fn handler_errors_propagate() -> Result<()> {
        let root = B::boxed().child(
            B::space(10.0, 10.0).on_click(|_, _| Err(Error::handler("boom"))),
        );
        let mut h = Harness::new(root)?;
        h.mouse_down(1.0, 1.0)?;
        assert_eq!(
            h.mouse_up(1.0, 1.0),
            Err(Error::Handler("boom".into()))
        );
        Ok(())
    }

    /// The pressed flag of a button node.
    fn pressed(h: &Harness, id: NodeId) -> bool {
        matches!(h.ui.node(id).map(|n| n.kind()), Some(NodeKind::Button(s)) if s.pressed)
    }

    #[test]
    fn button_press_and_release() -> Result<()> {
        let log = HookLog::default();
        let root = B::boxed().child(B::button("OK").on_click(log.hook("click")));
        let mut h = Harness::new(root)?;
        let button = h.find_text("OK").unwrap();

        h.mouse_move(5.0, 5.0)?;
        h.mouse_down(5.0, 5.0)?;
        assert!(pressed(&h, button));
        h.mouse_up(5.0, 5.0)?;
        assert!(!pressed(&h, button));
        assert_eq!(log.count("click"), 1);

        h.mouse_down(5.0, 5.0)?;
        h.mouse_move(300.0, 200.0)?;
        assert!(!pressed(&h, button));
        h.mouse_move(5.0, 5.0)?;
        h.mouse_up(5.0, 5.0)?;
        assert_eq!(log.count("click"), 1);
        Ok(())
    }

    #[test]
    fn button_keyboard_activation() -> Result<()> {
        let log = HookLog::default();
        let root = B::vstack()
            .child(B::button("Go").on_click(log.hook("go")))
            .child(
                B::button("Own")
                    .on_click(log.hook("own:click"))
                    .on_key_down(log.hook("own:key")),
            );
        let mut h = Harness::new(root)?;
        let go = h.find_text("Go").unwrap();
        let own = h.find_text("Own").unwrap();

        h.ui.set_focus(Some(go))?;
        h.key(Key::Enter)?;
        h.key(' ')?;
        h.key('x')?;
        h.event(PlatformEvent::KeyDown {
            key: Key::Enter,
            mods: Mods::Ctrl,
        })?;
        assert_eq!(log.count("go"), 2);

        h.ui.set_focus(Some(own))?;
        h.key(Key::Enter)?;
        assert_eq!(log.entries(), vec!["go", "go", "own:key"]);
        Ok(())
    }

    #[test]
    fn disabled_button_is_inert() -> Result<()> {
        let log = HookLog::default();
        let root = B::boxed().child(B::button("No").enabled(false).on_click(log.hook("click")));
        let mut h = Harness::new(root)?;
        let button = h.find_text("No").unwrap();
        h.click(5.0, 5.0)?;
        assert!(!pressed(&h, button));
        h.key(Key::Enter)?;
        assert_eq!(log.count("click"), 0);
        Ok(())
    }

    #[test]
    fn resize_relayouts() -> Result<()> {
        let mut h = Harness::new(B::hstack().child(B::boxed().fill()))?;
        let panel = h.ui.tree().children(h.root())[0];
        h.event(PlatformEvent::Resize {
            width: 640.0,
            height: 480.0,
        })?;
        assert_eq!(h.ui.window_size(), Size::new(640.0, 480.0));
        assert_eq!(h.ui.node(panel).unwrap().size(), Size::new(640.0, 480.0));
        Ok(())
    }

    #[test]
    fn negative_resize_is_a_backend_error() -> Result<()> {
        let mut h = Harness::new(B::vstack())?;
        let err = h
            .ui
            .dispatch(&PlatformEvent::Resize {
                width: -1.0,
                height: 10.0,
            })
            .unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
        assert_eq!(h.ui.window_size(), Size::new(400.0, 300.0));
        Ok(())
    }
}
