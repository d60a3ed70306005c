use crate::core::{
    backend::EventSource, error::Result, event::PlatformEvent, render::Surface, ui::Ui,
};

/// Lay out to the current window size, draw, and present one frame.
fn frame(ui: &mut Ui, surface: &mut dyn Surface) -> Result<()> {
    let size = ui.window_size();
    ui.layout(size.w, size.h)?;
    ui.draw(surface)?;
    surface.present()
}

/// Draw once, then dispatch events until `Close` or until a handler requests
/// an exit, redrawing whenever an event schedules it. Returns the number of
/// frames drawn.
pub fn runloop(ui: &mut Ui, events: &mut dyn EventSource, surface: &mut dyn Surface) -> Result<usize> {
    ui.take_redraw();
    frame(ui, surface)?;
    let mut frames = 1;
    loop {
        let event = events.next_event()?;
        if event == PlatformEvent::Close {
            tracing::debug!(frames, "close requested");
            break;
        }
        ui.dispatch(&event)?;
        if ui.take_exit_request() {
            tracing::debug!(frames, "exit requested by a handler");
            break;
        }
        if ui.take_redraw() {
            frame(ui, surface)?;
            frames += 1;
        }
    }
    Ok(frames)
}
