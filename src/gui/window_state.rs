// Window manager state winit has no setting for: sticky and skip-pager,
// plus skip-taskbar and below so they are reasserted after a remap

use gframe::frame::WindowHints;
use gframe::utils::verbose_println;
use raw_window_handle::{HasWindowHandle, RawWindowHandle};

/// Push the frame's `_NET_WM_STATE` atoms to the window manager
pub fn apply_hints(frame: &eframe::Frame, hints: WindowHints, verbose: bool) {
    let handle = match frame.window_handle() {
        Ok(handle) => handle.as_raw(),
        Err(e) => {
            verbose_println(verbose, &format!("No window handle for hints: {}", e));
            return;
        }
    };

    let Some(window) = x11_window(handle) else {
        verbose_println(verbose, "Not an X11 window, skip-pager and sticky not set");
        return;
    };

    let states = hints.net_wm_states();
    verbose_println(verbose, &format!("Window 0x{:x}: {}", window, states.join(" ")));

    #[cfg(all(unix, not(target_os = "macos")))]
    if let Err(e) = x11::set_net_wm_state(window, &states) {
        verbose_println(verbose, &format!("{:#}", e));
    }
}

fn x11_window(handle: RawWindowHandle) -> Option<u32> {
    match handle {
        RawWindowHandle::Xlib(xlib) => u32::try_from(xlib.window).ok(),
        RawWindowHandle::Xcb(xcb) => Some(xcb.window.get()),
        _ => None,
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
mod x11 {
    use anyhow::{Context, Result};
    use x11rb::connection::Connection;
    use x11rb::protocol::xproto::{
        AtomEnum, ClientMessageEvent, ConnectionExt as _, EventMask, MapState, PropMode,
    };
    use x11rb::wrapper::ConnectionExt as _;

    const NET_WM_STATE_ADD: u32 = 1;
    const SOURCE_APPLICATION: u32 = 1;

    /// EWMH: an unmapped window carries the property itself, a mapped one
    /// asks the window manager through client messages (two atoms each)
    pub fn set_net_wm_state(window: u32, states: &[&str]) -> Result<()> {
        let (conn, screen) = x11rb::connect(None).context("Failed to connect to the X server")?;
        let root = conn
            .setup()
            .roots
            .get(screen)
            .context("X server reported no such screen")?
            .root;

        let intern = |name: &str| -> Result<u32> {
            Ok(conn.intern_atom(false, name.as_bytes())?.reply()?.atom)
        };
        let wm_state = intern("_NET_WM_STATE")?;
        let atoms = states
            .iter()
            .map(|name| intern(*name))
            .collect::<Result<Vec<_>>>()?;

        let attributes = conn.get_window_attributes(window)?.reply()?;
        if attributes.map_state == MapState::UNMAPPED {
            conn.change_property32(PropMode::REPLACE, window, wm_state, AtomEnum::ATOM, &atoms)?;
        } else {
            for pair in atoms.chunks(2) {
                let second = pair.get(1).copied().unwrap_or(0);
                let event = ClientMessageEvent::new(
                    32,
                    window,
                    wm_state,
                    [NET_WM_STATE_ADD, pair[0], second, SOURCE_APPLICATION, 0],
                );
                conn.send_event(
                    false,
                    root,
                    EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
                    event,
                )?;
            }
        }

        conn.flush().context("Failed to flush X11 requests")?;
        Ok(())
    }
}
