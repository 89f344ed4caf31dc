use eframe::egui;
use gframe::frame::{PhotoFrame, WindowCommand, WindowHints, FRAME_HINTS};
use gframe::utils::verbose_println;
use gframe::ShutdownSignal;

#[path = "app_menu.rs"]
mod app_menu;
pub use app_menu::RfdPicker;

#[path = "window_state.rs"]
mod window_state;

/// Padding drawn around the photo, in points
const FRAME_BORDER: f32 = 5.0;

pub struct FrameApp {
    frame: PhotoFrame,
    signal: ShutdownSignal,

    // Displayed photo
    texture: Option<egui::TextureHandle>,
    texture_revision: u64,

    // Context menu anchor, and whether the click that opened it is over
    menu: Option<MenuState>,

    // Value being edited in the preferences dialog
    preferences: Option<u32>,

    // Hints still to be pushed to the window manager
    pending_hints: Option<WindowHints>,

    last_position: Option<(i32, i32)>,
    verbose: bool,
}

#[derive(Debug, Clone, Copy)]
struct MenuState {
    anchor: egui::Pos2,
    armed: bool,
}

/// Translate the window hints into viewport builder settings
fn hinted_builder(builder: egui::ViewportBuilder, hints: WindowHints) -> egui::ViewportBuilder {
    // skip_pager and sticky have no winit setting, see window_state
    builder
        .with_decorations(hints.decorated)
        .with_taskbar(!hints.skip_taskbar)
        .with_window_level(window_level(hints))
}

fn window_level(hints: WindowHints) -> egui::WindowLevel {
    if hints.keep_below {
        egui::WindowLevel::AlwaysOnBottom
    } else {
        egui::WindowLevel::Normal
    }
}

/// Window size for a photo of `width`x`height`, border included
fn framed_size(width: u32, height: u32) -> egui::Vec2 {
    let border = 2.0 * FRAME_BORDER;
    egui::vec2(width as f32 + border, height as f32 + border)
}

/// Where the photo is painted inside the sensed window rect
fn photo_area(window: egui::Rect) -> egui::Rect {
    window.shrink(FRAME_BORDER)
}

/// Viewport for the first show of the frame
pub fn initial_viewport(commands: &[WindowCommand]) -> egui::ViewportBuilder {
    let mut builder = egui::ViewportBuilder::default()
        .with_title("gframe")
        .with_resizable(false);

    for command in commands {
        builder = match *command {
            WindowCommand::ApplyHints(hints) => hinted_builder(builder, hints),
            WindowCommand::Resize { width, height } => {
                builder.with_inner_size(framed_size(width, height))
            }
            WindowCommand::MoveTo { x, y } => builder.with_position([x as f32, y as f32]),
            WindowCommand::Show => builder.with_visible(true),
            WindowCommand::Hide => builder.with_visible(false),
            WindowCommand::Close => builder,
        };
    }
    builder
}

/// X11 button numbers, as the frame expects them
fn button_number(button: egui::PointerButton) -> u32 {
    match button {
        egui::PointerButton::Primary => 1,
        egui::PointerButton::Middle => 2,
        egui::PointerButton::Secondary => 3,
        egui::PointerButton::Extra1 => 8,
        egui::PointerButton::Extra2 => 9,
    }
}

impl FrameApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        frame: PhotoFrame,
        signal: ShutdownSignal,
        verbose: bool,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        if let Err(e) = signal.listen(verbose, move || ctx.request_repaint()) {
            verbose_println(verbose, &format!("{:#}", e));
        }

        Self {
            frame,
            signal,
            texture: None,
            texture_revision: 0,
            menu: None,
            preferences: None,
            pending_hints: Some(FRAME_HINTS),
            last_position: None,
            verbose,
        }
    }

    /// Carry out the frame's window commands
    fn apply(&mut self, ctx: &egui::Context, commands: &[WindowCommand]) {
        for command in commands {
            verbose_println(self.verbose, &format!("Window: {:?}", command));
            match *command {
                WindowCommand::Hide => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));
                }
                WindowCommand::Resize { width, height } => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(framed_size(
                        width, height,
                    )));
                }
                WindowCommand::ApplyHints(hints) => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Decorations(hints.decorated));
                    ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(window_level(
                        hints,
                    )));
                    // Pushed on the next frame, once the window is mapped again
                    self.pending_hints = Some(hints);
                    ctx.request_repaint();
                }
                WindowCommand::MoveTo { x, y } => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
                        x as f32, y as f32,
                    )));
                }
                WindowCommand::Show => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
                }
                WindowCommand::Close => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
        }
    }

    /// Feed window moves to the frame
    fn track_position(&mut self, ctx: &egui::Context) {
        let Some(rect) = ctx.input(|i| i.viewport().outer_rect) else {
            return;
        };
        let position = (rect.min.x.round() as i32, rect.min.y.round() as i32);
        if self.last_position != Some(position) {
            self.last_position = Some(position);
            self.frame.on_move(position.0, position.1);
        }
    }

    /// Re-upload the photo whenever the frame replaced it
    fn update_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() && self.texture_revision == self.frame.revision() {
            return;
        }
        self.texture_revision = self.frame.revision();

        // Dropping the old handle frees the previous texture
        self.texture = self.frame.image().map(|image| {
            let (width, height) = image.dimensions();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(
                [width as usize, height as usize],
                image.pixels.as_raw(),
            );
            ctx.load_texture("photo", color_image, egui::TextureOptions::LINEAR)
        });
    }

    /// The whole window, border included, reacts to presses and drags
    fn render_photo(&mut self, ui: &mut egui::Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        let photo_rect = photo_area(rect);

        match &self.texture {
            Some(texture) => {
                egui::Image::new(texture).paint_at(ui, photo_rect);
            }
            None => {
                ui.painter().text(
                    photo_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "No image",
                    egui::FontId::proportional(12.0),
                    ui.visuals().weak_text_color(),
                );
            }
        }

        // Borderless window: dragging the photo moves the frame
        if response.drag_started_by(egui::PointerButton::Primary) {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::StartDrag);
        }

        if self.preferences.is_some() {
            return;
        }

        let presses: Vec<(egui::Pos2, egui::PointerButton)> = ui.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::PointerButton {
                        pos,
                        button,
                        pressed: true,
                        ..
                    } => Some((*pos, *button)),
                    _ => None,
                })
                .collect()
        });

        for (pos, button) in presses {
            if !response.rect.contains(pos) {
                continue;
            }
            if self.frame.on_button_press(button_number(button)) {
                self.menu = Some(MenuState {
                    anchor: pos,
                    armed: false,
                });
            }
        }
    }
}

impl eframe::App for FrameApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        // Termination signal: same path as Quit
        let commands = self.frame.poll_shutdown(&self.signal);
        self.apply(ctx, &commands);

        // Window manager close, or the Close we sent ourselves
        if ctx.input(|i| i.viewport().close_requested()) {
            self.frame.on_close();
            return;
        }

        if let Some(hints) = self.pending_hints.take() {
            window_state::apply_hints(frame, hints, self.verbose);
        }

        self.track_position(ctx);
        self.update_texture(ctx);

        let panel_frame = egui::Frame::NONE.fill(ctx.style().visuals.panel_fill);

        egui::CentralPanel::default()
            .frame(panel_frame)
            .show(ctx, |ui| self.render_photo(ui));

        self.render_menu(ctx);
        self.render_preferences(ctx);
    }
}
