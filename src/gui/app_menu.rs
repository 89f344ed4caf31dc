// Context menu, preferences dialog and file picker for the frame window

use super::FrameApp;
use eframe::egui;
use gframe::frame::{MenuAction, MenuOutcome, MAX_SIZE_LIMIT};
use gframe::image_processing::SUPPORTED_EXTENSIONS;
use gframe::paths::PhotoPicker;
use std::path::PathBuf;

const MENU_ENTRIES: [Option<MenuAction>; 4] = [
    Some(MenuAction::Preferences),
    Some(MenuAction::Open),
    None, // separator
    Some(MenuAction::Quit),
];

/// Native, blocking file dialog
pub struct RfdPicker;

impl PhotoPicker for RfdPicker {
    fn pick_photo(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Choose File")
            .add_filter("Images", SUPPORTED_EXTENSIONS)
            .add_filter("All files", &["*"])
            .pick_file()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PreferencesDecision {
    Confirm,
    Cancel,
}

impl FrameApp {
    pub(super) fn render_menu(&mut self, ctx: &egui::Context) {
        let Some(mut menu) = self.menu else {
            return;
        };

        // The press that opened the menu must be released before outside
        // clicks can close it again
        if !menu.armed && !ctx.input(|i| i.pointer.any_down() || i.pointer.any_released()) {
            menu.armed = true;
        }

        let mut selected = None;
        let area = egui::Area::new(egui::Id::new("frame_menu"))
            .fixed_pos(menu.anchor)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::menu(ui.style()).show(ui, |ui| {
                    ui.set_min_width(110.0);
                    for entry in MENU_ENTRIES {
                        match entry {
                            Some(action) => {
                                if ui.button(action.label()).clicked() {
                                    selected = Some(action);
                                }
                            }
                            None => {
                                ui.separator();
                            }
                        }
                    }
                });
            });

        let dismissed = ctx.input(|i| i.key_pressed(egui::Key::Escape))
            || (menu.armed && area.response.clicked_elsewhere());

        self.menu = if selected.is_some() || dismissed {
            None
        } else {
            Some(menu)
        };

        if let Some(action) = selected {
            self.handle_menu_action(ctx, action);
        }
    }

    fn handle_menu_action(&mut self, ctx: &egui::Context, action: MenuAction) {
        match self.frame.on_menu_select(action, &mut RfdPicker) {
            MenuOutcome::Nothing => {}
            MenuOutcome::Commands(commands) => self.apply(ctx, &commands),
            MenuOutcome::EditPreferences { max_size } => self.preferences = Some(max_size),
        }
    }

    /// Preferences dialog in its own window. Only one number to edit: the
    /// largest width or height the photo is shown at.
    pub(super) fn render_preferences(&mut self, ctx: &egui::Context) {
        let Some(mut max_size) = self.preferences else {
            return;
        };

        let decision = ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("gframe_preferences"),
            egui::ViewportBuilder::default()
                .with_title("Preferences")
                .with_inner_size([280.0, 100.0])
                .with_resizable(false),
            |ctx, _class| {
                if ctx.input(|i| i.viewport().close_requested() || i.key_pressed(egui::Key::Escape))
                {
                    return Some(PreferencesDecision::Cancel);
                }
                let clicked = egui::CentralPanel::default()
                    .show(ctx, |ui| {
                        ui.horizontal(|ui| {
                            ui.label("Maximum size:");
                            ui.add(
                                egui::DragValue::new(&mut max_size)
                                    .range(0..=MAX_SIZE_LIMIT)
                                    .suffix(" px"),
                            );
                        });
                        ui.add_space(10.0);

                        ui.horizontal(|ui| {
                            if ui.button("Cancel").clicked() {
                                return Some(PreferencesDecision::Cancel);
                            }
                            if ui.button("OK").clicked() {
                                return Some(PreferencesDecision::Confirm);
                            }
                            None
                        })
                        .inner
                    })
                    .inner;

                // Checked after the panel so an edit committed by Enter is kept
                clicked.or_else(|| {
                    ctx.input(|i| i.key_pressed(egui::Key::Enter))
                        .then_some(PreferencesDecision::Confirm)
                })
            },
        );

        match decision {
            None => self.preferences = Some(max_size),
            Some(PreferencesDecision::Cancel) => self.preferences = None,
            Some(PreferencesDecision::Confirm) => {
                self.preferences = None;
                let commands = self.frame.apply_max_size(max_size);
                self.apply(ctx, &commands);
            }
        }
    }
}
