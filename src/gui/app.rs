use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::path::{Path, PathBuf};

use crate::backend::aggregate::{self, Aggregate};
use crate::backend::document::Document;
use crate::backend::editor::CellEditor;
use crate::backend::format::{self, FormatCommand};
use crate::backend::io;
use crate::backend::settings::{Settings, Theme};

#[derive(PartialEq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// One transient dialog at a time: aggregate results, save
/// confirmations, unsupported commands, file errors.
pub struct Notice {
    kind: NoticeKind,
    title: String,
    message: String,
}

impl Notice {
    fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

pub struct EditorState {
    document: Document,
    editor: CellEditor,
    selected_cell: Option<(usize, usize)>,
    column_widths: Vec<f32>,
}

impl EditorState {
    fn new(document: Document) -> Self {
        let column_widths = document.table().estimate_column_widths();
        Self {
            document,
            editor: CellEditor::new(),
            selected_cell: None,
            column_widths,
        }
    }
}

pub enum AppState {
    Welcome,
    Editor(EditorState),
}

/// Menu clicks are recorded here and applied after the panels are done
/// rendering, so handlers never fight the UI closures over `&mut self`.
enum MenuAction {
    OpenDialog,
    OpenPath(PathBuf),
    SaveAsDialog,
    ExportJsonDialog,
    Exit,
    Aggregate(Aggregate),
    Format(FormatCommand),
}

pub struct GuiApp {
    state: AppState,
    settings: Settings,
    show_settings: bool,
    notice: Option<Notice>,
}

impl GuiApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, document: Option<Document>) -> Self {
        let mut settings = Settings::load();
        let state = match document {
            Some(doc) => {
                if let Some(path) = doc.path() {
                    settings.add_recent_file(&path.to_string_lossy());
                }
                AppState::Editor(EditorState::new(doc))
            }
            None => AppState::Welcome,
        };
        Self {
            state,
            settings,
            show_settings: false,
            notice: None,
        }
    }

    fn open_document(&mut self, path: &Path) {
        match Document::open(path) {
            Ok(doc) => {
                tracing::info!(path = %path.display(), rows = doc.table().num_rows(), "opened file");
                self.settings.add_recent_file(&path.to_string_lossy());
                // Wholesale replacement: any prior table, edits, and
                // pending editor session are gone.
                self.state = AppState::Editor(EditorState::new(doc));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "open failed");
                self.notice = Some(Notice::error(format!("Unable to open file: {:#}", e)));
            }
        }
    }

    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new().add_filter("CSV", &["csv"]).pick_file() {
            self.open_document(&path);
        }
    }

    fn save_file_dialog(&mut self) {
        let AppState::Editor(state) = &mut self.state else {
            return;
        };
        let dialog = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(state.document.file_name());
        if let Some(path) = dialog.save_file() {
            match state.document.save_as(&path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "saved file");
                    self.notice = Some(Notice::info("Saved", "File saved successfully."));
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "save failed");
                    self.notice = Some(Notice::error(format!("Unable to save file: {:#}", e)));
                }
            }
        }
    }

    fn export_json_dialog(&mut self) {
        let AppState::Editor(state) = &self.state else {
            return;
        };
        if let Some(path) = rfd::FileDialog::new().add_filter("JSON", &["json"]).save_file() {
            match io::export_json(&path, state.document.table()) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "exported JSON");
                    self.notice = Some(Notice::info("Exported", "JSON exported successfully."));
                }
                Err(e) => {
                    self.notice = Some(Notice::error(format!("Unable to export JSON: {:#}", e)));
                }
            }
        }
    }

    fn run_aggregate(&mut self, aggregate: Aggregate) {
        let result = match &self.state {
            AppState::Editor(state) => aggregate::compute(aggregate, state.document.table().cells()),
            AppState::Welcome => aggregate::compute(aggregate, std::iter::empty()),
        };
        self.notice = Some(match result {
            Ok(value) => {
                tracing::debug!(aggregate = aggregate.name(), value, "computed aggregate");
                Notice::info(
                    aggregate.name(),
                    format!("{} = {}", aggregate.name(), aggregate::format_value(value)),
                )
            }
            Err(e) => Notice::error(e.to_string()),
        });
    }

    fn run_format(&mut self, command: FormatCommand) {
        if let Err(unsupported) = format::apply(command) {
            self.notice = Some(Notice::info(command.label(), unsupported.to_string()));
        }
    }

    fn apply_action(&mut self, action: MenuAction, ctx: &egui::Context) {
        match action {
            MenuAction::OpenDialog => self.open_file_dialog(),
            MenuAction::OpenPath(path) => self.open_document(&path),
            MenuAction::SaveAsDialog => self.save_file_dialog(),
            MenuAction::ExportJsonDialog => self.export_json_dialog(),
            MenuAction::Exit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            MenuAction::Aggregate(aggregate) => self.run_aggregate(aggregate),
            MenuAction::Format(command) => self.run_format(command),
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) -> Option<MenuAction> {
        let mut action = None;
        let has_document = matches!(self.state, AppState::Editor(_));

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open…").clicked() {
                        action = Some(MenuAction::OpenDialog);
                        ui.close();
                    }
                    ui.menu_button("Open Recent", |ui| {
                        if self.settings.recent_files.is_empty() {
                            ui.weak("(empty)");
                        }
                        for recent in &self.settings.recent_files {
                            if ui.button(recent).clicked() {
                                action = Some(MenuAction::OpenPath(PathBuf::from(recent)));
                                ui.close();
                            }
                        }
                    });
                    ui.separator();
                    if ui.add_enabled(has_document, egui::Button::new("Save As…")).clicked() {
                        action = Some(MenuAction::SaveAsDialog);
                        ui.close();
                    }
                    if ui.add_enabled(has_document, egui::Button::new("Export JSON…")).clicked() {
                        action = Some(MenuAction::ExportJsonDialog);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        action = Some(MenuAction::Exit);
                        ui.close();
                    }
                });
                ui.menu_button("Functions", |ui| {
                    for &aggregate in Aggregate::all() {
                        if ui.button(aggregate.name()).clicked() {
                            action = Some(MenuAction::Aggregate(aggregate));
                            ui.close();
                        }
                    }
                });
                ui.menu_button("Format", |ui| {
                    for &command in FormatCommand::all() {
                        if ui.button(command.label()).clicked() {
                            action = Some(MenuAction::Format(command));
                            ui.close();
                        }
                    }
                });
                if ui.button("Settings").clicked() {
                    self.show_settings = true;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let AppState::Editor(state) = &self.state {
                        let mut name = state.document.file_name();
                        if state.document.table().is_modified() {
                            name.push_str(" •");
                        }
                        ui.label(egui::RichText::new(name).color(egui::Color32::from_gray(150)));
                    }
                    ui.label(egui::RichText::new("csvdesk").strong());
                });
            });
        });

        action
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }
        let mut open = true;
        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Theme");
                egui::ComboBox::from_id_salt("theme_selector")
                    .selected_text(self.settings.theme.name())
                    .show_ui(ui, |ui| {
                        for &theme in Theme::all() {
                            ui.selectable_value(&mut self.settings.theme, theme, theme.name());
                        }
                    });
                ui.separator();
                ui.add(egui::Slider::new(&mut self.settings.font_size, 10.0..=24.0).text("Font Size"));
                ui.add(egui::Slider::new(&mut self.settings.row_height, 18.0..=48.0).text("Row Height"));
                ui.separator();
                if ui.button("Clear Recent Files").clicked() {
                    self.settings.recent_files.clear();
                }
                if ui.button("Save Settings").clicked() {
                    self.settings.save();
                }
            });
        if !open {
            self.show_settings = false;
        }
    }

    fn notice_window(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else {
            return;
        };
        let mut open = true;
        let mut dismissed = false;
        egui::Window::new(&notice.title)
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .pivot(egui::Align2::CENTER_CENTER)
            .default_pos(ctx.screen_rect().center())
            .show(ctx, |ui| {
                if notice.kind == NoticeKind::Error {
                    ui.colored_label(ui.visuals().error_fg_color, &notice.message);
                } else {
                    ui.label(&notice.message);
                }
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });
        if !open || dismissed {
            self.notice = None;
        }
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        apply_style(ctx, &self.settings);

        let mut action = self.menu_bar(ctx);

        // Dropping a file anywhere on the window opens it.
        if !ctx.input(|i| i.raw.dropped_files.is_empty()) {
            let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
            if let Some(path) = dropped_files.first().and_then(|f| f.path.clone()) {
                action = Some(MenuAction::OpenPath(path));
            }
        }

        match &mut self.state {
            AppState::Welcome => {
                let mut open_clicked = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(100.0);
                        ui.heading(egui::RichText::new("csvdesk").size(40.0).strong());
                        ui.label(
                            egui::RichText::new("Open a CSV file to start editing")
                                .size(16.0)
                                .color(egui::Color32::from_gray(150)),
                        );
                        ui.add_space(40.0);
                        if ui
                            .add(
                                egui::Button::new(egui::RichText::new("Open File").size(18.0))
                                    .min_size(egui::vec2(200.0, 50.0))
                                    .corner_radius(4.0),
                            )
                            .clicked()
                        {
                            open_clicked = true;
                        }
                    });
                });
                if open_clicked {
                    action = Some(MenuAction::OpenDialog);
                }
            }
            AppState::Editor(state) => {
                render_grid(state, ctx, &self.settings);
                render_edit_popup(state, ctx);
            }
        }

        self.settings_window(ctx);
        self.notice_window(ctx);

        if let Some(action) = action {
            self.apply_action(action, ctx);
        }
    }
}

fn render_grid(state: &mut EditorState, ctx: &egui::Context, settings: &Settings) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let total_rows = state.document.table().num_rows();
        let num_cols = state.document.table().num_cols();
        let mut scroll_target = None;

        // Keyboard navigation stays off while the popup owns the input.
        if !state.editor.is_open() && total_rows > 0 {
            if let Some((r, c)) = state.selected_cell {
                if ui.input(|i| i.key_pressed(egui::Key::ArrowDown)) {
                    let next_row = (r + 1).min(total_rows - 1);
                    state.selected_cell = Some((next_row, c));
                    scroll_target = Some(next_row);
                } else if ui.input(|i| i.key_pressed(egui::Key::ArrowUp)) {
                    let prev_row = r.saturating_sub(1);
                    state.selected_cell = Some((prev_row, c));
                    scroll_target = Some(prev_row);
                } else if ui.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
                    state.selected_cell = Some((r, (c + 1).min(num_cols.saturating_sub(1))));
                    scroll_target = Some(r);
                } else if ui.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
                    state.selected_cell = Some((r, c.saturating_sub(1)));
                    scroll_target = Some(r);
                } else if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    let value = state
                        .document
                        .table()
                        .get_cell(r, c)
                        .unwrap_or_default()
                        .to_string();
                    state.editor.open(r, c, &value);
                }
            } else if ui.input(|i| {
                i.key_pressed(egui::Key::ArrowDown)
                    || i.key_pressed(egui::Key::ArrowUp)
                    || i.key_pressed(egui::Key::ArrowRight)
                    || i.key_pressed(egui::Key::ArrowLeft)
            }) {
                state.selected_cell = Some((0, 0));
                scroll_target = Some(0);
            }
        }

        let row_height = settings.row_height;
        let mut clicked_cell = None;
        let mut double_clicked_cell = None;

        egui::ScrollArea::horizontal().show(ui, |ui| {
            let mut builder = TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::auto()); // row numbers

            for width in &state.column_widths {
                builder = builder.column(Column::initial(*width).resizable(true));
            }

            if let Some(target_row) = scroll_target {
                builder = builder.scroll_to_row(target_row, Some(egui::Align::Center));
            }

            builder
                .header(30.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("#");
                    });
                    for name in state.document.table().headers() {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(row_height, total_rows, |mut row| {
                        let row_index = row.index();
                        row.col(|ui| {
                            ui.label(
                                egui::RichText::new((row_index + 1).to_string())
                                    .color(egui::Color32::from_gray(100)),
                            );
                        });
                        for col_index in 0..num_cols {
                            row.col(|ui| {
                                let text = state
                                    .document
                                    .table()
                                    .get_cell(row_index, col_index)
                                    .unwrap_or_default()
                                    .to_string();
                                let is_selected = state.selected_cell == Some((row_index, col_index));

                                let response = ui.add(
                                    egui::Label::new(text).sense(egui::Sense::click()).truncate(),
                                );

                                if is_selected {
                                    ui.painter().rect_stroke(
                                        response.rect,
                                        0.0,
                                        egui::Stroke::new(2.0, egui::Color32::from_rgb(100, 200, 255)),
                                        egui::StrokeKind::Middle,
                                    );
                                }

                                if response.clicked() {
                                    clicked_cell = Some((row_index, col_index));
                                }
                                if response.double_clicked() {
                                    double_clicked_cell = Some((row_index, col_index));
                                }
                            });
                        }
                    });
                });
        });

        if let Some(cell) = clicked_cell {
            state.selected_cell = Some(cell);
        }
        if let Some((r, c)) = double_clicked_cell {
            let value = state
                .document
                .table()
                .get_cell(r, c)
                .unwrap_or_default()
                .to_string();
            state.selected_cell = Some((r, c));
            // Supersedes any session already pending on another cell.
            state.editor.open(r, c, &value);
        }
    });
}

fn render_edit_popup(state: &mut EditorState, ctx: &egui::Context) {
    let Some((row, col)) = state.editor.target() else {
        return;
    };

    let header = state
        .document
        .table()
        .headers()
        .get(col)
        .cloned()
        .unwrap_or_else(|| format!("Col {}", col));

    let mut window_open = true;
    let mut save_clicked = false;
    egui::Window::new("Edit Cell")
        .open(&mut window_open)
        .collapsible(false)
        .resizable(false)
        .pivot(egui::Align2::CENTER_CENTER)
        .default_pos(ctx.screen_rect().center())
        .show(ctx, |ui| {
            ui.label(format!("{} (row {})", header, row + 1));
            if let Some(buffer) = state.editor.buffer_mut() {
                let response = ui.text_edit_singleline(buffer);
                response.request_focus();
                if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    save_clicked = true;
                }
            }
            ui.add_space(4.0);
            if ui.button("Save").clicked() {
                save_clicked = true;
            }
        });

    if save_clicked {
        if let Some((r, c, value)) = state.editor.commit() {
            state.document.table_mut().set_cell(r, c, value);
        }
    } else if !window_open {
        // Dismissed without saving: the cell keeps its original value.
        state.editor.cancel();
    }
}

fn apply_style(ctx: &egui::Context, settings: &Settings) {
    match settings.theme {
        Theme::System => {
            ctx.set_visuals(egui::Visuals::default());
        }
        Theme::Dark => {
            let mut visuals = egui::Visuals::dark();
            visuals.window_corner_radius = 8.0.into();
            ctx.set_visuals(visuals);
        }
        Theme::Light => {
            ctx.set_visuals(egui::Visuals::light());
        }
    }

    let mut style = (*ctx.style()).clone();
    if let Some(body) = style.text_styles.get_mut(&egui::TextStyle::Body) {
        body.size = settings.font_size;
    }
    ctx.set_style(style);
}
