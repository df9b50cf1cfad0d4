use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use crate::{
    about,
    config::ViewerConfig,
    error::ManeLocaError,
    export::{export_visible, ExportOutcome},
    loader::{BackgroundLoader, DataSource},
    save::{select_save_target, SaveTarget},
    TRANSLATIONS,
};
use eframe::egui::{self, Button, Color32, RichText, TextEdit, Ui};
use maneloca_engine::{LoadOutcome, Operation, ViewerEngine};
use maneloca_gui::{version_switch, Debouncer, FilterInputs, PaginationBar, RecordTable, TableEvent};
use maneloca_protocol::{BuildVersion, Column};
use tracing::{debug, warn};

const SEARCH_DELAY: Duration = Duration::from_millis(300);
const FILTER_DELAY: Duration = Duration::from_millis(150);

struct Status {
    text: String,
    is_error: bool,
}

pub struct ManeLocaApp {
    config: ViewerConfig,
    source: DataSource,
    engine: ViewerEngine,
    loader: BackgroundLoader,
    save_target: Box<dyn SaveTarget>,
    ctx: egui::Context,
    /// Build shown in the switch, including while it is still loading.
    selected: BuildVersion,
    search_text: String,
    search_debounce: Debouncer<String>,
    filter_inputs: FilterInputs,
    filter_debounce: BTreeMap<Column, Debouncer<String>>,
    jump_text: String,
    status: Option<Status>,
}

impl ManeLocaApp {
    pub fn new(ctx: &egui::Context, config: ViewerConfig, initial: BuildVersion) -> Self {
        if !TRANSLATIONS.has_language(&config.language) {
            warn!(language = %config.language, "no translations for language, using English");
        }
        let mut app = Self {
            source: config.data_source(),
            engine: ViewerEngine::new(config.no_match_policy),
            loader: BackgroundLoader::new(),
            save_target: select_save_target(&config),
            ctx: ctx.clone(),
            selected: initial,
            search_text: String::new(),
            search_debounce: Debouncer::new(SEARCH_DELAY),
            filter_inputs: FilterInputs::default(),
            filter_debounce: BTreeMap::new(),
            jump_text: String::new(),
            status: None,
            config,
        };
        app.switch_version(initial);
        app
    }

    fn tr(&self, key: &str) -> String {
        TRANSLATIONS.get(&self.config.language, key)
    }

    fn tr_format(&self, key: &str, args: &[(&str, &str)]) -> String {
        TRANSLATIONS.format(&self.config.language, key, args)
    }

    fn set_status(&mut self, text: String, is_error: bool) {
        self.status = Some(Status { text, is_error });
    }

    fn switch_version(&mut self, version: BuildVersion) {
        self.selected = version;
        let ticket = self.engine.begin_load(version);
        let ctx = self.ctx.clone();
        self.loader
            .request(self.source.clone(), ticket, move || ctx.request_repaint());
    }

    fn poll_loader(&mut self) {
        for message in self.loader.drain() {
            let version = message.ticket.version;
            match self.engine.finish_load(message.ticket, message.result) {
                LoadOutcome::Applied { .. } => {
                    self.search_text.clear();
                    self.search_debounce.reset();
                    self.filter_inputs.clear();
                    self.filter_debounce.clear();
                    self.jump_text.clear();
                    self.status = None;
                    let title = format!("{} - {version}", self.tr("app_title"));
                    self.ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
                }
                LoadOutcome::Superseded => {}
                LoadOutcome::Failed { message } => {
                    let text = self.tr_format(
                        "load_failed",
                        &[("version", version.name()), ("error", message.as_str())],
                    );
                    self.set_status(text, true);
                    // Fall back to what is actually on screen.
                    if let Some(current) = self.engine.version() {
                        self.selected = current;
                    }
                }
            }
        }
    }

    fn apply(&mut self, op: Operation) {
        match self.engine.apply(op) {
            Ok(result) => {
                for warning in result.warnings {
                    self.set_status(warning, true);
                }
            }
            Err(e) => debug!(error = %e, "operation ignored"),
        }
    }

    /// Forwards settled search and filter input to the engine.
    fn poll_debouncers(&mut self, now: Instant) {
        if let Some(query) = self.search_debounce.poll(now) {
            self.apply(Operation::LocateQuery { query });
        }
        let settled: Vec<(Column, String)> = self
            .filter_debounce
            .iter_mut()
            .filter_map(|(column, debouncer)| debouncer.poll(now).map(|text| (*column, text)))
            .collect();
        for (column, needle) in settled {
            self.apply(Operation::SetColumnFilter { column, needle });
        }
    }

    fn next_debounce_deadline(&self, now: Instant) -> Option<Duration> {
        std::iter::once(&self.search_debounce)
            .chain(self.filter_debounce.values())
            .filter_map(|d| d.remaining(now))
            .min()
    }

    fn export(&mut self) {
        let Some(version) = self.engine.version() else {
            return;
        };
        let rows = self.engine.visible();
        let outcome = export_visible(&rows, version, self.save_target.as_ref());
        match outcome {
            Ok(ExportOutcome::Saved(path)) => {
                let text = format!("{} ({})", self.tr("saved"), path.display());
                self.set_status(text, false);
            }
            Ok(ExportOutcome::Canceled) => {}
            Err(ManeLocaError::EmptyExport) => {
                let text = self.tr("no_export_data");
                self.set_status(text, true);
            }
            Err(e) => {
                let text = self.tr_format("export_failed", &[("error", e.to_string().as_str())]);
                self.set_status(text, true);
            }
        }
    }

    fn render_top_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading(self.tr("app_title"));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(version) = version_switch(ui, self.selected) {
                    self.switch_version(version);
                }
                ui.hyperlink_to(self.tr("source_link"), about::SOURCE_URL);
            });
        });
    }

    fn render_search_bar(&mut self, ui: &mut Ui, now: Instant) {
        ui.horizontal(|ui| {
            let hint = self.tr("search_hint");
            let width = (ui.available_width() - 100.0).max(200.0);
            let edit = ui.add(
                TextEdit::singleline(&mut self.search_text)
                    .hint_text(hint)
                    .desired_width(width),
            );
            if edit.changed() {
                self.search_debounce.input(self.search_text.clone(), now);
            }
            let can_export = self.engine.visible_len() > 0;
            if ui
                .add_enabled(can_export, Button::new(self.tr("export")))
                .clicked()
            {
                self.export();
            }
        });

        let search = self.engine.search();
        if search.is_miss() {
            if let Some(query) = &search.query {
                let text = self.tr_format("no_match", &[("query", query.to_string().as_str())]);
                ui.weak(text);
            }
        }
    }

    fn render_status(&self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let count = self.engine.visible_len().to_string();
            ui.label(self.tr_format("status_rows", &[("count", count.as_str())]));
            if let Some(status) = &self.status {
                ui.separator();
                let text = RichText::new(&status.text);
                if status.is_error {
                    ui.label(text.color(Color32::RED));
                } else {
                    ui.label(text);
                }
            }
        });
    }

    fn render_loading(&self, ui: &mut Ui) {
        ui.centered_and_justified(|ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(self.tr_format("loading", &[("version", self.selected.name())]));
            });
        });
    }

    fn render_table(&mut self, ui: &mut Ui) {
        let empty_text = self.tr("no_data");
        let rows = self.engine.current_page_records();
        let events = RecordTable::new(
            &rows,
            &mut self.filter_inputs,
            self.engine.filters(),
            &empty_text,
        )
        .show(ui);

        let now = Instant::now();
        for event in events {
            match event {
                TableEvent::FilterEdited { column, text } => {
                    self.filter_debounce
                        .entry(column)
                        .or_insert_with(|| Debouncer::new(FILTER_DELAY))
                        .input(text, now);
                }
                TableEvent::ExactToggled { column, exact } => {
                    self.apply(Operation::SetExactMatch { column, exact });
                }
            }
        }
    }
}

impl eframe::App for ManeLocaApp {
    // Required by eframe 0.34; all rendering happens in `update`, which
    // eframe still calls immediately before `ui`.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.poll_loader();
        self.poll_debouncers(now);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            self.render_top_bar(ui);
        });

        if self.engine.is_loading() {
            egui::CentralPanel::default().show(ctx, |ui| {
                self.render_loading(ui);
            });
            return;
        }

        if self.engine.version().is_none() {
            // Nothing loaded yet and the last attempt failed.
            egui::CentralPanel::default().show(ctx, |ui| {
                self.render_status(ui);
                if ui.button(self.tr("retry")).clicked() {
                    self.switch_version(self.selected);
                }
            });
            return;
        }

        egui::TopBottomPanel::bottom("bottom").show(ctx, |ui| {
            let page = self.engine.page_state();
            let requested =
                PaginationBar::new(page.current_page, page.total_pages, &mut self.jump_text)
                    .show(ui);
            if let Some(page) = requested {
                self.apply(Operation::SetPage { page });
            }
            self.render_status(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_search_bar(ui, now);
            ui.add_space(4.0);
            self.render_table(ui);
        });

        if let Some(wait) = self.next_debounce_deadline(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}
