use egui::{Align, Layout, TextEdit, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};
use maneloca_engine::FilterState;
use maneloca_protocol::{Column, Record};
use std::collections::BTreeMap;

const ROW_HEIGHT: f32 = 20.0;
const HEADER_HEIGHT: f32 = 52.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    FilterEdited { column: Column, text: String },
    ExactToggled { column: Column, exact: bool },
}

/// Text currently typed into each column's filter box.
///
/// This is what the user sees, which runs ahead of the engine's filter state
/// while input is being debounced.
#[derive(Debug, Clone, Default)]
pub struct FilterInputs {
    texts: BTreeMap<Column, String>,
}

impl FilterInputs {
    pub fn text(&self, column: Column) -> &str {
        self.texts.get(&column).map(String::as_str).unwrap_or("")
    }

    pub fn text_mut(&mut self, column: Column) -> &mut String {
        self.texts.entry(column).or_default()
    }

    pub fn clear(&mut self) {
        self.texts.clear();
    }
}

/// The records of one page with a filter row above them.
pub struct RecordTable<'a> {
    rows: &'a [&'a Record],
    inputs: &'a mut FilterInputs,
    filters: &'a FilterState,
    empty_text: &'a str,
}

impl<'a> RecordTable<'a> {
    pub fn new(
        rows: &'a [&'a Record],
        inputs: &'a mut FilterInputs,
        filters: &'a FilterState,
        empty_text: &'a str,
    ) -> Self {
        Self {
            rows,
            inputs,
            filters,
            empty_text,
        }
    }

    pub fn show(self, ui: &mut Ui) -> Vec<TableEvent> {
        let Self {
            rows,
            inputs,
            filters,
            empty_text,
        } = self;
        let mut events = Vec::new();

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(TableColumn::auto().at_least(90.0), Column::TABLE.len())
            .header(HEADER_HEIGHT, |mut header| {
                for column in Column::TABLE {
                    header.col(|ui| {
                        ui.vertical(|ui| {
                            ui.strong(column.header());
                            ui.horizontal(|ui| {
                                let text = inputs.text_mut(column);
                                let edit = ui.add(
                                    TextEdit::singleline(text)
                                        .hint_text("Filter...")
                                        .desired_width(90.0),
                                );
                                if edit.changed() {
                                    events.push(TableEvent::FilterEdited {
                                        column,
                                        text: inputs.text(column).to_string(),
                                    });
                                }

                                let exact = filters.is_exact(column);
                                let (label, hover) = if exact {
                                    ("=", "Exact Match Mode")
                                } else {
                                    ("~", "Fuzzy Match Mode")
                                };
                                if ui.selectable_label(exact, label).on_hover_text(hover).clicked() {
                                    events.push(TableEvent::ExactToggled {
                                        column,
                                        exact: !exact,
                                    });
                                }
                            });
                        });
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let record = rows[row.index()];
                    for column in Column::TABLE {
                        row.col(|ui| {
                            ui.label(&*record.field_text(column));
                        });
                    }
                });
            });

        if rows.is_empty() {
            ui.vertical_centered(|ui| {
                ui.weak(empty_text);
            });
        }
        events
    }
}
