use egui::{Button, TextEdit, Ui};
use maneloca_engine::{page_numbers, parse_jump, PageItem};

/// Previous / numbered window / next buttons plus a jump-to-page box.
pub struct PaginationBar<'a> {
    current_page: usize,
    total_pages: usize,
    jump_text: &'a mut String,
}

impl<'a> PaginationBar<'a> {
    pub fn new(current_page: usize, total_pages: usize, jump_text: &'a mut String) -> Self {
        Self {
            current_page,
            total_pages,
            jump_text,
        }
    }

    /// Returns the page the user asked for, already inside `1..=total_pages`.
    pub fn show(self, ui: &mut Ui) -> Option<usize> {
        let Self {
            current_page,
            total_pages,
            jump_text,
        } = self;
        let mut requested = None;

        ui.horizontal(|ui| {
            if ui
                .add_enabled(current_page > 1, Button::new("<"))
                .clicked()
            {
                requested = Some(current_page - 1);
            }

            for item in page_numbers(current_page, total_pages) {
                match item {
                    PageItem::Page(page) => {
                        if ui
                            .selectable_label(page == current_page, page.to_string())
                            .clicked()
                        {
                            requested = Some(page);
                        }
                    }
                    PageItem::Ellipsis => {
                        ui.add_enabled(false, Button::new("..."));
                    }
                }
            }

            if ui
                .add_enabled(current_page < total_pages, Button::new(">"))
                .clicked()
            {
                requested = Some(current_page + 1);
            }

            ui.add_space(16.0);
            ui.add(
                TextEdit::singleline(jump_text)
                    .hint_text("Page")
                    .desired_width(48.0),
            );
            if ui.button("Go").clicked() {
                if let Some(page) = parse_jump(jump_text, total_pages) {
                    requested = Some(page);
                    jump_text.clear();
                }
            }
        });

        requested.filter(|page| *page != current_page)
    }
}
