use crate::clipboard::SystemClipboard;
use crate::controller::{PopupController, StatusKind};
use crate::direction::{Direction, TextLayout};
use crate::worker::TranslationWorker;
use eframe::egui;
use egui::Color32;
use egui_phosphor::regular as icons;
use std::fs;
use std::time::{Duration, Instant};

const TITLE: &str = "Darija Translator";

const WARNING_RED: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);
const MUTED_GRAY: Color32 = Color32::from_rgb(0x6b, 0x72, 0x80);
const SUCCESS_GREEN: Color32 = Color32::from_rgb(0x22, 0xc5, 0x5e);
const LOADING_BLUE: Color32 = Color32::from_rgb(0x4f, 0x46, 0xe5);

pub const EXAMPLE_PHRASES: &[&str] = &[
    "Hello, how are you?",
    "Good morning",
    "Thank you very much",
    "Where is the train station?",
    "كيداير؟",
    "شكرا بزاف",
];

// Fonts with Arabic coverage; egui's bundled fonts have none.
const ARABIC_FONT_CANDIDATES: &[&str] = &[
    r"C:\Windows\Fonts\segoeui.ttf",
    r"C:\Windows\Fonts\tahoma.ttf",
    r"C:\Windows\Fonts\arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansArabic-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

/// One discrete user action, collected while drawing and applied afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Translate,
    Clear,
    Swap,
    Copy,
    SetDirection(Direction),
    Example(&'static str),
}

struct PopupApp {
    controller: PopupController<SystemClipboard>,
    worker: TranslationWorker,
}

fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    let loaded = ARABIC_FONT_CANDIDATES
        .iter()
        .find_map(|path| fs::read(path).ok().map(|bytes| (*path, bytes)));
    match loaded {
        Some((path, bytes)) => {
            fonts.font_data.insert("arabic".to_owned(), egui::FontData::from_owned(bytes));
            for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
                fonts.families.entry(family).or_default().push("arabic".to_owned());
            }
            tracing::info!("Loaded Arabic fallback font: {}", path);
        }
        None => tracing::warn!("No Arabic-capable font found; Darija may render as squares"),
    }
    ctx.set_fonts(fonts);
}

fn align_for(layout: TextLayout) -> egui::Align {
    match layout {
        TextLayout::LeftToRight => egui::Align::LEFT,
        TextLayout::RightToLeft => egui::Align::RIGHT,
    }
}

fn status_color(kind: StatusKind) -> Color32 {
    match kind {
        StatusKind::Neutral => MUTED_GRAY,
        StatusKind::Loading => LOADING_BLUE,
        StatusKind::Success => SUCCESS_GREEN,
        StatusKind::Error => WARNING_RED,
    }
}

impl PopupApp {
    fn dispatch(&mut self, action: Action) {
        match action {
            Action::Translate => self.worker.start(&mut self.controller),
            Action::Clear => self.controller.clear_all(),
            Action::Swap => self.controller.swap_languages(),
            Action::Copy => self.controller.copy_to_clipboard(Instant::now()),
            Action::SetDirection(direction) => self.controller.set_direction(direction),
            Action::Example(text) => self.controller.select_example(text),
        }
    }

    fn header(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            ui.heading(TITLE);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let current = self.controller.direction();
                egui::ComboBox::from_id_source("direction")
                    .selected_text(current.label())
                    .show_ui(ui, |ui| {
                        for direction in Direction::ALL {
                            if ui.selectable_label(direction == current, direction.label()).clicked()
                                && direction != current
                            {
                                actions.push(Action::SetDirection(direction));
                            }
                        }
                    });
                ui.label("Mode:");
            });
        });
    }

    fn text_areas(&mut self, ui: &mut egui::Ui) {
        let (input_layout, output_layout) = self.controller.layouts();
        let count = self.controller.char_count().clone();

        ui.columns(2, |cols| {
            cols[0].horizontal(|ui| {
                ui.strong("Source text");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let color = if count.warning { WARNING_RED } else { MUTED_GRAY };
                    ui.colored_label(color, &count.label);
                });
            });
            let edited = cols[0]
                .add(
                    egui::TextEdit::multiline(self.controller.input_mut())
                        .hint_text("Enter your text here...")
                        .horizontal_align(align_for(input_layout))
                        .desired_rows(12)
                        .desired_width(f32::INFINITY),
                )
                .changed();
            if edited {
                self.controller.update_character_count();
            }

            cols[1].strong("Translation");
            let mut output = self.controller.output();
            cols[1].add(
                egui::TextEdit::multiline(&mut output)
                    .hint_text("The translation will appear here...")
                    .horizontal_align(align_for(output_layout))
                    .desired_rows(12)
                    .desired_width(f32::INFINITY),
            );
        });
    }

    fn buttons(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>, now: Instant) {
        let controls = self.controller.controls();
        let flashing = self.controller.copy_flashing(now);

        ui.horizontal(|ui| {
            let translate_label = if controls.translate_busy {
                format!("{} Translating...", icons::HOURGLASS)
            } else {
                format!("{} Translate", icons::TRANSLATE)
            };
            if ui.add_enabled(controls.translate_enabled, egui::Button::new(translate_label)).clicked() {
                actions.push(Action::Translate);
            }
            if controls.translate_busy {
                ui.spinner();
            }
            if ui
                .add_enabled(controls.clear_enabled, egui::Button::new(format!("{} Clear", icons::TRASH)))
                .clicked()
            {
                actions.push(Action::Clear);
            }
            if ui
                .add_enabled(
                    controls.swap_enabled,
                    egui::Button::new(format!("{} Swap", icons::ARROWS_LEFT_RIGHT)),
                )
                .clicked()
            {
                actions.push(Action::Swap);
            }
            let mut copy = egui::Button::new(format!("{} Copy", icons::COPY));
            if flashing {
                copy = copy.fill(SUCCESS_GREEN);
            }
            if ui.add_enabled(controls.copy_enabled, copy).clicked() {
                actions.push(Action::Copy);
            }
        });
    }

    fn examples(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.label("Examples:");
        ui.horizontal_wrapped(|ui| {
            for phrase in EXAMPLE_PHRASES {
                if ui.link(*phrase).clicked() {
                    actions.push(Action::Example(*phrase));
                }
            }
        });
    }
}

impl eframe::App for PopupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.worker.deliver(&mut self.controller);

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("top").show(ctx, |ui| self.header(ui, &mut actions));

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let status = self.controller.status();
            ui.colored_label(status_color(status.kind), &status.message);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.text_areas(ui);
            ui.add_space(8.0);
            self.buttons(ui, &mut actions, now);
            ui.separator();
            self.examples(ui, &mut actions);
        });

        for action in actions {
            tracing::debug!("UI action: {:?}", action);
            self.dispatch(action);
        }

        // Wake up while waiting on the worker or a copy flash, even without user input
        if self.controller.is_busy() || self.controller.copy_flashing(now) {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

/// Opens the popup window and blocks until it is closed.
pub fn run(worker: TranslationWorker) -> anyhow::Result<()> {
    let controller = PopupController::new(SystemClipboard::default());
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([760.0, 520.0])
            .with_always_on_top(),
        ..Default::default()
    };

    tracing::info!("Popup: starting event loop");
    eframe::run_native(
        TITLE,
        native_options,
        Box::new(move |cc| {
            install_fonts(&cc.egui_ctx);
            Box::new(PopupApp { controller, worker })
        }),
    )
    .map_err(|e| anyhow::anyhow!("popup window error: {}", e))?;
    tracing::info!("Popup: event loop exited");
    Ok(())
}
