use eframe::egui;
use thiserror::Error;

use crate::event::{self, Event};
use crate::view::{ImageFrame, View, WindowLayout};

/// Core application trait driven by the native runner.
///
/// Each frame the runner feeds translated input events through
/// [`update`](Application::update) in arrival order, then draws
/// [`view`](Application::view).
pub trait Application {
    /// Window title.
    fn title(&self) -> String;

    /// Apply one input event.
    fn update(&mut self, event: Event);

    /// Produce the display model for the current state.
    fn view(&self) -> View;

    /// Whether the application has finished and the window should close.
    fn wants_close(&self) -> bool;

    /// Called exactly once, right before the window closes.
    fn on_close(&mut self) {}
}

/// Settings for running an application.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Window title (overridden by [`Application::title`] once running)
    pub window_title: Option<String>,
    /// Geometry rule for sizing the window around the image.
    pub layout: WindowLayout,
    /// Font size of the status line.
    pub status_font_size: f32,
    /// Font size of the label line.
    pub label_font_size: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_title: None,
            layout: WindowLayout::default(),
            status_font_size: 18.0,
            label_font_size: 30.0,
        }
    }
}

/// Errors from the native runner.
#[derive(Error, Debug)]
pub enum UiError {
    /// The host toolkit failed to start or crashed.
    #[error("UI toolkit error: {0}")]
    Toolkit(#[from] eframe::Error),
}

/// Run an application until it asks to close or the window is closed.
pub fn run<A: Application + 'static>(app: A, settings: Settings) -> Result<(), UiError> {
    let title = settings
        .window_title
        .clone()
        .unwrap_or_else(|| app.title());
    let layout = settings.layout;
    let initial = app
        .view()
        .image
        .map(|image| layout.window_size(image.width, image.height))
        .unwrap_or_else(|| layout.window_size(0, 0));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([initial.0, initial.1])
            .with_resizable(false),
        ..Default::default()
    };

    log::debug!("Opening window '{}' at {}x{}", title, initial.0, initial.1);

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |_cc| Ok(Box::new(Runner::new(app, settings)))),
    )?;
    Ok(())
}

/// Adapter between an [`Application`] and eframe's frame loop.
struct Runner<A: Application> {
    app: A,
    settings: Settings,
    texture: Option<(u64, egui::TextureHandle)>,
    title: String,
    closed: bool,
}

impl<A: Application> Runner<A> {
    fn new(app: A, settings: Settings) -> Self {
        Self {
            app,
            settings,
            texture: None,
            title: String::new(),
            closed: false,
        }
    }

    fn close(&mut self, ctx: &egui::Context) {
        self.finish();
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    /// Run [`Application::on_close`] unless it already ran.
    fn finish(&mut self) {
        if !self.closed {
            self.closed = true;
            self.app.on_close();
        }
    }

    /// Upload the image if it changed and resize the window around it.
    fn sync_image(&mut self, ctx: &egui::Context, image: &ImageFrame) {
        if matches!(&self.texture, Some((key, _)) if *key == image.key) {
            return;
        }

        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [image.width as usize, image.height as usize],
            &image.rgba,
        );
        let handle = ctx.load_texture("segment", color_image, egui::TextureOptions::NEAREST);
        self.texture = Some((image.key, handle));

        let (width, height) = self.settings.layout.window_size(image.width, image.height);
        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(width, height)));
        log::trace!(
            "Uploaded segment texture {} ({}x{}), window {}x{}",
            image.key,
            image.width,
            image.height,
            width,
            height
        );
    }

    fn paint(&self, ctx: &egui::Context, view: &View) {
        let layout = self.settings.layout;

        egui::TopBottomPanel::top("status_line")
            .exact_height(layout.padding_top)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new(&view.status_text).size(self.settings.status_font_size),
                );
            });

        egui::TopBottomPanel::bottom("label_line")
            .exact_height(layout.padding_bottom)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(format!("Label: {}", view.label_with_cursor()))
                        .size(self.settings.label_font_size)
                        .monospace(),
                );
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::WHITE))
            .show(ctx, |ui| {
                if let Some((_, texture)) = &self.texture {
                    ui.vertical_centered(|ui| {
                        ui.image((texture.id(), texture.size_vec2()));
                    });
                }
            });
    }
}

impl<A: Application> eframe::App for Runner<A> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.closed {
            return;
        }

        if ctx.input(|i| i.viewport().close_requested()) {
            self.app.update(Event::CloseRequested);
        }

        let events = ctx.input(|i| i.events.clone());
        for event in events.iter().filter_map(event::from_egui) {
            if self.app.wants_close() {
                break;
            }
            self.app.update(event);
        }

        if self.app.wants_close() {
            self.close(ctx);
            return;
        }

        let title = self.app.title();
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }

        let view = self.app.view();
        if let Some(image) = &view.image {
            self.sync_image(ctx, image);
        }
        self.paint(ctx, &view);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Covers exits that never reach `update` with a close request.
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::App;

    #[derive(Default)]
    struct CloseCounter {
        done: bool,
        closes: usize,
    }

    impl Application for CloseCounter {
        fn title(&self) -> String {
            "test".to_string()
        }

        fn update(&mut self, event: Event) {
            if event == Event::CloseRequested {
                self.done = true;
            }
        }

        fn view(&self) -> View {
            View::default()
        }

        fn wants_close(&self) -> bool {
            self.done
        }

        fn on_close(&mut self) {
            self.closes += 1;
        }
    }

    #[test]
    fn test_exit_without_close_request_runs_on_close() {
        let mut runner = Runner::new(CloseCounter::default(), Settings::default());
        runner.on_exit(None);
        assert_eq!(runner.app.closes, 1);
    }

    #[test]
    fn test_on_close_runs_once() {
        let ctx = egui::Context::default();
        let mut runner = Runner::new(CloseCounter::default(), Settings::default());

        runner.app.update(Event::CloseRequested);
        runner.close(&ctx);
        runner.on_exit(None);

        assert_eq!(runner.app.closes, 1);
    }
}
