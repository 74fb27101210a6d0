//! Modal dialog and loading overlay backing the notifier and loader ports

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use eframe::egui;
use sigsafe_core::{LoaderPort, Notification, NotificationKind, NotifierPort};

use crate::ui;

/// Holds at most one notification; a newer one replaces what is shown.
#[derive(Clone, Default)]
pub struct MessageModal {
    current: Arc<Mutex<Option<Notification>>>,
    ctx: Arc<Mutex<Option<egui::Context>>>,
}

impl MessageModal {
    /// Lets notifications raised off the UI thread wake the event loop.
    pub fn attach(&self, ctx: &egui::Context) {
        if let Ok(mut g) = self.ctx.lock() {
            *g = Some(ctx.clone());
        }
    }

    pub fn current(&self) -> Option<Notification> {
        self.current.lock().ok().and_then(|g| g.clone())
    }

    pub fn dismiss(&self) {
        if let Ok(mut g) = self.current.lock() {
            *g = None;
        }
    }

    /// Draws the modal if a notification is pending. `tx_link` is shown
    /// under success messages. Returns true on the frame the user dismisses it.
    pub fn show(
        &self,
        ctx: &egui::Context,
        tx_link: Option<(&str, Option<String>)>,
        simulated: bool,
    ) -> bool {
        let Some(notification) = self.current() else {
            return false;
        };

        let (icon, color) = match notification.kind {
            NotificationKind::Success => ("✅", ui::SUCCESS_COLOR),
            NotificationKind::Error => ("❌", ui::ERROR_COLOR),
        };

        let mut open = true;
        let mut close_clicked = false;
        egui::Window::new(
            egui::RichText::new(format!("{} {}", icon, notification.title))
                .strong()
                .color(color),
        )
        .id(egui::Id::new("message_modal"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .open(&mut open)
        .show(ctx, |ui| {
            ui.set_min_width(320.0);
            ui.label(&notification.message);

            if let Some(detail) = &notification.detail {
                ui.add_space(6.0);
                ui.collapsing("Details", |ui| {
                    ui.label(egui::RichText::new(detail).monospace().weak());
                });
            }

            if notification.kind == NotificationKind::Success {
                if let Some(note) = ui::simulated_result_note(simulated) {
                    ui.add_space(6.0);
                    ui.label(egui::RichText::new(note).color(ui::WARNING_COLOR));
                }
                if let Some((hash, url)) = &tx_link {
                    ui.add_space(8.0);
                    ui.label(egui::RichText::new("Transaction").strong());
                    ui::copyable_hash(ui, hash);
                    if let Some(url) = url {
                        if ui.link("View on block explorer").clicked() {
                            ui::open_url_new_tab(url);
                        }
                    }
                }
            }

            ui.add_space(10.0);
            if ui::secondary_button(ui, "OK").clicked() {
                close_clicked = true;
            }
        });

        if !open || close_clicked {
            self.dismiss();
            return true;
        }
        false
    }
}

impl NotifierPort for MessageModal {
    fn show_message(&self, notification: Notification) {
        tracing::debug!(title = %notification.title, kind = ?notification.kind, "show message");
        if let Ok(mut g) = self.current.lock() {
            *g = Some(notification);
        }
        if let Ok(g) = self.ctx.lock() {
            if let Some(ctx) = g.as_ref() {
                ctx.request_repaint();
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct Loader {
    active: Arc<AtomicBool>,
}

impl Loader {
    pub fn is_loading(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Dims the window and shows a spinner while a submission is pending.
    pub fn show(&self, ctx: &egui::Context) {
        if !self.is_loading() {
            return;
        }
        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new("loading_overlay"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.painter()
                    .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(140));
                ui.allocate_ui_at_rect(screen, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.spinner();
                            ui.label("Waiting for wallet confirmation...");
                        });
                    });
                });
            });
    }
}

impl LoaderPort for Loader {
    fn start_loading(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    fn stop_loading(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_keeps_latest_notification() {
        let modal = MessageModal::default();
        assert!(modal.current().is_none());

        modal.show_message(Notification::error("Validation Error", "first"));
        modal.show_message(Notification::success("Wallet Created", "second"));

        let shown = modal.current().expect("notification");
        assert_eq!(shown.title, "Wallet Created");
        assert_eq!(shown.kind, NotificationKind::Success);

        modal.dismiss();
        assert!(modal.current().is_none());
    }

    #[test]
    fn test_loader_toggles() {
        let loader = Loader::default();
        let shared = loader.clone();
        assert!(!loader.is_loading());
        shared.start_loading();
        assert!(loader.is_loading());
        shared.stop_loading();
        assert!(!loader.is_loading());
    }
}
