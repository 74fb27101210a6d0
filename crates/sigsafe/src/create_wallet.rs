//! Create-wallet page: approvals threshold, signatory rows and submit button

use eframe::egui;
use sigsafe_core::CreateWalletForm;

use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    None,
    Submit,
}

pub fn render(ui: &mut egui::Ui, form: &mut CreateWalletForm, submit_enabled: bool) -> PageAction {
    ui::styled_heading(ui, "Create Multi-Signature Wallet");
    ui.label("Choose the signatories and how many of them must approve each transaction.");
    ui.add_space(15.0);

    ui::card(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Required Approvals").strong());
            let max = form.max_required_approvals().max(1);
            let mut approvals = form.required_approvals;
            ui.add(egui::DragValue::new(&mut approvals).range(1..=max).speed(0.1));
            ui.label(egui::RichText::new(format!("of {}", max)).weak());
            if approvals != form.required_approvals {
                form.set_required_approvals(approvals);
            }
        });
    });

    ui.add_space(10.0);
    ui::card(ui, |ui| {
        ui.label(egui::RichText::new("Signatories").strong());
        ui.add_space(6.0);
        render_signatories(ui, form);
        ui.add_space(6.0);
        if ui::secondary_button(ui, "➕ Add Signatory").clicked() {
            form.add_signatory();
        }
    });

    ui.add_space(15.0);
    let button = egui::Button::new(
        egui::RichText::new("Create Wallet")
            .size(15.0)
            .color(egui::Color32::WHITE),
    )
    .min_size(egui::vec2(ui.available_width(), 38.0))
    .fill(egui::Color32::from_rgb(0, 180, 150));
    if ui.add_enabled(submit_enabled, button).clicked() {
        return PageAction::Submit;
    }
    PageAction::None
}

fn render_signatories(ui: &mut egui::Ui, form: &mut CreateWalletForm) {
    let can_remove = form.can_remove_signatory();
    let mut edits = Vec::new();
    let mut remove = None;

    for (index, entry) in form.signatories.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(format!("{}.", index + 1)).weak());
            let mut value = entry.clone();
            if ui::address_input(ui, &mut value, "Wallet Address").changed() {
                edits.push((index, value));
            }
            if can_remove
                && ui
                    .small_button("🗑")
                    .on_hover_text("Remove signatory")
                    .clicked()
            {
                remove = Some(index);
            }
        });
    }

    for (index, value) in edits {
        if let Err(e) = form.update_signatory(index, value) {
            tracing::warn!(error = %e, "signatory update ignored");
        }
    }
    if let Some(index) = remove {
        if let Err(e) = form.remove_signatory(index) {
            tracing::warn!(error = %e, "signatory removal ignored");
        }
    }
}
