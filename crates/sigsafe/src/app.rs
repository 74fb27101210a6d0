//! Main application state and update loop

use eframe::egui;
use sigsafe_adapters::SigSafeConfig;
use sigsafe_core::{CreateWalletError, CreateWalletForm, SubmissionOutcome};

use crate::create_wallet::{self, PageAction};
use crate::feedback::{Loader, MessageModal};
use crate::ui;
use crate::wallet_bridge::WalletBridge;

/// The main application state
pub struct App {
    form: CreateWalletForm,
    /// `Err` holds the configuration problem shown in place of the wallet
    bridge: Result<WalletBridge, String>,
    modal: MessageModal,
    loader: Loader,
    /// Set on click, cleared when the submission settles
    submitting: bool,
    last_tx_hash: Option<String>,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let modal = MessageModal::default();
        modal.attach(&cc.egui_ctx);
        let loader = Loader::default();

        let config = SigSafeConfig::from_env();
        let bridge = WalletBridge::new(&config, modal.clone(), loader.clone()).map_err(|e| {
            tracing::error!(error = %e, "wallet factory not configured");
            e.to_string()
        });
        if let Ok(bridge) = &bridge {
            bridge.refresh_account(&cc.egui_ctx);
        }

        Self {
            form: CreateWalletForm::default(),
            bridge,
            modal,
            loader,
            submitting: false,
            last_tx_hash: None,
        }
    }

    fn check_outcome(&mut self) {
        let Ok(bridge) = &self.bridge else {
            return;
        };
        let Some(outcome) = bridge.take_outcome() else {
            return;
        };
        match outcome {
            SubmissionOutcome::Blocked(CreateWalletError::InFlight) => {}
            SubmissionOutcome::Created { tx_hash } => {
                self.last_tx_hash = Some(tx_hash.to_string());
                self.submitting = false;
            }
            _ => {
                self.last_tx_hash = None;
                self.submitting = false;
            }
        }
    }

    fn render_header(&self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new("🔐 SigSafe").size(22.0).color(ui::ACCENT));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let Ok(bridge) = &self.bridge else {
                    return;
                };
                let connection = bridge.connection();
                match connection.account {
                    Some(account) => {
                        let checksummed = account.to_checksum(None);
                        let text = egui::RichText::new(format!(
                            "🟢 {}",
                            ui::short_address(&checksummed)
                        ))
                        .monospace();
                        let label = ui
                            .add(egui::Label::new(text).sense(egui::Sense::click()))
                            .on_hover_text(format!("{} (click to copy)", checksummed));
                        if label.clicked() {
                            ui::copy_to_clipboard(&checksummed);
                        }
                    }
                    None => {
                        let text = if connection.connecting {
                            "Connecting..."
                        } else {
                            "Connect Wallet"
                        };
                        if ui::primary_button_enabled(ui, text, !connection.connecting).clicked() {
                            bridge.connect(ctx);
                        }
                    }
                }
                ui.label(egui::RichText::new(ui::chain_name(bridge.chain_id())).weak());
                if let Some(badge) = ui::provider_badge(bridge.is_deterministic()) {
                    ui.label(egui::RichText::new(badge).small().color(ui::WARNING_COLOR))
                        .on_hover_text("No wallet is connected; transaction hashes are generated locally");
                }
                if let Some(error) = &connection.error {
                    ui.label(egui::RichText::new("⚠").color(ui::WARNING_COLOR))
                        .on_hover_text(error);
                }
            });
        });
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let hash = env!("GIT_HASH");
            let short = hash.get(..7).unwrap_or(hash);
            ui.label(
                egui::RichText::new(format!("build {} · {}", short, env!("BUILD_TIME")))
                    .small()
                    .weak(),
            );
            if let Ok(bridge) = &self.bridge {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let factory = bridge.factory_address().to_checksum(None);
                    let response = ui
                        .link(egui::RichText::new(format!("factory {}", ui::short_address(&factory))).small())
                        .on_hover_text(&factory);
                    if response.clicked() {
                        if let Some(url) = ui::explorer_address_url(bridge.chain_id(), &factory) {
                            ui::open_url_new_tab(&url);
                        }
                    }
                });
            }
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        self.check_outcome();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            self.render_header(ui, ctx);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.add_space(2.0);
            self.render_footer(ui);
            ui.add_space(2.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(10.0);
                ui.set_max_width(640.0);

                if let Err(problem) = &self.bridge {
                    ui::error_message(ui, &format!("Wallet factory unavailable: {}", problem));
                    ui.add_space(10.0);
                }

                let busy = self.submitting
                    || self.loader.is_loading()
                    || self.bridge.as_ref().map(WalletBridge::is_busy).unwrap_or(false);
                let enabled = self.bridge.is_ok() && !busy;

                if create_wallet::render(ui, &mut self.form, enabled) == PageAction::Submit {
                    if let Ok(bridge) = &self.bridge {
                        self.submitting = true;
                        bridge.submit(self.form.clone(), ctx);
                    }
                }
                ui.add_space(20.0);
            });
        });

        self.loader.show(ctx);

        let simulated = self
            .bridge
            .as_ref()
            .map(WalletBridge::is_deterministic)
            .unwrap_or(false);
        let tx_link = self.last_tx_hash.as_deref().map(|hash| {
            let url = self
                .bridge
                .as_ref()
                .ok()
                .filter(|_| !simulated)
                .and_then(|b| ui::explorer_tx_url(b.chain_id(), hash));
            (hash, url)
        });
        if self.modal.show(ctx, tx_link, simulated) {
            if let Ok(bridge) = &self.bridge {
                bridge.reset();
            }
        }
    }
}
