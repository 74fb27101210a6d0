//! UI helper components

use eframe::egui;

use sigsafe_core::{validate_address, AddressValidation};

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 212, 170);
pub const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 80, 80);
pub const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);
pub const WARNING_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 180, 50);

/// Block explorer root for a chain id, `None` for chains without a known explorer
pub fn explorer_base_url(chain_id: u64) -> Option<&'static str> {
    let base = match chain_id {
        // Mainnets
        1 => "https://etherscan.io",
        10 => "https://optimistic.etherscan.io",
        56 => "https://bscscan.com",
        100 => "https://gnosisscan.io",
        137 => "https://polygonscan.com",
        8453 => "https://basescan.org",
        42161 => "https://arbiscan.io",
        // Testnets
        11155111 => "https://sepolia.etherscan.io",
        84532 => "https://sepolia.basescan.org",
        _ => return None,
    };
    Some(base)
}

pub fn explorer_tx_url(chain_id: u64, tx_hash: &str) -> Option<String> {
    explorer_base_url(chain_id).map(|base| format!("{}/tx/{}", base, tx_hash))
}

pub fn explorer_address_url(chain_id: u64, address: &str) -> Option<String> {
    explorer_base_url(chain_id).map(|base| format!("{}/address/{}", base, address))
}

pub fn chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "Ethereum",
        10 => "Optimism",
        56 => "BNB Chain",
        100 => "Gnosis",
        137 => "Polygon",
        8453 => "Base",
        42161 => "Arbitrum",
        11155111 => "Sepolia",
        84532 => "Base Sepolia",
        _ => "Unknown chain",
    }
}

/// Header badge for a session backed by the deterministic provider.
pub fn provider_badge(deterministic: bool) -> Option<&'static str> {
    deterministic.then_some("🧪 Simulated wallet")
}

/// Shown under a success message whose hash never reached a chain.
pub fn simulated_result_note(simulated: bool) -> Option<&'static str> {
    simulated.then_some(
        "Simulated result: no transaction was broadcast. Connect a real wallet to create the wallet on chain.",
    )
}

/// Open URL in a new browser tab
#[cfg(target_arch = "wasm32")]
pub fn open_url_new_tab(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.open_with_url_and_target(url, "_blank");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn open_url_new_tab(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!(error = %e, url, "failed to open browser");
    }
}

/// Copy to clipboard (platform-specific)
#[cfg(not(target_arch = "wasm32"))]
pub fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(text) {
                tracing::warn!(error = %e, "clipboard write failed");
            }
        }
        Err(e) => tracing::warn!(error = %e, "clipboard unavailable"),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn copy_to_clipboard(text: &str) {
    if let Some(window) = web_sys::window() {
        let navigator = window.navigator();
        let clipboard = navigator.clipboard();
        let _ = clipboard.write_text(text);
    }
}

/// Styled heading with accent color
pub fn styled_heading(ui: &mut egui::Ui, text: &str) {
    ui.heading(egui::RichText::new(text).color(ACCENT));
}

/// Short `0x1234…abcd` form for headers and labels
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_owned();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}

/// Monospace address field. Text turns yellow on a checksum mismatch and
/// red once the entry can no longer be an address.
pub fn address_input(ui: &mut egui::Ui, value: &mut String, hint: &str) -> egui::Response {
    let color = match validate_address(value) {
        _ if value.trim().is_empty() => None,
        AddressValidation::Valid => None,
        AddressValidation::ChecksumMismatch => Some(WARNING_COLOR),
        AddressValidation::Invalid => Some(ERROR_COLOR),
    };

    let mut edit = egui::TextEdit::singleline(value)
        .hint_text(hint)
        .desired_width(420.0)
        .font(egui::TextStyle::Monospace);
    if let Some(color) = color {
        edit = edit.text_color(color);
    }
    let response = ui.add(edit);

    match color {
        Some(c) if c == WARNING_COLOR => {
            response.on_hover_text("Address has an invalid EIP-55 checksum")
        }
        Some(_) => response.on_hover_text("Expected 0x followed by 40 hex characters"),
        None => response,
    }
}

/// Primary action button - teal/accent colored, prominent
pub fn primary_button_enabled(ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
    let accent = egui::Color32::from_rgb(0, 180, 150);
    let btn = egui::Button::new(egui::RichText::new(text).size(14.0).color(egui::Color32::WHITE))
        .min_size(egui::vec2(130.0, 34.0))
        .fill(accent);
    ui.add_enabled(enabled, btn)
}

/// Secondary action button - subdued, outline style
pub fn secondary_button(ui: &mut egui::Ui, text: &str) -> egui::Response {
    let btn = egui::Button::new(egui::RichText::new(text).size(14.0))
        .min_size(egui::vec2(90.0, 34.0));
    ui.add(btn)
}

/// Render content in a subtle card/frame
pub fn card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ui.visuals().faint_bg_color)
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, add_contents);
}

/// Error message display
pub fn error_message(ui: &mut egui::Ui, message: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("❌").size(16.0));
        ui.label(egui::RichText::new(message).color(ERROR_COLOR));
    });
}

/// Display a hash value with copy button
pub fn copyable_hash(ui: &mut egui::Ui, hash: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(hash).monospace());
        if ui
            .small_button("📋")
            .on_hover_text("Copy to clipboard")
            .clicked()
        {
            copy_to_clipboard(hash);
        }
    });
}
