//! Application style configuration

use eframe::egui;

const FONT_SIZE: f32 = 14.0;

/// Light theme with compact widgets
pub fn configure_styles(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::light();

    // Rounding
    style.visuals.window_corner_radius = egui::CornerRadius::same(6);
    style.visuals.menu_corner_radius = egui::CornerRadius::same(4);
    for widgets in [
        &mut style.visuals.widgets.noninteractive,
        &mut style.visuals.widgets.inactive,
        &mut style.visuals.widgets.hovered,
        &mut style.visuals.widgets.active,
    ] {
        widgets.corner_radius = egui::CornerRadius::same(3);
    }

    // Spacing
    style.spacing.item_spacing = egui::vec2(6.0, 5.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.menu_margin = egui::Margin::same(4);

    style.visuals.panel_fill = egui::Color32::from_rgb(236, 232, 224);
    style.visuals.window_fill = egui::Color32::from_rgb(248, 246, 240);
    style.visuals.selection.bg_fill = egui::Color32::from_rgb(0, 120, 215);

    apply_text_styles(&mut style, FONT_SIZE);

    ctx.set_style(style);
}

fn apply_text_styles(style: &mut egui::Style, font_size: f32) {
    use egui::{FontId, TextStyle};
    style.text_styles.insert(TextStyle::Body, FontId::proportional(font_size));
    style.text_styles.insert(TextStyle::Button, FontId::proportional(font_size));
    style
        .text_styles
        .insert(TextStyle::Small, FontId::proportional(font_size * 0.85));
    style
        .text_styles
        .insert(TextStyle::Heading, FontId::proportional(font_size * 1.3));
    style.text_styles.insert(TextStyle::Monospace, FontId::monospace(font_size));
}
