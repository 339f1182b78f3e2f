//! `affect providers`: show the provider chain and each entry's state.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AppState;

/// Print the chain in order with enabled/available flags.
///
/// Remote providers that are enabled are probed for availability, which
/// may take up to a few seconds per provider.
pub async fn list_providers(state: &AppState, json: bool) -> Result<()> {
    let statuses = state.analyzer.provider_statuses().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("Provider Chain").bold());
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Priority").fg(Color::White),
        Cell::new("Provider").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Model").fg(Color::White),
        Cell::new("Enabled").fg(Color::White),
        Cell::new("Available").fg(Color::White),
    ]);

    for (priority, status) in statuses.iter().enumerate() {
        let config = state.configs.get(status.kind);
        let enabled_cell = if status.enabled {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::DarkGrey)
        };
        let available_cell = match (status.enabled, status.available) {
            (_, true) => Cell::new("up").fg(Color::Green),
            (true, false) => Cell::new("DOWN").fg(Color::Red),
            (false, false) => Cell::new("-").fg(Color::DarkGrey),
        };

        table.add_row(vec![
            Cell::new(priority + 1).fg(Color::Cyan),
            Cell::new(&status.name).fg(Color::White),
            Cell::new(status.kind.to_string()).fg(Color::DarkGrey),
            Cell::new(config.model.as_deref().unwrap_or("-")).fg(Color::DarkGrey),
            enabled_cell,
            available_cell,
        ]);
    }

    println!("{table}");
    println!();

    if !statuses.iter().any(|s| s.available) {
        println!(
            "  {} No provider is available; analysis will fail.",
            style("!").red().bold()
        );
        println!();
    }

    Ok(())
}
