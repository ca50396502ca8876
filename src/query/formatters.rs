use crate::repository::{Donation, DonationStats};
use crate::tokens::TokenRegistry;
use comfy_table::{Cell, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use csv::Writer;
use serde_json::json;

#[derive(Debug, Clone)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            _ => OutputFormat::Table,
        }
    }
}

pub fn format_donations(
    donations: &[Donation],
    registry: &TokenRegistry,
    format: &OutputFormat,
) -> String {
    match format {
        OutputFormat::Table => format_donations_table(donations, registry),
        OutputFormat::Json => format_donations_json(donations, registry),
        OutputFormat::Csv => format_donations_csv(donations, registry),
    }
}

fn format_donations_table(donations: &[Donation], registry: &TokenRegistry) -> String {
    if donations.is_empty() {
        return "No donations found.".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            "Id",
            "Block",
            "Streamer",
            "Donor",
            "Donor Name",
            "Message",
            "Net Donation",
            "Commission",
        ]);

    for donation in donations {
        table.add_row(vec![
            Cell::new(donation.id),
            Cell::new(donation.block_number),
            Cell::new(format!("{:#}", donation.recipient)),
            Cell::new(format!("{:#}", donation.donor)),
            Cell::new(&donation.donor_name),
            Cell::new(&donation.message),
            Cell::new(registry.display_amount(
                &donation.erc20_token_address,
                donation.net_donation,
            )),
            Cell::new(registry.display_amount(&donation.erc20_token_address, donation.commission)),
        ]);
    }

    table.to_string()
}

fn format_donations_json(donations: &[Donation], registry: &TokenRegistry) -> String {
    let json_donations: Vec<_> = donations
        .iter()
        .map(|d| {
            json!({
                "id": d.id,
                "block_number": d.block_number,
                "streamer": format!("{:?}", d.recipient),
                "donor": format!("{:?}", d.donor),
                "donor_name": d.donor_name,
                "message": d.message,
                "token": format!("{:?}", d.erc20_token_address),
                "net_donation": registry.display_amount(&d.erc20_token_address, d.net_donation),
                "net_donation_raw": d.net_donation.to_string(),
                "commission": registry.display_amount(&d.erc20_token_address, d.commission),
                "commission_raw": d.commission.to_string(),
            })
        })
        .collect();

    serde_json::to_string_pretty(&json_donations).unwrap_or_else(|_| "[]".to_string())
}

fn format_donations_csv(donations: &[Donation], registry: &TokenRegistry) -> String {
    let mut wtr = Writer::from_writer(vec![]);

    let _ = wtr.write_record([
        "id",
        "block_number",
        "streamer",
        "donor",
        "donor_name",
        "message",
        "token",
        "net_donation",
        "net_donation_raw",
        "commission",
        "commission_raw",
    ]);

    for donation in donations {
        let _ = wtr.write_record([
            &donation.id.to_string(),
            &donation.block_number.to_string(),
            &format!("{:?}", donation.recipient),
            &format!("{:?}", donation.donor),
            &donation.donor_name,
            &donation.message,
            &format!("{:?}", donation.erc20_token_address),
            &registry.display_amount(&donation.erc20_token_address, donation.net_donation),
            &donation.net_donation.to_string(),
            &registry.display_amount(&donation.erc20_token_address, donation.commission),
            &donation.commission.to_string(),
        ]);
    }

    String::from_utf8(wtr.into_inner().unwrap_or_default()).unwrap_or_default()
}

pub fn format_stats(stats: &DonationStats, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec!["Metric", "Value"]);

            table.add_row(vec![
                Cell::new("Total Donations"),
                Cell::new(stats.total_donations),
            ]);
            table.add_row(vec![
                Cell::new("Unique Streamers"),
                Cell::new(stats.unique_streamers),
            ]);
            table.add_row(vec![
                Cell::new("Earliest Block"),
                Cell::new(
                    stats
                        .earliest_block
                        .map_or("N/A".to_string(), |b| b.to_string()),
                ),
            ]);
            table.add_row(vec![
                Cell::new("Latest Block"),
                Cell::new(
                    stats
                        .latest_block
                        .map_or("N/A".to_string(), |b| b.to_string()),
                ),
            ]);

            table.to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "total_donations": stats.total_donations,
            "unique_streamers": stats.unique_streamers,
            "earliest_block": stats.earliest_block,
            "latest_block": stats.latest_block,
        }))
        .unwrap_or_else(|_| "{}".to_string()),
        OutputFormat::Csv => {
            let mut wtr = Writer::from_writer(vec![]);
            let _ = wtr.write_record(["metric", "value"]);
            let _ = wtr.write_record(["total_donations", &stats.total_donations.to_string()]);
            let _ = wtr.write_record(["unique_streamers", &stats.unique_streamers.to_string()]);
            let _ = wtr.write_record([
                "earliest_block",
                &stats
                    .earliest_block
                    .map_or("N/A".to_string(), |b| b.to_string()),
            ]);
            let _ = wtr.write_record([
                "latest_block",
                &stats
                    .latest_block
                    .map_or("N/A".to_string(), |b| b.to_string()),
            ]);
            String::from_utf8(wtr.into_inner().unwrap_or_default()).unwrap_or_default()
        }
    }
}
