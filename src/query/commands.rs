use crate::address::normalize_address;
use crate::query::formatters::{OutputFormat, format_donations, format_stats};
use crate::repository::DonationRepository;
use crate::tokens::TokenRegistry;
use anyhow::Result;

#[derive(Default)]
pub struct DonationsQuery {
    pub streamer: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

pub fn cmd_donations(
    repo: &DonationRepository,
    registry: &TokenRegistry,
    query: DonationsQuery,
    format: &OutputFormat,
) -> Result<()> {
    let streamer = query
        .streamer
        .as_deref()
        .map(normalize_address)
        .transpose()?;

    let donations = repo.query_page(streamer.as_ref(), query.limit, query.offset)?;
    let output = format_donations(&donations, registry, format);
    println!("{output}");

    Ok(())
}

pub fn cmd_stats(repo: &DonationRepository, format: &OutputFormat) -> Result<()> {
    let stats = repo.get_statistics()?;
    let output = format_stats(&stats, format);
    println!("{output}");

    Ok(())
}
