use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pantry_common::file_config::load_config;
use pantry_common::{coordinates_for_zip, is_valid_zip_format, Config, RegionRegistry, TimeFilter};
use pantry_finder::{
    approximate_count, derive_display_locations, filter_by_distance_ring, filter_by_eligibility,
    filter_locations, load_locations, resolve_data_path, sort_locations, upcoming_openings,
    DistanceRing, FilterCounts, DEFAULT_TIMELINE_LIMIT,
};
use pantry_schedule::{
    format_time_range, parse_timezone, status_label, LocalMoment, SchedulePattern,
};

#[derive(Parser)]
#[command(name = "finder")]
#[command(about = "List food distribution locations by when they are open")]
#[command(version)]
struct Cli {
    /// open-now, today, tomorrow or this-week
    #[arg(short, long, default_value_t = TimeFilter::OpenNow)]
    filter: TimeFilter,

    /// ZIP code to measure distances from
    #[arg(long)]
    zip: Option<String>,

    /// under2, under5 or over5 miles (needs --zip)
    #[arg(long)]
    distance: Option<DistanceRing>,

    /// Only locations without eligibility requirements
    #[arg(long)]
    no_requirements: bool,

    /// Region id (overrides FINDER_REGION)
    #[arg(long)]
    region: Option<String>,

    /// IANA timezone (overrides the region's)
    #[arg(long)]
    timezone: Option<String>,

    /// Location dataset (overrides FINDER_DATA_PATH)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Entries in the "next available" list
    #[arg(long, default_value_t = DEFAULT_TIMELINE_LIMIT)]
    limit: usize,

    /// Evaluate at this RFC 3339 instant instead of now
    #[arg(long)]
    at: Option<String>,

    /// Print the listed locations as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pantry=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let file_config = config
        .config_path
        .as_deref()
        .map(load_config)
        .transpose()?;
    let registry = RegionRegistry::new(config.dev_regions, file_config.as_ref());
    let region = registry.resolve(cli.region.as_deref().or(config.region.as_deref()));

    let tz = match cli.timezone.as_deref().or(config.timezone.as_deref()) {
        Some(name) => parse_timezone(name)?,
        None => region.tz()?,
    };

    let now = match cli.at.as_deref() {
        Some(at) => DateTime::parse_from_rfc3339(at)
            .with_context(|| format!("Invalid --at instant: {at}"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let user = cli.zip.as_deref().and_then(|zip| {
        if !is_valid_zip_format(zip) {
            warn!(zip, "Ignoring malformed ZIP code");
            return None;
        }
        let coordinates = coordinates_for_zip(zip);
        if coordinates.is_none() {
            warn!(zip, "ZIP code not in this region, distances unavailable");
        }
        coordinates
    });

    info!(region = region.id.as_str(), timezone = %tz, now = %now, filter = %cli.filter, "Finder starting");

    let data_path = resolve_data_path(cli.data.as_deref().unwrap_or(config.data_path.as_path()));
    let locations = load_locations(&data_path)?;

    let display = derive_display_locations(&locations, now, tz, user);
    let counts = FilterCounts::compute(&display, now, tz);
    let mut listed = filter_locations(&display, cli.filter, now, tz);
    sort_locations(&mut listed);
    if cli.distance.is_some() && user.is_none() {
        warn!("--distance needs a known --zip, no location will match");
    }
    let listed = filter_by_distance_ring(&listed, cli.distance);
    let listed = filter_by_eligibility(&listed, cli.no_requirements);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    println!("\n=== {} ({}) ===", region.name, tz);
    println!(
        "Open now: {}  |  Today: {}  |  Tomorrow: {}  |  This week: {}",
        approximate_count(counts.open_now),
        approximate_count(counts.today),
        approximate_count(counts.tomorrow),
        approximate_count(counts.this_week),
    );

    if cli.filter != TimeFilter::OpenNow {
        let upcoming = upcoming_openings(&display, now, cli.limit);
        if !upcoming.is_empty() {
            println!("\nNext available:");
            for opening in upcoming {
                println!(
                    "  {:<40} {}",
                    opening.location.location.name.en,
                    status_label(&opening.location.availability, now, tz)
                );
            }
        }
    }

    println!("\n{} ({} locations):", cli.filter, listed.len());
    for entry in listed {
        let location = &entry.location;
        let distance = entry
            .distance
            .map(|miles| format!("  {miles:.1} mi"))
            .unwrap_or_default();
        println!(
            "\n  {}  [{}]{}",
            location.name.en,
            status_label(&entry.availability, now, tz),
            distance
        );
        if !location.address.is_empty() {
            println!("    {}, {}", location.address, location.city);
        }
        match &location.schedule {
            SchedulePattern::Special { pattern } => {
                println!("    {}", format_time_range(&pattern.time_range));
            }
            SchedulePattern::Unknown { raw_text } => println!("    {raw_text}"),
            SchedulePattern::Weekly { schedule } => {
                let today = LocalMoment::of(now, tz).weekday();
                if let Some(range) = schedule.get(today) {
                    println!("    Today {}", format_time_range(range));
                }
            }
        }
        if let Some(phone) = &location.phone {
            println!("    {phone}");
        }
    }

    Ok(())
}
