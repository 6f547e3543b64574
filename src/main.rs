use anyhow::{Context, Result};
use clap::Parser;
use malmap::{atlas, cli::Cli, fetch, incidence, merge, render};
use reqwest::blocking::Client;
use std::{fs, path::Path, process};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DATA_DIR: &str = "data";
const OUTPUT_DIR: &str = "output";
const INCIDENCE_FILE: &str = "incidence_per_1000_pop_at_risk.csv";
const CORRECTIONS_FILE: &str = "correct_names.csv";
const ATLAS_FILE: &str = "ne_110m_admin_0_countries.geojson";

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) parse + validate CLI ─────────────────────────────────────
    let cli = Cli::parse();
    let opts = match cli.validate() {
        Ok(opts) => opts,
        Err(usage) => {
            println!("{usage}");
            process::exit(1);
        }
    };

    // ─── 3) load inputs ──────────────────────────────────────────────
    let data_dir = Path::new(DATA_DIR);
    let atlas_path = data_dir.join(ATLAS_FILE);
    let client = Client::new();
    fetch::ensure_world_atlas(&client, &atlas_path)?;
    let world = atlas::load_world_atlas(&atlas_path)?;
    info!(countries = world.len(), "loaded world atlas");

    let table = incidence::load_incidence_csv(&data_dir.join(INCIDENCE_FILE))?;
    info!(
        countries = table.countries().len(),
        years = table.years().len(),
        "loaded incidence dataset"
    );
    let corrections = incidence::load_corrections_csv(&data_dir.join(CORRECTIONS_FILE))?;

    // ─── 4) reconcile country names ──────────────────────────────────
    for name in merge::unmatched_countries(&table, &world) {
        info!(country = %name, "not present in the world atlas");
    }

    // ─── 5) merge case counts onto the atlas ─────────────────────────
    let merged = merge::merge_cases(&world, &table, &corrections)?;

    // ─── 6) render one figure per year ───────────────────────────────
    let cfg = render::RenderConfig {
        geography: opts.geography,
        vmin: 0.00001,
        vmax: render::colormap::round_to_hundreds(table.max_cases()),
        figsize: render::FIGSIZE,
        dpi: opts.dpi,
    };
    let out_dir = Path::new(OUTPUT_DIR);
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {:?}", out_dir))?;
    for &year in table.years() {
        render::render_year(&world, &merged, year, &cfg, out_dir)?;
    }

    println!("Done");
    Ok(())
}
