use anyhow::{anyhow, Context, Result};
use geo_types::MultiPolygon;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::atlas::Country;
use crate::cli::Geography;
use crate::merge::CountryCases;

pub mod colormap;
pub mod project;
pub mod text;

use colormap::{color_for, rainbow, BASE_GREY};
use project::{lonlat_bounds, Viewport};
use text::{draw_label, Anchor};

/// Fixed figure size in abstract units, width x height; the raster is
/// `units * dpi` pixels.
pub const FIGSIZE: (u32, u32) = (16, 8);

const TITLE: &str = "Number of cases of Malaria per year (per 1000)";
/// Point sizes at the baseline 16-unit figure width.
const TITLE_FONT_PT: f64 = 30.0;
const YEAR_FONT_PT: f64 = 36.0;
const TICK_FONT_PT: f64 = 12.0;
const MAP_MARGIN: f64 = 0.02;
/// Fraction of the figure width reserved for the colorbar at the right edge.
const MAP_WIDTH_FRAC: f64 = 0.92;

#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub geography: Geography,
    pub vmin: f64,
    pub vmax: f64,
    pub figsize: (u32, u32),
    pub dpi: u32,
}

/// Render one year's choropleth into `out_dir` and return the written path.
///
/// The backend buffer lives only for this call: it is presented and dropped
/// before the next year starts, so figures cannot leak state between years.
pub fn render_year(
    atlas: &[Country],
    merged: &[CountryCases],
    year: i32,
    cfg: &RenderConfig,
    out_dir: &Path,
) -> Result<PathBuf> {
    let region = cfg.geography.label();
    info!(geography = region, year, "generating figure");

    let selected: Vec<usize> = atlas
        .iter()
        .enumerate()
        .filter(|(_, country)| cfg.geography.selects(&country.continent))
        .map(|(index, _)| index)
        .collect();
    let bounds = lonlat_bounds(selected.iter().map(|&index| &atlas[index].geometry))
        .ok_or_else(|| anyhow!("no geometry to draw for {}", region))?;

    let width = cfg.figsize.0 * cfg.dpi;
    let height = cfg.figsize.1 * cfg.dpi;
    let path = out_dir.join(format!("{}_{}_rainbow_malaria.png", year, region));

    let root = BitMapBackend::new(&path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let map_width = (width as f64 * MAP_WIDTH_FRAC) as u32;
    let view = Viewport::fit(bounds, map_width, height, MAP_MARGIN);

    // base layer: neutral grey fill for every selected country
    for &index in &selected {
        draw_shape(&root, &atlas[index].geometry, &view, BASE_GREY)?;
    }

    // choropleth layer on top, colored by this year's value
    for &index in &selected {
        let value = merged[index].value(year).unwrap_or(0.0);
        let fill = color_for(value, cfg.vmin, cfg.vmax);
        draw_shape(&root, &atlas[index].geometry, &view, fill)?;
    }

    draw_colorbar(&root, cfg, width, height)?;

    let font_scale = cfg.figsize.0 as f64 / 16.0;
    let px_per_pt = cfg.dpi as f64 / 72.0;
    let title_px = (TITLE_FONT_PT * font_scale * px_per_pt).round() as u32;
    let year_px = (YEAR_FONT_PT * font_scale * px_per_pt).round() as u32;

    draw_label(
        &root,
        TITLE,
        ((map_width / 2) as i32, (title_px / 2) as i32),
        title_px,
        &BLACK,
        Anchor::Center,
    )?;
    // year annotation at figure fraction (0.2, 0.4) from the lower left
    draw_label(
        &root,
        &year.to_string(),
        ((width as f64 * 0.2) as i32, (height as f64 * 0.6) as i32),
        year_px,
        &BLACK,
        Anchor::Left,
    )?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    drop(root);

    Ok(path)
}

fn draw_shape<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    shape: &MultiPolygon<f64>,
    view: &Viewport,
    fill: RGBColor,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    for polygon in &shape.0 {
        let ring: Vec<(i32, i32)> = polygon
            .exterior()
            .coords()
            .map(|coord| view.to_px(coord.x, coord.y))
            .collect();
        if ring.len() < 3 {
            continue;
        }
        root.draw(&Polygon::new(ring.clone(), fill.filled()))?;
        root.draw(&PathElement::new(ring, BLACK.stroke_width(1)))?;
    }
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    cfg: &RenderConfig,
    width: u32,
    height: u32,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let x0 = (width as f64 * 0.94) as i32;
    let x1 = (width as f64 * 0.96) as i32;
    let y0 = (height as f64 * 0.15) as i32;
    let y1 = (height as f64 * 0.85) as i32;

    // vmax at the top, vmin at the bottom
    let steps = (y1 - y0).max(1);
    for i in 0..steps {
        let t = 1.0 - i as f64 / steps as f64;
        root.draw(&Rectangle::new(
            [(x0, y0 + i), (x1, y0 + i + 1)],
            rainbow(t).filled(),
        ))?;
    }
    root.draw(&Rectangle::new([(x0, y0), (x1, y1)], BLACK.stroke_width(1)))?;

    let font_scale = cfg.figsize.0 as f64 / 16.0;
    let tick_px = (TICK_FONT_PT * font_scale * cfg.dpi as f64 / 72.0).round() as u32;
    const TICKS: i32 = 5;
    for k in 0..=TICKS {
        let frac = k as f64 / TICKS as f64;
        let value = cfg.vmin + (cfg.vmax - cfg.vmin) * frac;
        let y = y1 - ((y1 - y0) as f64 * frac).round() as i32;
        draw_label(
            root,
            &format!("{:.0}", value),
            (x1 + tick_px as i32 / 2, y - tick_px as i32 / 2),
            tick_px,
            &BLACK,
            Anchor::Left,
        )?;
    }

    Ok(())
}
