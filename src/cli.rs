use clap::Parser;

pub const DPI_MIN: i64 = 75;
pub const DPI_MAX: i64 = 600;

/// Region selector for the rendered figures. `World` keeps every country;
/// the others filter on the atlas continent field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geography {
    Africa,
    Asia,
    Europe,
    SouthAmerica,
    NorthAmerica,
    World,
}

impl Geography {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Africa" => Some(Self::Africa),
            "Asia" => Some(Self::Asia),
            "Europe" => Some(Self::Europe),
            "South America" => Some(Self::SouthAmerica),
            "North America" => Some(Self::NorthAmerica),
            "World" => Some(Self::World),
            _ => None,
        }
    }

    /// Display name, also used verbatim in output filenames.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Africa => "Africa",
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::SouthAmerica => "South America",
            Self::NorthAmerica => "North America",
            Self::World => "World",
        }
    }

    /// Whether a country with the given continent field belongs to this region.
    pub fn selects(&self, continent: &str) -> bool {
        match self {
            Self::World => true,
            region => region.label() == continent,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    about = "Make a figure of malaria cases on a continent or the world for the years in the dataset"
)]
pub struct Cli {
    /// Africa, Asia, Europe, South America, North America, or World
    #[arg(long, default_value = "World")]
    pub geography: String,

    /// DPI value
    #[arg(long, default_value_t = 150, allow_negative_numbers = true)]
    pub dpi: i64,
}

/// Validated run options.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub geography: Geography,
    pub dpi: u32,
}

impl Cli {
    /// Range-check the raw flag values. The error is the usage message to
    /// print before exiting with status 1.
    pub fn validate(&self) -> Result<Options, String> {
        let geography = Geography::parse(&self.geography).ok_or_else(|| {
            "--geography must be: Africa, Asia, Europe, South America, North America, or World"
                .to_string()
        })?;

        if !(DPI_MIN..=DPI_MAX).contains(&self.dpi) {
            return Err(format!("--dpi must be in range {} - {}", DPI_MIN, DPI_MAX));
        }

        Ok(Options {
            geography,
            dpi: self.dpi as u32,
        })
    }
}
