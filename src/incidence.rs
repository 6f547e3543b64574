use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct IncidenceRow {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "No. of cases")]
    pub cases: f64,
}

/// The incidence dataset indexed by (country, year).
///
/// `years` and `countries` keep the distinct values in order of first
/// appearance, which is also the order the figures are rendered in. When a
/// (country, year) pair occurs more than once, the first row wins.
#[derive(Debug, Default)]
pub struct CaseTable {
    cases: HashMap<String, BTreeMap<i32, f64>>,
    years: Vec<i32>,
    countries: Vec<String>,
    max_cases: f64,
}

impl CaseTable {
    pub fn from_rows(rows: impl IntoIterator<Item = IncidenceRow>) -> Self {
        let mut table = CaseTable::default();
        let mut seen_years = HashSet::new();
        let mut seen_countries = HashSet::new();

        for row in rows {
            if seen_years.insert(row.year) {
                table.years.push(row.year);
            }
            if seen_countries.insert(row.country.clone()) {
                table.countries.push(row.country.clone());
            }
            table.max_cases = table.max_cases.max(row.cases);
            table
                .cases
                .entry(row.country)
                .or_default()
                .entry(row.year)
                .or_insert(row.cases);
        }

        table
    }

    pub fn get(&self, country: &str, year: i32) -> Option<f64> {
        self.cases.get(country)?.get(&year).copied()
    }

    /// Distinct years, in order of first appearance.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Distinct country names, in order of first appearance.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Largest case count seen in the dataset, 0 when empty.
    pub fn max_cases(&self) -> f64 {
        self.max_cases
    }
}

/// Read the incidence CSV (header: Country, Year, No. of cases).
pub fn load_incidence_csv(path: &Path) -> Result<CaseTable> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("opening incidence CSV {:?}", path))?;

    let mut rows = Vec::new();
    for (idx, result) in rdr.deserialize::<IncidenceRow>().enumerate() {
        let row = result
            .with_context(|| format!("CSV parse error in {:?} at record {}", path, idx))?;
        rows.push(row);
    }

    Ok(CaseTable::from_rows(rows))
}

/// A manual name fix: the atlas spells a country `correct`, the incidence
/// dataset spells it `incorrect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub correct: String,
    pub incorrect: String,
}

/// Read the correction-mapping CSV: two columns, no header, backslash as the
/// escape character.
pub fn load_corrections_csv(path: &Path) -> Result<Vec<Correction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .escape(Some(b'\\'))
        .from_path(path)
        .with_context(|| format!("opening corrections CSV {:?}", path))?;

    let mut corrections = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("CSV parse error in {:?} at record {}", path, idx))?;
        let (Some(correct), Some(incorrect)) = (record.get(0), record.get(1)) else {
            anyhow::bail!("corrections CSV {:?} record {} needs two columns", path, idx);
        };
        corrections.push(Correction {
            correct: correct.to_string(),
            incorrect: incorrect.to_string(),
        });
    }

    Ok(corrections)
}
