use crate::atlas::Country;
use crate::incidence::{CaseTable, Correction};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};

/// Merged case counts for one atlas country: one value per dataset year.
#[derive(Debug, Clone, Default)]
pub struct CountryCases {
    by_year: BTreeMap<i32, f64>,
}

impl CountryCases {
    pub fn value(&self, year: i32) -> Option<f64> {
        self.by_year.get(&year).copied()
    }
}

/// Incidence-dataset country names with no matching atlas record, in dataset
/// order. Diagnostic only: unmatched names are expected to be covered (or
/// not) by the correction map.
pub fn unmatched_countries(table: &CaseTable, atlas: &[Country]) -> Vec<String> {
    let shapes: HashSet<&str> = atlas.iter().map(|c| c.name.as_str()).collect();
    table
        .countries()
        .iter()
        .filter(|name| !shapes.contains(name.as_str()))
        .cloned()
        .collect()
}

/// Two-stage merge of the incidence dataset onto the atlas rows.
///
/// Stage one fills every (country, year) cell from the table, defaulting to
/// 0 where no record exists. Stage two replays the correction map on top, so
/// corrected values take precedence; duplicate correct names collapse to
/// their last entry first. A correction whose incorrect name has no record
/// for some year is an error: silently writing 0 would disguise a broken
/// correction map as "no cases".
pub fn merge_cases(
    atlas: &[Country],
    table: &CaseTable,
    corrections: &[Correction],
) -> Result<Vec<CountryCases>> {
    let mut merged: Vec<CountryCases> = atlas
        .iter()
        .map(|country| CountryCases {
            by_year: table
                .years()
                .iter()
                .map(|&year| (year, table.get(&country.name, year).unwrap_or(0.0)))
                .collect(),
        })
        .collect();

    // duplicate correct names collapse to their last entry before any
    // lookup happens, so a shadowed entry is never consulted
    let mut overrides: Vec<&Correction> = Vec::with_capacity(corrections.len());
    for correction in corrections {
        match overrides
            .iter_mut()
            .find(|existing| existing.correct == correction.correct)
        {
            Some(slot) => *slot = correction,
            None => overrides.push(correction),
        }
    }

    for correction in overrides {
        for &year in table.years() {
            let cases = table.get(&correction.incorrect, year).with_context(|| {
                format!(
                    "correction {:?} -> {:?} has no incidence record for {}",
                    correction.correct, correction.incorrect, year
                )
            })?;
            // an atlas without the corrected name makes this a no-op, but
            // the lookup above must still succeed
            for (country, cases_out) in atlas.iter().zip(merged.iter_mut()) {
                if country.name == correction.correct {
                    cases_out.by_year.insert(year, cases);
                }
            }
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incidence::IncidenceRow;
    use geo_types::{LineString, MultiPolygon, Polygon};

    fn country(name: &str, continent: &str) -> Country {
        let ring = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        Country {
            name: name.to_string(),
            continent: continent.to_string(),
            geometry: MultiPolygon(vec![Polygon::new(ring, vec![])]),
        }
    }

    fn row(name: &str, year: i32, cases: f64) -> IncidenceRow {
        IncidenceRow {
            country: name.to_string(),
            year,
            cases,
        }
    }

    #[test]
    fn direct_match_takes_the_record_value() -> Result<()> {
        let atlas = vec![country("Testland", "Africa")];
        let table = CaseTable::from_rows([row("Testland", 2000, 50.0), row("Testland", 2001, 75.0)]);

        let merged = merge_cases(&atlas, &table, &[])?;
        assert_eq!(merged[0].value(2000), Some(50.0));
        assert_eq!(merged[0].value(2001), Some(75.0));
        Ok(())
    }

    #[test]
    fn missing_record_fills_zero() -> Result<()> {
        let atlas = vec![country("Testland", "Africa"), country("Quietland", "Asia")];
        let table = CaseTable::from_rows([row("Testland", 2000, 50.0)]);

        let merged = merge_cases(&atlas, &table, &[])?;
        assert_eq!(merged[1].value(2000), Some(0.0));
        Ok(())
    }

    #[test]
    fn every_dataset_year_gets_a_value() -> Result<()> {
        let atlas = vec![country("Quietland", "Asia")];
        let table = CaseTable::from_rows([
            row("Testland", 2000, 1.0),
            row("Testland", 2001, 2.0),
            row("Testland", 2002, 3.0),
        ]);

        let merged = merge_cases(&atlas, &table, &[])?;
        for year in [2000, 2001, 2002] {
            assert_eq!(merged[0].value(year), Some(0.0));
        }
        assert_eq!(merged[0].value(1999), None);
        Ok(())
    }

    #[test]
    fn correction_overrides_direct_match() -> Result<()> {
        let atlas = vec![country("Republic of X", "Africa")];
        let table = CaseTable::from_rows([
            // a direct record for the atlas spelling that must lose
            row("Republic of X", 1999, 999.0),
            row("Rep X", 1999, 10.0),
        ]);
        let corrections = vec![Correction {
            correct: "Republic of X".into(),
            incorrect: "Rep X".into(),
        }];

        let merged = merge_cases(&atlas, &table, &corrections)?;
        assert_eq!(merged[0].value(1999), Some(10.0));
        Ok(())
    }

    #[test]
    fn duplicate_corrections_collapse_to_the_last_entry() -> Result<()> {
        let atlas = vec![country("Republic of X", "Africa")];
        let table =
            CaseTable::from_rows([row("Republic of X", 1999, 1.0), row("Rep X", 1999, 10.0)]);
        // the shadowed first entry has no backing record; it must never be
        // looked up, so the merge still succeeds
        let corrections = vec![
            Correction {
                correct: "Republic of X".into(),
                incorrect: "Missing Name".into(),
            },
            Correction {
                correct: "Republic of X".into(),
                incorrect: "Rep X".into(),
            },
        ];

        let merged = merge_cases(&atlas, &table, &corrections)?;
        assert_eq!(merged[0].value(1999), Some(10.0));
        Ok(())
    }

    #[test]
    fn correction_without_backing_record_is_an_error() {
        let atlas = vec![country("Republic of X", "Africa")];
        let table = CaseTable::from_rows([row("Republic of X", 1999, 1.0)]);
        let corrections = vec![Correction {
            correct: "Republic of X".into(),
            incorrect: "Rep X".into(),
        }];

        let err = merge_cases(&atlas, &table, &corrections).unwrap_err();
        assert!(err.to_string().contains("Rep X"));
        assert!(err.to_string().contains("1999"));
    }

    #[test]
    fn correction_for_unknown_atlas_name_is_a_noop() -> Result<()> {
        let atlas = vec![country("Testland", "Africa")];
        let table = CaseTable::from_rows([row("Testland", 2000, 5.0), row("Rep X", 2000, 10.0)]);
        let corrections = vec![Correction {
            correct: "Republic of X".into(),
            incorrect: "Rep X".into(),
        }];

        let merged = merge_cases(&atlas, &table, &corrections)?;
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].value(2000), Some(5.0));
        Ok(())
    }

    #[test]
    fn unmatched_reports_exactly_the_missing_names() {
        let atlas = vec![country("Testland", "Africa"), country("Otherland", "Asia")];
        let table = CaseTable::from_rows([
            row("Testland", 2000, 1.0),
            row("Lostland", 2000, 2.0),
            row("Otherland", 2000, 3.0),
            row("Nowhereland", 2000, 4.0),
        ]);

        assert_eq!(
            unmatched_countries(&table, &atlas),
            vec!["Lostland".to_string(), "Nowhereland".to_string()]
        );
    }

    #[test]
    fn fully_matched_dataset_reports_nothing() {
        let atlas = vec![country("Testland", "Africa")];
        let table = CaseTable::from_rows([row("Testland", 2000, 1.0)]);
        assert!(unmatched_countries(&table, &atlas).is_empty());
    }
}
