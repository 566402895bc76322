//! City name resolution against a canonical list.
//!
//! Three tiers, first hit wins:
//!
//! 1. exact lookup of the raw string in `city_mappings`
//! 2. exact lookup of the normalized string among the normalized canonical names
//! 3. best fuzzy match of the normalized string, if it scores at least
//!    `fuzzy_threshold` (see [`similarity::ratio`](super::similarity::ratio))

use super::similarity::best_match;
use crate::config::GeoConfig;
use crate::report::GeoReport;
use crate::table::{Table, Value};
use std::collections::BTreeMap;
use unicode_normalization::UnicodeNormalization as _;

/// Strip diacritics, collapse whitespace and title-case.
///
/// Characters with no ASCII decomposition are dropped, so `"Bengalūru"`
/// becomes `"Bengaluru"` and `"  new   DELHI "` becomes `"New Delhi"`.
pub fn normalize_city_name(raw: &str) -> String {
    let ascii: String = raw.nfkd().filter(char::is_ascii).collect();
    let collapsed = ascii.split_whitespace().collect::<Vec<_>>().join(" ");
    title_case(&collapsed)
}

/// Upper-case a letter that follows a non-letter, lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if after_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(ch);
            after_letter = false;
        }
    }
    out
}

struct CityResolver<'c> {
    mappings: &'c BTreeMap<String, String>,
    /// Normalized name to canonical spelling; a later duplicate wins.
    canonical: BTreeMap<String, &'c str>,
    threshold: f64,
}

impl<'c> CityResolver<'c> {
    fn new(config: &'c GeoConfig) -> Self {
        let canonical = config
            .canonical_cities
            .iter()
            .map(|city| (normalize_city_name(city), city.as_str()))
            .collect();
        Self {
            mappings: &config.city_mappings,
            canonical,
            threshold: config.fuzzy_threshold,
        }
    }

    fn resolve(&self, raw: &str) -> Option<&'c str> {
        if let Some(mapped) = self.mappings.get(raw) {
            return Some(mapped.as_str());
        }
        let normalized = normalize_city_name(raw);
        if let Some(city) = self.canonical.get(&normalized) {
            return Some(*city);
        }
        let hit = best_match(
            &normalized,
            self.canonical.keys().map(String::as_str),
            self.threshold,
        )?;
        self.canonical.get(hit).copied()
    }
}

/// Resolve the configured city column. Nulls pass through; values no tier
/// resolves are left as they were.
pub fn resolve_cities(mut table: Table, config: &GeoConfig) -> (Table, GeoReport) {
    let mut report = GeoReport::default();
    let Some(idx) = config
        .city_field
        .as_deref()
        .and_then(|c| table.column_index(c))
    else {
        return (table, report);
    };

    let resolver = CityResolver::new(config);
    for cell in table.column_mut(idx) {
        let Some(raw) = cell.to_text() else {
            continue;
        };
        let Some(city) = resolver.resolve(&raw) else {
            continue;
        };
        report.geo_resolved += 1;
        let new = Value::from(city);
        if *cell != new {
            report.cells_changed += 1;
            *cell = new;
        }
    }

    (table, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{row, table};

    fn config() -> GeoConfig {
        GeoConfig {
            city_field: Some("city".to_owned()),
            canonical_cities: ["Mumbai", "Bangalore", "Chennai", "New Delhi"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_city_name() {
        assert_eq!(normalize_city_name("  new   DELHI "), "New Delhi");
        assert_eq!(normalize_city_name("Bengalūru"), "Bengaluru");
        assert_eq!(normalize_city_name("São Paulo"), "Sao Paulo");
        assert_eq!(normalize_city_name("3rd block"), "3Rd Block");
        assert_eq!(normalize_city_name(""), "");
    }

    #[test]
    fn test_tiers_in_order() {
        let mut cfg = config();
        cfg.city_mappings
            .insert("Bombay".to_owned(), "Mumbai".to_owned());
        let t = table(
            &["city"],
            vec![
                row!["Bombay"],
                row!["  chennai "],
                row!["Chenai"],
                row!["Gotham"],
                row![Value::Null],
            ],
        );
        let (out, report) = resolve_cities(t, &cfg);

        assert_eq!(out.cell(0, "city"), Some(&Value::from("Mumbai")));
        assert_eq!(out.cell(1, "city"), Some(&Value::from("Chennai")));
        assert_eq!(out.cell(2, "city"), Some(&Value::from("Chennai")));
        assert_eq!(out.cell(3, "city"), Some(&Value::from("Gotham")));
        assert_eq!(out.cell(4, "city"), Some(&Value::Null));
        assert_eq!(report.geo_resolved, 3);
    }

    #[test]
    fn test_bengaluru_needs_mapping_or_low_threshold() {
        let t = || table(&["city"], vec![row!["Bengaluru  "]]);

        let (unchanged, report) = resolve_cities(t(), &config());
        assert_eq!(unchanged.cell(0, "city"), Some(&Value::from("Bengaluru  ")));
        assert_eq!(report.geo_resolved, 0);

        let mut loose = config();
        loose.fuzzy_threshold = 0.6;
        let (fuzzy, _) = resolve_cities(t(), &loose);
        assert_eq!(fuzzy.cell(0, "city"), Some(&Value::from("Bangalore")));

        let mut mapped = config();
        mapped
            .city_mappings
            .insert("Bengaluru  ".to_owned(), "Bangalore".to_owned());
        let (exact, _) = resolve_cities(t(), &mapped);
        assert_eq!(exact.cell(0, "city"), Some(&Value::from("Bangalore")));
    }

    #[test]
    fn test_already_canonical_counts_as_resolved_not_changed() {
        let t = table(&["city"], vec![row!["Mumbai"]]);
        let (_, report) = resolve_cities(t, &config());
        assert_eq!(report.geo_resolved, 1);
        assert_eq!(report.cells_changed, 0);
    }

    #[test]
    fn test_no_city_field_is_noop() {
        let mut cfg = config();
        cfg.city_field = None;
        let t = table(&["city"], vec![row!["bombay"]]);
        let (out, report) = resolve_cities(t.clone(), &cfg);
        assert_eq!(out, t);
        assert_eq!(report, GeoReport::default());
    }
}
