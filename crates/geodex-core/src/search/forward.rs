//! Forward matching: exact-city mode and the default scored fuzzy mode.
//!
//! Both modes share the parser and the inverted-index candidate
//! collection. Candidate sets iterate in ascending arena order and every
//! tie resolves on (population, then lower arena index), so identical
//! inputs always produce identical answers.

use std::collections::BTreeMap;

use super::{fuzzy_match, GeocodeOptions};
use crate::model::{CityRecord, Geodex};
use crate::text;

// Scoring contributions, summed per candidate. The relative weights encode
// which evidence wins arguments: an exact name beats an alternate, a parsed
// region beats a loose abbreviation hit, containment is the weakest signal.
const SCORE_EXACT_NAME: i32 = 7;
const SCORE_REGION_ABBREV: i32 = 5;
const SCORE_ALT_CASE_SENSITIVE: i32 = 5;
const SCORE_FUZZY_NAME: i32 = 5;
const SCORE_COUNTRY_PARSED: i32 = 4;
const SCORE_REGION_PARSED: i32 = 4;
const SCORE_ALT_CASE_INSENSITIVE: i32 = 3;
const SCORE_COUNTRY_ABBREV: i32 = 3;
const SCORE_NAME_CONTAINS_TOKEN: i32 = 2;
const SCORE_NAME_EQUALS_TOKEN: i32 = 1;

impl Geodex {
    /// Exact-city mode: the primary name must equal the input (or the
    /// input with extracted pieces stripped), case-insensitively.
    pub(crate) fn exact_match_city(&self, query: &str) -> CityRecord {
        let pieces = self.extract_location_pieces(query);
        let stripped = pieces.tokens.join(" ");

        let mut keys = vec![text::fold(query)];
        if stripped != query {
            keys.push(text::fold(&stripped));
        }
        let candidates = self.collect_candidates(keys);

        let matching: Vec<u32> = candidates
            .into_iter()
            .filter(|&idx| {
                let city = &self.cities[idx as usize];
                text::eq_fold(query, &city.city) || text::eq_fold(&stripped, &city.city)
            })
            .collect();

        match matching.len() {
            0 => CityRecord::default(),
            1 => self.cities[matching[0] as usize].clone(),
            _ => self.disambiguate_exact(&matching, &pieces.country, &pieces.region),
        }
    }

    /// Multi-candidate resolution for exact-city mode.
    ///
    /// Passes run in sequence and later passes override earlier ones: a
    /// region-only pick is upgraded by a (region ∧ country) pick, and only
    /// when neither applies does the country-population pass decide.
    fn disambiguate_exact(&self, matching: &[u32], country: &str, region: &str) -> CityRecord {
        let mut best = CityRecord::default();

        // Pass 1: region match, highest population.
        for &idx in matching {
            let city = &self.cities[idx as usize];
            if text::eq_fold(region, &city.region())
                && (best.is_empty() || city.population > best.population)
            {
                best = city.clone();
            }
        }

        // Pass 2: region and country both match; overrides pass 1.
        let mut both = CityRecord::default();
        for &idx in matching {
            let city = &self.cities[idx as usize];
            if text::eq_fold(region, &city.region())
                && text::eq_fold(country, &city.country())
                && (both.is_empty() || city.population > both.population)
            {
                both = city.clone();
            }
        }
        if !both.is_empty() {
            best = both;
        }

        // Pass 3: nothing region-shaped matched; fall back to the parsed
        // country and take the largest. When every candidate reports
        // population 0 the first one still wins — a real record beats an
        // empty result.
        if best.is_empty() {
            let in_country: Vec<&CityRecord> = matching
                .iter()
                .map(|&idx| &self.cities[idx as usize])
                .filter(|city| text::eq_fold(country, &city.country()))
                .collect();
            if let Some(&first) = in_country.first() {
                let mut biggest = first;
                for &city in &in_country[1..] {
                    if city.population > biggest.population {
                        biggest = city;
                    }
                }
                best = biggest.clone();
            }
        }

        best
    }

    /// Scored fuzzy mode (the default).
    pub(crate) fn fuzzy_match_location(&self, query: &str, opts: GeocodeOptions) -> CityRecord {
        let pieces = self.extract_location_pieces(query);
        let stripped = pieces.tokens.join(" ");

        // Candidate keys: the whole input, the stripped remainder, and
        // every individual token.
        let mut keys = vec![text::fold(query)];
        if stripped != query {
            keys.push(text::fold(&stripped));
        }
        for token in &pieces.tokens {
            keys.push(text::fold(token.trim_end_matches(',')));
        }
        let mut candidates = self.collect_candidates(keys);

        // Typo tolerance: admit posting lists whose key sits within the
        // edit-distance budget of any meaningful token. This scans every
        // index key, which is why the distance is capped.
        if opts.fuzzy_distance > 0 {
            for (key, list) in &self.name_index {
                for token in &pieces.tokens {
                    let token = token.trim_end_matches(',');
                    if token.chars().count() > 2
                        && fuzzy_match(token, key, opts.fuzzy_distance)
                    {
                        candidates.extend(list.iter().copied());
                    }
                }
            }
        }

        let mut scores: BTreeMap<u32, i32> = BTreeMap::new();

        for &idx in &candidates {
            let city = &self.cities[idx as usize];
            let city_country = city.country();
            let city_region = city.region();

            // Fast path for the common "City, ST" shape: an exact name
            // with the right region needs no scoring at all.
            if !pieces.region.is_empty()
                && text::eq_fold(query, &city.city)
                && text::eq_fold(&pieces.region, &city_region)
            {
                return city.clone();
            }

            let score = scores.entry(idx).or_insert(0);

            for abbrev in &pieces.abbrevs {
                if abbrev.len() == 2 {
                    if text::eq_fold(&city_region, abbrev) {
                        *score += SCORE_REGION_ABBREV;
                    }
                    if text::eq_fold(&city_country, abbrev) {
                        *score += SCORE_COUNTRY_ABBREV;
                    }
                }
            }

            if !pieces.country.is_empty() && pieces.country == city_country {
                *score += SCORE_COUNTRY_PARSED;
            }
            if !pieces.region.is_empty() && pieces.region == city_region {
                *score += SCORE_REGION_PARSED;
            }

            // Alternates split on commas; each entry contributes on its
            // own, and a case-sensitive hit stacks on top of the
            // case-insensitive one.
            if !city.city_alt.is_empty() {
                for raw in city.city_alt.split(',') {
                    let alt = raw.trim();
                    if alt.is_empty() {
                        continue;
                    }
                    if text::eq_fold(alt, query) {
                        *score += SCORE_ALT_CASE_INSENSITIVE;
                    }
                    if alt == query {
                        *score += SCORE_ALT_CASE_SENSITIVE;
                    }
                }
            }

            if text::eq_fold(query, &city.city) {
                *score += SCORE_EXACT_NAME;
            } else if opts.fuzzy_distance > 0 {
                for token in &pieces.tokens {
                    let token = token.trim_end_matches(',');
                    if token.chars().count() > 2
                        && fuzzy_match(token, &city.city, opts.fuzzy_distance)
                    {
                        *score += SCORE_FUZZY_NAME;
                    }
                }
            }

            for token in &pieces.tokens {
                let token = token.trim_end_matches(',');
                if text::fold(&city.city).contains(&text::fold(token)) {
                    *score += SCORE_NAME_CONTAINS_TOKEN;
                }
                if text::eq_fold(&city.city, token) {
                    *score += SCORE_NAME_EQUALS_TOKEN;
                }
            }
        }

        // Only candidates that accrued at least one contribution stay in
        // the running; the population bonuses below must not resurrect a
        // candidate nothing else vouched for.
        scores.retain(|_, score| *score > 0);

        // Without a parsed country the query carries no locality evidence,
        // so nudge real places over hamlets: +1 to every candidate with a
        // four-digit population, +1 more to the single most populous one.
        if pieces.country.is_empty() {
            let mut highest_pop = 0i32;
            let mut highest_idx: Option<u32> = None;
            for (&idx, score) in scores.iter_mut() {
                let pop = self.cities[idx as usize].population;
                if pop >= 1000 {
                    *score += 1;
                }
                if pop > highest_pop {
                    highest_pop = pop;
                    highest_idx = Some(idx);
                }
            }
            if let Some(idx) = highest_idx {
                if let Some(score) = scores.get_mut(&idx) {
                    *score += 1;
                }
            }
        }

        // Strictly-highest score wins; ties fall to population, then to
        // the lower arena index (ascending map order makes the earlier
        // index the incumbent).
        let mut best_score = 0i32;
        let mut best: Option<u32> = None;
        for (&idx, &score) in &scores {
            match best {
                Some(b) if score == best_score => {
                    if self.cities[idx as usize].population
                        > self.cities[b as usize].population
                    {
                        best = Some(idx);
                    }
                }
                _ if score > best_score => {
                    best_score = score;
                    best = Some(idx);
                }
                _ => {}
            }
        }

        match best {
            Some(idx) => self.cities[idx as usize].clone(),
            None => CityRecord::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::CountryInfo;

    fn france() -> CountryInfo {
        CountryInfo {
            country: "France".into(),
            iso: "FR".into(),
            ..CountryInfo::default()
        }
    }

    fn build(cities: Vec<CityRecord>) -> Geodex {
        Geodex::assemble(
            cities,
            vec![france()],
            None,
            // nonexistent data dir: the admin table is simply empty
            Config::default().with_data_dir("/nonexistent/geodex-admin"),
        )
    }

    fn city(name: &str, alt: &str, cc: &str, region: &str, pop: i32) -> CityRecord {
        CityRecord::new(name.into(), alt.into(), cc, region, 10.0, 20.0, pop)
    }

    #[test]
    fn case_sensitive_alternate_outscores_case_insensitive() {
        let g = build(vec![
            city("Ville-A", "BOMBAY", "FR", "", 5000),
            city("Ville-B", "Bombay", "FR", "", 5000),
        ]);
        // both alternates equal the input case-insensitively (+3), but only
        // Ville-B stacks the case-sensitive +5 on top
        let got = g.fuzzy_match_location("Bombay", GeocodeOptions::default());
        assert_eq!(got.city, "Ville-B");
    }

    #[test]
    fn score_ties_fall_to_population_then_index() {
        let g = build(vec![
            city("Twin", "", "FR", "", 100),
            city("Twin", "", "FR", "", 200),
        ]);
        let got = g.fuzzy_match_location("Twin, France", GeocodeOptions::default());
        assert_eq!(got.population, 200);

        let g = build(vec![
            city("Twin", "first", "FR", "", 100),
            city("Twin", "second", "FR", "", 100),
        ]);
        let got = g.fuzzy_match_location("Twin, France", GeocodeOptions::default());
        // equal score and population: the earlier arena index wins
        assert_eq!(got.city_alt, "first");
    }

    #[test]
    fn no_positive_score_means_no_match() {
        let g = build(vec![city("Somewhere", "", "FR", "", 10_000)]);
        assert!(g
            .fuzzy_match_location("Elsewhere", GeocodeOptions::default())
            .is_empty());
    }

    #[test]
    fn candidates_are_never_invented_by_population_bonus() {
        // a city reachable only through an alternate that matches a token
        // but contributes nothing must not win on bonuses alone
        let g = build(vec![city("Xyz", "foo", "FR", "", 50_000)]);
        let got = g.fuzzy_match_location("foo bar", GeocodeOptions::default());
        assert!(got.is_empty());
    }

    #[test]
    fn exact_mode_requires_a_literal_name() {
        let g = build(vec![city("Saint-Denis", "Paris-Nord", "FR", "", 100_000)]);
        assert!(g.exact_match_city("Paris-Nord").is_empty());
        assert_eq!(g.exact_match_city("saint-denis").city, "Saint-Denis");
    }
}
