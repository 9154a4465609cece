use foundation::math::LatLng;
use serde::{Deserialize, Serialize};

/// One searchable place: a subdistrict with its parent district and province.
///
/// Field aliases accept the common Thai open-data tambon dumps as well as the
/// plain English keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazetteerEntry {
    #[serde(alias = "tambon", alias = "tambon_t")]
    pub subdistrict: String,
    #[serde(alias = "amphoe", alias = "amphoe_t")]
    pub district: String,
    #[serde(alias = "changwat", alias = "changwat_t")]
    pub province: String,
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "long", alias = "lon", alias = "longitude")]
    pub lng: f64,
}

impl GazetteerEntry {
    pub fn new(
        subdistrict: impl Into<String>,
        district: impl Into<String>,
        province: impl Into<String>,
        position: LatLng,
    ) -> Self {
        Self {
            subdistrict: subdistrict.into(),
            district: district.into(),
            province: province.into(),
            lat: position.lat,
            lng: position.lng,
        }
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// "subdistrict, district, province" for result lists.
    pub fn label(&self) -> String {
        format!("{}, {}, {}", self.subdistrict, self.district, self.province)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GazetteerQueryOptions {
    /// Minimum query length in characters (not bytes).
    pub min_chars: usize,
    pub max_results: usize,
}

impl Default for GazetteerQueryOptions {
    fn default() -> Self {
        Self {
            min_chars: 2,
            max_results: 10,
        }
    }
}

/// Result of filtering the gazetteer.
///
/// `TooShort` and `NoMatch` are kept apart on purpose: only the latter should
/// be shown to the user as an empty state.
#[derive(Debug, Clone, PartialEq)]
pub enum GazetteerOutcome {
    TooShort,
    NoMatch,
    /// At most `max_results` hits, in gazetteer order. Not exhaustive.
    Matches(Vec<GazetteerEntry>),
}

impl GazetteerOutcome {
    pub fn entries(&self) -> &[GazetteerEntry] {
        match self {
            GazetteerOutcome::Matches(v) => v,
            _ => &[],
        }
    }
}

/// Static in-memory place list. Loaded once, never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gazetteer {
    entries: Vec<GazetteerEntry>,
}

impl Gazetteer {
    pub fn new(entries: Vec<GazetteerEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[GazetteerEntry] {
        &self.entries
    }

    /// Case-insensitive substring match on subdistrict, district or province.
    pub fn search(&self, query: &str, opts: GazetteerQueryOptions) -> GazetteerOutcome {
        let query = query.trim();
        if query.chars().count() < opts.min_chars {
            return GazetteerOutcome::TooShort;
        }
        let needle = query.to_lowercase();

        let hits: Vec<GazetteerEntry> = self
            .entries
            .iter()
            .filter(|e| {
                [&e.subdistrict, &e.district, &e.province]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .take(opts.max_results)
            .cloned()
            .collect();

        if hits.is_empty() {
            GazetteerOutcome::NoMatch
        } else {
            GazetteerOutcome::Matches(hits)
        }
    }
}
