//! The compatibility scoring algorithm.
//!
//! Four factors, each scaled to 0..=100, combined by configurable
//! weights that must sum to 1:
//! - required-skill coverage (empty requirement list scores 100)
//! - preferred-skill coverage (same convention)
//! - experience fit (penalty per year of gap from the posting's
//!   expected midpoint; no evidence means no penalty)
//! - recency (linear decay to a floor over a cutoff window)

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::config::MatchingConfig;
use crate::posting::Posting;
use crate::profile::Profile;

use super::types::{MatchBreakdown, MatchResult};

/// Computes compatibility scores. Pure; no I/O.
pub struct MatchEngine {
    config: MatchingConfig,
}

impl MatchEngine {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Score one profile against one posting.
    ///
    /// `today` anchors the recency factor; callers pass the current
    /// UTC date, tests pass a fixed one.
    pub fn score(&self, profile: &Profile, posting: &Posting, today: NaiveDate) -> MatchResult {
        let profile_skills: Vec<String> = profile
            .skills
            .iter()
            .map(|s| s.name.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let (required_coverage, missing_required) =
            coverage(&profile_skills, &posting.required_skills);
        let (preferred_coverage, _) = coverage(&profile_skills, &posting.preferred_skills);

        let experience_fit = self.experience_fit(profile, posting);
        let recency_factor = self.recency_factor(posting.posted_date, today);

        let weighted = self.config.weight_required * required_coverage
            + self.config.weight_preferred * preferred_coverage
            + self.config.weight_experience * experience_fit
            + self.config.weight_recency * recency_factor;
        let score = round2(weighted.clamp(0.0, 100.0));

        MatchResult {
            profile_id: profile.id.clone(),
            posting_id: posting.id.clone(),
            score,
            breakdown: MatchBreakdown {
                required_skill_coverage: required_coverage,
                preferred_skill_coverage: preferred_coverage,
                experience_fit,
                recency_factor,
            },
            missing_required_skills: missing_required,
        }
    }

    /// 100 minus a per-year penalty on the gap between the profile's
    /// years and the posting's expected midpoint, floored at 0. A
    /// posting with no usable experience signal scores 100.
    fn experience_fit(&self, profile: &Profile, posting: &Posting) -> f64 {
        let Some(midpoint) = expected_years_midpoint(
            posting.experience_years_range.as_deref(),
            posting.experience_level.as_deref(),
        ) else {
            return 100.0;
        };

        let gap = (profile.years_experience - midpoint).abs();
        round2((100.0 - gap * self.config.experience_penalty_per_year).max(0.0))
    }

    /// Linear decay from 100 at age zero to the floor at the cutoff
    /// age; anything older, or undated, sits at the floor.
    fn recency_factor(&self, posted_date: Option<NaiveDate>, today: NaiveDate) -> f64 {
        let Some(posted) = posted_date else {
            return self.config.recency_floor;
        };

        let age_days = (today - posted).num_days();
        if age_days <= 0 {
            return 100.0;
        }
        if age_days >= self.config.recency_cutoff_days {
            return self.config.recency_floor;
        }

        let span = 100.0 - self.config.recency_floor;
        let fraction = age_days as f64 / self.config.recency_cutoff_days as f64;
        round2(100.0 - span * fraction)
    }
}

/// Coverage of `wanted` by `have`, scaled to 0..=100, plus the wanted
/// entries not covered. An empty wanted list is full coverage.
fn coverage(have: &[String], wanted: &[String]) -> (f64, Vec<String>) {
    let wanted: Vec<&str> = wanted
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if wanted.is_empty() {
        return (100.0, Vec::new());
    }

    let mut missing = Vec::new();
    let mut matched = 0usize;
    for skill in &wanted {
        if have.iter().any(|h| skills_match(h, &skill.to_lowercase())) {
            matched += 1;
        } else {
            missing.push(skill.to_string());
        }
    }

    let pct = round2(matched as f64 / wanted.len() as f64 * 100.0);
    (pct, missing)
}

/// Case-insensitive, substring-tolerant skill comparison. Both sides
/// are already lowercased; the substring direction covers "postgres"
/// vs "postgresql" either way. Very short names must match exactly so
/// "r" cannot claim "rust".
fn skills_match(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    if a.len() < 3 || b.len() < 3 {
        return false;
    }
    a.contains(b) || b.contains(a)
}

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

/// Expected-years midpoint from the posting's experience signal.
///
/// A numeric range wins: "3-5" gives its mean, a single number like
/// "5+ years" gives that number. Otherwise the level keyword maps to
/// an assumed midpoint. Neither present means no signal at all.
fn expected_years_midpoint(years_range: Option<&str>, level: Option<&str>) -> Option<f64> {
    if let Some(range) = years_range {
        let numbers: Vec<f64> = NUMBER_RE
            .find_iter(range)
            .filter_map(|m| m.as_str().parse::<f64>().ok())
            .collect();
        match numbers.as_slice() {
            [single] => return Some(*single),
            [first, second, ..] => return Some((first + second) / 2.0),
            [] => {}
        }
    }

    match level?.trim().to_lowercase().as_str() {
        "intern" | "entry" => Some(1.0),
        "mid" => Some(3.0),
        "senior" => Some(5.5),
        "lead" => Some(8.5),
        "executive" => Some(12.0),
        _ => None,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
