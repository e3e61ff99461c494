//! Scoring & angle engine: pure function from lead + weights to
//! (score, reasons, angles).
//!
//! The score is an accumulation, not a formula tree: each signal
//! independently adds or withholds its configured weight and appends a
//! reason token. Angle weights are opportunities, not penalties; a lead
//! with no website scores *higher* because there is more to pitch.

use prospect_core::config::cooldown_config::DAY_MS;
use prospect_core::config::ScoringConfig;
use prospect_core::types::{AngleType, Lead};

/// Raw output of the signal accumulation, before the advance/exclude/
/// cooldown decision.
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    /// Clamped to [0, 100], rounded to the nearest integer.
    pub score: u32,
    pub reasons: Vec<String>,
    /// Detected angles with the lead's exhausted set already filtered out.
    pub active_angles: Vec<AngleType>,
}

/// What the score stage should do with a lead.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreDecision {
    /// Persist the score and advance to `scored`.
    Advance,
    /// Below the minimum score: exclude as `bad_fit`. Not recoverable.
    ExcludeBadFit,
    /// Score passes but every detected angle is exhausted: cooldown for
    /// the configured window. Recoverable by the expired-cooldown sweep.
    CooldownNoAngles,
}

/// Accumulate all signals for a lead.
pub fn score_lead(lead: &Lead, config: &ScoringConfig, now: i64) -> ScoreBreakdown {
    let mut score = 0.0;
    let mut reasons = Vec::new();
    let mut angles = Vec::new();

    // Contact presence: bonus or a negative-reason token, never a penalty.
    if lead.has_contact_info() {
        score += config.effective_contact_weight();
        reasons.push("+contact_info".to_string());
    } else {
        reasons.push("-no_contact_info".to_string());
    }

    // Website presence. Absence is a pure opportunity.
    if lead.website.is_none() {
        score += config.effective_no_website_weight();
        reasons.push("+no_website".to_string());
        angles.push(AngleType::NoWebsite);
    } else {
        score += config.effective_website_bonus();
        reasons.push("+has_website".to_string());
        if website_outdated(lead, config, now) {
            score += config.effective_outdated_website_weight();
            reasons.push("+outdated_website".to_string());
            angles.push(AngleType::OutdatedWebsite);
        }
    }

    // Booking: absence of a detected signal is the angle.
    let has_booking = lead
        .enrichment
        .as_ref()
        .is_some_and(|e| e.has_online_booking);
    if !has_booking {
        score += config.effective_no_booking_weight();
        reasons.push("+no_online_booking".to_string());
        angles.push(AngleType::NoOnlineBooking);
    }

    // Reviews: few reviews is an angle, many reviews a capped bonus.
    let review_count = lead.review_count.unwrap_or(0);
    if review_count < config.effective_review_low_threshold() {
        score += config.effective_low_reviews_weight();
        reasons.push("+low_reviews".to_string());
        angles.push(AngleType::LowReviews);
    } else {
        let bonus = (f64::from(review_count) * config.effective_review_bonus_per_review())
            .min(config.effective_review_max_bonus());
        score += bonus;
        reasons.push("+review_bonus".to_string());
    }

    // Rating: poor rating is an angle, a good one a scaled bonus.
    // An unknown rating contributes nothing either way.
    if let Some(rating) = lead.rating {
        if rating < config.effective_rating_poor_threshold() {
            score += config.effective_poor_ratings_weight();
            reasons.push("+poor_ratings".to_string());
            angles.push(AngleType::PoorRatings);
        } else {
            score += (rating / 5.0).clamp(0.0, 1.0) * config.effective_rating_weight();
            reasons.push("+rating_bonus".to_string());
        }
    }

    // Founder-led: explicit profile signal or a small team.
    let founder_led = lead.enrichment.as_ref().is_some_and(|e| {
        e.founder_profile
            || e.employee_count
                .is_some_and(|c| c <= config.effective_founder_employee_max())
    });
    if founder_led {
        score += config.effective_founder_led_weight();
        reasons.push("+founder_led".to_string());
        angles.push(AngleType::FounderLed);
    }

    // An exhausted angle never resurfaces unless explicitly reset.
    let active_angles: Vec<AngleType> = angles
        .into_iter()
        .filter(|a| !lead.exhausted_angles.contains(a))
        .collect();

    ScoreBreakdown {
        score: score.clamp(0.0, 100.0).round() as u32,
        reasons,
        active_angles,
    }
}

fn website_outdated(lead: &Lead, config: &ScoringConfig, now: i64) -> bool {
    // Absent data is never assumed outdated.
    let Some(last_updated) = lead.enrichment.as_ref().and_then(|e| e.last_updated_at) else {
        return false;
    };
    let age_days = (now - last_updated) / DAY_MS;
    age_days >= i64::from(config.effective_outdated_days())
}

/// Decide the stage outcome for a breakdown. Unfitness is checked before
/// exhaustion: a lead below the minimum is excluded even when angles
/// remain, while angle exhaustion alone is always recoverable.
pub fn decide(breakdown: &ScoreBreakdown, config: &ScoringConfig) -> ScoreDecision {
    if breakdown.score < config.effective_min_score() {
        ScoreDecision::ExcludeBadFit
    } else if breakdown.active_angles.is_empty() {
        ScoreDecision::CooldownNoAngles
    } else {
        ScoreDecision::Advance
    }
}
