//! Scoring & angle engine configuration.

use serde::{Deserialize, Serialize};

/// Weights and thresholds for the scoring engine. Every signal's
/// contribution is configurable; `effective_*` accessors supply the
/// compiled defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    /// Bonus when any email/phone is known. Default: 15.
    pub contact_weight: Option<f64>,
    /// Bonus when the lead has a website. Default: 5.
    pub website_bonus: Option<f64>,
    /// Weight of the `no_website` angle. Default: 20.
    pub no_website_weight: Option<f64>,
    /// Weight of the `outdated_website` angle. Default: 15.
    pub outdated_website_weight: Option<f64>,
    /// Days since last site update before `outdated_website`. Default: 365.
    pub outdated_days: Option<u32>,
    /// Weight of the `no_online_booking` angle. Default: 10.
    pub no_booking_weight: Option<f64>,
    /// Review count below which `low_reviews` applies. Default: 10.
    pub review_low_threshold: Option<u32>,
    /// Weight of the `low_reviews` angle. Default: 10.
    pub low_reviews_weight: Option<f64>,
    /// Bonus per review above the threshold. Default: 1.0.
    pub review_bonus_per_review: Option<f64>,
    /// Cap on the review bonus. Default: 10.
    pub review_max_bonus: Option<f64>,
    /// Rating below which `poor_ratings` applies. Default: 3.5.
    pub rating_poor_threshold: Option<f64>,
    /// Weight of the `poor_ratings` angle. Default: 10.
    pub poor_ratings_weight: Option<f64>,
    /// Multiplier for the 0–1 scaled rating bonus. Default: 10.
    pub rating_weight: Option<f64>,
    /// Weight of the `founder_led` angle. Default: 5.
    pub founder_led_weight: Option<f64>,
    /// Employee count at or below which a lead counts as founder-led.
    /// Default: 5.
    pub founder_employee_max: Option<u32>,
    /// Minimum score to pass scoring; below it the lead is excluded as
    /// `bad_fit`. Default: 40.
    pub min_score: Option<u32>,
}

impl ScoringConfig {
    pub fn effective_contact_weight(&self) -> f64 {
        self.contact_weight.unwrap_or(15.0)
    }

    pub fn effective_website_bonus(&self) -> f64 {
        self.website_bonus.unwrap_or(5.0)
    }

    pub fn effective_no_website_weight(&self) -> f64 {
        self.no_website_weight.unwrap_or(20.0)
    }

    pub fn effective_outdated_website_weight(&self) -> f64 {
        self.outdated_website_weight.unwrap_or(15.0)
    }

    pub fn effective_outdated_days(&self) -> u32 {
        self.outdated_days.unwrap_or(365)
    }

    pub fn effective_no_booking_weight(&self) -> f64 {
        self.no_booking_weight.unwrap_or(10.0)
    }

    pub fn effective_review_low_threshold(&self) -> u32 {
        self.review_low_threshold.unwrap_or(10)
    }

    pub fn effective_low_reviews_weight(&self) -> f64 {
        self.low_reviews_weight.unwrap_or(10.0)
    }

    pub fn effective_review_bonus_per_review(&self) -> f64 {
        self.review_bonus_per_review.unwrap_or(1.0)
    }

    pub fn effective_review_max_bonus(&self) -> f64 {
        self.review_max_bonus.unwrap_or(10.0)
    }

    pub fn effective_rating_poor_threshold(&self) -> f64 {
        self.rating_poor_threshold.unwrap_or(3.5)
    }

    pub fn effective_poor_ratings_weight(&self) -> f64 {
        self.poor_ratings_weight.unwrap_or(10.0)
    }

    pub fn effective_rating_weight(&self) -> f64 {
        self.rating_weight.unwrap_or(10.0)
    }

    pub fn effective_founder_led_weight(&self) -> f64 {
        self.founder_led_weight.unwrap_or(5.0)
    }

    pub fn effective_founder_employee_max(&self) -> u32 {
        self.founder_employee_max.unwrap_or(5)
    }

    pub fn effective_min_score(&self) -> u32 {
        self.min_score.unwrap_or(40)
    }
}
