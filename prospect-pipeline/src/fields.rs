//! Typed field-path accessors for filter rules and output projection.
//!
//! Rules and output field lists address leads by dot path
//! (`"name"`, `"enrichment.employee_count"`). Paths resolve through this
//! fixed registry of typed getters; an unknown path yields `Null` rather
//! than an error, so a typo in a rule config degrades to a non-matching
//! predicate instead of aborting the run.

use prospect_core::types::Lead;

/// A resolved field value. Lists are flattened to comma-joined strings so
/// substring operators apply naturally.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            _ => None,
        }
    }

    fn opt_str(v: &Option<String>) -> FieldValue {
        match v {
            Some(s) => Self::Str(s.clone()),
            None => Self::Null,
        }
    }

    fn list(v: &[String]) -> FieldValue {
        if v.is_empty() {
            Self::Null
        } else {
            Self::Str(v.join(","))
        }
    }
}

/// Resolve a dot path against a lead.
pub fn lead_field(lead: &Lead, path: &str) -> FieldValue {
    match path {
        "id" => FieldValue::Str(lead.id.clone()),
        "name" => FieldValue::Str(lead.name.clone()),
        "canonical_name" => FieldValue::Str(lead.canonical_name.clone()),
        "address" => FieldValue::opt_str(&lead.address),
        "city" => FieldValue::opt_str(&lead.city),
        "region" => FieldValue::opt_str(&lead.region),
        "country" => FieldValue::opt_str(&lead.country),
        "phone" => FieldValue::opt_str(&lead.phone),
        "email" => FieldValue::opt_str(&lead.email),
        "website" => FieldValue::opt_str(&lead.website),
        "status" => FieldValue::Str(lead.status.as_str().to_string()),
        "score" => lead
            .score
            .map(|s| FieldValue::Num(f64::from(s)))
            .unwrap_or(FieldValue::Null),
        "rating" => lead.rating.map(FieldValue::Num).unwrap_or(FieldValue::Null),
        "review_count" => lead
            .review_count
            .map(|c| FieldValue::Num(f64::from(c)))
            .unwrap_or(FieldValue::Null),
        "excluded_reason" => FieldValue::opt_str(&lead.excluded_reason),
        "last_contact_result" => FieldValue::opt_str(&lead.last_contact_result),
        "source_directories" => FieldValue::list(&lead.source_directories),
        "source_geos" => FieldValue::list(&lead.source_geos),
        "source_tags" => FieldValue::list(&lead.source_tags),
        "enrichment.emails" => match &lead.enrichment {
            Some(e) => FieldValue::list(&e.emails),
            None => FieldValue::Null,
        },
        "enrichment.phones" => match &lead.enrichment {
            Some(e) => FieldValue::list(&e.phones),
            None => FieldValue::Null,
        },
        "enrichment.social_links" => match &lead.enrichment {
            Some(e) => FieldValue::list(&e.social_links),
            None => FieldValue::Null,
        },
        "enrichment.has_online_booking" => match &lead.enrichment {
            Some(e) => FieldValue::Bool(e.has_online_booking),
            None => FieldValue::Null,
        },
        "enrichment.founder_profile" => match &lead.enrichment {
            Some(e) => FieldValue::Bool(e.founder_profile),
            None => FieldValue::Null,
        },
        "enrichment.employee_count" => match lead.enrichment.as_ref().and_then(|e| e.employee_count)
        {
            Some(c) => FieldValue::Num(f64::from(c)),
            None => FieldValue::Null,
        },
        "enrichment.last_updated_at" => match lead.enrichment.as_ref().and_then(|e| e.last_updated_at)
        {
            Some(t) => FieldValue::Num(t as f64),
            None => FieldValue::Null,
        },
        _ => FieldValue::Null,
    }
}
