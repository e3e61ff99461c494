//! Filter rule evaluator: pure function from lead + ruleset to a decision.
//!
//! Evaluation order, first match wins:
//! 1. an existing exclusion reason is absorbing and returned unchanged;
//! 2. blocked category (source tag, case-insensitive);
//! 3. blocked keyword (substring of the business name, case-insensitive);
//! 4. custom rules in declared order.
//!
//! A lead with no matching exclusion but an unexpired cooldown is held,
//! not advanced: "rejected" and "not yet eligible" are different outcomes.

use prospect_core::config::{FilterConfig, FilterRule, RuleOp, RuleValue};
use prospect_core::types::Lead;

use crate::fields::{lead_field, FieldValue};

/// Outcome of evaluating a lead against the filter config.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterDecision {
    /// Exclude with the given reason.
    Exclude(String),
    /// Inside an active cooldown window; neither excluded nor advanced.
    Hold,
    /// Advance to `filtered`.
    Pass,
}

/// Evaluate a lead against the configured blocklists and rules.
pub fn evaluate(lead: &Lead, config: &FilterConfig, now: i64) -> FilterDecision {
    if let Some(reason) = &lead.excluded_reason {
        return FilterDecision::Exclude(reason.clone());
    }

    for category in &config.exclude_categories {
        if lead
            .source_tags
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(category))
        {
            return FilterDecision::Exclude(format!("category:{}", category.to_lowercase()));
        }
    }

    let name_lower = lead.name.to_lowercase();
    for keyword in &config.exclude_keywords {
        if name_lower.contains(&keyword.to_lowercase()) {
            return FilterDecision::Exclude(format!("keyword:{}", keyword.to_lowercase()));
        }
    }

    for rule in &config.rules {
        if rule_matches(lead, rule) {
            return FilterDecision::Exclude(rule.effective_reason());
        }
    }

    if lead.in_cooldown(now) {
        return FilterDecision::Hold;
    }

    FilterDecision::Pass
}

fn rule_matches(lead: &Lead, rule: &FilterRule) -> bool {
    let value = lead_field(lead, &rule.field);

    match rule.op {
        RuleOp::IsNull => value.is_null(),
        RuleOp::NotNull => !value.is_null(),
        RuleOp::Equals => equals(&value, rule.value.as_ref()),
        RuleOp::NotEquals => !value.is_null() && !equals(&value, rule.value.as_ref()),
        // Substring tests apply to string-typed values only.
        RuleOp::Contains => contains(&value, rule.value.as_ref()),
        RuleOp::NotContains => value.as_str().is_some() && !contains(&value, rule.value.as_ref()),
        // Numeric comparisons apply to number-typed values only.
        RuleOp::GreaterThan => compare(&value, rule.value.as_ref(), |a, b| a > b),
        RuleOp::LessThan => compare(&value, rule.value.as_ref(), |a, b| a < b),
        RuleOp::Regex => regex_matches(&value, rule),
    }
}

fn equals(value: &FieldValue, expected: Option<&RuleValue>) -> bool {
    match (value, expected) {
        (FieldValue::Str(s), Some(RuleValue::Str(e))) => s.eq_ignore_ascii_case(e),
        (FieldValue::Num(n), Some(RuleValue::Num(e))) => n == e,
        (FieldValue::Bool(b), Some(RuleValue::Bool(e))) => b == e,
        _ => false,
    }
}

fn contains(value: &FieldValue, expected: Option<&RuleValue>) -> bool {
    match (value.as_str(), expected.and_then(|e| e.as_str())) {
        (Some(haystack), Some(needle)) => {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
        _ => false,
    }
}

fn compare(value: &FieldValue, expected: Option<&RuleValue>, cmp: fn(f64, f64) -> bool) -> bool {
    match (value.as_num(), expected.and_then(|e| e.as_num())) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

fn regex_matches(value: &FieldValue, rule: &FilterRule) -> bool {
    let (Some(haystack), Some(pattern)) = (
        value.as_str(),
        rule.value.as_ref().and_then(|v| v.as_str()),
    ) else {
        return false;
    };
    match regex::Regex::new(pattern) {
        Ok(re) => re.is_match(haystack),
        Err(e) => {
            // An invalid pattern is non-matching, not fatal.
            tracing::warn!(field = %rule.field, error = %e, "invalid filter regex");
            false
        }
    }
}
