//! Contact-outcome recording.
//!
//! Recording an outreach attempt is the operator-facing write path: it
//! stamps the outcome onto the lead, retires the angle the attempt used,
//! and starts the cooldown window configured for that outcome. The lead
//! re-enters through the expired-cooldown sweep like any other cooled
//! lead.

use prospect_core::config::CooldownConfig;
use prospect_core::errors::PipelineError;
use prospect_core::types::{now_ms, AngleType};
use prospect_storage::queries::leads;

use crate::context::RunContext;

/// Record the outcome of a contact attempt against a lead.
///
/// The cooldown window comes from the per-outcome override in the
/// cooldown config, falling back to the default window. `used_angle`
/// moves the angle the attempt pitched into the exhausted set.
pub fn record_outcome(
    ctx: &RunContext,
    lead_id: &str,
    result: &str,
    used_angle: Option<AngleType>,
) -> Result<(), PipelineError> {
    let now = now_ms();
    let days = ctx.config.cooldown.days_for_outcome(result);
    let until = CooldownConfig::deadline(now, days);

    ctx.db.with_transaction(|c| {
        leads::record_contact(c, lead_id, result, now)?;
        if let Some(angle) = used_angle {
            leads::exhaust_angle(c, lead_id, angle, now)?;
        }
        leads::set_cooldown(c, lead_id, until, now)
    })?;

    tracing::debug!(lead_id, result, cooldown_days = days, "contact recorded");
    Ok(())
}
