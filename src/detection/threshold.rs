use crate::config::CheckConfig;

/// Resolve the threshold to compare against for one entity.
///
/// Two tiers: a per-entity custom threshold wins when configured, otherwise
/// the check's default applies. An entity absent from `custom_thresholds`
/// is the normal case, not an error.
pub fn resolve(check: &CheckConfig, entity_id: &str) -> f64 {
    match check.custom_thresholds.get(entity_id) {
        Some(custom) => *custom,
        None => check.default_threshold,
    }
}
