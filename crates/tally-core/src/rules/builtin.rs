use crate::error::TallyError;
use crate::rules::parse_rule_str;
use crate::rules::schema::Rule;

const FT_MATERIALS_JSON: &str = include_str!("../../../../rules/ft-materials.json");

/// Starting point for hand-written rules, printed by `tally rules template`.
///
/// This is only a template: rule resolution never falls back to it.
pub fn template_json() -> &'static str {
    FT_MATERIALS_JSON
}

/// The template parsed and validated.
pub fn template() -> Result<Rule, TallyError> {
    parse_rule_str(FT_MATERIALS_JSON)
}
