//! Parsing and validation of the planner model's JSON output.

use crate::error::AssistantError;
use crate::types::ActionPlan;

/// Parse the planner's raw output into a validated [`ActionPlan`].
///
/// Models fenced in markdown or surrounded by prose are tolerated; anything
/// that does not contain a parseable plan object is a hard failure for the
/// request.
pub fn parse_action_plan(raw: &str) -> Result<ActionPlan, AssistantError> {
    let json = extract_json_object(raw)
        .ok_or_else(|| AssistantError::InvalidPlan("no JSON object in planner output".into()))?;

    let mut plan: ActionPlan = serde_json::from_str(json)
        .map_err(|e| AssistantError::InvalidPlan(format!("plan does not match schema: {e}")))?;

    // Empty or whitespace-only sub-queries mean "channel not planned".
    plan.rag_query = normalize(plan.rag_query);
    plan.web_query = normalize(plan.web_query);
    Ok(plan)
}

fn normalize(query: Option<String>) -> Option<String> {
    query.map(|q| q.trim().to_string()).filter(|q| !q.is_empty())
}

/// Slice out the outermost `{...}` object, skipping markdown fences and any
/// prose around it.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}
