//! Plan types and normalization
//!
//! A [`SuggestedPlan`] is whatever the suggestion service produced:
//! untrusted, possibly partial, possibly referencing stops that no longer
//! exist. [`normalize`] repairs it against the live stop set into an
//! [`AcceptedPlan`] whose order is guaranteed to be a non-empty,
//! duplicate-free subset of live stop ids.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

mod extract;
mod normalize;
mod suggest;

pub use extract::extract_json;
pub use normalize::normalize;
pub use suggest::{HttpPlanSuggester, PlanSuggester};

/// Free-text meal suggestions, one per meal, each possibly empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealSuggestions {
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

/// One per-stop visit estimate as the suggestion service emitted it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEstimate {
    pub id: String,
    pub minutes: i64,
}

/// Raw suggested plan - untrusted upstream payload.
///
/// The serde shape matches the suggestion wire format; use
/// [`SuggestedPlan::from_value`] when the payload may carry wrong-typed
/// fields, since it degrades field-by-field instead of failing whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuggestedPlan {
    pub order: Vec<String>,
    pub stay_area: String,
    pub meal_suggestions: MealSuggestions,
    pub time_estimates: Vec<TimeEstimate>,
}

impl SuggestedPlan {
    /// Build a plan from an arbitrary JSON value, tolerating missing or
    /// wrong-typed fields. A field that does not match its expected shape
    /// degrades to its default; referential repair happens later in
    /// [`normalize`].
    pub fn from_value(value: &Value) -> Self {
        let order = value["order"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let stay_area = value["stayArea"].as_str().unwrap_or_default().to_string();

        let meals = &value["mealSuggestions"];
        let meal_suggestions = MealSuggestions {
            breakfast: meals["breakfast"].as_str().unwrap_or_default().to_string(),
            lunch: meals["lunch"].as_str().unwrap_or_default().to_string(),
            dinner: meals["dinner"].as_str().unwrap_or_default().to_string(),
        };

        let time_estimates = value["timeEstimates"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|entry| {
                        let id = entry["id"].as_str()?.to_string();
                        let minutes = entry["minutes"].as_i64()?;
                        Some(TimeEstimate { id, minutes })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            order,
            stay_area,
            meal_suggestions,
            time_estimates,
        }
    }
}

/// Normalized plan - invariant-holding output of [`normalize`].
///
/// `order` is always non-empty (given a non-empty live set), contains only
/// live stop ids, and has no duplicates. `time_estimates` never references
/// a foreign id; values are preserved exactly as the upstream emitted them.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedPlan {
    pub order: Vec<String>,
    pub stay_area: String,
    pub meal_suggestions: MealSuggestions,
    pub time_estimates: HashMap<String, i64>,
}

impl AcceptedPlan {
    /// Visit minutes for a stop, falling back to the policy default
    pub fn minutes_for(&self, id: &str, default_visit_minutes: i64) -> i64 {
        self.time_estimates.get(id).copied().unwrap_or(default_visit_minutes)
    }

    /// View this plan as a raw suggestion again (used to re-derive a plan
    /// after applying its order to the stop store)
    pub fn as_suggested(&self) -> SuggestedPlan {
        let mut time_estimates: Vec<TimeEstimate> = self
            .time_estimates
            .iter()
            .map(|(id, minutes)| TimeEstimate {
                id: id.clone(),
                minutes: *minutes,
            })
            .collect();
        time_estimates.sort_by(|a, b| a.id.cmp(&b.id));

        SuggestedPlan {
            order: self.order.clone(),
            stay_area: self.stay_area.clone(),
            meal_suggestions: self.meal_suggestions.clone(),
            time_estimates,
        }
    }
}
