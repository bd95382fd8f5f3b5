//! Baby development guide.
//!
//! Built-in table of development stages keyed by pregnancy week.

use once_cell::sync::Lazy;
use serde::Serialize;

/// A stage of baby development covering a contiguous range of weeks
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DevelopmentStage {
    pub name: &'static str,
    pub summary: &'static str,
    pub first_week: u8,
    pub last_week: u8,
}

/// Cached stage table - built once and reused
static STAGES: Lazy<Vec<DevelopmentStage>> = Lazy::new(build_stages);

fn build_stages() -> Vec<DevelopmentStage> {
    vec![
        DevelopmentStage {
            name: "Early formation",
            summary: "Your baby is still very tiny, developing essential organs and structures.",
            first_week: 1,
            last_week: 9,
        },
        DevelopmentStage {
            name: "Rapid growth",
            summary: "Your baby is growing rapidly, with more defined features and movements.",
            first_week: 10,
            last_week: 19,
        },
        DevelopmentStage {
            name: "Senses and weight",
            summary: "Your baby is gaining weight and developing senses, with regular movement patterns.",
            first_week: 20,
            last_week: 29,
        },
        DevelopmentStage {
            name: "Preparing for birth",
            summary: "Your baby is preparing for birth, with most organs fully developed and gaining weight.",
            first_week: 30,
            last_week: 40,
        },
    ]
}

/// All development stages, ordered by week
pub fn stages() -> &'static [DevelopmentStage] {
    &STAGES
}

/// Development stage for a pregnancy week
///
/// Weeks outside `[1, 40]` map to the nearest stage.
pub fn stage_for_week(week: u8) -> &'static DevelopmentStage {
    let stages = stages();
    stages
        .iter()
        .find(|s| week <= s.last_week)
        .unwrap_or(&stages[stages.len() - 1])
}
