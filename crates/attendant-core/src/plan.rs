use crate::extract::extract_number;
use crate::index::PositionIndex;
use serde::Serialize;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// How a reactivation target was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Name,
    Number,
}

/// Where a created position's number came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Numbering {
    Requested,
    Fallback,
}

/// What to do for one requested name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Decision {
    /// An active position already carries this name. Nothing to write.
    Reuse {
        position_id: String,
        name: String,
        position_number: u32,
    },
    /// Bring an inactive position back, renamed to the requested text.
    Reactivate {
        position_id: String,
        name: String,
        position_number: u32,
        area: Option<String>,
        matched_by: MatchKind,
    },
    Create {
        name: String,
        position_number: u32,
        area: Option<String>,
        numbering: Numbering,
    },
}

impl Decision {
    pub fn name(&self) -> &str {
        match self {
            Decision::Reuse { name, .. }
            | Decision::Reactivate { name, .. }
            | Decision::Create { name, .. } => name,
        }
    }

    pub fn position_number(&self) -> u32 {
        match self {
            Decision::Reuse {
                position_number, ..
            }
            | Decision::Reactivate {
                position_number, ..
            }
            | Decision::Create {
                position_number, ..
            } => *position_number,
        }
    }

    pub fn position_id(&self) -> Option<&str> {
        match self {
            Decision::Reuse { position_id, .. } | Decision::Reactivate { position_id, .. } => {
                Some(position_id)
            }
            Decision::Create { .. } => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Decision::Reuse { .. } => "reuse",
            Decision::Reactivate { .. } => "reactivate",
            Decision::Create { .. } => "create",
        }
    }
}

// ---------------------------------------------------------------------------
// NumberAllocator
// ---------------------------------------------------------------------------

/// Numbering state for one planning pass.
///
/// `running_max` starts at the highest existing number and moves up by one
/// for every decision issued, so fallback numbers stay unique within the
/// batch. Numbers and position ids claimed by earlier decisions are tracked
/// so no two decisions write to the same destination.
#[derive(Debug, Clone)]
pub struct NumberAllocator {
    running_max: u32,
    claimed_numbers: HashSet<u32>,
    claimed_ids: HashSet<String>,
}

impl NumberAllocator {
    pub fn new(index: &PositionIndex) -> Self {
        Self {
            running_max: index.max_number,
            claimed_numbers: HashSet::new(),
            claimed_ids: HashSet::new(),
        }
    }

    pub fn running_max(&self) -> u32 {
        self.running_max
    }

    pub fn is_taken(&self, number: u32, index: &PositionIndex) -> bool {
        index.holds_number(number) || self.claimed_numbers.contains(&number)
    }

    pub fn is_claimed(&self, position_id: &str) -> bool {
        self.claimed_ids.contains(position_id)
    }

    fn next_fallback(&self, index: &PositionIndex) -> u32 {
        let mut n = self.running_max + 1;
        while self.is_taken(n, index) {
            n += 1;
        }
        n
    }

    fn record(&mut self, decision: &Decision) {
        self.claimed_numbers.insert(decision.position_number());
        if let Some(id) = decision.position_id() {
            self.claimed_ids.insert(id.to_string());
        }
        let floor = match decision {
            Decision::Create {
                numbering: Numbering::Fallback,
                position_number,
                ..
            } => *position_number,
            _ => 0,
        };
        self.running_max = (self.running_max + 1).max(floor);
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Split operator text into requested names: one per line, trimmed, blanks
/// dropped.
pub fn parse_requested_names(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decide, in input order, what to do for each requested name.
///
/// Precedence: an existing name match, then an inactive position holding
/// the number parsed from the name, then that number if nobody holds it,
/// then the next free fallback number.
pub fn plan(requested: &[String], index: &PositionIndex, default_area: Option<&str>) -> Vec<Decision> {
    let mut alloc = NumberAllocator::new(index);
    let mut decisions = Vec::with_capacity(requested.len());

    for raw in requested {
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }
        let decision = decide(name, index, default_area, &alloc);
        tracing::debug!(
            name,
            action = decision.label(),
            number = decision.position_number(),
            "planned position"
        );
        alloc.record(&decision);
        decisions.push(decision);
    }
    decisions
}

fn decide(
    name: &str,
    index: &PositionIndex,
    default_area: Option<&str>,
    alloc: &NumberAllocator,
) -> Decision {
    let desired = extract_number(name);

    if let Some(matched) = index.find_by_name(name) {
        // Claimed earlier in this batch means it is active by the time this runs.
        if matched.is_active || alloc.is_claimed(&matched.id) {
            return Decision::Reuse {
                position_id: matched.id.clone(),
                name: name.to_string(),
                position_number: matched.position_number,
            };
        }
        return Decision::Reactivate {
            position_id: matched.id.clone(),
            name: name.to_string(),
            position_number: matched.position_number,
            area: default_area.map(str::to_string).or_else(|| matched.area.clone()),
            matched_by: MatchKind::Name,
        };
    }

    if let Some(number) = desired {
        if let Some(held) = index.find_by_number(number) {
            // An active holder is a collision to avoid, never a target.
            if !held.is_active && !alloc.is_claimed(&held.id) {
                return Decision::Reactivate {
                    position_id: held.id.clone(),
                    name: name.to_string(),
                    position_number: held.position_number,
                    area: default_area.map(str::to_string),
                    matched_by: MatchKind::Number,
                };
            }
        } else if !alloc.is_taken(number, index) {
            return Decision::Create {
                name: name.to_string(),
                position_number: number,
                area: default_area.map(str::to_string),
                numbering: Numbering::Requested,
            };
        }
    }

    Decision::Create {
        name: name.to_string(),
        position_number: alloc.next_fallback(index),
        area: default_area.map(str::to_string),
        numbering: Numbering::Fallback,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
