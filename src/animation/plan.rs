//! Textual animation plans.
//!
//! A plan is a list of entries. A string entry is one instruction and becomes
//! its own sequential slot; a list entry is a parallel group whose members
//! are joined into one slot in declaration order.
//!
//! Instructions are semicolon separated, `kind;duration;ease;params...`:
//!
//! ```text
//! wait;4s
//! alpha;0.5s;linear;(0,1)
//! move;0.5s;outexpo;(0,0);(100,0)
//! offset;600;outback;(0,-100)
//! offset_from;0.6s;linear;(0,100)
//! ```
//!
//! Durations are seconds with an optional `s` suffix. A malformed
//! instruction is dropped with a warning; its siblings still build.

use crate::animation::driver::Scheduler;
use crate::animation::group::Step;
use crate::animation::interpolation::EaseFunction;
use crate::animation::timeline::Timeline;
use crate::animation::tweening::{Properties, Tween};
use crate::core::config::{EngineConfig, MoveSemantics};
use crate::core::constants::MAX_PLAN_DURATION_MS;
use crate::core::geo::Position;
use crate::{PrateError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

/// Why a single instruction was rejected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InstructionError {
    #[error("unknown instruction kind {0:?}")]
    UnknownKind(String),

    #[error("{kind} takes {expected} fields, found {found}")]
    Arity {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid duration {0:?}")]
    Duration(String),

    #[error("invalid coordinate pair {0:?}")]
    Tuple(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Wait,
    Alpha,
    Move,
    Offset,
    OffsetFrom,
}

impl TokenKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "wait" => Some(Self::Wait),
            "alpha" => Some(Self::Alpha),
            "move" => Some(Self::Move),
            "offset" => Some(Self::Offset),
            "offset_from" => Some(Self::OffsetFrom),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Wait => "wait",
            Self::Alpha => "alpha",
            Self::Move => "move",
            Self::Offset => "offset",
            Self::OffsetFrom => "offset_from",
        }
    }

    /// Accepted field counts, kind and duration included
    fn arity(self) -> (usize, usize) {
        match self {
            Self::Wait => (2, 2),
            Self::Alpha | Self::Offset | Self::OffsetFrom => (4, 4),
            Self::Move => (4, 5),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One parsed instruction
#[derive(Debug, Clone, PartialEq)]
pub struct PlanToken {
    pub kind: TokenKind,
    pub duration_ms: u64,
    pub ease: EaseFunction,
    pub params: Vec<(f64, f64)>,
}

impl PlanToken {
    /// Turn the instruction into a tween bound to `properties`
    pub fn to_tween(&self, properties: &Properties, semantics: MoveSemantics) -> Tween {
        let props = properties.clone();
        let d = self.duration_ms;
        let ease = self.ease;
        let pair = |i: usize| self.params.get(i).copied().map(to_position).unwrap_or_default();

        match self.kind {
            TokenKind::Wait => Tween::wait(d),
            TokenKind::Alpha => {
                let (from, to) = self.params.first().copied().unwrap_or((0.0, 1.0));
                Tween::alpha(props, from, to, d, ease)
            }
            TokenKind::Move => match (semantics, self.params.len()) {
                (MoveSemantics::Endpoints, 1) => Tween::move_from_current(props, pair(0), d, ease),
                (MoveSemantics::Endpoints, _) => Tween::move_to(props, pair(0), pair(1), d, ease),
                (MoveSemantics::Legacy, n) => {
                    let last = pair(n.saturating_sub(1));
                    Tween::move_to(props, last, last, d, ease)
                }
            },
            TokenKind::Offset => Tween::offset(props, pair(0), d, ease),
            TokenKind::OffsetFrom => Tween::offset_from(props, pair(0), d, ease),
        }
    }
}

fn to_position((x, y): (f64, f64)) -> Position {
    Position::new(x.round() as i32, y.round() as i32)
}

/// Parse one instruction string
pub fn parse_instruction(line: &str) -> std::result::Result<PlanToken, InstructionError> {
    let mut fields: Vec<&str> = line.split(';').map(str::trim).collect();
    while fields.len() > 1 && fields.last().map_or(false, |f| f.is_empty()) {
        fields.pop();
    }

    let kind = TokenKind::from_name(fields[0])
        .ok_or_else(|| InstructionError::UnknownKind(fields[0].to_string()))?;

    let (min, max) = kind.arity();
    if fields.len() < min || fields.len() > max {
        return Err(InstructionError::Arity {
            kind: kind.name(),
            expected: if fields.len() < min { min } else { max },
            found: fields.len(),
        });
    }

    let duration_ms = parse_duration(fields[1])?;
    let ease = fields
        .get(2)
        .map(|name| EaseFunction::from_name(name))
        .unwrap_or_default();
    let params = fields
        .iter()
        .skip(3)
        .map(|field| parse_pair(field))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(PlanToken {
        kind,
        duration_ms,
        ease,
        params,
    })
}

/// `"0.5s"`, `"0.5S"` and `"0.5"` are all 500ms; the result is at least 1
/// and at most [`MAX_PLAN_DURATION_MS`]
pub fn parse_duration(field: &str) -> std::result::Result<u64, InstructionError> {
    let trimmed = field.trim();
    let number = trimmed
        .strip_suffix(|c: char| c == 's' || c == 'S')
        .unwrap_or(trimmed);

    let ms = match number.trim().parse::<f64>() {
        Ok(seconds) if seconds.is_finite() => (seconds * 1000.0).round().max(1.0),
        _ => return Err(InstructionError::Duration(field.to_string())),
    };
    if ms > MAX_PLAN_DURATION_MS as f64 {
        return Err(InstructionError::Duration(field.to_string()));
    }
    Ok(ms as u64)
}

/// `"(a,b)"` into two finite numbers that round into pixel range
pub fn parse_pair(field: &str) -> std::result::Result<(f64, f64), InstructionError> {
    let invalid = || InstructionError::Tuple(field.to_string());
    let inner = field
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(invalid)?;

    let mut parts = inner.split(',').map(|part| part.trim().parse::<f64>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(a)), Some(Ok(b)), None) if in_pixel_range(a) && in_pixel_range(b) => Ok((a, b)),
        _ => Err(invalid()),
    }
}

fn in_pixel_range(value: f64) -> bool {
    let rounded = value.round();
    rounded.is_finite() && rounded >= i32::MIN as f64 && rounded <= i32::MAX as f64
}

/// A plan entry: one instruction or a parallel group of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PlanEntry {
    Instruction(String),
    Parallel(Vec<String>),
}

impl From<&str> for PlanEntry {
    fn from(line: &str) -> Self {
        PlanEntry::Instruction(line.to_string())
    }
}

impl From<String> for PlanEntry {
    fn from(line: String) -> Self {
        PlanEntry::Instruction(line)
    }
}

/// An ordered list of plan entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Plan {
    entries: Vec<PlanEntry>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sequential instruction
    pub fn then(mut self, instruction: impl Into<String>) -> Self {
        self.entries.push(PlanEntry::Instruction(instruction.into()));
        self
    }

    /// Add a group of instructions that run together
    pub fn parallel<I, S>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = instructions.into_iter().map(Into::into).collect();
        self.entries.push(PlanEntry::Parallel(members));
        self
    }

    pub fn push(&mut self, entry: PlanEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a bare entry array or a [`PlanDocument`] object
    pub fn from_json(json: &str) -> Result<Self> {
        PlanDocument::from_json(json).map(|document| document.plan)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn from_entries(values: Vec<Value>) -> Self {
        let mut plan = Plan::new();
        for (index, value) in values.into_iter().enumerate() {
            match value {
                Value::String(line) => plan.push(PlanEntry::Instruction(line)),
                Value::Array(members) => {
                    let members = members
                        .into_iter()
                        .filter_map(|member| match member {
                            Value::String(line) => Some(line),
                            other => {
                                log::warn!("skipping non-string member {} of entry {}", other, index);
                                None
                            }
                        })
                        .collect();
                    plan.push(PlanEntry::Parallel(members));
                }
                other => log::warn!("skipping plan entry {}: {}", index, other),
            }
        }
        plan
    }
}

impl FromIterator<PlanEntry> for Plan {
    fn from_iter<I: IntoIterator<Item = PlanEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A plan as stored on disk, with an optional tick interval override
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlanDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_interval_ms: Option<u64>,
    #[serde(skip_deserializing)]
    pub plan: Plan,
}

impl PlanDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(json)? {
            Value::Array(values) => Ok(Self {
                tick_interval_ms: None,
                plan: Plan::from_entries(values),
            }),
            Value::Object(mut object) => {
                let plan = match object.remove("plan") {
                    Some(Value::Array(values)) => Plan::from_entries(values),
                    Some(other) => {
                        return Err(PrateError::InvalidPlan(format!(
                            "\"plan\" must be an array, found {}",
                            other
                        )))
                    }
                    None => return Err(PrateError::InvalidPlan("missing \"plan\" array".into())),
                };
                let mut document: PlanDocument = serde_json::from_value(Value::Object(object))?;
                document.plan = plan;
                Ok(document)
            }
            other => Err(PrateError::InvalidPlan(format!(
                "expected an array or object, found {}",
                other
            ))),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build with the document's interval when it has one
    pub fn build_timeline(
        &self,
        properties: &Properties,
        scheduler: Rc<dyn Scheduler>,
        config: &EngineConfig,
    ) -> Timeline {
        let interval_ms = self
            .tick_interval_ms
            .unwrap_or_else(|| config.tick_interval_ms());
        let timeline = Timeline::new(scheduler, interval_ms);
        extend_timeline(&timeline, properties, &self.plan, config.move_semantics);
        timeline
    }
}

impl From<Plan> for PlanDocument {
    fn from(plan: Plan) -> Self {
        Self {
            tick_interval_ms: None,
            plan,
        }
    }
}

/// Build a timeline from `plan`, binding every tween to `properties`
pub fn build_timeline(
    properties: &Properties,
    plan: &Plan,
    scheduler: Rc<dyn Scheduler>,
    config: &EngineConfig,
) -> Timeline {
    let timeline = Timeline::with_config(scheduler, config);
    extend_timeline(&timeline, properties, plan, config.move_semantics);
    timeline
}

/// Append every surviving entry of `plan` to `timeline`
pub fn extend_timeline(
    timeline: &Timeline,
    properties: &Properties,
    plan: &Plan,
    semantics: MoveSemantics,
) {
    for entry in plan.entries() {
        match entry {
            PlanEntry::Instruction(line) => {
                if let Some(tween) = tween_for(line, properties, semantics) {
                    timeline.append(tween);
                }
            }
            PlanEntry::Parallel(lines) => {
                let slot = lines
                    .iter()
                    .filter_map(|line| tween_for(line, properties, semantics))
                    .fold(None, |slot: Option<Step>, tween| {
                        Some(match slot {
                            Some(step) => step.join(tween.into()),
                            None => tween.into(),
                        })
                    });
                match slot {
                    Some(step) => timeline.append(step),
                    None => log::warn!("parallel entry {:?} has no valid members", lines),
                }
            }
        }
    }
    log::debug!("built {} steps from {} plan entries", timeline.len(), plan.len());
}

fn tween_for(line: &str, properties: &Properties, semantics: MoveSemantics) -> Option<Tween> {
    match parse_instruction(line) {
        Ok(token) => Some(token.to_tween(properties, semantics)),
        Err(e) => {
            log::warn!("dropping instruction {:?}: {}", line, e);
            None
        }
    }
}
