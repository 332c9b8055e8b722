//! Typed scenario scripts over the structured-text value tree.
//!
//! A script carries optional engine toggles, optional whole-population reset
//! overrides, and a `metadata` sequence of timed segments. Each segment may
//! hold narrative text and a `timeline` of keyframes that set the ambient
//! field, override named particles, or mark a narrative highlight range.
//! `ScenarioScript::parse` validates the entire document before anything is
//! applied, so a failed parse can never leave partial state behind.

use crate::configuration::toon::{self, ParseError, Table, Value};

/// Engine toggles requested by the script. Unset fields leave the scenario's
/// defaults alone.
#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub charge_force: Option<bool>,
    pub coherence: Option<bool>,
}

/// Whole-population overrides applied on reset: every particle gets these
/// averages where present.
#[derive(Debug, Clone, Default)]
pub struct SystemOverrides {
    pub temperature: Option<f64>,
    pub stress: Option<f64>,
    pub mass: Option<f64>,
}

/// Ambient pair carried by a keyframe; unset halves keep their value.
#[derive(Debug, Clone, Default)]
pub struct AmbientSet {
    pub temperature: Option<f64>,
    pub stress: Option<f64>,
}

/// One named-particle override row.
#[derive(Debug, Clone)]
pub struct ParticleOverride {
    pub name: String,
    pub temperature: f64,
    pub stress: f64,
    pub mass: f64,
}

/// One timeline keyframe, relative to its segment start.
#[derive(Debug, Clone, Default)]
pub struct Keyframe {
    pub at: f64,
    pub ambient: Option<AmbientSet>,
    pub overrides: Vec<ParticleOverride>,
    pub highlight: Option<(usize, usize)>,
}

/// One timed narrative segment.
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: f64,
    pub title: Option<String>,
    pub narrative: Option<String>,
    pub timeline: Vec<Keyframe>,
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioScript {
    pub engine: Option<EngineSettings>,
    pub system: Option<SystemOverrides>,
    pub segments: Vec<Segment>,
}

impl ScenarioScript {
    /// Parse and validate a whole script document.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let root = toon::parse(text)?;
        if root.as_mapping().is_none() {
            return Err(ParseError::Shape {
                key: "scenario".into(),
                expected: "a top-level mapping",
            });
        }

        let engine = match root.get("engine") {
            Some(v) => Some(parse_engine(v)?),
            None => None,
        };
        let system = match root.get("system") {
            Some(v) => Some(parse_system(v)?),
            None => None,
        };
        let segments = match root.get("metadata") {
            Some(v) => parse_segments(v)?,
            None => Vec::new(),
        };

        Ok(Self {
            engine,
            system,
            segments,
        })
    }
}

fn parse_engine(value: &Value) -> Result<EngineSettings, ParseError> {
    expect_mapping(value, "engine")?;
    Ok(EngineSettings {
        charge_force: opt_bool(value, "charge_force")?,
        coherence: opt_bool(value, "coherence")?,
    })
}

fn parse_system(value: &Value) -> Result<SystemOverrides, ParseError> {
    expect_mapping(value, "system")?;
    Ok(SystemOverrides {
        temperature: opt_f64(value, "temperature")?,
        stress: opt_f64(value, "stress")?,
        mass: opt_f64(value, "mass")?,
    })
}

fn parse_segments(value: &Value) -> Result<Vec<Segment>, ParseError> {
    let items = value.as_sequence().ok_or(ParseError::Shape {
        key: "metadata".into(),
        expected: "a sequence of segments",
    })?;
    let mut segments = Vec::with_capacity(items.len());
    for item in items {
        if item.as_mapping().is_none() {
            return Err(ParseError::Shape {
                key: "metadata".into(),
                expected: "segment mappings",
            });
        }
        let start = req_f64(item, "start")?;
        let title = opt_string(item, "title");
        let narrative = opt_string(item, "narrative");
        let timeline = match item.get("timeline") {
            Some(v) => parse_timeline(v)?,
            None => Vec::new(),
        };
        segments.push(Segment {
            start,
            title,
            narrative,
            timeline,
        });
    }
    Ok(segments)
}

fn parse_timeline(value: &Value) -> Result<Vec<Keyframe>, ParseError> {
    let items = value.as_sequence().ok_or(ParseError::Shape {
        key: "timeline".into(),
        expected: "a sequence of keyframes",
    })?;
    let mut frames = Vec::with_capacity(items.len());
    for item in items {
        if item.as_mapping().is_none() {
            return Err(ParseError::Shape {
                key: "timeline".into(),
                expected: "keyframe mappings",
            });
        }
        let at = req_f64(item, "at")?;
        let ambient = match item.get("ambient") {
            Some(v) => {
                expect_mapping(v, "ambient")?;
                Some(AmbientSet {
                    temperature: opt_f64(v, "temperature")?,
                    stress: opt_f64(v, "stress")?,
                })
            }
            None => None,
        };
        let overrides = match item.get("overrides") {
            Some(v) => parse_overrides(v)?,
            None => Vec::new(),
        };
        let highlight = match item.get("highlight") {
            Some(v) => Some(parse_highlight(v)?),
            None => None,
        };
        frames.push(Keyframe {
            at,
            ambient,
            overrides,
            highlight,
        });
    }
    Ok(frames)
}

fn parse_overrides(value: &Value) -> Result<Vec<ParticleOverride>, ParseError> {
    let table = value.as_table().ok_or(ParseError::Shape {
        key: "overrides".into(),
        expected: "a table with headers name,temperature,stress,mass",
    })?;
    let name_col = require_column(table, "name")?;
    let temp_col = require_column(table, "temperature")?;
    let stress_col = require_column(table, "stress")?;
    let mass_col = require_column(table, "mass")?;

    let mut overrides = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        overrides.push(ParticleOverride {
            name: row[name_col].clone(),
            temperature: field_f64("temperature", &row[temp_col])?,
            stress: field_f64("stress", &row[stress_col])?,
            mass: field_f64("mass", &row[mass_col])?,
        });
    }
    Ok(overrides)
}

fn parse_highlight(value: &Value) -> Result<(usize, usize), ParseError> {
    let items = value.as_sequence().ok_or(ParseError::Shape {
        key: "highlight".into(),
        expected: "a 2-element array",
    })?;
    if items.len() != 2 {
        return Err(ParseError::Shape {
            key: "highlight".into(),
            expected: "a 2-element array",
        });
    }
    let start = field_usize("highlight", scalar_text(&items[0], "highlight")?)?;
    let end = field_usize("highlight", scalar_text(&items[1], "highlight")?)?;
    Ok((start, end))
}

// --- extraction helpers ---

fn expect_mapping<'a>(value: &'a Value, key: &'static str) -> Result<&'a [(String, Value)], ParseError> {
    value.as_mapping().ok_or(ParseError::Shape {
        key: key.into(),
        expected: "a mapping",
    })
}

fn require_column(table: &Table, name: &str) -> Result<usize, ParseError> {
    table.column(name).ok_or(ParseError::Missing {
        key: format!("overrides.{name}"),
    })
}

fn scalar_text<'a>(value: &'a Value, key: &str) -> Result<&'a str, ParseError> {
    value.as_scalar().ok_or(ParseError::Shape {
        key: key.into(),
        expected: "a scalar",
    })
}

fn field_f64(key: &str, text: &str) -> Result<f64, ParseError> {
    text.trim().parse().map_err(|_| ParseError::NotANumber {
        key: key.into(),
        value: text.to_string(),
    })
}

fn field_usize(key: &str, text: &str) -> Result<usize, ParseError> {
    text.trim().parse().map_err(|_| ParseError::NotANumber {
        key: key.into(),
        value: text.to_string(),
    })
}

fn req_f64(value: &Value, key: &str) -> Result<f64, ParseError> {
    let v = value.get(key).ok_or(ParseError::Missing { key: key.into() })?;
    field_f64(key, scalar_text(v, key)?)
}

fn opt_f64(value: &Value, key: &str) -> Result<Option<f64>, ParseError> {
    match value.get(key) {
        Some(v) => Ok(Some(field_f64(key, scalar_text(v, key)?)?)),
        None => Ok(None),
    }
}

fn opt_bool(value: &Value, key: &str) -> Result<Option<bool>, ParseError> {
    match value.get(key) {
        Some(v) => {
            let text = scalar_text(v, key)?;
            match text.trim() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                other => Err(ParseError::NotABool {
                    key: key.into(),
                    value: other.to_string(),
                }),
            }
        }
        None => Ok(None),
    }
}

fn opt_string(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(|v| v.as_scalar())
        .map(|s| s.to_string())
}

/// One flattened timeline event: a segment opening (narrative) or a keyframe
/// payload, stamped with its absolute fire time.
#[derive(Debug, Clone, Default)]
pub struct TimelineFiring {
    pub at: f64,
    pub title: Option<String>,
    pub narrative: Option<String>,
    pub ambient: Option<AmbientSet>,
    pub overrides: Vec<ParticleOverride>,
    pub highlight: Option<(usize, usize)>,
}

/// Cursor over the flattened, time-sorted firing list. Events fire once,
/// when simulation time passes them; `rewind` restarts after a reset.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<TimelineFiring>,
    next: usize,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_script(script: &ScenarioScript) -> Self {
        let mut entries = Vec::new();
        for segment in &script.segments {
            // Segment text becomes its own firing at the segment start.
            if segment.title.is_some() || segment.narrative.is_some() {
                entries.push(TimelineFiring {
                    at: segment.start,
                    title: segment.title.clone(),
                    narrative: segment.narrative.clone(),
                    ..Default::default()
                });
            }
            for frame in &segment.timeline {
                entries.push(TimelineFiring {
                    at: segment.start + frame.at,
                    ambient: frame.ambient.clone(),
                    overrides: frame.overrides.clone(),
                    highlight: frame.highlight,
                    ..Default::default()
                });
            }
        }
        entries.sort_by(|a, b| a.at.partial_cmp(&b.at).unwrap_or(std::cmp::Ordering::Equal));
        Self { entries, next: 0 }
    }

    /// Pop every firing due at or before `t`, in order.
    pub fn take_due(&mut self, t: f64) -> Vec<TimelineFiring> {
        let mut due = Vec::new();
        while self.next < self.entries.len() && self.entries[self.next].at <= t {
            due.push(self.entries[self.next].clone());
            self.next += 1;
        }
        due
    }

    pub fn rewind(&mut self) {
        self.next = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
