//! Animation steps and their property bags.
//!
//! An [`AnimationStep`] is one `step N: action targets` header from the
//! `@animation` block plus the indented `key: value` lines under it. Values
//! arrive already coerced into [`PropertyValue`]s; [`Properties`] layers
//! typed accessors with the documented defaults on top.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;

use crate::{color::Color, geometry::Point, identifier::Id, semantic::effect::*};

/// Default highlight color.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#FFD700";
/// Default duration of a step operation, in seconds.
pub const DEFAULT_DURATION: f64 = 1.0;
/// Default draw time of a `connect` operation, in seconds.
pub const DEFAULT_CONNECT_SPEED: f64 = 2.0;
/// Default camera padding, in diagram units.
pub const DEFAULT_CAMERA_PADDING: f32 = 50.0;
/// Default camera zoom for `focus`.
pub const DEFAULT_CAMERA_ZOOM: f32 = 2.0;

/// The action a step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Show,
    Hide,
    Highlight,
    Unhighlight,
    Connect,
    Move,
    Transform,
    Camera,
    /// Reserved; compiles to nothing.
    Annotate,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Hide => "hide",
            Self::Highlight => "highlight",
            Self::Unhighlight => "unhighlight",
            Self::Connect => "connect",
            Self::Move => "move",
            Self::Transform => "transform",
            Self::Camera => "camera",
            Self::Annotate => "annotate",
        }
    }
}

impl FromStr for Action {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "show" => Ok(Self::Show),
            "hide" => Ok(Self::Hide),
            "highlight" => Ok(Self::Highlight),
            "unhighlight" => Ok(Self::Unhighlight),
            "connect" => Ok(Self::Connect),
            "move" => Ok(Self::Move),
            "transform" => Ok(Self::Transform),
            "camera" => Ok(Self::Camera),
            "annotate" => Ok(Self::Annotate),
            _ => Err("Unsupported animation action"),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a step's comma-separated target list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// A node id, an edge id, or a keyword such as `all`.
    Entity(Id),
    /// `A->B` pair, as used by `connect`.
    Pair { from: Id, to: Id },
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(id) => write!(f, "{id}"),
            Self::Pair { from, to } => write!(f, "{from}->{to}"),
        }
    }
}

/// A coerced property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Str(String),
}

impl PropertyValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Reads the value as a quantity, accepting bare numbers and strings with
    /// one of the given unit suffixes. Each suffix carries the divisor that
    /// converts it to the base unit.
    fn quantity(&self, units: &[(&str, f64)]) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Str(s) => {
                let s = s.trim();
                for (suffix, divisor) in units {
                    if let Some(number) = s.strip_suffix(suffix) {
                        return parse_finite(number).map(|n| n / divisor);
                    }
                }
                parse_finite(s)
            }
            Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

const TIME_UNITS: &[(&str, f64)] = &[("ms", 1000.0), ("s", 1.0)];

/// Ordered property bag of a step.
///
/// # Examples
///
/// ```
/// use animflow_core::semantic::{Properties, PropertyValue};
///
/// let mut props = Properties::default();
/// props.insert("duration", PropertyValue::Str("500ms".to_string()));
/// props.insert("glow", PropertyValue::Bool(true));
///
/// assert_eq!(props.duration(), 0.5);
/// assert_eq!(props.delay(), 0.0);
/// assert!(props.flag("glow"));
/// assert!(!props.flag("pulse"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: IndexMap<String, PropertyValue>,
}

impl Properties {
    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns a string property.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_str)
    }

    /// Returns true only for an explicit boolean `true`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(PropertyValue::as_bool).unwrap_or(false)
    }

    /// Reads a time value in seconds (`1.5`, `1.5s` or `1500ms`).
    ///
    /// Negative values clamp to zero; unreadable values yield `None`.
    pub fn seconds(&self, key: &str) -> Option<f64> {
        self.get(key)
            .and_then(|v| v.quantity(TIME_UNITS))
            .map(|n| n.max(0.0))
    }

    pub fn duration(&self) -> f64 {
        self.seconds("duration").unwrap_or(DEFAULT_DURATION)
    }

    pub fn delay(&self) -> f64 {
        self.seconds("delay").unwrap_or(0.0)
    }

    pub fn stagger(&self) -> f64 {
        self.seconds("stagger").unwrap_or(0.0)
    }

    /// Draw time of a `connect` step.
    pub fn speed(&self) -> f64 {
        self.seconds("speed").unwrap_or(DEFAULT_CONNECT_SPEED)
    }

    /// The `color` property, if present and a valid CSS color.
    pub fn color(&self) -> Option<Color> {
        self.text("color").and_then(|c| Color::new(c).ok())
    }

    /// Camera padding (`50` or `50px`).
    pub fn padding(&self) -> Option<f32> {
        self.get("padding")
            .and_then(|v| v.quantity(&[("px", 1.0)]))
            .map(|n| n as f32)
    }

    /// Camera zoom factor (`2` or `2x`). Non-positive values are ignored.
    pub fn zoom(&self) -> Option<f32> {
        self.get("zoom")
            .and_then(|v| v.quantity(&[("x", 1.0)]))
            .filter(|n| *n > 0.0)
            .map(|n| n as f32)
    }

    /// Uniform scale factor of a `transform` step.
    pub fn scale(&self) -> Option<f32> {
        self.get("scale")
            .and_then(|v| v.quantity(&[("x", 1.0)]))
            .map(|n| n as f32)
    }

    /// Rotation in degrees (`45` or `45deg`).
    pub fn rotate(&self) -> Option<f32> {
        self.get("rotate")
            .and_then(|v| v.quantity(&[("deg", 1.0)]))
            .map(|n| n as f32)
    }

    /// Absolute destination of a `move` step (`"x, y"`).
    pub fn to(&self) -> Option<Point> {
        self.text("to").and_then(parse_pair)
    }

    /// Relative offset of a `move` step (`"x, y"`).
    pub fn by(&self) -> Option<Point> {
        self.text("by").and_then(parse_pair)
    }

    pub fn entrance_effect(&self) -> EntranceEffect {
        self.text("effect")
            .map(EntranceEffect::from_name)
            .unwrap_or_default()
    }

    pub fn exit_effect(&self) -> ExitEffect {
        self.text("effect").map(ExitEffect::from_name).unwrap_or_default()
    }

    pub fn flow_effect(&self) -> FlowEffect {
        self.text("flow").map(FlowEffect::from_name).unwrap_or_default()
    }
}

/// Parses `"x, y"`, optionally wrapped in brackets or parentheses.
fn parse_pair(s: &str) -> Option<Point> {
    let inner = s
        .trim()
        .trim_start_matches(['[', '('])
        .trim_end_matches([']', ')']);
    let (x, y) = inner.split_once(',')?;
    Some(Point::new(parse_finite(x)? as f32, parse_finite(y)? as f32))
}

/// One parsed animation step.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationStep {
    number: u32,
    action: Action,
    targets: Vec<Target>,
    properties: Properties,
}

impl AnimationStep {
    pub fn new(number: u32, action: Action, targets: Vec<Target>, properties: Properties) -> Self {
        Self {
            number,
            action,
            targets,
            properties,
        }
    }

    /// The user-assigned step number. Not unique and not ordered.
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}
