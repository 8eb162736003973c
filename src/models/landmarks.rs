// Landmark sets and the joint taxonomy used for MPJPE evaluation

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::pose::BodyLandmark;

/// Index of a landmark in the pose model output
pub type LandmarkId = usize;

// ==============================================================================
// Joint Table
// ==============================================================================

/// Joints evaluated for squat analysis, in display order
pub const SQUAT_JOINTS: [(&str, BodyLandmark); 7] = [
    ("shoulder", BodyLandmark::LeftShoulder),
    ("elbow", BodyLandmark::LeftElbow),
    ("wrist", BodyLandmark::LeftWrist),
    ("hip", BodyLandmark::LeftHip),
    ("knee", BodyLandmark::LeftKnee),
    ("ankle", BodyLandmark::LeftAnkle),
    ("foot", BodyLandmark::LeftFootIndex),
];

/// A named joint mapped to a landmark index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joint {
    pub name: String,
    pub landmark_id: LandmarkId,
}

/// Ordered joint name -> landmark id mapping shared by the evaluator,
/// the landmark extractor, the ground-truth generator and the overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointTable {
    joints: Vec<Joint>,
}

impl JointTable {
    /// The seven squat joints: shoulder, elbow, wrist, hip, knee, ankle, foot
    pub fn squat() -> Self {
        Self::from_pairs(SQUAT_JOINTS.iter().map(|(name, lm)| (*name, lm.id())))
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, LandmarkId)>,
        S: Into<String>,
    {
        Self {
            joints: pairs
                .into_iter()
                .map(|(name, landmark_id)| Joint {
                    name: name.into(),
                    landmark_id,
                })
                .collect(),
        }
    }

    /// Anonymous table, each joint named `landmark_<id>`
    pub fn from_ids<I: IntoIterator<Item = LandmarkId>>(ids: I) -> Self {
        Self::from_pairs(ids.into_iter().map(|id| (format!("landmark_{}", id), id)))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Joint> {
        self.joints.iter()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn landmark_id(&self, name: &str) -> Option<LandmarkId> {
        self.joints
            .iter()
            .find(|j| j.name == name)
            .map(|j| j.landmark_id)
    }

    pub fn name_of(&self, landmark_id: LandmarkId) -> Option<&str> {
        self.joints
            .iter()
            .find(|j| j.landmark_id == landmark_id)
            .map(|j| j.name.as_str())
    }
}

impl Default for JointTable {
    fn default() -> Self {
        Self::squat()
    }
}

impl<'a> IntoIterator for &'a JointTable {
    type Item = &'a Joint;
    type IntoIter = std::slice::Iter<'a, Joint>;

    fn into_iter(self) -> Self::IntoIter {
        self.joints.iter()
    }
}

// ==============================================================================
// Landmark Position
// ==============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LandmarkParseError {
    #[error("Expected 2 or 3 coordinates, got {0}")]
    WrongArity(usize),
}

/// Pixel-space landmark position; `z` is the model's normalized depth when present.
/// Serialized as `[x, y]` or `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct LandmarkPosition {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl LandmarkPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    pub fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Euclidean distance; depth is included only when both positions carry it
    pub fn distance(&self, other: &LandmarkPosition) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = match (self.z, other.z) {
            (Some(a), Some(b)) => a - b,
            _ => 0.0,
        };
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn translated(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z.map(|z| z + dz),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.map_or(true, f64::is_finite)
    }
}

impl TryFrom<Vec<f64>> for LandmarkPosition {
    type Error = LandmarkParseError;

    fn try_from(coords: Vec<f64>) -> Result<Self, Self::Error> {
        match coords.as_slice() {
            [x, y] => Ok(Self::planar(*x, *y)),
            [x, y, z] => Ok(Self::new(*x, *y, *z)),
            other => Err(LandmarkParseError::WrongArity(other.len())),
        }
    }
}

impl From<LandmarkPosition> for Vec<f64> {
    fn from(pos: LandmarkPosition) -> Self {
        match pos.z {
            Some(z) => vec![pos.x, pos.y, z],
            None => vec![pos.x, pos.y],
        }
    }
}

// ==============================================================================
// Landmark Set
// ==============================================================================

/// Landmark positions for one frame keyed by landmark id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: HashMap<LandmarkId, LandmarkPosition>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: LandmarkId, position: LandmarkPosition) -> Option<LandmarkPosition> {
        self.points.insert(id, position)
    }

    pub fn get(&self, id: LandmarkId) -> Option<&LandmarkPosition> {
        self.points.get(&id)
    }

    pub fn contains(&self, id: LandmarkId) -> bool {
        self.points.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LandmarkId, &LandmarkPosition)> {
        self.points.iter().map(|(id, pos)| (*id, pos))
    }

    /// Copy of the set with every position shifted by (dx, dy, dz)
    pub fn translated(&self, dx: f64, dy: f64, dz: f64) -> Self {
        self.iter()
            .map(|(id, pos)| (id, pos.translated(dx, dy, dz)))
            .collect()
    }
}

impl FromIterator<(LandmarkId, LandmarkPosition)> for LandmarkSet {
    fn from_iter<T: IntoIterator<Item = (LandmarkId, LandmarkPosition)>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl From<HashMap<LandmarkId, LandmarkPosition>> for LandmarkSet {
    fn from(points: HashMap<LandmarkId, LandmarkPosition>) -> Self {
        Self { points }
    }
}

/// Dense sequences are indexed by landmark id
impl From<Vec<LandmarkPosition>> for LandmarkSet {
    fn from(points: Vec<LandmarkPosition>) -> Self {
        points.into_iter().enumerate().collect()
    }
}

// ==============================================================================
// Boundary Input
// ==============================================================================

/// Landmark set as received at the boundary: keyed by id, or a sequence indexed by id.
/// In JSON an object is sparse and an array is dense (`null` entries are absent landmarks).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LandmarkInput {
    Sparse(HashMap<LandmarkId, LandmarkPosition>),
    Dense(Vec<Option<LandmarkPosition>>),
}

// Map keys must reach the format's integer key parsing, so no untagged derive here
impl<'de> Deserialize<'de> for LandmarkInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct InputVisitor;

        impl<'de> Visitor<'de> for InputVisitor {
            type Value = LandmarkInput;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of landmark id to position or a sequence of positions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut points = HashMap::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, position)) = map.next_entry::<LandmarkId, LandmarkPosition>()? {
                    points.insert(id, position);
                }
                Ok(LandmarkInput::Sparse(points))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut points = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(position) = seq.next_element::<Option<LandmarkPosition>>()? {
                    points.push(position);
                }
                Ok(LandmarkInput::Dense(points))
            }
        }

        deserializer.deserialize_any(InputVisitor)
    }
}

impl LandmarkInput {
    /// Normalize to the keyed form; dense position `i` becomes landmark `i`
    pub fn into_set(self) -> LandmarkSet {
        match self {
            LandmarkInput::Sparse(points) => LandmarkSet::from(points),
            LandmarkInput::Dense(points) => points
                .into_iter()
                .enumerate()
                .filter_map(|(id, pos)| pos.map(|p| (id, p)))
                .collect(),
        }
    }
}

impl From<LandmarkInput> for LandmarkSet {
    fn from(input: LandmarkInput) -> Self {
        input.into_set()
    }
}
