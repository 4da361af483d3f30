// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document types for a drawing-set metadata file.
//!
//! These mirror the JSON document verbatim. Every field that a document may
//! omit has a default, so partially filled documents deserialize into empty
//! states instead of failing.

use chrono::NaiveDate;
use indexmap::IndexMap;
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Deserializer, Serialize};

/// The whole metadata document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Project display data.
    #[serde(default, deserialize_with = "nullable")]
    pub project: ProjectMeta,
    /// The project's discipline catalogue.
    #[serde(default, deserialize_with = "nullable")]
    pub disciplines: Vec<DisciplineInfo>,
    /// Drawings keyed by id, in declaration order.
    #[serde(default, deserialize_with = "nullable")]
    pub drawings: IndexMap<String, Drawing>,
}

/// Read-only project display data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMeta {
    /// Project name.
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// Length unit the drawings are authored in.
    #[serde(default, deserialize_with = "nullable")]
    pub unit: String,
}

/// An entry in the project's discipline catalogue.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisciplineInfo {
    /// Discipline name, matching the keys used on drawings.
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

/// One node of the drawing hierarchy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    /// Unique id, also used for sibling ordering.
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    /// Display name.
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// Default (base) image file.
    #[serde(default, deserialize_with = "nullable")]
    pub image: String,
    /// Parent drawing id; `None` marks a root.
    #[serde(default)]
    pub parent: Option<String>,
    /// Placement of this drawing inside its parent's base image.
    #[serde(default)]
    pub position: Option<DrawingPosition>,
    /// Disciplines keyed by discipline name, in declaration order.
    #[serde(default, deserialize_with = "nullable")]
    pub disciplines: IndexMap<String, Discipline>,
}

impl Drawing {
    /// Returns the default image, or `None` when the document left it blank.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        non_empty(&self.image)
    }

    /// Returns `true` if this drawing has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the discipline stored under `key`.
    #[must_use]
    pub fn discipline(&self, key: &str) -> Option<&Discipline> {
        self.disciplines.get(key)
    }

    /// Discipline keys sorted lexicographically, as listed in a sidebar.
    #[must_use]
    pub fn sorted_discipline_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.disciplines.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Returns the clickable polygon of this drawing inside its parent, if it
    /// has at least one vertex.
    #[must_use]
    pub fn region_vertices(&self) -> Option<&[[f64; 2]]> {
        self.position
            .as_ref()
            .map(|p| p.vertices.as_slice())
            .filter(|v| !v.is_empty())
    }
}

/// Where a child drawing sits inside its parent's base image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingPosition {
    /// Polygon vertices in the parent image's pixel space.
    #[serde(default, deserialize_with = "nullable")]
    pub vertices: Vec<[f64; 2]>,
    /// Registration of the child image against the parent image.
    #[serde(default)]
    pub image_transform: Option<Transform>,
}

/// An engineering trade's view of a drawing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discipline {
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional image for this discipline.
    #[serde(default)]
    pub image: Option<String>,
    /// Registration against the owning drawing's base image.
    #[serde(default)]
    pub image_transform: Option<Transform>,
    /// Optional outline polygon.
    #[serde(default)]
    pub polygon: Option<Polygon>,
    /// Revisions declared directly on the discipline.
    #[serde(default, deserialize_with = "nullable")]
    pub revisions: Vec<Revision>,
    /// Named sub-regions; accepted as an array or as an object keyed by name.
    #[serde(default, deserialize_with = "deserialize_regions")]
    pub regions: Vec<Region>,
}

impl Discipline {
    /// The discipline's own image, falling back to the first declared
    /// revision's image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .and_then(non_empty)
            .or_else(|| self.revisions.first().and_then(Revision::image))
    }

    /// The registration used when this discipline is overlaid without a
    /// revision of its own: the first revision's transform, else the
    /// discipline's transform.
    #[must_use]
    pub fn primary_transform(&self) -> Option<&Transform> {
        self.revisions
            .first()
            .and_then(|r| r.image_transform.as_ref())
            .or(self.image_transform.as_ref())
    }
}

/// A named sub-area of a discipline with its own revision history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Region name; for keyed regions this falls back to the key.
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// Outline of the region.
    #[serde(default)]
    pub polygon: Option<Polygon>,
    /// Revisions of this region.
    #[serde(default, deserialize_with = "nullable")]
    pub revisions: Vec<Revision>,
}

/// A dated version of an image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    /// Version label, e.g. `REV1`.
    #[serde(default, deserialize_with = "nullable")]
    pub version: String,
    /// Image file for this revision.
    #[serde(default, deserialize_with = "nullable")]
    pub image: String,
    /// ISO date string.
    #[serde(default)]
    pub date: Option<String>,
    /// Free-text description.
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    /// Change notes.
    #[serde(default, deserialize_with = "nullable")]
    pub changes: Vec<String>,
    /// Registration against the drawing's base image.
    #[serde(default)]
    pub image_transform: Option<Transform>,
    /// Optional outline polygon.
    #[serde(default)]
    pub polygon: Option<Polygon>,
}

impl Revision {
    /// Returns the image, or `None` when blank.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        non_empty(&self.image)
    }

    /// The date used for chronological ordering.
    ///
    /// Accepts `YYYY-MM-DD` and anything that starts with it (such as an
    /// RFC 3339 timestamp). Missing or unparseable dates sort as 1970-01-01.
    #[must_use]
    pub fn sort_date(&self) -> NaiveDate {
        self.date
            .as_deref()
            .map(str::trim)
            .and_then(|d| {
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .ok()
                    .or_else(|| d.get(..10).and_then(|p| p.parse().ok()))
            })
            .unwrap_or_default()
    }

    /// Returns `true` if both revisions name the same image and version.
    ///
    /// Two different regions may reuse a version label, so the version alone
    /// does not identify a revision.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.image == other.image && self.version == other.version
    }
}

/// Registration of one image against another.
///
/// `(x, y)` is a translation in base-image pixels, `scale` is uniform, and
/// `rotation` is in radians. When `relative_to` is present, the values are only
/// meaningful against that base image file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    /// Image file the values were registered against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_to: Option<String>,
    /// Horizontal translation.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub x: f64,
    /// Vertical translation.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub y: f64,
    /// Uniform scale.
    #[serde(default = "one", deserialize_with = "number_or_one")]
    pub scale: f64,
    /// Rotation in radians.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub rotation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, unit scale, no rotation, no reference image.
    pub const IDENTITY: Self = Self {
        relative_to: None,
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        rotation: 0.0,
    };

    /// Creates a transform without a reference image.
    #[must_use]
    pub const fn new(x: f64, y: f64, scale: f64, rotation: f64) -> Self {
        Self {
            relative_to: None,
            x,
            y,
            scale,
            rotation,
        }
    }

    /// Sets the reference image.
    #[must_use]
    pub fn relative_to(mut self, file: impl Into<String>) -> Self {
        self.relative_to = Some(file.into());
        self
    }

    /// Returns `true` if the numeric part is the identity.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.scale == 1.0 && self.rotation == 0.0
    }

    /// Returns `true` if these values may be applied over `base_image`.
    ///
    /// That holds when no reference image is named, or when the reference and
    /// the base share a file name.
    #[must_use]
    pub fn registered_against(&self, base_image: &str) -> bool {
        match self.relative_to.as_deref() {
            None => true,
            Some(reference) => file_name(reference) == file_name(base_image),
        }
    }

    /// The affine map from the layer's own pixels into base pixels.
    ///
    /// The layer is scaled and rotated about its top-left corner, then its
    /// corner is moved to `(x, y)`.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y))
            * Affine::rotate(self.rotation)
            * Affine::scale(self.scale)
    }
}

/// Placement applied to a polygon's vertices.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolygonTransform {
    /// Horizontal translation.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub x: f64,
    /// Vertical translation.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub y: f64,
    /// Uniform scale.
    #[serde(default = "one", deserialize_with = "number_or_one")]
    pub scale: f64,
    /// Rotation in radians.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub rotation: f64,
}

/// A polygon with optional placement.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    /// Vertices in declaration order.
    #[serde(default, deserialize_with = "nullable")]
    pub vertices: Vec<[f64; 2]>,
    /// Placement applied to every vertex.
    #[serde(default)]
    pub polygon_transform: Option<PolygonTransform>,
}

impl Polygon {
    /// Returns the vertices with `polygon_transform` applied.
    #[must_use]
    pub fn placed_vertices(&self) -> Vec<Point> {
        let affine = self.polygon_transform.map_or(Affine::IDENTITY, |t| {
            Affine::translate(Vec2::new(t.x, t.y)) * Affine::rotate(t.rotation) * Affine::scale(t.scale)
        });
        self.vertices
            .iter()
            .map(|&[x, y]| affine * Point::new(x, y))
            .collect()
    }
}

/// Returns the last path segment of an image reference.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

fn one() -> f64 {
    1.0
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn finite_or<'de, D: Deserializer<'de>>(deserializer: D, fallback: f64) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?
        .filter(|v| v.is_finite())
        .unwrap_or(fallback))
}

fn number_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    finite_or(deserializer, 0.0)
}

fn number_or_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    finite_or(deserializer, 1.0)
}

#[derive(Deserialize)]
struct RawRegion {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    polygon: Option<Polygon>,
    #[serde(default, deserialize_with = "nullable")]
    revisions: Vec<Revision>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RegionsRepr {
    List(Vec<RawRegion>),
    Keyed(IndexMap<String, RawRegion>),
}

/// Regions arrive either as an array or as an object keyed by region name;
/// both become one ordered list here.
fn deserialize_regions<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Region>, D::Error> {
    let regions = match Option::<RegionsRepr>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RegionsRepr::List(list)) => list
            .into_iter()
            .map(|r| Region {
                name: r.name.unwrap_or_default(),
                polygon: r.polygon,
                revisions: r.revisions,
            })
            .collect(),
        Some(RegionsRepr::Keyed(keyed)) => keyed
            .into_iter()
            .map(|(key, r)| Region {
                name: r.name.unwrap_or(key),
                polygon: r.polygon,
                revisions: r.revisions,
            })
            .collect(),
    };
    Ok(regions)
}
