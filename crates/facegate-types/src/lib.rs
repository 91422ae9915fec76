//! # facegate-types: Core types for `Facegate`
//!
//! This crate contains shared types used across the `Facegate` system:
//! - File entitlement identifiers ([`FileId`])
//! - Facial signatures ([`Signature`])
//! - Camera frames and detections ([`Frame`], [`FaceRegion`], [`DetectedFace`])
//! - The published "who is in front of the camera" value ([`CurrentIdentity`])

use std::fmt::{Debug, Display};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Label used when a detected face matches no enrolled signature.
pub const UNKNOWN_ROLE: &str = "Unknown";

// ============================================================================
// Entitlements
// ============================================================================

/// Identifier of a file (or family of files) a role may access.
///
/// File IDs are matched against requested paths as case-insensitive
/// substrings, so `Employee_Level_Files` covers
/// `C:/data/Employee_Level_Files/report.txt`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this identifier occurs anywhere in `path`, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// # use facegate_types::FileId;
    /// let id = FileId::new("Employee_Level_Files");
    /// assert!(id.is_within("c:/data/employee_level_files/x.txt"));
    /// assert!(!id.is_within("c:/data/other/x.txt"));
    /// ```
    pub fn is_within(&self, path: &str) -> bool {
        path.to_lowercase().contains(&self.0.to_lowercase())
    }
}

impl Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FileId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ============================================================================
// Signatures
// ============================================================================

/// Fixed-length numeric vector describing one detected face.
///
/// Produced by the external detector and only ever compared for similarity;
/// it is never decoded back into an image.
#[derive(Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Signature(Vec<f64>);

impl Signature {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Number of components in the vector.
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// True when no component is NaN or infinite. Only finite signatures
    /// can be persisted.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|value| value.is_finite())
    }

    /// Euclidean distance to `other`, or `None` if the dimensions differ.
    pub fn distance(&self, other: &Signature) -> Option<f64> {
        if self.dimensions() != other.dimensions() {
            return None;
        }
        let sum: f64 = self
            .0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        Some(sum.sqrt())
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Signatures are 128 floats in practice; only show the head.
        write!(f, "Signature(dims={}, head={:?})", self.0.len(), &self.0[..self.0.len().min(3)])
    }
}

impl From<Vec<f64>> for Signature {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

// ============================================================================
// Frames and detections
// ============================================================================

/// Bounding box of a detected face, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceRegion {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl FaceRegion {
    pub fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Anchor point for the overlay label: just inside the bottom-left corner.
    pub fn label_anchor(&self) -> (u32, u32) {
        (self.left.saturating_add(6), self.bottom.saturating_sub(6))
    }
}

impl Display for FaceRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// A single image captured from the camera.
///
/// `sequence` increases by one per captured frame and lets detectors and
/// renderers correlate their work with a specific capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    pub pixels: Bytes,
}

impl Frame {
    pub fn new(sequence: u64, width: u32, height: u32, pixels: Bytes) -> Self {
        Self {
            sequence,
            width,
            height,
            pixels,
        }
    }
}

/// A face found in a frame together with its signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    pub region: FaceRegion,
    pub signature: Signature,
}

// ============================================================================
// Current identity
// ============================================================================

/// Who the system currently believes is in front of the camera.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CurrentIdentity {
    /// Nobody has been recognized or enrolled yet.
    #[default]
    Absent,
    /// A face was seen but matched no enrolled signature.
    Unknown,
    /// A face matched the signature enrolled for this role.
    Role(String),
}

impl CurrentIdentity {
    /// Returns the role name if a role is currently recognized.
    pub fn role(&self) -> Option<&str> {
        match self {
            CurrentIdentity::Role(role) => Some(role),
            CurrentIdentity::Absent | CurrentIdentity::Unknown => None,
        }
    }

    /// Label shown on overlays and in status output.
    pub fn label(&self) -> &str {
        match self {
            CurrentIdentity::Absent => "<none>",
            CurrentIdentity::Unknown => UNKNOWN_ROLE,
            CurrentIdentity::Role(role) => role,
        }
    }
}

impl Display for CurrentIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
