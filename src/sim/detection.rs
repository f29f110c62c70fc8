//! Detector-facing input types
//!
//! The tracker only needs one thing from a detection: a confidence and a
//! single anchor point. Pose and face results both reduce to that through the
//! `Subject` trait, so the rest of the simulation never cares which model
//! produced them.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Anything that can be reduced to one aimable point
pub trait Subject {
    /// Overall detection confidence in [0, 1]
    fn confidence(&self) -> f32;

    /// Representative position, or `None` if nothing usable was detected
    fn anchor(&self, min_landmark_confidence: f32) -> Option<Vec2>;
}

/// A named body landmark (keypoint)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub pos: Vec2,
    pub confidence: f32,
}

impl Landmark {
    pub fn new(name: impl Into<String>, x: f32, y: f32, confidence: f32) -> Self {
        Self {
            name: name.into(),
            pos: Vec2::new(x, y),
            confidence,
        }
    }
}

/// One person from a pose estimator, valid for a single frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedSubject {
    pub confidence: f32,
    pub landmarks: Vec<Landmark>,
}

impl DetectedSubject {
    pub fn new(confidence: f32, landmarks: Vec<Landmark>) -> Self {
        Self {
            confidence,
            landmarks,
        }
    }

    /// Single-landmark subject, handy for hosts that already have a centre
    pub fn at(x: f32, y: f32) -> Self {
        Self::new(1.0, vec![Landmark::new("center", x, y, 1.0)])
    }
}

impl Subject for DetectedSubject {
    fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Centroid of landmarks strictly above the threshold
    fn anchor(&self, min_landmark_confidence: f32) -> Option<Vec2> {
        let (sum, count) = self
            .landmarks
            .iter()
            .filter(|l| l.confidence > min_landmark_confidence && l.pos.is_finite())
            .fold((Vec2::ZERO, 0u32), |(sum, n), l| (sum + l.pos, n + 1));
        (count > 0).then(|| sum / count as f32)
    }
}

/// A face from a face detector: a bounding box, no landmarks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub confidence: f32,
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Subject for FaceBox {
    fn confidence(&self) -> f32 {
        self.confidence
    }

    fn anchor(&self, _min_landmark_confidence: f32) -> Option<Vec2> {
        let center = self.min + self.size / 2.0;
        (center.is_finite() && self.size.min_element() >= 0.0).then_some(center)
    }
}

/// Detector failures. The simulation treats all of them as an empty frame.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Detector not ready")]
    NotReady,

    #[error("Detection failed: {0}")]
    Failed(String),
}

/// External pose/face estimator
pub trait DetectionSource {
    type Frame: ?Sized;
    type Subject: Subject;

    fn estimate(&mut self, frame: &Self::Frame) -> Result<Vec<Self::Subject>, DetectionError>;
}

/// Run the detector, mapping any failure to "no subjects this frame"
pub fn detect_or_empty<D: DetectionSource>(source: &mut D, frame: &D::Frame) -> Vec<D::Subject> {
    match source.estimate(frame) {
        Ok(subjects) => subjects,
        Err(e) => {
            log::warn!("{}, treating frame as empty", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_ignores_low_confidence() {
        let subject = DetectedSubject::new(
            0.9,
            vec![
                Landmark::new("nose", 100.0, 100.0, 0.9),
                Landmark::new("left_eye", 200.0, 100.0, 0.8),
                Landmark::new("left_ankle", 900.0, 900.0, 0.2),
                Landmark::new("right_ankle", 900.0, 900.0, 0.5),
            ],
        );
        assert_eq!(subject.anchor(0.5), Some(Vec2::new(150.0, 100.0)));
    }

    #[test]
    fn test_anchor_none_without_confident_landmarks() {
        let subject = DetectedSubject::new(0.9, vec![Landmark::new("nose", 1.0, 1.0, 0.3)]);
        assert_eq!(subject.anchor(0.5), None);
        assert_eq!(DetectedSubject::default().anchor(0.5), None);
    }

    #[test]
    fn test_anchor_skips_malformed_points() {
        let subject = DetectedSubject::new(
            0.9,
            vec![
                Landmark::new("nose", f32::NAN, 10.0, 0.9),
                Landmark::new("neck", 40.0, 60.0, 0.9),
            ],
        );
        assert_eq!(subject.anchor(0.5), Some(Vec2::new(40.0, 60.0)));
    }

    #[test]
    fn test_face_box_anchor() {
        let face = FaceBox {
            confidence: 0.8,
            min: Vec2::new(100.0, 50.0),
            size: Vec2::new(40.0, 60.0),
        };
        assert_eq!(face.anchor(0.5), Some(Vec2::new(120.0, 80.0)));

        let bad = FaceBox {
            size: Vec2::new(-1.0, 10.0),
            ..face
        };
        assert_eq!(bad.anchor(0.5), None);
    }

    struct Broken;

    impl DetectionSource for Broken {
        type Frame = ();
        type Subject = DetectedSubject;

        fn estimate(&mut self, _frame: &()) -> Result<Vec<DetectedSubject>, DetectionError> {
            Err(DetectionError::Failed("model crashed".into()))
        }
    }

    #[test]
    fn test_detector_failure_is_empty_frame() {
        assert!(detect_or_empty(&mut Broken, &()).is_empty());
    }
}
