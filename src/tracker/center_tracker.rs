//! Center-distance tracker with velocity-compensated association.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tracker::matching::{self, AssignmentResult, Candidate};
use crate::tracker::track_state::TrackState;
use crate::tracker::{MultiObjectTracker, Track, TrackInputDetection};

/// How detections are associated with existing tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssociationMethod {
    /// Each detection, in input order, takes its nearest free track.
    #[default]
    Greedy,
    /// Minimum total distance over all pairs.
    Hungarian,
}

/// Configuration for the CenterTracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Steps an unmatched track is kept alive before it is dropped.
    pub max_age: u32,
    pub association: AssociationMethod,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_age: 10,
            association: AssociationMethod::Greedy,
        }
    }
}

/// A tracked class and its association radius.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassGate {
    pub label: u32,
    pub name: String,
    /// Largest center displacement, in meters, still considered the same object
    pub max_distance: f32,
}

#[derive(Debug, Clone)]
struct TrackedObject {
    track: Track,
    center: Vector2<f32>,
}

pub struct CenterTracker {
    config: TrackerConfig,
    gates: Vec<ClassGate>,
    tracks: Vec<TrackedObject>,
    next_id: u64,
}

impl CenterTracker {
    pub fn new(config: TrackerConfig, gates: Vec<ClassGate>) -> Self {
        Self {
            config,
            gates,
            tracks: Vec::new(),
            next_id: 0,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Tracks reported by the last step.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().map(|t| &t.track)
    }

    fn gate(&self, name: &str) -> Option<&ClassGate> {
        self.gates.iter().find(|g| g.name == name)
    }

    fn next_track_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MultiObjectTracker for CenterTracker {
    fn reset(&mut self) {
        self.tracks.clear();
        self.next_id = 0;
    }

    fn step(&mut self, detections: &[TrackInputDetection], time_lag: f64) -> Vec<Track> {
        let lag = time_lag as f32;

        // Step 1: keep tracked classes, move each detection back to the previous frame time
        let mut dets = Vec::with_capacity(detections.len());
        let mut det_gates = Vec::with_capacity(detections.len());
        let mut det_candidates = Vec::with_capacity(detections.len());
        for det in detections {
            let Some(gate) = self.gate(&det.detection_name) else {
                debug!(class = %det.detection_name, "class not tracked, skipping detection");
                continue;
            };
            let center = Vector2::new(det.translation.x, det.translation.y);
            det_candidates.push(Candidate {
                center: center - det.velocity * lag,
                label: gate.label,
            });
            det_gates.push(gate.max_distance);
            dets.push((det, gate.label, center));
        }

        // Step 2: associate against track centers from the previous step
        let track_candidates: Vec<Candidate> = self
            .tracks
            .iter()
            .map(|t| Candidate {
                center: t.center,
                label: t.track.label_preds,
            })
            .collect();
        let dists = matching::center_distance(&det_candidates, &det_gates, &track_candidates);

        let AssignmentResult {
            matches,
            unmatched_detections,
            unmatched_tracks,
        } = match self.config.association {
            AssociationMethod::Greedy => matching::greedy_assignment(&dists),
            AssociationMethod::Hungarian => matching::linear_assignment(&dists),
        };

        let previous = std::mem::take(&mut self.tracks);
        let mut next = Vec::with_capacity(dets.len() + unmatched_tracks.len());

        // Step 3: matched detections continue their track's identity
        for &(idet, itrack) in &matches {
            let (det, label, center) = dets[idet];
            let prev = &previous[itrack].track;
            next.push(TrackedObject {
                track: track_from_detection(
                    det,
                    label,
                    prev.tracking_id,
                    prev.active + 1,
                    TrackState::Tracked,
                ),
                center,
            });
        }

        // Step 4: unmatched detections start new tracks
        for idet in unmatched_detections {
            let (det, label, center) = dets[idet];
            let id = self.next_track_id();
            next.push(TrackedObject {
                track: track_from_detection(det, label, id, 1, TrackState::New),
                center,
            });
        }

        // Step 5: unmatched tracks coast forward until they exceed max_age
        for itrack in unmatched_tracks {
            let mut object = previous[itrack].clone();
            if object.track.age >= self.config.max_age {
                continue;
            }
            let step = object.track.velocity * lag;
            object.center += step;
            object.track.translation.x += step.x;
            object.track.translation.y += step.y;
            object.track.age += 1;
            object.track.active = 0;
            object.track.state = TrackState::Lost;
            next.push(object);
        }

        debug!(
            detections = dets.len(),
            matched = matches.len(),
            tracks = next.len(),
            time_lag,
            "center tracker step"
        );

        self.tracks = next;
        self.tracks.iter().map(|t| t.track.clone()).collect()
    }
}

fn track_from_detection(
    det: &TrackInputDetection,
    label: u32,
    tracking_id: u64,
    active: u32,
    state: TrackState,
) -> Track {
    Track {
        translation: det.translation,
        rotation: det.rotation,
        size: det.size,
        velocity: det.velocity,
        tracking_id,
        label_preds: label,
        detection_score: det.detection_score,
        age: 1,
        active,
        state,
    }
}
