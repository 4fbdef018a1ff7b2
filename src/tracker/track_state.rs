use serde::Serialize;

/// Where a reported track stands after the latest tracker step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackState {
    /// Born from an unmatched detection this step
    #[default]
    New,
    /// Matched to a detection this step
    Tracked,
    /// Unmatched this step, coasting on its last velocity until `max_age`
    Lost,
}
