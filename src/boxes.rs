//! Publish-side box representation and the codec that produces it.

mod codec;
mod publish;

pub use codec::{
    detection_to_publish, publish_yaw, track_input_from_detection, track_to_publish,
    yaw_to_quaternion,
};
pub use publish::{BoxCollection, BoxValue, PublishBox};
