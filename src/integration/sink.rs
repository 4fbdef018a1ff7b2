//! Destination for finished box collections.

use crossbeam_channel::Sender;
use tracing::warn;

use crate::boxes::BoxCollection;

/// Receives one box collection per processed frame, including empty ones.
pub trait PublishSink {
    fn publish(&mut self, collection: BoxCollection);
}

impl PublishSink for Vec<BoxCollection> {
    fn publish(&mut self, collection: BoxCollection) {
        self.push(collection);
    }
}

impl PublishSink for Sender<BoxCollection> {
    fn publish(&mut self, collection: BoxCollection) {
        if let Err(e) = self.send(collection) {
            warn!(frame_id = %e.0.frame_id, "publish channel closed, dropping box collection");
        }
    }
}

impl<S: PublishSink + ?Sized> PublishSink for &mut S {
    fn publish(&mut self, collection: BoxCollection) {
        (**self).publish(collection)
    }
}
