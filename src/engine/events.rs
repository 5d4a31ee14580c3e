// Per-frame event queue.
// Systems push events while updating; the host drains them after the frame
// (audio cues, camera reactions) so nothing mutates mid-iteration.

#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Take every queued event, leaving the queue empty.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }
}
