use crate::domain::TaskEvent;
use tokio::sync::mpsc::UnboundedSender;

/// Outlet for decorative side effects.
///
/// `emit` must return immediately and never fail from the caller's point of
/// view: a sink that can't deliver drops the event.
pub trait EffectSink: Send + Sync {
    fn emit(&self, event: TaskEvent);
}

impl EffectSink for UnboundedSender<TaskEvent> {
    fn emit(&self, event: TaskEvent) {
        if self.send(event).is_err() {
            tracing::debug!("Effects receiver gone, dropping event");
        }
    }
}

/// Sink for headless commands
pub struct NoopEffects;

impl EffectSink for NoopEffects {
    fn emit(&self, _event: TaskEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;

    #[test]
    fn test_channel_sink_forwards_and_survives_closed_receiver() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.emit(TaskEvent::Deleted(TaskId::from("7")));
        assert_eq!(rx.try_recv().unwrap(), TaskEvent::Deleted(TaskId::from("7")));

        drop(rx);
        tx.emit(TaskEvent::ClearedCompleted { count: 2 });
    }
}
