//! Lifecycle of the single live activity that mirrors a session

use std::sync::Arc;
use tracing::{debug, warn};

use super::{ActivityAttributes, ActivityId, ActivitySnapshot, DismissalPolicy, LiveActivityPublisher, PublishError};
use crate::state::{DisplayMode, Transition, TransitionEvent};

/// Drives at most one activity on a publisher in response to engine transitions
pub struct LiveActivity {
    publisher: Arc<dyn LiveActivityPublisher>,
    attributes: ActivityAttributes,
    mode: DisplayMode,
    current: Option<ActivityId>,
}

impl LiveActivity {
    pub fn new(publisher: Arc<dyn LiveActivityPublisher>, attributes: ActivityAttributes, mode: DisplayMode) -> Self {
        Self {
            publisher,
            attributes,
            mode,
            current: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.publisher.is_enabled()
    }

    /// Check if an activity is currently shown
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Show the activity, or update it if it is already shown.
    ///
    /// Every method returns whether the publisher was actually called.
    pub fn begin(&mut self, snapshot: &ActivitySnapshot) -> Result<bool, PublishError> {
        if !self.publisher.is_enabled() {
            return Err(PublishError::Disabled);
        }
        if self.current.is_some() {
            return self.refresh(snapshot);
        }
        let id = self.publisher.request(&self.attributes, snapshot)?;
        debug!("Live activity {} requested", id);
        self.current = Some(id);
        Ok(true)
    }

    /// Push a new snapshot to the shown activity. Does nothing when none is shown.
    pub fn refresh(&mut self, snapshot: &ActivitySnapshot) -> Result<bool, PublishError> {
        let Some(id) = &self.current else {
            return Ok(false);
        };
        match self.publisher.update(id, snapshot) {
            Ok(()) => Ok(true),
            Err(PublishError::UnknownActivity(id)) => {
                warn!("Live activity {} vanished from the surface", id);
                self.current = None;
                Err(PublishError::UnknownActivity(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Tear down the shown activity. The local handle is dropped even if the
    /// surface reports a failure.
    pub fn finish(&mut self, snapshot: &ActivitySnapshot) -> Result<bool, PublishError> {
        let Some(id) = self.current.take() else {
            return Ok(false);
        };
        self.publisher.end(&id, snapshot, DismissalPolicy::Immediate)?;
        Ok(true)
    }

    /// Bring the surface in line with a transition
    pub fn on_transition(&mut self, event: &TransitionEvent) -> Result<bool, PublishError> {
        match (event.transition, self.mode) {
            (Transition::Started | Transition::Resumed, _) => self.begin(&event.snapshot),
            (Transition::Paused, DisplayMode::Stopwatch) => self.refresh(&event.snapshot),
            (Transition::Paused, DisplayMode::Clock) | (Transition::Reset, _) => self.finish(&event.snapshot),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{DateTime, TimeDelta, Utc};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Request,
        Update(bool),
        End,
    }

    /// Publisher that records calls and can be told to forget activities
    #[derive(Default)]
    struct RecordingPublisher {
        calls: Mutex<Vec<Call>>,
        forget: Mutex<bool>,
    }

    impl LiveActivityPublisher for RecordingPublisher {
        fn is_enabled(&self) -> bool {
            true
        }

        fn request(&self, _: &ActivityAttributes, _: &ActivitySnapshot) -> Result<ActivityId, PublishError> {
            self.calls.lock().unwrap().push(Call::Request);
            Ok(ActivityId("a".to_string()))
        }

        fn update(&self, id: &ActivityId, snapshot: &ActivitySnapshot) -> Result<(), PublishError> {
            self.calls.lock().unwrap().push(Call::Update(snapshot.is_running));
            if *self.forget.lock().unwrap() {
                return Err(PublishError::UnknownActivity(id.clone()));
            }
            Ok(())
        }

        fn end(&self, _: &ActivityId, _: &ActivitySnapshot, _: DismissalPolicy) -> Result<(), PublishError> {
            self.calls.lock().unwrap().push(Call::End);
            Ok(())
        }
    }

    fn event(transition: Transition, running: bool) -> TransitionEvent {
        let at = DateTime::<Utc>::UNIX_EPOCH;
        TransitionEvent {
            transition,
            snapshot: ActivitySnapshot::new(at, running, TimeDelta::zero()),
            at,
        }
    }

    fn live(mode: DisplayMode) -> (LiveActivity, Arc<RecordingPublisher>) {
        let publisher = Arc::new(RecordingPublisher::default());
        let live = LiveActivity::new(publisher.clone(), ActivityAttributes::new("Stopwatch"), mode);
        (live, publisher)
    }

    #[test]
    fn stopwatch_keeps_activity_through_pause() {
        let (mut live, publisher) = live(DisplayMode::Stopwatch);

        assert_eq!(live.on_transition(&event(Transition::Started, true)), Ok(true));
        assert_eq!(live.on_transition(&event(Transition::Paused, false)), Ok(true));
        assert!(live.is_active());
        live.on_transition(&event(Transition::Resumed, true)).unwrap();
        live.on_transition(&event(Transition::Reset, false)).unwrap();
        assert!(!live.is_active());

        assert_eq!(
            *publisher.calls.lock().unwrap(),
            vec![Call::Request, Call::Update(false), Call::Update(true), Call::End]
        );
    }

    #[test]
    fn clock_mode_ends_activity_on_pause() {
        let (mut live, publisher) = live(DisplayMode::Clock);

        live.on_transition(&event(Transition::Started, true)).unwrap();
        live.on_transition(&event(Transition::Paused, false)).unwrap();
        assert!(!live.is_active());
        assert_eq!(*publisher.calls.lock().unwrap(), vec![Call::Request, Call::End]);
    }

    #[test]
    fn refresh_without_activity_is_quiet() {
        let (mut live, publisher) = live(DisplayMode::Stopwatch);
        assert_eq!(live.refresh(&event(Transition::Paused, false).snapshot), Ok(false));
        assert_eq!(live.finish(&event(Transition::Reset, false).snapshot), Ok(false));
        assert!(publisher.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn vanished_activity_is_requested_again() {
        let (mut live, publisher) = live(DisplayMode::Stopwatch);
        live.on_transition(&event(Transition::Started, true)).unwrap();

        *publisher.forget.lock().unwrap() = true;
        let snapshot = event(Transition::Started, true).snapshot;
        assert!(matches!(live.refresh(&snapshot), Err(PublishError::UnknownActivity(_))));
        assert!(!live.is_active());

        *publisher.forget.lock().unwrap() = false;
        live.begin(&snapshot).unwrap();
        assert!(live.is_active());
        assert_eq!(publisher.calls.lock().unwrap().last(), Some(&Call::Request));
    }

    #[test]
    fn disabled_surface_is_never_asked() {
        let mut live = LiveActivity::new(
            Arc::new(super::super::DisabledPublisher),
            ActivityAttributes::new("Stopwatch"),
            DisplayMode::Stopwatch,
        );
        assert_eq!(
            live.on_transition(&event(Transition::Started, true)),
            Err(PublishError::Disabled)
        );
        assert!(!live.is_active());
    }
}
