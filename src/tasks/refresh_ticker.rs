//! Periodic display refresh and live activity synchronisation

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::broadcast::error::RecvError,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use crate::{
    activity::{LiveActivity, PublishError},
    state::AppState,
};

/// Background task that re-renders the display on every tick while running
/// and mirrors engine transitions onto the live activity
pub async fn refresh_ticker_task(state: Arc<AppState>, mut activity: LiveActivity, tick: Duration) {
    info!("Starting refresh ticker task ({}ms)", tick.as_millis());

    let enabled = activity.is_enabled();
    if let Err(e) = state.update_activity_status(|status| status.enabled = enabled) {
        error!("Failed to record live activity availability: {}", e);
    }
    if !enabled {
        warn!("Live activities are disabled, timing continues locally");
    }

    let mut transitions = state.subscribe_transitions();
    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // Tick - refresh display while running
            _ = ticker.tick() => {
                refresh_once(&state, &mut activity);
            }

            // Transition - bring the live activity in line
            received = transitions.recv() => {
                match received {
                    Ok(event) => {
                        debug!("Ticker received transition {:?}", event.transition);
                        let result = activity.on_transition(&event);
                        record_publish(&state, &activity, result);
                    }
                    Err(RecvError::Lagged(missed)) => {
                        warn!("Missed {} transitions, resynchronising live activity", missed);
                        resync(&state, &mut activity);
                    }
                    Err(RecvError::Closed) => {
                        info!("Transition channel closed, stopping refresh ticker");
                        break;
                    }
                }
            }
        }
    }
}

fn refresh_once(state: &AppState, activity: &mut LiveActivity) {
    match state.is_running() {
        Ok(true) => {}
        Ok(false) => return,
        Err(e) => {
            error!("Failed to read run state: {}", e);
            return;
        }
    }

    match state.refresh_display() {
        Ok(frame) => debug!("Display refreshed: {}", frame.text),
        Err(e) => error!("Failed to refresh display: {}", e),
    }

    if !activity.is_active() {
        return;
    }
    match state.get_snapshot() {
        Ok(snapshot) => {
            let result = activity.refresh(&snapshot);
            record_publish(state, activity, result);
        }
        Err(e) => error!("Failed to snapshot timer: {}", e),
    }
}

fn resync(state: &AppState, activity: &mut LiveActivity) {
    let snapshot = match state.get_snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to snapshot timer: {}", e);
            return;
        }
    };
    let result = if snapshot.is_running {
        activity.begin(&snapshot)
    } else {
        activity.refresh(&snapshot)
    };
    record_publish(state, activity, result);
}

/// Record a publish outcome. Only a call that reached the publisher clears
/// a previous error.
fn record_publish(state: &AppState, activity: &LiveActivity, result: Result<bool, PublishError>) {
    let active = activity.is_active();
    let update = state.update_activity_status(|status| match result {
        Ok(true) => status.record_success(active),
        Ok(false) => status.active = active,
        Err(e) => {
            if e != PublishError::Disabled {
                warn!("Live activity publish failed: {}", e);
            }
            status.active = active;
            status.record_error(e.to_string());
        }
    });
    if let Err(e) = update {
        error!("Failed to update live activity status: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use tokio::time::sleep;

    use super::*;
    use crate::{
        activity::{
            ActivityAttributes, ActivityId, ActivitySnapshot, DisabledPublisher, DismissalPolicy,
            LiveActivityPublisher, LogPublisher,
        },
        state::{activity_status::ENABLE_ADVISORY, DisplayMode, ManualClock},
    };

    fn spawn_session(publisher: Arc<dyn LiveActivityPublisher>) -> (Arc<AppState>, ManualClock) {
        let clock = ManualClock::new(DateTime::<Utc>::UNIX_EPOCH);
        let state = Arc::new(AppState::with_clock(
            Arc::new(clock.clone()),
            DisplayMode::Stopwatch,
            0,
            "127.0.0.1".to_string(),
        ));
        let activity = LiveActivity::new(publisher, ActivityAttributes::new("Stopwatch"), DisplayMode::Stopwatch);
        tokio::spawn(refresh_ticker_task(Arc::clone(&state), activity, Duration::from_secs(1)));
        (state, clock)
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_refresh_display_and_track_activity() {
        let (state, clock) = spawn_session(Arc::new(LogPublisher::new()));
        let display = state.subscribe_display();
        sleep(Duration::from_millis(10)).await;

        state.start().unwrap();
        sleep(Duration::from_millis(10)).await;
        assert!(state.get_activity_status().unwrap().active);

        clock.advance_secs(2);
        sleep(Duration::from_secs(1)).await;
        assert_eq!(display.borrow().text, "00:00:02");

        state.reset().unwrap();
        sleep(Duration::from_millis(10)).await;
        let status = state.get_activity_status().unwrap();
        assert!(status.enabled);
        assert!(!status.active);
        assert_eq!(status.advisory(), None);
        assert_eq!(display.borrow().text, "00:00:00");
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_timer_is_not_refreshed() {
        let (state, clock) = spawn_session(Arc::new(LogPublisher::new()));
        let display = state.subscribe_display();
        sleep(Duration::from_millis(10)).await;

        state.start().unwrap();
        clock.advance_secs(5);
        state.pause().unwrap();
        clock.advance_secs(60);
        sleep(Duration::from_secs(3)).await;

        assert_eq!(display.borrow().text, "00:00:05");
        assert!(!display.borrow().running);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_surface_only_raises_advisory() {
        let (state, clock) = spawn_session(Arc::new(DisabledPublisher));
        sleep(Duration::from_millis(10)).await;

        state.start().unwrap();
        clock.advance_secs(4);
        sleep(Duration::from_secs(1)).await;

        let status = state.get_activity_status().unwrap();
        assert!(!status.enabled);
        assert!(!status.active);
        assert_eq!(status.advisory().as_deref(), Some(ENABLE_ADVISORY));

        let view = state.get_view().unwrap();
        assert!(view.running);
        assert_eq!(view.elapsed_seconds, 4);
    }

    /// Surface that is switched on but turns every request down
    struct RejectingPublisher;

    impl LiveActivityPublisher for RejectingPublisher {
        fn is_enabled(&self) -> bool {
            true
        }

        fn request(&self, _: &ActivityAttributes, _: &ActivitySnapshot) -> Result<ActivityId, PublishError> {
            Err(PublishError::Rejected("quota exceeded".to_string()))
        }

        fn update(&self, id: &ActivityId, _: &ActivitySnapshot) -> Result<(), PublishError> {
            Err(PublishError::UnknownActivity(id.clone()))
        }

        fn end(&self, id: &ActivityId, _: &ActivitySnapshot, _: DismissalPolicy) -> Result<(), PublishError> {
            Err(PublishError::UnknownActivity(id.clone()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rejection_advisory_survives_actions_that_skip_the_surface() {
        let (state, clock) = spawn_session(Arc::new(RejectingPublisher));
        sleep(Duration::from_millis(10)).await;

        state.start().unwrap();
        sleep(Duration::from_millis(10)).await;
        let expected = Some("Live activity unavailable: surface rejected the request: quota exceeded".to_string());
        assert_eq!(state.get_activity_status().unwrap().advisory(), expected);

        clock.advance_secs(2);
        state.pause().unwrap();
        sleep(Duration::from_secs(2)).await;

        let status = state.get_activity_status().unwrap();
        assert!(!status.active);
        assert_eq!(status.advisory(), expected);
    }
}
