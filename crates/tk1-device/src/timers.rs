use tk1_platform::{ResetRequester, TimerQueue};

use crate::state::{interval_ns, DeviceState};

/// The two virtual-clock events the device schedules. Dispatched by the
/// caller matching on what [`TimerQueue::pop_due`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tk1Timer {
    Countdown,
    Watchdog,
}

/// Arms the countdown timer to decrement once per tick starting now.
pub fn start_countdown(state: &mut DeviceState, queue: &mut TimerQueue<Tk1Timer>, now_ns: u64) {
    state.timer_running = true;
    queue.schedule(now_ns + state.timer_interval_ns, Tk1Timer::Countdown);
}

/// Stops the countdown timer and reloads it from its initial value. Called
/// both by an explicit guest stop and implicitly by watchdog reset.
pub fn stop_countdown(state: &mut DeviceState) {
    state.timer_running = false;
    state.timer = state.timer_initial;
}

/// Handles a due countdown tick. A no-op if the timer was stopped since it
/// was scheduled — the queue has no cancellation, so every handler
/// re-validates its own `running` flag.
pub fn handle_countdown_tick(state: &mut DeviceState, queue: &mut TimerQueue<Tk1Timer>, now_ns: u64) {
    if !state.timer_running {
        return;
    }
    state.timer = state.timer.saturating_sub(1);
    if state.timer == 0 {
        state.timer_running = false;
        return;
    }
    queue.schedule(now_ns + state.timer_interval_ns, Tk1Timer::Countdown);
}

/// Arms the watchdog for a single expiry at `watchdog_initial` base-clock
/// cycles from now.
pub fn start_watchdog(state: &mut DeviceState, queue: &mut TimerQueue<Tk1Timer>, now_ns: u64) {
    state.watchdog_running = true;
    let deadline = now_ns + (state.watchdog_initial as u64) * interval_ns(0);
    queue.schedule(deadline, Tk1Timer::Watchdog);
}

pub fn disarm_watchdog(state: &mut DeviceState) {
    state.watchdog_running = false;
}

/// Handles a due watchdog expiry: resets device state and asks the host to
/// reset the machine. The host call is best-effort and its outcome, if
/// any, is not observable here.
pub fn handle_watchdog_tick(state: &mut DeviceState, reset: &mut dyn ResetRequester) {
    if !state.watchdog_running {
        return;
    }
    state.watchdog_reset();
    reset.request_machine_reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use crate::state::DeviceState;

    #[test]
    fn countdown_reaches_zero_after_loaded_ticks() {
        let mut state = DeviceState::new(Profile::Tk1, 0);
        state.timer_initial = 3;
        state.timer = 3;
        state.timer_prescaler = 0;
        state.timer_interval_ns = interval_ns(0);

        let mut queue = TimerQueue::new();
        let mut now = 0u64;
        start_countdown(&mut state, &mut queue, now);

        for _ in 0..3 {
            let ev = queue.pop_due(u64::MAX).unwrap();
            now = ev.deadline_ns;
            handle_countdown_tick(&mut state, &mut queue, now);
        }

        assert_eq!(state.timer, 0);
        assert!(!state.timer_running);
        assert!(queue.is_empty());
    }

    #[test]
    fn stopped_timer_ignores_late_tick() {
        let mut state = DeviceState::new(Profile::Tk1, 0);
        state.timer_initial = 5;
        state.timer = 5;
        let mut queue = TimerQueue::new();
        start_countdown(&mut state, &mut queue, 0);
        stop_countdown(&mut state);

        let ev = queue.pop_due(u64::MAX).unwrap();
        handle_countdown_tick(&mut state, &mut queue, ev.deadline_ns);

        assert_eq!(state.timer, 5);
        assert!(queue.is_empty());
    }

    #[test]
    fn watchdog_expiry_clears_app_mode_and_requests_reset() {
        use tk1_platform::RecordingResetRequester;

        let mut state = DeviceState::new(Profile::Tk1, 0);
        state.app_mode = true;
        state.watchdog_running = true;

        let mut reset = RecordingResetRequester::default();
        handle_watchdog_tick(&mut state, &mut reset);

        assert!(!state.app_mode);
        assert!(!state.watchdog_running);
        assert_eq!(reset.requests, 1);
    }
}
