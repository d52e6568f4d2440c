//! Timed playback over the date grid.
//!
//! The scheduler does not own a thread or an OS timer. The event loop polls it
//! with the current instant and applies whatever tick it reports before
//! polling again, so ticks never overlap. Every start and stop bumps a
//! generation counter; a timer slot from an older generation is dropped
//! without firing, so once `pause` returns nothing can advance the index.

use crate::dates::{DateIndex, STRIDE_DAYS};
use crate::error::{OrreryError, Result};
use std::time::{Duration, Instant};

pub const MIN_STEP_DAYS: u32 = 5;
pub const MAX_STEP_DAYS: u32 = 100;

/// Wall-clock period between ticks.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Stopped,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    pub phase: PlaybackPhase,
    pub step_size_days: u32,
    pub current_index: DateIndex,
}

impl PlaybackState {
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }
}

/// What a timer firing did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The index moved forward to the contained value.
    Advanced(DateIndex),
    /// The next step would pass the last date; playback stopped in place.
    Finished,
}

#[derive(Debug, Clone, Copy)]
struct TimerSlot {
    generation: u64,
    next_fire: Instant,
}

#[derive(Debug)]
pub struct PlaybackScheduler {
    state: PlaybackState,
    period: Duration,
    generation: u64,
    timer: Option<TimerSlot>,
}

impl PlaybackScheduler {
    pub fn new(period: Duration, start_index: DateIndex) -> Self {
        Self {
            state: PlaybackState {
                phase: PlaybackPhase::Stopped,
                step_size_days: MIN_STEP_DAYS,
                current_index: start_index,
            },
            period,
            generation: 0,
            timer: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    #[inline]
    pub fn current_index(&self) -> DateIndex {
        self.state.current_index
    }

    pub fn step_size_days(&self) -> u32 {
        self.state.step_size_days
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Index units covered by one tick: `ceil(step_size_days / 5)`.
    pub fn index_stride(&self) -> usize {
        (self.state.step_size_days as usize).div_ceil(STRIDE_DAYS as usize)
    }

    /// Takes effect on the next tick; an armed timer keeps its schedule.
    pub fn set_step_size(&mut self, days: u32) -> Result<()> {
        if !(MIN_STEP_DAYS..=MAX_STEP_DAYS).contains(&days) || days % MIN_STEP_DAYS != 0 {
            return Err(OrreryError::InvalidStepSize(days));
        }
        self.state.step_size_days = days;
        Ok(())
    }

    /// Direct slider input. The caller has already validated `index`.
    pub fn seek(&mut self, index: DateIndex) {
        self.state.current_index = index;
    }

    /// Starts playback; the first tick fires one period after `now`.
    pub fn play(&mut self, now: Instant) {
        if self.is_playing() {
            return;
        }
        self.generation += 1;
        self.state.phase = PlaybackPhase::Playing;
        self.timer = Some(TimerSlot {
            generation: self.generation,
            next_fire: now + self.period,
        });
        log::info!(
            "Playback started at index {} (step {} days)",
            self.state.current_index,
            self.state.step_size_days
        );
    }

    /// Stops playback and disarms the timer before returning.
    pub fn pause(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.generation += 1;
        self.state.phase = PlaybackPhase::Stopped;
        self.timer = None;
        log::info!("Playback stopped at index {}", self.state.current_index);
    }

    /// Play/pause button. Returns the new "is playing" status.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.is_playing() {
            self.pause();
        } else {
            self.play(now);
        }
        self.is_playing()
    }

    /// When the event loop should wake up next, if playing.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer
            .filter(|slot| slot.generation == self.generation)
            .map(|slot| slot.next_fire)
    }

    /// Fires at most one due tick. `last_index` is the last valid date index.
    ///
    /// A late poll does not replay missed ticks; the schedule restarts from
    /// `now` instead.
    pub fn poll(&mut self, now: Instant, last_index: DateIndex) -> Option<Tick> {
        let slot = self.timer?;
        if slot.generation != self.generation || !self.is_playing() {
            self.timer = None;
            return None;
        }
        if now < slot.next_fire {
            return None;
        }

        let mut next_fire = slot.next_fire + self.period;
        if next_fire <= now {
            next_fire = now + self.period;
        }
        self.timer = Some(TimerSlot {
            generation: slot.generation,
            next_fire,
        });

        let next_index = self.state.current_index + self.index_stride();
        if next_index > last_index {
            log::info!("Playback reached the end of the date range");
            self.pause();
            return Some(Tick::Finished);
        }

        self.state.current_index = next_index;
        Some(Tick::Advanced(next_index))
    }
}

impl Default for PlaybackScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAST: DateIndex = 21_913;
    const P: Duration = DEFAULT_PERIOD;

    #[test]
    fn stopped_scheduler_never_ticks() {
        let mut s = PlaybackScheduler::default();
        let t0 = Instant::now();

        assert_eq!(s.poll(t0 + P * 10, LAST), None);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn first_tick_waits_one_period() {
        let mut s = PlaybackScheduler::default();
        let t0 = Instant::now();
        s.play(t0);

        assert_eq!(s.poll(t0, LAST), None);
        assert_eq!(s.poll(t0 + P / 2, LAST), None);
        assert_eq!(s.poll(t0 + P, LAST), Some(Tick::Advanced(1)));
        assert_eq!(s.next_deadline(), Some(t0 + P * 2));
    }

    #[test]
    fn hundred_day_step_advances_twenty() {
        let mut s = PlaybackScheduler::default();
        s.set_step_size(100).unwrap();
        let t0 = Instant::now();
        s.play(t0);

        assert_eq!(s.poll(t0 + P, LAST), Some(Tick::Advanced(20)));
    }

    #[test]
    fn index_stride_rounds_up() {
        let mut s = PlaybackScheduler::default();
        assert_eq!(s.index_stride(), 1);
        s.set_step_size(35).unwrap();
        assert_eq!(s.index_stride(), 7);
    }

    #[test]
    fn invalid_step_sizes_are_rejected() {
        let mut s = PlaybackScheduler::default();

        assert!(matches!(s.set_step_size(0), Err(OrreryError::InvalidStepSize(0))));
        assert!(s.set_step_size(105).is_err());
        assert!(s.set_step_size(12).is_err());
        assert_eq!(s.step_size_days(), MIN_STEP_DAYS);
    }

    #[test]
    fn auto_stops_at_range_end_without_advancing() {
        let mut s = PlaybackScheduler::new(P, LAST - 2);
        s.set_step_size(100).unwrap();
        let t0 = Instant::now();
        s.play(t0);

        assert_eq!(s.poll(t0 + P, LAST), Some(Tick::Finished));
        assert!(!s.is_playing());
        assert_eq!(s.current_index(), LAST - 2);
        assert_eq!(s.poll(t0 + P * 5, LAST), None);
    }

    #[test]
    fn reaches_last_index_exactly() {
        let mut s = PlaybackScheduler::new(P, LAST - 1);
        let t0 = Instant::now();
        s.play(t0);

        assert_eq!(s.poll(t0 + P, LAST), Some(Tick::Advanced(LAST)));
        assert_eq!(s.poll(t0 + P * 2, LAST), Some(Tick::Finished));
        assert_eq!(s.current_index(), LAST);
    }

    #[test]
    fn pause_cancels_pending_tick() {
        let mut s = PlaybackScheduler::default();
        let t0 = Instant::now();
        s.play(t0);
        let gen = s.generation();
        s.pause();

        assert!(s.generation() > gen);
        assert_eq!(s.poll(t0 + P * 3, LAST), None);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn restart_does_not_inherit_old_schedule() {
        let mut s = PlaybackScheduler::default();
        let t0 = Instant::now();
        s.play(t0);
        s.pause();
        s.play(t0 + P * 10);

        assert_eq!(s.poll(t0 + P * 10, LAST), None);
        assert_eq!(s.poll(t0 + P * 11, LAST), Some(Tick::Advanced(1)));
    }

    #[test]
    fn step_change_applies_on_next_tick() {
        let mut s = PlaybackScheduler::default();
        let t0 = Instant::now();
        s.play(t0);
        assert_eq!(s.poll(t0 + P, LAST), Some(Tick::Advanced(1)));

        s.set_step_size(50).unwrap();
        assert_eq!(s.next_deadline(), Some(t0 + P * 2));
        assert_eq!(s.poll(t0 + P * 2, LAST), Some(Tick::Advanced(11)));
    }

    #[test]
    fn late_poll_fires_once_and_reschedules_from_now() {
        let mut s = PlaybackScheduler::default();
        let t0 = Instant::now();
        s.play(t0);

        let late = t0 + P * 7;
        assert_eq!(s.poll(late, LAST), Some(Tick::Advanced(1)));
        assert_eq!(s.poll(late, LAST), None);
        assert_eq!(s.next_deadline(), Some(late + P));
    }

    #[test]
    fn toggle_reports_status() {
        let mut s = PlaybackScheduler::default();
        let t0 = Instant::now();

        assert!(s.toggle(t0));
        assert!(s.state().is_playing());
        assert!(!s.toggle(t0));
    }
}
