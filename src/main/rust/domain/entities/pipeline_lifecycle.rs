use std::fmt;
use std::time::Instant;

/// Pipeline lifecycle states. `Null` is both initial and terminal; a
/// freshly constructed topology sits in `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Null,
    Ready,
    Playing,
    Paused,
}

impl PipelineState {
    /// A live pipeline still holds stage resources.
    pub fn is_live(&self) -> bool {
        !matches!(self, PipelineState::Null)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PipelineState::Playing)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Ready => write!(f, "READY"),
            Self::Playing => write!(f, "PLAYING"),
            Self::Paused => write!(f, "PAUSED"),
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::Null
    }
}

/// State transition record
#[derive(Debug, Clone)]
pub struct StateTransition {
    pub from: PipelineState,
    pub to: PipelineState,
    pub timestamp: Instant,
}

/// Domain entity tracking one pipeline instance's state machine:
/// `Ready -> Playing <-> Paused`, with `shut_down` legal from any live
/// state. Transition methods return whether the transition applied, so
/// invalid requests degrade to no-ops instead of errors.
#[derive(Debug)]
pub struct PipelineLifecycle {
    current_state: PipelineState,
    state_history: Vec<StateTransition>,
    started_at: Option<Instant>,
}

impl PipelineLifecycle {
    pub fn new() -> Self {
        Self {
            current_state: PipelineState::Ready,
            state_history: Vec::new(),
            started_at: None,
        }
    }

    pub fn current_state(&self) -> PipelineState {
        self.current_state
    }

    pub fn uptime(&self) -> Option<std::time::Duration> {
        self.started_at.map(|start| start.elapsed())
    }

    pub fn transition_count(&self) -> usize {
        self.state_history.len()
    }

    pub fn last_transition(&self) -> Option<&StateTransition> {
        self.state_history.last()
    }

    /// `Ready | Paused -> Playing`.
    pub fn begin_playing(&mut self) -> bool {
        match self.current_state {
            PipelineState::Ready | PipelineState::Paused => {
                self.record_transition(PipelineState::Playing);

                if self.started_at.is_none() {
                    self.started_at = Some(Instant::now());
                }
                true
            }
            _ => false,
        }
    }

    /// `Playing -> Paused`.
    pub fn begin_paused(&mut self) -> bool {
        match self.current_state {
            PipelineState::Playing => {
                self.record_transition(PipelineState::Paused);
                true
            }
            _ => false,
        }
    }

    /// Any live state `-> Null`. Returns false when already `Null`, which
    /// is how callers keep teardown idempotent.
    pub fn shut_down(&mut self) -> bool {
        if !self.current_state.is_live() {
            return false;
        }
        self.record_transition(PipelineState::Null);
        true
    }

    fn record_transition(&mut self, new_state: PipelineState) {
        let transition = StateTransition {
            from: self.current_state,
            to: new_state,
            timestamp: Instant::now(),
        };

        self.state_history.push(transition);
        self.current_state = new_state;
    }
}

impl Default for PipelineLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructed_lifecycle_is_ready() {
        let lifecycle = PipelineLifecycle::new();
        assert_eq!(lifecycle.current_state(), PipelineState::Ready);
        assert_eq!(lifecycle.transition_count(), 0);
    }

    #[test]
    fn test_start_pause_resume() {
        let mut lifecycle = PipelineLifecycle::new();

        assert!(lifecycle.begin_playing());
        assert_eq!(lifecycle.current_state(), PipelineState::Playing);

        assert!(lifecycle.begin_paused());
        assert_eq!(lifecycle.current_state(), PipelineState::Paused);

        assert!(lifecycle.begin_playing());
        assert_eq!(lifecycle.current_state(), PipelineState::Playing);
        assert_eq!(lifecycle.transition_count(), 3);
    }

    #[test]
    fn test_pause_requires_playing() {
        let mut lifecycle = PipelineLifecycle::new();

        assert!(!lifecycle.begin_paused());
        assert_eq!(lifecycle.current_state(), PipelineState::Ready);
    }

    #[test]
    fn test_shut_down_from_any_live_state() {
        for play_first in [false, true] {
            let mut lifecycle = PipelineLifecycle::new();
            if play_first {
                lifecycle.begin_playing();
            }

            assert!(lifecycle.shut_down());
            assert_eq!(lifecycle.current_state(), PipelineState::Null);
        }
    }

    #[test]
    fn test_shut_down_is_idempotent() {
        let mut lifecycle = PipelineLifecycle::new();
        lifecycle.begin_playing();

        assert!(lifecycle.shut_down());
        assert!(!lifecycle.shut_down());
        assert!(!lifecycle.shut_down());
        assert_eq!(lifecycle.current_state(), PipelineState::Null);
    }

    #[test]
    fn test_null_is_terminal() {
        let mut lifecycle = PipelineLifecycle::new();
        lifecycle.shut_down();

        assert!(!lifecycle.begin_playing());
        assert!(!lifecycle.begin_paused());
        assert_eq!(lifecycle.current_state(), PipelineState::Null);
    }

    #[test]
    fn test_uptime_tracking() {
        let mut lifecycle = PipelineLifecycle::new();
        assert!(lifecycle.uptime().is_none());

        lifecycle.begin_playing();
        std::thread::sleep(std::time::Duration::from_millis(10));

        let uptime = lifecycle.uptime().unwrap();
        assert!(uptime.as_millis() >= 10);
    }

    #[test]
    fn test_last_transition() {
        let mut lifecycle = PipelineLifecycle::new();
        lifecycle.begin_playing();

        let last = lifecycle.last_transition().unwrap();
        assert_eq!(last.from, PipelineState::Ready);
        assert_eq!(last.to, PipelineState::Playing);
    }
}
