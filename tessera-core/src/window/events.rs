//! Key events routed to windows

/// Key state carried by an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyStatus {
    /// No key activity (returned when a queue is empty)
    #[default]
    Idle,
    /// Key pressed
    Attack,
    /// Key released
    Release,
}

/// A key event from an external input source
///
/// The compositor stores and routes events without interpreting `id` or
/// `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    /// Key number
    pub id: u8,
    /// Key state
    pub status: KeyStatus,
}

impl KeyEvent {
    /// Sentinel returned by a non-blocking pop on an empty queue
    pub const IDLE: Self = Self {
        id: 0,
        status: KeyStatus::Idle,
    };

    /// Key pressed
    pub const fn attack(id: u8) -> Self {
        Self {
            id,
            status: KeyStatus::Attack,
        }
    }

    /// Key released
    pub const fn release(id: u8) -> Self {
        Self {
            id,
            status: KeyStatus::Release,
        }
    }

    /// Check if this is the empty-queue sentinel
    pub fn is_idle(&self) -> bool {
        self.status == KeyStatus::Idle
    }
}
