use core::fmt;

/// Structural rules the simulation state must satisfy at every frame
/// boundary. Returned by the invariant validator and by spawn seams that
/// reject malformed requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCode {
    PlayerLivesRange,
    PlayerBounds,
    PlayerBuffRange,
    AsteroidBounds,
    AsteroidSizeClass,
    ShotState,
    PowerUpState,
    PendingNotFlushed,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayerLivesRange => write!(f, "PLAYER_LIVES_RANGE"),
            Self::PlayerBounds => write!(f, "PLAYER_BOUNDS"),
            Self::PlayerBuffRange => write!(f, "PLAYER_BUFF_RANGE"),
            Self::AsteroidBounds => write!(f, "ASTEROID_BOUNDS"),
            Self::AsteroidSizeClass => write!(f, "ASTEROID_SIZE_CLASS"),
            Self::ShotState => write!(f, "SHOT_STATE"),
            Self::PowerUpState => write!(f, "POWER_UP_STATE"),
            Self::PendingNotFlushed => write!(f, "PENDING_NOT_FLUSHED"),
        }
    }
}

impl std::error::Error for RuleCode {}
