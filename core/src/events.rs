use crate::*;

/// Notification for the presentation layer (sound, haptics, animation).
///
/// Every accepted press emits [`Flip`](Self::Flip) first, followed by the pair result when a second tile opens.
/// The final pair emits [`Match`](Self::Match) and then [`Won`](Self::Won).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Flip(TileIndex),
    Match(TilePair),
    Mismatch(TilePair),
    Won { summary: WinSummary, new_best: bool },
    /// Countdown reached zero. Play continues.
    TimeUp,
}
