use crate::*;

pub const SAVED_GAME_KEY: &str = "savedGame";
pub const BEST_SCORE_KEY: &str = "bestScore";

/// Durable state the game needs: the in-progress checkpoint and the best score.
pub trait GameStore {
    fn load_snapshot(&self) -> StorageResult<Option<SavedGame>>;
    fn save_snapshot(&mut self, snapshot: &SavedGame) -> StorageResult<()>;
    fn clear_snapshot(&mut self) -> StorageResult<()>;
    fn load_best_score(&self) -> StorageResult<Option<Score>>;
    fn save_best_score(&mut self, score: Score) -> StorageResult<()>;
}

/// [`GameStore`] over a string key-value store: the snapshot as JSON, the best score as a decimal string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyValueGateway<S> {
    store: S,
}

impl<S: KeyValueStore> KeyValueGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: KeyValueStore> GameStore for KeyValueGateway<S> {
    fn load_snapshot(&self) -> StorageResult<Option<SavedGame>> {
        let Some(raw) = self.store.get(SAVED_GAME_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Decode {
                key: SAVED_GAME_KEY.to_string(),
                source,
            })
    }

    fn save_snapshot(&mut self, snapshot: &SavedGame) -> StorageResult<()> {
        let raw = serde_json::to_string(snapshot).map_err(|source| StorageError::Encode {
            key: SAVED_GAME_KEY.to_string(),
            source,
        })?;
        self.store.set(SAVED_GAME_KEY, &raw)
    }

    fn clear_snapshot(&mut self) -> StorageResult<()> {
        self.store.remove(SAVED_GAME_KEY)
    }

    fn load_best_score(&self) -> StorageResult<Option<Score>> {
        let Some(raw) = self.store.get(BEST_SCORE_KEY)? else {
            return Ok(None);
        };
        raw.trim()
            .parse()
            .map(Some)
            .map_err(|_| StorageError::InvalidNumber {
                key: BEST_SCORE_KEY.to_string(),
                value: raw,
            })
    }

    fn save_best_score(&mut self, score: Score) -> StorageResult<()> {
        self.store.set(BEST_SCORE_KEY, &score.to_string())
    }
}
