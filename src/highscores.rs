//! Best-score persistence
//!
//! One integer per game, stored as a decimal string under
//! `"<gameId>_highscore"`. Anything missing or unparsable reads as 0.

use crate::catalog::GameId;
use crate::persistence::{KeyValueStore, StorageError};

/// Storage key for a game's best score
pub fn storage_key(game: GameId) -> String {
    format!("{}_highscore", game.as_str())
}

/// Load the best score, 0 if absent or malformed
pub fn load_best(store: &dyn KeyValueStore, game: GameId) -> u32 {
    let key = storage_key(game);
    match store.get_item(&key) {
        Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|_| {
            log::warn!("Ignoring malformed best score for {}: {:?}", game, raw);
            0
        }),
        None => 0,
    }
}

/// Overwrite the best score
pub fn save_best(store: &mut dyn KeyValueStore, game: GameId, value: u32) -> Result<(), StorageError> {
    store.set_item(&storage_key(game), &value.to_string())?;
    log::info!("New best for {}: {}", game, value);
    Ok(())
}

/// Best scores of every game, in catalog order
pub fn load_all(store: &dyn KeyValueStore) -> Vec<(GameId, u32)> {
    GameId::ALL.iter().map(|&id| (id, load_best(store, id))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_storage_key() {
        assert_eq!(storage_key(GameId::Snake), "snake_highscore");
        assert_eq!(storage_key(GameId::Reflex), "reflex_highscore");
    }

    #[test]
    fn test_absent_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(load_best(&store, GameId::Runner), 0);
    }

    #[test]
    fn test_malformed_is_zero() {
        let mut store = MemoryStore::new();
        for raw in ["", "abc", "-5", "12.5", "99999999999999"] {
            store.set_item("runner_highscore", raw).unwrap();
            assert_eq!(load_best(&store, GameId::Runner), 0, "raw value {:?}", raw);
        }
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        save_best(&mut store, GameId::Shooter, 120).unwrap();
        save_best(&mut store, GameId::Shooter, 120).unwrap();
        assert_eq!(load_best(&store, GameId::Shooter), 120);
        assert_eq!(store.get_item("shooter_highscore").as_deref(), Some("120"));
        assert_eq!(load_best(&store, GameId::Snake), 0);
    }

    #[test]
    fn test_load_all() {
        let mut store = MemoryStore::new();
        save_best(&mut store, GameId::Memory, 80).unwrap();
        let all = load_all(&store);
        assert_eq!(all.len(), 5);
        assert!(all.contains(&(GameId::Memory, 80)));
        assert!(all.contains(&(GameId::Snake, 0)));
    }
}
