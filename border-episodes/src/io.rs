//! Persistence of episode stores.
use anyhow::Result;
use border_sequence::EpisodeStore;
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

/// Saves an episode store in binary format.
pub fn save_store(store: &EpisodeStore, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = BufWriter::new(File::create(path)?);
    bincode::serialize_into(file, store)?;
    log::info!("Saved {} episodes to {:?}", store.n_episodes(), path);
    Ok(())
}

/// Loads an episode store saved with [`save_store`].
///
/// Shapes are validated again, as the file may not come from [`save_store`].
pub fn load_store(path: impl AsRef<Path>) -> Result<EpisodeStore> {
    let path = path.as_ref();
    let rdr = BufReader::new(File::open(path)?);
    let store: EpisodeStore = bincode::deserialize_from(rdr)?;
    log::info!("Loaded {} episodes from {:?}", store.n_episodes(), path);
    store.validate()
}
