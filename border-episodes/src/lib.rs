#![warn(missing_docs)]
//! Episode acquisition for [`border_sequence`] datasets.
//!
//! [`EpisodeBuffer`] collects episodes of different lengths, e.g., from
//! environment rollouts or offline datasets, into the padded arrays of an
//! [`EpisodeStore`](border_sequence::EpisodeStore). Stores can be persisted
//! with [`save_store`] and [`load_store`].
mod buffer;
mod config;
mod episode;
pub mod error;
mod io;
pub use buffer::EpisodeBuffer;
pub use config::EpisodeBufferConfig;
pub use episode::Episode;
pub use error::EpisodeError;
pub use io::{load_store, save_store};
