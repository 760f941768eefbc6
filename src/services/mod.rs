pub mod tile_loader;

pub use tile_loader::{load_image, load_tile_dir, LoadedTiles};
