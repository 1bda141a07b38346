pub mod assets;
pub mod batch;
pub mod classify;
pub mod detection;
pub mod overlay;
pub mod shapes;

pub use assets::{AssetLookup, EmojiAsset, EmojiAssets};
pub use classify::{Classification, EmojiCategory, classify};
pub use detection::{Detector, FaceSignal};
pub use overlay::{Composition, Compositor, Outcome, compose};
