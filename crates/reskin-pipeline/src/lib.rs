mod archive;
mod fs_ops;
mod interaction;
mod oracle;
mod orchestrator;
mod progress;
mod rules;
mod stages;

pub use archive::{CommandExtractor, Extractor};
pub use interaction::{AppLauncher, Prompter, Reporter};
pub use oracle::{read_live_version, FsStatusOracle, StatusOracle};
pub use orchestrator::{
    backup, clear, restore, Interaction, OperationOutcome, OverlayContext, Refusal,
};
pub use progress::{ProgressSnapshot, ProgressTracker, ProgressView};
pub use rules::{AssetRules, CssColorRewriter, PREPROCESS_EXTENSIONS};
pub use stages::{FsPipeline, Pipeline};
