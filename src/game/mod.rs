mod collect;
mod presets;
mod request;
mod service;
mod wire;

pub use collect::{GraphSource, collect_deviation_graph};
pub use presets::Preset;
pub use request::load_request_file;
pub use wire::{DeviationResponse, RawNode, WireId};
