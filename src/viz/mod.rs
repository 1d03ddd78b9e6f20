//! Visualization: figure model, encodings, the network renderer and the
//! actor detail panel

pub mod charts;
pub mod detail;
pub mod encoding;
pub mod figure;
pub mod network;

pub use detail::{DetailPanel, DetailView, Selection};
pub use encoding::{ColorMap, SizeScale, UNKNOWN_CATEGORY, UNMAPPED_COLOR};
pub use figure::{Figure, Layout, Trace};
pub use network::{LegendEntry, NetworkOptions, NetworkRenderer, NetworkView};
