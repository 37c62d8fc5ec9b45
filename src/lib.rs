//! Interactive presenter for a food-delivery data & AI platform.
//!
//! The crate models the platform as a node-and-edge catalog, walks a scripted
//! order journey through it, and renders the whole thing as a pannable,
//! zoomable egui diagram with a live event console and generative-media
//! side panel.
//!
//! The binary `flowdeck` opens the viewer; `--dump` prints the catalog and
//! script as JSON without a window.

pub mod catalog;
pub mod layout;
pub mod media;
pub mod model;
pub mod script;
pub mod sim;

// Optional GUI/egui functionality lives behind the `egui` feature flag.
// Everything headless (catalog, script, simulation, media session) builds
// without it.
#[cfg(feature = "egui")]
pub mod diagram;
