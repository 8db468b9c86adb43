//! # WallKit Layout
//!
//! This crate turns a wall description into a flat cutting plan for a
//! modular wall built from interlocking connector modules.
//!
//! ## Pipeline
//!
//! - **Guide Lines**: Validates the guide polyline and derives the mitred wall outline
//! - **Module Layout**: Packs alternating A/B connector modules along each segment
//! - **Templates**: Connector notches, holes, end caps and splitter profiles
//! - **Part Splitter**: Cuts oversized panels into fabricable parts and assigns holes
//! - **Blueprint**: Assembles narrow, wide and transversal panels into indexed parts
//!
//! ## Downstream
//!
//! - **Placement**: Where each flat part goes in space, with area and volume
//! - **DXF Export**: Writes the cuts as layered polylines

pub mod blueprint;
pub mod dxf_export;
pub mod error;
pub mod guide_lines;
pub mod module_layout;
pub mod part_splitter;
pub mod placement;
pub mod templates;

// Re-export commonly used items
pub use blueprint::{
    Blueprint, BlueprintMaker, BlueprintParameters, ParameterLimits, PartKind, PartSource, Side,
    WallInput, WallVariant,
};
pub use dxf_export::{save_dxf, save_json, to_drawing, to_json, DxfLayers};
pub use error::{LayoutError, LayoutResult};
pub use guide_lines::{GuideLine, GuideLineGeometry, GuideSegment};
pub use module_layout::{ModuleKind, ModuleLayout, ModulePlacement, SplitPolicy};
pub use part_splitter::{ContainmentMode, Part, PartSplitter, SplitOutcome};
pub use placement::{place_parts, PartSolid};
pub use templates::{ShapeTemplates, StandardTemplates};
