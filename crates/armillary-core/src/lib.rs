//! Armillary Core Types
//!
//! This crate provides the model shared by every Armillary crate:
//!
//! - **Identifiers**: interned node handles ([`identifier::Id`])
//! - **Colors**: CSS color parsing with Graphviz output ([`color::Color`])
//! - **Categories**: the closed set of node kinds ([`category::NodeCategory`])
//! - **Styles**: edge line styles and directions ([`style`] module)
//! - **Model**: nodes, clusters, edges and the closed [`model::Diagram`]

pub mod category;
pub mod color;
pub mod identifier;
pub mod model;
pub mod style;
