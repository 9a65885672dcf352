//! Report pipeline: the analytical core behind the dashboard.
//!
//! Architecture:
//! ```text
//!   delimited bytes
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse + infer column types → Table
//!   └──────────┘
//!        │
//!        ├──────────────┬──────────────┐
//!        ▼              ▼              ▼
//!   ┌──────────┐  ┌─────────────┐  ┌──────────┐
//!   │ summary  │  │ correlation │  │  charts  │  schema → Vec<ChartSpec>
//!   └──────────┘  └─────────────┘  └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  export  │  describe-style CSV / report JSON
//!   └──────────┘
//! ```
//!
//! [`pipeline::Report`] runs the stages in order. Nothing here performs I/O.

pub mod charts;
pub mod correlation;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod summary;
