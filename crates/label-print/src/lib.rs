#![deny(unsafe_code)]

//! Label printing.
//!
//! Renders templates against records or tabular rows and sends the result to
//! a network print service in batches:
//!
//! - [`config`]: print service, batching and preview settings
//! - [`dispatch`]: the [`PrintDispatch`] seam and its HTTP implementation
//! - [`pipeline`]: per-row, per-record, edited and raw printing
//! - [`session`]: test print followed by the remainder
//! - [`preview`]: PNG previews through a rasterization service

pub mod config;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod preview;
pub mod session;

pub use config::{BatchSettings, PreviewSettings, PrintConfig, PrintServiceConfig};
pub use dispatch::{HttpPrintService, PrintDispatch};
pub use error::{DispatchError, PreviewError, PrintError, Result};
pub use pipeline::{BatchPipeline, PrintSummary, RecordLabel, TabularJob};
pub use preview::{
    LabelaryClient, PreviewRasterizer, PreviewState, preview_density, preview_markup,
    preview_template,
};
pub use session::CsvPrintSession;
