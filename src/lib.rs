//! Clinical trial intake form: printable text summary and the cart/port
//! diagram editor that accompanies it.

pub mod diagram;
pub mod error;
pub mod export;
pub mod form;
pub mod log;
pub mod report;
pub mod style;

pub use error::{Error, Result};
pub use form::FormData;
pub use report::{REPORT_FILE_NAME, Variant, render, render_with};
