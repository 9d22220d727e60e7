//! Quote session model: options, quotes, the selected file and the session reducer.

pub mod cad_file;
pub mod options;
pub mod quote;
pub mod session;

pub use cad_file::{CadFile, FileError, SUPPORTED_EXTENSIONS, SUPPORTED_FORMATS_LABEL};
pub use options::{Finish, LeadTime, Material, QuoteOptions};
pub use quote::{CostItem, Quote};
pub use session::{
    Command, LoadingView, Phase, PreviousQuote, QuoteRequest, RequestToken, Session, SessionEvent,
    Settle,
};
