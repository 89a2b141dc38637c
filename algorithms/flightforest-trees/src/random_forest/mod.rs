mod algorithm;
mod binning;
mod describe;
mod hyperparams;

pub use algorithm::*;
pub use binning::*;
pub use hyperparams::*;
