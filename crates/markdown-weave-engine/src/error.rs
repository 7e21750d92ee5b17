use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("Feature '{feature}' is incompatible with compiler '{compiler}'")]
    IncompatibleFeature { feature: String, compiler: String },
}
