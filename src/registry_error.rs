/// Programming errors raised by registration and by the dynamic call shapes.
///
/// A listener that is already gone is not an error; removal reports that
/// through [`Removal`](crate::Removal) instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// More than four positional arguments were forwarded.
    #[error("Too many arguments: at most 4 are accepted (target, event type, listener, options), got {got}")]
    TooManyArguments { got: usize },

    /// A bare boolean was passed where the options object belongs.
    #[error(
        "Type of boolean is not accepted as the fourth argument. \
         If you want to enable capture, specify {{capture: true}} as the fourth argument instead."
    )]
    BooleanOptions,

    /// Options of a non-object, non-boolean type.
    #[error(
        "Type of {found} is not accepted as the fourth argument. \
         If you want to specify options, pass an object like {{capture: true, name: \"my-listener-01\"}}."
    )]
    InvalidOptionsType { found: &'static str },

    /// An options object whose recognised fields have the wrong type.
    #[error("Malformed listener options: {0}")]
    MalformedOptions(String),

    /// The name is taken inside this (target, event type) bucket.
    #[error("Listener name \"{name}\" is already used for the specified event type \"{event_type}\"")]
    DuplicateName { event_type: String, name: String },
}
