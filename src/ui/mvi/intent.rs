/// Marker trait for intents.
///
/// Intents are either user actions (submit login, dismiss an error) or
/// results arriving from the API pipeline.
pub trait Intent: Send + 'static {}
