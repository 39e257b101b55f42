/// Marker trait for screen state.
///
/// `PartialEq` lets the store skip notifying watchers when a reduction
/// leaves the state unchanged.
pub trait UiState: Clone + PartialEq + Default + Send + Sync + 'static {}
