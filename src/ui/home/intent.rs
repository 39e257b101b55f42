use super::state::HomeSection;
use crate::api::Product;
use crate::network::ApiResult;
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum HomeIntent {
    SectionUpdated {
        section: HomeSection,
        result: ApiResult<Vec<Product>>,
    },
    /// Dismiss an error; the section goes back to loading.
    ClearError(HomeSection),
}

impl Intent for HomeIntent {}
