use super::intent::HomeIntent;
use super::state::HomeState;
use crate::network::ApiResult;
use crate::ui::mvi::Reducer;

pub struct HomeReducer;

impl Reducer for HomeReducer {
    type State = HomeState;
    type Intent = HomeIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            HomeIntent::SectionUpdated { section, result } => {
                *state.section_mut(section) = result;
            }
            HomeIntent::ClearError(section) => {
                let slot = state.section_mut(section);
                if matches!(slot, ApiResult::Error(_)) {
                    *slot = ApiResult::Loading;
                }
            }
        }
        state
    }
}
