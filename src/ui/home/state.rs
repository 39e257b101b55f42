use crate::api::Product;
use crate::network::ApiResult;
use crate::ui::mvi::UiState;

/// The independently loaded blocks of the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeSection {
    Featured,
    NewArrivals,
    Popular,
}

impl HomeSection {
    pub const ALL: [HomeSection; 3] = [Self::Featured, Self::NewArrivals, Self::Popular];

    /// Number of products requested for the section.
    pub fn limit(self) -> u32 {
        match self {
            Self::Featured | Self::NewArrivals => 5,
            Self::Popular => 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeState {
    pub featured: ApiResult<Vec<Product>>,
    pub new_arrivals: ApiResult<Vec<Product>>,
    pub popular: ApiResult<Vec<Product>>,
}

impl Default for HomeState {
    /// Every section starts out loading.
    fn default() -> Self {
        Self {
            featured: ApiResult::Loading,
            new_arrivals: ApiResult::Loading,
            popular: ApiResult::Loading,
        }
    }
}

impl UiState for HomeState {}

impl HomeState {
    pub fn section(&self, section: HomeSection) -> &ApiResult<Vec<Product>> {
        match section {
            HomeSection::Featured => &self.featured,
            HomeSection::NewArrivals => &self.new_arrivals,
            HomeSection::Popular => &self.popular,
        }
    }

    pub(super) fn section_mut(&mut self, section: HomeSection) -> &mut ApiResult<Vec<Product>> {
        match section {
            HomeSection::Featured => &mut self.featured,
            HomeSection::NewArrivals => &mut self.new_arrivals,
            HomeSection::Popular => &mut self.popular,
        }
    }
}
