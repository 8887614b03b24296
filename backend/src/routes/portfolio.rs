use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    game::{SkillBar, SkillMeter},
    models::Portfolio,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    #[serde(flatten)]
    pub portfolio: Portfolio,
    /// Anchors for the navigation bar, in page order
    pub sections: Vec<&'static str>,
    pub skill_bars: Vec<SkillBar>,
}

/// Page content for the portfolio sections
pub async fn get_portfolio(State(state): State<Arc<AppState>>) -> Json<PortfolioResponse> {
    Json(PortfolioResponse {
        portfolio: state.portfolio.clone(),
        sections: state.portfolio.sections(),
        skill_bars: SkillMeter::default().bars().to_vec(),
    })
}
