//! Two-choice confirmation offered when restarting on the day a practice was
//! already completed.
//!
//! The request is a plain value: the caller shows `message` and the labelled
//! choices, then hands the selected [`SameDayChoice`] back to
//! [`super::Session::resolve_same_day`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameDayChoice {
    ViewHistory,
    ReviewPractice,
}

impl SameDayChoice {
    pub fn label(self) -> &'static str {
        match self {
            SameDayChoice::ViewHistory => "Voir l'historique",
            SameDayChoice::ReviewPractice => "Revoir ma pratique",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationOption {
    pub choice: SameDayChoice,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub date: NaiveDate,
    pub title: String,
    pub message: String,
    pub options: Vec<ConfirmationOption>,
}

impl ConfirmationRequest {
    pub(crate) fn same_day(date: NaiveDate) -> Self {
        let options = [SameDayChoice::ViewHistory, SameDayChoice::ReviewPractice]
            .into_iter()
            .map(|choice| ConfirmationOption {
                choice,
                label: choice.label().to_string(),
            })
            .collect();
        Self {
            date,
            title: "Pratique déjà complétée".to_string(),
            message: "Vous avez déjà complété votre pratique aujourd'hui. \
                      Revenez demain pour une nouvelle pratique."
                .to_string(),
            options,
        }
    }

    pub fn choices(&self) -> impl Iterator<Item = SameDayChoice> + '_ {
        self.options.iter().map(|o| o.choice)
    }
}

/// What the front end should do after a same-day choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameDayResolution {
    ShowHistory,
    Review,
}
