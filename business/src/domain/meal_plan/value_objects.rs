use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Others,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Others,
    ];
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MealType::Breakfast => write!(f, "breakfast"),
            MealType::Lunch => write!(f, "lunch"),
            MealType::Dinner => write!(f, "dinner"),
            MealType::Others => write!(f, "others"),
        }
    }
}

impl std::str::FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "others" => Ok(MealType::Others),
            _ => Err(format!("Invalid meal type: {}", s)),
        }
    }
}

/// Calendar day used as the meal plan key.
///
/// Every conversion drops the time of day (local midnight), so two instants
/// on the same local day map to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanDate(NaiveDate);

impl PlanDate {
    pub fn today() -> Self {
        Local::now().into()
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// The day `days` after this one (saturating at the calendar bounds).
    pub fn plus_days(&self, days: u64) -> Self {
        Self(
            self.0
                .checked_add_days(chrono::Days::new(days))
                .unwrap_or(self.0),
        )
    }
}

impl std::fmt::Display for PlanDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for PlanDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<NaiveDateTime> for PlanDate {
    fn from(date_time: NaiveDateTime) -> Self {
        Self(date_time.date())
    }
}

impl From<DateTime<Local>> for PlanDate {
    fn from(date_time: DateTime<Local>) -> Self {
        Self(date_time.date_naive())
    }
}

impl From<DateTime<Utc>> for PlanDate {
    fn from(date_time: DateTime<Utc>) -> Self {
        Self(date_time.with_timezone(&Local).date_naive())
    }
}
