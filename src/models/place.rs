use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use sqlx::FromRow;

use super::UnknownVariant;

pub const DEFAULT_DURATION_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Stay,
    #[default]
    Historical,
    Restaurant,
    Shopping,
    Nature,
    Adventure,
    Cultural,
    Entertainment,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Stay,
        Category::Historical,
        Category::Restaurant,
        Category::Shopping,
        Category::Nature,
        Category::Adventure,
        Category::Cultural,
        Category::Entertainment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Stay => "stay",
            Category::Historical => "historical",
            Category::Restaurant => "restaurant",
            Category::Shopping => "shopping",
            Category::Nature => "nature",
            Category::Adventure => "adventure",
            Category::Cultural => "cultural",
            Category::Entertainment => "entertainment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == raw)
            .ok_or_else(|| UnknownVariant {
                kind: "category",
                value: raw.to_string(),
            })
    }
}

impl TryFrom<String> for Category {
    type Error = UnknownVariant;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub trip_id: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub category: Category,
    pub estimated_duration: i64,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlace {
    #[serde(alias = "trip_id")]
    pub trip_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub estimated_duration: Option<i64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceUpdate {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub estimated_duration: Option<i64>,
    pub address: Option<String>,
    pub notes: Option<String>,
}
