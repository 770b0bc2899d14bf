use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerTier {
    Enterprise,
    Professional,
    Starter,
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductArea {
    Billing,
    Api,
    Ui,
    Performance,
    Security,
    Documentation,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "NA")]
    NorthAmerica,
    #[serde(rename = "EU")]
    Europe,
    #[serde(rename = "APAC")]
    AsiaPacific,
    #[serde(rename = "LATAM")]
    LatinAmerica,
    #[serde(rename = "other")]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    Zendesk,
    Slack,
    Email,
    Survey,
    #[serde(other)]
    Other,
}

macro_rules! wire_label {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            /// Label used on the wire and in rendered views.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_label!(CustomerTier {
    Enterprise => "enterprise",
    Professional => "professional",
    Starter => "starter",
    Free => "free",
});
wire_label!(ProductArea {
    Billing => "billing",
    Api => "api",
    Ui => "ui",
    Performance => "performance",
    Security => "security",
    Documentation => "documentation",
    Other => "other",
});
wire_label!(Region {
    NorthAmerica => "NA",
    Europe => "EU",
    AsiaPacific => "APAC",
    LatinAmerica => "LATAM",
    Other => "other",
});
wire_label!(Sentiment {
    Positive => "positive",
    Negative => "negative",
    Neutral => "neutral",
});
wire_label!(FeedbackSource {
    Zendesk => "zendesk",
    Slack => "slack",
    Email => "email",
    Survey => "survey",
    Other => "other",
});

/// One row of customer feedback returned as part of an answer's data preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub customer_tier: CustomerTier,
    /// 1 (lowest) to 5 (highest).
    pub priority: u8,
    pub product_area: ProductArea,
    pub region: Region,
    pub sentiment: Sentiment,
    pub source: FeedbackSource,
    pub summary: String,
    pub topic: String,
}

/// A suggested remediation that can be filed as a tracker ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<f64>,
}

impl Action {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            magnitude: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JiraTicket {
    pub action_title: String,
    pub ticket_key: String,
    pub ticket_url: String,
}
