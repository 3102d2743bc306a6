//! Unit model
//!
//! A physical console, controller or accessory tracked from check-in
//! through repair and, optionally, sale.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UnitId;
use super::money::Money;

/// What kind of hardware a unit is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum UnitKind {
    #[default]
    Console,
    Controller,
    Accessory,
}

impl UnitKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "console" => Some(Self::Console),
            "controller" => Some(Self::Controller),
            "accessory" => Some(Self::Accessory),
            _ => None,
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => write!(f, "Console"),
            Self::Controller => write!(f, "Controller"),
            Self::Accessory => write!(f, "Accessory"),
        }
    }
}

/// Where a unit is in the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum UnitStatus {
    #[default]
    InProgress,
    WaitingParts,
    Completed,
    Sold,
    PartsSpares,
}

impl UnitStatus {
    /// Parse a status from user input ("in-progress", "waiting_parts", "sold", ...)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "inprogress" => Some(Self::InProgress),
            "waitingparts" => Some(Self::WaitingParts),
            "completed" | "done" => Some(Self::Completed),
            "sold" => Some(Self::Sold),
            "partsspares" | "spares" => Some(Self::PartsSpares),
            _ => None,
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "In Progress"),
            Self::WaitingParts => write!(f, "Waiting Parts"),
            Self::Completed => write!(f, "Completed"),
            Self::Sold => write!(f, "Sold"),
            Self::PartsSpares => write!(f, "Parts/Spares"),
        }
    }
}

/// Cosmetic grade assigned at check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PhysicalGrade {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

impl PhysicalGrade {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "excellent" | "e" => Some(Self::Excellent),
            "good" | "g" => Some(Self::Good),
            "fair" | "f" => Some(Self::Fair),
            "poor" | "p" => Some(Self::Poor),
            _ => None,
        }
    }
}

impl fmt::Display for PhysicalGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::Good => write!(f, "Good"),
            Self::Fair => write!(f, "Fair"),
            Self::Poor => write!(f, "Poor"),
        }
    }
}

/// Coarse diagnostic outcome for one subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TriageStatus {
    #[default]
    Works,
    HasIssues,
    NotFunctioning,
}

impl TriageStatus {
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "works" | "ok" => Some(Self::Works),
            "hasissues" | "issues" => Some(Self::HasIssues),
            "notfunctioning" | "dead" => Some(Self::NotFunctioning),
            _ => None,
        }
    }
}

impl fmt::Display for TriageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Works => write!(f, "Works"),
            Self::HasIssues => write!(f, "Has Issues"),
            Self::NotFunctioning => write!(f, "Not Functioning"),
        }
    }
}

/// Intake diagnostics, one state per subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Triage {
    pub power: TriageStatus,
    pub av: TriageStatus,
    pub hdd: TriageStatus,
    pub dvd: TriageStatus,
}

/// Sale outcome fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SaleInfo {
    pub asking_price: Option<Money>,
    pub min_price: Option<Money>,
    pub sold_price: Option<Money>,
    pub sold_date: Option<NaiveDate>,
    pub buyer: Option<String>,
    pub marketplace: Option<String>,
    pub shipping_cost: Option<Money>,
    pub fees: Option<Money>,
    pub notes: Option<String>,
}

impl SaleInfo {
    /// Price used for listings and profit: sold price, else asking price
    pub fn effective_price(&self) -> Option<Money> {
        self.sold_price.or(self.asking_price)
    }
}

/// A tracked console, controller or accessory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,

    /// Unit number / label (e.g. "XBX-101")
    pub title: String,

    pub kind: UnitKind,

    pub status: UnitStatus,

    pub serial_number: Option<String>,

    pub manufacture_date: Option<NaiveDate>,

    #[serde(default)]
    pub physical_grade: PhysicalGrade,

    #[serde(default)]
    pub triage: Triage,

    pub purchase_source: Option<String>,

    pub price_paid: Option<Money>,

    /// When work on the unit started (purchase date at check-in)
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub sale: SaleInfo,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub notes: String,

    /// Bumped whenever anything owned by the unit changes
    pub last_activity_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

impl Unit {
    /// Create a new unit with default triage and status
    pub fn new(title: impl Into<String>, kind: UnitKind, now: DateTime<Utc>) -> Self {
        Self {
            id: UnitId::new(),
            title: title.into(),
            kind,
            status: UnitStatus::default(),
            serial_number: None,
            manufacture_date: None,
            physical_grade: PhysicalGrade::default(),
            triage: Triage::default(),
            purchase_source: None,
            price_paid: None,
            start_date: None,
            sale: SaleInfo::default(),
            tags: Vec::new(),
            notes: String::new(),
            last_activity_at: now,
            created_at: now,
        }
    }

    /// Record activity on this unit
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity_at = now;
    }

    /// Add a tag if not already present (case-insensitive). Returns true if added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove a tag (case-insensitive). Returns true if removed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| !t.eq_ignore_ascii_case(tag.trim()));
        self.tags.len() != before
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Case-insensitive match against title, serial, tags and notes
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&q)
            || self
                .serial_number
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&q))
            || self.tags.iter().any(|t| t.to_lowercase().contains(&q))
            || self.notes.to_lowercase().contains(&q)
    }

    pub fn validate(&self) -> Result<(), UnitValidationError> {
        if self.title.trim().is_empty() {
            return Err(UnitValidationError::EmptyTitle);
        }
        if self.title.len() > 100 {
            return Err(UnitValidationError::TitleTooLong(self.title.len()));
        }
        Ok(())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.kind)
    }
}

/// Validation errors for units
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitValidationError {
    EmptyTitle,
    TitleTooLong(usize),
}

impl fmt::Display for UnitValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Unit title cannot be empty"),
            Self::TitleTooLong(len) => write!(f, "Unit title too long ({} chars, max 100)", len),
        }
    }
}

impl std::error::Error for UnitValidationError {}
