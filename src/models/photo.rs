//! Photo model
//!
//! Only metadata lives in the store; the image bytes are a side file in the
//! photos directory named by `filename`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{PhotoId, UnitId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,

    /// Owning unit
    pub unit_id: UnitId,

    /// Name of the side file holding the image bytes
    pub filename: String,

    #[serde(default)]
    pub caption: String,

    pub created_at: DateTime<Utc>,
}

impl Photo {
    pub fn new(
        unit_id: UnitId,
        filename: impl Into<String>,
        caption: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PhotoId::new(),
            unit_id,
            filename: filename.into(),
            caption: caption.into(),
            created_at: now,
        }
    }
}
