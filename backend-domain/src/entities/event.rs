// Event entity
// Represents one location-specific line of a client transaction

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::LocationCode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: Uuid,
    pub trans_id: Uuid,
    pub trans_tms: DateTime<FixedOffset>,
    pub rc_num: String,
    pub client_id: String,
    pub event_cnt: i32,
    pub location_cd: LocationCode,
    pub location_id1: Option<String>,
    pub location_id2: Option<String>,
    pub addr_nbr: Option<String>,
}

/// A validated event that has not been assigned an `event_id` yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub trans_id: Uuid,
    pub trans_tms: DateTime<FixedOffset>,
    pub rc_num: String,
    pub client_id: String,
    pub event_cnt: i32,
    pub location_cd: LocationCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr_nbr: Option<String>,
}

impl NewEvent {
    pub fn into_event(self, event_id: Uuid) -> Event {
        Event {
            event_id,
            trans_id: self.trans_id,
            trans_tms: self.trans_tms,
            rc_num: self.rc_num,
            client_id: self.client_id,
            event_cnt: self.event_cnt,
            location_cd: self.location_cd,
            location_id1: self.location_id1,
            location_id2: self.location_id2,
            addr_nbr: self.addr_nbr,
        }
    }
}
