// Location code value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationCode {
    #[serde(rename = "DESTINATION")]
    Destination,
    #[serde(rename = "CUSTOMER NUMBER")]
    CustomerNumber,
    #[serde(rename = "OUTLET ID")]
    OutletId,
}

impl LocationCode {
    pub const ALL: [LocationCode; 3] = [
        LocationCode::Destination,
        LocationCode::CustomerNumber,
        LocationCode::OutletId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationCode::Destination => "DESTINATION",
            LocationCode::CustomerNumber => "CUSTOMER NUMBER",
            LocationCode::OutletId => "OUTLET ID",
        }
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocationCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}
