use serde::{Deserialize, Serialize};

use crate::providers::{ProviderError, ProviderResult};

/// Final response payload. The serialized key names are the wire contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub book_recommendations: Vec<String>,
    pub music_recommendations: Vec<String>,
}

/// Outcome of one resolver tier. The chain stops at the first `Hit`;
/// `Empty` and `Failed` both move on to the next tier.
pub(crate) enum Tier {
    Hit(Vec<String>),
    Empty,
    Failed(ProviderError),
}

impl Tier {
    pub(crate) fn from_result(result: ProviderResult<Vec<String>>) -> Tier {
        match result {
            Ok(recs) if recs.is_empty() => Tier::Empty,
            Ok(recs) => Tier::Hit(recs),
            Err(e) => Tier::Failed(e),
        }
    }
}
