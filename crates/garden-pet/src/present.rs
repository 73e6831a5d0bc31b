//! Builders for the Presentation Adapter payloads.
//!
//! The body sprite key is the canonical type string; eyes and mouth come
//! straight off the snapshot. If no sprite asset exists for a computed
//! key, the adapter substitutes its placeholder; that fallback is not
//! this crate's concern.

use garden_types::{PetSnapshot, PortraitRequest, StatSheetRequest, TrainableStat};

/// Build the portrait request for a pet.
pub fn portrait_request(pet: &PetSnapshot, background: &str) -> PortraitRequest {
    PortraitRequest {
        background: background.to_owned(),
        body: pet.chao_type.to_string(),
        eyes: pet.eyes.clone(),
        mouth: pet.mouth.clone(),
    }
}

/// Build the stat sheet request for a pet.
pub fn stat_sheet_request(pet: &PetSnapshot) -> StatSheetRequest {
    let mut request = StatSheetRequest::default();
    for stat in TrainableStat::ALL {
        let track = pet.track(stat);
        request.tick_positions.insert(stat, track.ticks);
        request.levels.insert(stat, track.level);
        request.exp.insert(stat, track.exp);
    }
    request
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use garden_types::Grade;

    use super::*;

    #[test]
    fn portrait_uses_the_type_string_as_body_key() {
        let born = Utc.timestamp_opt(0, 0).single().unwrap_or_default();
        let pet = PetSnapshot::fresh(String::from("omochao"), [Grade::D; 5], born);
        let request = portrait_request(&pet, "garden_day");
        assert_eq!(request.body, "neutral_normal_1");
        assert_eq!(request.background, "garden_day");
        assert_eq!(request.eyes, "eyes_normal");
    }

    #[test]
    fn stat_sheet_covers_all_five_stats() {
        let born = Utc.timestamp_opt(0, 0).single().unwrap_or_default();
        let mut pet = PetSnapshot::fresh(String::from("omochao"), [Grade::D; 5], born);
        pet.run.level = 8;
        pet.run.ticks = 3;
        let request = stat_sheet_request(&pet);
        assert_eq!(request.levels.len(), 5);
        assert_eq!(request.levels.get(&TrainableStat::Run).copied(), Some(8));
        assert_eq!(request.tick_positions.get(&TrainableStat::Run).copied(), Some(3));
    }
}
