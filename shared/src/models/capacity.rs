//! Capacity Catalog Model

use serde::{Deserialize, Serialize};

/// One bookable time window and its seating capacity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Slot label, e.g. `"18:00"`
    pub slot: String,
    pub capacity: u32,
}

/// Slots offered to a party of `guests` people (预订容量配置)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityOption {
    pub guests: u32,
    /// Catalog order is display order
    pub time_slots: Vec<TimeSlot>,
}

impl CapacityOption {
    /// Capacity configured for `slot`, if the slot is offered
    pub fn capacity_of(&self, slot: &str) -> Option<u32> {
        self.time_slots
            .iter()
            .find(|s| s.slot == slot)
            .map(|s| s.capacity)
    }
}

/// Remaining capacity of one slot for a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub slot: String,
    pub capacity: u32,
    pub left: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_of() {
        let option = CapacityOption {
            guests: 4,
            time_slots: vec![
                TimeSlot { slot: "18:00".into(), capacity: 2 },
                TimeSlot { slot: "20:00".into(), capacity: 5 },
            ],
        };
        assert_eq!(option.capacity_of("20:00"), Some(5));
        assert_eq!(option.capacity_of("22:00"), None);
    }

    #[test]
    fn test_capacity_option_json_shape() {
        let json = r#"{"guests":2,"timeSlots":[{"slot":"12:00","capacity":3}]}"#;
        let option: CapacityOption = serde_json::from_str(json).unwrap();
        assert_eq!(option.guests, 2);
        assert_eq!(option.time_slots[0].capacity, 3);
    }
}
