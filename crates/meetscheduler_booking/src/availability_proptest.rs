#[cfg(test)]
mod tests {
    use crate::availability::{group_by_day, AvailabilitySlot};
    use crate::zone::DisplayZone;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use std::collections::HashSet;

    // Slots at minute offsets from a fixed base, 30 minutes long
    fn slots_from_offsets(offsets: &[i64]) -> Vec<AvailabilitySlot> {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        offsets
            .iter()
            .map(|offset| {
                let starts_at = base + Duration::minutes(*offset);
                let ends_at = starts_at + Duration::minutes(30);
                AvailabilitySlot {
                    start: starts_at.to_rfc3339(),
                    end: ends_at.to_rfc3339(),
                    starts_at,
                    ends_at,
                }
            })
            .collect()
    }

    fn zones() -> impl Strategy<Value = DisplayZone> {
        prop_oneof![
            Just(DisplayZone::Named(chrono_tz::UTC)),
            Just(DisplayZone::Named(chrono_tz::Europe::Zurich)),
            Just(DisplayZone::Named(chrono_tz::America::Los_Angeles)),
            Just(DisplayZone::Named(chrono_tz::Asia::Kolkata)),
        ]
    }

    proptest! {
        #[test]
        fn every_slot_lands_in_exactly_one_group(
            offsets in prop::collection::vec(0i64..(14 * 24 * 60), 1..60),
            zone in zones(),
        ) {
            let slots = slots_from_offsets(&offsets);
            let groups = group_by_day(&slots, &zone);

            prop_assert_eq!(groups.slot_count(), slots.len());

            // Day keys are unique and every slot sits under its own day
            let mut days = HashSet::new();
            for group in groups.iter() {
                prop_assert!(days.insert(group.day));
                for slot in &group.slots {
                    prop_assert_eq!(zone.day_of(&slot.starts_at), group.day);
                }
            }

            // Same multiset of slots
            let mut input: Vec<&str> = slots.iter().map(|s| s.start.as_str()).collect();
            let mut output: Vec<&str> = groups
                .iter()
                .flat_map(|g| g.slots.iter().map(|s| s.start.as_str()))
                .collect();
            input.sort_unstable();
            output.sort_unstable();
            prop_assert_eq!(input, output);
        }

        #[test]
        fn sorted_input_keeps_order_within_groups(
            offsets in prop::collection::vec(0i64..(14 * 24 * 60), 1..60),
            zone in zones(),
        ) {
            let mut offsets = offsets;
            offsets.sort_unstable();
            let slots = slots_from_offsets(&offsets);
            let groups = group_by_day(&slots, &zone);

            // Chronological input means reading the groups in order gives the input back
            let flattened: Vec<&AvailabilitySlot> =
                groups.iter().flat_map(|g| g.slots.iter()).collect();
            let original: Vec<&AvailabilitySlot> = slots.iter().collect();
            prop_assert_eq!(flattened, original);

            for group in groups.iter() {
                for pair in group.slots.windows(2) {
                    prop_assert!(pair[0].starts_at <= pair[1].starts_at);
                }
            }
        }

        #[test]
        fn unsorted_input_keeps_relative_order_within_a_day(
            offsets in prop::collection::vec(0i64..(3 * 24 * 60), 1..40),
        ) {
            let zone = DisplayZone::Named(chrono_tz::UTC);
            let slots = slots_from_offsets(&offsets);
            let groups = group_by_day(&slots, &zone);

            for group in groups.iter() {
                let expected: Vec<&AvailabilitySlot> = slots
                    .iter()
                    .filter(|s| zone.day_of(&s.starts_at) == group.day)
                    .collect();
                let actual: Vec<&AvailabilitySlot> = group.slots.iter().collect();
                prop_assert_eq!(actual, expected);
            }
        }
    }
}
