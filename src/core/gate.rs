//! Validation gate: which fields are still required, and whether a selection can be sent.
//!
//! Everything here is a pure function of its arguments.

use crate::domain::model::{BookingSelection, ContactInfo, Field, Service};
use std::collections::BTreeSet;

const ALWAYS_REQUIRED: [Field; 2] = [Field::Name, Field::Phone];

/// Contact fields the client must fill in for `service`.
pub fn required_fields(service: Option<&Service>) -> BTreeSet<Field> {
    let mut required: BTreeSet<Field> = ALWAYS_REQUIRED.into_iter().collect();
    if service.is_some_and(|s| s.requires_address) {
        required.insert(Field::Address);
    }
    required
}

/// Required contact fields that are currently empty.
pub fn unmet_fields(service: Option<&Service>, contact: &ContactInfo) -> BTreeSet<Field> {
    required_fields(service)
        .into_iter()
        .filter(|field| !contact.is_filled(*field))
        .collect()
}

/// Everything still missing before the selection can be submitted, scheduling fields first.
pub fn missing_fields(selection: &BookingSelection) -> Vec<Field> {
    let mut missing = Vec::new();
    if selection.service.is_none() {
        missing.push(Field::Service);
    }
    if selection.date.is_none() {
        missing.push(Field::Date);
    }
    if selection.time.is_none() {
        missing.push(Field::Time);
    }
    missing.extend(unmet_fields(selection.service.as_ref(), &selection.contact));
    missing
}

pub fn is_submittable(selection: &BookingSelection) -> bool {
    selection.service.is_some()
        && selection.date.is_some()
        && selection.time.is_some()
        && unmet_fields(selection.service.as_ref(), &selection.contact).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DateCandidate, ServiceId, TimeSlot};

    fn service(requires_address: bool) -> Service {
        Service {
            id: ServiceId(1),
            name: "Haircut".to_string(),
            description: None,
            duration_minutes: 30,
            price: None,
            requires_address,
            is_active: true,
        }
    }

    fn complete_selection(requires_address: bool) -> BookingSelection {
        BookingSelection {
            service: Some(service(requires_address)),
            date: DateCandidate::from_ymd(2025, 3, 10),
            time: Some(TimeSlot::from("09:00")),
            contact: ContactInfo::new("Ana", "11999999999"),
        }
    }

    #[test]
    fn test_name_and_phone_always_required() {
        let unmet = unmet_fields(None, &ContactInfo::default());
        assert_eq!(unmet.into_iter().collect::<Vec<_>>(), vec![Field::Name, Field::Phone]);
    }

    #[test]
    fn test_address_required_only_when_service_asks() {
        let contact = ContactInfo::new("Ana", "11999999999");
        assert!(unmet_fields(Some(&service(false)), &contact).is_empty());
        assert_eq!(
            unmet_fields(Some(&service(true)), &contact),
            BTreeSet::from([Field::Address])
        );

        let mut with_address = contact.clone();
        with_address.address = "Rua A, 100".to_string();
        assert!(unmet_fields(Some(&service(true)), &with_address).is_empty());
    }

    #[test]
    fn test_email_and_notes_never_required() {
        let required = required_fields(Some(&service(true)));
        assert!(!required.contains(&Field::Email));
        assert!(!required.contains(&Field::Notes));
    }

    #[test]
    fn test_submittable_over_condition_lattice() {
        for mask in 0u8..16 {
            let service_set = mask & 0b0001 != 0;
            let date_set = mask & 0b0010 != 0;
            let time_set = mask & 0b0100 != 0;
            let address_missing = mask & 0b1000 != 0;

            let mut selection = complete_selection(true);
            selection.contact.address = if address_missing {
                String::new()
            } else {
                "Rua A, 100".to_string()
            };
            if !service_set {
                selection.service = None;
            }
            if !date_set {
                selection.date = None;
            }
            if !time_set {
                selection.time = None;
            }

            let expected = service_set && date_set && time_set && !address_missing;
            assert_eq!(is_submittable(&selection), expected, "mask {:04b}", mask);
        }
    }

    #[test]
    fn test_requires_address_blocks_submit_with_everything_else_filled() {
        let selection = complete_selection(true);
        assert!(!is_submittable(&selection));
        assert_eq!(missing_fields(&selection), vec![Field::Address]);
    }

    #[test]
    fn test_missing_fields_orders_schedule_before_contact() {
        let selection = BookingSelection::default();
        assert_eq!(
            missing_fields(&selection),
            vec![Field::Service, Field::Date, Field::Time, Field::Name, Field::Phone]
        );
    }
}
