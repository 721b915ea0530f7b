//! Booking payload assembly.
//!
//! Merges resolved boarding passes with event metadata and the caller's
//! contact details into the exact submission shape the praamid.ee
//! bookings endpoint expects.

use crate::praamid::types::Direction;

use super::types::{
    BoardingPass, BookingRequest, CodeRef, Customer, EventSummary, SubmittedEvent, Ticket,
};

/// Point-of-sale code the upstream expects from this channel.
const POS_CODE: &str = "CP";

/// Caller-supplied contact details. Never fabricated; validated before
/// this layer is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerContact {
    pub email: String,
    pub phone: String,
}

/// Assembly failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssembleError {
    #[error("missing pricelistCode, cannot determine item prices")]
    MissingPricelist,
}

/// Resolve the effective price-list code.
///
/// Fallback chain, in order: the explicit cart field, the submitted
/// event's own `pricelist.code`, then the nested original event's
/// `pricelist.code`. Empty strings count as absent.
pub fn effective_pricelist_code(explicit: Option<&str>, event: &SubmittedEvent) -> Option<String> {
    if let Some(code) = non_empty(explicit) {
        return Some(code.to_string());
    }

    if let Some(code) = non_empty(event.pricelist.as_ref().and_then(|p| p.code.as_deref())) {
        return Some(code.to_string());
    }

    non_empty(
        event
            .original_event_data
            .as_ref()
            .and_then(|raw| raw.pricelist.as_ref())
            .and_then(|p| p.code.as_deref()),
    )
    .map(str::to_string)
}

fn non_empty(code: Option<&str>) -> Option<&str> {
    code.filter(|c| !c.is_empty())
}

/// Assemble a single-ticket booking submission.
///
/// Event metadata is copied verbatim from the nested original event;
/// nothing is recomputed. Any discount-subject data on the passes is
/// stripped before submission.
pub fn assemble_booking(
    mut passes: Vec<BoardingPass>,
    event: &SubmittedEvent,
    direction_code: &str,
    explicit_pricelist: Option<&str>,
    customer: &CustomerContact,
) -> Result<BookingRequest, AssembleError> {
    let pricelist_code = effective_pricelist_code(explicit_pricelist, event)
        .ok_or(AssembleError::MissingPricelist)?;

    // Discount subjects are not supported by this flow and must not
    // reach the submission.
    for pass in &mut passes {
        pass.discount_subjects = None;
    }

    let source = event.original_event_data.as_ref();

    let event_block = EventSummary {
        dtstart: source.and_then(|e| e.dtstart.clone()),
        dtend: source.and_then(|e| e.dtend.clone()),
        uid: source.and_then(|e| e.uid.clone()),
        pricelist: CodeRef::new(&pricelist_code),
        transportation_type: source.and_then(|e| e.transportation_type.clone()),
        ship: source.and_then(|e| e.ship.clone()),
    };

    // Prefer the richer direction object the upstream event carries.
    let direction = source
        .and_then(|e| e.direction.clone())
        .unwrap_or_else(|| Direction::from_code(direction_code));

    let customer_block = Customer {
        email: customer.email.clone(),
    };

    let ticket = Ticket {
        boarding_passes: passes,
        services: Vec::new(),
        attachments: Vec::new(),
        customer: customer_block.clone(),
        phone_number: customer.phone.clone(),
        sms_notification: false,
        sms_departure_notification: false,
        calendar_invite: false,
        direction,
        direction_code: direction_code.to_string(),
        event: event_block,
        pricelist: CodeRef::new(&pricelist_code),
        pos: CodeRef::new(POS_CODE),
    };

    Ok(BookingRequest {
        tickets: vec![ticket],
        customer: customer_block,
    })
}
