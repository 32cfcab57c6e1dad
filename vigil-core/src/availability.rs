use chrono::TimeDelta;
use vigil_types::{Observation, Status, StatusMarkers, StatusRecord, VigilError};

/// Total time spent in the available state across an observation sequence.
///
/// Performs one left-to-right pass. A rising edge (a status equal to
/// `available` following one that is not) opens an interval; a falling edge
/// (any status other than `available` following `available`) closes it and
/// adds its length to the total. Repeated `available` observations do not
/// restart the open interval, and a falling edge with nothing open is a no-op.
///
/// Any status that is not `available` counts as leaving availability, so
/// `unavailable` only seeds the initial "previous" status.
///
/// An interval still open when the sequence ends is discarded, not counted.
/// This is intentional: only availability with both a recorded start and a
/// recorded end is credited, so a reporting window that closes while an agent
/// is available leaves that stretch for the next window. Do not "fix" it by
/// extending the trailing interval to now.
///
/// The input must be in non-decreasing timestamp order; this is not checked
/// here and out-of-order input can produce negative intervals. Use
/// [`try_available_duration`] to reject such input.
pub fn compute_available_duration<S: PartialEq>(
    observations: &[Observation<S>],
    available: &S,
    unavailable: &S,
) -> TimeDelta {
    let mut was_available = unavailable == available;
    let mut open = None;
    let mut total = TimeDelta::zero();

    for obs in observations {
        let is_available = obs.status == *available;
        if is_available && !was_available {
            open = Some(obs.at);
        } else if !is_available && was_available {
            if let Some(start) = open.take() {
                total += obs.at - start;
            }
        }
        was_available = is_available;
    }

    // `open` may still hold a trailing interval; it is dropped on purpose.
    total
}

/// Ordering-checked variant of [`compute_available_duration`].
///
/// # Errors
/// Returns [`VigilError::InvalidSequenceOrder`] with the index of the first
/// observation whose timestamp is earlier than its predecessor's.
pub fn try_available_duration<S: PartialEq>(
    observations: &[Observation<S>],
    available: &S,
    unavailable: &S,
) -> Result<TimeDelta, VigilError> {
    if let Some(index) = first_out_of_order(observations) {
        #[cfg(feature = "tracing")]
        tracing::debug!(index, len = observations.len(), "rejecting out-of-order observations");
        return Err(VigilError::InvalidSequenceOrder { index });
    }
    Ok(compute_available_duration(observations, available, unavailable))
}

/// Accumulate over classified statuses.
pub fn available_duration(observations: &[Observation<Status>]) -> TimeDelta {
    compute_available_duration(observations, &Status::Available, &Status::NotAvailable)
}

/// True if timestamps never decrease. Equal timestamps are allowed.
pub fn is_chronological<S>(observations: &[Observation<S>]) -> bool {
    first_out_of_order(observations).is_none()
}

/// Classify persisted records into typed observations, preserving order.
pub fn observations_from_records(
    records: &[StatusRecord],
    markers: &StatusMarkers,
) -> Vec<Observation<Status>> {
    records
        .iter()
        .map(|r| Observation::new(r.at, markers.classify(&r.status)))
        .collect()
}

fn first_out_of_order<S>(observations: &[Observation<S>]) -> Option<usize> {
    observations
        .windows(2)
        .position(|w| w[1].at < w[0].at)
        .map(|i| i + 1)
}
