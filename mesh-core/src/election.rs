/// Decides which side of a pair sends the offer.
///
/// The participant whose identity sorts lower initiates; the other side only ever
/// answers. Both sides evaluate this locally and always agree, so no extra round
/// trip is needed to avoid glare. The same rule covers renegotiation.
pub fn is_initiator<T: Ord + ?Sized>(local: &T, remote: &T) -> bool {
    local < remote
}
