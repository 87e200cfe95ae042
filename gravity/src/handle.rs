//! Generation-checked body handles and zone identifiers.
//!
//! The resolver never owns body lifetime; it only maps handles to membership
//! sets. A raw index would silently alias a recycled slot after the host
//! destroys and respawns a body, so the handle packs a generation counter next
//! to the index and the host bumps the generation on reuse. Staleness is then
//! detectable with a plain equality check on the packed value.
//!
//! # Bit layout
//! `BodyHandle` is a packed `u64` (least-significant bit = bit 0):
//!
//! - bits 0..=31  : slot index (u32)
//! - bits 32..=63 : generation (u32)
//!
//! # Invariants
//! - Two different `(index, generation)` pairs must never produce the same
//!   `BodyHandle`.
//! - The host increments the generation every time a slot is reused, so a
//!   stale handle never compares equal to the live one.

/// Packed `(index, generation)` identity of a host-owned body.
pub type BodyHandle = u64;

/// Identifier of a registered gravity zone, assigned by the resolver.
pub type ZoneId = u32;

/// Packs a slot index and generation into a [`BodyHandle`].
#[inline]
pub fn pack_handle(index: u32, generation: u32) -> BodyHandle {
    (index as u64) | ((generation as u64) << u32::BITS)
}

/// Extracts the slot index from a [`BodyHandle`].
#[inline]
pub fn handle_index(handle: BodyHandle) -> u32 {
    (handle & u32::MAX as u64) as u32
}

/// Extracts the generation from a [`BodyHandle`].
#[inline]
pub fn handle_generation(handle: BodyHandle) -> u32 {
    (handle >> u32::BITS) as u32
}
