//! Easing curves
//!
//! Integer powers only, so no float math library is needed.

/// Ease-out: fast start, slow settle (`1 - (1 - p)^6`)
#[inline]
pub fn ease_out_sextic(progress: f32) -> f32 {
    let inv = 1.0 - progress;
    let sq = inv * inv;
    1.0 - sq * sq * sq
}

/// Ease-in: slow start, fast finish (`p^5`)
#[inline]
pub fn ease_in_quintic(progress: f32) -> f32 {
    let sq = progress * progress;
    sq * sq * progress
}
