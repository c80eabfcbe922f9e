//! Traits shared by every point representation.

/// Trait for getting the identity element of a point type.
pub trait Identity {
    /// Returns the identity element of the curve.
    /// Can be used as a constructor.
    fn identity() -> Self;
}

/// Trait for checking whether a point is on the curve.
///
/// This is only for tests and debug assertions: every constructor other
/// than the raw table decoder produces valid points by construction.
pub trait ValidityCheck {
    /// Checks whether the point is on the curve. Not CT.
    fn is_valid(&self) -> bool;
}
