use num_traits::bounds::UpperBounded;

/// Path costs.
///
/// `max_value()` stands for infinity, so additions must saturate.
pub trait Cost:
    Copy
    + std::fmt::Debug
    + std::fmt::Display
    + PartialEq
    + core::cmp::Eq
    + PartialOrd
    + Ord
    + num_traits::SaturatingAdd
    + num_traits::bounds::UpperBounded
    + num_traits::Zero
    + num_traits::One
    + std::ops::Add<Self, Output = Self>
    + std::ops::AddAssign
{
    #[inline(always)]
    fn infinity() -> Self {
        UpperBounded::max_value()
    }

    /// Whether this is a finite cost.
    ///
    /// ```
    /// use gridpath::cost::Cost;
    /// use gridpath::cost::GridCost;
    ///
    /// assert!(GridCost::from(3u8).valid());
    /// assert!(!GridCost::infinity().valid());
    /// ```
    #[inline(always)]
    fn valid(&self) -> bool {
        *self != UpperBounded::max_value()
    }
}

/// Cost of a path over the grid, measured in steps.
pub type GridCost = u32;
impl Cost for GridCost {}

/// Every step between adjacent cells costs the same.
pub const STEP_COST: GridCost = 1;
